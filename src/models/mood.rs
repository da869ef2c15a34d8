use serde::{Deserialize, Serialize};

use super::enums::{StressBand, Valence};

/// One mood/stress observation from the wearable telemetry feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodObservation {
    pub id: String,
    pub resident_id: Option<String>,
    pub stress: StressBand,
    pub valence: Valence,
    pub observed_at: Option<String>,
}
