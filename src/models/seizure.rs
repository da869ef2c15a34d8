use serde::{Deserialize, Serialize};

use super::enums::SeizureRecordKind;

/// One entry in a resident's seizure log: an episode, or an entry from the
/// surrounding follow-up workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeizureRecord {
    pub id: String,
    pub resident_id: Option<String>,
    pub kind: SeizureRecordKind,
    pub occurred_on: Option<String>,
}
