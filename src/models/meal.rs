use serde::{Deserialize, Serialize};

use super::enums::MealStatus;

/// One served meal for one resident.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealRecord {
    pub id: String,
    pub resident_id: Option<String>,
    pub status: MealStatus,
    /// Serving timestamp as delivered by the backend (RFC 3339 or
    /// YYYY-MM-DD). Unparseable values exclude the record from windowing.
    pub served_at: Option<String>,
}
