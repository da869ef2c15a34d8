use serde::{Deserialize, Serialize};

/// One dental examination. The oral health index is 0 (healthy) upward;
/// exams recorded without scoring carry no index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DentalRecord {
    pub id: String,
    pub resident_id: Option<String>,
    pub oral_health_index: Option<i32>,
    pub examined_on: Option<String>,
}
