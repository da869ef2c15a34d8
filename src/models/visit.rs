use serde::{Deserialize, Serialize};

/// One family or friend visit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitRecord {
    pub id: String,
    pub resident_id: Option<String>,
    pub visitor_name: Option<String>,
    pub visited_on: Option<String>,
}
