use serde::{Deserialize, Serialize};

/// One abuse/incident report. May or may not concern a specific resident.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentReport {
    pub id: String,
    pub resident_id: Option<String>,
    pub resolved: bool,
    pub filed_on: Option<String>,
}
