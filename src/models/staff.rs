use serde::{Deserialize, Serialize};

use super::enums::RiskBand;

/// One staff-wellbeing self-assessment. Facility-level stream: keyed by
/// staff member, not by resident.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffWellbeingRecord {
    pub id: String,
    pub staff_id: Option<String>,
    pub risk_band: RiskBand,
    pub assessed_on: Option<String>,
}
