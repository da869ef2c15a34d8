use serde::{Deserialize, Serialize};

use super::enums::GuardianRelation;

/// A person living at the facility. Read-only input to the correlation
/// engine; the engine never mutates residents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resident {
    pub id: String,
    pub display_name: String,
    pub room: Option<String>,
    pub guardian: GuardianRelation,
    /// Admission date as delivered by the backend (YYYY-MM-DD).
    pub admitted_on: Option<String>,
}

impl Resident {
    /// Residents under institutional guardianship are excluded from the
    /// family-disengagement rule.
    pub fn has_institutional_guardian(&self) -> bool {
        self.guardian == GuardianRelation::Institutional
    }
}
