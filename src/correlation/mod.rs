pub mod engine;
pub mod escalation;
pub mod index;
pub mod messages;
pub mod rules;
pub mod types;
pub mod window;

pub use engine::{alert_id, CorrelationEngine};
pub use types::{
    Alert, AlertCounts, AlertSeverity, CorrelationError, DataQualityReport, EvaluationReport,
    FacilitySnapshot, RuleFailure, FACILITY_SUBJECT_ID, FACILITY_SUBJECT_NAME,
};
