pub mod config;
pub mod correlation; // entity index, window evaluator, rule catalog, engine
pub mod export; // clinical bundle handoff
pub mod models;
pub mod telemetry;

pub use correlation::{
    alert_id, Alert, AlertCounts, AlertSeverity, CorrelationEngine, CorrelationError,
    EvaluationReport, FacilitySnapshot, FACILITY_SUBJECT_ID,
};
pub use export::{export_all, export_bundle, CareBundle};
pub use models::Resident;
