use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::enums::{AlertCategory, StreamName};
use crate::models::{
    DentalRecord, IncidentReport, MealRecord, MoodObservation, SeizureRecord,
    StaffWellbeingRecord, VisitRecord,
};

use super::window::parse_stamp;

/// Subject id used by facility-wide alerts instead of a resident id.
pub const FACILITY_SUBJECT_ID: &str = "facility";
pub const FACILITY_SUBJECT_NAME: &str = "Whole facility";

// ---------------------------------------------------------------------------
// AlertSeverity
// ---------------------------------------------------------------------------

/// Severity determines surfacing behavior in the console.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    /// Surfaced in the dashboard feed for the next handover.
    Warning,
    /// Surfaced immediately and escalated to the duty roster.
    Critical,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

// ---------------------------------------------------------------------------
// Alert
// ---------------------------------------------------------------------------

/// A correlation finding. Immutable and derived: recomputed fresh on every
/// evaluation, never stored or acknowledged inside the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    /// Derived from (rule id, subject id) so re-evaluation with the same
    /// inputs produces identically-keyed alerts.
    pub id: Uuid,
    /// Resident id, or [`FACILITY_SUBJECT_ID`] for facility-wide findings.
    pub subject_id: String,
    pub subject_name: String,
    pub category: AlertCategory,
    pub severity: AlertSeverity,
    pub title: String,
    /// Operator-facing description embedding the computed evidence counts.
    pub description: String,
    pub detected_at: NaiveDateTime,
    /// Streams that contributed evidence.
    pub sources: Vec<StreamName>,
}

impl Alert {
    pub fn is_facility_wide(&self) -> bool {
        self.subject_id == FACILITY_SUBJECT_ID
    }
}

/// What a rule returns when it fires; the engine fills in identity,
/// category, severity, and sources from the rule definition.
#[derive(Debug, Clone)]
pub struct AlertDraft {
    pub title: String,
    pub description: String,
}

// ---------------------------------------------------------------------------
// Rule evaluation errors
// ---------------------------------------------------------------------------

/// Failure inside a single rule's evaluate function. Isolated per
/// (subject, rule) pair; never aborts the rest of the evaluation.
#[derive(Error, Debug)]
pub enum RuleError {
    #[error("evidence inconsistency: {0}")]
    Evidence(String),
}

/// Diagnostic for one isolated (subject, rule) failure. Advisory only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleFailure {
    pub rule_id: String,
    pub subject_id: String,
    pub reason: String,
}

// ---------------------------------------------------------------------------
// EvaluationReport & AlertCounts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub alerts: Vec<Alert>,
    pub counts: AlertCounts,
    pub failures: Vec<RuleFailure>,
    pub processing_time_ms: u64,
}

impl EvaluationReport {
    /// Alerts of one category, for console filter tabs.
    pub fn by_category(&self, category: AlertCategory) -> Vec<&Alert> {
        self.alerts.iter().filter(|a| a.category == category).collect()
    }

    /// Alerts requiring immediate surfacing.
    pub fn critical(&self) -> Vec<&Alert> {
        self.alerts
            .iter()
            .filter(|a| a.severity == AlertSeverity::Critical)
            .collect()
    }

    /// Alerts about one subject (resident id or the facility sentinel).
    pub fn for_subject(&self, subject_id: &str) -> Vec<&Alert> {
        self.alerts.iter().filter(|a| a.subject_id == subject_id).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AlertCounts {
    pub clinical: usize,
    pub empowerment: usize,
    pub quality: usize,
}

impl AlertCounts {
    pub fn tally(alerts: &[Alert]) -> Self {
        let mut counts = Self::default();
        for alert in alerts {
            match alert.category {
                AlertCategory::Clinical => counts.clinical += 1,
                AlertCategory::Empowerment => counts.empowerment += 1,
                AlertCategory::Quality => counts.quality += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.clinical + self.empowerment + self.quality
    }
}

// ---------------------------------------------------------------------------
// CorrelationError
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum CorrelationError {
    /// The only fatal path: nothing to evaluate. A caller usage error,
    /// not a runtime condition to recover from.
    #[error("No residents supplied for evaluation")]
    NoResidents,
}

// ---------------------------------------------------------------------------
// FacilitySnapshot — pre-fetched data for one evaluation call
// ---------------------------------------------------------------------------

/// Pre-fetched stream snapshot for one evaluation call.
/// The caller fetches all collections from the backend, builds this
/// snapshot, and passes it in. This keeps rule logic pure and testable,
/// and makes parallel evaluation across facilities safe by construction.
#[derive(Debug, Clone, Default)]
pub struct FacilitySnapshot {
    pub meals: Vec<MealRecord>,
    pub moods: Vec<MoodObservation>,
    pub dental: Vec<DentalRecord>,
    pub seizures: Vec<SeizureRecord>,
    pub visits: Vec<VisitRecord>,
    pub staff_wellbeing: Vec<StaffWellbeingRecord>,
    pub incidents: Vec<IncidentReport>,
}

impl FacilitySnapshot {
    /// Per-stream counts of records the engine will silently exclude
    /// (missing entity key or unparseable stamp). Advisory: the caller
    /// logs these as data-quality issues; the engine only skips them.
    pub fn data_quality(&self) -> DataQualityReport {
        fn excluded<R>(
            records: &[R],
            key_of: impl Fn(&R) -> Option<&str>,
            stamp_of: impl Fn(&R) -> Option<&str>,
        ) -> usize {
            records
                .iter()
                .filter(|r| {
                    let unkeyed = key_of(r).map_or(true, |k| k.is_empty());
                    let unstamped = stamp_of(r).map_or(true, |s| parse_stamp(s).is_none());
                    unkeyed || unstamped
                })
                .count()
        }

        DataQualityReport {
            meals: excluded(&self.meals, |m| m.resident_id.as_deref(), |m| m.served_at.as_deref()),
            moods: excluded(
                &self.moods,
                |m| m.resident_id.as_deref(),
                |m| m.observed_at.as_deref(),
            ),
            dental: excluded(
                &self.dental,
                |d| d.resident_id.as_deref(),
                |d| d.examined_on.as_deref(),
            ),
            seizures: excluded(
                &self.seizures,
                |s| s.resident_id.as_deref(),
                |s| s.occurred_on.as_deref(),
            ),
            visits: excluded(
                &self.visits,
                |v| v.resident_id.as_deref(),
                |v| v.visited_on.as_deref(),
            ),
            staff_wellbeing: excluded(
                &self.staff_wellbeing,
                |s| s.staff_id.as_deref(),
                |s| s.assessed_on.as_deref(),
            ),
            incidents: excluded(&self.incidents, |_| Some("facility"), |i| i.filed_on.as_deref()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DataQualityReport {
    pub meals: usize,
    pub moods: usize,
    pub dental: usize,
    pub seizures: usize,
    pub visits: usize,
    pub staff_wellbeing: usize,
    pub incidents: usize,
}

impl DataQualityReport {
    pub fn total(&self) -> usize {
        self.meals
            + self.moods
            + self.dental
            + self.seizures
            + self.visits
            + self.staff_wellbeing
            + self.incidents
    }
}
