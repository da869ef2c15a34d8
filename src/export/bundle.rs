use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::correlation::types::{Alert, AlertSeverity};
use crate::models::enums::{AlertCategory, GuardianRelation, StreamName};
use crate::models::Resident;

/// Namespace for UUIDv5 bundle ids.
const BUNDLE_NAMESPACE: Uuid = Uuid::from_u128(0x2d91_73c4_5e0b_4f6a_8c27_d1e9_0b3a_6f58);

// ---------------------------------------------------------------------------
// Bundle model
// ---------------------------------------------------------------------------

/// One self-contained clinical bundle: a subject plus their current
/// findings. Vendor-neutral handoff format for external health-record
/// systems; no external references are needed to interpret it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CareBundle {
    pub bundle_id: Uuid,
    pub generated_at: NaiveDateTime,
    pub subject: SubjectRecord,
    pub findings: Vec<Finding>,
}

/// Subject identity and demographic fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectRecord {
    pub id: String,
    pub name: String,
    pub room: Option<String>,
    pub guardian: GuardianRelation,
}

/// One finding, mapped from one alert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub code: FindingCode,
    pub severity: FindingSeverity,
    /// The alert description, carried as free-text annotation.
    pub note: String,
    pub recorded_at: NaiveDateTime,
    /// Streams that contributed evidence.
    pub evidence: Vec<StreamName>,
}

/// Coded concept for a finding: the alert category as the coding system
/// axis, the alert title as display text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindingCode {
    pub category: AlertCategory,
    pub display: String,
}

/// Two-level coded severity scale used by the receiving systems.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FindingSeverity {
    Moderate,
    Severe,
}

impl From<AlertSeverity> for FindingSeverity {
    fn from(severity: AlertSeverity) -> Self {
        match severity {
            AlertSeverity::Warning => Self::Moderate,
            AlertSeverity::Critical => Self::Severe,
        }
    }
}

impl FindingSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Moderate => "moderate",
            Self::Severe => "severe",
        }
    }
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Bundle serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Export operations
// ---------------------------------------------------------------------------

/// Build one bundle for one resident from their current alerts. Pure
/// mapping: every alert becomes exactly one finding, none are dropped or
/// duplicated. Writing the result anywhere is the caller's concern.
pub fn export_bundle(
    resident: &Resident,
    alerts: &[&Alert],
    generated_at: NaiveDateTime,
) -> CareBundle {
    let findings = alerts
        .iter()
        .map(|alert| Finding {
            code: FindingCode {
                category: alert.category,
                display: alert.title.clone(),
            },
            severity: alert.severity.into(),
            note: alert.description.clone(),
            recorded_at: alert.detected_at,
            evidence: alert.sources.clone(),
        })
        .collect();

    CareBundle {
        bundle_id: Uuid::new_v5(
            &BUNDLE_NAMESPACE,
            format!("{}:{}", resident.id, generated_at).as_bytes(),
        ),
        generated_at,
        subject: SubjectRecord {
            id: resident.id.clone(),
            name: resident.display_name.clone(),
            room: resident.room.clone(),
            guardian: resident.guardian,
        },
        findings,
    }
}

/// Build one bundle per subject with at least one alert. Facility-wide
/// alerts have no subject record and are never exported; alerts whose
/// subject is missing from the resident collection are skipped with a
/// warning and the export continues.
pub fn export_all(
    residents: &[Resident],
    alerts: &[Alert],
    generated_at: NaiveDateTime,
) -> Vec<CareBundle> {
    let by_id: HashMap<&str, &Resident> =
        residents.iter().map(|r| (r.id.as_str(), r)).collect();

    // Group by subject, preserving first-seen subject order for a
    // deterministic bundle sequence.
    let mut subject_order: Vec<&str> = Vec::new();
    let mut grouped: HashMap<&str, Vec<&Alert>> = HashMap::new();
    for alert in alerts {
        if alert.is_facility_wide() {
            continue;
        }
        let subject = alert.subject_id.as_str();
        if !grouped.contains_key(subject) {
            subject_order.push(subject);
        }
        grouped.entry(subject).or_default().push(alert);
    }

    let mut bundles = Vec::new();
    for subject in subject_order {
        match by_id.get(subject) {
            Some(resident) => {
                bundles.push(export_bundle(resident, &grouped[subject], generated_at));
            }
            None => {
                tracing::warn!(
                    subject = subject,
                    "Alert subject missing from resident collection; bundle skipped"
                );
            }
        }
    }
    bundles
}

/// Serialize bundles as a JSON array. The artifact name and destination
/// are caller concerns.
pub fn to_json(bundles: &[CareBundle]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(bundles)?)
}
