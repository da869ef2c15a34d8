use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::enums::AlertCategory;

use super::types::{Alert, AlertSeverity};

/// Escalation handler for CRITICAL alerts.
pub struct EscalationProtocol;

impl EscalationProtocol {
    /// Map critical alerts to duty-roster actions. Pure and derived, like
    /// the alerts themselves: recomputed per evaluation, never stored.
    pub fn process_critical_alerts(alerts: &[Alert]) -> Vec<EscalationAction> {
        alerts
            .iter()
            .filter(|a| a.severity == AlertSeverity::Critical)
            .map(|alert| {
                let tier = match alert.category {
                    AlertCategory::Quality => EscalationTier::Management,
                    AlertCategory::Clinical | AlertCategory::Empowerment => {
                        EscalationTier::NurseLead
                    }
                };
                EscalationAction {
                    alert_id: alert.id,
                    tier,
                    banner: format!("{}: {}", alert.subject_name, alert.title),
                    handover_priority: true,
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscalationAction {
    pub alert_id: Uuid,
    pub tier: EscalationTier,
    /// Banner shown on the shift dashboard.
    pub banner: String,
    /// Whether to pin as a priority item in the next shift handover.
    pub handover_priority: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EscalationTier {
    NurseLead,
    Management,
}
