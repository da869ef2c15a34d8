use std::time::Instant;

use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::models::enums::{AlertCategory, StreamName};
use crate::models::Resident;

use super::index::EntityIndex;
use super::rules::{
    builtin_facility_rules, builtin_resident_rules, FacilityContext, FacilityRule,
    ResidentContext, ResidentRule,
};
use super::types::{
    Alert, AlertCounts, AlertDraft, AlertSeverity, CorrelationError, EvaluationReport,
    FacilitySnapshot, RuleFailure, FACILITY_SUBJECT_ID, FACILITY_SUBJECT_NAME,
};

/// Namespace for UUIDv5 alert ids. Fixed so that (rule, subject) maps to
/// the same id across processes and releases.
const ALERT_NAMESPACE: Uuid = Uuid::from_u128(0x6f0a_1c2e_9b4d_4e8f_a3b5_7c1d_2e3f_4a5b);

/// Derive the stable id for an alert. Idempotent re-evaluation depends on
/// this: the same rule firing for the same subject always yields the same
/// id, so callers can diff alert sets across runs.
pub fn alert_id(rule_id: &str, subject_id: &str) -> Uuid {
    Uuid::new_v5(&ALERT_NAMESPACE, format!("{}:{}", rule_id, subject_id).as_bytes())
}

/// Orchestrates index building and rule evaluation over one snapshot.
/// Stateless between calls: every evaluation receives fresh inputs and
/// returns a fresh report, so parallel evaluation across facilities (or
/// across "now" values for backtesting) is safe by construction.
pub struct CorrelationEngine {
    resident_rules: Vec<ResidentRule>,
    facility_rules: Vec<FacilityRule>,
}

impl CorrelationEngine {
    /// Engine with the built-in rule catalog.
    pub fn new() -> Self {
        Self {
            resident_rules: builtin_resident_rules(),
            facility_rules: builtin_facility_rules(),
        }
    }

    /// Engine with a custom catalog. Used by tests and by callers that
    /// trial rules before promoting them into the built-in set.
    pub fn with_rules(
        resident_rules: Vec<ResidentRule>,
        facility_rules: Vec<FacilityRule>,
    ) -> Self {
        Self {
            resident_rules,
            facility_rules,
        }
    }

    /// Evaluate every rule against every resident, then the facility-wide
    /// rules once. Pure over the supplied snapshot and `now`: no I/O, no
    /// ambient clock, identical inputs give an identical alert set.
    ///
    /// A failing (resident, rule) pair is isolated into `failures` and
    /// never aborts the rest of the run. The only error is an empty
    /// resident collection, a caller usage error.
    pub fn evaluate(
        &self,
        residents: &[Resident],
        snapshot: &FacilitySnapshot,
        now: NaiveDateTime,
    ) -> Result<EvaluationReport, CorrelationError> {
        if residents.is_empty() {
            return Err(CorrelationError::NoResidents);
        }

        let start = Instant::now();

        // One index per resident-keyed stream, rebuilt per call.
        let meals = EntityIndex::from_records(&snapshot.meals, |m| m.resident_id.as_deref());
        let moods = EntityIndex::from_records(&snapshot.moods, |m| m.resident_id.as_deref());
        let dental = EntityIndex::from_records(&snapshot.dental, |d| d.resident_id.as_deref());
        let seizures =
            EntityIndex::from_records(&snapshot.seizures, |s| s.resident_id.as_deref());
        let visits = EntityIndex::from_records(&snapshot.visits, |v| v.resident_id.as_deref());

        let mut alerts: Vec<Alert> = Vec::new();
        let mut failures: Vec<RuleFailure> = Vec::new();

        for resident in residents {
            let ctx = ResidentContext::new(
                resident,
                now,
                meals.records_for(&resident.id),
                moods.records_for(&resident.id),
                dental.records_for(&resident.id),
                seizures.records_for(&resident.id),
                visits.records_for(&resident.id),
            );

            for rule in &self.resident_rules {
                match (rule.evaluate)(&ctx) {
                    Ok(Some(draft)) => alerts.push(build_alert(
                        rule.id,
                        rule.category,
                        rule.severity,
                        rule.sources,
                        &resident.id,
                        &resident.display_name,
                        draft,
                        now,
                    )),
                    Ok(None) => {}
                    Err(err) => {
                        tracing::warn!(
                            rule = rule.id,
                            subject = %resident.id,
                            error = %err,
                            "Rule evaluation failed; continuing"
                        );
                        failures.push(RuleFailure {
                            rule_id: rule.id.to_string(),
                            subject_id: resident.id.clone(),
                            reason: err.to_string(),
                        });
                    }
                }
            }
        }

        let facility_ctx =
            FacilityContext::new(now, &snapshot.staff_wellbeing, &snapshot.incidents);
        for rule in &self.facility_rules {
            match (rule.evaluate)(&facility_ctx) {
                Ok(Some(draft)) => alerts.push(build_alert(
                    rule.id,
                    rule.category,
                    rule.severity,
                    rule.sources,
                    FACILITY_SUBJECT_ID,
                    FACILITY_SUBJECT_NAME,
                    draft,
                    now,
                )),
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(
                        rule = rule.id,
                        error = %err,
                        "Facility rule evaluation failed; continuing"
                    );
                    failures.push(RuleFailure {
                        rule_id: rule.id.to_string(),
                        subject_id: FACILITY_SUBJECT_ID.to_string(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        let counts = AlertCounts::tally(&alerts);
        let processing_time_ms = start.elapsed().as_millis() as u64;

        tracing::info!(
            residents = residents.len(),
            total = counts.total(),
            failures = failures.len(),
            processing_ms = processing_time_ms,
            "Correlation evaluation complete"
        );

        Ok(EvaluationReport {
            alerts,
            counts,
            failures,
            processing_time_ms,
        })
    }
}

impl Default for CorrelationEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(clippy::too_many_arguments)]
fn build_alert(
    rule_id: &str,
    category: AlertCategory,
    severity: AlertSeverity,
    sources: &[StreamName],
    subject_id: &str,
    subject_name: &str,
    draft: AlertDraft,
    now: NaiveDateTime,
) -> Alert {
    Alert {
        id: alert_id(rule_id, subject_id),
        subject_id: subject_id.to_string(),
        subject_name: subject_name.to_string(),
        category,
        severity,
        title: draft.title,
        description: draft.description,
        detected_at: now,
        sources: sources.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::enums::*;
    use crate::models::*;

    fn resident(id: &str, guardian: GuardianRelation) -> Resident {
        Resident {
            id: id.into(),
            display_name: format!("Resident {}", id),
            room: Some("4".into()),
            guardian,
            admitted_on: Some("2024-06-01".into()),
        }
    }

    fn meal(resident_id: Option<&str>, status: MealStatus, served_at: &str) -> MealRecord {
        MealRecord {
            id: format!("meal-{}", served_at),
            resident_id: resident_id.map(|s| s.into()),
            status,
            served_at: Some(served_at.into()),
        }
    }

    fn mood(resident_id: &str, stress: StressBand, valence: Valence, observed_at: &str) -> MoodObservation {
        MoodObservation {
            id: format!("mood-{}", observed_at),
            resident_id: Some(resident_id.into()),
            stress,
            valence,
            observed_at: Some(observed_at.into()),
        }
    }

    fn dental(resident_id: &str, index: Option<i32>, examined_on: &str) -> DentalRecord {
        DentalRecord {
            id: format!("dental-{}", examined_on),
            resident_id: Some(resident_id.into()),
            oral_health_index: index,
            examined_on: Some(examined_on.into()),
        }
    }

    fn staff(risk_band: RiskBand, assessed_on: &str) -> StaffWellbeingRecord {
        StaffWellbeingRecord {
            id: format!("staff-{}-{:?}", assessed_on, risk_band),
            staff_id: Some("s-1".into()),
            risk_band,
            assessed_on: Some(assessed_on.into()),
        }
    }

    fn incident(resolved: bool, filed_on: &str) -> IncidentReport {
        IncidentReport {
            id: format!("incident-{}", filed_on),
            resident_id: None,
            resolved,
            filed_on: Some(filed_on.into()),
        }
    }

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(14, 0, 0).unwrap()
    }

    /// Snapshot where resident "r-1" satisfies the silent-distress rule.
    fn distress_snapshot() -> FacilitySnapshot {
        FacilitySnapshot {
            meals: vec![
                meal(Some("r-1"), MealStatus::Refused, "2026-03-08T08:00:00Z"),
                meal(Some("r-1"), MealStatus::Refused, "2026-03-09T12:00:00Z"),
            ],
            moods: vec![mood("r-1", StressBand::Critical, Valence::Neutral, "2026-03-09T10:00:00Z")],
            dental: vec![dental("r-1", Some(3), "2026-02-20")],
            ..Default::default()
        }
    }

    /// An empty resident collection is the caller usage error, not a
    /// recoverable runtime condition.
    #[test]
    fn empty_resident_collection_is_usage_error() {
        let engine = CorrelationEngine::new();
        let result = engine.evaluate(&[], &FacilitySnapshot::default(), at(2026, 3, 10));
        assert!(matches!(result, Err(CorrelationError::NoResidents)));
    }

    /// Fixed inputs and fixed `now` give an identical alert set, field for
    /// field.
    #[test]
    fn evaluation_is_deterministic() {
        let engine = CorrelationEngine::new();
        let residents = vec![resident("r-1", GuardianRelation::Family)];
        let snapshot = distress_snapshot();
        let now = at(2026, 3, 10);

        let first = engine.evaluate(&residents, &snapshot, now).unwrap();
        let second = engine.evaluate(&residents, &snapshot, now).unwrap();

        assert_eq!(first.alerts.len(), second.alerts.len());
        assert_eq!(
            serde_json::to_string(&first.alerts).unwrap(),
            serde_json::to_string(&second.alerts).unwrap(),
        );
    }

    /// Unrelated stream noise between runs does not change an alert's id.
    #[test]
    fn alert_identity_is_idempotent() {
        let engine = CorrelationEngine::new();
        let residents = vec![
            resident("r-1", GuardianRelation::Family),
            resident("r-2", GuardianRelation::Family),
        ];
        let now = at(2026, 3, 10);

        let snapshot = distress_snapshot();
        let first = engine.evaluate(&residents, &snapshot, now).unwrap();

        let mut noisy = snapshot.clone();
        noisy
            .meals
            .push(meal(Some("r-2"), MealStatus::Completed, "2026-03-09T18:00:00Z"));
        let second = engine.evaluate(&residents, &noisy, now).unwrap();

        let id_first = first.for_subject("r-1")[0].id;
        let id_second = second.for_subject("r-1")[0].id;
        assert_eq!(id_first, id_second);
        assert_eq!(id_first, alert_id("silent_distress", "r-1"));
    }

    /// Silent distress fires as exactly one clinical/critical alert, and
    /// disappears when the dental evidence is removed.
    #[test]
    fn silent_distress_end_to_end() {
        let engine = CorrelationEngine::new();
        let residents = vec![resident("r-1", GuardianRelation::Family)];
        let now = at(2026, 3, 10);

        let report = engine.evaluate(&residents, &distress_snapshot(), now).unwrap();
        let for_r1 = report.for_subject("r-1");
        assert_eq!(for_r1.len(), 1, "expected exactly one alert for r-1");
        assert_eq!(for_r1[0].category, AlertCategory::Clinical);
        assert_eq!(for_r1[0].severity, AlertSeverity::Critical);
        assert!(for_r1[0].sources.contains(&StreamName::Dental));

        let mut without_dental = distress_snapshot();
        without_dental.dental.clear();
        let report = engine.evaluate(&residents, &without_dental, now).unwrap();
        assert!(report.for_subject("r-1").is_empty());
    }

    /// Disengagement surfaces as an empowerment warning: visits only
    /// outside the 30-day window plus repeated negative mood.
    #[test]
    fn disengagement_is_empowerment_warning() {
        let engine = CorrelationEngine::new();
        let residents = vec![resident("r-1", GuardianRelation::Family)];
        let now = at(2026, 3, 10);

        let snapshot = FacilitySnapshot {
            visits: vec![VisitRecord {
                id: "visit-1".into(),
                resident_id: Some("r-1".into()),
                visitor_name: Some("Sam".into()),
                visited_on: Some("2026-02-03".into()),
            }],
            moods: vec![
                mood("r-1", StressBand::Baseline, Valence::Negative, "2026-01-15T09:00:00Z"),
                mood("r-1", StressBand::Baseline, Valence::Negative, "2026-02-20T09:00:00Z"),
                mood("r-1", StressBand::Baseline, Valence::Negative, "2026-03-01T09:00:00Z"),
            ],
            ..Default::default()
        };

        let report = engine.evaluate(&residents, &snapshot, now).unwrap();
        let for_r1 = report.for_subject("r-1");
        assert_eq!(for_r1.len(), 1);
        assert_eq!(for_r1[0].category, AlertCategory::Empowerment);
        assert_eq!(for_r1[0].severity, AlertSeverity::Warning);
        assert_eq!(report.counts.empowerment, 1);
    }

    /// Facility strain: 1 strained staff record -> silent; 2 -> exactly
    /// one facility-wide alert; 3 -> still one.
    #[test]
    fn facility_strain_threshold_monotonicity() {
        let engine = CorrelationEngine::new();
        let residents = vec![resident("r-1", GuardianRelation::Family)];
        let now = at(2026, 3, 10);

        let mut snapshot = FacilitySnapshot {
            staff_wellbeing: vec![staff(RiskBand::Red, "2026-03-05")],
            incidents: vec![incident(false, "2026-03-01")],
            ..Default::default()
        };
        let report = engine.evaluate(&residents, &snapshot, now).unwrap();
        assert!(report.for_subject(FACILITY_SUBJECT_ID).is_empty());

        snapshot.staff_wellbeing.push(staff(RiskBand::Orange, "2026-03-06"));
        let report = engine.evaluate(&residents, &snapshot, now).unwrap();
        let facility = report.for_subject(FACILITY_SUBJECT_ID);
        assert_eq!(facility.len(), 1);
        assert_eq!(facility[0].category, AlertCategory::Quality);
        assert_eq!(facility[0].subject_name, FACILITY_SUBJECT_NAME);

        snapshot.staff_wellbeing.push(staff(RiskBand::Red, "2026-03-07"));
        let report = engine.evaluate(&residents, &snapshot, now).unwrap();
        assert_eq!(report.for_subject(FACILITY_SUBJECT_ID).len(), 1);
        assert_eq!(report.counts.quality, 1);
    }

    /// A record with no entity id and a record with an unparseable date
    /// neither crash the engine nor change other residents' alerts.
    #[test]
    fn malformed_records_do_not_perturb_valid_residents() {
        let engine = CorrelationEngine::new();
        let residents = vec![resident("r-1", GuardianRelation::Family)];
        let now = at(2026, 3, 10);

        let clean = engine.evaluate(&residents, &distress_snapshot(), now).unwrap();

        let mut dirty = distress_snapshot();
        dirty.meals.push(meal(None, MealStatus::Refused, "2026-03-09T08:00:00Z"));
        dirty.moods.push(MoodObservation {
            id: "mood-bad".into(),
            resident_id: Some("r-1".into()),
            stress: StressBand::Critical,
            valence: Valence::Negative,
            observed_at: Some("not a date".into()),
        });
        let report = engine.evaluate(&residents, &dirty, now).unwrap();

        assert_eq!(report.alerts.len(), clean.alerts.len());
        assert_eq!(
            serde_json::to_string(&report.alerts).unwrap(),
            serde_json::to_string(&clean.alerts).unwrap(),
        );
    }

    /// One failing rule is isolated into the diagnostics; the rest of the
    /// catalog still runs.
    #[test]
    fn rule_failure_is_isolated() {
        use crate::correlation::rules::{ResidentRule, ResidentContext};
        use crate::correlation::types::RuleError;

        fn broken(_ctx: &ResidentContext<'_>) -> Result<Option<AlertDraft>, RuleError> {
            Err(RuleError::Evidence("synthetic failure".into()))
        }

        let mut rules = builtin_resident_rules();
        rules.insert(
            0,
            ResidentRule {
                id: "broken_rule",
                category: AlertCategory::Clinical,
                severity: AlertSeverity::Warning,
                sources: &[],
                evaluate: broken,
            },
        );
        let engine = CorrelationEngine::with_rules(rules, builtin_facility_rules());

        let residents = vec![resident("r-1", GuardianRelation::Family)];
        let report = engine
            .evaluate(&residents, &distress_snapshot(), at(2026, 3, 10))
            .unwrap();

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].rule_id, "broken_rule");
        assert_eq!(report.failures[0].subject_id, "r-1");
        // The healthy rules still produced their alert.
        assert_eq!(report.for_subject("r-1").len(), 1);
    }

    #[test]
    fn alert_id_is_stable_across_calls() {
        let a = alert_id("silent_distress", "r-1");
        let b = alert_id("silent_distress", "r-1");
        assert_eq!(a, b);
        assert_ne!(a, alert_id("silent_distress", "r-2"));
        assert_ne!(a, alert_id("disengagement", "r-1"));
    }

    #[test]
    fn counts_and_processing_time_are_reported() {
        let engine = CorrelationEngine::new();
        let residents = vec![resident("r-1", GuardianRelation::Family)];
        let report = engine
            .evaluate(&residents, &distress_snapshot(), at(2026, 3, 10))
            .unwrap();

        assert_eq!(report.counts.clinical, 1);
        assert_eq!(report.counts.total(), report.alerts.len());
        assert!(report.processing_time_ms < 1000);
    }
}
