use chrono::{Duration, NaiveDateTime};

use crate::models::enums::{
    AlertCategory, MealStatus, RiskBand, SeizureRecordKind, StreamName, StressBand, Valence,
};
use crate::models::{
    DentalRecord, IncidentReport, MealRecord, MoodObservation, Resident, SeizureRecord,
    StaffWellbeingRecord, VisitRecord,
};

use super::messages::MessageTemplates;
use super::types::{AlertDraft, AlertSeverity, RuleError};
use super::window;

/// Trailing window for short-term neglect signals.
const SHORT_WINDOW_DAYS: i64 = 7;
/// Trailing window for medium-term social and incident signals.
const SOCIAL_WINDOW_DAYS: i64 = 30;

const MEAL_REFUSAL_THRESHOLD: usize = 2;
const ORAL_HEALTH_CONCERN_INDEX: i32 = 2;
const NEGATIVE_MOOD_THRESHOLD: usize = 2;
const STRAINED_STAFF_THRESHOLD: usize = 2;

// ---------------------------------------------------------------------------
// Rule contexts
// ---------------------------------------------------------------------------

/// Everything a per-resident rule may read: the resident, that resident's
/// records per stream, and the evaluation instant. Rules must not reach
/// outside this context; that is what keeps them independently testable
/// and the engine deterministic for a fixed `now`.
pub struct ResidentContext<'a> {
    pub resident: &'a Resident,
    pub now: NaiveDateTime,
    meals: &'a [&'a MealRecord],
    moods: &'a [&'a MoodObservation],
    dental: &'a [&'a DentalRecord],
    seizures: &'a [&'a SeizureRecord],
    visits: &'a [&'a VisitRecord],
}

impl<'a> ResidentContext<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        resident: &'a Resident,
        now: NaiveDateTime,
        meals: &'a [&'a MealRecord],
        moods: &'a [&'a MoodObservation],
        dental: &'a [&'a DentalRecord],
        seizures: &'a [&'a SeizureRecord],
        visits: &'a [&'a VisitRecord],
    ) -> Self {
        Self {
            resident,
            now,
            meals,
            moods,
            dental,
            seizures,
            visits,
        }
    }

    pub fn meals(&self) -> &[&'a MealRecord] {
        self.meals
    }

    pub fn moods(&self) -> &[&'a MoodObservation] {
        self.moods
    }

    pub fn dental(&self) -> &[&'a DentalRecord] {
        self.dental
    }

    pub fn seizures(&self) -> &[&'a SeizureRecord] {
        self.seizures
    }

    pub fn visits(&self) -> &[&'a VisitRecord] {
        self.visits
    }
}

/// Aggregate context for facility-wide rules: whole-facility streams, no
/// single resident subject.
pub struct FacilityContext<'a> {
    pub now: NaiveDateTime,
    staff_wellbeing: &'a [StaffWellbeingRecord],
    incidents: &'a [IncidentReport],
}

impl<'a> FacilityContext<'a> {
    pub fn new(
        now: NaiveDateTime,
        staff_wellbeing: &'a [StaffWellbeingRecord],
        incidents: &'a [IncidentReport],
    ) -> Self {
        Self {
            now,
            staff_wellbeing,
            incidents,
        }
    }

    pub fn staff_wellbeing(&self) -> &[StaffWellbeingRecord] {
        self.staff_wellbeing
    }

    pub fn incidents(&self) -> &[IncidentReport] {
        self.incidents
    }
}

// ---------------------------------------------------------------------------
// Rule catalog representation
// ---------------------------------------------------------------------------

/// One declarative per-resident rule. The catalog is data, not control
/// flow: adding a rule never touches engine orchestration.
pub struct ResidentRule {
    pub id: &'static str,
    pub category: AlertCategory,
    pub severity: AlertSeverity,
    /// Streams this rule reads; carried onto emitted alerts as evidence.
    pub sources: &'static [StreamName],
    pub evaluate: fn(&ResidentContext<'_>) -> Result<Option<AlertDraft>, RuleError>,
}

/// One declarative facility-wide rule, evaluated once per run.
pub struct FacilityRule {
    pub id: &'static str,
    pub category: AlertCategory,
    pub severity: AlertSeverity,
    pub sources: &'static [StreamName],
    pub evaluate: fn(&FacilityContext<'_>) -> Result<Option<AlertDraft>, RuleError>,
}

pub fn builtin_resident_rules() -> Vec<ResidentRule> {
    vec![
        ResidentRule {
            id: "silent_distress",
            category: AlertCategory::Clinical,
            severity: AlertSeverity::Critical,
            sources: &[StreamName::Meals, StreamName::Dental, StreamName::Mood],
            evaluate: silent_distress,
        },
        ResidentRule {
            id: "post_acute_risk",
            category: AlertCategory::Clinical,
            severity: AlertSeverity::Critical,
            sources: &[StreamName::Seizures, StreamName::Mood],
            evaluate: post_acute_risk,
        },
        ResidentRule {
            id: "disengagement",
            category: AlertCategory::Empowerment,
            severity: AlertSeverity::Warning,
            sources: &[StreamName::Visits, StreamName::Mood],
            evaluate: disengagement,
        },
    ]
}

pub fn builtin_facility_rules() -> Vec<FacilityRule> {
    vec![FacilityRule {
        id: "facility_strain",
        category: AlertCategory::Quality,
        severity: AlertSeverity::Critical,
        sources: &[StreamName::StaffWellbeing, StreamName::Incidents],
        evaluate: facility_strain,
    }]
}

// ---------------------------------------------------------------------------
// SILENT DISTRESS — refused meals + poor oral health + stress flags
// ---------------------------------------------------------------------------

/// Repeated meal refusal, a concerning oral health index on the most recent
/// scored dental exam, and flagged stress in the same week. All three are
/// required.
fn silent_distress(ctx: &ResidentContext<'_>) -> Result<Option<AlertDraft>, RuleError> {
    let since = ctx.now - Duration::days(SHORT_WINDOW_DAYS);

    let refusals = window::count_within(
        ctx.meals(),
        |m| m.served_at.as_deref(),
        |m| m.status == MealStatus::Refused,
        since,
        ctx.now,
    );
    if refusals < MEAL_REFUSAL_THRESHOLD {
        return Ok(None);
    }

    // Most recent dental exam that actually carries a score; unscored exams
    // are not evidence either way.
    let scored: Vec<&DentalRecord> = ctx
        .dental()
        .iter()
        .copied()
        .filter(|d| d.oral_health_index.is_some())
        .collect();
    let latest = match window::latest_by_stamp(&scored, |d| d.examined_on.as_deref()) {
        Some(d) => d,
        None => return Ok(None),
    };
    let oral_index = latest
        .oral_health_index
        .ok_or_else(|| RuleError::Evidence("scored dental exam lost its index".into()))?;
    if oral_index < ORAL_HEALTH_CONCERN_INDEX {
        return Ok(None);
    }

    let stress_flags = window::count_within(
        ctx.moods(),
        |m| m.observed_at.as_deref(),
        |m| matches!(m.stress, StressBand::Elevated | StressBand::Critical),
        since,
        ctx.now,
    );
    if stress_flags == 0 {
        return Ok(None);
    }

    Ok(Some(AlertDraft {
        title: "Possible silent pain".into(),
        description: MessageTemplates::silent_distress(
            refusals,
            SHORT_WINDOW_DAYS,
            oral_index,
            stress_flags,
        ),
    }))
}

// ---------------------------------------------------------------------------
// POST-ACUTE RISK — episode and critical stress on the same day
// ---------------------------------------------------------------------------

/// A seizure episode today combined with a critical stress reading today.
/// Both must fall on exactly the evaluation date.
fn post_acute_risk(ctx: &ResidentContext<'_>) -> Result<Option<AlertDraft>, RuleError> {
    let today = ctx.now.date();

    let episode_today = window::exists_on(
        ctx.seizures(),
        |s| s.occurred_on.as_deref(),
        |s| s.kind == SeizureRecordKind::Episode,
        today,
    );
    if !episode_today {
        return Ok(None);
    }

    let critical_stress_today = window::exists_on(
        ctx.moods(),
        |m| m.observed_at.as_deref(),
        |m| m.stress == StressBand::Critical,
        today,
    );
    if !critical_stress_today {
        return Ok(None);
    }

    Ok(Some(AlertDraft {
        title: "Post-episode observation needed".into(),
        description: MessageTemplates::post_acute_risk(&today.to_string()),
    }))
}

// ---------------------------------------------------------------------------
// DISENGAGEMENT — no visits + repeated low mood
// ---------------------------------------------------------------------------

/// No family/friend visit in the social window plus repeated negative
/// mood. Residents under institutional guardianship are excluded; there
/// is no family circle to re-engage.
fn disengagement(ctx: &ResidentContext<'_>) -> Result<Option<AlertDraft>, RuleError> {
    if ctx.resident.has_institutional_guardian() {
        return Ok(None);
    }

    let since = ctx.now - Duration::days(SOCIAL_WINDOW_DAYS);
    let recent_visits = window::count_within(
        ctx.visits(),
        |v| v.visited_on.as_deref(),
        |_| true,
        since,
        ctx.now,
    );
    if recent_visits > 0 {
        return Ok(None);
    }

    // Valence is counted over the full record, not windowed.
    let negative_moods = ctx
        .moods()
        .iter()
        .filter(|m| m.valence == Valence::Negative)
        .count();
    if negative_moods < NEGATIVE_MOOD_THRESHOLD {
        return Ok(None);
    }

    Ok(Some(AlertDraft {
        title: "Social disengagement risk".into(),
        description: MessageTemplates::disengagement(SOCIAL_WINDOW_DAYS, negative_moods),
    }))
}

// ---------------------------------------------------------------------------
// FACILITY STRAIN — staff at risk + unresolved incident reports
// ---------------------------------------------------------------------------

/// Facility-wide: several staff wellbeing checks in the red/orange band
/// while recent incident reports sit unresolved. Fires at most once per
/// evaluation.
fn facility_strain(ctx: &FacilityContext<'_>) -> Result<Option<AlertDraft>, RuleError> {
    let strained_staff = ctx
        .staff_wellbeing()
        .iter()
        .filter(|s| matches!(s.risk_band, RiskBand::Red | RiskBand::Orange))
        .count();
    if strained_staff < STRAINED_STAFF_THRESHOLD {
        return Ok(None);
    }

    let since = ctx.now - Duration::days(SOCIAL_WINDOW_DAYS);
    let unresolved_incidents = ctx
        .incidents()
        .iter()
        .filter(|i| !i.resolved)
        .filter(|i| {
            i.filed_on
                .as_deref()
                .and_then(window::parse_stamp)
                .is_some_and(|s| s.on_or_after(since) && s.on_or_before(ctx.now))
        })
        .count();
    if unresolved_incidents == 0 {
        return Ok(None);
    }

    Ok(Some(AlertDraft {
        title: "Facility under strain".into(),
        description: MessageTemplates::facility_strain(
            strained_staff,
            unresolved_incidents,
            SOCIAL_WINDOW_DAYS,
        ),
    }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
