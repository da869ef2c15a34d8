/// Description template builder for correlation alerts.
/// Every description embeds the computed evidence, not just the rule name:
/// care staff need to see what fired, and tests assert on it.
pub struct MessageTemplates;

impl MessageTemplates {
    /// SILENT DISTRESS: refused meals + poor oral health + stress flags.
    pub fn silent_distress(
        refusals: usize,
        window_days: i64,
        oral_index: i32,
        stress_flags: usize,
    ) -> String {
        format!(
            "Refused {} meals in the last {} days, the latest scored dental exam \
             shows oral health index {}, and stress was flagged {} time(s) in the \
             same period. Together these can point to unreported pain. A clinical \
             review is advised.",
            refusals, window_days, oral_index, stress_flags,
        )
    }

    /// POST-ACUTE RISK: episode and critical stress on the same day.
    pub fn post_acute_risk(date: &str) -> String {
        format!(
            "A seizure episode and a critical stress reading were both recorded \
             today ({}). Close observation is advised for the rest of the day.",
            date,
        )
    }

    /// DISENGAGEMENT: no recent visits + repeated low mood.
    pub fn disengagement(window_days: i64, negative_moods: usize) -> String {
        format!(
            "No family or friend visit in the last {} days and {} low-mood \
             observations on record. Consider reaching out to the family circle \
             or planning additional one-to-one time.",
            window_days, negative_moods,
        )
    }

    /// FACILITY STRAIN: staff at risk + unresolved incident reports.
    pub fn facility_strain(
        strained_staff: usize,
        unresolved_incidents: usize,
        window_days: i64,
    ) -> String {
        format!(
            "{} staff wellbeing checks are in the red or orange band and {} \
             incident report(s) filed in the last {} days remain unresolved. \
             Management follow-up is advised.",
            strained_staff, unresolved_incidents, window_days,
        )
    }
}
