use serde::{Deserialize, Serialize};

use super::ModelError;

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ModelError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(GuardianRelation {
    None => "none",
    Family => "family",
    Institutional => "institutional",
});

str_enum!(MealStatus {
    Refused => "refused",
    Partial => "partial",
    Completed => "completed",
});

str_enum!(StressBand {
    Baseline => "baseline",
    Elevated => "elevated",
    Critical => "critical",
});

str_enum!(Valence {
    Positive => "positive",
    Neutral => "neutral",
    Negative => "negative",
});

str_enum!(SeizureRecordKind {
    Episode => "episode",
    Checkup => "checkup",
    MedicationReview => "medication_review",
});

str_enum!(RiskBand {
    Green => "green",
    Yellow => "yellow",
    Orange => "orange",
    Red => "red",
});

str_enum!(AlertCategory {
    Clinical => "clinical",
    Empowerment => "empowerment",
    Quality => "quality",
});

str_enum!(StreamName {
    Meals => "meals",
    Mood => "mood",
    Dental => "dental",
    Seizures => "seizures",
    Visits => "visits",
    StaffWellbeing => "staff_wellbeing",
    Incidents => "incidents",
});
