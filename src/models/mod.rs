pub mod dental;
pub mod enums;
pub mod incident;
pub mod meal;
pub mod mood;
pub mod resident;
pub mod seizure;
pub mod staff;
pub mod visit;

pub use dental::DentalRecord;
pub use incident::IncidentReport;
pub use meal::MealRecord;
pub use mood::MoodObservation;
pub use resident::Resident;
pub use seizure::SeizureRecord;
pub use staff::StaffWellbeingRecord;
pub use visit::VisitRecord;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid value '{value}' for {field}")]
    InvalidEnum { field: String, value: String },
}
