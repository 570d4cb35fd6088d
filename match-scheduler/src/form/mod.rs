pub mod submission;
pub mod export;

pub use submission::{validate_request, ScheduleRequest, ValidatedRequest, ValidationError};
pub use export::export_matches_to_csv;
