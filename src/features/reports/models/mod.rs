pub mod deadline;
pub mod report;

pub use deadline::{DeadlineStatus, UrgencyBand};
pub use report::{Coordinates, CustomFields, NewReport, Report, Reporter};
