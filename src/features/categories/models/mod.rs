mod category;

pub use category::{deadline_days, Category, SeverityLevel, MAX_SEVERITY, MIN_SEVERITY};
