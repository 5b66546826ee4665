pub mod report_service;
pub mod report_store;
pub mod visibility;

pub use report_service::ReportService;
pub use report_store::ReportStore;
pub use visibility::{ViewFilter, ViewStats};
