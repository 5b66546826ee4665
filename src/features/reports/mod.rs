//! Problem reports: the entity, its store, role-based views and the HTTP
//! surface over them.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::{ReportService, ReportStore};
