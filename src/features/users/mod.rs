//! Locally cached profiles, the active-profile pointer and onboarding.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/onboarding` | Whether the welcome flow was seen |
//! | POST | `/api/onboarding/complete` | Mark the welcome flow as seen |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::{ProfileCache, ProfileService};
