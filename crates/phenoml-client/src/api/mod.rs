//! API endpoint implementations.

mod auth;
mod cohort;

pub use auth::AuthApi;
pub use cohort::CohortApi;
