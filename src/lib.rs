//! Recurring billing plan management against Stripe.
//!
//! [`PlanClient`] validates requests, maps them onto provider parameters,
//! retries transient failures with exponential backoff and translates
//! provider objects and errors into the types under [`domain::model`].

pub mod config;
pub mod domain;
pub mod error;
pub mod http;
pub mod plan;
pub mod provider;
pub mod retry;

pub use config::ClientConfig;
pub use error::PlanError;
pub use plan::{PlanClient, PlanIterator};
pub use retry::BackoffPolicy;
