//! HTTP client module with response classification.

mod classify;
mod client;

pub use classify::{REQUEST_ID_HEADER, classify_error_response, request_id};
pub use client::HttpClient;
