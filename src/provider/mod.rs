//! Provider abstraction for plan storage.
//!
//! `PlanApi` is the surface the plan client consumes. It speaks the
//! provider's own vocabulary (string tokens, raw list pages) and reports every
//! failure as a `ProviderFailure`, which the retry loop uses to tell business
//! rejections from transient faults.

mod stripe;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

pub use stripe::StripePlanApi;

/// Provider response types.
pub mod api {
    use serde::{Deserialize, Serialize};
    use std::collections::HashMap;

    #[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
    pub struct Plan {
        pub id: String,
        #[serde(default)]
        pub amount: Option<i64>,
        #[serde(default)]
        pub currency: String,
        #[serde(default)]
        pub interval: String,
        #[serde(default)]
        pub interval_count: u64,
        #[serde(default)]
        pub livemode: bool,
        #[serde(default)]
        pub created: i64,
        #[serde(default)]
        pub metadata: Option<HashMap<String, String>>,
        #[serde(default)]
        pub name: Option<String>,
        #[serde(default)]
        pub statement_descriptor: Option<String>,
        #[serde(default)]
        pub trial_period_days: Option<u64>,
    }

    #[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
    pub struct DeletedPlan {
        pub id: String,
        #[serde(default)]
        pub deleted: bool,
    }

    /// Structured error object returned by the provider.
    #[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
    pub struct ApiError {
        #[serde(rename = "type", default)]
        pub error_type: String,
        #[serde(default)]
        pub message: Option<String>,
        #[serde(default)]
        pub code: Option<String>,
        #[serde(default)]
        pub param: Option<String>,
        #[serde(default)]
        pub charge: Option<String>,
        /// Filled from the HTTP response, not the body.
        #[serde(skip)]
        pub http_status: u16,
        #[serde(skip)]
        pub request_id: Option<String>,
    }

    #[derive(Deserialize, Debug)]
    pub struct ErrorEnvelope {
        pub error: ApiError,
    }

    /// One page of a list call. Items stay raw so that a malformed entry only
    /// affects its own slot.
    #[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
    pub struct ListPage {
        #[serde(default)]
        pub data: Vec<serde_json::Value>,
        #[serde(default)]
        pub has_more: bool,
    }
}

impl fmt::Display for api::ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error_type)?;
        if let Some(code) = &self.code {
            write!(f, " ({})", code)?;
        }
        if let Some(message) = &self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

/// How a provider call failed.
#[derive(Debug, Error)]
pub enum ProviderFailure {
    /// The provider answered with a structured rejection. Retrying will not help.
    #[error("provider rejected the request: {0}")]
    Api(api::ApiError),

    /// The provider could not be reached or answered with something unusable.
    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

/// Per-request options sent as headers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    /// Every header to send, including `Idempotency-Key` and `Stripe-Account`.
    pub headers: HeaderMap,
}

/// Parameters of a single plan call. Only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanParams {
    pub id: String,
    pub amount: Option<i64>,
    pub currency: Option<String>,
    pub interval: Option<String>,
    pub interval_count: Option<u64>,
    pub name: Option<String>,
    pub statement_descriptor: Option<String>,
    pub trial_period_days: Option<u64>,
    pub metadata: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RangeParams {
    pub gt: Option<i64>,
    pub gte: Option<i64>,
    pub lt: Option<i64>,
    pub lte: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanListParams {
    pub starting_after: Option<String>,
    pub ending_before: Option<String>,
    pub limit: u64,
    pub created: Option<RangeParams>,
}

/// Plan operations offered by a billing provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlanApi: Send + Sync {
    async fn create(
        &self,
        params: &PlanParams,
        options: &RequestOptions,
    ) -> Result<api::Plan, ProviderFailure>;

    async fn get(&self, id: &str, options: &RequestOptions) -> Result<api::Plan, ProviderFailure>;

    async fn update(
        &self,
        params: &PlanParams,
        options: &RequestOptions,
    ) -> Result<api::Plan, ProviderFailure>;

    async fn delete(
        &self,
        id: &str,
        options: &RequestOptions,
    ) -> Result<api::DeletedPlan, ProviderFailure>;

    /// Fetch one page of plans.
    async fn list(
        &self,
        params: &PlanListParams,
        options: &RequestOptions,
    ) -> Result<api::ListPage, ProviderFailure>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_deserialize() {
        let body = r#"{"error": {"type": "card_error", "code": "card_declined", "message": "Your card was declined.", "charge": "ch_1"}}"#;
        let envelope: api::ErrorEnvelope = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.error.error_type, "card_error");
        assert_eq!(envelope.error.code.as_deref(), Some("card_declined"));
        assert_eq!(envelope.error.charge.as_deref(), Some("ch_1"));
        assert_eq!(envelope.error.http_status, 0);
    }

    #[test]
    fn test_api_error_display() {
        let err = api::ApiError {
            error_type: "card_error".into(),
            code: Some("card_declined".into()),
            message: Some("Your card was declined.".into()),
            ..Default::default()
        };
        assert_eq!(err.to_string(), "card_error (card_declined): Your card was declined.");
        assert_eq!(
            ProviderFailure::Api(err).to_string(),
            "provider rejected the request: card_error (card_declined): Your card was declined."
        );
    }

    #[test]
    fn test_plan_tolerates_missing_fields() {
        let plan: api::Plan = serde_json::from_str(r#"{"id": "gold", "metadata": null}"#).unwrap();
        assert_eq!(plan.id, "gold");
        assert_eq!(plan.amount, None);
        assert_eq!(plan.metadata, None);
    }

    #[test]
    fn test_list_page_deserialize() {
        let page: api::ListPage = serde_json::from_str(
            r#"{"object": "list", "url": "/v1/plans", "has_more": true, "data": [{"id": "a"}, {"id": "b"}]}"#,
        )
        .unwrap();
        assert!(page.has_more);
        assert_eq!(page.data.len(), 2);
    }
}
