//! Plans and the unified responses returned for every plan operation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::{Currency, Interval};

/// A recurring billing plan as stored by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Plan {
    pub id: String,
    /// Price in the currency's minor unit (e.g. cents).
    pub amount: i64,
    pub currency: Currency,
    pub interval: Interval,
    pub interval_count: u64,
    pub metadata: HashMap<String, String>,
    pub livemode: bool,
    /// Creation time as unix seconds.
    pub created: i64,
    pub name: String,
    pub statement_descriptor: String,
    pub trial_period_days: u64,
}

/// Acknowledgement of a deleted plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DeletedPlan {
    pub id: String,
    pub deleted: bool,
}

/// Category of a provider-side rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    #[default]
    Unspecified,
    Api,
    ApiConnection,
    Authentication,
    Card,
    InvalidRequest,
    Permission,
    RateLimit,
}

/// Card-specific reason attached to card errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CardErrorCode {
    #[default]
    Unspecified,
    IncorrectNumber,
    InvalidNumber,
    InvalidExpirationMonth,
    InvalidExpirationYear,
    InvalidCvc,
    Expired,
    IncorrectCvc,
    IncorrectZip,
    Declined,
    Missing,
    ProcessingError,
    RateLimited,
}

/// A business error reported by the provider, in domain terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProviderError {
    pub error_type: ErrorType,
    pub message: String,
    pub http_status_code: u16,
    pub code: CardErrorCode,
    pub charge_id: String,
    pub param: String,
    pub request_id: String,
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} error", self.error_type)?;
        if self.http_status_code != 0 {
            write!(f, " (HTTP {})", self.http_status_code)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        Ok(())
    }
}

/// Outcome of a create, update or get call.
///
/// Business rejections from the provider are carried in `Error`; they are a
/// normal result of the call, not a failure of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanResponse {
    Success(Plan),
    Error(ProviderError),
}

impl PlanResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, PlanResponse::Success(_))
    }

    pub fn plan(&self) -> Option<&Plan> {
        match self {
            PlanResponse::Success(plan) => Some(plan),
            PlanResponse::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ProviderError> {
        match self {
            PlanResponse::Success(_) => None,
            PlanResponse::Error(err) => Some(err),
        }
    }
}

/// Outcome of a delete call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletePlanResponse {
    Success(DeletedPlan),
    Error(ProviderError),
}

impl DeletePlanResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, DeletePlanResponse::Success(_))
    }

    pub fn error(&self) -> Option<&ProviderError> {
        match self {
            DeletePlanResponse::Success(_) => None,
            DeletePlanResponse::Error(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_response_accessors() {
        let ok = PlanResponse::Success(Plan {
            id: "gold".into(),
            ..Default::default()
        });
        assert!(ok.is_success());
        assert_eq!(ok.plan().unwrap().id, "gold");
        assert!(ok.error().is_none());

        let err = PlanResponse::Error(ProviderError {
            error_type: ErrorType::Card,
            code: CardErrorCode::Declined,
            ..Default::default()
        });
        assert!(!err.is_success());
        assert!(err.plan().is_none());
        assert_eq!(err.error().unwrap().code, CardErrorCode::Declined);
    }

    #[test]
    fn test_plan_response_serializes_tagged() {
        let resp = PlanResponse::Error(ProviderError {
            error_type: ErrorType::InvalidRequest,
            message: "No such plan: gold".into(),
            http_status_code: 404,
            ..Default::default()
        });
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["error"]["error_type"], "invalid_request");
        assert_eq!(json["error"]["http_status_code"], 404);
        assert!(json.get("success").is_none());
    }

    #[test]
    fn test_provider_error_display() {
        let err = ProviderError {
            error_type: ErrorType::RateLimit,
            message: "Too many requests".into(),
            http_status_code: 429,
            ..Default::default()
        };
        assert_eq!(err.to_string(), "RateLimit error (HTTP 429): Too many requests");

        let bare = ProviderError::default();
        assert_eq!(bare.to_string(), "Unspecified error");
    }
}
