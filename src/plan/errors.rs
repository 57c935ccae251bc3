//! Translation of provider errors into `ProviderError`.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::domain::model::{CardErrorCode, ErrorType, ProviderError};
use crate::provider::ProviderFailure;
use crate::provider::api::ApiError;

static ERROR_TYPES: LazyLock<HashMap<&'static str, ErrorType>> = LazyLock::new(|| {
    HashMap::from([
        ("api_error", ErrorType::Api),
        ("api_connection_error", ErrorType::ApiConnection),
        ("authentication_error", ErrorType::Authentication),
        ("card_error", ErrorType::Card),
        ("invalid_request_error", ErrorType::InvalidRequest),
        ("permission_error", ErrorType::Permission),
        ("rate_limit_error", ErrorType::RateLimit),
    ])
});

static CARD_ERROR_CODES: LazyLock<HashMap<&'static str, CardErrorCode>> = LazyLock::new(|| {
    HashMap::from([
        ("incorrect_number", CardErrorCode::IncorrectNumber),
        ("invalid_number", CardErrorCode::InvalidNumber),
        ("invalid_expiry_month", CardErrorCode::InvalidExpirationMonth),
        ("invalid_expiry_year", CardErrorCode::InvalidExpirationYear),
        ("invalid_cvc", CardErrorCode::InvalidCvc),
        ("expired_card", CardErrorCode::Expired),
        ("incorrect_cvc", CardErrorCode::IncorrectCvc),
        ("incorrect_zip", CardErrorCode::IncorrectZip),
        ("card_declined", CardErrorCode::Declined),
        ("missing", CardErrorCode::Missing),
        ("processing_error", CardErrorCode::ProcessingError),
        ("rate_limit", CardErrorCode::RateLimited),
    ])
});

pub fn error_type_from_token(token: &str) -> ErrorType {
    ERROR_TYPES
        .get(token.to_ascii_lowercase().as_str())
        .copied()
        .unwrap_or_default()
}

pub fn card_code_from_token(token: &str) -> CardErrorCode {
    CARD_ERROR_CODES
        .get(token.to_ascii_lowercase().as_str())
        .copied()
        .unwrap_or_default()
}

/// Never fails: unknown types and codes become `Unspecified`.
pub fn api_error_to_provider_error(error: &ApiError) -> ProviderError {
    ProviderError {
        error_type: error_type_from_token(&error.error_type),
        message: error.message.clone().unwrap_or_default(),
        http_status_code: error.http_status,
        code: card_code_from_token(error.code.as_deref().unwrap_or_default()),
        charge_id: error.charge.clone().unwrap_or_default(),
        param: error.param.clone().unwrap_or_default(),
        request_id: error.request_id.clone().unwrap_or_default(),
    }
}

/// Error slot for a failed page fetch. Transport faults are reported as
/// connection errors.
pub fn failure_to_provider_error(failure: &ProviderFailure) -> ProviderError {
    match failure {
        ProviderFailure::Api(error) => api_error_to_provider_error(error),
        ProviderFailure::Transport(e) => ProviderError {
            error_type: ErrorType::ApiConnection,
            message: format!("{:#}", e),
            ..Default::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declined_card() {
        let error = ApiError {
            error_type: "card_error".into(),
            message: Some("Your card was declined.".into()),
            code: Some("card_declined".into()),
            charge: Some("ch_123".into()),
            http_status: 402,
            request_id: Some("req_1".into()),
            ..Default::default()
        };
        let translated = api_error_to_provider_error(&error);

        assert_eq!(translated.error_type, ErrorType::Card);
        assert_eq!(translated.code, CardErrorCode::Declined);
        assert_eq!(translated.message, "Your card was declined.");
        assert_eq!(translated.http_status_code, 402);
        assert_eq!(translated.charge_id, "ch_123");
        assert_eq!(translated.request_id, "req_1");
        assert_eq!(translated.param, "");
    }

    #[test]
    fn test_error_type_table() {
        assert_eq!(error_type_from_token("api_error"), ErrorType::Api);
        assert_eq!(
            error_type_from_token("api_connection_error"),
            ErrorType::ApiConnection
        );
        assert_eq!(
            error_type_from_token("authentication_error"),
            ErrorType::Authentication
        );
        assert_eq!(
            error_type_from_token("invalid_request_error"),
            ErrorType::InvalidRequest
        );
        assert_eq!(error_type_from_token("permission_error"), ErrorType::Permission);
        assert_eq!(error_type_from_token("rate_limit_error"), ErrorType::RateLimit);
        assert_eq!(error_type_from_token("idempotency_error"), ErrorType::Unspecified);
    }

    #[test]
    fn test_card_code_table() {
        assert_eq!(
            card_code_from_token("invalid_expiry_month"),
            CardErrorCode::InvalidExpirationMonth
        );
        assert_eq!(card_code_from_token("expired_card"), CardErrorCode::Expired);
        assert_eq!(card_code_from_token("rate_limit"), CardErrorCode::RateLimited);
        assert_eq!(card_code_from_token("Card_Declined"), CardErrorCode::Declined);
        assert_eq!(card_code_from_token("resource_missing"), CardErrorCode::Unspecified);
        assert_eq!(card_code_from_token(""), CardErrorCode::Unspecified);
    }

    #[test]
    fn test_empty_error_translates() {
        let translated = api_error_to_provider_error(&ApiError::default());
        assert_eq!(translated, ProviderError::default());
    }

    #[test]
    fn test_transport_failure_is_connection_error() {
        let failure = ProviderFailure::Transport(anyhow::anyhow!("connection refused"));
        let translated = failure_to_provider_error(&failure);
        assert_eq!(translated.error_type, ErrorType::ApiConnection);
        assert!(translated.message.contains("connection refused"));
    }
}
