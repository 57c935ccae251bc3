//! Classification of unsuccessful HTTP responses.
//!
//! A response is a business rejection when its body carries the provider's
//! structured `error` object, whatever the status code. Anything else is a
//! transport failure and will be retried.

use anyhow::anyhow;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;

use crate::provider::ProviderFailure;
use crate::provider::api::ErrorEnvelope;

/// Header carrying the provider's request identifier.
pub const REQUEST_ID_HEADER: &str = "request-id";

/// Longest body excerpt kept in transport error messages.
const BODY_EXCERPT_LEN: usize = 200;

pub fn request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Classifies a non-2xx response from its status, request id and body.
pub fn classify_error_response(
    status: StatusCode,
    request_id: Option<String>,
    body: &str,
) -> ProviderFailure {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => {
            let mut error = envelope.error;
            error.http_status = status.as_u16();
            error.request_id = request_id;
            ProviderFailure::Api(error)
        }
        Err(_) => ProviderFailure::Transport(anyhow!(
            "HTTP {} from provider: {}",
            status.as_u16(),
            excerpt(body)
        )),
    }
}

fn excerpt(body: &str) -> &str {
    let body = body.trim();
    if body.len() <= BODY_EXCERPT_LEN {
        return body;
    }
    let mut end = BODY_EXCERPT_LEN;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
