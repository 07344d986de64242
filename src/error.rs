//! Error types for the TeamSpace API client.
//!
//! A single [`Error`] enum covers every failure mode: transport problems,
//! serialization failures, and structured API rejections.

use serde_json::Value;
use thiserror::Error;

/// A specialized `Result` type for TeamSpace operations.
pub type Result<T> = std::result::Result<T, Error>;

/// One entry of the `errors` array carried by a TeamSpace error body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetail {
    /// Human-readable description of this sub-error.
    pub description: String,
    /// Machine-readable code, when the API supplies one.
    pub code: Option<String>,
}

/// The main error type for all TeamSpace API operations.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed at the transport level (DNS, TLS, connection
    /// reset, caller-imposed timeout). Never retried by this crate.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The API returned a non-success status.
    #[error("API error: status={status}, code={code:?}, message={message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Machine-readable error code from the body, if present.
        code: Option<String>,
        /// Human-readable error message.
        message: String,
        /// Sub-errors from the body's `errors` array.
        errors: Vec<ErrorDetail>,
        /// Tracking identifier from the body or response headers.
        tracking_id: Option<String>,
    },

    /// Rate limited by the API (HTTP 429).
    ///
    /// Absorbed by the session's retry policy; callers only observe this
    /// variant if they drive the transport directly.
    #[error("rate limited; retry after {retry_after_secs} seconds")]
    RateLimited {
        /// Server-suggested wait, in seconds (before clamping).
        retry_after_secs: u64,
    },

    /// A successful response carried a body the caller could not use
    /// (e.g. plain text where JSON was expected).
    #[error("unexpected response body: {0}")]
    UnexpectedBody(String),

    /// A paginated response did not contain a recognizable item array.
    #[error("pagination error: {0}")]
    Pagination(String),

    /// Invalid input provided to a function.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// URL parsing error.
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal invariant failure (e.g. the admission gate was closed).
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// The HTTP status carried by this error, when there is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::RateLimited { .. } => Some(429),
            _ => None,
        }
    }

    /// Returns `true` if this error is an API rejection in the 4xx range.
    pub fn is_client_error(&self) -> bool {
        matches!(self.status(), Some(s) if (400..500).contains(&s))
    }

    /// Returns `true` if this error is an API rejection in the 5xx range.
    pub fn is_server_error(&self) -> bool {
        matches!(self.status(), Some(s) if s >= 500)
    }

    /// The tracking identifier attached to this error, if any.
    pub fn tracking_id(&self) -> Option<&str> {
        match self {
            Error::Api { tracking_id, .. } => tracking_id.as_deref(),
            _ => None,
        }
    }

    /// Build the typed REST error for a non-2xx response.
    ///
    /// The body is interpreted best-effort: a missing or unparseable body
    /// still yields a usable error with the status and any header-borne
    /// tracking id.
    pub(crate) fn from_response(
        status: u16,
        body: Option<&Value>,
        header_tracking_id: Option<String>,
    ) -> Self {
        let message = body
            .and_then(|b| b.get("message"))
            .and_then(|m| m.as_str())
            .unwrap_or("unknown API error")
            .to_string();

        let code = body.and_then(|b| b.get("errorCode")).and_then(|c| match c {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        });

        let errors = body
            .and_then(|b| b.get("errors"))
            .and_then(|e| e.as_array())
            .map(|list| {
                list.iter()
                    .filter_map(|entry| {
                        let description = entry.get("description")?.as_str()?.to_string();
                        let code = entry
                            .get("errorCode")
                            .and_then(|c| c.as_str())
                            .map(String::from);
                        Some(ErrorDetail { description, code })
                    })
                    .collect()
            })
            .unwrap_or_default();

        let tracking_id = body
            .and_then(|b| b.get("trackingId"))
            .and_then(|t| t.as_str())
            .map(String::from)
            .or(header_tracking_id);

        Error::Api {
            status,
            code,
            message,
            errors,
            tracking_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_response_full_body() {
        let body = json!({
            "message": "The room could not be found",
            "errorCode": "not_found",
            "trackingId": "TS_a1b2c3",
            "errors": [
                { "description": "room does not exist", "errorCode": "missing_room" },
                { "description": "check the room id" }
            ]
        });

        let err = Error::from_response(404, Some(&body), None);
        match err {
            Error::Api {
                status,
                code,
                message,
                errors,
                tracking_id,
            } => {
                assert_eq!(status, 404);
                assert_eq!(code.as_deref(), Some("not_found"));
                assert_eq!(message, "The room could not be found");
                assert_eq!(errors.len(), 2);
                assert_eq!(errors[0].description, "room does not exist");
                assert_eq!(errors[0].code.as_deref(), Some("missing_room"));
                assert!(errors[1].code.is_none());
                assert_eq!(tracking_id.as_deref(), Some("TS_a1b2c3"));
            }
            _ => panic!("expected Api error"),
        }
    }

    #[test]
    fn test_from_response_empty_body_uses_header_tracking_id() {
        let err = Error::from_response(503, None, Some("TS_hdr".into()));
        assert_eq!(err.status(), Some(503));
        assert!(err.is_server_error());
        assert_eq!(err.tracking_id(), Some("TS_hdr"));
    }

    #[test]
    fn test_classification() {
        let client = Error::from_response(403, None, None);
        assert!(client.is_client_error());
        assert!(!client.is_server_error());

        let rate = Error::RateLimited {
            retry_after_secs: 5,
        };
        assert_eq!(rate.status(), Some(429));

        let internal = Error::Internal("gate closed".into());
        assert_eq!(internal.status(), None);
    }
}
