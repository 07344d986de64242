//! Response envelope shared by the async and blocking transports.
//!
//! Status interpretation lives here so both variants classify responses
//! identically: 2xx yields an envelope, 429 yields
//! [`Error::RateLimited`], any other status >= 400 yields the typed API
//! error.

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{Error, Result};

/// Fallback wait when a 429 response has no usable `Retry-After` header.
pub const RETRY_AFTER_DEFAULT_SECS: u64 = 5;

/// Hard cap on the honored `Retry-After` wait.
pub const RETRY_AFTER_CAP_SECS: u64 = 20;

/// Response header carrying the server-side tracking identifier.
pub(crate) const TRACKING_ID_HEADER: &str = "trackingid";

/// A parsed response body.
#[derive(Debug, Clone)]
pub enum Body {
    /// `Content-Type: application/json` body.
    Json(Value),
    /// Any other non-empty body, kept as raw text.
    Text(String),
    /// No body, or no `Content-Type` header.
    Empty,
}

/// Status, headers, and parsed body of one HTTP exchange.
#[derive(Debug)]
pub struct ResponseEnvelope {
    /// HTTP status code.
    #[allow(dead_code)]
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Parsed body.
    pub body: Body,
}

impl ResponseEnvelope {
    /// Deserialize the JSON body into `T`.
    pub fn json<T: DeserializeOwned>(self) -> Result<T> {
        match self.body {
            Body::Json(v) => Ok(serde_json::from_value(v)?),
            Body::Text(_) => Err(Error::UnexpectedBody(
                "expected a JSON body, got text".into(),
            )),
            Body::Empty => Err(Error::UnexpectedBody("expected a JSON body, got none".into())),
        }
    }
}

/// Parse a response body according to its `Content-Type`.
///
/// A body that claims JSON but fails to parse is a hard error - it is
/// never silently downgraded to text.
pub(crate) fn parse_body(content_type: Option<&str>, text: &str) -> Result<Body> {
    match content_type {
        Some(ct) if ct.starts_with("application/json") => {
            if text.is_empty() {
                Ok(Body::Empty)
            } else {
                Ok(Body::Json(serde_json::from_str(text)?))
            }
        }
        Some(_) => Ok(Body::Text(text.to_string())),
        None => Ok(Body::Empty),
    }
}

/// Classify one finished exchange into a success envelope or an error.
pub(crate) fn interpret(
    status: StatusCode,
    headers: HeaderMap,
    content_type: Option<&str>,
    text: &str,
) -> Result<ResponseEnvelope> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(Error::RateLimited {
            retry_after_secs: retry_after_secs(&headers),
        });
    }

    if status.as_u16() >= 400 {
        // Best-effort body parse; an unreadable error body must not mask
        // the underlying status.
        let body = serde_json::from_str::<Value>(text).ok();
        let tracking = headers
            .get(TRACKING_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        return Err(Error::from_response(status.as_u16(), body.as_ref(), tracking));
    }

    let body = parse_body(content_type, text)?;
    Ok(ResponseEnvelope {
        status,
        headers,
        body,
    })
}

/// The server-suggested wait for a 429 response, before clamping.
///
/// Only the integer-seconds form of `Retry-After` is honored; an absent or
/// unparseable header (including the HTTP-date form) falls back to
/// [`RETRY_AFTER_DEFAULT_SECS`].
pub(crate) fn retry_after_secs(headers: &HeaderMap) -> u64 {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(RETRY_AFTER_DEFAULT_SECS)
}

/// The wait actually honored for a 429, clamped to the policy cap.
pub(crate) fn clamped_retry_after(retry_after_secs: u64) -> std::time::Duration {
    std::time::Duration::from_secs(retry_after_secs.min(RETRY_AFTER_CAP_SECS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;
    use std::time::Duration;

    fn headers_with_retry_after(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            reqwest::header::RETRY_AFTER,
            HeaderValue::from_str(value).unwrap(),
        );
        headers
    }

    #[test]
    fn test_retry_after_parsing() {
        assert_eq!(retry_after_secs(&headers_with_retry_after("3")), 3);
        assert_eq!(retry_after_secs(&headers_with_retry_after("0")), 0);
        assert_eq!(retry_after_secs(&headers_with_retry_after("120")), 120);
        // Absent or unparseable -> default
        assert_eq!(retry_after_secs(&HeaderMap::new()), RETRY_AFTER_DEFAULT_SECS);
        assert_eq!(
            retry_after_secs(&headers_with_retry_after("Wed, 21 Oct 2026 07:28:00 GMT")),
            RETRY_AFTER_DEFAULT_SECS
        );
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamped_retry_after(0), Duration::from_secs(0));
        assert_eq!(clamped_retry_after(3), Duration::from_secs(3));
        assert_eq!(clamped_retry_after(20), Duration::from_secs(20));
        assert_eq!(clamped_retry_after(25), Duration::from_secs(20));
        assert_eq!(clamped_retry_after(u64::MAX), Duration::from_secs(20));
    }

    #[test]
    fn test_parse_body_variants() {
        assert!(matches!(
            parse_body(Some("application/json; charset=utf-8"), r#"{"a":1}"#),
            Ok(Body::Json(_))
        ));
        assert!(matches!(
            parse_body(Some("text/plain"), "hi"),
            Ok(Body::Text(_))
        ));
        assert!(matches!(parse_body(None, "ignored"), Ok(Body::Empty)));
        assert!(matches!(
            parse_body(Some("application/json"), ""),
            Ok(Body::Empty)
        ));
        // Claims JSON but is not: propagated as a parse failure.
        assert!(parse_body(Some("application/json"), "not json").is_err());
    }

    #[test]
    fn test_interpret_success() {
        let envelope = interpret(
            StatusCode::OK,
            HeaderMap::new(),
            Some("application/json"),
            r#"{"a":1}"#,
        )
        .unwrap();
        assert_eq!(envelope.status, StatusCode::OK);
        let value: Value = envelope.json().unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn test_interpret_429() {
        let err = interpret(
            StatusCode::TOO_MANY_REQUESTS,
            headers_with_retry_after("7"),
            Some("application/json"),
            "{}",
        )
        .unwrap_err();
        assert!(matches!(err, Error::RateLimited { retry_after_secs: 7 }));
    }

    #[test]
    fn test_interpret_error_with_header_tracking_id() {
        let mut headers = HeaderMap::new();
        headers.insert(TRACKING_ID_HEADER, HeaderValue::from_static("TS_x"));
        let err = interpret(StatusCode::BAD_GATEWAY, headers, None, "").unwrap_err();
        assert_eq!(err.status(), Some(502));
        assert_eq!(err.tracking_id(), Some("TS_x"));
    }
}
