//! Masked request/response dumping for debugging.
//!
//! When [`ClientConfig::verbose_logging`] is on, every exchange is dumped
//! at `debug` level through `tracing`. Credentials must never appear in
//! the dump: masking operates on the structured record (headers and the
//! parsed JSON body), driven by an explicit list of sensitive field names,
//! never by patching rendered text.
//!
//! [`ClientConfig::verbose_logging`]: super::ClientConfig::verbose_logging

use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use serde_json::Value;

/// Field and header names whose values are always masked.
const SENSITIVE_FIELDS: &[&str] = &["authorization", "access_token", "refresh_token"];

const MASK: &str = "[MASKED]";

fn is_sensitive(name: &str) -> bool {
    SENSITIVE_FIELDS
        .iter()
        .any(|s| name.eq_ignore_ascii_case(s))
}

/// Render headers for logging, masking sensitive values.
pub(crate) fn masked_headers(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let rendered = if is_sensitive(name.as_str()) {
                MASK.to_string()
            } else {
                value.to_str().unwrap_or("<binary>").to_string()
            };
            (name.to_string(), rendered)
        })
        .collect()
}

/// Return a copy of a JSON value with sensitive field values masked,
/// recursively.
pub(crate) fn masked_json(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| {
                    if is_sensitive(k) {
                        (k.clone(), Value::String(MASK.to_string()))
                    } else {
                        (k.clone(), masked_json(v))
                    }
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(masked_json).collect()),
        other => other.clone(),
    }
}

/// Dump one outbound request.
pub(crate) fn dump_request(method: &Method, url: &str, headers: &HeaderMap, body: Option<&Value>) {
    tracing::debug!(
        %method,
        url,
        headers = ?masked_headers(headers),
        body = %body.map(|b| masked_json(b).to_string()).unwrap_or_default(),
        "request"
    );
}

/// Dump one inbound response.
pub(crate) fn dump_response(status: StatusCode, headers: &HeaderMap, body: Option<&Value>) {
    tracing::debug!(
        status = status.as_u16(),
        headers = ?masked_headers(headers),
        body = %body.map(|b| masked_json(b).to_string()).unwrap_or_default(),
        "response"
    );
}
