//! Blocking HTTP client implementation.
//!
//! Same session semantics as the async client - bearer auth, unbounded
//! 429 retry with the clamped `Retry-After`, admission gating - with
//! blocking I/O and `std::thread::sleep` backoff.

use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crate::auth::Credential;
use crate::client::envelope::{self, ResponseEnvelope};
use crate::client::{assemble_headers, diagnostics, query_pairs, Payload, RequestSpec};
use crate::{ClientConfig, Error, Result};

use super::gate::AdmissionGate;
use super::paginated::Paginated;

/// Blocking client for the TeamSpace API.
///
/// Safe to share across threads; the admission gate caps in-flight
/// requests across all of them.
///
/// # Example
///
/// ```no_run
/// use teamspace_rs::blocking::TeamSpaceClient;
/// use teamspace_rs::{Credential, Person};
///
/// # fn example() -> teamspace_rs::Result<()> {
/// let client = TeamSpaceClient::new(Credential::from_env()?)?;
/// let me: Person = client.get("/people/me")?;
/// println!("signed in as {:?}", me.display_name);
/// # Ok(())
/// # }
/// ```
pub struct TeamSpaceClient {
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    http: reqwest::blocking::Client,
    credential: RwLock<Credential>,
    config: ClientConfig,
    gate: AdmissionGate,
    throttle_retries: AtomicU64,
}

impl TeamSpaceClient {
    /// Create a blocking client with the default configuration.
    pub fn new(credential: Credential) -> Result<Self> {
        Self::with_config(credential, ClientConfig::default())
    }

    /// Create a blocking client with a custom configuration.
    pub fn with_config(credential: Credential, config: ClientConfig) -> Result<Self> {
        if config.concurrent_requests == 0 {
            return Err(Error::Config(
                "concurrent_requests must be at least 1".to_string(),
            ));
        }

        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                credential: RwLock::new(credential),
                gate: AdmissionGate::new(config.concurrent_requests),
                throttle_retries: AtomicU64::new(0),
                config,
            }),
        })
    }

    /// Create a blocking client from the `TEAMSPACE_ACCESS_TOKEN`
    /// environment variable.
    pub fn from_env() -> Result<Self> {
        Self::new(Credential::from_env()?)
    }

    /// Swap in an externally refreshed credential.
    pub fn swap_credential(&self, credential: Credential) {
        let mut guard = self
            .inner
            .credential
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = credential;
    }

    /// Total number of 429 backoffs this client has taken.
    pub fn throttle_retry_count(&self) -> u64 {
        self.inner.throttle_retries.load(Ordering::Relaxed)
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Make a GET request.
    pub fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let spec = RequestSpec::new(Method::GET, self.inner.url_for(path));
        self.inner.execute(&spec)?.json()
    }

    /// Make a GET request with query parameters.
    pub fn get_with_query<T: DeserializeOwned, Q: Serialize>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T> {
        let spec = RequestSpec::new(Method::GET, self.inner.url_for(path))
            .with_query(query_pairs(query)?);
        self.inner.execute(&spec)?.json()
    }

    /// Make a POST request with a JSON body.
    pub fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let spec = RequestSpec::new(Method::POST, self.inner.url_for(path))
            .with_json(serde_json::to_value(body)?);
        self.inner.execute(&spec)?.json()
    }

    /// Make a PUT request with a JSON body.
    pub fn put<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let spec = RequestSpec::new(Method::PUT, self.inner.url_for(path))
            .with_json(serde_json::to_value(body)?);
        self.inner.execute(&spec)?.json()
    }

    /// Make a DELETE request, discarding any response body.
    pub fn delete(&self, path: &str) -> Result<()> {
        let spec = RequestSpec::new(Method::DELETE, self.inner.url_for(path));
        self.inner.execute(&spec).map(|_| ())
    }

    /// Iterate over a paginated list endpoint.
    ///
    /// `query` applies to the first request only; follow-up pages use the
    /// server's `Link` cursor verbatim. `item_field` names the JSON field
    /// holding the item array, with the same fallbacks as the async
    /// stream.
    pub fn paginate<T: DeserializeOwned, Q: Serialize>(
        &self,
        path: &str,
        query: Option<&Q>,
        item_field: Option<&str>,
    ) -> Paginated<T> {
        let pairs = match query.map(query_pairs).transpose() {
            Ok(pairs) => pairs.unwrap_or_default(),
            Err(e) => return Paginated::failing(self.inner.clone(), e),
        };
        Paginated::new(
            self.inner.clone(),
            path,
            pairs,
            item_field.map(String::from),
        )
    }
}

impl Clone for TeamSpaceClient {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl std::fmt::Debug for TeamSpaceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("blocking::TeamSpaceClient")
            .field("config", &self.inner.config)
            .finish()
    }
}

impl ClientInner {
    pub(crate) fn url_for(&self, path_or_url: &str) -> String {
        if path_or_url.starts_with("http://") || path_or_url.starts_with("https://") {
            path_or_url.to_string()
        } else {
            format!("{}{}", self.config.effective_base_url(), path_or_url)
        }
    }

    /// Execute a request through the retry policy and admission gate.
    ///
    /// Mirrors the async session: unbounded retry on 429, slot released
    /// before the backoff sleep, everything else final.
    pub(crate) fn execute(&self, spec: &RequestSpec) -> Result<ResponseEnvelope> {
        let mut attempt: u64 = 1;
        loop {
            let permit = self.gate.acquire();
            let outcome = self.send_once(spec);
            drop(permit);

            match outcome {
                Err(Error::RateLimited { retry_after_secs }) => {
                    let wait = envelope::clamped_retry_after(retry_after_secs);
                    let total = self.throttle_retries.fetch_add(1, Ordering::Relaxed) + 1;
                    tracing::warn!(
                        attempt,
                        wait_secs = wait.as_secs(),
                        lifetime_backoffs = total,
                        url = %spec.url,
                        "throttled by server; backing off"
                    );
                    std::thread::sleep(wait);
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    fn send_once(&self, spec: &RequestSpec) -> Result<ResponseEnvelope> {
        let credential = self
            .credential
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        let headers = assemble_headers(
            &credential,
            matches!(spec.body, Some(Payload::Json(_))),
            &spec.headers,
        )?;

        if self.config.verbose_logging {
            let body = match &spec.body {
                Some(Payload::Json(v)) => Some(v.clone()),
                Some(Payload::Form(fields)) => Some(Value::Object(
                    fields
                        .iter()
                        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                        .collect(),
                )),
                None => None,
            };
            diagnostics::dump_request(&spec.method, &spec.url, &headers, body.as_ref());
        }

        let mut request = self.http.request(spec.method.clone(), spec.url.as_str());
        if !spec.query.is_empty() {
            request = request.query(&spec.query);
        }
        request = match &spec.body {
            Some(Payload::Json(v)) => request.json(v),
            Some(Payload::Form(fields)) => request.form(fields),
            None => request,
        };

        let response = request.headers(headers).send()?;

        let status = response.status();
        let resp_headers = response.headers().clone();
        let content_type = resp_headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let text = response.text()?;

        if self.config.verbose_logging {
            let body = serde_json::from_str::<Value>(&text).ok();
            diagnostics::dump_response(status, &resp_headers, body.as_ref());
        }

        envelope::interpret(status, resp_headers, content_type.as_deref(), &text)
    }
}
