//! HTTP client implementation for the TeamSpace API.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use secrecy::ExposeSecret;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::Semaphore;

use crate::api::{
    MembershipsService, MessagesService, PeopleService, RoomsService, WebhooksService,
};
use crate::auth::Credential;
use crate::{Error, Result};

use super::config::ClientConfig;
use super::envelope::{self, ResponseEnvelope};
use super::diagnostics;

/// Request header carrying the client-generated tracking identifier.
/// Header names are case-insensitive on the wire; the lowercase form is
/// required for static `HeaderMap` keys.
pub(crate) const TRACKING_ID_REQUEST_HEADER: &str = "trackingid";

/// The main client for interacting with the TeamSpace API.
///
/// The client manages authentication, request building, rate-limit
/// handling, and response parsing. API endpoints are reached through
/// service accessors.
///
/// # Example
///
/// ```no_run
/// use teamspace_rs::{TeamSpaceClient, Credential, NewMessage};
///
/// # async fn example() -> teamspace_rs::Result<()> {
/// let client = TeamSpaceClient::new(Credential::from_env()?)?;
///
/// // Who am I?
/// let me = client.people().me().await?;
/// println!("signed in as {:?}", me.display_name);
///
/// // Post a message
/// let msg = client
///     .messages()
///     .create(NewMessage::to_room("room-id", "hello from Rust"))
///     .await?;
/// println!("posted {}", msg.id);
/// # Ok(())
/// # }
/// ```
pub struct TeamSpaceClient {
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub(crate) http: reqwest::Client,
    pub(crate) credential: RwLock<Credential>,
    pub(crate) config: ClientConfig,
    /// Admission gate bounding in-flight requests.
    pub(crate) gate: Semaphore,
    /// Total 429 backoffs taken over the client's lifetime.
    pub(crate) throttle_retries: AtomicU64,
}

/// One fully-described outbound request.
///
/// Specs are plain data so an attempt can be rebuilt for every pass of the
/// retry loop.
pub(crate) struct RequestSpec {
    pub(crate) method: Method,
    /// Absolute URL.
    pub(crate) url: String,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) body: Option<Payload>,
    /// Caller header overrides. Applied over the defaults, except
    /// `Authorization`, which always comes from the live credential.
    pub(crate) headers: HeaderMap,
}

pub(crate) enum Payload {
    Json(Value),
    Form(Vec<(String, String)>),
}

impl RequestSpec {
    pub(crate) fn new(method: Method, url: String) -> Self {
        Self {
            method,
            url,
            query: Vec::new(),
            body: None,
            headers: HeaderMap::new(),
        }
    }

    pub(crate) fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub(crate) fn with_json(mut self, body: Value) -> Self {
        self.body = Some(Payload::Json(body));
        self
    }

    #[allow(dead_code)]
    pub(crate) fn with_form(mut self, fields: Vec<(String, String)>) -> Self {
        self.body = Some(Payload::Form(fields));
        self
    }

    #[allow(dead_code)]
    pub(crate) fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }
}

impl TeamSpaceClient {
    /// Create a client with the default configuration.
    pub fn new(credential: Credential) -> Result<Self> {
        Self::with_config(credential, ClientConfig::default())
    }

    /// Create a client with a custom configuration.
    pub fn with_config(credential: Credential, config: ClientConfig) -> Result<Self> {
        if config.concurrent_requests == 0 {
            return Err(Error::Config(
                "concurrent_requests must be at least 1".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                credential: RwLock::new(credential),
                gate: Semaphore::new(config.concurrent_requests),
                throttle_retries: AtomicU64::new(0),
                config,
            }),
        })
    }

    /// Create a client from the `TEAMSPACE_ACCESS_TOKEN` environment
    /// variable.
    pub fn from_env() -> Result<Self> {
        Self::new(Credential::from_env()?)
    }

    /// Get the rooms service.
    pub fn rooms(&self) -> RoomsService {
        RoomsService::new(self.inner.clone())
    }

    /// Get the messages service.
    pub fn messages(&self) -> MessagesService {
        MessagesService::new(self.inner.clone())
    }

    /// Get the people service.
    pub fn people(&self) -> PeopleService {
        PeopleService::new(self.inner.clone())
    }

    /// Get the room memberships service.
    pub fn memberships(&self) -> MembershipsService {
        MembershipsService::new(self.inner.clone())
    }

    /// Get the webhooks service.
    pub fn webhooks(&self) -> WebhooksService {
        WebhooksService::new(self.inner.clone())
    }

    /// Stream an arbitrary paginated list endpoint.
    ///
    /// This is the generic form of the services' `list_stream` methods:
    /// `query` applies to the first request only, follow-up pages use the
    /// server's `Link` cursor verbatim, and `item_field` names the JSON
    /// field holding the item array (defaulting to `items`, then to the
    /// first array-valued field).
    pub fn paginate<T, Q>(
        &self,
        path: &str,
        query: Option<&Q>,
        item_field: Option<&str>,
    ) -> crate::client::PaginatedStream<T>
    where
        Q: Serialize,
    {
        let pairs = match query.map(query_pairs).transpose() {
            Ok(pairs) => pairs.unwrap_or_default(),
            Err(e) => {
                return crate::client::PaginatedStream::failing(self.inner.clone(), e)
            }
        };
        crate::client::PaginatedStream::new(
            self.inner.clone(),
            path,
            pairs,
            item_field.map(String::from),
        )
    }

    /// Swap in an externally refreshed credential.
    ///
    /// Requests already in flight finish with the token they started with;
    /// every subsequent request uses the new one.
    pub fn swap_credential(&self, credential: Credential) {
        let mut guard = self
            .inner
            .credential
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = credential;
    }

    /// Total number of 429 backoffs this client has taken.
    ///
    /// The retry loop has no attempt ceiling; this counter is the
    /// observability hook for detecting a runaway throttle loop.
    pub fn throttle_retry_count(&self) -> u64 {
        self.inner.throttle_retries.load(Ordering::Relaxed)
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
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
        f.debug_struct("TeamSpaceClient")
            .field("config", &self.inner.config)
            .finish()
    }
}

impl ClientInner {
    /// Resolve a path against the configured base URL. Absolute URLs
    /// (pagination cursors) pass through untouched.
    pub(crate) fn url_for(&self, path_or_url: &str) -> String {
        if path_or_url.starts_with("http://") || path_or_url.starts_with("https://") {
            path_or_url.to_string()
        } else {
            format!("{}{}", self.config.effective_base_url(), path_or_url)
        }
    }

    /// Execute a request through the retry policy and admission gate.
    ///
    /// Retries indefinitely on HTTP 429, sleeping the clamped
    /// `Retry-After` between attempts; the gate slot is released before
    /// the sleep and re-acquired for the next attempt. Every other
    /// outcome, success or failure, is final.
    pub(crate) async fn execute(&self, spec: &RequestSpec) -> Result<ResponseEnvelope> {
        let mut attempt: u64 = 1;
        loop {
            let permit = self
                .gate
                .acquire()
                .await
                .map_err(|_| Error::Internal("admission gate closed".to_string()))?;
            let outcome = self.send_once(spec).await;
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
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    /// One transport attempt: build, send, classify. No retry decisions
    /// are made here.
    async fn send_once(&self, spec: &RequestSpec) -> Result<ResponseEnvelope> {
        let headers = self.build_headers(spec)?;

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

        let response = request.headers(headers).send().await?;

        let status = response.status();
        let resp_headers = response.headers().clone();
        let content_type = resp_headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let text = response.text().await?;

        if self.config.verbose_logging {
            let body = serde_json::from_str::<Value>(&text).ok();
            diagnostics::dump_response(status, &resp_headers, body.as_ref());
        }

        envelope::interpret(status, resp_headers, content_type.as_deref(), &text)
    }

    fn build_headers(&self, spec: &RequestSpec) -> Result<HeaderMap> {
        let credential = self
            .credential
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        assemble_headers(
            &credential,
            matches!(spec.body, Some(Payload::Json(_))),
            &spec.headers,
        )
    }

    /// Make a GET request.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let spec = RequestSpec::new(Method::GET, self.url_for(path));
        self.execute(&spec).await?.json()
    }

    /// Make a GET request with query parameters.
    pub(crate) async fn get_with_query<T: DeserializeOwned, Q: Serialize>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T> {
        let spec =
            RequestSpec::new(Method::GET, self.url_for(path)).with_query(query_pairs(query)?);
        self.execute(&spec).await?.json()
    }

    /// Make a POST request with a JSON body.
    pub(crate) async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let spec =
            RequestSpec::new(Method::POST, self.url_for(path)).with_json(serde_json::to_value(body)?);
        self.execute(&spec).await?.json()
    }

    /// Make a PUT request with a JSON body.
    pub(crate) async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let spec =
            RequestSpec::new(Method::PUT, self.url_for(path)).with_json(serde_json::to_value(body)?);
        self.execute(&spec).await?.json()
    }

    /// Make a DELETE request, discarding any response body.
    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        let spec = RequestSpec::new(Method::DELETE, self.url_for(path));
        self.execute(&spec).await.map(|_| ())
    }
}

/// Assemble request headers: tracking id and content type first, then
/// caller overrides, then the bearer token from the live credential
/// (which no override can displace).
pub(crate) fn assemble_headers(
    credential: &Credential,
    has_json_body: bool,
    overrides: &HeaderMap,
) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    let tracking = format!("TS_{}", uuid::Uuid::new_v4());
    headers.insert(
        TRACKING_ID_REQUEST_HEADER,
        HeaderValue::from_str(&tracking)
            .map_err(|_| Error::Internal("invalid tracking id".to_string()))?,
    );

    if has_json_body {
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
    }

    for (name, value) in overrides {
        if name != &AUTHORIZATION {
            headers.insert(name.clone(), value.clone());
        }
    }

    let token = credential.current_access_token();
    let mut bearer = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
        .map_err(|_| {
            Error::InvalidInput("access token contains invalid header characters".to_string())
        })?;
    bearer.set_sensitive(true);
    headers.insert(AUTHORIZATION, bearer);

    Ok(headers)
}

/// Serialize a typed query struct into `(key, value)` pairs.
pub(crate) fn query_pairs<Q: Serialize>(query: &Q) -> Result<Vec<(String, String)>> {
    let encoded = serde_urlencoded::to_string(query)
        .map_err(|e| Error::InvalidInput(format!("unencodable query: {}", e)))?;
    Ok(url::form_urlencoded::parse(encoded.as_bytes())
        .into_owned()
        .collect())
}
