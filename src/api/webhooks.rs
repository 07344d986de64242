//! Webhooks service.

use std::sync::Arc;

use serde::Serialize;

use crate::client::paginated::PaginatedStream;
use crate::client::{query_pairs, ClientInner};
use crate::models::{NewWebhook, Webhook, WebhookId, WebhookUpdate};
use crate::Result;

/// Service for webhook subscription management.
///
/// # Example
///
/// ```no_run
/// use teamspace_rs::NewWebhook;
///
/// # async fn example(client: teamspace_rs::TeamSpaceClient) -> teamspace_rs::Result<()> {
/// let hook = client.webhooks().create(NewWebhook {
///     name: "message watcher".into(),
///     target_url: "https://hooks.example.com/in".into(),
///     resource: "messages".into(),
///     event: "created".into(),
///     ..Default::default()
/// }).await?;
/// println!("registered {}", hook.id);
/// # Ok(())
/// # }
/// ```
pub struct WebhooksService {
    inner: Arc<ClientInner>,
}

/// Query parameters for listing webhooks.
#[derive(Debug, Default, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhooksQuery {
    /// Page size requested from the server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
}

impl WebhooksService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// List registered webhooks (first page only).
    pub async fn list(&self, query: Option<WebhooksQuery>) -> Result<Vec<Webhook>> {
        #[derive(serde::Deserialize)]
        struct Response {
            items: Vec<Webhook>,
        }
        let response: Response = match query {
            Some(q) => self.inner.get_with_query("/webhooks", &q).await?,
            None => self.inner.get("/webhooks").await?,
        };
        Ok(response.items)
    }

    /// Stream registered webhooks, following pagination cursors lazily.
    pub fn list_stream(&self, query: Option<WebhooksQuery>) -> PaginatedStream<Webhook> {
        let pairs = match query.as_ref().map(query_pairs).transpose() {
            Ok(pairs) => pairs.unwrap_or_default(),
            Err(e) => return PaginatedStream::failing(self.inner.clone(), e),
        };
        PaginatedStream::new(self.inner.clone(), "/webhooks", pairs, None)
    }

    /// Get a specific webhook.
    pub async fn get(&self, webhook_id: &WebhookId) -> Result<Webhook> {
        self.inner.get(&format!("/webhooks/{}", webhook_id)).await
    }

    /// Register a webhook.
    pub async fn create(&self, webhook: NewWebhook) -> Result<Webhook> {
        self.inner.post("/webhooks", &webhook).await
    }

    /// Update a webhook's name or delivery URL.
    pub async fn update(&self, webhook_id: &WebhookId, update: WebhookUpdate) -> Result<Webhook> {
        self.inner
            .put(&format!("/webhooks/{}", webhook_id), &update)
            .await
    }

    /// Delete a webhook.
    pub async fn delete(&self, webhook_id: &WebhookId) -> Result<()> {
        self.inner
            .delete(&format!("/webhooks/{}", webhook_id))
            .await
    }
}
