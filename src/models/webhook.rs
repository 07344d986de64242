//! Webhook models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::primitives::WebhookId;

/// Lifecycle status of a webhook registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WebhookStatus {
    /// Deliveries are being attempted.
    Active,
    /// Deliveries are suspended.
    Inactive,
}

/// A registered webhook subscription.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Webhook {
    /// Unique webhook identifier.
    pub id: WebhookId,
    /// User-chosen name of the subscription.
    pub name: String,
    /// URL deliveries are POSTed to.
    pub target_url: String,
    /// Resource type the webhook watches (e.g. `messages`).
    pub resource: String,
    /// Event kind the webhook fires on (e.g. `created`).
    pub event: String,
    /// Optional resource filter expression.
    #[serde(default)]
    pub filter: Option<String>,
    /// Shared secret used to sign delivery payloads.
    #[serde(default)]
    pub secret: Option<String>,
    /// Current delivery status.
    #[serde(default)]
    pub status: Option<WebhookStatus>,
    /// When the webhook was registered.
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
}

/// Request body for registering a webhook.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWebhook {
    /// Name for the subscription.
    pub name: String,
    /// URL deliveries are POSTed to.
    pub target_url: String,
    /// Resource type to watch.
    pub resource: String,
    /// Event kind to fire on.
    pub event: String,
    /// Optional resource filter expression.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    /// Shared secret used to sign delivery payloads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
}

/// Request body for updating a webhook.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookUpdate {
    /// New name for the subscription.
    pub name: String,
    /// New delivery URL.
    pub target_url: String,
}
