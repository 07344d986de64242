//! Messages service.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::client::paginated::PaginatedStream;
use crate::client::{query_pairs, ClientInner};
use crate::models::{Message, MessageId, NewMessage, RoomId};
use crate::Result;

/// Service for message operations.
///
/// # Example
///
/// ```no_run
/// use teamspace_rs::NewMessage;
///
/// # async fn example(client: teamspace_rs::TeamSpaceClient) -> teamspace_rs::Result<()> {
/// let msg = client
///     .messages()
///     .create(NewMessage::to_room("room-id", "deploy finished"))
///     .await?;
/// println!("posted {}", msg.id);
/// # Ok(())
/// # }
/// ```
pub struct MessagesService {
    inner: Arc<ClientInner>,
}

/// Query parameters for listing messages. Listing is always room-scoped.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagesQuery {
    /// Room whose messages to list.
    pub room_id: RoomId,
    /// Only messages mentioning these people (`me` for the caller).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mentioned_people: Option<String>,
    /// Only messages sent before this instant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<DateTime<Utc>>,
    /// Only messages sent before this message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before_message: Option<MessageId>,
    /// Page size requested from the server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
}

impl MessagesQuery {
    /// Query for the most recent messages of one room.
    pub fn room(room_id: impl Into<RoomId>) -> Self {
        Self {
            room_id: room_id.into(),
            mentioned_people: None,
            before: None,
            before_message: None,
            max: None,
        }
    }
}

impl MessagesService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// List messages in a room, newest first (first page only).
    pub async fn list(&self, query: MessagesQuery) -> Result<Vec<Message>> {
        #[derive(serde::Deserialize)]
        struct Response {
            items: Vec<Message>,
        }
        let response: Response = self.inner.get_with_query("/messages", &query).await?;
        Ok(response.items)
    }

    /// Stream messages in a room, following pagination cursors lazily.
    pub fn list_stream(&self, query: MessagesQuery) -> PaginatedStream<Message> {
        let pairs = match query_pairs(&query) {
            Ok(pairs) => pairs,
            Err(e) => return PaginatedStream::failing(self.inner.clone(), e),
        };
        PaginatedStream::new(self.inner.clone(), "/messages", pairs, None)
    }

    /// Get a specific message.
    pub async fn get(&self, message_id: &MessageId) -> Result<Message> {
        self.inner.get(&format!("/messages/{}", message_id)).await
    }

    /// Post a message.
    pub async fn create(&self, message: NewMessage) -> Result<Message> {
        self.inner.post("/messages", &message).await
    }

    /// Delete a message.
    pub async fn delete(&self, message_id: &MessageId) -> Result<()> {
        self.inner
            .delete(&format!("/messages/{}", message_id))
            .await
    }
}
