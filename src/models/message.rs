//! Message models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::primitives::{MessageId, PersonId, RoomId};
use super::room::RoomType;

/// A message posted to a room.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Unique message identifier.
    pub id: MessageId,
    /// Room the message was posted to.
    pub room_id: RoomId,
    /// Kind of the containing room.
    #[serde(default)]
    pub room_type: Option<RoomType>,
    /// Plain-text content.
    #[serde(default)]
    pub text: Option<String>,
    /// Markdown content, when the sender supplied it.
    #[serde(default)]
    pub markdown: Option<String>,
    /// Rendered HTML content.
    #[serde(default)]
    pub html: Option<String>,
    /// URLs of attached files.
    #[serde(default)]
    pub files: Vec<String>,
    /// Person who posted the message.
    #[serde(default)]
    pub person_id: Option<PersonId>,
    /// Email of the person who posted the message.
    #[serde(default)]
    pub person_email: Option<String>,
    /// People mentioned in the message.
    #[serde(default)]
    pub mentioned_people: Vec<PersonId>,
    /// When the message was posted.
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
}

/// Request body for posting a message.
///
/// Exactly one destination (`room_id`, `to_person_id`, or
/// `to_person_email`) should be set, and at least one of `text`,
/// `markdown`, or `files`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessage {
    /// Room to post to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_id: Option<RoomId>,
    /// Person to message directly, by id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_person_id: Option<PersonId>,
    /// Person to message directly, by email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_person_email: Option<String>,
    /// Plain-text content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Markdown content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
    /// URLs of files to attach.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub files: Vec<String>,
}

impl NewMessage {
    /// A plain-text message addressed to a room.
    pub fn to_room(room_id: impl Into<RoomId>, text: impl Into<String>) -> Self {
        Self {
            room_id: Some(room_id.into()),
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// A plain-text direct message addressed by email.
    pub fn to_email(email: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            to_person_email: Some(email.into()),
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// Replace the plain text with markdown content.
    pub fn with_markdown(mut self, markdown: impl Into<String>) -> Self {
        self.markdown = Some(markdown.into());
        self
    }
}
