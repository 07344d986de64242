//! Room models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::primitives::{PersonId, RoomId};

/// The kind of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomType {
    /// A one-to-one conversation.
    Direct,
    /// A multi-party space.
    Group,
}

/// A virtual meeting place where people post messages and collaborate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    /// Unique room identifier.
    pub id: RoomId,
    /// User-visible title of the room.
    pub title: String,
    /// Whether this is a direct or group room.
    #[serde(rename = "type")]
    pub room_type: RoomType,
    /// Whether the room is moderated.
    #[serde(default)]
    pub is_locked: bool,
    /// Id of the team the room belongs to, if any.
    #[serde(default)]
    pub team_id: Option<String>,
    /// Person who created the room.
    #[serde(default)]
    pub creator_id: Option<PersonId>,
    /// Timestamp of the most recent activity in the room.
    #[serde(default)]
    pub last_activity: Option<DateTime<Utc>>,
    /// When the room was created.
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
}

/// Request body for creating a room.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRoom {
    /// Title for the new room.
    pub title: String,
    /// Team to create the room under, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_deserializes_camel_case() {
        let json = r#"{
            "id": "r-1",
            "title": "Platform Eng",
            "type": "group",
            "isLocked": false,
            "lastActivity": "2024-03-01T12:00:00.000Z",
            "created": "2023-01-15T08:30:00.000Z"
        }"#;

        let room: Room = serde_json::from_str(json).unwrap();
        assert_eq!(room.id.as_str(), "r-1");
        assert_eq!(room.room_type, RoomType::Group);
        assert!(!room.is_locked);
        assert!(room.team_id.is_none());
    }
}
