//! Room membership models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::primitives::{MembershipId, PersonId, RoomId};

/// A person's membership in a room.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    /// Unique membership identifier.
    pub id: MembershipId,
    /// Room the membership belongs to.
    pub room_id: RoomId,
    /// Member's person id.
    pub person_id: PersonId,
    /// Member's email.
    #[serde(default)]
    pub person_email: Option<String>,
    /// Member's display name.
    #[serde(default)]
    pub person_display_name: Option<String>,
    /// Whether the member moderates the room.
    #[serde(default)]
    pub is_moderator: bool,
    /// Whether the member has muted the room.
    #[serde(default)]
    pub is_monitor: bool,
    /// When the membership was created.
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
}

/// Request body for adding a person to a room.
///
/// One of `person_id` or `person_email` must be set.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMembership {
    /// Room to add the person to.
    pub room_id: RoomId,
    /// Person to add, by id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person_id: Option<PersonId>,
    /// Person to add, by email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person_email: Option<String>,
    /// Grant the person moderator rights.
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub is_moderator: bool,
}
