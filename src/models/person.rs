//! Person models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::primitives::PersonId;

/// Presence status of a person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PersonStatus {
    /// Actively online.
    Active,
    /// Signed in but idle.
    Inactive,
    /// Do not disturb.
    DoNotDisturb,
    /// In a call or meeting.
    Call,
    /// Away from keyboard.
    OutOfOffice,
    /// Presence unknown.
    Unknown,
}

/// A registered user of the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    /// Unique person identifier.
    pub id: PersonId,
    /// Email addresses registered to the person.
    #[serde(default)]
    pub emails: Vec<String>,
    /// Full display name.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Given name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Nickname, when set.
    #[serde(default)]
    pub nick_name: Option<String>,
    /// URL of the person's avatar image.
    #[serde(default)]
    pub avatar: Option<String>,
    /// Identifier of the owning organization.
    #[serde(default)]
    pub org_id: Option<String>,
    /// Current presence status.
    #[serde(default)]
    pub status: Option<PersonStatus>,
    /// When the account was created.
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
}
