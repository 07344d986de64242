//! # teamspace-rs
//!
//! A Rust client for the TeamSpace collaboration platform REST API.
//!
//! The crate wraps TeamSpace's rooms, messages, people, memberships, and
//! webhooks endpoints behind strongly-typed services, on top of a session
//! layer that handles the platform's protocol conventions for you:
//!
//! - **Bearer authentication** from a [`Credential`], supplied directly
//!   or via the `TEAMSPACE_ACCESS_TOKEN` environment variable
//! - **Rate-limit handling**: HTTP 429 responses are retried for as long
//!   as the server keeps throttling, honoring `Retry-After` (default 5 s,
//!   capped at 20 s per wait) - sustained throttling delays a call rather
//!   than failing it
//! - **Cursor pagination**: list endpoints return lazy streams that
//!   follow the RFC 5988 `Link` header one page at a time
//! - **Bounded concurrency**: an admission gate caps in-flight requests
//!   across everything sharing one client
//! - **Typed errors**: non-2xx responses carry status, error code,
//!   message, sub-errors, and the server tracking id
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use futures_util::StreamExt;
//! use teamspace_rs::{TeamSpaceClient, Credential, NewMessage};
//!
//! #[tokio::main]
//! async fn main() -> teamspace_rs::Result<()> {
//!     let client = TeamSpaceClient::new(Credential::from_env()?)?;
//!
//!     // Who am I?
//!     let me = client.people().me().await?;
//!     println!("signed in as {:?}", me.display_name);
//!
//!     // Walk every room, lazily following pagination
//!     let mut rooms = client.rooms().list_stream(None);
//!     while let Some(room) = rooms.next().await {
//!         println!("{}", room?.title);
//!     }
//!
//!     // Post a message
//!     client
//!         .messages()
//!         .create(NewMessage::to_room("room-id", "hello from Rust"))
//!         .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Blocking
//!
//! A synchronous client with the same session semantics is available
//! behind the `blocking` feature; see [`blocking`](crate::blocking).

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod api;
pub mod auth;
#[cfg(feature = "blocking")]
pub mod blocking;
pub mod client;
pub mod error;
pub mod models;

// Re-export primary types at crate root for convenience
pub use auth::Credential;
pub use client::{ClientConfig, PageLinks, PaginatedStream, TeamSpaceClient};
pub use client::{DEFAULT_CONCURRENT_REQUESTS, RETRY_AFTER_CAP_SECS, RETRY_AFTER_DEFAULT_SECS};
pub use error::{Error, ErrorDetail, Result};
pub use models::{
    Environment, Membership, MembershipId, Message, MessageId, NewMembership, NewMessage,
    NewRoom, NewWebhook, Person, PersonId, Room, RoomId, RoomType, Webhook, WebhookId,
    WebhookUpdate,
};
pub use api::{MembershipsQuery, MessagesQuery, PeopleQuery, RoomsQuery, WebhooksQuery};

/// Prelude module for convenient imports.
///
/// ```rust
/// use teamspace_rs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::api::{
        MembershipsQuery, MembershipsService, MessagesQuery, MessagesService, PeopleQuery,
        PeopleService, RoomsQuery, RoomsService, WebhooksQuery, WebhooksService,
    };
    pub use crate::auth::Credential;
    pub use crate::client::{ClientConfig, PaginatedStream, TeamSpaceClient};
    pub use crate::error::{Error, Result};
    pub use crate::models::{
        Environment, Membership, MembershipId, Message, MessageId, NewMembership, NewMessage,
        NewRoom, NewWebhook, Person, PersonId, Room, RoomId, RoomType, Webhook, WebhookId,
        WebhookUpdate,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_urls() {
        assert_eq!(
            Environment::Production.api_base_url(),
            "https://api.teamspace.com/v1"
        );
        assert_eq!(
            Environment::Sandbox.api_base_url(),
            "https://sandbox-api.teamspace.com/v1"
        );
    }

    #[test]
    fn test_retry_policy_constants() {
        assert_eq!(RETRY_AFTER_DEFAULT_SECS, 5);
        assert_eq!(RETRY_AFTER_CAP_SECS, 20);
    }

    #[test]
    fn test_room_id_creation() {
        let room = RoomId::new("Y2lzY29...");
        assert_eq!(room.as_str(), "Y2lzY29...");
    }
}
