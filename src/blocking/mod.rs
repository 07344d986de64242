//! Blocking variant of the TeamSpace session.
//!
//! Enabled with the `blocking` cargo feature. The blocking client carries
//! the exact session contract of the async one - bearer auth with header
//! overrides, unbounded 429 retry with the clamped `Retry-After`, lazy
//! `Link`-cursor pagination, and an admission gate bounding in-flight
//! requests across threads - over `reqwest::blocking` I/O.
//!
//! It exposes the generic request and pagination surface rather than the
//! per-resource services; callers pass paths and models directly:
//!
//! ```no_run
//! use teamspace_rs::blocking::TeamSpaceClient;
//! use teamspace_rs::{Credential, Message, NewMessage};
//!
//! # fn example() -> teamspace_rs::Result<()> {
//! let client = TeamSpaceClient::new(Credential::from_env()?)?;
//! let sent: Message = client.post(
//!     "/messages",
//!     &NewMessage::to_room("room-id", "hello from a thread"),
//! )?;
//! # Ok(())
//! # }
//! ```

mod gate;
mod http;
mod paginated;

pub use http::TeamSpaceClient;
pub use paginated::Paginated;
