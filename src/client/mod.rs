//! HTTP session layer for the TeamSpace API.
//!
//! [`TeamSpaceClient`] is the main entry point. Every outbound request
//! flows through the same path: admission gate, transport, and the
//! rate-limit retry policy; list endpoints additionally flow through the
//! [`PaginatedStream`] cursor-follower.
//!
//! # Example
//!
//! ```no_run
//! use teamspace_rs::{TeamSpaceClient, Credential};
//!
//! # async fn example() -> teamspace_rs::Result<()> {
//! let client = TeamSpaceClient::new(Credential::from_env()?)?;
//! let rooms = client.rooms().list(None).await?;
//! # Ok(())
//! # }
//! ```

mod config;
pub(crate) mod diagnostics;
pub(crate) mod envelope;
mod http;
mod link;
pub mod paginated;

pub use config::{ClientConfig, DEFAULT_CONCURRENT_REQUESTS};
pub use envelope::{RETRY_AFTER_CAP_SECS, RETRY_AFTER_DEFAULT_SECS};
pub use http::TeamSpaceClient;
pub use link::PageLinks;
pub use paginated::PaginatedStream;

pub(crate) use http::{query_pairs, ClientInner};
#[cfg(feature = "blocking")]
pub(crate) use http::{assemble_headers, Payload, RequestSpec};
