//! Authentication for the TeamSpace API.
//!
//! The client authenticates every request with a bearer access token held
//! in a [`Credential`]. Tokens are obtained out of band (developer portal,
//! OAuth integration, bot token) and supplied directly or through the
//! `TEAMSPACE_ACCESS_TOKEN` environment variable:
//!
//! ```no_run
//! use teamspace_rs::Credential;
//!
//! # fn example() -> teamspace_rs::Result<()> {
//! let cred = Credential::from_env()?;
//! # Ok(())
//! # }
//! ```
//!
//! Token refresh is deliberately out of scope: a caller that refreshes its
//! token builds a new [`Credential`] and swaps it into the running client.

mod credential;

pub use credential::{Credential, ACCESS_TOKEN_ENV};
