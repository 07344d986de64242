//! Primitive types and newtypes for type-safe API interactions.
//!
//! Strongly-typed wrappers around string identifiers prevent mixing up
//! different kinds of ids at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new id from a string.
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// Get the id as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

string_id! {
    /// A strongly-typed room identifier.
    ///
    /// # Example
    ///
    /// ```
    /// use teamspace_rs::RoomId;
    ///
    /// let room = RoomId::new("Y2lzY29zcGFyazovL3VzL1JPT00v");
    /// println!("Room: {}", room);
    /// ```
    RoomId
}

string_id! {
    /// A strongly-typed message identifier.
    MessageId
}

string_id! {
    /// A strongly-typed person identifier.
    PersonId
}

string_id! {
    /// A strongly-typed room membership identifier.
    MembershipId
}

string_id! {
    /// A strongly-typed webhook identifier.
    WebhookId
}

/// Environment configuration for the TeamSpace API.
///
/// Determines which API endpoints to use - production or sandbox.
///
/// # Example
///
/// ```
/// use teamspace_rs::Environment;
///
/// let env = Environment::Sandbox;
/// println!("API URL: {}", env.api_base_url());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Production environment.
    #[default]
    Production,
    /// Sandbox environment for integration testing.
    Sandbox,
}

impl Environment {
    /// Get the base URL for REST API requests.
    pub fn api_base_url(&self) -> &'static str {
        match self {
            Environment::Production => "https://api.teamspace.com/v1",
            Environment::Sandbox => "https://sandbox-api.teamspace.com/v1",
        }
    }

    /// Returns `true` if this is the production environment.
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    /// Returns `true` if this is the sandbox environment.
    pub fn is_sandbox(&self) -> bool {
        matches!(self, Environment::Sandbox)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Production => write!(f, "production"),
            Environment::Sandbox => write!(f, "sandbox"),
        }
    }
}
