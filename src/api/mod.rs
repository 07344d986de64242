//! API service modules for TeamSpace endpoints.
//!
//! Each service provides methods for one subset of the TeamSpace API.
//! Services are cheap handles over the shared client; obtain them from
//! the accessor methods on [`TeamSpaceClient`].
//!
//! [`TeamSpaceClient`]: crate::TeamSpaceClient

mod memberships;
mod messages;
mod people;
mod rooms;
mod webhooks;

pub use memberships::{MembershipsQuery, MembershipsService};
pub use messages::{MessagesQuery, MessagesService};
pub use people::{PeopleQuery, PeopleService};
pub use rooms::{RoomsQuery, RoomsService};
pub use webhooks::{WebhooksQuery, WebhooksService};
