//! Room memberships service.

use std::sync::Arc;

use serde::Serialize;

use crate::client::paginated::PaginatedStream;
use crate::client::{query_pairs, ClientInner};
use crate::models::{Membership, MembershipId, NewMembership, PersonId, RoomId};
use crate::Result;

/// Service for room membership operations.
///
/// # Example
///
/// ```no_run
/// use teamspace_rs::{MembershipsQuery, RoomId};
///
/// # async fn example(client: teamspace_rs::TeamSpaceClient) -> teamspace_rs::Result<()> {
/// let query = MembershipsQuery {
///     room_id: Some(RoomId::new("room-id")),
///     ..Default::default()
/// };
/// for member in client.memberships().list(query).await? {
///     println!("{:?}", member.person_display_name);
/// }
/// # Ok(())
/// # }
/// ```
pub struct MembershipsService {
    inner: Arc<ClientInner>,
}

/// Query parameters for listing memberships.
#[derive(Debug, Default, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipsQuery {
    /// Restrict to one room.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_id: Option<RoomId>,
    /// Restrict to one person, by id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person_id: Option<PersonId>,
    /// Restrict to one person, by email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person_email: Option<String>,
    /// Page size requested from the server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
}

impl MembershipsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// List memberships matching the query (first page only).
    pub async fn list(&self, query: MembershipsQuery) -> Result<Vec<Membership>> {
        #[derive(serde::Deserialize)]
        struct Response {
            items: Vec<Membership>,
        }
        let response: Response = self.inner.get_with_query("/memberships", &query).await?;
        Ok(response.items)
    }

    /// Stream memberships, following pagination cursors lazily.
    pub fn list_stream(&self, query: MembershipsQuery) -> PaginatedStream<Membership> {
        let pairs = match query_pairs(&query) {
            Ok(pairs) => pairs,
            Err(e) => return PaginatedStream::failing(self.inner.clone(), e),
        };
        PaginatedStream::new(self.inner.clone(), "/memberships", pairs, None)
    }

    /// Get a specific membership.
    pub async fn get(&self, membership_id: &MembershipId) -> Result<Membership> {
        self.inner
            .get(&format!("/memberships/{}", membership_id))
            .await
    }

    /// Add a person to a room.
    pub async fn create(&self, membership: NewMembership) -> Result<Membership> {
        self.inner.post("/memberships", &membership).await
    }

    /// Change a member's moderator flag.
    pub async fn update(
        &self,
        membership_id: &MembershipId,
        is_moderator: bool,
    ) -> Result<Membership> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Update {
            is_moderator: bool,
        }
        self.inner
            .put(
                &format!("/memberships/{}", membership_id),
                &Update { is_moderator },
            )
            .await
    }

    /// Remove a person from a room.
    pub async fn delete(&self, membership_id: &MembershipId) -> Result<()> {
        self.inner
            .delete(&format!("/memberships/{}", membership_id))
            .await
    }
}
