//! People service.

use std::sync::Arc;

use serde::Serialize;

use crate::client::paginated::PaginatedStream;
use crate::client::{query_pairs, ClientInner};
use crate::models::{Person, PersonId};
use crate::Result;

/// Service for people lookups.
///
/// # Example
///
/// ```no_run
/// # async fn example(client: teamspace_rs::TeamSpaceClient) -> teamspace_rs::Result<()> {
/// let me = client.people().me().await?;
/// println!("signed in as {:?}", me.display_name);
/// # Ok(())
/// # }
/// ```
pub struct PeopleService {
    inner: Arc<ClientInner>,
}

/// Query parameters for listing people.
#[derive(Debug, Default, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeopleQuery {
    /// Match on a registered email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Match on display name prefix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Page size requested from the server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
}

impl PeopleService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Get the authenticated user's own profile.
    pub async fn me(&self) -> Result<Person> {
        self.inner.get("/people/me").await
    }

    /// List people matching the query (first page only).
    pub async fn list(&self, query: PeopleQuery) -> Result<Vec<Person>> {
        #[derive(serde::Deserialize)]
        struct Response {
            items: Vec<Person>,
        }
        let response: Response = self.inner.get_with_query("/people", &query).await?;
        Ok(response.items)
    }

    /// Stream people matching the query, following pagination cursors
    /// lazily.
    pub fn list_stream(&self, query: PeopleQuery) -> PaginatedStream<Person> {
        let pairs = match query_pairs(&query) {
            Ok(pairs) => pairs,
            Err(e) => return PaginatedStream::failing(self.inner.clone(), e),
        };
        PaginatedStream::new(self.inner.clone(), "/people", pairs, None)
    }

    /// Get a specific person.
    pub async fn get(&self, person_id: &PersonId) -> Result<Person> {
        self.inner.get(&format!("/people/{}", person_id)).await
    }
}
