//! Rooms service.

use std::sync::Arc;

use serde::Serialize;

use crate::client::paginated::PaginatedStream;
use crate::client::{query_pairs, ClientInner};
use crate::models::{NewRoom, Room, RoomId, RoomType};
use crate::Result;

/// Service for room operations.
///
/// # Example
///
/// ```no_run
/// # async fn example(client: teamspace_rs::TeamSpaceClient) -> teamspace_rs::Result<()> {
/// let rooms = client.rooms().list(None).await?;
/// for room in rooms {
///     println!("{}: {}", room.id, room.title);
/// }
/// # Ok(())
/// # }
/// ```
pub struct RoomsService {
    inner: Arc<ClientInner>,
}

/// Query parameters for listing rooms.
#[derive(Debug, Default, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomsQuery {
    /// Restrict to rooms of one team.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    /// Restrict to direct or group rooms.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub room_type: Option<RoomType>,
    /// Page size requested from the server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
}

impl RoomsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// List rooms the authenticated user belongs to (first page only).
    pub async fn list(&self, query: Option<RoomsQuery>) -> Result<Vec<Room>> {
        #[derive(serde::Deserialize)]
        struct Response {
            items: Vec<Room>,
        }

        let response: Response = match query {
            Some(q) => self.inner.get_with_query("/rooms", &q).await?,
            None => self.inner.get("/rooms").await?,
        };
        Ok(response.items)
    }

    /// Stream all rooms, following pagination cursors lazily.
    pub fn list_stream(&self, query: Option<RoomsQuery>) -> PaginatedStream<Room> {
        let pairs = match query.as_ref().map(query_pairs).transpose() {
            Ok(pairs) => pairs.unwrap_or_default(),
            Err(e) => return PaginatedStream::failing(self.inner.clone(), e),
        };
        PaginatedStream::new(self.inner.clone(), "/rooms", pairs, None)
    }

    /// Get details for a specific room.
    pub async fn get(&self, room_id: &RoomId) -> Result<Room> {
        self.inner.get(&format!("/rooms/{}", room_id)).await
    }

    /// Create a room.
    pub async fn create(&self, room: NewRoom) -> Result<Room> {
        self.inner.post("/rooms", &room).await
    }

    /// Rename a room.
    pub async fn update(&self, room_id: &RoomId, title: impl Into<String>) -> Result<Room> {
        #[derive(Serialize)]
        struct Update {
            title: String,
        }
        self.inner
            .put(
                &format!("/rooms/{}", room_id),
                &Update {
                    title: title.into(),
                },
            )
            .await
    }

    /// Delete a room.
    pub async fn delete(&self, room_id: &RoomId) -> Result<()> {
        self.inner.delete(&format!("/rooms/{}", room_id)).await
    }
}
