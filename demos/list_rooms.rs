//! List every room the authenticated user belongs to.
//!
//! Run with: TEAMSPACE_ACCESS_TOKEN=... cargo run --example list_rooms

use futures_util::StreamExt;
use teamspace_rs::{Credential, TeamSpaceClient};

#[tokio::main]
async fn main() -> teamspace_rs::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let client = TeamSpaceClient::new(Credential::from_env()?)?;

    let mut rooms = client.rooms().list_stream(None);
    let mut count = 0usize;
    while let Some(room) = rooms.next().await {
        let room = room?;
        println!("{}  {}", room.id, room.title);
        count += 1;
    }
    println!("{} rooms", count);

    Ok(())
}
