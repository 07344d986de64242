//! Post a message to a room given on the command line.
//!
//! Run with:
//!   TEAMSPACE_ACCESS_TOKEN=... cargo run --example send_message -- <room-id> <text>

use teamspace_rs::{Credential, NewMessage, TeamSpaceClient};

#[tokio::main]
async fn main() -> teamspace_rs::Result<()> {
    let mut args = std::env::args().skip(1);
    let room_id = args.next().unwrap_or_else(|| {
        eprintln!("usage: send_message <room-id> <text>");
        std::process::exit(2);
    });
    let text = args.collect::<Vec<_>>().join(" ");

    let client = TeamSpaceClient::new(Credential::from_env()?)?;
    let message = client
        .messages()
        .create(NewMessage::to_room(room_id, text))
        .await?;

    println!("posted message {}", message.id);
    Ok(())
}
