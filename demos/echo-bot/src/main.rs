//! Echo Bot
//!
//! Replies to `!ping` and echoes `!echo <text>` messages.
//!
//! ```bash
//! DECENTRA_INSTANCE_URL=https://chat.example.org \
//! DECENTRA_BOT_TOKEN=... \
//! cargo run --package echo-bot
//! ```

use anyhow::Result;
use decentra_client::{Client, ClientConfig, Message, logging};
use tracing::info;

async fn handle_message(client: Client, msg: Message) -> Result<()> {
    // Ignore messages from bots (including ourselves).
    if msg.is_bot {
        return Ok(());
    }

    if msg.content.trim() == "!ping" {
        client
            .send_message(&msg.server_id, &msg.channel_id, "Pong! 🏓")
            .await?;
    } else if let Some(text) = msg.content.strip_prefix("!echo ") {
        let text = text.trim();
        if !text.is_empty() {
            client
                .send_message(&msg.server_id, &msg.channel_id, text)
                .await?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = ClientConfig::from_env()?;
    logging::init(config.log_filter.as_deref());

    let client = Client::new(config);
    client.on_message(handle_message);

    let stopper = client.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
            stopper.stop();
        }
    });

    info!("starting echo bot");
    client.run().await?;
    Ok(())
}
