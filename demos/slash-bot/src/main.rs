//! Slash Command Bot
//!
//! Demonstrates command registration and handling: `/hello`, `/roll`,
//! `/info`. Definitions are pushed to the server on every successful
//! connection.

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use decentra_client::{Client, ClientConfig, CommandDefinition, SlashCommandParam, logging};
use tracing::info;

/// Cheap dice roll; a demo bot has no need for a real RNG.
fn roll_d6() -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() as u64)
        .unwrap_or(0);
    nanos % 6 + 1
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = ClientConfig::from_env()?;
    logging::init(config.log_filter.as_deref());

    let client = Client::new(config);

    client.command(
        CommandDefinition::new("hello", "Say hello to someone!")
            .param(SlashCommandParam::new("name", "Who to greet")),
        |ctx| async move {
            let name = ctx.arg("name").unwrap_or(&ctx.user).to_string();
            ctx.reply(&format!("Hello, {name}! 👋")).await?;
            Ok(())
        },
    );

    client.command(
        CommandDefinition::new("roll", "Roll a dice (1-6)"),
        |ctx| async move {
            ctx.reply(&format!("🎲 {} rolled a **{}**!", ctx.user, roll_d6()))
                .await?;
            Ok(())
        },
    );

    client.command(
        CommandDefinition::new("info", "Show bot info"),
        |ctx| async move {
            let servers = ctx.client().servers().await?;
            ctx.reply(&format!(
                "🤖 **Slash Command Bot**\nActive in {} server(s)\nCommands: /hello, /roll, /info",
                servers.len()
            ))
            .await?;
            Ok(())
        },
    );

    let stopper = client.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
            stopper.stop();
        }
    });

    info!("starting slash command bot");
    client.run().await?;
    Ok(())
}
