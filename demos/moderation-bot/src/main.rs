//! Moderation Bot
//!
//! Deletes messages containing filtered words and tracks per-server warning
//! counts through `/warn`, `/warnings` and `/serverinfo`.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use decentra_client::{Client, ClientConfig, CommandDefinition, SlashCommandParam, logging};
use parking_lot::Mutex;
use tracing::info;

const BAD_WORDS: &[&str] = &["spam", "badword"];

/// Warning counts: server id -> username -> count. In-process only.
type Warnings = Arc<Mutex<HashMap<String, HashMap<String, u32>>>>;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ClientConfig::from_env()?;
    logging::init(config.log_filter.as_deref());

    let client = Client::new(config);
    let warnings: Warnings = Arc::new(Mutex::new(HashMap::new()));

    client.on_message(|client, msg| async move {
        if msg.is_bot {
            return Ok(());
        }

        let content = msg.content.to_lowercase();
        if BAD_WORDS.iter().any(|word| content.contains(word))
            && let Some(id) = msg.id
        {
            client.delete_message(id).await?;
            client
                .send_message(
                    &msg.server_id,
                    &msg.channel_id,
                    &format!(
                        "⚠️ Message from **{}** was removed (content policy).",
                        msg.username
                    ),
                )
                .await?;
        }
        Ok(())
    });

    let warns = Arc::clone(&warnings);
    client.command(
        CommandDefinition::new("warn", "Issue a warning to a user")
            .param(SlashCommandParam::new("user", "Who to warn").required(true)),
        move |ctx| {
            let warns = Arc::clone(&warns);
            async move {
                let Some(target) = ctx.arg("user").map(str::to_string) else {
                    ctx.reply("Usage: /warn <username>").await?;
                    return Ok(());
                };

                let count = {
                    let mut warns = warns.lock();
                    let server = warns.entry(ctx.server_id.clone()).or_default();
                    let count = server.entry(target.clone()).or_insert(0);
                    *count += 1;
                    *count
                };

                ctx.reply(&format!(
                    "⚠️ **{target}** has been warned. (Total warnings: {count})"
                ))
                .await?;
                Ok(())
            }
        },
    );

    let warns = Arc::clone(&warnings);
    client.command(
        CommandDefinition::new("warnings", "Check warning count for a user")
            .param(SlashCommandParam::new("user", "Who to look up")),
        move |ctx| {
            let warns = Arc::clone(&warns);
            async move {
                let target = ctx.arg("user").unwrap_or(&ctx.user).to_string();
                let count = warns
                    .lock()
                    .get(&ctx.server_id)
                    .and_then(|server| server.get(&target))
                    .copied()
                    .unwrap_or(0);
                ctx.reply(&format!("📋 **{target}** has {count} warning(s)."))
                    .await?;
                Ok(())
            }
        },
    );

    client.command(
        CommandDefinition::new("serverinfo", "Show server information"),
        |ctx| async move {
            let members = ctx.client().members(&ctx.server_id).await?;
            let channels = ctx.client().channels(&ctx.server_id).await?;
            let bots = members.iter().filter(|m| m.is_bot).count();
            let humans = members.len() - bots;

            ctx.reply(&format!(
                "📊 **Server Info**\nMembers: {humans} humans, {bots} bots\nChannels: {}",
                channels.len()
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

    info!("starting moderation bot");
    client.run().await?;
    Ok(())
}
