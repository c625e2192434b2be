//! # Decentra Client
//!
//! The connection/event-dispatch core of the Decentra bot SDK: a long-lived,
//! self-healing WebSocket connection that authenticates, routes typed events
//! to registered handlers (with a carved-out slash-command path), and an
//! independent REST action client sharing the same token and endpoint.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────┐   frames   ┌────────────┐   payloads   ┌──────────┐
//! │ WsTransport   │──────────▶│ Dispatcher │─────────────▶│ Handlers │
//! │ (Session)     │            │            │──commands──▶│ Commands │
//! └───────▲───────┘            └────────────┘              └────┬─────┘
//!         │ reconnect w/ backoff                                │ actions
//! ┌───────┴───────┐                                       ┌─────▼─────┐
//! │  Supervisor   │                                       │ ApiClient │
//! │ (Client::run) │                                       │  (REST)   │
//! └───────────────┘                                       └───────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use decentra_client::{Client, ClientConfig};
//! use decentra_core::CommandDefinition;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ClientConfig::from_env()?;
//! decentra_client::logging::init(config.log_filter.as_deref());
//!
//! let client = Client::new(config);
//!
//! client.on_message(|client, msg| async move {
//!     if msg.content == "!ping" && !msg.is_bot {
//!         client.send_message(&msg.server_id, &msg.channel_id, "Pong!").await?;
//!     }
//!     Ok(())
//! });
//!
//! client.command(CommandDefinition::new("ping", "Pong!"), |ctx| async move {
//!     ctx.reply("Pong!").await?;
//!     Ok(())
//! });
//!
//! client.run().await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod context;
mod dispatcher;
pub mod error;
pub mod logging;
pub mod protocol;
pub mod registry;
pub mod transport;

pub use api::ApiClient;
pub use auth::{AuthOutcome, BotIdentity};
pub use client::{AUTH_RETRY_DELAY, Client, EventHandler, EventPayload, RECONNECT_DELAY};
pub use config::ClientConfig;
pub use context::CommandContext;
pub use error::{ClientError, ConfigError};
pub use registry::{CommandHandler, CommandRegistry};
pub use transport::{Session, Transport, WsTransport};

// Re-export the core types bot code touches constantly.
pub use decentra_core::{
    Channel, CommandDefinition, Member, Message, Server, SlashCommandParam, event,
};
