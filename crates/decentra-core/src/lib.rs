//! # Decentra Core
//!
//! Protocol-independent building blocks for the Decentra bot SDK:
//!
//! - **Error taxonomy**: transport, authentication, decode and API errors
//!   ([`TransportError`], [`AuthError`], [`DecodeError`], [`ApiError`])
//! - **Event system**: event-kind constants and the payload handed to
//!   handlers ([`EventPayload`])
//! - **Data models**: [`Message`], [`Server`], [`Channel`], [`Member`]
//! - **Slash commands**: externally-advertised definitions
//!   ([`CommandDefinition`], [`SlashCommandParam`])
//!
//! The connection and dispatch machinery lives in `decentra-client`; this
//! crate carries only the types both sides of that machinery agree on.

pub mod command;
pub mod error;
pub mod event;
pub mod model;

pub use command::{CommandDefinition, SlashCommandParam};
pub use error::{ApiError, AuthError, DecodeError, TransportError};
pub use event::EventPayload;
pub use model::{Channel, Member, Message, Server};
