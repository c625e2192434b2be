//! Event kinds and handler payloads.
//!
//! Event kinds are open string identifiers assigned by the server; the
//! constants below cover the kinds the Decentra protocol currently emits.
//! Handlers registered for an unknown kind simply never fire until the
//! server starts sending it.

use serde_json::Value;

use crate::model::Message;

pub const MESSAGE_CREATE: &str = "message_create";
pub const MESSAGE_UPDATE: &str = "message_update";
pub const MESSAGE_DELETE: &str = "message_delete";
pub const MEMBER_JOIN: &str = "member_join";
pub const MEMBER_LEAVE: &str = "member_leave";
pub const MEMBER_BAN: &str = "member_ban";
pub const REACTION_ADD: &str = "reaction_add";
pub const REACTION_REMOVE: &str = "reaction_remove";
pub const CHANNEL_CREATE: &str = "channel_create";
pub const CHANNEL_UPDATE: &str = "channel_update";
pub const CHANNEL_DELETE: &str = "channel_delete";
pub const ROLE_CREATE: &str = "role_create";
pub const ROLE_UPDATE: &str = "role_update";
pub const SLASH_COMMAND: &str = "slash_command";
pub const BOT_JOINED_SERVER: &str = "bot_joined_server";
pub const BOT_LEFT_SERVER: &str = "bot_left_server";

/// The payload handed to event handlers.
///
/// `message_create` events arrive as a structured [`Message`]; every other
/// kind is delivered as the raw JSON object from the wire, with `server_id`
/// and `channel_id` already injected from the envelope.
#[derive(Debug, Clone)]
pub enum EventPayload {
    /// A structured chat message (`message_create` only).
    Message(Message),
    /// The raw event object for all other kinds.
    Raw(Value),
}

impl EventPayload {
    /// Returns the structured message, if this payload carries one.
    pub fn as_message(&self) -> Option<&Message> {
        match self {
            Self::Message(msg) => Some(msg),
            Self::Raw(_) => None,
        }
    }

    /// Returns the raw JSON object, if this payload carries one.
    pub fn as_raw(&self) -> Option<&Value> {
        match self {
            Self::Message(_) => None,
            Self::Raw(value) => Some(value),
        }
    }
}
