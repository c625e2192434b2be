//! Data models for the Decentra protocol.
//!
//! Every model keeps the raw JSON object it was built from in its `raw`
//! field, so fields the SDK does not (yet) map stay reachable.

use serde::Deserialize;
use serde_json::Value;

/// A chat message.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Message {
    /// Server-assigned message id. Absent on some event payloads.
    pub id: Option<i64>,
    /// Author's username.
    pub username: String,
    /// Message text.
    pub content: String,
    /// Creation timestamp, as the server formats it.
    pub timestamp: String,
    /// Server the message belongs to (injected from the envelope).
    pub server_id: String,
    /// Channel the message belongs to (injected from the envelope).
    pub channel_id: String,
    /// Delivery context (server channel, DM, ...).
    pub context: String,
    /// Identifier within the delivery context.
    pub context_id: String,
    /// Whether the author is a bot.
    pub is_bot: bool,
    /// Last-edit timestamp, if the message was edited.
    pub edited_at: Option<String>,
    /// Reactions attached to the message.
    pub reactions: Vec<Value>,
    /// Attachments carried by the message.
    pub attachments: Vec<Value>,
    /// Usernames mentioned in the message.
    pub mentions: Vec<String>,
    /// Reference to the message this one replies to, if any.
    pub reply_data: Option<Value>,
    /// The source JSON object.
    #[serde(skip)]
    pub raw: Value,
}

impl Message {
    /// Builds a message from an event payload.
    ///
    /// Absent fields take their defaults; a payload with unexpectedly-typed
    /// fields degrades to an empty message. The raw object is preserved
    /// either way.
    pub fn from_event(data: Value) -> Self {
        let mut message: Self = serde_json::from_value(data.clone()).unwrap_or_default();
        message.raw = data;
        message
    }
}

/// A server the bot is a member of.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Server {
    pub server_id: String,
    pub name: String,
    /// The source JSON object.
    #[serde(skip)]
    pub raw: Value,
}

impl Server {
    /// Builds a server record from an API response object.
    pub fn from_value(data: Value) -> Self {
        let mut server: Self = serde_json::from_value(data.clone()).unwrap_or_default();
        server.raw = data;
        server
    }
}

/// A channel in a server.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Channel {
    #[serde(alias = "id")]
    pub channel_id: String,
    pub name: String,
    #[serde(alias = "type")]
    pub channel_type: String,
    pub server_id: String,
    /// The source JSON object.
    #[serde(skip)]
    pub raw: Value,
}

impl Default for Channel {
    fn default() -> Self {
        Self {
            channel_id: String::new(),
            name: String::new(),
            channel_type: "text".to_string(),
            server_id: String::new(),
            raw: Value::Null,
        }
    }
}

impl Channel {
    /// Builds a channel record from an API response object.
    pub fn from_value(data: Value) -> Self {
        let mut channel: Self = serde_json::from_value(data.clone()).unwrap_or_default();
        channel.raw = data;
        channel
    }
}

/// A member of a server.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Member {
    pub username: String,
    pub is_owner: bool,
    pub is_bot: bool,
    pub user_status: String,
    /// The source JSON object.
    #[serde(skip)]
    pub raw: Value,
}

impl Default for Member {
    fn default() -> Self {
        Self {
            username: String::new(),
            is_owner: false,
            is_bot: false,
            user_status: "offline".to_string(),
            raw: Value::Null,
        }
    }
}

impl Member {
    /// Builds a member record from an API response object.
    pub fn from_value(data: Value) -> Self {
        let mut member: Self = serde_json::from_value(data.clone()).unwrap_or_default();
        member.raw = data;
        member
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn message_from_event_preserves_fields_and_defaults() {
        let data = json!({
            "content": "!ping",
            "username": "bob",
            "is_bot": false,
            "server_id": "s1",
            "channel_id": "c1",
        });
        let msg = Message::from_event(data.clone());

        assert_eq!(msg.content, "!ping");
        assert_eq!(msg.username, "bob");
        assert!(!msg.is_bot);
        assert_eq!(msg.server_id, "s1");
        assert_eq!(msg.channel_id, "c1");
        // Absent optional fields fall back to their documented defaults.
        assert_eq!(msg.id, None);
        assert_eq!(msg.edited_at, None);
        assert!(msg.reactions.is_empty());
        assert!(msg.mentions.is_empty());
        assert_eq!(msg.reply_data, None);
        assert_eq!(msg.raw, data);
    }

    #[test]
    fn channel_accepts_aliased_field_names() {
        let chan = Channel::from_value(json!({"id": "c9", "type": "voice", "name": "general"}));
        assert_eq!(chan.channel_id, "c9");
        assert_eq!(chan.channel_type, "voice");

        let chan = Channel::from_value(json!({"channel_id": "c2", "name": "dev"}));
        assert_eq!(chan.channel_id, "c2");
        assert_eq!(chan.channel_type, "text");
    }

    #[test]
    fn member_defaults_to_offline() {
        let member = Member::from_value(json!({"username": "alice"}));
        assert_eq!(member.username, "alice");
        assert_eq!(member.user_status, "offline");
        assert!(!member.is_owner);
    }
}
