//! Wire envelopes for the Decentra WebSocket protocol.
//!
//! Every frame is a JSON object whose `type` field selects the kind.
//! Decoding is deliberately lenient: the envelope is inspected as raw JSON
//! first, so an unrecognized `type` becomes [`Frame::Other`] instead of a
//! parse failure. Only non-JSON input or a missing `type` is a decode error.

use serde::Serialize;
use serde_json::{Map, Value};

use decentra_core::error::DecodeError;

/// Outbound authentication frame: `{type: "bot_auth", token}`.
#[derive(Debug, Serialize)]
pub struct AuthRequest<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    token: &'a str,
}

impl<'a> AuthRequest<'a> {
    pub fn new(token: &'a str) -> Self {
        Self {
            kind: "bot_auth",
            token,
        }
    }
}

/// A decoded inbound envelope.
#[derive(Debug, Clone)]
pub enum Frame {
    /// `bot_auth_success`: the handshake was accepted.
    AuthSuccess { username: String, bot_id: String },
    /// `error`: the server reports a failure (during the handshake this
    /// means the token was rejected).
    Error { message: String },
    /// `bot_event`: a typed event addressed to the bot.
    Event {
        kind: String,
        server_id: String,
        channel_id: String,
        data: Value,
    },
    /// `pong`: heartbeat acknowledgement.
    Pong,
    /// Any other envelope type.
    Other { kind: String },
}

/// Decodes a raw text frame into a [`Frame`].
pub fn decode_frame(raw: &str) -> Result<Frame, DecodeError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| DecodeError::NotJson(e.to_string()))?;
    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or(DecodeError::MissingType)?;

    let frame = match kind {
        "bot_auth_success" => Frame::AuthSuccess {
            username: str_field(&value, "username"),
            bot_id: str_field(&value, "bot_id"),
        },
        "error" => Frame::Error {
            message: str_field(&value, "message"),
        },
        "bot_event" => Frame::Event {
            kind: str_field(&value, "event"),
            server_id: str_field(&value, "server_id"),
            channel_id: str_field(&value, "channel_id"),
            data: value
                .get("data")
                .cloned()
                .unwrap_or_else(|| Value::Object(Map::new())),
        },
        "pong" => Frame::Pong,
        other => Frame::Other {
            kind: other.to_string(),
        },
    };
    Ok(frame)
}

pub(crate) fn str_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn auth_request_serializes_to_wire_shape() {
        let frame = serde_json::to_value(AuthRequest::new("secret")).unwrap();
        assert_eq!(frame, json!({"type": "bot_auth", "token": "secret"}));
    }

    #[test]
    fn decodes_event_envelope() {
        let raw = r#"{"type":"bot_event","event":"message_create","server_id":"s1","channel_id":"c1","data":{"content":"hi"}}"#;
        match decode_frame(raw).unwrap() {
            Frame::Event {
                kind,
                server_id,
                channel_id,
                data,
            } => {
                assert_eq!(kind, "message_create");
                assert_eq!(server_id, "s1");
                assert_eq!(channel_id, "c1");
                assert_eq!(data["content"], json!("hi"));
            }
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    #[test]
    fn event_without_data_gets_empty_object() {
        let raw = r#"{"type":"bot_event","event":"member_join"}"#;
        match decode_frame(raw).unwrap() {
            Frame::Event { data, .. } => assert_eq!(data, json!({})),
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    #[test]
    fn unknown_type_is_not_an_error() {
        match decode_frame(r#"{"type":"server_notice"}"#).unwrap() {
            Frame::Other { kind } => assert_eq!(kind, "server_notice"),
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    #[test]
    fn malformed_input_is_a_decode_error() {
        assert!(matches!(
            decode_frame("not json at all"),
            Err(DecodeError::NotJson(_))
        ));
        assert!(matches!(
            decode_frame(r#"{"event":"x"}"#),
            Err(DecodeError::MissingType)
        ));
    }
}
