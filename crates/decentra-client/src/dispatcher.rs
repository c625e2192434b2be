//! Frame classification and handler fan-out.
//!
//! Called once per inbound frame from the streaming phase. Nothing here
//! terminates the stream: undecodable frames are skipped, handler errors are
//! contained and logged, unknown envelope types are ignored.

use serde_json::Value;
use tracing::{debug, error, trace, warn};

use decentra_core::{EventPayload, Message, event};

use crate::client::Client;
use crate::context::CommandContext;
use crate::protocol::{Frame, decode_frame, str_field};

impl Client {
    /// Decodes and routes one raw frame.
    pub(crate) async fn dispatch_frame(&self, raw: &str) {
        let frame = match decode_frame(raw) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(error = %e, "skipping undecodable frame");
                return;
            }
        };

        match frame {
            Frame::Event {
                kind,
                server_id,
                channel_id,
                mut data,
            } => {
                // The envelope's routing ids are not necessarily present in
                // the payload itself.
                if let Value::Object(map) = &mut data {
                    map.insert("server_id".to_string(), Value::String(server_id));
                    map.insert("channel_id".to_string(), Value::String(channel_id));
                }

                if kind == event::SLASH_COMMAND {
                    self.dispatch_command(data).await;
                } else {
                    self.dispatch_event(&kind, data).await;
                }
            }
            Frame::Pong => trace!("heartbeat acknowledged"),
            Frame::AuthSuccess { .. } => debug!("ignoring auth frame outside handshake"),
            Frame::Error { message } => debug!(%message, "ignoring server error frame"),
            Frame::Other { kind } => debug!(%kind, "unhandled envelope type"),
        }
    }

    /// Routes a `slash_command` event to its single registered handler.
    ///
    /// An unknown command name is dropped silently; a handler error is
    /// logged with the command name and does not propagate.
    async fn dispatch_command(&self, data: Value) {
        let name = data
            .get("command")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let handler = self.inner.commands.read().handler_for(&name);
        let Some(handler) = handler else {
            debug!(command = %name, "no handler for slash command");
            return;
        };

        let ctx = CommandContext {
            command_name: name.clone(),
            arguments: data
                .get("arguments")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default(),
            user: str_field(&data, "user"),
            server_id: str_field(&data, "server_id"),
            channel_id: str_field(&data, "channel_id"),
            client: self.clone(),
        };

        debug!(command = %name, user = %ctx.user, "dispatching slash command");
        if let Err(e) = handler(ctx).await {
            error!(command = %name, error = ?e, "slash command handler failed");
        }
    }

    /// Fans an event out to every handler registered for its kind, in
    /// registration order. One handler's error never skips the rest.
    async fn dispatch_event(&self, kind: &str, data: Value) {
        let handlers = {
            let table = self.inner.handlers.read();
            table.get(kind).cloned()
        }
        .unwrap_or_default();

        if handlers.is_empty() {
            trace!(event = %kind, "no handlers registered");
            return;
        }

        let payload = if kind == event::MESSAGE_CREATE {
            EventPayload::Message(Message::from_event(data))
        } else {
            EventPayload::Raw(data)
        };

        for (index, handler) in handlers.iter().enumerate() {
            if let Err(e) = handler(self.clone(), payload.clone()).await {
                error!(event = %kind, handler = index, error = ?e, "event handler failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use decentra_core::CommandDefinition;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn client() -> Client {
        Client::new(ClientConfig::new("https://chat.example.org", "tok").unwrap())
    }

    #[tokio::test]
    async fn handler_error_does_not_abort_later_handlers() {
        let client = client();
        let order = Arc::new(Mutex::new(Vec::new()));

        for (label, fails) in [("first", false), ("second", true), ("third", false)] {
            let order = Arc::clone(&order);
            client.on_event(event::MEMBER_JOIN, move |_client, _payload| {
                let order = Arc::clone(&order);
                async move {
                    order.lock().push(label);
                    if fails {
                        anyhow::bail!("handler blew up");
                    }
                    Ok(())
                }
            });
        }

        client
            .dispatch_frame(
                r#"{"type":"bot_event","event":"member_join","server_id":"s","channel_id":"c","data":{"username":"eve"}}"#,
            )
            .await;

        assert_eq!(*order.lock(), ["first", "second", "third"]);
    }

    #[tokio::test]
    async fn malformed_frames_are_skipped() {
        let client = client();
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        client.on_message(move |_client, _msg| {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        client.dispatch_frame("this is not json").await;
        client.dispatch_frame(r#"{"event":"missing type"}"#).await;
        client
            .dispatch_frame(
                r#"{"type":"bot_event","event":"message_create","server_id":"s","channel_id":"c","data":{"content":"still alive"}}"#,
            )
            .await;

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn message_payload_is_structured_with_injected_ids() {
        let client = client();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        client.on_message(move |_client, msg| {
            let sink = Arc::clone(&sink);
            async move {
                sink.lock().push(msg);
                Ok(())
            }
        });

        client
            .dispatch_frame(
                r#"{"type":"bot_event","event":"message_create","server_id":"s1","channel_id":"c1","data":{"content":"!ping","username":"bob","is_bot":false}}"#,
            )
            .await;

        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        let msg = &seen[0];
        assert_eq!(msg.content, "!ping");
        assert_eq!(msg.username, "bob");
        assert!(!msg.is_bot);
        assert_eq!(msg.server_id, "s1");
        assert_eq!(msg.channel_id, "c1");
        assert_eq!(msg.edited_at, None);
    }

    #[tokio::test]
    async fn other_kinds_get_the_raw_payload() {
        let client = client();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        client.on_reaction(move |_client, data| {
            let sink = Arc::clone(&sink);
            async move {
                sink.lock().push(data);
                Ok(())
            }
        });

        client
            .dispatch_frame(
                r#"{"type":"bot_event","event":"reaction_add","server_id":"s1","channel_id":"c1","data":{"emoji":"👍"}}"#,
            )
            .await;

        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0]["emoji"], "👍");
        assert_eq!(seen[0]["server_id"], "s1");
        assert_eq!(seen[0]["channel_id"], "c1");
    }

    #[tokio::test]
    async fn known_command_invoked_once_with_context() {
        let client = client();
        let invocations = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&invocations);
        client.command(CommandDefinition::new("ping", "Pong"), move |ctx| {
            let sink = Arc::clone(&sink);
            async move {
                sink.lock()
                    .push((ctx.user.clone(), ctx.server_id.clone(), ctx.channel_id.clone()));
                Ok(())
            }
        });

        client
            .dispatch_frame(
                r#"{"type":"bot_event","event":"slash_command","server_id":"s1","channel_id":"c1","data":{"command":"ping","arguments":{},"user":"alice"}}"#,
            )
            .await;

        let invocations = invocations.lock();
        assert_eq!(invocations.len(), 1);
        assert_eq!(
            invocations[0],
            ("alice".to_string(), "s1".to_string(), "c1".to_string())
        );
    }

    #[tokio::test]
    async fn unknown_command_is_dropped_silently() {
        let client = client();
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        client.command(CommandDefinition::new("ping", "Pong"), move |_ctx| {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        client
            .dispatch_frame(
                r#"{"type":"bot_event","event":"slash_command","server_id":"s1","channel_id":"c1","data":{"command":"unknown","arguments":{},"user":"alice"}}"#,
            )
            .await;

        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn command_handler_error_is_contained() {
        let client = client();
        client.command(CommandDefinition::new("boom", "Fails"), |_ctx| async {
            anyhow::bail!("nope")
        });

        // Must not panic or propagate.
        client
            .dispatch_frame(
                r#"{"type":"bot_event","event":"slash_command","server_id":"s","channel_id":"c","data":{"command":"boom","arguments":{},"user":"u"}}"#,
            )
            .await;
    }
}
