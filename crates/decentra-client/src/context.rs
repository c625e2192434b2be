//! Slash-command invocation context.

use serde_json::{Map, Value};

use decentra_core::ApiError;

use crate::client::Client;

/// Everything a slash-command handler needs about one invocation, built
/// fresh by the dispatcher and discarded when the handler returns.
#[derive(Clone)]
pub struct CommandContext {
    /// The invoked command's name.
    pub command_name: String,
    /// Argument values keyed by parameter name.
    pub arguments: Map<String, Value>,
    /// Username of the invoking user.
    pub user: String,
    /// Server the command was invoked in.
    pub server_id: String,
    /// Channel the command was invoked in.
    pub channel_id: String,
    pub(crate) client: Client,
}

impl CommandContext {
    /// Returns an argument as a string, if present.
    pub fn arg(&self, name: &str) -> Option<&str> {
        self.arguments.get(name).and_then(Value::as_str)
    }

    /// Sends a reply message into the invoking channel.
    ///
    /// Returns `Ok(None)` when the invocation carried no server/channel ids
    /// to reply into.
    pub async fn reply(&self, content: &str) -> Result<Option<Value>, ApiError> {
        if self.server_id.is_empty() || self.channel_id.is_empty() {
            return Ok(None);
        }
        self.client
            .send_message(&self.server_id, &self.channel_id, content)
            .await
            .map(Some)
    }

    /// The client that received this invocation, for issuing further actions.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

impl std::fmt::Debug for CommandContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandContext")
            .field("command_name", &self.command_name)
            .field("user", &self.user)
            .field("server_id", &self.server_id)
            .field("channel_id", &self.channel_id)
            .finish_non_exhaustive()
    }
}
