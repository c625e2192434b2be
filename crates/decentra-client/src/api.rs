//! The request/response action client.
//!
//! Each action is a stateless request: method + path (+ body), a
//! `Authorization: Bot <token>` header, one response parsed as JSON. A
//! status >= 400 is logged as an API error but the parsed body is still
//! returned; callers inspect the payload for success/failure fields.
//!
//! The pooled `reqwest::Client` is created lazily, reused across calls and
//! recreated if [`ApiClient::close`] ran in between.

use parking_lot::Mutex;
use reqwest::Method;
use reqwest::header::AUTHORIZATION;
use serde_json::{Value, json};
use tracing::{debug, error};

use decentra_core::{ApiError, Channel, CommandDefinition, Member, Message, Server};

use crate::config::ClientConfig;

/// Default page size for [`ApiClient::messages`].
pub const DEFAULT_MESSAGE_LIMIT: u32 = 50;

/// REST client for the `/api/bot` surface.
pub struct ApiClient {
    config: ClientConfig,
    http: Mutex<Option<reqwest::Client>>,
}

impl ApiClient {
    pub(crate) fn new(config: &ClientConfig) -> Self {
        Self {
            config: config.clone(),
            http: Mutex::new(None),
        }
    }

    /// Returns the pooled HTTP client, building it on first use or after a
    /// [`close`](Self::close).
    fn pooled(&self) -> Result<reqwest::Client, ApiError> {
        let mut guard = self.http.lock();
        if let Some(client) = guard.as_ref() {
            return Ok(client.clone());
        }
        // Same trust relaxation as the WebSocket transport: self-signed
        // instance certificates are accepted.
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(|e| ApiError::Request(e.to_string()))?;
        *guard = Some(client.clone());
        Ok(client)
    }

    /// Drops the pooled connector. Idempotent; the next call recreates it.
    pub(crate) fn close(&self) {
        *self.http.lock() = None;
    }

    #[cfg(test)]
    pub(crate) fn is_closed(&self) -> bool {
        self.http.lock().is_none()
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        let client = self.pooled()?;
        let url = self.config.api_url(path);

        let mut request = client
            .request(method.clone(), &url)
            .header(AUTHORIZATION, format!("Bot {}", self.config.token));
        if let Some(body) = &body {
            request = request.json(body);
        }

        debug!(%method, %path, "API request");
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;
        let status = response.status();
        let data: Value = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidBody(e.to_string()))?;

        if status.as_u16() >= 400 {
            error!(%method, %path, status = status.as_u16(), body = %data, "API error");
        }
        Ok(data)
    }

    /// Sends a message to a server channel.
    pub async fn send_message(
        &self,
        server_id: &str,
        channel_id: &str,
        content: &str,
    ) -> Result<Value, ApiError> {
        self.request(
            Method::POST,
            "/api/bot/messages",
            Some(json!({
                "server_id": server_id,
                "channel_id": channel_id,
                "content": content,
            })),
        )
        .await
    }

    /// Edits a message the bot sent.
    pub async fn edit_message(&self, message_id: i64, content: &str) -> Result<Value, ApiError> {
        self.request(
            Method::PUT,
            &format!("/api/bot/messages/{message_id}"),
            Some(json!({"content": content})),
        )
        .await
    }

    /// Deletes a message.
    pub async fn delete_message(&self, message_id: i64) -> Result<Value, ApiError> {
        self.request(
            Method::DELETE,
            &format!("/api/bot/messages/{message_id}"),
            None,
        )
        .await
    }

    /// Lists the servers the bot is a member of.
    pub async fn servers(&self) -> Result<Vec<Server>, ApiError> {
        let data = self.request(Method::GET, "/api/bot/servers", None).await?;
        Ok(array_field(&data, "servers", Server::from_value))
    }

    /// Lists the channels in a server.
    pub async fn channels(&self, server_id: &str) -> Result<Vec<Channel>, ApiError> {
        let data = self
            .request(
                Method::GET,
                &format!("/api/bot/servers/{server_id}/channels"),
                None,
            )
            .await?;
        Ok(array_field(&data, "channels", Channel::from_value))
    }

    /// Lists the members of a server.
    pub async fn members(&self, server_id: &str) -> Result<Vec<Member>, ApiError> {
        let data = self
            .request(
                Method::GET,
                &format!("/api/bot/servers/{server_id}/members"),
                None,
            )
            .await?;
        Ok(array_field(&data, "members", Member::from_value))
    }

    /// Fetches the most recent page of messages from a channel, using
    /// [`DEFAULT_MESSAGE_LIMIT`].
    pub async fn recent_messages(
        &self,
        server_id: &str,
        channel_id: &str,
    ) -> Result<Vec<Message>, ApiError> {
        self.messages(server_id, channel_id, DEFAULT_MESSAGE_LIMIT).await
    }

    /// Fetches recent messages from a channel, newest page first.
    pub async fn messages(
        &self,
        server_id: &str,
        channel_id: &str,
        limit: u32,
    ) -> Result<Vec<Message>, ApiError> {
        let data = self
            .request(
                Method::GET,
                &format!("/api/bot/servers/{server_id}/channels/{channel_id}/messages?limit={limit}"),
                None,
            )
            .await?;
        Ok(array_field(&data, "messages", Message::from_event))
    }

    /// Adds a reaction to a message.
    pub async fn add_reaction(&self, message_id: i64, emoji: &str) -> Result<Value, ApiError> {
        self.request(
            Method::POST,
            &format!("/api/bot/messages/{message_id}/reactions"),
            Some(json!({"emoji": emoji})),
        )
        .await
    }

    /// Advertises the slash-command definitions to the server.
    pub async fn register_commands(
        &self,
        definitions: &[CommandDefinition],
    ) -> Result<Value, ApiError> {
        self.request(
            Method::POST,
            "/api/bot/commands",
            Some(json!({"commands": definitions})),
        )
        .await
    }
}

fn array_field<T>(data: &Value, key: &str, convert: impl Fn(Value) -> T) -> Vec<T> {
    data.get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter().cloned().map(convert).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api() -> ApiClient {
        let config = ClientConfig::new("https://chat.example.org", "tok").unwrap();
        ApiClient::new(&config)
    }

    #[test]
    fn pooled_client_is_reused_and_recreated_after_close() {
        let api = api();
        assert!(api.is_closed());
        api.pooled().unwrap();
        assert!(!api.is_closed());

        api.close();
        api.close();
        assert!(api.is_closed());

        api.pooled().unwrap();
        assert!(!api.is_closed());
    }

    #[test]
    fn default_message_page_size_is_fifty() {
        assert_eq!(DEFAULT_MESSAGE_LIMIT, 50);
    }

    #[test]
    fn array_field_tolerates_missing_or_mistyped_keys() {
        let data = json!({"servers": [{"server_id": "s1", "name": "Home"}]});
        let servers = array_field(&data, "servers", Server::from_value);
        assert_eq!(servers.len(), 1);
        assert_eq!(servers[0].server_id, "s1");

        assert!(array_field(&json!({}), "servers", Server::from_value).is_empty());
        assert!(array_field(&json!({"servers": 3}), "servers", Server::from_value).is_empty());
    }
}
