//! The client facade: registration API, connection lifecycle, reconnection
//! supervision.
//!
//! One [`Client`] owns one connection. The supervisor loop in [`Client::run`]
//! drives the per-attempt state machine (connect, authenticate, register
//! commands, stream) and applies a failure-specific backoff between
//! attempts. It never gives up on its own; only [`Client::stop`] ends it.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures::future::BoxFuture;
use parking_lot::RwLock;
use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use decentra_core::{
    ApiError, Channel, CommandDefinition, Member, Message, Server, event,
};

use crate::api::ApiClient;
use crate::auth::authenticate;
use crate::config::ClientConfig;
use crate::context::CommandContext;
use crate::error::ClientError;
use crate::registry::{CommandHandler, CommandRegistry};
use crate::transport::{Transport, WsTransport};

pub use decentra_core::EventPayload;

/// Backoff after a clean transport close or an unexpected failure.
pub const RECONNECT_DELAY: Duration = Duration::from_secs(5);
/// Backoff after an authentication rejection. Longer, because auth failures
/// are more likely persistent (bad or rotated token).
pub const AUTH_RETRY_DELAY: Duration = Duration::from_secs(10);

/// An event callback. Many may subscribe to the same kind; they run
/// sequentially in registration order.
pub type EventHandler =
    Arc<dyn Fn(Client, EventPayload) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

/// How one connection attempt's streaming phase ended without error.
#[derive(Debug)]
pub(crate) enum StreamEnd {
    /// The running flag was cleared by an explicit stop.
    Stopped,
    /// The remote side closed the stream.
    RemoteClosed,
}

/// A Decentra bot client.
///
/// Cheap to clone; all clones share the same connection, handler table and
/// command registry.
///
/// ```no_run
/// use decentra_client::{Client, ClientConfig};
///
/// # async fn example() -> anyhow::Result<()> {
/// let client = Client::new(ClientConfig::from_env()?);
///
/// client.on_message(|client, msg| async move {
///     if msg.content == "!ping" {
///         client.send_message(&msg.server_id, &msg.channel_id, "Pong!").await?;
///     }
///     Ok(())
/// });
///
/// client.run().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub(crate) config: ClientConfig,
    pub(crate) api: ApiClient,
    transport: Box<dyn Transport>,
    pub(crate) handlers: RwLock<HashMap<String, Vec<EventHandler>>>,
    pub(crate) commands: RwLock<CommandRegistry>,
    running: AtomicBool,
    shutdown: watch::Sender<bool>,
}

impl Client {
    /// Creates a client over the default WebSocket transport.
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, Box::new(WsTransport::new()))
    }

    /// Creates a client over a custom transport.
    pub fn with_transport(config: ClientConfig, transport: Box<dyn Transport>) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            inner: Arc::new(ClientInner {
                api: ApiClient::new(&config),
                config,
                transport,
                handlers: RwLock::new(HashMap::new()),
                commands: RwLock::new(CommandRegistry::default()),
                running: AtomicBool::new(false),
                shutdown,
            }),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Whether the supervisor loop is (supposed to be) active.
    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::SeqCst)
    }

    // ── Handler registration ────────────────────────────────────────────

    /// Registers a handler for an event kind.
    ///
    /// Handlers for the same kind run sequentially in registration order;
    /// an error returned by one is logged and does not stop the others.
    pub fn on_event<F, Fut>(&self, kind: impl Into<String>, handler: F)
    where
        F: Fn(Client, EventPayload) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let handler: EventHandler =
            Arc::new(move |client, payload| Box::pin(handler(client, payload)));
        self.inner
            .handlers
            .write()
            .entry(kind.into())
            .or_default()
            .push(handler);
    }

    /// Registers a `message_create` handler receiving the structured
    /// [`Message`].
    pub fn on_message<F, Fut>(&self, handler: F)
    where
        F: Fn(Client, Message) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.on_event(event::MESSAGE_CREATE, move |client, payload| {
            let fut = match payload {
                EventPayload::Message(msg) => Some(handler(client, msg)),
                EventPayload::Raw(_) => None,
            };
            async move {
                match fut {
                    Some(fut) => fut.await,
                    None => Ok(()),
                }
            }
        });
    }

    /// Registers a `member_join` handler.
    pub fn on_member_join<F, Fut>(&self, handler: F)
    where
        F: Fn(Client, Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.on_raw(event::MEMBER_JOIN, handler);
    }

    /// Registers a `member_leave` handler.
    pub fn on_member_leave<F, Fut>(&self, handler: F)
    where
        F: Fn(Client, Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.on_raw(event::MEMBER_LEAVE, handler);
    }

    /// Registers a `reaction_add` handler.
    pub fn on_reaction<F, Fut>(&self, handler: F)
    where
        F: Fn(Client, Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.on_raw(event::REACTION_ADD, handler);
    }

    fn on_raw<F, Fut>(&self, kind: &str, handler: F)
    where
        F: Fn(Client, Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.on_event(kind, move |client, payload| {
            let value = match payload {
                EventPayload::Raw(value) => value,
                EventPayload::Message(msg) => msg.raw,
            };
            handler(client, value)
        });
    }

    /// Registers a slash command: its advertised definition and its handler.
    ///
    /// Re-registering a name silently replaces the earlier registration.
    pub fn command<F, Fut>(&self, definition: CommandDefinition, handler: F)
    where
        F: Fn(CommandContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let handler: CommandHandler = Arc::new(move |ctx| Box::pin(handler(ctx)));
        self.inner.commands.write().register(definition, handler);
    }

    // ── Actions (REST) ──────────────────────────────────────────────────

    /// Sends a message to a server channel.
    pub async fn send_message(
        &self,
        server_id: &str,
        channel_id: &str,
        content: &str,
    ) -> Result<Value, ApiError> {
        self.inner.api.send_message(server_id, channel_id, content).await
    }

    /// Edits a message the bot sent.
    pub async fn edit_message(&self, message_id: i64, content: &str) -> Result<Value, ApiError> {
        self.inner.api.edit_message(message_id, content).await
    }

    /// Deletes a message.
    pub async fn delete_message(&self, message_id: i64) -> Result<Value, ApiError> {
        self.inner.api.delete_message(message_id).await
    }

    /// Lists the servers the bot is a member of.
    pub async fn servers(&self) -> Result<Vec<Server>, ApiError> {
        self.inner.api.servers().await
    }

    /// Lists the channels in a server.
    pub async fn channels(&self, server_id: &str) -> Result<Vec<Channel>, ApiError> {
        self.inner.api.channels(server_id).await
    }

    /// Lists the members of a server.
    pub async fn members(&self, server_id: &str) -> Result<Vec<Member>, ApiError> {
        self.inner.api.members(server_id).await
    }

    /// Fetches the most recent page of messages from a channel, using
    /// [`crate::api::DEFAULT_MESSAGE_LIMIT`].
    pub async fn recent_messages(
        &self,
        server_id: &str,
        channel_id: &str,
    ) -> Result<Vec<Message>, ApiError> {
        self.inner.api.recent_messages(server_id, channel_id).await
    }

    /// Fetches recent messages from a channel.
    pub async fn messages(
        &self,
        server_id: &str,
        channel_id: &str,
        limit: u32,
    ) -> Result<Vec<Message>, ApiError> {
        self.inner.api.messages(server_id, channel_id, limit).await
    }

    /// Adds a reaction to a message.
    pub async fn add_reaction(&self, message_id: i64, emoji: &str) -> Result<Value, ApiError> {
        self.inner.api.add_reaction(message_id, emoji).await
    }

    // ── Lifecycle ───────────────────────────────────────────────────────

    /// Runs the client until [`stop`](Self::stop) is called.
    ///
    /// Reconnects forever: a clean close or unexpected failure waits
    /// [`RECONNECT_DELAY`], an authentication rejection waits
    /// [`AUTH_RETRY_DELAY`]. Events missed while disconnected are not
    /// replayed.
    pub async fn run(&self) -> Result<(), ClientError> {
        self.inner.running.store(true, Ordering::SeqCst);
        self.inner.shutdown.send_replace(false);
        let mut shutdown_rx = self.inner.shutdown.subscribe();

        info!(instance = %self.inner.config.instance_url, "starting bot client");

        while self.is_running() {
            let delay = match self.connect_and_stream(&mut shutdown_rx).await {
                Ok(StreamEnd::Stopped) => break,
                Ok(StreamEnd::RemoteClosed) => {
                    warn!(
                        delay_secs = RECONNECT_DELAY.as_secs(),
                        "connection closed, reconnecting"
                    );
                    RECONNECT_DELAY
                }
                Err(ClientError::Auth(e)) => {
                    error!(error = %e, delay_secs = AUTH_RETRY_DELAY.as_secs(), "authentication failed, retrying");
                    AUTH_RETRY_DELAY
                }
                Err(e) => {
                    error!(error = %e, delay_secs = RECONNECT_DELAY.as_secs(), "connection attempt failed, retrying");
                    RECONNECT_DELAY
                }
            };

            if !self.is_running() {
                break;
            }
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }

        info!("bot client stopped");
        Ok(())
    }

    /// One connection attempt: connect, authenticate, register commands,
    /// stream until close or stop.
    pub(crate) async fn connect_and_stream(
        &self,
        shutdown_rx: &mut watch::Receiver<bool>,
    ) -> Result<StreamEnd, ClientError> {
        let url = self.inner.config.ws_url();
        info!(url = %url, "connecting");
        let mut session = self.inner.transport.open(&url).await?;

        if let Err(e) = authenticate(session.as_mut(), &self.inner.config.token).await {
            session.close().await;
            return Err(e);
        }

        // Command registration is best-effort: the stream starts regardless
        // of the outcome.
        let definitions = self.inner.commands.read().definitions();
        if !definitions.is_empty() {
            match self.inner.api.register_commands(&definitions).await {
                Ok(result) => {
                    info!(count = definitions.len(), result = %result, "registered slash commands");
                }
                Err(e) => warn!(error = %e, "slash command registration failed"),
            }
        }

        debug!("entering event stream");
        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        session.close().await;
                        return Ok(StreamEnd::Stopped);
                    }
                }
                frame = session.next_frame() => match frame {
                    Ok(Some(raw)) => self.dispatch_frame(&raw).await,
                    Ok(None) => {
                        session.close().await;
                        return Ok(StreamEnd::RemoteClosed);
                    }
                    Err(e) => {
                        session.close().await;
                        if !self.is_running() {
                            return Ok(StreamEnd::Stopped);
                        }
                        return Err(e.into());
                    }
                },
            }
        }
    }

    /// Stops the client: clears the running flag, unblocks a pending stream
    /// read and closes the pooled request connector. Handlers already in
    /// flight run to completion. Idempotent.
    pub fn stop(&self) {
        let was_running = self.inner.running.swap(false, Ordering::SeqCst);
        self.inner.shutdown.send_replace(true);
        self.inner.api.close();
        if was_running {
            info!("stop requested");
        }
    }
}
