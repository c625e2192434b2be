//! WebSocket transport session.
//!
//! [`Transport`] and [`Session`] are the seam between the dispatch core and
//! the network: the supervisor opens sessions through a `Transport`, the
//! dispatcher reads frames from a `Session`. Tests substitute scripted
//! implementations; production uses [`WsTransport`] over tokio-tungstenite.
//!
//! TLS note: Decentra instances are routinely deployed with self-signed
//! certificates, so the default transport accepts invalid certificates and
//! hostnames. This trust relaxation is deliberate and can be switched off
//! with [`WsTransport::verify_certificates`].

use std::time::Duration;

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{Bytes, Message};
use tokio_tungstenite::{
    Connector, MaybeTlsStream, WebSocketStream, connect_async_tls_with_config,
};
use tracing::{trace, warn};

use decentra_core::error::TransportError;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Interval between transport-level keepalive pings.
pub const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(30);

/// One open bidirectional message-stream connection.
#[async_trait]
pub trait Session: Send {
    /// Sends one text frame.
    async fn send(&mut self, frame: &str) -> Result<(), TransportError>;

    /// Waits for the next text frame.
    ///
    /// Returns `Ok(None)` when the remote side closed the stream cleanly.
    async fn next_frame(&mut self) -> Result<Option<String>, TransportError>;

    /// Tears the connection down. Idempotent.
    async fn close(&mut self);
}

/// Opens [`Session`]s to a remote endpoint.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn open(&self, url: &str) -> Result<Box<dyn Session>, TransportError>;
}

/// The production WebSocket transport.
#[derive(Debug, Clone)]
pub struct WsTransport {
    keepalive: Duration,
    verify_certs: bool,
}

impl Default for WsTransport {
    fn default() -> Self {
        Self {
            keepalive: KEEPALIVE_INTERVAL,
            verify_certs: false,
        }
    }
}

impl WsTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables standard certificate and hostname verification.
    pub fn verify_certificates(mut self, verify: bool) -> Self {
        self.verify_certs = verify;
        self
    }

    /// Overrides the keepalive ping interval.
    pub fn keepalive(mut self, interval: Duration) -> Self {
        self.keepalive = interval;
        self
    }

    fn tls_connector(&self) -> Result<Connector, TransportError> {
        let tls = native_tls::TlsConnector::builder()
            .danger_accept_invalid_certs(!self.verify_certs)
            .danger_accept_invalid_hostnames(!self.verify_certs)
            .build()
            .map_err(|e| TransportError::Tls(e.to_string()))?;
        Ok(Connector::NativeTls(tls))
    }
}

#[async_trait]
impl Transport for WsTransport {
    async fn open(&self, url: &str) -> Result<Box<dyn Session>, TransportError> {
        let connector = self.tls_connector()?;
        let (stream, _response) = connect_async_tls_with_config(url, None, false, Some(connector))
            .await
            .map_err(|e| TransportError::ConnectionFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let keepalive = tokio::time::interval_at(
            tokio::time::Instant::now() + self.keepalive,
            self.keepalive,
        );
        Ok(Box::new(WsSession {
            stream,
            keepalive,
            closed: false,
        }))
    }
}

/// A live WebSocket session with periodic keepalive pings.
pub struct WsSession {
    stream: WsStream,
    keepalive: tokio::time::Interval,
    closed: bool,
}

#[async_trait]
impl Session for WsSession {
    async fn send(&mut self, frame: &str) -> Result<(), TransportError> {
        self.stream
            .send(Message::Text(frame.to_owned().into()))
            .await
            .map_err(|e| TransportError::SendFailed(e.to_string()))
    }

    async fn next_frame(&mut self) -> Result<Option<String>, TransportError> {
        loop {
            tokio::select! {
                _ = self.keepalive.tick() => {
                    trace!("sending keepalive ping");
                    if let Err(e) = self.stream.send(Message::Ping(Bytes::new())).await {
                        warn!(error = %e, "keepalive ping failed");
                        return Err(TransportError::ConnectionClosed {
                            reason: e.to_string(),
                        });
                    }
                }
                msg = self.stream.next() => match msg {
                    Some(Ok(Message::Text(text))) => return Ok(Some(text.as_str().to_owned())),
                    Some(Ok(Message::Binary(data))) => {
                        return Ok(Some(String::from_utf8_lossy(&data).into_owned()));
                    }
                    Some(Ok(Message::Ping(payload))) => {
                        trace!("answering server ping");
                        let _ = self.stream.send(Message::Pong(payload)).await;
                    }
                    Some(Ok(Message::Pong(_))) => trace!("keepalive pong received"),
                    Some(Ok(Message::Close(_))) | Some(Ok(Message::Frame(_))) | None => {
                        return Ok(None);
                    }
                    Some(Err(e)) => {
                        return Err(TransportError::ConnectionClosed {
                            reason: e.to_string(),
                        });
                    }
                },
            }
        }
    }

    async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        let _ = self.stream.close(None).await;
    }
}
