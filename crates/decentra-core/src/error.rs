//! Unified error types for the Decentra bot SDK.
//!
//! Only [`TransportError`] and [`AuthError`] terminate a connection attempt;
//! everything else is contained where it occurs so the event stream keeps
//! flowing.

use thiserror::Error;

// =============================================================================
// Transport Errors
// =============================================================================

/// Errors that can occur on the WebSocket transport.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Opening the connection failed.
    #[error("connection failed: {url} - {reason}")]
    ConnectionFailed {
        /// The URL that failed to connect.
        url: String,
        /// Reason for failure.
        reason: String,
    },

    /// The connection dropped mid-stream.
    #[error("connection closed: {reason}")]
    ConnectionClosed {
        /// Reason for closure.
        reason: String,
    },

    /// A frame could not be written.
    #[error("failed to send frame: {0}")]
    SendFailed(String),

    /// The TLS connector could not be built.
    #[error("TLS setup failed: {0}")]
    Tls(String),
}

// =============================================================================
// Authentication Errors
// =============================================================================

/// The server rejected the bot-auth handshake.
#[derive(Debug, Clone, Error)]
#[error("authentication failed: {message}")]
pub struct AuthError {
    /// Server-supplied rejection message.
    pub message: String,
}

impl AuthError {
    /// Creates an authentication error from the server's message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// =============================================================================
// Decode Errors
// =============================================================================

/// A frame that could not be interpreted as a protocol envelope.
///
/// Decode errors are non-fatal: the dispatcher logs and skips the frame.
#[derive(Debug, Clone, Error)]
pub enum DecodeError {
    /// The frame was not valid JSON.
    #[error("frame is not valid JSON: {0}")]
    NotJson(String),

    /// The envelope carried no `type` field.
    #[error("envelope has no type field")]
    MissingType,
}

// =============================================================================
// API Errors
// =============================================================================

/// Errors from the request/response action client.
///
/// An HTTP status >= 400 is *not* an `ApiError`: the parsed body is logged
/// and still returned to the caller. These variants cover failures where no
/// usable body exists at all.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be sent.
    #[error("request failed: {0}")]
    Request(String),

    /// The response body was not valid JSON.
    #[error("invalid response body: {0}")]
    InvalidBody(String),
}
