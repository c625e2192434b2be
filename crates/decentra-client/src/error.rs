//! Client-level error types.
//!
//! The protocol-level taxonomy (transport, auth, decode, API) lives in
//! `decentra-core`; this module adds the configuration errors and the
//! top-level [`ClientError`] the client facade surfaces.

use thiserror::Error;

use decentra_core::{ApiError, AuthError, TransportError};

/// Errors raised while assembling a [`crate::ClientConfig`].
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// No instance URL was supplied.
    #[error("instance URL is required (set DECENTRA_INSTANCE_URL)")]
    MissingInstanceUrl,

    /// No bot token was supplied.
    #[error("bot token is required (set DECENTRA_BOT_TOKEN)")]
    MissingToken,

    /// The instance URL does not use an http(s) scheme.
    #[error("instance URL must start with http:// or https://: {0}")]
    InvalidInstanceUrl(String),
}

/// Top-level error surfaced by the client facade.
///
/// Inside the supervisor loop only `Transport` and `Auth` occur; they select
/// the reconnect backoff rather than stopping the client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Api(#[from] ApiError),
}
