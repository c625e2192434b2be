//! Bot-auth handshake.
//!
//! Runs once per freshly-opened session, before command registration and
//! streaming: send `{type: "bot_auth", token}`, read exactly one frame.

use tracing::{info, warn};

use decentra_core::error::{AuthError, TransportError};

use crate::protocol::{AuthRequest, Frame, decode_frame};
use crate::transport::Session;

/// The identity the server assigned to the bot on a successful handshake.
///
/// Exposed for observability only; the client keeps no per-connection
/// identity state.
#[derive(Debug, Clone)]
pub struct BotIdentity {
    pub username: String,
    pub bot_id: String,
}

/// Outcome of the handshake on a still-open session.
pub enum AuthOutcome {
    /// Explicit `bot_auth_success`.
    Confirmed(BotIdentity),
    /// Anything other than a success or error frame. The handshake is
    /// treated as a soft success to stay forward-compatible with
    /// unrecognized handshake variants; this leniency is intentional but
    /// logged loudly.
    Unconfirmed,
}

/// Authenticates an open, unauthenticated session.
///
/// On `Err` the caller must close the session and must not enter the
/// dispatch loop.
pub async fn authenticate(
    session: &mut dyn Session,
    token: &str,
) -> Result<AuthOutcome, crate::ClientError> {
    let request = serde_json::to_string(&AuthRequest::new(token))
        .expect("auth frame serialization cannot fail");
    session.send(&request).await?;

    let raw = match session.next_frame().await? {
        Some(raw) => raw,
        None => {
            return Err(TransportError::ConnectionClosed {
                reason: "stream closed during handshake".to_string(),
            }
            .into());
        }
    };

    match decode_frame(&raw) {
        Ok(Frame::AuthSuccess { username, bot_id }) => {
            info!(%username, %bot_id, "authenticated");
            Ok(AuthOutcome::Confirmed(BotIdentity { username, bot_id }))
        }
        Ok(Frame::Error { message }) => Err(AuthError::new(message).into()),
        Ok(_) | Err(_) => {
            warn!(frame = %raw, "unexpected auth response, proceeding anyway");
            Ok(AuthOutcome::Unconfirmed)
        }
    }
}
