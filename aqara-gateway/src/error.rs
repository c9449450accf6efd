//! Error types for the gateway state machine.

use thiserror::Error;

/// Result type for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Errors surfaced by [`Gateway::handle_message`](crate::Gateway::handle_message).
///
/// Only genuinely malformed payloads are errors. Unrecognized commands,
/// unknown device models and reports for unregistered ids are handled
/// silently per the protocol's best-effort design.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// A message or its inner `data` record failed to decode.
    #[error(transparent)]
    Protocol(#[from] aqara_protocol::ProtocolError),
}
