//! Error types for wire decoding and encoding.

use thiserror::Error;

/// Result type for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors produced while decoding or encoding wire payloads.
///
/// A malformed payload is fatal for the message it arrived in: the protocol
/// layer makes no attempt to recover a partial record. Unrecognized command
/// or model tags are *not* errors; they surface as
/// [`CommandKind::Unknown`](crate::CommandKind::Unknown) or a `None` device
/// kind and are handled (dropped) upstream.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The outer message envelope was not valid JSON or missed required fields.
    #[error("malformed message envelope: {0}")]
    MalformedMessage(#[source] serde_json::Error),

    /// The inner `data` record could not be decoded.
    #[error("malformed data record: {0}")]
    MalformedData(#[source] serde_json::Error),

    /// A message that requires a `data` payload arrived without one.
    #[error("message is missing its data payload")]
    MissingData,

    /// An outbound command failed to serialize.
    #[error("failed to encode command: {0}")]
    Encode(#[source] serde_json::Error),
}
