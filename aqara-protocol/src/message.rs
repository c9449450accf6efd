//! Inbound message envelope and command classification.

use serde::Deserialize;

use crate::error::{ProtocolError, Result};
use crate::state::DeviceState;

/// Command discriminator of an inbound message.
///
/// Only the four commands below carry meaning for the client; everything
/// else (e.g. `iam`, `write_ack`, unknown future commands) classifies as
/// [`CommandKind::Unknown`] and is dropped upstream without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Response to discovery: carries the current token and the id list.
    GetIdListAck,
    /// Response to a per-device read.
    ReadAck,
    /// Periodic gateway liveness beacon; rotates the token.
    Heartbeat,
    /// Unsolicited state report from the gateway or a subdevice.
    Report,
    /// Any other command value.
    Unknown,
}

impl CommandKind {
    /// Classify a raw `cmd` value.
    pub fn from_cmd(cmd: &str) -> Self {
        match cmd {
            "get_id_list_ack" => CommandKind::GetIdListAck,
            "read_ack" => CommandKind::ReadAck,
            "heartbeat" => CommandKind::Heartbeat,
            "report" => CommandKind::Report,
            _ => CommandKind::Unknown,
        }
    }
}

/// An inbound message as handed over by the transport layer.
///
/// The `data` field, when present, is a JSON-encoded string holding the
/// actual state record; decode it with [`Message::decode_data`].
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    cmd: String,
    sid: String,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    data: Option<String>,
}

impl Message {
    /// Parse a raw datagram payload into a message envelope.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::MalformedMessage`] if the payload is not a
    /// valid envelope. An unrecognized `cmd` value is not an error.
    pub fn parse(payload: &str) -> Result<Self> {
        serde_json::from_str(payload).map_err(ProtocolError::MalformedMessage)
    }

    /// Raw `cmd` value.
    pub fn cmd(&self) -> &str {
        &self.cmd
    }

    /// Command discriminator.
    pub fn kind(&self) -> CommandKind {
        CommandKind::from_cmd(&self.cmd)
    }

    /// Device id this message concerns.
    pub fn sid(&self) -> &str {
        &self.sid
    }

    /// Device type tag, present on `read_ack` and `report`.
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    /// Rotating token, present on `heartbeat` and `get_id_list_ack`.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Raw inner `data` payload, still JSON-encoded.
    pub fn data(&self) -> Option<&str> {
        self.data.as_deref()
    }

    /// Decode the inner `data` payload into a [`DeviceState`] record.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::MissingData`] if the message carries no
    /// `data` field, or [`ProtocolError::MalformedData`] if the inner JSON
    /// does not decode.
    pub fn decode_data(&self) -> Result<DeviceState> {
        let raw = self.data.as_deref().ok_or(ProtocolError::MissingData)?;
        DeviceState::from_json(raw)
    }
}
