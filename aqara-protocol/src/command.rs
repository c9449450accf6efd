//! Outbound command payloads.

use serde::Serialize;

use crate::error::{ProtocolError, Result};

/// Inner `data` object of a light write. Field order matches the wire.
#[derive(Serialize)]
struct LightWrite<'a> {
    rgb: u32,
    key: &'a str,
}

/// Inner `data` object of a sound write.
#[derive(Serialize)]
struct SoundWrite<'a> {
    mid: u32,
    vol: u8,
    key: &'a str,
}

/// An outbound command to the gateway.
///
/// Serialized with `cmd` as the tag. For writes, `data` is a JSON-encoded
/// string (the protocol double-encodes the inner object), carrying the
/// session key that authorizes the actuation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Command {
    /// Discovery request; the gateway answers with `get_id_list_ack`.
    GetIdList,
    /// Read the current state of one device.
    Read { sid: String },
    /// Actuation write against the gateway itself.
    Write {
        model: String,
        sid: String,
        short_id: u32,
        data: String,
    },
}

impl Command {
    /// Read command for the given device id.
    pub fn read(sid: impl Into<String>) -> Self {
        Command::Read { sid: sid.into() }
    }

    /// Write the gateway ring light: `rgb` packs intensity and color as
    /// big-endian `intensity, r, g, b`.
    pub fn write_light(sid: impl Into<String>, rgb: u32, key: &str) -> Result<Self> {
        let data =
            serde_json::to_string(&LightWrite { rgb, key }).map_err(ProtocolError::Encode)?;
        Ok(Command::Write {
            model: "gateway".to_string(),
            sid: sid.into(),
            short_id: 0,
            data,
        })
    }

    /// Play a sound (`mid`) at the given volume through the gateway speaker.
    pub fn write_sound(sid: impl Into<String>, mid: u32, vol: u8, key: &str) -> Result<Self> {
        let data =
            serde_json::to_string(&SoundWrite { mid, vol, key }).map_err(ProtocolError::Encode)?;
        Ok(Command::Write {
            model: "gateway".to_string(),
            sid: sid.into(),
            short_id: 0,
            data,
        })
    }

    /// Encode for transmission.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::Encode`] if serialization fails.
    pub fn to_payload(&self) -> Result<String> {
        serde_json::to_string(self).map_err(ProtocolError::Encode)
    }
}
