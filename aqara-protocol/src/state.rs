//! Decoded `data` records.

use serde::Deserialize;

use crate::error::{ProtocolError, Result};

/// The inner state record of a `read_ack` or `report`.
///
/// Every field is optional: each device family populates only its own
/// handful of fields, and the gateway's own state record uses `rgb`.
/// Unknown fields are ignored, since firmwares add fields freely.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeviceState {
    /// Packed intensity + RGB of the gateway's ring light (big-endian
    /// `intensity, r, g, b`).
    pub rgb: Option<u32>,
    /// Generic status tag (`open`, `close`, `click`, `motion`, `leak`, ...).
    pub status: Option<String>,
    /// First button channel of a wall switch.
    pub channel_0: Option<String>,
    /// Second button channel of a dual wall switch.
    pub channel_1: Option<String>,
    /// Temperature in hundredths of a degree Celsius, as a decimal string.
    pub temperature: Option<String>,
    /// Relative humidity in hundredths of a percent, as a decimal string.
    pub humidity: Option<String>,
    /// Atmospheric pressure in Pa, as a decimal string (`weather.v1` only).
    pub pressure: Option<String>,
    /// Smoke alarm flag (`"1"` alarm, `"0"` clear).
    pub alarm: Option<String>,
    /// Cube rotation, `"<degrees>,<milliseconds>"`.
    pub rotate: Option<String>,
}

impl DeviceState {
    /// Decode a state record from the inner `data` JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::MalformedData`] if the JSON does not decode.
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(ProtocolError::MalformedData)
    }
}

/// Decode the `data` payload of a `get_id_list_ack`: a JSON array of
/// subdevice id strings.
///
/// # Errors
///
/// Returns [`ProtocolError::MalformedData`] if the payload is not an array
/// of strings.
pub fn parse_id_list(raw: &str) -> Result<Vec<String>> {
    serde_json::from_str(raw).map_err(ProtocolError::MalformedData)
}
