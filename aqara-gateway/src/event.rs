//! Events published by the gateway.

use aqara_device::{DeviceEvent, DeviceKind};

/// RGB color of the gateway ring light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Notifications published on the gateway's event channel.
///
/// Consume them through [`Gateway::take_event_receiver`](crate::Gateway::take_event_receiver).
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayEvent {
    /// The gateway's own state was read for the first time; actuation
    /// writes are accepted from here on. Emitted exactly once.
    Ready,
    /// No heartbeat arrived within the offline window. Emitted once per
    /// missed window; a late heartbeat rearms the watchdog.
    Offline,
    /// The gateway's mirrored light state changed (self read or report).
    LightState { color: Rgb, intensity: u8 },
    /// A previously unseen subdevice id was registered.
    SubdeviceAdded { sid: String, kind: DeviceKind },
    /// A semantic event from a registered subdevice.
    Device { sid: String, event: DeviceEvent },
}
