//! Device-type dispatch table.

use std::fmt;

/// Closed set of supported subdevice kinds.
///
/// Dispatch from the protocol `model` tag happens once, at registration
/// time, through [`DeviceKind::from_model`]. An unknown tag yields `None`
/// and no subdevice is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    /// Door/window contact sensor.
    Magnet,
    /// Single-button wireless remote.
    Switch,
    /// Wall switch with one button (`86sw1`).
    WallSwitchSingle,
    /// Wall switch with two buttons (`86sw2`); occupies two registry
    /// entries, `<sid>_left` and `<sid>_right`.
    WallSwitchDual,
    /// PIR motion sensor.
    Motion,
    /// Temperature/humidity sensor (`weather.v1` adds pressure).
    Weather,
    /// Water leak sensor.
    Leak,
    /// Orientation/gesture cube.
    Cube,
    /// Smoke detector.
    Smoke,
}

impl DeviceKind {
    /// Map a protocol type tag to a device kind.
    pub fn from_model(model: &str) -> Option<Self> {
        match model {
            "magnet" | "sensor_magnet.aq2" => Some(DeviceKind::Magnet),
            "switch" | "sensor_switch.aq2" => Some(DeviceKind::Switch),
            "86sw1" => Some(DeviceKind::WallSwitchSingle),
            "86sw2" => Some(DeviceKind::WallSwitchDual),
            "motion" | "sensor_motion.aq2" => Some(DeviceKind::Motion),
            "sensor_ht" | "weather.v1" => Some(DeviceKind::Weather),
            "sensor_wleak.aq1" => Some(DeviceKind::Leak),
            "cube" => Some(DeviceKind::Cube),
            "smoke" => Some(DeviceKind::Smoke),
            _ => None,
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeviceKind::Magnet => "magnet",
            DeviceKind::Switch => "switch",
            DeviceKind::WallSwitchSingle => "wall switch (single)",
            DeviceKind::WallSwitchDual => "wall switch (dual)",
            DeviceKind::Motion => "motion",
            DeviceKind::Weather => "weather",
            DeviceKind::Leak => "leak",
            DeviceKind::Cube => "cube",
            DeviceKind::Smoke => "smoke",
        };
        f.write_str(name)
    }
}
