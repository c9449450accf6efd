//! Semantic subdevice events.

/// A semantic event decoded from one subdevice state record.
///
/// One record can yield several events (a dual wall switch pressed on both
/// channels, a weather report with temperature and humidity).
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceEvent {
    /// Button click. `step` counts presses within the debounce window for
    /// the step-counted wall switches and is always `1` for plain remotes.
    Click { step: u32 },
    DoubleClick,
    LongClickPress,
    LongClickRelease,
    /// Contact sensor opened.
    Open,
    /// Contact sensor closed.
    Closed,
    MotionDetected,
    /// Degrees Celsius.
    Temperature { celsius: f32 },
    /// Relative humidity, percent.
    Humidity { percent: f32 },
    /// Atmospheric pressure, kPa.
    Pressure { kilopascal: f32 },
    Leak,
    LeakCleared,
    /// Cube gesture tag as reported (`flip90`, `shake_air`, `tap_twice`, ...).
    CubeAction { action: String },
    /// Cube twisted around its vertical axis.
    CubeRotate { degrees: i32 },
    SmokeAlarm,
    SmokeCleared,
}
