//! Subdevice instances and state decoding.

use std::time::Instant;

use aqara_protocol::DeviceState;

use crate::event::DeviceEvent;
use crate::kind::DeviceKind;
use crate::multi_click::MultiClick;

/// Per-kind transient state. Most kinds are stateless decoders; only the
/// wall switches carry their click step counters.
#[derive(Debug, Clone)]
enum Variant {
    Magnet,
    Switch,
    WallSwitchSingle {
        channel_0: MultiClick,
    },
    WallSwitchDual {
        channel_0: MultiClick,
        channel_1: MultiClick,
    },
    Motion,
    Weather,
    Leak,
    Cube,
    Smoke,
}

/// One registered subdevice.
///
/// Created by the gateway when a previously unseen id shows up in a
/// discovery read, and fed every state record routed to its id. Decoding a
/// record yields zero or more [`DeviceEvent`]s.
#[derive(Debug, Clone)]
pub struct Subdevice {
    sid: String,
    variant: Variant,
}

impl Subdevice {
    /// Create a subdevice of the given kind.
    pub fn new(sid: impl Into<String>, kind: DeviceKind) -> Self {
        let variant = match kind {
            DeviceKind::Magnet => Variant::Magnet,
            DeviceKind::Switch => Variant::Switch,
            DeviceKind::WallSwitchSingle => Variant::WallSwitchSingle {
                channel_0: MultiClick::default(),
            },
            DeviceKind::WallSwitchDual => Variant::WallSwitchDual {
                channel_0: MultiClick::default(),
                channel_1: MultiClick::default(),
            },
            DeviceKind::Motion => Variant::Motion,
            DeviceKind::Weather => Variant::Weather,
            DeviceKind::Leak => Variant::Leak,
            DeviceKind::Cube => Variant::Cube,
            DeviceKind::Smoke => Variant::Smoke,
        };
        Self {
            sid: sid.into(),
            variant,
        }
    }

    /// Registry id. For a dual wall switch this carries the `_left` /
    /// `_right` suffix, not the physical device id.
    pub fn sid(&self) -> &str {
        &self.sid
    }

    /// Kind of this subdevice.
    pub fn kind(&self) -> DeviceKind {
        match self.variant {
            Variant::Magnet => DeviceKind::Magnet,
            Variant::Switch => DeviceKind::Switch,
            Variant::WallSwitchSingle { .. } => DeviceKind::WallSwitchSingle,
            Variant::WallSwitchDual { .. } => DeviceKind::WallSwitchDual,
            Variant::Motion => DeviceKind::Motion,
            Variant::Weather => DeviceKind::Weather,
            Variant::Leak => DeviceKind::Leak,
            Variant::Cube => DeviceKind::Cube,
            Variant::Smoke => DeviceKind::Smoke,
        }
    }

    /// Decode a state record into semantic events, updating any transient
    /// state (click step counters) as a side effect.
    ///
    /// `now` is the arrival time of the record; it drives the multi-click
    /// debounce window.
    pub fn handle_state(&mut self, state: &DeviceState, now: Instant) -> Vec<DeviceEvent> {
        let mut events = Vec::new();
        match &mut self.variant {
            Variant::Magnet => match state.status.as_deref() {
                Some("open") => events.push(DeviceEvent::Open),
                Some("close") => events.push(DeviceEvent::Closed),
                Some(other) => {
                    tracing::debug!(sid = %self.sid, status = other, "unhandled magnet status");
                }
                None => {}
            },
            Variant::Switch => match state.status.as_deref() {
                Some("click") => events.push(DeviceEvent::Click { step: 1 }),
                Some("double_click") => events.push(DeviceEvent::DoubleClick),
                Some("long_click_press") => events.push(DeviceEvent::LongClickPress),
                Some("long_click_release") => events.push(DeviceEvent::LongClickRelease),
                // might be no_close or similar noise
                _ => {}
            },
            Variant::WallSwitchSingle { channel_0 } => {
                // 86sw1 reports a bare channel_0 value for any press; its
                // mere presence is the click (the dual variant differs).
                if state.channel_0.as_deref().is_some_and(|v| !v.is_empty()) {
                    let step = channel_0.click(now);
                    events.push(DeviceEvent::Click { step });
                }
            }
            Variant::WallSwitchDual {
                channel_0,
                channel_1,
            } => {
                if state.channel_0.as_deref() == Some("click") {
                    let step = channel_0.click(now);
                    events.push(DeviceEvent::Click { step });
                }
                if state.channel_1.as_deref() == Some("click") {
                    let step = channel_1.click(now);
                    events.push(DeviceEvent::Click { step });
                }
            }
            Variant::Motion => {
                if state.status.as_deref() == Some("motion") {
                    events.push(DeviceEvent::MotionDetected);
                }
            }
            Variant::Weather => {
                if let Some(celsius) = parse_hundredths(state.temperature.as_deref()) {
                    events.push(DeviceEvent::Temperature { celsius });
                }
                if let Some(percent) = parse_hundredths(state.humidity.as_deref()) {
                    events.push(DeviceEvent::Humidity { percent });
                }
                if let Some(raw) = state.pressure.as_deref() {
                    if let Ok(pascal) = raw.parse::<i32>() {
                        events.push(DeviceEvent::Pressure {
                            kilopascal: pascal as f32 / 1000.0,
                        });
                    }
                }
            }
            Variant::Leak => match state.status.as_deref() {
                Some("leak") => events.push(DeviceEvent::Leak),
                Some("no_leak") => events.push(DeviceEvent::LeakCleared),
                _ => {}
            },
            Variant::Cube => {
                if let Some(action) = state.status.as_deref() {
                    events.push(DeviceEvent::CubeAction {
                        action: action.to_string(),
                    });
                }
                if let Some(rotate) = state.rotate.as_deref() {
                    // "<degrees>,<milliseconds>"
                    if let Some(degrees) = rotate
                        .split(',')
                        .next()
                        .and_then(|d| d.parse::<i32>().ok())
                    {
                        events.push(DeviceEvent::CubeRotate { degrees });
                    }
                }
            }
            Variant::Smoke => match state.alarm.as_deref() {
                Some("1") => events.push(DeviceEvent::SmokeAlarm),
                Some("0") => events.push(DeviceEvent::SmokeCleared),
                _ => {}
            },
        }
        events
    }
}

/// Parse a decimal string of hundredths into a float (`"2233"` → 22.33).
fn parse_hundredths(raw: Option<&str>) -> Option<f32> {
    raw?.parse::<i32>().ok().map(|v| v as f32 / 100.0)
}
