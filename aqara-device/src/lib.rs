//! Subdevice model for the Aqara gateway SDK.
//!
//! The gateway reports for a zoo of battery-powered Zigbee subdevices, each
//! identified by a protocol type tag (`magnet`, `86sw2`, `sensor_ht`, ...).
//! This crate maps those tags to a closed set of [`DeviceKind`] variants,
//! holds per-device transient state in [`Subdevice`], and decodes raw state
//! records into semantic [`DeviceEvent`]s.
//!
//! The one stateful decode is the wall-switch multi-click step counter:
//! clicks within a 2 second window count up a step, so listeners can tell
//! the Nth press of a burst apart from a fresh press without the protocol
//! carrying sequence numbers.

mod event;
mod kind;
mod multi_click;
mod subdevice;

pub use event::DeviceEvent;
pub use kind::DeviceKind;
pub use multi_click::{MultiClick, STEP_WINDOW};
pub use subdevice::Subdevice;
