//! Gateway protocol state machine for the Aqara local developer protocol.
//!
//! An Aqara hub broadcasts heartbeats and state reports for itself and its
//! Zigbee subdevices over the local network. This crate implements the
//! client side of that conversation: the discovery handshake, heartbeat
//! liveness tracking, session-key derivation, subdevice registry, report
//! routing, and the gateway's own actuation writes (ring light, speaker).
//!
//! The core is single-threaded and purely reactive. Transport I/O stays
//! outside: the caller feeds already-parsed [`Message`]s into
//! [`Gateway::handle_message`] and supplies a [`UnicastSender`] for
//! outbound [`Command`]s. The only asynchronous piece is the heartbeat
//! watchdog, a rearming one-shot timer on a background thread.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use aqara_gateway::{Gateway, GatewayConfig, GatewayEvent, Message, Rgb};
//!
//! let config = GatewayConfig::new("192.168.1.50".parse()?, "f0b4299a8b2c");
//! let mut gateway = Gateway::new(config, Box::new(transport));
//! gateway.set_password("0987654321qwerty");
//!
//! let mut events = gateway.take_event_receiver().unwrap();
//!
//! // feed inbound datagrams, already decoded by the transport layer
//! gateway.handle_message(&Message::parse(&datagram)?)?;
//!
//! while let Ok(event) = events.recv() {
//!     match event {
//!         GatewayEvent::Ready => gateway.set_color(Rgb::new(255, 128, 0)),
//!         GatewayEvent::Device { sid, event } => println!("{sid}: {event:?}"),
//!         _ => {}
//!     }
//! }
//! ```

mod error;
mod event;
mod gateway;
mod key;
mod transport;
mod watchdog;

pub use error::{GatewayError, Result};
pub use event::{GatewayEvent, Rgb};
pub use gateway::{Gateway, GatewayConfig, HEARTBEAT_INTERVAL, OFFLINE_RATIO};
pub use key::derive_write_key;
pub use transport::UnicastSender;

// Re-export the wire and device models so most applications only need
// this crate.
pub use aqara_device::{DeviceEvent, DeviceKind, Subdevice};
pub use aqara_protocol::{Command, CommandKind, DeviceState, Message, ProtocolError};
