//! Wire message model for the Aqara gateway local developer protocol.
//!
//! The gateway speaks a line-oriented JSON dialect over the local network:
//! short objects with a `cmd` discriminator, a device `sid`, and a `data`
//! field that is itself a JSON-encoded string (the protocol double-encodes
//! the inner record). This crate owns both directions of that dialect:
//!
//! - [`Message`] / [`CommandKind`] — inbound messages, already
//!   demultiplexed from the transport, classified by command.
//! - [`DeviceState`] — the decoded inner `data` record of a read/report.
//! - [`Command`] — outbound payloads (`get_id_list`, `read`, `write`).
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use aqara_protocol::{Command, CommandKind, Message};
//!
//! let msg = Message::parse(r#"{"cmd":"heartbeat","sid":"f0b4","token":"abcd"}"#)?;
//! assert_eq!(msg.kind(), CommandKind::Heartbeat);
//!
//! let payload = Command::read("158d0001a2b3c4").to_payload()?;
//! // => {"cmd":"read","sid":"158d0001a2b3c4"}
//! ```

mod command;
mod error;
mod message;
mod state;

pub use command::Command;
pub use error::{ProtocolError, Result};
pub use message::{CommandKind, Message};
pub use state::{parse_id_list, DeviceState};
