//! Transport seam for outbound commands.

use aqara_protocol::Command;

/// Outbound transport capability supplied by the caller.
///
/// The gateway hands over structured [`Command`]s; encoding and socket I/O
/// belong to the implementor. Delivery is fire-and-forget: the protocol's
/// own `*_ack` messages arrive later as ordinary inbound traffic, so there
/// is nothing useful to return here.
pub trait UnicastSender: Send {
    fn send_unicast(&self, command: &Command);
}
