//! Heartbeat liveness watchdog.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::event::GatewayEvent;

enum Control {
    Rearm,
    Shutdown,
}

/// Rearming one-shot timer for gateway liveness.
///
/// A single background thread parks on a control channel with the offline
/// window as its timeout. Rearming restarts the window; there is never more
/// than one pending expiry because there is only the one thread. On expiry
/// the watchdog emits [`GatewayEvent::Offline`] exactly once and then waits
/// (without a timeout) for the next rearm, so a late heartbeat starts a
/// fresh window instead of a burst of offline notifications.
///
/// Dropping the watchdog shuts the thread down, so no `Offline` can fire
/// after the owning gateway is gone.
pub(crate) struct HeartbeatWatchdog {
    control: Sender<Control>,
    worker: Option<JoinHandle<()>>,
}

impl HeartbeatWatchdog {
    /// Start the watchdog; the window begins immediately.
    pub(crate) fn arm(window: Duration, events: Sender<GatewayEvent>) -> Self {
        let (control, control_rx) = mpsc::channel();
        let worker = thread::spawn(move || watch(window, control_rx, events));
        Self {
            control,
            worker: Some(worker),
        }
    }

    /// Restart the offline window (cancel-then-reschedule).
    pub(crate) fn rearm(&self) {
        let _ = self.control.send(Control::Rearm);
    }
}

impl Drop for HeartbeatWatchdog {
    fn drop(&mut self) {
        let _ = self.control.send(Control::Shutdown);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn watch(window: Duration, control: Receiver<Control>, events: Sender<GatewayEvent>) {
    loop {
        match control.recv_timeout(window) {
            Ok(Control::Rearm) => continue,
            Ok(Control::Shutdown) | Err(RecvTimeoutError::Disconnected) => return,
            Err(RecvTimeoutError::Timeout) => {
                tracing::warn!(window_ms = window.as_millis() as u64, "gateway offline");
                if events.send(GatewayEvent::Offline).is_err() {
                    return;
                }
                // one-shot: park until the next rearm
                match control.recv() {
                    Ok(Control::Rearm) => continue,
                    Ok(Control::Shutdown) | Err(_) => return,
                }
            }
        }
    }
}
