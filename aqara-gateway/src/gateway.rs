//! The gateway protocol state machine.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use aqara_device::{DeviceKind, Subdevice};
use aqara_protocol::{parse_id_list, Command, CommandKind, DeviceState, Message, ProtocolError};

use crate::error::Result;
use crate::event::{GatewayEvent, Rgb};
use crate::key::derive_write_key;
use crate::transport::UnicastSender;
use crate::watchdog::HeartbeatWatchdog;

/// How often a healthy gateway heartbeats.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(10);

/// Missed-heartbeat multiplier before the gateway counts as offline.
pub const OFFLINE_RATIO: u32 = 3;

/// Configuration for a [`Gateway`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Network address of the gateway.
    pub ip: IpAddr,
    /// The gateway's own device id.
    pub sid: String,
    /// Developer-mode password; can also be supplied later through
    /// [`Gateway::set_password`].
    pub password: Option<String>,
    /// Heartbeat cadence; the offline window is this times `offline_ratio`.
    pub heartbeat_interval: Duration,
    /// Missed-heartbeat multiplier.
    pub offline_ratio: u32,
}

impl GatewayConfig {
    /// Configuration with protocol-default liveness timing.
    pub fn new(ip: IpAddr, sid: impl Into<String>) -> Self {
        Self {
            ip,
            sid: sid.into(),
            password: None,
            heartbeat_interval: HEARTBEAT_INTERVAL,
            offline_ratio: OFFLINE_RATIO,
        }
    }

    fn offline_window(&self) -> Duration {
        self.heartbeat_interval * self.offline_ratio
    }
}

/// Client-side state machine for one Aqara gateway.
///
/// Construction immediately issues the discovery request and arms the
/// heartbeat watchdog. From then on the gateway is purely reactive: feed
/// every inbound message to [`handle_message`](Gateway::handle_message) and
/// consume notifications from the channel returned by
/// [`take_event_receiver`](Gateway::take_event_receiver).
///
/// Actuation ([`set_color`](Gateway::set_color), etc.) is accepted only
/// after the first successful self-read (`Ready`), and only issues a write
/// when a session key could be derived; anything earlier is a silent no-op.
pub struct Gateway {
    ip: IpAddr,
    sid: String,
    transport: Box<dyn UnicastSender>,

    password: Option<String>,
    token: Option<String>,
    key: Option<String>,

    ready: bool,
    watchdog: HeartbeatWatchdog,

    color: Rgb,
    intensity: u8,
    sound: u32,
    volume: u8,

    subdevices: HashMap<String, Subdevice>,

    events: Sender<GatewayEvent>,
    event_receiver: Option<Receiver<GatewayEvent>>,
}

impl Gateway {
    /// Create a gateway client and start discovery.
    pub fn new(config: GatewayConfig, transport: Box<dyn UnicastSender>) -> Self {
        let (events, event_receiver) = mpsc::channel();
        let watchdog = HeartbeatWatchdog::arm(config.offline_window(), events.clone());

        let gateway = Self {
            ip: config.ip,
            sid: config.sid,
            transport,
            password: config.password,
            token: None,
            key: None,
            ready: false,
            watchdog,
            color: Rgb::default(),
            intensity: 0,
            sound: 10000,
            volume: 0,
            subdevices: HashMap::new(),
            events,
            event_receiver: Some(event_receiver),
        };

        gateway.transport.send_unicast(&Command::GetIdList);
        gateway
    }

    /// Take the consumer end of the event channel. Yields `Some` once.
    pub fn take_event_receiver(&mut self) -> Option<Receiver<GatewayEvent>> {
        self.event_receiver.take()
    }

    /// Route one inbound message.
    ///
    /// Returns `Ok(true)` when the message was meaningful to this gateway
    /// and `Ok(false)` for unrecognized commands or unknown device models —
    /// both are normal on a shared broadcast medium.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Protocol`](crate::GatewayError::Protocol) if
    /// a required `data` payload is missing or malformed.
    pub fn handle_message(&mut self, msg: &Message) -> Result<bool> {
        match msg.kind() {
            CommandKind::GetIdListAck => {
                self.refresh_key(msg.token());

                // enumerate: read our own state, then every listed subdevice
                self.transport.send_unicast(&Command::read(self.sid.as_str()));
                let raw = msg.data().ok_or(ProtocolError::MissingData)?;
                for sid in parse_id_list(raw)? {
                    self.transport.send_unicast(&Command::read(sid));
                }
                Ok(true)
            }
            CommandKind::ReadAck => {
                let state = msg.decode_data()?;
                if msg.sid() == self.sid {
                    self.apply_light_state(&state);
                    if !self.ready {
                        self.ready = true;
                        self.emit(GatewayEvent::Ready);
                    }
                    return Ok(true);
                }

                let Some(kind) = msg.model().and_then(DeviceKind::from_model) else {
                    tracing::debug!(
                        sid = msg.sid(),
                        model = msg.model().unwrap_or(""),
                        "read_ack for unsupported model dropped"
                    );
                    return Ok(false);
                };

                let now = Instant::now();
                if kind == DeviceKind::WallSwitchDual {
                    // one physical device, two step-counted registry entries
                    self.register(format!("{}_left", msg.sid()), kind, &state, now);
                    self.register(format!("{}_right", msg.sid()), kind, &state, now);
                } else {
                    self.register(msg.sid().to_string(), kind, &state, now);
                }
                Ok(true)
            }
            CommandKind::Heartbeat => {
                if msg.sid() == self.sid {
                    self.refresh_key(msg.token());
                    self.watchdog.rearm();
                }
                Ok(true)
            }
            CommandKind::Report => {
                let state = msg.decode_data()?;
                if msg.sid() == self.sid {
                    // self-report mirrors light state; readiness is untouched
                    self.apply_light_state(&state);
                    return Ok(true);
                }

                let target = if msg.model() == Some("86sw2") {
                    // the physical id never appears in the registry; pick
                    // the synthetic entry for whichever channel reported
                    if truthy(state.channel_0.as_deref()) {
                        format!("{}_left", msg.sid())
                    } else if truthy(state.channel_1.as_deref()) {
                        format!("{}_right", msg.sid())
                    } else {
                        msg.sid().to_string()
                    }
                } else {
                    msg.sid().to_string()
                };
                self.forward(&target, &state, Instant::now());
                Ok(true)
            }
            CommandKind::Unknown => Ok(false),
        }
    }

    /// Set the developer-mode password and recompute the session key.
    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = Some(password.into());
        self.refresh_key(None);
    }

    /// Set the ring light color. No-op before readiness.
    pub fn set_color(&mut self, color: Rgb) {
        if !self.ready {
            tracing::debug!("set_color before ready ignored");
            return;
        }
        self.color = color;
        self.write_light();
    }

    /// Set the ring light intensity (0–100). No-op before readiness.
    pub fn set_intensity(&mut self, intensity: u8) {
        if !self.ready {
            tracing::debug!("set_intensity before ready ignored");
            return;
        }
        self.intensity = intensity;
        self.write_light();
    }

    /// Play a sound through the gateway speaker. No-op before readiness.
    pub fn set_sound(&mut self, sound: u32, volume: u8) {
        if !self.ready {
            tracing::debug!("set_sound before ready ignored");
            return;
        }
        self.sound = sound;
        self.volume = volume;
        self.write_sound();
    }

    pub fn ip(&self) -> IpAddr {
        self.ip
    }

    pub fn sid(&self) -> &str {
        &self.sid
    }

    /// True once the gateway's own state has been read.
    pub fn ready(&self) -> bool {
        self.ready
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn intensity(&self) -> u8 {
        self.intensity
    }

    pub fn sound(&self) -> u32 {
        self.sound
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    /// Look up a registered subdevice by registry id.
    pub fn subdevice(&self, sid: &str) -> Option<&Subdevice> {
        self.subdevices.get(sid)
    }

    /// Iterate over all registered subdevices.
    pub fn subdevices(&self) -> impl Iterator<Item = &Subdevice> {
        self.subdevices.values()
    }

    /// Register `sid` if unseen and feed it the decoded state. Re-discovery
    /// keeps the existing entry (and its click counters) and only forwards
    /// the state.
    fn register(&mut self, sid: String, kind: DeviceKind, state: &DeviceState, now: Instant) {
        if self.subdevices.contains_key(&sid) {
            tracing::debug!(%sid, "re-discovery of registered subdevice");
            self.forward(&sid, state, now);
            return;
        }

        let mut subdevice = Subdevice::new(sid.clone(), kind);
        for event in subdevice.handle_state(state, now) {
            self.emit(GatewayEvent::Device {
                sid: sid.clone(),
                event,
            });
        }
        self.subdevices.insert(sid.clone(), subdevice);
        tracing::debug!(%sid, %kind, "subdevice registered");
        self.emit(GatewayEvent::SubdeviceAdded { sid, kind });
    }

    fn forward(&mut self, sid: &str, state: &DeviceState, now: Instant) {
        let Some(subdevice) = self.subdevices.get_mut(sid) else {
            tracing::debug!(sid, "report for unregistered subdevice dropped");
            return;
        };
        let events = subdevice.handle_state(state, now);
        for event in events {
            self.emit(GatewayEvent::Device {
                sid: sid.to_string(),
                event,
            });
        }
    }

    /// Mirror the gateway's own light state from a self read/report.
    fn apply_light_state(&mut self, state: &DeviceState) {
        let Some(rgb) = state.rgb else {
            tracing::debug!("self state without rgb field");
            return;
        };
        let [intensity, r, g, b] = rgb.to_be_bytes();
        self.color = Rgb::new(r, g, b);
        self.intensity = intensity;
        self.emit(GatewayEvent::LightState {
            color: self.color,
            intensity,
        });
    }

    /// Recompute the session key. A `Some` token replaces the stored one;
    /// derivation only happens once both password and token are known.
    fn refresh_key(&mut self, token: Option<&str>) {
        if let Some(token) = token {
            self.token = Some(token.to_string());
        }
        let (Some(password), Some(token)) = (self.password.as_deref(), self.token.as_deref())
        else {
            return;
        };
        self.key = derive_write_key(password, token);
        if self.key.is_none() {
            tracing::warn!("write key not derivable; check that the password is 16 bytes");
        }
    }

    fn write_light(&mut self) {
        let Some(key) = self.key.as_deref() else {
            tracing::debug!("no session key, light write suppressed");
            return;
        };
        let rgb = u32::from_be_bytes([self.intensity, self.color.r, self.color.g, self.color.b]);
        match Command::write_light(self.sid.as_str(), rgb, key) {
            Ok(cmd) => self.transport.send_unicast(&cmd),
            Err(err) => tracing::warn!(%err, "failed to encode light write"),
        }
    }

    fn write_sound(&mut self) {
        let Some(key) = self.key.as_deref() else {
            tracing::debug!("no session key, sound write suppressed");
            return;
        };
        match Command::write_sound(self.sid.as_str(), self.sound, self.volume, key) {
            Ok(cmd) => self.transport.send_unicast(&cmd),
            Err(err) => tracing::warn!(%err, "failed to encode sound write"),
        }
    }

    fn emit(&self, event: GatewayEvent) {
        // a dropped receiver just means nobody is listening
        let _ = self.events.send(event);
    }
}

fn truthy(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}
