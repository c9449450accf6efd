//! Integration tests for the gateway state machine, driven through a
//! recording transport and the event channel.

use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use aqara_gateway::{
    Command, DeviceEvent, Gateway, GatewayConfig, GatewayEvent, Message, Rgb, UnicastSender,
};

const GATEWAY_SID: &str = "f0b4299a8b2c";
const PASSWORD: &str = "0987654321qwerty";
const TOKEN: &str = "1234567890abcdef";
// AES-128-CBC(PASSWORD, fixed IV, TOKEN), first block
const KEY: &str = "3eb43e37c20aff4c5872cc0d04d81314";

#[derive(Clone, Default)]
struct RecordingTransport(Arc<Mutex<Vec<Command>>>);

impl RecordingTransport {
    fn sent(&self) -> Vec<Command> {
        self.0.lock().unwrap().clone()
    }

    fn clear(&self) {
        self.0.lock().unwrap().clear();
    }
}

impl UnicastSender for RecordingTransport {
    fn send_unicast(&self, command: &Command) {
        self.0.lock().unwrap().push(command.clone());
    }
}

fn init_logging() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn gateway() -> (Gateway, RecordingTransport, Receiver<GatewayEvent>) {
    init_logging();
    let transport = RecordingTransport::default();
    let config = GatewayConfig::new("192.168.1.50".parse().unwrap(), GATEWAY_SID);
    let mut gateway = Gateway::new(config, Box::new(transport.clone()));
    let events = gateway.take_event_receiver().unwrap();
    (gateway, transport, events)
}

fn msg(json: &str) -> Message {
    Message::parse(json).unwrap()
}

fn drain(events: &Receiver<GatewayEvent>) -> Vec<GatewayEvent> {
    events.try_iter().collect()
}

/// Drive the gateway to readiness with a known session key.
fn make_ready(gateway: &mut Gateway) {
    gateway.set_password(PASSWORD);
    gateway
        .handle_message(&msg(&format!(
            r#"{{"cmd":"heartbeat","model":"gateway","sid":"{GATEWAY_SID}","token":"{TOKEN}"}}"#
        )))
        .unwrap();
    gateway
        .handle_message(&msg(&format!(
            r#"{{"cmd":"read_ack","model":"gateway","sid":"{GATEWAY_SID}","data":"{{\"rgb\":855605248}}"}}"#
        )))
        .unwrap();
    assert!(gateway.ready());
}

#[test]
fn test_construction_issues_discovery() {
    let (_gateway, transport, _events) = gateway();
    assert_eq!(transport.sent(), vec![Command::GetIdList]);
}

#[test]
fn test_id_list_ack_reads_self_then_subdevices() {
    let (mut gateway, transport, _events) = gateway();
    transport.clear();

    let handled = gateway
        .handle_message(&msg(&format!(
            r#"{{"cmd":"get_id_list_ack","sid":"{GATEWAY_SID}","token":"{TOKEN}","data":"[\"sidA\",\"sidB\"]"}}"#
        )))
        .unwrap();

    assert!(handled);
    assert_eq!(
        transport.sent(),
        vec![
            Command::read(GATEWAY_SID),
            Command::read("sidA"),
            Command::read("sidB"),
        ]
    );
}

#[test]
fn test_id_list_ack_without_data_is_an_error() {
    let (mut gateway, _transport, _events) = gateway();
    let result = gateway.handle_message(&msg(&format!(
        r#"{{"cmd":"get_id_list_ack","sid":"{GATEWAY_SID}","token":"{TOKEN}"}}"#
    )));
    assert!(result.is_err());
}

#[test]
fn test_self_read_ack_marks_ready_and_mirrors_light() {
    let (mut gateway, _transport, events) = gateway();

    // intensity 0x32 = 50, r 0xFF, g 0x80, b 0x00
    let handled = gateway
        .handle_message(&msg(&format!(
            r#"{{"cmd":"read_ack","model":"gateway","sid":"{GATEWAY_SID}","data":"{{\"rgb\":855605248}}"}}"#
        )))
        .unwrap();

    assert!(handled);
    assert!(gateway.ready());
    assert_eq!(gateway.intensity(), 50);
    assert_eq!(gateway.color(), Rgb::new(255, 128, 0));
    assert_eq!(
        drain(&events),
        vec![
            GatewayEvent::LightState {
                color: Rgb::new(255, 128, 0),
                intensity: 50
            },
            GatewayEvent::Ready,
        ]
    );
}

#[test]
fn test_ready_is_emitted_once() {
    let (mut gateway, _transport, events) = gateway();

    let self_read = format!(
        r#"{{"cmd":"read_ack","model":"gateway","sid":"{GATEWAY_SID}","data":"{{\"rgb\":855605248}}"}}"#
    );
    gateway.handle_message(&msg(&self_read)).unwrap();
    gateway.handle_message(&msg(&self_read)).unwrap();

    let ready_count = drain(&events)
        .iter()
        .filter(|e| matches!(e, GatewayEvent::Ready))
        .count();
    assert_eq!(ready_count, 1);
}

#[test]
fn test_self_report_mirrors_light_without_granting_ready() {
    let (mut gateway, _transport, events) = gateway();

    gateway
        .handle_message(&msg(&format!(
            r#"{{"cmd":"report","model":"gateway","sid":"{GATEWAY_SID}","data":"{{\"rgb\":855605248}}"}}"#
        )))
        .unwrap();

    assert!(!gateway.ready());
    assert_eq!(
        drain(&events),
        vec![GatewayEvent::LightState {
            color: Rgb::new(255, 128, 0),
            intensity: 50
        }]
    );
}

#[test]
fn test_read_ack_registers_subdevice_and_forwards_state() {
    let (mut gateway, _transport, events) = gateway();

    let handled = gateway
        .handle_message(&msg(
            r#"{"cmd":"read_ack","model":"magnet","sid":"158d01","data":"{\"status\":\"open\"}"}"#,
        ))
        .unwrap();

    assert!(handled);
    assert!(gateway.subdevice("158d01").is_some());
    let events = drain(&events);
    assert!(events.contains(&GatewayEvent::Device {
        sid: "158d01".to_string(),
        event: DeviceEvent::Open,
    }));
    assert!(events
        .iter()
        .any(|e| matches!(e, GatewayEvent::SubdeviceAdded { sid, .. } if sid == "158d01")));
}

#[test]
fn test_rediscovery_keeps_existing_entry() {
    let (mut gateway, _transport, events) = gateway();

    let read = r#"{"cmd":"read_ack","model":"magnet","sid":"158d01","data":"{\"status\":\"open\"}"}"#;
    gateway.handle_message(&msg(read)).unwrap();
    gateway.handle_message(&msg(read)).unwrap();

    let added = drain(&events)
        .iter()
        .filter(|e| matches!(e, GatewayEvent::SubdeviceAdded { .. }))
        .count();
    assert_eq!(added, 1);
    assert_eq!(gateway.subdevices().count(), 1);
}

#[test]
fn test_unknown_model_is_not_handled() {
    let (mut gateway, _transport, _events) = gateway();

    let handled = gateway
        .handle_message(&msg(
            r#"{"cmd":"read_ack","model":"plug","sid":"158d02","data":"{}"}"#,
        ))
        .unwrap();

    assert!(!handled);
    assert!(gateway.subdevice("158d02").is_none());
}

#[test]
fn test_unknown_cmd_is_not_handled() {
    let (mut gateway, _transport, _events) = gateway();
    let handled = gateway
        .handle_message(&msg(r#"{"cmd":"iam","sid":"f0b4299a8b2c"}"#))
        .unwrap();
    assert!(!handled);
}

#[test]
fn test_malformed_data_propagates() {
    let (mut gateway, _transport, _events) = gateway();
    let result = gateway.handle_message(&msg(
        r#"{"cmd":"report","model":"magnet","sid":"158d01","data":"{broken"}"#,
    ));
    assert!(result.is_err());
}

#[test]
fn test_report_for_unregistered_subdevice_is_dropped() {
    let (mut gateway, _transport, events) = gateway();

    let handled = gateway
        .handle_message(&msg(
            r#"{"cmd":"report","model":"magnet","sid":"158d09","data":"{\"status\":\"open\"}"}"#,
        ))
        .unwrap();

    assert!(handled);
    assert!(drain(&events).is_empty());
}

#[test]
fn test_dual_wall_switch_occupies_two_entries() {
    let (mut gateway, _transport, _events) = gateway();

    gateway
        .handle_message(&msg(
            r#"{"cmd":"read_ack","model":"86sw2","sid":"158d0X","data":"{}"}"#,
        ))
        .unwrap();

    assert!(gateway.subdevice("158d0X").is_none());
    assert!(gateway.subdevice("158d0X_left").is_some());
    assert!(gateway.subdevice("158d0X_right").is_some());
}

#[test]
fn test_dual_wall_switch_report_routes_by_channel() {
    let (mut gateway, _transport, events) = gateway();

    gateway
        .handle_message(&msg(
            r#"{"cmd":"read_ack","model":"86sw2","sid":"158d0X","data":"{}"}"#,
        ))
        .unwrap();
    drain(&events);

    gateway
        .handle_message(&msg(
            r#"{"cmd":"report","model":"86sw2","sid":"158d0X","data":"{\"channel_0\":\"click\"}"}"#,
        ))
        .unwrap();
    assert_eq!(
        drain(&events),
        vec![GatewayEvent::Device {
            sid: "158d0X_left".to_string(),
            event: DeviceEvent::Click { step: 1 },
        }]
    );

    gateway
        .handle_message(&msg(
            r#"{"cmd":"report","model":"86sw2","sid":"158d0X","data":"{\"channel_1\":\"click\"}"}"#,
        ))
        .unwrap();
    assert_eq!(
        drain(&events),
        vec![GatewayEvent::Device {
            sid: "158d0X_right".to_string(),
            event: DeviceEvent::Click { step: 1 },
        }]
    );
}

#[test]
fn test_writes_before_ready_are_ignored() {
    let (mut gateway, transport, _events) = gateway();
    transport.clear();

    gateway.set_color(Rgb::new(255, 0, 0));
    gateway.set_intensity(80);
    gateway.set_sound(10001, 50);

    assert!(transport.sent().is_empty());
}

#[test]
fn test_write_without_session_key_is_suppressed() {
    let (mut gateway, transport, _events) = gateway();
    // ready, but no password was ever supplied
    gateway
        .handle_message(&msg(&format!(
            r#"{{"cmd":"read_ack","model":"gateway","sid":"{GATEWAY_SID}","data":"{{\"rgb\":855605248}}"}}"#
        )))
        .unwrap();
    transport.clear();

    gateway.set_color(Rgb::new(0, 255, 0));
    assert!(transport.sent().is_empty());
}

#[test]
fn test_set_color_packs_intensity_and_rgb() {
    let (mut gateway, transport, _events) = gateway();
    make_ready(&mut gateway);
    transport.clear();

    // intensity stays at the mirrored 50 (0x32)
    gateway.set_color(Rgb::new(0, 255, 0));

    assert_eq!(
        transport.sent(),
        vec![Command::write_light(GATEWAY_SID, 0x3200_FF00, KEY).unwrap()]
    );
    assert_eq!(gateway.color(), Rgb::new(0, 255, 0));
}

#[test]
fn test_set_intensity_keeps_color() {
    let (mut gateway, transport, _events) = gateway();
    make_ready(&mut gateway);
    transport.clear();

    gateway.set_intensity(100);

    // color stays at the mirrored 0xFF8000
    assert_eq!(
        transport.sent(),
        vec![Command::write_light(GATEWAY_SID, 0x64FF_8000, KEY).unwrap()]
    );
}

#[test]
fn test_set_sound_embeds_key() {
    let (mut gateway, transport, _events) = gateway();
    make_ready(&mut gateway);
    transport.clear();

    gateway.set_sound(10001, 50);

    assert_eq!(
        transport.sent(),
        vec![Command::write_sound(GATEWAY_SID, 10001, 50, KEY).unwrap()]
    );
    assert_eq!(gateway.sound(), 10001);
    assert_eq!(gateway.volume(), 50);
}

#[test]
fn test_password_after_token_still_derives_key() {
    let (mut gateway, transport, _events) = gateway();

    // token arrives first, password afterwards
    gateway
        .handle_message(&msg(&format!(
            r#"{{"cmd":"heartbeat","model":"gateway","sid":"{GATEWAY_SID}","token":"{TOKEN}"}}"#
        )))
        .unwrap();
    gateway.set_password(PASSWORD);
    gateway
        .handle_message(&msg(&format!(
            r#"{{"cmd":"read_ack","model":"gateway","sid":"{GATEWAY_SID}","data":"{{\"rgb\":855605248}}"}}"#
        )))
        .unwrap();
    transport.clear();

    gateway.set_sound(2, 10);
    assert_eq!(
        transport.sent(),
        vec![Command::write_sound(GATEWAY_SID, 2, 10, KEY).unwrap()]
    );
}

#[test]
fn test_heartbeats_keep_gateway_online() {
    init_logging();
    let transport = RecordingTransport::default();
    let mut config = GatewayConfig::new("192.168.1.50".parse().unwrap(), GATEWAY_SID);
    config.heartbeat_interval = Duration::from_millis(50);
    config.offline_ratio = 2;
    let mut gateway = Gateway::new(config, Box::new(transport.clone()));
    let events = gateway.take_event_receiver().unwrap();

    let heartbeat = format!(
        r#"{{"cmd":"heartbeat","model":"gateway","sid":"{GATEWAY_SID}","token":"{TOKEN}"}}"#
    );
    for _ in 0..8 {
        thread::sleep(Duration::from_millis(40));
        gateway.handle_message(&msg(&heartbeat)).unwrap();
    }
    assert!(!drain(&events).contains(&GatewayEvent::Offline));

    // stop heartbeating: exactly one offline notification
    assert_eq!(
        events.recv_timeout(Duration::from_secs(2)),
        Ok(GatewayEvent::Offline)
    );
    assert!(events.recv_timeout(Duration::from_millis(300)).is_err());
}

#[test]
fn test_foreign_heartbeat_does_not_rearm() {
    init_logging();
    let transport = RecordingTransport::default();
    let mut config = GatewayConfig::new("192.168.1.50".parse().unwrap(), GATEWAY_SID);
    config.heartbeat_interval = Duration::from_millis(40);
    config.offline_ratio = 2;
    let mut gateway = Gateway::new(config, Box::new(transport.clone()));
    let events = gateway.take_event_receiver().unwrap();

    let foreign =
        r#"{"cmd":"heartbeat","model":"gateway","sid":"some_other_hub","token":"ffffffffffffffff"}"#;
    for _ in 0..6 {
        thread::sleep(Duration::from_millis(30));
        gateway.handle_message(&msg(foreign)).unwrap();
    }

    assert!(drain(&events).contains(&GatewayEvent::Offline));
}
