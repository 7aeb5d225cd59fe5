mod common;
use common::*;

use core::time::Duration;

use rgb_ledstrip::status::{BuildInfo, OnlineStatus};
use rgb_ledstrip::{ColorTarget, LightController, MessageController, Mode, RgbColor, TickDriver};
use serde_json::json;

fn driver(status_commands_enabled: bool) -> TickDriver {
    TickDriver::new(
        LightController::new(status_commands_enabled),
        MessageController::new(test_topics()),
        "10.0.0.7",
        Duration::ZERO,
    )
}

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

#[test]
fn light_command_fades_in_to_full_red() {
    let mut driver = driver(false);
    let mut transport = MockTransport::connected();
    let mut pwm = MockPwm::new();

    driver.tick(ms(0), &mut transport, &mut pwm).unwrap();
    assert_eq!(driver.lights().mode(), Mode::Default);
    assert_eq!(*driver.lights().target(), ColorTarget::OFF);

    transport.push("action/rgb-ledstrip/light", r#"{"r":1000,"g":0,"b":0}"#);
    driver.tick(ms(1), &mut transport, &mut pwm).unwrap();
    assert_eq!(
        *driver.lights().target(),
        ColorTarget::new(RgbColor::new(255, 0, 0), 255)
    );

    for millis in 2..=300 {
        driver.tick(ms(millis), &mut transport, &mut pwm).unwrap();
    }

    assert_eq!(pwm.duties(), (255, 0, 0));
    assert!(driver.renderer().state().matches(driver.lights().target()));
}

#[test]
fn renders_at_most_once_per_millisecond() {
    let mut driver = driver(false);
    let mut transport = MockTransport::connected();
    let mut pwm = MockPwm::new();

    driver.tick(Duration::from_micros(100), &mut transport, &mut pwm).unwrap();
    driver.tick(Duration::from_micros(400), &mut transport, &mut pwm).unwrap();
    driver.tick(Duration::from_micros(900), &mut transport, &mut pwm).unwrap();
    assert_eq!(pwm.writes, 3);

    driver.tick(Duration::from_micros(1100), &mut transport, &mut pwm).unwrap();
    assert_eq!(pwm.writes, 6);
}

#[test]
fn malformed_and_unknown_messages_change_nothing() {
    let mut driver = driver(true);
    let mut transport = MockTransport::connected();
    let mut pwm = MockPwm::new();
    driver.tick(ms(0), &mut transport, &mut pwm).unwrap();
    let before = driver.lights().clone();

    transport.push("action/rgb-ledstrip/light", "{\"r\":");
    transport.push("action/rgb-ledstrip/status", "not json");
    transport.push(DOOR_W1_TOPIC, "");
    transport.push("somewhere/else", r#"{"r":1000}"#);
    driver.tick(ms(1), &mut transport, &mut pwm).unwrap();

    assert_eq!(driver.lights().mode(), before.mode());
    assert_eq!(driver.lights().target(), before.target());
    assert_eq!(driver.lights().doors(), before.doors());
    assert!(transport.inbox.is_empty());
}

#[test]
fn strobe_renders_without_fade() {
    let mut driver = driver(true);
    let mut transport = MockTransport::connected();
    let mut pwm = MockPwm::new();

    transport.push("action/rgb-ledstrip/status", r#"{"br":255,"mode":2}"#);
    driver.tick(ms(0), &mut transport, &mut pwm).unwrap();
    assert_eq!(driver.lights().mode(), Mode::Strobe);

    driver.tick(ms(100), &mut transport, &mut pwm).unwrap();
    assert_eq!(pwm.duties(), (255, 255, 255));

    driver.tick(ms(200), &mut transport, &mut pwm).unwrap();
    assert_eq!(pwm.duties(), (0, 0, 0));
}

#[test]
fn door_indicator_reflects_lock_feed() {
    let mut driver = driver(true);
    let mut transport = MockTransport::connected();
    let mut pwm = MockPwm::new();

    transport.push("action/rgb-ledstrip/status", r#"{"br":255,"mode":3}"#);
    transport.push(DOOR_W1_TOPIC, r#"{"Locked":true}"#);
    driver.tick(ms(100), &mut transport, &mut pwm).unwrap();

    assert!(driver.lights().doors().w1_locked);
    assert_eq!(driver.lights().target().color, RgbColor::new(255, 0, 0));
}

#[test]
fn reconnect_retries_until_connected_then_announces() {
    let mut driver = driver(false);
    let mut transport = MockTransport::failing(2);
    let mut pwm = MockPwm::new();

    driver.tick(ms(0), &mut transport, &mut pwm).unwrap();

    assert_eq!(transport.connect_attempts, 3);
    assert!(transport.connected);
    assert_eq!(transport.subscriptions.len(), 4);
    assert!(transport
        .subscriptions
        .contains(&"action/rgb-ledstrip/light".to_string()));

    let online = transport.published_on("action/rgb-ledstrip/online");
    assert_eq!(online.len(), 1);
    assert!(online[0].retain);
    let online: OnlineStatus = serde_json::from_str(&online[0].payload).unwrap();
    assert_eq!(online, OnlineStatus::new("10.0.0.7", true));

    let modes = transport.published_on("action/rgb-ledstrip/modes");
    assert_eq!(modes.len(), 1);
    let modes: serde_json::Value = serde_json::from_str(&modes[0].payload).unwrap();
    assert_eq!(modes["Default"], json!(0));
    assert_eq!(modes["Strobe"], json!(2));
    assert_eq!(modes["DoorW2"], json!(4));
    assert_eq!(modes.as_object().unwrap().len(), Mode::ALL.len());

    let info = transport.published_on("action/rgb-ledstrip/info");
    assert_eq!(info.len(), 1);
    let info: BuildInfo = serde_json::from_str(&info[0].payload).unwrap();
    assert_eq!(info, BuildInfo::current());
}

#[test]
fn connected_transport_is_not_reannounced() {
    let mut driver = driver(false);
    let mut transport = MockTransport::connected();
    let mut pwm = MockPwm::new();

    driver.tick(ms(0), &mut transport, &mut pwm).unwrap();
    driver.tick(ms(1), &mut transport, &mut pwm).unwrap();

    assert_eq!(transport.connect_attempts, 0);
    assert!(transport.published.is_empty());
}

#[test]
fn connecting_indicator_blinks_then_switches_off() {
    let mut driver = driver(false);
    let mut pwm = MockPwm::new();

    driver.indicate_connecting(ms(100), &mut pwm).unwrap();
    assert_eq!(pwm.duties(), (255, 0, 0));

    driver.indicate_connecting(ms(200), &mut pwm).unwrap();
    assert_eq!(pwm.duties(), (0, 0, 0));

    driver.indicate_connecting(ms(300), &mut pwm).unwrap();
    driver.finish_connecting(&mut pwm).unwrap();
    assert_eq!(pwm.duties(), (0, 0, 0));
    assert_eq!(*driver.lights().target(), ColorTarget::OFF);
    assert_eq!(driver.lights().mode(), Mode::Default);
}
