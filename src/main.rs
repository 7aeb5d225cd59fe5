#[cfg(target_os = "espidf")]
mod mqtt_client;
#[cfg(target_os = "espidf")]
mod pwm;
#[cfg(target_os = "espidf")]
mod wifi_control;

#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    use esp_idf_hal::prelude::Peripherals;
    use esp_idf_svc::eventloop::EspSystemEventLoop;
    use log::{error, info, warn};
    use mqtt_client::MqttClient;
    use pwm::LedcPwm;
    use rgb_ledstrip::{
        config::CONFIG, status::OnlineStatus, LightController, MessageController, TickDriver,
        Topics,
    };
    use std::{
        thread::sleep,
        time::{Duration, Instant},
    };
    use wifi_control::connect_to_wifi;

    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();

    let app_config = CONFIG;
    let boot = Instant::now();

    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;

    let mut pwm = LedcPwm::new(
        peripherals.ledc,
        peripherals.pins.gpio5,
        peripherals.pins.gpio6,
        peripherals.pins.gpio7,
        app_config.pwm_frequency_hz,
    )?;

    let topics = Topics::from_config(&app_config);
    let mut driver = TickDriver::new(
        LightController::new(app_config.status_commands_enabled),
        MessageController::new(topics.clone()),
        "",
        app_config.reconnect_delay(),
    );

    let (_wifi_connection, ip) = connect_to_wifi(
        app_config.wifi_ssid,
        app_config.wifi_psk,
        peripherals.modem,
        sysloop,
        || {
            if let Err(e) = driver.indicate_connecting(boot.elapsed(), &mut pwm) {
                warn!("Failed to show connecting indicator: {:#}", e);
            }
        },
    )?;

    driver.finish_connecting(&mut pwm)?;
    driver.set_ip(&ip);

    let last_will = OnlineStatus::new(&ip, false).to_message()?;
    let mut client = MqttClient::new(
        app_config.mqtt_broker_address,
        app_config.mqtt_client_id,
        &topics.online,
        &last_will,
    )?;

    info!("Entering control loop");
    loop {
        if let Err(e) = driver.tick(boot.elapsed(), &mut client, &mut pwm) {
            error!("Tick failed: {:#}", e);
        }
        sleep(Duration::from_millis(1));
    }
}

#[cfg(not(target_os = "espidf"))]
fn main() -> anyhow::Result<()> {
    anyhow::bail!("rgb-ledstrip is firmware for ESP-IDF targets; build it for an espidf target")
}
