use core::time::Duration;

/// Build-time configuration, read from `cfg.toml` by `toml-cfg`.
#[toml_cfg::toml_config]
pub struct Config {
    #[default("")]
    pub wifi_ssid: &'static str,
    #[default("")]
    pub wifi_psk: &'static str,
    #[default("mqtt://localhost:1883")]
    pub mqtt_broker_address: &'static str,
    #[default("esp32-rgb-ledstrip")]
    pub mqtt_client_id: &'static str,
    #[default("action/rgb-ledstrip")]
    pub mqtt_base_topic: &'static str,
    #[default("door/w1/lock")]
    pub door_w1_topic: &'static str,
    #[default("door/w2/lock")]
    pub door_w2_topic: &'static str,
    #[default(1000)]
    pub pwm_frequency_hz: u32,
    #[default(5000)]
    pub reconnect_delay_ms: u64,
    #[default(false)]
    pub status_commands_enabled: bool,
}

impl Config {
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }
}
