use anyhow::{Context, Result};
use log::{debug, warn};
use serde_json::{Map, Value};

use crate::config::Config;

pub const LIGHT_INPUT_MAX: u64 = 1000;

/// Topics the strip listens and announces on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topics {
    pub status: String,
    pub light: String,
    pub online: String,
    pub modes: String,
    pub info: String,
    pub door_w1: String,
    pub door_w2: String,
}

impl Topics {
    pub fn new(base: &str, door_w1: &str, door_w2: &str) -> Topics {
        let base = base.trim_end_matches('/');
        Topics {
            status: format!("{base}/status"),
            light: format!("{base}/light"),
            online: format!("{base}/online"),
            modes: format!("{base}/modes"),
            info: format!("{base}/info"),
            door_w1: door_w1.to_string(),
            door_w2: door_w2.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Topics {
        Topics::new(
            config.mqtt_base_topic,
            config.door_w1_topic,
            config.door_w2_topic,
        )
    }

    pub fn subscriptions(&self) -> [&str; 4] {
        [
            self.status.as_str(),
            self.light.as_str(),
            self.door_w1.as_str(),
            self.door_w2.as_str(),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Door {
    W1,
    W2,
}

/// Full status command; every field is optional.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StatusCommand {
    pub red: Option<u8>,
    pub green: Option<u8>,
    pub blue: Option<u8>,
    pub brightness: Option<u8>,
    /// Raw mode index, validated when applied.
    pub mode: Option<i64>,
}

/// Color command with channels already rescaled to 0-255.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LightCommand {
    pub red: Option<u8>,
    pub green: Option<u8>,
    pub blue: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Status(StatusCommand),
    Light(LightCommand),
    DoorLock { door: Door, locked: Option<bool> },
}

/// Routes inbound messages by topic and decodes their JSON payloads.
#[derive(Debug, Clone)]
pub struct MessageController {
    topics: Topics,
}

impl MessageController {
    pub fn new(topics: Topics) -> MessageController {
        MessageController { topics }
    }

    pub fn topics(&self) -> &Topics {
        &self.topics
    }

    /// Decode a message into a command.
    ///
    /// `Ok(None)` means the topic is not one of ours. A payload that is not a
    /// JSON object is an error and must not touch any state.
    pub fn interpret(&self, topic: &str, payload: &[u8]) -> Result<Option<Command>> {
        let command = if topic == self.topics.status {
            let fields = decode_object(topic, payload)?;
            Command::Status(status_command(&fields))
        } else if topic == self.topics.light {
            let fields = decode_object(topic, payload)?;
            Command::Light(light_command(&fields))
        } else if topic == self.topics.door_w1 || topic == self.topics.door_w2 {
            let fields = decode_object(topic, payload)?;
            let door = if topic == self.topics.door_w1 {
                Door::W1
            } else {
                Door::W2
            };
            Command::DoorLock {
                door,
                locked: fields.get("Locked").and_then(Value::as_bool),
            }
        } else {
            debug!("Unrecognized topic \"{}\"", topic);
            return Ok(None);
        };

        Ok(Some(command))
    }
}

fn decode_object(topic: &str, payload: &[u8]) -> Result<Map<String, Value>> {
    serde_json::from_slice(payload)
        .with_context(|| format!("Failed to decode payload on topic \"{}\"", topic))
}

fn status_command(fields: &Map<String, Value>) -> StatusCommand {
    StatusCommand {
        red: channel_field(fields, "r"),
        green: channel_field(fields, "g"),
        blue: channel_field(fields, "b"),
        brightness: channel_field(fields, "br"),
        mode: mode_field(fields),
    }
}

fn light_command(fields: &Map<String, Value>) -> LightCommand {
    LightCommand {
        red: light_field(fields, "r"),
        green: light_field(fields, "g"),
        blue: light_field(fields, "b"),
    }
}

fn channel_field(fields: &Map<String, Value>, key: &str) -> Option<u8> {
    let value = fields.get(key)?;
    let channel = value.as_u64().and_then(|raw| u8::try_from(raw).ok());
    if channel.is_none() {
        warn!("Skipping field \"{}\": expected 0-255, got {}", key, value);
    }

    channel
}

fn mode_field(fields: &Map<String, Value>) -> Option<i64> {
    let value = fields.get("mode")?;
    let mode = value.as_i64();
    if mode.is_none() {
        warn!("Skipping field \"mode\": expected a mode index, got {}", value);
    }

    mode
}

fn light_field(fields: &Map<String, Value>, key: &str) -> Option<u8> {
    let value = fields.get(key)?;
    let Some(raw) = value.as_u64() else {
        warn!("Skipping field \"{}\": expected 0-{}, got {}", key, LIGHT_INPUT_MAX, value);
        return None;
    };

    Some(rescale_light(raw))
}

/// Map a 0-1000 light channel onto 0-255, truncating. Larger inputs saturate.
pub fn rescale_light(value: u64) -> u8 {
    (value.min(LIGHT_INPUT_MAX) * 255 / LIGHT_INPUT_MAX) as u8
}
