//! Shared fakes for the integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use std::collections::VecDeque;

use anyhow::{bail, Result};
use rgb_ledstrip::{InboundMessage, MessageTransport, PwmChannel, PwmOutput, Topics};

pub const BASE_TOPIC: &str = "action/rgb-ledstrip";
pub const DOOR_W1_TOPIC: &str = "door/w1/lock";
pub const DOOR_W2_TOPIC: &str = "door/w2/lock";

pub fn test_topics() -> Topics {
    Topics::new(BASE_TOPIC, DOOR_W1_TOPIC, DOOR_W2_TOPIC)
}

// ============================================================================
// Mock PWM
// ============================================================================

/// Records the last duty written per channel and how many writes happened.
#[derive(Debug, Default)]
pub struct MockPwm {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub writes: usize,
    pub fail: bool,
}

impl MockPwm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn duties(&self) -> (u8, u8, u8) {
        (self.red, self.green, self.blue)
    }
}

impl PwmOutput for MockPwm {
    fn set_duty(&mut self, channel: PwmChannel, duty: u8) -> Result<()> {
        if self.fail {
            bail!("pwm unavailable");
        }
        match channel {
            PwmChannel::Red => self.red = duty,
            PwmChannel::Green => self.green = duty,
            PwmChannel::Blue => self.blue = duty,
        }
        self.writes += 1;
        Ok(())
    }
}

// ============================================================================
// Mock Transport
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    pub topic: String,
    pub payload: String,
    pub retain: bool,
}

/// Broker fake: refuses the first `failing_attempts` connects, queues
/// inbound messages and records subscriptions and publishes.
#[derive(Debug, Default)]
pub struct MockTransport {
    pub connected: bool,
    pub failing_attempts: usize,
    pub connect_attempts: usize,
    pub subscriptions: Vec<String>,
    pub published: Vec<Published>,
    pub inbox: VecDeque<InboundMessage>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connected() -> Self {
        Self {
            connected: true,
            ..Self::default()
        }
    }

    pub fn failing(attempts: usize) -> Self {
        Self {
            failing_attempts: attempts,
            ..Self::default()
        }
    }

    pub fn push(&mut self, topic: &str, payload: &str) {
        self.inbox
            .push_back(InboundMessage::new(topic, payload.as_bytes()));
    }

    pub fn published_on(&self, topic: &str) -> Vec<&Published> {
        self.published.iter().filter(|p| p.topic == topic).collect()
    }
}

impl MessageTransport for MockTransport {
    fn is_connected(&self) -> bool {
        self.connected
    }

    fn connect(&mut self) -> Result<()> {
        self.connect_attempts += 1;
        if self.connect_attempts <= self.failing_attempts {
            bail!("connection refused");
        }
        self.connected = true;
        Ok(())
    }

    fn subscribe(&mut self, topic: &str) -> Result<()> {
        self.subscriptions.push(topic.to_string());
        Ok(())
    }

    fn publish(&mut self, topic: &str, payload: &[u8], retain: bool) -> Result<()> {
        self.published.push(Published {
            topic: topic.to_string(),
            payload: String::from_utf8_lossy(payload).into_owned(),
            retain,
        });
        Ok(())
    }

    fn poll(&mut self) -> Option<InboundMessage> {
        self.inbox.pop_front()
    }
}
