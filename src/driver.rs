use anyhow::{Context, Result};
use core::time::Duration;
use log::{error, info, warn};
use std::thread::sleep;

use crate::led::{ColorTarget, PwmOutput};
use crate::light_controller::LightController;
use crate::message_controller::MessageController;
use crate::renderer::Renderer;
use crate::status::{modes_message, BuildInfo, OnlineStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub topic: String,
    pub payload: Vec<u8>,
}

impl InboundMessage {
    pub fn new(topic: &str, payload: &[u8]) -> InboundMessage {
        InboundMessage {
            topic: topic.to_string(),
            payload: payload.to_vec(),
        }
    }
}

/// Publish/subscribe broker connection as seen by the control loop.
pub trait MessageTransport {
    fn is_connected(&self) -> bool;

    /// One connection attempt. The last will is configured by the transport.
    fn connect(&mut self) -> Result<()>;

    fn subscribe(&mut self, topic: &str) -> Result<()>;

    fn publish(&mut self, topic: &str, payload: &[u8], retain: bool) -> Result<()>;

    /// Next queued inbound message, without blocking.
    fn poll(&mut self) -> Option<InboundMessage>;
}

/// Control loop state: one call to [`TickDriver::tick`] per loop iteration.
pub struct TickDriver {
    lights: LightController,
    renderer: Renderer,
    messages: MessageController,
    ip: String,
    reconnect_delay: Duration,
    last_render_ms: Option<u128>,
}

impl TickDriver {
    pub fn new(
        lights: LightController,
        messages: MessageController,
        ip: &str,
        reconnect_delay: Duration,
    ) -> TickDriver {
        TickDriver {
            lights,
            renderer: Renderer::new(),
            messages,
            ip: ip.to_string(),
            reconnect_delay,
            last_render_ms: None,
        }
    }

    pub fn lights(&self) -> &LightController {
        &self.lights
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn set_ip(&mut self, ip: &str) {
        self.ip = ip.to_string();
    }

    pub fn tick(
        &mut self,
        now: Duration,
        transport: &mut impl MessageTransport,
        output: &mut impl PwmOutput,
    ) -> Result<()> {
        if !transport.is_connected() {
            self.reconnect(transport);
        }

        while let Some(message) = transport.poll() {
            self.dispatch(&message);
        }

        self.lights.tick(now);

        let now_ms = now.as_millis();
        if self.last_render_ms.map_or(true, |last| now_ms > last) {
            self.last_render_ms = Some(now_ms);
            self.renderer
                .render(self.lights.target(), self.lights.renders_instantly(), output)?;
        }

        Ok(())
    }

    /// Handle one inbound message. Failures are logged and leave state untouched.
    pub fn dispatch(&mut self, message: &InboundMessage) {
        let command = match self.messages.interpret(&message.topic, &message.payload) {
            Ok(Some(command)) => command,
            Ok(None) => return,
            Err(e) => {
                warn!("Dropping message: {:#}", e);
                return;
            }
        };

        if let Err(e) = self.lights.apply(command) {
            warn!("Command on \"{}\" partially rejected: {:#}", message.topic, e);
        }
    }

    /// Block until the transport is connected, then subscribe and announce.
    pub fn reconnect(&mut self, transport: &mut impl MessageTransport) {
        loop {
            info!("Attempting MQTT connection...");
            match self.connect_and_announce(transport) {
                Ok(()) => return,
                Err(e) => {
                    error!(
                        "MQTT connection failed: {:#}, retrying in {:?}",
                        e, self.reconnect_delay
                    );
                    sleep(self.reconnect_delay);
                }
            }
        }
    }

    fn connect_and_announce(&self, transport: &mut impl MessageTransport) -> Result<()> {
        transport.connect()?;
        info!("MQTT connected");

        for topic in self.messages.topics().subscriptions() {
            transport
                .subscribe(topic)
                .with_context(|| format!("Failed to subscribe to topic \"{}\"", topic))?;
            info!("Subscribed to topic: \"{}\"", topic);
        }

        let topics = self.messages.topics();
        let online = OnlineStatus::new(&self.ip, true).to_message()?;
        transport.publish(&topics.online, &online, true)?;
        transport.publish(&topics.modes, &modes_message()?, false)?;
        transport.publish(&topics.info, &BuildInfo::current().to_message()?, false)?;

        Ok(())
    }

    /// Blink red while the network is coming up, bypassing the fade.
    pub fn indicate_connecting(&mut self, now: Duration, output: &mut impl PwmOutput) -> Result<()> {
        self.lights.tick_connecting(now);
        self.renderer.render(self.lights.target(), true, output)
    }

    /// Leave the connecting blink and switch the strip off.
    pub fn finish_connecting(&mut self, output: &mut impl PwmOutput) -> Result<()> {
        self.lights.set_target(ColorTarget::OFF);
        self.renderer.render(self.lights.target(), true, output)
    }
}
