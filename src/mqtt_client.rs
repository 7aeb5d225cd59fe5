use anyhow::{bail, Result};
use embedded_svc::mqtt::client::QoS;
use esp_idf_svc::mqtt::client::{
    Details, EspMqttClient, EspMqttConnection, EventPayload, LwtConfiguration,
    MqttClientConfiguration,
};
use log::{info, warn};
use rgb_ledstrip::{InboundMessage, MessageTransport};
use std::{
    sync::{
        atomic::{AtomicBool, AtomicU32, Ordering},
        mpsc::{channel, Receiver, Sender},
        Arc,
    },
    thread,
};

#[derive(Default)]
struct Session {
    connected: AtomicBool,
    /// Bumped on every broker (re)connect so a fresh session gets re-announced.
    generation: AtomicU32,
}

/// ESP-IDF MQTT client; events are received on a background thread and
/// queued for the control loop.
pub struct MqttClient {
    client: EspMqttClient<'static>,
    inbox: Receiver<InboundMessage>,
    session: Arc<Session>,
    announced_generation: Option<u32>,
}

impl MqttClient {
    pub fn new(
        broker_address: &'static str,
        client_id: &'static str,
        will_topic: &str,
        will_payload: &[u8],
    ) -> Result<MqttClient> {
        let (client, connection) = EspMqttClient::new(
            broker_address,
            &MqttClientConfiguration {
                client_id: Some(client_id),
                lwt: Some(LwtConfiguration {
                    topic: will_topic,
                    payload: will_payload,
                    qos: QoS::AtMostOnce,
                    retain: true,
                }),
                ..Default::default()
            },
        )?;

        let session = Arc::new(Session::default());
        let (sender, inbox) = channel();
        spawn_event_loop(connection, Arc::clone(&session), sender);

        Ok(MqttClient {
            client,
            inbox,
            session,
            announced_generation: None,
        })
    }
}

fn spawn_event_loop(
    mut connection: EspMqttConnection,
    session: Arc<Session>,
    inbox: Sender<InboundMessage>,
) {
    thread::spawn(move || {
        info!("MQTT Listening for messages");

        while let Ok(event) = connection.next() {
            match event.payload() {
                EventPayload::Connected(_) => {
                    session.generation.fetch_add(1, Ordering::SeqCst);
                    session.connected.store(true, Ordering::SeqCst);
                }
                EventPayload::Disconnected => {
                    session.connected.store(false, Ordering::SeqCst);
                }
                EventPayload::Received {
                    topic: Some(topic),
                    data,
                    details: Details::Complete,
                    ..
                } => {
                    if inbox.send(InboundMessage::new(topic, data)).is_err() {
                        break;
                    }
                }
                EventPayload::Received { topic, .. } => {
                    warn!("Dropping fragmented or topicless message {:?}", topic);
                }
                _ => info!("[Queue] Event: {}", event.payload()),
            }
        }

        session.connected.store(false, Ordering::SeqCst);
        info!("Connection closed");
    });
}

impl MessageTransport for MqttClient {
    fn is_connected(&self) -> bool {
        self.session.connected.load(Ordering::SeqCst)
            && self.announced_generation == Some(self.session.generation.load(Ordering::SeqCst))
    }

    fn connect(&mut self) -> Result<()> {
        // The ESP-IDF client reconnects on its own; an attempt only has to
        // observe that it succeeded.
        if !self.session.connected.load(Ordering::SeqCst) {
            bail!("broker not reachable yet");
        }

        self.announced_generation = Some(self.session.generation.load(Ordering::SeqCst));
        Ok(())
    }

    fn subscribe(&mut self, topic: &str) -> Result<()> {
        self.client.subscribe(topic, QoS::AtMostOnce)?;
        Ok(())
    }

    fn publish(&mut self, topic: &str, payload: &[u8], retain: bool) -> Result<()> {
        self.client
            .enqueue(topic, QoS::AtLeastOnce, retain, payload)?;
        Ok(())
    }

    fn poll(&mut self) -> Option<InboundMessage> {
        self.inbox.try_recv().ok()
    }
}
