use core::sync::atomic::{AtomicBool, Ordering};

use super::ingest::ConfigIngest;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Qos {
    AtMostOnce,
    AtLeastOnce,
}

/// Broker session as exposed by the MQTT stack. Both calls are fire-and-forget.
pub trait MqttClient {
    fn publish(&mut self, topic: &str, payload: &[u8], qos: Qos);
    fn subscribe(&mut self, topic: &str, qos: Qos);
}

/// Broker-session flag. Written from the MQTT event callback, read by the consumer context.
pub struct SessionFlag {
    connected: AtomicBool,
}

impl Default for SessionFlag {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionFlag {
    pub const fn new() -> Self {
        Self {
            connected: AtomicBool::new(false),
        }
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::Release);
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEvent<'a> {
    Connected,
    Disconnected,
    Data { topic: &'a str, payload: &'a [u8] },
    Error,
}

pub struct SessionEvents<'a> {
    flag: &'a SessionFlag,
    ingest: ConfigIngest<'a>,
    config_topic: &'a str,
}

impl<'a> SessionEvents<'a> {
    pub fn new(flag: &'a SessionFlag, ingest: ConfigIngest<'a>, config_topic: &'a str) -> Self {
        Self {
            flag,
            ingest,
            config_topic,
        }
    }

    pub fn on_event<M: MqttClient>(&self, event: SessionEvent<'_>, client: &mut M) {
        match event {
            SessionEvent::Connected => {
                self.flag.set_connected(true);
                client.subscribe(self.config_topic, Qos::AtMostOnce);
                log::info!("telemetry: broker connected, subscribed {}", self.config_topic);
            }
            SessionEvent::Disconnected => {
                self.flag.set_connected(false);
                log::info!("telemetry: broker disconnected");
            }
            SessionEvent::Data { topic, payload } => {
                if topic != self.config_topic {
                    log::debug!("telemetry: ignoring data on {}", topic);
                    return;
                }
                // Malformed commands are already counted and logged by the ingest.
                let _ = self.ingest.on_command(payload);
            }
            SessionEvent::Error => {
                log::warn!("telemetry: broker client error");
            }
        }
    }
}
