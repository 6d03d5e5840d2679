use embassy_time::Duration;

use super::{counters::NodeCounters, payload::format_telemetry};
use crate::firmware::{
    config::{NodeConfig, HANDOFF_TAKE_TIMEOUT_MS, TOPIC_MAX},
    handoff::HandoffChannel,
    session::{MqttClient, Qos, SessionFlag},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PublishOutcome {
    Idle,
    Published,
    DroppedOffline,
    DroppedOversize,
}

impl PublishOutcome {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Published => "published",
            Self::DroppedOffline => "dropped_offline",
            Self::DroppedOversize => "dropped_oversize",
        }
    }
}

/// Drains the hand-off slot and publishes the freshest record at most once. Nothing is
/// buffered while the broker session is down.
pub struct TelemetryPublisher<'a, M> {
    handoff: &'a HandoffChannel,
    session: &'a SessionFlag,
    counters: &'a NodeCounters,
    client: M,
    topic: heapless::String<TOPIC_MAX>,
    anchor_id: u16,
    take_timeout: Duration,
}

impl<'a, M: MqttClient> TelemetryPublisher<'a, M> {
    pub fn new(
        handoff: &'a HandoffChannel,
        session: &'a SessionFlag,
        counters: &'a NodeCounters,
        client: M,
        config: &NodeConfig,
    ) -> Self {
        Self {
            handoff,
            session,
            counters,
            client,
            topic: config.data_topic(),
            anchor_id: config.anchor_short_address,
            take_timeout: Duration::from_millis(HANDOFF_TAKE_TIMEOUT_MS),
        }
    }

    pub fn client(&self) -> &M {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut M {
        &mut self.client
    }

    pub async fn tick(&mut self) -> PublishOutcome {
        let Some(record) = self.handoff.take_within(self.take_timeout).await else {
            return PublishOutcome::Idle;
        };
        if !self.session.is_connected() {
            self.counters.record_telemetry_dropped_offline();
            return PublishOutcome::DroppedOffline;
        }
        let Ok(payload) = format_telemetry(self.anchor_id, &record) else {
            log::warn!("telemetry: payload overflow source={:04X}", record.source_id);
            return PublishOutcome::DroppedOversize;
        };
        self.client
            .publish(self.topic.as_str(), payload.as_bytes(), Qos::AtMostOnce);
        self.counters.record_telemetry_published();
        log::debug!(
            "telemetry: published source={:04X} distance_m={:.2}",
            record.source_id,
            record.distance_m
        );
        PublishOutcome::Published
    }
}

#[cfg(test)]
mod tests {
    use std::{string::String, vec::Vec};

    use embassy_futures::block_on;

    use super::*;
    use crate::firmware::types::{AuxReadings, MeasurementRecord};

    #[derive(Default)]
    struct RecordingClient {
        published: Vec<(String, String, Qos)>,
    }

    impl MqttClient for RecordingClient {
        fn publish(&mut self, topic: &str, payload: &[u8], qos: Qos) {
            let payload = core::str::from_utf8(payload).expect("utf8 payload");
            self.published.push((topic.into(), payload.into(), qos));
        }

        fn subscribe(&mut self, _topic: &str, _qos: Qos) {}
    }

    fn record(source_id: u16, distance_m: f32) -> MeasurementRecord {
        MeasurementRecord {
            timestamp_us: 0,
            source_id,
            distance_m,
            aux: AuxReadings::default(),
        }
    }

    #[test]
    fn empty_slot_is_idle() {
        let handoff = HandoffChannel::new();
        let session = SessionFlag::new();
        let counters = NodeCounters::new();
        let config = NodeConfig::new(1, 0x0101);
        let mut publisher = TelemetryPublisher::new(
            &handoff,
            &session,
            &counters,
            RecordingClient::default(),
            &config,
        );
        assert_eq!(block_on(publisher.tick()), PublishOutcome::Idle);
        assert!(publisher.client().published.is_empty());
    }

    #[test]
    fn publishes_latest_record_when_connected() {
        let handoff = HandoffChannel::new();
        let session = SessionFlag::new();
        let counters = NodeCounters::new();
        let config = NodeConfig::new(3, 0x0103);
        let mut publisher = TelemetryPublisher::new(
            &handoff,
            &session,
            &counters,
            RecordingClient::default(),
            &config,
        );
        session.set_connected(true);
        handoff.publish(record(0x10, 1.0));
        handoff.publish(record(0x11, 2.25));

        assert_eq!(block_on(publisher.tick()), PublishOutcome::Published);
        assert_eq!(block_on(publisher.tick()), PublishOutcome::Idle);

        let published = &publisher.client().published;
        assert_eq!(published.len(), 1);
        let (topic, payload, qos) = &published[0];
        assert_eq!(topic, "uwb/ancora3/data");
        assert_eq!(*qos, Qos::AtMostOnce);
        assert!(payload.starts_with("{\"id_ancora\":259,\"id_tag\":17,\"distancia\":2.25,"));
        assert_eq!(counters.snapshot().telemetry_published, 1);
    }

    #[test]
    fn offline_records_are_dropped_not_queued() {
        let handoff = HandoffChannel::new();
        let session = SessionFlag::new();
        let counters = NodeCounters::new();
        let config = NodeConfig::new(1, 0x0101);
        let mut publisher = TelemetryPublisher::new(
            &handoff,
            &session,
            &counters,
            RecordingClient::default(),
            &config,
        );
        handoff.publish(record(0x10, 1.0));
        assert_eq!(block_on(publisher.tick()), PublishOutcome::DroppedOffline);

        session.set_connected(true);
        assert_eq!(block_on(publisher.tick()), PublishOutcome::Idle);
        assert!(publisher.client().published.is_empty());
        assert_eq!(counters.snapshot().telemetry_dropped_offline, 1);
    }
}
