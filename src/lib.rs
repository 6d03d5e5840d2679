#![cfg_attr(not(test), no_std)]

pub mod firmware;

pub use firmware::{
    clock::{ClockSource, EmbassyClock},
    config::{NetPolicy, NodeConfig},
    handoff::HandoffChannel,
    net::{Connectivity, NetworkResilienceManager},
    producer::{run_producer, RangeSource, RangingProducer},
    runtime::{run_consumer, ConsumerLoop, NodeContext},
    session::{MqttClient, Qos, SessionEvent},
    stats::StatsRingBuffer,
    storage::{CredentialStore, FlashKvStore, KeyValueStore},
    telemetry::TelemetryPublisher,
    types::{MeasurementRecord, NetworkCredentials, RangeSample},
};
