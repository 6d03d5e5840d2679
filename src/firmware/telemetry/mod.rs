mod counters;
mod payload;
mod publisher;

pub use counters::{CounterSnapshot, NodeCounters};
pub use payload::{format_telemetry, TelemetryPayload};
pub use publisher::{PublishOutcome, TelemetryPublisher};
