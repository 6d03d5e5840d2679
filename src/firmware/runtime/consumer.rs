use crate::firmware::{
    clock::ClockSource,
    net::{Connectivity, NetOutcome, NetworkResilienceManager},
    session::MqttClient,
    storage::KeyValueStore,
    telemetry::{PublishOutcome, TelemetryPublisher},
    time::DiagnosticClock,
};

use super::context::NodeContext;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConsumerStep {
    pub net: NetOutcome,
    pub publish: PublishOutcome,
    pub reported: bool,
}

/// Best-effort side of the node: connection upkeep, telemetry drain, periodic stats line.
pub struct ConsumerLoop<'a, C, L, S, M, const N: usize> {
    context: &'a NodeContext<C, N>,
    manager: NetworkResilienceManager<'a, L, S>,
    publisher: TelemetryPublisher<'a, M>,
    diagnostic_clock: DiagnosticClock,
    last_report_us: Option<u64>,
}

impl<'a, C, L, S, M, const N: usize> ConsumerLoop<'a, C, L, S, M, N>
where
    C: ClockSource,
    L: Connectivity,
    S: KeyValueStore,
    M: MqttClient,
{
    pub fn new(
        context: &'a NodeContext<C, N>,
        manager: NetworkResilienceManager<'a, L, S>,
        publisher: TelemetryPublisher<'a, M>,
    ) -> Self {
        Self {
            context,
            manager,
            publisher,
            diagnostic_clock: DiagnosticClock::new(),
            last_report_us: None,
        }
    }

    pub fn manager(&self) -> &NetworkResilienceManager<'a, L, S> {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut NetworkResilienceManager<'a, L, S> {
        &mut self.manager
    }

    pub fn publisher_mut(&mut self) -> &mut TelemetryPublisher<'a, M> {
        &mut self.publisher
    }

    /// Anchors log timestamps once SNTP has produced a wall-clock reading.
    pub fn sync_time(&mut self, unix_epoch_utc_seconds: u64) {
        let now_us = self.context.stats.with(|stats| stats.now_us());
        self.diagnostic_clock.sync(
            unix_epoch_utc_seconds,
            self.context.config.tz_offset_minutes,
            now_us,
        );
        log::info!("stats: time synced epoch={}", unix_epoch_utc_seconds);
    }

    pub async fn step(&mut self) -> ConsumerStep {
        let net = self.manager.tick().await;
        let publish = self.publisher.tick().await;
        let reported = self.report_if_due();
        ConsumerStep {
            net,
            publish,
            reported,
        }
    }

    fn report_if_due(&mut self) -> bool {
        let config = &self.context.config;
        let now_us = self.context.stats.with(|stats| stats.now_us());
        let interval_us = u64::from(config.stats_report_interval_ms) * 1_000;
        match self.last_report_us {
            Some(last_us) if now_us.saturating_sub(last_us) < interval_us => return false,
            Some(_) => {}
            None => {
                self.last_report_us = Some(now_us);
                return false;
            }
        }
        self.last_report_us = Some(now_us);

        let stats = self.context.stats.snapshot(config.stats_window_ms);
        let counters = self.context.counters.snapshot();
        let stamp = self.diagnostic_clock.format(now_us);
        log::info!(
            "stats: at={} window_ms={} count={} avg_m={:.2} freq_hz={:.2} interval_ms={} live={} total={} published={} dropped_offline={} rollbacks={}",
            stamp.as_ref().map(|stamp| stamp.as_str()).unwrap_or("unsynced"),
            stats.window_ms,
            stats.count_in_window,
            stats.average_distance_m,
            stats.frequency_hz,
            stats.elapsed_since_last_us / 1_000,
            stats.live_records,
            stats.total_records,
            counters.telemetry_published,
            counters.telemetry_dropped_offline,
            counters.rollbacks,
        );
        true
    }
}

pub async fn run_consumer<C, L, S, M, const N: usize>(
    consumer: &mut ConsumerLoop<'_, C, L, S, M, N>,
) -> !
where
    C: ClockSource,
    L: Connectivity,
    S: KeyValueStore,
    M: MqttClient,
{
    log::info!("net: consumer started");
    loop {
        consumer.step().await;
    }
}
