use super::{
    clock::ClockSource,
    config::{DistanceBounds, STATS_CAPACITY},
    handoff::HandoffChannel,
    stats::SharedStats,
    telemetry::NodeCounters,
    types::{MeasurementRecord, RangeSample},
};

/// The ranging radio stack as seen from the real-time context.
#[allow(async_fn_in_trait)]
pub trait RangeSource {
    async fn next_range(&mut self) -> RangeSample;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RangeVerdict {
    Accepted,
    OutOfBounds,
}

impl RangeVerdict {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::OutOfBounds => "out_of_bounds",
        }
    }
}

/// Producer-side entry point. Only non-blocking work happens here: a bounds check, one stats
/// insert, one hand-off overwrite.
pub struct RangingProducer<'a, C, const N: usize = STATS_CAPACITY> {
    stats: &'a SharedStats<C, N>,
    handoff: &'a HandoffChannel,
    counters: &'a NodeCounters,
    bounds: DistanceBounds,
}

impl<'a, C: ClockSource, const N: usize> RangingProducer<'a, C, N> {
    pub fn new(
        stats: &'a SharedStats<C, N>,
        handoff: &'a HandoffChannel,
        counters: &'a NodeCounters,
        bounds: DistanceBounds,
    ) -> Self {
        Self {
            stats,
            handoff,
            counters,
            bounds,
        }
    }

    pub fn on_range(&self, sample: RangeSample) -> RangeVerdict {
        if !self.bounds.contains(sample.distance_m) {
            self.counters.record_range_rejected();
            return RangeVerdict::OutOfBounds;
        }
        let record: MeasurementRecord =
            self.stats
                .record(sample.source_id, sample.distance_m, sample.aux());
        self.handoff.publish(record);
        self.counters.record_range_accepted();
        RangeVerdict::Accepted
    }
}

pub async fn run_producer<S: RangeSource, C: ClockSource, const N: usize>(
    source: &mut S,
    producer: &RangingProducer<'_, C, N>,
) -> ! {
    log::info!("range: producer started");
    loop {
        let sample = source.next_range().await;
        if producer.on_range(sample) == RangeVerdict::OutOfBounds {
            log::debug!(
                "range: dropped source={:X} distance_m={}",
                sample.source_id,
                sample.distance_m
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::firmware::clock::ManualClock;

    fn sample(distance_m: f32) -> RangeSample {
        RangeSample {
            source_id: 0x7D,
            distance_m,
            rx_power: -80.0,
            fp_power: -82.0,
            quality: 12.5,
            accel: [10, -20, 16_384],
        }
    }

    #[test]
    fn accepted_range_reaches_stats_and_handoff() {
        let clock = ManualClock::new(1_000);
        let stats: SharedStats<&ManualClock, 8> = SharedStats::new(&clock);
        let handoff = HandoffChannel::new();
        let counters = NodeCounters::new();
        let producer = RangingProducer::new(&stats, &handoff, &counters, DistanceBounds::defaults());

        assert_eq!(producer.on_range(sample(3.25)), RangeVerdict::Accepted);

        let record = handoff.try_take().expect("handoff record");
        assert_eq!(record.timestamp_us, 1_000);
        assert_eq!(record.distance_m, 3.25);
        assert_eq!(record.aux.az, 16_384);
        assert!((record.aux.eta - (-80.0 / -82.0)).abs() < 1e-6);
        assert_eq!(stats.snapshot(1_000).count_in_window, 1);
        assert_eq!(counters.snapshot().ranges_accepted, 1);
    }

    #[test]
    fn out_of_bounds_range_touches_nothing() {
        let clock = ManualClock::new(0);
        let stats: SharedStats<&ManualClock, 8> = SharedStats::new(&clock);
        let handoff = HandoffChannel::new();
        let counters = NodeCounters::new();
        let producer = RangingProducer::new(&stats, &handoff, &counters, DistanceBounds::defaults());

        assert_eq!(producer.on_range(sample(-0.5)), RangeVerdict::OutOfBounds);
        assert_eq!(producer.on_range(sample(75.0)), RangeVerdict::OutOfBounds);

        assert!(handoff.try_take().is_none());
        assert_eq!(stats.with(|buffer| buffer.total_records()), 0);
        assert_eq!(counters.snapshot().ranges_rejected, 2);
    }

    #[test]
    fn eta_is_zero_without_first_path_power() {
        let mut raw = sample(1.0);
        raw.fp_power = 0.0;
        assert_eq!(raw.aux().eta, 0.0);
    }
}
