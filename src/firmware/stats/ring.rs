use heapless::HistoryBuffer;

use crate::firmware::{
    clock::ClockSource,
    config::STATS_CAPACITY,
    types::{AuxReadings, MeasurementRecord},
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatsSnapshot {
    pub window_ms: u32,
    pub count_in_window: usize,
    pub average_distance_m: f32,
    pub frequency_hz: f32,
    pub elapsed_since_last_us: u64,
    pub live_records: usize,
    pub total_records: u32,
}

/// Fixed-capacity ring of recent measurements with trailing-window aggregates.
///
/// Queries scan every live slot; capacity is small and queries are diagnostic, so there is no
/// time index. Once full, each insert overwrites the oldest record.
pub struct StatsRingBuffer<C, const N: usize = STATS_CAPACITY> {
    clock: C,
    records: HistoryBuffer<MeasurementRecord, N>,
    total_records: u32,
    interval_started_us: Option<u64>,
    interval_us: u64,
}

impl<C: ClockSource, const N: usize> StatsRingBuffer<C, N> {
    pub const fn new(clock: C) -> Self {
        Self {
            clock,
            records: HistoryBuffer::new(),
            total_records: 0,
            interval_started_us: None,
            interval_us: 0,
        }
    }

    pub fn record(&mut self, source_id: u16, distance_m: f32, aux: AuxReadings) -> MeasurementRecord {
        let now_us = self.clock.now_us();
        let record = MeasurementRecord {
            timestamp_us: now_us,
            source_id,
            distance_m,
            aux,
        };
        self.records.write(record);
        self.total_records = self.total_records.wrapping_add(1);

        match self.interval_started_us {
            None => self.interval_us = 0,
            Some(started_us) => self.interval_us = now_us.saturating_sub(started_us),
        }
        self.interval_started_us = Some(now_us);
        record
    }

    pub fn count_in_window(&self, window_ms: u32) -> usize {
        self.in_window(window_ms).count()
    }

    pub fn average_distance_in_window(&self, window_ms: u32) -> f32 {
        let (sum, count) = self
            .in_window(window_ms)
            .fold((0.0f32, 0usize), |(sum, count), record| {
                (sum + record.distance_m, count + 1)
            });
        if count == 0 {
            return 0.0;
        }
        sum / count as f32
    }

    /// Records per second over the window. `window_ms` must be non-zero.
    pub fn frequency_in_window(&self, window_ms: u32) -> f32 {
        debug_assert!(window_ms > 0, "frequency window must be non-zero");
        if window_ms == 0 {
            return 0.0;
        }
        self.count_in_window(window_ms) as f32 / (window_ms as f32 / 1000.0)
    }

    pub fn elapsed_since_last_interval_us(&self) -> u64 {
        self.interval_us
    }

    pub fn elapsed_since_last_interval_ms(&self) -> u32 {
        (self.interval_us / 1_000).min(u32::MAX as u64) as u32
    }

    pub fn interval_timer_active(&self) -> bool {
        self.interval_started_us.is_some()
    }

    pub fn reset_interval_timer(&mut self) {
        self.interval_started_us = Some(self.clock.now_us());
        self.interval_us = 0;
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.len() == 0
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn now_us(&self) -> u64 {
        self.clock.now_us()
    }

    pub fn total_records(&self) -> u32 {
        self.total_records
    }

    pub fn latest(&self) -> Option<&MeasurementRecord> {
        self.records.recent()
    }

    pub fn snapshot(&self, window_ms: u32) -> StatsSnapshot {
        let mut count = 0usize;
        let mut sum = 0.0f32;
        for record in self.in_window(window_ms) {
            count += 1;
            sum += record.distance_m;
        }
        let average_distance_m = if count == 0 { 0.0 } else { sum / count as f32 };
        let frequency_hz = if window_ms == 0 {
            0.0
        } else {
            count as f32 / (window_ms as f32 / 1000.0)
        };
        StatsSnapshot {
            window_ms,
            count_in_window: count,
            average_distance_m,
            frequency_hz,
            elapsed_since_last_us: self.interval_us,
            live_records: self.records.len(),
            total_records: self.total_records,
        }
    }

    fn in_window(&self, window_ms: u32) -> impl Iterator<Item = &MeasurementRecord> + '_ {
        let now_us = self.clock.now_us();
        let start_us = now_us.saturating_sub(u64::from(window_ms) * 1_000);
        self.records
            .as_slice()
            .iter()
            .filter(move |record| record.timestamp_us >= start_us && record.timestamp_us <= now_us)
    }
}
