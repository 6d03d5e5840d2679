use core::cell::RefCell;

use embassy_sync::blocking_mutex::{raw::CriticalSectionRawMutex, Mutex};

use super::ring::{StatsRingBuffer, StatsSnapshot};
use crate::firmware::{
    clock::ClockSource,
    config::STATS_CAPACITY,
    types::{AuxReadings, MeasurementRecord},
};

/// Stats buffer shared between the producer and diagnostic readers.
///
/// Every access runs inside one critical section, so a reader never observes a wraparound
/// half-applied.
pub struct SharedStats<C, const N: usize = STATS_CAPACITY> {
    inner: Mutex<CriticalSectionRawMutex, RefCell<StatsRingBuffer<C, N>>>,
}

impl<C: ClockSource, const N: usize> SharedStats<C, N> {
    pub const fn new(clock: C) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(StatsRingBuffer::new(clock))),
        }
    }

    pub fn record(&self, source_id: u16, distance_m: f32, aux: AuxReadings) -> MeasurementRecord {
        self.inner
            .lock(|cell| cell.borrow_mut().record(source_id, distance_m, aux))
    }

    pub fn snapshot(&self, window_ms: u32) -> StatsSnapshot {
        self.inner.lock(|cell| cell.borrow().snapshot(window_ms))
    }

    pub fn reset_interval_timer(&self) {
        self.inner.lock(|cell| cell.borrow_mut().reset_interval_timer());
    }

    pub fn with<R>(&self, f: impl FnOnce(&StatsRingBuffer<C, N>) -> R) -> R {
        self.inner.lock(|cell| f(&cell.borrow()))
    }
}
