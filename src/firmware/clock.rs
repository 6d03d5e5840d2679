use core::cell::Cell;

use embassy_sync::blocking_mutex::{raw::CriticalSectionRawMutex, Mutex};
use embassy_time::Instant;

pub trait ClockSource {
    fn now_us(&self) -> u64;
}

impl<T: ClockSource + ?Sized> ClockSource for &T {
    fn now_us(&self) -> u64 {
        (**self).now_us()
    }
}

/// Monotonic time from the embassy time driver.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmbassyClock;

impl ClockSource for EmbassyClock {
    fn now_us(&self) -> u64 {
        Instant::now().as_micros()
    }
}

/// Hand-advanced clock for replay and host simulation.
pub struct ManualClock {
    now_us: Mutex<CriticalSectionRawMutex, Cell<u64>>,
}

impl ManualClock {
    pub const fn new(start_us: u64) -> Self {
        Self {
            now_us: Mutex::new(Cell::new(start_us)),
        }
    }

    pub fn set_us(&self, now_us: u64) {
        self.now_us.lock(|cell| cell.set(now_us));
    }

    pub fn set_ms(&self, now_ms: u64) {
        self.set_us(now_ms.saturating_mul(1_000));
    }

    pub fn advance_us(&self, delta_us: u64) {
        self.now_us
            .lock(|cell| cell.set(cell.get().saturating_add(delta_us)));
    }

    pub fn advance_ms(&self, delta_ms: u64) {
        self.advance_us(delta_ms.saturating_mul(1_000));
    }
}

impl ClockSource for ManualClock {
    fn now_us(&self) -> u64 {
        self.now_us.lock(Cell::get)
    }
}
