use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, signal::Signal};
use embassy_time::{with_timeout, Duration};

use super::types::MeasurementRecord;

/// Single-slot, latest-value-wins hand-off from the ranging context to the network context.
///
/// `publish` replaces any unread record and never waits on the consumer.
pub struct HandoffChannel {
    slot: Signal<CriticalSectionRawMutex, MeasurementRecord>,
}

impl Default for HandoffChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl HandoffChannel {
    pub const fn new() -> Self {
        Self {
            slot: Signal::new(),
        }
    }

    pub fn publish(&self, record: MeasurementRecord) {
        self.slot.signal(record);
    }

    pub fn try_take(&self) -> Option<MeasurementRecord> {
        self.slot.try_take()
    }

    /// Waits for an occupied slot, up to `timeout`. An empty slot after the timeout is `None`.
    pub async fn take_within(&self, timeout: Duration) -> Option<MeasurementRecord> {
        if let Some(record) = self.slot.try_take() {
            return Some(record);
        }
        with_timeout(timeout, self.slot.wait()).await.ok()
    }

    pub fn is_occupied(&self) -> bool {
        self.slot.signaled()
    }
}
