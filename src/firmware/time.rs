use core::fmt::Write;

use chrono::{DateTime, Datelike, Timelike};
use heapless::String;

pub type DiagnosticTimestamp = String<32>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeSyncState {
    pub unix_epoch_utc_seconds: u64,
    pub tz_offset_minutes: i32,
    pub sync_us: u64,
}

/// Wall time for log lines, anchored to the monotonic clock at sync.
///
/// The millisecond field is an 8-bit counter bumped on every call, not sub-second time.
/// Log consumers already expect that.
#[derive(Debug, Default)]
pub struct DiagnosticClock {
    sync: Option<TimeSyncState>,
    rolling_ms: u8,
}

impl DiagnosticClock {
    pub const fn new() -> Self {
        Self {
            sync: None,
            rolling_ms: 0,
        }
    }

    pub fn sync(&mut self, unix_epoch_utc_seconds: u64, tz_offset_minutes: i32, now_us: u64) {
        self.sync = Some(TimeSyncState {
            unix_epoch_utc_seconds,
            tz_offset_minutes,
            sync_us: now_us,
        });
    }

    pub fn is_synced(&self) -> bool {
        self.sync.is_some()
    }

    /// `YYYY-MM-DDTHH:MM:SS.mmmZ`, or `None` before the first sync.
    pub fn format(&mut self, now_us: u64) -> Option<DiagnosticTimestamp> {
        let sync = self.sync?;
        let elapsed_secs = now_us.saturating_sub(sync.sync_us) / 1_000_000;
        let local_secs = i64::try_from(sync.unix_epoch_utc_seconds.saturating_add(elapsed_secs))
            .ok()?
            .saturating_add(i64::from(sync.tz_offset_minutes) * 60);
        let local = DateTime::from_timestamp(local_secs, 0)?.naive_utc();

        self.rolling_ms = self.rolling_ms.wrapping_add(1);
        let mut out = DiagnosticTimestamp::new();
        write!(
            &mut out,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
            local.year(),
            local.month(),
            local.day(),
            local.hour(),
            local.minute(),
            local.second(),
            self.rolling_ms
        )
        .ok()?;
        Some(out)
    }
}
