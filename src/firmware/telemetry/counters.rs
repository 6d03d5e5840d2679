use core::sync::atomic::{AtomicU32, Ordering};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CounterSnapshot {
    pub ranges_accepted: u32,
    pub ranges_rejected: u32,
    pub telemetry_published: u32,
    pub telemetry_dropped_offline: u32,
    pub connect_attempts: u32,
    pub connect_successes: u32,
    pub connect_failures: u32,
    pub trials_started: u32,
    pub trials_committed: u32,
    pub rollbacks: u32,
    pub malformed_commands: u32,
    pub persist_failures: u32,
}

/// Monotonic event counters shared by both execution contexts.
pub struct NodeCounters {
    ranges_accepted: AtomicU32,
    ranges_rejected: AtomicU32,
    telemetry_published: AtomicU32,
    telemetry_dropped_offline: AtomicU32,
    connect_attempts: AtomicU32,
    connect_successes: AtomicU32,
    connect_failures: AtomicU32,
    trials_started: AtomicU32,
    trials_committed: AtomicU32,
    rollbacks: AtomicU32,
    malformed_commands: AtomicU32,
    persist_failures: AtomicU32,
}

impl Default for NodeCounters {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeCounters {
    pub const fn new() -> Self {
        Self {
            ranges_accepted: AtomicU32::new(0),
            ranges_rejected: AtomicU32::new(0),
            telemetry_published: AtomicU32::new(0),
            telemetry_dropped_offline: AtomicU32::new(0),
            connect_attempts: AtomicU32::new(0),
            connect_successes: AtomicU32::new(0),
            connect_failures: AtomicU32::new(0),
            trials_started: AtomicU32::new(0),
            trials_committed: AtomicU32::new(0),
            rollbacks: AtomicU32::new(0),
            malformed_commands: AtomicU32::new(0),
            persist_failures: AtomicU32::new(0),
        }
    }

    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            ranges_accepted: self.ranges_accepted.load(Ordering::Relaxed),
            ranges_rejected: self.ranges_rejected.load(Ordering::Relaxed),
            telemetry_published: self.telemetry_published.load(Ordering::Relaxed),
            telemetry_dropped_offline: self.telemetry_dropped_offline.load(Ordering::Relaxed),
            connect_attempts: self.connect_attempts.load(Ordering::Relaxed),
            connect_successes: self.connect_successes.load(Ordering::Relaxed),
            connect_failures: self.connect_failures.load(Ordering::Relaxed),
            trials_started: self.trials_started.load(Ordering::Relaxed),
            trials_committed: self.trials_committed.load(Ordering::Relaxed),
            rollbacks: self.rollbacks.load(Ordering::Relaxed),
            malformed_commands: self.malformed_commands.load(Ordering::Relaxed),
            persist_failures: self.persist_failures.load(Ordering::Relaxed),
        }
    }

    pub fn record_range_accepted(&self) {
        self.ranges_accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_range_rejected(&self) {
        self.ranges_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_telemetry_published(&self) {
        self.telemetry_published.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_telemetry_dropped_offline(&self) {
        self.telemetry_dropped_offline.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_connect_attempt(&self) {
        self.connect_attempts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_connect_success(&self) {
        self.connect_successes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_connect_failure(&self) {
        self.connect_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_trial_started(&self) {
        self.trials_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_trial_committed(&self) {
        self.trials_committed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rollback(&self) {
        self.rollbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_malformed_command(&self) {
        self.malformed_commands.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_persist_failure(&self) {
        self.persist_failures.fetch_add(1, Ordering::Relaxed);
    }
}
