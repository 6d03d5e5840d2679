use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, signal::Signal};

use crate::firmware::types::NetworkCredentials;

/// Pending credential trial handed from the session callback to the network tick. A newer
/// command replaces one that has not been picked up yet.
pub struct TrialRequests {
    pending: Signal<CriticalSectionRawMutex, NetworkCredentials>,
}

impl TrialRequests {
    pub const fn new() -> Self {
        Self {
            pending: Signal::new(),
        }
    }

    pub fn submit(&self, credentials: NetworkCredentials) {
        self.pending.signal(credentials);
    }

    pub fn take(&self) -> Option<NetworkCredentials> {
        self.pending.try_take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.signaled()
    }
}

impl Default for TrialRequests {
    fn default() -> Self {
        Self::new()
    }
}
