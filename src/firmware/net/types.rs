use crate::firmware::types::NetworkCredentials;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NetPhase {
    Disconnected,
    Connecting,
    Connected,
}

impl NetPhase {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
        }
    }
}

/// Reset whenever a trial begins or a connection succeeds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConnectionAttemptState {
    pub retry_count: u8,
    pub trialing: bool,
    pub give_up: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NetOutcome {
    Unchanged,
    NoCredentials,
    TrialStarted,
    AttemptStarted,
    Connected,
    TrialCommitted,
    Retrying,
    GaveUp,
    RolledBack,
    LinkLost,
}

impl NetOutcome {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unchanged => "unchanged",
            Self::NoCredentials => "no_credentials",
            Self::TrialStarted => "trial_started",
            Self::AttemptStarted => "attempt_started",
            Self::Connected => "connected",
            Self::TrialCommitted => "trial_committed",
            Self::Retrying => "retrying",
            Self::GaveUp => "gave_up",
            Self::RolledBack => "rolled_back",
            Self::LinkLost => "link_lost",
        }
    }
}

#[derive(Clone, Debug)]
pub enum NetEvent {
    BeginTrial(NetworkCredentials),
    StartAttempt,
    AttemptSucceeded,
    AttemptFailed,
    LinkLost,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetSnapshot {
    pub phase: NetPhase,
    pub active: Option<NetworkCredentials>,
    pub backup: Option<NetworkCredentials>,
    pub attempt: ConnectionAttemptState,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LinkError {
    #[error("connect timed out")]
    Timeout,
    #[error("access point rejected credentials")]
    Rejected,
    #[error("access point not found")]
    NotFound,
    #[error("radio driver error")]
    Driver,
}

impl LinkError {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Rejected => "rejected",
            Self::NotFound => "not_found",
            Self::Driver => "driver",
        }
    }
}
