use super::{
    NET_CONNECT_TIMEOUT_DEFAULT_MS, NET_RECONNECT_SETTLE_DEFAULT_MS, NET_RETRY_COOLDOWN_DEFAULT_MS,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NetPolicy {
    pub connect_timeout_ms: u32,
    pub reconnect_settle_ms: u32,
    pub retry_cooldown_ms: u32,
}

impl Default for NetPolicy {
    fn default() -> Self {
        Self::defaults()
    }
}

impl NetPolicy {
    pub const fn defaults() -> Self {
        Self {
            connect_timeout_ms: NET_CONNECT_TIMEOUT_DEFAULT_MS,
            reconnect_settle_ms: NET_RECONNECT_SETTLE_DEFAULT_MS,
            retry_cooldown_ms: NET_RETRY_COOLDOWN_DEFAULT_MS,
        }
    }

    pub const fn sanitized(self) -> Self {
        Self {
            connect_timeout_ms: clamp_u32(self.connect_timeout_ms, 1_000, 60_000),
            reconnect_settle_ms: clamp_u32(self.reconnect_settle_ms, 0, 10_000),
            retry_cooldown_ms: clamp_u32(self.retry_cooldown_ms, 0, 30_000),
        }
    }
}

const fn clamp_u32(value: u32, min: u32, max: u32) -> u32 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}
