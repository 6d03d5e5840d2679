mod node;
mod policy;

pub use node::{compiled_wifi_credentials, DistanceBounds, NodeConfig, TOPIC_MAX};
pub use policy::NetPolicy;

pub const STATS_CAPACITY: usize = 100;
pub const STATS_WINDOW_MS: u32 = 60_000;
pub const STATS_REPORT_INTERVAL_MS: u32 = 10_000;

// Physical ranging envelope; anything outside never reaches the stats buffer or the hand-off.
pub const MIN_DISTANCE_METERS: f32 = 0.0;
pub const MAX_DISTANCE_METERS: f32 = 50.0;

pub const NVS_WIFI_NAMESPACE: &str = "wifi_cred";
pub const NVS_WIFI_SSID: &str = "ssid";
pub const NVS_WIFI_PASS: &str = "pass";

pub const TELEMETRY_PAYLOAD_MAX: usize = 256;
// Longest a telemetry drain waits on an empty slot.
pub const HANDOFF_TAKE_TIMEOUT_MS: u64 = 10;

pub const NET_RETRY_LIMIT: u8 = 3;
pub const NET_CONNECT_TIMEOUT_DEFAULT_MS: u32 = 10_000;
// Pause between dropping the old association and connecting with trial credentials.
pub const NET_RECONNECT_SETTLE_DEFAULT_MS: u32 = 1_000;
pub const NET_RETRY_COOLDOWN_DEFAULT_MS: u32 = 500;

// POSIX "GMT+4" on the deployed anchors, i.e. UTC-04:00.
pub const DIAG_TZ_OFFSET_DEFAULT_MINUTES: i32 = -240;
