use core::fmt::Write;

use heapless::String;

use super::{
    DIAG_TZ_OFFSET_DEFAULT_MINUTES, MAX_DISTANCE_METERS, MIN_DISTANCE_METERS,
    STATS_REPORT_INTERVAL_MS, STATS_WINDOW_MS,
};
use crate::firmware::types::NetworkCredentials;

pub const TOPIC_MAX: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistanceBounds {
    pub min_m: f32,
    pub max_m: f32,
}

impl DistanceBounds {
    pub const fn defaults() -> Self {
        Self {
            min_m: MIN_DISTANCE_METERS,
            max_m: MAX_DISTANCE_METERS,
        }
    }

    /// NaN is never in bounds.
    pub fn contains(&self, distance_m: f32) -> bool {
        distance_m >= self.min_m && distance_m <= self.max_m
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeConfig {
    pub anchor_number: u8,
    pub anchor_short_address: u16,
    pub stats_window_ms: u32,
    pub stats_report_interval_ms: u32,
    pub distance_bounds: DistanceBounds,
    pub tz_offset_minutes: i32,
}

impl NodeConfig {
    pub const fn new(anchor_number: u8, anchor_short_address: u16) -> Self {
        Self {
            anchor_number,
            anchor_short_address,
            stats_window_ms: STATS_WINDOW_MS,
            stats_report_interval_ms: STATS_REPORT_INTERVAL_MS,
            distance_bounds: DistanceBounds::defaults(),
            tz_offset_minutes: DIAG_TZ_OFFSET_DEFAULT_MINUTES,
        }
    }

    pub fn data_topic(&self) -> String<TOPIC_MAX> {
        let mut topic = String::new();
        let _ = write!(&mut topic, "uwb/ancora{}/data", self.anchor_number);
        topic
    }

    pub fn config_topic(&self) -> String<TOPIC_MAX> {
        let mut topic = String::new();
        let _ = write!(&mut topic, "uwb/ancora{}/config", self.anchor_number);
        topic
    }

    pub fn client_id(&self) -> String<32> {
        let mut id = String::new();
        let _ = write!(&mut id, "ESP32_Anchor_{:X}", self.anchor_short_address);
        id
    }
}

pub fn compiled_wifi_credentials() -> Option<NetworkCredentials> {
    let ssid = option_env!("UWB_WIFI_SSID")?;
    let password = option_env!("UWB_WIFI_PASSWORD").unwrap_or("");
    NetworkCredentials::new(ssid, password).ok()
}
