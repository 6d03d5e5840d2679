mod measurement;
mod wifi;

pub use measurement::{AuxReadings, MeasurementRecord, RangeSample};
pub use wifi::{CredentialsError, NetworkCredentials, WIFI_PASSWORD_MAX, WIFI_SSID_MAX};
