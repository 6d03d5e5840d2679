use heapless::String;
use serde::Deserialize;

use super::{
    net::TrialRequests,
    telemetry::NodeCounters,
    types::{CredentialsError, NetworkCredentials},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum IngestError {
    #[error("payload is not a JSON object")]
    Decode,
    #[error("ssid missing or empty")]
    MissingSsid,
    #[error("pass missing or empty")]
    MissingPassword,
    #[error("invalid credentials: {0}")]
    Invalid(#[from] CredentialsError),
}

// Fields decode into buffers wider than the credential limits so over-long values report
// which limit they broke instead of a generic decode failure.
const COMMAND_FIELD_MAX: usize = 128;

#[derive(Deserialize)]
struct CredentialCommand {
    #[serde(default)]
    ssid: Option<String<COMMAND_FIELD_MAX>>,
    #[serde(default)]
    pass: Option<String<COMMAND_FIELD_MAX>>,
}

/// Remote `{"ssid": .., "pass": ..}` commands. Valid commands become a pending trial; malformed
/// ones are counted and dropped without touching network state.
pub struct ConfigIngest<'a> {
    trials: &'a TrialRequests,
    counters: &'a NodeCounters,
}

impl<'a> ConfigIngest<'a> {
    pub fn new(trials: &'a TrialRequests, counters: &'a NodeCounters) -> Self {
        Self { trials, counters }
    }

    pub fn on_command(&self, payload: &[u8]) -> Result<(), IngestError> {
        match decode_credentials(payload) {
            Ok(credentials) => {
                log::info!("ingest: credential command ssid={}", credentials.ssid());
                self.trials.submit(credentials);
                Ok(())
            }
            Err(err) => {
                self.counters.record_malformed_command();
                log::warn!("ingest: command discarded err={}", err);
                Err(err)
            }
        }
    }
}

/// JSON string escapes are resolved before the credentials are validated.
pub fn decode_credentials(payload: &[u8]) -> Result<NetworkCredentials, IngestError> {
    let mut unescape = [0u8; COMMAND_FIELD_MAX];
    let (command, _) =
        serde_json_core::from_slice_escaped::<CredentialCommand>(payload, &mut unescape)
            .map_err(|_| IngestError::Decode)?;
    let ssid = command
        .ssid
        .filter(|value| !value.is_empty())
        .ok_or(IngestError::MissingSsid)?;
    let pass = command
        .pass
        .filter(|value| !value.is_empty())
        .ok_or(IngestError::MissingPassword)?;
    Ok(NetworkCredentials::new(&ssid, &pass)?)
}
