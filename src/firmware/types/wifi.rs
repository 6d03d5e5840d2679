use core::fmt;

use heapless::String;

pub const WIFI_SSID_MAX: usize = 32;
pub const WIFI_PASSWORD_MAX: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsError {
    #[error("ssid is empty")]
    EmptySsid,
    #[error("password is empty")]
    EmptyPassword,
    #[error("ssid longer than 32 bytes")]
    SsidTooLong,
    #[error("password longer than 64 bytes")]
    PasswordTooLong,
}

#[derive(Clone, PartialEq, Eq)]
pub struct NetworkCredentials {
    ssid: String<WIFI_SSID_MAX>,
    password: String<WIFI_PASSWORD_MAX>,
}

impl NetworkCredentials {
    /// Both fields must be non-empty; open networks are not provisioned remotely.
    pub fn new(ssid: &str, password: &str) -> Result<Self, CredentialsError> {
        if ssid.is_empty() {
            return Err(CredentialsError::EmptySsid);
        }
        if password.is_empty() {
            return Err(CredentialsError::EmptyPassword);
        }
        let ssid = String::try_from(ssid).map_err(|_| CredentialsError::SsidTooLong)?;
        let password =
            String::try_from(password).map_err(|_| CredentialsError::PasswordTooLong)?;
        Ok(Self { ssid, password })
    }

    pub fn ssid(&self) -> &str {
        self.ssid.as_str()
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

// Keeps the password out of log lines.
impl fmt::Debug for NetworkCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkCredentials")
            .field("ssid", &self.ssid.as_str())
            .field("password_len", &self.password.len())
            .finish()
    }
}
