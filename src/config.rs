//! Platform configuration and retry policy.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_with::{DurationSecondsWithFrac, serde_as};

use crate::errors::Error;

type Result<T> = std::result::Result<T, Error>;

/// Configuration of one ICS2000 light platform.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use kaku_lights_rs::PlatformConfig;
///
/// let config = PlatformConfig::from_json(
///     r#"{"mac": "00:11:22:33:44:55", "email": "me@example.com", "password": "hunter2", "tries": 5}"#,
/// )
/// .unwrap();
///
/// let policy = config.retry_policy().unwrap();
/// assert_eq!(policy.tries(), 5);
/// assert_eq!(policy.delay(), Duration::from_secs(3));
/// ```
#[serde_with::skip_serializing_none]
#[derive(Serialize, Deserialize, Clone)]
pub struct PlatformConfig {
    /// MAC address of the hub
    pub mac: String,
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
    /// How many times every command is sent
    #[serde(default)]
    pub tries: Option<u32>,
    /// Seconds to wait between two sends of the same command
    #[serde(default)]
    pub sleep: Option<u64>,
}

impl std::fmt::Debug for PlatformConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformConfig")
            .field("mac", &self.mac)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("tries", &self.tries)
            .field("sleep", &self.sleep)
            .finish()
    }
}

impl PlatformConfig {
    pub fn new(mac: &str, email: &str, password: &str) -> Self {
        PlatformConfig {
            mac: mac.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            tries: None,
            sleep: None,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(Error::JsonLoad)
    }

    /// Checks that the required fields are present.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("mac", &self.mac),
            ("email", &self.email),
            ("password", &self.password),
        ] {
            if value.trim().is_empty() {
                return Err(Error::invalid_config(&format!("{field} must not be empty")));
            }
        }
        self.retry_policy().map(|_| ())
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            mac: self.mac.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }

    /// Builds the retry policy, falling back to the defaults for unset fields.
    pub fn retry_policy(&self) -> Result<RetryPolicy> {
        RetryPolicy::new(
            self.tries.unwrap_or(RetryPolicy::DEFAULT_TRIES),
            self.sleep
                .map(Duration::from_secs)
                .unwrap_or(RetryPolicy::DEFAULT_DELAY),
        )
    }
}

/// What the hub client needs to open a connection.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub mac: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("mac", &self.mac)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// How often a command is repeated and how long to wait in between.
///
/// RF commands are best-effort, so every command is simply sent `tries`
/// times. Immutable once built.
#[serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RetryPolicy {
    tries: u32,
    #[serde_as(as = "DurationSecondsWithFrac<f64>")]
    delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            tries: Self::DEFAULT_TRIES,
            delay: Self::DEFAULT_DELAY,
        }
    }
}

impl RetryPolicy {
    pub const DEFAULT_TRIES: u32 = 3;
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(3);

    /// Returns an error if `tries` is zero.
    pub fn new(tries: u32, delay: Duration) -> Result<Self> {
        if tries == 0 {
            return Err(Error::invalid_config("tries must be at least 1"));
        }
        Ok(RetryPolicy { tries, delay })
    }

    pub fn tries(&self) -> u32 {
        self.tries
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PlatformConfig::new("00:11:22:33:44:55", "me@example.com", "secret");
        assert_eq!(config.retry_policy().unwrap(), RetryPolicy::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_tries_rejected() {
        let mut config = PlatformConfig::new("00:11:22:33:44:55", "me@example.com", "secret");
        config.tries = Some(0);
        assert_eq!(
            config.validate(),
            Err(Error::invalid_config("tries must be at least 1"))
        );
    }

    #[test]
    fn test_zero_sleep_allowed() {
        let config = PlatformConfig::from_json(
            r#"{"mac": "aa", "email": "b", "password": "c", "tries": 1, "sleep": 0}"#,
        )
        .unwrap();
        let policy = config.retry_policy().unwrap();
        assert_eq!(policy.tries(), 1);
        assert_eq!(policy.delay(), Duration::ZERO);
    }

    #[test]
    fn test_missing_required_field() {
        let result = PlatformConfig::from_json(r#"{"mac": "aa", "email": "b"}"#);
        assert!(matches!(result, Err(Error::JsonLoad(_))));
    }

    #[test]
    fn test_empty_field_rejected() {
        let config = PlatformConfig::new("", "me@example.com", "secret");
        assert_eq!(
            config.validate(),
            Err(Error::invalid_config("mac must not be empty"))
        );
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = PlatformConfig::new("aa", "b", "hunter2");
        assert!(!format!("{config:?}").contains("hunter2"));
        assert!(!format!("{:?}", config.credentials()).contains("hunter2"));
    }

    #[test]
    fn test_policy_serializes_fractional_delay() {
        let policy = RetryPolicy::new(2, Duration::from_millis(1500)).unwrap();
        let json = serde_json::to_value(policy).unwrap();
        assert_eq!(json["tries"], 2);
        assert_eq!(json["delay"], 1.5);
    }
}
