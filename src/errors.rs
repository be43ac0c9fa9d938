/// All error types that can occur when driving KlikAanKlikUit lights.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to deserialize JSON data.
    #[error("failed to load json: {0:?}")]
    JsonLoad(serde_json::Error),

    /// The hub could not be reached or rejected the credentials.
    #[error("could not connect to ICS2000 hub {mac}")]
    NotConnected { mac: String },

    /// A hub operation failed while sending a command to a device.
    #[error("hub {action} error: {reason}")]
    Hub { action: String, reason: String },

    /// The platform configuration is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Create a new hub error
    pub fn hub(action: &str, reason: impl std::fmt::Display) -> Self {
        Error::Hub {
            action: action.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a new not connected error
    pub fn not_connected(mac: &str) -> Self {
        Error::NotConnected {
            mac: mac.to_string(),
        }
    }

    /// Create a new invalid configuration error
    pub fn invalid_config(reason: &str) -> Self {
        Error::InvalidConfig(reason.to_string())
    }
}

/// Hacky implementation of PartialEq for testing
#[cfg(test)]
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}
