//! Assumed power state of a light.

use serde::{Deserialize, Serialize};

/// Power state as last commanded.
///
/// Starts out `Unknown` because the hub never reports the real state back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerState {
    #[default]
    Unknown,
    On,
    Off,
}

impl PowerState {
    /// `None` while the state is unknown.
    pub fn is_on(self) -> Option<bool> {
        match self {
            PowerState::Unknown => None,
            PowerState::On => Some(true),
            PowerState::Off => Some(false),
        }
    }
}

impl From<bool> for PowerState {
    fn from(on: bool) -> Self {
        if on { PowerState::On } else { PowerState::Off }
    }
}
