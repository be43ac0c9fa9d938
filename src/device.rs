//! Devices as reported by the hub and their capabilities.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter};

/// Identifier the hub assigns to a paired device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(pub u32);

impl std::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for DeviceId {
    fn from(id: u32) -> Self {
        DeviceId(id)
    }
}

/// Classification of KlikAanKlikUit receivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DeviceKind {
    /// Receiver accepting dimming levels 1-15
    Dimmer,
    /// On/off-only receiver
    Switch,
}

/// How the host should present a light's controls.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ColorMode {
    OnOff,
    Brightness,
}

impl DeviceKind {
    pub fn supports_brightness(self) -> bool {
        matches!(self, DeviceKind::Dimmer)
    }

    /// The single capability set a device of this kind exposes.
    ///
    /// # Examples
    ///
    /// ```
    /// use kaku_lights_rs::{ColorMode, DeviceKind};
    ///
    /// assert_eq!(DeviceKind::Dimmer.supported_color_modes(), &[ColorMode::Brightness]);
    /// assert_eq!(DeviceKind::Switch.supported_color_modes(), &[ColorMode::OnOff]);
    /// ```
    pub fn supported_color_modes(self) -> &'static [ColorMode] {
        match self {
            DeviceKind::Dimmer => &[ColorMode::Brightness],
            DeviceKind::Switch => &[ColorMode::OnOff],
        }
    }
}

/// A device paired with the hub.
///
/// Owned by the hub client; lights only copy what they need out of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub name: String,
    pub kind: DeviceKind,
}

impl Device {
    pub fn new(id: u32, name: &str, kind: DeviceKind) -> Self {
        Device {
            id: DeviceId(id),
            name: name.to_string(),
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_color_mode_names() {
        let names: Vec<String> = ColorMode::iter().map(|m| m.to_string()).collect();
        assert_eq!(names, vec!["onoff", "brightness"]);
        assert_eq!(
            serde_json::to_string(&ColorMode::OnOff).unwrap(),
            "\"onoff\""
        );
    }

    #[test]
    fn test_device_deserialize() {
        let device: Device =
            serde_json::from_str(r#"{"id": 7, "name": "Lamp1", "kind": "dimmer"}"#).unwrap();
        assert_eq!(device, Device::new(7, "Lamp1", DeviceKind::Dimmer));
        assert!(device.kind.supports_brightness());
    }
}
