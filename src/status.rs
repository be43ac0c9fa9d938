//! Optimistic state of a light.

use serde::{Deserialize, Serialize};

use crate::device::{ColorMode, DeviceKind};
use crate::types::{Brightness, PowerState};

/// What a light is assumed to be doing.
///
/// The hub never confirms commands, so this is simply the last thing that was
/// asked of the light. It can drift from reality when a command is lost or a
/// task fails; nothing reads state back from the device.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssumedState {
    power: PowerState,
    brightness: Option<Brightness>,
}

impl AssumedState {
    pub fn power(&self) -> PowerState {
        self.power
    }

    pub fn brightness(&self) -> Option<Brightness> {
        self.brightness
    }

    pub fn is_on(&self) -> Option<bool> {
        self.power.is_on()
    }

    /// Derives the color mode for a light of the given kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use kaku_lights_rs::{AssumedState, Brightness, ColorMode, DeviceKind};
    ///
    /// let mut state = AssumedState::default();
    /// assert_eq!(state.color_mode(DeviceKind::Dimmer), ColorMode::OnOff);
    ///
    /// state.assume_on(Brightness::create(34));
    /// assert_eq!(state.color_mode(DeviceKind::Dimmer), ColorMode::Brightness);
    /// assert_eq!(state.color_mode(DeviceKind::Switch), ColorMode::OnOff);
    /// ```
    pub fn color_mode(&self, kind: DeviceKind) -> ColorMode {
        match self.brightness {
            Some(brightness) if kind.supports_brightness() && !brightness.is_zero() => {
                ColorMode::Brightness
            }
            _ => ColorMode::OnOff,
        }
    }

    pub fn assume_on(&mut self, brightness: Brightness) {
        self.power = PowerState::On;
        self.brightness = Some(brightness);
    }

    /// Brightness is left as it was.
    pub fn assume_off(&mut self) {
        self.power = PowerState::Off;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_unknown() {
        let state = AssumedState::default();
        assert_eq!(state.power(), PowerState::Unknown);
        assert_eq!(state.is_on(), None);
        assert!(state.brightness().is_none());
    }

    #[test]
    fn test_off_keeps_brightness() {
        let mut state = AssumedState::default();
        state.assume_on(Brightness::create(120));
        state.assume_off();
        assert_eq!(state.is_on(), Some(false));
        assert_eq!(state.brightness(), Some(Brightness::create(120)));
    }

    #[test]
    fn test_zero_brightness_is_onoff_mode() {
        let mut state = AssumedState::default();
        state.assume_on(Brightness::create(0));
        assert_eq!(state.color_mode(DeviceKind::Dimmer), ColorMode::OnOff);
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_value(AssumedState::default()).unwrap();
        assert_eq!(json, serde_json::json!({"power": "unknown"}));

        let mut state = AssumedState::default();
        state.assume_on(Brightness::new());
        let json = serde_json::to_value(state).unwrap();
        assert_eq!(json, serde_json::json!({"power": "on", "brightness": 255}));
    }
}
