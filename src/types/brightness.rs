//! Host-side brightness for KlikAanKlikUit lights.

use serde::{Deserialize, Serialize};

use super::DimLevel;

/// Brightness on the host's 0 to 255 scale.
///
/// Every `u8` is a valid brightness; the hub's own 1 to 15 scale is reached
/// through [`Brightness::dim_level`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Brightness {
    pub(crate) value: u8,
}

impl Default for Brightness {
    fn default() -> Self {
        Self::new()
    }
}

impl Brightness {
    pub const MIN: u8 = 0;
    pub const MAX: u8 = 255;

    /// Full brightness, used when a turn-on request carries no level.
    pub fn new() -> Self {
        Brightness { value: Self::MAX }
    }

    pub fn create(value: u8) -> Self {
        Brightness { value }
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    /// Zero brightness counts as "no brightness" when deriving the color mode.
    pub fn is_zero(&self) -> bool {
        self.value == Self::MIN
    }

    /// Converts to the hub's dimming level.
    ///
    /// # Examples
    ///
    /// ```
    /// use kaku_lights_rs::Brightness;
    ///
    /// assert_eq!(Brightness::create(34).dim_level().value(), 2);
    /// assert_eq!(Brightness::new().dim_level().value(), 15);
    /// ```
    pub fn dim_level(&self) -> DimLevel {
        DimLevel::from_brightness(*self)
    }
}

impl From<u8> for Brightness {
    fn from(value: u8) -> Self {
        Brightness::create(value)
    }
}
