//! Native dimming level of the ICS2000 hub.

use serde::{Deserialize, Serialize};

use super::Brightness;

/// Dimming level from 1 to 15 as understood by the hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DimLevel {
    pub(crate) value: u8,
}

impl DimLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 15;

    /// Width of one hub level on the 0-255 brightness scale.
    const STEP: u8 = 17;

    pub fn value(&self) -> u8 {
        self.value
    }

    /// Returns None if value is outside valid range (1-15).
    ///
    /// # Examples
    ///
    /// ```
    /// use kaku_lights_rs::DimLevel;
    ///
    /// assert!(DimLevel::create(0).is_none());
    /// assert!(DimLevel::create(1).is_some());
    /// assert!(DimLevel::create(15).is_some());
    /// assert!(DimLevel::create(16).is_none());
    /// ```
    pub fn create(value: u8) -> Option<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Some(DimLevel { value })
        } else {
            None
        }
    }

    /// Maps brightness to `ceil(brightness / 17)`, raised to the hub minimum.
    ///
    /// Zero brightness would map to level 0, which the hub rejects, so it is
    /// sent as the dimmest valid level instead.
    pub fn from_brightness(brightness: Brightness) -> Self {
        let level = brightness.value().div_ceil(Self::STEP);
        DimLevel {
            value: level.clamp(Self::MIN, Self::MAX),
        }
    }
}

impl std::fmt::Display for DimLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}
