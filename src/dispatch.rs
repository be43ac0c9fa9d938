//! Fire-and-forget command delivery.
//!
//! The hub never acknowledges RF commands, so delivery is "assured" by sending
//! every command a fixed number of times. Duplicates are harmless: switching
//! on, switching off and dimming to a fixed level are all idempotent.

use std::future::Future;

use log::info;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};

use crate::config::RetryPolicy;
use crate::device::DeviceId;
use crate::errors::Error;
use crate::hub::Hub;
use crate::runtime;
use crate::types::DimLevel;

type Result<T> = std::result::Result<T, Error>;

/// What to do with a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
pub enum Action {
    #[serde(rename = "on")]
    #[strum(serialize = "on")]
    TurnOn,
    #[serde(rename = "off")]
    #[strum(serialize = "off")]
    TurnOff,
    #[serde(rename = "dim")]
    #[strum(serialize = "dim")]
    Dim(DimLevel),
}

/// One command for one device, consumed by the task that delivers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    pub device: DeviceId,
    pub action: Action,
}

impl Command {
    pub fn new(device: DeviceId, action: Action) -> Self {
        Command { device, action }
    }

    /// Sends the command to the hub once.
    pub async fn send<H: Hub>(self, hub: &H) -> Result<()> {
        match self.action {
            Action::TurnOn => hub.turn_on(self.device).await,
            Action::TurnOff => hub.turn_off(self.device).await,
            Action::Dim(level) => hub.dim(self.device, level).await,
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.action {
            Action::Dim(level) => write!(f, "dim {} to {}", self.device, level),
            action => write!(f, "{} {}", action, self.device),
        }
    }
}

/// Calls `send` exactly `policy.tries()` times, sleeping `policy.delay()`
/// between consecutive calls.
///
/// `send` receives the 1-based attempt number. The first error aborts the
/// remaining attempts and is returned.
///
/// # Example
///
/// ```
/// # async fn demo() -> Result<(), kaku_lights_rs::Error> {
/// use std::time::Duration;
/// use kaku_lights_rs::{RetryPolicy, dispatch};
///
/// let policy = RetryPolicy::new(3, Duration::ZERO)?;
/// let mut sent = Vec::new();
/// dispatch::repeat(&policy, "test", |attempt| {
///     sent.push(attempt);
///     async { Ok(()) }
/// })
/// .await?;
/// assert_eq!(sent, vec![1, 2, 3]);
/// # Ok(())
/// # }
/// ```
pub async fn repeat<F, Fut>(policy: &RetryPolicy, label: &str, mut send: F) -> Result<()>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let tries = policy.tries();
    for attempt in 1..=tries {
        info!("Try {} of {} on {}", attempt, tries, label);
        send(attempt).await?;
        if attempt < tries && !policy.delay().is_zero() {
            runtime::sleep(policy.delay()).await;
        }
    }
    Ok(())
}
