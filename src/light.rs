//! Individual light control.

use std::sync::Arc;

use log::{debug, info, warn};
use serde_json::{Value, json};

use crate::config::RetryPolicy;
use crate::device::{ColorMode, Device, DeviceId, DeviceKind};
use crate::dispatch::{self, Action, Command};
use crate::history::{CommandHistory, EventKind};
use crate::hub::Hub;
use crate::inflight::{InFlightGuard, InFlightRegistry};
use crate::runtime::{self, JoinHandle, Mutex};
use crate::status::AssumedState;
use crate::types::{Brightness, PowerState};

/// Represents a single KlikAanKlikUit light paired with an ICS2000 hub.
///
/// Commands are fire-and-forget: [`turn_on`](Self::turn_on) and
/// [`turn_off`](Self::turn_off) spawn a task that sends the command
/// `tries` times, update the [`AssumedState`] and return right away. While a
/// task for this device is running, further commands are silently dropped.
///
/// The returned [`JoinHandle`] can be awaited to wait for the last try, or
/// dropped to leave the task running in the background.
pub struct KakuLight<H: Hub> {
    id: DeviceId,
    name: String,
    kind: DeviceKind,
    hub: Arc<H>,
    in_flight: InFlightRegistry,
    policy: RetryPolicy,
    state: AssumedState,
    history: Arc<Mutex<CommandHistory>>,
}

impl<H: Hub> std::fmt::Debug for KakuLight<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KakuLight")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("policy", &self.policy)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<H: Hub> KakuLight<H> {
    pub fn new(
        device: &Device,
        hub: Arc<H>,
        in_flight: InFlightRegistry,
        policy: RetryPolicy,
    ) -> Self {
        KakuLight {
            id: device.id,
            name: device.name.clone(),
            kind: device.kind,
            hub,
            in_flight,
            policy,
            state: AssumedState::default(),
            history: Arc::new(Mutex::new(CommandHistory::new())),
        }
    }

    pub fn id(&self) -> DeviceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn assumed_state(&self) -> &AssumedState {
        &self.state
    }

    /// Last requested brightness on the 0-255 scale.
    pub fn brightness(&self) -> Option<u8> {
        self.state.brightness().map(|b| b.value())
    }

    /// `None` until the first command has been issued.
    pub fn is_on(&self) -> Option<bool> {
        self.state.is_on()
    }

    pub fn color_mode(&self) -> ColorMode {
        self.state.color_mode(self.kind)
    }

    pub fn supported_color_modes(&self) -> &'static [ColorMode] {
        self.kind.supported_color_modes()
    }

    /// Whether a command for this device is still being delivered.
    pub fn is_busy(&self) -> bool {
        self.in_flight.contains(self.id)
    }

    pub async fn history(&self) -> CommandHistory {
        self.history.lock().await.clone()
    }

    pub async fn clear_history(&self) {
        self.history.lock().await.clear();
    }

    /// Returns diagnostics including assumed state, retry policy and history.
    pub async fn diagnostics(&self) -> Value {
        let summary = self.history.lock().await.summary();
        json!({
            "id": self.id,
            "name": self.name,
            "kind": self.kind,
            "state": self.state,
            "color_mode": self.color_mode(),
            "retry_policy": self.policy,
            "in_flight": self.is_busy(),
            "history": serde_json::to_value(summary).unwrap_or(Value::Null),
        })
    }

    /// Turns the light on, or re-dims it if it is already assumed on.
    ///
    /// `brightness` defaults to full brightness. Returns `None` without
    /// touching the assumed state if a command for this device is in flight.
    pub async fn turn_on(&mut self, brightness: Option<Brightness>) -> Option<JoinHandle<()>> {
        debug!("turn_on called for {} ({})", self.name, self.id);
        let brightness = brightness.unwrap_or_default();

        let action = match self.state.power() {
            PowerState::Unknown | PowerState::Off => Action::TurnOn,
            PowerState::On => Action::Dim(brightness.dim_level()),
        };
        let handle = self.dispatch(action).await?;

        self.state.assume_on(brightness);
        Some(handle)
    }

    /// Turns the light off regardless of its assumed state.
    ///
    /// Returns `None` without touching the assumed state if a command for
    /// this device is in flight.
    pub async fn turn_off(&mut self) -> Option<JoinHandle<()>> {
        debug!("turn_off called for {} ({})", self.name, self.id);
        let handle = self.dispatch(Action::TurnOff).await?;

        self.state.assume_off();
        Some(handle)
    }

    async fn dispatch(&self, action: Action) -> Option<JoinHandle<()>> {
        let Some(guard) = self.in_flight.try_claim(self.id, action) else {
            info!(
                "Dropping {} for {} ({}): a command is still in flight",
                action, self.name, self.id
            );
            self.history.lock().await.record(EventKind::Dropped, action);
            return None;
        };

        self.history.lock().await.record(EventKind::Dispatched, action);
        Some(runtime::spawn(deliver(
            Command::new(self.id, action),
            self.policy,
            Arc::clone(&self.hub),
            Arc::clone(&self.history),
            guard,
        )))
    }
}

/// Runs the retry loop for one command, then releases the device.
async fn deliver<H: Hub>(
    command: Command,
    policy: RetryPolicy,
    hub: Arc<H>,
    history: Arc<Mutex<CommandHistory>>,
    _guard: InFlightGuard,
) {
    let label = command.to_string();
    let hub = hub.as_ref();
    let events = history.as_ref();

    let result = dispatch::repeat(&policy, &label, |attempt| async move {
        events.lock().await.record_attempt(command.action, attempt);
        command.send(hub).await
    })
    .await;

    let mut events = events.lock().await;
    match result {
        Ok(()) => {
            debug!("Delivered {} {} time(s)", label, policy.tries());
            events.record(EventKind::Completed, command.action);
        }
        Err(e) => {
            warn!("Giving up on {}: {}", label, e);
            events.record_error(command.action, &e.to_string());
        }
    }
}
