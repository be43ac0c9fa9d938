//! Interface to the vendor hub client.
//!
//! The ICS2000 cloud login, the hub's local transport and the RF protocol all
//! live behind this trait. Lights only ever call the three command operations;
//! the platform additionally connects and lists devices once at setup.

use std::future::Future;

use crate::config::Credentials;
use crate::device::{Device, DeviceId};
use crate::errors::Error;
use crate::types::DimLevel;

type Result<T> = std::result::Result<T, Error>;

/// A connected ICS2000 hub.
///
/// Implementations are shared by every light and every in-flight command task
/// without extra synchronization, so they must be safe for concurrent use.
pub trait Hub: Send + Sync + Sized + 'static {
    /// Connect to the hub identified by `credentials.mac`.
    fn connect(credentials: &Credentials) -> impl Future<Output = Result<Self>> + Send;

    /// Whether the connection is usable.
    fn is_connected(&self) -> bool;

    /// Devices paired with the hub.
    fn devices(&self) -> impl Future<Output = Result<Vec<Device>>> + Send;

    /// Switch a device on.
    fn turn_on(&self, device: DeviceId) -> impl Future<Output = Result<()>> + Send;

    /// Switch a device off.
    fn turn_off(&self, device: DeviceId) -> impl Future<Output = Result<()>> + Send;

    /// Set a dimmer to the given level.
    fn dim(&self, device: DeviceId, level: DimLevel) -> impl Future<Output = Result<()>> + Send;
}

#[cfg(test)]
pub(crate) mod test_hub {
    //! In-memory hub recording every call it receives.

    use std::sync::Mutex;
    use std::time::Instant;

    use super::*;
    use crate::device::DeviceKind;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum HubCall {
        TurnOn(DeviceId),
        TurnOff(DeviceId),
        Dim(DeviceId, u8),
    }

    #[derive(Debug, Default)]
    pub struct RecordingHub {
        pub connected: bool,
        pub devices: Vec<Device>,
        /// Calls at this 1-based position fail instead of succeeding
        pub fail_on_call: Option<usize>,
        pub fail_listing: bool,
        calls: Mutex<Vec<(HubCall, Instant)>>,
    }

    impl RecordingHub {
        pub fn new() -> Self {
            RecordingHub {
                connected: true,
                devices: vec![
                    Device::new(1, "Lamp1", DeviceKind::Dimmer),
                    Device::new(2, "Porch", DeviceKind::Switch),
                ],
                ..Default::default()
            }
        }

        pub fn failing_on(call: usize) -> Self {
            RecordingHub {
                fail_on_call: Some(call),
                ..Self::new()
            }
        }

        pub fn calls(&self) -> Vec<HubCall> {
            self.calls.lock().unwrap().iter().map(|(c, _)| *c).collect()
        }

        pub fn call_times(&self) -> Vec<Instant> {
            self.calls.lock().unwrap().iter().map(|(_, t)| *t).collect()
        }

        fn record(&self, call: HubCall) -> Result<()> {
            let mut calls = self.calls.lock().unwrap();
            calls.push((call, Instant::now()));
            if self.fail_on_call == Some(calls.len()) {
                return Err(Error::hub("send", "transmitter busy"));
            }
            Ok(())
        }
    }

    impl Hub for RecordingHub {
        async fn connect(credentials: &Credentials) -> Result<Self> {
            if credentials.password == "unreachable" {
                return Err(Error::hub("connect", "no route to host"));
            }
            Ok(RecordingHub {
                connected: credentials.password != "wrong",
                fail_listing: credentials.password == "no-devices",
                ..Self::new()
            })
        }

        fn is_connected(&self) -> bool {
            self.connected
        }

        async fn devices(&self) -> Result<Vec<Device>> {
            if self.fail_listing {
                return Err(Error::hub("devices", "listing timed out"));
            }
            Ok(self.devices.clone())
        }

        async fn turn_on(&self, device: DeviceId) -> Result<()> {
            self.record(HubCall::TurnOn(device))
        }

        async fn turn_off(&self, device: DeviceId) -> Result<()> {
            self.record(HubCall::TurnOff(device))
        }

        async fn dim(&self, device: DeviceId, level: DimLevel) -> Result<()> {
            self.record(HubCall::Dim(device, level.value()))
        }
    }
}
