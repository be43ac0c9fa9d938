//! Hub setup and the set of lights it exposes.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::join_all;
use log::{error, info, warn};
use serde_json::{Value, json};

use crate::config::{PlatformConfig, RetryPolicy};
use crate::device::DeviceId;
use crate::errors::Error;
use crate::hub::Hub;
use crate::inflight::InFlightRegistry;
use crate::light::KakuLight;

type Result<T> = std::result::Result<T, Error>;

/// All lights of one ICS2000 hub.
///
/// Built once by [`Platform::setup`]: one [`KakuLight`] per paired device,
/// all sharing the hub connection and a single in-flight registry. Lights
/// are never added or removed afterwards.
pub struct Platform<H: Hub> {
    hub: Arc<H>,
    in_flight: InFlightRegistry,
    lights: BTreeMap<DeviceId, KakuLight<H>>,
}

impl<H: Hub> Platform<H> {
    /// Validate `config`, connect to the hub and register its devices.
    ///
    /// A connection failure is reported once and not retried; no lights
    /// are registered in that case.
    pub async fn setup(config: &PlatformConfig) -> Result<Self> {
        config.validate()?;
        let policy = config.retry_policy()?;

        let hub = match H::connect(&config.credentials()).await {
            Ok(hub) if hub.is_connected() => hub,
            Ok(_) => {
                error!("Could not connect to ICS2000 hub {}", config.mac);
                return Err(Error::not_connected(&config.mac));
            }
            Err(e) => {
                error!("Could not connect to ICS2000 hub {}: {}", config.mac, e);
                return Err(e);
            }
        };

        Self::with_hub(hub, policy).await
    }

    /// Register the devices of an already connected hub.
    pub async fn with_hub(hub: H, policy: RetryPolicy) -> Result<Self> {
        let hub = Arc::new(hub);
        let in_flight = InFlightRegistry::new();

        let devices = match hub.devices().await {
            Ok(devices) => devices,
            Err(e) => {
                error!("Could not list devices of ICS2000 hub: {}", e);
                return Err(e);
            }
        };

        let mut lights: BTreeMap<DeviceId, KakuLight<H>> = BTreeMap::new();
        for device in devices {
            if let Some(known) = lights.get(&device.id) {
                warn!(
                    "Device {} listed again as {}, keeping {}",
                    device.id,
                    device.name,
                    known.name()
                );
                continue;
            }
            let light = KakuLight::new(&device, Arc::clone(&hub), in_flight.clone(), policy);
            lights.insert(device.id, light);
        }

        info!("Registered {} KlikAanKlikUit light(s)", lights.len());
        Ok(Platform {
            hub,
            in_flight,
            lights,
        })
    }

    pub fn hub(&self) -> &H {
        &self.hub
    }

    /// List all device IDs, in ascending order.
    pub fn list(&self) -> Vec<DeviceId> {
        self.lights.keys().copied().collect()
    }

    /// Get a reference to a light by device ID.
    pub fn read(&self, id: DeviceId) -> Option<&KakuLight<H>> {
        self.lights.get(&id)
    }

    /// Get a mutable reference to a light by device ID.
    pub fn read_mut(&mut self, id: DeviceId) -> Option<&mut KakuLight<H>> {
        self.lights.get_mut(&id)
    }

    /// Find a light by its display name.
    pub fn find(&mut self, name: &str) -> Option<&mut KakuLight<H>> {
        self.lights.values_mut().find(|light| light.name() == name)
    }

    pub fn lights(&self) -> impl Iterator<Item = &KakuLight<H>> {
        self.lights.values()
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    /// Devices with a command still being delivered.
    pub fn in_flight(&self) -> Vec<DeviceId> {
        self.in_flight.in_flight()
    }

    /// Diagnostics of every light, keyed by device ID.
    pub async fn diagnostics(&self) -> Value {
        let lights = join_all(self.lights.values().map(|light| light.diagnostics())).await;
        json!({
            "connected": self.hub.is_connected(),
            "light_count": self.lights.len(),
            "in_flight": self.in_flight(),
            "lights": lights,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::device::{Device, DeviceKind};
    use crate::hub::test_hub::{HubCall, RecordingHub};
    use crate::types::Brightness;

    fn config(password: &str) -> PlatformConfig {
        let mut config = PlatformConfig::new("00:11:22:33:44:55", "me@example.com", password);
        config.sleep = Some(0);
        config
    }

    #[tokio::test]
    async fn test_setup_registers_every_device() {
        let platform = Platform::<RecordingHub>::setup(&config("secret"))
            .await
            .unwrap();

        assert_eq!(platform.list(), vec![DeviceId(1), DeviceId(2)]);
        let lamp = platform.read(DeviceId(1)).unwrap();
        assert_eq!(lamp.name(), "Lamp1");
        assert_eq!(lamp.kind(), DeviceKind::Dimmer);
        assert_eq!(lamp.retry_policy().tries(), 3);
        assert_eq!(lamp.retry_policy().delay(), Duration::ZERO);
        assert_eq!(lamp.is_on(), None);
    }

    #[tokio::test]
    async fn test_setup_not_connected() {
        let result = Platform::<RecordingHub>::setup(&config("wrong")).await;
        assert_eq!(
            result.err(),
            Some(Error::not_connected("00:11:22:33:44:55"))
        );
    }

    #[tokio::test]
    async fn test_setup_connect_error() {
        let result = Platform::<RecordingHub>::setup(&config("unreachable")).await;
        assert_eq!(
            result.err(),
            Some(Error::hub("connect", "no route to host"))
        );
    }

    #[tokio::test]
    async fn test_setup_rejects_invalid_config() {
        let mut config = config("secret");
        config.tries = Some(0);
        let result = Platform::<RecordingHub>::setup(&config).await;
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn test_setup_device_listing_error() {
        let result = Platform::<RecordingHub>::setup(&config("no-devices")).await;
        assert_eq!(
            result.err(),
            Some(Error::hub("devices", "listing timed out"))
        );
    }

    #[tokio::test]
    async fn test_duplicate_device_keeps_first() {
        let mut hub = RecordingHub::new();
        hub.devices.push(Device::new(1, "Lamp1 again", DeviceKind::Switch));
        let platform = Platform::with_hub(hub, RetryPolicy::default())
            .await
            .unwrap();

        assert_eq!(platform.list(), vec![DeviceId(1), DeviceId(2)]);
        let lamp = platform.read(DeviceId(1)).unwrap();
        assert_eq!(lamp.name(), "Lamp1");
        assert_eq!(lamp.kind(), DeviceKind::Dimmer);
    }

    #[tokio::test]
    async fn test_lights_share_hub_and_registry() {
        let mut platform = Platform::with_hub(
            RecordingHub::new(),
            RetryPolicy::new(2, Duration::from_millis(20)).unwrap(),
        )
        .await
        .unwrap();

        let lamp = platform.find("Lamp1").unwrap().turn_on(None).await.unwrap();
        assert_eq!(platform.in_flight(), vec![DeviceId(1)]);

        let porch = platform
            .read_mut(DeviceId(2))
            .unwrap()
            .turn_on(Some(Brightness::create(80)))
            .await
            .unwrap();
        lamp.await;
        porch.await;

        assert!(platform.in_flight().is_empty());
        let calls = platform.hub().calls();
        assert_eq!(calls.len(), 4);
        assert_eq!(
            calls.iter().filter(|c| **c == HubCall::TurnOn(DeviceId(2))).count(),
            2
        );
    }

    #[tokio::test]
    async fn test_diagnostics() {
        let platform = Platform::with_hub(RecordingHub::new(), RetryPolicy::default())
            .await
            .unwrap();
        let diag = platform.diagnostics().await;
        assert_eq!(diag["connected"], true);
        assert_eq!(diag["light_count"], 2);
        assert_eq!(diag["lights"][1]["name"], "Porch");
        assert_eq!(diag["lights"][1]["kind"], "switch");
    }
}
