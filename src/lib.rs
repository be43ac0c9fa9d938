//! # kaku_lights_rs
//!
//! An async Rust library for driving KlikAanKlikUit lights through an ICS2000 hub.
//!
//! The hub forwards commands to the lights over RF without any acknowledgement.
//! This crate compensates the only way it can: every command is sent a fixed
//! number of times with a fixed pause in between, and only one command per
//! device is in flight at any time. Light state is tracked optimistically.
//!
//! The hub client itself (cloud login, local transport, RF encoding) is not part
//! of this crate; plug one in by implementing [`Hub`].
//!
//! ## Quick Start
//!
//! ```ignore
//! use kaku_lights_rs::{Brightness, Platform, PlatformConfig};
//!
//! async fn control_lights<H: kaku_lights_rs::Hub>() -> Result<(), kaku_lights_rs::Error> {
//!     let config = PlatformConfig::new("00:11:22:33:44:55", "me@example.com", "secret");
//!     let mut platform = Platform::<H>::setup(&config).await?;
//!
//!     if let Some(light) = platform.find("Living Room") {
//!         // Returns immediately; the command is repeated in the background
//!         light.turn_on(Some(Brightness::create(128))).await;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Retried delivery**: each command is sent [`RetryPolicy::tries`] times
//! - **One command per device**: overlapping commands are dropped, see [`InFlightRegistry`]
//! - **Optimistic state**: [`AssumedState`] records what was last asked of a light
//! - **Dimming**: 0-255 [`Brightness`] mapped onto the hub's 1-15 [`DimLevel`]
//! - **Diagnostics**: per-light [`CommandHistory`] and JSON diagnostics
//!
//! ## Runtime Selection
//!
//! This library is runtime-agnostic. Select your preferred runtime using feature flags:
//!
//! - `runtime-tokio` (default): Use the tokio async runtime
//! - `runtime-async-std`: Use the async-std runtime
//! - `runtime-smol`: Use the smol runtime

mod config;
mod device;
pub mod dispatch;
mod errors;
mod history;
mod hub;
mod inflight;
mod light;
mod platform;
pub mod runtime;
mod status;
mod types;

// Re-export public API
pub use config::{Credentials, PlatformConfig, RetryPolicy};
pub use device::{ColorMode, Device, DeviceId, DeviceKind};
pub use dispatch::{Action, Command};
pub use errors::Error;
pub use history::{CommandHistory, EventKind, HistoryEntry, HistorySummary};
pub use hub::Hub;
pub use inflight::{InFlightGuard, InFlightRegistry};
pub use light::KakuLight;
pub use platform::Platform;
pub use status::AssumedState;
pub use types::{Brightness, DimLevel, PowerState};
