//! CLI for trying out command delivery against a simulated ICS2000 hub.
//!
//! The simulated hub prints every command it receives instead of sending it
//! over RF, which makes the retry loop and dropped commands visible.
//!
//! Run with: cargo run --example kaku_cli -- --help

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use kaku_lights_rs::{
    Brightness, Credentials, Device, DeviceId, DeviceKind, DimLevel, Error, Hub, Platform,
    PlatformConfig,
};

#[derive(Parser)]
#[command(name = "kaku-cli")]
#[command(about = "Drive KlikAanKlikUit lights on a simulated ICS2000 hub", long_about = None)]
struct Cli {
    /// How many times every command is sent
    #[arg(short, long, default_value = "3")]
    tries: u32,

    /// Seconds to wait between two sends of the same command
    #[arg(short, long, default_value = "1")]
    sleep: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the devices paired with the hub
    List,

    /// Turn a light on, optionally at a brightness (0-255)
    On {
        device: u32,
        brightness: Option<u8>,
    },

    /// Turn a light off
    Off { device: u32 },

    /// Run several steps without waiting in between
    ///
    /// Steps: `on:<id>`, `on:<id>:<brightness>`, `off:<id>`, `wait`
    Script { steps: Vec<String> },

    /// Print diagnostics for all lights
    Diagnostics,
}

/// Hub that logs commands to stdout.
struct SimulatedHub {
    started: Instant,
    sent: AtomicUsize,
}

impl SimulatedHub {
    fn print(&self, what: String) {
        let n = self.sent.fetch_add(1, Ordering::SeqCst) + 1;
        println!(
            "  [{:>6.2}s] #{:<3} {}",
            self.started.elapsed().as_secs_f64(),
            n,
            what
        );
    }
}

impl Hub for SimulatedHub {
    async fn connect(credentials: &Credentials) -> Result<Self, Error> {
        println!("Connected to simulated hub {}", credentials.mac);
        Ok(SimulatedHub {
            started: Instant::now(),
            sent: AtomicUsize::new(0),
        })
    }

    fn is_connected(&self) -> bool {
        true
    }

    async fn devices(&self) -> Result<Vec<Device>, Error> {
        Ok(vec![
            Device::new(1, "Living Room", DeviceKind::Dimmer),
            Device::new(2, "Kitchen", DeviceKind::Dimmer),
            Device::new(3, "Porch", DeviceKind::Switch),
        ])
    }

    async fn turn_on(&self, device: DeviceId) -> Result<(), Error> {
        self.print(format!("turn_on  device={device}"));
        Ok(())
    }

    async fn turn_off(&self, device: DeviceId) -> Result<(), Error> {
        self.print(format!("turn_off device={device}"));
        Ok(())
    }

    async fn dim(&self, device: DeviceId, level: DimLevel) -> Result<(), Error> {
        self.print(format!("dim      device={device} level={level}"));
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = PlatformConfig::new("00:00:00:00:00:00", "demo@example.com", "demo");
    config.tries = Some(cli.tries);
    config.sleep = Some(cli.sleep);
    let mut platform = Platform::<SimulatedHub>::setup(&config).await?;

    let steps = match cli.command {
        Commands::List => {
            for light in platform.lights() {
                println!("  {:>3}  {:<12} {}", light.id(), light.name(), light.kind());
            }
            return Ok(());
        }
        Commands::Diagnostics => {
            let diag = platform.diagnostics().await;
            println!("{}", serde_json::to_string_pretty(&diag)?);
            return Ok(());
        }
        Commands::On { device, brightness } => match brightness {
            Some(b) => vec![format!("on:{device}:{b}"), "wait".to_string()],
            None => vec![format!("on:{device}"), "wait".to_string()],
        },
        Commands::Off { device } => vec![format!("off:{device}"), "wait".to_string()],
        Commands::Script { mut steps } => {
            steps.push("wait".to_string());
            steps
        }
    };

    let mut pending = Vec::new();
    for step in steps {
        let parts: Vec<&str> = step.split(':').collect();
        match parts.as_slice() {
            ["wait"] => {
                for handle in pending.drain(..) {
                    handle.await;
                }
            }
            ["on", id, rest @ ..] => {
                let id = DeviceId(id.parse()?);
                let brightness = match rest {
                    [b] => Some(Brightness::create(b.parse()?)),
                    _ => None,
                };
                let light = platform.read_mut(id).ok_or(format!("unknown device {id}"))?;
                match light.turn_on(brightness).await {
                    Some(handle) => pending.push(handle),
                    None => println!("  on:{id} dropped, device busy"),
                }
            }
            ["off", id] => {
                let id = DeviceId(id.parse()?);
                let light = platform.read_mut(id).ok_or(format!("unknown device {id}"))?;
                match light.turn_off().await {
                    Some(handle) => pending.push(handle),
                    None => println!("  off:{id} dropped, device busy"),
                }
            }
            _ => return Err(format!("unknown step {step:?}").into()),
        }
        // Give freshly spawned tasks a chance to send their first try
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    for light in platform.lights() {
        println!(
            "{:<12} is_on={:?} brightness={:?} color_mode={}",
            light.name(),
            light.is_on(),
            light.brightness(),
            light.color_mode()
        );
    }
    Ok(())
}
