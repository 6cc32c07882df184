//! # pumpkinpid — pumpkinpi daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars) and install logging
//! - Pick the GPIO backend and open the LED and motion-sensor pins
//! - Construct application services, injecting adapters via port traits
//! - Arm the motion orchestrator on the sensor's edge channel
//! - Build the axum router, bind to a TCP port and serve
//! - Handle graceful shutdown (SIGTERM/SIGINT): stop watching the sensor,
//!   switch every LED off, release the pins
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use pumpkinpi_adapter_gpio::{
    GpioPin, SYSFS_ROOT, SysfsPin, VirtualPin, WatchSettings, sysfs_available,
};
use pumpkinpi_adapter_host::{HostFileSystem, SystemCommandRunner};
use pumpkinpi_adapter_http_axum::state::AppState;
use pumpkinpi_app::device_state::DeviceState;
use pumpkinpi_app::event_bus::InProcessEventBus;
use pumpkinpi_app::motion::MotionOrchestrator;
use pumpkinpi_app::ports::InputPin;
use pumpkinpi_app::services::feature_service::FeatureService;
use pumpkinpi_app::services::led_service::LedService;
use pumpkinpi_app::services::photo_service::PhotoService;
use pumpkinpi_app::services::sound_service::SoundService;
use pumpkinpi_domain::led::LedStatus;

use crate::config::{Config, GpioBackend};

/// Events buffered per SSE observer before it starts skipping.
const EVENT_BUS_CAPACITY: usize = 256;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("unable to load configuration")?;
    init_tracing(&config.logging.filter);

    let catalog = config.catalog()?;
    tokio::fs::create_dir_all(&config.paths.photos_dir)
        .await
        .with_context(|| format!("unable to create {}", config.paths.photos_dir.display()))?;

    // Actuators
    let use_sysfs = select_backend(config.gpio.backend);
    let (pins, sensor) = open_pins(&config, use_sysfs)?;
    let device_state = Arc::new(DeviceState::new(
        &catalog,
        pins,
        config.paths.sounds_dir.clone(),
        config.paths.photos_dir.clone(),
    ));

    // Event bus
    let event_bus = Arc::new(InProcessEventBus::new(EVENT_BUS_CAPACITY));

    // Services
    let leds = Arc::new(LedService::new(
        Arc::clone(&device_state),
        Arc::clone(&event_bus),
    ));
    let features = Arc::new(FeatureService::new(
        Arc::clone(&device_state),
        Arc::clone(&event_bus),
    ));
    let sounds = Arc::new(SoundService::new(
        Arc::clone(&device_state),
        catalog.sounds.clone(),
        SystemCommandRunner,
        config.audio.command.clone(),
    ));
    let photos = Arc::new(PhotoService::new(
        Arc::clone(&device_state),
        Arc::clone(&leds),
        Arc::clone(&sounds),
        SystemCommandRunner,
        HostFileSystem,
        Arc::clone(&event_bus),
        config.capture_settings(),
    ));

    // Motion trigger
    let orchestrator = Arc::new(MotionOrchestrator::new(
        Arc::clone(&device_state),
        Arc::clone(&sounds),
        Arc::clone(&leds),
        Arc::clone(&photos),
        config.led_off_delay(),
    ));
    let edges = sensor.watch().context("unable to watch the motion sensor")?;
    let orchestrator_task = orchestrator.spawn(edges);

    // HTTP
    let state = AppState::from_arcs(Arc::clone(&leds), features, sounds, photos, event_bus);
    let app = pumpkinpi_adapter_http_axum::router::build(state, &config.paths.photos_dir);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("unable to bind {bind_addr}"))?;
    tracing::info!(addr = %bind_addr, "pumpkinpid listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Teardown
    tracing::info!("shutting down");
    sensor.unwatch_all();
    orchestrator_task.abort();
    leds.set_all(LedStatus::Off).await;
    // unexports the sensor line; LED lines go with the last state handle
    drop(sensor);
    tracing::info!("pumpkinpid stopped");

    Ok(())
}

fn init_tracing(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(default_filter).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();
}

/// Resolve `auto` by probing sysfs; returns whether sysfs pins are used.
fn select_backend(backend: GpioBackend) -> bool {
    match backend {
        GpioBackend::Sysfs => true,
        GpioBackend::Virtual => {
            tracing::info!("using virtual GPIO pins");
            false
        }
        GpioBackend::Auto if sysfs_available(Path::new(SYSFS_ROOT)) => {
            tracing::info!(root = SYSFS_ROOT, "using sysfs GPIO pins");
            true
        }
        GpioBackend::Auto => {
            tracing::warn!(
                root = SYSFS_ROOT,
                "GPIO sysfs is not writable, falling back to virtual pins"
            );
            false
        }
    }
}

/// Open one output per configured LED and the motion-sensor input.
///
/// On sysfs, an LED without a pin number gets no output at all.
fn open_pins(
    config: &Config,
    use_sysfs: bool,
) -> anyhow::Result<(HashMap<String, GpioPin>, GpioPin)> {
    let mut pins = HashMap::new();
    for led in &config.leds {
        let pin = match (use_sysfs, led.pin) {
            (true, Some(number)) => GpioPin::Sysfs(
                SysfsPin::output(SYSFS_ROOT, number)
                    .with_context(|| format!("unable to open GPIO {number} for {}", led.id))?,
            ),
            (true, None) => {
                tracing::info!(led = %led.id, "LED has no GPIO line, state only");
                continue;
            }
            (false, _) => GpioPin::Virtual(VirtualPin::output(led.id.clone())),
        };
        pins.insert(led.id.clone(), pin);
    }

    let sensor = if use_sysfs {
        let watch = WatchSettings {
            poll_interval: Duration::from_millis(config.gpio.poll_interval_ms),
            buffer: config.motion.edge_buffer,
        };
        let number = config.gpio.motion_sensor_pin;
        GpioPin::Sysfs(
            SysfsPin::input(SYSFS_ROOT, number, watch)
                .with_context(|| format!("unable to open GPIO {number} for the motion sensor"))?,
        )
    } else {
        GpioPin::Virtual(VirtualPin::input(
            "motion-sensor",
            config.virtual_edge_interval(),
            config.motion.edge_buffer,
        ))
    };

    Ok((pins, sensor))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "unable to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "unable to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
