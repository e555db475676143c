//! Serial HID bridge entry point.
//!
//! Wires together configuration, the serial connection, the platform input
//! emulator and the session read loop, then runs until Ctrl+C.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load_config()                -- file, then env/CLI overrides
//!  └─ platform_emulator()          -- SendInput / XTest / CoreGraphics / dry-run
//!  └─ serial::open()               -- fatal on failure, lists ports
//!  └─ SessionDriver::run()         -- read, tokenize, translate, inject
//!       └─ until Ctrl+C clears `running`
//! ```
//!
//! # Runtime
//!
//! All decoding state lives in one `BridgeSession` mutated by one loop.  The
//! only other task is the Ctrl+C listener, which shares the current-thread
//! runtime.

use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use hid_bridge::application::session::{BridgeSession, SessionDriver};
use hid_bridge::application::translate_events::EventTranslator;
use hid_bridge::infrastructure::{
    input_emulation::platform_emulator,
    serial,
    storage::config::{load_config, AppConfig},
};
use hid_bridge_core::MotionScale;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Serial-to-HID bridge.
///
/// Reads keyboard and mouse telemetry printed by a microcontroller on a
/// serial port and replays it as native keyboard and mouse input.
#[derive(Debug, Parser)]
#[command(
    name = "hid-bridge",
    about = "Replay keyboard and mouse telemetry from a serial device as native input",
    version
)]
struct Cli {
    /// Serial port of the device, e.g. `COM8` or `/dev/ttyUSB0`.
    #[arg(env = "HID_BRIDGE_PORT")]
    port: Option<String>,

    /// Baud rate of the serial link.
    #[arg(env = "HID_BRIDGE_BAUD")]
    baud: Option<u32>,

    /// Path to a TOML config file, instead of the platform config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Multiplier applied to every mouse movement.
    #[arg(long)]
    sensitivity: Option<f64>,

    /// Log decoded events instead of injecting them.
    #[arg(long)]
    dry_run: bool,

    /// Print the serial ports visible to the OS and exit.
    #[arg(long)]
    list_ports: bool,
}

impl Cli {
    /// Applies command-line and environment values over the file config.
    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(port) = &self.port {
            config.serial.port = port.clone();
        }
        if let Some(baud) = self.baud {
            config.serial.baud_rate = baud;
        }
        if let Some(sensitivity) = self.sensitivity {
            config.input.mouse_sensitivity = sensitivity;
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.list_ports {
        for port in serial::list_port_names() {
            println!("{port}");
        }
        return Ok(());
    }

    // The log level may come from the config file, so load it before logging
    // is set up and report a load failure afterwards.
    let loaded = load_config(cli.config.as_deref());
    let log_level = loaded
        .as_ref()
        .map_or("info", |cfg| cfg.logging.log_level.as_str());
    init_tracing(log_level);

    let mut config = loaded.context("failed to load configuration")?;
    cli.apply_overrides(&mut config);
    config.validate().context("invalid configuration")?;

    let scale = MotionScale::new(config.input.mouse_sensitivity)?;
    let emulator =
        platform_emulator(cli.dry_run).context("failed to initialise input emulation")?;

    // ── Serial connection ─────────────────────────────────────────────────────
    let settings = config.serial_settings();
    let mut connection = match serial::open(&settings) {
        Ok(connection) => connection,
        Err(e) => {
            error!("{e}");
            report_available_ports();
            return Err(e).context("cannot start session");
        }
    };

    info!(
        sensitivity = scale.factor(),
        "HID bridge active on {} at {} baud{}",
        settings.port,
        settings.baud_rate,
        if cli.dry_run { " (dry run)" } else { "" }
    );

    // ── Ctrl-C handler ────────────────────────────────────────────────────────
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("user cancelled; shutting down");
                running_clone.store(false, Ordering::Relaxed);
            }
            Err(e) => error!("failed to listen for Ctrl+C signal: {e}"),
        }
    });

    // ── Session loop ──────────────────────────────────────────────────────────
    let session = BridgeSession::new(EventTranslator::new(emulator, scale));
    let mut driver = SessionDriver::new(session, config.session_timing());
    driver.run(&mut connection, &running).await;

    info!("HID bridge stopped");
    Ok(())
}

/// Installs the fmt subscriber; `RUST_LOG` wins over the configured level.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn report_available_ports() {
    let ports = serial::list_port_names();
    if ports.is_empty() {
        error!("no serial ports found");
    } else {
        error!("available ports: {}", ports.join(", "));
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_leave_config_untouched() {
        // Arrange
        let cli = Cli::parse_from(["hid-bridge"]);
        let mut config = AppConfig::default();

        // Act
        cli.apply_overrides(&mut config);

        // Assert
        assert_eq!(config, AppConfig::default());
        assert!(!cli.dry_run);
        assert!(!cli.list_ports);
    }

    #[test]
    fn test_cli_positional_port_and_baud() {
        let cli = Cli::parse_from(["hid-bridge", "COM3", "9600"]);
        assert_eq!(cli.port.as_deref(), Some("COM3"));
        assert_eq!(cli.baud, Some(9600));
    }

    #[test]
    fn test_cli_overrides_file_values() {
        // Arrange
        let cli = Cli::parse_from(["hid-bridge", "/dev/ttyACM1", "57600", "--sensitivity", "0.5"]);
        let mut config = AppConfig::default();
        config.serial.port = "/dev/ttyUSB3".to_string();

        // Act
        cli.apply_overrides(&mut config);

        // Assert
        assert_eq!(config.serial.port, "/dev/ttyACM1");
        assert_eq!(config.serial.baud_rate, 57600);
        assert_eq!(config.input.mouse_sensitivity, 0.5);
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from([
            "hid-bridge",
            "--dry-run",
            "--list-ports",
            "--config",
            "bridge.toml",
        ]);
        assert!(cli.dry_run);
        assert!(cli.list_ports);
        assert_eq!(cli.config, Some(PathBuf::from("bridge.toml")));
    }

    #[test]
    fn test_cli_rejects_non_numeric_baud() {
        assert!(Cli::try_parse_from(["hid-bridge", "COM8", "fast"]).is_err());
    }
}
