//! Dry-run emulator: logs every event instead of injecting it.
//!
//! Selected with `--dry-run`, useful for checking what a device sends without
//! letting it type into the desktop.

use hid_bridge_core::{KeyEvent, MouseEvent};
use tracing::info;

use crate::application::translate_events::{EmulationError, PlatformInputEmulator};

#[derive(Debug, Default)]
pub struct LoggingInputEmulator;

impl LoggingInputEmulator {
    pub fn new() -> Self {
        Self
    }
}

impl PlatformInputEmulator for LoggingInputEmulator {
    fn emit_key(&self, event: KeyEvent) -> Result<(), EmulationError> {
        info!(target: "hid_bridge::dry_run", key = ?event.target, phase = ?event.phase, "key");
        Ok(())
    }

    fn emit_mouse(&self, event: MouseEvent) -> Result<(), EmulationError> {
        info!(target: "hid_bridge::dry_run", ?event, "mouse");
        Ok(())
    }
}
