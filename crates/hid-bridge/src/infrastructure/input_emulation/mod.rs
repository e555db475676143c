//! Platform-specific input emulation implementations.
//!
//! The correct implementation is selected at compile time via `#[cfg(target_os = ...)]`.
//! [`platform_emulator`] builds it, or the dry-run logger when requested.

use std::sync::Arc;

use crate::application::translate_events::{EmulationError, PlatformInputEmulator};

pub mod logging;
pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(target_os = "linux")]
pub mod linux;

#[cfg(target_os = "macos")]
pub mod macos;

/// Creates the emulator for this OS, or a [`logging::LoggingInputEmulator`]
/// when `dry_run` is set.
///
/// # Errors
///
/// Returns [`EmulationError`] if the OS input facility cannot be opened, or
/// [`EmulationError::NotInitialized`] on an OS without an implementation.
pub fn platform_emulator(dry_run: bool) -> Result<Arc<dyn PlatformInputEmulator>, EmulationError> {
    if dry_run {
        return Ok(Arc::new(logging::LoggingInputEmulator::new()));
    }
    native_emulator()
}

#[cfg(target_os = "windows")]
fn native_emulator() -> Result<Arc<dyn PlatformInputEmulator>, EmulationError> {
    Ok(Arc::new(windows::WindowsInputEmulator::new()))
}

#[cfg(target_os = "linux")]
fn native_emulator() -> Result<Arc<dyn PlatformInputEmulator>, EmulationError> {
    Ok(Arc::new(linux::LinuxXTestEmulator::new()?))
}

#[cfg(target_os = "macos")]
fn native_emulator() -> Result<Arc<dyn PlatformInputEmulator>, EmulationError> {
    Ok(Arc::new(macos::MacosInputEmulator::new()?))
}

#[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
fn native_emulator() -> Result<Arc<dyn PlatformInputEmulator>, EmulationError> {
    Err(EmulationError::NotInitialized)
}
