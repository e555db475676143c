//! hid-bridge library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does hid-bridge do? (for beginners)
//!
//! A microcontroller (typically an ESP32 acting as a USB HID sniffer or
//! remote) prints keyboard and mouse activity over a serial port as plain
//! text.  The bridge:
//!
//! 1. Opens the serial port and clears whatever the device printed while
//!    booting.
//! 2. Reads the byte stream as it arrives and decodes it with
//!    `hid_bridge_core::Tokenizer`, which separates device log lines from
//!    keyboard payload and mouse samples.
//! 3. Converts mouse samples into relative motion and button presses.
//! 4. Calls the platform input emulation API (`SendInput` on Windows,
//!    XTest on Linux, CoreGraphics on macOS) to inject the events as if the
//!    user were physically typing on this machine.

/// Application layer: event translation and the session read loop.
pub mod application;

/// Infrastructure layer: OS input emulators, serial port, and configuration.
pub mod infrastructure;
