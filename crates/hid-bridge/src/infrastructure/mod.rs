//! Infrastructure layer for the bridge.
//!
//! Contains OS-facing adapters: input emulation APIs, the serial port, and
//! configuration storage.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `hid_bridge_core`, but MUST NOT be imported by the `application` layer
//! outside of tests.
//!
//! # Sub-modules
//!
//! - **`input_emulation`** – OS-specific implementations of `PlatformInputEmulator`.
//!   The correct implementation is selected at compile time using `#[cfg(target_os)]`.
//!   A dry-run `LoggingInputEmulator` and a recording `MockInputEmulator` are
//!   also provided.
//!
//! - **`serial`** – Opens the serial port with the device's line settings and
//!   implements `ByteSource` on top of it.
//!
//! - **`storage`** – TOML configuration file loading.

pub mod input_emulation;
pub mod serial;
pub mod storage;
