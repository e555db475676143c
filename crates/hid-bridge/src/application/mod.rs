//! Application layer use cases for the bridge.
//!
//! - **`translate_events`** – Turns tokenizer events (keystrokes, mouse lines,
//!   mode markers) into OS-native input calls.  The actual OS call is made by
//!   a `PlatformInputEmulator` implementation that is injected at
//!   construction time.
//!
//! - **`session`** – The per-connection `BridgeSession` state and the
//!   `SessionDriver` read loop that pulls bytes from a `ByteSource` until the
//!   user cancels.

pub mod session;
pub mod translate_events;
