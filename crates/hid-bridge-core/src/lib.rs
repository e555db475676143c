//! # hid-bridge-core
//!
//! Shared library for the serial HID bridge containing the telemetry stream
//! tokenizer, the mouse sample parser, pointer state tracking, and the key
//! code tables used by the platform input emulators.
//!
//! It has zero dependencies on OS APIs or serial ports, so every piece of the
//! decoding pipeline can be tested with plain byte slices.
//!
//! # Architecture overview (for beginners)
//!
//! A microcontroller prints a human-readable text stream over a serial link.
//! Mixed into its ordinary log output are two kinds of payload:
//!
//! - **Keyboard mode** – after the device prints the word `Keyboard`, every
//!   printable byte it sends is a character that should be typed on the host.
//! - **Mouse mode** – after the device prints the word `Mouse`, each line is a
//!   cursor sample such as `X: 10 Y: 20 |o| |`.
//!
//! This crate turns that stream into typed events:
//!
//! - **`protocol`** – The byte-level state machine ([`Tokenizer`]) that splits
//!   the stream into keystrokes and complete mouse lines, plus the
//!   [`parse_mouse_sample`] scanner.
//!
//! - **`domain`** – Plain data types handed to the OS emitters
//!   ([`KeyEvent`], [`MouseEvent`]) and the [`PointerTracker`] that converts
//!   absolute cursor samples into relative motion and button transitions.
//!
//! - **`keymap`** – Translation tables from the few control keys the device
//!   can send (Enter, Backspace, Tab) to Windows VK codes, X11 KeySyms and
//!   macOS `CGKeyCode`s.

pub mod domain;
pub mod keymap;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `hid_bridge_core::Tokenizer` instead of `hid_bridge_core::protocol::tokenizer::Tokenizer`.
pub use domain::input::{KeyEvent, KeyPhase, KeyTarget, Keystroke, MouseButton, MouseEvent};
pub use domain::mode::StreamMode;
pub use domain::pointer::{ButtonTransition, MotionScale, PointerTracker, PointerUpdate, ScaleError};
pub use keymap::ControlKey;
pub use protocol::mouse_sample::{parse_mouse_sample, MouseSample};
pub use protocol::tokenizer::{StreamEvent, Tokenizer};
