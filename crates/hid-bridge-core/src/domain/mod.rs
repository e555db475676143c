//! Domain entities for the serial HID bridge.
//!
//! This module contains pure logic with no infrastructure dependencies.
//!
//! # What is "domain" in Clean Architecture? (for beginners)
//!
//! Clean Architecture organises code into concentric layers.  The innermost
//! layer is called the **domain**.  Domain code:
//!
//! - Contains the core rules of the application.
//! - Has **no** imports from OS APIs, serial libraries, or UI frameworks.
//! - Can be compiled and tested on any platform without any external setup.
//!
//! Here the domain is small: the event descriptors that the emitters consume,
//! the stream mode, and the pointer state that turns absolute cursor samples
//! into relative motion.

/// Keyboard and mouse event descriptors.
pub mod input;

/// The interpretation mode of the telemetry stream.
pub mod mode;

/// Cursor and button state tracking.
///
/// See [`pointer::PointerTracker`] for the main type.
pub mod pointer;
