//! Event translation: turns tokenizer output into OS input calls.
//!
//! This use case sits at the application layer and delegates to a
//! [`PlatformInputEmulator`] trait object for OS-level event injection.
//! The platform-specific implementations are in the infrastructure layer.
//!
//! The translator owns the pointer state of the session: the last absolute
//! cursor sample and the two button states.  Keyboard events carry no state
//! and are forwarded as press/release pairs.

use std::sync::Arc;

use hid_bridge_core::{
    parse_mouse_sample, KeyEvent, Keystroke, MotionScale, MouseEvent, PointerTracker,
    StreamEvent, StreamMode,
};
use thiserror::Error;
use tracing::{debug, trace};

/// Error type for input emulation operations.
#[derive(Debug, Error)]
pub enum EmulationError {
    #[error("platform error: {0}")]
    Platform(String),
    #[error("no key mapping for character {0:?}")]
    UnmappedCharacter(char),
    #[error("emulator not initialized")]
    NotInitialized,
}

/// Platform-agnostic input emulation trait.
///
/// Each supported OS provides an implementation in the infrastructure layer.
/// Every call injects exactly one primitive event, synchronously.
pub trait PlatformInputEmulator: Send + Sync {
    /// Injects one key press or release.
    fn emit_key(&self, event: KeyEvent) -> Result<(), EmulationError>;

    /// Injects one relative motion or button change.
    fn emit_mouse(&self, event: MouseEvent) -> Result<(), EmulationError>;
}

/// The Translate Events use case.
pub struct EventTranslator {
    emulator: Arc<dyn PlatformInputEmulator>,
    pointer: PointerTracker,
    scale: MotionScale,
}

impl EventTranslator {
    /// Creates a translator with fresh pointer state.
    pub fn new(emulator: Arc<dyn PlatformInputEmulator>, scale: MotionScale) -> Self {
        Self {
            emulator,
            pointer: PointerTracker::new(),
            scale,
        }
    }

    /// Dispatches one tokenizer event.
    ///
    /// # Errors
    ///
    /// Returns the first [`EmulationError`] raised while injecting the
    /// event's OS calls.
    pub fn handle(&mut self, event: StreamEvent) -> Result<(), EmulationError> {
        match event {
            StreamEvent::Keystroke(stroke) => self.handle_keystroke(stroke),
            StreamEvent::MouseLine(line) => self.handle_mouse_line(&line),
            StreamEvent::ModeMarker(mode) => {
                self.handle_mode_marker(mode);
                Ok(())
            }
        }
    }

    /// Types one keystroke as a key-down followed by a key-up.
    ///
    /// # Errors
    ///
    /// Returns [`EmulationError`] if the OS event injection fails.
    pub fn handle_keystroke(&self, stroke: Keystroke) -> Result<(), EmulationError> {
        trace!(?stroke, "keystroke");
        for event in stroke.key_events() {
            self.emulator.emit_key(event)?;
        }
        Ok(())
    }

    /// Parses a mouse line and injects the resulting motion and button
    /// transitions.  Lines that are not samples are dropped.
    ///
    /// The stored pointer state follows the device even when an injection
    /// fails: every action is attempted and the first failure is returned.
    ///
    /// # Errors
    ///
    /// Returns [`EmulationError`] if any OS event injection fails.
    pub fn handle_mouse_line(&mut self, line: &str) -> Result<(), EmulationError> {
        let Some(sample) = parse_mouse_sample(line) else {
            debug!(line, "ignoring unrecognised mouse line");
            return Ok(());
        };

        let update = self.pointer.apply(&sample);
        let motion = update
            .motion
            .and_then(|delta| self.scale.scale(delta))
            .map(|(dx, dy)| MouseEvent::Move { dx, dy });
        let buttons = update.transitions.iter().map(|t| MouseEvent::Button {
            button: t.button,
            pressed: t.pressed,
        });

        let mut first_error = None;
        for event in motion.into_iter().chain(buttons) {
            trace!(?event, "mouse");
            if let Err(e) = self.emulator.emit_mouse(event) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Entering keyboard mode forgets the cursor reference so a later mouse
    /// session starts without a stale delta.
    pub fn handle_mode_marker(&mut self, mode: StreamMode) {
        if mode == StreamMode::Keyboard {
            self.pointer.reset_cursor();
        }
    }

    pub fn pointer(&self) -> &PointerTracker {
        &self.pointer
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
