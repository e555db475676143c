//! Mock platform input emulator for unit testing.
//!
//! # Why a mock emulator?
//!
//! The real input emulators (`WindowsInputEmulator`, `LinuxXTestEmulator`,
//! `MacosInputEmulator`) make OS API calls that:
//!
//! - Require a physical desktop environment to run.
//! - Actually move the cursor or press keys on the test machine.
//! - Cannot be observed directly from Rust test code.
//!
//! The `MockInputEmulator` replaces all OS calls with simple in-memory
//! recording.  Every emitted event is appended to one ordered log so that
//! assertions can check exactly what was emitted and in what order, across
//! keyboard and mouse events.
//!
//! # Usage in tests
//!
//! ```ignore
//! let emulator = Arc::new(MockInputEmulator::new());
//! let translator = EventTranslator::new(emulator.clone(), MotionScale::default());
//!
//! translator.handle_keystroke(Keystroke::Char('a')).unwrap();
//!
//! assert_eq!(emulator.key_events().len(), 2); // down + up
//! ```
//!
//! # Failure injection
//!
//! Call `set_failing(true)` to make every method return
//! `EmulationError::Platform` without recording anything.  The flag is atomic
//! so it can be flipped while the emulator is shared behind an `Arc`.
//! `set_failing_moves(true)` fails only relative motion, so button events
//! around a failed move can still be observed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use hid_bridge_core::{KeyEvent, MouseEvent};

use crate::application::translate_events::{EmulationError, PlatformInputEmulator};

/// One recorded call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmittedEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
}

/// A mock emulator that records all calls without performing OS API calls.
#[derive(Debug, Default)]
pub struct MockInputEmulator {
    events: Mutex<Vec<EmittedEvent>>,
    failing: AtomicBool,
    failing_moves: AtomicBool,
}

impl MockInputEmulator {
    /// Creates a new `MockInputEmulator` with an empty log that never fails.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }

    /// Fails `MouseEvent::Move` only; keys and buttons are still recorded.
    pub fn set_failing_moves(&self, failing: bool) {
        self.failing_moves.store(failing, Ordering::Relaxed);
    }

    /// Snapshot of every recorded event, oldest first.
    pub fn events(&self) -> Vec<EmittedEvent> {
        self.log().clone()
    }

    pub fn key_events(&self) -> Vec<KeyEvent> {
        self.log()
            .iter()
            .filter_map(|e| match e {
                EmittedEvent::Key(k) => Some(*k),
                EmittedEvent::Mouse(_) => None,
            })
            .collect()
    }

    pub fn mouse_events(&self) -> Vec<MouseEvent> {
        self.log()
            .iter()
            .filter_map(|e| match e {
                EmittedEvent::Mouse(m) => Some(*m),
                EmittedEvent::Key(_) => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.log().clear();
    }

    fn log(&self) -> MutexGuard<'_, Vec<EmittedEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, event: EmittedEvent) -> Result<(), EmulationError> {
        if self.failing.load(Ordering::Relaxed) {
            return Err(EmulationError::Platform("mock failure".into()));
        }
        self.log().push(event);
        Ok(())
    }
}

impl PlatformInputEmulator for MockInputEmulator {
    fn emit_key(&self, event: KeyEvent) -> Result<(), EmulationError> {
        self.record(EmittedEvent::Key(event))
    }

    fn emit_mouse(&self, event: MouseEvent) -> Result<(), EmulationError> {
        if self.failing_moves.load(Ordering::Relaxed) && matches!(event, MouseEvent::Move { .. }) {
            return Err(EmulationError::Platform("mock move failure".into()));
        }
        self.record(EmittedEvent::Mouse(event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hid_bridge_core::{KeyTarget, MouseButton};

    #[test]
    fn test_records_in_call_order_across_kinds() {
        // Arrange
        let em = MockInputEmulator::new();
        let key = KeyEvent::down(KeyTarget::Character('a'));
        let click = MouseEvent::Button { button: MouseButton::Left, pressed: true };

        // Act
        em.emit_mouse(click).unwrap();
        em.emit_key(key).unwrap();

        // Assert
        assert_eq!(em.events(), vec![EmittedEvent::Mouse(click), EmittedEvent::Key(key)]);
        assert_eq!(em.key_events(), vec![key]);
        assert_eq!(em.mouse_events(), vec![click]);
    }

    #[test]
    fn test_failing_mode_records_nothing() {
        // Arrange
        let em = MockInputEmulator::new();
        em.set_failing(true);

        // Act
        let result = em.emit_mouse(MouseEvent::Move { dx: 1, dy: 1 });

        // Assert
        assert!(matches!(result, Err(EmulationError::Platform(_))));
        assert!(em.events().is_empty());
    }

    #[test]
    fn test_failing_moves_only_rejects_motion() {
        // Arrange
        let em = MockInputEmulator::new();
        em.set_failing_moves(true);
        let click = MouseEvent::Button { button: MouseButton::Right, pressed: true };

        // Act
        let moved = em.emit_mouse(MouseEvent::Move { dx: 2, dy: 0 });
        let clicked = em.emit_mouse(click);

        // Assert
        assert!(matches!(moved, Err(EmulationError::Platform(_))));
        assert!(clicked.is_ok());
        assert_eq!(em.mouse_events(), vec![click]);
    }

    #[test]
    fn test_clear_empties_log() {
        let em = MockInputEmulator::new();
        em.emit_mouse(MouseEvent::Move { dx: 1, dy: 0 }).unwrap();
        em.clear();
        assert!(em.events().is_empty());
    }
}
