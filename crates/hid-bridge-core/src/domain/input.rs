//! Keyboard and mouse event descriptors.
//!
//! These are the fully-formed events handed to a platform input emulator.
//! Each one maps to exactly one OS injection call.

use crate::keymap::ControlKey;

/// What a keyboard event presses: a dedicated control key, or a literal
/// character injected by code point.
///
/// Characters are sent by value rather than through a keyboard layout so the
/// host types exactly what the device sent, whatever layout is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTarget {
    Control(ControlKey),
    Character(char),
}

/// Key-down or key-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPhase {
    Down,
    Up,
}

/// A single key press or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub target: KeyTarget,
    pub phase: KeyPhase,
}

impl KeyEvent {
    pub fn down(target: KeyTarget) -> Self {
        Self { target, phase: KeyPhase::Down }
    }

    pub fn up(target: KeyTarget) -> Self {
        Self { target, phase: KeyPhase::Up }
    }
}

/// Mouse buttons reported by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
}

/// A single mouse injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseEvent {
    /// Relative cursor motion in host pixels.
    Move { dx: i32, dy: i32 },
    /// A button press (`pressed == true`) or release.
    Button { button: MouseButton, pressed: bool },
}

/// One logical key action decoded from the keyboard-mode stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keystroke {
    Enter,
    Backspace,
    Tab,
    /// A printable ASCII character (0x20..=0x7E).
    Char(char),
}

impl Keystroke {
    /// The key the emulator should press for this stroke.
    pub fn target(self) -> KeyTarget {
        match self {
            Keystroke::Enter => KeyTarget::Control(ControlKey::Enter),
            Keystroke::Backspace => KeyTarget::Control(ControlKey::Backspace),
            Keystroke::Tab => KeyTarget::Control(ControlKey::Tab),
            Keystroke::Char(ch) => KeyTarget::Character(ch),
        }
    }

    /// The press-then-release pair that types this stroke.
    pub fn key_events(self) -> [KeyEvent; 2] {
        let target = self.target();
        [KeyEvent::down(target), KeyEvent::up(target)]
    }
}
