//! macOS CoreGraphics input emulation.
//!
//! Uses `CGEventCreateKeyboardEvent`, `CGEventCreateMouseEvent`, and
//! `CGEventPost` (through the `core-graphics` crate) to inject events at the
//! `kCGHIDEventTap` level.
//!
//! # What is CoreGraphics event injection? (for beginners)
//!
//! `CGEventPost` injects a synthesized event directly into the hardware input
//! stream at the HID (Human Interface Device) level, the same level as
//! physical keyboard and mouse input.
//!
//! # Relative motion
//!
//! CoreGraphics mouse events carry an absolute position, so a relative move
//! reads the current cursor location and posts an event at location + delta.
//! While a button is held the move is posted as a *drag* event, otherwise
//! applications would not see the selection or drag in progress.
//!
//! # Characters
//!
//! Literal characters are posted as a keyboard event whose Unicode string is
//! replaced with the character, so the active layout does not matter.
//!
//! # Accessibility permission
//!
//! `CGEventPost` at `kCGHIDEventTap` requires the **Accessibility** permission
//! (System Settings → Privacy & Security → Accessibility).  Without it the
//! events are silently dropped by the system.

#![cfg(target_os = "macos")]

use std::sync::{Mutex, MutexGuard, PoisonError};

use core_graphics::event::{CGEvent, CGEventTapLocation, CGEventType, CGMouseButton};
use core_graphics::event_source::{CGEventSource, CGEventSourceStateID};
use core_graphics::geometry::CGPoint;
use hid_bridge_core::{keymap::KeyMapper, KeyEvent, KeyPhase, KeyTarget, MouseButton, MouseEvent};

use crate::application::translate_events::{EmulationError, PlatformInputEmulator};

/// Key code used as a carrier for Unicode string events.
const UNICODE_CARRIER_KEYCODE: u16 = 0;

/// Buttons currently held down by this emulator.
#[derive(Debug, Clone, Copy, Default)]
struct HeldButtons {
    left: bool,
    right: bool,
}

/// macOS CoreGraphics input emulator.
pub struct MacosInputEmulator {
    held: Mutex<HeldButtons>,
}

impl MacosInputEmulator {
    /// Creates the emulator after checking that an event source is available.
    ///
    /// # Errors
    ///
    /// Returns `EmulationError::Platform` if no HID event source can be created.
    pub fn new() -> Result<Self, EmulationError> {
        event_source()?;
        Ok(Self {
            held: Mutex::new(HeldButtons::default()),
        })
    }

    fn held(&self) -> MutexGuard<'_, HeldButtons> {
        self.held.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PlatformInputEmulator for MacosInputEmulator {
    fn emit_key(&self, event: KeyEvent) -> Result<(), EmulationError> {
        let down = event.phase == KeyPhase::Down;
        let cg_event = match event.target {
            KeyTarget::Control(key) => {
                let keycode = KeyMapper::control_to_macos_cgkeycode(key);
                CGEvent::new_keyboard_event(event_source()?, keycode, down)
                    .map_err(|()| platform("CGEventCreateKeyboardEvent"))?
            }
            KeyTarget::Character(ch) => {
                let cg_event =
                    CGEvent::new_keyboard_event(event_source()?, UNICODE_CARRIER_KEYCODE, down)
                        .map_err(|()| platform("CGEventCreateKeyboardEvent"))?;
                let mut utf8 = [0u8; 4];
                cg_event.set_string(ch.encode_utf8(&mut utf8));
                cg_event
            }
        };
        cg_event.post(CGEventTapLocation::HID);
        Ok(())
    }

    fn emit_mouse(&self, event: MouseEvent) -> Result<(), EmulationError> {
        let mut held = self.held();
        let location = cursor_location()?;
        let target = match event {
            MouseEvent::Move { dx, dy } => {
                CGPoint::new(location.x + f64::from(dx), location.y + f64::from(dy))
            }
            MouseEvent::Button { .. } => location,
        };
        let (event_type, button) = mouse_event_kind(*held, event);

        let cg_event = CGEvent::new_mouse_event(event_source()?, event_type, target, button)
            .map_err(|()| platform("CGEventCreateMouseEvent"))?;
        cg_event.post(CGEventTapLocation::HID);

        if let MouseEvent::Button { button, pressed } = event {
            match button {
                MouseButton::Left => held.left = pressed,
                MouseButton::Right => held.right = pressed,
            }
        }
        Ok(())
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn platform(call: &str) -> EmulationError {
    EmulationError::Platform(format!("{call} failed"))
}

fn event_source() -> Result<CGEventSource, EmulationError> {
    CGEventSource::new(CGEventSourceStateID::HIDSystemState)
        .map_err(|()| platform("CGEventSourceCreate"))
}

/// Current cursor position in global display coordinates.
fn cursor_location() -> Result<CGPoint, EmulationError> {
    CGEvent::new(event_source()?)
        .map(|e| e.location())
        .map_err(|()| platform("CGEventCreate"))
}

/// Chooses the CoreGraphics event type for a mouse event given held buttons.
fn mouse_event_kind(held: HeldButtons, event: MouseEvent) -> (CGEventType, CGMouseButton) {
    match event {
        MouseEvent::Move { .. } if held.left => (CGEventType::LeftMouseDragged, CGMouseButton::Left),
        MouseEvent::Move { .. } if held.right => {
            (CGEventType::RightMouseDragged, CGMouseButton::Right)
        }
        MouseEvent::Move { .. } => (CGEventType::MouseMoved, CGMouseButton::Left),
        MouseEvent::Button { button: MouseButton::Left, pressed: true } => {
            (CGEventType::LeftMouseDown, CGMouseButton::Left)
        }
        MouseEvent::Button { button: MouseButton::Left, pressed: false } => {
            (CGEventType::LeftMouseUp, CGMouseButton::Left)
        }
        MouseEvent::Button { button: MouseButton::Right, pressed: true } => {
            (CGEventType::RightMouseDown, CGMouseButton::Right)
        }
        MouseEvent::Button { button: MouseButton::Right, pressed: false } => {
            (CGEventType::RightMouseUp, CGMouseButton::Right)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(held: HeldButtons, event: MouseEvent) -> u32 {
        mouse_event_kind(held, event).0 as u32
    }

    #[test]
    fn test_plain_move_is_mouse_moved() {
        assert_eq!(
            kind(HeldButtons::default(), MouseEvent::Move { dx: 1, dy: 1 }),
            CGEventType::MouseMoved as u32
        );
    }

    #[test]
    fn test_move_with_left_held_is_drag() {
        let held = HeldButtons { left: true, right: false };
        assert_eq!(
            kind(held, MouseEvent::Move { dx: 1, dy: 0 }),
            CGEventType::LeftMouseDragged as u32
        );
    }

    #[test]
    fn test_right_press_maps_to_right_mouse_down() {
        let (event_type, button) = mouse_event_kind(
            HeldButtons::default(),
            MouseEvent::Button { button: MouseButton::Right, pressed: true },
        );
        assert_eq!(event_type as u32, CGEventType::RightMouseDown as u32);
        assert_eq!(button as u32, CGMouseButton::Right as u32);
    }
}
