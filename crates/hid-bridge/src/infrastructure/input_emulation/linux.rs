//! Linux X11 input emulation via the XTest extension.
//!
//! Uses `XTestFakeKeyEvent`, `XTestFakeRelativeMotionEvent`, and
//! `XTestFakeButtonEvent` to inject input events into the X11 session.
//!
//! # What is XTest? (for beginners)
//!
//! XTest is an X11 protocol extension that lets a process synthesize keyboard
//! and mouse events as if the user had physically interacted with the hardware.
//! These events are delivered to the currently focused window exactly like real
//! input; the receiving application cannot distinguish them from physical input.
//!
//! # Character injection
//!
//! `XTestFakeKeyEvent` takes an X11 *keycode*, not a character.  The
//! conversion is:
//!
//! ```text
//! char → KeySym → XKeysymToKeycode(display, keysym) → keycode
//! ```
//!
//! A KeySym can live on the unshifted or the shifted level of its keycode
//! (`a` vs `A` share one key).  When it is on the shifted level, Shift_L is
//! held around the key press.  Characters the current keymap cannot produce
//! are reported as [`EmulationError::UnmappedCharacter`].
//!
//! # Permissions
//!
//! XTest requires access to the X display named by `DISPLAY`.  If it is not
//! set or the server is unreachable, the constructor fails with a `Platform`
//! error.

use std::ptr;
use std::sync::{Mutex, MutexGuard, PoisonError};

use hid_bridge_core::{
    keymap::{linux_x11::XK_SHIFT_L, KeyMapper},
    KeyEvent, KeyPhase, KeyTarget, MouseButton, MouseEvent,
};
use tracing::debug;
use x11::{xlib, xtest};

use crate::application::translate_events::{EmulationError, PlatformInputEmulator};

// ── X11 constants ─────────────────────────────────────────────────────────────

/// `CurrentTime`: deliver the event immediately with the server's timestamp.
const CURRENT_TIME: u64 = 0;

const BUTTON_LEFT: u32 = 1;
const BUTTON_RIGHT: u32 = 3;

/// Owned connection to the X server.
struct DisplayHandle(*mut xlib::Display);

// SAFETY: the pointer is only dereferenced by Xlib while the surrounding Mutex
// is held, so no two threads use the connection at once.
unsafe impl Send for DisplayHandle {}

impl Drop for DisplayHandle {
    fn drop(&mut self) {
        // SAFETY: the pointer came from XOpenDisplay and is closed exactly once.
        unsafe {
            xlib::XCloseDisplay(self.0);
        }
    }
}

/// Linux X11/XTest input emulator.
pub struct LinuxXTestEmulator {
    display: Mutex<DisplayHandle>,
}

impl LinuxXTestEmulator {
    /// Connects to the X display named by `DISPLAY`.
    ///
    /// # Errors
    ///
    /// Returns `EmulationError::Platform` if the X display cannot be opened.
    pub fn new() -> Result<Self, EmulationError> {
        // SAFETY: a null name selects the DISPLAY environment variable.
        let display = unsafe { xlib::XOpenDisplay(ptr::null()) };
        if display.is_null() {
            return Err(EmulationError::Platform(
                "cannot open X display (is DISPLAY set?)".to_string(),
            ));
        }
        debug!("connected to X display");
        Ok(Self {
            display: Mutex::new(DisplayHandle(display)),
        })
    }

    fn lock(&self) -> MutexGuard<'_, DisplayHandle> {
        self.display.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PlatformInputEmulator for LinuxXTestEmulator {
    fn emit_key(&self, event: KeyEvent) -> Result<(), EmulationError> {
        let display = self.lock();
        let keysym = keysym_for(event.target);
        let (keycode, shifted) = resolve_keycode(display.0, keysym).ok_or(match event.target {
            KeyTarget::Character(ch) => EmulationError::UnmappedCharacter(ch),
            KeyTarget::Control(key) => {
                EmulationError::Platform(format!("no keycode for {key:?}"))
            }
        })?;
        let shift = if shifted {
            resolve_keycode(display.0, XK_SHIFT_L).map(|(code, _)| code)
        } else {
            None
        };

        let pressed = event.phase == KeyPhase::Down;
        if pressed {
            if let Some(shift) = shift {
                fake_key(display.0, shift, true)?;
            }
            fake_key(display.0, keycode, true)?;
        } else {
            fake_key(display.0, keycode, false)?;
            if let Some(shift) = shift {
                fake_key(display.0, shift, false)?;
            }
        }
        flush(display.0);
        Ok(())
    }

    fn emit_mouse(&self, event: MouseEvent) -> Result<(), EmulationError> {
        let display = self.lock();
        // SAFETY: the display pointer is valid for the lifetime of `self`.
        let status = unsafe {
            match event {
                MouseEvent::Move { dx, dy } => {
                    xtest::XTestFakeRelativeMotionEvent(display.0, -1, dx, dy, CURRENT_TIME as _)
                }
                MouseEvent::Button { button, pressed } => xtest::XTestFakeButtonEvent(
                    display.0,
                    button_number(button),
                    i32::from(pressed),
                    CURRENT_TIME as _,
                ),
            }
        };
        if status == 0 {
            return Err(EmulationError::Platform(format!("XTest rejected {event:?}")));
        }
        flush(display.0);
        Ok(())
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn keysym_for(target: KeyTarget) -> u32 {
    match target {
        KeyTarget::Control(key) => KeyMapper::control_to_x11_keysym(key),
        KeyTarget::Character(ch) => KeyMapper::char_to_x11_keysym(ch),
    }
}

fn button_number(button: MouseButton) -> u32 {
    match button {
        MouseButton::Left => BUTTON_LEFT,
        MouseButton::Right => BUTTON_RIGHT,
    }
}

/// Finds the keycode producing `keysym` and whether Shift is needed.
fn resolve_keycode(display: *mut xlib::Display, keysym: u32) -> Option<(u8, bool)> {
    // SAFETY: `display` is a live connection held under the emulator's lock.
    let keycode = unsafe { xlib::XKeysymToKeycode(display, keysym as xlib::KeySym) };
    if keycode == 0 {
        return None;
    }
    // SAFETY: as above; index 0 is the unshifted level.
    let unshifted = unsafe { xlib::XKeycodeToKeysym(display, keycode, 0) };
    Some((keycode, unshifted != keysym as xlib::KeySym))
}

fn fake_key(display: *mut xlib::Display, keycode: u8, pressed: bool) -> Result<(), EmulationError> {
    // SAFETY: `display` is a live connection held under the emulator's lock.
    let status = unsafe {
        xtest::XTestFakeKeyEvent(
            display,
            u32::from(keycode),
            i32::from(pressed),
            CURRENT_TIME as _,
        )
    };
    if status == 0 {
        return Err(EmulationError::Platform(format!(
            "XTestFakeKeyEvent failed for keycode {keycode}"
        )));
    }
    Ok(())
}

fn flush(display: *mut xlib::Display) {
    // SAFETY: `display` is a live connection held under the emulator's lock.
    unsafe {
        xlib::XFlush(display);
    }
}
