//! Windows input emulation via the SendInput API.
//!
//! Characters are injected with `KEYEVENTF_UNICODE`, so the active keyboard
//! layout never changes what gets typed.  Enter, Backspace and Tab go through
//! their virtual-key codes.  Mouse motion is relative (`MOUSEEVENTF_MOVE`
//! without `MOUSEEVENTF_ABSOLUTE`), so pointer acceleration settings apply.

#![cfg(target_os = "windows")]

use hid_bridge_core::{keymap::KeyMapper, KeyEvent, KeyPhase, KeyTarget, MouseButton, MouseEvent};
use windows::Win32::UI::Input::KeyboardAndMouse::{
    SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, INPUT_MOUSE, KEYBDINPUT, KEYBD_EVENT_FLAGS,
    KEYEVENTF_KEYUP, KEYEVENTF_UNICODE, MOUSEEVENTF_LEFTDOWN, MOUSEEVENTF_LEFTUP,
    MOUSEEVENTF_MOVE, MOUSEEVENTF_RIGHTDOWN, MOUSEEVENTF_RIGHTUP, MOUSEINPUT, MOUSE_EVENT_FLAGS,
    VIRTUAL_KEY,
};

use crate::application::translate_events::{EmulationError, PlatformInputEmulator};

/// Windows implementation of [`PlatformInputEmulator`] using SendInput.
pub struct WindowsInputEmulator;

impl WindowsInputEmulator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WindowsInputEmulator {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformInputEmulator for WindowsInputEmulator {
    fn emit_key(&self, event: KeyEvent) -> Result<(), EmulationError> {
        send(&key_inputs(event))
    }

    fn emit_mouse(&self, event: MouseEvent) -> Result<(), EmulationError> {
        send(&[mouse_input(event)])
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Builds the INPUT records for one key event.
///
/// Characters outside the BMP need two UTF-16 code units, each sent as its
/// own unicode keystroke within the same `SendInput` call.
fn key_inputs(event: KeyEvent) -> Vec<INPUT> {
    let phase_flags = match event.phase {
        KeyPhase::Down => KEYBD_EVENT_FLAGS(0),
        KeyPhase::Up => KEYEVENTF_KEYUP,
    };
    match event.target {
        KeyTarget::Control(key) => {
            let vk = KeyMapper::control_to_windows_vk(key);
            vec![keyboard_input(VIRTUAL_KEY(u16::from(vk)), 0, phase_flags)]
        }
        KeyTarget::Character(ch) => {
            let mut units = [0u16; 2];
            ch.encode_utf16(&mut units)
                .iter()
                .map(|&unit| keyboard_input(VIRTUAL_KEY(0), unit, KEYEVENTF_UNICODE | phase_flags))
                .collect()
        }
    }
}

fn keyboard_input(vk: VIRTUAL_KEY, scan: u16, flags: KEYBD_EVENT_FLAGS) -> INPUT {
    INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: vk,
                wScan: scan,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    }
}

fn mouse_input(event: MouseEvent) -> INPUT {
    let (dx, dy, flags): (i32, i32, MOUSE_EVENT_FLAGS) = match event {
        MouseEvent::Move { dx, dy } => (dx, dy, MOUSEEVENTF_MOVE),
        MouseEvent::Button { button, pressed } => {
            let flags = match (button, pressed) {
                (MouseButton::Left, true) => MOUSEEVENTF_LEFTDOWN,
                (MouseButton::Left, false) => MOUSEEVENTF_LEFTUP,
                (MouseButton::Right, true) => MOUSEEVENTF_RIGHTDOWN,
                (MouseButton::Right, false) => MOUSEEVENTF_RIGHTUP,
            };
            (0, 0, flags)
        }
    };
    INPUT {
        r#type: INPUT_MOUSE,
        Anonymous: INPUT_0 {
            mi: MOUSEINPUT {
                dx,
                dy,
                mouseData: 0,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    }
}

fn send(inputs: &[INPUT]) -> Result<(), EmulationError> {
    // SAFETY: every element is a fully initialised INPUT and cbsize matches.
    let sent = unsafe { SendInput(inputs, std::mem::size_of::<INPUT>() as i32) };
    if sent as usize != inputs.len() {
        return Err(EmulationError::Platform(format!(
            "SendInput injected {sent} of {} events: {}",
            inputs.len(),
            std::io::Error::last_os_error()
        )));
    }
    Ok(())
}
