//! Control key to Windows Virtual Key (VK) code translation.
//!
//! # What is a Windows Virtual Key (VK) code? (for beginners)
//!
//! Windows assigns each keyboard key a number called a "Virtual Key code".
//! These are defined in `<winuser.h>` and named `VK_*` (e.g., `VK_RETURN = 0x0D`).
//! They are "virtual" because they represent *logical* keys rather than
//! physical scan codes.
//!
//! Printable characters do not go through this table: `SendInput` accepts
//! them directly as UTF-16 code units with the `KEYEVENTF_UNICODE` flag, which
//! works regardless of the active keyboard layout.
//!
//! Reference: https://learn.microsoft.com/windows/win32/inputdev/virtual-key-codes

use super::ControlKey;

pub const VK_BACK: u8 = 0x08;
pub const VK_TAB: u8 = 0x09;
pub const VK_RETURN: u8 = 0x0D;

/// Translates a [`ControlKey`] to its Windows VK code.
pub fn control_to_vk(key: ControlKey) -> u8 {
    match key {
        ControlKey::Enter => VK_RETURN,
        ControlKey::Backspace => VK_BACK,
        ControlKey::Tab => VK_TAB,
    }
}
