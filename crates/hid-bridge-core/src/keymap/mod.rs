//! Key code translation tables for the platform input emulators.
//!
//! The device only ever sends three non-printable keys (Enter, Backspace and
//! Tab); everything else is typed as a literal character.  These tables map
//! the control keys to each platform's native code, and map characters to X11
//! KeySyms for the XTest emulator.

pub mod linux_x11;
pub mod macos_cg;
pub mod windows_vk;

/// The dedicated (non-character) keys the bridge can press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKey {
    Enter,
    Backspace,
    Tab,
}

impl ControlKey {
    /// Every control key, in a stable order.
    pub const ALL: [ControlKey; 3] = [ControlKey::Enter, ControlKey::Backspace, ControlKey::Tab];
}

/// Unified key mapper providing all translation directions.
pub struct KeyMapper;

impl KeyMapper {
    /// Translates a [`ControlKey`] to a Windows Virtual Key code.
    pub fn control_to_windows_vk(key: ControlKey) -> u8 {
        windows_vk::control_to_vk(key)
    }

    /// Translates a [`ControlKey`] to an X11 KeySym value for Linux hosts.
    pub fn control_to_x11_keysym(key: ControlKey) -> u32 {
        linux_x11::control_to_keysym(key)
    }

    /// Translates a character to the X11 KeySym that produces it.
    pub fn char_to_x11_keysym(ch: char) -> u32 {
        linux_x11::char_to_keysym(ch)
    }

    /// Translates a [`ControlKey`] to a macOS `CGKeyCode` value.
    pub fn control_to_macos_cgkeycode(key: ControlKey) -> u16 {
        macos_cg::control_to_cgkeycode(key)
    }
}
