//! Control key to macOS CGKeyCode translation.
//!
//! CGKeyCode values are defined in Carbon Events.h (HIToolbox framework).
//! Characters are not translated: the CoreGraphics emulator attaches the
//! character itself to the keyboard event as a Unicode string.

use super::ControlKey;

pub const KVK_RETURN: u16 = 0x24;
pub const KVK_TAB: u16 = 0x30;
/// macOS calls the Backspace key "Delete".
pub const KVK_DELETE: u16 = 0x33;

/// Translates a [`ControlKey`] to its macOS `CGKeyCode`.
pub fn control_to_cgkeycode(key: ControlKey) -> u16 {
    match key {
        ControlKey::Enter => KVK_RETURN,
        ControlKey::Backspace => KVK_DELETE,
        ControlKey::Tab => KVK_TAB,
    }
}
