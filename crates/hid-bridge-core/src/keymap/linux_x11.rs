//! Control key and character to X11 KeySym translation for Linux hosts.
//!
//! X11 KeySym values are defined in X11/keysymdef.h.
//! Reference: https://gitlab.freedesktop.org/xorg/proto/xorgproto/-/blob/master/include/X11/keysymdef.h
//!
//! # What is an X11 KeySym? (for beginners)
//!
//! X11 uses a system called **KeySym** (Key Symbol) to identify keys.  Unlike
//! Windows VK codes, KeySyms can represent *characters* as well as keys:
//!
//! | KeySym name    | Value  | Meaning        |
//! |----------------|--------|----------------|
//! | `XK_a`         | 0x0061 | lowercase 'a'  |
//! | `XK_A`         | 0x0041 | uppercase 'A'  |
//! | `XK_Return`    | 0xFF0D | Enter key      |
//! | `XK_BackSpace` | 0xFF08 | Backspace key  |
//!
//! Latin-1 characters (U+0020..U+00FF) use their code point as KeySym.  Every
//! other Unicode character uses `0x0100_0000 | code_point`.

use super::ControlKey;

pub const XK_BACKSPACE: u32 = 0xFF08;
pub const XK_TAB: u32 = 0xFF09;
pub const XK_RETURN: u32 = 0xFF0D;
pub const XK_SHIFT_L: u32 = 0xFFE1;

/// Offset added to a code point outside Latin-1 to form its KeySym.
const UNICODE_KEYSYM_OFFSET: u32 = 0x0100_0000;

/// Translates a [`ControlKey`] to its X11 KeySym.
pub fn control_to_keysym(key: ControlKey) -> u32 {
    match key {
        ControlKey::Enter => XK_RETURN,
        ControlKey::Backspace => XK_BACKSPACE,
        ControlKey::Tab => XK_TAB,
    }
}

/// Translates a character to the KeySym that types it.
pub fn char_to_keysym(ch: char) -> u32 {
    let code = u32::from(ch);
    if (0x20..=0x7E).contains(&code) || (0xA0..=0xFF).contains(&code) {
        code
    } else {
        UNICODE_KEYSYM_OFFSET | code
    }
}
