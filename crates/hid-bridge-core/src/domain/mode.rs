//! Stream interpretation mode.

use std::fmt;

/// How the tokenizer interprets the bytes that follow the last mode marker.
///
/// The device never announces the end of a mode; a mode lasts until the next
/// marker is seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamMode {
    /// No marker seen yet. Every byte is ignored.
    #[default]
    Unset,
    /// Printable bytes are typed on the host.
    Keyboard,
    /// Lines are cursor samples.
    Mouse,
}

impl StreamMode {
    /// The marker text that switches the stream into this mode, if any.
    pub fn marker(self) -> Option<&'static [u8]> {
        match self {
            StreamMode::Unset => None,
            StreamMode::Keyboard => Some(b"Keyboard"),
            StreamMode::Mouse => Some(b"Mouse"),
        }
    }
}

impl fmt::Display for StreamMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StreamMode::Unset => "unset",
            StreamMode::Keyboard => "keyboard",
            StreamMode::Mouse => "mouse",
        };
        f.write_str(name)
    }
}
