//! Rolling window used to spot mode markers inside the byte stream.
//!
//! The device prints `Keyboard` or `Mouse` anywhere on a line, with no framing
//! around it.  Rather than buffering whole lines, the tokenizer keeps only the
//! last few bytes and checks whether they end with a marker.

use crate::domain::mode::StreamMode;

/// Number of trailing bytes kept; must be at least the longest marker.
pub const MARKER_WINDOW_CAPACITY: usize = 9;

/// Fixed-capacity window over the most recent non-terminator bytes.
#[derive(Debug, Clone)]
pub struct MarkerWindow {
    buf: [u8; MARKER_WINDOW_CAPACITY],
    len: usize,
}

impl MarkerWindow {
    pub fn new() -> Self {
        Self {
            buf: [0; MARKER_WINDOW_CAPACITY],
            len: 0,
        }
    }

    /// Appends `byte`, dropping the oldest byte when full, and reports the
    /// mode whose marker the window now ends with.
    ///
    /// A marker is reported once, on the byte that completes it.
    pub fn push(&mut self, byte: u8) -> Option<StreamMode> {
        if self.len == MARKER_WINDOW_CAPACITY {
            self.buf.copy_within(1.., 0);
            self.buf[MARKER_WINDOW_CAPACITY - 1] = byte;
        } else {
            self.buf[self.len] = byte;
            self.len += 1;
        }
        self.completed_marker()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn completed_marker(&self) -> Option<StreamMode> {
        let window = self.as_bytes();
        [StreamMode::Keyboard, StreamMode::Mouse]
            .into_iter()
            .find(|mode| mode.marker().is_some_and(|m| window.ends_with(m)))
    }
}

impl Default for MarkerWindow {
    fn default() -> Self {
        Self::new()
    }
}
