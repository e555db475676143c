//! Bounded accumulator for mouse-mode lines.

use std::collections::VecDeque;

/// Maximum bytes kept for one line; older bytes are evicted first.
pub const LINE_CAPACITY: usize = 200;

/// Collects the bytes of the current mouse-mode line.
///
/// An unterminated line from a misbehaving device cannot grow without bound:
/// once full, each new byte evicts the oldest one.
#[derive(Debug, Clone, Default)]
pub struct LineBuffer {
    bytes: VecDeque<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self {
            bytes: VecDeque::with_capacity(LINE_CAPACITY),
        }
    }

    pub fn push(&mut self, byte: u8) {
        if self.bytes.len() == LINE_CAPACITY {
            self.bytes.pop_front();
        }
        self.bytes.push_back(byte);
    }

    /// Returns the accumulated line and clears the buffer, or `None` if empty.
    ///
    /// Each byte becomes the character with the same code point, so arbitrary
    /// bytes never fail to decode.
    pub fn take(&mut self) -> Option<String> {
        if self.bytes.is_empty() {
            return None;
        }
        let line = self.bytes.drain(..).map(char::from).collect();
        Some(line)
    }

    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
