//! Mode & line tokenizer: the byte-level state machine for the telemetry stream.
//!
//! The device sends one untyped text stream that interleaves three things:
//!
//! - its own log output (lines starting with `I`, `W` or `E`),
//! - keyboard payload (printable bytes after a `Keyboard` marker),
//! - mouse payload (one sample per line after a `Mouse` marker).
//!
//! There is no framing protocol.  The tokenizer classifies every byte as it
//! arrives, using only a small window of lookback, and emits at most one
//! [`StreamEvent`] per byte.  Because all state lives in the [`Tokenizer`],
//! feeding a stream one byte at a time or in arbitrary chunks produces the
//! same events in the same order.
//!
//! # Transition table
//!
//! | Mode     | Byte class             | Effect                                   |
//! |----------|------------------------|------------------------------------------|
//! | any      | CR / LF                | end of line; see below                   |
//! | Keyboard | CR                     | emit `Keystroke(Enter)`                  |
//! | Keyboard | LF                     | nothing                                  |
//! | not Mouse| CR / LF                | discard any partial mouse line           |
//! | Mouse    | CR / LF                | emit `MouseLine` if the line is non-empty|
//! | any      | completes a marker     | switch mode, emit `ModeMarker`           |
//! | Unset    | other                  | discard                                  |
//! | Mouse    | other                  | append to the line                       |
//! | Keyboard | Backspace / Tab        | emit keystroke (unless on a log line)    |
//! | Keyboard | Printable              | emit `Char` (unless on a log line)       |
//! | Keyboard | Other                  | discard                                  |

use tracing::trace;

use super::line::LineBuffer;
use super::marker::MarkerWindow;
use crate::domain::{input::Keystroke, mode::StreamMode};

/// First-column characters that mark a device log line.
pub const LOG_SEVERITY_MARKERS: [u8; 3] = [b'I', b'W', b'E'];

/// Coarse classification of one input byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteClass {
    CarriageReturn,
    LineFeed,
    Backspace,
    Tab,
    /// Printable ASCII, 0x20..=0x7E.
    Printable,
    Other,
}

impl ByteClass {
    pub fn of(byte: u8) -> Self {
        match byte {
            b'\r' => ByteClass::CarriageReturn,
            b'\n' => ByteClass::LineFeed,
            0x08 => ByteClass::Backspace,
            b'\t' => ByteClass::Tab,
            0x20..=0x7E => ByteClass::Printable,
            _ => ByteClass::Other,
        }
    }

    pub fn is_terminator(self) -> bool {
        matches!(self, ByteClass::CarriageReturn | ByteClass::LineFeed)
    }
}

/// Output of the tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A key to type, decoded in keyboard mode.
    Keystroke(Keystroke),
    /// A complete mouse-mode line, without its terminator.
    MouseLine(String),
    /// A mode marker was read; the stream is now in this mode.
    ModeMarker(StreamMode),
}

/// Streaming tokenizer holding all cross-byte state of one session.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    mode: StreamMode,
    window: MarkerWindow,
    line: LineBuffer,
    at_line_start: bool,
    skipping_log: bool,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self {
            mode: StreamMode::Unset,
            window: MarkerWindow::new(),
            line: LineBuffer::new(),
            at_line_start: true,
            skipping_log: false,
        }
    }

    pub fn mode(&self) -> StreamMode {
        self.mode
    }

    /// Whether the current line was recognised as device log output.
    pub fn is_skipping_log(&self) -> bool {
        self.skipping_log
    }

    /// Consumes one byte and returns the event it completes, if any.
    pub fn consume(&mut self, byte: u8) -> Option<StreamEvent> {
        let class = ByteClass::of(byte);

        if self.at_line_start && LOG_SEVERITY_MARKERS.contains(&byte) {
            self.skipping_log = true;
        }

        if class.is_terminator() {
            return self.end_line(class);
        }
        self.at_line_start = false;

        if let Some(mode) = self.window.push(byte) {
            return Some(self.enter_mode(mode));
        }

        match self.mode {
            StreamMode::Unset => None,
            StreamMode::Mouse => {
                self.line.push(byte);
                None
            }
            StreamMode::Keyboard if self.skipping_log => None,
            StreamMode::Keyboard => keystroke_for(class, byte).map(StreamEvent::Keystroke),
        }
    }

    /// Consumes a batch of bytes in order, collecting every emitted event.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<StreamEvent> {
        bytes.iter().filter_map(|&b| self.consume(b)).collect()
    }

    fn end_line(&mut self, class: ByteClass) -> Option<StreamEvent> {
        self.at_line_start = true;
        self.skipping_log = false;

        if self.mode == StreamMode::Mouse {
            return self.line.take().map(StreamEvent::MouseLine);
        }
        // Bytes collected before a mid-line switch out of mouse mode belong to
        // no sample.
        self.line.clear();
        match (self.mode, class) {
            (StreamMode::Keyboard, ByteClass::CarriageReturn) => {
                Some(StreamEvent::Keystroke(Keystroke::Enter))
            }
            _ => None,
        }
    }

    fn enter_mode(&mut self, mode: StreamMode) -> StreamEvent {
        if mode != self.mode {
            trace!(from = %self.mode, to = %mode, "stream mode switch");
        }
        self.mode = mode;
        StreamEvent::ModeMarker(mode)
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

fn keystroke_for(class: ByteClass, byte: u8) -> Option<Keystroke> {
    match class {
        ByteClass::Backspace => Some(Keystroke::Backspace),
        ByteClass::Tab => Some(Keystroke::Tab),
        ByteClass::Printable => Some(Keystroke::Char(char::from(byte))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyboard_tokenizer() -> Tokenizer {
        let mut t = Tokenizer::new();
        t.feed(b"Keyboard\n");
        assert_eq!(t.mode(), StreamMode::Keyboard);
        t
    }

    fn mouse_tokenizer() -> Tokenizer {
        let mut t = Tokenizer::new();
        t.feed(b"Mouse\n");
        assert_eq!(t.mode(), StreamMode::Mouse);
        t
    }

    fn chars(events: &[StreamEvent]) -> String {
        events
            .iter()
            .filter_map(|e| match e {
                StreamEvent::Keystroke(Keystroke::Char(c)) => Some(*c),
                _ => None,
            })
            .collect()
    }

    // ── ByteClass ─────────────────────────────────────────────────────────────

    #[test]
    fn test_byte_class_boundaries() {
        assert_eq!(ByteClass::of(0x1F), ByteClass::Other);
        assert_eq!(ByteClass::of(0x20), ByteClass::Printable);
        assert_eq!(ByteClass::of(0x7E), ByteClass::Printable);
        assert_eq!(ByteClass::of(0x7F), ByteClass::Other);
        assert_eq!(ByteClass::of(0x08), ByteClass::Backspace);
        assert_eq!(ByteClass::of(b'\t'), ByteClass::Tab);
        assert!(ByteClass::of(b'\r').is_terminator());
        assert!(ByteClass::of(b'\n').is_terminator());
    }

    // ── Unset mode ────────────────────────────────────────────────────────────

    #[test]
    fn test_unset_mode_discards_everything() {
        let mut t = Tokenizer::new();
        assert!(t.feed(b"hello world\r\nX: 1 Y: 2 |o| |\r\n").is_empty());
        assert_eq!(t.mode(), StreamMode::Unset);
    }

    // ── Mode markers ──────────────────────────────────────────────────────────

    #[test]
    fn test_keyboard_marker_emits_mode_marker_and_swallows_completing_byte() {
        // Arrange
        let mut t = Tokenizer::new();

        // Act
        let events = t.feed(b"Keyboard");

        // Assert
        assert_eq!(events, vec![StreamEvent::ModeMarker(StreamMode::Keyboard)]);
    }

    #[test]
    fn test_characters_after_marker_on_same_line_are_typed() {
        let mut t = Tokenizer::new();
        let events = t.feed(b"Keyboardhi");
        assert_eq!(chars(&events), "hi");
    }

    #[test]
    fn test_marker_prefix_is_typed_in_keyboard_mode() {
        // The tokenizer cannot know "Mous" is a marker until the 'e' arrives.
        let mut t = keyboard_tokenizer();
        let events = t.feed(b"Mouse");
        assert_eq!(chars(&events), "Mous");
        assert_eq!(events.last(), Some(&StreamEvent::ModeMarker(StreamMode::Mouse)));
    }

    // ── Keyboard mode ─────────────────────────────────────────────────────────

    #[test]
    fn test_carriage_return_is_enter_in_keyboard_mode() {
        let mut t = keyboard_tokenizer();
        assert_eq!(
            t.feed(b"\r"),
            vec![StreamEvent::Keystroke(Keystroke::Enter)]
        );
    }

    #[test]
    fn test_line_feed_is_not_enter_in_keyboard_mode() {
        let mut t = keyboard_tokenizer();
        assert!(t.feed(b"\n").is_empty());
    }

    #[test]
    fn test_backspace_and_tab_are_control_keystrokes() {
        let mut t = keyboard_tokenizer();
        assert_eq!(
            t.feed(b"a\x08\tb"),
            vec![
                StreamEvent::Keystroke(Keystroke::Char('a')),
                StreamEvent::Keystroke(Keystroke::Backspace),
                StreamEvent::Keystroke(Keystroke::Tab),
                StreamEvent::Keystroke(Keystroke::Char('b')),
            ]
        );
    }

    #[test]
    fn test_non_printable_bytes_are_dropped_silently() {
        let mut t = keyboard_tokenizer();
        assert!(t.feed(&[0x00, 0x1B, 0x7F, 0x80, 0xFF]).is_empty());
    }

    #[test]
    fn test_log_line_suppresses_characters_until_terminator() {
        // Arrange
        let mut t = keyboard_tokenizer();

        // Act
        let log = t.feed(b"E (42) boom");
        let skipping_during = t.is_skipping_log();
        let after = t.feed(b"\nok");

        // Assert
        assert!(log.is_empty());
        assert!(skipping_during);
        assert!(!t.is_skipping_log());
        assert!(!after.is_empty());
        assert_eq!(chars(&after), "ok");
    }

    #[test]
    fn test_log_marker_only_counts_at_column_zero() {
        let mut t = keyboard_tokenizer();
        assert_eq!(chars(&t.feed(b"xIWE")), "xIWE");
        assert!(!t.is_skipping_log());
    }

    #[test]
    fn test_enter_still_emitted_on_log_line() {
        let mut t = keyboard_tokenizer();
        let events = t.feed(b"W warn\r");
        assert_eq!(events, vec![StreamEvent::Keystroke(Keystroke::Enter)]);
    }

    #[test]
    fn test_crlf_resets_log_suppression_once() {
        let mut t = keyboard_tokenizer();
        let events = t.feed(b"I info\r\nab");
        assert_eq!(
            events,
            vec![
                StreamEvent::Keystroke(Keystroke::Enter),
                StreamEvent::Keystroke(Keystroke::Char('a')),
                StreamEvent::Keystroke(Keystroke::Char('b')),
            ]
        );
    }

    // ── Mouse mode ────────────────────────────────────────────────────────────

    #[test]
    fn test_mouse_line_emitted_on_terminator() {
        let mut t = mouse_tokenizer();
        assert_eq!(
            t.feed(b"X: 1 Y: 2 |o| |\n"),
            vec![StreamEvent::MouseLine("X: 1 Y: 2 |o| |".to_string())]
        );
    }

    #[test]
    fn test_crlf_emits_single_mouse_line() {
        let mut t = mouse_tokenizer();
        let events = t.feed(b"X: 1 Y: 2 || |\r\n");
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_log_lines_still_accumulate_in_mouse_mode() {
        let mut t = mouse_tokenizer();
        assert_eq!(
            t.feed(b"I tick\n"),
            vec![StreamEvent::MouseLine("I tick".to_string())]
        );
    }

    #[test]
    fn test_marker_completing_byte_is_not_part_of_mouse_line() {
        let mut t = Tokenizer::new();
        let events = t.feed(b"Mouse X: 3 Y: 4 |o| |\n");
        assert_eq!(
            events,
            vec![
                StreamEvent::ModeMarker(StreamMode::Mouse),
                StreamEvent::MouseLine(" X: 3 Y: 4 |o| |".to_string()),
            ]
        );
    }

    #[test]
    fn test_switching_to_keyboard_mid_line_stops_accumulation() {
        let mut t = mouse_tokenizer();
        let events = t.feed(b"X: 1 Keyboardz\r");
        assert_eq!(
            events,
            vec![
                StreamEvent::ModeMarker(StreamMode::Keyboard),
                StreamEvent::Keystroke(Keystroke::Char('z')),
                StreamEvent::Keystroke(Keystroke::Enter),
            ]
        );
    }

    #[test]
    fn test_partial_line_is_discarded_by_terminator_outside_mouse_mode() {
        // Arrange: leave mouse mode mid-line, end the line, come back.
        let mut t = mouse_tokenizer();
        t.feed(b"X: 1 Keyboard\r\n");

        // Act
        let events = t.feed(b"Mouse\nX: 7 Y: 8 || |\n");

        // Assert
        assert_eq!(
            events.last(),
            Some(&StreamEvent::MouseLine("X: 7 Y: 8 || |".to_string()))
        );
    }

    // ── Streaming ─────────────────────────────────────────────────────────────

    #[test]
    fn test_byte_at_a_time_matches_batch() {
        // Arrange
        let stream = b"I boot\r\nKeyboard\r\nhi\tthere\x08\r\nMouse\r\nX: 10 Y: 20 |o| |\r\nX: 15 Y: 18 |o| |\r\n";
        let mut batch = Tokenizer::new();
        let mut single = Tokenizer::new();

        // Act
        let batch_events = batch.feed(stream);
        let single_events: Vec<_> = stream.iter().filter_map(|&b| single.consume(b)).collect();

        // Assert
        assert_eq!(batch_events, single_events);
    }
}
