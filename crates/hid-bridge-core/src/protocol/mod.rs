//! Protocol module: the telemetry stream tokenizer and the mouse sample parser.

pub mod line;
pub mod marker;
pub mod mouse_sample;
pub mod tokenizer;

pub use mouse_sample::{parse_mouse_sample, MouseSample, BUTTON_PRESSED_MARKER};
pub use tokenizer::{ByteClass, StreamEvent, Tokenizer, LOG_SEVERITY_MARKERS};
