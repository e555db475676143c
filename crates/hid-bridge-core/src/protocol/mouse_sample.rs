//! Mouse sample parser.
//!
//! In mouse mode the device prints one sample per line:
//!
//! ```text
//! X: 120 Y: -45 |o| |
//! ```
//!
//! - `X:` and `Y:` are followed by optional whitespace and a signed integer.
//! - Arbitrary text may sit between the fields.
//! - After the Y value, the button pair is the first `|` that is followed by
//!   at most one character and then another `|`.  That character (if any) is
//!   the left button; the single character after the closing `|` is the right
//!   button.  A button is pressed when its character is
//!   [`BUTTON_PRESSED_MARKER`].
//! - A `|` followed by a wider field is skipped, so `|oo|o|` reads as left
//!   pressed from the `|o|` pair.
//! - A trailing `|` is optional.
//!
//! The scanner is hand-rolled: it walks the line left to right and reports
//! `None` (never an error) when the line is not a sample.

pub use crate::domain::pointer::MouseSample;

/// Field value meaning "button is down".
pub const BUTTON_PRESSED_MARKER: char = 'o';

const X_LABEL: &str = "X:";
const Y_LABEL: &str = "Y:";
const FIELD_DELIMITER: char = '|';

/// Extracts a [`MouseSample`] from one line, or `None` if the line does not
/// contain the labelled coordinates followed by a button field pair.
pub fn parse_mouse_sample(line: &str) -> Option<MouseSample> {
    let (x, after_x) = labeled_int(line, X_LABEL)?;
    let (y, after_y) = labeled_int(after_x, Y_LABEL)?;
    let (left_down, right_down) = button_fields(after_y)?;
    Some(MouseSample {
        x,
        y,
        left_down,
        right_down,
    })
}

/// Finds the first occurrence of `label` followed by a valid signed integer.
///
/// Returns the value and the text after its last digit.
fn labeled_int<'a>(text: &'a str, label: &str) -> Option<(i32, &'a str)> {
    let mut rest = text;
    while let Some(pos) = rest.find(label) {
        let after = &rest[pos + label.len()..];
        if let Some(found) = signed_int(after.trim_start_matches(char::is_whitespace)) {
            return Some(found);
        }
        rest = after;
    }
    None
}

/// Parses `[+-]?[0-9]+` at the start of `text`.
fn signed_int(text: &str) -> Option<(i32, &str)> {
    let sign_len = usize::from(text.starts_with(['+', '-']));
    let digits = text[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits == 0 {
        return None;
    }
    let end = sign_len + digits;
    let value = text[..end].parse().ok()?;
    Some((value, &text[end..]))
}

/// Reads the first `|L|R` pair whose left field is at most one character;
/// `None` if there is no such pair.
fn button_fields(text: &str) -> Option<(bool, bool)> {
    let delimiter_len = FIELD_DELIMITER.len_utf8();
    let mut rest = text;
    while let Some(open) = rest.find(FIELD_DELIMITER) {
        let after = &rest[open + delimiter_len..];
        let mut chars = after.chars();
        let (left, tail) = match (chars.next(), chars.next()) {
            (Some(ch), Some(FIELD_DELIMITER)) => (Some(ch), &after[ch.len_utf8() + delimiter_len..]),
            (Some(FIELD_DELIMITER), _) => (None, &after[delimiter_len..]),
            _ => {
                rest = after;
                continue;
            }
        };
        let right = tail.chars().next();
        return Some((
            left == Some(BUTTON_PRESSED_MARKER),
            right == Some(BUTTON_PRESSED_MARKER),
        ));
    }
    None
}
