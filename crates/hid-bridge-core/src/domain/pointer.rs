//! Cursor and button state tracking.
//!
//! The device reports *absolute* cursor positions in its own coordinate space,
//! but the host only accepts *relative* motion (the device has no idea where
//! the host cursor is).  [`PointerTracker`] remembers the previous sample and
//! turns each new one into a delta plus edge-triggered button transitions.
//!
//! # Edge-triggered buttons (for beginners)
//!
//! The device repeats the button state on every sample.  Injecting a press on
//! every sample would make the OS see dozens of clicks, so the tracker only
//! reports a transition when the state actually *changes*.

use thiserror::Error;

use super::input::MouseButton;

/// A parsed cursor sample: absolute position plus the two button states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseSample {
    pub x: i32,
    pub y: i32,
    pub left_down: bool,
    pub right_down: bool,
}

/// A change in one button's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonTransition {
    pub button: MouseButton,
    pub pressed: bool,
}

/// What changed since the previous sample.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PointerUpdate {
    /// Raw `(dx, dy)` against the previous sample, or `None` when this sample
    /// only establishes the reference position.  May be `(0, 0)`.
    pub motion: Option<(i32, i32)>,
    /// Button transitions, left before right.
    pub transitions: Vec<ButtonTransition>,
}

/// Last known cursor position and button states for one session.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    cursor: Option<(i32, i32)>,
    left_down: bool,
    right_down: bool,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a sample and returns the resulting motion and transitions.
    ///
    /// The delta is computed against the stored position *before* the stored
    /// position is overwritten with the sample.
    pub fn apply(&mut self, sample: &MouseSample) -> PointerUpdate {
        let motion = self
            .cursor
            .map(|(last_x, last_y)| (sample.x.saturating_sub(last_x), sample.y.saturating_sub(last_y)));
        self.cursor = Some((sample.x, sample.y));

        let mut transitions = Vec::new();
        if sample.left_down != self.left_down {
            self.left_down = sample.left_down;
            transitions.push(ButtonTransition {
                button: MouseButton::Left,
                pressed: sample.left_down,
            });
        }
        if sample.right_down != self.right_down {
            self.right_down = sample.right_down;
            transitions.push(ButtonTransition {
                button: MouseButton::Right,
                pressed: sample.right_down,
            });
        }

        PointerUpdate { motion, transitions }
    }

    /// Forgets the reference position so the next sample produces no motion.
    ///
    /// Button states are kept: the OS still believes a held button is down.
    pub fn reset_cursor(&mut self) {
        self.cursor = None;
    }

    pub fn cursor(&self) -> Option<(i32, i32)> {
        self.cursor
    }

    pub fn is_down(&self, button: MouseButton) -> bool {
        match button {
            MouseButton::Left => self.left_down,
            MouseButton::Right => self.right_down,
        }
    }
}

/// Error returned for an unusable sensitivity factor.
#[derive(Debug, Error, PartialEq)]
pub enum ScaleError {
    #[error("mouse sensitivity must be a finite number, got {0}")]
    NotFinite(f64),
}

/// Static linear sensitivity applied to every motion delta.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionScale {
    factor: f64,
}

impl MotionScale {
    /// Sensitivity used when nothing is configured.
    pub const DEFAULT_FACTOR: f64 = 1.0;

    /// # Errors
    ///
    /// Returns [`ScaleError::NotFinite`] for NaN or infinite factors.
    pub fn new(factor: f64) -> Result<Self, ScaleError> {
        if !factor.is_finite() {
            return Err(ScaleError::NotFinite(factor));
        }
        Ok(Self { factor })
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Scales a raw delta, truncating toward zero.
    ///
    /// Returns `None` when both scaled components are zero so callers can
    /// skip the OS call entirely.
    pub fn scale(&self, (dx, dy): (i32, i32)) -> Option<(i32, i32)> {
        // `as` from f64 to i32 truncates toward zero and saturates at the bounds.
        let sx = (f64::from(dx) * self.factor) as i32;
        let sy = (f64::from(dy) * self.factor) as i32;
        if sx == 0 && sy == 0 {
            None
        } else {
            Some((sx, sy))
        }
    }
}

impl Default for MotionScale {
    fn default() -> Self {
        Self {
            factor: Self::DEFAULT_FACTOR,
        }
    }
}
