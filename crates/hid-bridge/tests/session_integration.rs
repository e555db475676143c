//! End-to-end tests for the session read loop.
//!
//! A scripted [`ByteSource`] replays chunks the way the serial port would
//! deliver them and clears the `running` flag once the script is exhausted,
//! so `SessionDriver::run` returns on its own.  Injected input is captured by
//! the recording `MockInputEmulator`.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hid_bridge::application::session::{
    BridgeSession, ByteSource, SessionDriver, SessionState, SessionSummary, SessionTiming,
    SourceError,
};
use hid_bridge::application::translate_events::EventTranslator;
use hid_bridge::infrastructure::input_emulation::mock::{EmittedEvent, MockInputEmulator};
use hid_bridge_core::{
    ControlKey, KeyEvent, KeyTarget, MotionScale, MouseButton, MouseEvent, StreamMode,
};

// ── Scripted source ───────────────────────────────────────────────────────────

enum Step {
    Data(&'static [u8]),
    Fail,
}

struct ScriptedSource {
    steps: VecDeque<Step>,
    pending: Vec<u8>,
    running: Arc<AtomicBool>,
}

impl ScriptedSource {
    fn new(steps: Vec<Step>, running: Arc<AtomicBool>) -> Self {
        Self {
            steps: steps.into(),
            pending: Vec::new(),
            running,
        }
    }
}

impl ByteSource for ScriptedSource {
    fn bytes_available(&mut self) -> Result<usize, SourceError> {
        if self.pending.is_empty() {
            match self.steps.pop_front() {
                Some(Step::Data(bytes)) => self.pending.extend_from_slice(bytes),
                Some(Step::Fail) => return Err(SourceError::Port("device unplugged".into())),
                None => self.running.store(false, Ordering::Relaxed),
            }
        }
        Ok(self.pending.len())
    }

    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, SourceError> {
        let n = buf.len().min(self.pending.len());
        buf[..n].copy_from_slice(&self.pending[..n]);
        self.pending.drain(..n);
        Ok(n)
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn fast_timing() -> SessionTiming {
    SessionTiming {
        poll_interval: Duration::from_millis(1),
        error_pause: Duration::from_millis(1),
    }
}

async fn run_script(
    steps: Vec<Step>,
    emulator: Arc<MockInputEmulator>,
    scale: MotionScale,
) -> (SessionDriver, SessionSummary) {
    let running = Arc::new(AtomicBool::new(true));
    let mut source = ScriptedSource::new(steps, Arc::clone(&running));
    let session = BridgeSession::new(EventTranslator::new(emulator, scale));
    let mut driver = SessionDriver::new(session, fast_timing());

    let summary = driver.run(&mut source, &running).await;
    (driver, summary)
}

fn typed_text(emulator: &MockInputEmulator) -> String {
    emulator
        .key_events()
        .iter()
        .filter(|e| e.phase == hid_bridge_core::KeyPhase::Down)
        .map(|e| match e.target {
            KeyTarget::Character(ch) => ch,
            KeyTarget::Control(ControlKey::Enter) => '\n',
            KeyTarget::Control(ControlKey::Tab) => '\t',
            KeyTarget::Control(ControlKey::Backspace) => '\u{8}',
        })
        .collect()
}

// ── Keyboard ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_keyboard_stream_is_typed_in_order() {
    // Arrange
    let emulator = Arc::new(MockInputEmulator::new());

    // Act
    let (driver, summary) = run_script(
        vec![Step::Data(b"Keyboard\nhi\r")],
        emulator.clone(),
        MotionScale::default(),
    )
    .await;

    // Assert
    assert_eq!(
        emulator.key_events(),
        vec![
            KeyEvent::down(KeyTarget::Character('h')),
            KeyEvent::up(KeyTarget::Character('h')),
            KeyEvent::down(KeyTarget::Character('i')),
            KeyEvent::up(KeyTarget::Character('i')),
            KeyEvent::down(KeyTarget::Control(ControlKey::Enter)),
            KeyEvent::up(KeyTarget::Control(ControlKey::Enter)),
        ]
    );
    assert_eq!(driver.state(), SessionState::Closed);
    assert_eq!(
        summary,
        SessionSummary {
            bytes_read: 12,
            stream_events: 4,
            recoverable_errors: 0,
        }
    );
}

#[tokio::test]
async fn test_marker_split_across_reads_is_recognised() {
    // Arrange
    let emulator = Arc::new(MockInputEmulator::new());

    // Act
    let (driver, _) = run_script(
        vec![Step::Data(b"Keyb"), Step::Data(b"oard\nok")],
        emulator.clone(),
        MotionScale::default(),
    )
    .await;

    // Assert
    assert_eq!(typed_text(&emulator), "ok");
    assert_eq!(driver.session().tokenizer().mode(), StreamMode::Keyboard);
}

#[tokio::test]
async fn test_device_log_lines_are_not_typed() {
    let emulator = Arc::new(MockInputEmulator::new());

    run_script(
        vec![
            Step::Data(b"I (312) boot: ready\nKeyboard\n"),
            Step::Data(b"W (900) hid: slow poll\nabc"),
        ],
        emulator.clone(),
        MotionScale::default(),
    )
    .await;

    assert_eq!(typed_text(&emulator), "abc");
}

// ── Mouse ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_mouse_samples_become_motion_and_clicks() {
    // Arrange
    let emulator = Arc::new(MockInputEmulator::new());

    // Act
    let (driver, summary) = run_script(
        vec![
            Step::Data(b"Mouse\r\n"),
            Step::Data(b"X: 10 Y: 20 | | |\r\n"),
            Step::Data(b"X: 15 Y: 18 |o| |\r\n"),
            Step::Data(b"X: 15 Y: 18 | | |\r\n"),
        ],
        emulator.clone(),
        MotionScale::default(),
    )
    .await;

    // Assert
    assert_eq!(
        emulator.mouse_events(),
        vec![
            MouseEvent::Move { dx: 5, dy: -2 },
            MouseEvent::Button {
                button: MouseButton::Left,
                pressed: true,
            },
            MouseEvent::Button {
                button: MouseButton::Left,
                pressed: false,
            },
        ]
    );
    assert!(emulator.key_events().is_empty());
    assert_eq!(summary.stream_events, 4);
    assert!(!driver.session().translator().pointer().is_down(MouseButton::Left));
}

#[tokio::test]
async fn test_sensitivity_scales_motion() {
    let emulator = Arc::new(MockInputEmulator::new());
    let scale = MotionScale::new(2.0).unwrap();

    run_script(
        vec![Step::Data(b"Mouse\nX: 0 Y: 0 | | |\nX: 5 Y: -2 | | |\n")],
        emulator.clone(),
        scale,
    )
    .await;

    assert_eq!(
        emulator.mouse_events(),
        vec![MouseEvent::Move { dx: 10, dy: -4 }]
    );
}

#[tokio::test]
async fn test_switching_from_keyboard_to_mouse_mid_stream() {
    // Arrange
    let emulator = Arc::new(MockInputEmulator::new());

    // Act
    run_script(
        vec![
            Step::Data(b"Keyboard\nab\r"),
            Step::Data(b"Mouse\nX: 1 Y: 1 | |o|\n"),
        ],
        emulator.clone(),
        MotionScale::default(),
    )
    .await;

    // Assert
    let events = emulator.events();
    assert_eq!(
        events.last(),
        Some(&EmittedEvent::Mouse(MouseEvent::Button {
            button: MouseButton::Right,
            pressed: true,
        }))
    );
    // The marker is only recognised on its last byte; its prefix is typed.
    assert_eq!(typed_text(&emulator), "ab\nMous");
}

// ── Error recovery ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_source_error_is_counted_and_reading_resumes() {
    // Arrange
    let emulator = Arc::new(MockInputEmulator::new());

    // Act
    let (_, summary) = run_script(
        vec![Step::Data(b"Keyboard\n"), Step::Fail, Step::Data(b"x")],
        emulator.clone(),
        MotionScale::default(),
    )
    .await;

    // Assert
    assert_eq!(typed_text(&emulator), "x");
    assert_eq!(summary.recoverable_errors, 1);
    assert_eq!(summary.bytes_read, 10);
}

#[tokio::test]
async fn test_injection_failure_counts_once_per_batch() {
    // Arrange
    let emulator = Arc::new(MockInputEmulator::new());
    emulator.set_failing(true);

    // Act
    let (driver, summary) = run_script(
        vec![Step::Data(b"Keyboard\nab"), Step::Data(b"c")],
        emulator.clone(),
        MotionScale::default(),
    )
    .await;

    // Assert
    assert!(emulator.events().is_empty());
    assert_eq!(summary.recoverable_errors, 2);
    assert_eq!(summary.bytes_read, 12);
    assert_eq!(summary.stream_events, 4);
    assert_eq!(driver.session().tokenizer().mode(), StreamMode::Keyboard);
}

#[tokio::test]
async fn test_cleared_flag_stops_before_reading() {
    // Arrange
    let emulator = Arc::new(MockInputEmulator::new());
    let running = Arc::new(AtomicBool::new(false));
    let mut source = ScriptedSource::new(vec![Step::Data(b"Keyboard\nz")], Arc::clone(&running));
    let session = BridgeSession::new(EventTranslator::new(
        emulator.clone(),
        MotionScale::default(),
    ));
    let mut driver = SessionDriver::new(session, fast_timing());

    // Act
    let summary = driver.run(&mut source, &running).await;

    // Assert
    assert_eq!(summary, SessionSummary::default());
    assert!(emulator.events().is_empty());
    assert_eq!(driver.state(), SessionState::Closed);
}
