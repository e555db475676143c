//! Bridge session and its read loop.
//!
//! [`BridgeSession`] is the single object holding every piece of per-connection
//! state: the tokenizer (mode, marker window, line accumulator, log flags) and
//! the translator (cursor and button state).  It is created once at startup
//! and owned by the [`SessionDriver`], which pulls bytes from a [`ByteSource`]
//! until the shared `running` flag is cleared.
//!
//! # Loop shape (for beginners)
//!
//! ```text
//! while running:
//!     n = source.bytes_available()
//!     n == 0  -> sleep(poll_interval)
//!     n  > 0  -> read up to n bytes, feed every byte, yield
//!     error   -> log, sleep(error_pause), keep going
//! ```
//!
//! The `running` flag is only checked between iterations, so a batch that has
//! already been read is always processed in full.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use hid_bridge_core::Tokenizer;
use thiserror::Error;
use tracing::{debug, error, info};

use super::translate_events::{EmulationError, EventTranslator};

/// Largest batch read in one iteration.
pub const READ_CHUNK_SIZE: usize = 4096;

/// Errors raised by a [`ByteSource`].
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("port error: {0}")]
    Port(String),
}

/// Errors from one loop iteration.  All of them are recoverable.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("read failed: {0}")]
    Source(#[from] SourceError),
    #[error("input injection failed: {0}")]
    Emulation(#[from] EmulationError),
}

/// A non-blocking byte stream, usually the serial connection.
#[cfg_attr(test, mockall::automock)]
pub trait ByteSource {
    /// Number of bytes that can be read without waiting.
    fn bytes_available(&mut self) -> Result<usize, SourceError>;

    /// Reads at most `buf.len()` already-available bytes; returns the count.
    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, SourceError>;
}

/// All per-connection decoding and pointer state.
pub struct BridgeSession {
    tokenizer: Tokenizer,
    translator: EventTranslator,
    stream_events: u64,
}

impl BridgeSession {
    pub fn new(translator: EventTranslator) -> Self {
        Self {
            tokenizer: Tokenizer::new(),
            translator,
            stream_events: 0,
        }
    }

    /// Feeds a batch of bytes in order.
    ///
    /// Every byte is processed even if an injection fails part-way through.
    ///
    /// # Errors
    ///
    /// Returns the first [`EmulationError`] seen in the batch.
    pub fn feed(&mut self, bytes: &[u8]) -> Result<(), EmulationError> {
        let mut first_error = None;
        for &byte in bytes {
            let Some(event) = self.tokenizer.consume(byte) else {
                continue;
            };
            self.stream_events += 1;
            if let Err(e) = self.translator.handle(event) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    pub fn translator(&self) -> &EventTranslator {
        &self.translator
    }

    /// Total tokenizer events handled since the session started.
    pub fn stream_events(&self) -> u64 {
        self.stream_events
    }
}

/// Pauses used by the read loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTiming {
    /// Sleep when no bytes are waiting.
    pub poll_interval: Duration,
    /// Sleep after a recoverable error.
    pub error_pause: Duration,
}

impl Default for SessionTiming {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(2),
            error_pause: Duration::from_millis(50),
        }
    }
}

/// Lifecycle of the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    Active,
    Closed,
}

/// Counters reported when the loop exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub bytes_read: u64,
    pub stream_events: u64,
    pub recoverable_errors: u64,
}

/// Owns the session and runs the cooperative read loop.
pub struct SessionDriver {
    session: BridgeSession,
    timing: SessionTiming,
    state: SessionState,
    bytes_read: u64,
    recoverable_errors: u64,
}

impl SessionDriver {
    pub fn new(session: BridgeSession, timing: SessionTiming) -> Self {
        Self {
            session,
            timing,
            state: SessionState::Connecting,
            bytes_read: 0,
            recoverable_errors: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn session(&self) -> &BridgeSession {
        &self.session
    }

    /// Runs until `running` is cleared, then returns the session counters.
    ///
    /// Errors inside the loop are logged and retried after
    /// [`SessionTiming::error_pause`]; they never end the loop.
    pub async fn run<S>(&mut self, source: &mut S, running: &AtomicBool) -> SessionSummary
    where
        S: ByteSource + ?Sized,
    {
        self.state = SessionState::Active;
        debug!("session active");
        let mut buf = vec![0u8; READ_CHUNK_SIZE];

        while running.load(Ordering::Relaxed) {
            match self.step(source, &mut buf) {
                Ok(0) => tokio::time::sleep(self.timing.poll_interval).await,
                Ok(_) => tokio::task::yield_now().await,
                Err(e) => {
                    self.recoverable_errors += 1;
                    error!("session error: {e}");
                    tokio::time::sleep(self.timing.error_pause).await;
                }
            }
        }

        self.state = SessionState::Closed;
        let summary = self.summary();
        info!(
            bytes_read = summary.bytes_read,
            stream_events = summary.stream_events,
            recoverable_errors = summary.recoverable_errors,
            "session closed"
        );
        summary
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            bytes_read: self.bytes_read,
            stream_events: self.session.stream_events(),
            recoverable_errors: self.recoverable_errors,
        }
    }

    /// One poll: returns the number of bytes processed.
    fn step<S>(&mut self, source: &mut S, buf: &mut [u8]) -> Result<usize, SessionError>
    where
        S: ByteSource + ?Sized,
    {
        let available = source.bytes_available()?;
        if available == 0 {
            return Ok(0);
        }
        let want = available.min(buf.len());
        let read = source.read_available(&mut buf[..want])?;
        self.bytes_read += read as u64;
        self.session.feed(&buf[..read])?;
        Ok(read)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
