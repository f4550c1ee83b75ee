//! # Keystroke Aggregator
//!
//! Turns raw key events into completed barcodes.
//!
//! A keyboard-wedge scanner "types" the code followed by Enter, a few
//! milliseconds per key. People type much slower. The aggregator uses that
//! difference: characters only accumulate while they keep arriving inside
//! the inactivity window.
//!
//! ## Episode Detection
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  time ──►                                                               │
//! │                                                                         │
//! │  'x'        (pause 2s)   '7' '7' '0' '2' 'Enter'                        │
//! │   │                       │   │   │   │    │                            │
//! │   ▼                       ▼   ▼   ▼   ▼    ▼                            │
//! │  [x]  ──gap ≥ 100ms──►  [7] [77] [770] [7702]  ──► Barcode("7702")     │
//! │        buffer cleared                            buffer cleared         │
//! │                                                                         │
//! │  'Shift', 'Tab', arrows ... ignored, they don't touch the timer        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The aggregator never reads a clock. Every event carries its own
//! `Instant`, so the whole thing is a pure function of (events, timestamps).

use std::time::{Duration, Instant};

use crate::barcode::Barcode;
use crate::DEFAULT_INACTIVITY_MS;

// =============================================================================
// Key Input
// =============================================================================

/// A key press as the aggregator sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// A printable character.
    Char(char),
    /// The terminator key.
    Enter,
    /// Any other key (modifiers, navigation, function keys).
    Other,
}

impl KeyInput {
    /// Classifies a key by its DOM-style name (`KeyboardEvent.key`).
    ///
    /// ```rust
    /// use pricecheck_core::scanner::KeyInput;
    ///
    /// assert_eq!(KeyInput::from_key_name("7"), KeyInput::Char('7'));
    /// assert_eq!(KeyInput::from_key_name("Enter"), KeyInput::Enter);
    /// assert_eq!(KeyInput::from_key_name("Shift"), KeyInput::Other);
    /// ```
    pub fn from_key_name(name: &str) -> Self {
        if name == "Enter" {
            return KeyInput::Enter;
        }

        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => KeyInput::from_char(c),
            _ => KeyInput::Other,
        }
    }

    /// Classifies a single character. Control characters are not printable,
    /// except carriage return / line feed which act as the terminator.
    pub fn from_char(c: char) -> Self {
        match c {
            '\r' | '\n' => KeyInput::Enter,
            c if c.is_control() => KeyInput::Other,
            c => KeyInput::Char(c),
        }
    }
}

// =============================================================================
// Scan Buffer
// =============================================================================

/// Characters of the current scan episode and when the last one arrived.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanBuffer {
    chars: String,
    last_at: Option<Instant>,
}

impl ScanBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current contents, untrimmed.
    pub fn as_str(&self) -> &str {
        &self.chars
    }

    /// Returns true if no characters are buffered.
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// When the last accepted character arrived.
    pub fn last_at(&self) -> Option<Instant> {
        self.last_at
    }

    fn push(&mut self, c: char, at: Instant) {
        self.chars.push(c);
        self.last_at = Some(at);
    }

    fn clear(&mut self) {
        self.chars.clear();
        self.last_at = None;
    }
}

// =============================================================================
// Aggregator
// =============================================================================

/// Buffers scanner keystrokes and emits one [`Barcode`] per scan episode.
///
/// ## Lifecycle
/// Create one per input surface when it becomes active and drop it when the
/// surface goes away. Nothing is global; two aggregators never share state.
#[derive(Debug, Clone)]
pub struct KeystrokeAggregator {
    buffer: ScanBuffer,
    inactivity: Duration,
}

impl KeystrokeAggregator {
    /// Creates an aggregator with the default 100ms inactivity gap.
    pub fn new() -> Self {
        Self::with_inactivity(Duration::from_millis(DEFAULT_INACTIVITY_MS))
    }

    /// Creates an aggregator with a custom inactivity gap.
    pub fn with_inactivity(inactivity: Duration) -> Self {
        KeystrokeAggregator {
            buffer: ScanBuffer::new(),
            inactivity,
        }
    }

    /// The inactivity gap that starts a new episode.
    pub fn inactivity(&self) -> Duration {
        self.inactivity
    }

    /// Read access to the pending buffer.
    pub fn buffer(&self) -> &ScanBuffer {
        &self.buffer
    }

    /// Processes one key event.
    ///
    /// Returns a barcode only when `key` is Enter and the trimmed buffer is
    /// not empty.
    ///
    /// ## Rules
    /// 1. Printable char: clear first if the gap since the previous char is
    ///    at least the inactivity window, then append and restamp.
    /// 2. Enter: flush (see [`KeystrokeAggregator::submit`]).
    /// 3. Anything else, including a control char: ignored, timer untouched.
    pub fn handle(&mut self, key: KeyInput, at: Instant) -> Option<Barcode> {
        match key {
            KeyInput::Char(c) if c.is_control() => None,
            KeyInput::Char(c) => {
                if self.gap_expired(at) {
                    self.buffer.clear();
                }
                self.buffer.push(c, at);
                None
            }
            KeyInput::Enter => self.submit(),
            KeyInput::Other => None,
        }
    }

    /// Flushes the buffer explicitly.
    ///
    /// A blank buffer is left untouched and nothing is emitted.
    pub fn submit(&mut self) -> Option<Barcode> {
        let barcode = Barcode::new(self.buffer.as_str()).ok()?;
        self.buffer.clear();
        Some(barcode)
    }

    /// Discards whatever is buffered.
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    fn gap_expired(&self, at: Instant) -> bool {
        match self.buffer.last_at() {
            Some(last) => at.saturating_duration_since(last) >= self.inactivity,
            None => false,
        }
    }
}

impl Default for KeystrokeAggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs a whole event stream through a fresh aggregator.
///
/// ```rust
/// use std::time::{Duration, Instant};
/// use pricecheck_core::scanner::{aggregate, KeyInput};
///
/// let t0 = Instant::now();
/// let ms = |n| t0 + Duration::from_millis(n);
/// let codes = aggregate([
///     (KeyInput::Char('4'), ms(0)),
///     (KeyInput::Char('2'), ms(5)),
///     (KeyInput::Enter, ms(10)),
/// ]);
/// assert_eq!(codes.len(), 1);
/// assert_eq!(codes[0].as_str(), "42");
/// ```
pub fn aggregate<I>(events: I) -> Vec<Barcode>
where
    I: IntoIterator<Item = (KeyInput, Instant)>,
{
    let mut aggregator = KeystrokeAggregator::new();
    events
        .into_iter()
        .filter_map(|(key, at)| aggregator.handle(key, at))
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
