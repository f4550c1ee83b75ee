//! # Key Input
//!
//! Converts crossterm key events into what the kiosk understands, and runs
//! the blocking reader that feeds them to the async side.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;
use tracing::{error, trace};

use pricecheck_core::KeyInput;

/// How long the reader waits for a key before rechecking the stop flag.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// What one terminal key event means to the kiosk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Feed to the aggregator.
    Input(KeyInput),
    /// Leave the kiosk.
    Quit,
    /// Key releases and other noise.
    Ignore,
}

/// Convert a crossterm key event.
///
/// `Esc` and `Ctrl-C` quit. Releases are ignored so Windows terminals (which
/// report both press and release) don't double every character.
pub fn convert_key_event(event: &KeyEvent) -> KeyAction {
    if event.kind == KeyEventKind::Release {
        return KeyAction::Ignore;
    }

    match event.code {
        KeyCode::Esc => KeyAction::Quit,
        KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
        KeyCode::Char(c) => KeyAction::Input(KeyInput::from_char(c)),
        KeyCode::Enter => KeyAction::Input(KeyInput::Enter),
        _ => KeyAction::Input(KeyInput::Other),
    }
}

/// Blocking loop: reads key events and sends them, stamped, to `tx`.
///
/// Runs on its own thread. Stops when `stop` is set, the receiver is gone,
/// or the terminal reports an error.
pub fn read_keys(tx: mpsc::UnboundedSender<(KeyEvent, Instant)>, stop: Arc<AtomicBool>) {
    while !stop.load(Ordering::Relaxed) {
        match event::poll(POLL_INTERVAL) {
            Ok(true) => match event::read() {
                Ok(Event::Key(key)) => {
                    let at = Instant::now();
                    trace!(code = ?key.code, "Key event");
                    if tx.send((key, at)).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    error!(error = %e, "Failed to read terminal event");
                    break;
                }
            },
            Ok(false) => {}
            Err(e) => {
                error!(error = %e, "Failed to poll terminal");
                break;
            }
        }
    }
}
