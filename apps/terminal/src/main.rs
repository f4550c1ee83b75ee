//! # Price Checker Terminal Kiosk
//!
//! Scan a barcode, see the price.
//!
//! ## Usage
//! ```text
//! pricecheck-terminal [path/to/kiosk.toml] 2>kiosk.log
//! ```
//!
//! Logs go to stderr so they never interleave with the rendered view.

mod input;
mod render;

use std::io::{self, stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use tokio::sync::mpsc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use pricecheck_core::{KeystrokeAggregator, LookupState};
use pricecheck_lookup::{KioskConfig, LookupController};

use crate::input::{convert_key_event, read_keys, KeyAction};
use crate::render::{draw, render_lines, RenderContext};

/// Puts the terminal in raw mode; restores it when dropped.
///
/// Dropping also runs during unwinding, so every exit path (early `?`
/// returns, panics, Esc) leaves the terminal usable.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        if let Err(e) = execute!(stdout(), EnterAlternateScreen, Hide) {
            let _ = terminal::disable_raw_mode();
            return Err(e);
        }
        Ok(RawModeGuard)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing (stderr, the screen belongs to the view)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,pricecheck=debug")),
        )
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();

    // Load configuration
    let config_path = std::env::args().nth(1).map(std::path::PathBuf::from);
    let config = KioskConfig::load(config_path.as_deref())?;
    info!(
        inventory = %config.inventory.base_url,
        inactivity_ms = config.scanner.inactivity_ms,
        "Configuration loaded"
    );

    let controller = LookupController::from_settings(&config.inventory)?;
    let ctx = RenderContext {
        photo_base: format!("http://{}/api/images", config.relay.bind_address()),
        placeholder: config.images.placeholder.clone(),
    };

    let guard = RawModeGuard::enable()?;
    let result = run(&config, &controller, &ctx).await;
    drop(guard);

    info!("Kiosk closed");
    result
}

/// The event loop: keys in, rendered states out.
async fn run(
    config: &KioskConfig,
    controller: &LookupController,
    ctx: &RenderContext,
) -> Result<(), Box<dyn std::error::Error>> {
    let (key_tx, mut key_rx) = mpsc::unbounded_channel();
    let stop = Arc::new(AtomicBool::new(false));
    let reader = {
        let stop = Arc::clone(&stop);
        std::thread::spawn(move || read_keys(key_tx, stop))
    };

    let mut scanner = KeystrokeAggregator::with_inactivity(config.scanner.inactivity());
    let mut updates = controller.subscribe();
    let mut out = stdout();

    let repaint = |out: &mut io::Stdout, state: &LookupState| {
        let last = controller.last_barcode();
        let now = chrono::Local::now().naive_local();
        draw(out, &render_lines(state, last.as_ref(), ctx, now))
    };

    repaint(&mut out, &controller.state())?;

    let result = loop {
        tokio::select! {
            key = key_rx.recv() => {
                let Some((key, at)) = key else {
                    break Ok(());
                };
                match convert_key_event(&key) {
                    KeyAction::Quit => break Ok(()),
                    KeyAction::Ignore => {}
                    KeyAction::Input(input) => {
                        if let Some(code) = scanner.handle(input, at) {
                            debug!(barcode = %code, "Scan complete");
                            controller.submit(code);
                        }
                    }
                }
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break Ok(());
                }
                let state = updates.borrow_and_update().clone();
                if let Err(e) = repaint(&mut out, &state) {
                    break Err(e);
                }
            }
        }
    };

    stop.store(true, Ordering::Relaxed);
    let _ = reader.join();

    result.map_err(Into::into)
}
