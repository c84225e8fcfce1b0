//! Prints every active window and title change until Ctrl+C.
//!
//! Usage: RUST_LOG=title_tracker=debug cargo run --example basic

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use title_tracker::{TitleTracker, print_change};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let stop = Arc::new(AtomicBool::new(false));
    let handler_stop = Arc::clone(&stop);
    ctrlc::set_handler(move || {
        handler_stop.store(true, Ordering::Release);
    })?;

    let tracker = TitleTracker::new();
    tracker.track_changes_with_stop(print_change, &stop)?;

    Ok(())
}
