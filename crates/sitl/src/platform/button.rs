//! Simulated user button.
//!
//! On hardware the button is a falling-edge interrupt that latches a
//! shared flag from outside the scheduler. Here a thread blocked on stdin
//! plays the interrupt: hitting Enter latches `button_pushed`. The flag is
//! only ever set, never cleared, matching the event-source contract.

use std::io::BufRead;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use turret_core::share::TurretShares;

/// Spawn the Enter-key listener. The thread exits after the first
/// keypress (or on stdin EOF).
pub fn spawn_button_listener(shares: Arc<TurretShares>) -> JoinHandle<()> {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        let mut line = String::new();
        if stdin.lock().read_line(&mut line).is_ok() {
            shares.button_pushed.put(true);
        }
    })
}
