//! Inter-command quiescence timing

use std::thread;
use std::time::{Duration, Instant};

/// Minimum quiet interval after a write before the bus is touched again.
pub const QUIESCENCE: Duration = Duration::from_millis(45);

/// Tracks the last write on a connection and enforces the quiet interval.
///
/// Only writes re-arm the timer: the monitor needs settle time after being
/// told to change a value, not after being asked a question. Reads wait on
/// the existing deadline but leave it untouched.
///
/// The wait is an ordinary blocking sleep against the monotonic clock; the
/// bus is exclusive, so nothing else on this connection could make
/// progress during it anyway.
#[derive(Debug, Default)]
pub struct QuiescenceTimer {
    last_write: Option<Instant>,
}

impl QuiescenceTimer {
    pub fn new() -> Self {
        Self { last_write: None }
    }

    /// Block until [`QUIESCENCE`] has elapsed since the last recorded
    /// write, then record this operation if it is a write.
    pub fn wait_and_mark(&mut self, is_write: bool) {
        if let Some(last) = self.last_write {
            let elapsed = last.elapsed();
            if elapsed < QUIESCENCE {
                thread::sleep(QUIESCENCE - elapsed);
            }
        }

        if is_write {
            self.last_write = Some(Instant::now());
        }
    }

    /// Timestamp of the last recorded write, if any.
    pub fn last_write(&self) -> Option<Instant> {
        self.last_write
    }
}
