//! Upload progress ramp
//!
//! True byte-level progress is not observable through the transport, so a
//! cosmetic ramp is maintained while the upload is in flight: it starts at
//! 10 %, climbs on a fixed short interval up to 85 %, and is forced to
//! 100 % only once the server confirms acceptance. The ramp must never be
//! treated as ground truth.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Percentage reported the moment the upload is dispatched
pub const RAMP_START: u8 = 10;

/// Increment applied on each tick
const RAMP_STEP: u8 = 8;

/// Ceiling the ramp holds at until the server responds
pub const RAMP_CAP: u8 = 85;

/// Percentage reported once the server has accepted the upload
pub const PROGRESS_COMPLETE: u8 = 100;

/// Interval between ramp ticks
const RAMP_TICK: Duration = Duration::from_millis(300);

/// Receiver of upload-progress percentages (0–100)
pub trait ProgressSink: Send + Sync {
    fn on_progress(&self, percent: u8);
}

/// One ramp tick: advance toward the cap, never past it
pub fn ramp_step(percent: u8) -> u8 {
    percent.saturating_add(RAMP_STEP).min(RAMP_CAP)
}

/// Cancellation handle for a running ramp thread
///
/// Dropping the handle stops the thread; [`RampHandle::stop`] does the
/// same explicitly. Either way the thread is joined, so no ramp ever
/// outlives its upload.
pub struct RampHandle {
    stop_tx: mpsc::Sender<()>,
    join: Option<JoinHandle<()>>,
}

impl RampHandle {
    /// Stop the ramp and wait for its thread to exit
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        // The thread may have exited on its own; a dead channel is fine
        let _ = self.stop_tx.send(());
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

impl Drop for RampHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Start a ramp thread reporting into `sink` every tick
///
/// Emits [`RAMP_START`] immediately, then climbs by one step per tick
/// until stopped or capped. The caller reports [`PROGRESS_COMPLETE`]
/// itself once the server confirms acceptance.
pub fn start_ramp(sink: Arc<dyn ProgressSink>) -> RampHandle {
    start_ramp_with_tick(sink, RAMP_TICK)
}

/// As [`start_ramp`], with an explicit tick interval (shortened in tests)
pub fn start_ramp_with_tick(sink: Arc<dyn ProgressSink>, tick: Duration) -> RampHandle {
    let (stop_tx, stop_rx) = mpsc::channel::<()>();

    let join = std::thread::spawn(move || {
        let mut percent = RAMP_START;
        sink.on_progress(percent);

        loop {
            match stop_rx.recv_timeout(tick) {
                Err(RecvTimeoutError::Timeout) => {}
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
            let next = ramp_step(percent);
            if next != percent {
                percent = next;
                sink.on_progress(percent);
            }
        }
    });

    RampHandle {
        stop_tx,
        join: Some(join),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct CollectingSink {
        seen: Mutex<Vec<u8>>,
    }

    impl CollectingSink {
        fn new() -> Self {
            Self {
                seen: Mutex::new(Vec::new()),
            }
        }

        fn snapshot(&self) -> Vec<u8> {
            self.seen.lock().unwrap().clone()
        }
    }

    impl ProgressSink for CollectingSink {
        fn on_progress(&self, percent: u8) {
            self.seen.lock().unwrap().push(percent);
        }
    }

    #[test]
    fn test_ramp_step_sequence() {
        let mut percent = RAMP_START;
        let mut seen = vec![percent];
        for _ in 0..20 {
            percent = ramp_step(percent);
            seen.push(percent);
        }

        // 10, 18, 26, … capped at 85 forever after
        assert_eq!(&seen[..5], &[10, 18, 26, 34, 42]);
        assert_eq!(*seen.last().unwrap(), RAMP_CAP);
        assert!(seen.iter().all(|&p| p <= RAMP_CAP));
    }

    #[test]
    fn test_ramp_reports_start_and_climbs() {
        let sink = Arc::new(CollectingSink::new());
        let handle = start_ramp_with_tick(sink.clone(), Duration::from_millis(5));

        // Give it a few ticks
        std::thread::sleep(Duration::from_millis(40));
        handle.stop();

        let seen = sink.snapshot();
        assert_eq!(seen.first(), Some(&RAMP_START));
        assert!(seen.len() > 1, "ramp never ticked: {:?}", seen);
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
        assert!(seen.iter().all(|&p| p <= RAMP_CAP));
    }

    #[test]
    fn test_stop_ends_reporting() {
        let sink = Arc::new(CollectingSink::new());
        let handle = start_ramp_with_tick(sink.clone(), Duration::from_millis(5));
        handle.stop();

        let len = sink.snapshot().len();
        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(sink.snapshot().len(), len);
    }
}
