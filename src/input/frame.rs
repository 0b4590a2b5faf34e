//! Display-refresh scheduling
//!
//! `FrameScheduler` is the "call me back before the next frame" capability.
//! `ManualFrameScheduler` runs queued callbacks when the host (or a test)
//! says a frame happened.

use parking_lot::Mutex as ParkingMutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// One-shot callback run on the next frame
pub type FrameCallback = Box<dyn FnOnce() + Send>;

/// Token for a pending frame request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

pub trait FrameScheduler: Send + Sync {
    /// Run `callback` once, before the next frame
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle;

    /// Drop a pending request. Unknown or already-run handles are a no-op.
    fn cancel_frame(&self, handle: FrameHandle);
}

/// Frame scheduler driven explicitly via `run_frame()`
pub struct ManualFrameScheduler {
    next_handle: AtomicU64,
    pending: ParkingMutex<Vec<(FrameHandle, FrameCallback)>>,
    frames_run: AtomicU64,
}

impl ManualFrameScheduler {
    pub fn new() -> Self {
        Self {
            next_handle: AtomicU64::new(1),
            pending: ParkingMutex::new(Vec::new()),
            frames_run: AtomicU64::new(0),
        }
    }

    /// Run every callback queued before this call.
    ///
    /// Callbacks requested while the frame runs land in the next frame.
    /// Returns how many callbacks ran.
    pub fn run_frame(&self) -> usize {
        let due = std::mem::take(&mut *self.pending.lock());
        let count = due.len();
        for (_, callback) in due {
            callback();
        }
        self.frames_run.fetch_add(1, Ordering::Relaxed);
        count
    }

    /// Run `frames` frames back to back
    pub fn run_frames(&self, frames: usize) -> usize {
        (0..frames).map(|_| self.run_frame()).sum()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }

    pub fn frames_run(&self) -> u64 {
        self.frames_run.load(Ordering::Relaxed)
    }
}

impl Default for ManualFrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameScheduler for ManualFrameScheduler {
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle {
        let handle = FrameHandle(self.next_handle.fetch_add(1, Ordering::Relaxed));
        self.pending.lock().push((handle, callback));
        handle
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        self.pending.lock().retain(|(h, _)| *h != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    #[test]
    fn test_run_frame_runs_pending_once() {
        let scheduler = ManualFrameScheduler::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();
        scheduler.request_frame(Box::new(move || {
            h.fetch_add(1, Ordering::SeqCst);
        }));

        assert_eq!(scheduler.run_frame(), 1);
        assert_eq!(scheduler.run_frame(), 0);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.frames_run(), 2);
    }

    #[test]
    fn test_cancelled_frame_never_runs() {
        let scheduler = ManualFrameScheduler::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();
        let handle = scheduler.request_frame(Box::new(move || {
            h.fetch_add(1, Ordering::SeqCst);
        }));

        scheduler.cancel_frame(handle);
        scheduler.cancel_frame(handle);
        assert_eq!(scheduler.pending_count(), 0);
        scheduler.run_frame();
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_request_during_frame_is_deferred() {
        let scheduler = Arc::new(ManualFrameScheduler::new());
        let hits = Arc::new(AtomicUsize::new(0));

        let s = scheduler.clone();
        let h = hits.clone();
        scheduler.request_frame(Box::new(move || {
            h.fetch_add(1, Ordering::SeqCst);
            let h2 = h.clone();
            s.request_frame(Box::new(move || {
                h2.fetch_add(1, Ordering::SeqCst);
            }));
        }));

        assert_eq!(scheduler.run_frame(), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.pending_count(), 1);
        assert_eq!(scheduler.run_frame(), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }
}
