//! Sliding-window click counter
//!
//! Keeps the timestamps of recent clicks and drops every entry whose age has
//! reached the window. Eviction runs on every read as well as on every
//! recorded click, so `count()` stays correct even when no new clicks arrive.

use super::{Registrations, Tracker, TrackerKind};
use crate::error::{TrackerError, TrackerResult};
use crate::input::{Clock, EventKind, InputEvent, Surface};
use parking_lot::Mutex as ParkingMutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Default trailing window in milliseconds
pub const DEFAULT_CLICK_WINDOW_MS: f64 = 2000.0;

pub type CountObserver = Arc<dyn Fn(usize, &InputEvent) + Send + Sync>;

struct Inner {
    clock: Arc<dyn Clock>,
    window_ms: f64,
    log: ParkingMutex<VecDeque<f64>>,
    observer: ParkingMutex<Option<CountObserver>>,
}

impl Inner {
    fn evict(&self, log: &mut VecDeque<f64>, now: f64) {
        let window = self.window_ms;
        log.retain(|&ts| now - ts < window);
    }

    fn record(&self, event: &InputEvent) -> usize {
        let now = self.clock.now_ms();
        let count = {
            let mut log = self.log.lock();
            log.push_back(now);
            self.evict(&mut log, now);
            log.len()
        };
        tracing::trace!("click recorded at {}ms, {} in window", now, count);

        let observer = self.observer.lock().clone();
        if let Some(observer) = observer {
            observer(count, event);
        }
        count
    }

    fn count(&self) -> usize {
        let now = self.clock.now_ms();
        let mut log = self.log.lock();
        self.evict(&mut log, now);
        log.len()
    }
}

/// Counts clicks within a trailing time window
pub struct ClickCounter {
    id: String,
    inner: Arc<Inner>,
    registrations: Registrations,
}

impl ClickCounter {
    /// `window_ms` must be finite and strictly positive
    pub fn new(surface: Arc<dyn Surface>, clock: Arc<dyn Clock>, window_ms: f64) -> TrackerResult<Self> {
        if !window_ms.is_finite() || window_ms <= 0.0 {
            tracing::warn!("rejecting click window of {}ms", window_ms);
            return Err(TrackerError::InvalidWindow(window_ms));
        }
        Ok(Self::build(surface, clock, window_ms))
    }

    /// Counter with the default 2000ms window
    pub fn with_default_window(surface: Arc<dyn Surface>, clock: Arc<dyn Clock>) -> Self {
        Self::build(surface, clock, DEFAULT_CLICK_WINDOW_MS)
    }

    fn build(surface: Arc<dyn Surface>, clock: Arc<dyn Clock>, window_ms: f64) -> Self {
        Self {
            id: format!("click-counter@{}", surface.name()),
            inner: Arc::new(Inner {
                clock,
                window_ms,
                log: ParkingMutex::new(VecDeque::new()),
                observer: ParkingMutex::new(None),
            }),
            registrations: Registrations::new(surface),
        }
    }

    /// Observe `(count, click)` after every recorded click
    pub fn on_count<F>(self, observer: F) -> Self
    where
        F: Fn(usize, &InputEvent) + Send + Sync + 'static,
    {
        *self.inner.observer.lock() = Some(Arc::new(observer));
        self
    }

    pub fn window_ms(&self) -> f64 {
        self.inner.window_ms
    }

    /// Record a click now and return the count within the window
    pub fn record(&self, event: &InputEvent) -> usize {
        self.inner.record(event)
    }

    /// Clicks within the window at this moment. Never notifies.
    pub fn count(&self) -> usize {
        self.inner.count()
    }

    pub fn reset(&self) {
        self.inner.log.lock().clear();
    }
}

impl Tracker for ClickCounter {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> TrackerKind {
        TrackerKind::ClickCounter
    }

    fn start(&mut self) -> TrackerResult<()> {
        self.registrations.activate(&self.id)?;
        self.registrations.attach(EventKind::Click, &self.inner, |inner, event| {
            inner.record(event);
        });
        Ok(())
    }

    fn stop(&mut self) {
        self.registrations.deactivate(&self.id);
    }

    fn is_active(&self) -> bool {
        self.registrations.is_active()
    }
}
