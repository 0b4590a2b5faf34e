//! Wheel deltas and scroll direction

use super::{Registrations, Tracker, TrackerKind};
use crate::error::TrackerResult;
use crate::input::{EventKind, InputEvent, Surface};
use parking_lot::Mutex as ParkingMutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    Up,
    Down,
}

/// One wheel event as reported to observers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WheelReport {
    pub delta_x: f64,
    pub delta_y: f64,
    pub delta_z: f64,
    pub direction: ScrollDirection,
}

impl WheelReport {
    /// Direction only looks at the vertical axis
    pub fn from_event(event: &InputEvent) -> Self {
        let wheel = event.wheel.unwrap_or_default();
        let direction = if wheel.delta_y > 0.0 {
            ScrollDirection::Down
        } else {
            ScrollDirection::Up
        };
        Self {
            delta_x: wheel.delta_x,
            delta_y: wheel.delta_y,
            delta_z: wheel.delta_z,
            direction,
        }
    }
}

pub type WheelObserver = Arc<dyn Fn(WheelReport, &InputEvent) + Send + Sync>;

#[derive(Default)]
struct Inner {
    last: ParkingMutex<Option<WheelReport>>,
    observer: ParkingMutex<Option<WheelObserver>>,
}

impl Inner {
    fn handle(&self, event: &InputEvent) {
        let report = WheelReport::from_event(event);
        *self.last.lock() = Some(report);
        let observer = self.observer.lock().clone();
        if let Some(observer) = observer {
            observer(report, event);
        }
    }
}

pub struct WheelTracker {
    id: String,
    inner: Arc<Inner>,
    registrations: Registrations,
}

impl WheelTracker {
    pub fn new(surface: Arc<dyn Surface>) -> Self {
        Self {
            id: format!("wheel@{}", surface.name()),
            inner: Arc::new(Inner::default()),
            registrations: Registrations::new(surface),
        }
    }

    pub fn on_wheel<F>(self, observer: F) -> Self
    where
        F: Fn(WheelReport, &InputEvent) + Send + Sync + 'static,
    {
        *self.inner.observer.lock() = Some(Arc::new(observer));
        self
    }

    pub fn last(&self) -> Option<WheelReport> {
        *self.inner.last.lock()
    }
}

impl Tracker for WheelTracker {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> TrackerKind {
        TrackerKind::Wheel
    }

    fn start(&mut self) -> TrackerResult<()> {
        self.registrations.activate(&self.id)?;
        self.registrations
            .attach(EventKind::Wheel, &self.inner, |inner, event| inner.handle(event));
        Ok(())
    }

    fn stop(&mut self) {
        self.registrations.deactivate(&self.id);
    }

    fn is_active(&self) -> bool {
        self.registrations.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::EventTarget;
    use crate::trackers::test_support::Recorder;

    #[test]
    fn test_direction_from_vertical_delta() {
        let target = EventTarget::shared("list");
        let seen = Recorder::new();
        let sink = seen.sink();
        let mut tracker = WheelTracker::new(target.clone()).on_wheel(move |r, _| sink(r.direction));
        tracker.start().unwrap();

        target.dispatch(&InputEvent::wheel(0.0, 12.0, 0.0));
        target.dispatch(&InputEvent::wheel(0.0, -3.0, 0.0));
        // Horizontal-only scroll still reports "up"
        target.dispatch(&InputEvent::wheel(40.0, 0.0, 0.0));

        assert_eq!(
            seen.calls(),
            vec![ScrollDirection::Down, ScrollDirection::Up, ScrollDirection::Up]
        );
        let last = tracker.last().unwrap();
        assert_eq!(last.delta_x, 40.0);
        assert_eq!(last.delta_y, 0.0);
    }

    #[test]
    fn test_stop_twice() {
        let target = EventTarget::shared("list");
        let mut tracker = WheelTracker::new(target.clone());
        tracker.start().unwrap();
        tracker.stop();
        tracker.stop();
        target.dispatch(&InputEvent::wheel(0.0, 1.0, 0.0));
        assert!(tracker.last().is_none());
        assert_eq!(target.listener_count(), 0);
    }
}
