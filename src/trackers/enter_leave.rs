use super::{Registrations, Tracker, TrackerKind};
use crate::error::TrackerResult;
use crate::input::{EventKind, InputEvent, Position, Surface};
use parking_lot::Mutex as ParkingMutex;
use std::sync::Arc;

pub type EventObserver = Arc<dyn Fn(&InputEvent) + Send + Sync>;

#[derive(Default)]
struct Inner {
    last_boundary: ParkingMutex<Option<Position>>,
    on_enter: ParkingMutex<Option<EventObserver>>,
    on_leave: ParkingMutex<Option<EventObserver>>,
}

impl Inner {
    fn handle(&self, event: &InputEvent) {
        *self.last_boundary.lock() = Some(event.position);
        let observer = match event.kind {
            EventKind::PointerEnter => self.on_enter.lock().clone(),
            EventKind::PointerLeave => self.on_leave.lock().clone(),
            _ => None,
        };
        if let Some(observer) = observer {
            observer(event);
        }
    }
}

/// Forwards enter and leave events to separate observers
pub struct EnterLeaveTracker {
    id: String,
    inner: Arc<Inner>,
    registrations: Registrations,
}

impl EnterLeaveTracker {
    pub fn new(surface: Arc<dyn Surface>) -> Self {
        Self {
            id: format!("enter-leave@{}", surface.name()),
            inner: Arc::new(Inner::default()),
            registrations: Registrations::new(surface),
        }
    }

    pub fn on_enter<F>(self, observer: F) -> Self
    where
        F: Fn(&InputEvent) + Send + Sync + 'static,
    {
        *self.inner.on_enter.lock() = Some(Arc::new(observer));
        self
    }

    pub fn on_leave<F>(self, observer: F) -> Self
    where
        F: Fn(&InputEvent) + Send + Sync + 'static,
    {
        *self.inner.on_leave.lock() = Some(Arc::new(observer));
        self
    }

    /// Where the pointer last crossed the surface boundary
    pub fn last_boundary(&self) -> Option<Position> {
        *self.inner.last_boundary.lock()
    }
}

impl Tracker for EnterLeaveTracker {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> TrackerKind {
        TrackerKind::EnterLeave
    }

    fn start(&mut self) -> TrackerResult<()> {
        self.registrations.activate(&self.id)?;
        for kind in [EventKind::PointerEnter, EventKind::PointerLeave] {
            self.registrations
                .attach(kind, &self.inner, |inner, event| inner.handle(event));
        }
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
    fn test_routes_enter_and_leave() {
        let target = EventTarget::shared("panel");
        let entered = Recorder::new();
        let left = Recorder::new();
        let (enter_sink, leave_sink) = (entered.sink(), left.sink());
        let mut tracker = EnterLeaveTracker::new(target.clone())
            .on_enter(move |e| enter_sink(e.position))
            .on_leave(move |e| leave_sink(e.position));
        tracker.start().unwrap();

        target.dispatch(&InputEvent::pointer_enter(0.0, 10.0));
        target.dispatch(&InputEvent::pointer_leave(100.0, 12.0));

        assert_eq!(entered.calls(), vec![Position::new(0.0, 10.0)]);
        assert_eq!(left.calls(), vec![Position::new(100.0, 12.0)]);
        assert_eq!(tracker.last_boundary(), Some(Position::new(100.0, 12.0)));
    }

    #[test]
    fn test_missing_observer_is_legal() {
        let target = EventTarget::shared("panel");
        let mut tracker = EnterLeaveTracker::new(target.clone());
        tracker.start().unwrap();
        target.dispatch(&InputEvent::pointer_enter(4.0, 4.0));
        assert_eq!(tracker.last_boundary(), Some(Position::new(4.0, 4.0)));
    }

    #[test]
    fn test_stop_before_start_is_noop() {
        let target = EventTarget::shared("panel");
        let mut tracker = EnterLeaveTracker::new(target.clone());
        tracker.stop();
        assert!(!tracker.is_active());
        assert_eq!(target.listener_count(), 0);
    }

    #[test]
    fn test_stop_twice() {
        let target = EventTarget::shared("panel");
        let entered = Recorder::new();
        let left = Recorder::new();
        let (enter_sink, leave_sink) = (entered.sink(), left.sink());
        let mut tracker = EnterLeaveTracker::new(target.clone())
            .on_enter(move |e| enter_sink(e.position))
            .on_leave(move |e| leave_sink(e.position));
        tracker.start().unwrap();
        tracker.stop();
        tracker.stop();

        target.dispatch(&InputEvent::pointer_enter(0.0, 0.0));
        target.dispatch(&InputEvent::pointer_leave(5.0, 0.0));

        assert!(!tracker.is_active());
        assert_eq!(entered.len(), 0);
        assert_eq!(left.len(), 0);
        assert_eq!(target.listener_count(), 0);
        assert_eq!(tracker.last_boundary(), None);
    }
}
