//! Drag session tracking
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Dragging   (press on the target; global move/up listeners attached)
//! Dragging -> Dragging (move anywhere on the global surface)
//! Dragging -> Idle   (release on the global surface; global listeners detached)
//! Any -> Idle        (stop(); no end notification)
//! ```
//!
//! Moves and releases only count once a press on the target started a
//! session, so the global surface is passed in explicitly rather than being
//! an ambient singleton.

use super::{Registrations, Tracker, TrackerKind};
use crate::error::TrackerResult;
use crate::input::{EventKind, InputEvent, Position, Surface};
use parking_lot::Mutex as ParkingMutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// An in-progress drag gesture
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragSession {
    pub start: Position,
    pub current: Position,
    pub active: bool,
}

impl DragSession {
    fn begin(at: Position) -> Self {
        Self {
            start: at,
            current: at,
            active: true,
        }
    }

    pub fn delta(&self) -> Position {
        self.current - self.start
    }

    fn update(&self) -> DragUpdate {
        DragUpdate {
            start: self.start,
            current: self.current,
            delta: self.delta(),
        }
    }
}

/// Reported on every drag move and at the end of the drag
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragUpdate {
    pub start: Position,
    pub current: Position,
    pub delta: Position,
}

pub type DragStartObserver = Arc<dyn Fn(Position) + Send + Sync>;
pub type DragObserver = Arc<dyn Fn(DragUpdate) + Send + Sync>;

struct DragState {
    session: Option<DragSession>,
    global: Registrations,
}

struct Inner {
    state: ParkingMutex<DragState>,
    on_start: ParkingMutex<Option<DragStartObserver>>,
    on_drag: ParkingMutex<Option<DragObserver>>,
    on_end: ParkingMutex<Option<DragObserver>>,
}

impl Inner {
    fn handle_press(this: &Arc<Inner>, event: &InputEvent) {
        {
            let mut state = this.state.lock();
            if state.session.is_some() {
                return;
            }
            state.session = Some(DragSession::begin(event.position));
            state.global.attach(EventKind::PointerMove, this, |inner, event| inner.handle_move(event));
            state.global.attach(EventKind::PointerUp, this, |inner, event| inner.handle_release(event));
        }
        tracing::trace!("drag started at ({}, {})", event.position.x, event.position.y);

        let observer = this.on_start.lock().clone();
        if let Some(observer) = observer {
            observer(event.position);
        }
    }

    fn handle_move(&self, event: &InputEvent) {
        let update = {
            let mut state = self.state.lock();
            let Some(session) = state.session.as_mut() else {
                return;
            };
            session.current = event.position;
            session.update()
        };

        let observer = self.on_drag.lock().clone();
        if let Some(observer) = observer {
            observer(update);
        }
    }

    fn handle_release(&self, event: &InputEvent) {
        let update = {
            let mut state = self.state.lock();
            let Some(mut session) = state.session.take() else {
                return;
            };
            session.current = event.position;
            state.global.detach_all();
            session.update()
        };
        tracing::trace!("drag ended, delta ({}, {})", update.delta.x, update.delta.y);

        let observer = self.on_end.lock().clone();
        if let Some(observer) = observer {
            observer(update);
        }
    }
}

/// Tracks press-move-release gestures that start on a target surface
pub struct DragTracker {
    id: String,
    inner: Arc<Inner>,
    registrations: Registrations,
}

impl DragTracker {
    /// `global` receives move/release events for the whole window or document
    pub fn new(target: Arc<dyn Surface>, global: Arc<dyn Surface>) -> Self {
        Self {
            id: format!("drag@{}", target.name()),
            inner: Arc::new(Inner {
                state: ParkingMutex::new(DragState {
                    session: None,
                    global: Registrations::new(global),
                }),
                on_start: ParkingMutex::new(None),
                on_drag: ParkingMutex::new(None),
                on_end: ParkingMutex::new(None),
            }),
            registrations: Registrations::new(target),
        }
    }

    pub fn on_start<F>(self, observer: F) -> Self
    where
        F: Fn(Position) + Send + Sync + 'static,
    {
        *self.inner.on_start.lock() = Some(Arc::new(observer));
        self
    }

    pub fn on_drag<F>(self, observer: F) -> Self
    where
        F: Fn(DragUpdate) + Send + Sync + 'static,
    {
        *self.inner.on_drag.lock() = Some(Arc::new(observer));
        self
    }

    pub fn on_end<F>(self, observer: F) -> Self
    where
        F: Fn(DragUpdate) + Send + Sync + 'static,
    {
        *self.inner.on_end.lock() = Some(Arc::new(observer));
        self
    }

    pub fn session(&self) -> Option<DragSession> {
        self.inner.state.lock().session
    }

    pub fn is_dragging(&self) -> bool {
        self.session().is_some()
    }
}

impl Tracker for DragTracker {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> TrackerKind {
        TrackerKind::Drag
    }

    fn start(&mut self) -> TrackerResult<()> {
        self.registrations.activate(&self.id)?;
        self.registrations
            .attach(EventKind::PointerDown, &self.inner, Inner::handle_press);
        Ok(())
    }

    fn stop(&mut self) {
        self.registrations.deactivate(&self.id);
        let mut state = self.inner.state.lock();
        state.global.detach_all();
        state.session = None;
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

    struct Harness {
        target: Arc<EventTarget>,
        global: Arc<EventTarget>,
        tracker: DragTracker,
        starts: Recorder<Position>,
        drags: Recorder<DragUpdate>,
        ends: Recorder<DragUpdate>,
    }

    fn harness() -> Harness {
        let target = EventTarget::shared("handle");
        let global = EventTarget::shared("document");
        let (starts, drags, ends) = (Recorder::new(), Recorder::new(), Recorder::new());
        let mut tracker = DragTracker::new(target.clone(), global.clone())
            .on_start(starts.sink())
            .on_drag(drags.sink())
            .on_end(ends.sink());
        tracker.start().unwrap();
        Harness {
            target,
            global,
            tracker,
            starts,
            drags,
            ends,
        }
    }

    #[test]
    fn test_press_move_release() {
        let h = harness();
        h.target.dispatch(&InputEvent::pointer_down(5.0, 5.0, 0));
        h.global.dispatch(&InputEvent::pointer_move(15.0, 5.0));
        h.global.dispatch(&InputEvent::pointer_up(15.0, 5.0, 0));
        h.global.dispatch(&InputEvent::pointer_move(30.0, 30.0));

        assert_eq!(h.starts.calls(), vec![Position::new(5.0, 5.0)]);
        let drags = h.drags.calls();
        assert_eq!(drags.len(), 1);
        assert_eq!(drags[0].delta, Position::new(10.0, 0.0));
        let ends = h.ends.calls();
        assert_eq!(ends.len(), 1);
        assert_eq!(ends[0].delta, Position::new(10.0, 0.0));
        assert!(!h.tracker.is_dragging());
    }

    #[test]
    fn test_global_listeners_only_during_drag() {
        let h = harness();
        assert_eq!(h.global.listener_count(), 0);

        h.target.dispatch(&InputEvent::pointer_down(0.0, 0.0, 0));
        assert_eq!(h.global.listener_count(), 2);
        let session = h.tracker.session().unwrap();
        assert!(session.active);
        assert_eq!(session.start, session.current);

        h.global.dispatch(&InputEvent::pointer_up(0.0, 0.0, 0));
        assert_eq!(h.global.listener_count(), 0);
    }

    #[test]
    fn test_idle_moves_and_releases_are_ignored() {
        let h = harness();
        h.global.dispatch(&InputEvent::pointer_move(1.0, 1.0));
        h.global.dispatch(&InputEvent::pointer_up(1.0, 1.0, 0));
        assert_eq!(h.drags.len(), 0);
        assert_eq!(h.ends.len(), 0);
    }

    #[test]
    fn test_second_press_does_not_restart() {
        let h = harness();
        h.target.dispatch(&InputEvent::pointer_down(0.0, 0.0, 0));
        h.target.dispatch(&InputEvent::pointer_down(50.0, 50.0, 2));
        assert_eq!(h.starts.len(), 1);
        assert_eq!(h.global.listener_count(), 2);
        assert_eq!(h.tracker.session().map(|s| s.start), Some(Position::default()));
    }

    #[test]
    fn test_same_surface_for_target_and_global() {
        let surface = EventTarget::shared("window");
        let ends = Recorder::new();
        let mut tracker = DragTracker::new(surface.clone(), surface.clone()).on_end(ends.sink());
        tracker.start().unwrap();

        surface.dispatch(&InputEvent::pointer_down(2.0, 2.0, 0));
        surface.dispatch(&InputEvent::pointer_move(4.0, 8.0));
        surface.dispatch(&InputEvent::pointer_up(4.0, 8.0, 0));

        assert_eq!(ends.calls()[0].delta, Position::new(2.0, 6.0));
        assert_eq!(surface.listener_count(), 1, "only the press listener remains");
    }

    #[test]
    fn test_stop_mid_drag_discards_session_silently() {
        let mut h = harness();
        h.target.dispatch(&InputEvent::pointer_down(0.0, 0.0, 0));
        h.global.dispatch(&InputEvent::pointer_move(3.0, 0.0));

        h.tracker.stop();
        h.tracker.stop();

        assert!(h.tracker.session().is_none());
        assert_eq!(h.ends.len(), 0, "stop never fires on_end");
        assert_eq!(h.target.listener_count(), 0);
        assert_eq!(h.global.listener_count(), 0);

        h.target.dispatch(&InputEvent::pointer_down(0.0, 0.0, 0));
        h.global.dispatch(&InputEvent::pointer_up(1.0, 0.0, 0));
        assert_eq!(h.starts.len(), 1);
        assert_eq!(h.ends.len(), 0);
    }
}
