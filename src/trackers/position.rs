//! Last known pointer position

use super::{Registrations, Tracker, TrackerKind};
use crate::error::TrackerResult;
use crate::input::{EventKind, InputEvent, Position, Surface};
use parking_lot::Mutex as ParkingMutex;
use std::sync::Arc;

pub type PositionObserver = Arc<dyn Fn(Position, &InputEvent) + Send + Sync>;

#[derive(Default)]
struct Inner {
    position: ParkingMutex<Position>,
    observer: ParkingMutex<Option<PositionObserver>>,
}

impl Inner {
    fn handle_move(&self, event: &InputEvent) {
        *self.position.lock() = event.position;
        let observer = self.observer.lock().clone();
        if let Some(observer) = observer {
            observer(event.position, event);
        }
    }
}

/// Caches the pointer position from every move event over a surface
pub struct PositionTracker {
    id: String,
    inner: Arc<Inner>,
    registrations: Registrations,
}

impl PositionTracker {
    pub fn new(surface: Arc<dyn Surface>) -> Self {
        Self {
            id: format!("position@{}", surface.name()),
            inner: Arc::new(Inner::default()),
            registrations: Registrations::new(surface),
        }
    }

    /// Observe every move with the new position
    pub fn on_move<F>(self, observer: F) -> Self
    where
        F: Fn(Position, &InputEvent) + Send + Sync + 'static,
    {
        *self.inner.observer.lock() = Some(Arc::new(observer));
        self
    }

    pub fn position(&self) -> Position {
        *self.inner.position.lock()
    }
}

impl Tracker for PositionTracker {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> TrackerKind {
        TrackerKind::Position
    }

    fn start(&mut self) -> TrackerResult<()> {
        self.registrations.activate(&self.id)?;
        self.registrations
            .attach(EventKind::PointerMove, &self.inner, |inner, event| inner.handle_move(event));
        Ok(())
    }

    fn stop(&mut self) {
        self.registrations.deactivate(&self.id);
    }

    fn is_active(&self) -> bool {
        self.registrations.is_active()
    }
}
