//! Hover state from enter/leave events

use super::{Registrations, Tracker, TrackerKind};
use crate::error::TrackerResult;
use crate::input::{EventKind, InputEvent, Surface};
use parking_lot::Mutex as ParkingMutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub type HoverObserver = Arc<dyn Fn(bool, &InputEvent) + Send + Sync>;

#[derive(Default)]
struct Inner {
    hovering: AtomicBool,
    observer: ParkingMutex<Option<HoverObserver>>,
}

impl Inner {
    fn set_hovering(&self, hovering: bool, event: &InputEvent) {
        self.hovering.store(hovering, Ordering::SeqCst);
        let observer = self.observer.lock().clone();
        if let Some(observer) = observer {
            observer(hovering, event);
        }
    }
}

/// Reports whether the pointer is over a surface
pub struct HoverTracker {
    id: String,
    inner: Arc<Inner>,
    registrations: Registrations,
}

impl HoverTracker {
    pub fn new(surface: Arc<dyn Surface>) -> Self {
        Self {
            id: format!("hover@{}", surface.name()),
            inner: Arc::new(Inner::default()),
            registrations: Registrations::new(surface),
        }
    }

    pub fn on_change<F>(self, observer: F) -> Self
    where
        F: Fn(bool, &InputEvent) + Send + Sync + 'static,
    {
        *self.inner.observer.lock() = Some(Arc::new(observer));
        self
    }

    pub fn is_hovering(&self) -> bool {
        self.inner.hovering.load(Ordering::SeqCst)
    }
}

impl Tracker for HoverTracker {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> TrackerKind {
        TrackerKind::Hover
    }

    fn start(&mut self) -> TrackerResult<()> {
        self.registrations.activate(&self.id)?;
        self.registrations
            .attach(EventKind::PointerEnter, &self.inner, |inner, event| inner.set_hovering(true, event));
        self.registrations
            .attach(EventKind::PointerLeave, &self.inner, |inner, event| inner.set_hovering(false, event));
        Ok(())
    }

    fn stop(&mut self) {
        self.registrations.deactivate(&self.id);
    }

    fn is_active(&self) -> bool {
        self.registrations.is_active()
    }
}
