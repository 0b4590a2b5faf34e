//! Click, double-click and context-menu forwarding

use super::{Registrations, Tracker, TrackerKind};
use crate::error::TrackerResult;
use crate::input::{EventKind, InputEvent, Surface};
use parking_lot::Mutex as ParkingMutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub type ClickObserver = Arc<dyn Fn(&InputEvent) + Send + Sync>;

#[derive(Default)]
struct Inner {
    prevent_context_menu: AtomicBool,
    on_click: ParkingMutex<Option<ClickObserver>>,
    on_double_click: ParkingMutex<Option<ClickObserver>>,
    on_context_menu: ParkingMutex<Option<ClickObserver>>,
}

impl Inner {
    fn handle(&self, event: &InputEvent) {
        let observer = match event.kind {
            EventKind::Click => self.on_click.lock().clone(),
            EventKind::DoubleClick => self.on_double_click.lock().clone(),
            EventKind::ContextMenu => {
                if self.prevent_context_menu.load(Ordering::Relaxed) {
                    event.prevent_default();
                }
                self.on_context_menu.lock().clone()
            }
            _ => None,
        };
        if let Some(observer) = observer {
            observer(event);
        }
    }
}

/// Forwards primary, double and secondary clicks to their own observers
pub struct ClickTracker {
    id: String,
    inner: Arc<Inner>,
    registrations: Registrations,
}

impl ClickTracker {
    pub fn new(surface: Arc<dyn Surface>) -> Self {
        Self {
            id: format!("clicks@{}", surface.name()),
            inner: Arc::new(Inner::default()),
            registrations: Registrations::new(surface),
        }
    }

    /// Cancel the host's context menu when a secondary click arrives
    pub fn prevent_context_menu(self, prevent: bool) -> Self {
        self.inner
            .prevent_context_menu
            .store(prevent, Ordering::Relaxed);
        self
    }

    pub fn on_click<F>(self, observer: F) -> Self
    where
        F: Fn(&InputEvent) + Send + Sync + 'static,
    {
        *self.inner.on_click.lock() = Some(Arc::new(observer));
        self
    }

    pub fn on_double_click<F>(self, observer: F) -> Self
    where
        F: Fn(&InputEvent) + Send + Sync + 'static,
    {
        *self.inner.on_double_click.lock() = Some(Arc::new(observer));
        self
    }

    pub fn on_context_menu<F>(self, observer: F) -> Self
    where
        F: Fn(&InputEvent) + Send + Sync + 'static,
    {
        *self.inner.on_context_menu.lock() = Some(Arc::new(observer));
        self
    }
}

impl Tracker for ClickTracker {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> TrackerKind {
        TrackerKind::Clicks
    }

    fn start(&mut self) -> TrackerResult<()> {
        self.registrations.activate(&self.id)?;
        for kind in [EventKind::Click, EventKind::DoubleClick, EventKind::ContextMenu] {
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
