//! Event surfaces
//!
//! A `Surface` is anything that can register and unregister a callback per
//! named input event. Trackers depend on nothing else from the host.

use crate::input::types::{CursorStyle, EventKind, InputEvent};
use parking_lot::Mutex as ParkingMutex;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Callback invoked synchronously for each dispatched event
pub type Listener = Arc<dyn Fn(&InputEvent) + Send + Sync>;

/// Handle returned by `Surface::add_listener`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}

/// An addressable surface that emits named input events
pub trait Surface: Send + Sync {
    /// Human readable name, used in logs
    fn name(&self) -> &str;

    /// Register `listener` for events of `kind`
    fn add_listener(&self, kind: EventKind, listener: Listener) -> ListenerId;

    /// Unregister a listener. Unknown or already removed ids are a no-op;
    /// returns whether anything was removed.
    fn remove_listener(&self, id: ListenerId) -> bool;

    /// Change the cursor shown over this surface
    fn set_cursor(&self, style: CursorStyle);

    /// Cursor currently shown over this surface
    fn cursor(&self) -> CursorStyle;
}

struct Registration {
    id: ListenerId,
    kind: EventKind,
    listener: Listener,
    /// Set on removal so an in-progress dispatch skips this listener
    removed: Arc<AtomicBool>,
}

/// In-process surface: keeps its listeners in a list and dispatches events
/// handed to it by the host (or by a test).
pub struct EventTarget {
    name: String,
    next_id: AtomicU64,
    listeners: ParkingMutex<Vec<Registration>>,
    cursor: ParkingMutex<CursorStyle>,
}

impl EventTarget {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            next_id: AtomicU64::new(1),
            listeners: ParkingMutex::new(Vec::new()),
            cursor: ParkingMutex::new(CursorStyle::Default),
        }
    }

    /// Convenience for the common `Arc<EventTarget>` construction
    pub fn shared(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::new(name))
    }

    /// Deliver `event` to every listener registered for its kind.
    ///
    /// Listeners are snapshotted first, so a listener may attach or detach
    /// listeners (its own included) while the event is being delivered.
    /// Listeners attached during delivery wait for the next event; listeners
    /// removed during delivery are skipped if they have not run yet.
    /// Returns the number of listeners invoked.
    pub fn dispatch(&self, event: &InputEvent) -> usize {
        let snapshot: Vec<(Arc<AtomicBool>, Listener)> = self
            .listeners
            .lock()
            .iter()
            .filter(|r| r.kind == event.kind)
            .map(|r| (r.removed.clone(), r.listener.clone()))
            .collect();

        tracing::trace!(
            "{}: dispatching {} to {} listener(s)",
            self.name,
            event.kind,
            snapshot.len()
        );

        let mut invoked = 0;
        for (removed, listener) in &snapshot {
            if removed.load(Ordering::SeqCst) {
                continue;
            }
            listener(event);
            invoked += 1;
        }
        invoked
    }

    /// Number of registered listeners across all kinds
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    /// Number of registered listeners for one kind
    pub fn listener_count_for(&self, kind: EventKind) -> usize {
        self.listeners.lock().iter().filter(|r| r.kind == kind).count()
    }
}

impl Surface for EventTarget {
    fn name(&self) -> &str {
        &self.name
    }

    fn add_listener(&self, kind: EventKind, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().push(Registration {
            id,
            kind,
            listener,
            removed: Arc::new(AtomicBool::new(false)),
        });
        tracing::trace!("{}: attached {} for {}", self.name, id, kind);
        id
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock();
        let Some(index) = listeners.iter().position(|r| r.id == id) else {
            return false;
        };
        let registration = listeners.remove(index);
        registration.removed.store(true, Ordering::SeqCst);
        true
    }

    fn set_cursor(&self, style: CursorStyle) {
        *self.cursor.lock() = style;
    }

    fn cursor(&self) -> CursorStyle {
        *self.cursor.lock()
    }
}
