//! Pointer trackers
//!
//! Each tracker attaches listeners to a surface, keeps a small piece of
//! derived state and reports it to user-supplied observers. Trackers are
//! independent of each other.

pub mod buttons;
pub mod click_counter;
pub mod clicks;
pub mod cursor;
pub mod drag;
pub mod enter_leave;
pub mod follower;
pub mod hover;
pub mod movement;
pub mod position;
pub mod wheel;

pub use buttons::{ButtonState, ButtonTracker};
pub use click_counter::{ClickCounter, DEFAULT_CLICK_WINDOW_MS};
pub use clicks::ClickTracker;
pub use cursor::CursorStyler;
pub use drag::{DragSession, DragTracker, DragUpdate};
pub use enter_leave::EnterLeaveTracker;
pub use follower::{CursorFollower, FollowerConfig, DEFAULT_SMOOTHING_FACTOR};
pub use hover::HoverTracker;
pub use movement::{MovementSample, MovementTracker};
pub use position::PositionTracker;
pub use wheel::{ScrollDirection, WheelReport, WheelTracker};

use crate::error::{TrackerError, TrackerResult};
use crate::input::{EventKind, InputEvent, ListenerId, Surface};
use std::sync::{Arc, Weak};

/// Common lifecycle of every tracker
///
/// `start()` attaches listeners; `stop()` detaches them and cancels any
/// scheduled work. `stop()` is safe to call repeatedly and before `start()`.
pub trait Tracker: Send + Sync {
    /// Get the tracker identifier (e.g., "hover@card"), used in logs
    fn id(&self) -> &str;

    /// Get the tracker type
    fn kind(&self) -> TrackerKind;

    /// Attach listeners (and schedule frame work, where the tracker has any).
    /// Fails with `AlreadyActive` if the tracker is already started.
    fn start(&mut self) -> TrackerResult<()>;

    /// Detach listeners and cancel scheduled work. Never notifies observers.
    fn stop(&mut self);

    /// Check if the tracker is currently attached
    fn is_active(&self) -> bool;
}

/// Types of trackers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerKind {
    Position,
    Hover,
    EnterLeave,
    Buttons,
    Wheel,
    Clicks,
    Cursor,
    ClickCounter,
    Movement,
    Follower,
    Drag,
}

impl std::fmt::Display for TrackerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackerKind::Position => write!(f, "position"),
            TrackerKind::Hover => write!(f, "hover"),
            TrackerKind::EnterLeave => write!(f, "enter-leave"),
            TrackerKind::Buttons => write!(f, "buttons"),
            TrackerKind::Wheel => write!(f, "wheel"),
            TrackerKind::Clicks => write!(f, "clicks"),
            TrackerKind::Cursor => write!(f, "cursor"),
            TrackerKind::ClickCounter => write!(f, "click-counter"),
            TrackerKind::Movement => write!(f, "movement"),
            TrackerKind::Follower => write!(f, "follower"),
            TrackerKind::Drag => write!(f, "drag"),
        }
    }
}

/// Listener ids a tracker attached to one surface, plus its active flag
pub(crate) struct Registrations {
    surface: Arc<dyn Surface>,
    ids: Vec<ListenerId>,
    active: bool,
}

impl Registrations {
    pub(crate) fn new(surface: Arc<dyn Surface>) -> Self {
        Self {
            surface,
            ids: Vec::new(),
            active: false,
        }
    }

    /// Mark the owning tracker started; fails if it already is
    pub(crate) fn activate(&mut self, tracker_id: &str) -> TrackerResult<()> {
        if self.active {
            return Err(TrackerError::AlreadyActive(tracker_id.to_string()));
        }
        self.active = true;
        tracing::debug!("{} started", tracker_id);
        Ok(())
    }

    /// Detach everything and mark the owning tracker stopped. Idempotent.
    pub(crate) fn deactivate(&mut self, tracker_id: &str) {
        self.detach_all();
        if self.active {
            self.active = false;
            tracing::debug!("{} stopped", tracker_id);
        }
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn surface(&self) -> &Arc<dyn Surface> {
        &self.surface
    }

    /// Attach a listener that forwards to `handler` while `inner` is alive.
    ///
    /// Listeners hold a weak reference so a surface never keeps a dropped
    /// tracker's state alive.
    pub(crate) fn attach<T, F>(&mut self, kind: EventKind, inner: &Arc<T>, handler: F)
    where
        T: Send + Sync + 'static,
        F: Fn(&Arc<T>, &InputEvent) + Send + Sync + 'static,
    {
        let weak: Weak<T> = Arc::downgrade(inner);
        let id = self.surface.add_listener(
            kind,
            Arc::new(move |event: &InputEvent| {
                if let Some(inner) = weak.upgrade() {
                    handler(&inner, event);
                }
            }),
        );
        self.ids.push(id);
    }

    /// Detach everything attached so far. Idempotent.
    pub(crate) fn detach_all(&mut self) {
        for id in self.ids.drain(..) {
            self.surface.remove_listener(id);
        }
    }
}
