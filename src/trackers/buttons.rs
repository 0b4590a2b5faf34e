//! Pressed-button state for left, middle and right buttons

use super::{Registrations, Tracker, TrackerKind};
use crate::error::TrackerResult;
use crate::input::{EventKind, InputEvent, MouseButton, Surface};
use parking_lot::Mutex as ParkingMutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Which of the three tracked buttons are currently held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ButtonState {
    pub left: bool,
    pub middle: bool,
    pub right: bool,
}

impl ButtonState {
    pub fn is_pressed(&self, button: MouseButton) -> bool {
        match button {
            MouseButton::Left => self.left,
            MouseButton::Middle => self.middle,
            MouseButton::Right => self.right,
        }
    }

    fn set(&mut self, button: MouseButton, pressed: bool) {
        match button {
            MouseButton::Left => self.left = pressed,
            MouseButton::Middle => self.middle = pressed,
            MouseButton::Right => self.right = pressed,
        }
    }

    pub fn any(&self) -> bool {
        self.left || self.middle || self.right
    }
}

pub type ButtonObserver = Arc<dyn Fn(ButtonState, &InputEvent) + Send + Sync>;

#[derive(Default)]
struct Inner {
    state: ParkingMutex<ButtonState>,
    observer: ParkingMutex<Option<ButtonObserver>>,
}

impl Inner {
    fn handle(&self, event: &InputEvent) {
        let Some(button) = MouseButton::from_index(event.button) else {
            tracing::trace!("ignoring unknown button index {}", event.button);
            return;
        };
        let pressed = event.kind == EventKind::PointerDown;

        let snapshot = {
            let mut state = self.state.lock();
            state.set(button, pressed);
            *state
        };

        let observer = self.observer.lock().clone();
        if let Some(observer) = observer {
            observer(snapshot, event);
        }
    }
}

/// Tracks button press/release over a surface
pub struct ButtonTracker {
    id: String,
    inner: Arc<Inner>,
    registrations: Registrations,
}

impl ButtonTracker {
    pub fn new(surface: Arc<dyn Surface>) -> Self {
        Self {
            id: format!("buttons@{}", surface.name()),
            inner: Arc::new(Inner::default()),
            registrations: Registrations::new(surface),
        }
    }

    pub fn on_change<F>(self, observer: F) -> Self
    where
        F: Fn(ButtonState, &InputEvent) + Send + Sync + 'static,
    {
        *self.inner.observer.lock() = Some(Arc::new(observer));
        self
    }

    pub fn state(&self) -> ButtonState {
        *self.inner.state.lock()
    }

    pub fn is_pressed(&self, button: MouseButton) -> bool {
        self.state().is_pressed(button)
    }

    /// Lookup by name (`"left"`, `"middle"`, `"right"`). Unknown names are never pressed.
    pub fn is_pressed_named(&self, name: &str) -> bool {
        name.parse::<MouseButton>()
            .map(|button| self.is_pressed(button))
            .unwrap_or(false)
    }
}

impl Tracker for ButtonTracker {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> TrackerKind {
        TrackerKind::Buttons
    }

    fn start(&mut self) -> TrackerResult<()> {
        self.registrations.activate(&self.id)?;
        for kind in [EventKind::PointerDown, EventKind::PointerUp] {
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
