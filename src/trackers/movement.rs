//! Pointer velocity, speed and heading
//!
//! Velocity is derived from two consecutive move events:
//! `(p1 - p0) / (t1 - t0)` in pixels per millisecond. Events that share a
//! timestamp update the reference point but emit nothing.

use super::{Registrations, Tracker, TrackerKind};
use crate::error::TrackerResult;
use crate::input::{Clock, EventKind, InputEvent, Position, Surface, Velocity};
use parking_lot::Mutex as ParkingMutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One emitted movement measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementSample {
    pub velocity: Velocity,
    /// Euclidean norm of `velocity`
    pub speed: f64,
    /// Heading in degrees, -180..=180, 0 = +x, 90 = +y
    pub angle: f64,
    pub position: Position,
}

impl MovementSample {
    /// Returns `None` when `delta_ms` is zero
    pub fn between(from: Position, to: Position, delta_ms: f64) -> Option<Self> {
        if delta_ms == 0.0 {
            return None;
        }
        let delta = to - from;
        let velocity = Velocity {
            x: delta.x / delta_ms,
            y: delta.y / delta_ms,
        };
        Some(Self {
            velocity,
            speed: velocity.speed(),
            angle: delta.y.atan2(delta.x).to_degrees(),
            position: to,
        })
    }
}

pub type MovementObserver = Arc<dyn Fn(MovementSample, &InputEvent) + Send + Sync>;

#[derive(Default)]
struct MovementState {
    /// Previous event position and time
    last: Option<(Position, f64)>,
    velocity: Velocity,
}

struct Inner {
    clock: Arc<dyn Clock>,
    state: ParkingMutex<MovementState>,
    observer: ParkingMutex<Option<MovementObserver>>,
}

impl Inner {
    fn handle_move(&self, event: &InputEvent) {
        let now = self.clock.now_ms();
        let sample = {
            let mut state = self.state.lock();
            let previous = state.last.replace((event.position, now));
            let sample = previous.and_then(|(last_pos, last_time)| {
                MovementSample::between(last_pos, event.position, now - last_time)
            });
            if let Some(sample) = sample {
                state.velocity = sample.velocity;
            }
            sample
        };

        let Some(sample) = sample else {
            tracing::trace!("skipping movement sample at {}ms", now);
            return;
        };
        let observer = self.observer.lock().clone();
        if let Some(observer) = observer {
            observer(sample, event);
        }
    }
}

/// Derives velocity, speed and angle from consecutive move events
pub struct MovementTracker {
    id: String,
    inner: Arc<Inner>,
    registrations: Registrations,
}

impl MovementTracker {
    pub fn new(surface: Arc<dyn Surface>, clock: Arc<dyn Clock>) -> Self {
        Self {
            id: format!("movement@{}", surface.name()),
            inner: Arc::new(Inner {
                clock,
                state: ParkingMutex::new(MovementState::default()),
                observer: ParkingMutex::new(None),
            }),
            registrations: Registrations::new(surface),
        }
    }

    pub fn on_movement<F>(self, observer: F) -> Self
    where
        F: Fn(MovementSample, &InputEvent) + Send + Sync + 'static,
    {
        *self.inner.observer.lock() = Some(Arc::new(observer));
        self
    }

    /// Most recently computed velocity; zero before the first sample
    pub fn velocity(&self) -> Velocity {
        self.inner.state.lock().velocity
    }

    /// Position of the last move event seen
    pub fn last_position(&self) -> Option<Position> {
        self.inner.state.lock().last.map(|(pos, _)| pos)
    }
}

impl Tracker for MovementTracker {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> TrackerKind {
        TrackerKind::Movement
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
