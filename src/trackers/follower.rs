//! Smoothed cursor follower
//!
//! The target follows the pointer immediately (plus a fixed offset). With
//! smoothing on, a per-frame task moves the rendered position a fraction of
//! the remaining distance toward the target, renders, and requests the next
//! frame. Each scheduled tick carries the generation it was scheduled under;
//! `stop()` bumps the generation, so a tick that was already queued does
//! nothing and never reschedules.

use super::{Registrations, Tracker, TrackerKind};
use crate::error::{TrackerError, TrackerResult};
use crate::input::{EventKind, FrameHandle, FrameScheduler, InputEvent, Position, Surface};
use crate::smoothing::Smoothed2D;
use parking_lot::Mutex as ParkingMutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Fraction of the remaining distance covered per frame
pub const DEFAULT_SMOOTHING_FACTOR: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FollowerConfig {
    pub smoothing: bool,
    pub factor: f64,
    /// Added to every pointer position before it becomes the target
    pub offset: Position,
}

impl Default for FollowerConfig {
    fn default() -> Self {
        Self {
            smoothing: true,
            factor: DEFAULT_SMOOTHING_FACTOR,
            offset: Position::default(),
        }
    }
}

impl FollowerConfig {
    pub fn validate(&self) -> TrackerResult<()> {
        if !(self.factor > 0.0 && self.factor <= 1.0) {
            return Err(TrackerError::InvalidSmoothingFactor(self.factor));
        }
        Ok(())
    }
}

pub type RenderObserver = Arc<dyn Fn(Position) + Send + Sync>;

#[derive(Default)]
struct FollowState {
    current: Smoothed2D,
    target: Position,
    active: bool,
    generation: u64,
    frame: Option<FrameHandle>,
}

struct Inner {
    config: FollowerConfig,
    scheduler: Arc<dyn FrameScheduler>,
    state: ParkingMutex<FollowState>,
    on_render: ParkingMutex<Option<RenderObserver>>,
}

impl Inner {
    fn render(&self, position: Position) {
        let observer = self.on_render.lock().clone();
        if let Some(observer) = observer {
            observer(position);
        }
    }

    fn handle_move(&self, event: &InputEvent) {
        let target = event.position + self.config.offset;
        {
            let mut state = self.state.lock();
            state.target = target;
            if self.config.smoothing {
                return;
            }
            state.current.reset(target);
        }
        self.render(target);
    }

    /// Queue the next tick for `generation`. Caller holds the state lock.
    fn schedule(this: &Arc<Inner>, state: &mut FollowState) {
        let generation = state.generation;
        let weak = Arc::downgrade(this);
        let handle = this.scheduler.request_frame(Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                Inner::tick(&inner, generation);
            }
        }));
        state.frame = Some(handle);
    }

    fn tick(this: &Arc<Inner>, generation: u64) {
        let position = {
            let mut state = this.state.lock();
            if !state.active || state.generation != generation {
                tracing::trace!("dropping stale frame (generation {})", generation);
                return;
            }
            state.frame = None;
            let target = state.target;
            state.current.step(target, this.config.factor);
            state.current.position()
        };

        this.render(position);

        let mut state = this.state.lock();
        if state.active && state.generation == generation {
            Inner::schedule(this, &mut state);
        }
    }
}

/// Follows the pointer with an optionally smoothed rendered position
pub struct CursorFollower {
    id: String,
    inner: Arc<Inner>,
    registrations: Registrations,
}

impl CursorFollower {
    pub fn new(
        surface: Arc<dyn Surface>,
        scheduler: Arc<dyn FrameScheduler>,
        config: FollowerConfig,
    ) -> TrackerResult<Self> {
        config.validate()?;
        Ok(Self {
            id: format!("follower@{}", surface.name()),
            inner: Arc::new(Inner {
                config,
                scheduler,
                state: ParkingMutex::new(FollowState::default()),
                on_render: ParkingMutex::new(None),
            }),
            registrations: Registrations::new(surface),
        })
    }

    /// Visual update, called with the position to draw at
    pub fn on_render<F>(self, observer: F) -> Self
    where
        F: Fn(Position) + Send + Sync + 'static,
    {
        *self.inner.on_render.lock() = Some(Arc::new(observer));
        self
    }

    pub fn config(&self) -> &FollowerConfig {
        &self.inner.config
    }

    /// Last rendered position
    pub fn current(&self) -> Position {
        self.inner.state.lock().current.position()
    }

    pub fn target(&self) -> Position {
        self.inner.state.lock().target
    }

    /// Whether a frame tick is queued
    pub fn has_pending_frame(&self) -> bool {
        self.inner.state.lock().frame.is_some()
    }

    /// Whether the rendered position is within `threshold` of the target on both axes
    pub fn has_settled(&self, threshold: f64) -> bool {
        let state = self.inner.state.lock();
        state.current.is_settled(state.target, threshold)
    }
}

impl Tracker for CursorFollower {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> TrackerKind {
        TrackerKind::Follower
    }

    fn start(&mut self) -> TrackerResult<()> {
        {
            let mut state = self.inner.state.lock();
            if state.active {
                return Err(TrackerError::AlreadyActive(self.id.clone()));
            }
            state.active = true;
            state.generation += 1;
            if self.inner.config.smoothing {
                Inner::schedule(&self.inner, &mut state);
            }
        }
        self.registrations
            .attach(EventKind::PointerMove, &self.inner, |inner, event| inner.handle_move(event));
        tracing::debug!(
            "{} started (smoothing={}, factor={})",
            self.id,
            self.inner.config.smoothing,
            self.inner.config.factor
        );
        Ok(())
    }

    fn stop(&mut self) {
        self.registrations.detach_all();
        let mut state = self.inner.state.lock();
        if let Some(handle) = state.frame.take() {
            self.inner.scheduler.cancel_frame(handle);
        }
        if state.active {
            state.active = false;
            state.generation += 1;
            tracing::debug!("{} stopped", self.id);
        }
    }

    fn is_active(&self) -> bool {
        self.inner.state.lock().active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{EventTarget, FrameCallback, ManualFrameScheduler};
    use crate::trackers::test_support::Recorder;

    fn follower(
        config: FollowerConfig,
    ) -> (Arc<EventTarget>, Arc<ManualFrameScheduler>, CursorFollower, Recorder<Position>) {
        let target = EventTarget::shared("viewport");
        let scheduler = Arc::new(ManualFrameScheduler::new());
        let seen = Recorder::new();
        let sink = seen.sink();
        let follower = CursorFollower::new(target.clone(), scheduler.clone(), config)
            .unwrap()
            .on_render(sink);
        (target, scheduler, follower, seen)
    }

    fn close(a: Position, b: Position) -> bool {
        a.distance_to(b) < 1e-9
    }

    #[test]
    fn test_unsmoothed_snaps_with_offset() {
        let config = FollowerConfig {
            smoothing: false,
            offset: Position::new(10.0, -5.0),
            ..FollowerConfig::default()
        };
        let (target, scheduler, mut f, seen) = follower(config);
        f.start().unwrap();
        assert_eq!(scheduler.pending_count(), 0, "no frame loop without smoothing");

        target.dispatch(&InputEvent::pointer_move(100.0, 100.0));
        assert_eq!(seen.calls(), vec![Position::new(110.0, 95.0)]);
        assert_eq!(f.current(), Position::new(110.0, 95.0));
    }

    #[test]
    fn test_smoothed_moves_thirty_percent_per_frame() {
        let (target, scheduler, mut f, seen) = follower(FollowerConfig::default());
        f.start().unwrap();

        target.dispatch(&InputEvent::pointer_move(100.0, 0.0));
        assert_eq!(seen.len(), 0, "smoothed follower renders on frames only");
        assert_eq!(f.target(), Position::new(100.0, 0.0));

        scheduler.run_frame();
        assert!(close(f.current(), Position::new(30.0, 0.0)));
        scheduler.run_frame();
        assert!(close(f.current(), Position::new(51.0, 0.0)));

        let calls = seen.calls();
        assert_eq!(calls.len(), 2);
        assert!(f.has_pending_frame(), "loop keeps rescheduling");
    }

    #[test]
    fn test_smoothed_converges() {
        let (target, scheduler, mut f, _) = follower(FollowerConfig::default());
        f.start().unwrap();
        target.dispatch(&InputEvent::pointer_move(-40.0, 80.0));
        scheduler.run_frame();
        assert!(!f.has_settled(1.0));

        scheduler.run_frames(100);
        assert!(f.has_settled(1e-6));
        assert!(f.current().distance_to(Position::new(-40.0, 80.0)) < 1e-6);
    }

    #[test]
    fn test_stop_cancels_pending_frame() {
        let (target, scheduler, mut f, seen) = follower(FollowerConfig::default());
        f.start().unwrap();
        scheduler.run_frame();
        assert_eq!(scheduler.pending_count(), 1);

        f.stop();
        f.stop();
        assert_eq!(scheduler.pending_count(), 0);
        assert_eq!(target.listener_count(), 0);

        let rendered = seen.len();
        target.dispatch(&InputEvent::pointer_move(5.0, 5.0));
        scheduler.run_frames(3);
        assert_eq!(seen.len(), rendered);
        assert!(!f.is_active());
    }

    #[test]
    fn test_stop_from_render_does_not_reschedule() {
        let target = EventTarget::shared("viewport");
        let scheduler = Arc::new(ManualFrameScheduler::new());
        let slot: Arc<ParkingMutex<Option<CursorFollower>>> = Arc::new(ParkingMutex::new(None));

        let s = slot.clone();
        let f = CursorFollower::new(target.clone(), scheduler.clone(), FollowerConfig::default())
            .unwrap()
            .on_render(move |_| {
                // slot is unlocked while frames run
                if let Some(mut guard) = s.try_lock() {
                    if let Some(f) = guard.as_mut() {
                        f.stop();
                    }
                }
            });
        *slot.lock() = Some(f);
        if let Some(f) = slot.lock().as_mut() {
            f.start().unwrap();
        }

        assert_eq!(scheduler.run_frame(), 1);
        assert_eq!(scheduler.pending_count(), 0);
        let active = slot.lock().as_ref().map(|f| f.is_active());
        assert_eq!(active, Some(false));
        slot.lock().take();
    }

    /// Scheduler whose cancel is a no-op, so queued ticks still fire
    struct IgnoresCancel(ManualFrameScheduler);

    impl FrameScheduler for IgnoresCancel {
        fn request_frame(&self, callback: FrameCallback) -> FrameHandle {
            self.0.request_frame(callback)
        }

        fn cancel_frame(&self, _handle: FrameHandle) {}
    }

    #[test]
    fn test_in_flight_tick_after_stop_is_noop() {
        let target = EventTarget::shared("viewport");
        let scheduler = Arc::new(IgnoresCancel(ManualFrameScheduler::new()));
        let seen = Recorder::new();
        let mut f = CursorFollower::new(target.clone(), scheduler.clone(), FollowerConfig::default())
            .unwrap()
            .on_render(seen.sink());
        f.start().unwrap();
        target.dispatch(&InputEvent::pointer_move(100.0, 0.0));
        f.stop();

        assert_eq!(scheduler.0.run_frame(), 1, "stale tick still delivered");
        assert_eq!(seen.len(), 0, "but it renders nothing");
        assert_eq!(scheduler.0.pending_count(), 0, "and never reschedules");
        assert_eq!(f.current(), Position::default());
    }

    #[test]
    fn test_restart_ignores_previous_generation() {
        let target = EventTarget::shared("viewport");
        let scheduler = Arc::new(IgnoresCancel(ManualFrameScheduler::new()));
        let mut f = CursorFollower::new(target.clone(), scheduler.clone(), FollowerConfig::default())
            .unwrap();
        f.start().unwrap();
        f.stop();
        f.start().unwrap();

        // One stale tick and one live tick; only the live one reschedules
        assert_eq!(scheduler.0.run_frame(), 2);
        assert_eq!(scheduler.0.pending_count(), 1);
    }

    #[test]
    fn test_invalid_factor_rejected() {
        let target = EventTarget::shared("viewport");
        let scheduler = Arc::new(ManualFrameScheduler::new());
        for factor in [0.0, -0.1, 1.5, f64::NAN] {
            let config = FollowerConfig {
                factor,
                ..FollowerConfig::default()
            };
            let result = CursorFollower::new(target.clone(), scheduler.clone(), config);
            assert!(matches!(result, Err(TrackerError::InvalidSmoothingFactor(_))));
        }
    }

    #[test]
    fn test_double_start_rejected() {
        let (_, scheduler, mut f, _) = follower(FollowerConfig::default());
        f.start().unwrap();
        assert!(matches!(f.start(), Err(TrackerError::AlreadyActive(_))));
        assert_eq!(scheduler.pending_count(), 1);
    }
}
