//! Scripted replay of input events through every tracker
//!
//! A replay script is an ordered list of timed steps: input events delivered
//! to the target or global surface, and display frames. The `Replayer` owns
//! a manual clock, two in-process surfaces and a manual frame scheduler, so
//! a script always produces the same report.

use crate::config::TrackersConfig;
use crate::error::{TrackerError, TrackerResult};
use crate::input::{
    CursorStyle, EventTarget, InputEvent, ManualClock, ManualFrameScheduler, Position, Surface,
};
use crate::trackers::{
    ButtonState, ButtonTracker, ClickCounter, ClickTracker, CursorFollower, CursorStyler,
    DragTracker, DragUpdate, EnterLeaveTracker, HoverTracker, MovementSample, MovementTracker,
    PositionTracker, Tracker, WheelReport, WheelTracker,
};
use parking_lot::Mutex as ParkingMutex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceName {
    #[default]
    Target,
    Global,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ReplayStep {
    #[serde(rename_all = "camelCase")]
    Event {
        at_ms: f64,
        #[serde(default)]
        surface: SurfaceName,
        event: InputEvent,
    },
    #[serde(rename_all = "camelCase")]
    Frames { at_ms: f64, count: usize },
}

impl ReplayStep {
    pub fn at_ms(&self) -> f64 {
        match self {
            ReplayStep::Event { at_ms, .. } | ReplayStep::Frames { at_ms, .. } => *at_ms,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayScript {
    pub steps: Vec<ReplayStep>,
}

impl ReplayScript {
    pub fn from_json_str(json: &str) -> TrackerResult<Self> {
        let script: ReplayScript = serde_json::from_str(json)?;
        script.validate()?;
        Ok(script)
    }

    pub fn from_file(path: &Path) -> TrackerResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Step times must be finite and never go backwards
    pub fn validate(&self) -> TrackerResult<()> {
        let mut last = f64::NEG_INFINITY;
        for (index, step) in self.steps.iter().enumerate() {
            let at = step.at_ms();
            if !at.is_finite() {
                return Err(TrackerError::ConfigError(format!(
                    "step {} has a non-finite time",
                    index
                )));
            }
            if at < last {
                return Err(TrackerError::ConfigError(format!(
                    "step {} at {}ms is earlier than the previous step at {}ms",
                    index, at, last
                )));
            }
            last = at;
        }
        Ok(())
    }
}

/// Everything the trackers reported during a replay
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayReport {
    pub positions: Vec<Position>,
    pub hover_changes: Vec<bool>,
    pub enters: usize,
    pub leaves: usize,
    pub button_states: Vec<ButtonState>,
    pub wheel: Vec<WheelReport>,
    pub clicks: usize,
    pub double_clicks: usize,
    pub context_menus: usize,
    pub prevented_context_menus: usize,
    pub click_counts: Vec<usize>,
    pub final_click_count: usize,
    pub movement: Vec<MovementSample>,
    pub renders: Vec<Position>,
    pub drag_starts: Vec<Position>,
    pub drag_moves: Vec<DragUpdate>,
    pub drag_ends: Vec<DragUpdate>,
    pub cursor_during_replay: CursorStyle,
    pub frames_run: u64,
}

/// Drives every tracker from a script
pub struct Replayer {
    clock: Arc<ManualClock>,
    target: Arc<EventTarget>,
    global: Arc<EventTarget>,
    scheduler: Arc<ManualFrameScheduler>,
    click_counter: ClickCounter,
    trackers: Vec<Box<dyn Tracker>>,
    report: Arc<ParkingMutex<ReplayReport>>,
}

impl Replayer {
    pub fn new(config: &TrackersConfig) -> TrackerResult<Self> {
        config.validate()?;

        let clock = Arc::new(ManualClock::new(0.0));
        let target = EventTarget::shared("target");
        let global = EventTarget::shared("global");
        let scheduler = Arc::new(ManualFrameScheduler::new());
        let report = Arc::new(ParkingMutex::new(ReplayReport::default()));

        let r = report.clone();
        let click_counter = ClickCounter::new(target.clone(), clock.clone(), config.click_counter.window_ms)?
            .on_count(move |count, _| r.lock().click_counts.push(count));

        let mut trackers: Vec<Box<dyn Tracker>> = Vec::new();

        let r = report.clone();
        trackers.push(Box::new(
            PositionTracker::new(target.clone()).on_move(move |p, _| r.lock().positions.push(p)),
        ));

        let r = report.clone();
        trackers.push(Box::new(
            HoverTracker::new(target.clone()).on_change(move |h, _| r.lock().hover_changes.push(h)),
        ));

        let (r1, r2) = (report.clone(), report.clone());
        trackers.push(Box::new(
            EnterLeaveTracker::new(target.clone())
                .on_enter(move |_| r1.lock().enters += 1)
                .on_leave(move |_| r2.lock().leaves += 1),
        ));

        let r = report.clone();
        trackers.push(Box::new(
            ButtonTracker::new(target.clone()).on_change(move |s, _| r.lock().button_states.push(s)),
        ));

        let r = report.clone();
        trackers.push(Box::new(
            WheelTracker::new(target.clone()).on_wheel(move |w, _| r.lock().wheel.push(w)),
        ));

        let (r1, r2, r3) = (report.clone(), report.clone(), report.clone());
        trackers.push(Box::new(
            ClickTracker::new(target.clone())
                .prevent_context_menu(config.clicks.prevent_context_menu)
                .on_click(move |_| r1.lock().clicks += 1)
                .on_double_click(move |_| r2.lock().double_clicks += 1)
                .on_context_menu(move |_| r3.lock().context_menus += 1),
        ));

        trackers.push(Box::new(CursorStyler::new(target.clone(), config.cursor.style)));

        let r = report.clone();
        trackers.push(Box::new(
            MovementTracker::new(target.clone(), clock.clone())
                .on_movement(move |s, _| r.lock().movement.push(s)),
        ));

        let r = report.clone();
        trackers.push(Box::new(
            CursorFollower::new(target.clone(), scheduler.clone(), config.follower)?
                .on_render(move |p| r.lock().renders.push(p)),
        ));

        let (r1, r2, r3) = (report.clone(), report.clone(), report.clone());
        trackers.push(Box::new(
            DragTracker::new(target.clone(), global.clone())
                .on_start(move |p| r1.lock().drag_starts.push(p))
                .on_drag(move |u| r2.lock().drag_moves.push(u))
                .on_end(move |u| r3.lock().drag_ends.push(u)),
        ));

        Ok(Self {
            clock,
            target,
            global,
            scheduler,
            click_counter,
            trackers,
            report,
        })
    }

    /// Play `script` from start to finish and return the report
    pub fn run(mut self, script: &ReplayScript) -> TrackerResult<ReplayReport> {
        script.validate()?;

        self.click_counter.start()?;
        for tracker in self.trackers.iter_mut() {
            tracker.start()?;
        }
        let cursor_during_replay = self.target.cursor();
        tracing::info!(
            "Replaying {} steps through {} trackers",
            script.steps.len(),
            self.trackers.len() + 1
        );

        for step in &script.steps {
            self.clock.set(step.at_ms());
            match step {
                ReplayStep::Event { surface, event, .. } => {
                    let surface = match surface {
                        SurfaceName::Target => &self.target,
                        SurfaceName::Global => &self.global,
                    };
                    let event = event.clone();
                    surface.dispatch(&event);
                    if event.default_prevented() {
                        self.report.lock().prevented_context_menus += 1;
                    }
                }
                ReplayStep::Frames { count, .. } => {
                    self.scheduler.run_frames(*count);
                }
            }
        }

        let final_click_count = self.click_counter.count();

        self.click_counter.stop();
        for tracker in self.trackers.iter_mut() {
            tracker.stop();
        }

        let mut report = self.report.lock().clone();
        report.final_click_count = final_click_count;
        report.cursor_during_replay = cursor_during_replay;
        report.frames_run = self.scheduler.frames_run();

        tracing::info!(
            "Replay finished (moves={}, clicks={}, drags={}, frames={})",
            report.positions.len(),
            report.clicks,
            report.drag_ends.len(),
            report.frames_run
        );
        Ok(report)
    }
}
