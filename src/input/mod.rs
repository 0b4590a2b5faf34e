//! Host-facing input layer
//!
//! Event payload types, the `Surface` listener abstraction, clocks and the
//! display-refresh scheduler. Trackers only ever talk to the host through
//! these.

pub mod clock;
pub mod frame;
pub mod surface;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use frame::{FrameCallback, FrameHandle, FrameScheduler, ManualFrameScheduler};
pub use surface::{EventTarget, Listener, ListenerId, Surface};
pub use types::{
    CursorStyle, EventKind, InputEvent, MouseButton, Position, Velocity, WheelDelta,
};
