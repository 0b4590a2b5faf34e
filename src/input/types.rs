use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};

/// A point in input-device pixel space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position
    pub fn distance_to(&self, other: Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Pixels per millisecond along each axis
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
}

impl Velocity {
    pub const ZERO: Velocity = Velocity { x: 0.0, y: 0.0 };

    /// Magnitude of the velocity vector
    pub fn speed(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

/// The three buttons a `ButtonState` tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

impl MouseButton {
    /// Map a host button index: 0 = left, 1 = middle, 2 = right.
    pub fn from_index(index: i16) -> Option<Self> {
        match index {
            0 => Some(MouseButton::Left),
            1 => Some(MouseButton::Middle),
            2 => Some(MouseButton::Right),
            _ => None,
        }
    }

    pub fn index(&self) -> i16 {
        match self {
            MouseButton::Left => 0,
            MouseButton::Middle => 1,
            MouseButton::Right => 2,
        }
    }
}

impl fmt::Display for MouseButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MouseButton::Left => write!(f, "left"),
            MouseButton::Middle => write!(f, "middle"),
            MouseButton::Right => write!(f, "right"),
        }
    }
}

impl FromStr for MouseButton {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(MouseButton::Left),
            "middle" => Ok(MouseButton::Middle),
            "right" => Ok(MouseButton::Right),
            other => Err(format!("unknown mouse button: {}", other)),
        }
    }
}

/// Raw wheel deltas as delivered by the host
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WheelDelta {
    pub delta_x: f64,
    pub delta_y: f64,
    pub delta_z: f64,
}

/// Named input events a surface can emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    PointerMove,
    PointerDown,
    PointerUp,
    Click,
    DoubleClick,
    ContextMenu,
    PointerEnter,
    PointerLeave,
    Wheel,
}

impl EventKind {
    /// Only context-menu events can be cancelled by a listener
    pub fn is_cancelable(&self) -> bool {
        matches!(self, EventKind::ContextMenu)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::PointerMove => "pointer-move",
            EventKind::PointerDown => "pointer-down",
            EventKind::PointerUp => "pointer-up",
            EventKind::Click => "click",
            EventKind::DoubleClick => "double-click",
            EventKind::ContextMenu => "context-menu",
            EventKind::PointerEnter => "pointer-enter",
            EventKind::PointerLeave => "pointer-leave",
            EventKind::Wheel => "wheel",
        };
        write!(f, "{}", name)
    }
}

/// A single input event and its payload
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputEvent {
    pub kind: EventKind,
    #[serde(default)]
    pub position: Position,
    /// Host button index; only meaningful for down/up events
    #[serde(default)]
    pub button: i16,
    #[serde(default)]
    pub wheel: Option<WheelDelta>,
    #[serde(skip)]
    default_prevented: AtomicBool,
}

impl Clone for InputEvent {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            position: self.position,
            button: self.button,
            wheel: self.wheel,
            default_prevented: AtomicBool::new(self.default_prevented()),
        }
    }
}

impl PartialEq for InputEvent {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.position == other.position
            && self.button == other.button
            && self.wheel == other.wheel
    }
}

impl InputEvent {
    pub fn new(kind: EventKind, x: f64, y: f64) -> Self {
        Self {
            kind,
            position: Position::new(x, y),
            button: 0,
            wheel: None,
            default_prevented: AtomicBool::new(false),
        }
    }

    pub fn pointer_move(x: f64, y: f64) -> Self {
        Self::new(EventKind::PointerMove, x, y)
    }

    pub fn pointer_down(x: f64, y: f64, button: i16) -> Self {
        Self {
            button,
            ..Self::new(EventKind::PointerDown, x, y)
        }
    }

    pub fn pointer_up(x: f64, y: f64, button: i16) -> Self {
        Self {
            button,
            ..Self::new(EventKind::PointerUp, x, y)
        }
    }

    pub fn click(x: f64, y: f64) -> Self {
        Self::new(EventKind::Click, x, y)
    }

    pub fn double_click(x: f64, y: f64) -> Self {
        Self::new(EventKind::DoubleClick, x, y)
    }

    pub fn context_menu(x: f64, y: f64) -> Self {
        Self {
            button: MouseButton::Right.index(),
            ..Self::new(EventKind::ContextMenu, x, y)
        }
    }

    pub fn pointer_enter(x: f64, y: f64) -> Self {
        Self::new(EventKind::PointerEnter, x, y)
    }

    pub fn pointer_leave(x: f64, y: f64) -> Self {
        Self::new(EventKind::PointerLeave, x, y)
    }

    pub fn wheel(delta_x: f64, delta_y: f64, delta_z: f64) -> Self {
        Self {
            wheel: Some(WheelDelta {
                delta_x,
                delta_y,
                delta_z,
            }),
            ..Self::new(EventKind::Wheel, 0.0, 0.0)
        }
    }

    /// Ask the host to skip its default action. Ignored for non-cancelable kinds.
    pub fn prevent_default(&self) {
        if self.kind.is_cancelable() {
            self.default_prevented.store(true, Ordering::Relaxed);
        }
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.load(Ordering::Relaxed)
    }
}

/// Cursor styles a surface can display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CursorStyle {
    #[default]
    Default,
    Pointer,
    Crosshair,
    Text,
    Move,
    Grab,
    Grabbing,
    NotAllowed,
    Wait,
    None,
}

impl fmt::Display for CursorStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CursorStyle::Default => "default",
            CursorStyle::Pointer => "pointer",
            CursorStyle::Crosshair => "crosshair",
            CursorStyle::Text => "text",
            CursorStyle::Move => "move",
            CursorStyle::Grab => "grab",
            CursorStyle::Grabbing => "grabbing",
            CursorStyle::NotAllowed => "not-allowed",
            CursorStyle::Wait => "wait",
            CursorStyle::None => "none",
        };
        write!(f, "{}", name)
    }
}
