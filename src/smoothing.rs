//! Exponential smoothing toward a moving target
//!
//! Each step moves the value a fixed fraction of the remaining distance:
//! `current += (target - current) * factor`.

use crate::input::Position;

/// Move `current` a `factor` fraction of the way to `target`
#[inline]
pub fn approach(current: f64, target: f64, factor: f64) -> f64 {
    current + (target - current) * factor
}

/// 1D smoothed value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Smoothed {
    pub value: f64,
}

impl Smoothed {
    pub fn new(initial: f64) -> Self {
        Self { value: initial }
    }

    pub fn step(&mut self, target: f64, factor: f64) {
        self.value = approach(self.value, target, factor);
    }

    pub fn is_settled(&self, target: f64, threshold: f64) -> bool {
        (self.value - target).abs() < threshold
    }
}

/// 2D smoothed position (X and Y axes)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Smoothed2D {
    pub x: Smoothed,
    pub y: Smoothed,
}

impl Smoothed2D {
    pub fn new(initial: Position) -> Self {
        Self {
            x: Smoothed::new(initial.x),
            y: Smoothed::new(initial.y),
        }
    }

    pub fn step(&mut self, target: Position, factor: f64) {
        self.x.step(target.x, factor);
        self.y.step(target.y, factor);
    }

    pub fn position(&self) -> Position {
        Position::new(self.x.value, self.y.value)
    }

    /// Jump straight to `position`
    pub fn reset(&mut self, position: Position) {
        *self = Self::new(position);
    }

    pub fn is_settled(&self, target: Position, threshold: f64) -> bool {
        self.x.is_settled(target.x, threshold) && self.y.is_settled(target.y, threshold)
    }
}

impl Default for Smoothed2D {
    fn default() -> Self {
        Self::new(Position::default())
    }
}
