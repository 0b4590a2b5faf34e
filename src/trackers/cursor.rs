//! Cursor styling over a surface

use super::{Tracker, TrackerKind};
use crate::error::{TrackerError, TrackerResult};
use crate::input::{CursorStyle, Surface};
use std::sync::Arc;

/// Applies a cursor style while active and restores the previous one on stop
pub struct CursorStyler {
    id: String,
    surface: Arc<dyn Surface>,
    style: CursorStyle,
    previous: Option<CursorStyle>,
}

impl CursorStyler {
    pub fn new(surface: Arc<dyn Surface>, style: CursorStyle) -> Self {
        Self {
            id: format!("cursor@{}", surface.name()),
            surface,
            style,
            previous: None,
        }
    }

    pub fn style(&self) -> CursorStyle {
        self.style
    }

    /// Change the style; applied immediately when active
    pub fn set_style(&mut self, style: CursorStyle) {
        self.style = style;
        if self.is_active() {
            self.surface.set_cursor(style);
        }
    }
}

impl Tracker for CursorStyler {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> TrackerKind {
        TrackerKind::Cursor
    }

    fn start(&mut self) -> TrackerResult<()> {
        if self.is_active() {
            return Err(TrackerError::AlreadyActive(self.id.clone()));
        }
        self.previous = Some(self.surface.cursor());
        self.surface.set_cursor(self.style);
        tracing::debug!("{} started (style={})", self.id, self.style);
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(previous) = self.previous.take() {
            self.surface.set_cursor(previous);
            tracing::debug!("{} stopped (restored {})", self.id, previous);
        }
    }

    fn is_active(&self) -> bool {
        self.previous.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::EventTarget;

    #[test]
    fn test_applies_and_restores() {
        let target = EventTarget::shared("canvas");
        target.set_cursor(CursorStyle::Text);

        let mut styler = CursorStyler::new(target.clone(), CursorStyle::Crosshair);
        styler.start().unwrap();
        assert_eq!(target.cursor(), CursorStyle::Crosshair);

        styler.set_style(CursorStyle::Grabbing);
        assert_eq!(target.cursor(), CursorStyle::Grabbing);

        styler.stop();
        assert_eq!(target.cursor(), CursorStyle::Text);
    }

    #[test]
    fn test_set_style_while_inactive_does_not_touch_surface() {
        let target = EventTarget::shared("canvas");
        let mut styler = CursorStyler::new(target.clone(), CursorStyle::Pointer);
        styler.set_style(CursorStyle::Wait);
        assert_eq!(target.cursor(), CursorStyle::Default);
        assert_eq!(styler.style(), CursorStyle::Wait);
    }

    #[test]
    fn test_stop_twice_restores_once() {
        let target = EventTarget::shared("canvas");
        let mut styler = CursorStyler::new(target.clone(), CursorStyle::Move);
        styler.stop();
        styler.start().unwrap();
        styler.stop();
        target.set_cursor(CursorStyle::Pointer);
        styler.stop();
        assert_eq!(target.cursor(), CursorStyle::Pointer);
        assert!(!styler.is_active());
    }
}
