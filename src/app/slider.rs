//! Before/after comparison slider
//!
//! A two-state drag controller. The reveal boundary sits at `position`
//! percent of the container width; the edited layer is clipped to the left
//! of it and the original shows through on the right.

use egui::{Pos2, Rect};

use crate::error::{AppError, AppResult};

/// Boundary position a new comparison starts at
pub const CENTER_POSITION: f32 = 50.0;

/// Map a pointer x coordinate to a reveal position in `[0, 100]`
///
/// Pure and unsmoothed: the same inputs always give the same position.
pub fn pointer_to_position(client_x: f32, left: f32, width: f32) -> AppResult<f32> {
    if !(width.is_finite() && width > 0.0) || !left.is_finite() || !client_x.is_finite() {
        return Err(AppError::DegenerateLayout { width });
    }
    Ok(((client_x - left) / width * 100.0).clamp(0.0, 100.0))
}

/// Drag state of the comparison slider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparisonSlider {
    position: f32,
    dragging: bool,
}

impl Default for ComparisonSlider {
    fn default() -> Self {
        Self {
            position: CENTER_POSITION,
            dragging: false,
        }
    }
}

impl ComparisonSlider {
    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// idle -> dragging
    pub fn begin_drag(&mut self) {
        self.dragging = true;
    }

    /// Follow the pointer while dragging
    ///
    /// Moves while idle are ignored. A degenerate container keeps the
    /// previous position.
    pub fn update_from_pointer(&mut self, client_x: f32, bounds: Rect) -> f32 {
        if !self.dragging {
            return self.position;
        }
        match pointer_to_position(client_x, bounds.left(), bounds.width()) {
            Ok(position) => self.position = position,
            Err(e) => tracing::debug!("Ignoring slider move: {}", e),
        }
        self.position
    }

    /// dragging -> idle, on pointer-up, pointer-leave or cancel
    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    /// Back to the centered, idle state
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// X coordinate of the reveal boundary inside `bounds`
    pub fn reveal_x(&self, bounds: Rect) -> f32 {
        bounds.left() + bounds.width() * self.position / 100.0
    }

    /// The part of `bounds` the edited layer is visible in
    pub fn edited_clip(&self, bounds: Rect) -> Rect {
        Rect::from_min_max(bounds.min, Pos2::new(self.reveal_x(bounds), bounds.max.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::vec2;

    fn bounds(left: f32, width: f32) -> Rect {
        Rect::from_min_size(Pos2::new(left, 0.0), vec2(width, 300.0))
    }

    #[test]
    fn test_pointer_scenario() {
        assert_eq!(pointer_to_position(300.0, 100.0, 400.0).unwrap(), 50.0);
        assert_eq!(pointer_to_position(100.0, 100.0, 400.0).unwrap(), 0.0);
        assert_eq!(pointer_to_position(550.0, 100.0, 400.0).unwrap(), 100.0);
    }

    #[test]
    fn test_outside_container_clamps() {
        for x in [-1000.0, 0.0, 99.9, 500.1, 10_000.0] {
            let p = pointer_to_position(x, 100.0, 400.0).unwrap();
            assert!(p == 0.0 || p == 100.0, "x={} gave {}", x, p);
        }
    }

    #[test]
    fn test_pointer_is_pure() {
        let a = pointer_to_position(237.5, 100.0, 400.0).unwrap();
        let b = pointer_to_position(237.5, 100.0, 400.0).unwrap();
        assert_eq!(a, b);
        assert!((a - 34.375).abs() < 1e-4);
    }

    #[test]
    fn test_degenerate_width() {
        assert!(matches!(
            pointer_to_position(10.0, 0.0, 0.0),
            Err(AppError::DegenerateLayout { .. })
        ));
        assert!(pointer_to_position(10.0, 0.0, f32::NAN).is_err());
        assert!(pointer_to_position(10.0, 0.0, -5.0).is_err());
    }

    #[test]
    fn test_moves_ignored_while_idle() {
        let mut slider = ComparisonSlider::default();
        assert_eq!(slider.update_from_pointer(100.0, bounds(100.0, 400.0)), 50.0);
        assert!(!slider.is_dragging());
    }

    #[test]
    fn test_drag_cycle() {
        let mut slider = ComparisonSlider::default();
        slider.begin_drag();
        assert_eq!(slider.update_from_pointer(200.0, bounds(100.0, 400.0)), 25.0);
        assert_eq!(slider.update_from_pointer(400.0, bounds(100.0, 400.0)), 75.0);
        slider.end_drag();
        assert_eq!(slider.update_from_pointer(100.0, bounds(100.0, 400.0)), 75.0);
    }

    #[test]
    fn test_collapsed_container_keeps_position() {
        let mut slider = ComparisonSlider::default();
        slider.begin_drag();
        slider.update_from_pointer(200.0, bounds(100.0, 400.0));
        assert_eq!(slider.update_from_pointer(500.0, bounds(100.0, 0.0)), 25.0);
        assert!(slider.is_dragging());
    }

    #[test]
    fn test_edited_clip() {
        let mut slider = ComparisonSlider::default();
        let area = bounds(100.0, 400.0);
        assert_eq!(slider.reveal_x(area), 300.0);

        slider.begin_drag();
        slider.update_from_pointer(200.0, area);
        let clip = slider.edited_clip(area);
        assert_eq!(clip.left(), 100.0);
        assert_eq!(clip.right(), 200.0);
        assert_eq!(clip.height(), area.height());

        slider.reset();
        assert_eq!(slider.position(), CENTER_POSITION);
        assert!(!slider.is_dragging());
    }
}
