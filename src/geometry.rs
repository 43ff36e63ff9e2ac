//! Pure draw-pass geometry
//!
//! Free functions over explicit inputs, so the circle math can be unit
//! tested without a renderer or a window.

use iced::Color;

/// Side length of the largest square that fits the measured bounds.
pub fn min_canvas_side(width: f32, height: f32) -> f32 {
    width.min(height)
}

/// Radius of the filled circle for one draw pass.
///
/// A border insets the fill by half the stroke width on each side.
pub fn fill_radius(min_side: f32, border_width: Option<f32>) -> f32 {
    match border_width {
        Some(stroke) => (min_side - stroke) / 2.0,
        None => min_side / 2.0,
    }
}

/// Resolved circle for one draw pass, in local widget coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center_x: f32,
    pub center_y: f32,
    pub radius: f32,
}

/// Resolve the circle from the current measured bounds.
pub fn resolve(width: f32, height: f32, border_width: Option<f32>) -> Circle {
    Circle {
        center_x: width / 2.0,
        center_y: height / 2.0,
        radius: fill_radius(min_canvas_side(width, height), border_width),
    }
}

/// Ring color for the current selection state.
pub fn ring_color(border_color: Color, selected_color: Color, is_selected: bool) -> Color {
    if is_selected {
        selected_color
    } else {
        border_color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_canvas_side() {
        assert_eq!(min_canvas_side(120.0, 80.0), 80.0);
        assert_eq!(min_canvas_side(80.0, 120.0), 80.0);
        assert_eq!(min_canvas_side(64.0, 64.0), 64.0);
    }

    #[test]
    fn test_radius_without_border() {
        let circle = resolve(100.0, 60.0, None);
        assert_eq!(circle.radius, 30.0);
    }

    #[test]
    fn test_radius_with_border() {
        let circle = resolve(100.0, 100.0, Some(4.0));
        assert_eq!(circle.radius, 48.0);
    }

    #[test]
    fn test_center_follows_bounds() {
        let circle = resolve(200.0, 100.0, None);
        assert_eq!(circle.center_x, 100.0);
        assert_eq!(circle.center_y, 50.0);
    }

    #[test]
    fn test_ring_color_swaps_on_selection() {
        let border = Color::WHITE;
        let selected = Color::from_rgb(0.8, 0.2, 0.5);
        assert_eq!(ring_color(border, selected, false), border);
        assert_eq!(ring_color(border, selected, true), selected);
    }
}
