//! Shared 2D geometry for overlays.
//!
//! Layout rectangles and points use egui's `Pos2`/`Vec2`/`Rect`; the linear part of an
//! overlay transform (uniform scale combined with rotation) is a `glam::Mat2` applied
//! about the overlay center.

use egui::{Pos2, Rect, Vec2};
use glam::Mat2;

/// Determinants below this are treated as a collapsed transform with no inverse.
const MIN_DETERMINANT: f32 = 1e-6;

pub fn to_glam(v: Vec2) -> glam::Vec2 {
    glam::vec2(v.x, v.y)
}

pub fn from_glam(v: glam::Vec2) -> Vec2 {
    egui::vec2(v.x, v.y)
}

/// Linear transform plus the point it is applied around.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffineState {
    pub linear: Mat2,
    pub center: Pos2,
}

impl AffineState {
    pub fn new(center: Pos2) -> Self {
        Self {
            linear: Mat2::IDENTITY,
            center,
        }
    }

    /// Uniform scale factor carried by the linear part.
    pub fn scale(&self) -> f32 {
        self.linear.determinant().abs().sqrt()
    }

    /// Rotation angle in radians carried by the linear part.
    pub fn angle(&self) -> f32 {
        self.linear.x_axis.y.atan2(self.linear.x_axis.x)
    }

    /// Maps an offset from the center through the linear part.
    pub fn apply(&self, offset: Vec2) -> Vec2 {
        from_glam(self.linear * to_glam(offset))
    }

    /// Inverse of [`AffineState::apply`]; `None` when the transform has collapsed.
    pub fn unapply(&self, offset: Vec2) -> Option<Vec2> {
        if self.linear.determinant().abs() < MIN_DETERMINANT {
            return None;
        }
        Some(from_glam(self.linear.inverse() * to_glam(offset)))
    }
}

impl Default for AffineState {
    fn default() -> Self {
        Self::new(Pos2::ZERO)
    }
}

/// Parent-space corners of `frame` after `state.linear` is applied about the frame center,
/// ordered top-left, top-right, bottom-right, bottom-left.
pub fn transformed_corners(frame: Rect, state: &AffineState) -> [Pos2; 4] {
    let center = frame.center();
    let corners = [
        frame.left_top(),
        frame.right_top(),
        frame.right_bottom(),
        frame.left_bottom(),
    ];
    corners.map(|c| center + state.apply(c - center))
}

/// Converts a parent-space point into the local space of a transformed frame, where the
/// frame's top-left corner is the origin.
pub fn parent_to_local(frame: Rect, state: &AffineState, point: Pos2) -> Option<Pos2> {
    let local = state.unapply(point - frame.center())?;
    Some(Pos2::ZERO + local + frame.size() * 0.5)
}

/// Whether a parent-space point lies inside the transformed frame.
pub fn frame_contains(frame: Rect, state: &AffineState, point: Pos2) -> bool {
    let Some(local) = parent_to_local(frame, state, point) else {
        return false;
    };
    let bounds = Rect::from_two_pos(Pos2::ZERO, Pos2::ZERO + frame.size());
    bounds.contains(local)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_identity_local_space() {
        let frame = Rect::from_min_size(egui::pos2(10.0, 20.0), egui::vec2(100.0, 50.0));
        let state = AffineState::new(frame.center());
        let local = parent_to_local(frame, &state, egui::pos2(15.0, 25.0)).unwrap();
        assert!((local - egui::pos2(5.0, 5.0)).length() < 1e-4);
    }

    #[test]
    fn test_rotated_local_space() {
        let frame = Rect::from_min_size(Pos2::ZERO, egui::vec2(100.0, 50.0));
        let mut state = AffineState::new(frame.center());
        state.linear = Mat2::from_angle(FRAC_PI_2);

        // Quarter turn maps the local +x axis onto parent +y.
        let parent = frame.center() + egui::vec2(0.0, 10.0);
        let local = parent_to_local(frame, &state, parent).unwrap();
        assert!((local - egui::pos2(60.0, 25.0)).length() < 1e-4);
        assert!(frame_contains(frame, &state, parent));
        assert!(!frame_contains(frame, &state, frame.center() + egui::vec2(40.0, 0.0)));
    }

    #[test]
    fn test_collapsed_transform_has_no_local_space() {
        let frame = Rect::from_min_size(Pos2::ZERO, egui::vec2(10.0, 10.0));
        let mut state = AffineState::new(frame.center());
        state.linear = Mat2::from_diagonal(glam::Vec2::ZERO);
        assert!(parent_to_local(frame, &state, Pos2::ZERO).is_none());
        assert!(!frame_contains(frame, &state, frame.center()));
    }

    #[test]
    fn test_scale_and_angle_readback() {
        let mut state = AffineState::default();
        state.linear = Mat2::from_angle(0.3) * Mat2::from_diagonal(glam::vec2(2.0, 2.0));
        assert!((state.scale() - 2.0).abs() < 1e-5);
        assert!((state.angle() - 0.3).abs() < 1e-5);
    }
}
