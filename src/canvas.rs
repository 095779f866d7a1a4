//! Freehand drawing layer underneath the text overlays.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color4 {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color4 {
    pub const RED: Color4 = Color4::rgb(1.0, 0.0, 0.0);
    pub const WHITE: Color4 = Color4::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color4 = Color4::rgb(0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn to_egui(&self) -> egui::Color32 {
        egui::Color32::from_rgba_unmultiplied(
            (self.r * 255.0) as u8,
            (self.g * 255.0) as u8,
            (self.b * 255.0) as u8,
            (self.a * 255.0) as u8,
        )
    }
}

impl Default for Color4 {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Whether pointer drags on empty canvas become strokes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CanvasMode {
    #[default]
    Drawing,
    /// A text overlay is being created or edited; stroke capture is suppressed.
    HandlingLabel,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    pub points: Vec<egui::Pos2>,
    pub color: Color4,
    pub width: f32,
}

#[derive(Clone, Debug, Default)]
pub struct Canvas {
    strokes: Vec<Stroke>,
    current: Option<Stroke>,
    color: Color4,
    stroke_width: f32,
    mode: CanvasMode,
}

impl Canvas {
    pub fn new(color: Color4, stroke_width: f32) -> Self {
        Self {
            color,
            stroke_width,
            ..Default::default()
        }
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// Stroke still being drawn, if any.
    pub fn current(&self) -> Option<&Stroke> {
        self.current.as_ref()
    }

    pub fn color(&self) -> Color4 {
        self.color
    }

    pub fn mode(&self) -> CanvasMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: CanvasMode) {
        if self.mode != mode {
            log::debug!("canvas mode {:?} -> {:?}", self.mode, mode);
            self.mode = mode;
        }
        if mode == CanvasMode::HandlingLabel {
            self.current = None;
        }
    }

    /// Returns false when stroke capture is suppressed.
    pub fn begin_stroke(&mut self, at: egui::Pos2) -> bool {
        if self.mode == CanvasMode::HandlingLabel {
            return false;
        }
        self.current = Some(Stroke {
            points: vec![at],
            color: self.color,
            width: self.stroke_width,
        });
        true
    }

    pub fn extend_stroke(&mut self, to: egui::Pos2) {
        if let Some(stroke) = &mut self.current {
            if stroke.points.last() != Some(&to) {
                stroke.points.push(to);
            }
        }
    }

    pub fn end_stroke(&mut self) {
        if let Some(stroke) = self.current.take() {
            self.strokes.push(stroke);
        }
    }

    /// Drops the stroke in progress without committing it.
    pub fn cancel_stroke(&mut self) {
        if self.current.take().is_some() {
            log::debug!("stroke cancelled");
        }
    }

    pub fn undo(&mut self) {
        if self.strokes.pop().is_some() {
            log::debug!("undo, {} strokes left", self.strokes.len());
        }
    }

    pub fn clear(&mut self) {
        self.strokes.clear();
        self.current = None;
    }

    /// Applies to strokes started afterwards.
    pub fn change_color(&mut self, color: Color4) {
        self.color = color;
    }
}
