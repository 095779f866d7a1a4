//! Floating text overlays.

use egui::{Pos2, Rect, Vec2};

use crate::geometry::{self, AffineState};
use crate::gesture::{
    allow_simultaneous_recognition, GestureComposer, GestureDelta, GestureKind, GestureRecognizer,
};
use crate::resize::{EdgeResizeController, EdgeZone};

/// Padding added around laid-out text when an overlay autosizes.
pub const TEXT_PADDING: Vec2 = Vec2::new(8.0, 6.0);

/// Recognizers for the three gesture kinds plus the composer they feed.
#[derive(Clone, Debug)]
pub struct OverlayGestures {
    pub composer: GestureComposer,
    pub pinch: GestureRecognizer,
    pub pan: GestureRecognizer,
    pub rotate: GestureRecognizer,
}

impl Default for OverlayGestures {
    fn default() -> Self {
        Self {
            composer: GestureComposer::new(),
            pinch: GestureRecognizer::new(GestureKind::Pinch),
            pan: GestureRecognizer::new(GestureKind::Pan),
            rotate: GestureRecognizer::new(GestureKind::Rotate),
        }
    }
}

impl OverlayGestures {
    pub fn recognizer(&self, kind: GestureKind) -> &GestureRecognizer {
        match kind {
            GestureKind::Pinch => &self.pinch,
            GestureKind::Pan => &self.pan,
            GestureKind::Rotate => &self.rotate,
        }
    }

    /// Whether a `kind` gesture may start alongside the ones already live.
    fn may_recognize(&self, kind: GestureKind) -> bool {
        GestureKind::ALL
            .into_iter()
            .filter(|other| *other != kind && self.recognizer(*other).is_live())
            .all(|other| allow_simultaneous_recognition(other, kind))
    }

    /// The recognizer for `kind` together with the composer, borrowed side by side.
    fn parts(&mut self, kind: GestureKind) -> (&mut GestureRecognizer, &mut GestureComposer) {
        let recognizer = match kind {
            GestureKind::Pinch => &mut self.pinch,
            GestureKind::Pan => &mut self.pan,
            GestureKind::Rotate => &mut self.rotate,
        };
        (recognizer, &mut self.composer)
    }

    pub fn any_live(&self) -> bool {
        GestureKind::ALL.into_iter().any(|k| self.recognizer(k).is_live())
    }
}

/// A text annotation with its own size, transform and interaction state.
///
/// `size` is the untransformed layout size; `affine.center` places it in canvas space and
/// `affine.linear` scales and rotates it about that center.
#[derive(Clone, Debug)]
pub struct TextOverlay {
    pub id: u64,
    pub text: String,
    pub font_size: f32,
    pub size: Vec2,
    pub affine: AffineState,
    pub resize: EdgeResizeController,
    pub gestures: OverlayGestures,
}

impl TextOverlay {
    pub fn new(id: u64, text: String, font_size: f32, center: Pos2, size: Vec2, edge_threshold: f32) -> Self {
        Self {
            id,
            text,
            font_size,
            size,
            affine: AffineState::new(center),
            resize: EdgeResizeController::new(edge_threshold),
            gestures: OverlayGestures::default(),
        }
    }

    /// Untransformed frame in canvas space. Width or height may be negative.
    pub fn frame(&self) -> Rect {
        Rect::from_min_size(self.affine.center - self.size * 0.5, self.size)
    }

    /// Replaces the frame with `frame`, given in the same untransformed space as
    /// [`TextOverlay::frame`]. The center shift is mapped through the linear part, so the
    /// parts of the frame that did not change stay where they are on screen.
    pub fn set_frame(&mut self, frame: Rect) {
        let shift = frame.center() - self.frame().center();
        self.size = frame.size();
        self.affine.center += self.affine.apply(shift);
    }

    /// Local bounds, origin at the frame's top-left corner.
    pub fn bounds(&self) -> Rect {
        Rect::from_min_size(Pos2::ZERO, self.size)
    }

    pub fn corners(&self) -> [Pos2; 4] {
        geometry::transformed_corners(self.frame(), &self.affine)
    }

    pub fn to_local(&self, canvas_point: Pos2) -> Option<Pos2> {
        geometry::parent_to_local(self.frame(), &self.affine, canvas_point)
    }

    pub fn contains(&self, canvas_point: Pos2) -> bool {
        geometry::frame_contains(self.frame(), &self.affine, canvas_point)
    }

    /// Starts a single-pointer drag at a canvas-space point.
    pub fn pointer_down(&mut self, canvas_point: Pos2) -> Option<EdgeZone> {
        let local = self.to_local(canvas_point)?;
        Some(self.resize.drag_start(local, self.bounds()))
    }

    /// Moves the active drag. Both points are mapped through the current geometry, before
    /// this move is applied, so they share one local space.
    pub fn pointer_move(&mut self, canvas_current: Pos2, canvas_previous: Pos2) {
        let (Some(current), Some(previous)) = (self.to_local(canvas_current), self.to_local(canvas_previous))
        else {
            return;
        };
        let frame = self.resize.drag_move(current, previous, self.frame());
        self.set_frame(frame);
    }

    pub fn pointer_up(&mut self) {
        self.resize.drag_end();
    }

    pub fn pointer_cancel(&mut self) {
        self.resize.drag_cancel();
    }

    /// Feeds one gesture delta and consumes it immediately.
    pub fn gesture(&mut self, delta: GestureDelta) {
        if !self.gestures.may_recognize(delta.kind()) {
            return;
        }
        let (recognizer, composer) = self.gestures.parts(delta.kind());
        recognizer.feed(delta);
        recognizer.consume(composer, &mut self.affine);
    }

    pub fn gesture_end(&mut self, kind: GestureKind) {
        let (recognizer, composer) = self.gestures.parts(kind);
        recognizer.end(composer);
    }

    /// Cancels every live gesture and the pointer drag.
    pub fn cancel_all(&mut self) {
        for kind in GestureKind::ALL {
            let (recognizer, composer) = self.gestures.parts(kind);
            if recognizer.is_live() {
                recognizer.cancel(composer);
            }
        }
        self.resize.drag_cancel();
    }

    /// Moves the overlay so editing happens at `center`, keeping size and transform.
    pub fn recenter(&mut self, center: Pos2) {
        self.affine.center = center;
    }

    /// Resizes the frame to fit `text_size` plus padding. The top-left corner stays put.
    pub fn fit_text(&mut self, text_size: Vec2) {
        let origin = self.frame().min;
        self.set_frame(Rect::from_min_size(origin, text_size + TEXT_PADDING * 2.0));
    }
}
