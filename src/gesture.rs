//! Concurrent pinch, pan and rotate gestures on one overlay.
//!
//! Each gesture kind has its own [`GestureRecognizer`] holding the delta accumulated since
//! it was last consumed. Consuming hands that delta to the overlay's [`GestureComposer`],
//! which folds it into the overlay's [`AffineState`] and returns the identity value the
//! recognizer must store back, so no delta is ever applied twice.

use egui::Vec2;
use glam::Mat2;

use crate::geometry::AffineState;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GestureKind {
    Pinch,
    Pan,
    Rotate,
}

impl GestureKind {
    pub const ALL: [GestureKind; 3] = [GestureKind::Pinch, GestureKind::Pan, GestureKind::Rotate];

    fn index(self) -> usize {
        match self {
            GestureKind::Pinch => 0,
            GestureKind::Pan => 1,
            GestureKind::Rotate => 2,
        }
    }
}

/// Change reported by a recognizer since its last consumption.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureDelta {
    /// Multiplicative scale factor, identity `1.0`.
    Scale(f32),
    /// Translation in parent space, identity zero.
    Pan(Vec2),
    /// Rotation in radians, identity `0.0`.
    Rotate(f32),
}

impl GestureDelta {
    pub fn identity(kind: GestureKind) -> Self {
        match kind {
            GestureKind::Pinch => GestureDelta::Scale(1.0),
            GestureKind::Pan => GestureDelta::Pan(Vec2::ZERO),
            GestureKind::Rotate => GestureDelta::Rotate(0.0),
        }
    }

    pub fn kind(&self) -> GestureKind {
        match self {
            GestureDelta::Scale(_) => GestureKind::Pinch,
            GestureDelta::Pan(_) => GestureKind::Pan,
            GestureDelta::Rotate(_) => GestureKind::Rotate,
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == GestureDelta::identity(self.kind())
    }

    /// Folds a newer delta of the same kind into this one.
    fn combine(self, newer: GestureDelta) -> GestureDelta {
        match (self, newer) {
            (GestureDelta::Scale(a), GestureDelta::Scale(b)) => GestureDelta::Scale(a * b),
            (GestureDelta::Pan(a), GestureDelta::Pan(b)) => GestureDelta::Pan(a + b),
            (GestureDelta::Rotate(a), GestureDelta::Rotate(b)) => GestureDelta::Rotate(a + b),
            _ => self,
        }
    }
}

/// Every gesture kind may recognize alongside every other one, including another
/// recognizer of the same kind. No gesture cancels or outranks another.
pub fn allow_simultaneous_recognition(_a: GestureKind, _b: GestureKind) -> bool {
    true
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComposerState {
    Idle,
    Active,
}

/// Applies gesture deltas to one overlay and tracks which gestures are live on it.
#[derive(Clone, Debug)]
pub struct GestureComposer {
    live: [bool; 3],
}

impl Default for GestureComposer {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureComposer {
    pub fn new() -> Self {
        Self { live: [false; 3] }
    }

    pub fn state(&self) -> ComposerState {
        if self.live.iter().any(|l| *l) {
            ComposerState::Active
        } else {
            ComposerState::Idle
        }
    }

    pub fn is_live(&self, kind: GestureKind) -> bool {
        self.live[kind.index()]
    }

    fn mark_live(&mut self, kind: GestureKind) {
        if self.state() == ComposerState::Idle {
            log::debug!("gestures active, first was {kind:?}");
        }
        self.live[kind.index()] = true;
    }

    /// `transform = transform * scale(factor)`. Returns the accumulator reset value.
    pub fn on_scale_delta(&mut self, target: &mut AffineState, factor: f32) -> f32 {
        self.mark_live(GestureKind::Pinch);
        target.linear = target.linear * Mat2::from_diagonal(glam::Vec2::splat(factor));
        1.0
    }

    /// `transform = transform * rotation(radians)`. Returns the accumulator reset value.
    pub fn on_rotate_delta(&mut self, target: &mut AffineState, radians: f32) -> f32 {
        self.mark_live(GestureKind::Rotate);
        target.linear = target.linear * Mat2::from_angle(radians);
        0.0
    }

    /// `center += delta`. Returns the accumulator reset value.
    pub fn on_pan_delta(&mut self, target: &mut AffineState, delta: Vec2) -> Vec2 {
        self.mark_live(GestureKind::Pan);
        target.center += delta;
        Vec2::ZERO
    }

    /// Dispatches any delta to its handler and returns the matching identity.
    pub fn apply(&mut self, target: &mut AffineState, delta: GestureDelta) -> GestureDelta {
        match delta {
            GestureDelta::Scale(f) => GestureDelta::Scale(self.on_scale_delta(target, f)),
            GestureDelta::Pan(d) => GestureDelta::Pan(self.on_pan_delta(target, d)),
            GestureDelta::Rotate(r) => GestureDelta::Rotate(self.on_rotate_delta(target, r)),
        }
    }

    /// Marks `kind` as ended or cancelled. Geometry is left as composed.
    pub fn gesture_finished(&mut self, kind: GestureKind) {
        let was_active = self.state() == ComposerState::Active;
        self.live[kind.index()] = false;
        if was_active && self.state() == ComposerState::Idle {
            log::debug!("gestures idle after {kind:?} finished");
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GesturePhase {
    Possible,
    Began,
    Changed,
    Ended,
    Cancelled,
}

/// Host-side accumulator for one gesture kind.
#[derive(Clone, Debug)]
pub struct GestureRecognizer {
    kind: GestureKind,
    phase: GesturePhase,
    pending: GestureDelta,
}

impl GestureRecognizer {
    pub fn new(kind: GestureKind) -> Self {
        Self {
            kind,
            phase: GesturePhase::Possible,
            pending: GestureDelta::identity(kind),
        }
    }

    pub fn kind(&self) -> GestureKind {
        self.kind
    }

    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    pub fn pending(&self) -> GestureDelta {
        self.pending
    }

    pub fn is_live(&self) -> bool {
        matches!(self.phase, GesturePhase::Began | GesturePhase::Changed)
    }

    /// Accumulates raw input. Scale factors multiply, translations and angles add.
    pub fn feed(&mut self, raw: GestureDelta) {
        if raw.kind() != self.kind {
            log::warn!("{:?} recognizer fed a {:?} delta", self.kind, raw.kind());
            return;
        }
        self.pending = self.pending.combine(raw);
        self.phase = if self.is_live() {
            GesturePhase::Changed
        } else {
            GesturePhase::Began
        };
    }

    /// Hands the pending delta to `composer` and stores the identity it returns.
    /// Returns the delta that was applied, or `None` when the gesture is not live.
    pub fn consume(
        &mut self,
        composer: &mut GestureComposer,
        target: &mut AffineState,
    ) -> Option<GestureDelta> {
        if !self.is_live() {
            return None;
        }
        let applied = self.pending;
        self.pending = composer.apply(target, applied);
        Some(applied)
    }

    pub fn end(&mut self, composer: &mut GestureComposer) {
        self.finish(composer, GesturePhase::Ended);
    }

    /// Cancellation cleans up exactly like [`GestureRecognizer::end`].
    pub fn cancel(&mut self, composer: &mut GestureComposer) {
        self.finish(composer, GesturePhase::Cancelled);
    }

    fn finish(&mut self, composer: &mut GestureComposer, phase: GesturePhase) {
        self.pending = GestureDelta::identity(self.kind);
        if self.is_live() {
            self.phase = phase;
        }
        composer.gesture_finished(self.kind);
    }
}
