//! Corner-drag resizing of rectangular surfaces.
//!
//! A drag that starts inside one of the four corner zones resizes the surface for the rest
//! of that drag; a drag starting anywhere else moves it. Points are always expressed in the
//! surface's own local space.

use egui::{Pos2, Rect};

/// Corner zone a drag started in. `None` means an interior drag that translates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EdgeZone {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    #[default]
    None,
}

/// Transient state of one single-pointer drag.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSession {
    pub start_point: Pos2,
    pub zone: EdgeZone,
}

/// Classifies `point` against the corner zones of `bounds`.
///
/// Bottom-right is tested first, then top-left, top-right and bottom-left. When the
/// threshold is large enough for zones to overlap, the first match wins.
///
/// Distances are measured to the visual edges, so a surface whose width or height has gone
/// negative still has an interior. Distances are not required to be non-negative: a point
/// just outside the bottom-right corner still grabs it.
pub fn classify_edge(point: Pos2, bounds: Rect, threshold: f32) -> EdgeZone {
    let bounds = Rect::from_two_pos(bounds.min, bounds.max);
    let from_left = point.x - bounds.min.x;
    let from_top = point.y - bounds.min.y;
    let from_right = bounds.max.x - point.x;
    let from_bottom = bounds.max.y - point.y;

    if from_right < threshold && from_bottom < threshold {
        EdgeZone::BottomRight
    } else if from_left < threshold && from_top < threshold {
        EdgeZone::TopLeft
    } else if from_right < threshold && from_top < threshold {
        EdgeZone::TopRight
    } else if from_left < threshold && from_bottom < threshold {
        EdgeZone::BottomLeft
    } else {
        EdgeZone::None
    }
}

/// Computes the frame after one move event.
///
/// Resize zones apply the incremental `current - previous` delta. The `None` zone moves the
/// frame center by `current - drag_start` instead, measured from the start of the drag.
/// Width and height are never clamped and may become negative.
pub fn resize_frame(
    zone: EdgeZone,
    current: Pos2,
    previous: Pos2,
    drag_start: Pos2,
    frame: Rect,
) -> Rect {
    let origin = frame.min;
    let size = frame.size();
    let dw = current.x - previous.x;
    let dh = current.y - previous.y;

    let (origin, size) = match zone {
        EdgeZone::TopLeft => (origin + egui::vec2(dw, dh), size - egui::vec2(dw, dh)),
        EdgeZone::TopRight => (origin + egui::vec2(0.0, dh), size + egui::vec2(dw, -dh)),
        EdgeZone::BottomRight => (origin, size + egui::vec2(dw, dh)),
        EdgeZone::BottomLeft => (origin + egui::vec2(dw, 0.0), size + egui::vec2(-dw, dh)),
        EdgeZone::None => (origin + (current - drag_start), size),
    };
    Rect::from_min_size(origin, size)
}

/// Owns the single drag session of one resizable surface.
#[derive(Clone, Debug)]
pub struct EdgeResizeController {
    edge_threshold: f32,
    session: Option<DragSession>,
}

impl EdgeResizeController {
    pub fn new(edge_threshold: f32) -> Self {
        Self {
            edge_threshold,
            session: None,
        }
    }

    pub fn session(&self) -> Option<DragSession> {
        self.session
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Zone of the active drag, `EdgeZone::None` when idle.
    pub fn active_zone(&self) -> EdgeZone {
        self.session.map(|s| s.zone).unwrap_or_default()
    }

    /// Starts a drag at `point` (local space). A second touch while a drag is already
    /// running is ignored and the running zone is returned.
    pub fn drag_start(&mut self, point: Pos2, bounds: Rect) -> EdgeZone {
        if let Some(session) = self.session {
            log::trace!("ignoring extra touch at {point:?}, drag already active");
            return session.zone;
        }
        let zone = classify_edge(point, bounds, self.edge_threshold);
        log::debug!("drag started at {point:?} in zone {zone:?}");
        self.session = Some(DragSession {
            start_point: point,
            zone,
        });
        zone
    }

    /// Applies one move event to `frame`. Without an active drag the frame is returned
    /// unchanged.
    pub fn drag_move(&mut self, current: Pos2, previous: Pos2, frame: Rect) -> Rect {
        match self.session {
            Some(session) => resize_frame(session.zone, current, previous, session.start_point, frame),
            None => frame,
        }
    }

    pub fn drag_end(&mut self) {
        if self.session.take().is_some() {
            log::debug!("drag ended");
        }
    }

    /// System-cancelled drag; cleans up exactly like [`EdgeResizeController::drag_end`].
    pub fn drag_cancel(&mut self) {
        if self.session.take().is_some() {
            log::debug!("drag cancelled");
        }
    }
}
