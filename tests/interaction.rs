//! Multi-step interaction scenarios against the public overlay API.

use egui::{Pos2, Rect};
use glam::Mat2;
use photo_annotate::geometry::AffineState;
use photo_annotate::gesture::{ComposerState, GestureComposer, GestureDelta, GestureKind, GestureRecognizer};
use photo_annotate::overlay::TextOverlay;
use photo_annotate::resize::{resize_frame, EdgeResizeController, EdgeZone};

fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
    Rect::from_min_size(egui::pos2(x, y), egui::vec2(w, h))
}

fn local_bounds(frame: Rect) -> Rect {
    Rect::from_min_size(Pos2::ZERO, frame.size())
}

#[test]
fn test_resize_then_second_drag_sequence() {
    let mut ctl = EdgeResizeController::new(10.0);
    let mut frame = rect(0.0, 0.0, 100.0, 100.0);

    assert_eq!(ctl.drag_start(egui::pos2(98.0, 98.0), local_bounds(frame)), EdgeZone::BottomRight);
    frame = ctl.drag_move(egui::pos2(108.0, 108.0), egui::pos2(98.0, 98.0), frame);
    assert_eq!(frame, rect(0.0, 0.0, 108.0, 108.0));
    ctl.drag_end();

    assert_eq!(ctl.drag_start(egui::pos2(5.0, 5.0), local_bounds(frame)), EdgeZone::TopLeft);
    frame = ctl.drag_move(egui::pos2(0.0, 0.0), egui::pos2(5.0, 5.0), frame);
    assert_eq!(frame.min, egui::pos2(-5.0, -5.0));
    assert_eq!(frame.size(), egui::vec2(113.0, 113.0));
    ctl.drag_end();
    assert_eq!(ctl.active_zone(), EdgeZone::None);
}

#[test]
fn test_cancel_path_matches_end_path() {
    let frame = rect(0.0, 0.0, 100.0, 100.0);
    let mut ended = EdgeResizeController::new(10.0);
    let mut cancelled = EdgeResizeController::new(10.0);

    for ctl in [&mut ended, &mut cancelled] {
        ctl.drag_start(egui::pos2(95.0, 5.0), local_bounds(frame));
        ctl.drag_move(egui::pos2(99.0, 1.0), egui::pos2(95.0, 5.0), frame);
    }
    ended.drag_end();
    cancelled.drag_cancel();

    assert_eq!(ended.session(), cancelled.session());
    assert!(cancelled.session().is_none());
    // A move after cleanup does nothing on either path.
    assert_eq!(cancelled.drag_move(egui::pos2(50.0, 50.0), egui::pos2(0.0, 0.0), frame), frame);
}

#[test]
fn test_interior_translation_is_start_relative() {
    let frame = rect(0.0, 0.0, 100.0, 100.0);
    let start = egui::pos2(50.0, 50.0);
    let current = egui::pos2(62.0, 41.0);
    // The previous point is ignored: only current - start matters.
    let a = resize_frame(EdgeZone::None, current, egui::pos2(61.0, 41.0), start, frame);
    let b = resize_frame(EdgeZone::None, current, egui::pos2(0.0, 0.0), start, frame);
    assert_eq!(a, b);
    assert_eq!(a.center(), frame.center() + (current - start));
}

#[test]
fn test_interior_drag_path_independent_on_overlay() {
    let center = egui::pos2(300.0, 200.0);
    let size = egui::vec2(200.0, 50.0);

    let mut stepped = TextOverlay::new(1, "a".into(), 18.0, center, size, 10.0);
    let start = egui::pos2(310.0, 205.0);
    assert_eq!(stepped.pointer_down(start), Some(EdgeZone::None));
    let path = [
        egui::pos2(312.0, 204.0),
        egui::pos2(320.0, 199.0),
        egui::pos2(335.0, 210.0),
        egui::pos2(340.0, 215.0),
    ];
    let mut previous = start;
    for p in path {
        stepped.pointer_move(p, previous);
        previous = p;
    }
    stepped.pointer_up();

    let mut direct = TextOverlay::new(2, "b".into(), 18.0, center, size, 10.0);
    direct.pointer_down(start);
    direct.pointer_move(egui::pos2(340.0, 215.0), start);
    direct.pointer_up();

    let expected = center + (egui::pos2(340.0, 215.0) - start);
    assert!((stepped.affine.center - expected).length() < 1e-3);
    assert!((direct.affine.center - expected).length() < 1e-3);
}

#[test]
fn test_gesture_interleavings() {
    let deltas = [
        GestureDelta::Scale(1.2),
        GestureDelta::Rotate(0.1),
        GestureDelta::Pan(egui::vec2(5.0, 5.0)),
    ];
    let orders: [[usize; 3]; 6] = [
        [0, 1, 2],
        [0, 2, 1],
        [1, 0, 2],
        [1, 2, 0],
        [2, 0, 1],
        [2, 1, 0],
    ];
    let start = egui::pos2(100.0, 100.0);
    let scale = Mat2::from_diagonal(glam::Vec2::splat(1.2));
    let rotate = Mat2::from_angle(0.1);

    for order in orders {
        let mut composer = GestureComposer::new();
        let mut recognizers = [
            GestureRecognizer::new(GestureKind::Pinch),
            GestureRecognizer::new(GestureKind::Rotate),
            GestureRecognizer::new(GestureKind::Pan),
        ];
        let mut state = AffineState::new(start);

        for i in order {
            recognizers[i].feed(deltas[i]);
            recognizers[i].consume(&mut composer, &mut state);
            assert!(recognizers[i].pending().is_identity());
        }
        assert_eq!(composer.state(), ComposerState::Active);

        // Pan commutes with the linear pair.
        assert_eq!(state.center, egui::pos2(105.0, 105.0));

        // The linear part follows call order: each handler right-multiplies.
        let scale_first = order.iter().position(|i| *i == 0) < order.iter().position(|i| *i == 1);
        let expected = if scale_first { scale * rotate } else { rotate * scale };
        assert!(state.linear.abs_diff_eq(expected, 1e-6), "order {order:?}");
        // Uniform scale and rotation commute, so both orders agree up to rounding.
        assert!(state.linear.abs_diff_eq(scale * rotate, 1e-5));

        for r in &mut recognizers {
            r.end(&mut composer);
        }
        assert_eq!(composer.state(), ComposerState::Idle);
        assert_eq!(state.center, egui::pos2(105.0, 105.0));
    }
}

#[test]
fn test_gesture_session_does_not_leak_after_cancel() {
    let mut composer = GestureComposer::new();
    let mut pinch = GestureRecognizer::new(GestureKind::Pinch);
    let mut state = AffineState::default();

    pinch.feed(GestureDelta::Scale(3.0));
    pinch.cancel(&mut composer);

    pinch.feed(GestureDelta::Scale(1.5));
    pinch.consume(&mut composer, &mut state);
    assert!((state.scale() - 1.5).abs() < 1e-6);
}
