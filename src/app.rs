use std::path::{Path, PathBuf};

use eframe::egui;
use image::DynamicImage;

use crate::canvas::{Canvas, CanvasMode};
use crate::config::EditorConfig;
use crate::error::Result;
use crate::export;
use crate::gesture::{GestureDelta, GestureKind};
use crate::overlay::{TextOverlay, TEXT_PADDING};

const SELECTION_COLOR: egui::Color32 = egui::Color32::from_rgb(0, 120, 255);

pub fn load_photo(path: &Path) -> Result<DynamicImage> {
    let img = image::open(path)?;
    log::info!("Loaded {} ({}x{})", path.display(), img.width(), img.height());
    Ok(img)
}

// ── Interaction State ───────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
enum DragState {
    None,
    Stroke,
    Overlay { id: u64, last: egui::Pos2 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SaveState {
    Idle,
    /// Controls are hidden this frame; the screenshot is requested at its end.
    HidingControls,
    AwaitingScreenshot,
}

// ── App ─────────────────────────────────────────────────────────────────────

pub struct AnnotateApp {
    config: EditorConfig,
    image_path: Option<PathBuf>,
    texture: Option<egui::TextureHandle>,
    raw_image: Option<DynamicImage>,

    canvas: Canvas,
    overlays: Vec<TextOverlay>,
    next_overlay_id: u64,

    drag: DragState,
    selected: Option<u64>,
    editing: Option<u64>,
    /// Overlay receiving the current multi-touch gesture.
    touch_target: Option<u64>,

    save: SaveState,
    canvas_rect: egui::Rect,
}

impl AnnotateApp {
    pub fn new(config: EditorConfig, image_path: Option<PathBuf>) -> Self {
        let raw_image = image_path.as_deref().and_then(|path| match load_photo(path) {
            Ok(img) => Some(img),
            Err(e) => {
                log::error!("Failed to open {}: {}", path.display(), e);
                None
            }
        });
        let first_color = config.palette.first().copied().unwrap_or_default();
        let canvas = Canvas::new(first_color, config.stroke_width);

        Self {
            config,
            image_path,
            texture: None,
            raw_image,
            canvas,
            overlays: Vec::new(),
            next_overlay_id: 1,
            drag: DragState::None,
            selected: None,
            editing: None,
            touch_target: None,
            save: SaveState::Idle,
            canvas_rect: egui::Rect::NOTHING,
        }
    }

    fn open_photo(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("image", &["png", "jpg", "jpeg"])
            .pick_file()
        else {
            return;
        };
        match load_photo(&path) {
            Ok(img) => {
                self.raw_image = Some(img);
                self.image_path = Some(path);
                self.texture = None;
            }
            Err(e) => log::error!("Failed to open {}: {}", path.display(), e),
        }
    }

    fn ensure_texture(&mut self, ctx: &egui::Context) {
        if self.texture.is_some() {
            return;
        }
        if let Some(ref img) = self.raw_image {
            let rgba = img.to_rgba8();
            let size = [rgba.width() as usize, rgba.height() as usize];
            let pixels = rgba.as_flat_samples();
            let color_image = egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice());
            self.texture = Some(ctx.load_texture("photo", color_image, egui::TextureOptions::LINEAR));
        }
    }

    fn to_canvas(&self, screen: egui::Pos2) -> egui::Pos2 {
        (screen - self.canvas_rect.min).to_pos2()
    }

    fn to_screen(&self, canvas: egui::Pos2) -> egui::Pos2 {
        self.canvas_rect.min + canvas.to_vec2()
    }

    fn canvas_center(&self) -> egui::Pos2 {
        (self.canvas_rect.size() * 0.5).to_pos2()
    }

    fn overlay_mut(&mut self, id: u64) -> Option<&mut TextOverlay> {
        self.overlays.iter_mut().find(|o| o.id == id)
    }

    /// Topmost overlay under a canvas-space point.
    fn hit_test(&self, canvas_point: egui::Pos2) -> Option<u64> {
        self.overlays
            .iter()
            .rev()
            .find(|o| o.contains(canvas_point))
            .map(|o| o.id)
    }

    fn add_text(&mut self) {
        let id = self.next_overlay_id;
        self.next_overlay_id += 1;
        let (w, h) = self.config.overlay_size;
        let overlay = TextOverlay::new(
            id,
            self.config.overlay_placeholder.clone(),
            self.config.overlay_font_size,
            self.canvas_center(),
            egui::vec2(w, h),
            self.config.edge_threshold,
        );
        self.overlays.push(overlay);
        self.selected = Some(id);
        self.canvas.set_mode(CanvasMode::HandlingLabel);
        log::debug!("added text overlay {id}");
    }

    /// Editing always happens at the canvas center so the field is never hidden.
    fn begin_editing(&mut self, id: u64) {
        let center = self.canvas_center();
        if let Some(overlay) = self.overlay_mut(id) {
            overlay.recenter(center);
            self.editing = Some(id);
            self.selected = Some(id);
            self.canvas.set_mode(CanvasMode::HandlingLabel);
        }
    }

    /// Tap on empty canvas: leave text editing and return to drawing.
    fn end_editing(&mut self) {
        self.editing = None;
        self.selected = None;
        self.canvas.set_mode(CanvasMode::Drawing);
    }

    fn cancel_interactions(&mut self) {
        match self.drag {
            DragState::Overlay { id, .. } => {
                if let Some(overlay) = self.overlay_mut(id) {
                    overlay.pointer_cancel();
                }
            }
            DragState::Stroke => self.canvas.cancel_stroke(),
            DragState::None => {}
        }
        self.drag = DragState::None;
        if let Some(id) = self.touch_target.take() {
            if let Some(overlay) = self.overlay_mut(id) {
                overlay.cancel_all();
            }
        }
    }

    fn rotate_selected(&mut self, radians: f32) {
        let Some(id) = self.selected else {
            return;
        };
        if let Some(overlay) = self.overlay_mut(id) {
            overlay.gesture(GestureDelta::Rotate(radians));
            overlay.gesture_end(GestureKind::Rotate);
        }
    }

    // ── Drawing ────────────────────────────────────────────────────────────

    /// Aspect-fill: the photo covers the canvas and is cropped around its center.
    fn draw_background(&self, painter: &egui::Painter) {
        let Some(ref tex) = self.texture else {
            return;
        };
        let rect = self.canvas_rect;
        let [tw, th] = tex.size();
        let tex_aspect = tw as f32 / th.max(1) as f32;
        let rect_aspect = rect.width() / rect.height().max(1.0);
        let uv = if tex_aspect > rect_aspect {
            let w = rect_aspect / tex_aspect;
            egui::Rect::from_min_max(egui::pos2(0.5 - w / 2.0, 0.0), egui::pos2(0.5 + w / 2.0, 1.0))
        } else {
            let h = tex_aspect / rect_aspect;
            egui::Rect::from_min_max(egui::pos2(0.0, 0.5 - h / 2.0), egui::pos2(1.0, 0.5 + h / 2.0))
        };
        painter.image(tex.id(), rect, uv, egui::Color32::WHITE);
    }

    fn draw_strokes(&self, painter: &egui::Painter) {
        for stroke in self.canvas.strokes().iter().chain(self.canvas.current()) {
            let points: Vec<egui::Pos2> = stroke.points.iter().map(|p| self.to_screen(*p)).collect();
            let s = egui::Stroke::new(stroke.width, stroke.color.to_egui());
            if points.len() == 1 {
                painter.circle_filled(points[0], stroke.width / 2.0, s.color);
            } else {
                painter.add(egui::Shape::line(points, s));
            }
        }
    }

    fn draw_overlays(&self, painter: &egui::Painter) {
        for overlay in &self.overlays {
            let corners: Vec<egui::Pos2> = overlay.corners().iter().map(|c| self.to_screen(*c)).collect();
            painter.add(egui::Shape::convex_polygon(
                corners.clone(),
                egui::Color32::BLACK,
                egui::Stroke::NONE,
            ));

            if self.editing != Some(overlay.id) {
                let scale = overlay.affine.scale();
                let galley = painter.layout_no_wrap(
                    overlay.text.clone(),
                    egui::FontId::proportional(overlay.font_size * scale),
                    egui::Color32::WHITE,
                );
                let anchor = overlay.affine.center + overlay.affine.apply(TEXT_PADDING - overlay.size * 0.5);
                painter.add(
                    egui::epaint::TextShape::new(self.to_screen(anchor), galley, egui::Color32::WHITE)
                        .with_angle(overlay.affine.angle()),
                );
            }

            if self.selected == Some(overlay.id) && self.save == SaveState::Idle {
                painter.add(egui::Shape::closed_line(
                    corners,
                    egui::Stroke::new(1.5, SELECTION_COLOR),
                ));
            }
        }
    }

    // ── Input ──────────────────────────────────────────────────────────────

    fn handle_keys(&mut self, ctx: &egui::Context) {
        let step = self.config.rotate_step_degrees.to_radians();
        let typing = self.editing.is_some();
        let (undo, escape, rotate) = ctx.input(|i| {
            let undo = i.modifiers.command && i.key_pressed(egui::Key::Z);
            let escape = i.key_pressed(egui::Key::Escape);
            let rotate = if typing {
                0.0
            } else if i.key_pressed(egui::Key::Q) {
                -step
            } else if i.key_pressed(egui::Key::E) {
                step
            } else {
                0.0
            };
            (undo, escape, rotate)
        });
        if undo && !typing {
            self.canvas.undo();
        }
        if escape {
            self.cancel_interactions();
            self.end_editing();
        }
        if rotate != 0.0 {
            self.rotate_selected(rotate);
        }
    }

    /// Routes multi-touch pinch/rotate/pan, or Ctrl+wheel zoom, to an overlay.
    fn handle_gestures(&mut self, ctx: &egui::Context, response: &egui::Response) {
        if let Some(touch) = ctx.multi_touch() {
            if self.touch_target.is_none() {
                // A second finger turns any single-pointer drag into a cancelled one.
                if self.drag != DragState::None {
                    self.cancel_interactions();
                }
                let start = self.to_canvas(touch.start_pos);
                self.touch_target = self.hit_test(start).or(self.selected);
            }
            let Some(id) = self.touch_target else {
                return;
            };
            self.selected = Some(id);
            self.canvas.set_mode(CanvasMode::HandlingLabel);
            if let Some(overlay) = self.overlay_mut(id) {
                if touch.zoom_delta != 1.0 {
                    overlay.gesture(GestureDelta::Scale(touch.zoom_delta));
                }
                if touch.rotation_delta != 0.0 {
                    overlay.gesture(GestureDelta::Rotate(touch.rotation_delta));
                }
                if touch.translation_delta != egui::Vec2::ZERO {
                    overlay.gesture(GestureDelta::Pan(touch.translation_delta));
                }
            }
            return;
        }

        if let Some(id) = self.touch_target.take() {
            if let Some(overlay) = self.overlay_mut(id) {
                for kind in GestureKind::ALL {
                    overlay.gesture_end(kind);
                }
            }
        }

        let zoom = ctx.input(|i| i.zoom_delta());
        if zoom != 1.0 {
            let hovered = response
                .hover_pos()
                .and_then(|p| self.hit_test(self.to_canvas(p)));
            if let Some(overlay) = hovered.or(self.selected).and_then(|id| self.overlay_mut(id)) {
                overlay.gesture(GestureDelta::Scale(zoom));
                overlay.gesture_end(GestureKind::Pinch);
            }
        }
    }

    /// Single-pointer drags: corner resize or move on overlays, strokes elsewhere.
    fn handle_pointer(&mut self, ctx: &egui::Context, response: &egui::Response) {
        if self.touch_target.is_some() {
            return;
        }

        if response.double_clicked() {
            if let Some(id) = response
                .interact_pointer_pos()
                .and_then(|p| self.hit_test(self.to_canvas(p)))
            {
                self.begin_editing(id);
            }
        } else if response.clicked() {
            match response
                .interact_pointer_pos()
                .and_then(|p| self.hit_test(self.to_canvas(p)))
            {
                Some(id) => {
                    self.selected = Some(id);
                    self.canvas.set_mode(CanvasMode::HandlingLabel);
                }
                None => self.end_editing(),
            }
        }

        if response.drag_started_by(egui::PointerButton::Primary) {
            let origin = ctx
                .input(|i| i.pointer.press_origin())
                .or(response.interact_pointer_pos());
            if let Some(screen) = origin {
                let p = self.to_canvas(screen);
                match self.hit_test(p) {
                    Some(id) => {
                        self.selected = Some(id);
                        self.canvas.set_mode(CanvasMode::HandlingLabel);
                        let started = self.overlay_mut(id).and_then(|o| o.pointer_down(p));
                        if started.is_some() {
                            self.drag = DragState::Overlay { id, last: p };
                        }
                    }
                    None if self.canvas.mode() == CanvasMode::HandlingLabel => self.end_editing(),
                    None => {
                        if self.canvas.begin_stroke(p) {
                            self.drag = DragState::Stroke;
                        }
                    }
                }
            }
        }

        if response.dragged_by(egui::PointerButton::Primary) {
            if let Some(screen) = response.interact_pointer_pos() {
                let p = self.to_canvas(screen);
                match self.drag {
                    DragState::Overlay { id, last } => {
                        if let Some(overlay) = self.overlay_mut(id) {
                            overlay.pointer_move(p, last);
                        }
                        self.drag = DragState::Overlay { id, last: p };
                    }
                    DragState::Stroke => self.canvas.extend_stroke(p),
                    DragState::None => {}
                }
            }
        }

        if response.drag_stopped_by(egui::PointerButton::Primary) {
            match self.drag {
                DragState::Overlay { id, .. } => {
                    if let Some(overlay) = self.overlay_mut(id) {
                        overlay.pointer_up();
                    }
                }
                DragState::Stroke => self.canvas.end_stroke(),
                DragState::None => {}
            }
            self.drag = DragState::None;
        } else if self.drag != DragState::None {
            let lost = ctx.input(|i| !i.focused || i.pointer.latest_pos().is_none());
            if lost {
                log::debug!("pointer lost mid-drag, cancelling");
                self.cancel_interactions();
            }
        }
    }

    fn show_text_editor(&mut self, ctx: &egui::Context) {
        let Some(id) = self.editing else {
            return;
        };
        let origin = self.canvas_rect.min;
        let Some(index) = self.overlays.iter().position(|o| o.id == id) else {
            self.editing = None;
            return;
        };
        let overlay = &mut self.overlays[index];
        let screen_pos = origin + overlay.frame().min.to_vec2();
        let font = egui::FontId::proportional(overlay.font_size);
        let mut finished = false;

        egui::Area::new(egui::Id::new(("overlay_text", id)))
            .fixed_pos(screen_pos)
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                let te = ui.add(
                    egui::TextEdit::singleline(&mut overlay.text)
                        .font(font.clone())
                        .desired_width(overlay.size.x.abs()),
                );
                if te.changed() {
                    let size = ui
                        .fonts(|f| f.layout_no_wrap(overlay.text.clone(), font.clone(), egui::Color32::WHITE))
                        .size();
                    overlay.fit_text(size);
                }
                if te.lost_focus() {
                    finished = true;
                } else {
                    te.request_focus();
                }
            });

        if finished {
            self.end_editing();
        }
    }

    // ── Save ───────────────────────────────────────────────────────────────

    fn handle_screenshot(&mut self, ctx: &egui::Context) {
        if self.save != SaveState::AwaitingScreenshot {
            return;
        }
        let shot = ctx.input(|i| {
            i.raw.events.iter().find_map(|e| match e {
                egui::Event::Screenshot { image, .. } => Some(image.clone()),
                _ => None,
            })
        });
        let Some(image) = shot else {
            return;
        };
        self.save = SaveState::Idle;
        if let Err(e) = self.write_snapshot(&image, ctx.pixels_per_point()) {
            log::error!("Failed to save annotated image: {}", e);
        }
    }

    fn write_snapshot(&self, image: &egui::ColorImage, pixels_per_point: f32) -> Result<()> {
        let flat = export::crop_snapshot(image, self.canvas_rect, pixels_per_point)?;
        let path = match &self.image_path {
            Some(p) => export::annotated_path(p),
            None => match rfd::FileDialog::new()
                .set_file_name("annotated.png")
                .save_file()
            {
                Some(p) => p,
                None => return Ok(()),
            },
        };
        export::save_flattened(&flat, &path)
    }

    /// Controls float over the canvas so hiding them for a snapshot leaves the layout alone.
    fn show_controls(&mut self, ctx: &egui::Context) {
        egui::Area::new(egui::Id::new("toolbar"))
            .anchor(egui::Align2::LEFT_TOP, egui::vec2(20.0, 20.0))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.horizontal(|ui| {
                        if ui.button("Open").clicked() {
                            self.open_photo();
                        }
                        if ui.button("Save").clicked() {
                            self.cancel_interactions();
                            self.end_editing();
                            self.save = SaveState::HidingControls;
                            ctx.request_repaint();
                        }
                        ui.separator();
                        if ui.button("[ t ]").clicked() {
                            self.add_text();
                        }
                    });
                });
            });

        egui::Area::new(egui::Id::new("drawing_controls"))
            .anchor(egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -20.0))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.horizontal(|ui| {
                        if ui.button("Undo").clicked() {
                            self.canvas.undo();
                        }
                        ui.separator();
                        for color in self.config.palette.clone() {
                            let selected = self.canvas.color() == color;
                            let button = egui::Button::new("    ")
                                .fill(color.to_egui())
                                .stroke(if selected {
                                    egui::Stroke::new(2.0, SELECTION_COLOR)
                                } else {
                                    egui::Stroke::NONE
                                });
                            if ui.add(button).clicked() {
                                self.canvas.change_color(color);
                            }
                        }
                        ui.separator();
                        if ui.button("Clear").clicked() {
                            self.canvas.clear();
                        }
                    });
                });
            });
    }
}

// ── eframe App impl ────────────────────────────────────────────────────────

impl eframe::App for AnnotateApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ensure_texture(ctx);
        self.handle_screenshot(ctx);

        if self.save == SaveState::Idle {
            self.handle_keys(ctx);
            self.show_controls(ctx);
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::default())
            .show(ctx, |ui| {
                let (response, painter) =
                    ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
                self.canvas_rect = response.rect;

                painter.rect_filled(self.canvas_rect, 0.0, egui::Color32::from_gray(40));
                self.draw_background(&painter);
                self.draw_strokes(&painter);
                self.draw_overlays(&painter);

                if self.save == SaveState::Idle {
                    self.handle_gestures(ctx, &response);
                    self.handle_pointer(ctx, &response);
                }
            });

        match self.save {
            SaveState::Idle => self.show_text_editor(ctx),
            SaveState::HidingControls => {
                ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(Default::default()));
                self.save = SaveState::AwaitingScreenshot;
                ctx.request_repaint();
            }
            SaveState::AwaitingScreenshot => {}
        }
    }
}
