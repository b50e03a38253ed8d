//! The mountable egui surface: paints the camera frame and the overlay
//! shapes, and binds the four raw pointer events plus the resize responder.
//!
//! All interaction semantics live in [`crate::canvas::input`] and
//! [`crate::canvas::actuation`]; this module only translates egui's
//! pointer/scroll state into those calls and forwards the resulting
//! commands.

use anyhow::{anyhow, Result};
use eframe::egui;

use crate::canvas::actuation::{translate_wheel, ActuationState, WheelEvent, WheelModifiers};
use crate::canvas::coords::to_physical_space;
use crate::canvas::input::{handle_double_click, handle_primary_click, handle_secondary_click};
use crate::canvas::messages::CanvasCommand;
use crate::canvas::model::{
    InteractionMode, SceneState, SelectionState, ShapeGeometry, ShapeKind,
};
use crate::canvas::surface::Surface;
use crate::settings::Settings;

const BEAM_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 64, 64);
const MARKER_COLOR: egui::Color32 = egui::Color32::from_rgb(64, 255, 128);
const POINT_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 220, 64);
const LINE_COLOR: egui::Color32 = egui::Color32::from_rgb(128, 192, 255);
const SELECTION_COLOR: egui::Color32 = egui::Color32::WHITE;

pub struct CanvasView {
    native_size: (f64, f64),
    last_display_width: Option<f64>,
}

impl CanvasView {
    /// Fails when the native frame has a degenerate dimension: without it no
    /// image ratio can ever be computed, which is a mount error rather than
    /// something to limp past.
    pub fn new(native_size: (f64, f64)) -> Result<Self> {
        if native_size.0 <= 0.0 || native_size.1 <= 0.0 {
            return Err(anyhow!(
                "camera frame has degenerate dimensions {}x{}",
                native_size.0,
                native_size.1
            ));
        }
        Ok(Self {
            native_size,
            last_display_width: None,
        })
    }

    pub fn native_size(&self) -> (f64, f64) {
        self.native_size
    }

    /// Mount the surface into the current ui. The surface must already be
    /// rebuilt for this frame's scene; emitted commands are appended to
    /// `commands` for the owner to apply.
    #[allow(clippy::too_many_arguments)]
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        texture: &egui::TextureHandle,
        scene: &SceneState,
        mode: InteractionMode,
        actuation: ActuationState,
        settings: &Settings,
        surface: &mut Surface,
        commands: &mut Vec<CanvasCommand>,
    ) -> egui::Response {
        // Resize responder: when the container width changes the owner
        // recomputes the image ratio, which resizes the surface on the next
        // rebuild.
        let available = ui.available_width() as f64;
        if self
            .last_display_width
            .map_or(true, |w| (w - available).abs() > 0.5)
        {
            self.last_display_width = Some(available);
            commands.push(CanvasCommand::SetImageRatio {
                display_width: available,
            });
        }

        let (w, h) = surface.display_size();
        let desired = egui::vec2(w as f32, h as f32);
        let (rect, response) = ui.allocate_exact_size(desired, egui::Sense::click());

        let painter = ui.painter_at(rect);
        painter.image(
            texture.id(),
            rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );
        self.paint_shapes(&painter, rect, scene, surface);

        let local = |pos: egui::Pos2| ((pos.x - rect.min.x) as f64, (pos.y - rect.min.y) as f64);

        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                commands.extend(handle_primary_click(
                    local(pos),
                    mode,
                    scene.image_ratio,
                    scene.pixels_per_mm,
                ));
            }
        }
        if response.secondary_clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                commands.extend(handle_secondary_click(surface, local(pos)));
            }
        }
        if response.double_clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                commands.push(handle_double_click(
                    local(pos),
                    scene.image_ratio,
                    scene.pixels_per_mm,
                ));
            }
        }

        if response.hovered() {
            let (raw_scroll, modifiers) = ui.input(|i| (i.raw_scroll_delta, i.modifiers));
            if raw_scroll != egui::Vec2::ZERO {
                // egui reports scroll as content motion; flip to the wheel
                // convention where scrolling down is positive.
                let event = WheelEvent {
                    delta: (-raw_scroll.x as f64, -raw_scroll.y as f64),
                    modifiers: WheelModifiers {
                        control: modifiers.ctrl,
                        alt: modifiers.alt,
                    },
                };
                if let Some(command) =
                    translate_wheel(event, actuation, settings.motor_steps, settings.scroll)
                {
                    commands.push(command);
                }
                // The canvas sits outside any scroll area, so the event goes
                // no further regardless of whether a branch fired.
            }
        }

        response
    }

    fn paint_shapes(
        &self,
        painter: &egui::Painter,
        rect: egui::Rect,
        scene: &SceneState,
        surface: &Surface,
    ) {
        let at = |p: (f64, f64)| egui::pos2(rect.min.x + p.0 as f32, rect.min.y + p.1 as f32);

        for shape in surface.shapes() {
            let color = match shape.kind {
                ShapeKind::BeamIndicator => BEAM_COLOR,
                ShapeKind::Overlay => MARKER_COLOR,
                ShapeKind::Point { .. } => POINT_COLOR,
                ShapeKind::Line { .. } => LINE_COLOR,
            };
            let stroke = egui::Stroke::new(1.5, color);
            match shape.geometry {
                ShapeGeometry::Circle { center, radius } => {
                    painter.circle_stroke(at(center), radius as f32, stroke);
                }
                ShapeGeometry::Segment { a, b } => {
                    painter.line_segment([at(a), at(b)], stroke);
                }
                ShapeGeometry::Ellipse { center, radii } => {
                    painter.add(egui::epaint::EllipseShape {
                        center: at(center),
                        radius: egui::vec2(radii.0 as f32, radii.1 as f32),
                        fill: egui::Color32::TRANSPARENT,
                        stroke,
                    });
                }
                ShapeGeometry::Rect { min, size } => {
                    let r = egui::Rect::from_min_size(
                        at(min),
                        egui::vec2(size.0 as f32, size.1 as f32),
                    );
                    painter.rect_stroke(r, 0.0, stroke);
                }
                ShapeGeometry::Cross { center, arm } => {
                    let c = at(center);
                    let arm = arm as f32;
                    painter.line_segment(
                        [c - egui::vec2(arm, 0.0), c + egui::vec2(arm, 0.0)],
                        stroke,
                    );
                    painter.line_segment(
                        [c - egui::vec2(0.0, arm), c + egui::vec2(0.0, arm)],
                        stroke,
                    );
                }
            }
            if let ShapeKind::Point { ref label, .. } = shape.kind {
                let (min, _) = shape.geometry.bounds();
                painter.text(
                    at(min) + egui::vec2(-2.0, -2.0),
                    egui::Align2::RIGHT_BOTTOM,
                    label,
                    egui::FontId::proportional(12.0),
                    POINT_COLOR,
                );
            }
        }

        self.paint_selection(painter, rect, surface);
        self.paint_distance_label(painter, rect, scene);
    }

    fn paint_selection(&self, painter: &egui::Painter, rect: egui::Rect, surface: &Surface) {
        let at = |p: (f64, f64)| egui::pos2(rect.min.x + p.0 as f32, rect.min.y + p.1 as f32);
        let stroke = egui::Stroke::new(1.0, SELECTION_COLOR);
        match surface.selection() {
            SelectionState::None => {}
            SelectionState::Single(id) => {
                if let Some(shape) = surface.shape(id) {
                    let (min, max) = shape.geometry.bounds();
                    let r = egui::Rect::from_min_max(at(min), at(max)).expand(2.0);
                    painter.rect_stroke(r, 2.0, stroke);
                }
            }
            SelectionState::Group(..) => {
                if let Some((min, max)) = surface.group_bounds() {
                    let r = egui::Rect::from_min_max(at(min), at(max)).expand(4.0);
                    painter.rect_stroke(r, 2.0, stroke);
                    if let Some(centroid) = surface.group_centroid() {
                        painter.circle_filled(at(centroid), 2.0, SELECTION_COLOR);
                    }
                }
            }
        }
    }

    fn paint_distance_label(
        &self,
        painter: &egui::Painter,
        rect: egui::Rect,
        scene: &SceneState,
    ) {
        let [a, b] = scene.distance_points.as_slice() else {
            return;
        };
        let pa = to_physical_space(*a, scene.pixels_per_mm);
        let pb = to_physical_space(*b, scene.pixels_per_mm);
        let mm = ((pa.0 - pb.0).powi(2) + (pa.1 - pb.1).powi(2)).sqrt();
        let mid = (
            (a.0 + b.0) / 2.0 / scene.image_ratio,
            (a.1 + b.1) / 2.0 / scene.image_ratio,
        );
        painter.text(
            egui::pos2(rect.min.x + mid.0 as f32, rect.min.y + mid.1 as f32 - 6.0),
            egui::Align2::CENTER_BOTTOM,
            format!("{:.3} mm", mm),
            egui::FontId::proportional(12.0),
            MARKER_COLOR,
        );
    }
}
