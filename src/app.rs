//! The operator console shell.
//!
//! Owns the simulated beamline collaborators (motors, zoom optics, the point
//! store and the centring session), feeds a fresh scene snapshot into the
//! canvas every update, applies the commands the canvas emits and renders
//! the context menu. The canvas itself never reaches into this state; it
//! only sees the snapshot and returns commands.

use anyhow::Result;
use eframe::egui;

use crate::canvas::actuation::{ActuationState, ZOOM_MAX, ZOOM_MIN};
use crate::canvas::coords::PixelsPerMm;
use crate::canvas::model::{
    AxisStatus, Beam, BeamShape, ContextMenuState, InteractionMode, LineRef, MarkedPoint,
    MenuTarget, MotorAxis, MotorState, SceneState,
};
use crate::canvas::{CanvasCommand, CanvasView, Surface};
use crate::settings::Settings;

/// Native camera frame dimensions of the simulated instrument.
const NATIVE_SIZE: (f64, f64) = (1360.0, 1024.0);

/// Pixels per millimetre at zoom level 1; higher zoom levels scale linearly.
const BASE_PIXELS_PER_MM: f64 = 200.0;

/// Click-centring needs this many anchors before a point is saved.
const CENTRING_CLICKS: usize = 3;

pub struct ConsoleApp {
    settings: Settings,
    view: CanvasView,
    surface: Surface,
    texture: Option<egui::TextureHandle>,
    mode: InteractionMode,
    menu: ContextMenuState,
    canvas_origin: egui::Pos2,

    beam: Beam,
    points: Vec<MarkedPoint>,
    lines: Vec<LineRef>,
    centring_session: Vec<(f64, f64)>,
    distance_points: Vec<(f64, f64)>,
    next_point_id: u32,
    next_line_id: u32,
    phi: MotorState,
    focus: MotorState,
    zoom_status: AxisStatus,
    zoom_level: u32,
    image_ratio: f64,
}

impl ConsoleApp {
    pub fn new(settings: Settings) -> Result<Self> {
        let view = CanvasView::new(NATIVE_SIZE)?;
        Ok(Self {
            settings,
            view,
            surface: Surface::new(),
            texture: None,
            mode: InteractionMode::None,
            menu: ContextMenuState::default(),
            canvas_origin: egui::Pos2::ZERO,
            beam: Beam {
                position: (NATIVE_SIZE.0 / 2.0, NATIVE_SIZE.1 / 2.0),
                shape: BeamShape::Ellipse,
                size_mm: (0.1, 0.08),
            },
            points: Vec::new(),
            lines: Vec::new(),
            centring_session: Vec::new(),
            distance_points: Vec::new(),
            next_point_id: 1,
            next_line_id: 1,
            phi: MotorState {
                status: AxisStatus::Ready,
                position: 0.0,
            },
            focus: MotorState {
                status: AxisStatus::Ready,
                position: 0.0,
            },
            zoom_status: AxisStatus::Ready,
            zoom_level: 5,
            image_ratio: 2.0,
        })
    }

    fn pixels_per_mm(&self) -> PixelsPerMm {
        let factor = BASE_PIXELS_PER_MM * self.zoom_level as f64;
        PixelsPerMm::new(factor, factor)
    }

    fn scene(&self) -> SceneState {
        SceneState {
            beam: self.beam,
            points: self.points.clone(),
            lines: self.lines.clone(),
            centring_points: self.centring_session.clone(),
            distance_points: self.distance_points.clone(),
            native_size: NATIVE_SIZE,
            image_ratio: self.image_ratio,
            pixels_per_mm: self.pixels_per_mm(),
        }
    }

    fn actuation(&self) -> ActuationState {
        ActuationState {
            phi: self.phi,
            focus: self.focus,
            zoom_status: self.zoom_status,
            zoom_level: self.zoom_level,
        }
    }

    fn apply(&mut self, command: CanvasCommand) {
        tracing::debug!(?command, "canvas command");
        let ppm = self.pixels_per_mm();
        match command {
            CanvasCommand::SetImageRatio { display_width } => {
                if display_width > 0.0 {
                    self.image_ratio = NATIVE_SIZE.0 / display_width;
                }
            }
            CanvasCommand::GoToBeam { x, y } => {
                tracing::info!(x, y, "go to beam");
                self.beam.position = (
                    (x * ppm.x).clamp(0.0, NATIVE_SIZE.0),
                    (y * ppm.y).clamp(0.0, NATIVE_SIZE.1),
                );
            }
            CanvasCommand::AddCentringPoint { x, y } => {
                self.centring_session.push((x * ppm.x, y * ppm.y));
                if self.centring_session.len() >= CENTRING_CLICKS {
                    self.promote_centring_session();
                }
            }
            CanvasCommand::AddDistancePoint { x, y } => {
                if self.distance_points.len() >= 2 {
                    self.distance_points.clear();
                }
                self.distance_points.push((x * ppm.x, y * ppm.y));
            }
            CanvasCommand::SetMotorPosition { axis, position } => {
                tracing::info!(?axis, position, "motor move");
                match axis {
                    MotorAxis::Phi => self.phi.position = position,
                    MotorAxis::Focus => self.focus.position = position,
                }
            }
            CanvasCommand::SetZoom { level } => {
                self.zoom_level = level.clamp(ZOOM_MIN, ZOOM_MAX);
            }
            CanvasCommand::ShowContextMenu {
                visible,
                target,
                position,
            } => {
                self.menu = ContextMenuState {
                    visible,
                    target,
                    anchor: position,
                };
            }
        }
    }

    /// Three centring anchors collapse into one saved point at their
    /// centroid and the session ends.
    fn promote_centring_session(&mut self) {
        let n = self.centring_session.len() as f64;
        let centroid = self
            .centring_session
            .iter()
            .fold((0.0, 0.0), |acc, p| (acc.0 + p.0 / n, acc.1 + p.1 / n));
        let id = format!("P{}", self.next_point_id);
        self.next_point_id += 1;
        tracing::info!(%id, ?centroid, "centring point saved");
        self.points.push(MarkedPoint {
            id: id.clone(),
            position: centroid,
            label: id,
        });
        self.centring_session.clear();
        self.mode = InteractionMode::None;
    }

    fn delete_shape(&mut self, id: &str) {
        self.points.retain(|p| p.id != id);
        self.lines
            .retain(|l| l.id != id && l.p1 != id && l.p2 != id);
    }

    fn toolbar_ui(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let centring = self.mode == InteractionMode::ClickCentring;
            if ui.selectable_label(centring, "3-click centring").clicked() {
                self.mode = if centring {
                    InteractionMode::None
                } else {
                    InteractionMode::ClickCentring
                };
                self.centring_session.clear();
            }
            let measuring = self.mode == InteractionMode::MeasureDistance;
            if ui.selectable_label(measuring, "Measure distance").clicked() {
                self.mode = if measuring {
                    InteractionMode::None
                } else {
                    InteractionMode::MeasureDistance
                };
                self.distance_points.clear();
            }
            ui.separator();
            ui.label(format!("Zoom {}", self.zoom_level));
            ui.label(format!("Phi {:.1}\u{b0}", self.phi.position));
            ui.label(format!("Focus {:.3} mm", self.focus.position));
        });
    }

    fn menu_ui(&mut self, ctx: &egui::Context) {
        if !self.menu.visible {
            return;
        }
        let anchor = self.canvas_origin
            + egui::vec2(self.menu.anchor.0 as f32, self.menu.anchor.1 as f32);
        let target = self.menu.target.clone();
        egui::Area::new(egui::Id::new("canvas-context-menu"))
            .fixed_pos(anchor)
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                egui::Frame::menu(ui.style()).show(ui, |ui| match &target {
                    MenuTarget::Shape { id } => {
                        if ui.button(format!("Delete {id}")).clicked() {
                            self.delete_shape(id);
                            self.menu.visible = false;
                        }
                    }
                    MenuTarget::Group { p1, p2 } => {
                        if ui.button(format!("Join {p1}-{p2}")).clicked() {
                            let id = format!("L{}", self.next_line_id);
                            self.next_line_id += 1;
                            self.lines.push(LineRef {
                                id,
                                p1: p1.clone(),
                                p2: p2.clone(),
                            });
                            self.menu.visible = false;
                        }
                    }
                    MenuTarget::None => {
                        if ui.button("Clear centring points").clicked() {
                            self.centring_session.clear();
                            self.menu.visible = false;
                        }
                        if ui.button("Clear measurement").clicked() {
                            self.distance_points.clear();
                            self.menu.visible = false;
                        }
                    }
                });
            });
    }
}

impl eframe::App for ConsoleApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let texture = self
            .texture
            .get_or_insert_with(|| {
                ctx.load_texture(
                    "sample-frame",
                    sample_frame(256, 192),
                    egui::TextureOptions::LINEAR,
                )
            })
            .clone();

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| self.toolbar_ui(ui));
        egui::CentralPanel::default().show(ctx, |ui| {
            let scene = self.scene();
            let actuation = self.actuation();
            self.surface.rebuild(&scene);
            let mut commands = Vec::new();
            let response = self.view.show(
                ui,
                &texture,
                &scene,
                self.mode,
                actuation,
                &self.settings,
                &mut self.surface,
                &mut commands,
            );
            self.canvas_origin = response.rect.min;
            for command in commands {
                self.apply(command);
            }
        });
        self.menu_ui(ctx);
    }
}

/// Stand-in camera frame: a dark gradient with a lighter blob roughly where
/// a sample loop would sit. Keeps the demo free of bundled assets.
fn sample_frame(width: usize, height: usize) -> egui::ColorImage {
    let mut pixels = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let fx = x as f32 / width as f32;
            let fy = y as f32 / height as f32;
            let base = 40.0 + 50.0 * fx + 30.0 * fy;
            let dx = fx - 0.5;
            let dy = fy - 0.5;
            let blob = (1.0 - (dx * dx + dy * dy).sqrt() * 3.0).max(0.0) * 120.0;
            let v = (base + blob).min(255.0) as u8;
            pixels.push(egui::Color32::from_gray(v));
        }
    }
    egui::ColorImage {
        size: [width, height],
        pixels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> ConsoleApp {
        ConsoleApp::new(Settings::default()).unwrap()
    }

    #[test]
    fn three_centring_points_promote_to_a_saved_point() {
        let mut a = app();
        a.mode = InteractionMode::ClickCentring;
        a.apply(CanvasCommand::AddCentringPoint { x: 0.1, y: 0.1 });
        a.apply(CanvasCommand::AddCentringPoint { x: 0.2, y: 0.2 });
        assert_eq!(a.centring_session.len(), 2);
        assert!(a.points.is_empty());
        a.apply(CanvasCommand::AddCentringPoint { x: 0.3, y: 0.3 });
        assert!(a.centring_session.is_empty());
        assert_eq!(a.points.len(), 1);
        assert_eq!(a.points[0].id, "P1");
        assert_eq!(a.mode, InteractionMode::None);
    }

    #[test]
    fn third_distance_point_restarts_the_measurement() {
        let mut a = app();
        a.apply(CanvasCommand::AddDistancePoint { x: 0.1, y: 0.1 });
        a.apply(CanvasCommand::AddDistancePoint { x: 0.2, y: 0.2 });
        assert_eq!(a.distance_points.len(), 2);
        a.apply(CanvasCommand::AddDistancePoint { x: 0.3, y: 0.3 });
        assert_eq!(a.distance_points.len(), 1);
    }

    #[test]
    fn set_image_ratio_tracks_native_over_display() {
        let mut a = app();
        a.apply(CanvasCommand::SetImageRatio {
            display_width: 680.0,
        });
        assert_eq!(a.image_ratio, 2.0);
        // A degenerate width leaves the ratio untouched.
        a.apply(CanvasCommand::SetImageRatio { display_width: 0.0 });
        assert_eq!(a.image_ratio, 2.0);
    }

    #[test]
    fn deleting_a_point_drops_dependent_lines() {
        let mut a = app();
        a.points.push(MarkedPoint {
            id: "P1".to_string(),
            position: (100.0, 100.0),
            label: "P1".to_string(),
        });
        a.points.push(MarkedPoint {
            id: "P2".to_string(),
            position: (300.0, 100.0),
            label: "P2".to_string(),
        });
        a.lines.push(LineRef {
            id: "L1".to_string(),
            p1: "P1".to_string(),
            p2: "P2".to_string(),
        });
        a.delete_shape("P1");
        assert_eq!(a.points.len(), 1);
        assert!(a.lines.is_empty());
    }

    #[test]
    fn zoom_level_scales_pixels_per_mm() {
        let mut a = app();
        a.apply(CanvasCommand::SetZoom { level: 2 });
        assert_eq!(a.pixels_per_mm().x, BASE_PIXELS_PER_MM * 2.0);
    }
}
