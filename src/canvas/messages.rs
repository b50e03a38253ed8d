use crate::canvas::model::{MenuTarget, MotorAxis};

/// Commands the canvas emits outward to the owning application. All are
/// fire-and-forget: the canvas never consumes a reply, and a rejected
/// command is the owner's concern.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasCommand {
    /// Viewport width changed; the owner recomputes the image ratio from
    /// the native image width.
    SetImageRatio { display_width: f64 },
    /// Centre the stage on this physical coordinate (mm).
    GoToBeam { x: f64, y: f64 },
    AddCentringPoint { x: f64, y: f64 },
    AddDistancePoint { x: f64, y: f64 },
    SetMotorPosition { axis: MotorAxis, position: f64 },
    /// Absolute zoom level, already clamped to the valid range.
    SetZoom { level: u32 },
    ShowContextMenu {
        visible: bool,
        target: MenuTarget,
        position: (f64, f64),
    },
}

impl CanvasCommand {
    /// Shorthand for the close-menu command issued before most handlers run.
    pub fn hide_context_menu() -> Self {
        Self::ShowContextMenu {
            visible: false,
            target: MenuTarget::None,
            position: (0.0, 0.0),
        }
    }
}
