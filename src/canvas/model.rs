//! Shape and interaction state types for the sample canvas.

use crate::canvas::coords::PixelsPerMm;

/// Hit tolerance around line segments, in display pixels.
const SEGMENT_HIT_TOLERANCE: f64 = 4.0;

/// Drawable geometry in display-space coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeGeometry {
    Circle { center: (f64, f64), radius: f64 },
    Segment { a: (f64, f64), b: (f64, f64) },
    Ellipse { center: (f64, f64), radii: (f64, f64) },
    Rect { min: (f64, f64), size: (f64, f64) },
    Cross { center: (f64, f64), arm: f64 },
}

impl ShapeGeometry {
    /// Point-containment test used for hit-testing.
    pub fn contains(&self, p: (f64, f64)) -> bool {
        match *self {
            Self::Circle { center, radius } => {
                let dx = p.0 - center.0;
                let dy = p.1 - center.1;
                dx * dx + dy * dy <= radius * radius
            }
            Self::Segment { a, b } => distance_to_segment(p, a, b) <= SEGMENT_HIT_TOLERANCE,
            Self::Ellipse { center, radii } => {
                if radii.0 <= 0.0 || radii.1 <= 0.0 {
                    return false;
                }
                let nx = (p.0 - center.0) / radii.0;
                let ny = (p.1 - center.1) / radii.1;
                nx * nx + ny * ny <= 1.0
            }
            Self::Rect { min, size } => {
                p.0 >= min.0 && p.0 <= min.0 + size.0 && p.1 >= min.1 && p.1 <= min.1 + size.1
            }
            Self::Cross { center, arm } => {
                (p.0 - center.0).abs() <= arm && (p.1 - center.1).abs() <= arm
            }
        }
    }

    /// Axis-aligned bounds, `(min, max)`. Used to anchor context menus and
    /// to form group extents.
    pub fn bounds(&self) -> ((f64, f64), (f64, f64)) {
        match *self {
            Self::Circle { center, radius } => (
                (center.0 - radius, center.1 - radius),
                (center.0 + radius, center.1 + radius),
            ),
            Self::Segment { a, b } => (
                (a.0.min(b.0), a.1.min(b.1)),
                (a.0.max(b.0), a.1.max(b.1)),
            ),
            Self::Ellipse { center, radii } => (
                (center.0 - radii.0, center.1 - radii.1),
                (center.0 + radii.0, center.1 + radii.1),
            ),
            Self::Rect { min, size } => (min, (min.0 + size.0, min.1 + size.1)),
            Self::Cross { center, arm } => (
                (center.0 - arm, center.1 - arm),
                (center.0 + arm, center.1 + arm),
            ),
        }
    }
}

fn distance_to_segment(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
    let abx = b.0 - a.0;
    let aby = b.1 - a.1;
    let len_sq = abx * abx + aby * aby;
    let t = if len_sq == 0.0 {
        0.0
    } else {
        (((p.0 - a.0) * abx + (p.1 - a.1) * aby) / len_sq).clamp(0.0, 1.0)
    };
    let cx = a.0 + t * abx;
    let cy = a.1 + t * aby;
    ((p.0 - cx).powi(2) + (p.1 - cy).powi(2)).sqrt()
}

/// What a drawable shape stands for.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    /// Saved annotation anchor; carries the physical coordinate it marks.
    Point { physical: (f64, f64), label: String },
    /// Connects two saved points by identifier; derived, never positioned
    /// on its own.
    Line { p1: String, p2: String },
    /// Beam position/size indicator. Not selectable.
    BeamIndicator,
    /// Fixed background marker (centring or measurement progress).
    Overlay,
}

/// One drawable on the surface. Rebuilt fresh every update; `id` is the only
/// thing that survives across rebuilds for the same logical annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub id: String,
    pub kind: ShapeKind,
    pub selectable: bool,
    pub geometry: ShapeGeometry,
}

impl Shape {
    pub fn is_point(&self) -> bool {
        matches!(self.kind, ShapeKind::Point { .. })
    }
}

/// Active selection, carried across surface rebuilds by identifier.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectionState {
    #[default]
    None,
    Single(String),
    /// Exactly two point shapes, used for distance/angle measurement.
    Group(String, String),
}

/// Which annotation interaction the surrounding UI has armed. Owned by the
/// application, consumed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    #[default]
    None,
    ClickCentring,
    MeasureDistance,
}

/// What a context menu was opened against.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MenuTarget {
    /// Nothing selectable under the cursor; the menu still opens so the
    /// operator gets a responsive affordance.
    #[default]
    None,
    Shape { id: String },
    Group { p1: String, p2: String },
}

/// Context menu visibility and anchor. Owned by the application shell and
/// driven by the show-context-menu command.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContextMenuState {
    pub visible: bool,
    pub target: MenuTarget,
    pub anchor: (f64, f64),
}

/// Readiness of one actuation axis. Only `Ready` admits a new command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisStatus {
    #[default]
    Unknown,
    Moving,
    Ready,
}

impl AxisStatus {
    pub fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorAxis {
    Phi,
    Focus,
}

/// Snapshot of one motor axis as supplied by the instrument.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotorState {
    pub status: AxisStatus,
    pub position: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeamShape {
    Ellipse,
    Rectangle,
}

/// Beam indicator source data: position in native image pixels, size in
/// millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Beam {
    pub position: (f64, f64),
    pub shape: BeamShape,
    pub size_mm: (f64, f64),
}

/// A saved annotation point in native image pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkedPoint {
    pub id: String,
    pub position: (f64, f64),
    pub label: String,
}

/// A saved line between two points, referenced by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRef {
    pub id: String,
    pub p1: String,
    pub p2: String,
}

/// Everything the overlay builder needs for one rebuild, supplied top-down
/// by the owning application on every update.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneState {
    pub beam: Beam,
    pub points: Vec<MarkedPoint>,
    pub lines: Vec<LineRef>,
    /// In-progress click-centring anchors, native image pixels.
    pub centring_points: Vec<(f64, f64)>,
    /// In-progress distance-measurement anchors, native image pixels.
    pub distance_points: Vec<(f64, f64)>,
    pub native_size: (f64, f64),
    pub image_ratio: f64,
    pub pixels_per_mm: PixelsPerMm,
}
