//! Builds the drawable shape list for one surface rebuild.
//!
//! Every call produces fresh shapes; nothing from a previous cycle is
//! reused. Fixed, non-selectable overlays (beam indicator, centring and
//! measurement markers) come first so selectable shapes draw on top and win
//! hit-tests.

use crate::canvas::coords::{to_display_space, to_physical_space};
use crate::canvas::model::{
    BeamShape, SceneState, Shape, ShapeGeometry, ShapeKind,
};

/// Display radius of a saved point marker.
pub const POINT_RADIUS: f64 = 10.0;

/// Display arm length of centring/measurement cross markers.
pub const MARKER_ARM: f64 = 6.0;

pub fn build_shapes(scene: &SceneState) -> Vec<Shape> {
    let mut shapes = Vec::new();
    let ratio = scene.image_ratio;

    shapes.push(beam_indicator(scene));

    for (i, pos) in scene.centring_points.iter().enumerate() {
        shapes.push(marker(format!("centring-{}", i + 1), *pos, ratio));
    }

    for (i, pos) in scene.distance_points.iter().enumerate() {
        shapes.push(marker(format!("distance-{}", i + 1), *pos, ratio));
    }
    if let [a, b] = scene.distance_points.as_slice() {
        shapes.push(Shape {
            id: "distance-measure".to_string(),
            kind: ShapeKind::Overlay,
            selectable: false,
            geometry: ShapeGeometry::Segment {
                a: to_display_space(*a, ratio),
                b: to_display_space(*b, ratio),
            },
        });
    }

    for point in &scene.points {
        shapes.push(Shape {
            id: point.id.clone(),
            kind: ShapeKind::Point {
                physical: to_physical_space(point.position, scene.pixels_per_mm),
                label: point.label.clone(),
            },
            selectable: true,
            geometry: ShapeGeometry::Circle {
                center: to_display_space(point.position, ratio),
                radius: POINT_RADIUS,
            },
        });
    }

    for line in &scene.lines {
        let p1 = scene.points.iter().find(|p| p.id == line.p1);
        let p2 = scene.points.iter().find(|p| p.id == line.p2);
        // A line with a missing endpoint is dropped; the domain owner keeps
        // the lists consistent.
        let (Some(p1), Some(p2)) = (p1, p2) else {
            tracing::debug!(line = %line.id, "dropping line with missing endpoint");
            continue;
        };
        shapes.push(Shape {
            id: line.id.clone(),
            kind: ShapeKind::Line {
                p1: line.p1.clone(),
                p2: line.p2.clone(),
            },
            selectable: true,
            geometry: ShapeGeometry::Segment {
                a: to_display_space(p1.position, ratio),
                b: to_display_space(p2.position, ratio),
            },
        });
    }

    shapes
}

fn beam_indicator(scene: &SceneState) -> Shape {
    let center = to_display_space(scene.beam.position, scene.image_ratio);
    let ppm = scene.pixels_per_mm;
    // Beam size arrives in millimetres; project it through the optics into
    // display pixels.
    let radii = (
        scene.beam.size_mm.0 * ppm.x / scene.image_ratio / 2.0,
        scene.beam.size_mm.1 * ppm.y / scene.image_ratio / 2.0,
    );
    let geometry = match scene.beam.shape {
        BeamShape::Ellipse => ShapeGeometry::Ellipse { center, radii },
        BeamShape::Rectangle => ShapeGeometry::Rect {
            min: (center.0 - radii.0, center.1 - radii.1),
            size: (radii.0 * 2.0, radii.1 * 2.0),
        },
    };
    Shape {
        id: "beam".to_string(),
        kind: ShapeKind::BeamIndicator,
        selectable: false,
        geometry,
    }
}

fn marker(id: String, position: (f64, f64), ratio: f64) -> Shape {
    Shape {
        id,
        kind: ShapeKind::Overlay,
        selectable: false,
        geometry: ShapeGeometry::Cross {
            center: to_display_space(position, ratio),
            arm: MARKER_ARM,
        },
    }
}
