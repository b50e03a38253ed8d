//! The drawable surface and its rebuild/reselect cycle.
//!
//! The surface is the single mutable drawing resource. Every domain update
//! tears it down completely: resize, clear, repopulate from the overlay
//! builder, then re-establish whichever selection was active before the
//! rebuild by matching stable identifiers against the new shapes. Selection
//! identity is the only state that survives a rebuild.

use crate::canvas::model::{SceneState, SelectionState, Shape};
use crate::canvas::overlay::build_shapes;

#[derive(Debug, Default)]
pub struct Surface {
    display_size: (f64, f64),
    shapes: Vec<Shape>,
    selection: SelectionState,
}

impl Surface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full teardown and rebuild, in fixed order: resize, clear, populate,
    /// reselect.
    pub fn rebuild(&mut self, scene: &SceneState) {
        self.display_size = (
            scene.native_size.0 / scene.image_ratio,
            scene.native_size.1 / scene.image_ratio,
        );
        let prior = std::mem::take(&mut self.selection);
        self.shapes.clear();
        self.shapes = build_shapes(scene);
        self.selection = reconcile(prior, &self.shapes);
        tracing::debug!(
            shapes = self.shapes.len(),
            selection = ?self.selection,
            "surface rebuilt"
        );
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn display_size(&self) -> (f64, f64) {
        self.display_size
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn shape(&self, id: &str) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    /// Select a single shape by id. Ignored unless the shape exists and is
    /// selectable.
    pub fn select(&mut self, id: &str) -> bool {
        match self.shape(id) {
            Some(shape) if shape.selectable => {
                self.selection = SelectionState::Single(shape.id.clone());
                true
            }
            _ => false,
        }
    }

    /// Form a measurement group from two distinct point shapes.
    pub fn select_group(&mut self, p1: &str, p2: &str) -> bool {
        if p1 == p2 {
            return false;
        }
        let both_points = self.shape(p1).is_some_and(Shape::is_point)
            && self.shape(p2).is_some_and(Shape::is_point);
        if both_points {
            self.selection = SelectionState::Group(p1.to_string(), p2.to_string());
        }
        both_points
    }

    pub fn clear_selection(&mut self) {
        self.selection = SelectionState::None;
    }

    /// Display-space bounds of the active group, if one is selected.
    pub fn group_bounds(&self) -> Option<((f64, f64), (f64, f64))> {
        let SelectionState::Group(a, b) = &self.selection else {
            return None;
        };
        let (a_min, a_max) = self.shape(a)?.geometry.bounds();
        let (b_min, b_max) = self.shape(b)?.geometry.bounds();
        Some((
            (a_min.0.min(b_min.0), a_min.1.min(b_min.1)),
            (a_max.0.max(b_max.0), a_max.1.max(b_max.1)),
        ))
    }

    /// The active group's anchor point: its own centroid.
    pub fn group_centroid(&self) -> Option<(f64, f64)> {
        let ((min_x, min_y), (max_x, max_y)) = self.group_bounds()?;
        Some(((min_x + max_x) / 2.0, (min_y + max_y) / 2.0))
    }
}

/// Match the prior selection against the freshly built shapes. A single
/// selection survives if its id still resolves to a selectable shape; a
/// group survives only if both ids resolve to distinct point shapes.
/// Anything else collapses to no selection.
fn reconcile(prior: SelectionState, shapes: &[Shape]) -> SelectionState {
    let find = |id: &str| shapes.iter().find(|s| s.id == id);
    match prior {
        SelectionState::None => SelectionState::None,
        SelectionState::Single(id) => match find(&id) {
            Some(shape) if shape.selectable => SelectionState::Single(id),
            _ => SelectionState::None,
        },
        SelectionState::Group(a, b) => {
            let alive = a != b
                && find(&a).is_some_and(Shape::is_point)
                && find(&b).is_some_and(Shape::is_point);
            if alive {
                SelectionState::Group(a, b)
            } else {
                SelectionState::None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::coords::PixelsPerMm;
    use crate::canvas::model::{Beam, BeamShape, LineRef, MarkedPoint};

    fn scene(points: &[(&str, (f64, f64))]) -> SceneState {
        SceneState {
            beam: Beam {
                position: (680.0, 512.0),
                shape: BeamShape::Ellipse,
                size_mm: (0.1, 0.1),
            },
            points: points
                .iter()
                .map(|(id, pos)| MarkedPoint {
                    id: id.to_string(),
                    position: *pos,
                    label: id.to_string(),
                })
                .collect(),
            lines: vec![],
            centring_points: vec![],
            distance_points: vec![],
            native_size: (1360.0, 1024.0),
            image_ratio: 2.0,
            pixels_per_mm: PixelsPerMm::new(1000.0, 1000.0),
        }
    }

    #[test]
    fn rebuild_sets_display_size_from_ratio() {
        let mut surface = Surface::new();
        surface.rebuild(&scene(&[]));
        assert_eq!(surface.display_size(), (680.0, 512.0));
    }

    #[test]
    fn single_selection_survives_rebuild() {
        let mut surface = Surface::new();
        let s = scene(&[("P1", (100.0, 100.0)), ("P2", (300.0, 100.0))]);
        surface.rebuild(&s);
        assert!(surface.select("P1"));
        surface.rebuild(&s);
        assert_eq!(
            surface.selection(),
            &SelectionState::Single("P1".to_string())
        );
    }

    #[test]
    fn single_selection_resets_when_shape_vanishes() {
        let mut surface = Surface::new();
        surface.rebuild(&scene(&[("P1", (100.0, 100.0))]));
        assert!(surface.select("P1"));
        surface.rebuild(&scene(&[]));
        assert_eq!(surface.selection(), &SelectionState::None);
    }

    #[test]
    fn group_survives_when_both_points_remain() {
        let mut surface = Surface::new();
        let s = scene(&[("P1", (100.0, 100.0)), ("P2", (300.0, 100.0))]);
        surface.rebuild(&s);
        assert!(surface.select_group("P1", "P2"));
        surface.rebuild(&s);
        assert_eq!(
            surface.selection(),
            &SelectionState::Group("P1".to_string(), "P2".to_string())
        );
    }

    #[test]
    fn group_collapses_to_none_when_one_point_vanishes() {
        let mut surface = Surface::new();
        surface.rebuild(&scene(&[("P1", (100.0, 100.0)), ("P2", (300.0, 100.0))]));
        assert!(surface.select_group("P1", "P2"));
        surface.rebuild(&scene(&[("P1", (100.0, 100.0))]));
        assert_eq!(surface.selection(), &SelectionState::None);
    }

    #[test]
    fn group_requires_two_distinct_points() {
        let mut surface = Surface::new();
        surface.rebuild(&scene(&[("P1", (100.0, 100.0))]));
        assert!(!surface.select_group("P1", "P1"));
        assert!(!surface.select_group("P1", "P2"));
        assert_eq!(surface.selection(), &SelectionState::None);
    }

    #[test]
    fn group_cannot_include_a_line() {
        let mut surface = Surface::new();
        let mut s = scene(&[("P1", (100.0, 100.0)), ("P2", (300.0, 100.0))]);
        s.lines.push(LineRef {
            id: "L1".to_string(),
            p1: "P1".to_string(),
            p2: "P2".to_string(),
        });
        surface.rebuild(&s);
        assert!(!surface.select_group("P1", "L1"));
    }

    #[test]
    fn beam_is_never_selectable() {
        let mut surface = Surface::new();
        surface.rebuild(&scene(&[]));
        assert!(!surface.select("beam"));
        assert_eq!(surface.selection(), &SelectionState::None);
    }

    #[test]
    fn group_centroid_is_midpoint_of_bounds() {
        let mut surface = Surface::new();
        surface.rebuild(&scene(&[("P1", (100.0, 100.0)), ("P2", (300.0, 100.0))]));
        assert!(surface.select_group("P1", "P2"));
        // Display coords: (50,50) and (150,50).
        assert_eq!(surface.group_centroid(), Some((100.0, 50.0)));
    }
}
