//! Selection continuity across full surface rebuilds.

use beamview::canvas::coords::PixelsPerMm;
use beamview::canvas::model::{
    Beam, BeamShape, LineRef, MarkedPoint, SceneState, SelectionState,
};
use beamview::canvas::Surface;

fn scene(point_ids: &[&str], lines: &[(&str, &str, &str)]) -> SceneState {
    SceneState {
        beam: Beam {
            position: (680.0, 512.0),
            shape: BeamShape::Rectangle,
            size_mm: (0.1, 0.1),
        },
        points: point_ids
            .iter()
            .enumerate()
            .map(|(i, id)| MarkedPoint {
                id: id.to_string(),
                position: (100.0 + 200.0 * i as f64, 100.0),
                label: id.to_string(),
            })
            .collect(),
        lines: lines
            .iter()
            .map(|(id, p1, p2)| LineRef {
                id: id.to_string(),
                p1: p1.to_string(),
                p2: p2.to_string(),
            })
            .collect(),
        centring_points: vec![],
        distance_points: vec![],
        native_size: (1360.0, 1024.0),
        image_ratio: 2.0,
        pixels_per_mm: PixelsPerMm::new(1000.0, 1000.0),
    }
}

#[test]
fn selection_follows_identity_through_repeated_rebuilds() {
    let mut surface = Surface::new();
    let s = scene(&["P1", "P2", "P3"], &[]);
    surface.rebuild(&s);
    assert!(surface.select("P2"));
    for _ in 0..5 {
        surface.rebuild(&s);
        assert_eq!(
            surface.selection(),
            &SelectionState::Single("P2".to_string())
        );
    }
}

#[test]
fn selected_line_vanishes_with_its_endpoint() {
    let mut surface = Surface::new();
    surface.rebuild(&scene(&["P1", "P2"], &[("L1", "P1", "P2")]));
    assert!(surface.select("L1"));
    // P2 is deleted; the line loses an endpoint, is dropped from the
    // rebuild, and the selection collapses.
    surface.rebuild(&scene(&["P1"], &[("L1", "P1", "P2")]));
    assert!(surface.shape("L1").is_none());
    assert_eq!(surface.selection(), &SelectionState::None);
}

#[test]
fn group_never_degrades_to_a_single_member() {
    let mut surface = Surface::new();
    surface.rebuild(&scene(&["P1", "P2"], &[]));
    assert!(surface.select_group("P1", "P2"));
    surface.rebuild(&scene(&["P2"], &[]));
    // Not Single("P2"): a half-alive group resets outright.
    assert_eq!(surface.selection(), &SelectionState::None);
}

#[test]
fn reselection_targets_the_new_shape_instances() {
    let mut surface = Surface::new();
    let before = scene(&["P1"], &[]);
    surface.rebuild(&before);
    assert!(surface.select("P1"));
    let moved = {
        let mut s = before.clone();
        s.points[0].position = (500.0, 500.0);
        s
    };
    surface.rebuild(&moved);
    // Same identity, fresh geometry.
    assert_eq!(
        surface.selection(),
        &SelectionState::Single("P1".to_string())
    );
    let shape = surface.shape("P1").unwrap();
    let (min, _) = shape.geometry.bounds();
    assert_eq!(min, (240.0, 240.0));
}
