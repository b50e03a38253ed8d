//! Pointer event routing for the sample canvas.
//!
//! Handlers never touch surface content beyond selection; they hit-test
//! against the current shapes and return the commands to dispatch. Whether a
//! click edits annotations or actuates hardware is decided here (clicks) and
//! in [`crate::canvas::actuation`] (wheel).

use crate::canvas::coords::{screen_to_physical, PixelsPerMm};
use crate::canvas::messages::CanvasCommand;
use crate::canvas::model::{InteractionMode, MenuTarget, SelectionState, Shape};
use crate::canvas::surface::Surface;

/// First selectable shape in draw order whose geometry contains the point.
/// Non-selectable background shapes never participate, so they can never
/// shadow an annotation.
pub fn hit_test<'a>(shapes: &'a [Shape], pos: (f64, f64)) -> Option<&'a Shape> {
    shapes
        .iter()
        .find(|s| s.selectable && s.geometry.contains(pos))
}

/// Primary click: closes any open context menu, then adds a centring or
/// measurement point when the corresponding mode is armed. The click
/// position is forwarded in physical coordinates.
pub fn handle_primary_click(
    pos: (f64, f64),
    mode: InteractionMode,
    image_ratio: f64,
    ppm: PixelsPerMm,
) -> Vec<CanvasCommand> {
    let mut commands = vec![CanvasCommand::hide_context_menu()];
    let (x, y) = screen_to_physical(pos, image_ratio, ppm);
    match mode {
        InteractionMode::ClickCentring => commands.push(CanvasCommand::AddCentringPoint { x, y }),
        InteractionMode::MeasureDistance => commands.push(CanvasCommand::AddDistancePoint { x, y }),
        InteractionMode::None => {}
    }
    commands
}

/// Secondary click: closes the previous menu, then opens a new one against
/// whatever is under the cursor. The active group is tested first; then
/// individual shapes in draw order; a miss still opens a menu with a `None`
/// target so the operator always gets a response.
pub fn handle_secondary_click(surface: &mut Surface, pos: (f64, f64)) -> Vec<CanvasCommand> {
    let mut commands = vec![CanvasCommand::hide_context_menu()];

    if let SelectionState::Group(p1, p2) = surface.selection().clone() {
        let inside = surface
            .group_bounds()
            .is_some_and(|(min, max)| {
                pos.0 >= min.0 && pos.0 <= max.0 && pos.1 >= min.1 && pos.1 <= max.1
            });
        if inside {
            commands.push(CanvasCommand::ShowContextMenu {
                visible: true,
                target: MenuTarget::Group { p1, p2 },
                position: pos,
            });
            return commands;
        }
    }

    let hit = hit_test(surface.shapes(), pos).map(|shape| {
        let anchor = shape.geometry.bounds().0;
        (shape.id.clone(), anchor)
    });
    match hit {
        Some((id, anchor)) => {
            surface.select(&id);
            commands.push(CanvasCommand::ShowContextMenu {
                visible: true,
                target: MenuTarget::Shape { id },
                position: anchor,
            });
        }
        None => commands.push(CanvasCommand::ShowContextMenu {
            visible: true,
            target: MenuTarget::None,
            position: pos,
        }),
    }
    commands
}

/// Double click recentres the stage on the clicked position, regardless of
/// the current interaction mode.
pub fn handle_double_click(
    pos: (f64, f64),
    image_ratio: f64,
    ppm: PixelsPerMm,
) -> CanvasCommand {
    let (x, y) = screen_to_physical(pos, image_ratio, ppm);
    CanvasCommand::GoToBeam { x, y }
}
