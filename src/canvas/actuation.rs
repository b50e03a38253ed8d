//! Wheel-to-hardware translation.
//!
//! A wheel event maps to at most one bounded hardware command, decided by a
//! fixed-priority table over modifier keys and per-axis readiness:
//!
//! 1. ctrl held, Phi ready  -> Phi +- one step (either scroll axis)
//! 2. alt held, Focus ready -> Focus +- one step (vertical scroll only)
//! 3. no modifier, Zoom ready -> zoom level +-1, clamped to [1, 10]
//!
//! The event itself is always consumed by the caller, whether or not a
//! branch fires. Direction follows the instrument's historical convention
//! (positive delta steps "in"); the inversion flags in settings flip it per
//! binding.

use crate::canvas::messages::CanvasCommand;
use crate::canvas::model::{AxisStatus, MotorAxis, MotorState};
use crate::settings::{MotorSteps, ScrollBindings};

pub const ZOOM_MIN: u32 = 1;
pub const ZOOM_MAX: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WheelModifiers {
    pub control: bool,
    pub alt: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelEvent {
    pub delta: (f64, f64),
    pub modifiers: WheelModifiers,
}

/// Device snapshot the translator decides against.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ActuationState {
    pub phi: MotorState,
    pub focus: MotorState,
    pub zoom_status: AxisStatus,
    pub zoom_level: u32,
}

pub fn translate_wheel(
    event: WheelEvent,
    state: ActuationState,
    steps: MotorSteps,
    bindings: ScrollBindings,
) -> Option<CanvasCommand> {
    let WheelModifiers { control, alt } = event.modifiers;
    let (dx, dy) = event.delta;

    if control && state.phi.status.is_ready() {
        // Both scroll axes carry the same signal for phi rotation.
        let sign = if dx > 0.0 || dy > 0.0 {
            1.0
        } else if dx < 0.0 || dy < 0.0 {
            -1.0
        } else {
            return None;
        };
        let sign = if bindings.invert_phi { -sign } else { sign };
        return Some(CanvasCommand::SetMotorPosition {
            axis: MotorAxis::Phi,
            position: state.phi.position + sign * steps.phi,
        });
    }

    if alt && state.focus.status.is_ready() {
        let sign = if dy > 0.0 {
            1.0
        } else if dy < 0.0 {
            -1.0
        } else {
            return None;
        };
        let sign = if bindings.invert_focus { -sign } else { sign };
        return Some(CanvasCommand::SetMotorPosition {
            axis: MotorAxis::Focus,
            position: state.focus.position + sign * steps.focus,
        });
    }

    if !control && !alt && state.zoom_status.is_ready() {
        let dy = if bindings.invert_zoom { -dy } else { dy };
        if dy > 0.0 && state.zoom_level < ZOOM_MAX {
            return Some(CanvasCommand::SetZoom {
                level: state.zoom_level + 1,
            });
        }
        if dy < 0.0 && state.zoom_level > ZOOM_MIN {
            return Some(CanvasCommand::SetZoom {
                level: state.zoom_level - 1,
            });
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready_state() -> ActuationState {
        ActuationState {
            phi: MotorState {
                status: AxisStatus::Ready,
                position: 90.0,
            },
            focus: MotorState {
                status: AxisStatus::Ready,
                position: 0.5,
            },
            zoom_status: AxisStatus::Ready,
            zoom_level: 5,
        }
    }

    fn steps() -> MotorSteps {
        MotorSteps {
            phi: 45.0,
            focus: 0.05,
        }
    }

    fn wheel(dx: f64, dy: f64, control: bool, alt: bool) -> WheelEvent {
        WheelEvent {
            delta: (dx, dy),
            modifiers: WheelModifiers { control, alt },
        }
    }

    #[test]
    fn ctrl_scroll_steps_phi_by_configured_step() {
        let command = translate_wheel(
            wheel(0.0, 1.0, true, false),
            ready_state(),
            steps(),
            ScrollBindings::default(),
        );
        assert_eq!(
            command,
            Some(CanvasCommand::SetMotorPosition {
                axis: MotorAxis::Phi,
                position: 135.0,
            })
        );
    }

    #[test]
    fn ctrl_scroll_accepts_horizontal_delta() {
        let command = translate_wheel(
            wheel(-2.0, 0.0, true, false),
            ready_state(),
            steps(),
            ScrollBindings::default(),
        );
        assert_eq!(
            command,
            Some(CanvasCommand::SetMotorPosition {
                axis: MotorAxis::Phi,
                position: 45.0,
            })
        );
    }

    #[test]
    fn ctrl_scroll_with_phi_not_ready_is_inert() {
        let mut state = ready_state();
        state.phi.status = AxisStatus::Moving;
        let command = translate_wheel(
            wheel(0.0, 1.0, true, false),
            state,
            steps(),
            ScrollBindings::default(),
        );
        assert_eq!(command, None);
    }

    #[test]
    fn alt_scroll_steps_focus_vertically_only() {
        let command = translate_wheel(
            wheel(0.0, -1.0, false, true),
            ready_state(),
            steps(),
            ScrollBindings::default(),
        );
        assert_eq!(
            command,
            Some(CanvasCommand::SetMotorPosition {
                axis: MotorAxis::Focus,
                position: 0.45,
            })
        );
        // Horizontal-only delta does not drive focus.
        let command = translate_wheel(
            wheel(3.0, 0.0, false, true),
            ready_state(),
            steps(),
            ScrollBindings::default(),
        );
        assert_eq!(command, None);
    }

    #[test]
    fn bare_scroll_changes_zoom_within_bounds() {
        let command = translate_wheel(
            wheel(0.0, 1.0, false, false),
            ready_state(),
            steps(),
            ScrollBindings::default(),
        );
        assert_eq!(command, Some(CanvasCommand::SetZoom { level: 6 }));
        let command = translate_wheel(
            wheel(0.0, -1.0, false, false),
            ready_state(),
            steps(),
            ScrollBindings::default(),
        );
        assert_eq!(command, Some(CanvasCommand::SetZoom { level: 4 }));
    }

    #[test]
    fn zoom_is_clamped_at_both_ends() {
        let mut state = ready_state();
        state.zoom_level = ZOOM_MAX;
        assert_eq!(
            translate_wheel(
                wheel(0.0, 1.0, false, false),
                state,
                steps(),
                ScrollBindings::default()
            ),
            None
        );
        state.zoom_level = ZOOM_MIN;
        assert_eq!(
            translate_wheel(
                wheel(0.0, -1.0, false, false),
                state,
                steps(),
                ScrollBindings::default()
            ),
            None
        );
    }

    #[test]
    fn zoom_requires_ready_status() {
        let mut state = ready_state();
        state.zoom_status = AxisStatus::Unknown;
        assert_eq!(
            translate_wheel(
                wheel(0.0, 1.0, false, false),
                state,
                steps(),
                ScrollBindings::default()
            ),
            None
        );
    }

    #[test]
    fn modifier_without_matching_axis_never_falls_through_to_zoom() {
        let mut state = ready_state();
        state.phi.status = AxisStatus::Moving;
        // ctrl is held, so the zoom branch must not fire even though zoom
        // is ready.
        assert_eq!(
            translate_wheel(
                wheel(0.0, 1.0, true, false),
                state,
                steps(),
                ScrollBindings::default()
            ),
            None
        );
    }

    #[test]
    fn inversion_flags_flip_direction() {
        let bindings = ScrollBindings {
            invert_phi: true,
            invert_focus: false,
            invert_zoom: true,
        };
        assert_eq!(
            translate_wheel(wheel(0.0, 1.0, true, false), ready_state(), steps(), bindings),
            Some(CanvasCommand::SetMotorPosition {
                axis: MotorAxis::Phi,
                position: 45.0,
            })
        );
        assert_eq!(
            translate_wheel(wheel(0.0, 1.0, false, false), ready_state(), steps(), bindings),
            Some(CanvasCommand::SetZoom { level: 4 })
        );
    }

    #[test]
    fn zero_delta_issues_no_command() {
        assert_eq!(
            translate_wheel(
                wheel(0.0, 0.0, true, false),
                ready_state(),
                steps(),
                ScrollBindings::default()
            ),
            None
        );
    }
}
