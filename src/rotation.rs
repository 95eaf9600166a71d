// rotation.rs — auto-rotation lifecycle: play, pause, speed, image selection

use crate::catalog::ImageId;
use crate::panorama::{ViewerState, MIN_ROTATION_PERIOD_MS, ROTATION_PERIOD_STEP_MS};
use crate::scene::{RotationAnimation, SceneCommand};

/// Rotation directive the sky should carry for `state`.
pub fn directive(state: &ViewerState) -> Option<RotationAnimation> {
    state
        .is_playing
        .then(|| RotationAnimation::full_turn(state.rotation_period_ms))
}

pub fn play(state: &mut ViewerState) -> Vec<SceneCommand> {
    state.is_playing = true;
    vec![SceneCommand::SetRotation(directive(state))]
}

pub fn pause(state: &mut ViewerState) -> Vec<SceneCommand> {
    state.is_playing = false;
    vec![SceneCommand::SetRotation(None)]
}

/// Shortens the period by one step, never below the floor.
pub fn increase_speed(state: &mut ViewerState) -> Vec<SceneCommand> {
    let period = state
        .rotation_period_ms
        .saturating_sub(ROTATION_PERIOD_STEP_MS)
        .max(MIN_ROTATION_PERIOD_MS);
    set_period(state, period)
}

pub fn decrease_speed(state: &mut ViewerState) -> Vec<SceneCommand> {
    let period = state
        .rotation_period_ms
        .saturating_add(ROTATION_PERIOD_STEP_MS);
    set_period(state, period)
}

fn set_period(state: &mut ViewerState, period: u32) -> Vec<SceneCommand> {
    if period == state.rotation_period_ms {
        return Vec::new();
    }
    state.rotation_period_ms = period;
    if state.is_playing {
        vec![SceneCommand::SetRotation(directive(state))]
    } else {
        Vec::new()
    }
}

/// Switches the sky image. A running rotation is re-issued, never paused.
pub fn select_image(state: &mut ViewerState, id: ImageId) -> Vec<SceneCommand> {
    state.selected_image = id.clone();
    let mut commands = vec![SceneCommand::SetImage(id)];
    if state.is_playing {
        commands.push(SceneCommand::SetRotation(directive(state)));
    }
    commands
}
