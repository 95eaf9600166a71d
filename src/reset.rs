// reset.rs — restore both zoom mechanisms at once

use crate::gesture;
use crate::panorama::{ViewerState, DEFAULT_FOV, DEFAULT_RIG_SCALE};
use crate::scene::SceneCommand;

/// Puts FOV and rig scale back to their defaults in one step.
///
/// Playback, speed and the selected image are not zoom and stay as they are.
/// A running gesture is dropped so its old baseline cannot be resumed.
pub fn reset_zoom(state: &mut ViewerState) -> Vec<SceneCommand> {
    state.field_of_view = DEFAULT_FOV;
    state.rig_scale = DEFAULT_RIG_SCALE;
    gesture::cancel(state);
    vec![
        SceneCommand::SetFieldOfView(state.field_of_view),
        SceneCommand::SetRigScale(state.rig_scale),
    ]
}
