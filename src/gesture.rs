// gesture.rs — pinch / two-finger scale of the camera rig

use crate::panorama::{ViewerState, MAX_RIG_SCALE, MIN_RIG_SCALE};
use crate::scene::SceneCommand;

/// Where the current gesture sequence stands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GesturePhase {
    Idle,
    /// A gesture is running; moves multiply `baseline`, the rig scale that
    /// was committed when it started.
    Tracking { baseline: f32 },
}

/// Raw gesture signal as delivered by the input layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    Start,
    /// `multiplier` is the spread ratio since the gesture started. Missing
    /// values count as no change.
    Move { multiplier: Option<f32> },
}

/// Starts tracking from the scale in effect right now, so consecutive
/// gestures compose.
pub fn begin(state: &mut ViewerState) -> Vec<SceneCommand> {
    state.gesture = GesturePhase::Tracking {
        baseline: state.rig_scale,
    };
    log::trace!("gesture started at rig scale {:.3}", state.rig_scale);
    Vec::new()
}

pub fn update(state: &mut ViewerState, multiplier: Option<f32>) -> Vec<SceneCommand> {
    let GesturePhase::Tracking { baseline } = state.gesture else {
        log::trace!("gesture move without start ignored");
        return Vec::new();
    };
    // NaN would slip through clamp, treat it like a missing multiplier.
    let multiplier = multiplier.filter(|m| !m.is_nan()).unwrap_or(1.0);
    state.rig_scale = (baseline * multiplier).clamp(MIN_RIG_SCALE, MAX_RIG_SCALE);
    vec![SceneCommand::SetRigScale(state.rig_scale)]
}

/// Drops any running gesture without touching the scale.
pub fn cancel(state: &mut ViewerState) {
    state.gesture = GesturePhase::Idle;
}

pub fn handle(state: &mut ViewerState, event: GestureEvent) -> Vec<SceneCommand> {
    match event {
        GestureEvent::Start => begin(state),
        GestureEvent::Move { multiplier } => update(state, multiplier),
    }
}
