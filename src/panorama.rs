// panorama.rs — viewer state and its bounds

use crate::catalog::ImageId;
use crate::gesture::GesturePhase;

pub const DEFAULT_ROTATION_PERIOD_MS: u32 = 60_000;
pub const MIN_ROTATION_PERIOD_MS: u32 = 10_000;
pub const ROTATION_PERIOD_STEP_MS: u32 = 10_000;

pub const DEFAULT_FOV: u32 = 80;
pub const MIN_FOV: u32 = 30;
pub const MAX_FOV: u32 = 120;
pub const FOV_STEP: u32 = 5;

pub const DEFAULT_RIG_SCALE: f32 = 1.0;
pub const MIN_RIG_SCALE: f32 = 0.5;
pub const MAX_RIG_SCALE: f32 = 3.0;

/// Authoritative state of one mounted viewer.
///
/// Fields are only written by the controller modules (`rotation`, `zoom`,
/// `gesture`) and the [`crate::viewer::Viewer`], which keeps every bound
/// below intact:
///
/// * `rotation_period_ms >= MIN_ROTATION_PERIOD_MS`
/// * `MIN_FOV <= field_of_view <= MAX_FOV`
/// * `MIN_RIG_SCALE <= rig_scale <= MAX_RIG_SCALE`
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerState {
    pub(crate) is_playing: bool,
    pub(crate) rotation_period_ms: u32,
    pub(crate) selected_image: ImageId,
    pub(crate) field_of_view: u32,
    pub(crate) rig_scale: f32,
    pub(crate) gesture: GesturePhase,
}

impl ViewerState {
    pub fn new(selected_image: ImageId) -> Self {
        Self {
            is_playing: true,
            rotation_period_ms: DEFAULT_ROTATION_PERIOD_MS,
            selected_image,
            field_of_view: DEFAULT_FOV,
            rig_scale: DEFAULT_RIG_SCALE,
            gesture: GesturePhase::Idle,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Duration of one full turn. Smaller is faster.
    pub fn rotation_period_ms(&self) -> u32 {
        self.rotation_period_ms
    }

    pub fn selected_image(&self) -> &ImageId {
        &self.selected_image
    }

    pub fn field_of_view(&self) -> u32 {
        self.field_of_view
    }

    pub fn rig_scale(&self) -> f32 {
        self.rig_scale
    }

    pub fn gesture_phase(&self) -> GesturePhase {
        self.gesture
    }
}
