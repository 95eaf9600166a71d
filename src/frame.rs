// frame.rs — scene adapter between the viewer and the GPU renderer

use panorama_tour::scene::effective_fov_degrees;
use panorama_tour::{RotationAnimation, SceneRenderer};
use std::time::Instant;

/// Attribute sink for the viewer, sampled once per frame by the render loop.
///
/// Yaw is split into the look-control / frozen part (`base_yaw`) and the
/// running animation, which is measured from the instant it was issued.
pub struct FrameScene {
    base_yaw: f32,
    pitch: f32,
    rotation: Option<(RotationAnimation, Instant)>,
    field_of_view: u32,
    rig_scale: f32,
    image: Option<String>,
    pending_image: Option<String>,
}

impl FrameScene {
    pub fn new(initial_yaw: f32) -> Self {
        Self {
            base_yaw: initial_yaw,
            pitch: 0.0,
            rotation: None,
            field_of_view: panorama_tour::panorama::DEFAULT_FOV,
            rig_scale: panorama_tour::panorama::DEFAULT_RIG_SCALE,
            image: None,
            pending_image: None,
        }
    }

    pub fn yaw_at(&self, now: Instant) -> f32 {
        let animated = self
            .rotation
            .map_or(0.0, |(anim, started)| anim.angle_at(now.saturating_duration_since(started)));
        (self.base_yaw + animated).rem_euclid(360.0)
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Vertical FOV to draw with, camera FOV narrowed by the rig scale.
    pub fn effective_fov(&self) -> f32 {
        effective_fov_degrees(self.field_of_view, self.rig_scale)
    }

    /// Drag-to-look, in degrees.
    pub fn look(&mut self, d_yaw: f32, d_pitch: f32) {
        self.base_yaw = (self.base_yaw + d_yaw).rem_euclid(360.0);
        self.pitch = (self.pitch + d_pitch).clamp(-90.0, 90.0);
    }

    /// Image the loader still has to fetch, if any.
    pub fn take_pending_image(&mut self) -> Option<String> {
        self.pending_image.take()
    }

    /// Drops a source whose load failed so selecting it again retries.
    pub fn forget_image(&mut self, source: &str) {
        if self.image.as_deref() == Some(source) {
            self.image = None;
        }
    }

    fn freeze(&mut self, now: Instant) {
        self.base_yaw = self.yaw_at(now);
        self.rotation = None;
    }
}

impl SceneRenderer for FrameScene {
    fn set_image(&mut self, source: &str) {
        if self.image.as_deref() == Some(source) {
            return;
        }
        self.image = Some(source.to_string());
        self.pending_image = Some(source.to_string());
    }

    /// A new directive picks up from wherever the sky currently points.
    fn set_rotation(&mut self, rotation: Option<RotationAnimation>) {
        let now = Instant::now();
        self.freeze(now);
        self.rotation = rotation.map(|anim| (anim, now));
    }

    fn set_field_of_view(&mut self, degrees: u32) {
        self.field_of_view = degrees;
    }

    fn set_rig_scale(&mut self, scale: f32) {
        self.rig_scale = scale;
    }
}
