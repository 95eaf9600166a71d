// scene.rs — renderer-facing configuration derived from viewer state

use crate::catalog::ImageId;
use crate::panorama::ViewerState;
use std::time::Duration;

/// Full turn about the vertical axis, in degrees.
pub const FULL_TURN_DEGREES: f32 = 360.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
}

impl Easing {
    fn apply(self, progress: f64) -> f64 {
        match self {
            Easing::Linear => progress,
        }
    }
}

/// Rotation animation attached to the sky node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationAnimation {
    pub axis: Axis,
    pub target_degrees: f32,
    pub duration_ms: u32,
    pub looping: bool,
    pub easing: Easing,
}

impl RotationAnimation {
    /// Endless linear turn about the vertical axis, once per `duration_ms`.
    pub fn full_turn(duration_ms: u32) -> Self {
        Self {
            axis: Axis::Vertical,
            target_degrees: FULL_TURN_DEGREES,
            duration_ms,
            looping: true,
            easing: Easing::Linear,
        }
    }

    /// Rotation in degrees reached `elapsed` after the animation was issued.
    pub fn angle_at(&self, elapsed: Duration) -> f32 {
        if self.duration_ms == 0 {
            return self.target_degrees;
        }
        let cycles = elapsed.as_secs_f64() * 1000.0 / f64::from(self.duration_ms);
        let progress = if self.looping { cycles.fract() } else { cycles.min(1.0) };
        (self.easing.apply(progress) * f64::from(self.target_degrees)) as f32
    }
}

/// Capability surface of a declarative 3D scene.
///
/// Any scene technology can sit behind this: the viewer only ever pushes
/// attributes, it never reads them back.
pub trait SceneRenderer {
    /// Sky node image source.
    fn set_image(&mut self, source: &str);
    /// Sky node rotation animation; `None` freezes the sky where it is.
    fn set_rotation(&mut self, rotation: Option<RotationAnimation>);
    /// Camera field of view in degrees.
    fn set_field_of_view(&mut self, degrees: u32);
    /// Uniform camera rig scale.
    fn set_rig_scale(&mut self, scale: f32);
}

/// One attribute push, in the order it must reach the renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneCommand {
    SetImage(ImageId),
    SetRotation(Option<RotationAnimation>),
    SetFieldOfView(u32),
    SetRigScale(f32),
}

impl SceneCommand {
    pub fn apply<R: SceneRenderer + ?Sized>(&self, renderer: &mut R) {
        match self {
            SceneCommand::SetImage(id) => renderer.set_image(id.source()),
            SceneCommand::SetRotation(rotation) => renderer.set_rotation(*rotation),
            SceneCommand::SetFieldOfView(degrees) => renderer.set_field_of_view(*degrees),
            SceneCommand::SetRigScale(scale) => renderer.set_rig_scale(*scale),
        }
    }
}

/// Complete renderer configuration for a given state.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub image: ImageId,
    pub rotation: Option<RotationAnimation>,
    pub field_of_view: u32,
    pub rig_scale: f32,
}

impl SceneConfig {
    pub fn derive(state: &ViewerState) -> Self {
        Self {
            image: state.selected_image().clone(),
            rotation: crate::rotation::directive(state),
            field_of_view: state.field_of_view(),
            rig_scale: state.rig_scale(),
        }
    }

    /// Commands that bring a fresh renderer in line with this configuration.
    pub fn into_commands(self) -> Vec<SceneCommand> {
        vec![
            SceneCommand::SetImage(self.image),
            SceneCommand::SetRotation(self.rotation),
            SceneCommand::SetFieldOfView(self.field_of_view),
            SceneCommand::SetRigScale(self.rig_scale),
        ]
    }
}

/// Vertical FOV seen through a camera whose rig is scaled by `rig_scale`.
///
/// Scaling the rig magnifies the image plane, so the tangent of the half
/// angle shrinks by the same factor.
pub fn effective_fov_degrees(field_of_view: u32, rig_scale: f32) -> f32 {
    let half = (field_of_view as f32).to_radians() * 0.5;
    let scale = if rig_scale > 0.0 { rig_scale } else { 1.0 };
    (2.0 * (half.tan() / scale).atan()).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn full_turn_wraps_every_period() {
        let anim = RotationAnimation::full_turn(60_000);
        assert_relative_eq!(anim.angle_at(Duration::ZERO), 0.0);
        assert_relative_eq!(anim.angle_at(Duration::from_secs(15)), 90.0, epsilon = 1e-3);
        assert_relative_eq!(anim.angle_at(Duration::from_secs(75)), 90.0, epsilon = 1e-3);
    }

    #[test]
    fn non_looping_animation_holds_target() {
        let anim = RotationAnimation {
            looping: false,
            ..RotationAnimation::full_turn(1_000)
        };
        assert_relative_eq!(anim.angle_at(Duration::from_secs(5)), 360.0);
    }

    #[test]
    fn effective_fov_narrows_with_scale() {
        assert_relative_eq!(effective_fov_degrees(80, 1.0), 80.0, epsilon = 1e-3);
        assert!(effective_fov_degrees(80, 2.0) < 80.0);
        assert!(effective_fov_degrees(80, 0.5) > 80.0);
        assert!(effective_fov_degrees(120, 0.5) < 180.0);
    }

    #[test]
    fn derived_config_follows_state() {
        let mut state = ViewerState::new(ImageId::from("a.jpg"));
        let config = SceneConfig::derive(&state);
        assert_eq!(config.rotation, Some(RotationAnimation::full_turn(60_000)));
        assert_eq!(config.field_of_view, 80);

        state.is_playing = false;
        let commands = SceneConfig::derive(&state).into_commands();
        assert_eq!(commands[0], SceneCommand::SetImage(ImageId::from("a.jpg")));
        assert_eq!(commands[1], SceneCommand::SetRotation(None));
    }
}
