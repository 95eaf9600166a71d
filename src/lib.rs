//! Camera and viewport control for a 360° panorama tour.
//!
//! The [`viewer::Viewer`] owns a [`panorama::ViewerState`] and translates every
//! control operation into ordered [`scene::SceneCommand`]s that are pushed to a
//! [`scene::SceneRenderer`]. Gesture zoom arrives through a [`rig::CameraRig`].

pub mod catalog;
pub mod config;
pub mod gesture;
pub mod i18n;
pub mod panorama;
pub mod reset;
pub mod rig;
pub mod rotation;
pub mod scene;
pub mod viewer;
pub mod zoom;

pub use catalog::{ImageCatalog, ImageId};
pub use panorama::ViewerState;
pub use scene::{RotationAnimation, SceneCommand, SceneRenderer};
pub use viewer::{Control, Viewer};
