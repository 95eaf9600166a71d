// viewer.rs — the mounted viewer: state owner and renderer driver

use crate::catalog::ImageId;
use crate::gesture::{self, GestureEvent};
use crate::panorama::ViewerState;
use crate::rig::{CameraRig, GestureListener, RigBinding};
use crate::{reset, rotation};
use crate::scene::{SceneCommand, SceneConfig, SceneRenderer};
use crate::zoom;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// User-level operations, as issued by buttons, keys or the thumbnail strip.
#[derive(Debug, Clone, PartialEq)]
pub enum Control {
    Play,
    Pause,
    TogglePlayback,
    IncreaseSpeed,
    DecreaseSpeed,
    ZoomIn,
    ZoomOut,
    ResetZoom,
    SelectImage(ImageId),
}

/// One mounted panorama viewer.
///
/// Every operation mutates the state first and then pushes the resulting
/// commands to the renderer in order, so the renderer never lags the state.
pub struct Viewer<R: SceneRenderer> {
    state: ViewerState,
    renderer: R,
    rig: Option<RigBinding>,
}

impl<R: SceneRenderer> Viewer<R> {
    /// Creates the state with its defaults and pushes the full scene once.
    pub fn mount(renderer: R, initial_image: ImageId) -> Self {
        let mut viewer = Self {
            state: ViewerState::new(initial_image),
            renderer,
            rig: None,
        };
        log::debug!("mounting viewer on {}", viewer.state.selected_image());
        let commands = SceneConfig::derive(&viewer.state).into_commands();
        viewer.apply(commands);
        viewer
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn play(&mut self) {
        let commands = rotation::play(&mut self.state);
        self.apply(commands);
    }

    pub fn pause(&mut self) {
        let commands = rotation::pause(&mut self.state);
        self.apply(commands);
    }

    pub fn increase_speed(&mut self) {
        let commands = rotation::increase_speed(&mut self.state);
        self.apply(commands);
    }

    pub fn decrease_speed(&mut self) {
        let commands = rotation::decrease_speed(&mut self.state);
        self.apply(commands);
    }

    pub fn zoom_in(&mut self) {
        let commands = zoom::zoom_in(&mut self.state);
        self.apply(commands);
    }

    pub fn zoom_out(&mut self) {
        let commands = zoom::zoom_out(&mut self.state);
        self.apply(commands);
    }

    /// Restores both zoom mechanisms. Playback and selection are left alone.
    pub fn reset_zoom(&mut self) {
        let commands = reset::reset_zoom(&mut self.state);
        self.apply(commands);
    }

    pub fn select_image(&mut self, id: ImageId) {
        let commands = rotation::select_image(&mut self.state, id);
        self.apply(commands);
    }

    pub fn handle_gesture(&mut self, event: GestureEvent) {
        let commands = gesture::handle(&mut self.state, event);
        self.apply(commands);
    }

    pub fn perform(&mut self, control: Control) {
        log::debug!("control: {:?}", control);
        match control {
            Control::Play => self.play(),
            Control::Pause => self.pause(),
            Control::TogglePlayback => {
                if self.state.is_playing() {
                    self.pause()
                } else {
                    self.play()
                }
            }
            Control::IncreaseSpeed => self.increase_speed(),
            Control::DecreaseSpeed => self.decrease_speed(),
            Control::ZoomIn => self.zoom_in(),
            Control::ZoomOut => self.zoom_out(),
            Control::ResetZoom => self.reset_zoom(),
            Control::SelectImage(id) => self.select_image(id),
        }
    }

    pub fn has_rig(&self) -> bool {
        self.rig.is_some()
    }

    /// Releases the rig's gesture listeners. Safe to call when no rig is
    /// attached.
    pub fn detach_rig(&mut self) {
        if self.rig.take().is_some() {
            log::debug!("camera rig detached");
        }
        gesture::cancel(&mut self.state);
    }

    /// Tears the viewer down and hands the renderer back.
    pub fn unmount(mut self) -> R {
        self.detach_rig();
        self.renderer
    }

    fn apply(&mut self, commands: Vec<SceneCommand>) {
        for command in commands {
            log::trace!("scene <- {:?}", command);
            command.apply(&mut self.renderer);
        }
    }
}

impl<R: SceneRenderer + 'static> Viewer<R> {
    /// Subscribes `viewer` to the gesture signals of `rig`.
    ///
    /// A previously attached rig is released first. The listeners only hold a
    /// weak handle, so they never keep a dropped viewer alive, and dropping
    /// the viewer releases them.
    pub fn attach_rig(viewer: &Rc<RefCell<Self>>, rig: Rc<dyn CameraRig>) {
        let weak = Rc::downgrade(viewer);
        let binding = RigBinding::bind(rig, forward_to(weak.clone()), forward_to(weak));
        let mut this = viewer.borrow_mut();
        this.detach_rig();
        this.rig = Some(binding);
        log::debug!("camera rig attached");
    }
}

fn forward_to<R: SceneRenderer + 'static>(viewer: Weak<RefCell<Viewer<R>>>) -> GestureListener {
    Box::new(move |event| {
        let Some(viewer) = viewer.upgrade() else {
            return;
        };
        match viewer.try_borrow_mut() {
            Ok(mut viewer) => viewer.handle_gesture(event),
            Err(_) => log::warn!("gesture {:?} dropped: viewer busy", event),
        };
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::GesturePhase;
    use crate::rig::{GestureSignal, ListenerId, SignalRig};
    use crate::scene::RotationAnimation;
    use approx::assert_relative_eq;
    use std::cell::Cell;

    #[derive(Default)]
    struct RecordingScene {
        pushes: Vec<SceneCommand>,
    }

    impl SceneRenderer for RecordingScene {
        fn set_image(&mut self, source: &str) {
            self.pushes.push(SceneCommand::SetImage(ImageId::from(source)));
        }
        fn set_rotation(&mut self, rotation: Option<RotationAnimation>) {
            self.pushes.push(SceneCommand::SetRotation(rotation));
        }
        fn set_field_of_view(&mut self, degrees: u32) {
            self.pushes.push(SceneCommand::SetFieldOfView(degrees));
        }
        fn set_rig_scale(&mut self, scale: f32) {
            self.pushes.push(SceneCommand::SetRigScale(scale));
        }
    }

    /// Rig that counts registrations and deregistrations.
    #[derive(Default)]
    struct CountingRig {
        inner: SignalRig,
        added: Cell<usize>,
        removed: Cell<usize>,
    }

    impl CountingRig {
        fn active(&self) -> usize {
            self.added.get() - self.removed.get()
        }
    }

    impl CameraRig for CountingRig {
        fn add_listener(&self, signal: GestureSignal, listener: GestureListener) -> ListenerId {
            self.added.set(self.added.get() + 1);
            self.inner.add_listener(signal, listener)
        }
        fn remove_listener(&self, id: ListenerId) {
            self.removed.set(self.removed.get() + 1);
            self.inner.remove_listener(id);
        }
    }

    fn mounted() -> Viewer<RecordingScene> {
        Viewer::mount(RecordingScene::default(), ImageId::from("images/kitchen2.jpg"))
    }

    #[test]
    fn mount_pushes_full_scene() {
        let viewer = mounted();
        assert_eq!(
            viewer.renderer().pushes,
            vec![
                SceneCommand::SetImage(ImageId::from("images/kitchen2.jpg")),
                SceneCommand::SetRotation(Some(RotationAnimation::full_turn(60_000))),
                SceneCommand::SetFieldOfView(80),
                SceneCommand::SetRigScale(1.0),
            ]
        );
    }

    #[test]
    fn speed_zoom_reset_scenario() {
        let mut viewer = mounted();
        for _ in 0..3 {
            viewer.increase_speed();
        }
        assert_eq!(viewer.state().rotation_period_ms(), 30_000);

        for _ in 0..10 {
            viewer.zoom_out();
        }
        assert_eq!(viewer.state().field_of_view(), 120);

        viewer.reset_zoom();
        assert_eq!(viewer.state().field_of_view(), 80);
        assert_eq!(viewer.state().rig_scale(), 1.0);
        assert_eq!(viewer.state().rotation_period_ms(), 30_000);
        assert!(viewer.state().is_playing());
    }

    #[test]
    fn reset_pushes_fov_then_scale_and_leaves_playback() {
        let mut viewer = mounted();
        viewer.pause();
        viewer.decrease_speed();
        viewer.select_image(ImageId::from("images/hall.webp"));
        viewer.handle_gesture(GestureEvent::Start);
        viewer.handle_gesture(GestureEvent::Move { multiplier: Some(2.5) });
        viewer.zoom_in();
        let before = viewer.state().clone();
        viewer.renderer_mut().pushes.clear();

        viewer.reset_zoom();

        assert_eq!(
            viewer.renderer().pushes,
            vec![SceneCommand::SetFieldOfView(80), SceneCommand::SetRigScale(1.0)]
        );
        let after = viewer.state();
        assert_eq!(after.is_playing(), before.is_playing());
        assert_eq!(after.rotation_period_ms(), before.rotation_period_ms());
        assert_eq!(after.selected_image(), before.selected_image());
        assert_eq!(after.gesture_phase(), GesturePhase::Idle);
    }

    #[test]
    fn pause_then_play_reissues_current_directive() {
        let mut viewer = mounted();
        viewer.perform(Control::TogglePlayback);
        assert!(!viewer.state().is_playing());
        viewer.perform(Control::IncreaseSpeed);
        viewer.perform(Control::SelectImage(ImageId::from("images/hall.webp")));
        viewer.renderer_mut().pushes.clear();

        viewer.perform(Control::TogglePlayback);
        assert_eq!(
            viewer.renderer().pushes,
            vec![SceneCommand::SetRotation(Some(RotationAnimation::full_turn(50_000)))]
        );
    }

    #[test]
    fn rig_gestures_drive_scale() {
        let viewer = Rc::new(RefCell::new(mounted()));
        let rig = Rc::new(SignalRig::new());
        Viewer::attach_rig(&viewer, rig.clone());

        rig.emit(GestureEvent::Start);
        rig.emit(GestureEvent::Move { multiplier: Some(2.0) });
        assert_relative_eq!(viewer.borrow().state().rig_scale(), 2.0);

        rig.emit(GestureEvent::Start);
        rig.emit(GestureEvent::Move { multiplier: Some(1.5) });
        assert_relative_eq!(viewer.borrow().state().rig_scale(), 3.0);

        rig.emit(GestureEvent::Start);
        rig.emit(GestureEvent::Move { multiplier: Some(-4.0) });
        assert_relative_eq!(viewer.borrow().state().rig_scale(), 0.5);
    }

    #[test]
    fn detach_releases_every_subscription() {
        let viewer = Rc::new(RefCell::new(mounted()));
        let rig = Rc::new(CountingRig::default());
        for _ in 0..4 {
            Viewer::attach_rig(&viewer, rig.clone());
        }
        assert_eq!(rig.active(), 2);
        assert_eq!(rig.added.get(), 8);

        viewer.borrow_mut().detach_rig();
        assert_eq!(rig.active(), 0);
        assert_eq!(rig.inner.listener_count(), 0);
        assert!(!viewer.borrow().has_rig());

        // detaching twice is harmless
        viewer.borrow_mut().detach_rig();
        assert_eq!(rig.removed.get(), 8);
    }

    #[test]
    fn dropping_viewer_releases_rig() {
        let viewer = Rc::new(RefCell::new(mounted()));
        let rig = Rc::new(CountingRig::default());
        Viewer::attach_rig(&viewer, rig.clone());
        drop(viewer);
        assert_eq!(rig.active(), 0);
    }

    #[test]
    fn unmount_without_rig_is_clean() {
        let viewer = mounted();
        let scene = viewer.unmount();
        assert_eq!(scene.pushes.len(), 4);
    }

    #[test]
    fn replacing_rig_stops_old_signals() {
        let viewer = Rc::new(RefCell::new(mounted()));
        let old_rig = Rc::new(SignalRig::new());
        let new_rig = Rc::new(SignalRig::new());
        Viewer::attach_rig(&viewer, old_rig.clone());
        Viewer::attach_rig(&viewer, new_rig.clone());
        assert_eq!(old_rig.listener_count(), 0);

        old_rig.emit(GestureEvent::Start);
        old_rig.emit(GestureEvent::Move { multiplier: Some(2.0) });
        assert_eq!(viewer.borrow().state().rig_scale(), 1.0);

        new_rig.emit(GestureEvent::Start);
        new_rig.emit(GestureEvent::Move { multiplier: Some(2.0) });
        assert_relative_eq!(viewer.borrow().state().rig_scale(), 2.0);
    }
}
