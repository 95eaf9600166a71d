// main.rs — window, input routing and the control UI around the viewer

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod frame;
mod loader;
mod renderer;
mod touch;

use clap::Parser;
use frame::FrameScene;
use loader::LoadedImage;
use panorama_tour::config::{Cli, ConfigError, ViewerConfig};
use panorama_tour::rig::{CameraRig, SignalRig};
use panorama_tour::{i18n, Control, ImageCatalog, ImageId, Viewer, ViewerState};
use renderer::{Renderer, RendererError};
use touch::{MagnifyTracker, SpreadTracker};

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use winit::{
    dpi::{LogicalSize, PhysicalPosition},
    event::*,
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};

const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "bmp", "webp"];

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("cannot create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error(transparent)]
    Renderer(#[from] RendererError),
}

fn main() {
    env_logger::init();
    if let Err(e) = run(Cli::parse()) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

/// What the UI asked for during one frame.
enum UiAction {
    Control(Control),
    OpenImage,
    SetLanguage(String),
    SetShowFps(bool),
    Exit,
}

/// Read-only view of everything the panels display.
struct UiSnapshot<'a> {
    state: &'a ViewerState,
    catalog: &'a ImageCatalog,
    yaw: f32,
    pitch: f32,
    effective_fov: f32,
    fps: f32,
    show_fps: bool,
    loading: bool,
    lang: &'a str,
}

fn run(cli: Cli) -> Result<(), AppError> {
    let config = ViewerConfig::load(cli.config.as_deref())?.with_cli(&cli);

    let mut current_lang = i18n::resolve_lang(cli.lang.as_deref(), config.language.as_deref());
    i18n::init(current_lang.clone());

    let mut catalog = config.catalog();
    let initial_image = config.initial_image();

    let event_loop = EventLoop::new();
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(i18n::tr("app.title"))
            .with_inner_size(LogicalSize::new(1280, 720))
            .build(&event_loop)?,
    );

    let mut renderer = pollster::block_on(Renderer::new(window.clone()))?;

    let viewer = Rc::new(RefCell::new(Viewer::mount(
        FrameScene::new(config.initial_yaw_degrees),
        initial_image,
    )));
    let rig = Rc::new(SignalRig::new());
    Viewer::attach_rig(&viewer, rig.clone() as Rc<dyn CameraRig>);

    let mut spread = SpreadTracker::default();
    let mut magnify = MagnifyTracker::default();

    let mut mouse_pressed = false;
    let mut last_mouse_pos: Option<PhysicalPosition<f64>> = None;

    let mut last_frame_time = Instant::now();
    let mut frame_count = 0u32;
    let mut fps = 0.0;
    let mut show_fps = false;

    let (tx, rx): (Sender<LoadedImage>, Receiver<LoadedImage>) = channel();
    let mut loading: Option<String> = None;
    request_pending_image(&viewer, &tx, &mut loading);

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;

        while let Ok(loaded) = rx.try_recv() {
            let current = viewer.borrow().state().selected_image().source() == loaded.source;
            match loaded.result {
                Ok(rgba) if current => renderer.load_panorama(rgba),
                Ok(_) => log::debug!("dropping stale panorama {}", loaded.source),
                Err(e) => {
                    log::error!("{}", i18n::tr_with("error.load_image", &[("err", e.to_string())]));
                    viewer.borrow_mut().renderer_mut().forget_image(&loaded.source);
                }
            }
            if loading.as_deref() == Some(loaded.source.as_str()) {
                loading = None;
            }
        }

        let mut actions = Vec::new();

        match event {
            Event::WindowEvent { event, .. } => {
                let response = renderer.egui_state.on_event(&renderer.egui_ctx, &event);
                if response.consumed {
                    return;
                }

                match event {
                    WindowEvent::CloseRequested => actions.push(UiAction::Exit),

                    WindowEvent::Resized(new_size) => renderer.resize(new_size),

                    WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                        renderer.resize(*new_inner_size)
                    }

                    WindowEvent::KeyboardInput { input, .. } if input.state == ElementState::Pressed => {
                        let selected = viewer.borrow().state().selected_image().clone();
                        let action = match input.virtual_keycode {
                            Some(VirtualKeyCode::Space) => Some(UiAction::Control(Control::TogglePlayback)),
                            Some(VirtualKeyCode::Equals | VirtualKeyCode::Plus | VirtualKeyCode::NumpadAdd) => {
                                Some(UiAction::Control(Control::IncreaseSpeed))
                            }
                            Some(VirtualKeyCode::Minus | VirtualKeyCode::NumpadSubtract) => {
                                Some(UiAction::Control(Control::DecreaseSpeed))
                            }
                            Some(VirtualKeyCode::LBracket) => Some(UiAction::Control(Control::ZoomIn)),
                            Some(VirtualKeyCode::RBracket) => Some(UiAction::Control(Control::ZoomOut)),
                            Some(VirtualKeyCode::R) => Some(UiAction::Control(Control::ResetZoom)),
                            Some(VirtualKeyCode::Right) => catalog
                                .next_after(&selected)
                                .map(|id| UiAction::Control(Control::SelectImage(id.clone()))),
                            Some(VirtualKeyCode::Left) => catalog
                                .previous_before(&selected)
                                .map(|id| UiAction::Control(Control::SelectImage(id.clone()))),
                            Some(VirtualKeyCode::O) => Some(UiAction::OpenImage),
                            _ => None,
                        };
                        actions.extend(action);
                    }

                    WindowEvent::MouseInput { state, button: MouseButton::Left, .. } => {
                        mouse_pressed = state == ElementState::Pressed;
                        if !mouse_pressed {
                            last_mouse_pos = None;
                        }
                    }

                    WindowEvent::CursorMoved { position, .. } => {
                        if mouse_pressed {
                            if let Some(last_pos) = last_mouse_pos {
                                let dx = (position.x - last_pos.x) as f32;
                                let dy = (position.y - last_pos.y) as f32;
                                let width = renderer.size.width as f32;
                                let height = renderer.size.height as f32;

                                if width > 0.0 && height > 0.0 {
                                    let mut viewer = viewer.borrow_mut();
                                    let scene = viewer.renderer_mut();
                                    // one pixel of drag moves the sky by one pixel
                                    let v_f = scene.effective_fov().to_radians();
                                    let h_f = 2.0 * ((v_f / 2.0).tan() * width / height).atan();
                                    scene.look(
                                        dx * (h_f / width).to_degrees(),
                                        dy * (v_f / height).to_degrees(),
                                    );
                                }
                            }
                            last_mouse_pos = Some(position);
                        }
                    }

                    WindowEvent::MouseWheel { delta, .. } => {
                        let scroll = match delta {
                            MouseScrollDelta::LineDelta(_, y) => y,
                            MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 20.0,
                        };
                        if scroll > 0.0 {
                            actions.push(UiAction::Control(Control::ZoomIn));
                        } else if scroll < 0.0 {
                            actions.push(UiAction::Control(Control::ZoomOut));
                        }
                    }

                    WindowEvent::Touch(t) => {
                        if let Some(gesture) = spread.on_touch(t.id, t.phase, t.location.x, t.location.y) {
                            rig.emit(gesture);
                        }
                    }

                    WindowEvent::TouchpadMagnify { delta, phase, .. } => {
                        if let Some(gesture) = magnify.on_magnify(delta, phase) {
                            rig.emit(gesture);
                        }
                    }

                    WindowEvent::DroppedFile(path) => {
                        let id = catalog.insert(ImageId::new(path.display().to_string())).clone();
                        actions.push(UiAction::Control(Control::SelectImage(id)));
                    }

                    _ => {}
                }
            }

            Event::RedrawRequested(_) => {
                frame_count += 1;
                let now = Instant::now();
                let elapsed = now.duration_since(last_frame_time).as_secs_f32();
                if elapsed >= 1.0 {
                    fps = frame_count as f32 / elapsed;
                    frame_count = 0;
                    last_frame_time = now;
                }

                let viewer_ref = viewer.borrow();
                let scene = viewer_ref.renderer();
                let snapshot = UiSnapshot {
                    state: viewer_ref.state(),
                    catalog: &catalog,
                    yaw: scene.yaw_at(now),
                    pitch: scene.pitch(),
                    effective_fov: scene.effective_fov(),
                    fps,
                    show_fps,
                    loading: loading.is_some(),
                    lang: &current_lang,
                };

                renderer.update_camera(snapshot.yaw, snapshot.pitch, snapshot.effective_fov);
                let render_result =
                    renderer.render_with_ui(&window, |ctx| draw_ui(ctx, &snapshot, &mut actions));
                drop(viewer_ref);

                match render_result {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => renderer.resize(renderer.size),
                    Err(wgpu::SurfaceError::OutOfMemory) => actions.push(UiAction::Exit),
                    Err(e) => log::warn!("render error: {:?}", e),
                }
            }

            Event::MainEventsCleared => window.request_redraw(),

            _ => {}
        }

        for action in actions {
            match action {
                UiAction::Control(control) => viewer.borrow_mut().perform(control),
                UiAction::OpenImage => {
                    if let Some(path) = pick_image_file() {
                        let id = catalog.insert(ImageId::new(path.display().to_string())).clone();
                        viewer.borrow_mut().select_image(id);
                    }
                }
                UiAction::SetLanguage(code) => {
                    i18n::init(code.clone());
                    window.set_title(&i18n::tr("app.title"));
                    current_lang = code;
                }
                UiAction::SetShowFps(show) => show_fps = show,
                UiAction::Exit => {
                    viewer.borrow_mut().detach_rig();
                    *control_flow = ControlFlow::Exit;
                }
            }
        }

        request_pending_image(&viewer, &tx, &mut loading);
    });
}

/// Starts loading the image the scene was last told to show, if it has not
/// been requested yet.
fn request_pending_image(
    viewer: &Rc<RefCell<Viewer<FrameScene>>>,
    tx: &Sender<LoadedImage>,
    loading: &mut Option<String>,
) {
    if let Some(source) = viewer.borrow_mut().renderer_mut().take_pending_image() {
        *loading = Some(source.clone());
        loader::spawn_load(source, tx.clone());
    }
}

fn pick_image_file() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter(&i18n::tr("file.filter.images"), &IMAGE_EXTENSIONS)
        .pick_file()
}

fn draw_ui(ctx: &egui::Context, snap: &UiSnapshot<'_>, actions: &mut Vec<UiAction>) {
    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            ui.menu_button(i18n::tr("menu.file"), |ui| {
                if ui.button(i18n::tr("menu.open_image")).clicked() {
                    actions.push(UiAction::OpenImage);
                    ui.close_menu();
                }
                if ui.button(i18n::tr("menu.exit")).clicked() {
                    actions.push(UiAction::Exit);
                    ui.close_menu();
                }
            });

            ui.menu_button(i18n::tr("menu.view"), |ui| {
                let mut show_fps = snap.show_fps;
                if ui.checkbox(&mut show_fps, i18n::tr("view.show_fps")).changed() {
                    actions.push(UiAction::SetShowFps(show_fps));
                    ui.close_menu();
                }
            });

            ui.menu_button(i18n::tr("menu.language"), |ui| {
                for (code, name) in i18n::LANGUAGES {
                    if ui.radio(snap.lang == code, name).clicked() {
                        actions.push(UiAction::SetLanguage(code.to_string()));
                        ui.close_menu();
                    }
                }
            });
        });
    });

    egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            if snap.loading {
                ui.label(egui::RichText::new(i18n::tr("status.loading_image")).color(egui::Color32::YELLOW));
                ui.label("|");
            }
            ui.label(snap.state.selected_image().label());
            ui.label("|");
            ui.label(format!("FOV: {}° ({:.1}°)", snap.state.field_of_view(), snap.effective_fov));
            ui.label("|");
            ui.label(i18n::tr_with(
                "status.rig_scale",
                &[("scale", format!("{:.2}", snap.state.rig_scale()))],
            ));
            ui.label("|");
            ui.label(i18n::tr_with(
                "status.period",
                &[("secs", (snap.state.rotation_period_ms() / 1000).to_string())],
            ));
            ui.label("|");
            ui.label(format!("Yaw: {:.1}°", snap.yaw));
            ui.label("|");
            ui.label(format!("Pitch: {:.1}°", snap.pitch));
            if snap.show_fps {
                ui.label("|");
                ui.label(egui::RichText::new(format!("FPS: {:.1}", snap.fps)).color(egui::Color32::GREEN));
            }
        });
    });

    egui::TopBottomPanel::bottom("controls").show(ctx, |ui| {
        ui.horizontal(|ui| {
            let playback = if snap.state.is_playing() {
                (i18n::tr("control.pause"), Control::Pause)
            } else {
                (i18n::tr("control.play"), Control::Play)
            };
            let buttons = [
                playback,
                (i18n::tr("control.slower"), Control::DecreaseSpeed),
                (i18n::tr("control.faster"), Control::IncreaseSpeed),
                (i18n::tr("control.zoom_in"), Control::ZoomIn),
                (i18n::tr("control.zoom_out"), Control::ZoomOut),
                (i18n::tr("control.reset_zoom"), Control::ResetZoom),
            ];
            for (label, control) in buttons {
                if ui.button(label).clicked() {
                    actions.push(UiAction::Control(control));
                }
            }
        });
    });

    egui::TopBottomPanel::bottom("thumbnails").show(ctx, |ui| {
        egui::ScrollArea::horizontal().show(ui, |ui| {
            ui.horizontal(|ui| {
                for id in snap.catalog.entries() {
                    let selected = id == snap.state.selected_image();
                    if ui
                        .selectable_label(selected, id.label())
                        .on_hover_text(id.source())
                        .clicked()
                    {
                        actions.push(UiAction::Control(Control::SelectImage(id.clone())));
                    }
                }
            });
        });
    });
}
