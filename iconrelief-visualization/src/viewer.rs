//! Interactive window showing the extruded icon

use std::path::PathBuf;
use std::time::{Duration, Instant};

use iconrelief_algorithms::{load_icon, BuildOptions, BuildReport};
use iconrelief_core::{Error, MeshGroup, Result, Scene};
use iconrelief_gpu::{MeshRenderConfig, MeshRenderer};
use iconrelief_io::SvgLoadOptions;
use tracing::{debug, error, info};
use winit::{
    dpi::LogicalSize,
    event::{ElementState, Event, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::WindowBuilder,
};

use crate::config::ViewerConfig;
use crate::controls::{DragAction, OrbitControls};

/// Result of a background icon load
#[derive(Debug)]
pub struct LoadedIcon {
    pub group: MeshGroup,
    pub report: BuildReport,
    pub elapsed: Duration,
}

/// Load and build the icon on a worker thread.
///
/// Exactly one result is sent on the returned channel.
pub fn spawn_icon_load(
    path: PathBuf,
    svg_options: SvgLoadOptions,
    build_options: BuildOptions,
) -> Result<flume::Receiver<Result<LoadedIcon>>> {
    let (sender, receiver) = flume::bounded(1);

    std::thread::Builder::new()
        .name("svg-loader".to_string())
        .spawn(move || {
            let start = Instant::now();
            let result = load_icon(&path, svg_options, &build_options).map(|(group, report)| LoadedIcon {
                group,
                report,
                elapsed: start.elapsed(),
            });
            // The viewer may already be gone.
            let _ = sender.send(result);
        })?;

    Ok(receiver)
}

/// Window, render loop and input handling
pub struct Viewer {
    config: ViewerConfig,
}

impl Viewer {
    /// Create a viewer; the configuration is validated here
    pub fn new(config: ViewerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Open the window and run until it is closed
    pub fn run(self) -> Result<()> {
        let config = self.config;
        info!(path = %config.svg_path.display(), "starting viewer");

        let mut scene = Scene::new(config.background_color()?);
        for light in config.scene_lights() {
            scene.add_light(light);
        }

        let mut pending_load = Some(spawn_icon_load(config.svg_path.clone(), config.svg, config.build)?);

        let event_loop = EventLoop::new().map_err(|e| Error::Visualization(format!("Failed to create event loop: {}", e)))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let window = WindowBuilder::new()
            .with_title(config.window.title.as_str())
            .with_inner_size(LogicalSize::new(config.window.width as f64, config.window.height as f64))
            .build(&event_loop)
            .map_err(|e| Error::Visualization(format!("Failed to create window: {}", e)))?;
        let window = &window;

        let render_config = MeshRenderConfig {
            background_color: scene.background,
            enable_multisampling: config.multisampling,
            ..MeshRenderConfig::default()
        };
        let mut renderer = pollster::block_on(MeshRenderer::new(window, render_config))?;
        renderer.update_lights(&scene.lights);

        let size = window.inner_size();
        let mut camera = config.create_camera(1.0);
        camera.set_aspect(size.width, size.height);
        camera.update_projection_matrix();
        let mut controls = OrbitControls::new(&camera, &config.controls);

        let mut failure: Option<Error> = None;
        let failure_slot = &mut failure;

        event_loop
            .run(move |event, elwt| match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => elwt.exit(),
                    WindowEvent::Resized(new_size) => {
                        renderer.resize(new_size);
                        camera.set_aspect(new_size.width, new_size.height);
                        camera.update_projection_matrix();
                    }
                    WindowEvent::MouseInput { state, button, .. } => {
                        let action = match button {
                            MouseButton::Left => DragAction::Rotate,
                            MouseButton::Right => DragAction::Pan,
                            _ => return,
                        };
                        match state {
                            ElementState::Pressed => controls.begin_drag(action),
                            ElementState::Released if controls.drag_action() == action => controls.end_drag(),
                            ElementState::Released => {}
                        }
                    }
                    WindowEvent::CursorMoved { position, .. } => {
                        controls.pointer_moved(position.x, position.y, &camera, window.inner_size().height);
                    }
                    WindowEvent::MouseWheel { delta, .. } => {
                        let notches = match delta {
                            MouseScrollDelta::LineDelta(_, y) => y,
                            MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                        };
                        controls.wheel(notches);
                    }
                    WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                        match &event.logical_key {
                            Key::Named(NamedKey::Escape) => elwt.exit(),
                            Key::Character(c) if c.as_str().eq_ignore_ascii_case("r") => {
                                controls.reset(&mut camera);
                                debug!("camera reset");
                            }
                            _ => {}
                        }
                    }
                    WindowEvent::RedrawRequested => {
                        if let Some(receiver) = &pending_load {
                            match receiver.try_recv() {
                                Ok(Ok(loaded)) => {
                                    info!(
                                        meshes = loaded.report.meshes,
                                        triangles = loaded.report.triangles,
                                        elapsed_ms = loaded.elapsed.as_millis() as u64,
                                        "icon loaded"
                                    );
                                    renderer.upload_group(&loaded.group);
                                    scene.set_icon(loaded.group);
                                    pending_load = None;
                                }
                                Ok(Err(e)) => {
                                    error!("failed to load icon: {}", e);
                                    pending_load = None;
                                }
                                Err(flume::TryRecvError::Empty) => {}
                                Err(flume::TryRecvError::Disconnected) => {
                                    error!("icon loader exited without a result");
                                    pending_load = None;
                                }
                            }
                        }

                        controls.update(&mut camera);
                        renderer.update_camera(&camera.view_matrix(), &camera.projection_matrix(), &camera.position);

                        if let Err(e) = renderer.render(scene.background) {
                            error!("render failed: {}", e);
                            *failure_slot = Some(e);
                            elwt.exit();
                        }
                    }
                    _ => {}
                },
                Event::AboutToWait => window.request_redraw(),
                _ => {}
            })
            .map_err(|e| Error::Visualization(format!("Event loop error: {}", e)))?;

        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
