use anyhow::{Context, Result};
use clap::Parser;
use museum_input::ControlKeys;
use museum_render::{CameraController, FramePlan, Scene, SceneDescription};
use museum_render_wgpu::{GpuContext, MuseumRenderer};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};

mod bindings;

const WINDOW_TITLE: &str = "Group 7 Museum";
const WINDOW_WIDTH: u32 = 1024;
const WINDOW_HEIGHT: u32 = 768;
const MSAA_SAMPLES: u32 = 4;

/// Exit status on startup failure (-1 as an 8-bit status).
const STARTUP_FAILURE: u8 = 255;

#[derive(Parser)]
#[command(name = "museum-desktop", about = "Museum walkthrough viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Directory the models/ and textures/ paths are resolved against
    #[arg(long, default_value = ".")]
    asset_root: PathBuf,
}

/// Per-frame application state.
struct AppState {
    scene: Scene,
    camera: CameraController,
    keys: ControlKeys,
    started: Instant,
    frames: u64,
}

impl AppState {
    fn new(scene: Scene) -> Self {
        Self {
            scene,
            camera: CameraController::default(),
            keys: ControlKeys::new(),
            started: Instant::now(),
            frames: 0,
        }
    }

    fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        if let Some(control) = bindings::control_for(key) {
            self.keys.set(control, pressed);
        }
    }

    /// Drop every held key. Releases that happen while unfocused are never
    /// delivered on some platforms.
    fn release_all(&mut self) {
        self.keys = ControlKeys::new();
    }

    /// Update the camera from the held keys and plan this frame's draws.
    fn frame(&mut self) -> FramePlan {
        let now = self.started.elapsed().as_secs_f64();
        let matrices = self.camera.compute_matrices_from_inputs(&self.keys, now);
        self.frames += 1;
        FramePlan::build(&self.scene, &matrices)
    }
}

struct Gpu {
    context: GpuContext,
    renderer: MuseumRenderer,
}

struct ViewerApp {
    state: AppState,
    /// CPU-side assets, handed to the renderer on startup.
    assets: Option<museum_assets::AssetStore>,
    window: Option<Arc<Window>>,
    gpu: Option<Gpu>,
    startup_error: Option<anyhow::Error>,
}

impl ViewerApp {
    fn new(scene: Scene, assets: museum_assets::AssetStore) -> Self {
        Self {
            state: AppState::new(scene),
            assets: Some(assets),
            window: None,
            gpu: None,
            startup_error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(PhysicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to open window")?,
        );

        window.set_cursor_visible(false);
        if window
            .set_cursor_grab(CursorGrabMode::Confined)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked))
            .is_err()
        {
            tracing::debug!("cursor grab unsupported on this platform");
        }

        let size = window.inner_size();
        let context = GpuContext::new(window.clone(), size.width, size.height, MSAA_SAMPLES)
            .context("failed to initialize GPU context")?;

        let assets = self.assets.take().context("assets already uploaded")?;
        let renderer = MuseumRenderer::new(
            &context.device,
            &context.queue,
            context.surface_format(),
            context.config.width,
            context.config.height,
            context.sample_count,
            &assets,
            self.state.scene.len(),
        );

        self.window = Some(window);
        self.gpu = Some(Gpu { context, renderer });
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let plan = self.state.frame();

        let Some(gpu) = &self.gpu else {
            return;
        };

        let output = match gpu.context.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.context.reconfigure();
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        if let Err(e) = gpu
            .renderer
            .render(&gpu.context.device, &gpu.context.queue, &view, &plan)
        {
            tracing::error!("render failed: {e}");
            event_loop.exit();
            return;
        }

        output.present();
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.startup_error.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            self.startup_error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.context.resize(new_size.width, new_size.height);
                    let (width, height) = (gpu.context.config.width, gpu.context.config.height);
                    gpu.renderer.resize(&gpu.context.device, width, height);
                }
            }
            WindowEvent::Focused(false) => {
                self.state.release_all();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        ..
                    },
                ..
            } => {
                let pressed = key_state == ElementState::Pressed;
                if key == bindings::EXIT_KEY && pressed {
                    event_loop.exit();
                    return;
                }
                self.state.handle_key(key, pressed);
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // Renderer resources first, then the surface and device, then the window.
        if let Some(Gpu { context, renderer }) = self.gpu.take() {
            renderer.release();
            drop(context);
        }
        self.window = None;
        tracing::info!("shut down after {} frames", self.state.frames);
    }
}

fn run(cli: Cli) -> Result<()> {
    let (scene, assets) = Scene::load(&SceneDescription::museum(), &cli.asset_root)
        .with_context(|| format!("failed to load scene from {}", cli.asset_root.display()))?;

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = ViewerApp::new(scene, assets);
    event_loop.run_app(&mut app)?;

    match app.startup_error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("museum-desktop starting");

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(STARTUP_FAILURE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use museum_assets::{AssetStore, TextureData, parse_obj};
    use glam::{Mat4, Vec3};
    use museum_render::FrameEntry;

    fn scene() -> Scene {
        let mut store = AssetStore::new();
        let mesh = store.add_mesh(
            "tri",
            parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n", false).unwrap(),
        );
        let tex = store.add_texture(TextureData::placeholder());
        let entry = FrameEntry {
            mesh,
            vertex_count: 3,
            color: museum_common::Rgb::WHITE,
            texture: Some(tex),
        };
        Scene::new(vec![entry], &store).unwrap()
    }

    #[test]
    fn key_events_update_held_controls() {
        let mut state = AppState::new(scene());
        state.handle_key(KeyCode::ArrowUp, true);
        state.handle_key(KeyCode::KeyW, true);
        state.handle_key(KeyCode::KeyW, false);
        state.handle_key(KeyCode::Space, true);
        let held: Vec<_> = state.keys.iter().collect();
        assert_eq!(held, vec![museum_input::ControlKey::Forward]);
    }

    #[test]
    fn each_frame_plans_every_entry() {
        let mut state = AppState::new(scene());
        let plan = state.frame();
        assert_eq!(plan.draws.len(), 1);
        assert_eq!(state.frames, 1);
        assert_eq!(plan.uniforms.model, Mat4::IDENTITY);
    }

    #[test]
    fn first_frame_keeps_camera_at_start() {
        let mut state = AppState::new(scene());
        state.handle_key(KeyCode::ArrowUp, true);
        let plan = state.frame();
        // no time has elapsed before the first frame
        assert_eq!(plan.eye, Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(state.camera.state().position, Vec3::new(0.0, 0.0, 5.0));
    }

    #[test]
    fn losing_focus_releases_held_keys() {
        let mut state = AppState::new(scene());
        state.handle_key(KeyCode::ArrowUp, true);
        state.handle_key(KeyCode::KeyA, true);
        state.release_all();
        assert!(state.keys.is_empty());
    }
}
