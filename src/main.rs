use clap::Parser;
use std::process;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window, WindowId},
};

use voxel_lattice::camera::Camera;
use voxel_lattice::cli::Cli;
use voxel_lattice::config::DemoConfig;
use voxel_lattice::frame::{Clock, FpsCounter};
use voxel_lattice::renderer::LatticeRenderer;
use voxel_lattice::scene::Scene;

// === Constants ===

const FPS_UPDATE_INTERVAL: f32 = 1.0;
const INITIAL_WINDOW_WIDTH: u32 = 512;
const INITIAL_WINDOW_HEIGHT: u32 = 512;

// === Type Aliases ===

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

struct App {
    window: Option<Arc<Window>>,
    renderer: Option<LatticeRenderer>,
    camera: Camera,
    clock: Clock,
    fps_counter: FpsCounter,
    fps: f32,
    cli: Cli,
    config: DemoConfig,
}

impl App {
    fn new(cli: Cli, config: DemoConfig) -> Self {
        let camera = config.camera.to_camera();
        Self {
            window: None,
            renderer: None,
            camera,
            clock: Clock::new(),
            fps_counter: FpsCounter::new(FPS_UPDATE_INTERVAL),
            fps: 0.0,
            cli,
            config,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let window = match event_loop.create_window(
                Window::default_attributes()
                    .with_title("Voxel Lattice")
                    .with_inner_size(winit::dpi::LogicalSize::new(
                        INITIAL_WINDOW_WIDTH,
                        INITIAL_WINDOW_HEIGHT,
                    )),
            ) {
                Ok(w) => Arc::new(w),
                Err(e) => {
                    eprintln!("Failed to create window: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            // Free look: keep the cursor captured and hidden
            if let Err(e) = window
                .set_cursor_grab(CursorGrabMode::Confined)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked))
            {
                eprintln!("Warning: cursor grab unavailable: {}", e);
            }
            window.set_cursor_visible(false);

            let scene = Scene::build(&self.config);
            let renderer = match pollster::block_on(LatticeRenderer::new(
                window.clone(),
                scene,
                &self.config,
                &self.cli,
            )) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("Failed to initialize renderer: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            // Do not count initialization time in the first frame delta
            self.clock.reset();
            self.window = Some(window);
            self.renderer = Some(renderer);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Let egui handle the event first
        if let (Some(renderer), Some(window)) = (&mut self.renderer, &self.window) {
            if renderer.handle_event(window, &event) {
                return; // egui consumed the event
            }
        }

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::KeyboardInput { event, .. } => self.camera.process_keyboard(&event),
            WindowEvent::Resized(new_size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(new_size);
                }
            }
            WindowEvent::RedrawRequested => {
                let delta = self.clock.tick();
                if let Some(fps) = self.fps_counter.tick(delta) {
                    self.fps = fps;
                    println!("FPS: {:.1}", fps);
                }
                self.camera.update(delta);

                if let (Some(renderer), Some(window)) = (&mut self.renderer, &self.window) {
                    match renderer.render(&self.camera, window, self.fps) {
                        Ok(()) => {}
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            renderer.recover_surface();
                        }
                        Err(e) => eprintln!("Render error: {}", e),
                    }
                }
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.camera.process_mouse(delta.0 as f32, delta.1 as f32);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = match DemoConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{:#}", e);
            process::exit(1);
        }
    };

    let event_loop = EventLoop::new()?;
    let mut app = App::new(cli, config);

    println!("Voxel Lattice - Controls: WASD + Space/C, Shift to boost, mouse to look, Escape to quit");
    event_loop.run_app(&mut app)?;

    Ok(())
}
