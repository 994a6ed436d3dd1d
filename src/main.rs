//! Mantra - touch the sacred circle
//!
//! A single glowing circle: tap it (or press Space/Enter) to start a slow,
//! wavering three-voice drone, tap again to silence it.

use anyhow::Context;
use clap::Parser;
use glam::Vec2;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use mantra::audio::{drone_patch, DeviceContextFactory, PlaybackController, PlaybackState};
use mantra::cli::Args;
use mantra::params::{AnimationTimings, DroneParams, Palette, RenderConfig};
use mantra::particles::ParticleField;
use mantra::rendering::RenderSystem;
use mantra::scene::{window_title, Scene};

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,
    render_config: RenderConfig,

    // Audio and presentation
    controller: PlaybackController<DeviceContextFactory>,
    particles: ParticleField,
    scene: Scene,

    // Input
    cursor: Option<Vec2>,

    // Time tracking
    start_time: Instant,
}

impl App {
    fn new(args: &Args, drone: DroneParams) -> Self {
        let render_config = args.render_config();
        let scene = Scene::new(
            render_config.clone(),
            Palette::default(),
            AnimationTimings::default(),
        );

        Self {
            window: None,
            render_system: None,
            render_config,
            controller: PlaybackController::new(DeviceContextFactory, drone),
            particles: ParticleField::new(args.particle_params(), args.seed),
            scene,
            cursor: None,
            start_time: Instant::now(),
        }
    }

    fn elapsed_s(&self) -> f32 {
        self.start_time.elapsed().as_secs_f32()
    }

    fn window_size(&self) -> Vec2 {
        self.window
            .as_ref()
            .map(|window| {
                let size = window.inner_size();
                Vec2::new(size.width as f32, size.height as f32)
            })
            .unwrap_or(Vec2::new(
                self.render_config.window_width as f32,
                self.render_config.window_height as f32,
            ))
    }

    /// Flip playback and update everything that reads the playing flag
    fn toggle(&mut self) {
        let now = self.elapsed_s();

        match self.controller.toggle() {
            Ok(PlaybackState::Playing) => {
                let burst = self.particles.burst(now).len();
                debug!(burst, total = self.particles.particles().len(), "Particle burst");
            }
            Ok(PlaybackState::Stopped) => {}
            Err(e) => error!("Failed to start playback: {}", e),
        }

        let playing = self.controller.is_playing();
        self.scene.set_playing(playing, now);
        if let Some(window) = &self.window {
            window.set_title(&window_title(playing));
        }
    }

    fn update_hover(&mut self) {
        let now = self.elapsed_s();
        let hovered = self
            .cursor
            .is_some_and(|cursor| self.scene.hit_test(cursor, self.window_size(), now));
        self.scene.set_hovered(hovered, now);
    }

    /// Render a single frame
    fn render_frame(&mut self) {
        let now = self.elapsed_s();
        let window = self.window_size();
        let shapes = self.scene.instances(&self.particles, window, now);
        let background = self.scene.palette().background;

        let Some(render_system) = self.render_system.as_mut() else {
            return;
        };
        render_system.update_instances(&shapes);

        match render_system.render(background) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = window.as_uvec2();
                render_system.resize(size.x, size.y);
            }
            Err(e) => error!("Render error: {:?}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        let window_attributes = Window::default_attributes()
            .with_title(window_title(self.controller.is_playing()))
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        match pollster::block_on(RenderSystem::new(Arc::clone(&window))) {
            Ok(render_system) => self.render_system = Some(render_system),
            Err(e) => {
                error!("Failed to initialize rendering: {:#}", e);
                event_loop.exit();
                return;
            }
        }

        info!("Touch the sacred circle (or press Space) to begin, ESC to quit");
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(code),
                        repeat: false,
                        ..
                    },
                ..
            } => match code {
                KeyCode::Escape => event_loop.exit(),
                KeyCode::Space | KeyCode::Enter => self.toggle(),
                _ => {}
            },
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Some(Vec2::new(position.x as f32, position.y as f32));
                self.update_hover();
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
                self.update_hover();
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                let now = self.elapsed_s();
                let size = self.window_size();
                if self
                    .cursor
                    .is_some_and(|cursor| self.scene.hit_test(cursor, size, now))
                {
                    self.toggle();
                }
            }
            WindowEvent::Resized(size) => {
                if let Some(render_system) = self.render_system.as_mut() {
                    render_system.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => self.render_frame(),
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.controller.dispose();
    }
}

fn main() -> anyhow::Result<()> {
    mantra::logging::init();

    let args = Args::parse();
    let drone = args.drone_params();
    drone.validate().map_err(anyhow::Error::msg)?;

    if args.print_patch {
        println!("{}", drone_patch(&drone).context("Failed to build drone patch")?);
        return Ok(());
    }

    info!(
        base_frequency_hz = drone.base_frequency_hz,
        voices = drone.voices.len(),
        "Mantra starting"
    );

    let mut app = App::new(&args, drone);
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    event_loop.run_app(&mut app).context("Event loop failed")?;

    Ok(())
}
