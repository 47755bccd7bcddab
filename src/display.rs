//! Display builder and frame driver.
//!
//! [`Display`] configures and runs the whole show: window, renderer,
//! spawn/retire timers, and the per-frame integration pass. Within one
//! frame, every active burst is integrated before the renderer sees the
//! frame, and camera input is applied by the event handlers before the
//! render call - the ordering the simulation core relies on.

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::error::DisplayError;
use crate::gpu::GpuState;
use crate::integrator;
use crate::params::DisplayParams;
use crate::registry::{self, BurstRegistry, SpawnTimer, SPAWN_INTERVAL};
use crate::spawn::SpawnContext;
use crate::time::Time;

/// A fireworks display builder.
///
/// Use method chaining to configure, then call `.run()` to start:
///
/// ```ignore
/// Display::new()
///     .with_params(DisplayParams {
///         design: BurstDesign::Spiral,
///         ..DisplayParams::default()
///     })
///     .run()?;
/// ```
pub struct Display {
    params: DisplayParams,
    seed: Option<u64>,
}

impl Display {
    /// Create a display with default parameters.
    pub fn new() -> Self {
        Self {
            params: DisplayParams::default(),
            seed: None,
        }
    }

    /// Set the initial parameter snapshot.
    pub fn with_params(mut self, params: DisplayParams) -> Self {
        self.params = params;
        self
    }

    /// Seed the sampling context for a reproducible show.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Run the display. Blocks until the window is closed.
    pub fn run(self) -> Result<(), DisplayError> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new(self.params, self.seed);
        event_loop.run_app(&mut app)?;
        Ok(())
    }
}

impl Default for Display {
    fn default() -> Self {
        Self::new()
    }
}

struct App {
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    params: DisplayParams,
    ctx: SpawnContext,
    registry: BurstRegistry,
    spawn_timer: SpawnTimer,
    time: Time,
    mouse_pressed: bool,
    last_mouse_pos: Option<(f64, f64)>,
}

impl App {
    fn new(params: DisplayParams, seed: Option<u64>) -> Self {
        let ctx = match seed {
            Some(seed) => SpawnContext::with_seed(seed),
            None => SpawnContext::new(),
        };

        Self {
            window: None,
            gpu: None,
            params,
            ctx,
            registry: BurstRegistry::new(),
            spawn_timer: SpawnTimer::new(SPAWN_INTERVAL),
            time: Time::new(),
            mouse_pressed: false,
            last_mouse_pos: None,
        }
    }

    fn advance_frame(&mut self, event_loop: &ActiveEventLoop) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };
        let (elapsed, delta) = self.time.update();

        // Spawn cadence: one attempt per interval, silently refused at
        // capacity.
        if self.spawn_timer.tick(delta) {
            let origin = registry::launch_position(&mut self.ctx);
            if let Some(burst) =
                self.registry
                    .try_spawn(origin, &self.params, elapsed, &mut self.ctx)
            {
                // Fresh bursts take the current gradient immediately; the
                // palette colors only show until the first remap.
                burst.buffers_mut().remap_colors(
                    self.params.inside_color,
                    self.params.outside_color,
                    &mut self.ctx,
                );
                gpu.add_burst(burst);
            }
        }

        // Whole-burst retirement. The renderer drops its resources in the
        // same frame, so nothing stale can be drawn afterwards.
        for id in self.registry.retire_due(elapsed) {
            gpu.remove_burst(id);
        }

        // Integrate every remaining burst, re-uploading what changed.
        for burst in self.registry.iter_mut() {
            integrator::step(burst.buffers_mut(), delta);
            gpu.sync_burst(burst);
        }

        #[cfg(feature = "egui")]
        if let Some(window) = &self.window {
            gpu.egui.begin_frame(window);
            let panel_ctx = gpu.egui.ctx.clone();
            let response = crate::panel::draw(&panel_ctx, &mut self.params);
            let frame = gpu.egui.end_frame(window);
            gpu.set_ui_frame(frame);

            if response.colors_changed {
                self.registry.remap_colors(
                    self.params.inside_color,
                    self.params.outside_color,
                    &mut self.ctx,
                );
                for burst in self.registry.iter_mut() {
                    gpu.sync_burst(burst);
                }
            }
        }

        match gpu.render(&self.params, elapsed, delta) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = winit::dpi::PhysicalSize {
                    width: gpu.config.width,
                    height: gpu.config.height,
                };
                gpu.resize(size);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => event_loop.exit(),
            Err(e) => eprintln!("Render error: {:?}", e),
        }

        if self.time.frame() % 60 == 0 {
            if let Some(window) = &self.window {
                window.set_title(&format!("Skyburst - {:.0} fps", self.time.fps()));
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title("Skyburst")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                eprintln!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        match pollster::block_on(GpuState::new(window.clone())) {
            Ok(gpu) => {
                self.window = Some(window);
                self.gpu = Some(gpu);
            }
            Err(e) => {
                eprintln!("GPU error: {}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        #[cfg(feature = "egui")]
        if let (Some(gpu), Some(window)) = (self.gpu.as_mut(), self.window.as_ref()) {
            if gpu.egui.on_window_event(window, &event) {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(physical_size);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if button == MouseButton::Left {
                    self.mouse_pressed = state == ElementState::Pressed;
                    if !self.mouse_pressed {
                        self.last_mouse_pos = None;
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if self.mouse_pressed {
                    if let Some((last_x, last_y)) = self.last_mouse_pos {
                        let dx = position.x - last_x;
                        let dy = position.y - last_y;

                        if let Some(gpu) = &mut self.gpu {
                            gpu.camera.yaw -= dx as f32 * 0.005;
                            gpu.camera.pitch += dy as f32 * 0.005;
                            gpu.camera.pitch = gpu.camera.pitch.clamp(-1.5, 1.5);
                        }
                    }
                    self.last_mouse_pos = Some((position.x, position.y));
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.1,
                };
                if let Some(gpu) = &mut self.gpu {
                    gpu.camera.distance -= scroll * 2.0;
                    gpu.camera.distance = gpu.camera.distance.clamp(5.0, 150.0);
                }
            }
            WindowEvent::RedrawRequested => {
                self.advance_frame(event_loop);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}
