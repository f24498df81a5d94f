//! Strand - antialiased polyline ribbon viewer
//!
//! Draws the trajectories of a set of interacting walkers as two line layers
//! and slowly rotates them.

use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::WindowId,
};

use strand::config::AppConfig;
use strand::scene::{build_layer, LayerKind, SeedStream, WalkerSystem};
use strand::systems::{RenderError, RenderSystem, WindowSystem};
use strand_math::mat4;
use strand_render::RibbonGeometry;

/// Seconds between window title refreshes
const STATS_INTERVAL: f32 = 0.5;

/// Main application state
struct App {
    /// Application configuration
    config: AppConfig,
    window: Option<WindowSystem>,
    renderer: Option<RenderSystem>,
    rings: RibbonGeometry,
    edges: RibbonGeometry,
    /// Model rotation about X, Y and Z in degrees
    rotation: [f32; 3],
    last_frame: Instant,
    frames: u32,
    stats_elapsed: f32,
}

impl App {
    fn new(config: AppConfig) -> Self {
        let (rings, edges) = build_layers(&config);
        Self {
            config,
            window: None,
            renderer: None,
            rings,
            edges,
            rotation: [0.0; 3],
            last_frame: Instant::now(),
            frames: 0,
            stats_elapsed: 0.0,
        }
    }

    fn toggle_layer(&mut self, kind: LayerKind) {
        if let Some(renderer) = &mut self.renderer {
            let visible = renderer.toggle_layer(kind);
            log::info!("{:?}: {}", kind, if visible { "shown" } else { "hidden" });
        }
    }

    /// Advance one seed stream and rebuild both layers from a fresh run
    fn reseed(&mut self, stream: SeedStream) {
        let seed = self.config.simulation.seeds.reseed(stream);
        log::info!("{:?} seed: {}", stream, seed);

        let (rings, edges) = build_layers(&self.config);
        self.rings = rings;
        self.edges = edges;
        if let Some(renderer) = &mut self.renderer {
            renderer.upload_layer(LayerKind::Rings, &self.rings);
            renderer.upload_layer(LayerKind::Edges, &self.edges);
        }
    }

    /// Advance the rotation and frame statistics by one frame
    fn update(&mut self) {
        let now = Instant::now();
        // Cap dt so a stalled frame does not jump the rotation
        let dt = (now - self.last_frame).as_secs_f32().min(1.0 / 30.0);
        self.last_frame = now;

        let speed = self.config.rendering.rotation_speed;
        for (angle, speed) in self.rotation.iter_mut().zip(speed) {
            *angle = (*angle + speed * dt) % 360.0;
        }

        self.frames += 1;
        self.stats_elapsed += dt;
        if self.stats_elapsed >= STATS_INTERVAL {
            if let (Some(window), Some(renderer)) = (&self.window, &self.renderer) {
                if self.config.debug.show_stats {
                    window.update_title(self.frames as f32 / self.stats_elapsed, renderer.modes());
                }
            }
            self.frames = 0;
            self.stats_elapsed = 0.0;
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match WindowSystem::create(event_loop, &self.config.window) {
            Ok(window) => window,
            Err(e) => {
                log::error!("{}", e);
                event_loop.exit();
                return;
            }
        };

        let mut renderer = match RenderSystem::new(window.window().clone(), &self.config) {
            Ok(renderer) => renderer,
            Err(e) => {
                log::error!("{}", e);
                event_loop.exit();
                return;
            }
        };
        renderer.upload_layer(LayerKind::Rings, &self.rings);
        renderer.upload_layer(LayerKind::Edges, &self.edges);

        self.window = Some(window);
        self.renderer = Some(renderer);
        self.last_frame = Instant::now();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(physical_size.width, physical_size.height);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                if let PhysicalKey::Code(key) = event.physical_key {
                    match key {
                        KeyCode::Escape => event_loop.exit(),
                        KeyCode::KeyR => self.toggle_layer(LayerKind::Rings),
                        KeyCode::KeyE => self.toggle_layer(LayerKind::Edges),
                        KeyCode::KeyM => {
                            if let Some(renderer) = &mut self.renderer {
                                let (rings, edges) = renderer.cycle_modes();
                                log::info!(
                                    "Shading modes: rings {}, edges {}",
                                    rings.label(),
                                    edges.label()
                                );
                            }
                        }
                        KeyCode::KeyP => self.reseed(SeedStream::Positions),
                        KeyCode::KeyL => self.reseed(SeedStream::Layout),
                        KeyCode::KeyS => self.reseed(SeedStream::Strengths),
                        KeyCode::KeyF => {
                            if let Some(window) = &self.window {
                                window.toggle_fullscreen();
                            }
                        }
                        _ => {}
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                self.update();

                let [x, y, z] = self.rotation;
                let model = mat4::rotation_degrees(x, y, z);

                if let Some(renderer) = &mut self.renderer {
                    match renderer.render_frame(model) {
                        Ok(()) => {}
                        Err(RenderError::SurfaceLost) => renderer.reconfigure(),
                        Err(RenderError::OutOfMemory) => {
                            log::error!("GPU out of memory");
                            event_loop.exit();
                            return;
                        }
                        Err(e) => log::warn!("{}", e),
                    }
                }

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }
}

/// Simulate the walkers and build the ring and edge geometry
fn build_layers(config: &AppConfig) -> (RibbonGeometry, RibbonGeometry) {
    let trajectories = WalkerSystem::new(config.simulation.to_walker_params()).run();

    let rings = build_layer(&trajectories, LayerKind::Rings, &config.rings).unwrap_or_else(|e| {
        log::error!("Failed to build rings: {}", e);
        RibbonGeometry::new()
    });
    let edges = build_layer(&trajectories, LayerKind::Edges, &config.edges).unwrap_or_else(|e| {
        log::error!("Failed to build edges: {}", e);
        RibbonGeometry::new()
    });

    log::info!(
        "Simulated {} walkers over {} iterations: {} ring segments, {} edge segments",
        trajectories.walker_count(),
        trajectories.iteration_count(),
        rings.segment_count(),
        edges.segment_count()
    );
    (rings, edges)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let loaded = AppConfig::load();

    // Logging follows the configured level unless RUST_LOG is set
    let level = loaded
        .as_ref()
        .map(|c| c.debug.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    log::info!("Starting Strand");

    let config = loaded.unwrap_or_else(|e| {
        log::warn!("Failed to load config: {}. Using defaults.", e);
        AppConfig::default()
    });

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;
    Ok(())
}
