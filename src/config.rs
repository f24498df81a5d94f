//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`STRAND_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::path::Path;
use strand_core::{Gradient, LineParams, ParamsError, ShadingMode, DEFAULT_CULL_MARGIN, DEFAULT_FALLOFF};
use crate::scene::{InteractionLaw, RelationModel, WalkerParams, WalkerSeeds};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Window configuration
    #[serde(default)]
    pub window: WindowConfig,
    /// Camera configuration
    #[serde(default)]
    pub camera: CameraConfig,
    /// Walker simulation producing the drawn lines
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// One closed line per simulation iteration
    #[serde(default = "LayerConfig::rings")]
    pub rings: LayerConfig,
    /// One line per walker trajectory
    #[serde(default = "LayerConfig::edges")]
    pub edges: LayerConfig,
    /// Rendering configuration
    #[serde(default)]
    pub rendering: RenderingConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            camera: CameraConfig::default(),
            simulation: SimulationConfig::default(),
            rings: LayerConfig::rings(),
            edges: LayerConfig::edges(),
            rendering: RenderingConfig::default(),
            debug: DebugConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`STRAND_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // STRAND_RINGS__WIDTH=4 -> rings.width = 4
        figment = figment.merge(Env::prefixed("STRAND_").split("__"));

        let mut config: AppConfig = figment.extract()?;
        config.sanitize();
        Ok(config)
    }

    /// Reset line settings that cannot be drawn to their defaults
    ///
    /// Each failing section falls back on its own. Returns the number of
    /// sections that were reset.
    pub fn sanitize(&mut self) -> usize {
        let mut reset = 0;

        if let Err(e) = self.rendering.validate() {
            log::warn!("Invalid [rendering] line settings: {}. Using defaults.", e);
            let defaults = RenderingConfig::default();
            self.rendering.falloff = defaults.falloff;
            self.rendering.cull_margin = defaults.cull_margin;
            reset += 1;
        }

        for (name, layer, defaults) in [
            ("rings", &mut self.rings, LayerConfig::rings()),
            ("edges", &mut self.edges, LayerConfig::edges()),
        ] {
            if let Err(e) = layer.validate(&self.rendering) {
                log::warn!("Invalid [{}] layer: {}. Using defaults.", name, e);
                *layer = defaults;
                reset += 1;
            }
        }

        reset
    }
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
    /// Start in fullscreen mode
    pub fullscreen: bool,
    /// Enable VSync
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Strand - Polyline Ribbons".to_string(),
            width: 1280,
            height: 720,
            fullscreen: false,
            vsync: true,
        }
    }
}

/// Camera configuration
///
/// The camera sits on the +Z axis looking at the origin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Distance from the origin
    pub distance: f32,
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: 100.0,
            fov: 40.0,
            near: 1.0,
            far: 500.0,
        }
    }
}

/// Walker simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of walkers (points per ring)
    pub count: usize,
    /// Half extent of the start position cube
    pub spread: f32,
    /// Interaction law
    pub law: InteractionLaw,
    /// Relation model
    pub relations: RelationModel,
    /// Mean relation strength
    pub relation_avg: f32,
    /// Relation strength variation
    pub relation_var: f32,
    /// Number of iterations (rings)
    pub iterations: usize,
    /// Seeds of the start position, relation layout and relation strength streams
    pub seeds: WalkerSeeds,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            count: 8,
            spread: 10.0,
            law: InteractionLaw::Position,
            relations: RelationModel::OneToOne,
            relation_avg: 0.1,
            relation_var: 0.0,
            iterations: 40,
            seeds: WalkerSeeds::default(),
        }
    }
}

impl SimulationConfig {
    /// Convert to walker parameters
    pub fn to_walker_params(&self) -> WalkerParams {
        WalkerParams {
            count: self.count,
            spread: self.spread,
            law: self.law,
            relations: self.relations,
            relation_avg: self.relation_avg,
            relation_var: self.relation_var,
            iterations: self.iterations,
            seeds: self.seeds,
        }
    }
}

/// Style of one line layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerConfig {
    /// Draw this layer
    pub visible: bool,
    /// Line width in pixels
    pub width: f32,
    /// Global opacity
    pub opacity: f32,
    /// Shading mode
    pub mode: ShadingMode,
    /// Color of every point when no gradient is set [r, g, b, a]
    pub color: [f32; 4],
    /// Colors spread over all points of the layer, in order
    pub gradient: Option<Gradient>,
    /// Connect each line's last point back to its first
    pub closed: bool,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            visible: true,
            width: 1.0,
            opacity: 1.0,
            mode: ShadingMode::Clip,
            color: [0.0, 0.0, 0.0, 1.0],
            gradient: None,
            closed: false,
        }
    }
}

impl LayerConfig {
    /// Default ring style: closed, black fading to red over the iterations
    pub fn rings() -> Self {
        Self {
            width: 3.0,
            gradient: Some(Gradient::black_to_red()),
            closed: true,
            ..Self::default()
        }
    }

    /// Default trajectory style: open, solid black
    pub fn edges() -> Self {
        Self {
            width: 5.0,
            ..Self::default()
        }
    }

    /// Per-draw parameters for a viewport
    pub fn line_params(&self, viewport_width: f32, viewport_height: f32, rendering: &RenderingConfig) -> LineParams {
        LineParams::new(viewport_width, viewport_height, self.width)
            .with_opacity(self.opacity)
            .with_falloff(rendering.falloff)
            .with_cull_margin(rendering.cull_margin)
            .with_mode(self.mode)
    }

    /// Check width and opacity against the shared rendering settings
    pub fn validate(&self, rendering: &RenderingConfig) -> Result<(), ParamsError> {
        self.line_params(1.0, 1.0, rendering).validate()
    }

    /// Advance this layer's shading mode
    pub fn cycle_mode(&mut self) -> ShadingMode {
        self.mode = self.mode.next();
        self.mode
    }

    /// Colors for `count` points, in point order
    pub fn colors(&self, count: usize) -> Vec<[f32; 4]> {
        match &self.gradient {
            Some(gradient) => gradient.generate(count),
            None => vec![self.color; count],
        }
    }
}

/// Rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderingConfig {
    /// Background color [r, g, b, a]
    pub background_color: [f32; 4],
    /// Model auto-rotation about X, Y and Z in degrees per second
    pub rotation_speed: [f32; 3],
    /// Depth-test lines against each other
    pub depth_test: bool,
    /// Antialiasing ramp width in pixels
    pub falloff: f32,
    /// Segments beyond this multiple of the half viewport are culled
    pub cull_margin: f32,
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            background_color: [1.0, 1.0, 1.0, 1.0],
            rotation_speed: [10.0, 20.0, 30.0],
            depth_test: false,
            falloff: DEFAULT_FALLOFF,
            cull_margin: DEFAULT_CULL_MARGIN,
        }
    }
}

impl RenderingConfig {
    /// Check the falloff and cull margin shared by every layer
    pub fn validate(&self) -> Result<(), ParamsError> {
        LineParams::new(1.0, 1.0, 1.0)
            .with_falloff(self.falloff)
            .with_cull_margin(self.cull_margin)
            .validate()
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace) unless `RUST_LOG` is set
    pub log_level: String,
    /// Show frame rate and shading mode in the window title
    pub show_stats: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            show_stats: true,
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}
