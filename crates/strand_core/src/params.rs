//! Per-draw line parameters
//!
//! A [`LineParams`] value is the immutable snapshot of everything a draw call
//! reads besides the geometry itself: viewport, width, opacity and shading mode.
//! It is passed by reference into every stage and never mutated mid-pass.

use serde::{Serialize, Deserialize};
use strand_math::Vec2;

/// Width in pixels of the antialiasing ramp at the ribbon edge
pub const DEFAULT_FALLOFF: f32 = 1.0;

/// Segments whose endpoints lie beyond this multiple of the half viewport are culled
pub const DEFAULT_CULL_MARGIN: f32 = 4.0;

/// Per-pixel shading policy applied to the expanded ribbon
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShadingMode {
    /// Antialiased edge ramp; pixels beyond half the width are discarded
    #[default]
    Clip,
    /// Antialiased edge ramp; pixels beyond half the width keep their alpha
    Soft,
    /// No antialiasing, color passes through unchanged
    Plain,
}

impl ShadingMode {
    /// All modes in cycling order
    pub const ALL: [ShadingMode; 3] = [ShadingMode::Clip, ShadingMode::Soft, ShadingMode::Plain];

    /// Value written to the GPU uniform (must match ribbon.wgsl)
    pub fn as_u32(self) -> u32 {
        match self {
            ShadingMode::Clip => 0,
            ShadingMode::Soft => 1,
            ShadingMode::Plain => 2,
        }
    }

    /// Next mode in cycling order
    pub fn next(self) -> Self {
        match self {
            ShadingMode::Clip => ShadingMode::Soft,
            ShadingMode::Soft => ShadingMode::Plain,
            ShadingMode::Plain => ShadingMode::Clip,
        }
    }

    /// Human readable name
    pub fn label(self) -> &'static str {
        match self {
            ShadingMode::Clip => "antialiased (clipped)",
            ShadingMode::Soft => "antialiased (unclipped)",
            ShadingMode::Plain => "no antialiasing",
        }
    }
}

/// Immutable configuration for one draw call
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineParams {
    /// Viewport size in pixels
    pub viewport: Vec2,
    /// Target line width in pixels
    pub width: f32,
    /// Global opacity multiplier in [0, 1]
    pub opacity: f32,
    /// Antialiasing ramp width in pixels
    pub falloff: f32,
    /// Off-screen cull bound, in multiples of the half viewport
    pub cull_margin: f32,
    /// Shading policy
    pub mode: ShadingMode,
}

impl LineParams {
    /// Create parameters for a viewport and width, with default opacity, falloff and mode
    pub fn new(viewport_width: f32, viewport_height: f32, width: f32) -> Self {
        Self {
            viewport: Vec2::new(viewport_width, viewport_height),
            width,
            opacity: 1.0,
            falloff: DEFAULT_FALLOFF,
            cull_margin: DEFAULT_CULL_MARGIN,
            mode: ShadingMode::default(),
        }
    }

    /// Set the global opacity
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    /// Set the antialiasing falloff width
    pub fn with_falloff(mut self, falloff: f32) -> Self {
        self.falloff = falloff;
        self
    }

    /// Set the off-screen cull margin
    pub fn with_cull_margin(mut self, cull_margin: f32) -> Self {
        self.cull_margin = cull_margin;
        self
    }

    /// Set the shading mode
    pub fn with_mode(mut self, mode: ShadingMode) -> Self {
        self.mode = mode;
        self
    }

    /// Half the line width, the ribbon's extent on each side of its axis
    #[inline]
    pub fn half_width(&self) -> f32 {
        self.width * 0.5
    }

    /// Half the viewport size (pixels from the viewport center to its edges)
    #[inline]
    pub fn half_viewport(&self) -> Vec2 {
        self.viewport * 0.5
    }

    /// Check the parameters describe a drawable configuration
    pub fn validate(&self) -> Result<(), ParamsError> {
        let positive = |v: f32| v.is_finite() && v > 0.0;

        if !positive(self.viewport.x) || !positive(self.viewport.y) {
            return Err(ParamsError::InvalidViewport(self.viewport.x, self.viewport.y));
        }
        if !positive(self.width) {
            return Err(ParamsError::InvalidWidth(self.width));
        }
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(ParamsError::InvalidOpacity(self.opacity));
        }
        if !self.falloff.is_finite() || self.falloff < 0.0 {
            return Err(ParamsError::InvalidFalloff(self.falloff));
        }
        if self.cull_margin.is_nan() || self.cull_margin < 1.0 {
            return Err(ParamsError::InvalidCullMargin(self.cull_margin));
        }
        Ok(())
    }
}

/// Error returned by [`LineParams::validate`]
#[derive(Debug, Clone, PartialEq)]
pub enum ParamsError {
    /// Viewport dimensions must be positive
    InvalidViewport(f32, f32),
    /// Width must be positive
    InvalidWidth(f32),
    /// Opacity must lie in [0, 1]
    InvalidOpacity(f32),
    /// Falloff must be non-negative
    InvalidFalloff(f32),
    /// Cull margin must be at least 1 (the visible viewport)
    InvalidCullMargin(f32),
}

impl std::fmt::Display for ParamsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamsError::InvalidViewport(w, h) => write!(f, "Invalid viewport size: {}x{}", w, h),
            ParamsError::InvalidWidth(w) => write!(f, "Invalid line width: {}", w),
            ParamsError::InvalidOpacity(o) => write!(f, "Opacity out of [0, 1]: {}", o),
            ParamsError::InvalidFalloff(v) => write!(f, "Invalid falloff: {}", v),
            ParamsError::InvalidCullMargin(m) => write!(f, "Cull margin below 1: {}", m),
        }
    }
}

impl std::error::Error for ParamsError {}
