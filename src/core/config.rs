//! Engine configuration: host unit scale, orientation and colorization seed.

use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::types::Result;
use crate::math::axis::{AxisDirection, axis_conversion};

/// Default divisor from physical units (nm) to host units
pub const DEFAULT_SCALE_FACTOR: f64 = 10_000.0;

/// Default cap on parallel worker threads
pub const DEFAULT_MAX_THREADS: usize = 10;

/// Default seed for segment colors
pub const DEFAULT_COLOR_SEED: u32 = 42;

/// Shader style requested for a slab material. Recorded, never interpreted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShaderStyle {
    #[default]
    Principled,
    Shadeless,
}

/// Process-wide configuration, injected into every operation that needs it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Physical units are divided by this to get host-local units.
    pub scale_factor: f64,
    /// Forward axis of the volume's frame, as seen by the host.
    pub axis_forward: AxisDirection,
    /// Up axis of the volume's frame, as seen by the host.
    pub axis_up: AxisDirection,
    /// Seed for `color_for_id`.
    pub color_seed: u32,
    /// Max worker threads for fetches and colorization.
    pub max_threads: usize,
    /// Default shader style recorded on new slabs.
    pub shader: ShaderStyle,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scale_factor: DEFAULT_SCALE_FACTOR,
            axis_forward: AxisDirection::NegZ,
            axis_up: AxisDirection::NegY,
            color_seed: DEFAULT_COLOR_SEED,
            max_threads: DEFAULT_MAX_THREADS,
            shader: ShaderStyle::Principled,
        }
    }
}

impl EngineConfig {
    /// Check that the scale factor and orientation are usable
    pub fn validate(&self) -> Result<()> {
        if !(self.scale_factor.is_finite() && self.scale_factor > 0.0) {
            return Err(Error::InvalidScaleFactor(self.scale_factor));
        }
        axis_conversion(self.axis_forward, self.axis_up)?;
        Ok(())
    }

    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build a rayon pool capped at `max_threads` (at least one thread)
    pub fn thread_pool(&self) -> std::result::Result<rayon::ThreadPool, rayon::ThreadPoolBuildError> {
        rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_threads.max(1))
            .thread_name(|i| format!("voxslab-worker-{i}"))
            .build()
    }
}
