//! Error types for voxslab

use thiserror::Error;

/// Main error type for slab assembly and voxel addressing
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid resolution {0:?}: every component must be positive")]
    InvalidResolution([f64; 3]),

    #[error("cannot align against resolution {0:?}")]
    IncompatibleResolution([f64; 3]),

    /// A voxel range was still empty after widening. This is a bug in the
    /// function that produced it, never a caller-recoverable condition.
    #[error("voxel range {0:?} is degenerate after widening")]
    DegenerateRegionUnrecoverable([i64; 6]),

    #[error("fetch failed at level {level}: {reason}")]
    FetchFailure { level: u32, reason: String },

    #[error("no mesh returned for segment {0}")]
    IdMismatch(u64),

    #[error("invalid orientation: forward {forward} and up {up} share an axis")]
    InvalidOrientation { forward: String, up: String },

    #[error("invalid scale factor {0}: must be positive and finite")]
    InvalidScaleFactor(f64),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

impl Error {
    /// Shorthand for a fetch failure at `level`
    pub fn fetch(level: u32, reason: impl Into<String>) -> Self {
        Error::FetchFailure { level, reason: reason.into() }
    }
}
