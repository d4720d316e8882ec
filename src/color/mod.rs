//! Segmentation colorization: seeded ID hashing and block remapping

pub mod hash;
pub mod hsv;
pub mod colorize;

pub use hash::{BACKGROUND_ID, color_for_id, hash_id, mix32};
pub use hsv::hsv_to_rgb;
pub use colorize::{ColorMap, colorize_block};
