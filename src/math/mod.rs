//! Axis conventions and frame conversion

pub mod axis;

pub use axis::{Axis, AxisDirection, axis_conversion};
