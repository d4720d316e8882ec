//! Texture conversion for slab sections.
//!
//! Textures are laid out so that, read bottom-up as host pixel buffers are,
//! each slice appears rotated by 180°, the orientation the corner UVs in
//! [`geometry`](crate::slab::geometry) expect.

use image::{DynamicImage, ImageBuffer, Rgba, Rgba32FImage, RgbaImage};

use crate::core::types::{BLACK, Rgb};
use crate::volume::block::Slice2;

/// Build a texture by sampling `slice` with the 180° layout
fn texture_from<T: Copy>(slice: &Slice2<T>, pixel: impl Fn(T) -> [f32; 4]) -> Rgba32FImage {
    let width = slice.width;
    ImageBuffer::from_fn(slice.width as u32, slice.height as u32, |x, y| {
        let value = slice.data[(width - 1 - x as usize) + width * y as usize];
        Rgba(pixel(value))
    })
}

/// Greyscale texture of a normalized image slice (opaque)
pub fn image_texture(slice: &Slice2<f32>) -> Rgba32FImage {
    texture_from(slice, |v| [v, v, v, 1.0])
}

/// Color texture of a segmentation slice; background is fully transparent
pub fn color_texture(slice: &Slice2<Rgb>) -> Rgba32FImage {
    texture_from(slice, |c| {
        let alpha = if c == BLACK { 0.0 } else { 1.0 };
        [c[0], c[1], c[2], alpha]
    })
}

/// Flat RGBA float buffer with rows ordered bottom-up, as host images expect
pub fn pixel_buffer(texture: &Rgba32FImage) -> Vec<f32> {
    image::imageops::flip_vertical(texture).into_raw()
}

/// 8-bit copy of a float texture, for encoding to PNG
pub fn to_rgba8(texture: &Rgba32FImage) -> RgbaImage {
    DynamicImage::ImageRgba32F(texture.clone()).to_rgba8()
}
