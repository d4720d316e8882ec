//! Seeded hash from segmentation IDs to colors.
//!
//! The mixing round is the MurmurHash3 32-bit body step. It must stay
//! bit-for-bit identical so that a given (seed, id) renders the same color in
//! every tool that shares the seed.

use crate::color::hsv::hsv_to_rgb;
use crate::core::types::{BLACK, Rgb};

/// Reserved background / unassigned segment
pub const BACKGROUND_ID: u64 = 0;

const C1: u32 = 0xCC9E_2D51;
const C2: u32 = 0x1B87_3593;
const N: u32 = 0xE654_6B64;

/// Mix one 32-bit word into `state`
#[inline]
pub fn mix32(state: u32, word: u32) -> u32 {
    let k = word.wrapping_mul(C1).rotate_left(15).wrapping_mul(C2);
    (state ^ k).rotate_left(13).wrapping_mul(5).wrapping_add(N)
}

/// 32-bit hash of a 64-bit ID: low word first, then high word
#[inline]
pub fn hash_id(seed: u32, id: u64) -> u32 {
    let h1 = mix32(seed, id as u32);
    mix32(h1, (id >> 32) as u32)
}

/// Stable, visually distinct color for a segment ID.
///
/// Hue comes from the low byte of the hash, saturation from the next byte
/// (kept in [0.5, 1]), value is always 1. ID 0 is black.
///
/// # Examples
/// ```
/// use voxslab::color::color_for_id;
///
/// assert_eq!(color_for_id(42, 0), [0.0, 0.0, 0.0]);
/// assert_eq!(color_for_id(42, 1234), color_for_id(42, 1234));
/// ```
pub fn color_for_id(seed: u32, id: u64) -> Rgb {
    if id == BACKGROUND_ID {
        return BLACK;
    }
    let h = hash_id(seed, id);
    let c0 = (h & 0xFF) as f64 / 255.0;
    let c1 = ((h >> 8) & 0xFF) as f64 / 255.0;
    hsv_to_rgb(c0, 0.5 + 0.5 * c1, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn assert_rgb(actual: Rgb, expected: [f64; 3]) {
        for (a, e) in actual.iter().zip(expected) {
            assert!((*a as f64 - e).abs() < 1e-6, "{actual:?} != {expected:?}");
        }
    }

    #[test]
    fn test_mix32_reference_values() {
        assert_eq!(mix32(0, 0), 0xE654_6B64);
        assert_eq!(mix32(42, 1), 0x26DF_4576);
    }

    #[test]
    fn test_hash_reference_values() {
        assert_eq!(hash_id(42, 1), 0x71BE_43AB);
        assert_eq!(hash_id(42, 864_691_135_562_189_439), 0x9013_305D);
        assert_eq!(hash_id(7, (1 << 40) + 3), 0x4006_0ED3);
    }

    #[test]
    fn test_color_reference_values() {
        assert_rgb(color_for_id(42, 1), [0.3834832756632064, 0.3686274509803922, 1.0]);
        assert_rgb(color_for_id(42, 864_691_135_562_189_439), [0.40588235294117647, 1.0, 0.5177162629757784]);
        assert_rgb(color_for_id(7, (1 << 40) + 3), [0.9813840830449828, 0.4725490196078431, 1.0]);
    }

    #[test]
    fn test_background_is_black_for_every_seed() {
        for seed in [0, 1, 42, u32::MAX] {
            assert_eq!(color_for_id(seed, 0), BLACK);
        }
    }

    #[test]
    fn test_deterministic() {
        for id in [1u64, 99, u64::MAX, 1 << 63] {
            let a = color_for_id(42, id);
            let b = color_for_id(42, id);
            assert_eq!(a.map(f32::to_bits), b.map(f32::to_bits));
        }
    }

    #[test]
    fn test_colors_in_unit_range() {
        for id in 1..2000u64 {
            let c = color_for_id(3, id * 7919);
            assert!(c.iter().all(|v| (0.0..=1.0).contains(v)), "{c:?}");
            // value = 1 means the brightest channel is always full
            assert!(c.iter().any(|v| *v == 1.0));
        }
    }

    #[test]
    fn test_low_collision_rate() {
        // 10k distinct IDs spread over the 64-bit space. Colors come from 16 hash
        // bits, so some sharing is expected; it must stay a small fraction.
        let mut state = 0x9E37_79B9_7F4A_7C15u64;
        let mut seen = HashSet::new();
        let mut ids = HashSet::new();
        while ids.len() < 10_000 {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            if state != 0 && ids.insert(state) {
                seen.insert(color_for_id(42, state).map(f32::to_bits));
            }
        }
        let shared = ids.len() - seen.len();
        assert!(shared < 1_500, "{shared} IDs share a color");
    }
}
