//! Math utilities and types
//!
//! Provides the small set of vector types the material model needs.

pub use nalgebra::{Vector2, Vector4};

/// 2D vector type, used for UV offsets and scales
pub type Vec2 = Vector2<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// Linear RGBA color
pub type LinearColor = Vec4;

/// Threshold below which a squared color component counts as black
const ALMOST_BLACK_DELTA: f32 = 0.000_01;

/// Returns true if the RGB part of a linear color is almost black
pub fn is_almost_black(color: &LinearColor) -> bool {
    color.x * color.x < ALMOST_BLACK_DELTA
        && color.y * color.y < ALMOST_BLACK_DELTA
        && color.z * color.z < ALMOST_BLACK_DELTA
}
