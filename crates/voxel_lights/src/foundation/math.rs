//! Math utilities and types
//!
//! Provides the fundamental math types used by the bake pipeline.

pub use nalgebra::Vector3;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// Math utility functions
pub mod utils {
    use super::Vec3;

    /// Pack a 3D vector and a scalar `w` into a shader-ready `[f32; 4]`
    pub fn pack_xyzw(xyz: Vec3, w: f32) -> [f32; 4] {
        [xyz.x, xyz.y, xyz.z, w]
    }

    /// True if every component of the vector is finite
    pub fn is_finite(v: &Vec3) -> bool {
        v.iter().all(|c| c.is_finite())
    }
}
