//! Math utilities and types
//!
//! Provides the 2D math types used by transforms, colliders and bodies.
//! Matrices are 3x3 homogeneous affine transforms in column-vector form,
//! so `parent * child` applies `child` first.
//!
//! Screen convention: +x is right, +y is down. Rotations are expressed in
//! degrees at the API boundary and converted to radians internally.

pub use nalgebra::{Matrix3, Vector2, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// RGBA color / generic 4-component vector
pub type Vec4 = Vector4<f32>;

/// 3x3 homogeneous 2D transform matrix
pub type Mat3 = Matrix3<f32>;

/// 2D point type
pub type Point2 = nalgebra::Point2<f32>;

/// Determinant magnitude below which an affine matrix is treated as singular
pub const SINGULAR_EPSILON: f32 = 1.0e-4;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Named direction vectors in screen space
pub mod directions {
    use super::Vec2;

    /// Screen right (+x)
    pub fn right() -> Vec2 {
        Vec2::new(1.0, 0.0)
    }

    /// Screen up (-y, since +y points down)
    pub fn up() -> Vec2 {
        Vec2::new(0.0, -1.0)
    }
}

/// Math utility functions
pub mod utils {
    use super::*;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }

    /// Rotate a vector counter-clockwise (in math orientation) by `degrees`
    pub fn rotate(v: &Vec2, degrees: f32) -> Vec2 {
        let (sin, cos) = deg_to_rad(degrees).sin_cos();
        Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
    }

    /// Normalize, returning zero for a zero-length vector
    pub fn normalize_or_zero(v: &Vec2) -> Vec2 {
        let magnitude = v.magnitude();
        if magnitude > 0.0 {
            *v / magnitude
        } else {
            Vec2::zeros()
        }
    }

    /// Unsigned angle between two vectors, in degrees within [0, 180]
    pub fn angle_between(from: &Vec2, to: &Vec2) -> f32 {
        let dot = normalize_or_zero(from).dot(&normalize_or_zero(to));
        rad_to_deg(dot.clamp(-1.0, 1.0).acos())
    }

    /// 2D cross product (z component of the 3D cross product)
    pub fn cross(a: &Vec2, b: &Vec2) -> f32 {
        a.x * b.y - a.y * b.x
    }
}

/// Build a local transform matrix: Translate * Rotate * Scale
pub fn trs(position: &Vec2, rotation_degrees: f32, scale: &Vec2) -> Mat3 {
    Mat3::new_translation(position)
        * Mat3::new_rotation(utils::deg_to_rad(rotation_degrees))
        * Mat3::new_nonuniform_scaling(scale)
}

/// Invert an affine matrix
///
/// Returns identity when the linear part is singular (zero scale on an axis).
pub fn affine_inverse(matrix: &Mat3) -> Mat3 {
    let det = matrix.m11 * matrix.m22 - matrix.m12 * matrix.m21;
    if det.abs() < SINGULAR_EPSILON {
        return Mat3::identity();
    }
    matrix.try_inverse().unwrap_or_else(Mat3::identity)
}

/// Apply a matrix to a point (translation included)
pub fn transform_point(matrix: &Mat3, point: &Vec2) -> Vec2 {
    matrix.transform_point(&Point2::from(*point)).coords
}

/// Apply a matrix to a direction (translation ignored)
pub fn transform_vector(matrix: &Mat3, vector: &Vec2) -> Vec2 {
    matrix.transform_vector(vector)
}
