//! Column-major 4x4 matrices as produced by the classic fixed-function calls.

use glm::{DMat4, DVec4};

fn columns(c0: [f64; 4], c1: [f64; 4], c2: [f64; 4], c3: [f64; 4]) -> DMat4 {
    let column = |c: [f64; 4]| DVec4::new(c[0], c[1], c[2], c[3]);
    DMat4::new(column(c0), column(c1), column(c2), column(c3))
}

pub fn identity() -> DMat4 {
    columns(
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0])
}

pub fn translation(x: f64, y: f64, z: f64) -> DMat4 {
    columns(
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [x, y, z, 1.0])
}

/// Rotation by `angle` degrees counter-clockwise around the axis `(x, y, z)`.
/// A zero axis yields the identity.
pub fn rotation(angle: f64, x: f64, y: f64, z: f64) -> DMat4 {
    let length = (x * x + y * y + z * z).sqrt();
    if length == 0.0 {
        return identity();
    }
    let (x, y, z) = (x / length, y / length, z / length);
    let (s, c) = angle.to_radians().sin_cos();
    let t = 1.0 - c;

    columns(
        [x * x * t + c, y * x * t + z * s, x * z * t - y * s, 0.0],
        [x * y * t - z * s, y * y * t + c, y * z * t + x * s, 0.0],
        [x * z * t + y * s, y * z * t - x * s, z * z * t + c, 0.0],
        [0.0, 0.0, 0.0, 1.0])
}

/// Perspective projection with a vertical field of view of `fovy` degrees.
pub fn perspective(fovy: f64, aspect: f64, z_near: f64, z_far: f64) -> DMat4 {
    let f = 1.0 / (fovy.to_radians() / 2.0).tan();
    let depth = z_near - z_far;

    columns(
        [f / aspect, 0.0, 0.0, 0.0],
        [0.0, f, 0.0, 0.0],
        [0.0, 0.0, (z_far + z_near) / depth, -1.0],
        [0.0, 0.0, 2.0 * z_far * z_near / depth, 0.0])
}
