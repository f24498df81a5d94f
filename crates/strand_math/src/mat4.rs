//! 4x4 matrix utilities for the projection-view-model transform
//!
//! Matrices are column-major (`m[column][row]`), the layout WGSL expects for
//! `mat4x4<f32>` uniforms, so they can be copied into GPU buffers unchanged.

use crate::{Vec3, Vec4};

/// 4x4 matrix type (column-major)
pub type Mat4 = [[f32; 4]; 4];

/// Identity matrix
pub const IDENTITY: Mat4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// Create a rotation matrix in the plane spanned by two axes.
///
/// # Arguments
/// * `angle` - Rotation angle in radians
/// * `p1`, `p2` - Indices of the axes forming the rotation plane (0=X, 1=Y, 2=Z)
///
/// Rotates `p1` towards `p2`.
///
/// # Example
/// ```
/// use strand_math::mat4::plane_rotation;
/// // Rotation about the Z axis (XY plane)
/// let roll = plane_rotation(0.5, 0, 1);
/// ```
pub fn plane_rotation(angle: f32, p1: usize, p2: usize) -> Mat4 {
    let cs = angle.cos();
    let sn = angle.sin();

    let mut m = IDENTITY;

    m[p1][p1] = cs;
    m[p2][p2] = cs;
    m[p1][p2] = sn;
    m[p2][p1] = -sn;

    m
}

/// Rotation about the X, then Y, then Z axis. Angles are in degrees.
pub fn rotation_degrees(x: f32, y: f32, z: f32) -> Mat4 {
    let rx = plane_rotation(x.to_radians(), 1, 2);
    let ry = plane_rotation(y.to_radians(), 2, 0);
    let rz = plane_rotation(z.to_radians(), 0, 1);
    mul(rz, mul(ry, rx))
}

/// Translation matrix
pub fn translation(offset: Vec3) -> Mat4 {
    let mut m = IDENTITY;
    m[3][0] = offset.x;
    m[3][1] = offset.y;
    m[3][2] = offset.z;
    m
}

/// Right-handed perspective projection (OpenGL depth range)
///
/// `fov_y` is the vertical field of view in radians.
pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    let f = 1.0 / (fov_y / 2.0).tan();
    let nf = 1.0 / (near - far);

    [
        [f / aspect, 0.0, 0.0, 0.0],
        [0.0, f, 0.0, 0.0],
        [0.0, 0.0, (far + near) * nf, -1.0],
        [0.0, 0.0, 2.0 * far * near * nf, 0.0],
    ]
}

/// Multiply two 4x4 matrices: result = a * b
///
/// In column-major convention, this applies b first, then a.
#[allow(clippy::needless_range_loop)]
pub fn mul(a: Mat4, b: Mat4) -> Mat4 {
    let mut result = [[0.0f32; 4]; 4];

    for i in 0..4 {
        for j in 0..4 {
            for k in 0..4 {
                result[i][j] += a[k][j] * b[i][k];
            }
        }
    }

    result
}

/// Transform a Vec4 by a 4x4 matrix (column-major)
///
/// result = M * v
pub fn transform(m: Mat4, v: Vec4) -> Vec4 {
    Vec4::new(
        m[0][0] * v.x + m[1][0] * v.y + m[2][0] * v.z + m[3][0] * v.w,
        m[0][1] * v.x + m[1][1] * v.y + m[2][1] * v.z + m[3][1] * v.w,
        m[0][2] * v.x + m[1][2] * v.y + m[2][2] * v.z + m[3][2] * v.w,
        m[0][3] * v.x + m[1][3] * v.y + m[2][3] * v.z + m[3][3] * v.w,
    )
}

/// Transform a point (w = 1) into homogeneous coordinates
pub fn transform_point(m: Mat4, p: Vec3) -> Vec4 {
    transform(m, Vec4::from_point(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.0001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn vec_approx_eq(a: Vec4, b: Vec4) -> bool {
        approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z) && approx_eq(a.w, b.w)
    }

    fn mat_approx_eq(a: Mat4, b: Mat4) -> bool {
        for i in 0..4 {
            for j in 0..4 {
                if !approx_eq(a[i][j], b[i][j]) {
                    return false;
                }
            }
        }
        true
    }

    #[test]
    fn test_identity() {
        let v = Vec4::new(1.0, 2.0, 3.0, 4.0);
        let result = transform(IDENTITY, v);
        assert!(vec_approx_eq(v, result));
    }

    #[test]
    fn test_plane_rotation_xy() {
        use std::f32::consts::FRAC_PI_2;

        let m = plane_rotation(FRAC_PI_2, 0, 1);

        let result = transform(m, Vec4::X);
        assert!(vec_approx_eq(result, Vec4::Y), "X should become Y, got {:?}", result);

        let result = transform(m, Vec4::Z);
        assert!(vec_approx_eq(result, Vec4::Z), "Z should be unchanged, got {:?}", result);
    }

    #[test]
    fn test_rotation_degrees_zero_is_identity() {
        assert!(mat_approx_eq(rotation_degrees(0.0, 0.0, 0.0), IDENTITY));
    }

    #[test]
    fn test_rotation_degrees_about_y() {
        // 90° about Y takes Z to X
        let m = rotation_degrees(0.0, 90.0, 0.0);
        let result = transform(m, Vec4::Z);
        assert!(vec_approx_eq(result, Vec4::X), "Z should become X, got {:?}", result);
    }

    #[test]
    fn test_translation() {
        let m = translation(Vec3::new(1.0, -2.0, 3.0));
        let p = transform_point(m, Vec3::new(1.0, 1.0, 1.0));
        assert!(vec_approx_eq(p, Vec4::new(2.0, -1.0, 4.0, 1.0)));

        // Directions (w = 0) ignore translation
        let d = transform(m, Vec4::X);
        assert!(vec_approx_eq(d, Vec4::X));
    }

    #[test]
    fn test_perspective_maps_near_and_far() {
        let proj = perspective(std::f32::consts::FRAC_PI_2, 1.0, 1.0, 10.0);

        let near = transform_point(proj, Vec3::new(0.0, 0.0, -1.0)).perspective_divide();
        assert!(approx_eq(near.z, -1.0), "near plane depth {:?}", near);

        let far = transform_point(proj, Vec3::new(0.0, 0.0, -10.0)).perspective_divide();
        assert!(approx_eq(far.z, 1.0), "far plane depth {:?}", far);

        // 90° fov: a point at 45° sits on the frustum edge
        let edge = transform_point(proj, Vec3::new(0.0, 5.0, -5.0)).perspective_divide();
        assert!(approx_eq(edge.y, 1.0));
    }

    #[test]
    fn test_mul_identity() {
        let a = plane_rotation(0.5, 0, 1);
        assert!(mat_approx_eq(a, mul(IDENTITY, a)));
        assert!(mat_approx_eq(a, mul(a, IDENTITY)));
    }

    #[test]
    fn test_mul_applies_right_first() {
        // Translate then rotate 90° about Z: (1,0,0) -> (2,0,0) -> (0,2,0)
        let t = translation(Vec3::new(1.0, 0.0, 0.0));
        let r = plane_rotation(std::f32::consts::FRAC_PI_2, 0, 1);
        let p = transform_point(mul(r, t), Vec3::new(1.0, 0.0, 0.0));
        assert!(vec_approx_eq(p, Vec4::new(0.0, 2.0, 0.0, 1.0)), "got {:?}", p);
    }
}
