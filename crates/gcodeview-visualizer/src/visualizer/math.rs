//! Quaternion and vector helpers for the trackball camera
//!
//! Quaternions are `glam::DQuat` in (x, y, z, w) order. Every function here is
//! total: degenerate inputs fall back to the identity rotation instead of
//! producing NaN.

use glam::{DMat4, DQuat, DVec3};
use std::f64::consts::{FRAC_1_SQRT_2, SQRT_2};

/// Allowed deviation of an orientation's norm from 1 before renormalizing
pub const NORM_TOLERANCE: f64 = 1e-6;

/// Axes shorter than this cannot be normalized
const AXIS_EPSILON: f64 = 1e-12;

/// Cross product `v1 × v2`
#[inline]
pub fn cross_product(v1: DVec3, v2: DVec3) -> DVec3 {
    v1.cross(v2)
}

/// Height of the virtual trackball surface above the screen point `(x, y)`.
///
/// Inside `radius·√2/2` the point lies on a sphere; outside it lies on a
/// hyperbolic sheet that meets the sphere smoothly, so drags far from the
/// centre never hit the sphere's vertical edge.
pub fn project_to_sphere(radius: f64, x: f64, y: f64) -> f64 {
    if !(radius > 0.0) {
        return 0.0;
    }

    let d = x.hypot(y);
    if d < radius * FRAC_1_SQRT_2 {
        (radius * radius - d * d).sqrt()
    } else {
        let t = radius / SQRT_2;
        t * t / d
    }
}

/// Rotation of `angle` radians about `axis`.
///
/// The axis is normalized first; a (near) zero-length or non-finite axis
/// yields the identity.
pub fn axis_angle_to_quaternion(axis: DVec3, angle: f64) -> DQuat {
    let len = axis.length();
    if !(len > AXIS_EPSILON) || !len.is_finite() || !angle.is_finite() {
        return DQuat::IDENTITY;
    }

    let (sin, cos) = (angle / 2.0).sin_cos();
    let v = axis / len * sin;
    DQuat::from_xyzw(v.x, v.y, v.z, cos)
}

/// Hamilton product `a · b`.
///
/// Accumulated orientation is composed as `quaternion_multiply(old, delta)`.
pub fn quaternion_multiply(a: DQuat, b: DQuat) -> DQuat {
    DQuat::from_xyzw(
        a.w * b.x + a.x * b.w + a.y * b.z - a.z * b.y,
        a.w * b.y + a.y * b.w + a.z * b.x - a.x * b.z,
        a.w * b.z + a.z * b.w + a.x * b.y - a.y * b.x,
        a.w * b.w - a.x * b.x - a.y * b.y - a.z * b.z,
    )
}

/// Column-major trackball rotation matrix for `q`.
///
/// This is the transpose of `DMat4::from_quat(q)`: the matrix rotates the
/// scene opposite to `q`, which is what lets `old · delta` composition apply
/// each new drag in screen space. Translation and scale are left to the
/// caller.
pub fn quaternion_to_matrix(q: DQuat) -> DMat4 {
    let (x, y, z, w) = (q.x, q.y, q.z, q.w);

    DMat4::from_cols_array(&[
        1.0 - 2.0 * (y * y + z * z),
        2.0 * (x * y - z * w),
        2.0 * (z * x + y * w),
        0.0,
        2.0 * (x * y + z * w),
        1.0 - 2.0 * (z * z + x * x),
        2.0 * (y * z - x * w),
        0.0,
        2.0 * (z * x - y * w),
        2.0 * (y * z + x * w),
        1.0 - 2.0 * (y * y + x * x),
        0.0,
        0.0,
        0.0,
        0.0,
        1.0,
    ])
}

/// Bring `q` back to unit length if it drifted more than [`NORM_TOLERANCE`].
///
/// A collapsed (zero or non-finite) quaternion is replaced by the identity.
pub fn renormalize(q: DQuat) -> DQuat {
    let len = q.length();
    if !len.is_finite() || len <= AXIS_EPSILON {
        return DQuat::IDENTITY;
    }
    if (len - 1.0).abs() > NORM_TOLERANCE {
        q / len
    } else {
        q
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    const EPS: f64 = 1e-12;

    #[test]
    fn test_cross_product_basis() {
        assert_eq!(cross_product(DVec3::X, DVec3::Y), DVec3::Z);
        assert_eq!(cross_product(DVec3::Y, DVec3::X), -DVec3::Z);
        assert_eq!(cross_product(DVec3::X, DVec3::X), DVec3::ZERO);
    }

    #[test]
    fn test_project_to_sphere_inside_and_outside() {
        // Centre of the ball sits at full height
        assert!((project_to_sphere(1.0, 0.0, 0.0) - 1.0).abs() < EPS);

        // Inside the sphere region
        let z = project_to_sphere(1.0, 0.5, 0.0);
        assert!((z - 0.75f64.sqrt()).abs() < EPS);

        // On the hyperbolic sheet: t^2 / d with t = r / sqrt(2)
        let z = project_to_sphere(1.0, 2.0, 0.0);
        assert!((z - 0.25).abs() < EPS);
    }

    #[test]
    fn test_project_to_sphere_is_continuous_at_boundary() {
        let r = 0.8;
        let boundary = r * FRAC_1_SQRT_2;
        let inside = project_to_sphere(r, boundary - 1e-9, 0.0);
        let outside = project_to_sphere(r, boundary + 1e-9, 0.0);
        assert!((inside - outside).abs() < 1e-6);
    }

    #[test]
    fn test_project_to_sphere_degenerate_radius() {
        assert_eq!(project_to_sphere(0.0, 0.0, 0.0), 0.0);
        assert_eq!(project_to_sphere(-1.0, 0.3, 0.3), 0.0);
    }

    #[test]
    fn test_axis_angle_normalizes_axis() {
        let q = axis_angle_to_quaternion(DVec3::new(0.0, 0.0, 5.0), FRAC_PI_2);
        let expected = DQuat::from_rotation_z(FRAC_PI_2);
        assert!(q.abs_diff_eq(expected, EPS));
        assert!((q.length() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_axis_angle_zero_axis_is_identity() {
        assert_eq!(axis_angle_to_quaternion(DVec3::ZERO, PI), DQuat::IDENTITY);
        assert_eq!(
            axis_angle_to_quaternion(DVec3::new(1e-15, 0.0, 0.0), PI),
            DQuat::IDENTITY
        );
        assert_eq!(
            axis_angle_to_quaternion(DVec3::new(f64::NAN, 0.0, 1.0), PI),
            DQuat::IDENTITY
        );
    }

    #[test]
    fn test_multiply_matches_hamilton_product() {
        let a = DQuat::from_rotation_x(0.3);
        let b = DQuat::from_rotation_y(-1.1);
        assert!(quaternion_multiply(a, b).abs_diff_eq(a * b, EPS));
        assert!(quaternion_multiply(b, a).abs_diff_eq(b * a, EPS));
        assert_eq!(quaternion_multiply(DQuat::IDENTITY, a), a);
    }

    #[test]
    fn test_matrix_is_transpose_of_active_rotation() {
        let q = DQuat::from_axis_angle(DVec3::new(1.0, 2.0, 3.0).normalize(), 0.7);
        let m = quaternion_to_matrix(q);
        assert!(m.abs_diff_eq(DMat4::from_quat(q).transpose(), EPS));
        assert!(m.abs_diff_eq(DMat4::from_quat(q.conjugate()), EPS));
        assert_eq!(quaternion_to_matrix(DQuat::IDENTITY), DMat4::IDENTITY);
    }

    #[test]
    fn test_renormalize() {
        let drifted = DQuat::from_xyzw(0.0, 0.0, 0.0, 1.01);
        let fixed = renormalize(drifted);
        assert!((fixed.length() - 1.0).abs() < EPS);

        let unit = DQuat::from_rotation_z(0.4);
        assert_eq!(renormalize(unit), unit);

        let collapsed = DQuat::from_xyzw(0.0, 0.0, 0.0, 0.0);
        assert_eq!(renormalize(collapsed), DQuat::IDENTITY);
    }
}
