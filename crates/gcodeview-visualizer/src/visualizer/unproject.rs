//! Screen to model-space mapping
//!
//! Pixel coordinates grow downward; the GL-style window coordinates these
//! functions work in grow upward, so Y is flipped against the viewport height
//! before inverting the projection.

use super::viewport::Viewport;
use glam::{DMat4, DVec2, DVec3, DVec4};

/// Combined matrices with a smaller determinant are treated as singular
const SINGULAR_EPSILON: f64 = 1e-300;

/// Homogeneous w below this cannot be divided out
const W_EPSILON: f64 = 1e-12;

/// Ray through a pixel, from the near plane towards the far plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: DVec3,
    pub direction: DVec3,
}

impl Ray {
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }
}

/// Map a pixel and a window depth (0 = near, 1 = far) back into the space
/// that `model_view` transforms from.
///
/// Returns `None` for an empty viewport, a singular `projection · model_view`
/// or a point at infinity.
pub fn unproject(
    pixel: DVec2,
    depth: f64,
    projection: &DMat4,
    model_view: &DMat4,
    viewport: &Viewport,
) -> Option<DVec3> {
    if viewport.is_empty() {
        return None;
    }

    let combined = *projection * *model_view;
    if combined.determinant().abs() < SINGULAR_EPSILON {
        return None;
    }

    let window_y = viewport.flip_y(pixel.y);
    let ndc = DVec4::new(
        (pixel.x - viewport.x) / viewport.width * 2.0 - 1.0,
        window_y / viewport.height * 2.0 - 1.0,
        depth * 2.0 - 1.0,
        1.0,
    );

    let point = combined.inverse() * ndc;
    if point.w.abs() < W_EPSILON || !point.is_finite() {
        return None;
    }
    Some(point.truncate() / point.w)
}

/// Inverse of [`unproject`]: model-space point to (pixel x, pixel y, depth)
pub fn project(
    point: DVec3,
    projection: &DMat4,
    model_view: &DMat4,
    viewport: &Viewport,
) -> Option<DVec3> {
    let clip = *projection * *model_view * point.extend(1.0);
    if clip.w.abs() < W_EPSILON {
        return None;
    }
    let ndc = clip.truncate() / clip.w;

    let window_x = viewport.x + (ndc.x + 1.0) / 2.0 * viewport.width;
    let window_y = (ndc.y + 1.0) / 2.0 * viewport.height;
    Some(DVec3::new(
        window_x,
        viewport.flip_y(window_y),
        (ndc.z + 1.0) / 2.0,
    ))
}

/// Ray from the near-plane point to the far-plane point under `pixel`
pub fn unproject_ray(
    pixel: DVec2,
    projection: &DMat4,
    model_view: &DMat4,
    viewport: &Viewport,
) -> Option<Ray> {
    let near = unproject(pixel, 0.0, projection, model_view, viewport)?;
    let far = unproject(pixel, 1.0, projection, model_view, viewport)?;
    Some(Ray {
        origin: near,
        direction: far - near,
    })
}

/// Point under `pixel` on the horizontal plane `z = plane_z`.
///
/// `None` when the view ray runs parallel to the plane.
pub fn unproject_to_plane(
    pixel: DVec2,
    plane_z: f64,
    projection: &DMat4,
    model_view: &DMat4,
    viewport: &Viewport,
) -> Option<DVec3> {
    let ray = unproject_ray(pixel, projection, model_view, viewport)?;
    if ray.direction.z.abs() < W_EPSILON {
        return None;
    }
    let t = (plane_z - ray.origin.z) / ray.direction.z;
    Some(ray.at(t))
}
