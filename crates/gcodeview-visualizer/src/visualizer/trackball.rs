//! Virtual trackball rotation
//!
//! Drag gestures arrive as points in normalized viewport coordinates (each axis
//! in [-1, 1], origin at the centre, Y up). Each update composes the rotation
//! between the previous and the current point onto the view orientation, so
//! rotation speed follows drag speed.

use super::camera::ViewState;
use super::math::{axis_angle_to_quaternion, cross_product, project_to_sphere};
use glam::{DQuat, DVec2, DVec3};
use tracing::trace;

/// Rotation that carries the drag point `p1` to `p2` on a virtual trackball of
/// the given radius.
///
/// Both points are lifted onto the trackball surface; the axis is
/// `lift(p2) × lift(p1)` and the angle is `2·asin(|lift(p1) - lift(p2)| / 2r)`.
/// Identical points, a non-positive radius or a non-finite result give the
/// identity.
pub fn compute_drag_rotation(p1: DVec2, p2: DVec2, radius: f64) -> DQuat {
    if p1 == p2 || !(radius > 0.0) {
        return DQuat::IDENTITY;
    }

    let lifted_1 = DVec3::new(p1.x, p1.y, project_to_sphere(radius, p1.x, p1.y));
    let lifted_2 = DVec3::new(p2.x, p2.y, project_to_sphere(radius, p2.x, p2.y));

    let axis = cross_product(lifted_2, lifted_1);

    let t = (lifted_1 - lifted_2).length() / (2.0 * radius);
    if !t.is_finite() {
        return DQuat::IDENTITY;
    }
    let phi = 2.0 * t.clamp(-1.0, 1.0).asin();

    axis_angle_to_quaternion(axis, phi)
}

/// Rotation drag session driving [`ViewState`] orientation.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackballController {
    anchor: Option<DVec2>,
    trackball_scale: f64,
}

impl Default for TrackballController {
    fn default() -> Self {
        Self::new(1.0 / 250.0)
    }
}

impl TrackballController {
    /// `trackball_scale` sets the virtual radius as a fraction of the camera
    /// distance.
    pub fn new(trackball_scale: f64) -> Self {
        Self {
            anchor: None,
            trackball_scale,
        }
    }

    pub fn trackball_scale(&self) -> f64 {
        self.trackball_scale
    }

    /// Virtual trackball radius for the current camera distance
    pub fn radius(&self, state: &ViewState) -> f64 {
        state.distance() * self.trackball_scale
    }

    /// Start a session at `point`; nothing rotates yet
    pub fn begin_drag(&mut self, point: DVec2) {
        self.anchor = Some(point);
    }

    /// Rotate from the session anchor to `point` and move the anchor there.
    ///
    /// Returns the incremental rotation that was applied. Without an active
    /// session the call starts one at `point` and applies nothing.
    pub fn update_drag(&mut self, state: &mut ViewState, point: DVec2) -> DQuat {
        let Some(anchor) = self.anchor.replace(point) else {
            return DQuat::IDENTITY;
        };

        let delta = compute_drag_rotation(anchor, point, self.radius(state));
        if delta != DQuat::IDENTITY {
            state.rotate(delta);
            trace!(
                "Trackball ({:.3}, {:.3}) -> ({:.3}, {:.3})",
                anchor.x,
                anchor.y,
                point.x,
                point.y
            );
        }
        delta
    }

    /// Clear the session; calling it without a session does nothing
    pub fn end_drag(&mut self) {
        self.anchor = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.anchor.is_some()
    }
}
