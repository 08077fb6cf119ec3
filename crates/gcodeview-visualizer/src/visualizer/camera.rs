//! Camera state and the view transform built from it.
//!
//! [`ViewState`] is the single owned record of where the camera is. It is only
//! mutated through [`ViewTransform`] (distance, pan, zoom) and the trackball
//! controller (orientation), and read once per frame by the renderer via
//! [`ViewTransform::compose_matrix`].

use super::math::{quaternion_multiply, quaternion_to_matrix, renormalize};
use super::viewport::Bounds;
use gcodeview_core::{Result, ViewError};
use gcodeview_settings::BuildVolume;
use glam::{DMat4, DQuat, DVec2, DVec3};
use tracing::{debug, trace};

/// Camera distance, pan/zoom and accumulated trackball orientation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    distance: f64,
    pan: DVec3,
    scale: f64,
    orientation: DQuat,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(200.0)
    }
}

impl ViewState {
    pub fn new(distance: f64) -> Self {
        Self {
            distance,
            pan: DVec3::ZERO,
            scale: 1.0,
            orientation: DQuat::IDENTITY,
        }
    }

    /// Camera-to-origin distance along the view axis
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Pan offset in view-plane units
    pub fn pan(&self) -> DVec3 {
        self.pan
    }

    /// Accumulated zoom (uniform in X and Y)
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Accumulated trackball rotation relative to the rest pose
    pub fn orientation(&self) -> DQuat {
        self.orientation
    }

    /// Compose an incremental rotation onto the orientation (`old · delta`)
    pub(crate) fn rotate(&mut self, delta: DQuat) {
        self.orientation = renormalize(quaternion_multiply(self.orientation, delta));
    }
}

/// Pan, zoom, reset and fit operations plus per-frame matrix composition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    build_volume: BuildVolume,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::new(BuildVolume::default())
    }
}

impl ViewTransform {
    pub fn new(build_volume: BuildVolume) -> Self {
        Self { build_volume }
    }

    pub fn build_volume(&self) -> &BuildVolume {
        &self.build_volume
    }

    /// Scale the view by `factor`.
    ///
    /// With a pivot (a point in the pan/zoom frame, see [`Self::base_matrix`])
    /// the view is composed with `translate(pivot) · scale(factor) ·
    /// translate(-pivot)`, which keeps the pivot's projection fixed.
    pub fn zoom(&self, state: &mut ViewState, factor: f64, pivot: Option<DVec3>) -> Result<()> {
        if !(factor > 0.0) || !factor.is_finite() {
            return Err(ViewError::invalid_argument(
                "factor",
                format!("zoom factor must be a finite value > 0, got {}", factor),
            ));
        }

        if let Some(pivot) = pivot {
            let shift = pivot.truncate() * state.scale * (1.0 - factor);
            state.pan.x += shift.x;
            state.pan.y += shift.y;
        }
        state.scale *= factor;

        trace!("Zoom x{:.3} -> scale {:.4}", factor, state.scale);
        Ok(())
    }

    /// Pan by a screen-space delta in pixels.
    ///
    /// Screen Y grows downward while view Y grows upward, so the vertical
    /// component is inverted.
    pub fn pan(&self, state: &mut ViewState, delta_screen: DVec2) {
        self.translate(state, DVec2::new(delta_screen.x, -delta_screen.y));
    }

    /// Pan so that the pan/zoom-frame point `from` moves onto `to`.
    ///
    /// Used with points unprojected from two cursor positions; only X and Y
    /// are taken into account.
    pub fn pan_between(&self, state: &mut ViewState, from: DVec3, to: DVec3) {
        self.translate(state, (to - from).truncate());
    }

    fn translate(&self, state: &mut ViewState, delta: DVec2) {
        let shift = delta * state.scale;
        state.pan.x += shift.x;
        state.pan.y += shift.y;
        trace!("Pan -> ({:.3}, {:.3})", state.pan.x, state.pan.y);
    }

    /// Restore distance, clear pan and zoom; the orientation is kept
    pub fn soft_reset(&self, state: &mut ViewState, default_distance: f64) {
        state.distance = default_distance;
        state.pan = DVec3::ZERO;
        state.scale = 1.0;
        debug!("Soft view reset (distance {:.1})", default_distance);
    }

    /// Soft reset that also returns the orientation to the rest pose
    pub fn hard_reset(&self, state: &mut ViewState, default_distance: f64) {
        self.soft_reset(state, default_distance);
        state.orientation = DQuat::IDENTITY;
        debug!("Hard view reset");
    }

    /// Frame a model's bounding box.
    ///
    /// Soft-resets the view, optionally rescales so the larger XY extent
    /// fills the camera distance (orthographic framing), then shifts the
    /// model's centre onto the platform centre. Invalid bounds are a no-op.
    pub fn fit(
        &self,
        state: &mut ViewState,
        bounds: &Bounds,
        default_distance: f64,
        orthographic: bool,
    ) {
        if !bounds.is_valid() {
            debug!("Fit skipped: model has no extent");
            return;
        }

        self.soft_reset(state, default_distance);

        if orthographic {
            let size = bounds.size();
            let extent = size.x.max(size.y);
            if extent > 0.0 {
                state.scale *= state.distance / extent;
            }
        }

        let (platform_x, platform_y) = self.build_volume.platform_center();
        let center = bounds.center();
        self.translate(
            state,
            DVec2::new(platform_x - center.x, platform_y - center.y),
        );
        debug!(
            "Fit to model centred at ({:.2}, {:.2}), scale {:.4}",
            center.x, center.y, state.scale
        );
    }

    /// The pan/zoom part of the view: `translate(pan) · scale(s, s, 1)`.
    ///
    /// Cursor unprojection for zoom pivots and plane panning goes through
    /// this matrix, not the full model-view.
    pub fn base_matrix(&self, state: &ViewState) -> DMat4 {
        DMat4::from_translation(state.pan)
            * DMat4::from_scale(DVec3::new(state.scale, state.scale, 1.0))
    }

    /// Model-view matrix for the current frame.
    ///
    /// Pan/zoom, then move back by the camera distance, rotate by the
    /// trackball orientation and centre the build platform on the origin.
    /// Recomputed on every call.
    pub fn compose_matrix(&self, state: &ViewState) -> DMat4 {
        let (platform_x, platform_y) = self.build_volume.platform_center();

        self.base_matrix(state)
            * DMat4::from_translation(DVec3::new(0.0, 0.0, -state.distance))
            * quaternion_to_matrix(state.orientation)
            * DMat4::from_translation(DVec3::new(-platform_x, -platform_y, 0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_zoom_rejects_non_positive_factor() {
        let transform = ViewTransform::default();
        let mut state = ViewState::default();

        for factor in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = transform.zoom(&mut state, factor, None).unwrap_err();
            assert!(err.is_invalid_argument());
        }
        assert_eq!(state, ViewState::default());
    }

    #[test]
    fn test_zoom_without_pivot_scales_about_origin() {
        let transform = ViewTransform::default();
        let mut state = ViewState::default();

        transform.zoom(&mut state, 2.0, None).unwrap();
        transform.zoom(&mut state, 1.5, None).unwrap();
        assert!((state.scale() - 3.0).abs() < EPS);
        assert_eq!(state.pan(), DVec3::ZERO);
    }

    #[test]
    fn test_zoom_keeps_pivot_fixed_in_base_frame() {
        let transform = ViewTransform::default();
        let mut state = ViewState::default();
        transform.pan(&mut state, DVec2::new(30.0, -12.0));
        transform.zoom(&mut state, 1.7, None).unwrap();

        let pivot = DVec3::new(14.0, -6.0, 3.0);
        let before = transform.base_matrix(&state).transform_point3(pivot);
        transform.zoom(&mut state, 0.4, Some(pivot)).unwrap();
        let after = transform.base_matrix(&state).transform_point3(pivot);

        assert!(before.abs_diff_eq(after, EPS));
    }

    #[test]
    fn test_pan_inverts_screen_y() {
        let transform = ViewTransform::default();
        let mut state = ViewState::default();

        transform.pan(&mut state, DVec2::new(10.0, 5.0));
        assert_eq!(state.pan(), DVec3::new(10.0, -5.0, 0.0));
    }

    #[test]
    fn test_pan_is_scaled_by_zoom() {
        let transform = ViewTransform::default();
        let mut state = ViewState::default();
        transform.zoom(&mut state, 2.0, None).unwrap();

        transform.pan_between(
            &mut state,
            DVec3::new(1.0, 1.0, 7.0),
            DVec3::new(4.0, -1.0, -3.0),
        );
        assert_eq!(state.pan(), DVec3::new(6.0, -4.0, 0.0));
    }

    #[test]
    fn test_soft_and_hard_reset() {
        let transform = ViewTransform::default();
        let mut state = ViewState::new(50.0);
        let rotation = DQuat::from_rotation_y(0.5);
        state.rotate(rotation);
        transform.pan(&mut state, DVec2::new(3.0, 4.0));
        transform.zoom(&mut state, 3.0, None).unwrap();

        transform.soft_reset(&mut state, 180.0);
        assert_eq!(state.distance(), 180.0);
        assert_eq!(state.pan(), DVec3::ZERO);
        assert_eq!(state.scale(), 1.0);
        assert!(state.orientation().abs_diff_eq(rotation, EPS));

        transform.hard_reset(&mut state, 180.0);
        assert_eq!(state.orientation(), DQuat::IDENTITY);
    }

    #[test]
    fn test_compose_matrix_centres_platform() {
        let transform = ViewTransform::new(BuildVolume {
            width: 200.0,
            depth: 100.0,
            ..BuildVolume::default()
        });
        let state = ViewState::new(150.0);

        let m = transform.compose_matrix(&state);
        let centre = m.transform_point3(DVec3::new(100.0, 50.0, 0.0));
        assert!(centre.abs_diff_eq(DVec3::new(0.0, 0.0, -150.0), EPS));
    }

    #[test]
    fn test_compose_matrix_applies_orientation() {
        let transform = ViewTransform::default();
        let mut state = ViewState::new(100.0);
        state.rotate(DQuat::from_rotation_z(std::f64::consts::FRAC_PI_2));

        let m = transform.compose_matrix(&state);
        // One unit along +X from the platform centre
        let p = m.transform_point3(DVec3::new(101.0, 100.0, 0.0));
        // The trackball matrix rotates opposite to the quaternion
        assert!(p.abs_diff_eq(DVec3::new(0.0, -1.0, -100.0), EPS));
    }

    #[test]
    fn test_fit_centres_model_on_platform() {
        let transform = ViewTransform::default();
        let mut state = ViewState::new(200.0);

        let bounds = Bounds::from_points(&[
            DVec3::new(10.0, 20.0, 0.0),
            DVec3::new(50.0, 40.0, 5.0),
        ]);
        transform.fit(&mut state, &bounds, 200.0, false);

        let m = transform.compose_matrix(&state);
        let centre = m.transform_point3(DVec3::new(30.0, 30.0, 0.0));
        assert!(centre.abs_diff_eq(DVec3::new(0.0, 0.0, -200.0), EPS));
        assert_eq!(state.scale(), 1.0);
    }

    #[test]
    fn test_fit_orthographic_rescales() {
        let transform = ViewTransform::default();
        let mut state = ViewState::new(200.0);

        let bounds = Bounds::from_points(&[DVec3::ZERO, DVec3::new(50.0, 25.0, 1.0)]);
        transform.fit(&mut state, &bounds, 200.0, true);
        assert!((state.scale() - 4.0).abs() < EPS);
    }

    #[test]
    fn test_fit_with_invalid_bounds_is_noop() {
        let transform = ViewTransform::default();
        let mut state = ViewState::new(80.0);
        transform.pan(&mut state, DVec2::new(1.0, 1.0));
        let before = state;

        transform.fit(&mut state, &Bounds::new(), 200.0, true);
        assert_eq!(state, before);
    }
}
