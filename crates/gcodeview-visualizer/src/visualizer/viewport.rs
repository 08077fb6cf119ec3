//! Viewport rectangle, projection and bounding-box helpers.

use gcodeview_settings::{CameraSettings, ProjectionMode};
use glam::{DMat4, DVec2, DVec3};

/// Half-depth of the orthographic box as a multiple of the camera distance
const ORTHO_DEPTH_FACTOR: f64 = 5.0;

/// Axis-aligned bounding box accumulator used while building toolpaths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: DVec3,
    pub max: DVec3,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new()
    }
}

impl Bounds {
    pub fn new() -> Self {
        Self {
            min: DVec3::splat(f64::MAX),
            max: DVec3::splat(f64::MIN),
        }
    }

    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a DVec3>) -> Self {
        let mut bounds = Self::new();
        for point in points {
            bounds.update(*point);
        }
        bounds
    }

    pub fn update(&mut self, point: DVec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn is_valid(&self) -> bool {
        self.min.is_finite()
            && self.max.is_finite()
            && self.min.x <= self.max.x
            && self.min.y <= self.max.y
            // Z might be single plane (min.z == max.z) which is valid
            && self.min.z <= self.max.z
    }

    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }
}

/// Viewport rectangle in window pixels.
///
/// `x`/`y` locate the viewport's top-left corner in host window pixels, and
/// every pixel passed to or returned from this module is a host window pixel
/// (Y grows downward). The rendering backend's coordinates grow upward from
/// the viewport's bottom edge; [`Viewport::flip_y`] converts between the two.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    pub fn aspect_ratio(&self) -> f64 {
        if self.is_empty() {
            1.0
        } else {
            self.width / self.height
        }
    }

    pub fn with_origin(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Centre of the viewport in host window pixels
    pub fn center(&self) -> DVec2 {
        DVec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Convert a host pixel Y into an upward-growing Y measured from the
    /// viewport's bottom edge. The mapping is its own inverse.
    #[inline]
    pub fn flip_y(&self, pixel_y: f64) -> f64 {
        self.y + self.height - pixel_y
    }

    /// Map a pixel to trackball coordinates: each axis in [-1, 1], origin at
    /// the viewport centre, Y up.
    pub fn to_normalized(&self, pixel: DVec2) -> DVec2 {
        if self.is_empty() {
            return DVec2::ZERO;
        }
        DVec2::new(
            (pixel.x - self.x) / (self.width / 2.0) - 1.0,
            1.0 - (pixel.y - self.y) / (self.height / 2.0),
        )
    }
}

/// Projection matrix for the current camera settings, viewport and distance.
///
/// Perspective uses `far = distance * far_factor`; orthographic uses a
/// viewport-sized box measured in pixels. Both use the GL depth range.
pub fn projection_matrix(camera: &CameraSettings, viewport: &Viewport, distance: f64) -> DMat4 {
    match camera.projection {
        ProjectionMode::Perspective => {
            let far = (distance * camera.far_factor).max(camera.near * 2.0);
            DMat4::perspective_rh_gl(
                camera.fov_y_degrees.to_radians(),
                viewport.aspect_ratio(),
                camera.near,
                far,
            )
        }
        ProjectionMode::Orthographic => {
            let half_w = (viewport.width / 2.0).max(0.5);
            let half_h = (viewport.height / 2.0).max(0.5);
            let depth = (distance * ORTHO_DEPTH_FACTOR).max(1.0);
            DMat4::orthographic_rh_gl(-half_w, half_w, -half_h, half_h, -depth, depth)
        }
    }
}
