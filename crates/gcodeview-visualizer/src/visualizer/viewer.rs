//! Viewer facade
//!
//! Owns the camera state, the trackball, the view transform, both cursors and
//! the viewport, and exposes the narrow operation set the host and the
//! renderer use. Input events reach it through
//! [`InputDispatcher`](super::input::InputDispatcher) via [`ViewTarget`].

use super::camera::{ViewState, ViewTransform};
use super::input::ViewTarget;
use super::progress::{draw_plan, DrawPlan, LayerCursor, ProgressHandle, ProgressTracker};
use super::toolpath::ToolpathModel;
use super::trackball::TrackballController;
use super::unproject::{unproject, unproject_to_plane};
use super::viewport::{projection_matrix, Viewport};
use gcodeview_core::Result;
use gcodeview_settings::{InputSettings, ViewerSettings};
use glam::{DMat4, DVec2, DVec3};
use std::sync::Arc;
use tracing::{debug, info};

/// Interactive camera and progress-playback state for one toolpath view.
///
/// Not `Clone`: the progress slot is shared with producer handles, so a copy
/// would alias the model and cutoff of the original.
#[derive(Debug)]
pub struct Viewer {
    settings: ViewerSettings,
    state: ViewState,
    transform: ViewTransform,
    trackball: TrackballController,
    layers: LayerCursor,
    progress: ProgressTracker,
    viewport: Viewport,
    /// Set when the view changed and the frame must be repainted
    dirty: bool,
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new(ViewerSettings::default())
    }
}

impl Viewer {
    pub fn new(settings: ViewerSettings) -> Self {
        Self {
            state: ViewState::new(settings.camera_distance()),
            transform: ViewTransform::new(settings.build_volume),
            trackball: TrackballController::new(settings.camera.trackball_scale),
            layers: LayerCursor::default(),
            progress: ProgressTracker::new(),
            viewport: Viewport::default(),
            dirty: true,
            settings,
        }
    }

    pub fn settings(&self) -> &ViewerSettings {
        &self.settings
    }

    pub fn view_state(&self) -> &ViewState {
        &self.state
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.dirty = true;
    }

    /// Returns true if the view needs repainting
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag after a repaint
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Consume pending repaint requests from both input and progress updates
    pub fn take_redraw_request(&mut self) -> bool {
        let progress = self.progress.take_redraw_request();
        std::mem::replace(&mut self.dirty, false) || progress
    }

    // ---- Model and progress ----

    /// Show a new model: rewinds progress and highlights its top layer
    pub fn load_model(&mut self, model: impl Into<Arc<ToolpathModel>>) {
        let model = model.into();
        info!(
            "Loaded toolpath: {} layers, {} vertices",
            model.layer_count(),
            model.vertex_count()
        );
        self.layers.reset(model.layer_count());
        self.progress.set_model(Some(model));
        self.dirty = true;
    }

    pub fn clear_model(&mut self) {
        self.layers.clear();
        self.progress.set_model(None);
        self.dirty = true;
        debug!("Toolpath cleared");
    }

    pub fn model(&self) -> Option<Arc<ToolpathModel>> {
        self.progress.model()
    }

    pub fn has_model(&self) -> bool {
        self.progress.has_model()
    }

    pub fn begin_job(&mut self) {
        self.progress.begin_job();
    }

    /// Handle for a progress producer on another thread or task
    pub fn progress_handle(&self) -> ProgressHandle {
        self.progress.handle()
    }

    pub fn set_from_progress(&self, line: usize) -> bool {
        self.progress.set_from_progress(line)
    }

    pub fn rendered_vertex_cutoff(&self) -> usize {
        self.progress.rendered_vertex_cutoff()
    }

    pub fn layer_cursor(&self) -> &LayerCursor {
        &self.layers
    }

    pub fn visible_layer_count(&self) -> usize {
        self.layers.visible_layer_count()
    }

    pub fn set_visible_layer_count(&mut self, count: usize) -> bool {
        let changed = self.layers.set_visible_layer_count(count);
        self.dirty |= changed;
        changed
    }

    pub fn step_layer_up(&mut self) -> bool {
        let changed = self.layers.step_up();
        self.dirty |= changed;
        changed
    }

    pub fn step_layer_down(&mut self) -> bool {
        let changed = self.layers.step_down();
        self.dirty |= changed;
        changed
    }

    /// Per-frame geometry selection; `None` without a model
    pub fn draw_plan(&self) -> Option<DrawPlan> {
        let model = self.progress.model()?;
        Some(draw_plan(
            &model,
            &self.layers,
            self.progress.rendered_vertex_cutoff(),
        ))
    }

    // ---- Matrices ----

    pub fn compose_matrix(&self) -> DMat4 {
        self.transform.compose_matrix(&self.state)
    }

    pub fn projection_matrix(&self) -> DMat4 {
        projection_matrix(&self.settings.camera, &self.viewport, self.state.distance())
    }

    /// Scene point under `pixel` in the pan/zoom frame, used as a zoom pivot
    pub fn unproject_pivot(&self, pixel: DVec2) -> Option<DVec3> {
        unproject(
            pixel,
            self.settings.camera.pivot_depth,
            &self.projection_matrix(),
            &self.transform.base_matrix(&self.state),
            &self.viewport,
        )
    }

    /// Model-space point under `pixel` on the platform plane
    pub fn pick(&self, pixel: DVec2) -> Option<DVec3> {
        unproject_to_plane(
            pixel,
            0.0,
            &self.projection_matrix(),
            &self.compose_matrix(),
            &self.viewport,
        )
    }

    // ---- Camera operations ----

    pub fn zoom(&mut self, factor: f64, pivot: Option<DVec3>) -> Result<()> {
        self.transform.zoom(&mut self.state, factor, pivot)?;
        self.dirty = true;
        Ok(())
    }

    /// Zoom keeping the scene point under `pixel` in place
    pub fn zoom_at_pixel(&mut self, factor: f64, pixel: DVec2) -> Result<()> {
        let pivot = self.unproject_pivot(pixel);
        self.zoom(factor, pivot)
    }

    pub fn pan(&mut self, delta_screen: DVec2) {
        self.transform.pan(&mut self.state, delta_screen);
        self.dirty = true;
    }

    /// Pan so the scene point under `from` moves under `to`
    pub fn pan_between_pixels(&mut self, from: DVec2, to: DVec2) -> bool {
        let (Some(a), Some(b)) = (self.unproject_pivot(from), self.unproject_pivot(to)) else {
            return false;
        };
        self.transform.pan_between(&mut self.state, a, b);
        self.dirty = true;
        true
    }

    pub fn soft_reset(&mut self) {
        self.transform
            .soft_reset(&mut self.state, self.settings.camera_distance());
        self.dirty = true;
    }

    pub fn hard_reset(&mut self) {
        self.transform
            .hard_reset(&mut self.state, self.settings.camera_distance());
        self.dirty = true;
    }

    /// Hard reset followed by the configured reset zoom
    pub fn reset_view(&mut self) {
        self.hard_reset();
        let reset_zoom = self.settings.camera.reset_zoom;
        if let Err(e) = self.transform.zoom(&mut self.state, reset_zoom, None) {
            debug!("Reset zoom skipped: {}", e);
        }
    }

    /// Frame the loaded model; no-op without one
    pub fn fit(&mut self) -> bool {
        let Some(model) = self.progress.model() else {
            return false;
        };
        self.transform.fit(
            &mut self.state,
            model.bounds(),
            self.settings.camera_distance(),
            self.settings.camera.is_orthographic(),
        );
        self.dirty = true;
        true
    }

    // ---- Trackball ----

    pub fn begin_drag(&mut self, pixel: DVec2) {
        self.trackball.begin_drag(self.viewport.to_normalized(pixel));
    }

    pub fn update_drag(&mut self, pixel: DVec2) -> bool {
        let point = self.viewport.to_normalized(pixel);
        let before = self.state.orientation();
        self.trackball.update_drag(&mut self.state, point);
        let changed = self.state.orientation() != before;
        self.dirty |= changed;
        changed
    }

    pub fn end_drag(&mut self) {
        self.trackball.end_drag();
    }

    pub fn is_dragging(&self) -> bool {
        self.trackball.is_dragging()
    }
}

impl ViewTarget for Viewer {
    fn input_settings(&self) -> &InputSettings {
        &self.settings.input
    }

    fn viewport_center(&self) -> DVec2 {
        self.viewport.center()
    }

    fn rotate_begin(&mut self, pixel: DVec2) {
        self.begin_drag(pixel);
    }

    fn rotate_to(&mut self, pixel: DVec2) -> bool {
        self.update_drag(pixel)
    }

    fn rotate_end(&mut self) {
        self.end_drag();
    }

    fn pan_pixels(&mut self, delta: DVec2) -> bool {
        self.pan(delta);
        true
    }

    fn pan_plane(&mut self, from: DVec2, to: DVec2) -> bool {
        self.pan_between_pixels(from, to)
    }

    fn zoom_at(&mut self, factor: f64, pixel: DVec2) -> Result<()> {
        self.zoom_at_pixel(factor, pixel)
    }

    fn step_layer_up(&mut self) -> bool {
        Viewer::step_layer_up(self)
    }

    fn step_layer_down(&mut self) -> bool {
        Viewer::step_layer_down(self)
    }

    fn fit_to_model(&mut self) -> bool {
        self.fit()
    }

    fn reset_view(&mut self) {
        Viewer::reset_view(self);
    }

    fn resize(&mut self, width: f64, height: f64) {
        self.set_viewport(Viewport::new(width, height));
    }
}
