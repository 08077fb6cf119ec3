//! # GCodeView Visualizer
//!
//! Trackball camera, view transform and print-progress playback for a 3D
//! toolpath viewer. Toolkit and renderer independent: the host feeds
//! [`InputEvent`]s in and reads matrices and a [`DrawPlan`] out each frame.

pub mod visualizer;

pub use visualizer::{
    compute_drag_rotation, draw_plan, projection_matrix, unproject, unproject_ray,
    unproject_to_plane, Bounds, DragKind, DragSession, DrawPlan, InputDispatcher, InputEvent,
    Layer, LayerCursor, LayerDraw, LayerProgress, ProgressHandle, ProgressTracker, Ray, Response,
    Segment, ToolpathModel, ToolpathModelBuilder, TrackballController, ViewState, ViewTarget,
    ViewTransform, Viewer, Viewport,
};
