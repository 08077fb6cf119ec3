//! Camera and progress-playback components
//!
//! Leaves first: quaternion math, viewport and projection, camera state and
//! view transform, trackball, unprojection, toolpath model, layer/progress
//! cursors, input dispatch, and the [`Viewer`] facade tying them together.

pub mod camera;
pub mod input;
pub mod math;
pub mod progress;
pub mod toolpath;
pub mod trackball;
pub mod unproject;
pub mod viewer;
pub mod viewport;

pub use camera::{ViewState, ViewTransform};
pub use input::{DragKind, DragSession, InputDispatcher, InputEvent, Response, ViewTarget};
pub use math::{
    axis_angle_to_quaternion, cross_product, project_to_sphere, quaternion_multiply,
    quaternion_to_matrix, renormalize, NORM_TOLERANCE,
};
pub use progress::{
    draw_plan, DrawPlan, LayerCursor, LayerDraw, LayerProgress, ProgressHandle, ProgressTracker,
};
pub use toolpath::{Layer, Segment, ToolpathModel, ToolpathModelBuilder};
pub use trackball::{compute_drag_rotation, TrackballController};
pub use unproject::{project, unproject, unproject_ray, unproject_to_plane, Ray};
pub use viewer::Viewer;
pub use viewport::{projection_matrix, Bounds, Viewport};
