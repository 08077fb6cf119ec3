//! Layer cursor and print-progress playback
//!
//! Two cursors decide what the renderer draws each frame:
//!
//! - [`LayerCursor`] counts visible layers. Its value ranges over
//!   `1..=total + 1`, where `total + 1` means "all layers, drawn uniformly"
//!   and any smaller value highlights the top visible layer.
//! - [`ProgressTracker`] holds the rendered-vertex cutoff. The transport side
//!   pushes line numbers through a [`ProgressHandle`] from any thread; the UI
//!   thread reads the cutoff with a single atomic load.
//!
//! [`draw_plan`] combines both into per-layer vertex ranges.

use super::toolpath::ToolpathModel;
use gcodeview_core::{thread_safe_rw, ThreadSafeRw};
use std::ops::Range;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

/// Visible-layer counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayerCursor {
    total: Option<usize>,
    visible: usize,
}

impl LayerCursor {
    /// Cursor over `total_layers`, starting with only the first layer visible
    pub fn new(total_layers: usize) -> Self {
        Self {
            total: Some(total_layers),
            visible: 1,
        }
    }

    /// Rebind to a freshly loaded model with the top layer highlighted
    pub fn reset(&mut self, total_layers: usize) {
        self.total = Some(total_layers);
        self.visible = total_layers.max(1);
    }

    /// Forget the model; steps become no-ops
    pub fn clear(&mut self) {
        self.total = None;
        self.visible = 0;
    }

    pub fn is_loaded(&self) -> bool {
        self.total.is_some()
    }

    pub fn total_layers(&self) -> Option<usize> {
        self.total
    }

    pub fn visible_layer_count(&self) -> usize {
        self.visible
    }

    /// Whether the "all layers, uniform style" sentinel is selected
    pub fn shows_all_uniform(&self) -> bool {
        self.total.is_some_and(|total| self.visible == total + 1)
    }

    /// Show one more layer, up to the uniform sentinel. Returns whether the
    /// count changed.
    pub fn step_up(&mut self) -> bool {
        let Some(total) = self.total else {
            return false;
        };
        let next = (self.visible + 1).min(total + 1);
        self.apply(next)
    }

    /// Show one fewer layer, never fewer than one
    pub fn step_down(&mut self) -> bool {
        if self.total.is_none() {
            return false;
        }
        let next = self.visible.saturating_sub(1).max(1);
        self.apply(next)
    }

    /// Set the count directly, clamped into `1..=total + 1`
    pub fn set_visible_layer_count(&mut self, count: usize) -> bool {
        let Some(total) = self.total else {
            return false;
        };
        self.apply(count.clamp(1, total + 1))
    }

    fn apply(&mut self, next: usize) -> bool {
        let changed = next != self.visible;
        self.visible = next;
        if changed {
            trace!("Visible layers -> {}", next);
        }
        changed
    }
}

/// How much of a layer lies below the progress cutoff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerProgress {
    Printed,
    Partial,
    Unprinted,
}

/// Write side of the progress cutoff, shareable with the transport task.
#[derive(Debug, Clone)]
pub struct ProgressHandle {
    model: ThreadSafeRw<Option<Arc<ToolpathModel>>>,
    cutoff: Arc<AtomicUsize>,
    redraw: Arc<AtomicBool>,
}

impl ProgressHandle {
    /// Advance the cutoff to the end of the segment produced by `line`.
    ///
    /// The cutoff only moves forward within a job. Without a loaded model the
    /// call does nothing. Returns whether the cutoff advanced.
    pub fn set_from_progress(&self, line: usize) -> bool {
        let model = self.model.read();
        let Some(model) = model.as_ref() else {
            trace!("Progress line {} ignored: no model loaded", line);
            return false;
        };

        let target = model
            .segment_for_line(line)
            .map_or(0, |segment| segment.end_vertex);
        // Held under the read lock so a concurrent reset cannot be overwritten
        let previous = self.cutoff.fetch_max(target, Ordering::AcqRel);

        if target > previous {
            self.redraw.store(true, Ordering::Release);
            trace!("Progress line {} -> vertex cutoff {}", line, target);
            true
        } else {
            false
        }
    }

    pub fn rendered_vertex_cutoff(&self) -> usize {
        self.cutoff.load(Ordering::Acquire)
    }
}

/// UI-side owner of the model slot and progress cutoff.
///
/// Producers get a [`ProgressHandle`]; the tracker itself is not `Clone` so
/// there is exactly one owner that can swap the model.
#[derive(Debug)]
pub struct ProgressTracker {
    handle: ProgressHandle,
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self {
            handle: ProgressHandle {
                model: thread_safe_rw(None),
                cutoff: Arc::new(AtomicUsize::new(0)),
                redraw: Arc::new(AtomicBool::new(false)),
            },
        }
    }

    /// Handle for the progress producer
    pub fn handle(&self) -> ProgressHandle {
        self.handle.clone()
    }

    /// Swap the model (or clear it with `None`) and rewind the cutoff
    pub fn set_model(&self, model: Option<Arc<ToolpathModel>>) {
        let mut slot = self.handle.model.write();
        debug!(
            "Progress model {}",
            if model.is_some() { "loaded" } else { "cleared" }
        );
        *slot = model;
        self.handle.cutoff.store(0, Ordering::Release);
        self.handle.redraw.store(true, Ordering::Release);
    }

    pub fn model(&self) -> Option<Arc<ToolpathModel>> {
        self.handle.model.read().clone()
    }

    pub fn has_model(&self) -> bool {
        self.handle.model.read().is_some()
    }

    /// Start a new job on the current model: rewind the cutoff to zero
    pub fn begin_job(&self) {
        let _slot = self.handle.model.write();
        self.handle.cutoff.store(0, Ordering::Release);
        self.handle.redraw.store(true, Ordering::Release);
        debug!("Progress job started");
    }

    pub fn set_from_progress(&self, line: usize) -> bool {
        self.handle.set_from_progress(line)
    }

    pub fn rendered_vertex_cutoff(&self) -> usize {
        self.handle.rendered_vertex_cutoff()
    }

    /// Consume the pending redraw request raised by progress or model changes
    pub fn take_redraw_request(&self) -> bool {
        self.handle.redraw.swap(false, Ordering::AcqRel)
    }
}

/// Draw instructions for one visible layer
#[derive(Debug, Clone, PartialEq)]
pub struct LayerDraw {
    pub index: usize,
    pub z: f64,
    /// Vertices before the cutoff
    pub printed: Range<usize>,
    /// Vertices from the cutoff on
    pub unprinted: Range<usize>,
    pub progress: LayerProgress,
    /// The boundary layer drawn in the highlight style
    pub highlighted: bool,
}

/// Everything the renderer needs to pick geometry for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct DrawPlan {
    pub layers: Vec<LayerDraw>,
    pub cutoff: usize,
    /// All layers drawn in one style, without a highlighted layer
    pub uniform: bool,
}

impl DrawPlan {
    pub fn highlighted_layer(&self) -> Option<&LayerDraw> {
        self.layers.iter().find(|layer| layer.highlighted)
    }

    pub fn progress_of(&self, index: usize) -> Option<LayerProgress> {
        self.layers
            .iter()
            .find(|layer| layer.index == index)
            .map(|layer| layer.progress)
    }
}

/// Split the visible layers of `model` at the vertex `cutoff`.
pub fn draw_plan(model: &ToolpathModel, cursor: &LayerCursor, cutoff: usize) -> DrawPlan {
    let total = model.layer_count();
    let visible = cursor.visible_layer_count().min(total + 1);
    let uniform = visible > total;

    let layers = model
        .layers()
        .iter()
        .take(visible)
        .enumerate()
        .map(|(index, layer)| {
            let range = layer.vertex_range();
            let split = cutoff.clamp(range.start, range.end);
            let progress = if cutoff >= range.end {
                LayerProgress::Printed
            } else if cutoff <= range.start {
                LayerProgress::Unprinted
            } else {
                LayerProgress::Partial
            };

            LayerDraw {
                index,
                z: layer.z,
                printed: range.start..split,
                unprinted: split..range.end,
                progress,
                highlighted: !uniform && index + 1 == visible,
            }
        })
        .collect();

    DrawPlan {
        layers,
        cutoff,
        uniform,
    }
}
