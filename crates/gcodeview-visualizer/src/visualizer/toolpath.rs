//! Layered toolpath model
//!
//! A read-only view of the geometry the builder produced: vertices in program
//! order, grouped into segments that remember the program line they came from,
//! grouped into layers of increasing height.

use super::viewport::Bounds;
use gcodeview_core::{Result, ViewError};
use glam::DVec3;
use std::ops::Range;

/// One drawn move, covering `start_vertex..end_vertex` of the global vertex list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Segment {
    /// Program line that produced the move
    pub source_line: usize,
    pub start_vertex: usize,
    pub end_vertex: usize,
}

impl Segment {
    pub fn new(source_line: usize, start_vertex: usize, end_vertex: usize) -> Self {
        Self {
            source_line,
            start_vertex,
            end_vertex,
        }
    }

    pub fn vertex_range(&self) -> Range<usize> {
        self.start_vertex..self.end_vertex
    }

    pub fn vertex_count(&self) -> usize {
        self.end_vertex.saturating_sub(self.start_vertex)
    }
}

/// Segments sharing one print height
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub z: f64,
    pub segments: Vec<Segment>,
}

impl Layer {
    pub fn new(z: f64) -> Self {
        Self {
            z,
            segments: Vec::new(),
        }
    }

    pub fn with_segments(z: f64, segments: Vec<Segment>) -> Self {
        Self { z, segments }
    }

    /// Vertex range spanned by the layer's segments
    pub fn vertex_range(&self) -> Range<usize> {
        match (self.segments.first(), self.segments.last()) {
            (Some(first), Some(last)) => first.start_vertex..last.end_vertex,
            _ => 0..0,
        }
    }

    pub fn first_line(&self) -> Option<usize> {
        self.segments.first().map(|segment| segment.source_line)
    }

    pub fn last_line(&self) -> Option<usize> {
        self.segments.last().map(|segment| segment.source_line)
    }
}

/// Validated, immutable toolpath geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolpathModel {
    bounds: Bounds,
    layers: Vec<Layer>,
    vertices: Vec<DVec3>,
}

impl ToolpathModel {
    /// Build a model from hand-assembled layers.
    ///
    /// Fails with [`ViewError::InvalidModel`] when a layer is empty, layer
    /// heights do not strictly increase, vertex ranges overlap or run
    /// backwards, a range points past the vertex list, or source lines
    /// decrease.
    pub fn from_layers(layers: Vec<Layer>, vertices: Vec<DVec3>) -> Result<Self> {
        validate(&layers, vertices.len())?;

        Ok(Self {
            bounds: Bounds::from_points(&vertices),
            layers,
            vertices,
        })
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Last segment whose source line is at or before `line`
    pub fn segment_for_line(&self, line: usize) -> Option<&Segment> {
        let layer_index = self
            .layers
            .partition_point(|layer| layer.first_line().is_some_and(|first| first <= line));
        let layer = self.layers.get(layer_index.checked_sub(1)?)?;

        let segment_index = layer
            .segments
            .partition_point(|segment| segment.source_line <= line);
        layer.segments.get(segment_index.checked_sub(1)?)
    }

    /// Index of the layer containing `line`, by the same rule as
    /// [`Self::segment_for_line`]
    pub fn layer_for_line(&self, line: usize) -> Option<usize> {
        let index = self
            .layers
            .partition_point(|layer| layer.first_line().is_some_and(|first| first <= line));
        index.checked_sub(1)
    }
}

fn validate(layers: &[Layer], vertex_count: usize) -> Result<()> {
    let mut previous_z: Option<f64> = None;
    let mut next_vertex = 0usize;
    let mut previous_line = 0usize;

    for (index, layer) in layers.iter().enumerate() {
        if !layer.z.is_finite() {
            return Err(ViewError::invalid_model(format!(
                "layer {} has a non-finite height",
                index
            )));
        }
        if let Some(z) = previous_z {
            if layer.z <= z {
                return Err(ViewError::invalid_model(format!(
                    "layer {} height {} does not exceed previous height {}",
                    index, layer.z, z
                )));
            }
        }
        previous_z = Some(layer.z);

        if layer.segments.is_empty() {
            return Err(ViewError::invalid_model(format!(
                "layer {} has no segments",
                index
            )));
        }

        for segment in &layer.segments {
            if segment.start_vertex < next_vertex || segment.end_vertex < segment.start_vertex {
                return Err(ViewError::invalid_model(format!(
                    "segment at line {} in layer {} has non-monotonic vertex range {}..{}",
                    segment.source_line, index, segment.start_vertex, segment.end_vertex
                )));
            }
            if segment.end_vertex > vertex_count {
                return Err(ViewError::invalid_model(format!(
                    "segment at line {} ends at vertex {} but only {} vertices exist",
                    segment.source_line, segment.end_vertex, vertex_count
                )));
            }
            if segment.source_line < previous_line {
                return Err(ViewError::invalid_model(format!(
                    "source line {} follows line {}",
                    segment.source_line, previous_line
                )));
            }
            next_vertex = segment.end_vertex;
            previous_line = segment.source_line;
        }
    }

    Ok(())
}

/// Incremental builder fed one move at a time by a geometry producer.
#[derive(Debug, Clone, Default)]
pub struct ToolpathModelBuilder {
    layers: Vec<Layer>,
    vertices: Vec<DVec3>,
    /// Whether the current layer has seen a planar move yet
    anchored: bool,
}

impl ToolpathModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a move from `from` to `to` produced by program line `line`.
    ///
    /// Layers follow planar moves: a move that stays at one height above the
    /// current layer opens a new layer there. Moves that change height (Z-hops,
    /// lifts between layers) join the current layer.
    pub fn push_move(&mut self, line: usize, from: DVec3, to: DVec3) -> &mut Self {
        let start = self.vertices.len();
        self.vertices.push(from);
        self.vertices.push(to);
        let segment = Segment::new(line, start, start + 2);

        let planar = from.z == to.z;
        let anchored = self.anchored;
        match self.layers.last_mut() {
            // Only the first layer can be provisional, so lowering it keeps
            // heights increasing
            Some(layer) if planar && !anchored => {
                layer.z = to.z;
                layer.segments.push(segment);
            }
            Some(layer) if !planar || to.z <= layer.z => layer.segments.push(segment),
            _ => self.layers.push(Layer::with_segments(to.z, vec![segment])),
        }
        self.anchored |= planar;
        self
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn build(self) -> Result<ToolpathModel> {
        ToolpathModel::from_layers(self.layers, self.vertices)
    }
}
