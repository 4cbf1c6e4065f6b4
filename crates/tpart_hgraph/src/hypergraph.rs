//! Core hypergraph data structures.
//!
//! Defines the structural model partitioned by the refiner: vertices (with
//! multi-dimensional resource weights and optional placement), hyperedges
//! (pin lists, weights and optional timing slack) and critical timing paths.
//! The [`Hypergraph`] is read-only during a refinement pass; only the timing
//! attributes are rewritten between passes.

use crate::error::GraphError;
use crate::timing::TimingAttr;
use serde::{Deserialize, Serialize};
use tpart_common::weights::{self, Matrix};
use tpart_common::{HyperedgeId, PathId, VertexId};

/// A weighted hypergraph with optional timing paths.
///
/// Auxiliary indices (vertex to incident hyperedges, vertex to timing paths)
/// are maintained by the `add_*` methods and skipped by serde; call
/// [`rebuild_indices`](Self::rebuild_indices) after deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hypergraph {
    /// All vertices in the graph.
    pub vertices: Vec<Vertex>,
    /// All hyperedges in the graph.
    pub hyperedges: Vec<Hyperedge>,
    /// All critical timing paths.
    pub paths: Vec<TimingPath>,
    /// Number of entries in every vertex weight vector.
    pub vertex_dimensions: usize,
    /// Number of entries in every hyperedge weight vector.
    pub hyperedge_dimensions: usize,
    /// Number of coordinates in every non-empty vertex placement.
    pub placement_dimensions: usize,
    #[serde(skip)]
    incident: Vec<Vec<HyperedgeId>>,
    #[serde(skip)]
    vertex_paths: Vec<Vec<PathId>>,
}

impl Hypergraph {
    /// Creates an empty hypergraph with the given weight and placement dimensions.
    pub fn new(
        vertex_dimensions: usize,
        hyperedge_dimensions: usize,
        placement_dimensions: usize,
    ) -> Self {
        Self {
            vertices: Vec::new(),
            hyperedges: Vec::new(),
            paths: Vec::new(),
            vertex_dimensions,
            hyperedge_dimensions,
            placement_dimensions,
            incident: Vec::new(),
            vertex_paths: Vec::new(),
        }
    }

    /// Adds a vertex and returns its ID.
    ///
    /// `placement` may be empty for vertices without a physical location.
    pub fn add_vertex(
        &mut self,
        name: impl Into<String>,
        weights: Vec<f64>,
        placement: Vec<f64>,
    ) -> Result<VertexId, GraphError> {
        check_dimensions("vertex weights", self.vertex_dimensions, weights.len())?;
        if !placement.is_empty() {
            check_dimensions("placement", self.placement_dimensions, placement.len())?;
        }
        let id = VertexId::from_raw(self.vertices.len() as u32);
        self.vertices.push(Vertex {
            id,
            name: name.into(),
            weights,
            placement,
        });
        self.incident.push(Vec::new());
        self.vertex_paths.push(Vec::new());
        Ok(id)
    }

    /// Adds a hyperedge connecting `pins` and returns its ID.
    ///
    /// Duplicate pins are collapsed; pins are stored in ascending vertex order.
    pub fn add_hyperedge(
        &mut self,
        mut pins: Vec<VertexId>,
        weights: Vec<f64>,
    ) -> Result<HyperedgeId, GraphError> {
        check_dimensions("hyperedge weights", self.hyperedge_dimensions, weights.len())?;
        if pins.is_empty() {
            return Err(GraphError::EmptyHyperedge);
        }
        pins.sort_unstable();
        pins.dedup();
        if let Some(&bad) = pins.iter().find(|v| v.index() >= self.vertices.len()) {
            return Err(GraphError::UnknownVertex(bad));
        }

        let id = HyperedgeId::from_raw(self.hyperedges.len() as u32);
        for &v in &pins {
            self.incident[v.index()].push(id);
        }
        self.hyperedges.push(Hyperedge {
            id,
            vertices: pins,
            weights,
            timing: None,
        });
        Ok(id)
    }

    /// Attaches a normalized slack to a hyperedge, making it timing-aware.
    pub fn set_hyperedge_slack(&mut self, id: HyperedgeId, slack: f64) -> Result<(), GraphError> {
        let edge = self
            .hyperedges
            .get_mut(id.index())
            .ok_or(GraphError::UnknownHyperedge(id))?;
        edge.timing = Some(TimingAttr::new(slack));
        Ok(())
    }

    /// Adds a critical timing path and returns its ID.
    ///
    /// `vertices` is the ordered sequence of vertices visited by the path and
    /// `hyperedges` the hyperedges it traverses.
    pub fn add_path(
        &mut self,
        vertices: Vec<VertexId>,
        hyperedges: Vec<HyperedgeId>,
        slack: f64,
    ) -> Result<PathId, GraphError> {
        if let Some(&bad) = vertices.iter().find(|v| v.index() >= self.vertices.len()) {
            return Err(GraphError::UnknownVertex(bad));
        }
        if let Some(&bad) = hyperedges
            .iter()
            .find(|e| e.index() >= self.hyperedges.len())
        {
            return Err(GraphError::UnknownHyperedge(bad));
        }

        let id = PathId::from_raw(self.paths.len() as u32);
        for &v in &vertices {
            let paths = &mut self.vertex_paths[v.index()];
            if !paths.contains(&id) {
                paths.push(id);
            }
        }
        self.paths.push(TimingPath {
            id,
            vertices,
            hyperedges,
            timing: TimingAttr::new(slack),
        });
        Ok(id)
    }

    /// Returns the vertex with the given ID.
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.index()]
    }

    /// Returns the hyperedge with the given ID.
    pub fn hyperedge(&self, id: HyperedgeId) -> &Hyperedge {
        &self.hyperedges[id.index()]
    }

    /// Returns the timing path with the given ID.
    pub fn path(&self, id: PathId) -> &TimingPath {
        &self.paths[id.index()]
    }

    /// Returns the pins of a hyperedge.
    pub fn pins(&self, id: HyperedgeId) -> &[VertexId] {
        &self.hyperedges[id.index()].vertices
    }

    /// Returns the hyperedges incident to a vertex, in ascending ID order.
    pub fn incident_hyperedges(&self, id: VertexId) -> &[HyperedgeId] {
        &self.incident[id.index()]
    }

    /// Returns the timing paths passing through a vertex, in ascending ID order.
    pub fn vertex_paths(&self, id: VertexId) -> &[PathId] {
        &self.vertex_paths[id.index()]
    }

    /// Returns the weight vector of a vertex.
    pub fn vertex_weights(&self, id: VertexId) -> &[f64] {
        &self.vertices[id.index()].weights
    }

    /// Returns the weight vector of a hyperedge.
    pub fn hyperedge_weights(&self, id: HyperedgeId) -> &[f64] {
        &self.hyperedges[id.index()].weights
    }

    /// Returns an iterator over all vertex IDs in ascending order.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> {
        (0..self.vertices.len() as u32).map(VertexId::from_raw)
    }

    /// Returns an iterator over all hyperedge IDs in ascending order.
    pub fn hyperedge_ids(&self) -> impl Iterator<Item = HyperedgeId> {
        (0..self.hyperedges.len() as u32).map(HyperedgeId::from_raw)
    }

    /// Returns an iterator over all path IDs in ascending order.
    pub fn path_ids(&self) -> impl Iterator<Item = PathId> {
        (0..self.paths.len() as u32).map(PathId::from_raw)
    }

    /// Returns the number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of hyperedges.
    pub fn hyperedge_count(&self) -> usize {
        self.hyperedges.len()
    }

    /// Returns the number of timing paths.
    pub fn path_count(&self) -> usize {
        self.paths.len()
    }

    /// Returns whether any hyperedge or path carries timing information.
    pub fn has_timing(&self) -> bool {
        !self.paths.is_empty() || self.hyperedges.iter().any(|e| e.timing.is_some())
    }

    /// Returns the per-dimension sum of all vertex weights.
    pub fn total_vertex_weights(&self) -> Vec<f64> {
        let mut total = vec![0.0; self.vertex_dimensions];
        for vertex in &self.vertices {
            weights::add_assign(&mut total, &vertex.weights);
        }
        total
    }

    /// Derives the per-block upper balance bound from an imbalance factor.
    ///
    /// Every block may hold up to `total * (1 / num_parts + ub_factor / 100)`
    /// in each dimension, so `ub_factor = 5.0` allows a block to exceed its
    /// even share by five percent of the total weight.
    pub fn upper_block_balance(&self, num_parts: usize, ub_factor: f64) -> Matrix<f64> {
        let share = 1.0 / num_parts.max(1) as f64 + ub_factor * 0.01;
        let limit = weights::scale(&self.total_vertex_weights(), share);
        vec![limit; num_parts]
    }

    /// Validates a deserialized graph and rebuilds its auxiliary indices.
    ///
    /// Pins are sorted and deduplicated as [`add_hyperedge`](Self::add_hyperedge)
    /// would store them, and every ID is reset to its position. Fails on
    /// weight vectors of the wrong dimension, empty hyperedges, and pins or
    /// path entries that refer to unknown vertices or hyperedges.
    pub fn rebuild_indices(&mut self) -> Result<(), GraphError> {
        let num_vertices = self.vertices.len();
        let num_hyperedges = self.hyperedges.len();
        for (i, vertex) in self.vertices.iter_mut().enumerate() {
            check_dimensions("vertex weights", self.vertex_dimensions, vertex.weights.len())?;
            if !vertex.placement.is_empty() {
                check_dimensions(
                    "placement",
                    self.placement_dimensions,
                    vertex.placement.len(),
                )?;
            }
            vertex.id = VertexId::from_raw(i as u32);
        }

        let mut incident = vec![Vec::new(); num_vertices];
        for (i, edge) in self.hyperedges.iter_mut().enumerate() {
            check_dimensions(
                "hyperedge weights",
                self.hyperedge_dimensions,
                edge.weights.len(),
            )?;
            if edge.vertices.is_empty() {
                return Err(GraphError::EmptyHyperedge);
            }
            edge.vertices.sort_unstable();
            edge.vertices.dedup();
            if let Some(&bad) = edge.vertices.iter().find(|v| v.index() >= num_vertices) {
                return Err(GraphError::UnknownVertex(bad));
            }
            edge.id = HyperedgeId::from_raw(i as u32);
            for &v in &edge.vertices {
                incident[v.index()].push(edge.id);
            }
        }

        let mut vertex_paths: Vec<Vec<PathId>> = vec![Vec::new(); num_vertices];
        for (i, path) in self.paths.iter_mut().enumerate() {
            if let Some(&bad) = path.vertices.iter().find(|v| v.index() >= num_vertices) {
                return Err(GraphError::UnknownVertex(bad));
            }
            if let Some(&bad) = path
                .hyperedges
                .iter()
                .find(|e| e.index() >= num_hyperedges)
            {
                return Err(GraphError::UnknownHyperedge(bad));
            }
            path.id = PathId::from_raw(i as u32);
            for &v in &path.vertices {
                let paths = &mut vertex_paths[v.index()];
                if !paths.contains(&path.id) {
                    paths.push(path.id);
                }
            }
        }

        self.incident = incident;
        self.vertex_paths = vertex_paths;
        Ok(())
    }
}

impl Default for Hypergraph {
    fn default() -> Self {
        Self::new(1, 1, 0)
    }
}

fn check_dimensions(what: &'static str, expected: usize, actual: usize) -> Result<(), GraphError> {
    if expected == actual {
        Ok(())
    } else {
        Err(GraphError::DimensionMismatch {
            what,
            expected,
            actual,
        })
    }
}

/// A vertex (item) to be assigned to a block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vertex {
    /// The unique ID of this vertex.
    pub id: VertexId,
    /// Instance name, used only for reporting.
    pub name: String,
    /// Resource weights, one entry per dimension.
    pub weights: Vec<f64>,
    /// Physical location, empty when unplaced.
    pub placement: Vec<f64>,
}

/// A hyperedge connecting two or more vertices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hyperedge {
    /// The unique ID of this hyperedge.
    pub id: HyperedgeId,
    /// Pins, in ascending vertex order without duplicates.
    pub vertices: Vec<VertexId>,
    /// Structural weights, one entry per dimension.
    pub weights: Vec<f64>,
    /// Slack information for timing-driven partitioning.
    pub timing: Option<TimingAttr>,
}

/// A critical timing path through the hypergraph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingPath {
    /// The unique ID of this path.
    pub id: PathId,
    /// Vertices visited by the path, in order.
    pub vertices: Vec<VertexId>,
    /// Hyperedges traversed by the path.
    pub hyperedges: Vec<HyperedgeId>,
    /// Path slack and derived timing cost.
    pub timing: TimingAttr,
}
