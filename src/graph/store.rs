//! In-memory graph storage implementation

use super::edge::Edge;
use super::property::{PropertyMap, PropertyValue};
use super::types::{Direction, EdgeId, EdgeLabel, Label, VertexId};
use super::vertex::Vertex;
use crate::config::StoreConfig;
use indexmap::{IndexMap, IndexSet};
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during graph operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Vertex {0} not found")]
    VertexNotFound(VertexId),

    #[error("Edge {0} not found")]
    EdgeNotFound(EdgeId),

    #[error("Vertex {0} already exists")]
    DuplicateVertexId(VertexId),

    #[error("Edge {0} already exists")]
    DuplicateEdgeId(EdgeId),

    #[error("Capacity exceeded: at most {limit} {kind} allowed")]
    CapacityExceeded { kind: &'static str, limit: usize },

    #[error("ID {0} is out of range")]
    IdOutOfRange(u64),

    #[error("No {0} IDs left to assign")]
    IdSpaceExhausted(&'static str),

    #[error("Vertex {vertex} lists missing edge {edge}")]
    DanglingEdge { vertex: VertexId, edge: EdgeId },

    #[error("Edge {edge} points at missing vertex {vertex}")]
    DanglingEndpoint { edge: EdgeId, vertex: VertexId },
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Read-only view of a property graph
///
/// This is the only surface the traversal engine touches. Implementations
/// must be free of side effects so any number of executions can share one.
pub trait GraphRead {
    /// Look up a vertex
    fn vertex(&self, id: VertexId) -> Option<&Vertex>;

    /// Look up an edge
    fn edge(&self, id: EdgeId) -> Option<&Edge>;

    /// All vertex IDs in store order
    fn vertex_ids(&self) -> Vec<VertexId>;

    /// All edge IDs in store order
    fn edge_ids(&self) -> Vec<EdgeId>;

    /// Matching edges around a vertex in adjacency order
    ///
    /// Each edge is paired with the side of the vertex it was found on. For
    /// `Both`, outgoing edges come first, then incoming ones. An empty label
    /// filter matches every edge.
    fn incident_edges(
        &self,
        vertex_id: VertexId,
        direction: Direction,
        labels: &[EdgeLabel],
    ) -> GraphResult<Vec<(&Edge, Direction)>> {
        let vertex = self
            .vertex(vertex_id)
            .ok_or(GraphError::VertexNotFound(vertex_id))?;
        let outgoing = vertex.out_edges().map(|id| (id, Direction::Out));
        let incoming = vertex.in_edges().map(|id| (id, Direction::In));
        let ids: Vec<(EdgeId, Direction)> = match direction {
            Direction::Out => outgoing.collect(),
            Direction::In => incoming.collect(),
            Direction::Both => outgoing.chain(incoming).collect(),
        };

        let mut edges = Vec::with_capacity(ids.len());
        for (id, side) in ids {
            let edge = self.edge(id).ok_or(GraphError::DanglingEdge {
                vertex: vertex_id,
                edge: id,
            })?;
            if label_matches(labels, edge) {
                edges.push((edge, side));
            }
        }
        Ok(edges)
    }

    /// Vertices reached through matching edges, in `incident_edges` order
    fn neighbors(
        &self,
        vertex_id: VertexId,
        direction: Direction,
        labels: &[EdgeLabel],
    ) -> GraphResult<Vec<&Vertex>> {
        let mut result = Vec::new();
        for (edge, side) in self.incident_edges(vertex_id, direction, labels)? {
            let other = match side {
                Direction::In => edge.source,
                _ => edge.target,
            };
            let vertex = self.vertex(other).ok_or(GraphError::DanglingEndpoint {
                edge: edge.id,
                vertex: other,
            })?;
            result.push(vertex);
        }
        Ok(result)
    }
}

/// True when `labels` is empty or contains the edge's label
pub(crate) fn label_matches(labels: &[EdgeLabel], edge: &Edge) -> bool {
    labels.is_empty() || labels.iter().any(|l| l == &edge.label)
}

/// In-memory graph storage
///
/// - vertices: VertexId -> Vertex, in insertion order
/// - edges: EdgeId -> Edge, in insertion order
/// - label_index: Label -> vertex IDs carrying it
///
/// Adjacency lives on the vertices themselves.
#[derive(Debug)]
pub struct GraphStore {
    vertices: IndexMap<VertexId, Vertex>,

    edges: IndexMap<EdgeId, Edge>,

    /// Label index for fast lookups
    label_index: HashMap<Label, IndexSet<VertexId>>,

    config: StoreConfig,

    /// Next auto-generated vertex ID
    next_vertex_id: u64,

    /// Next auto-generated edge ID
    next_edge_id: u64,
}

impl GraphStore {
    /// Create a new empty graph store
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Create a store with explicit sizing and limits
    pub fn with_config(config: StoreConfig) -> Self {
        GraphStore {
            vertices: IndexMap::with_capacity(config.initial_vertex_capacity),
            edges: IndexMap::with_capacity(config.initial_edge_capacity),
            label_index: HashMap::new(),
            config,
            next_vertex_id: 1,
            next_edge_id: 1,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // ============================================================
    // Vertices
    // ============================================================

    /// Add a vertex with the default label and an auto-generated ID
    pub fn add_vertex(&mut self, properties: PropertyMap) -> GraphResult<VertexId> {
        self.add_vertex_with_label(Label::default(), properties)
    }

    /// Add a vertex with a label and an auto-generated ID
    pub fn add_vertex_with_label(
        &mut self,
        label: impl Into<Label>,
        properties: PropertyMap,
    ) -> GraphResult<VertexId> {
        let id = VertexId::new(self.next_vertex_id);
        if id > VertexId::MAX {
            return Err(GraphError::IdSpaceExhausted("vertex"));
        }
        self.insert_vertex(Vertex::new_with_properties(id, label, properties))
    }

    /// Add a vertex under a caller-chosen ID
    pub fn add_vertex_with_id(
        &mut self,
        id: VertexId,
        label: impl Into<Label>,
        properties: PropertyMap,
    ) -> GraphResult<VertexId> {
        if id > VertexId::MAX {
            return Err(GraphError::IdOutOfRange(id.as_u64()));
        }
        self.insert_vertex(Vertex::new_with_properties(id, label, properties))
    }

    fn insert_vertex(&mut self, vertex: Vertex) -> GraphResult<VertexId> {
        if self.vertices.contains_key(&vertex.id) {
            return Err(GraphError::DuplicateVertexId(vertex.id));
        }
        if let Some(limit) = self.config.max_vertices {
            if self.vertices.len() >= limit {
                return Err(GraphError::CapacityExceeded { kind: "vertices", limit });
            }
        }

        let id = vertex.id;
        // Auto IDs always stay ahead of every ID ever handed out
        self.next_vertex_id = self.next_vertex_id.max(id.as_u64() + 1);

        self.label_index
            .entry(vertex.label.clone())
            .or_default()
            .insert(id);

        debug!("Added vertex {} with label {}", id, vertex.label);
        self.vertices.insert(id, vertex);
        Ok(id)
    }

    /// Get a vertex by ID
    pub fn get_vertex(&self, id: VertexId) -> GraphResult<&Vertex> {
        self.vertices.get(&id).ok_or(GraphError::VertexNotFound(id))
    }

    #[cfg(test)]
    pub(crate) fn vertex_mut(&mut self, id: VertexId) -> Option<&mut Vertex> {
        self.vertices.get_mut(&id)
    }

    /// Check if a vertex exists
    pub fn has_vertex(&self, id: VertexId) -> bool {
        self.vertices.contains_key(&id)
    }

    /// Set a property on a vertex, returning the previous value
    pub fn set_vertex_property(
        &mut self,
        id: VertexId,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> GraphResult<Option<PropertyValue>> {
        let vertex = self
            .vertices
            .get_mut(&id)
            .ok_or(GraphError::VertexNotFound(id))?;
        let key = key.into();
        debug!("Setting property {} on vertex {}", key, id);
        Ok(vertex.set_property(key, value))
    }

    /// Remove a property from a vertex
    pub fn remove_vertex_property(
        &mut self,
        id: VertexId,
        key: &str,
    ) -> GraphResult<Option<PropertyValue>> {
        let vertex = self
            .vertices
            .get_mut(&id)
            .ok_or(GraphError::VertexNotFound(id))?;
        Ok(vertex.remove_property(key))
    }

    /// Delete a vertex and all its incident edges
    pub fn remove_vertex(&mut self, id: VertexId) -> GraphResult<Vertex> {
        let incident: Vec<EdgeId> = {
            let vertex = self.get_vertex(id)?;
            vertex.out_edges().chain(vertex.in_edges()).collect()
        };

        for edge_id in incident {
            // Self-loops appear in both lists
            if self.edges.contains_key(&edge_id) {
                self.remove_edge(edge_id)?;
            }
        }

        let vertex = self
            .vertices
            .shift_remove(&id)
            .ok_or(GraphError::VertexNotFound(id))?;

        if let Some(ids) = self.label_index.get_mut(&vertex.label) {
            ids.shift_remove(&id);
            if ids.is_empty() {
                self.label_index.remove(&vertex.label);
            }
        }

        debug!("Removed vertex {}", id);
        Ok(vertex)
    }

    // ============================================================
    // Edges
    // ============================================================

    /// Create a directed edge with an auto-generated ID
    pub fn add_edge(
        &mut self,
        source: VertexId,
        target: VertexId,
        label: impl Into<EdgeLabel>,
        properties: PropertyMap,
    ) -> GraphResult<EdgeId> {
        let id = EdgeId::new(self.next_edge_id);
        if id > EdgeId::MAX {
            return Err(GraphError::IdSpaceExhausted("edge"));
        }
        self.insert_edge(Edge::new_with_properties(id, source, target, label, properties))
    }

    /// Create a directed edge under a caller-chosen ID
    pub fn add_edge_with_id(
        &mut self,
        id: EdgeId,
        source: VertexId,
        target: VertexId,
        label: impl Into<EdgeLabel>,
        properties: PropertyMap,
    ) -> GraphResult<EdgeId> {
        if id > EdgeId::MAX {
            return Err(GraphError::IdOutOfRange(id.as_u64()));
        }
        self.insert_edge(Edge::new_with_properties(id, source, target, label, properties))
    }

    fn insert_edge(&mut self, edge: Edge) -> GraphResult<EdgeId> {
        if self.edges.contains_key(&edge.id) {
            return Err(GraphError::DuplicateEdgeId(edge.id));
        }
        if !self.has_vertex(edge.source) {
            return Err(GraphError::VertexNotFound(edge.source));
        }
        if !self.has_vertex(edge.target) {
            return Err(GraphError::VertexNotFound(edge.target));
        }
        if let Some(limit) = self.config.max_edges {
            if self.edges.len() >= limit {
                return Err(GraphError::CapacityExceeded { kind: "edges", limit });
            }
        }

        let id = edge.id;
        self.next_edge_id = self.next_edge_id.max(id.as_u64() + 1);

        if let Some(source) = self.vertices.get_mut(&edge.source) {
            source.out_edges.insert(id);
        }
        if let Some(target) = self.vertices.get_mut(&edge.target) {
            target.in_edges.insert(id);
        }

        debug!(
            "Added edge {} {} -[{}]-> {}",
            id, edge.source, edge.label, edge.target
        );
        self.edges.insert(id, edge);
        Ok(id)
    }

    /// Get an edge by ID
    pub fn get_edge(&self, id: EdgeId) -> GraphResult<&Edge> {
        self.edges.get(&id).ok_or(GraphError::EdgeNotFound(id))
    }

    /// Check if an edge exists
    pub fn has_edge(&self, id: EdgeId) -> bool {
        self.edges.contains_key(&id)
    }

    /// Set a property on an edge, returning the previous value
    pub fn set_edge_property(
        &mut self,
        id: EdgeId,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> GraphResult<Option<PropertyValue>> {
        let edge = self.edges.get_mut(&id).ok_or(GraphError::EdgeNotFound(id))?;
        Ok(edge.set_property(key, value))
    }

    /// Remove a property from an edge
    pub fn remove_edge_property(
        &mut self,
        id: EdgeId,
        key: &str,
    ) -> GraphResult<Option<PropertyValue>> {
        let edge = self.edges.get_mut(&id).ok_or(GraphError::EdgeNotFound(id))?;
        Ok(edge.remove_property(key))
    }

    /// Delete an edge
    pub fn remove_edge(&mut self, id: EdgeId) -> GraphResult<Edge> {
        let edge = self
            .edges
            .shift_remove(&id)
            .ok_or(GraphError::EdgeNotFound(id))?;

        if let Some(source) = self.vertices.get_mut(&edge.source) {
            source.out_edges.shift_remove(&id);
        }
        if let Some(target) = self.vertices.get_mut(&edge.target) {
            target.in_edges.shift_remove(&id);
        }

        debug!("Removed edge {}", id);
        Ok(edge)
    }

    // ============================================================
    // Bulk access
    // ============================================================

    /// Get all vertices with a specific label
    pub fn vertices_by_label(&self, label: &str) -> Vec<&Vertex> {
        self.label_index
            .get(&Label::new(label))
            .map(|ids| ids.iter().filter_map(|id| self.vertices.get(id)).collect())
            .unwrap_or_default()
    }

    /// All vertices in insertion order
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.values()
    }

    /// All edges in insertion order
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    /// Get total number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get total number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Clear all data from the graph
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.edges.clear();
        self.label_index.clear();
        self.next_vertex_id = 1;
        self.next_edge_id = 1;
        debug!("Cleared graph store");
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphRead for GraphStore {
    fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(&id)
    }

    fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(&id)
    }

    fn vertex_ids(&self) -> Vec<VertexId> {
        self.vertices.keys().copied().collect()
    }

    fn edge_ids(&self) -> Vec<EdgeId> {
        self.edges.keys().copied().collect()
    }
}
