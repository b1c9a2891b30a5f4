//! Vertex implementation for the property graph

use super::property::{PropertyMap, PropertyValue};
use super::types::{EdgeId, Label, VertexId};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// A vertex in the property graph
///
/// Incident edge IDs are kept in insertion order, which is the adjacency
/// order traversals observe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vertex {
    /// Unique identifier for this vertex
    pub id: VertexId,

    /// Vertex label
    pub label: Label,

    /// Properties associated with this vertex
    pub properties: PropertyMap,

    /// Edges leaving this vertex
    pub(crate) out_edges: IndexSet<EdgeId>,

    /// Edges arriving at this vertex
    pub(crate) in_edges: IndexSet<EdgeId>,
}

impl Vertex {
    /// Create a new vertex without properties
    pub fn new(id: VertexId, label: impl Into<Label>) -> Self {
        Self::new_with_properties(id, label, PropertyMap::new())
    }

    /// Create a new vertex with properties
    pub fn new_with_properties(
        id: VertexId,
        label: impl Into<Label>,
        properties: PropertyMap,
    ) -> Self {
        Vertex {
            id,
            label: label.into(),
            properties,
            out_edges: IndexSet::new(),
            in_edges: IndexSet::new(),
        }
    }

    /// Check if the vertex has a specific label
    pub fn has_label(&self, label: &str) -> bool {
        self.label.as_str() == label
    }

    /// Set a property value, returning the previous one
    pub fn set_property(
        &mut self,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Option<PropertyValue> {
        self.properties.insert(key.into(), value.into())
    }

    /// Get a property value
    pub fn get_property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Remove a property
    pub fn remove_property(&mut self, key: &str) -> Option<PropertyValue> {
        self.properties.remove(key)
    }

    /// Check if property exists
    pub fn has_property(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// Get number of properties
    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    /// Outgoing edge IDs in adjacency order
    pub fn out_edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.out_edges.iter().copied()
    }

    /// Incoming edge IDs in adjacency order
    pub fn in_edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.in_edges.iter().copied()
    }

    pub fn out_degree(&self) -> usize {
        self.out_edges.len()
    }

    pub fn in_degree(&self) -> usize {
        self.in_edges.len()
    }
}

impl PartialEq for Vertex {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Vertex {}

impl std::hash::Hash for Vertex {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
