//! Edge implementation for the property graph
//!
//! Edges are directed and labeled. Several edges may connect the same pair
//! of vertices; they are told apart by ID.

use super::property::{PropertyMap, PropertyValue};
use super::types::{EdgeId, EdgeLabel, VertexId};
use serde::{Deserialize, Serialize};

/// A directed edge in the property graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    /// Unique identifier for this edge
    pub id: EdgeId,

    /// Source vertex (edge goes FROM this vertex)
    pub source: VertexId,

    /// Target vertex (edge goes TO this vertex)
    pub target: VertexId,

    /// Relationship label (e.g., "knows", "created")
    pub label: EdgeLabel,

    /// Properties associated with this edge
    pub properties: PropertyMap,
}

impl Edge {
    /// Create a new directed edge
    pub fn new(
        id: EdgeId,
        source: VertexId,
        target: VertexId,
        label: impl Into<EdgeLabel>,
    ) -> Self {
        Self::new_with_properties(id, source, target, label, PropertyMap::new())
    }

    /// Create a new edge with properties
    pub fn new_with_properties(
        id: EdgeId,
        source: VertexId,
        target: VertexId,
        label: impl Into<EdgeLabel>,
        properties: PropertyMap,
    ) -> Self {
        Edge {
            id,
            source,
            target,
            label: label.into(),
            properties,
        }
    }

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

    /// The endpoint opposite to `vertex`, or `None` if the edge does not touch it
    pub fn other_end(&self, vertex: VertexId) -> Option<VertexId> {
        if self.source == vertex {
            Some(self.target)
        } else if self.target == vertex {
            Some(self.source)
        } else {
            None
        }
    }

    /// Check if this edge connects two specific vertices (in either direction)
    pub fn connects(&self, a: VertexId, b: VertexId) -> bool {
        (self.source == a && self.target == b) || (self.source == b && self.target == a)
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Edge {}

impl std::hash::Hash for Edge {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_edge() {
        let edge = Edge::new(EdgeId::new(1), VertexId::new(1), VertexId::new(2), "knows");

        assert_eq!(edge.id, EdgeId::new(1));
        assert_eq!(edge.source, VertexId::new(1));
        assert_eq!(edge.target, VertexId::new(2));
        assert!(edge.has_label("knows"));
    }

    #[test]
    fn test_edge_properties() {
        let mut edge = Edge::new(EdgeId::new(3), VertexId::new(1), VertexId::new(2), "knows");

        edge.set_property("weight", 0.5);
        edge.set_property("since", 2009i64);

        assert_eq!(edge.get_property("weight").unwrap().as_float(), Some(0.5));
        assert_eq!(edge.get_property("since").unwrap().as_integer(), Some(2009));
        assert_eq!(edge.property_count(), 2);

        assert!(edge.remove_property("since").is_some());
        assert!(!edge.has_property("since"));
    }

    #[test]
    fn test_other_end() {
        let edge = Edge::new(EdgeId::new(5), VertexId::new(10), VertexId::new(20), "links");

        assert_eq!(edge.other_end(VertexId::new(10)), Some(VertexId::new(20)));
        assert_eq!(edge.other_end(VertexId::new(20)), Some(VertexId::new(10)));
        assert_eq!(edge.other_end(VertexId::new(30)), None);
        assert!(edge.connects(VertexId::new(20), VertexId::new(10)));
    }

    #[test]
    fn test_parallel_edges_are_distinct() {
        let a = VertexId::new(100);
        let b = VertexId::new(200);

        let e1 = Edge::new(EdgeId::new(1), a, b, "knows");
        let e2 = Edge::new(EdgeId::new(2), a, b, "knows");

        assert_ne!(e1, e2);
        assert!(e1.connects(a, b));
        assert!(e2.connects(a, b));
    }
}
