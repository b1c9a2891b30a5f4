//! Elements flowing through the traversal pipeline

use crate::graph::{Edge, EdgeId, GraphError, GraphRead, PropertyValue, Vertex, VertexId};
use crate::traversal::{TraversalError, TraversalResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The type of elements a frontier holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    Vertex,
    Edge,
    Value,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::Vertex => write!(f, "Vertex"),
            ElementKind::Edge => write!(f, "Edge"),
            ElementKind::Value => write!(f, "Value"),
        }
    }
}

/// A single frontier item
///
/// Graph elements travel by ID and are resolved against the store only when
/// a step needs their data. Identity for dedup: vertices and edges by ID,
/// values by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Element {
    Vertex(VertexId),
    Edge(EdgeId),
    Value(PropertyValue),
}

impl Element {
    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Vertex(_) => ElementKind::Vertex,
            Element::Edge(_) => ElementKind::Edge,
            Element::Value(_) => ElementKind::Value,
        }
    }

    pub fn as_vertex(&self) -> Option<VertexId> {
        match self {
            Element::Vertex(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_edge(&self) -> Option<EdgeId> {
        match self {
            Element::Edge(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_value(&self) -> Option<&PropertyValue> {
        match self {
            Element::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<PropertyValue> {
        match self {
            Element::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Look the element up in `graph`
    pub fn resolve<'a>(&'a self, graph: &'a dyn GraphRead) -> TraversalResult<ElementRef<'a>> {
        match self {
            Element::Vertex(id) => graph
                .vertex(*id)
                .map(ElementRef::Vertex)
                .ok_or(TraversalError::Graph(GraphError::VertexNotFound(*id))),
            Element::Edge(id) => graph
                .edge(*id)
                .map(ElementRef::Edge)
                .ok_or(TraversalError::Graph(GraphError::EdgeNotFound(*id))),
            Element::Value(value) => Ok(ElementRef::Value(value)),
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Vertex(id) => write!(f, "v[{}]", id.as_u64()),
            Element::Edge(id) => write!(f, "e[{}]", id.as_u64()),
            Element::Value(value) => write!(f, "{}", value),
        }
    }
}

impl From<VertexId> for Element {
    fn from(id: VertexId) -> Self {
        Element::Vertex(id)
    }
}

impl From<EdgeId> for Element {
    fn from(id: EdgeId) -> Self {
        Element::Edge(id)
    }
}

impl From<PropertyValue> for Element {
    fn from(value: PropertyValue) -> Self {
        Element::Value(value)
    }
}

/// A resolved element as seen by predicates
#[derive(Debug, Clone, Copy)]
pub enum ElementRef<'a> {
    Vertex(&'a Vertex),
    Edge(&'a Edge),
    Value(&'a PropertyValue),
}

impl<'a> ElementRef<'a> {
    pub fn kind(&self) -> ElementKind {
        match self {
            ElementRef::Vertex(_) => ElementKind::Vertex,
            ElementRef::Edge(_) => ElementKind::Edge,
            ElementRef::Value(_) => ElementKind::Value,
        }
    }

    /// Property bound to `key`; map values expose their entries
    pub fn property(&self, key: &str) -> Option<&'a PropertyValue> {
        match self {
            ElementRef::Vertex(v) => v.get_property(key),
            ElementRef::Edge(e) => e.get_property(key),
            ElementRef::Value(PropertyValue::Map(map)) => map.get(key),
            ElementRef::Value(_) => None,
        }
    }

    pub fn label(&self) -> Option<&'a str> {
        match self {
            ElementRef::Vertex(v) => Some(v.label.as_str()),
            ElementRef::Edge(e) => Some(e.label.as_str()),
            ElementRef::Value(_) => None,
        }
    }

    pub fn as_vertex(&self) -> Option<&'a Vertex> {
        match self {
            ElementRef::Vertex(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_edge(&self) -> Option<&'a Edge> {
        match self {
            ElementRef::Edge(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_value(&self) -> Option<&'a PropertyValue> {
        match self {
            ElementRef::Value(value) => Some(value),
            _ => None,
        }
    }
}

/// Identity of a stored graph element, used in error reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementId {
    Vertex(VertexId),
    Edge(EdgeId),
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementId::Vertex(id) => write!(f, "{}", id),
            ElementId::Edge(id) => write!(f, "{}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphStore;
    use crate::props;
    use std::collections::HashSet;

    #[test]
    fn test_element_identity() {
        let mut set = HashSet::new();
        assert!(set.insert(Element::Vertex(VertexId::new(1))));
        assert!(!set.insert(Element::Vertex(VertexId::new(1))));
        assert!(set.insert(Element::Edge(EdgeId::new(1))));
        assert!(set.insert(Element::Value(PropertyValue::Integer(1))));
        assert!(!set.insert(Element::Value(PropertyValue::Integer(1))));
    }

    #[test]
    fn test_resolve_and_property_access() {
        let mut store = GraphStore::new();
        let v = store
            .add_vertex_with_label("person", props! { "name" => "vadas" })
            .unwrap();

        let element = Element::from(v);
        let resolved = element.resolve(&store).unwrap();
        assert_eq!(resolved.kind(), ElementKind::Vertex);
        assert_eq!(resolved.label(), Some("person"));
        assert_eq!(resolved.property("name").unwrap().as_string(), Some("vadas"));
        assert!(resolved.property("age").is_none());

        let missing = Element::Vertex(VertexId::new(42));
        assert_eq!(
            missing.resolve(&store).unwrap_err(),
            TraversalError::Graph(GraphError::VertexNotFound(VertexId::new(42)))
        );
    }

    #[test]
    fn test_map_values_expose_entries() {
        let value = PropertyValue::Map(props! { "lang" => "java" });
        let element = Element::Value(value);
        let store = GraphStore::new();
        let resolved = element.resolve(&store).unwrap();
        assert_eq!(resolved.property("lang").unwrap().as_string(), Some("java"));
        assert_eq!(resolved.label(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Element::Vertex(VertexId::new(3)).to_string(), "v[3]");
        assert_eq!(Element::Edge(EdgeId::new(9)).to_string(), "e[9]");
        assert_eq!(Element::Value("x".into()).to_string(), "\"x\"");
        assert_eq!(ElementKind::Edge.to_string(), "Edge");
    }
}
