//! In-memory property graph
//!
//! This module implements the property graph data model with:
//! - Vertices with one label and arbitrary properties
//! - Directed, labeled edges with properties
//! - Multiple edges between the same pair of vertices
//! - Insertion-ordered adjacency so traversals are deterministic

pub mod edge;
pub mod property;
pub mod store;
pub mod types;
pub mod vertex;

// Re-export main types
pub use edge::Edge;
pub use property::{PropertyMap, PropertyValue};
pub use store::{GraphError, GraphRead, GraphResult, GraphStore};
pub use types::{Direction, EdgeId, EdgeLabel, Label, ParseDirectionError, VertexId};
pub use vertex::Vertex;
