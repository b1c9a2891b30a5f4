//! Kremlin
//!
//! An embeddable in-memory property graph with a Gremlin-style traversal
//! engine.
//!
//! # Architecture
//!
//! - [`graph`]: vertices, edges, properties and adjacency lookup
//! - [`traversal`]: fluent pipeline builder, compiled pipelines and a lazy,
//!   pull-based executor
//! - [`config`]: store and execution settings
//!
//! Builder methods never share a name across variants: `out`, `in_` and
//! `both` move to vertices, `out_e`, `in_e` and `both_e` move to edges.
//!
//! ## Example Usage
//!
//! ```rust
//! use kremlin::{execute, props, GraphStore, PipelineBuilder, PropertyValue};
//!
//! let mut store = GraphStore::new();
//! let marko = store.add_vertex_with_label("person", props! { "name" => "marko" }).unwrap();
//! let vadas = store.add_vertex_with_label("person", props! { "name" => "vadas" }).unwrap();
//! let josh = store.add_vertex_with_label("person", props! { "name" => "josh" }).unwrap();
//! store.add_edge(marko, vadas, "knows", props! {}).unwrap();
//! store.add_edge(marko, josh, "knows", props! {}).unwrap();
//!
//! // g.V(marko).out("knows").values("name")
//! let pipeline = PipelineBuilder::vertices()
//!     .out(&["knows"])
//!     .property("name")
//!     .compile()
//!     .unwrap();
//!
//! let names = execute(&pipeline, &store, marko).to_list(None).unwrap();
//! let names: Vec<_> = names.into_iter().filter_map(|e| e.into_value()).collect();
//! assert_eq!(names, vec![PropertyValue::from("vadas"), PropertyValue::from("josh")]);
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod graph;
pub mod traversal;

// Re-export main types for convenience
pub use config::{ExecutionConfig, KremlinConfig, StoreConfig};

pub use graph::{
    Direction, Edge, EdgeId, EdgeLabel, GraphError, GraphRead, GraphResult, GraphStore, Label,
    PropertyMap, PropertyValue, Vertex, VertexId,
};

pub use traversal::{
    count, drop_elements, execute, execute_with_config, first, to_list, Cursor, Element,
    ElementKind, ElementRef, Pipeline, PipelineBuilder, Predicate, Seeds, Step, TraversalError,
    TraversalResult, DEFAULT_INFLATE_DEPTH,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let ver = version();
        assert!(!ver.is_empty());
        assert_eq!(ver, "0.1.0");
    }
}
