//! Engine configuration
//!
//! Plain serde-derived structs; every field has a default so partial
//! documents deserialize cleanly.

use serde::{Deserialize, Serialize};

/// Graph store sizing and limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Vertex slots reserved up front
    pub initial_vertex_capacity: usize,
    /// Edge slots reserved up front
    pub initial_edge_capacity: usize,
    /// Maximum number of vertices (None = unlimited)
    pub max_vertices: Option<usize>,
    /// Maximum number of edges (None = unlimited)
    pub max_edges: Option<usize>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            initial_vertex_capacity: 1024,
            initial_edge_capacity: 4096,
            max_vertices: None,
            max_edges: None,
        }
    }
}

/// Defaults applied to traversal executions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Cap used by `to_list(None)` (None = drain everything)
    pub default_max_results: Option<usize>,
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KremlinConfig {
    pub store: StoreConfig,
    pub execution: ExecutionConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = KremlinConfig::default();
        assert_eq!(config.store.initial_vertex_capacity, 1024);
        assert_eq!(config.store.max_vertices, None);
        assert_eq!(config.execution.default_max_results, None);
    }

    #[test]
    fn test_partial_document() {
        let config: KremlinConfig =
            serde_json::from_str(r#"{"store": {"max_edges": 10}}"#).unwrap();
        assert_eq!(config.store.max_edges, Some(10));
        assert_eq!(config.store.initial_edge_capacity, 4096);
        assert_eq!(config.execution, ExecutionConfig::default());
    }

    #[test]
    fn test_round_trip() {
        let config = KremlinConfig {
            store: StoreConfig {
                max_vertices: Some(3),
                ..StoreConfig::default()
            },
            execution: ExecutionConfig {
                default_max_results: Some(50),
            },
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: KremlinConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
