//! Gremlin-style traversals
//!
//! Build a [`Pipeline`] with [`PipelineBuilder`], then run it with
//! [`execute`] and pull results through the returned [`Cursor`].

pub mod builder;
pub mod executor;
pub mod pipeline;
pub mod step;

pub use builder::PipelineBuilder;
pub use executor::{
    count, drop_elements, execute, execute_with_config, first, to_list, Cursor, Element, ElementId,
    ElementKind, ElementRef, Seeds,
};
pub use pipeline::Pipeline;
pub use step::{Predicate, Step, DEFAULT_INFLATE_DEPTH};

use crate::graph::GraphError;
use thiserror::Error;
use tracing::warn;

/// Traversal errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TraversalError {
    /// Rejected by `compile`; `index` names the offending step
    #[error("Invalid pipeline{}: {reason}", at_step(.index))]
    InvalidPipeline { index: Option<usize>, reason: String },

    /// A stored element refers to another that does not exist
    #[error("Dangling reference: {referrer} refers to missing {missing}")]
    DanglingReference {
        referrer: ElementId,
        missing: ElementId,
    },

    /// Terminal operation on a cursor that has nothing more to give
    #[error("Cursor is exhausted")]
    ExhaustedCursor,

    /// Seeds of a different kind than the pipeline expects
    #[error("Pipeline expects {root} seeds, got {seeds}")]
    SeedKindMismatch {
        root: ElementKind,
        seeds: ElementKind,
    },

    #[error("Graph error: {0}")]
    Graph(#[source] GraphError),
}

pub type TraversalResult<T> = Result<T, TraversalError>;

impl TraversalError {
    pub(crate) fn dangling(referrer: ElementId, missing: ElementId) -> Self {
        warn!("Dangling reference: {} refers to missing {}", referrer, missing);
        TraversalError::DanglingReference { referrer, missing }
    }
}

impl From<GraphError> for TraversalError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::DanglingEdge { vertex, edge } => {
                TraversalError::dangling(ElementId::Vertex(vertex), ElementId::Edge(edge))
            }
            GraphError::DanglingEndpoint { edge, vertex } => {
                TraversalError::dangling(ElementId::Edge(edge), ElementId::Vertex(vertex))
            }
            other => TraversalError::Graph(other),
        }
    }
}

fn at_step(index: &Option<usize>) -> String {
    match index {
        Some(i) => format!(" at step {}", i),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{EdgeId, VertexId};

    #[test]
    fn test_error_messages() {
        let err = TraversalError::InvalidPipeline {
            index: Some(2),
            reason: "limit requires a non-negative count, got -1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid pipeline at step 2: limit requires a non-negative count, got -1"
        );

        let err = TraversalError::InvalidPipeline {
            index: None,
            reason: "pipeline has no steps".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid pipeline: pipeline has no steps");

        let err = TraversalError::DanglingReference {
            referrer: ElementId::Edge(EdgeId::new(4)),
            missing: ElementId::Vertex(VertexId::new(9)),
        };
        assert_eq!(
            err.to_string(),
            "Dangling reference: EdgeId(4) refers to missing VertexId(9)"
        );
    }

    #[test]
    fn test_graph_error_conversion() {
        let err: TraversalError = GraphError::VertexNotFound(VertexId::new(1)).into();
        assert!(matches!(err, TraversalError::Graph(GraphError::VertexNotFound(_))));

        let err: TraversalError = GraphError::DanglingEdge {
            vertex: VertexId::new(1),
            edge: EdgeId::new(2),
        }
        .into();
        assert_eq!(
            err,
            TraversalError::DanglingReference {
                referrer: ElementId::Vertex(VertexId::new(1)),
                missing: ElementId::Edge(EdgeId::new(2)),
            }
        );
    }
}
