//! Traversal execution engine using the Volcano iterator model
//!
//! `execute` plans a compiled pipeline into a chain of operators and hands
//! back a [`Cursor`]. Nothing runs until the cursor is pulled.

pub mod cursor;
pub mod element;
pub mod operator;
pub mod planner;

pub use cursor::Cursor;
pub use element::{Element, ElementId, ElementKind, ElementRef};
pub use operator::{OperatorBox, StepOperator};
pub use planner::{ExecutionPlan, TraversalPlanner};

use crate::config::ExecutionConfig;
use crate::graph::{EdgeId, GraphRead, GraphStore, PropertyValue, VertexId};
use crate::traversal::pipeline::Pipeline;
use crate::traversal::{TraversalError, TraversalResult};
use tracing::debug;

/// Initial frontier of an execution
#[derive(Debug, Clone, PartialEq)]
pub enum Seeds {
    /// Every vertex, in store order
    AllVertices,
    /// Every edge, in store order
    AllEdges,
    Vertices(Vec<VertexId>),
    Edges(Vec<EdgeId>),
    Values(Vec<PropertyValue>),
}

impl Seeds {
    pub fn kind(&self) -> ElementKind {
        match self {
            Seeds::AllVertices | Seeds::Vertices(_) => ElementKind::Vertex,
            Seeds::AllEdges | Seeds::Edges(_) => ElementKind::Edge,
            Seeds::Values(_) => ElementKind::Value,
        }
    }
}

impl From<VertexId> for Seeds {
    fn from(id: VertexId) -> Self {
        Seeds::Vertices(vec![id])
    }
}

impl From<Vec<VertexId>> for Seeds {
    fn from(ids: Vec<VertexId>) -> Self {
        Seeds::Vertices(ids)
    }
}

impl From<EdgeId> for Seeds {
    fn from(id: EdgeId) -> Self {
        Seeds::Edges(vec![id])
    }
}

impl From<Vec<EdgeId>> for Seeds {
    fn from(ids: Vec<EdgeId>) -> Self {
        Seeds::Edges(ids)
    }
}

impl From<Element> for Seeds {
    fn from(element: Element) -> Self {
        match element {
            Element::Vertex(id) => Seeds::Vertices(vec![id]),
            Element::Edge(id) => Seeds::Edges(vec![id]),
            Element::Value(value) => Seeds::Values(vec![value]),
        }
    }
}

impl From<Vec<PropertyValue>> for Seeds {
    fn from(values: Vec<PropertyValue>) -> Self {
        Seeds::Values(values)
    }
}

/// Run `pipeline` against `graph` starting from `seeds`
pub fn execute<'g, G: GraphRead>(
    pipeline: &Pipeline,
    graph: &'g G,
    seeds: impl Into<Seeds>,
) -> Cursor<'g> {
    execute_with_config(pipeline, graph, seeds, &ExecutionConfig::default())
}

/// Like [`execute`], with execution defaults taken from `config`
pub fn execute_with_config<'g, G: GraphRead>(
    pipeline: &Pipeline,
    graph: &'g G,
    seeds: impl Into<Seeds>,
    config: &ExecutionConfig,
) -> Cursor<'g> {
    let seeds = seeds.into();
    debug!(
        "Executing pipeline: {} steps from {} seeds",
        pipeline.len(),
        seeds.kind()
    );

    match TraversalPlanner::new().plan(pipeline, seeds) {
        Ok(plan) => Cursor::new(graph, plan.root, plan.output_kind, config.clone()),
        Err(err) => Cursor::failed(graph, pipeline.output_kind(), err),
    }
}

/// Drain up to `max_results` elements from `cursor`
pub fn to_list(cursor: &mut Cursor<'_>, max_results: Option<usize>) -> TraversalResult<Vec<Element>> {
    cursor.to_list(max_results)
}

/// First element of `cursor`, if any
pub fn first(cursor: &mut Cursor<'_>) -> TraversalResult<Option<Element>> {
    cursor.first()
}

/// Number of elements left in `cursor`
pub fn count(cursor: &mut Cursor<'_>) -> TraversalResult<usize> {
    cursor.count_results()
}

/// Remove every vertex and edge `pipeline` yields from `store`
///
/// The traversal runs to completion before anything is removed. Removing a
/// vertex also removes its edges. Returns how many yielded elements were
/// removed; repeats and edges already gone with their vertex are not counted.
pub fn drop_elements(
    pipeline: &Pipeline,
    store: &mut GraphStore,
    seeds: impl Into<Seeds>,
) -> TraversalResult<usize> {
    if pipeline.output_kind() == ElementKind::Value {
        return Err(TraversalError::InvalidPipeline {
            index: None,
            reason: "drop needs vertices or edges, pipeline yields Value elements".to_string(),
        });
    }

    let targets = execute(pipeline, &*store, seeds).to_list(None)?;

    let mut removed = 0;
    for element in targets {
        match element {
            Element::Vertex(id) if store.has_vertex(id) => {
                store.remove_vertex(id)?;
                removed += 1;
            }
            Element::Edge(id) if store.has_edge(id) => {
                store.remove_edge(id)?;
                removed += 1;
            }
            _ => {}
        }
    }

    debug!("Dropped {} elements", removed);
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphStore;
    use crate::props;
    use crate::traversal::PipelineBuilder;

    fn int(n: i64) -> Element {
        Element::Value(PropertyValue::Integer(n))
    }

    fn one_to_ten() -> Seeds {
        Seeds::Values((1..=10).map(PropertyValue::Integer).collect())
    }

    #[test]
    fn test_filter_even_values() {
        let store = GraphStore::new();
        let pipeline = PipelineBuilder::new(ElementKind::Value)
            .filter(|e| e.as_value().and_then(PropertyValue::as_integer).map_or(false, |n| n % 2 == 0))
            .compile()
            .unwrap();

        let mut cursor = execute(&pipeline, &store, one_to_ten());
        assert_eq!(
            to_list(&mut cursor, None).unwrap(),
            vec![int(2), int(4), int(6), int(8), int(10)]
        );
    }

    #[test]
    fn test_terminal_then_terminal_is_exhausted() {
        let store = GraphStore::new();
        let pipeline = PipelineBuilder::new(ElementKind::Value).dedup().compile().unwrap();

        let mut cursor = execute(&pipeline, &store, one_to_ten());
        assert_eq!(to_list(&mut cursor, Some(3)).unwrap().len(), 3);
        assert!(cursor.is_exhausted());
        assert_eq!(first(&mut cursor).unwrap_err(), TraversalError::ExhaustedCursor);
        assert_eq!(count(&mut cursor).unwrap_err(), TraversalError::ExhaustedCursor);

        let mut cursor = execute(&pipeline, &store, one_to_ten());
        assert_eq!(first(&mut cursor).unwrap(), Some(int(1)));
        assert_eq!(to_list(&mut cursor, None).unwrap_err(), TraversalError::ExhaustedCursor);
    }

    #[test]
    fn test_iterator_then_terminal() {
        let store = GraphStore::new();
        let pipeline = PipelineBuilder::new(ElementKind::Value).skip(0).compile().unwrap();

        let mut cursor = execute(&pipeline, &store, one_to_ten());
        let head: Vec<_> = cursor.by_ref().take(2).collect::<TraversalResult<_>>().unwrap();
        assert_eq!(head, vec![int(1), int(2)]);
        assert_eq!(cursor.produced(), 2);

        // a partially iterated cursor still accepts one terminal
        assert_eq!(count(&mut cursor).unwrap(), 8);
        assert!(cursor.next().is_none());
        assert_eq!(count(&mut cursor).unwrap_err(), TraversalError::ExhaustedCursor);
    }

    #[test]
    fn test_seed_kind_mismatch_surfaces_on_first_pull() {
        let store = GraphStore::new();
        let pipeline = PipelineBuilder::vertices().out(&[]).compile().unwrap();

        let mut cursor = execute(&pipeline, &store, Seeds::AllEdges);
        assert!(!cursor.is_exhausted());
        assert!(matches!(
            cursor.to_list(None).unwrap_err(),
            TraversalError::SeedKindMismatch { .. }
        ));
        assert_eq!(cursor.first().unwrap_err(), TraversalError::ExhaustedCursor);
    }

    #[test]
    fn test_missing_seed_vertex() {
        let mut store = GraphStore::new();
        let v = store.add_vertex(props! {}).unwrap();
        let pipeline = PipelineBuilder::vertices().out(&[]).compile().unwrap();

        let mut cursor = execute(&pipeline, &store, vec![v, VertexId::new(77)]);
        assert_eq!(
            cursor.to_list(None).unwrap_err(),
            TraversalError::Graph(crate::graph::GraphError::VertexNotFound(VertexId::new(77)))
        );
    }

    #[test]
    fn test_default_max_results() {
        let store = GraphStore::new();
        let pipeline = PipelineBuilder::new(ElementKind::Value).dedup().compile().unwrap();
        let config = ExecutionConfig {
            default_max_results: Some(4),
        };

        let mut cursor = execute_with_config(&pipeline, &store, one_to_ten(), &config);
        assert_eq!(cursor.to_list(None).unwrap().len(), 4);

        let mut cursor = execute_with_config(&pipeline, &store, one_to_ten(), &config);
        assert_eq!(cursor.to_list(Some(6)).unwrap().len(), 6);
    }

    #[test]
    fn test_drop_elements() {
        let mut store = GraphStore::new();
        let a = store.add_vertex_with_label("person", props! {}).unwrap();
        let b = store.add_vertex_with_label("person", props! {}).unwrap();
        let c = store.add_vertex_with_label("software", props! {}).unwrap();
        store.add_edge(a, b, "knows", props! {}).unwrap();
        store.add_edge(a, c, "created", props! {}).unwrap();
        store.add_edge(b, c, "created", props! {}).unwrap();

        let created = PipelineBuilder::edges().has_label("created").compile().unwrap();
        assert_eq!(drop_elements(&created, &mut store, Seeds::AllEdges).unwrap(), 2);
        assert_eq!(store.edge_count(), 1);

        // the same vertex reached twice is removed once
        let people = PipelineBuilder::vertices().both(&[]).compile().unwrap();
        assert_eq!(drop_elements(&people, &mut store, vec![a, b]).unwrap(), 2);
        assert_eq!(store.vertex_count(), 1);
        assert!(store.has_vertex(c));
        assert_eq!(store.edge_count(), 0);

        let names = PipelineBuilder::vertices().property("name").compile().unwrap();
        assert!(matches!(
            drop_elements(&names, &mut store, Seeds::AllVertices),
            Err(TraversalError::InvalidPipeline { index: None, .. })
        ));
        assert_eq!(store.vertex_count(), 1);
    }

    #[test]
    fn test_seeds_from() {
        assert_eq!(Seeds::from(VertexId::new(1)).kind(), ElementKind::Vertex);
        assert_eq!(Seeds::from(vec![EdgeId::new(1)]).kind(), ElementKind::Edge);
        assert_eq!(Seeds::from(vec![PropertyValue::Null]).kind(), ElementKind::Value);
        assert_eq!(
            Seeds::from(Element::Edge(EdgeId::new(2))),
            Seeds::Edges(vec![EdgeId::new(2)])
        );
    }
}
