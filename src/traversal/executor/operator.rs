//! Physical operators for traversal execution
//!
//! Each step maps onto one operator. Operators form a chain and are pulled
//! one element at a time (Volcano iterator model), so nothing upstream runs
//! unless something downstream asks for it.

use super::element::{Element, ElementId, ElementKind};
use super::planner;
use super::Seeds;
use crate::graph::store::label_matches;
use crate::graph::{
    Direction, Edge, EdgeId, EdgeLabel, GraphError, GraphRead, PropertyMap, PropertyValue, Vertex,
    VertexId,
};
use crate::traversal::step::{Predicate, Step};
use crate::traversal::{TraversalError, TraversalResult};
use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tracing::trace;

/// Physical operator trait
pub trait StepOperator: Send {
    /// Produce the next element, or None once the input is drained
    fn next(&mut self, graph: &dyn GraphRead) -> TraversalResult<Option<Element>>;
}

pub type OperatorBox = Box<dyn StepOperator>;

fn vertex_in<'g>(graph: &'g dyn GraphRead, id: VertexId) -> TraversalResult<&'g Vertex> {
    graph
        .vertex(id)
        .ok_or_else(|| TraversalError::Graph(GraphError::VertexNotFound(id)))
}

fn edge_in<'g>(graph: &'g dyn GraphRead, id: EdgeId) -> TraversalResult<&'g Edge> {
    graph
        .edge(id)
        .ok_or_else(|| TraversalError::Graph(GraphError::EdgeNotFound(id)))
}

/// Endpoint of `edge`, failing if the store no longer holds it
fn endpoint(graph: &dyn GraphRead, edge: &Edge, id: VertexId) -> TraversalResult<Element> {
    if graph.vertex(id).is_some() {
        Ok(Element::Vertex(id))
    } else {
        Err(TraversalError::dangling(ElementId::Edge(edge.id), ElementId::Vertex(id)))
    }
}

/// Seed operator: emits the initial frontier
///
/// Seeds are checked and resolved on the first pull, not at construction.
pub struct SeedOperator {
    root: ElementKind,
    seeds: Option<Seeds>,
    pending: VecDeque<Element>,
}

impl SeedOperator {
    pub fn new(root: ElementKind, seeds: Seeds) -> Self {
        Self {
            root,
            seeds: Some(seeds),
            pending: VecDeque::new(),
        }
    }

    fn resolve(&mut self, seeds: Seeds, graph: &dyn GraphRead) -> TraversalResult<()> {
        if seeds.kind() != self.root {
            return Err(TraversalError::SeedKindMismatch {
                root: self.root,
                seeds: seeds.kind(),
            });
        }

        self.pending = match seeds {
            Seeds::AllVertices => graph.vertex_ids().into_iter().map(Element::Vertex).collect(),
            Seeds::AllEdges => graph.edge_ids().into_iter().map(Element::Edge).collect(),
            Seeds::Vertices(ids) => ids.into_iter().map(Element::Vertex).collect(),
            Seeds::Edges(ids) => ids.into_iter().map(Element::Edge).collect(),
            Seeds::Values(values) => values.into_iter().map(Element::Value).collect(),
        };
        trace!("Resolved {} seeds", self.pending.len());
        Ok(())
    }
}

impl StepOperator for SeedOperator {
    fn next(&mut self, graph: &dyn GraphRead) -> TraversalResult<Option<Element>> {
        if let Some(seeds) = self.seeds.take() {
            self.resolve(seeds, graph)?;
        }

        match self.pending.pop_front() {
            Some(element) => {
                // Explicit IDs may name elements the store never had
                element.resolve(graph)?;
                Ok(Some(element))
            }
            None => Ok(None),
        }
    }
}

/// Filter operator: keeps elements matching a predicate
pub struct FilterOperator {
    input: OperatorBox,
    predicate: Predicate,
}

impl FilterOperator {
    pub fn new(input: OperatorBox, predicate: Predicate) -> Self {
        Self { input, predicate }
    }
}

impl StepOperator for FilterOperator {
    fn next(&mut self, graph: &dyn GraphRead) -> TraversalResult<Option<Element>> {
        while let Some(element) = self.input.next(graph)? {
            if self.predicate.test(&element.resolve(graph)?) {
                return Ok(Some(element));
            }
            trace!("Filtered out {}", element);
        }
        Ok(None)
    }
}

/// Expand operator: replaces each element with adjacent vertices
///
/// Expansion of one source element is buffered, then drained before the
/// next source is pulled.
pub struct ExpandOperator {
    input: OperatorBox,
    direction: Direction,
    labels: Vec<EdgeLabel>,
    buffer: VecDeque<Element>,
}

impl ExpandOperator {
    pub fn new(input: OperatorBox, direction: Direction, labels: Vec<EdgeLabel>) -> Self {
        Self {
            input,
            direction,
            labels,
            buffer: VecDeque::new(),
        }
    }

    fn expand(&mut self, element: &Element, graph: &dyn GraphRead) -> TraversalResult<()> {
        match element {
            Element::Vertex(id) => {
                let neighbors = graph.neighbors(*id, self.direction, &self.labels)?;
                self.buffer
                    .extend(neighbors.into_iter().map(|v| Element::Vertex(v.id)));
            }
            Element::Edge(id) => {
                let edge = edge_in(graph, *id)?;
                if !label_matches(&self.labels, edge) {
                    return Ok(());
                }
                let ends = match self.direction {
                    Direction::Out => vec![edge.target],
                    Direction::In => vec![edge.source],
                    Direction::Both => vec![edge.source, edge.target],
                };
                for id in ends {
                    self.buffer.push_back(endpoint(graph, edge, id)?);
                }
            }
            Element::Value(_) => {}
        }
        trace!("Expanded {} into {} vertices", element, self.buffer.len());
        Ok(())
    }
}

impl StepOperator for ExpandOperator {
    fn next(&mut self, graph: &dyn GraphRead) -> TraversalResult<Option<Element>> {
        loop {
            if let Some(element) = self.buffer.pop_front() {
                return Ok(Some(element));
            }
            match self.input.next(graph)? {
                Some(source) => self.expand(&source, graph)?,
                None => return Ok(None),
            }
        }
    }
}

/// Expand-edges operator: replaces each vertex with its incident edges
pub struct ExpandEdgesOperator {
    input: OperatorBox,
    direction: Direction,
    labels: Vec<EdgeLabel>,
    buffer: VecDeque<Element>,
}

impl ExpandEdgesOperator {
    pub fn new(input: OperatorBox, direction: Direction, labels: Vec<EdgeLabel>) -> Self {
        Self {
            input,
            direction,
            labels,
            buffer: VecDeque::new(),
        }
    }
}

impl StepOperator for ExpandEdgesOperator {
    fn next(&mut self, graph: &dyn GraphRead) -> TraversalResult<Option<Element>> {
        loop {
            if let Some(element) = self.buffer.pop_front() {
                return Ok(Some(element));
            }
            let Some(source) = self.input.next(graph)? else {
                return Ok(None);
            };
            if let Element::Vertex(id) = source {
                let edges = graph.incident_edges(id, self.direction, &self.labels)?;
                self.buffer
                    .extend(edges.into_iter().map(|(edge, _)| Element::Edge(edge.id)));
                trace!("Expanded {} into {} edges", source, self.buffer.len());
            }
        }
    }
}

/// Property operator: replaces each element with one of its property values
///
/// Elements without the key are dropped.
pub struct PropertyOperator {
    input: OperatorBox,
    key: String,
}

impl PropertyOperator {
    pub fn new(input: OperatorBox, key: String) -> Self {
        Self { input, key }
    }
}

impl StepOperator for PropertyOperator {
    fn next(&mut self, graph: &dyn GraphRead) -> TraversalResult<Option<Element>> {
        while let Some(element) = self.input.next(graph)? {
            if let Some(value) = element.resolve(graph)?.property(&self.key) {
                return Ok(Some(Element::Value(value.clone())));
            }
            trace!("{} has no property '{}'", element, self.key);
        }
        Ok(None)
    }
}

/// Element-map operator: replaces each vertex or edge with a map value
///
/// The map holds every property plus `id` and `label`, and `source` and
/// `target` for edges. Those reserved keys shadow properties of the same name.
pub struct ElementMapOperator {
    input: OperatorBox,
}

impl ElementMapOperator {
    pub fn new(input: OperatorBox) -> Self {
        Self { input }
    }
}

fn id_value(id: u64) -> TraversalResult<PropertyValue> {
    PropertyValue::try_from(id).map_err(|_| TraversalError::Graph(GraphError::IdOutOfRange(id)))
}

/// Properties of a vertex or edge plus its identity keys
fn element_map(graph: &dyn GraphRead, element: &Element) -> TraversalResult<Option<PropertyMap>> {
    let map = match element {
        Element::Vertex(id) => {
            let vertex = vertex_in(graph, *id)?;
            let mut map = vertex.properties.clone();
            map.insert("id".to_string(), id_value(id.as_u64())?);
            map.insert("label".to_string(), vertex.label.as_str().into());
            map
        }
        Element::Edge(id) => {
            let edge = edge_in(graph, *id)?;
            let mut map = edge.properties.clone();
            map.insert("id".to_string(), id_value(id.as_u64())?);
            map.insert("label".to_string(), edge.label.as_str().into());
            map.insert("source".to_string(), id_value(edge.source.as_u64())?);
            map.insert("target".to_string(), id_value(edge.target.as_u64())?);
            map
        }
        Element::Value(_) => return Ok(None),
    };
    Ok(Some(map))
}

impl StepOperator for ElementMapOperator {
    fn next(&mut self, graph: &dyn GraphRead) -> TraversalResult<Option<Element>> {
        let Some(element) = self.input.next(graph)? else {
            return Ok(None);
        };
        match element_map(graph, &element)? {
            Some(map) => Ok(Some(Element::Value(PropertyValue::Map(map)))),
            None => Ok(Some(element)),
        }
    }
}

/// Repeat operator: runs a sub-pipeline on each element a bounded number of times
///
/// Results come out depth first: an element is followed by everything the
/// next iterations derive from it. Without `emit`, only elements produced
/// by the last iteration are yielded; with it, those of every iteration are.
pub struct RepeatOperator {
    input: OperatorBox,
    body: Arc<[Step]>,
    kind: ElementKind,
    times: usize,
    emit: bool,
    /// Elements waiting to be yielded or iterated, with their iteration count
    stack: Vec<(Element, usize)>,
}

impl RepeatOperator {
    pub fn new(
        input: OperatorBox,
        body: Arc<[Step]>,
        kind: ElementKind,
        times: usize,
        emit: bool,
    ) -> Self {
        Self {
            input,
            body,
            kind,
            times,
            emit,
            stack: Vec::new(),
        }
    }

    /// One pass of the body over a single element
    fn iterate(&self, element: &Element, graph: &dyn GraphRead) -> TraversalResult<Vec<Element>> {
        let seed: OperatorBox = Box::new(SeedOperator::new(self.kind, Seeds::from(element.clone())));
        let mut body = planner::chain(&self.body, seed, self.kind)?;

        let mut out = Vec::new();
        while let Some(next) = body.next(graph)? {
            out.push(next);
        }
        Ok(out)
    }
}

impl StepOperator for RepeatOperator {
    fn next(&mut self, graph: &dyn GraphRead) -> TraversalResult<Option<Element>> {
        loop {
            if let Some((element, depth)) = self.stack.pop() {
                if depth < self.times {
                    let derived = self.iterate(&element, graph)?;
                    trace!("Repeat pass {} of {} gave {} elements", depth + 1, element, derived.len());
                    self.stack
                        .extend(derived.into_iter().rev().map(|e| (e, depth + 1)));
                }
                if depth == self.times || (self.emit && depth > 0) {
                    return Ok(Some(element));
                }
                continue;
            }

            match self.input.next(graph)? {
                Some(element) => self.stack.push((element, 0)),
                None => return Ok(None),
            }
        }
    }
}

/// Inflate operator: replaces each vertex with a nested map of what it points to
///
/// The map is the vertex's element map. Every outgoing edge adds an entry
/// keyed by the edge label whose value is the target's nested map, down to
/// `depth` hops. Labels ending in `List` gather their targets into an array;
/// for any other label the last edge wins.
pub struct InflateOperator {
    input: OperatorBox,
    depth: usize,
}

impl InflateOperator {
    pub fn new(input: OperatorBox, depth: usize) -> Self {
        Self { input, depth }
    }
}

fn inflate(graph: &dyn GraphRead, id: VertexId, depth: usize) -> TraversalResult<PropertyMap> {
    let mut map = element_map(graph, &Element::Vertex(id))?.unwrap_or_default();
    if depth == 0 {
        return Ok(map);
    }

    for (edge, _) in graph.incident_edges(id, Direction::Out, &[])? {
        endpoint(graph, edge, edge.target)?;
        let child = PropertyValue::Map(inflate(graph, edge.target, depth - 1)?);
        let key = edge.label.as_str();
        if !key.ends_with("List") {
            map.insert(key.to_string(), child);
            continue;
        }
        match map.entry(key.to_string()) {
            Entry::Occupied(mut slot) => match slot.get_mut() {
                PropertyValue::Array(items) => items.push(child),
                other => *other = PropertyValue::Array(vec![child]),
            },
            Entry::Vacant(slot) => {
                slot.insert(PropertyValue::Array(vec![child]));
            }
        }
    }
    Ok(map)
}

impl StepOperator for InflateOperator {
    fn next(&mut self, graph: &dyn GraphRead) -> TraversalResult<Option<Element>> {
        let Some(element) = self.input.next(graph)? else {
            return Ok(None);
        };
        match element {
            Element::Vertex(id) => {
                let map = inflate(graph, id, self.depth)?;
                Ok(Some(Element::Value(PropertyValue::Map(map))))
            }
            other => Ok(Some(other)),
        }
    }
}

/// Limit operator: yields at most `limit` elements
///
/// Stops pulling its input once the limit is reached.
pub struct LimitOperator {
    input: OperatorBox,
    limit: usize,
    count: usize,
}

impl LimitOperator {
    pub fn new(input: OperatorBox, limit: usize) -> Self {
        Self {
            input,
            limit,
            count: 0,
        }
    }
}

impl StepOperator for LimitOperator {
    fn next(&mut self, graph: &dyn GraphRead) -> TraversalResult<Option<Element>> {
        if self.count >= self.limit {
            return Ok(None);
        }

        if let Some(element) = self.input.next(graph)? {
            self.count += 1;
            Ok(Some(element))
        } else {
            Ok(None)
        }
    }
}

/// Skip operator: discards the first `skip` elements
pub struct SkipOperator {
    input: OperatorBox,
    remaining: usize,
}

impl SkipOperator {
    pub fn new(input: OperatorBox, skip: usize) -> Self {
        Self {
            input,
            remaining: skip,
        }
    }
}

impl StepOperator for SkipOperator {
    fn next(&mut self, graph: &dyn GraphRead) -> TraversalResult<Option<Element>> {
        while self.remaining > 0 {
            if self.input.next(graph)?.is_none() {
                self.remaining = 0;
                return Ok(None);
            }
            self.remaining -= 1;
        }
        self.input.next(graph)
    }
}

/// Dedup operator: drops elements already seen
pub struct DedupOperator {
    input: OperatorBox,
    seen: FxHashSet<Element>,
}

impl DedupOperator {
    pub fn new(input: OperatorBox) -> Self {
        Self {
            input,
            seen: FxHashSet::default(),
        }
    }
}

impl StepOperator for DedupOperator {
    fn next(&mut self, graph: &dyn GraphRead) -> TraversalResult<Option<Element>> {
        while let Some(element) = self.input.next(graph)? {
            if self.seen.insert(element.clone()) {
                return Ok(Some(element));
            }
        }
        Ok(None)
    }
}
