//! Traversal steps
//!
//! A step turns each input element into zero, one or many output elements.
//! Steps are plain data; the executor maps each one onto a physical operator.

use crate::graph::{Direction, EdgeLabel, PropertyValue};
use crate::traversal::executor::{ElementKind, ElementRef};
use std::fmt;
use std::sync::Arc;

/// Signature of caller-supplied filter closures
pub type PredicateFn = dyn Fn(&ElementRef<'_>) -> bool + Send + Sync;

/// Filter condition evaluated against a resolved element
#[derive(Clone)]
pub enum Predicate {
    /// Element label equals the given one (values never match)
    HasLabel(String),
    /// Element carries the property key
    HasKey(String),
    /// Element carries the property with exactly this value
    Has(String, PropertyValue),
    /// Arbitrary closure
    Custom(Arc<PredicateFn>),
}

impl Predicate {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&ElementRef<'_>) -> bool + Send + Sync + 'static,
    {
        Predicate::Custom(Arc::new(f))
    }

    /// Evaluate the predicate
    pub fn test(&self, element: &ElementRef<'_>) -> bool {
        match self {
            Predicate::HasLabel(label) => element.label() == Some(label.as_str()),
            Predicate::HasKey(key) => element.property(key).is_some(),
            Predicate::Has(key, value) => element.property(key) == Some(value),
            Predicate::Custom(f) => f(element),
        }
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::HasLabel(label) => f.debug_tuple("HasLabel").field(label).finish(),
            Predicate::HasKey(key) => f.debug_tuple("HasKey").field(key).finish(),
            Predicate::Has(key, value) => f.debug_tuple("Has").field(key).field(value).finish(),
            Predicate::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Depth used by `inflate_edges` callers that have no better idea
pub const DEFAULT_INFLATE_DEPTH: i64 = 3;

/// One traversal operation
#[derive(Debug, Clone)]
pub enum Step {
    /// Keep elements satisfying the predicate
    Filter(Predicate),
    /// Replace each element with its adjacent vertices
    ExpandTo {
        direction: Direction,
        labels: Vec<EdgeLabel>,
    },
    /// Replace each vertex with its incident edges
    ExpandEdges {
        direction: Direction,
        labels: Vec<EdgeLabel>,
    },
    /// Replace each element with the value bound to a key
    Property(String),
    /// Replace each element with a map of its id, label and properties
    ElementMap,
    /// Keep at most n elements
    Limit(i64),
    /// Drop the first n elements
    Skip(i64),
    /// Drop repeated elements
    Dedup,
    /// Run `body` on each element `times` times over, keeping the last pass
    /// or, with `emit`, every pass
    Repeat {
        body: Arc<[Step]>,
        times: i64,
        emit: bool,
    },
    /// Replace each vertex with its element map, nesting the targets of its
    /// outgoing edges under the edge labels up to `depth` hops
    Inflate { depth: i64 },
}

impl Step {
    /// Short name used in logs and error messages
    pub fn name(&self) -> &'static str {
        match self {
            Step::Filter(_) => "filter",
            Step::ExpandTo { .. } => "expand_to",
            Step::ExpandEdges { .. } => "expand_edges",
            Step::Property(_) => "property",
            Step::ElementMap => "element_map",
            Step::Limit(_) => "limit",
            Step::Skip(_) => "skip",
            Step::Dedup => "dedup",
            Step::Repeat { .. } => "repeat",
            Step::Inflate { .. } => "inflate",
        }
    }

    /// Kind produced for a given input kind, or None if the input is unsupported
    pub fn output_kind(&self, input: ElementKind) -> Option<ElementKind> {
        match (self, input) {
            (Step::Filter(_) | Step::Limit(_) | Step::Skip(_) | Step::Dedup, kind) => Some(kind),
            (Step::ExpandTo { .. }, ElementKind::Vertex | ElementKind::Edge) => {
                Some(ElementKind::Vertex)
            }
            (Step::ExpandEdges { .. }, ElementKind::Vertex) => Some(ElementKind::Edge),
            (Step::Property(_) | Step::ElementMap, ElementKind::Vertex | ElementKind::Edge) => {
                Some(ElementKind::Value)
            }
            (Step::Repeat { body, .. }, kind) if !body.is_empty() => body
                .iter()
                .try_fold(kind, |k, step| step.output_kind(k))
                .filter(|out| *out == kind),
            (Step::Inflate { .. }, ElementKind::Vertex) => Some(ElementKind::Value),
            _ => None,
        }
    }
}
