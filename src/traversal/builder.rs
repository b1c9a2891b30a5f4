//! Fluent pipeline builder
//!
//! Every method consumes the builder and returns it, so a chain reads in the
//! same order the steps execute. Each variant of a step family gets its own
//! name (`out`, `in_`, `both`, ...) rather than sharing an overloaded one.

use crate::graph::{Direction, EdgeLabel, PropertyValue};
use crate::traversal::executor::{ElementKind, ElementRef};
use crate::traversal::pipeline::Pipeline;
use crate::traversal::step::{Predicate, Step};
use crate::traversal::TraversalResult;

/// Accumulates steps for a [`Pipeline`]
#[derive(Debug, Clone)]
pub struct PipelineBuilder {
    root: ElementKind,
    steps: Vec<Step>,
}

fn edge_labels(labels: &[&str]) -> Vec<EdgeLabel> {
    labels.iter().map(|l| EdgeLabel::new(*l)).collect()
}

impl PipelineBuilder {
    /// Start a pipeline whose seeds are of `root` kind
    pub fn new(root: ElementKind) -> Self {
        Self {
            root,
            steps: Vec::new(),
        }
    }

    /// Start a pipeline over vertices
    pub fn vertices() -> Self {
        Self::new(ElementKind::Vertex)
    }

    /// Start a pipeline over edges
    pub fn edges() -> Self {
        Self::new(ElementKind::Edge)
    }

    pub fn root(&self) -> ElementKind {
        self.root
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Append a raw step
    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn filter<F>(self, predicate: F) -> Self
    where
        F: Fn(&ElementRef<'_>) -> bool + Send + Sync + 'static,
    {
        self.step(Step::Filter(Predicate::custom(predicate)))
    }

    pub fn has(self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.step(Step::Filter(Predicate::Has(key.into(), value.into())))
    }

    pub fn has_key(self, key: impl Into<String>) -> Self {
        self.step(Step::Filter(Predicate::HasKey(key.into())))
    }

    pub fn has_label(self, label: impl Into<String>) -> Self {
        self.step(Step::Filter(Predicate::HasLabel(label.into())))
    }

    /// Move to adjacent vertices; an empty label list follows every edge
    pub fn expand_to(self, direction: Direction, labels: &[&str]) -> Self {
        self.step(Step::ExpandTo {
            direction,
            labels: edge_labels(labels),
        })
    }

    pub fn out(self, labels: &[&str]) -> Self {
        self.expand_to(Direction::Out, labels)
    }

    pub fn in_(self, labels: &[&str]) -> Self {
        self.expand_to(Direction::In, labels)
    }

    pub fn both(self, labels: &[&str]) -> Self {
        self.expand_to(Direction::Both, labels)
    }

    /// Move to incident edges; an empty label list keeps every edge
    pub fn expand_edges(self, direction: Direction, labels: &[&str]) -> Self {
        self.step(Step::ExpandEdges {
            direction,
            labels: edge_labels(labels),
        })
    }

    pub fn out_e(self, labels: &[&str]) -> Self {
        self.expand_edges(Direction::Out, labels)
    }

    pub fn in_e(self, labels: &[&str]) -> Self {
        self.expand_edges(Direction::In, labels)
    }

    pub fn both_e(self, labels: &[&str]) -> Self {
        self.expand_edges(Direction::Both, labels)
    }

    pub fn property(self, key: impl Into<String>) -> Self {
        self.step(Step::Property(key.into()))
    }

    pub fn element_map(self) -> Self {
        self.step(Step::ElementMap)
    }

    /// Keep at most `n` elements; negative values are rejected by `compile`
    pub fn limit(self, n: i64) -> Self {
        self.step(Step::Limit(n))
    }

    /// Skip the first `n` elements; negative values are rejected by `compile`
    pub fn skip(self, n: i64) -> Self {
        self.step(Step::Skip(n))
    }

    pub fn dedup(self) -> Self {
        self.step(Step::Dedup)
    }

    /// Run the steps of `body` `times` times over, keeping the last pass
    ///
    /// The body starts from whatever kind the pipeline holds at this point;
    /// its own root kind is not consulted.
    pub fn repeat(self, body: PipelineBuilder, times: i64) -> Self {
        self.step(Step::Repeat {
            body: body.steps.into(),
            times,
            emit: false,
        })
    }

    /// Like [`repeat`](Self::repeat), but keep the output of every pass
    pub fn repeat_emit(self, body: PipelineBuilder, times: i64) -> Self {
        self.step(Step::Repeat {
            body: body.steps.into(),
            times,
            emit: true,
        })
    }

    /// Turn each vertex into a nested map of the vertices it points to
    ///
    /// See [`DEFAULT_INFLATE_DEPTH`](crate::traversal::step::DEFAULT_INFLATE_DEPTH).
    pub fn inflate_edges(self, depth: i64) -> Self {
        self.step(Step::Inflate { depth })
    }

    /// Validate the steps and freeze them into a [`Pipeline`]
    pub fn compile(self) -> TraversalResult<Pipeline> {
        Pipeline::compile(self.root, self.steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_in_declaration_order() {
        let builder = PipelineBuilder::vertices()
            .has_label("person")
            .out(&["knows"])
            .property("name")
            .dedup()
            .limit(2);

        let names: Vec<_> = builder.steps().iter().map(Step::name).collect();
        assert_eq!(names, vec!["filter", "expand_to", "property", "dedup", "limit"]);
        assert_eq!(builder.root(), ElementKind::Vertex);
    }

    #[test]
    fn test_direction_shorthands() {
        let builder = PipelineBuilder::vertices().in_(&[]).both_e(&["created", "knows"]);

        match &builder.steps()[0] {
            Step::ExpandTo { direction, labels } => {
                assert_eq!(*direction, Direction::In);
                assert!(labels.is_empty());
            }
            other => panic!("unexpected step {:?}", other),
        }
        match &builder.steps()[1] {
            Step::ExpandEdges { direction, labels } => {
                assert_eq!(*direction, Direction::Both);
                assert_eq!(labels, &vec![EdgeLabel::new("created"), EdgeLabel::new("knows")]);
            }
            other => panic!("unexpected step {:?}", other),
        }
    }

    #[test]
    fn test_builder_can_be_cloned_and_extended() {
        let base = PipelineBuilder::vertices().has_key("age");
        let a = base.clone().limit(1);
        let b = base.dedup();
        assert_eq!(a.steps().len(), 2);
        assert_eq!(b.steps().len(), 2);
        assert_eq!(b.steps()[1].name(), "dedup");
    }

    #[test]
    fn test_repeat_takes_body_steps() {
        let body = PipelineBuilder::vertices().out_e(&["knows"]).out(&[]);
        let builder = PipelineBuilder::vertices().repeat_emit(body, 3);

        match &builder.steps()[0] {
            Step::Repeat { body, times, emit } => {
                assert_eq!(body.len(), 2);
                assert_eq!(body[0].name(), "expand_edges");
                assert_eq!(*times, 3);
                assert!(*emit);
            }
            other => panic!("unexpected step {:?}", other),
        }
    }
}
