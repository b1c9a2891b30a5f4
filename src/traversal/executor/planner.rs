//! Traversal planner: turns a compiled pipeline into an operator chain

use super::element::ElementKind;
use super::operator::*;
use super::Seeds;
use crate::traversal::pipeline::Pipeline;
use crate::traversal::step::Step;
use crate::traversal::{TraversalError, TraversalResult};
use tracing::debug;

/// Execution plan
pub struct ExecutionPlan {
    /// Last operator of the chain; pulling it drives the whole traversal
    pub root: OperatorBox,
    /// Kind of elements the plan produces
    pub output_kind: ElementKind,
}

/// Traversal planner
#[derive(Debug, Default)]
pub struct TraversalPlanner;

impl TraversalPlanner {
    pub fn new() -> Self {
        Self
    }

    /// Build the operator chain bottom-up, seed first
    pub fn plan(&self, pipeline: &Pipeline, seeds: Seeds) -> TraversalResult<ExecutionPlan> {
        let seed: OperatorBox = Box::new(SeedOperator::new(pipeline.root_kind(), seeds));
        let root = chain(pipeline.steps(), seed, pipeline.root_kind())?;

        debug!(
            "Planned {} operators producing {}",
            pipeline.len() + 1,
            pipeline.output_kind()
        );

        Ok(ExecutionPlan {
            root,
            output_kind: pipeline.output_kind(),
        })
    }
}

/// Stack one operator per step on top of `operator`, which yields `kind`
pub(crate) fn chain(
    steps: &[Step],
    mut operator: OperatorBox,
    mut kind: ElementKind,
) -> TraversalResult<OperatorBox> {
    for (index, step) in steps.iter().enumerate() {
        operator = match step {
            Step::Filter(predicate) => Box::new(FilterOperator::new(operator, predicate.clone())),
            Step::ExpandTo { direction, labels } => {
                Box::new(ExpandOperator::new(operator, *direction, labels.clone()))
            }
            Step::ExpandEdges { direction, labels } => {
                Box::new(ExpandEdgesOperator::new(operator, *direction, labels.clone()))
            }
            Step::Property(key) => Box::new(PropertyOperator::new(operator, key.clone())),
            Step::ElementMap => Box::new(ElementMapOperator::new(operator)),
            Step::Limit(n) => Box::new(LimitOperator::new(operator, step_count(index, step, *n)?)),
            Step::Skip(n) => Box::new(SkipOperator::new(operator, step_count(index, step, *n)?)),
            Step::Dedup => Box::new(DedupOperator::new(operator)),
            Step::Repeat { body, times, emit } => Box::new(RepeatOperator::new(
                operator,
                body.clone(),
                kind,
                step_count(index, step, *times)?,
                *emit,
            )),
            Step::Inflate { depth } => {
                Box::new(InflateOperator::new(operator, step_count(index, step, *depth)?))
            }
        };
        kind = step
            .output_kind(kind)
            .ok_or_else(|| TraversalError::InvalidPipeline {
                index: Some(index),
                reason: format!("{} cannot consume {} elements", step.name(), kind),
            })?;
    }
    Ok(operator)
}

fn step_count(index: usize, step: &Step, n: i64) -> TraversalResult<usize> {
    usize::try_from(n).map_err(|_| TraversalError::InvalidPipeline {
        index: Some(index),
        reason: format!("{} count {} is out of range", step.name(), n),
    })
}
