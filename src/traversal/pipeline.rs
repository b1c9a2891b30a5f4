//! Compiled, immutable traversal pipelines

use crate::traversal::builder::PipelineBuilder;
use crate::traversal::executor::ElementKind;
use crate::traversal::step::Step;
use crate::traversal::{TraversalError, TraversalResult};
use std::sync::Arc;
use tracing::debug;

/// A validated sequence of steps
///
/// Cloning is cheap and a pipeline can be executed any number of times,
/// from any number of threads.
#[derive(Debug, Clone)]
pub struct Pipeline {
    root: ElementKind,
    output: ElementKind,
    steps: Arc<[Step]>,
}

impl Pipeline {
    /// Start building a pipeline
    pub fn builder(root: ElementKind) -> PipelineBuilder {
        PipelineBuilder::new(root)
    }

    pub(crate) fn compile(root: ElementKind, steps: Vec<Step>) -> TraversalResult<Self> {
        if steps.is_empty() {
            return Err(TraversalError::InvalidPipeline {
                index: None,
                reason: "pipeline has no steps".to_string(),
            });
        }

        let kind = check_steps(root, &steps).map_err(|(index, reason)| {
            TraversalError::InvalidPipeline {
                index: Some(index),
                reason,
            }
        })?;

        debug!(
            "Compiled pipeline: {} steps, {} -> {}",
            steps.len(),
            root,
            kind
        );

        Ok(Pipeline {
            root,
            output: kind,
            steps: steps.into(),
        })
    }

    /// Kind of seed elements this pipeline expects
    pub fn root_kind(&self) -> ElementKind {
        self.root
    }

    /// Kind of elements the last step produces
    pub fn output_kind(&self) -> ElementKind {
        self.output
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Kind produced by `steps` starting from `kind`, or the first bad step
fn check_steps(mut kind: ElementKind, steps: &[Step]) -> Result<ElementKind, (usize, String)> {
    for (index, step) in steps.iter().enumerate() {
        match step {
            Step::Limit(n) | Step::Skip(n) | Step::Repeat { times: n, .. } | Step::Inflate { depth: n }
                if *n < 0 =>
            {
                return Err((
                    index,
                    format!("{} requires a non-negative count, got {}", step.name(), n),
                ));
            }
            Step::Repeat { body, .. } => {
                if body.is_empty() {
                    return Err((index, "repeat body has no steps".to_string()));
                }
                let out = check_steps(kind, body).map_err(|(inner, reason)| {
                    (index, format!("repeat body step {}: {}", inner, reason))
                })?;
                if out != kind {
                    return Err((
                        index,
                        format!("repeat body turns {} elements into {}", kind, out),
                    ));
                }
                continue;
            }
            _ => {}
        }

        kind = step
            .output_kind(kind)
            .ok_or_else(|| (index, format!("{} cannot consume {} elements", step.name(), kind)))?;
    }
    Ok(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_pipeline_is_invalid() {
        let err = PipelineBuilder::vertices().compile().unwrap_err();
        assert!(matches!(err, TraversalError::InvalidPipeline { index: None, .. }));
    }

    #[test]
    fn test_negative_limit_names_step() {
        let err = PipelineBuilder::vertices()
            .out(&[])
            .limit(-1)
            .compile()
            .unwrap_err();
        assert!(matches!(err, TraversalError::InvalidPipeline { index: Some(1), .. }));

        let err = PipelineBuilder::vertices().skip(-3).compile().unwrap_err();
        assert!(matches!(err, TraversalError::InvalidPipeline { index: Some(0), .. }));
    }

    #[test]
    fn test_kind_mismatch_names_step() {
        // property() yields values, which cannot be expanded
        let err = PipelineBuilder::vertices()
            .property("name")
            .dedup()
            .out(&[])
            .compile()
            .unwrap_err();
        match err {
            TraversalError::InvalidPipeline { index, reason } => {
                assert_eq!(index, Some(2));
                assert!(reason.contains("Value"), "reason was {}", reason);
            }
            other => panic!("unexpected error {:?}", other),
        }

        let err = PipelineBuilder::edges().out_e(&[]).compile().unwrap_err();
        assert!(matches!(err, TraversalError::InvalidPipeline { index: Some(0), .. }));
    }

    #[test]
    fn test_repeat_body_is_checked() {
        let err = PipelineBuilder::vertices()
            .has_label("person")
            .repeat(PipelineBuilder::vertices(), 2)
            .compile()
            .unwrap_err();
        assert!(matches!(err, TraversalError::InvalidPipeline { index: Some(1), .. }));

        // body ends on edges, so it cannot feed the next pass
        let err = PipelineBuilder::vertices()
            .repeat(PipelineBuilder::vertices().out_e(&[]), 2)
            .compile()
            .unwrap_err();
        match err {
            TraversalError::InvalidPipeline { index, reason } => {
                assert_eq!(index, Some(0));
                assert!(reason.contains("Edge"), "reason was {}", reason);
            }
            other => panic!("unexpected error {:?}", other),
        }

        let err = PipelineBuilder::vertices()
            .repeat(PipelineBuilder::vertices().out(&[]).limit(-2), 1)
            .compile()
            .unwrap_err();
        match err {
            TraversalError::InvalidPipeline { index, reason } => {
                assert_eq!(index, Some(0));
                assert!(reason.starts_with("repeat body step 1"), "reason was {}", reason);
            }
            other => panic!("unexpected error {:?}", other),
        }

        let err = PipelineBuilder::vertices()
            .repeat(PipelineBuilder::vertices().out(&[]), -1)
            .compile()
            .unwrap_err();
        assert!(matches!(err, TraversalError::InvalidPipeline { index: Some(0), .. }));

        let err = PipelineBuilder::vertices().inflate_edges(-1).compile().unwrap_err();
        assert!(matches!(err, TraversalError::InvalidPipeline { index: Some(0), .. }));
    }

    #[test]
    fn test_compiled_kinds() {
        let pipeline = PipelineBuilder::vertices()
            .out_e(&["knows"])
            .limit(0)
            .compile()
            .unwrap();
        assert_eq!(pipeline.root_kind(), ElementKind::Vertex);
        assert_eq!(pipeline.output_kind(), ElementKind::Edge);
        assert_eq!(pipeline.len(), 2);

        let values = Pipeline::builder(ElementKind::Value).dedup().compile().unwrap();
        assert_eq!(values.output_kind(), ElementKind::Value);

        let tree = PipelineBuilder::vertices()
            .repeat_emit(PipelineBuilder::vertices().out_e(&[]).out(&[]), 3)
            .inflate_edges(1)
            .compile()
            .unwrap();
        assert_eq!(tree.output_kind(), ElementKind::Value);
    }

    #[test]
    fn test_pipeline_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Pipeline>();
    }
}
