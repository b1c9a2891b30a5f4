//! Traversal cursor and result materialization

use super::element::{Element, ElementKind};
use super::operator::OperatorBox;
use crate::config::ExecutionConfig;
use crate::graph::GraphRead;
use crate::traversal::{TraversalError, TraversalResult};
use std::fmt;
use tracing::trace;

/// Single-use handle over one execution of a pipeline
///
/// Pull elements lazily through [`Iterator`], or finish the execution with
/// one of the terminal operations ([`to_list`](Cursor::to_list),
/// [`first`](Cursor::first), [`count_results`](Cursor::count_results)).
/// A terminal operation, an error or running out of elements exhausts the
/// cursor; terminal operations on an exhausted cursor fail with
/// [`TraversalError::ExhaustedCursor`].
pub struct Cursor<'g> {
    graph: &'g dyn GraphRead,
    root: Option<OperatorBox>,
    output_kind: ElementKind,
    config: ExecutionConfig,
    /// Planning failure reported on the first pull
    deferred: Option<TraversalError>,
    exhausted: bool,
    produced: usize,
}

impl<'g> Cursor<'g> {
    pub(crate) fn new(
        graph: &'g dyn GraphRead,
        root: OperatorBox,
        output_kind: ElementKind,
        config: ExecutionConfig,
    ) -> Self {
        Self {
            graph,
            root: Some(root),
            output_kind,
            config,
            deferred: None,
            exhausted: false,
            produced: 0,
        }
    }

    pub(crate) fn failed(
        graph: &'g dyn GraphRead,
        output_kind: ElementKind,
        error: TraversalError,
    ) -> Self {
        Self {
            graph,
            root: None,
            output_kind,
            config: ExecutionConfig::default(),
            deferred: Some(error),
            exhausted: false,
            produced: 0,
        }
    }

    /// Kind of elements this cursor yields
    pub fn output_kind(&self) -> ElementKind {
        self.output_kind
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Number of elements handed out so far
    pub fn produced(&self) -> usize {
        self.produced
    }

    fn pull(&mut self) -> TraversalResult<Option<Element>> {
        if let Some(err) = self.deferred.take() {
            self.exhausted = true;
            return Err(err);
        }

        let Some(root) = self.root.as_mut() else {
            self.exhausted = true;
            return Ok(None);
        };

        match root.next(self.graph) {
            Ok(Some(element)) => {
                self.produced += 1;
                trace!("Cursor produced {}", element);
                Ok(Some(element))
            }
            Ok(None) => {
                self.exhausted = true;
                Ok(None)
            }
            Err(err) => {
                self.exhausted = true;
                Err(err)
            }
        }
    }

    fn begin_terminal(&mut self) -> TraversalResult<()> {
        if self.exhausted {
            return Err(TraversalError::ExhaustedCursor);
        }
        Ok(())
    }

    /// Drain up to `max_results` elements (all of them if None)
    ///
    /// With `None`, the execution config's `default_max_results` applies.
    pub fn to_list(&mut self, max_results: Option<usize>) -> TraversalResult<Vec<Element>> {
        self.begin_terminal()?;
        let cap = max_results.or(self.config.default_max_results);

        let mut results = Vec::new();
        while cap.map_or(true, |cap| results.len() < cap) {
            match self.pull()? {
                Some(element) => results.push(element),
                None => break,
            }
        }
        self.exhausted = true;
        Ok(results)
    }

    /// The first element, if any
    pub fn first(&mut self) -> TraversalResult<Option<Element>> {
        self.begin_terminal()?;
        let element = self.pull()?;
        self.exhausted = true;
        Ok(element)
    }

    /// Number of remaining elements
    ///
    /// Not called `count`: on a cursor that name resolves to `Iterator::count`.
    pub fn count_results(&mut self) -> TraversalResult<usize> {
        self.begin_terminal()?;
        let mut n = 0;
        while self.pull()?.is_some() {
            n += 1;
        }
        Ok(n)
    }
}

impl Iterator for Cursor<'_> {
    type Item = TraversalResult<Element>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        self.pull().transpose()
    }
}

impl fmt::Debug for Cursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("output_kind", &self.output_kind)
            .field("produced", &self.produced)
            .field("exhausted", &self.exhausted)
            .finish()
    }
}
