use std::path::{Path, PathBuf};

use tracelens_engine::{SpanTree, TraceMetrics};
use tracelens_types::Span;

use crate::Result;
use crate::tail::poll;

/// A trace that may still be growing on disk.
///
/// Holds every span read so far plus the tree and metrics derived from them.
/// [`LiveTrace::refresh`] appends whatever the writer added since the last
/// poll and rebuilds; collapse state survives the rebuild by SpanID.
#[derive(Debug)]
pub struct LiveTrace {
    path: Option<PathBuf>,
    offset: u64,
    spans: Vec<Span>,
    tree: SpanTree,
    metrics: TraceMetrics,
}

impl LiveTrace {
    /// Initial full read. An unreadable file is fatal here; later polls are not.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let (spans, offset) = poll(&path, 0)?;
        let mut trace = Self::from_spans(spans);
        trace.path = Some(path);
        trace.offset = offset;
        Ok(trace)
    }

    /// Static trace with no backing file; `refresh` is a no-op.
    pub fn from_spans(spans: Vec<Span>) -> Self {
        let tree = SpanTree::build(spans.clone());
        let metrics = TraceMetrics::compute(&tree);
        Self {
            path: None,
            offset: 0,
            spans,
            tree,
            metrics,
        }
    }

    /// Pull newly appended spans. Returns how many arrived.
    pub fn refresh(&mut self) -> Result<usize> {
        let Some(path) = &self.path else {
            return Ok(0);
        };
        let (fresh, offset) = poll(path, self.offset)?;
        self.offset = offset;
        if fresh.is_empty() {
            return Ok(0);
        }

        let count = fresh.len();
        let collapsed = self.tree.collapsed_span_ids();
        self.spans.extend(fresh);

        let mut tree = SpanTree::build(self.spans.clone());
        tree.restore_collapsed(&collapsed);
        self.metrics = TraceMetrics::compute(&tree);
        self.tree = tree;

        tracing::debug!(new_spans = count, total = self.spans.len(), "trace refreshed");
        Ok(count)
    }

    pub fn is_live(&self) -> bool {
        self.path.is_some()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn tree(&self) -> &SpanTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut SpanTree {
        &mut self.tree
    }

    pub fn metrics(&self) -> &TraceMetrics {
        &self.metrics
    }
}
