use serde::Serialize;
use tracelens_types::{Span, keys};

use crate::tree::{NodeId, SpanNode, SpanTree};

/// Flat USD rate used for every cost estimate in the tool.
pub const ESTIMATED_COST_PER_TOKEN: f64 = 0.000_002;

const TOP_N: usize = 3;

/// Tokens reported by one span under either known key. Non-numeric values
/// are ignored; fractional values are truncated.
pub fn span_tokens(span: &Span) -> u64 {
    keys::TOKEN_KEYS
        .iter()
        .filter_map(|key| span.attr(key)?.as_f64())
        .filter(|v| *v > 0.0)
        .map(|v| v as u64)
        .sum()
}

pub fn estimate_cost(tokens: u64) -> f64 {
    tokens as f64 * ESTIMATED_COST_PER_TOKEN
}

/// Aggregate figures for one trace. Always computed over every node in the
/// tree, regardless of which nodes are currently expanded.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TraceMetrics {
    pub total_tokens: u64,
    pub error_count: usize,
    pub slowest: Option<NodeId>,
    /// Non-increasing by duration; equal durations keep encounter order.
    pub top3: Vec<NodeId>,
}

impl TraceMetrics {
    pub fn compute(tree: &SpanTree) -> Self {
        let mut metrics = TraceMetrics::default();
        let nodes = tree.nodes();

        for id in tree.flatten_all() {
            let node = &nodes[id];
            metrics.total_tokens += span_tokens(&node.span);
            if node.span.is_error() {
                metrics.error_count += 1;
            }
            if is_bottleneck_candidate(node) {
                insert_ranked(&mut metrics.top3, id, nodes);
            }
        }

        metrics.slowest = metrics.top3.first().copied();
        metrics
    }

    pub fn estimated_cost(&self) -> f64 {
        estimate_cost(self.total_tokens)
    }
}

/// Leaves and LLM spans. Parent spans are excluded because their duration
/// already includes their children's.
pub fn is_bottleneck_candidate(node: &SpanNode) -> bool {
    node.is_leaf() || node.span.name.to_lowercase().contains("llm")
}

fn insert_ranked(top: &mut Vec<NodeId>, id: NodeId, nodes: &[SpanNode]) {
    let duration = nodes[id].duration_ms;
    match top.iter().position(|&t| duration > nodes[t].duration_ms) {
        Some(pos) => top.insert(pos, id),
        None if top.len() < TOP_N => top.push(id),
        None => {}
    }
    top.truncate(TOP_N);
}
