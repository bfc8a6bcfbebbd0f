use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use tracelens_types::Span;

/// Index of a node inside a [`SpanTree`]. Equal to the span's position in the
/// input list, so ids are stable for a given span sequence.
pub type NodeId = usize;

#[derive(Debug, Clone)]
pub struct SpanNode {
    pub span: Span,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub depth: usize,
    pub expanded: bool,
    pub duration_ms: u64,
}

impl SpanNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

// NOTE: Rebuild, never patch
//
// The forest is rebuilt from the complete span list every time new spans
// arrive. Spans can show up before their parents (exporters flush children
// first), so incremental patching would need re-parenting logic anyway; a full
// rebuild keeps tree shape and metrics consistent at the cost of O(n log n)
// work per update, which is fine for single-run traces. Callers that hold UI
// state must re-locate nodes by SpanID after a rebuild, not by NodeId.

/// Arena of span nodes with parent/child links expressed as indices.
#[derive(Debug, Clone, Default)]
pub struct SpanTree {
    nodes: Vec<SpanNode>,
    roots: Vec<NodeId>,
    by_span_id: HashMap<String, NodeId>,
}

impl SpanTree {
    /// Build the forest. Never fails: unresolved, empty or sentinel parents
    /// make a root, and a parent link that would close a cycle is dropped.
    pub fn build(spans: Vec<Span>) -> Self {
        let parents = {
            let ids: Vec<&str> = spans.iter().map(Span::span_id).collect();
            let parent_ids: Vec<Option<&str>> = spans.iter().map(Span::parent_span_id).collect();
            resolve_parents(&ids, &parent_ids)
        };
        let by_span_id = index_span_ids(spans.iter().map(Span::span_id));

        let starts: Vec<Option<DateTime<Utc>>> = spans.iter().map(Span::start).collect();

        let mut nodes: Vec<SpanNode> = spans
            .into_iter()
            .zip(&parents)
            .map(|(span, parent)| SpanNode {
                duration_ms: span.duration_ms(),
                span,
                parent: *parent,
                children: Vec::new(),
                depth: 0,
                expanded: true,
            })
            .collect();

        let mut roots = Vec::new();
        for (id, parent) in parents.iter().enumerate() {
            match parent {
                Some(p) => nodes[*p].children.push(id),
                None => roots.push(id),
            }
        }

        // Stable sort: unparseable starts come first, ties keep input order.
        roots.sort_by_key(|&id| starts[id]);
        for node in &mut nodes {
            node.children.sort_by_key(|&id| starts[id]);
        }

        let mut stack: Vec<(NodeId, usize)> = roots.iter().map(|&r| (r, 0)).collect();
        while let Some((id, depth)) = stack.pop() {
            nodes[id].depth = depth;
            stack.extend(nodes[id].children.iter().map(|&c| (c, depth + 1)));
        }

        Self {
            nodes,
            roots,
            by_span_id,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node(&self, id: NodeId) -> &SpanNode {
        &self.nodes[id]
    }

    pub fn nodes(&self) -> &[SpanNode] {
        &self.nodes
    }

    pub fn spans(&self) -> impl Iterator<Item = &Span> {
        self.nodes.iter().map(|n| &n.span)
    }

    /// First node carrying this SpanID.
    pub fn find(&self, span_id: &str) -> Option<NodeId> {
        self.by_span_id.get(span_id).copied()
    }

    /// Pre-order listing honouring each node's `expanded` flag.
    pub fn flatten(&self) -> Vec<NodeId> {
        self.walk(true)
    }

    /// Pre-order listing of every node regardless of expansion.
    pub fn flatten_all(&self) -> Vec<NodeId> {
        self.walk(false)
    }

    fn walk(&self, respect_expanded: bool) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            let node = &self.nodes[id];
            if node.expanded || !respect_expanded {
                stack.extend(node.children.iter().rev());
            }
        }
        out
    }

    /// Flip the expanded flag of a node with children. Returns whether
    /// anything changed.
    pub fn toggle(&mut self, id: NodeId) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) if !node.children.is_empty() => {
                node.expanded = !node.expanded;
                true
            }
            _ => false,
        }
    }

    pub fn set_expanded(&mut self, id: NodeId, expanded: bool) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.expanded = expanded;
        }
    }

    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.nodes.get(id).and_then(|n| n.parent);
        while let Some(p) = current {
            out.push(p);
            current = self.nodes[p].parent;
        }
        out
    }

    /// Force every ancestor of `id` open so the node appears in `flatten()`.
    pub fn expand_ancestors(&mut self, id: NodeId) {
        for ancestor in self.ancestors(id) {
            self.nodes[ancestor].expanded = true;
        }
    }

    /// SpanIDs of collapsed nodes, used to carry UI state across rebuilds.
    pub fn collapsed_span_ids(&self) -> HashSet<String> {
        self.nodes
            .iter()
            .filter(|n| !n.expanded)
            .map(|n| n.span.span_id().to_string())
            .collect()
    }

    pub fn restore_collapsed(&mut self, collapsed: &HashSet<String>) {
        if collapsed.is_empty() {
            return;
        }
        for node in &mut self.nodes {
            if !node.children.is_empty() && collapsed.contains(node.span.span_id()) {
                node.expanded = false;
            }
        }
    }
}

/// First occurrence of each non-empty id wins.
pub(crate) fn index_span_ids<'a>(ids: impl Iterator<Item = &'a str>) -> HashMap<String, usize> {
    let mut index = HashMap::new();
    for (i, id) in ids.enumerate() {
        if !id.is_empty() {
            index.entry(id.to_string()).or_insert(i);
        }
    }
    index
}

/// Resolve each record's parent to a position in the same list.
///
/// Parents are looked up through a first-wins SpanID index. A link whose
/// target is the record itself, or one of its own descendants under the links
/// accepted so far, is dropped so the result is always a forest.
pub(crate) fn resolve_parents(ids: &[&str], parent_ids: &[Option<&str>]) -> Vec<Option<usize>> {
    let index = index_span_ids(ids.iter().copied());
    let mut parents: Vec<Option<usize>> = vec![None; ids.len()];

    for (i, parent_id) in parent_ids.iter().enumerate() {
        let Some(p) = parent_id.and_then(|pid| index.get(pid).copied()) else {
            continue;
        };
        let mut cursor = Some(p);
        let mut closes_cycle = false;
        while let Some(c) = cursor {
            if c == i {
                closes_cycle = true;
                break;
            }
            cursor = parents[c];
        }
        if !closes_cycle {
            parents[i] = Some(p);
        }
    }
    parents
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracelens_types::ROOT_PARENT_SENTINEL;

    fn span(id: &str, parent: &str, start: &str) -> Span {
        Span::new(format!("span-{}", id), id)
            .with_parent(parent)
            .with_times(start, "")
    }

    fn names(tree: &SpanTree, ids: &[NodeId]) -> Vec<String> {
        ids.iter()
            .map(|&id| tree.node(id).span.span_id().to_string())
            .collect()
    }

    #[test]
    fn test_roots_and_depths() {
        let tree = SpanTree::build(vec![
            span("c", "b", "2026-01-01T10:00:02Z"),
            span("a", "", "2026-01-01T10:00:00Z"),
            span("b", "a", "2026-01-01T10:00:01Z"),
            span("z", ROOT_PARENT_SENTINEL, "2026-01-01T10:00:05Z"),
        ]);

        assert_eq!(names(&tree, tree.roots()), vec!["a", "z"]);
        let c = tree.find("c").unwrap();
        let b = tree.find("b").unwrap();
        assert_eq!(tree.node(c).depth, 2);
        assert_eq!(tree.node(c).parent, Some(b));
        assert!(tree.node(b).children.contains(&c));
        assert_eq!(tree.node(tree.find("z").unwrap()).depth, 0);
    }

    #[test]
    fn test_orphans_become_roots() {
        let tree = SpanTree::build(vec![
            span("a", "missing", "2026-01-01T10:00:01Z"),
            span("b", "a", "2026-01-01T10:00:02Z"),
        ]);
        assert_eq!(names(&tree, tree.roots()), vec!["a"]);
        assert_eq!(tree.node(tree.find("b").unwrap()).depth, 1);
    }

    #[test]
    fn test_children_sorted_by_start_with_stable_ties() {
        let tree = SpanTree::build(vec![
            span("root", "", "2026-01-01T10:00:00Z"),
            span("late", "root", "2026-01-01T10:00:09Z"),
            span("tie1", "root", "2026-01-01T10:00:03Z"),
            span("tie2", "root", "2026-01-01T10:00:03Z"),
            span("garbled", "root", "not-a-time"),
            span("early", "root", "2026-01-01T10:00:01Z"),
        ]);
        let root = tree.find("root").unwrap();
        assert_eq!(
            names(&tree, &tree.node(root).children),
            vec!["garbled", "early", "tie1", "tie2", "late"]
        );
    }

    #[test]
    fn test_flatten_counts_every_span() {
        let spans = vec![
            span("a", "", "2026-01-01T10:00:00Z"),
            span("b", "a", "2026-01-01T10:00:01Z"),
            span("c", "b", "2026-01-01T10:00:02Z"),
            span("d", "a", "2026-01-01T10:00:03Z"),
            span("e", "nowhere", "2026-01-01T10:00:04Z"),
        ];
        let tree = SpanTree::build(spans);
        assert_eq!(tree.flatten().len(), 5);
        assert_eq!(
            names(&tree, &tree.flatten()),
            vec!["a", "b", "c", "d", "e"]
        );
    }

    #[test]
    fn test_collapse_removes_subtree_and_expand_restores_it() {
        let mut tree = SpanTree::build(vec![
            span("a", "", "2026-01-01T10:00:00Z"),
            span("b", "a", "2026-01-01T10:00:01Z"),
            span("c", "b", "2026-01-01T10:00:02Z"),
            span("d", "b", "2026-01-01T10:00:03Z"),
            span("e", "a", "2026-01-01T10:00:04Z"),
        ]);
        let before = tree.flatten();
        let b = tree.find("b").unwrap();

        assert!(tree.toggle(b));
        assert_eq!(names(&tree, &tree.flatten()), vec!["a", "b", "e"]);

        assert!(tree.toggle(b));
        assert_eq!(tree.flatten(), before);

        let leaf = tree.find("c").unwrap();
        assert!(!tree.toggle(leaf));
    }

    #[test]
    fn test_expand_ancestors_reveals_node() {
        let mut tree = SpanTree::build(vec![
            span("a", "", "2026-01-01T10:00:00Z"),
            span("b", "a", "2026-01-01T10:00:01Z"),
            span("c", "b", "2026-01-01T10:00:02Z"),
        ]);
        let a = tree.find("a").unwrap();
        let b = tree.find("b").unwrap();
        let c = tree.find("c").unwrap();
        tree.set_expanded(a, false);
        tree.set_expanded(b, false);
        assert!(!tree.flatten().contains(&c));

        tree.expand_ancestors(c);
        assert!(tree.flatten().contains(&c));
    }

    #[test]
    fn test_duplicate_span_ids_keep_every_node() {
        let tree = SpanTree::build(vec![
            span("dup", "", "2026-01-01T10:00:00Z"),
            span("dup", "", "2026-01-01T10:00:01Z"),
            span("child", "dup", "2026-01-01T10:00:02Z"),
        ]);
        assert_eq!(tree.flatten().len(), 3);
        assert_eq!(tree.find("dup"), Some(0));
        assert_eq!(tree.node(2).parent, Some(0));
    }

    #[test]
    fn test_cycles_are_broken() {
        let tree = SpanTree::build(vec![
            span("self", "self", "2026-01-01T10:00:00Z"),
            span("x", "y", "2026-01-01T10:00:01Z"),
            span("y", "x", "2026-01-01T10:00:02Z"),
        ]);
        assert_eq!(tree.flatten().len(), 3);
        assert_eq!(tree.node(0).parent, None);
        // x attaches under y first, so y's link back to x is refused.
        assert_eq!(tree.node(1).parent, Some(2));
        assert_eq!(tree.node(2).parent, None);
    }

    #[test]
    fn test_collapsed_state_survives_rebuild() {
        let spans = vec![
            span("a", "", "2026-01-01T10:00:00Z"),
            span("b", "a", "2026-01-01T10:00:01Z"),
        ];
        let mut tree = SpanTree::build(spans.clone());
        tree.toggle(tree.find("a").unwrap());
        let collapsed = tree.collapsed_span_ids();

        let mut more = spans;
        more.push(span("c", "a", "2026-01-01T10:00:02Z"));
        let mut rebuilt = SpanTree::build(more);
        rebuilt.restore_collapsed(&collapsed);
        assert_eq!(rebuilt.flatten().len(), 1);
    }
}
