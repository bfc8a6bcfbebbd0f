//! Mermaid flowchart rendering of a [`TraceObject`].
//!
//! Nodes are emitted in event order (`N0`, `N1`, ...). Edges follow the span
//! hierarchy, except under sequential workflows where steps form a single
//! chain and each step's own work hangs off it as a second chain.

use std::collections::{HashMap, HashSet};
use std::fmt::Write;

use tracelens_types::keys;

use crate::audit::{EventType, TraceEvent, TraceObject};
use crate::tree::resolve_parents;

const MAX_LABEL_CHARS: usize = 60;

pub fn render(trace: &TraceObject) -> String {
    let events = &trace.events;
    let links = Links::compute(events);

    let mut out = String::from("```mermaid\nflowchart TD\n");
    for (i, event) in events.iter().enumerate() {
        let (open, close) = shape(event.event_type);
        let _ = writeln!(out, "    N{}{}\"{}\"{}", i, open, label(event), close);
    }
    for (from, to) in &links.edges {
        let _ = writeln!(out, "    N{} --> N{}", from, to);
    }
    for event_type in EventType::ALL {
        let members: Vec<String> = events
            .iter()
            .enumerate()
            .filter(|(_, e)| e.event_type == event_type)
            .map(|(i, _)| format!("N{}", i))
            .collect();
        if members.is_empty() {
            continue;
        }
        let (fill, stroke) = palette(event_type);
        let _ = writeln!(
            out,
            "    classDef {} fill:{},stroke:{},stroke-width:1px",
            event_type, fill, stroke
        );
        let _ = writeln!(out, "    class {} {}", members.join(","), event_type);
    }
    out.push_str("```\n");
    out
}

/// Edge list for a set of events, in insertion order and free of duplicates.
#[derive(Debug, Default)]
pub struct Links {
    pub edges: Vec<(usize, usize)>,
    seen: HashSet<(usize, usize)>,
    /// Children already placed on a step or descendant chain; they get no
    /// fan-out edge from their direct parent.
    chained: HashSet<usize>,
}

impl Links {
    pub fn compute(events: &[TraceEvent]) -> Self {
        let ids: Vec<&str> = events.iter().map(|e| e.span_id.as_str()).collect();
        let parent_ids: Vec<Option<&str>> = events.iter().map(TraceEvent::parent).collect();
        let parents = resolve_parents(&ids, &parent_ids);

        let mut children: HashMap<usize, Vec<usize>> = HashMap::new();
        for (child, parent) in parents.iter().enumerate() {
            if let Some(p) = parent {
                children.entry(*p).or_default().push(child);
            }
        }
        let mut parent_order: Vec<usize> = children.keys().copied().collect();
        parent_order.sort_unstable();

        let mut links = Links::default();

        // Linear chains first so the fan-out pass knows which children to skip.
        for &parent in &parent_order {
            if !is_sequential(&events[parent]) {
                continue;
            }
            let mut steps: Vec<usize> = children[&parent]
                .iter()
                .copied()
                .filter(|&c| is_step(&events[c]))
                .collect();
            steps.sort_by(|&a, &b| {
                match (step_index(&events[a]), step_index(&events[b])) {
                    (Some(x), Some(y)) => x.cmp(&y),
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => events[a].timestamp.cmp(&events[b].timestamp),
                }
            });
            links.chain(parent, &steps);

            for &step in &steps {
                let mut work = step_descendants(step, &children, events);
                work.sort_by_key(|&i| events[i].timestamp);
                links.chain(step, &work);
            }
        }

        for &parent in &parent_order {
            for &child in &children[&parent] {
                if !links.chained.contains(&child) {
                    links.add(parent, child);
                }
            }
        }

        links
    }

    fn chain(&mut self, head: usize, rest: &[usize]) {
        let mut prev = head;
        for &next in rest {
            self.add(prev, next);
            self.chained.insert(next);
            prev = next;
        }
    }

    fn add(&mut self, from: usize, to: usize) {
        if self.seen.insert((from, to)) {
            self.edges.push((from, to));
        }
    }

    pub fn contains(&self, from: usize, to: usize) -> bool {
        self.seen.contains(&(from, to))
    }
}

/// Breadth-first walk below a step. Nested steps and sequential containers
/// are neither collected nor descended into; their own parents link them.
fn step_descendants(
    step: usize,
    children: &HashMap<usize, Vec<usize>>,
    events: &[TraceEvent],
) -> Vec<usize> {
    let mut out = Vec::new();
    let mut queue = std::collections::VecDeque::from([step]);
    while let Some(current) = queue.pop_front() {
        for &child in children.get(&current).map(Vec::as_slice).unwrap_or(&[]) {
            if is_step(&events[child]) || is_sequential(&events[child]) {
                continue;
            }
            out.push(child);
            queue.push_back(child);
        }
    }
    out
}

fn is_sequential(event: &TraceEvent) -> bool {
    event.span_name.to_lowercase().contains("workflow.sequential")
}

fn is_step(event: &TraceEvent) -> bool {
    event.span_name.to_lowercase().contains("workflow.step")
        || event
            .meta_str(keys::WORKFLOW_STEP_NAME)
            .is_some_and(|s| !s.is_empty())
}

fn step_index(event: &TraceEvent) -> Option<i64> {
    use tracelens_types::AttributeValue;
    match event.metadata.get(keys::WORKFLOW_STEP_INDEX)? {
        AttributeValue::Int(n) => Some(*n),
        AttributeValue::Float(f) if f.is_finite() => Some(f.trunc() as i64),
        AttributeValue::Str(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn shape(event_type: EventType) -> (&'static str, &'static str) {
    match event_type {
        EventType::Thought => ("([", "])"),
        EventType::ToolCall => ("[[", "]]"),
        EventType::Observation => ("[/", "/]"),
        EventType::LlmCall => ("{", "}"),
        EventType::Decision => ("{{", "}}"),
    }
}

fn palette(event_type: EventType) -> (&'static str, &'static str) {
    match event_type {
        EventType::Thought => ("#e1f5fe", "#01579b"),
        EventType::ToolCall => ("#e8f5e9", "#1b5e20"),
        EventType::Observation => ("#fff3e0", "#e65100"),
        EventType::LlmCall => ("#f3e5f5", "#4a148c"),
        EventType::Decision => ("#fce4ec", "#880e4f"),
    }
}

fn icon(event_type: EventType) -> &'static str {
    match event_type {
        EventType::Thought => "💭",
        EventType::ToolCall => "🔧",
        EventType::Observation => "👁",
        EventType::LlmCall => "🤖",
        EventType::Decision => "⚡",
    }
}

fn label(event: &TraceEvent) -> String {
    let mut desc = match event.meta_str(keys::WORKFLOW_STEP_NAME) {
        Some(step) if !step.is_empty() => format!("step:{}", step),
        _ => event.span_name.clone(),
    };
    if let Some(agent) = event.meta_str(keys::AGENT_NAME).filter(|a| !a.is_empty()) {
        desc = format!("{} @{}", desc, agent);
    }
    if desc.chars().count() > MAX_LABEL_CHARS {
        desc = desc.chars().take(MAX_LABEL_CHARS - 3).collect::<String>() + "...";
    }

    let mut text = format!("{} {}", icon(event.event_type), escape(&desc));
    if event.duration_ms > 0 {
        let _ = write!(text, "<br/>{}ms", event.duration_ms);
    }
    text
}

fn escape(text: &str) -> String {
    text.replace('"', "#quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracelens_types::Span;

    fn collect(spans: Vec<Span>) -> TraceObject {
        TraceObject::collect("run-test", &spans)
    }

    fn pos(trace: &TraceObject, span_id: &str) -> usize {
        trace
            .events
            .iter()
            .position(|e| e.span_id == span_id)
            .unwrap()
    }

    #[test]
    fn test_sequential_steps_are_chained() {
        let trace = collect(vec![
            Span::new("agk.workflow.sequential", "A").with_times("2026-01-01T10:00:00Z", ""),
            Span::new("agk.workflow.step", "B")
                .with_parent("A")
                .with_times("2026-01-01T10:00:01Z", "")
                .with_attr(keys::WORKFLOW_STEP_INDEX, 0i64),
            Span::new("agk.workflow.step", "C")
                .with_parent("A")
                .with_times("2026-01-01T10:00:02Z", "")
                .with_attr(keys::WORKFLOW_STEP_INDEX, 1i64),
        ]);
        let links = Links::compute(&trace.events);
        let (a, b, c) = (pos(&trace, "A"), pos(&trace, "B"), pos(&trace, "C"));
        assert!(links.contains(a, b));
        assert!(links.contains(b, c));
        assert!(!links.contains(a, c));
        assert_eq!(links.edges.len(), 2);
    }

    #[test]
    fn test_step_index_beats_chronology() {
        let trace = collect(vec![
            Span::new("agk.workflow.sequential", "A").with_times("2026-01-01T10:00:00Z", ""),
            Span::new("agk.workflow.step", "late-but-first")
                .with_parent("A")
                .with_times("2026-01-01T10:00:09Z", "")
                .with_attr(keys::WORKFLOW_STEP_INDEX, "0"),
            Span::new("agk.workflow.step", "second")
                .with_parent("A")
                .with_times("2026-01-01T10:00:01Z", "")
                .with_attr(keys::WORKFLOW_STEP_INDEX, 1.0),
            Span::new("agk.workflow.step", "unindexed")
                .with_parent("A")
                .with_times("2026-01-01T10:00:00.500Z", ""),
        ]);
        let links = Links::compute(&trace.events);
        let a = pos(&trace, "A");
        let first = pos(&trace, "late-but-first");
        let second = pos(&trace, "second");
        let unindexed = pos(&trace, "unindexed");
        assert_eq!(
            links.edges,
            vec![(a, first), (first, second), (second, unindexed)]
        );
    }

    #[test]
    fn test_step_work_hangs_off_step_as_chain() {
        let trace = collect(vec![
            Span::new("agk.workflow.sequential", "A").with_times("2026-01-01T10:00:00Z", ""),
            Span::new("agk.workflow.step", "S")
                .with_parent("A")
                .with_times("2026-01-01T10:00:01Z", ""),
            Span::new("agk.agent.run", "R")
                .with_parent("S")
                .with_times("2026-01-01T10:00:02Z", ""),
            Span::new("agk.llm.generate", "L")
                .with_parent("R")
                .with_times("2026-01-01T10:00:03Z", ""),
            Span::new("agk.tool.call", "T")
                .with_parent("R")
                .with_times("2026-01-01T10:00:04Z", ""),
        ]);
        let links = Links::compute(&trace.events);
        let [a, s, r, l, t] = ["A", "S", "R", "L", "T"].map(|id| pos(&trace, id));
        assert_eq!(links.edges, vec![(a, s), (s, r), (r, l), (l, t)]);
        assert!(!links.contains(r, t));
    }

    #[test]
    fn test_nested_steps_are_not_relinked() {
        let trace = collect(vec![
            Span::new("agk.workflow.sequential", "A").with_times("2026-01-01T10:00:00Z", ""),
            Span::new("agk.workflow.step", "S1")
                .with_parent("A")
                .with_times("2026-01-01T10:00:01Z", ""),
            Span::new("agk.workflow.sequential", "Q")
                .with_parent("S1")
                .with_times("2026-01-01T10:00:02Z", ""),
            Span::new("agk.workflow.step", "Q1")
                .with_parent("Q")
                .with_times("2026-01-01T10:00:03Z", ""),
            Span::new("agk.llm.generate", "L")
                .with_parent("Q1")
                .with_times("2026-01-01T10:00:04Z", ""),
        ]);
        let links = Links::compute(&trace.events);
        let [a, s1, q, q1, l] = ["A", "S1", "Q", "Q1", "L"].map(|id| pos(&trace, id));
        assert!(links.contains(a, s1));
        assert!(links.contains(s1, q));
        assert!(links.contains(q, q1));
        assert!(links.contains(q1, l));
        assert!(!links.contains(s1, l));
        assert_eq!(links.edges.len(), 4);
    }

    #[test]
    fn test_general_fan_out_and_unresolved_parents() {
        let trace = collect(vec![
            Span::new("agk.agent.run", "root").with_times("2026-01-01T10:00:00Z", ""),
            Span::new("agk.llm.generate", "x")
                .with_parent("root")
                .with_times("2026-01-01T10:00:01Z", ""),
            Span::new("agk.tool.call", "y")
                .with_parent("root")
                .with_times("2026-01-01T10:00:02Z", ""),
            Span::new("orphan", "o")
                .with_parent("ghost")
                .with_times("2026-01-01T10:00:03Z", ""),
        ]);
        let links = Links::compute(&trace.events);
        assert_eq!(links.edges, vec![(0, 1), (0, 2)]);
    }

    #[test]
    fn test_empty_trace_renders_empty_body() {
        let trace = collect(Vec::new());
        insta::assert_snapshot!(render(&trace), @r"
        ```mermaid
        flowchart TD
        ```
        ");
    }

    #[test]
    fn test_rendered_document() {
        let trace = collect(vec![
            Span::new("agk.workflow.sequential", "A")
                .with_times("2026-01-01T10:00:00Z", "2026-01-01T10:00:02Z"),
            Span::new("agk.workflow.step", "B")
                .with_parent("A")
                .with_times("2026-01-01T10:00:01Z", "2026-01-01T10:00:01.120Z")
                .with_attr(keys::WORKFLOW_STEP_NAME, "say \"hi\"")
                .with_attr(keys::AGENT_NAME, "writer"),
        ]);
        insta::assert_snapshot!(render(&trace), @r#"
        ```mermaid
        flowchart TD
            N0{{"⚡ agk.workflow.sequential<br/>2000ms"}}
            N1{{"⚡ step:say #quot;hi#quot; @writer<br/>120ms"}}
            N0 --> N1
            classDef decision fill:#fce4ec,stroke:#880e4f,stroke-width:1px
            class N0,N1 decision
        ```
        "#);
    }

    #[test]
    fn test_long_labels_are_truncated() {
        let name = "x".repeat(80);
        let trace = collect(vec![Span::new(name, "1")]);
        let event = &trace.events[0];
        let text = label(event);
        assert!(text.ends_with("..."));
        assert_eq!(text.chars().count(), "💭 ".chars().count() + 60);
    }
}
