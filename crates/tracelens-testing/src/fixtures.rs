//! Span fixtures.
//!
//! `SpanLine` produces one JSONL record in the exporter's wire shape. Times are
//! given as millisecond offsets from a fixed base instant so tests read as a
//! timeline rather than a wall of timestamps.

use chrono::{DateTime, Duration, TimeZone, Utc};
use tracelens_types::{AttributeValue, Span};

pub const TRACE_ID: &str = "4bf92f3577b34da6a3ce929d0e0e4736";

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 10, 0, 0)
        .single()
        .unwrap_or_default()
}

fn at(offset_ms: i64) -> String {
    (base_time() + Duration::milliseconds(offset_ms)).to_rfc3339()
}

#[derive(Debug, Clone)]
pub struct SpanLine {
    span: Span,
}

impl SpanLine {
    pub fn new(name: &str, span_id: &str) -> Self {
        Self {
            span: Span::new(name, span_id).with_trace_id(TRACE_ID),
        }
    }

    pub fn parent(mut self, parent_id: &str) -> Self {
        self.span = self.span.with_parent(parent_id);
        self
    }

    /// Start `start_ms` after the base instant and run for `duration_ms`.
    pub fn timed(mut self, start_ms: i64, duration_ms: i64) -> Self {
        self.span = self.span.with_times(at(start_ms), at(start_ms + duration_ms));
        self
    }

    pub fn attr(mut self, key: &str, value: impl Into<AttributeValue>) -> Self {
        self.span = self.span.with_attr(key, value);
        self
    }

    pub fn error(mut self, description: &str) -> Self {
        self.span = self.span.with_status("Error", description);
        self
    }

    pub fn ok(mut self) -> Self {
        self.span = self.span.with_status("Ok", "");
        self
    }

    pub fn span(&self) -> Span {
        self.span.clone()
    }

    pub fn line(&self) -> String {
        serde_json::to_string(&self.span).unwrap_or_default()
    }
}

/// Join records into file content, one per line with a trailing newline.
pub fn jsonl(lines: &[SpanLine]) -> String {
    lines.iter().map(|l| l.line() + "\n").collect()
}

pub fn spans(lines: &[SpanLine]) -> Vec<Span> {
    lines.iter().map(SpanLine::span).collect()
}

/// A two-step sequential workflow with an LLM call, a tool call and one
/// failed span:
///
/// ```text
/// wf   agk.workflow.sequential
/// ├─ s1  agk.workflow.step (research, index 0)
/// │  └─ a1  agk.agent.run
/// │     ├─ l1  agk.llm.generate   120 tokens
/// │     └─ t1  agk.tool.web_search   (Error)
/// └─ s2  agk.workflow.step (write, index 1)
///    └─ l2  agk.llm.generate   30 stream tokens
/// ```
pub fn sequential_workflow() -> Vec<SpanLine> {
    vec![
        SpanLine::new("agk.workflow.sequential", "wf").timed(0, 5000),
        SpanLine::new("agk.workflow.step", "s1")
            .parent("wf")
            .timed(10, 3000)
            .attr("agk.workflow.step_name", "research")
            .attr("agk.workflow.step_index", 0i64),
        SpanLine::new("agk.agent.run", "a1")
            .parent("s1")
            .timed(20, 2900)
            .attr("agk.agent.name", "researcher")
            .attr("agk.llm.model", "gpt-4o"),
        SpanLine::new("agk.llm.generate", "l1")
            .parent("a1")
            .timed(30, 1800)
            .attr("agk.llm.provider", "openai")
            .attr("agk.llm.model", "gpt-4o")
            .attr("agk.prompt.user", "Find sources on tail latency")
            .attr("agk.llm.response", "Here are three sources")
            .attr("llm.usage.total_tokens", 120i64),
        SpanLine::new("agk.tool.web_search", "t1")
            .parent("a1")
            .timed(1900, 900)
            .attr("agk.tool.arguments", r#"{"query":"tail latency"}"#)
            .error("rate limited"),
        SpanLine::new("agk.workflow.step", "s2")
            .parent("wf")
            .timed(3100, 1800)
            .attr("agk.workflow.step_name", "write")
            .attr("agk.workflow.step_index", 1i64),
        SpanLine::new("agk.llm.generate", "l2")
            .parent("s2")
            .timed(3150, 1600)
            .attr("agk.llm.provider", "openai")
            .attr("agk.llm.model", "gpt-4o-mini")
            .attr("agk.stream.tokens", 30i64),
    ]
}
