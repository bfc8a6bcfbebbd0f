//! Semantic view of a trace for reasoning analysis.
//!
//! Every span becomes one [`TraceEvent`] whose category is inferred from the
//! span name. Textual payloads (prompts, responses, tool I/O) are lifted into
//! `content` when the run was captured at a detailed trace level.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracelens_types::{AttributeValue, ROOT_PARENT_SENTINEL, Span, TraceRun, keys};

use crate::metrics::{estimate_cost, span_tokens};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Thought,
    ToolCall,
    Observation,
    LlmCall,
    Decision,
}

impl EventType {
    pub const ALL: [EventType; 5] = [
        EventType::Thought,
        EventType::ToolCall,
        EventType::Observation,
        EventType::LlmCall,
        EventType::Decision,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Thought => "thought",
            EventType::ToolCall => "tool_call",
            EventType::Observation => "observation",
            EventType::LlmCall => "llm_call",
            EventType::Decision => "decision",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive substring rules, first match wins:
/// tool, llm, agent, workflow, otherwise thought.
pub fn classify(span_name: &str) -> EventType {
    let name = span_name.to_lowercase();
    if name.contains("tool") {
        EventType::ToolCall
    } else if name.contains("llm") {
        EventType::LlmCall
    } else if name.contains("agent") {
        EventType::Thought
    } else if name.contains("workflow") {
        EventType::Decision
    } else {
        EventType::Thought
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEvent {
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub span_id: String,
    pub span_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, AttributeValue>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub duration_ms: u64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub parent_id: String,
}

fn is_zero(v: &u64) -> bool {
    *v == 0
}

impl TraceEvent {
    pub fn from_span(span: &Span) -> Self {
        let event_type = classify(&span.name);
        let mut content = None;
        let mut metadata = BTreeMap::new();

        for attr in &span.attributes {
            let Some(value) = &attr.value.value else {
                continue;
            };
            metadata.insert(attr.key.clone(), value.clone());

            let Some(text) = value.as_str() else {
                continue;
            };
            let applies = match attr.key.as_str() {
                keys::PROMPT_USER | keys::LLM_RESPONSE => true,
                keys::TOOL_ARGUMENTS => event_type == EventType::ToolCall,
                keys::TOOL_RESULT => event_type == EventType::Observation,
                _ => false,
            };
            if applies {
                content = Some(text.to_string());
            }
        }

        Self {
            timestamp: span.start(),
            event_type,
            span_id: span.span_id().to_string(),
            span_name: span.name.clone(),
            content,
            metadata,
            duration_ms: span.duration_ms(),
            parent_id: span.parent.span_id.clone(),
        }
    }

    /// Parent SpanID, excluding the empty id and the root sentinel.
    pub fn parent(&self) -> Option<&str> {
        match self.parent_id.as_str() {
            "" | ROOT_PARENT_SENTINEL => None,
            id => Some(id),
        }
    }

    pub fn meta_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(AttributeValue::as_str)
    }

    pub fn has_content(&self) -> bool {
        self.content.as_deref().is_some_and(|c| !c.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraceSummary {
    pub total_events: usize,
    pub thought_count: usize,
    pub tool_call_count: usize,
    pub observation_count: usize,
    pub llm_call_count: usize,
    pub decision_count: usize,
    /// Last event timestamp minus first, not a sum of event durations.
    pub total_duration_ms: u64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub tokens_used: u64,
    #[serde(default)]
    pub estimated_cost: f64,
    pub has_detailed_data: bool,
}

impl TraceSummary {
    pub fn count(&self, event_type: EventType) -> usize {
        match event_type {
            EventType::Thought => self.thought_count,
            EventType::ToolCall => self.tool_call_count,
            EventType::Observation => self.observation_count,
            EventType::LlmCall => self.llm_call_count,
            EventType::Decision => self.decision_count,
        }
    }

    fn record(&mut self, event: &TraceEvent) {
        match event.event_type {
            EventType::Thought => self.thought_count += 1,
            EventType::ToolCall => self.tool_call_count += 1,
            EventType::Observation => self.observation_count += 1,
            EventType::LlmCall => self.llm_call_count += 1,
            EventType::Decision => self.decision_count += 1,
        }
        if event.has_content() {
            self.has_detailed_data = true;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraceObject {
    pub run_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub command: String,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub events: Vec<TraceEvent>,
    pub summary: TraceSummary,
}

impl TraceObject {
    /// Classify every span and order the events by start time. Events without
    /// a parseable timestamp sort first and do not affect the time range.
    pub fn collect(run_id: impl Into<String>, spans: &[Span]) -> Self {
        let mut summary = TraceSummary::default();
        let mut events = Vec::with_capacity(spans.len());
        let mut tokens = 0u64;

        for span in spans {
            let event = TraceEvent::from_span(span);
            summary.record(&event);
            tokens += span_tokens(span);
            events.push(event);
        }
        events.sort_by_key(|e| e.timestamp);

        let start_time = events.iter().filter_map(|e| e.timestamp).min();
        let end_time = events.iter().filter_map(|e| e.timestamp).max();
        summary.total_events = events.len();
        summary.total_duration_ms = match (start_time, end_time) {
            (Some(start), Some(end)) => (end - start).num_milliseconds().max(0) as u64,
            _ => 0,
        };
        summary.tokens_used = tokens;
        summary.estimated_cost = estimate_cost(tokens);

        Self {
            run_id: run_id.into(),
            command: String::new(),
            start_time,
            end_time,
            events,
            summary,
        }
    }

    pub fn with_run(mut self, run: &TraceRun) -> Self {
        self.command = run.command.clone();
        self
    }

    /// Sequence of event types in timestamp order.
    pub fn reasoning_path(&self) -> Vec<EventType> {
        self.events.iter().map(|e| e.event_type).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_priority() {
        assert_eq!(classify("agent.tool.invoke"), EventType::ToolCall);
        assert_eq!(classify("agk.llm.tool_select"), EventType::ToolCall);
        assert_eq!(classify("agk.LLM.generate"), EventType::LlmCall);
        assert_eq!(classify("agk.agent.run"), EventType::Thought);
        assert_eq!(classify("agk.workflow.sequential"), EventType::Decision);
        assert_eq!(classify("http.request"), EventType::Thought);
    }

    #[test]
    fn test_content_extraction_rules() {
        let llm = Span::new("agk.llm.generate", "1")
            .with_attr(keys::PROMPT_USER, "hi")
            .with_attr(keys::LLM_RESPONSE, "hello");
        assert_eq!(
            TraceEvent::from_span(&llm).content.as_deref(),
            Some("hello")
        );

        let tool = Span::new("agk.tool.call", "2")
            .with_attr(keys::TOOL_ARGUMENTS, r#"{"q":"rust"}"#)
            .with_attr(keys::TOOL_RESULT, "ignored for tool calls");
        assert_eq!(
            TraceEvent::from_span(&tool).content.as_deref(),
            Some(r#"{"q":"rust"}"#)
        );

        let agent = Span::new("agk.agent.run", "3").with_attr(keys::TOOL_ARGUMENTS, "nope");
        assert_eq!(TraceEvent::from_span(&agent).content, None);

        let numeric = Span::new("agk.llm.generate", "4").with_attr(keys::LLM_RESPONSE, 7i64);
        let event = TraceEvent::from_span(&numeric);
        assert_eq!(event.content, None);
        assert_eq!(event.metadata.get(keys::LLM_RESPONSE), Some(&AttributeValue::Int(7)));
    }

    #[test]
    fn test_collect_orders_and_summarizes() {
        let spans = vec![
            Span::new("agk.llm.generate", "b")
                .with_parent("a")
                .with_times("2026-01-01T10:00:02Z", "2026-01-01T10:00:03Z")
                .with_attr(keys::USAGE_TOTAL_TOKENS, 100i64),
            Span::new("agk.agent.run", "a")
                .with_times("2026-01-01T10:00:00Z", "2026-01-01T10:00:05Z"),
            Span::new("agk.tool.search", "c")
                .with_parent("a")
                .with_times("2026-01-01T10:00:04Z", "2026-01-01T10:00:04.500Z"),
            Span::new("agk.workflow.step", "d").with_parent("a"),
        ];
        let trace = TraceObject::collect("run-1", &spans);

        let order: Vec<&str> = trace.events.iter().map(|e| e.span_id.as_str()).collect();
        assert_eq!(order, vec!["d", "a", "b", "c"]);
        assert_eq!(
            trace.reasoning_path(),
            vec![
                EventType::Decision,
                EventType::Thought,
                EventType::LlmCall,
                EventType::ToolCall
            ]
        );

        let summary = &trace.summary;
        assert_eq!(summary.total_events, 4);
        assert_eq!(summary.thought_count, 1);
        assert_eq!(summary.llm_call_count, 1);
        assert_eq!(summary.tool_call_count, 1);
        assert_eq!(summary.decision_count, 1);
        assert_eq!(summary.total_duration_ms, 4000);
        assert_eq!(summary.tokens_used, 100);
        assert!(!summary.has_detailed_data);
    }

    #[test]
    fn test_empty_trace() {
        let trace = TraceObject::collect("run-empty", &[]);
        assert!(trace.events.is_empty());
        assert_eq!(trace.summary.total_duration_ms, 0);
        assert_eq!(trace.start_time, None);
    }

    #[test]
    fn test_root_sentinel_is_not_a_parent() {
        let span = Span::new("a", "1").with_parent(ROOT_PARENT_SENTINEL);
        assert_eq!(TraceEvent::from_span(&span).parent(), None);
    }

    #[test]
    fn test_json_shape() {
        let span = Span::new("agk.tool.call", "1")
            .with_parent("0")
            .with_times("2026-01-01T10:00:00Z", "2026-01-01T10:00:00.250Z");
        let trace = TraceObject::collect("run-1", &[span]);
        let json = serde_json::to_value(&trace).unwrap();
        assert_eq!(json["events"][0]["type"], "tool_call");
        assert_eq!(json["events"][0]["duration_ms"], 250);
        assert_eq!(json["events"][0]["parent_id"], "0");
        assert_eq!(json["summary"]["tool_call_count"], 1);
    }
}
