use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::attribute::{Attribute, AttributeValue};
use crate::keys;

/// Parent SpanID written by exporters for spans that have no parent.
pub const ROOT_PARENT_SENTINEL: &str = "0000000000000000";

/// Status codes that do not indicate a failure.
const NON_ERROR_CODES: [&str; 3] = ["", "Unset", "Ok"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpanContext {
    #[serde(rename = "TraceID", default)]
    pub trace_id: String,
    #[serde(rename = "SpanID", default)]
    pub span_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpanStatus {
    #[serde(rename = "Code", default)]
    pub code: String,
    #[serde(rename = "Description", default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// Display category of a span, derived from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanKind {
    Workflow,
    Agent,
    Llm,
    Tool,
    Other,
}

impl SpanKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpanKind::Workflow => "workflow",
            SpanKind::Agent => "agent",
            SpanKind::Llm => "llm",
            SpanKind::Tool => "tool",
            SpanKind::Other => "other",
        }
    }
}

/// One line of the trace file.
///
/// Immutable after parsing. Attributes keep their original order; `attr()`
/// reads through a lookup map built once at construction where a repeated
/// key resolves to its last occurrence. Wire fields without a typed home
/// (`SpanKind`, `Resource`, `Events`, ...) ride along in `extra` and are
/// written back unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "SpanRecord", into = "SpanRecord")]
pub struct Span {
    pub name: String,
    pub start_time: String,
    pub end_time: String,
    pub context: SpanContext,
    pub parent: SpanContext,
    pub attributes: Vec<Attribute>,
    pub status: SpanStatus,
    pub extra: Map<String, Value>,
    lookup: HashMap<String, usize>,
}

#[derive(Serialize, Deserialize)]
struct SpanRecord {
    #[serde(rename = "Name", default)]
    name: String,
    #[serde(rename = "StartTime", default, skip_serializing_if = "String::is_empty")]
    start_time: String,
    #[serde(rename = "EndTime", default, skip_serializing_if = "String::is_empty")]
    end_time: String,
    #[serde(rename = "SpanContext", default)]
    context: SpanContext,
    #[serde(rename = "Parent", default, skip_serializing_if = "is_default")]
    parent: SpanContext,
    #[serde(rename = "Attributes", default, skip_serializing_if = "Vec::is_empty")]
    attributes: Vec<Attribute>,
    #[serde(rename = "Status", default, skip_serializing_if = "is_default")]
    status: SpanStatus,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

fn is_default<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}

impl From<SpanRecord> for Span {
    fn from(record: SpanRecord) -> Self {
        let mut span = Span {
            name: record.name,
            start_time: record.start_time,
            end_time: record.end_time,
            context: record.context,
            parent: record.parent,
            attributes: record.attributes,
            status: record.status,
            extra: record.extra,
            lookup: HashMap::new(),
        };
        span.reindex();
        span
    }
}

impl From<Span> for SpanRecord {
    fn from(span: Span) -> Self {
        SpanRecord {
            name: span.name,
            start_time: span.start_time,
            end_time: span.end_time,
            context: span.context,
            parent: span.parent,
            attributes: span.attributes,
            status: span.status,
            extra: span.extra,
        }
    }
}

impl Span {
    pub fn new(name: impl Into<String>, span_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start_time: String::new(),
            end_time: String::new(),
            context: SpanContext {
                trace_id: String::new(),
                span_id: span_id.into(),
            },
            parent: SpanContext::default(),
            attributes: Vec::new(),
            status: SpanStatus::default(),
            extra: Map::new(),
            lookup: HashMap::new(),
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent.span_id = parent_id.into();
        self
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        let trace_id = trace_id.into();
        self.parent.trace_id = trace_id.clone();
        self.context.trace_id = trace_id;
        self
    }

    pub fn with_times(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_time = start.into();
        self.end_time = end.into();
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.push(Attribute::new(key, value));
        self.reindex();
        self
    }

    pub fn with_status(mut self, code: impl Into<String>, description: impl Into<String>) -> Self {
        self.status = SpanStatus {
            code: code.into(),
            description: description.into(),
        };
        self
    }

    fn reindex(&mut self) {
        self.lookup.clear();
        for (i, attr) in self.attributes.iter().enumerate() {
            if attr.value.value.is_some() {
                self.lookup.insert(attr.key.clone(), i);
            }
        }
    }

    pub fn span_id(&self) -> &str {
        &self.context.span_id
    }

    pub fn trace_id(&self) -> &str {
        &self.context.trace_id
    }

    /// The parent SpanID, or `None` for an empty id or the zero sentinel.
    pub fn parent_span_id(&self) -> Option<&str> {
        let id = self.parent.span_id.as_str();
        if id.is_empty() || id == ROOT_PARENT_SENTINEL {
            None
        } else {
            Some(id)
        }
    }

    pub fn attr(&self, key: &str) -> Option<&AttributeValue> {
        let idx = *self.lookup.get(key)?;
        self.attributes.get(idx)?.value.value.as_ref()
    }

    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attr(key).and_then(AttributeValue::as_str)
    }

    /// Flattened attributes, last occurrence wins, in first-seen key order.
    pub fn attrs(&self) -> Vec<(&str, &AttributeValue)> {
        self.attributes
            .iter()
            .enumerate()
            .filter(|(i, attr)| self.lookup.get(&attr.key) == Some(i))
            .filter_map(|(_, attr)| Some((attr.key.as_str(), attr.value.value.as_ref()?)))
            .collect()
    }

    pub fn start(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.start_time)
    }

    pub fn end(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.end_time)
    }

    /// Whole milliseconds between start and end. Zero when either bound is
    /// missing or unparseable, and when the end precedes the start.
    pub fn duration_ms(&self) -> u64 {
        match (self.start(), self.end()) {
            (Some(start), Some(end)) => (end - start).num_milliseconds().max(0) as u64,
            _ => 0,
        }
    }

    /// OpenTelemetry span kind as written by the exporter (`0` unspecified
    /// through `5` consumer). Distinct from the display [`SpanKind`].
    pub fn wire_kind(&self) -> Option<i64> {
        self.extra.get("SpanKind").and_then(Value::as_i64)
    }

    pub fn is_error(&self) -> bool {
        !NON_ERROR_CODES.contains(&self.status.code.as_str())
    }

    pub fn kind(&self) -> SpanKind {
        let name = self.name.to_lowercase();
        if name.contains("workflow") {
            SpanKind::Workflow
        } else if name.contains("agent") {
            SpanKind::Agent
        } else if name.contains("llm") {
            SpanKind::Llm
        } else if name.contains("tool") || name.contains("mcp") {
            SpanKind::Tool
        } else {
            SpanKind::Other
        }
    }

    pub fn is_workflow_step(&self) -> bool {
        self.name.to_lowercase().contains("workflow.step")
    }

    pub fn friendly_name(&self) -> String {
        let name = self.name.to_lowercase();

        if name.contains("workflow.step")
            && let Some(step) = self.attr(keys::WORKFLOW_STEP_NAME)
        {
            return format!("🔹 {}", step);
        }

        for (marker, label) in [
            ("agk.workflow.sequential", "📋 Sequential Workflow"),
            ("agk.workflow.parallel", "⚡ Parallel Workflow"),
            ("agk.workflow.dag", "🔀 DAG Workflow"),
            ("agk.workflow.loop", "🔄 Loop Workflow"),
        ] {
            if name.contains(marker) {
                return label.to_string();
            }
        }

        if name.contains("llm")
            && let Some(model) = self.attr(keys::LLM_MODEL)
        {
            let provider = self
                .attr(keys::LLM_PROVIDER)
                .map(|p| p.to_string())
                .unwrap_or_else(|| "llm".to_string());
            return format!("🤖 {} [{}]", provider, model);
        }

        if name.contains("agk.agent.run") {
            return match self.attr(keys::LLM_MODEL) {
                Some(model) => format!("🤖 Agent [{}]", model),
                None => "🤖 Agent".to_string(),
            };
        }

        self.name.clone()
    }
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if raw.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}
