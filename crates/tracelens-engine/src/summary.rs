use chrono::{DateTime, Utc};
use tracelens_types::{Span, TraceRun};

use crate::audit::{EventType, classify};
use crate::metrics::{estimate_cost, span_tokens};

/// Build a [`TraceRun`] from the span log when no manifest sidecar exists.
pub fn summarize_run(run_id: &str, spans: &[Span]) -> TraceRun {
    let mut first: Option<DateTime<Utc>> = None;
    let mut last: Option<DateTime<Utc>> = None;
    let mut llm_calls = 0;
    let mut tokens = 0u64;

    for span in spans {
        if classify(&span.name) == EventType::LlmCall {
            llm_calls += 1;
        }
        tokens += span_tokens(span);

        if let Some(start) = span.start() {
            first = Some(first.map_or(start, |f| f.min(start)));
            last = Some(last.map_or(start, |l| l.max(start)));
        }
        if let Some(end) = span.end() {
            last = Some(last.map_or(end, |l| l.max(end)));
        }
    }

    let duration_secs = match (first, last) {
        (Some(f), Some(l)) => ((l - f).num_milliseconds().max(0) as f64) / 1000.0,
        _ => 0.0,
    };

    TraceRun {
        run_id: run_id.to_string(),
        command: command_from_run_id(run_id),
        status: "completed".to_string(),
        start_time: first.map(|t| t.to_rfc3339()).unwrap_or_default(),
        end_time: last.map(|t| t.to_rfc3339()),
        duration_secs,
        span_count: spans.len(),
        llm_calls,
        total_tokens: tokens,
        estimated_cost: estimate_cost(tokens),
    }
}

/// Run ids look like `run-<stamp>` or `run-<stamp>-<command>`; the command
/// may itself contain dashes.
pub fn command_from_run_id(run_id: &str) -> String {
    let parts: Vec<&str> = run_id.split('-').collect();
    if parts.len() > 2 {
        parts[2..].join("-")
    } else {
        "agent".to_string()
    }
}
