//! Conversions for external trace viewers.

use serde_json::{Value, json};
use tracelens_types::Span;

pub const SERVICE_NAME: &str = "tracelens";

/// `{traceID, spans: [...]}` in the shape Jaeger's JSON import expects.
pub fn to_jaeger(spans: &[Span]) -> Value {
    let converted: Vec<Value> = spans
        .iter()
        .map(|span| {
            let tags: Vec<Value> = span
                .attributes
                .iter()
                .map(|attr| json!({ "key": attr.key, "value": attr.value }))
                .collect();
            json!({
                "traceID": span.trace_id(),
                "spanID": span.span_id(),
                "operationName": span.name,
                "startTime": span.start_time,
                "endTime": span.end_time,
                "tags": tags,
            })
        })
        .collect();

    json!({
        "traceID": spans.first().map(Span::trace_id).unwrap_or_default(),
        "spans": converted,
    })
}

/// Single-resource OTLP/JSON document wrapping the spans as written.
pub fn to_otlp(spans: &[Span]) -> Value {
    json!({
        "resourceSpans": [{
            "resource": {
                "attributes": [
                    { "key": "service.name", "value": { "stringValue": SERVICE_NAME } },
                    { "key": "service.version", "value": { "stringValue": env!("CARGO_PKG_VERSION") } },
                ]
            },
            "scopeSpans": [{
                "scope": { "name": SERVICE_NAME },
                "spans": spans,
            }]
        }]
    })
}
