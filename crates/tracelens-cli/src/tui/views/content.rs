//! Text of the detail tabs and the metadata panel.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span as TextSpan};
use tracelens_engine::{NodeId, SpanTree, estimate_cost, span_tokens};
use tracelens_types::{Span, keys};

use super::{field, muted, section};
use crate::presentation::format::{format_cost, format_timestamp, short_id, short_key};
use crate::tui::DetailTab;

const LABEL: usize = 12;
const ATTR_LABEL: usize = 30;

pub fn tab_lines(tree: &SpanTree, id: NodeId, tab: DetailTab) -> Vec<Line<'static>> {
    let span = &tree.node(id).span;
    match tab {
        DetailTab::Overview => overview(tree, id),
        DetailTab::Prompt => prompt(span),
        DetailTab::Response => response(span),
        DetailTab::Attributes => attributes(span),
        DetailTab::Timing => timing(tree, id),
    }
}

fn status_line(span: &Span) -> Line<'static> {
    let (text, color) = if span.is_error() {
        (span.status.code.clone(), Color::Red)
    } else {
        ("OK".to_string(), Color::Green)
    };
    Line::from(vec![
        TextSpan::styled(
            format!("{:<width$} ", "Status:", width = LABEL),
            Style::default().fg(Color::Gray),
        ),
        TextSpan::styled(text, Style::default().fg(color).add_modifier(Modifier::BOLD)),
    ])
}

fn text_block(lines: &mut Vec<Line<'static>>, title: &str, text: &str) {
    lines.push(section(title));
    lines.push(Line::default());
    lines.extend(text.lines().map(|l| Line::from(l.to_string())));
    lines.push(Line::default());
}

fn overview(tree: &SpanTree, id: NodeId) -> Vec<Line<'static>> {
    let node = tree.node(id);
    let span = &node.span;
    let mut lines = vec![
        section("Overview"),
        Line::default(),
        field("Name:", LABEL, span.friendly_name()),
        field("Type:", LABEL, span.kind().as_str()),
        field("Duration:", LABEL, format!("{}ms", node.duration_ms)),
        status_line(span),
    ];
    if !span.status.description.is_empty() {
        lines.push(field("Message:", LABEL, span.status.description.clone()));
    }

    if let Some(total) = span.attr(keys::USAGE_TOTAL_TOKENS) {
        lines.push(Line::default());
        lines.push(section("Resource Usage"));
        lines.push(field("Tokens:", LABEL, total.to_string()));
        if let Some(prompt) = span.attr(keys::USAGE_PROMPT_TOKENS) {
            lines.push(field("  Prompt:", LABEL, prompt.to_string()));
        }
        if let Some(completion) = span.attr(keys::USAGE_COMPLETION_TOKENS) {
            lines.push(field("  Response:", LABEL, completion.to_string()));
        }
    }

    if let Some(model) = span
        .attr(keys::GENERIC_MODEL)
        .or_else(|| span.attr(keys::LLM_MODEL))
    {
        lines.push(Line::default());
        lines.push(field("Model:", LABEL, model.to_string()));
    }
    lines
}

fn prompt(span: &Span) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (key, title) in [
        (keys::PROMPT_SYSTEM, "System Prompt"),
        (keys::PROMPT_USER, "User Prompt"),
        (keys::REQUEST_MESSAGES, "Messages"),
    ] {
        if let Some(value) = span.attr(key) {
            text_block(&mut lines, title, &value.to_string());
        }
    }
    if lines.is_empty() {
        lines.push(muted("No prompt data available for this span"));
    }
    lines
}

fn response(span: &Span) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (key, title) in [
        (keys::LLM_RESPONSE, "Response Text"),
        (keys::TOOL_RESULT, "Tool Result"),
    ] {
        if let Some(value) = span.attr(key) {
            text_block(&mut lines, title, &value.to_string());
        }
    }
    if let Some(reason) = span.attr(keys::FINISH_REASON) {
        lines.push(field("Finish Reason:", 15, reason.to_string()));
    }
    if lines.is_empty() {
        lines.push(muted("No response data available for this span"));
    }
    lines
}

fn attributes(span: &Span) -> Vec<Line<'static>> {
    let mut attrs = span.attrs();
    if attrs.is_empty() {
        return vec![muted("No attributes available")];
    }
    attrs.sort_by(|a, b| a.0.cmp(b.0));

    let mut lines = vec![section("All Attributes"), Line::default()];
    lines.extend(attrs.into_iter().map(|(key, value)| {
        field(&format!("{}:", short_key(key)), ATTR_LABEL, value.to_string())
    }));
    lines
}

fn timing(tree: &SpanTree, id: NodeId) -> Vec<Line<'static>> {
    let node = tree.node(id);
    let span = &node.span;
    let mut lines = vec![
        section("Timing Details"),
        Line::default(),
        field("Duration:", LABEL, format!("{}ms", node.duration_ms)),
        field("Start Time:", LABEL, format_timestamp(&span.start_time)),
        field("End Time:", LABEL, format_timestamp(&span.end_time)),
    ];

    if !node.children.is_empty() {
        lines.push(Line::default());
        lines.push(section("Child Spans"));
        lines.push(Line::default());

        let mut child_total = 0u64;
        for &child_id in &node.children {
            let child = tree.node(child_id);
            child_total += child.duration_ms;
            let pct = if node.duration_ms > 0 {
                child.duration_ms as f64 / node.duration_ms as f64 * 100.0
            } else {
                0.0
            };
            let bar = "█".repeat((pct / 2.0).clamp(0.0, 50.0) as usize);
            lines.push(Line::from(vec![
                TextSpan::raw(format!(
                    "{:<30} {:>6}ms {:>5.1}% ",
                    child.span.friendly_name(),
                    child.duration_ms,
                    pct
                )),
                TextSpan::styled(bar, Style::default().fg(Color::Blue)),
            ]));
        }

        lines.push(Line::default());
        lines.push(field("Total Child Time:", 18, format!("{}ms", child_total)));
        let self_time = node.duration_ms.saturating_sub(child_total);
        if self_time > 0 {
            lines.push(field("Self Time:", 18, format!("{}ms", self_time)));
        }
    }

    if let Some(ttft) = span.attr(keys::TIME_TO_FIRST_TOKEN) {
        lines.push(Line::default());
        lines.push(section("Performance Metrics"));
        lines.push(Line::default());
        lines.push(field("Time to First Token:", 24, ttft.to_string()));
    }
    lines
}

/// Right-hand panel: identity, status, timing, resources, then attributes
/// with the commonly inspected keys first.
pub fn metadata_lines(tree: &SpanTree, id: NodeId) -> Vec<Line<'static>> {
    const W: usize = 10;
    let node = tree.node(id);
    let span = &node.span;

    let mut lines = vec![
        section("Identity"),
        field("Type:", W, span.kind().as_str()),
        field("Span ID:", W, short_id(span.span_id())),
    ];
    if let Some(parent) = node.parent {
        lines.push(field("Parent:", W, short_id(tree.node(parent).span.span_id())));
    }

    lines.push(Line::default());
    lines.push(section("Status"));
    lines.push(status_line(span));

    lines.push(Line::default());
    lines.push(section("Timing"));
    lines.push(field("Duration:", W, format!("{}ms", node.duration_ms)));
    lines.push(field("Start:", W, format_timestamp(&span.start_time)));

    let tokens = span_tokens(span);
    if tokens > 0 {
        lines.push(Line::default());
        lines.push(section("Resources"));
        lines.push(field("Tokens:", W, tokens.to_string()));
        lines.push(field("Cost:", W, format_cost(estimate_cost(tokens))));
    }

    if span.is_error() && !span.status.description.is_empty() {
        lines.push(Line::default());
        lines.push(Line::from(TextSpan::styled(
            "Error",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(TextSpan::styled(
            span.status.description.clone(),
            Style::default().fg(Color::Red),
        )));
    }

    let important: Vec<_> = keys::IMPORTANT
        .iter()
        .filter_map(|key| span.attr(key).map(|value| (*key, value)))
        .collect();
    if !important.is_empty() {
        lines.push(Line::default());
        lines.push(section("Key Attributes"));
        lines.extend(
            important
                .into_iter()
                .map(|(key, value)| field(&format!("{}:", short_key(key)), 16, value.to_string())),
        );
    }

    let attrs = span.attrs();
    if !attrs.is_empty() {
        lines.push(Line::default());
        lines.push(section("All Attributes"));
        lines.extend(
            attrs
                .into_iter()
                .map(|(key, value)| field(&format!("{}:", short_key(key)), 16, value.to_string())),
        );
    }
    lines
}
