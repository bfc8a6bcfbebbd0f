use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::tui::app::Explorer;
use tracelens_types::keys;

const TITLE: &str = "TraceLens Explorer";

/// Spans slower than this are called out as the bottleneck.
const BOTTLENECK_MS: u64 = 100;

pub struct HeaderView<'a> {
    app: &'a Explorer,
}

impl<'a> HeaderView<'a> {
    pub fn new(app: &'a Explorer) -> Self {
        Self { app }
    }
}

impl<'a> Widget for HeaderView<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = Vec::new();
        if self.app.is_live() {
            spans.push(Span::styled(
                "🔴 LIVE  ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ));
        }
        spans.push(Span::styled(
            TITLE,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));

        Paragraph::new(Line::from(spans))
            .block(
                Block::default()
                    .borders(Borders::BOTTOM)
                    .border_style(Style::default().fg(Color::DarkGray)),
            )
            .render(area, buf);
    }
}

pub fn back_hint(app: &Explorer) -> Paragraph<'static> {
    Paragraph::new(Line::from(Span::styled(
        format!(
            "[Esc] Back to list  |  Run {}/{}",
            app.selected_run() + 1,
            app.runs().len()
        ),
        Style::default().fg(Color::DarkGray),
    )))
}

pub fn narrow_warning() -> Paragraph<'static> {
    Paragraph::new(Line::from(Span::styled(
        "⚠ Terminal narrow - stacked layout",
        Style::default().fg(Color::Yellow),
    )))
}

/// Run id, one line of stats, then the bottleneck and the top three spans
/// when there are any.
pub fn summary_lines(app: &Explorer) -> Vec<Line<'static>> {
    let run = app.manifest();
    let metrics = app.metrics();
    let tree = app.tree();

    let mut lines = vec![Line::from(Span::styled(
        format!("Run: {}", app.run_id()),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ))];

    let sep = || Span::styled("  |  ", Style::default().fg(Color::DarkGray));
    let mut stats = vec![
        Span::raw(format!("Duration: {:.2}s", run.duration_secs)),
        sep(),
        Span::raw(format!("Spans: {}", run.span_count)),
        sep(),
        Span::raw(format!("LLM: {}", run.llm_calls)),
    ];
    if metrics.total_tokens > 0 {
        stats.push(sep());
        stats.push(Span::raw(format!("Tokens: {}", metrics.total_tokens)));
        stats.push(sep());
        stats.push(Span::raw(format!("Cost: ${:.4}", metrics.estimated_cost())));
    }
    stats.push(sep());
    stats.push(Span::raw("Status: "));
    if run.is_ok() {
        stats.push(Span::styled("[OK]", Style::default().fg(Color::Green)));
    } else {
        stats.push(Span::styled("[FAIL]", Style::default().fg(Color::Red)));
    }
    if metrics.error_count > 0 {
        stats.push(sep());
        stats.push(Span::styled(
            format!("Errors: {}", metrics.error_count),
            Style::default().fg(Color::Red),
        ));
    }
    lines.push(Line::from(stats));

    if let Some(slowest) = metrics.slowest {
        let node = tree.node(slowest);
        if node.duration_ms > BOTTLENECK_MS {
            let span = &node.span;
            let name = match (
                span.attr(keys::WORKFLOW_STEP_NAME),
                span.attr(keys::LLM_MODEL),
            ) {
                (Some(step), _) => step.to_string(),
                (None, Some(model)) => format!("{} [{}]", span.name, model),
                (None, None) => span.name.clone(),
            };
            lines.push(Line::from(vec![
                Span::styled("Bottleneck: ", Style::default().fg(Color::Yellow)),
                Span::raw(format!("{} ({}ms)", name, node.duration_ms)),
            ]));
        }
    }

    if !metrics.top3.is_empty() {
        let top = metrics
            .top3
            .iter()
            .map(|&id| {
                let node = tree.node(id);
                format!("{} ({}ms)", node.span.friendly_name(), node.duration_ms)
            })
            .collect::<Vec<_>>()
            .join(" · ");
        lines.push(Line::from(vec![
            Span::styled("Slowest: ", Style::default().fg(Color::DarkGray)),
            Span::raw(top),
        ]));
    }

    lines
}

pub struct RunSummaryView<'a> {
    app: &'a Explorer,
}

impl<'a> RunSummaryView<'a> {
    pub fn new(app: &'a Explorer) -> Self {
        Self { app }
    }
}

impl<'a> Widget for RunSummaryView<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(summary_lines(self.app))
            .block(
                Block::default()
                    .borders(Borders::BOTTOM)
                    .border_style(Style::default().fg(Color::DarkGray)),
            )
            .render(area, buf);
    }
}

pub struct SearchBarView<'a> {
    app: &'a Explorer,
}

impl<'a> SearchBarView<'a> {
    pub fn new(app: &'a Explorer) -> Self {
        Self { app }
    }
}

impl<'a> Widget for SearchBarView<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let search = self.app.search();
        let mut spans = vec![
            Span::styled("Search: ", Style::default().fg(Color::Yellow)),
            Span::raw(search.input.clone().unwrap_or_default()),
            Span::styled("█", Style::default().fg(Color::Yellow)),
        ];
        if !search.matches.is_empty() {
            spans.push(Span::styled(
                format!(" ({} matches)", search.matches.len()),
                Style::default().fg(Color::DarkGray),
            ));
        }

        Paragraph::new(Line::from(spans))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow)),
            )
            .render(area, buf);
    }
}
