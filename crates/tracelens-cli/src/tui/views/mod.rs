//! Explorer widgets.
//!
//! Each view is a thin wrapper borrowing the `Explorer` and implementing
//! `Widget`. Text for the detail tabs and the metadata panel is built by the
//! pure functions in `content` so it can be tested without a terminal.

pub mod content;
pub mod detail;
pub mod header;
pub mod metadata;
pub mod run_list;
pub mod status_bar;
pub mod tree;

pub use detail::{DetailPanel, DetailScreen};
pub use header::{HeaderView, RunSummaryView, SearchBarView};
pub use metadata::MetadataPanel;
pub use run_list::RunListView;
pub use status_bar::StatusBarView;
pub use tree::TreePanel;

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders},
};
use tracelens_types::SpanKind;

use super::app::{Explorer, FocusArea, ViewMode};

/// Below this width the three panels stack vertically.
pub const NARROW_WIDTH: u16 = 100;

pub fn draw(f: &mut Frame, app: &Explorer) {
    let size = f.area();

    // Main layout: [Header | Body | Status Bar]
    let main_chunks = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(5),
        Constraint::Length(3),
    ])
    .split(size);

    f.render_widget(HeaderView::new(app), main_chunks[0]);
    match app.view() {
        ViewMode::RunList => f.render_widget(RunListView::new(app), main_chunks[1]),
        ViewMode::Tree => draw_tree_view(f, app, main_chunks[1]),
        ViewMode::Detail => f.render_widget(DetailScreen::new(app), main_chunks[1]),
    }
    f.render_widget(StatusBarView::new(app), main_chunks[2]);
}

fn draw_tree_view(f: &mut Frame, app: &Explorer, area: Rect) {
    let narrow = area.width < NARROW_WIDTH;
    let summary_height = header::summary_lines(app).len() as u16 + 1;

    let mut constraints = Vec::new();
    if !app.runs().is_empty() {
        constraints.push(Constraint::Length(1));
    }
    if narrow {
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Length(summary_height));
    constraints.push(Constraint::Min(5));
    if app.search().is_typing() {
        constraints.push(Constraint::Length(3));
    }
    let chunks = Layout::vertical(constraints).split(area);

    let mut next = 0;
    if !app.runs().is_empty() {
        f.render_widget(header::back_hint(app), chunks[next]);
        next += 1;
    }
    if narrow {
        f.render_widget(header::narrow_warning(), chunks[next]);
        next += 1;
    }
    f.render_widget(RunSummaryView::new(app), chunks[next]);
    let panels = chunks[next + 1];
    if app.search().is_typing() {
        f.render_widget(SearchBarView::new(app), chunks[next + 2]);
    }

    let (tree_area, detail_area, metadata_area) = if narrow {
        let stacked = Layout::vertical([
            Constraint::Percentage(40),
            Constraint::Percentage(35),
            Constraint::Percentage(25),
        ])
        .split(panels);
        (stacked[0], stacked[1], stacked[2])
    } else {
        let columns =
            Layout::horizontal([Constraint::Percentage(66), Constraint::Percentage(34)])
                .split(panels);
        let left = Layout::vertical([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(columns[0]);
        (left[0], left[1], columns[1])
    };

    f.render_widget(TreePanel::new(app), tree_area);
    f.render_widget(DetailPanel::new(app), detail_area);
    f.render_widget(MetadataPanel::new(app), metadata_area);
}

/// Bordered panel; the focused one gets a thick cyan border and a marker.
pub(crate) fn panel_block(title: &str, focused: bool) -> Block<'static> {
    let block = Block::default().borders(Borders::ALL);
    if focused {
        block
            .title(format!("▶ {}", title))
            .border_type(BorderType::Thick)
            .border_style(Style::default().fg(Color::Cyan))
    } else {
        block
            .title(title.to_string())
            .border_style(Style::default().fg(Color::DarkGray))
    }
}

pub(crate) fn is_focused(app: &Explorer, area: FocusArea) -> bool {
    app.focus() == area && !app.search().is_typing()
}

pub(crate) fn kind_color(kind: SpanKind) -> Color {
    match kind {
        SpanKind::Workflow => Color::Magenta,
        SpanKind::Agent => Color::Cyan,
        SpanKind::Llm => Color::Green,
        SpanKind::Tool => Color::Yellow,
        SpanKind::Other => Color::White,
    }
}

pub(crate) fn section(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ))
}

pub(crate) fn muted(text: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(text.into(), Style::default().fg(Color::DarkGray)))
}

/// `label` padded to `width`, then the value.
pub(crate) fn field(label: &str, width: usize, value: impl Into<String>) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{:<width$} ", label, width = width),
            Style::default().fg(Color::Gray),
        ),
        Span::raw(value.into()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{Terminal, backend::TestBackend};
    use tracelens_runtime::LiveTrace;
    use tracelens_testing::fixtures::{sequential_workflow, spans};
    use tracelens_types::TraceRun;

    fn screen_text(app: &Explorer, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn explorer() -> Explorer {
        let trace = LiveTrace::from_spans(spans(&sequential_workflow()));
        Explorer::single("run-20260101-research", TraceRun::default(), trace)
    }

    #[test]
    fn test_wide_layout_renders_all_panels() {
        let text = screen_text(&explorer(), 140, 40);
        assert!(text.contains("Trace Tree"));
        assert!(text.contains("Details"));
        assert!(text.contains("Metadata"));
        assert!(text.contains("Run: run-20260101-research"));
        assert!(!text.contains("Terminal narrow"));
    }

    #[test]
    fn test_narrow_layout_warns() {
        let text = screen_text(&explorer(), 80, 50);
        assert!(text.contains("Terminal narrow - stacked layout"));
        assert!(text.contains("Trace Tree"));
    }

    #[test]
    fn test_empty_trace_renders() {
        let app = Explorer::single("run-empty", TraceRun::default(), LiveTrace::from_spans(Vec::new()));
        let text = screen_text(&app, 120, 30);
        assert!(text.contains("No spans"));
    }
}
