use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use super::content::tab_lines;
use super::{is_focused, muted, panel_block};
use crate::tui::app::{DetailTab, Explorer, FocusArea};

/// `Overview│Prompt│...` with the active tab highlighted.
pub fn tab_bar(active: DetailTab) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, tab) in DetailTab::ALL.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("│", Style::default().fg(Color::DarkGray)));
        }
        let style = if *tab == active {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!(" {} ", tab.title()), style));
    }
    Line::from(spans)
}

fn body(app: &Explorer) -> Vec<Line<'static>> {
    match app.current_node() {
        Some(id) => tab_lines(app.tree(), id, app.tab()),
        None => vec![muted("No span selected")],
    }
}

fn render_tabbed(app: &Explorer, block: Block<'static>, area: Rect, buf: &mut Buffer) {
    let inner = block.inner(area);
    block.render(area, buf);

    let chunks = Layout::vertical([Constraint::Length(2), Constraint::Min(1)]).split(inner);
    Paragraph::new(vec![tab_bar(app.tab()), Line::default()]).render(chunks[0], buf);
    Paragraph::new(body(app))
        .wrap(Wrap { trim: false })
        .scroll((app.detail_scroll(), 0))
        .render(chunks[1], buf);
}

/// Tabbed panel beside the tree.
pub struct DetailPanel<'a> {
    app: &'a Explorer,
}

impl<'a> DetailPanel<'a> {
    pub fn new(app: &'a Explorer) -> Self {
        Self { app }
    }
}

impl<'a> Widget for DetailPanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = panel_block("Details", is_focused(self.app, FocusArea::Details));
        render_tabbed(self.app, block, area, buf);
    }
}

/// Full-screen view of the selected span.
pub struct DetailScreen<'a> {
    app: &'a Explorer,
}

impl<'a> DetailScreen<'a> {
    pub fn new(app: &'a Explorer) -> Self {
        Self { app }
    }
}

impl<'a> Widget for DetailScreen<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = match self.app.current_node() {
            Some(id) => format!("📋 Span: {}", self.app.tree().node(id).span.friendly_name()),
            None => "📋 Span".to_string(),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(Color::Cyan));
        render_tabbed(self.app, block, area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_bar() {
        assert_eq!(
            tab_bar(DetailTab::Prompt).to_string(),
            " Overview │ Prompt │ Response │ Attributes │ Timing "
        );
    }
}
