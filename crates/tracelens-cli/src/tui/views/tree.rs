use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph, StatefulWidget, Widget},
};
use tracelens_engine::{NodeId, SpanTree};
use tracelens_types::keys;

use super::{is_focused, kind_color, panel_block};
use crate::tui::app::{Explorer, FocusArea};

/// One row of the tree: indent, fold marker, name, then badges.
pub fn span_line(tree: &SpanTree, id: NodeId, selected: bool, matched: bool) -> Line<'static> {
    let node = tree.node(id);
    let span = &node.span;

    let marker = if node.is_leaf() {
        "  "
    } else if node.expanded {
        "▼ "
    } else {
        "▶ "
    };

    let mut parts = vec![
        Span::raw(if selected { "→ " } else { "  " }),
        Span::raw("  ".repeat(node.depth)),
        Span::styled(marker, Style::default().fg(Color::DarkGray)),
        Span::styled(
            span.friendly_name(),
            Style::default().fg(kind_color(span.kind())),
        ),
    ];

    if span.is_workflow_step()
        && let Some(model) = span.attr(keys::LLM_MODEL)
    {
        parts.push(Span::styled(
            format!(" [{}]", model),
            Style::default().fg(Color::DarkGray),
        ));
    }
    if span.is_error() {
        parts.push(Span::styled(
            " [ERR]",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }
    if matched {
        parts.push(Span::raw(" 🔍"));
    }
    parts.push(Span::styled(
        format!(" ({}ms)", node.duration_ms),
        Style::default().fg(Color::DarkGray),
    ));

    Line::from(parts)
}

pub struct TreePanel<'a> {
    app: &'a Explorer,
}

impl<'a> TreePanel<'a> {
    pub fn new(app: &'a Explorer) -> Self {
        Self { app }
    }
}

impl<'a> Widget for TreePanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = panel_block("Trace Tree", is_focused(self.app, FocusArea::Tree));

        if self.app.visible().is_empty() {
            Paragraph::new("No spans yet")
                .style(Style::default().fg(Color::DarkGray))
                .block(block)
                .render(area, buf);
            return;
        }

        let tree = self.app.tree();
        let cursor = self.app.cursor();
        let items: Vec<ListItem> = self
            .app
            .visible()
            .iter()
            .enumerate()
            .map(|(i, &id)| ListItem::new(span_line(tree, id, i == cursor, self.app.is_match(id))))
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

        let mut state = ListState::default();
        state.select(Some(cursor));
        StatefulWidget::render(list, area, buf, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracelens_testing::fixtures::{sequential_workflow, spans};

    fn line(tree: &SpanTree, span_id: &str, selected: bool, matched: bool) -> String {
        span_line(tree, tree.find(span_id).unwrap(), selected, matched).to_string()
    }

    #[test]
    fn test_span_lines() {
        let mut tree = SpanTree::build(spans(&sequential_workflow()));
        assert_eq!(line(&tree, "wf", true, false), "→ ▼ 📋 Sequential Workflow (5000ms)");
        assert_eq!(line(&tree, "s1", false, false), "    ▼ 🔹 research (3000ms)");
        assert_eq!(line(&tree, "t1", false, true), "          agk.tool.web_search [ERR] 🔍 (900ms)");

        let s2 = tree.find("s2").unwrap();
        tree.toggle(s2);
        assert_eq!(line(&tree, "s2", false, false), "    ▶ 🔹 write (1800ms)");
    }
}
