use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, StatefulWidget, Widget},
};
use tracelens_runtime::RunEntry;

use crate::tui::app::Explorer;

pub fn run_line(entry: &RunEntry, selected: bool) -> Line<'static> {
    let run = &entry.run;
    let status = if run.is_ok() {
        Span::styled("[OK]", Style::default().fg(Color::Green))
    } else {
        Span::styled("[FAIL]", Style::default().fg(Color::Red))
    };
    Line::from(vec![
        Span::raw(if selected { "→ " } else { "  " }),
        Span::styled(
            format!("{:<28}", entry.id),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(format!(
            "  {:<12}  {:>6.2}s  {} LLM  ",
            run.command, run.duration_secs, run.llm_calls
        )),
        status,
    ])
}

pub struct RunListView<'a> {
    app: &'a Explorer,
}

impl<'a> RunListView<'a> {
    pub fn new(app: &'a Explorer) -> Self {
        Self { app }
    }
}

impl<'a> Widget for RunListView<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let cursor = self.app.run_cursor();
        let items: Vec<ListItem> = self
            .app
            .runs()
            .iter()
            .enumerate()
            .map(|(i, entry)| ListItem::new(run_line(entry, i == cursor)))
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("Runs ({})", self.app.runs().len())),
            )
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

        let mut state = ListState::default();
        state.select(Some(cursor));
        StatefulWidget::render(list, area, buf, &mut state);
    }
}
