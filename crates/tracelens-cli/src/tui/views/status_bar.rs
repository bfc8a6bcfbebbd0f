//! Bottom bar: focus indicator, key hints for the current mode, search count
//! and the latest notice.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::tui::app::{Explorer, FocusArea, ViewMode};

pub fn focus_label(app: &Explorer) -> String {
    match app.view() {
        ViewMode::RunList => "Run List".to_string(),
        ViewMode::Detail => format!("Detail:{}", app.tab().title()),
        ViewMode::Tree => match app.focus() {
            FocusArea::Tree => "Tree".to_string(),
            FocusArea::Details => format!("Details:{}", app.tab().title()),
            FocusArea::Metadata => "Metadata".to_string(),
        },
    }
}

pub fn key_hints(app: &Explorer) -> &'static [(&'static str, &'static str)] {
    if app.search().is_typing() {
        return &[
            ("[Type]", "Search"),
            ("[Enter]", "Confirm"),
            ("[Esc]", "Cancel"),
        ];
    }
    match app.view() {
        ViewMode::RunList => &[("[↑↓]", "Navigate"), ("[Enter]", "Open"), ("[q]", "Quit")],
        ViewMode::Tree => &[
            ("[Tab]", "Focus"),
            ("[←→]", "Tabs"),
            ("[↑↓]", "Nav"),
            ("[h/l]", "Fold"),
            ("[d]", "Detail"),
            ("[/]", "Search"),
            ("[e]", "Errors"),
            ("[q]", "Quit"),
        ],
        ViewMode::Detail => &[
            ("[←→]", "Tabs"),
            ("[1-5]", "Jump"),
            ("[↑↓]", "Scroll"),
            ("[Esc]", "Back"),
            ("[q]", "Quit"),
        ],
    }
}

pub struct StatusBarView<'a> {
    app: &'a Explorer,
}

impl<'a> StatusBarView<'a> {
    pub fn new(app: &'a Explorer) -> Self {
        Self { app }
    }
}

impl<'a> Widget for StatusBarView<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = vec![
            Span::styled(
                format!(" {} ", focus_label(self.app)),
                Style::default().fg(Color::Black).bg(Color::Cyan),
            ),
            Span::raw("  "),
        ];

        for (key, label) in key_hints(self.app) {
            spans.push(Span::styled(*key, Style::default().fg(Color::Yellow)));
            spans.push(Span::raw(format!(" {}  ", label)));
        }

        let matches = self.app.search().matches.len();
        if matches > 0 && !self.app.search().is_typing() {
            spans.push(Span::styled(
                format!("🔍 {} matches  ", matches),
                Style::default().fg(Color::Cyan),
            ));
        }
        if let Some(notice) = self.app.notice() {
            spans.push(Span::styled(notice.to_string(), Style::default().fg(Color::Red)));
        }

        Paragraph::new(Line::from(spans))
            .block(Block::default().borders(Borders::ALL))
            .render(area, buf);
    }
}
