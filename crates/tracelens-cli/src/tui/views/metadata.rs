use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Paragraph, Widget, Wrap},
};

use super::content::metadata_lines;
use super::{is_focused, muted, panel_block};
use crate::tui::app::{Explorer, FocusArea};

pub struct MetadataPanel<'a> {
    app: &'a Explorer,
}

impl<'a> MetadataPanel<'a> {
    pub fn new(app: &'a Explorer) -> Self {
        Self { app }
    }
}

impl<'a> Widget for MetadataPanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = match self.app.current_node() {
            Some(id) => metadata_lines(self.app.tree(), id),
            None => vec![muted("No span selected")],
        };

        Paragraph::new(lines)
            .block(panel_block("Metadata", is_focused(self.app, FocusArea::Metadata)))
            .wrap(Wrap { trim: false })
            .scroll((self.app.metadata_scroll(), 0))
            .render(area, buf);
    }
}
