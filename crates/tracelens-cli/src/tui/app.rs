//! Explorer state machine.
//!
//! ```text
//! RunList --Enter--> Tree --d/Enter on leaf--> Detail
//!    ^                |  ^                        |
//!    +------Esc-------+  +----------Esc-----------+
//! ```
//!
//! While in Tree, focus (tree / details / metadata), the selected detail tab
//! and an optional search prompt are orthogonal to the view. The search prompt
//! swallows every key until it is confirmed or cancelled.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracelens_engine::{NodeId, SpanTree, TraceMetrics};
use tracelens_runtime::{LiveTrace, RunEntry, RunStore};
use tracelens_types::TraceRun;

use super::search::matches_query;

/// Rows moved by PgUp/PgDn.
const PAGE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    RunList,
    Tree,
    Detail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusArea {
    Tree,
    Details,
    Metadata,
}

impl FocusArea {
    pub fn next(self) -> Self {
        match self {
            FocusArea::Tree => FocusArea::Details,
            FocusArea::Details => FocusArea::Metadata,
            FocusArea::Metadata => FocusArea::Tree,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FocusArea::Tree => FocusArea::Metadata,
            FocusArea::Details => FocusArea::Tree,
            FocusArea::Metadata => FocusArea::Details,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailTab {
    Overview,
    Prompt,
    Response,
    Attributes,
    Timing,
}

impl DetailTab {
    pub const ALL: [DetailTab; 5] = [
        DetailTab::Overview,
        DetailTab::Prompt,
        DetailTab::Response,
        DetailTab::Attributes,
        DetailTab::Timing,
    ];

    pub fn title(self) -> &'static str {
        match self {
            DetailTab::Overview => "Overview",
            DetailTab::Prompt => "Prompt",
            DetailTab::Response => "Response",
            DetailTab::Attributes => "Attributes",
            DetailTab::Timing => "Timing",
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// `'1'..='5'` select a tab directly.
    pub fn from_digit(c: char) -> Option<Self> {
        let n = c.to_digit(10)? as usize;
        (1..=Self::ALL.len()).contains(&n).then(|| Self::ALL[n - 1])
    }
}

#[derive(Debug, Default)]
pub struct SearchState {
    /// Text being typed; `Some` while the prompt is open.
    pub input: Option<String>,
    /// Last confirmed query.
    pub query: String,
    /// Matching nodes in pre-order.
    pub matches: Vec<NodeId>,
    pub index: Option<usize>,
}

impl SearchState {
    pub fn is_typing(&self) -> bool {
        self.input.is_some()
    }
}

pub struct Explorer {
    store: Option<RunStore>,
    runs: Vec<RunEntry>,
    run_cursor: usize,
    selected_run: usize,

    run_id: String,
    manifest: TraceRun,
    trace: LiveTrace,

    visible: Vec<NodeId>,
    cursor: usize,

    view: ViewMode,
    focus: FocusArea,
    tab: DetailTab,
    search: SearchState,
    detail_scroll: u16,
    metadata_scroll: u16,

    notice: Option<String>,
    should_quit: bool,
}

impl Explorer {
    /// One run, opened straight into the tree. Esc quits.
    pub fn single(run_id: impl Into<String>, manifest: TraceRun, trace: LiveTrace) -> Self {
        let mut app = Self::empty(None, Vec::new());
        app.run_id = run_id.into();
        app.manifest = manifest;
        app.trace = trace;
        app.view = ViewMode::Tree;
        app.refresh_visible();
        app
    }

    /// All runs, starting at the run list. Runs are read when opened.
    pub fn with_runs(store: RunStore, runs: Vec<RunEntry>) -> Self {
        let mut app = Self::empty(Some(store), runs);
        app.load_run(0);
        app
    }

    fn empty(store: Option<RunStore>, runs: Vec<RunEntry>) -> Self {
        Self {
            store,
            runs,
            run_cursor: 0,
            selected_run: 0,
            run_id: String::new(),
            manifest: TraceRun::default(),
            trace: LiveTrace::from_spans(Vec::new()),
            visible: Vec::new(),
            cursor: 0,
            view: ViewMode::RunList,
            focus: FocusArea::Tree,
            tab: DetailTab::Overview,
            search: SearchState::default(),
            detail_scroll: 0,
            metadata_scroll: 0,
            notice: None,
            should_quit: false,
        }
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    pub fn focus(&self) -> FocusArea {
        self.focus
    }

    pub fn tab(&self) -> DetailTab {
        self.tab
    }

    pub fn runs(&self) -> &[RunEntry] {
        &self.runs
    }

    pub fn run_cursor(&self) -> usize {
        self.run_cursor
    }

    pub fn selected_run(&self) -> usize {
        self.selected_run
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn manifest(&self) -> &TraceRun {
        &self.manifest
    }

    pub fn tree(&self) -> &SpanTree {
        self.trace.tree()
    }

    pub fn metrics(&self) -> &TraceMetrics {
        self.trace.metrics()
    }

    pub fn is_live(&self) -> bool {
        self.trace.is_live()
    }

    pub fn visible(&self) -> &[NodeId] {
        &self.visible
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current_node(&self) -> Option<NodeId> {
        self.visible.get(self.cursor).copied()
    }

    pub fn search(&self) -> &SearchState {
        &self.search
    }

    pub fn is_match(&self, id: NodeId) -> bool {
        self.search.matches.contains(&id)
    }

    pub fn detail_scroll(&self) -> u16 {
        self.detail_scroll
    }

    pub fn metadata_scroll(&self) -> u16 {
        self.metadata_scroll
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        // Only handle key press events, not release
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.view {
            ViewMode::RunList => self.on_run_list_key(key.code),
            ViewMode::Tree if self.search.is_typing() => self.on_search_key(key),
            ViewMode::Tree => self.on_tree_key(key.code),
            ViewMode::Detail => self.on_detail_key(key.code),
        }
    }

    /// Live-tail tick: pull appended spans and carry UI state across the
    /// rebuild. Poll failures are reported, never fatal.
    pub fn on_tick(&mut self) {
        if !self.trace.is_live() {
            return;
        }

        let anchor = self
            .current_node()
            .map(|id| self.tree().node(id).span.span_id().to_string());

        match self.trace.refresh() {
            Ok(0) => {}
            Ok(count) => {
                tracing::debug!(new_spans = count, "explorer rebuilt tree");
                self.manifest.span_count = self.trace.spans().len();
                self.refresh_visible();
                if let Some(anchor) = anchor
                    && let Some(id) = self.tree().find(&anchor)
                    && let Some(pos) = self.visible.iter().position(|&n| n == id)
                {
                    self.cursor = pos;
                }
                if !self.search.query.is_empty() {
                    self.evaluate_search();
                }
                self.notice = None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "live tail poll failed");
                self.notice = Some(format!("Poll failed: {}", e));
            }
        }
    }

    fn on_run_list_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => {
                self.run_cursor = self.run_cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.run_cursor + 1 < self.runs.len() {
                    self.run_cursor += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => {
                if self.run_cursor < self.runs.len() {
                    self.load_run(self.run_cursor);
                    self.view = ViewMode::Tree;
                }
            }
            _ => {}
        }
    }

    fn on_tree_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => self.should_quit = true,

            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.prev(),

            KeyCode::Left => self.set_tab(self.tab.prev()),
            KeyCode::Right => self.set_tab(self.tab.next()),
            KeyCode::Char(c @ '1'..='5') => {
                if let Some(tab) = DetailTab::from_digit(c) {
                    self.set_tab(tab);
                }
            }

            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1),
            KeyCode::PageUp => self.page(-1),
            KeyCode::PageDown => self.page(1),

            KeyCode::Char('h') => self.collapse_or_parent(),
            KeyCode::Char('l') | KeyCode::Enter => self.expand_or_open(),
            KeyCode::Char(' ') => self.toggle_current(),
            KeyCode::Char('d') => {
                if self.current_node().is_some() {
                    self.open_detail();
                }
            }

            KeyCode::Char('/') => self.search.input = Some(String::new()),
            KeyCode::Char('n') => self.step_match(true),
            KeyCode::Char('N') => self.step_match(false),
            KeyCode::Char('e') => self.jump_error(true),
            KeyCode::Char('E') => self.jump_error(false),

            KeyCode::Char('[') => self.switch_run(false),
            KeyCode::Char(']') => self.switch_run(true),

            KeyCode::Esc | KeyCode::Backspace => {
                if self.runs.is_empty() {
                    self.should_quit = true;
                } else {
                    self.run_cursor = self.selected_run;
                    self.view = ViewMode::RunList;
                }
            }
            _ => {}
        }
    }

    fn on_detail_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc | KeyCode::Backspace => self.view = ViewMode::Tree,
            KeyCode::Left => self.set_tab(self.tab.prev()),
            KeyCode::Right => self.set_tab(self.tab.next()),
            KeyCode::Char(c @ '1'..='5') => {
                if let Some(tab) = DetailTab::from_digit(c) {
                    self.set_tab(tab);
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.detail_scroll = self.detail_scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.detail_scroll = self.detail_scroll.saturating_add(1);
            }
            KeyCode::PageUp => {
                self.detail_scroll = self.detail_scroll.saturating_sub(PAGE as u16);
            }
            KeyCode::PageDown => {
                self.detail_scroll = self.detail_scroll.saturating_add(PAGE as u16);
            }
            KeyCode::Home => self.detail_scroll = 0,
            _ => {}
        }
    }

    fn on_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.search.input = None,
            KeyCode::Enter => self.commit_search(),
            KeyCode::Backspace => {
                if let Some(input) = self.search.input.as_mut() {
                    input.pop();
                }
            }
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                if let Some(input) = self.search.input.as_mut() {
                    input.push(c);
                }
            }
            _ => {}
        }
    }

    fn load_run(&mut self, index: usize) {
        let Some(entry) = self.runs.get(index).cloned() else {
            return;
        };

        let spans = match &self.store {
            Some(store) => store.read_spans(&entry.id),
            None => Ok(Vec::new()),
        };
        match spans {
            Ok(spans) => {
                self.trace = LiveTrace::from_spans(spans);
                self.notice = None;
            }
            Err(e) => {
                tracing::warn!(run_id = %entry.id, error = %e, "cannot load run");
                self.trace = LiveTrace::from_spans(Vec::new());
                self.notice = Some(format!("Cannot load {}: {}", entry.id, e));
            }
        }

        self.selected_run = index;
        self.run_id = entry.id;
        self.manifest = entry.run;
        self.search = SearchState::default();
        self.cursor = 0;
        self.detail_scroll = 0;
        self.metadata_scroll = 0;
        self.refresh_visible();
    }

    fn switch_run(&mut self, forward: bool) {
        if self.runs.is_empty() {
            return;
        }
        let target = if forward {
            self.selected_run + 1
        } else {
            match self.selected_run.checked_sub(1) {
                Some(i) => i,
                None => return,
            }
        };
        if target < self.runs.len() {
            self.run_cursor = target;
            self.load_run(target);
        }
    }

    fn refresh_visible(&mut self) {
        self.visible = self.trace.tree().flatten();
        if self.cursor >= self.visible.len() {
            self.cursor = self.visible.len().saturating_sub(1);
        }
    }

    fn select(&mut self, pos: usize) {
        if pos != self.cursor {
            self.detail_scroll = 0;
            self.metadata_scroll = 0;
        }
        self.cursor = pos;
    }

    fn move_cursor(&mut self, delta: isize) {
        if self.visible.is_empty() {
            return;
        }
        let last = self.visible.len() - 1;
        let pos = self.cursor.saturating_add_signed(delta).min(last);
        self.select(pos);
    }

    fn page(&mut self, direction: isize) {
        match self.focus {
            FocusArea::Tree => self.move_cursor(direction * PAGE as isize),
            FocusArea::Details => {
                self.detail_scroll = scroll_by(self.detail_scroll, direction);
            }
            FocusArea::Metadata => {
                self.metadata_scroll = scroll_by(self.metadata_scroll, direction);
            }
        }
    }

    fn set_tab(&mut self, tab: DetailTab) {
        if tab != self.tab {
            self.detail_scroll = 0;
        }
        self.tab = tab;
    }

    fn open_detail(&mut self) {
        self.detail_scroll = 0;
        self.view = ViewMode::Detail;
    }

    fn toggle_current(&mut self) {
        if let Some(id) = self.current_node()
            && self.trace.tree_mut().toggle(id)
        {
            self.refresh_visible();
        }
    }

    fn expand_or_open(&mut self) {
        let Some(id) = self.current_node() else {
            return;
        };
        if self.tree().node(id).is_leaf() {
            self.open_detail();
        } else {
            self.toggle_current();
        }
    }

    fn collapse_or_parent(&mut self) {
        let Some(id) = self.current_node() else {
            return;
        };
        let node = self.tree().node(id);
        if !node.is_leaf() && node.expanded {
            self.trace.tree_mut().set_expanded(id, false);
            self.refresh_visible();
        } else if let Some(parent) = node.parent
            && let Some(pos) = self.visible.iter().position(|&n| n == parent)
        {
            self.select(pos);
        }
    }

    /// Make `id` visible by opening its ancestors, then put the cursor on it.
    fn jump_to(&mut self, id: NodeId) {
        self.trace.tree_mut().expand_ancestors(id);
        self.refresh_visible();
        if let Some(pos) = self.visible.iter().position(|&n| n == id) {
            self.select(pos);
        }
        self.focus = FocusArea::Tree;
    }

    fn commit_search(&mut self) {
        self.search.query = self.search.input.take().unwrap_or_default();
        self.evaluate_search();
        if let Some(&first) = self.search.matches.first() {
            self.search.index = Some(0);
            self.jump_to(first);
        }
    }

    fn evaluate_search(&mut self) {
        let query = self.search.query.to_lowercase();
        self.search.matches = if query.is_empty() {
            Vec::new()
        } else {
            let tree = self.trace.tree();
            tree.flatten_all()
                .into_iter()
                .filter(|&id| matches_query(&tree.node(id).span, &query))
                .collect()
        };
        self.search.index = match self.search.index {
            Some(i) if i < self.search.matches.len() => Some(i),
            _ if self.search.matches.is_empty() => None,
            _ => Some(0),
        };
    }

    fn step_match(&mut self, forward: bool) {
        let len = self.search.matches.len();
        if len == 0 {
            return;
        }
        let index = match (self.search.index, forward) {
            (Some(i), true) => (i + 1) % len,
            (None, true) => 0,
            (Some(i), false) if i > 0 => i - 1,
            (_, false) => len - 1,
        };
        self.search.index = Some(index);
        self.jump_to(self.search.matches[index]);
    }

    /// Next or previous error in pre-order, wrapping. Targets inside
    /// collapsed subtrees are reachable.
    fn jump_error(&mut self, forward: bool) {
        if self.metrics().error_count == 0 {
            return;
        }

        let target = {
            let tree = self.trace.tree();
            let all = tree.flatten_all();
            if all.is_empty() {
                return;
            }
            let here = self
                .current_node()
                .and_then(|id| all.iter().position(|&n| n == id))
                .unwrap_or(0);

            let order: Vec<usize> = if forward {
                (here + 1..all.len()).chain(0..=here).collect()
            } else {
                (0..here).rev().chain((here..all.len()).rev()).collect()
            };
            order
                .into_iter()
                .map(|i| all[i])
                .find(|&id| tree.node(id).span.is_error())
        };

        if let Some(id) = target {
            self.jump_to(id);
        }
    }
}

fn scroll_by(current: u16, direction: isize) -> u16 {
    if direction < 0 {
        current.saturating_sub(PAGE as u16)
    } else {
        current.saturating_add(PAGE as u16)
    }
}
