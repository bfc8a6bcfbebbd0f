//! Interactive explorer.
//!
//! ## Design:
//! - `Explorer` owns all state and is driven by key events and ticks
//! - Views borrow the explorer and only map it to widgets
//! - The event loop wakes at least once per tick so a live run keeps tailing
//!   while the user is idle

pub mod app;
pub mod search;
pub mod views;

use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    cursor,
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

pub use app::{DetailTab, Explorer, FocusArea, ViewMode};

/// Run the explorer until the user quits. The terminal is restored on every
/// exit path, including a panic inside the loop.
pub fn run(mut app: Explorer, tick: Duration) -> Result<()> {
    let _guard = TerminalGuard::enter()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    event_loop(&mut terminal, &mut app, tick)
}

/// Raw mode plus alternate screen for as long as it lives.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        // Constructed before the screen switch so a failure there still
        // leaves raw mode.
        let guard = TerminalGuard;
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Each step runs even if an earlier one fails
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show);
    }
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut Explorer,
    tick: Duration,
) -> Result<()> {
    let mut next_tick = Instant::now() + tick;
    loop {
        terminal.draw(|f| views::draw(f, app))?;

        let timeout = next_tick.saturating_duration_since(Instant::now());
        if event::poll(timeout)?
            && let Event::Key(key) = event::read()?
        {
            app.handle_key(key);
        }

        // Re-armed only after the tick's work so slow polls never stack up.
        if Instant::now() >= next_tick {
            app.on_tick();
            next_tick = Instant::now() + tick;
        }

        if app.should_quit() {
            break;
        }
    }

    Ok(())
}
