//! Terminal line chart of a case table.
//!
//! One line per area column, dates along the x axis. The chart takes over
//! the terminal until `q`, `Esc` or Ctrl+C is pressed.

mod render;
mod styles;

use std::io;
use std::time::Duration;

use anyhow::Result;
use covidcases_core::CaseTable;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

pub use render::{render, ChartData};

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 250;

/// Show `table` as a line chart until the user quits
pub fn show(table: &CaseTable, title: &str) -> Result<()> {
    let data = ChartData::from_table(table);
    info!(series = data.series.len(), "Opening plot");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &data, title);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    data: &ChartData,
    title: &str,
) -> Result<()> {
    loop {
        terminal.draw(|f| render(f, data, title))?;

        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let ctrl_c = key.code == KeyCode::Char('c')
                    && key.modifiers.contains(KeyModifiers::CONTROL);
                if ctrl_c || matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                    return Ok(());
                }
            }
        }
    }
}
