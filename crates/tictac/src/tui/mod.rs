//! Terminal UI.

mod app;
mod input;
mod ui;

pub use app::App;
pub use input::{digit_position, move_cursor};

use crate::config::Settings;
use anyhow::{Context, Result};
use crossterm::{
    cursor::Show,
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::time::Duration;
use tictac_engine::{MovePicker, RandomPicker, Session, Ticket, TokioScheduler};
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Runs the terminal game until the user quits.
#[instrument]
pub async fn run(settings: Settings) -> Result<()> {
    info!("Starting tictac TUI");

    let (scheduler, mut tickets) = TokioScheduler::new();
    let picker = match settings.seed() {
        Some(seed) => RandomPicker::seeded(*seed),
        None => RandomPicker::new(),
    };
    let session = Session::new(scheduler, picker, *settings.delay());
    let mut app = App::new(session, &settings);

    enable_raw_mode().context("Failed to enable raw mode")?;
    let res = play(&mut app, &mut tickets).await;
    restore_terminal();

    if let Err(err) = &res {
        error!(error = ?err, "Game loop error");
    }
    info!(score = %app.scoreboard(), "TUI exited");
    res
}

async fn play<P: MovePicker>(
    app: &mut App<TokioScheduler, P>,
    tickets: &mut mpsc::UnboundedReceiver<Ticket>,
) -> Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
    run_loop(&mut terminal, app, tickets).await
}

/// Leaves raw mode and the alternate screen and shows the cursor again.
/// Every step runs even when an earlier one fails.
fn restore_terminal() {
    if let Err(err) = disable_raw_mode() {
        warn!(error = %err, "Failed to disable raw mode");
    }
    if let Err(err) = execute!(io::stdout(), LeaveAlternateScreen, Show) {
        warn!(error = %err, "Failed to leave alternate screen");
    }
}

async fn run_loop<P: MovePicker>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App<TokioScheduler, P>,
    tickets: &mut mpsc::UnboundedReceiver<Ticket>,
) -> Result<()> {
    loop {
        let view = app.view();
        let status = app.status();
        terminal.draw(|frame| ui::draw(frame, &view, app.cursor(), &status, app.scoreboard()))?;

        while let Ok(ticket) = tickets.try_recv() {
            debug!(epoch = ticket.epoch(), "Ticket due");
            app.on_ticket(ticket);
        }

        // Key polling blocks, so yield it to the blocking pool to keep
        // scheduled moves running.
        let polled = tokio::task::spawn_blocking(|| -> io::Result<Option<Event>> {
            if event::poll(POLL_INTERVAL)? {
                event::read().map(Some)
            } else {
                Ok(None)
            }
        })
        .await??;

        if let Some(Event::Key(key)) = polled {
            if key.kind == KeyEventKind::Release {
                continue;
            }
            app.handle_key(key.code);
        }

        if app.should_quit() {
            return Ok(());
        }
    }
}
