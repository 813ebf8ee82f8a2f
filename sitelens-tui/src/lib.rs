use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use sitelens_core::analyzer::{FetchOutcome, FetchTicket};
use sitelens_core::card::SystemOpener;
use sitelens_core::options::AnalyzerOptions;
use sitelens_fetch::{SiteFetcher, SiteSource};
use std::io;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::debug;

pub mod app;
pub mod ui;

pub use app::{App, Focus};

type Completion = (FetchTicket, FetchOutcome);

/// Run the interactive analyzer (blocking; fetches run on `runtime`).
pub fn run(options: AnalyzerOptions, runtime: Handle) -> Result<()> {
    let fetcher = SiteFetcher::with_timeout(options.timeout_secs)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(options);
    let history_path = App::history_file_path();
    app.load_history_from(&history_path);

    let result = run_app(&mut terminal, &mut app, &fetcher, &runtime);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if !app.history().is_empty() {
        app.save_history_to(&history_path)?;
    }

    result
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    fetcher: &SiteFetcher,
    runtime: &Handle,
) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Completion>();

    loop {
        // Settle any fetches that finished since the last frame
        while let Ok((ticket, outcome)) = rx.try_recv() {
            app.complete_fetch(&ticket, outcome);
        }

        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                break;
            }

            if let Some(ticket) = app.handle_key(key, &SystemOpener) {
                spawn_fetch(runtime, fetcher.clone(), ticket, tx.clone());
            }
        }

        if app.should_quit() {
            break;
        }
    }

    Ok(())
}

fn spawn_fetch(
    runtime: &Handle,
    fetcher: SiteFetcher,
    ticket: FetchTicket,
    tx: mpsc::UnboundedSender<Completion>,
) {
    debug!("Spawning fetch {} for {}", ticket.generation(), ticket.target());
    runtime.spawn(async move {
        let outcome = fetcher.fetch_site(ticket.target()).await;
        // The receiver is gone once the UI has exited
        let _ = tx.send((ticket, outcome));
    });
}
