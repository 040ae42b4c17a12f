//! Terminal dashboard for cross-exchange spot prices.
//!
//! Key bindings: `Tab` cycles views, left/right change the symbol, `r`
//! forces a refresh, `s` exports the current snapshot, `q`/`Esc` quits.

mod app;
mod config;
mod export;
mod login;
mod ui;

use crate::{app::App, config::Config, login::LoginForm};
use aggregator_data::{spawn_refresh, MarketClient, Poller, Symbol};
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{fs::File, io, sync::Mutex, time::Duration};
use tokio::sync::{mpsc, watch};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const TICK_RATE: Duration = Duration::from_millis(100);
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);
const LOG_FILE: &str = "aggregator-tui.log";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();
    init_logging();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // A panic mid-draw must not leave the terminal in raw mode.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = restore_terminal();
        default_hook(panic);
    }));

    let result = run(&mut terminal, config).await;

    restore_terminal()?;
    terminal.show_cursor()?;
    result
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)
}

/// Log to a file; stdout belongs to the terminal UI.
fn init_logging() {
    let Ok(file) = File::create(LOG_FILE) else {
        return;
    };
    let filter =
        EnvFilter::try_from_env(config::LOG_VAR).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}

async fn run<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    config: Config,
) -> Result<(), Box<dyn std::error::Error>> {
    if !run_login(terminal)? {
        return Ok(());
    }

    let client = MarketClient::new()?;
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let (symbol_tx, symbol_rx) = watch::channel(Symbol::default());
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handles = Poller::new(
        client.clone(),
        config.poll,
        event_tx.clone(),
        symbol_rx,
        shutdown_rx,
    )
    .spawn();
    info!(?config, "polling started");

    let mut app = App::default();
    loop {
        while let Ok(event) = event_rx.try_recv() {
            app.apply(event);
        }

        terminal.draw(|f| ui::render_dashboard(f, &app))?;

        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Char('r') => {
                        spawn_refresh(client.clone(), app.symbol, event_tx.clone());
                    }
                    KeyCode::Char('s') => save_snapshot(&mut app, &config),
                    KeyCode::Tab => app.view = app.view.next(),
                    KeyCode::Left => {
                        let prev = app.symbol.prev();
                        select(&mut app, &symbol_tx, prev)
                    }
                    KeyCode::Right => {
                        let next = app.symbol.next();
                        select(&mut app, &symbol_tx, next)
                    }
                    _ => {}
                }
            }
        }
    }

    let _ = shutdown_tx.send(true);
    let _ = tokio::time::timeout(SHUTDOWN_GRACE, handles.join()).await;
    info!("shut down");
    Ok(())
}

fn run_login<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>) -> io::Result<bool> {
    let mut form = LoginForm::default();
    loop {
        terminal.draw(|f| ui::render_login(f, &form))?;

        if !event::poll(TICK_RATE)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Esc => return Ok(false),
                KeyCode::Enter => {
                    if form.submit() {
                        info!(username = %form.username, "login accepted");
                        return Ok(true);
                    }
                }
                KeyCode::Tab => form.toggle_field(),
                KeyCode::Backspace => form.backspace(),
                KeyCode::Char(c) => form.type_char(c),
                _ => {}
            }
        }
    }
}

fn select(app: &mut App, symbol_tx: &watch::Sender<Symbol>, symbol: Symbol) {
    app.select_symbol(symbol);
    let _ = symbol_tx.send(symbol);
}

fn save_snapshot(app: &mut App, config: &Config) {
    let snapshot = export::Snapshot::capture(app);
    match export::write(&snapshot, &config.export_dir) {
        Ok(paths) => {
            info!(txt = %paths.txt.display(), json = %paths.json.display(), "snapshot exported");
            app.notice = Some(format!("Saved {}", paths.txt.display()));
        }
        Err(error) => {
            error!(%error, "snapshot export failed");
            app.notice = Some(format!("Export failed: {error}"));
        }
    }
}
