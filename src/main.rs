//! stepform - Terminal multi-step form
//!
//! Collects personal, address and payment details step by step from
//! schema-driven fields, then shows the captured values in an editable
//! record table.

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::info;

use stepform::application::{App, AppMode, FormEngine};
use stepform::domain::SchemaRegistry;
use stepform::infrastructure::{init_logging, Settings, SystemClock};
use stepform::presentation::{render_ui, InputHandler};

#[derive(Debug, Parser)]
#[command(name = "stepform", version, about = "Multi-step form in the terminal")]
struct Cli {
    /// Extra configuration file layered over the defaults
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Step to open first (personal, address or payment)
    #[arg(long, value_name = "STEP")]
    step: Option<String>,

    /// Log at debug level
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;
    let _logging = init_logging(&settings, cli.debug)?;

    let registry = SchemaRegistry::standard()?;
    let mut engine =
        FormEngine::with_clock(registry, Box::new(SystemClock), settings.message_ttl());
    let start_step = cli.step.unwrap_or_else(|| settings.ui.start_step.clone());
    engine.select_step_id(&start_step);
    info!(step = %start_step, "starting form");

    let mut app = App::new(engine);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, settings.tick_rate());

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

/// Draws, waits for a key or the next message expiry, and repeats until
/// `q` is pressed outside of editing and popups.
fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    tick_rate: Duration,
) -> io::Result<()> {
    loop {
        app.tick();
        terminal.draw(|f| render_ui(f, app))?;

        let timeout = app
            .engine
            .next_deadline()
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
            .map_or(tick_rate, |until| until.min(tick_rate));

        if !event::poll(timeout)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                match key.code {
                    KeyCode::Char('q')
                        if matches!(app.mode, AppMode::Normal | AppMode::Records)
                            && !app.engine.is_confirmation_open() =>
                    {
                        return Ok(());
                    }
                    _ => InputHandler::handle_key_event(app, key.code, key.modifiers),
                }
            }
        }
    }
}
