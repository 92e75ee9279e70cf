pub mod columns;
pub mod effects;
pub mod events;
pub mod forms;
pub mod state;
pub mod transform;
pub mod types;
pub mod ui;

use std::io;
use std::sync::Arc;
use std::time::Instant;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use sensei_admin_core::{AdminConfig, AdminResult, NodeRepository};
use tracing::info;

pub use effects::{Effect, EffectRunner};
pub use events::{Event, EventHandler};
pub use state::App;

use state::clipboard::TerminalClipboard;

type ConsoleTerminal = Terminal<CrosstermBackend<io::Stdout>>;

/// Run the interactive console until the operator quits.
pub async fn run(config: &AdminConfig, repo: Arc<dyn NodeRepository>) -> AdminResult<()> {
    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, config, repo).await;
    restore_terminal(&mut terminal)?;
    result
}

async fn run_app(
    terminal: &mut ConsoleTerminal,
    config: &AdminConfig,
    repo: Arc<dyn NodeRepository>,
) -> AdminResult<()> {
    let mut events = EventHandler::new(config.ui.tick_rate);
    let runner = EffectRunner::new(repo, events.sender());
    let mut app = App::new(config.list.page_size, Box::new(TerminalClipboard));

    info!(page_size = config.list.page_size, "Console started");
    for effect in app.start() {
        runner.spawn(effect);
    }

    loop {
        terminal.draw(|f| ui::render(f, &app))?;

        let event = events.next().await?;
        for effect in app.handle_event(event, Instant::now()) {
            runner.spawn(effect);
        }

        if app.should_quit() {
            info!("Console closed");
            return Ok(());
        }
    }
}

fn setup_terminal() -> AdminResult<ConsoleTerminal> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

fn restore_terminal(terminal: &mut ConsoleTerminal) -> AdminResult<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
