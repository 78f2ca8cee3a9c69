mod app;
mod braille;
mod codes;
mod config;
mod data;
mod error;
mod format;
mod geo;
mod index;
mod logger;
mod map;
mod scale;
mod ui;
mod views;

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use config::Config;
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind};
use crossterm::execute;
use ratatui::DefaultTerminal;
use std::time::Duration;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config = Config::parse();
    logger::init_file_logger(&config.log_file, config.verbose)
        .with_context(|| format!("cannot open log file {}", config.log_file.display()))?;
    tracing::info!("starting, data from {}", config.data);

    // Initialize terminal
    let mut terminal = ratatui::init();
    terminal.clear()?;

    // Enable mouse capture
    execute!(std::io::stdout(), EnableMouseCapture)?;

    // Run the app
    let result = run(&mut terminal, &config).await;

    // Disable mouse capture and restore terminal
    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    if let Err(err) = &result {
        tracing::error!("exiting with error: {:#}", err);
    }
    result
}

async fn run(terminal: &mut DefaultTerminal, config: &Config) -> Result<()> {
    terminal.draw(|frame| ui::render_loading(frame, &config.data))?;

    // Every dataset and the geometry chain load concurrently; each may fail alone
    let datasets = data::loader::load_all(config).await;
    let mut app = App::new(datasets);

    // Main loop
    loop {
        // Draw
        terminal.draw(|frame| ui::render(frame, &mut app))?;

        // Handle events with ~60fps target
        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                // Only handle key press events (not release)
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key.code),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                // Anchors refer to the old layout
                Event::Resize(_, _) => app.tooltip = None,
                _ => {}
            }
        }

        // Update transition animations
        app.tick();

        if app.should_quit {
            break;
        }
    }

    tracing::info!("quit after {} frames", app.frame);
    Ok(())
}
