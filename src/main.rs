use std::fs;
use std::io;
use std::io::IsTerminal;
use std::thread;
use std::time::Duration;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use crossterm::cursor;
use crossterm::event;
use crossterm::execute;
use crossterm::terminal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gridlife::Grid;
use gridlife::config::Cli;
use gridlife::config::Config;
use gridlife::config::Source;
use gridlife::driver;
use gridlife::driver::Control;
use gridlife::io::convert_event;
use gridlife::render;
use gridlife::screen::Mode;
use gridlife::screen::Screen;
use gridlife::seed;

/// Raw mode with a hidden cursor, undone on drop so every exit path restores the terminal
struct RawTerminal;

impl RawTerminal {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), cursor::Hide)?;

        Ok(Self)
    }
}

impl Drop for RawTerminal {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), cursor::Show);
        let _ = terminal::disable_raw_mode();
    }
}

fn initial_grid(config: &Config) -> anyhow::Result<Grid> {
    let grid = match &config.source {
        Source::Random {
            seed: s,
            density: p,
        } => seed::random(config.rows, config.cols, *p, *s)?,
        Source::Pattern(path) => {
            let bytes =
                fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;

            seed::from_rle(config.rows, config.cols, &bytes)
                .with_context(|| format!("Failed to load pattern {}", path.display()))?
        }
    };

    Ok(grid)
}

/// Sit out `delay`, unless a quit key comes in first
fn wait(delay: Duration) -> anyhow::Result<Control> {
    let t = Instant::now();

    loop {
        let time_left = delay.saturating_sub(t.elapsed());

        if !event::poll(time_left)? {
            return Ok(Control::Continue);
        }

        if let Some(Control::Quit) = convert_event(event::read()?) {
            return Ok(Control::Quit);
        }
    }
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr, out of the way of the frames
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let config = Cli::parse().into_config()?;
    let grid = initial_grid(&config)?;

    // Animating needs a terminal to move the cursor around in
    let interactive = config.mode == Mode::Animate && io::stdout().is_terminal();
    let mode = if interactive { Mode::Animate } else { Mode::Plain };

    let raw = if interactive {
        Some(RawTerminal::enable().context("Failed to set up the terminal")?)
    } else {
        None
    };

    let mut screen = Screen::new(io::stdout(), mode);

    let outcome = driver::run(grid, config.max_generations, |_, grid| {
        screen.draw(&render::render(grid, &config.style))?;

        if interactive {
            wait(config.delay)
        } else {
            thread::sleep(config.delay);
            Ok(Control::Continue)
        }
    })?;

    drop(raw);

    info!(
        generations = outcome.generations(),
        population = outcome.grid().population(),
        reason = outcome.reason(),
        "done"
    );

    Ok(())
}
