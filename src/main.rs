//! Terminal runner (default binary).
//!
//! Loads handling settings and the last saved game, runs a fixed 60 Hz frame
//! loop, and writes the game back to disk on the way out.

use std::env;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use tracing::{info, warn, Level};
use tracing_subscriber::prelude::*;

use raytris::core::{HandlingSettings, Playfield, Session, SessionStatus, Snapshot};
use raytris::input::KeyboardController;
use raytris::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};

const FRAME: Duration = Duration::from_micros(16_667);

fn main() -> Result<()> {
    init_tracing()?;

    let settings_path = env_path("RAYTRIS_SETTINGS_PATH", "settings.json");
    let save_path = env_path("RAYTRIS_SAVE_PATH", "save.raytris");

    let settings = HandlingSettings::load_or_default(&settings_path)
        .with_context(|| format!("reading settings from {}", settings_path.display()))?
        .with_env_overrides()
        .clamped();
    info!(?settings, "handling settings");

    let mut session = Session::new(load_playfield(&save_path));

    let mut term = TerminalRenderer::new();
    term.enter()?;
    info!(enhanced_keyboard = term.enhanced_keyboard(), "terminal ready");

    let result = run(&mut term, &mut session, &settings);

    // Always try to restore terminal state.
    let _ = term.exit();

    let saved = session
        .playfield()
        .snapshot()
        .save(&save_path)
        .with_context(|| format!("writing save to {}", save_path.display()));
    result?;
    saved?;
    info!(score = session.playfield().score(), "game saved");
    Ok(())
}

fn run(term: &mut TerminalRenderer, session: &mut Session, settings: &HandlingSettings) -> Result<()> {
    let view = GameView::default();
    let mut keyboard = KeyboardController::new();
    let mut fb = FrameBuffer::new(0, 0);
    let mut next_frame = Instant::now();

    loop {
        // Collect input until the next frame is due.
        loop {
            let timeout = next_frame.saturating_duration_since(Instant::now());
            if !event::poll(timeout)? {
                break;
            }
            match event::read()? {
                Event::Key(key) => keyboard.handle_key(key, Instant::now()),
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        let now = Instant::now();
        let input = keyboard.frame(now);
        if session.update(&input, settings) == SessionStatus::Quit {
            return Ok(());
        }

        next_frame += FRAME;
        if next_frame < now {
            // Fell behind (suspended terminal, slow draw); do not try to catch up.
            next_frame = now + FRAME;
        }

        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into(session, Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;
    }
}

/// Resume from `path` when it holds a readable save, otherwise start fresh
fn load_playfield(path: &Path) -> Playfield {
    let mut playfield = Playfield::new();
    if !path.exists() {
        return playfield;
    }

    match Snapshot::load(path).and_then(|snapshot| playfield.restore(&snapshot)) {
        Ok(()) => info!(path = %path.display(), "resumed saved game"),
        Err(e) => warn!(path = %path.display(), error = %e, "ignoring unreadable save"),
    }
    playfield
}

fn env_path(var: &str, default: &str) -> PathBuf {
    env::var_os(var)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}

/// Log to `RAYTRIS_LOG_PATH` when set; the terminal itself belongs to the game.
fn init_tracing() -> Result<()> {
    let Some(path) = env::var_os("RAYTRIS_LOG_PATH") else {
        return Ok(());
    };
    let level = env::var("RAYTRIS_LOG_LEVEL")
        .ok()
        .and_then(|s| Level::from_str(s.trim()).ok())
        .unwrap_or(Level::INFO);

    let file = File::create(&path)
        .with_context(|| format!("creating log file {}", Path::new(&path).display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(level))
        .init();
    info!(%level, "logging initialized");
    Ok(())
}
