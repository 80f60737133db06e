use std::env;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::App;
use crate::audio::{FfplayBackend, PlaybackEngine};
use crate::config::Settings;
use crate::library::{Track, scan};
use crate::playback::{Controller, ControllerOptions, PlayerEvent, SystemClock, spawn_ticker};

mod cli;
mod event_loop;
mod keys;
mod logging;
mod settings;
mod startup;

use cli::Args;

fn controller_options(settings: &Settings) -> ControllerOptions {
    ControllerOptions {
        volume: settings.backend.volume,
        volume_step: settings.backend.volume_step,
        seek_step: settings.playback.seek_seconds as f64,
        seek_debounce: Duration::from_millis(settings.playback.seek_debounce_ms),
        shuffle: settings.playback.shuffle,
    }
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let (settings, settings_warning) = settings::load_settings();

    match logging::init(&settings.logging) {
        Ok(path) => info!(log = %path.display(), "stelle starting"),
        Err(e) => eprintln!("logging disabled: {e}"),
    }
    if let Some(msg) = settings_warning {
        warn!("{msg}");
    }

    let music_dir = startup::music_dir(args.music_dir())?;
    let decoder = startup::resolve_decoder(
        &settings.backend.program,
        args.decoder_dir.as_deref(),
        env::var_os("PATH").as_deref(),
    )?;
    info!(decoder = %decoder.display(), "using decoder");

    let tracks: Arc<[Track]> = scan(&music_dir, &settings.library).into();
    startup::ensure_tracks(&tracks, &music_dir, &settings.library)?;
    info!(count = tracks.len(), dir = %music_dir.display(), "library scanned");

    let engine = PlaybackEngine::new(Arc::new(FfplayBackend::new(decoder)));
    let (tx, rx) = mpsc::channel::<PlayerEvent>();
    let mut controller = Controller::new(
        tracks.clone(),
        engine,
        Box::new(SystemClock),
        tx.clone(),
        controller_options(&settings),
    );
    if let Some(fetcher) = startup::lyrics_fetcher(&music_dir, &settings.lyrics) {
        controller = controller.with_lyrics(fetcher);
    }

    spawn_ticker(Duration::from_millis(settings.playback.tick_ms), tx)?;
    if settings.playback.autoplay {
        controller.play_index(0);
    }

    let mut app = App::new(tracks, music_dir);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(
        &mut terminal,
        &mut app,
        &mut controller,
        &rx,
        settings.playback.seek_seconds,
    );

    // A failed loop still has to leave no decoder behind.
    controller.shutdown();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("stelle exiting");
    run_result
}
