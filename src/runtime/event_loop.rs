use std::io::Stdout;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::warn;

use crate::app::App;
use crate::playback::{Controller, PlayerEvent};
use crate::runtime::keys::{self, KeyState};
use crate::ui;

const INPUT_POLL: Duration = Duration::from_millis(50);

/// Main terminal loop: feeds background events to the controller, redraws,
/// and turns key presses into actions. Returns `Ok(())` on quit.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    controller: &mut Controller,
    events: &Receiver<PlayerEvent>,
    seek_seconds: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut key_state = KeyState::default();

    loop {
        drain_events(controller, events);
        app.follow(controller.current_index());

        let display = app.display_indices();
        let snapshot = controller.snapshot();
        terminal.draw(|f| ui::draw(f, app, &snapshot, &display, seek_seconds))?;

        if !event::poll(INPUT_POLL)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        if let Some(action) = keys::map_key(key, app.filter_mode, &mut key_state) {
            if keys::apply(action, app, controller) {
                return Ok(());
            }
        }
    }
}

fn drain_events(controller: &mut Controller, events: &Receiver<PlayerEvent>) {
    loop {
        match events.try_recv() {
            Ok(event) => controller.handle(event),
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => {
                // The controller holds a sender, so this only happens if it was dropped.
                warn!("player event channel closed");
                return;
            }
        }
    }
}
