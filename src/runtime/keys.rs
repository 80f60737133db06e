use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::App;
use crate::playback::Controller;

/// Everything a key press can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    PlaySelected,
    TogglePause,
    Stop,
    Next,
    Previous,
    SeekForward,
    SeekBackward,
    ToggleShuffle,
    VolumeUp,
    VolumeDown,
    CursorDown,
    CursorUp,
    Top,
    Bottom,
    StartFilter,
    FilterPush(char),
    FilterPop,
    FilterAccept,
    FilterCancel,
}

/// Key state carried between presses.
#[derive(Debug, Default)]
pub struct KeyState {
    /// First `g` of `gg` seen.
    pub pending_gg: bool,
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Translate a key press. `filter_mode` routes printable keys into the
/// filter query instead of the player bindings.
pub fn map_key(key: KeyEvent, filter_mode: bool, state: &mut KeyState) -> Option<Action> {
    if is_ctrl_c(&key) {
        state.pending_gg = false;
        return Some(Action::Quit);
    }

    if filter_mode {
        state.pending_gg = false;
        return match key.code {
            KeyCode::Esc => Some(Action::FilterCancel),
            KeyCode::Backspace => Some(Action::FilterPop),
            KeyCode::Enter => Some(Action::FilterAccept),
            KeyCode::Down => Some(Action::CursorDown),
            KeyCode::Up => Some(Action::CursorUp),
            KeyCode::Char(c) if !c.is_control() => Some(Action::FilterPush(c)),
            _ => None,
        };
    }

    if key.code == KeyCode::Char('g') {
        if state.pending_gg {
            state.pending_gg = false;
            return Some(Action::Top);
        }
        state.pending_gg = true;
        return None;
    }
    state.pending_gg = false;

    match key.code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('p') | KeyCode::Enter => Some(Action::PlaySelected),
        KeyCode::Char(' ') => Some(Action::TogglePause),
        KeyCode::Char('s') => Some(Action::Stop),
        KeyCode::Char('n') | KeyCode::Right => Some(Action::Next),
        KeyCode::Char('b') | KeyCode::Left => Some(Action::Previous),
        KeyCode::Char('t') => Some(Action::SeekForward),
        KeyCode::Char('r') => Some(Action::SeekBackward),
        KeyCode::Char('h') => Some(Action::ToggleShuffle),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(Action::VolumeUp),
        KeyCode::Char('-') => Some(Action::VolumeDown),
        KeyCode::Char('j') | KeyCode::Down => Some(Action::CursorDown),
        KeyCode::Char('k') | KeyCode::Up => Some(Action::CursorUp),
        KeyCode::Char('G') => Some(Action::Bottom),
        KeyCode::Char('/') => Some(Action::StartFilter),
        _ => None,
    }
}

/// Carry out `action`. Returns `true` when the player should quit.
pub fn apply(action: Action, app: &mut App, controller: &mut Controller) -> bool {
    controller.clear_status();
    match action {
        Action::Quit => {
            controller.shutdown();
            return true;
        }
        Action::PlaySelected => {
            if app.has_tracks() {
                app.follow_playback = true;
                controller.play_index(app.selected);
            }
        }
        Action::TogglePause => {
            if app.has_tracks() {
                controller.toggle_pause(app.selected);
            }
        }
        Action::Stop => controller.stop(),
        Action::Next => {
            app.follow_playback = true;
            controller.next();
        }
        Action::Previous => {
            app.follow_playback = true;
            controller.previous();
        }
        Action::SeekForward => controller.seek_forward(),
        Action::SeekBackward => controller.seek_backward(),
        Action::ToggleShuffle => controller.toggle_shuffle(),
        Action::VolumeUp => controller.volume_up(),
        Action::VolumeDown => controller.volume_down(),
        Action::CursorDown => {
            app.follow_playback = false;
            app.next();
        }
        Action::CursorUp => {
            app.follow_playback = false;
            app.prev();
        }
        Action::Top => {
            app.follow_playback = false;
            app.select_first();
        }
        Action::Bottom => {
            app.follow_playback = false;
            app.select_last();
        }
        Action::StartFilter => app.enter_filter_mode(),
        Action::FilterPush(c) => app.push_filter_char(c),
        Action::FilterPop => app.pop_filter_char(),
        Action::FilterCancel => app.clear_filter(),
        Action::FilterAccept => {
            if !app.display_indices().is_empty() {
                app.exit_filter_mode();
                app.follow_playback = true;
                controller.play_index(app.selected);
            }
        }
    }
    false
}
