//! UI rendering for the terminal user interface.
//!
//! Left: now playing, lyrics and key help. Right: the playlist and the
//! audio details of the playing track. Everything is drawn from `App` and a
//! controller `Snapshot`; nothing here mutates state.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::playback::{LyricsView, PlaybackState, Snapshot};

const ACCENT: Color = Color::Indexed(63);
const DIM: Color = Color::Indexed(241);

/// Format seconds as `MM:SS`, truncating partial seconds.
pub(crate) fn format_mmss(secs: f64) -> String {
    let secs = if secs.is_finite() && secs > 0.0 {
        secs as u64
    } else {
        0
    };
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Fraction of the track played, clamped to `0.0..=1.0`.
pub(crate) fn progress_ratio(elapsed: f64, duration: f64) -> f64 {
    if duration > 0.0 {
        (elapsed / duration).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

pub(crate) fn state_label(state: PlaybackState) -> &'static str {
    match state {
        PlaybackState::Stopped => "■ Stopped",
        PlaybackState::Playing => "▶ Playing",
        PlaybackState::Paused => "❚❚ Paused",
    }
}

/// Which slice of a `total`-row list to show in `height` rows so that
/// `selected` stays roughly centred. Returns `(start, end)`.
pub(crate) fn visible_window(total: usize, height: usize, selected: usize) -> (usize, usize) {
    if total <= height || height == 0 {
        return (0, total);
    }
    let half = height / 2;
    let start = selected.saturating_sub(half).min(total - height);
    (start, start + height)
}

fn controls_text(seek_seconds: u64) -> String {
    [
        "[p] play selected".to_string(),
        "[space] pause/resume".to_string(),
        "[s] stop".to_string(),
        "[n/→] next".to_string(),
        "[b/←] prev".to_string(),
        format!("[t] forward {seek_seconds}s"),
        format!("[r] rewind {seek_seconds}s"),
        "[h] shuffle".to_string(),
        "[+/-] volume".to_string(),
        "[j/k] move".to_string(),
        "[gg/G] top/bottom".to_string(),
        "[/] filter".to_string(),
        "[q] quit".to_string(),
    ]
    .join(" | ")
}

fn title_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT))
        .title(Span::styled(
            format!(" {title} "),
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .padding(Padding {
            left: 1,
            right: 1,
            top: 0,
            bottom: 0,
        })
}

/// Render the entire UI into `frame`.
pub fn draw(frame: &mut Frame, app: &App, player: &Snapshot<'_>, display: &[usize], seek_seconds: u64) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(2, 3), Constraint::Ratio(1, 3)])
        .split(frame.area());

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(10),
            Constraint::Min(4),
            Constraint::Length(4),
            Constraint::Length(1),
        ])
        .split(columns[0]);

    draw_now_playing(frame, player, left[0]);
    draw_lyrics(frame, player, left[1]);

    let footer = Paragraph::new(controls_text(seek_seconds))
        .style(Style::default().fg(DIM))
        .block(title_block("controls"))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, left[2]);

    draw_status_line(frame, app, player, left[3]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(5)])
        .split(columns[1]);

    draw_playlist(frame, app, player, display, right[0]);
    draw_audio_info(frame, player, right[1]);
}

fn draw_now_playing(frame: &mut Frame, player: &Snapshot<'_>, area: Rect) {
    let block = title_block("♪ Now Playing");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(track) = player.track else {
        let idle = Paragraph::new(vec![
            Line::from("No song playing"),
            Line::from("Select a song and press 'p' to play"),
            Line::from("or press 'space' to start"),
        ])
        .style(Style::default().fg(DIM));
        frame.render_widget(idle, inner);
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    let mode = if player.shuffle {
        "🔀 Shuffle ON"
    } else {
        "▶ Sequential"
    };
    let info = Paragraph::new(vec![
        Line::from(format!("Title:  {}", track.title)),
        Line::from(format!("Artist: {}", track.artist)),
        Line::from(format!("Album:  {}", track.album)),
        Line::from(format!("Status: {}", state_label(player.state))),
        Line::from(format!("Mode:   {mode}")),
        Line::from(format!("Volume: {}%", player.volume)),
    ]);
    frame.render_widget(info, rows[0]);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(ACCENT))
        .ratio(progress_ratio(player.elapsed, track.duration))
        .label("");
    frame.render_widget(gauge, rows[1]);

    let time = Paragraph::new(format!(
        "{} / {}",
        format_mmss(player.elapsed),
        format_mmss(track.duration)
    ));
    frame.render_widget(time, rows[2]);
}

fn draw_lyrics(frame: &mut Frame, player: &Snapshot<'_>, area: Rect) {
    let dim = Style::default().fg(DIM);
    let lines: Vec<Line> = if player.track.is_none() {
        vec![Line::styled("No song playing", dim)]
    } else {
        match player.lyrics {
            LyricsView::Loading => vec![Line::styled("Loading lyrics...", dim)],
            LyricsView::Missing => vec![Line::styled("No lyrics available for this song.", dim)],
            LyricsView::NotLoaded => vec![Line::styled("Lyrics not loaded", dim)],
            LyricsView::Lines { current, next } => {
                let mut lines = Vec::new();
                if !current.is_empty() {
                    lines.push(Line::from(current.to_string()).bold());
                }
                if !next.is_empty() {
                    lines.push(Line::styled(next.to_string(), dim));
                }
                lines
            }
        }
    };

    let lyrics = Paragraph::new(lines)
        .block(title_block("Lyrics"))
        .wrap(Wrap { trim: true });
    frame.render_widget(lyrics, area);
}

fn draw_status_line(frame: &mut Frame, app: &App, player: &Snapshot<'_>, area: Rect) {
    let line = if app.filter_mode {
        Line::from(format!("/{}", app.filter_query))
    } else if let Some(status) = player.status {
        Line::styled(status.to_string(), Style::default().fg(Color::Red))
    } else {
        Line::styled(
            format!("{} • {} tracks", app.music_dir.display(), app.tracks.len()),
            Style::default().fg(DIM),
        )
    };
    frame.render_widget(Paragraph::new(line), area);
}

/// Display line with the characters matched by the filter emphasised.
fn highlighted(title: &str, positions: Option<Vec<usize>>) -> Line<'static> {
    let Some(positions) = positions.filter(|p| !p.is_empty()) else {
        return Line::from(title.to_string());
    };
    let mut next = positions.into_iter().peekable();
    let spans: Vec<Span> = title
        .chars()
        .enumerate()
        .map(|(ci, ch)| {
            if next.peek() == Some(&ci) {
                next.next();
                Span::styled(
                    ch.to_string(),
                    Style::default()
                        .fg(ACCENT)
                        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                )
            } else {
                Span::raw(ch.to_string())
            }
        })
        .collect();
    Line::from(spans)
}

fn draw_playlist(frame: &mut Frame, app: &App, player: &Snapshot<'_>, display: &[usize], area: Rect) {
    let query = app.filter_query.trim();
    let title = if query.is_empty() {
        "Playlist".to_string()
    } else {
        format!("Playlist [{query}]")
    };
    let block = title_block(&title);
    let height = block.inner(area).height as usize;

    // Only build items for the rows that fit.
    let total = display.len();
    let sel_pos = display.iter().position(|&i| i == app.selected).unwrap_or(0);
    let (start, end) = visible_window(total, height, sel_pos);

    let items: Vec<ListItem> = display[start..end]
        .iter()
        .map(|&i| {
            let track = &app.tracks[i];
            let positions = if query.is_empty() {
                None
            } else {
                app.match_positions(i)
            };
            let mut line = highlighted(&track.display, positions);
            if player.index == Some(i) {
                line = line.style(Style::default().fg(ACCENT));
            }
            ListItem::new(line)
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if total > 0 {
        state.select(Some(sel_pos - start));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_audio_info(frame: &mut Frame, player: &Snapshot<'_>, area: Rect) {
    let lines = match player.track {
        Some(track) => vec![
            Line::from(format!("Bitrate:     {}", track.bitrate)),
            Line::from(format!("Codec:       {}", track.codec)),
            Line::from(format!("Sample Rate: {}", track.sample_rate)),
        ],
        None => vec![Line::from("-")],
    };
    let info = Paragraph::new(lines)
        .style(Style::default().fg(DIM))
        .alignment(Alignment::Left)
        .block(title_block("Audio"));
    frame.render_widget(info, area);
}
