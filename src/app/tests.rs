use super::*;
use crate::library::Track;
use std::path::PathBuf;
use std::sync::Arc;

fn t(display: &str) -> Track {
    Track {
        path: PathBuf::from(format!("/music/{display}.mp3")),
        title: display.into(),
        artist: "Unknown Artist".into(),
        album: "Unknown Album".into(),
        duration: 60.0,
        bitrate: "N/A".into(),
        codec: "N/A".into(),
        sample_rate: "N/A".into(),
        display: display.into(),
    }
}

fn app(titles: &[&str]) -> App {
    let tracks: Arc<[Track]> = titles.iter().map(|d| t(d)).collect();
    App::new(tracks, PathBuf::from("/music"))
}

#[test]
fn fuzzy_match_simple() {
    let title = "Hello World";
    assert_eq!(App::fuzzy_match_positions(title, "hw"), Some(vec![0, 6]));
    assert!(App::fuzzy_match_positions(title, "ello").is_some());
    assert!(App::fuzzy_match_positions(title, "xyz").is_none());
    assert_eq!(App::fuzzy_match_positions(title, ""), Some(vec![]));
}

#[test]
fn display_indices_respects_filter_query() {
    let mut app = app(&["Alpha", "Beta", "Gamma", "Delta"]);
    assert_eq!(app.display_indices(), vec![0, 1, 2, 3]);

    // 'et' matches Beta(1) and Delta(3)
    app.filter_query = "et".into();
    assert_eq!(app.display_indices(), vec![1, 3]);
}

#[test]
fn display_indices_uses_fuzzy_not_substring_only() {
    let mut app = app(&["Metallica - Blackened", "Black Sabbath - Paranoid"]);
    // Letters appear in order but not contiguously.
    app.filter_query = "mtbk".into();
    assert_eq!(app.display_indices(), vec![0]);
}

#[test]
fn trimming_filter_query_affects_matching() {
    let mut app = app(&["Black Sabbath - Paranoid"]);
    app.filter_query = "Black ".into();
    assert_eq!(app.display_indices(), vec![0]);

    app.filter_query = "   ".into();
    assert_eq!(app.display_indices(), vec![0]);
}

#[test]
fn match_positions_highlight_the_filter() {
    let mut app = app(&["Alpha", "Beta"]);
    app.filter_query = "BA".into();
    assert_eq!(app.match_positions(1), Some(vec![0, 3]));
    assert_eq!(app.match_positions(0), None);
    assert_eq!(app.match_positions(9), None);
}

#[test]
fn match_positions_index_the_display_line_when_lowercase_expands() {
    // 'İ' lower-cases to two chars; positions must still point into the
    // original text.
    let mut app = app(&["İzmir - Öz"]);
    app.filter_query = "zö".into();
    let positions = app.match_positions(0).unwrap();
    assert_eq!(positions, vec![1, 8]);

    let chars: Vec<char> = app.tracks[0].display.chars().collect();
    assert_eq!(chars[positions[0]], 'z');
    assert_eq!(chars[positions[1]], 'Ö');

    app.filter_query = "iz".into();
    assert_eq!(app.display_indices(), vec![0]);
}

#[test]
fn next_prev_wrap_within_the_filtered_view() {
    let mut app = app(&["Alpha", "Beta", "Gamma", "Delta"]);
    app.next();
    assert_eq!(app.selected, 1);
    app.prev();
    app.prev();
    assert_eq!(app.selected, 3);
    app.next();
    assert_eq!(app.selected, 0);

    app.filter_query = "et".into();
    app.set_selected(1);
    app.next();
    assert_eq!(app.selected, 3);
    app.next();
    assert_eq!(app.selected, 1);
}

#[test]
fn filter_moves_selection_into_view() {
    let mut app = app(&["Alpha", "Beta", "Gamma"]);
    app.set_selected(2);
    app.enter_filter_mode();
    app.push_filter_char('b');
    assert_eq!(app.selected, 1);

    app.push_filter_char('z');
    assert!(app.display_indices().is_empty());
    assert_eq!(app.selected, 0);

    app.pop_filter_char();
    app.exit_filter_mode();
    assert!(!app.filter_mode);
    assert_eq!(app.filter_query, "b");

    app.clear_filter();
    assert!(app.filter_query.is_empty());
    assert_eq!(app.display_indices().len(), 3);
}

#[test]
fn first_and_last_respect_filter() {
    let mut app = app(&["Alpha", "Beta", "Gamma", "Delta"]);
    app.select_last();
    assert_eq!(app.selected, 3);
    app.select_first();
    assert_eq!(app.selected, 0);

    app.filter_query = "m".into();
    app.select_first();
    assert_eq!(app.selected, 2);
}

#[test]
fn follow_tracks_playback_unless_filtering_or_disabled() {
    let mut app = app(&["A", "B", "C"]);
    app.follow(Some(2));
    assert_eq!(app.selected, 2);

    app.follow(Some(7));
    assert_eq!(app.selected, 2);

    app.enter_filter_mode();
    app.follow(Some(0));
    assert_eq!(app.selected, 2);

    app.exit_filter_mode();
    app.follow_playback = false;
    app.follow(Some(0));
    assert_eq!(app.selected, 2);
}

#[test]
fn empty_library_is_handled() {
    let mut app = app(&[]);
    assert!(!app.has_tracks());
    assert!(app.selected_track().is_none());
    app.next();
    app.prev();
    app.select_last();
    assert_eq!(app.selected, 0);
}
