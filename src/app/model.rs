//! Playlist view model: which track the cursor is on and which tracks the
//! filter lets through.
//!
//! Selection is always an index into the canonical track list shared with
//! the playback controller, never a copy of a `Track`.

use std::path::PathBuf;
use std::sync::Arc;

use crate::library::Track;

/// Lower-case each char on its own, keeping the first char of any
/// multi-char expansion, so indices line up with the original string.
fn fold(s: &str) -> Vec<char> {
    s.chars()
        .map(|c| c.to_lowercase().next().unwrap_or(c))
        .collect()
}

/// The playlist panel's state.
pub struct App {
    pub tracks: Arc<[Track]>,
    pub selected: usize,
    pub music_dir: PathBuf,

    /// Case-folded display lines, one char per char of `Track::display`.
    folded_titles: Vec<Vec<char>>,

    /// Cursor jumps to the playing track whenever it changes.
    pub follow_playback: bool,
    pub filter_mode: bool,
    pub filter_query: String,
}

impl App {
    pub fn new(tracks: Arc<[Track]>, music_dir: PathBuf) -> Self {
        let folded_titles = tracks.iter().map(|t| fold(&t.display)).collect();
        Self {
            tracks,
            selected: 0,
            music_dir,
            folded_titles,
            follow_playback: true,
            filter_mode: false,
            filter_query: String::new(),
        }
    }

    pub fn has_tracks(&self) -> bool {
        !self.tracks.is_empty()
    }

    pub fn selected_track(&self) -> Option<&Track> {
        self.tracks.get(self.selected)
    }

    /// Indices of the tracks that pass the filter, in list order.
    pub fn display_indices(&self) -> Vec<usize> {
        let query = fold(self.filter_query.trim());
        if query.is_empty() {
            return (0..self.tracks.len()).collect();
        }
        self.folded_titles
            .iter()
            .enumerate()
            .filter(|(_, title)| Self::subsequence_positions(title, &query).is_some())
            .map(|(i, _)| i)
            .collect()
    }

    /// Character positions in `tracks[index].display` matched by the
    /// current filter, for highlighting.
    pub fn match_positions(&self, index: usize) -> Option<Vec<usize>> {
        let query = fold(self.filter_query.trim());
        let title = self.folded_titles.get(index)?;
        Self::subsequence_positions(title, &query)
    }

    /// Case-insensitive subsequence match: the positions (by char index) in
    /// `title` of each query character, or `None` if the query does not fit.
    pub fn fuzzy_match_positions(title: &str, query: &str) -> Option<Vec<usize>> {
        Self::subsequence_positions(&fold(title), &fold(query))
    }

    fn subsequence_positions(title: &[char], query: &[char]) -> Option<Vec<usize>> {
        let mut positions = Vec::with_capacity(query.len());
        let mut title_chars = title.iter().enumerate();
        for qc in query {
            let (pos, _) = title_chars.find(|&(_, tc)| tc == qc)?;
            positions.push(pos);
        }
        Some(positions)
    }

    /// Move the cursor onto the playing track if following is on and the
    /// user is not busy filtering.
    pub fn follow(&mut self, playing: Option<usize>) {
        if !self.follow_playback || self.filter_mode {
            return;
        }
        if let Some(i) = playing {
            if i < self.tracks.len() {
                self.selected = i;
            }
        }
    }

    pub fn set_selected(&mut self, idx: usize) {
        self.selected = idx;
        self.ensure_selected_visible();
    }

    /// Move selection to the next visible track, wrapping to the top.
    pub fn next(&mut self) {
        let display = self.display_indices();
        if display.is_empty() {
            return;
        }
        self.selected = match display.iter().position(|&i| i == self.selected) {
            Some(p) => display[(p + 1) % display.len()],
            None => display[0],
        };
    }

    /// Move selection to the previous visible track, wrapping to the bottom.
    pub fn prev(&mut self) {
        let display = self.display_indices();
        let Some(&last) = display.last() else {
            return;
        };
        self.selected = match display.iter().position(|&i| i == self.selected) {
            Some(0) | None => last,
            Some(p) => display[p - 1],
        };
    }

    pub fn select_first(&mut self) {
        if let Some(&first) = self.display_indices().first() {
            self.selected = first;
        }
    }

    pub fn select_last(&mut self) {
        if let Some(&last) = self.display_indices().last() {
            self.selected = last;
        }
    }

    pub fn enter_filter_mode(&mut self) {
        self.filter_mode = true;
        self.ensure_selected_visible();
    }

    /// Leave filter mode but keep the query applied.
    pub fn exit_filter_mode(&mut self) {
        self.filter_mode = false;
    }

    pub fn clear_filter(&mut self) {
        self.filter_query.clear();
        self.filter_mode = false;
        self.ensure_selected_visible();
    }

    pub fn push_filter_char(&mut self, c: char) {
        self.filter_query.push(c);
        self.ensure_selected_visible();
    }

    pub fn pop_filter_char(&mut self) {
        self.filter_query.pop();
        self.ensure_selected_visible();
    }

    /// Keep `selected` inside the filtered view, falling back to its first
    /// entry.
    fn ensure_selected_visible(&mut self) {
        let display = self.display_indices();
        match display.first() {
            None => self.selected = 0,
            Some(&first) if !display.contains(&self.selected) => self.selected = first,
            Some(_) => {}
        }
    }
}
