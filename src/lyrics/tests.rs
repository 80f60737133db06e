use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::time::Duration;

use tempfile::tempdir;

use super::cache::candidates;
use super::remote::{SearchResult, first_synced, search_params};
use super::*;
use crate::library::Track;

fn line(time: f64, text: &str) -> LyricLine {
    LyricLine {
        time,
        text: text.to_string(),
    }
}

fn track(path: &Path) -> Track {
    Track {
        path: path.to_path_buf(),
        title: "Song".into(),
        artist: "Artist".into(),
        album: "Unknown Album".into(),
        duration: 180.0,
        bitrate: "N/A".into(),
        codec: "N/A".into(),
        sample_rate: "N/A".into(),
        display: "Artist - Song".into(),
    }
}

const SAMPLE: &str = "[ar:Someone]\n\
[00:20.00] second\n\
[00:10.50]first\n\
not a lyric line\n\
[00:30.00]    \n\
[01:02.25] third\n";

#[test]
fn parse_keeps_timed_non_blank_lines_sorted() {
    let lines = parse(SAMPLE);
    assert_eq!(
        lines,
        vec![
            line(10.5, "first"),
            line(20.0, "second"),
            line(62.25, "third"),
        ]
    );
}

#[test]
fn parse_reads_fraction_as_decimal() {
    let lines = parse("[00:01.5] a\n[00:01.500] b\n[00:01.05] c");
    let times: Vec<f64> = lines.iter().map(|l| l.time).collect();
    assert_eq!(times, vec![1.05, 1.5, 1.5]);
}

#[test]
fn parse_drops_timestamps_that_overflow() {
    let lines = parse("[999999999999999999:00.00] boom\n[00:01.00] ok");
    assert_eq!(lines, vec![line(1.0, "ok")]);

    // Too many digits to parse at all.
    assert!(parse("[99999999999999999999999:00.00] boom").is_empty());
}

#[test]
fn parse_of_plain_text_is_empty() {
    assert!(parse("just some words\nand more").is_empty());
    assert!(parse("").is_empty());
}

#[test]
fn current_and_next_walks_through_lines() {
    let lines = vec![line(10.0, "a"), line(20.0, "b"), line(30.0, "c")];
    assert_eq!(current_and_next(&lines, 5.0), ("", "a"));
    assert_eq!(current_and_next(&lines, 10.0), ("a", "b"));
    assert_eq!(current_and_next(&lines, 15.0), ("a", "b"));
    assert_eq!(current_and_next(&lines, 25.0), ("b", "c"));
    assert_eq!(current_and_next(&lines, 35.0), ("c", ""));
}

#[test]
fn current_and_next_of_empty_set_is_empty() {
    assert_eq!(current_and_next(&[], 0.0), ("", ""));
    assert_eq!(current_and_next(&[], 100.0), ("", ""));
}

#[test]
fn clean_name_strips_track_number_prefix() {
    assert_eq!(clean_name("01 - Intro"), "Intro");
    assert_eq!(clean_name("7 Seas"), "Seas");
    assert_eq!(clean_name("12-Outro"), "Outro");
    assert_eq!(clean_name("Intro"), "Intro");
}

#[test]
fn candidates_are_deduplicated_and_ordered() {
    let dir = Path::new("/music/lyrics");
    let found = candidates(Path::new("/music/01 - Intro.mp3"), dir);
    let expected: Vec<PathBuf> = ["Intro", "01 - Intro", "intro", "01 - intro"]
        .iter()
        .map(|n| dir.join(format!("{n}.lrc")))
        .collect();
    assert_eq!(found, expected);

    let found = candidates(Path::new("/music/song.mp3"), dir);
    assert_eq!(found, vec![dir.join("song.lrc")]);
}

#[test]
fn save_then_load_uses_clean_name() {
    let root = tempdir().unwrap();
    let dir = lyrics_dir(root.path(), "lyrics");
    let song = root.path().join("02 - Tune.flac");

    let written = save_cached(&song, &dir, "[00:01.00] hello").unwrap();
    assert_eq!(written, dir.join("Tune.lrc"));

    let lyrics = load_cached(&song, &dir).unwrap();
    assert!(lyrics.loaded);
    assert_eq!(lyrics.lines, vec![line(1.0, "hello")]);
}

#[test]
fn load_skips_candidates_without_timed_lines() {
    let root = tempdir().unwrap();
    let dir = lyrics_dir(root.path(), "lyrics");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("Tune.lrc"), "no timestamps here").unwrap();
    fs::write(dir.join("02 - Tune.lrc"), "[00:03.00] from raw name").unwrap();

    let lyrics = load_cached(&root.path().join("02 - Tune.mp3"), &dir).unwrap();
    assert_eq!(lyrics.lines, vec![line(3.0, "from raw name")]);

    assert!(load_cached(&root.path().join("Missing.mp3"), &dir).is_none());
}

#[test]
fn search_params_skip_unknown_album() {
    let mut query = LyricsQuery {
        artist: "A".into(),
        title: "T".into(),
        album: "Unknown Album".into(),
    };
    let keys: Vec<&str> = search_params(&query).iter().map(|(k, _)| *k).collect();
    assert_eq!(keys, vec!["artist_name", "track_name"]);

    query.album = "Real".into();
    let params = search_params(&query);
    assert_eq!(params.last().unwrap(), &("album_name", "Real".to_string()));
}

#[test]
fn first_synced_ignores_results_without_synced_lyrics() {
    let results = vec![
        SearchResult {
            synced_lyrics: None,
        },
        SearchResult {
            synced_lyrics: Some("  ".into()),
        },
        SearchResult {
            synced_lyrics: Some("[00:01.00] yes".into()),
        },
    ];
    assert_eq!(first_synced(results).as_deref(), Some("[00:01.00] yes"));
    assert_eq!(first_synced(Vec::new()), None);
}

struct FakeProvider {
    answer: Option<String>,
    calls: AtomicUsize,
}

impl LyricsProvider for FakeProvider {
    fn fetch(&self, _query: &LyricsQuery) -> Result<String, LyricsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer.clone().ok_or(LyricsError::NotFound)
    }
}

fn provider(answer: Option<&str>) -> Arc<FakeProvider> {
    Arc::new(FakeProvider {
        answer: answer.map(str::to_string),
        calls: AtomicUsize::new(0),
    })
}

#[test]
fn fetcher_prefers_cache_over_provider() {
    let root = tempdir().unwrap();
    let dir = lyrics_dir(root.path(), "lyrics");
    let song = root.path().join("Song.mp3");
    save_cached(&song, &dir, "[00:05.00] cached").unwrap();

    let remote = provider(Some("[00:01.00] remote"));
    let fetcher = LyricsFetcher::new(
        dir,
        Some(remote.clone() as Arc<dyn LyricsProvider>),
    );
    let lyrics = fetcher.load(&track(&song));

    assert_eq!(lyrics.lines, vec![line(5.0, "cached")]);
    assert_eq!(remote.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn fetcher_saves_remote_result_to_cache() {
    let root = tempdir().unwrap();
    let dir = lyrics_dir(root.path(), "lyrics");
    let song = root.path().join("01 - Song.mp3");

    let remote = provider(Some("[00:01.00] remote"));
    let fetcher = LyricsFetcher::new(
        dir.clone(),
        Some(remote.clone() as Arc<dyn LyricsProvider>),
    );
    let lyrics = fetcher.load(&track(&song));

    assert_eq!(lyrics.lines, vec![line(1.0, "remote")]);
    assert_eq!(
        fs::read_to_string(dir.join("Song.lrc")).unwrap(),
        "[00:01.00] remote"
    );
}

#[test]
fn fetcher_failure_yields_loaded_empty_lyrics() {
    let root = tempdir().unwrap();
    let dir = lyrics_dir(root.path(), "lyrics");
    let song = root.path().join("Song.mp3");

    let fetcher = LyricsFetcher::new(
        dir.clone(),
        Some(provider(None) as Arc<dyn LyricsProvider>),
    );
    assert_eq!(fetcher.load(&track(&song)), Lyrics::empty());

    let cache_only = LyricsFetcher::new(dir, None);
    assert_eq!(cache_only.load(&track(&song)), Lyrics::empty());
}

#[test]
fn fetcher_spawn_delivers_with_requested_path() {
    let root = tempdir().unwrap();
    let dir = lyrics_dir(root.path(), "lyrics");
    let song = root.path().join("Song.mp3");

    let fetcher = LyricsFetcher::new(
        dir,
        Some(provider(Some("[00:02.00] hi")) as Arc<dyn LyricsProvider>),
    );
    let (tx, rx) = mpsc::channel();
    fetcher
        .spawn(&track(&song), move |path, lyrics| {
            let _ = tx.send((path, lyrics));
        })
        .unwrap();

    let (path, lyrics) = rx.recv_timeout(Duration::from_secs(2)).unwrap();
    assert_eq!(path, song);
    assert_eq!(lyrics.lines, vec![line(2.0, "hi")]);
}
