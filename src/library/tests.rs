use std::fs;
use std::path::Path;

use tempfile::tempdir;

use super::metadata::{codec_name, display_line, format_bitrate, format_sample_rate};
use super::*;
use crate::config::LibrarySettings;

/// Write a silent 16-bit mono PCM WAV file of `secs` seconds at 8 kHz.
fn write_wav(path: &Path, secs: u32) {
    let sample_rate: u32 = 8000;
    let data_len = sample_rate * 2 * secs;
    let mut bytes = Vec::with_capacity(44 + data_len as usize);
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
    bytes.extend_from_slice(b"WAVE");
    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
    bytes.extend_from_slice(&1u16.to_le_bytes()); // mono
    bytes.extend_from_slice(&sample_rate.to_le_bytes());
    bytes.extend_from_slice(&(sample_rate * 2).to_le_bytes());
    bytes.extend_from_slice(&2u16.to_le_bytes());
    bytes.extend_from_slice(&16u16.to_le_bytes());
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&data_len.to_le_bytes());
    bytes.resize(44 + data_len as usize, 0);
    fs::write(path, bytes).unwrap();
}

#[test]
fn is_audio_file_matches_default_extensions_case_insensitive() {
    let settings = LibrarySettings::default();
    for name in [
        "a.mp3", "a.M4A", "a.flac", "a.wav", "a.OGG", "a.aac", "a.opus",
    ] {
        assert!(is_audio_file(Path::new(name), &settings), "{name}");
    }
    assert!(!is_audio_file(Path::new("a.txt"), &settings));
    assert!(!is_audio_file(Path::new("a.lrc"), &settings));
    assert!(!is_audio_file(Path::new("noext"), &settings));
}

#[test]
fn format_helpers_fall_back_to_not_available() {
    assert_eq!(format_bitrate(Some(320)), "320 kbps");
    assert_eq!(format_bitrate(None), "N/A");
    assert_eq!(format_bitrate(Some(0)), "N/A");
    assert_eq!(format_sample_rate(Some(44100)), "44.1 kHz");
    assert_eq!(format_sample_rate(Some(48000)), "48.0 kHz");
    assert_eq!(format_sample_rate(None), "N/A");
    assert_eq!(codec_name(&lofty::file::FileType::Flac), "FLAC");
    assert_eq!(codec_name(&lofty::file::FileType::Mpeg), "MP3");
}

#[test]
fn display_line_omits_unknown_artist() {
    assert_eq!(display_line("Song", "Artist"), "Artist - Song");
    assert_eq!(display_line("Song", "  "), "Song");
    assert_eq!(display_line("Song", UNKNOWN_ARTIST), "Song");
}

#[test]
fn read_track_uses_placeholders_for_untagged_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("03 - Quiet.wav");
    write_wav(&path, 2);

    let track = read_track(&path).unwrap();
    assert_eq!(track.title, "03 - Quiet");
    assert_eq!(track.artist, UNKNOWN_ARTIST);
    assert_eq!(track.album, UNKNOWN_ALBUM);
    assert!((track.duration - 2.0).abs() < 0.05, "{}", track.duration);
    assert_eq!(track.sample_rate, "8.0 kHz");
    assert_eq!(track.codec, "PCM");
    assert!(track.bitrate.ends_with("kbps"), "{}", track.bitrate);
    assert_eq!(track.display, "03 - Quiet");
}

#[test]
fn read_track_fails_for_garbage() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.mp3");
    fs::write(&path, b"not a real mp3").unwrap();
    assert!(read_track(&path).is_err());
}

#[test]
fn scan_skips_unreadable_and_non_audio_and_sorts() {
    let dir = tempdir().unwrap();
    write_wav(&dir.path().join("b.wav"), 1);
    write_wav(&dir.path().join("A.WAV"), 1);
    fs::write(dir.path().join("broken.mp3"), b"not a real mp3").unwrap();
    fs::write(dir.path().join("notes.txt"), b"ignore me").unwrap();

    let tracks = scan(dir.path(), &LibrarySettings::default());
    let titles: Vec<&str> = tracks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["A", "b"]);
}

#[test]
fn scan_recurses_into_subdirectories_by_default() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("album").join("disc1");
    fs::create_dir_all(&sub).unwrap();
    write_wav(&dir.path().join("root.wav"), 1);
    write_wav(&sub.join("deep.wav"), 1);

    let tracks = scan(dir.path(), &LibrarySettings::default());
    assert_eq!(tracks.len(), 2);
}

#[test]
fn scan_respects_recursive_false_and_hidden() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir_all(&sub).unwrap();
    write_wav(&dir.path().join("root.wav"), 1);
    write_wav(&dir.path().join(".hidden.wav"), 1);
    write_wav(&sub.join("child.wav"), 1);

    let settings = LibrarySettings {
        recursive: false,
        include_hidden: false,
        ..LibrarySettings::default()
    };
    let tracks = scan(dir.path(), &settings);
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].title, "root");
}
