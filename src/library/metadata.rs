use std::path::Path;

use lofty::file::FileType;
use lofty::prelude::*;

use super::model::{LibraryError, Track};

pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
pub const UNKNOWN_ALBUM: &str = "Unknown Album";
const NOT_AVAILABLE: &str = "N/A";

pub(crate) fn format_bitrate(kbps: Option<u32>) -> String {
    match kbps {
        Some(k) if k > 0 => format!("{k} kbps"),
        _ => NOT_AVAILABLE.to_string(),
    }
}

pub(crate) fn format_sample_rate(hz: Option<u32>) -> String {
    match hz {
        Some(hz) if hz > 0 => format!("{:.1} kHz", hz as f64 / 1000.0),
        _ => NOT_AVAILABLE.to_string(),
    }
}

pub(crate) fn codec_name(file_type: &FileType) -> String {
    let name = match file_type {
        FileType::Mpeg => "mp3".to_string(),
        FileType::Mp4 => "aac".to_string(),
        FileType::Wav => "pcm".to_string(),
        FileType::Custom(name) => name.to_string(),
        other => format!("{other:?}"),
    };
    if name.trim().is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        name.to_uppercase()
    }
}

pub(crate) fn display_line(title: &str, artist: &str) -> String {
    let artist = artist.trim();
    if artist.is_empty() || artist == UNKNOWN_ARTIST {
        title.to_string()
    } else {
        format!("{artist} - {title}")
    }
}

fn non_blank(value: Option<std::borrow::Cow<'_, str>>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read tags and stream properties for one file.
///
/// Missing tags fall back to the file stem as title and the
/// `Unknown Artist` / `Unknown Album` placeholders.
pub fn read_track(path: &Path) -> Result<Track, LibraryError> {
    let tagged = lofty::read_from_path(path).map_err(|source| LibraryError::Metadata {
        path: path.to_path_buf(),
        source,
    })?;

    let properties = tagged.properties();
    let tag = tagged.primary_tag().or_else(|| tagged.first_tag());

    let title = tag
        .and_then(|t| non_blank(t.title()))
        .unwrap_or_else(|| {
            path.file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string())
        });
    let artist = tag
        .and_then(|t| non_blank(t.artist()))
        .unwrap_or_else(|| UNKNOWN_ARTIST.to_string());
    let album = tag
        .and_then(|t| non_blank(t.album()))
        .unwrap_or_else(|| UNKNOWN_ALBUM.to_string());

    let display = display_line(&title, &artist);

    Ok(Track {
        path: path.to_path_buf(),
        duration: properties.duration().as_secs_f64(),
        bitrate: format_bitrate(properties.audio_bitrate()),
        codec: codec_name(&tagged.file_type()),
        sample_rate: format_sample_rate(properties.sample_rate()),
        title,
        artist,
        album,
        display,
    })
}
