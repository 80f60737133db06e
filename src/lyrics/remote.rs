//! Remote synced-lyrics lookup against an lrclib-compatible service.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::debug;

use crate::library::UNKNOWN_ALBUM;

use super::model::{LyricsError, LyricsQuery};

const USER_AGENT: &str = concat!("stelle/", env!("CARGO_PKG_VERSION"));

/// Something that can turn (artist, title, album) into LRC text.
pub trait LyricsProvider: Send + Sync {
    fn fetch(&self, query: &LyricsQuery) -> Result<String, LyricsError>;
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchResult {
    #[serde(default)]
    pub synced_lyrics: Option<String>,
}

/// Query parameters for the primary search.
pub(crate) fn search_params(query: &LyricsQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("artist_name", query.artist.clone()),
        ("track_name", query.title.clone()),
    ];
    let album = query.album.trim();
    if !album.is_empty() && album != UNKNOWN_ALBUM {
        params.push(("album_name", album.to_string()));
    }
    params
}

/// First result carrying non-empty synced lyrics.
pub(crate) fn first_synced(results: Vec<SearchResult>) -> Option<String> {
    results
        .into_iter()
        .filter_map(|r| r.synced_lyrics)
        .find(|l| !l.trim().is_empty())
}

pub struct LrclibClient {
    client: Client,
    base_url: String,
}

impl LrclibClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, LyricsError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn search(&self, params: &[(&str, String)]) -> Result<String, LyricsError> {
        let url = format!("{}/api/search", self.base_url);
        let response = self.client.get(&url).query(params).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(LyricsError::Status(status.as_u16()));
        }
        let results: Vec<SearchResult> = response.json()?;
        debug!(results = results.len(), "lyrics search returned");
        first_synced(results).ok_or(LyricsError::NotFound)
    }
}

impl LyricsProvider for LrclibClient {
    fn fetch(&self, query: &LyricsQuery) -> Result<String, LyricsError> {
        match self.search(&search_params(query)) {
            Ok(lyrics) => Ok(lyrics),
            Err(e) => {
                debug!(error = %e, title = %query.title, "structured search failed, trying free text");
                self.search(&[("q", query.title.clone())])
            }
        }
    }
}
