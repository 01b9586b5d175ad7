use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::catalog::{CatalogProvider, Episode, Show};
use crate::error::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.tvmaze.com";

/// Client for a TVMaze-compatible catalog API.
///
/// Both endpoints are read-only and unauthenticated. The base URL is
/// injectable so tests can point at a local mock server.
pub struct TvMazeClient {
    client: Client,
    base_url: String,
}

impl TvMazeClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    fn convert_show(raw: TvMazeShow) -> Show {
        Show {
            id: raw.id,
            name: raw.name,
            summary: raw.summary.map(|s| flatten_html(&s)),
            genres: raw.genres,
            status: raw.status,
            rating: raw.rating.and_then(|r| r.average),
            runtime: raw.runtime,
            image: raw.image.and_then(|i| i.medium.or(i.original)),
            url: raw.url,
        }
    }

    fn convert_episode(raw: TvMazeEpisode) -> Episode {
        Episode {
            id: raw.id,
            name: raw.name.unwrap_or_else(|| "Unknown".to_string()),
            season: raw.season.unwrap_or(0),
            number: raw.number.unwrap_or(0),
            summary: raw.summary.map(|s| flatten_html(&s)),
            image: raw.image.and_then(|i| i.medium.or(i.original)),
            url: raw.url,
        }
    }
}

/// Summaries arrive as HTML fragments ("<p>...</p>").
fn flatten_html(html: &str) -> String {
    nanohtml2text::html2text(html).trim().to_string()
}

#[async_trait::async_trait]
impl CatalogProvider for TvMazeClient {
    /// Fetches the full show catalog, sorted case-insensitively by name.
    /// One network call per invocation; never retried.
    async fn fetch_shows(&self) -> Result<Vec<Show>> {
        let url = format!("{}/shows", self.base_url);
        debug!(%url, "Fetching show catalog");

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(Error::Api(format!(
                "Catalog API error: {}",
                response.status()
            )));
        }

        let raw: Vec<TvMazeShow> = response.json().await?;

        let mut shows: Vec<Show> = raw.into_iter().map(Self::convert_show).collect();
        shows.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(shows)
    }

    async fn fetch_episodes(&self, show_id: u64) -> Result<Vec<Episode>> {
        let url = format!("{}/shows/{}/episodes", self.base_url, show_id);
        debug!(%url, "Fetching episodes");

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(Error::Api(format!(
                "Catalog API error: {}",
                response.status()
            )));
        }

        let raw: Vec<TvMazeEpisode> = response.json().await?;
        Ok(raw.into_iter().map(Self::convert_episode).collect())
    }
}

#[derive(Deserialize)]
struct TvMazeShow {
    id: u64,
    name: String,
    summary: Option<String>,
    #[serde(default)]
    genres: Vec<String>,
    status: Option<String>,
    rating: Option<TvMazeRating>,
    runtime: Option<u32>,
    image: Option<TvMazeImage>,
    url: Option<String>,
}

#[derive(Deserialize)]
struct TvMazeRating {
    average: Option<f64>,
}

#[derive(Deserialize)]
struct TvMazeImage {
    #[serde(default)]
    medium: Option<String>,
    #[serde(default)]
    original: Option<String>,
}

/// Name and numbering may be null for specials and unaired episodes.
#[derive(Deserialize)]
struct TvMazeEpisode {
    id: u64,
    name: Option<String>,
    season: Option<u32>,
    number: Option<u32>,
    summary: Option<String>,
    image: Option<TvMazeImage>,
    url: Option<String>,
}
