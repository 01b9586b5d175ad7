use crate::error::Result;
use serde::{Deserialize, Serialize};

pub mod cache;
pub mod tvmaze;

pub use cache::EpisodeCache;
pub use tvmaze::TvMazeClient;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Show {
    pub id: u64,
    pub name: String,
    pub summary: Option<String>,
    pub genres: Vec<String>,
    pub status: Option<String>,
    pub rating: Option<f64>,
    pub runtime: Option<u32>,
    pub image: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Episode {
    pub id: u64,
    pub name: String,
    pub season: u32,
    pub number: u32,
    pub summary: Option<String>,
    pub image: Option<String>,
    pub url: Option<String>,
}

impl Episode {
    /// Display label in the catalog's "Name (SxxEyy)" form.
    pub fn label(&self) -> String {
        format!("{} (S{:02}E{:02})", self.name, self.season, self.number)
    }
}

#[async_trait::async_trait]
pub trait CatalogProvider {
    async fn fetch_shows(&self) -> Result<Vec<Show>>;
    async fn fetch_episodes(&self, show_id: u64) -> Result<Vec<Episode>>;
}
