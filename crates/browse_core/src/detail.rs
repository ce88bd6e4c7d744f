//! Detail view state: built from the navigation payload, plus the favorite
//! toggle.

use catalog_client::CatalogClient;
use shared::{domain::CatalogItem, error::PayloadError};
use tracing::{error, info};

pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/original";

pub fn poster_url(poster_path: &str) -> String {
    format!(
        "{POSTER_BASE_URL}/{}",
        poster_path.trim_start_matches('/')
    )
}

/// What happens to the visible favorite flag when the write fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FavoritePolicy {
    /// Flag flips before the request and stays flipped whatever the outcome.
    #[default]
    Optimistic,
    /// Flag flips before the request and is put back if the request fails.
    Reconcile,
}

/// Transient confirmation shown after a successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub body: String,
}

impl Notice {
    fn favorite_updated() -> Self {
        Self {
            title: "Success".into(),
            body: "Favorite status updated successfully!".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    Confirmed(Notice),
    Failed { reverted: bool },
}

#[derive(Debug, Clone)]
pub struct DetailView {
    item: CatalogItem,
    is_favorite: bool,
    policy: FavoritePolicy,
}

impl DetailView {
    pub fn new(item: CatalogItem, policy: FavoritePolicy) -> Self {
        Self {
            item,
            is_favorite: false,
            policy,
        }
    }

    pub fn from_payload(payload: &str, policy: FavoritePolicy) -> Result<Self, PayloadError> {
        Ok(Self::new(CatalogItem::from_payload(payload)?, policy))
    }

    pub fn item(&self) -> &CatalogItem {
        &self.item
    }

    pub fn is_favorite(&self) -> bool {
        self.is_favorite
    }

    pub fn poster_url(&self) -> Option<String> {
        self.item.poster_path.as_deref().map(poster_url)
    }

    pub fn summary_lines(&self) -> Vec<String> {
        let release_date = self
            .item
            .release_date
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "unknown".to_string());
        vec![
            format!("Release Date: {release_date}"),
            format!("Rating: {}", self.item.vote_average),
            self.item.overview.clone(),
            format!("Original Language: {}", self.item.original_language),
            format!("Popularity: {}", self.item.popularity),
            format!("Vote Count: {}", self.item.vote_count),
        ]
    }

    pub async fn toggle_favorite<C: CatalogClient + ?Sized>(
        &mut self,
        client: &C,
    ) -> ToggleOutcome {
        let desired = !self.is_favorite;
        self.is_favorite = desired;

        match client.set_favorite(self.item.id, desired).await {
            Ok(()) => {
                info!(movie_id = self.item.id.0, favorite = desired, "detail: favorite updated");
                ToggleOutcome::Confirmed(Notice::favorite_updated())
            }
            Err(err) => {
                error!(movie_id = self.item.id.0, "detail: error updating favorite status: {err}");
                let reverted = self.policy == FavoritePolicy::Reconcile;
                if reverted {
                    self.is_favorite = !desired;
                }
                ToggleOutcome::Failed { reverted }
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/detail_tests.rs"]
mod tests;
