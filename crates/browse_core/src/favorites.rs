use catalog_client::{CatalogClient, Endpoint, QueryParams, FAVORITES_SORT_ORDER};
use shared::domain::{AccountId, CatalogItem};
use tracing::{debug, error};

/// The account's favorite movies, oldest first. Only the first page is shown.
#[derive(Debug, Clone)]
pub struct FavoritesList {
    account_id: AccountId,
    language: String,
    items: Vec<CatalogItem>,
    is_loading: bool,
}

impl FavoritesList {
    pub fn new(account_id: AccountId, language: impl Into<String>) -> Self {
        Self {
            account_id,
            language: language.into(),
            items: Vec::new(),
            is_loading: false,
        }
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Returns whether the list was replaced. Failures keep the old items.
    pub async fn load<C: CatalogClient + ?Sized>(&mut self, client: &C) -> bool {
        self.is_loading = true;
        let params =
            QueryParams::page(self.language.as_str(), 1).with_sort_by(FAVORITES_SORT_ORDER);
        let result = client
            .fetch(&Endpoint::AccountFavorites(self.account_id), &params)
            .await;
        self.is_loading = false;

        match result {
            Ok(page) => {
                debug!(count = page.items.len(), "favorites: loaded");
                self.items = page.items;
                true
            }
            Err(err) => {
                error!(
                    account_id = self.account_id.0,
                    "favorites: error fetching favorite movies: {err}"
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use shared::{domain::Page, error::FetchError};

    use super::*;
    use crate::test_support::{catalog_item, ScriptedCatalog};

    #[tokio::test]
    async fn load_requests_first_page_oldest_first() {
        let catalog = Arc::new(ScriptedCatalog::default());
        let endpoint = Endpoint::AccountFavorites(AccountId(21856281));
        catalog
            .respond(
                endpoint,
                1,
                None,
                Ok(Page {
                    number: 1,
                    items: vec![catalog_item(11), catalog_item(12)],
                    total_pages: 1,
                    total_results: 2,
                    rejected: 0,
                }),
            )
            .await;

        let mut favorites = FavoritesList::new(AccountId(21856281), "en-US");
        assert!(favorites.load(catalog.as_ref()).await);

        assert_eq!(favorites.items().len(), 2);
        assert!(!favorites.is_loading());
        let calls = catalog.fetch_calls().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, endpoint);
        assert_eq!(calls[0].1.sort_by.as_deref(), Some("created_at.asc"));
        assert_eq!(calls[0].1.page, 1);
    }

    #[tokio::test]
    async fn failed_reload_keeps_previous_items() {
        let catalog = ScriptedCatalog::default();
        let endpoint = Endpoint::AccountFavorites(AccountId(5));
        catalog
            .respond(
                endpoint,
                1,
                None,
                Ok(Page {
                    number: 1,
                    items: vec![catalog_item(1)],
                    total_pages: 1,
                    total_results: 1,
                    rejected: 0,
                }),
            )
            .await;
        let mut favorites = FavoritesList::new(AccountId(5), "en-US");
        assert!(favorites.load(&catalog).await);

        catalog
            .respond(
                endpoint,
                1,
                None,
                Err(FetchError::new(endpoint.path(), "HTTP 503 Service Unavailable: down")),
            )
            .await;
        assert!(!favorites.load(&catalog).await);

        assert_eq!(favorites.items().len(), 1);
        assert!(!favorites.is_loading());
    }
}
