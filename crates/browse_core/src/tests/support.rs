use std::collections::HashMap;

use async_trait::async_trait;
use catalog_client::{CatalogClient, Endpoint, QueryParams};
use shared::{
    domain::{CatalogItem, MovieId, Page},
    error::FetchError,
};
use tokio::sync::{oneshot, Mutex};

type Key = (Endpoint, u32, Option<String>);

pub(crate) fn catalog_item(id: i64) -> CatalogItem {
    CatalogItem {
        id: MovieId(id),
        title: format!("Movie {id}"),
        release_date: None,
        poster_path: None,
        vote_average: 5.0,
        overview: String::new(),
        original_language: "en".into(),
        popularity: 1.0,
        vote_count: 1,
    }
}

pub(crate) fn scripted_page(number: u32, ids: impl IntoIterator<Item = i64>) -> Page {
    let items: Vec<CatalogItem> = ids.into_iter().map(catalog_item).collect();
    Page {
        number,
        total_results: 200,
        items,
        total_pages: 10,
        rejected: 0,
    }
}

/// In-memory catalog with canned responses. A gated request does not resolve
/// until its sender fires (or is dropped).
#[derive(Default)]
pub(crate) struct ScriptedCatalog {
    responses: Mutex<HashMap<Key, Result<Page, FetchError>>>,
    gates: Mutex<HashMap<Key, oneshot::Receiver<()>>>,
    fetch_calls: Mutex<Vec<(Endpoint, QueryParams)>>,
    favorite_calls: Mutex<Vec<(MovieId, bool)>>,
    favorite_error: Mutex<Option<FetchError>>,
}

impl ScriptedCatalog {
    pub(crate) async fn respond(
        &self,
        endpoint: Endpoint,
        page: u32,
        query: Option<&str>,
        result: Result<Page, FetchError>,
    ) {
        self.responses
            .lock()
            .await
            .insert((endpoint, page, query.map(str::to_string)), result);
    }

    pub(crate) async fn gate(
        &self,
        endpoint: Endpoint,
        page: u32,
        query: Option<&str>,
    ) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates
            .lock()
            .await
            .insert((endpoint, page, query.map(str::to_string)), rx);
        tx
    }

    pub(crate) async fn fail_favorites(&self, err: FetchError) {
        *self.favorite_error.lock().await = Some(err);
    }

    pub(crate) async fn fetch_calls(&self) -> Vec<(Endpoint, QueryParams)> {
        self.fetch_calls.lock().await.clone()
    }

    pub(crate) async fn favorite_calls(&self) -> Vec<(MovieId, bool)> {
        self.favorite_calls.lock().await.clone()
    }
}

#[async_trait]
impl CatalogClient for ScriptedCatalog {
    async fn fetch(&self, endpoint: &Endpoint, params: &QueryParams) -> Result<Page, FetchError> {
        self.fetch_calls
            .lock()
            .await
            .push((*endpoint, params.clone()));

        let key = (*endpoint, params.page, params.query.clone());
        let gate = self.gates.lock().await.remove(&key);
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        self.responses
            .lock()
            .await
            .get(&key)
            .cloned()
            .unwrap_or_else(|| Err(FetchError::new(endpoint.path(), "no scripted response")))
    }

    async fn set_favorite(&self, media_id: MovieId, favorite: bool) -> Result<(), FetchError> {
        self.favorite_calls.lock().await.push((media_id, favorite));
        match self.favorite_error.lock().await.clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
