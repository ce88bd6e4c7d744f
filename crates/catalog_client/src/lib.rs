use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use shared::{
    domain::{AccountId, Category, MovieId, Page},
    error::FetchError,
};
use thiserror::Error;

pub mod config;
mod tmdb;

pub use tmdb::{ClientBuildError, TmdbClient};

pub const DEFAULT_LANGUAGE: &str = "en-US";
pub const FAVORITES_SORT_ORDER: &str = "created_at.asc";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Category(Category),
    Search,
    AccountFavorites(AccountId),
}

impl Endpoint {
    pub fn path(&self) -> String {
        match self {
            Endpoint::Category(category) => category.path().to_string(),
            Endpoint::Search => "/search/movie".to_string(),
            Endpoint::AccountFavorites(account_id) => {
                format!("/account/{}/favorite/movies", account_id.0)
            }
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Query string for paged reads. `language` and `page` are always sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryParams {
    pub language: String,
    pub page: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
}

impl QueryParams {
    pub fn page(language: impl Into<String>, page: u32) -> Self {
        Self {
            language: language.into(),
            page,
            query: None,
            sort_by: None,
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_sort_by(mut self, sort_by: impl Into<String>) -> Self {
        self.sort_by = Some(sort_by.into());
        self
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("no API access token configured; set TMDB_ACCESS_TOKEN or access_token in movies.toml")]
pub struct MissingToken;

/// API read access token, sent as `Authorization: Bearer <token>`.
#[derive(Clone)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(raw: impl Into<String>) -> Result<Self, MissingToken> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(MissingToken);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn fetch(&self, endpoint: &Endpoint, params: &QueryParams) -> Result<Page, FetchError>;

    async fn set_favorite(&self, media_id: MovieId, favorite: bool) -> Result<(), FetchError>;
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
