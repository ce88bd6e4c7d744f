use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::ACCEPT, Client, Response};
use shared::{
    domain::{AccountId, MediaType, MovieId, Page},
    error::FetchError,
    protocol::{parse_entry, FavoriteRequest, PageResponse, StatusResponse},
};
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

use crate::{config::Settings, BearerToken, CatalogClient, Endpoint, MissingToken, QueryParams};

#[derive(Debug, Error)]
pub enum ClientBuildError {
    #[error("invalid API base url '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("API base url '{0}' must use http or https")]
    UnsupportedScheme(String),
    #[error(transparent)]
    MissingToken(#[from] MissingToken),
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// `CatalogClient` backed by the TMDB v3 REST API.
#[derive(Debug, Clone)]
pub struct TmdbClient {
    http: Client,
    base_url: String,
    token: BearerToken,
    account_id: AccountId,
}

impl TmdbClient {
    pub fn new(
        base_url: &str,
        token: BearerToken,
        account_id: AccountId,
    ) -> Result<Self, ClientBuildError> {
        Self::with_http(base_url, token, account_id, Client::new())
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, ClientBuildError> {
        let token = settings.bearer_token()?;
        let mut builder = Client::builder();
        if let Some(secs) = settings.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Self::with_http(
            &settings.api_base_url,
            token,
            AccountId(settings.account_id),
            builder.build()?,
        )
    }

    fn with_http(
        base_url: &str,
        token: BearerToken,
        account_id: AccountId,
        http: Client,
    ) -> Result<Self, ClientBuildError> {
        let parsed = Url::parse(base_url).map_err(|source| ClientBuildError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientBuildError::UnsupportedScheme(base_url.to_string()));
        }

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            account_id,
        })
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[async_trait]
impl CatalogClient for TmdbClient {
    async fn fetch(&self, endpoint: &Endpoint, params: &QueryParams) -> Result<Page, FetchError> {
        let path = endpoint.path();
        debug!(endpoint = %path, page = params.page, "catalog: GET");

        let response = self
            .http
            .get(self.url(&path))
            .bearer_auth(self.token.expose())
            .header(ACCEPT, "application/json")
            .query(params)
            .send()
            .await
            .map_err(|err| transport_error(&path, err))?;
        let response = ensure_success(&path, response).await?;
        let body: PageResponse = response
            .json()
            .await
            .map_err(|err| FetchError::new(&path, format!("invalid response body: {err}")))?;

        Ok(into_page(&path, params.page, body))
    }

    async fn set_favorite(&self, media_id: MovieId, favorite: bool) -> Result<(), FetchError> {
        let path = format!("/account/{}/favorite", self.account_id.0);
        let response = self
            .http
            .post(self.url(&path))
            .bearer_auth(self.token.expose())
            .header(ACCEPT, "application/json")
            .json(&FavoriteRequest {
                media_type: MediaType::Movie,
                media_id,
                favorite,
            })
            .send()
            .await
            .map_err(|err| transport_error(&path, err))?;
        let response = ensure_success(&path, response).await?;

        let raw = response.text().await.unwrap_or_default();
        if let Ok(status) = serde_json::from_str::<StatusResponse>(&raw) {
            if status.success == Some(false) {
                return Err(FetchError::new(
                    &path,
                    status
                        .status_message
                        .unwrap_or_else(|| "request not accepted".to_string()),
                ));
            }
        }

        info!(movie_id = media_id.0, favorite, "catalog: favorite status updated");
        Ok(())
    }
}

fn transport_error(path: &str, err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::new(path, format!("request timed out: {err}"))
    } else {
        FetchError::new(path, format!("transport failure: {err}"))
    }
}

async fn ensure_success(path: &str, response: Response) -> Result<Response, FetchError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let raw = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<StatusResponse>(&raw)
        .ok()
        .and_then(|body| body.status_message)
        .unwrap_or(raw);
    Err(FetchError::new(path, format!("HTTP {status}: {detail}")).with_status(status.as_u16()))
}

fn into_page(path: &str, requested_page: u32, body: PageResponse) -> Page {
    let mut items = Vec::with_capacity(body.results.len());
    let mut rejected = 0;
    for entry in body.results {
        match parse_entry(entry) {
            Ok(item) => items.push(item),
            Err(err) => {
                rejected += 1;
                warn!(endpoint = %path, "catalog: rejected malformed entry: {err}");
            }
        }
    }

    Page {
        number: if body.page == 0 {
            requested_page
        } else {
            body.page
        },
        items,
        total_pages: body.total_pages,
        total_results: body.total_results,
        rejected,
    }
}
