use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    domain::{CatalogItem, MediaType, MovieId},
    error::ItemValidationError,
};

const RELEASE_DATE_FORMAT: &str = "%Y-%m-%d";

/// List envelope shared by every paged endpoint.
///
/// `results` stays untyped so a single malformed entry can be rejected
/// without failing the whole page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageResponse {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<Value>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMovie {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub release_date: Option<String>,
    pub poster_path: Option<String>,
    pub vote_average: Option<f64>,
    pub overview: Option<String>,
    pub original_language: Option<String>,
    pub popularity: Option<f64>,
    pub vote_count: Option<i64>,
}

impl TryFrom<RawMovie> for CatalogItem {
    type Error = ItemValidationError;

    fn try_from(raw: RawMovie) -> Result<Self, Self::Error> {
        let id = raw.id.ok_or(ItemValidationError::MissingField("id"))?;
        if id <= 0 {
            return Err(ItemValidationError::InvalidId(id));
        }

        let title = raw.title.ok_or(ItemValidationError::MissingField("title"))?;
        if title.trim().is_empty() {
            return Err(ItemValidationError::BlankTitle(id));
        }

        let vote_average = raw.vote_average.unwrap_or_default();
        if !(0.0..=10.0).contains(&vote_average) {
            return Err(ItemValidationError::RatingOutOfRange {
                id,
                value: vote_average,
            });
        }

        let popularity = raw.popularity.unwrap_or_default();
        if popularity < 0.0 || popularity.is_nan() {
            return Err(ItemValidationError::Negative {
                id,
                field: "popularity",
            });
        }

        let vote_count = raw.vote_count.unwrap_or_default();
        let vote_count = u64::try_from(vote_count).map_err(|_| ItemValidationError::Negative {
            id,
            field: "vote_count",
        })?;

        let release_date = match raw.release_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(value) => Some(
                NaiveDate::parse_from_str(value, RELEASE_DATE_FORMAT).map_err(|_| {
                    ItemValidationError::MalformedReleaseDate {
                        id,
                        value: value.to_string(),
                    }
                })?,
            ),
        };

        let poster_path = raw.poster_path.filter(|path| !path.trim().is_empty());

        Ok(CatalogItem {
            id: MovieId(id),
            title,
            release_date,
            poster_path,
            vote_average,
            overview: raw.overview.unwrap_or_default(),
            original_language: raw.original_language.unwrap_or_default(),
            popularity,
            vote_count,
        })
    }
}

pub fn parse_entry(entry: Value) -> Result<CatalogItem, ItemValidationError> {
    let raw: RawMovie =
        serde_json::from_value(entry).map_err(|err| ItemValidationError::Shape(err.to_string()))?;
    CatalogItem::try_from(raw)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FavoriteRequest {
    pub media_type: MediaType,
    pub media_id: MovieId,
    pub favorite: bool,
}

/// Status envelope returned by write endpoints and by most error responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusResponse {
    pub success: Option<bool>,
    pub status_code: Option<i64>,
    pub status_message: Option<String>,
}
