use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{PayloadError, UnknownCategory};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(MovieId);
id_newtype!(AccountId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[default]
    NowPlaying,
    Popular,
    TopRated,
    Upcoming,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::NowPlaying,
        Category::Popular,
        Category::TopRated,
        Category::Upcoming,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Category::NowPlaying => "/movie/now_playing",
            Category::Popular => "/movie/popular",
            Category::TopRated => "/movie/top_rated",
            Category::Upcoming => "/movie/upcoming",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::NowPlaying => "nowPlaying",
            Category::Popular => "popular",
            Category::TopRated => "topRated",
            Category::Upcoming => "upcoming",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Accepts camelCase, snake_case and kebab-case spellings.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized: String = raw
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "nowplaying" => Ok(Category::NowPlaying),
            "popular" => Ok(Category::Popular),
            "toprated" => Ok(Category::TopRated),
            "upcoming" => Ok(Category::Upcoming),
            _ => Err(UnknownCategory(raw.to_string())),
        }
    }
}

/// A movie record as returned by the catalog service, after validation.
///
/// This is also the navigation payload handed to the detail view, so it has
/// to carry everything the detail view displays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: MovieId,
    pub title: String,
    pub release_date: Option<NaiveDate>,
    pub poster_path: Option<String>,
    pub vote_average: f64,
    pub overview: String,
    pub original_language: String,
    pub popularity: f64,
    pub vote_count: u64,
}

impl CatalogItem {
    pub fn to_payload(&self) -> Result<String, PayloadError> {
        serde_json::to_string(self).map_err(PayloadError::Encode)
    }

    pub fn from_payload(payload: &str) -> Result<Self, PayloadError> {
        serde_json::from_str(payload).map_err(PayloadError::Decode)
    }
}

/// One page of validated results.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    pub number: u32,
    pub items: Vec<CatalogItem>,
    pub total_pages: u32,
    pub total_results: u64,
    /// Entries dropped because they failed validation.
    pub rejected: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Movie,
}
