use thiserror::Error;

/// Any failure of a catalog request.
///
/// Transport errors, timeouts, rejected requests and undecodable bodies all
/// land here; callers do not branch on the cause. `status` is kept for logs.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{endpoint}: {message}")]
pub struct FetchError {
    pub endpoint: String,
    pub status: Option<u16>,
    pub message: String,
}

impl FetchError {
    pub fn new(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            status: None,
            message: message.into(),
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ItemValidationError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("invalid id {0}")]
    InvalidId(i64),
    #[error("blank title for movie {0}")]
    BlankTitle(i64),
    #[error("vote_average {value} out of range for movie {id}")]
    RatingOutOfRange { id: i64, value: f64 },
    #[error("negative {field} for movie {id}")]
    Negative { id: i64, field: &'static str },
    #[error("malformed release_date '{value}' for movie {id}")]
    MalformedReleaseDate { id: i64, value: String },
    #[error("malformed entry: {0}")]
    Shape(String),
}

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("failed to encode item payload: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to decode item payload: {0}")]
    Decode(#[source] serde_json::Error),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown category '{0}' (expected one of nowPlaying, popular, topRated, upcoming)")]
pub struct UnknownCategory(pub String);
