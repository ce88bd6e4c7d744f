//! Movie browsing core: list controller, its async driver, the detail view
//! and the favorites list. Everything talks to the catalog through
//! [`catalog_client::CatalogClient`].

pub mod controller;
pub mod detail;
pub mod favorites;
pub mod session;

pub use controller::{
    BrowsingController, Completion, FetchTag, FetchTicket, Filter, PageState, SearchText,
};
pub use detail::{poster_url, DetailView, FavoritePolicy, Notice, ToggleOutcome};
pub use favorites::FavoritesList;
pub use session::BrowsingSession;

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
