//! Browsing state machine: filter, page cursor, accumulated results, and
//! the tagged-fetch bookkeeping that keeps stale responses out.
//!
//! The controller never performs I/O. Every transition that needs data hands
//! back a [`FetchTicket`]; whoever executes it reports back through
//! [`BrowsingController::complete`] with the ticket's tag.

use std::collections::HashSet;

use catalog_client::{Endpoint, QueryParams};
use shared::{
    domain::{CatalogItem, Category, MovieId, Page},
    error::FetchError,
};
use tracing::{debug, warn};

/// Search text that is non-empty after trimming.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchText(String);

impl SearchText {
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Filter {
    Category(Category),
    Search(SearchText),
}

impl Filter {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Filter::Category(category) => Endpoint::Category(*category),
            Filter::Search(_) => Endpoint::Search,
        }
    }

    fn params(&self, language: &str, cursor: u32) -> QueryParams {
        let params = QueryParams::page(language, cursor);
        match self {
            Filter::Category(_) => params,
            Filter::Search(text) => params.with_query(text.as_str()),
        }
    }
}

/// Identifies the state a fetch was issued under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchTag {
    pub generation: u64,
    pub filter: Filter,
    pub cursor: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub tag: FetchTag,
    pub endpoint: Endpoint,
    pub params: QueryParams,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageState {
    pub cursor: u32,
    pub accumulated: Vec<CatalogItem>,
    pub is_loading: bool,
    pub is_refreshing: bool,
    /// Last `total_pages` reported for the active filter; `None` until a
    /// page has been applied.
    pub total_pages: Option<u32>,
    pub end_reached: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied { added: usize },
    Failed,
    /// The tag did not match current state; nothing was touched.
    Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchKind {
    Reset,
    LoadMore,
    Refresh,
}

#[derive(Debug, Clone)]
struct Snapshot {
    cursor: u32,
    accumulated: Vec<CatalogItem>,
    total_pages: Option<u32>,
    end_reached: bool,
    seen: HashSet<MovieId>,
}

#[derive(Debug, Clone)]
struct PendingFetch {
    tag: FetchTag,
    kind: FetchKind,
    restore: Option<Snapshot>,
}

#[derive(Debug)]
pub struct BrowsingController {
    language: String,
    filter: Filter,
    last_category: Category,
    generation: u64,
    state: PageState,
    seen: HashSet<MovieId>,
    pending: Option<PendingFetch>,
}

impl BrowsingController {
    pub fn new(default_category: Category, language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            filter: Filter::Category(default_category),
            last_category: default_category,
            generation: 0,
            state: PageState {
                cursor: 1,
                ..PageState::default()
            },
            seen: HashSet::new(),
            pending: None,
        }
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn last_category(&self) -> Category {
        self.last_category
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.state.accumulated
    }

    pub fn cursor(&self) -> u32 {
        self.state.cursor
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading
    }

    pub fn is_refreshing(&self) -> bool {
        self.state.is_refreshing
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether `load_more` would currently issue a fetch.
    pub fn can_load_more(&self) -> bool {
        !self.state.is_loading
            && !self.state.is_refreshing
            && self.state.total_pages.is_some()
            && !self.state.end_reached
    }

    /// Initial load for the current filter.
    pub fn start(&mut self) -> FetchTicket {
        self.reset(FetchKind::Reset)
    }

    /// Not a no-op when `category` is already active: the list is reloaded
    /// from the first page.
    pub fn select_category(&mut self, category: Category) -> FetchTicket {
        self.filter = Filter::Category(category);
        self.last_category = category;
        self.reset(FetchKind::Reset)
    }

    /// Blank text falls back to the last selected category.
    pub fn set_search_text(&mut self, text: &str) -> FetchTicket {
        self.filter = match SearchText::new(text) {
            Some(search) => Filter::Search(search),
            None => Filter::Category(self.last_category),
        };
        self.reset(FetchKind::Reset)
    }

    pub fn load_more(&mut self) -> Option<FetchTicket> {
        if self.state.is_loading || self.state.is_refreshing {
            debug!(
                cursor = self.state.cursor,
                "browse: load_more ignored while a fetch is in flight"
            );
            return None;
        }
        if self.state.total_pages.is_none() {
            debug!("browse: load_more ignored before the first page was applied");
            return None;
        }
        if self.state.end_reached {
            debug!(cursor = self.state.cursor, "browse: load_more ignored at end of results");
            return None;
        }

        self.state.cursor += 1;
        self.state.is_loading = true;
        Some(self.issue(FetchKind::LoadMore, None))
    }

    /// Reloads from the first page. The current list is cleared while the
    /// refresh is in flight and put back if it fails.
    pub fn refresh(&mut self) -> FetchTicket {
        let restore = match self.pending.take() {
            Some(PendingFetch {
                kind: FetchKind::Refresh,
                restore: Some(snapshot),
                ..
            }) => snapshot,
            pending => {
                let cursor = match pending {
                    Some(PendingFetch {
                        kind: FetchKind::LoadMore,
                        ..
                    }) => self.state.cursor - 1,
                    _ => self.state.cursor,
                };
                Snapshot {
                    cursor,
                    accumulated: std::mem::take(&mut self.state.accumulated),
                    total_pages: self.state.total_pages,
                    end_reached: self.state.end_reached,
                    seen: std::mem::take(&mut self.seen),
                }
            }
        };

        self.generation += 1;
        self.clear_results();
        self.state.is_loading = false;
        self.state.is_refreshing = true;
        self.issue(FetchKind::Refresh, Some(restore))
    }

    /// Applies the outcome of the fetch identified by `tag`.
    ///
    /// Never panics and never leaves the controller unusable: failures are
    /// logged and only clear the loading flags.
    pub fn complete(&mut self, tag: &FetchTag, result: Result<Page, FetchError>) -> Completion {
        let pending = match self.pending.take() {
            Some(pending) if self.is_current(&pending.tag, tag) => pending,
            other => {
                self.pending = other;
                debug!(
                    generation = tag.generation,
                    cursor = tag.cursor,
                    current_generation = self.generation,
                    "browse: discarded stale response"
                );
                return Completion::Discarded;
            }
        };

        self.state.is_loading = false;
        self.state.is_refreshing = false;

        match result {
            Ok(page) => {
                if pending.kind != FetchKind::LoadMore {
                    self.clear_results();
                }
                let added = self.append(page);
                Completion::Applied { added }
            }
            Err(err) => {
                warn!(
                    endpoint = %err.endpoint,
                    cursor = tag.cursor,
                    generation = tag.generation,
                    "browse: fetch failed: {err}"
                );
                match pending.kind {
                    FetchKind::LoadMore => self.state.cursor -= 1,
                    FetchKind::Refresh => {
                        if let Some(snapshot) = pending.restore {
                            self.state.cursor = snapshot.cursor;
                            self.state.accumulated = snapshot.accumulated;
                            self.state.total_pages = snapshot.total_pages;
                            self.state.end_reached = snapshot.end_reached;
                            self.seen = snapshot.seen;
                        }
                    }
                    FetchKind::Reset => {}
                }
                Completion::Failed
            }
        }
    }

    fn is_current(&self, pending: &FetchTag, tag: &FetchTag) -> bool {
        pending == tag
            && tag.generation == self.generation
            && tag.filter == self.filter
            && tag.cursor == self.state.cursor
    }

    fn reset(&mut self, kind: FetchKind) -> FetchTicket {
        self.generation += 1;
        self.clear_results();
        self.state.is_refreshing = false;
        self.state.is_loading = true;
        self.issue(kind, None)
    }

    fn clear_results(&mut self) {
        self.state.cursor = 1;
        self.state.accumulated.clear();
        self.state.total_pages = None;
        self.state.end_reached = false;
        self.seen.clear();
    }

    fn issue(&mut self, kind: FetchKind, restore: Option<Snapshot>) -> FetchTicket {
        let tag = FetchTag {
            generation: self.generation,
            filter: self.filter.clone(),
            cursor: self.state.cursor,
        };
        debug!(
            generation = tag.generation,
            cursor = tag.cursor,
            endpoint = %self.filter.endpoint(),
            ?kind,
            "browse: issuing fetch"
        );
        self.pending = Some(PendingFetch {
            tag: tag.clone(),
            kind,
            restore,
        });
        FetchTicket {
            endpoint: self.filter.endpoint(),
            params: self.filter.params(&self.language, tag.cursor),
            tag,
        }
    }

    /// Appends in server order, skipping ids that are already listed.
    fn append(&mut self, page: Page) -> usize {
        let page_was_empty = page.items.is_empty() && page.rejected == 0;
        let mut added = 0;
        for item in page.items {
            if self.seen.insert(item.id) {
                self.state.accumulated.push(item);
                added += 1;
            }
        }

        self.state.total_pages = Some(page.total_pages);
        self.state.end_reached =
            page_was_empty || (page.total_pages > 0 && self.state.cursor >= page.total_pages);
        added
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
