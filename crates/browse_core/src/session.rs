//! Async driver for [`BrowsingController`].
//!
//! Fetches run as spawned tasks and report back over a channel; the session
//! is the only thing that touches the controller, so completions are applied
//! one at a time in arrival order.

use std::sync::Arc;

use catalog_client::{CatalogClient, Endpoint};
use shared::{
    domain::{Category, Page},
    error::FetchError,
};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::controller::{BrowsingController, Completion, FetchTag, FetchTicket};

type FetchOutcome = (FetchTag, Result<Page, FetchError>);

pub struct BrowsingSession<C: CatalogClient + 'static> {
    controller: BrowsingController,
    client: Arc<C>,
    completions_tx: mpsc::UnboundedSender<FetchOutcome>,
    completions_rx: mpsc::UnboundedReceiver<FetchOutcome>,
    in_flight: usize,
}

impl<C: CatalogClient + 'static> BrowsingSession<C> {
    pub fn new(client: Arc<C>, default_category: Category, language: impl Into<String>) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            controller: BrowsingController::new(default_category, language),
            client,
            completions_tx,
            completions_rx,
            in_flight: 0,
        }
    }

    pub fn controller(&self) -> &BrowsingController {
        &self.controller
    }

    /// Requests still running, including ones whose result will be discarded.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn start(&mut self) {
        let ticket = self.controller.start();
        self.dispatch(ticket);
    }

    pub fn select_category(&mut self, category: Category) {
        let ticket = self.controller.select_category(category);
        self.dispatch(ticket);
    }

    pub fn set_search_text(&mut self, text: &str) {
        let ticket = self.controller.set_search_text(text);
        self.dispatch(ticket);
    }

    /// Returns `false` when the request was ignored.
    pub fn load_more(&mut self) -> bool {
        match self.controller.load_more() {
            Some(ticket) => {
                self.dispatch(ticket);
                true
            }
            None => false,
        }
    }

    pub fn refresh(&mut self) {
        let ticket = self.controller.refresh();
        self.dispatch(ticket);
    }

    /// Waits for the next fetch to finish and applies it. `None` when nothing
    /// is in flight.
    pub async fn next_completion(&mut self) -> Option<Completion> {
        if self.in_flight == 0 {
            return None;
        }
        let (tag, result) = self.completions_rx.recv().await?;
        self.in_flight -= 1;
        Some(self.controller.complete(&tag, result))
    }

    /// Drains every in-flight fetch.
    pub async fn settle(&mut self) -> Vec<Completion> {
        let mut completions = Vec::with_capacity(self.in_flight);
        while let Some(completion) = self.next_completion().await {
            completions.push(completion);
        }
        completions
    }

    fn dispatch(&mut self, ticket: FetchTicket) {
        let FetchTicket {
            tag,
            endpoint,
            params,
        } = ticket;
        let client = Arc::clone(&self.client);
        let tx = self.completions_tx.clone();
        self.in_flight += 1;
        debug!(
            in_flight = self.in_flight,
            endpoint = %endpoint,
            page = params.page,
            "browse: dispatching fetch"
        );
        let reporter = CompletionReporter {
            pending: Some(tag),
            endpoint,
            tx,
        };
        tokio::spawn(async move {
            let result = client.fetch(&reporter.endpoint, &params).await;
            reporter.send(result);
        });
    }
}

/// Sends exactly one outcome per dispatched fetch. A task that unwinds or is
/// dropped before `send` reports a failure for its tag.
struct CompletionReporter {
    pending: Option<FetchTag>,
    endpoint: Endpoint,
    tx: mpsc::UnboundedSender<FetchOutcome>,
}

impl CompletionReporter {
    fn send(mut self, result: Result<Page, FetchError>) {
        if let Some(tag) = self.pending.take() {
            let _ = self.tx.send((tag, result));
        }
    }
}

impl Drop for CompletionReporter {
    fn drop(&mut self) {
        if let Some(tag) = self.pending.take() {
            warn!(endpoint = %self.endpoint, "browse: fetch task ended without a result");
            let err = FetchError::new(self.endpoint.path(), "fetch task ended without a result");
            let _ = self.tx.send((tag, Err(err)));
        }
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
