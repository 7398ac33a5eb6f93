//! Debounced ticker suggestions
//!
//! Every keystroke goes through [`SearchResolver::on_query`]. Lookups wait for
//! the input to settle, and a response is only published if no newer query
//! has been issued in the meantime.

use crate::api::DashboardApi;
use crate::config::DashboardConfig;
use crate::model::Suggestion;
use crate::schedule::{Debouncer, Ticket};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

pub struct SearchResolver {
    api: Arc<dyn DashboardApi>,
    min_query_len: usize,
    max_suggestions: usize,
    debouncer: Debouncer,
    suggestions: Arc<watch::Sender<Vec<Suggestion>>>,
}

impl SearchResolver {
    pub fn new(api: Arc<dyn DashboardApi>, config: &DashboardConfig) -> Self {
        let (tx, _rx) = watch::channel(Vec::new());
        Self {
            api,
            min_query_len: config.min_query_len,
            max_suggestions: config.max_suggestions,
            debouncer: Debouncer::new(config.search_debounce),
            suggestions: Arc::new(tx),
        }
    }

    /// Feed the current contents of the search box
    ///
    /// Short queries clear the list at once and supersede any pending or
    /// in-flight lookup. Must be called from within a Tokio runtime.
    pub fn on_query(&self, query: &str) -> Ticket {
        let query = query.trim().to_string();
        if query.chars().count() < self.min_query_len {
            return self.clear();
        }

        let api = Arc::clone(&self.api);
        let tx = Arc::clone(&self.suggestions);
        let max = self.max_suggestions;
        self.debouncer.schedule(move |ticket| async move {
            let list = lookup(api.as_ref(), &query, max).await;
            // staleness is checked under the channel lock so a concurrent clear()
            // either sees the published list or makes this ticket stale first
            tx.send_if_modified(|current| {
                if ticket.is_current() {
                    debug!("Publishing {} suggestions for '{}'", list.len(), query);
                    *current = list;
                    true
                } else {
                    debug!("Discarding stale suggestions for '{}'", query);
                    false
                }
            });
        })
    }

    /// Look up suggestions right away, bypassing the debounce
    ///
    /// Failures yield an empty list.
    pub async fn resolve(&self, query: &str) -> Vec<Suggestion> {
        let query = query.trim();
        if query.chars().count() < self.min_query_len {
            return Vec::new();
        }
        lookup(self.api.as_ref(), query, self.max_suggestions).await
    }

    /// Drop the current list and supersede pending lookups
    ///
    /// Returns the ticket of the superseding generation.
    pub fn clear(&self) -> Ticket {
        let ticket = self.debouncer.cancel();
        self.suggestions.send_modify(Vec::clear);
        ticket
    }

    /// Latest published suggestions
    pub fn suggestions(&self) -> Vec<Suggestion> {
        self.suggestions.borrow().clone()
    }

    /// Receiver notified whenever the list changes
    pub fn subscribe(&self) -> watch::Receiver<Vec<Suggestion>> {
        self.suggestions.subscribe()
    }

    /// True while a debounced lookup has not completed
    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }
}

async fn lookup(api: &dyn DashboardApi, query: &str, max: usize) -> Vec<Suggestion> {
    match api.search(query).await {
        Ok(mut list) => {
            list.retain(|s| !s.symbol.trim().is_empty());
            list.truncate(max);
            list
        }
        Err(e) => {
            warn!("Suggestion lookup for '{}' failed: {}", query, e);
            Vec::new()
        }
    }
}
