//! Widget state and its transitions.
//!
//! All UI-facing state lives in one [`WidgetState`] value. Every transition
//! consumes the old state and returns the next one, so a host renders from a
//! state that is never half-updated, and tests can drive the whole pipeline
//! without a rendering environment.

use crate::error::Result;
use crate::group::{group, GroupedItems};
use crate::index::IndexOptions;
use crate::item::{Item, RawItem};
use crate::query::QueryEngine;
use crate::store::ItemStore;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::sync::Arc;

/// Startup configuration supplied by the embedding host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Only show items that go in this bin (ignoring case)
    pub bin: Option<String>,
    /// Search options
    pub index: IndexOptions,
}

impl WidgetConfig {
    /// Builder-style method to set the bin filter
    #[must_use]
    pub fn with_bin(mut self, bin: impl Into<String>) -> Self {
        self.bin = Some(bin.into());
        self
    }

    /// Builder-style method to set search options
    #[must_use]
    pub fn with_index(mut self, index: IndexOptions) -> Self {
        self.index = index;
        self
    }
}

/// Where the widget is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the catalogue feed
    Loading,
    /// Catalogue loaded and searchable
    Ready,
    /// The feed failed or delivered unusable data
    Failed {
        /// Diagnostic for the host to display
        message: String,
    },
}

/// Everything a renderer needs for one refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WidgetView<'a> {
    /// Show the spinner
    pub loading: bool,
    /// Show an error instead of results
    pub error: Option<&'a str>,
    /// Anchor letters, ascending
    pub letters: Vec<&'a str>,
    /// Sections to render
    pub groups: &'a GroupedItems,
}

/// The widget's complete state.
#[derive(Debug, Clone)]
pub struct WidgetState {
    config: WidgetConfig,
    phase: Phase,
    engine: Option<Arc<QueryEngine>>,
    query: String,
    results: Vec<Item>,
    groups: GroupedItems,
}

impl WidgetState {
    /// A widget waiting for its feed.
    pub fn new(config: WidgetConfig) -> Self {
        Self {
            config,
            phase: Phase::Loading,
            engine: None,
            query: String::new(),
            results: Vec::new(),
            groups: GroupedItems::default(),
        }
    }

    /// Settle the feed: build the store and index, then run the current query.
    ///
    /// A failed fetch, a malformed record or invalid options all land in
    /// [`Phase::Failed`] with empty results; nothing is propagated.
    pub fn apply_fetch<E: Display>(self, outcome: std::result::Result<Vec<RawItem>, E>) -> Self {
        let raw = match outcome {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(error = %e, "Error fetching catalogue");
                return self.fail(format!("Could not load items: {e}"));
            }
        };

        match self.build_engine(raw) {
            Ok(engine) => {
                tracing::info!(items = engine.store().len(), "Catalogue loaded");
                let query = self.query.clone();
                Self {
                    phase: Phase::Ready,
                    engine: Some(Arc::new(engine)),
                    ..self
                }
                .apply_query(&query)
                .apply_group()
            }
            Err(e) => {
                tracing::error!(error = %e, "Rejected catalogue");
                self.fail(format!("Could not load items: {e}"))
            }
        }
    }

    /// Record `query` and recompute the result list.
    ///
    /// While loading (or after a failure) the query is only remembered; it is
    /// applied once a catalogue is available.
    pub fn apply_query(self, query: &str) -> Self {
        let Some(engine) = self.engine.as_ref() else {
            return Self {
                query: query.to_string(),
                ..self
            };
        };

        let results = engine.search(query);
        Self {
            query: query.to_string(),
            results,
            ..self
        }
    }

    /// Regroup the current results.
    pub fn apply_group(self) -> Self {
        match group(self.results.iter().cloned()) {
            Ok(groups) => Self { groups, ..self },
            Err(e) => {
                tracing::error!(error = %e, "Could not group results");
                self.fail(e.to_string())
            }
        }
    }

    /// Reducer for an input change event.
    pub fn on_query_change(self, query: &str) -> Self {
        if self.is_loading() {
            tracing::debug!(query, "Query queued until the catalogue loads");
        }
        self.apply_query(query).apply_group()
    }

    /// Current phase.
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Returns true until the feed settles.
    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    /// The failure message, if the feed failed.
    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            Phase::Failed { message } => Some(message),
            _ => None,
        }
    }

    /// The last query entered.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Current results, best first (store order for an empty query).
    pub fn results(&self) -> &[Item] {
        &self.results
    }

    /// Current lettered grouping.
    pub fn groups(&self) -> &GroupedItems {
        &self.groups
    }

    /// The loaded catalogue, if any.
    pub fn store(&self) -> Option<&ItemStore> {
        self.engine.as_deref().map(QueryEngine::store)
    }

    /// Snapshot for rendering.
    pub fn view(&self) -> WidgetView<'_> {
        WidgetView {
            loading: self.is_loading(),
            error: self.error(),
            letters: self.groups.letters(),
            groups: &self.groups,
        }
    }

    fn build_engine(&self, raw: Vec<RawItem>) -> Result<QueryEngine> {
        let store = ItemStore::load(raw, self.config.bin.as_deref())?;
        QueryEngine::new(store, self.config.index.clone())
    }

    fn fail(self, message: String) -> Self {
        Self {
            phase: Phase::Failed { message },
            engine: None,
            results: Vec::new(),
            groups: GroupedItems::default(),
            ..self
        }
    }
}
