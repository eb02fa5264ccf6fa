//! Query engine: maps free-text input to matching items.

use crate::error::Result;
use crate::index::{FuzzyIndex, IndexOptions, MatchResult};
use crate::item::Item;
use crate::store::ItemStore;

/// Owns a store and the index derived from it, keeping the two in step.
#[derive(Debug)]
pub struct QueryEngine {
    store: ItemStore,
    index: FuzzyIndex,
}

impl QueryEngine {
    /// Build an engine (and its index) over `store`.
    pub fn new(store: ItemStore, options: IndexOptions) -> Result<Self> {
        let index = FuzzyIndex::build(&store, options)?;
        Ok(Self { store, index })
    }

    /// Build an engine with default options.
    pub fn with_defaults(store: ItemStore) -> Result<Self> {
        Self::new(store, IndexOptions::default())
    }

    /// Swap in a freshly loaded store, rebuilding the index.
    pub fn replace_store(&mut self, store: ItemStore) -> Result<()> {
        let index = FuzzyIndex::build(&store, self.index.options().clone())?;
        self.store = store;
        self.index = index;
        Ok(())
    }

    /// The backing store.
    pub fn store(&self) -> &ItemStore {
        &self.store
    }

    /// The options the index was built with.
    pub fn options(&self) -> &IndexOptions {
        self.index.options()
    }

    /// Items matching `query`, best first.
    ///
    /// An empty query returns the whole collection in store order. Any other
    /// string is a valid query and yields a possibly empty result.
    pub fn search(&self, query: &str) -> Vec<Item> {
        if query.is_empty() {
            return self.store.items().to_vec();
        }

        self.search_with_scores(query)
            .into_iter()
            .map(|result| result.item)
            .collect()
    }

    /// Like [`search`](Self::search) but keeps score and field metadata.
    ///
    /// The empty query yields every item with a perfect score and no field
    /// matches.
    pub fn search_with_scores(&self, query: &str) -> Vec<MatchResult> {
        debug_assert!(!self.index.is_stale(&self.store));

        if query.is_empty() {
            let include_score = self.options().include_score;
            return self
                .store
                .items()
                .iter()
                .map(|item| MatchResult {
                    item: item.clone(),
                    score: include_score.then_some(0.0),
                    matched_fields: Vec::new(),
                })
                .collect();
        }

        let results = self.index.search(query);
        tracing::debug!(query, matches = results.len(), "Query evaluated");
        results
    }
}
