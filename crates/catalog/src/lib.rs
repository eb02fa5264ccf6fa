//! Search-and-group core for the "can I recycle it?" catalogue widget.
//!
//! This crate provides:
//! - Feed record ingestion with fail-fast validation
//! - A sorted, immutable item store with optional bin pre-filtering
//! - Bitap-scored fuzzy search over weighted fields
//! - Stable alphabetical grouping for lettered navigation
//! - A state object with pure transitions for driving a UI
//! - WASM bindings for browser usage
//!
//! # Example
//!
//! ```
//! use recycle_catalog::{group, Item, ItemStore, QueryEngine, Tag};
//!
//! let store = ItemStore::new(vec![
//!     Item::new("Banana", [Tag::new("GreenCaddy")]),
//!     Item::new("apricot", [Tag::new("GreenCaddy")]),
//!     Item::new("Apple", [Tag::new("GreenCaddy")]),
//! ]);
//! let engine = QueryEngine::with_defaults(store).unwrap();
//!
//! let matches = engine.search("appl");
//! assert_eq!(matches[0].name, "Apple");
//!
//! let grouped = group(engine.search("")).unwrap();
//! assert_eq!(grouped.letters(), ["A", "B"]);
//! ```

mod chip;
mod error;
pub mod fuzzy;
mod group;
mod index;
mod item;
mod query;
mod state;
mod store;

#[cfg(feature = "wasm")]
mod wasm;

pub use chip::{chip_tier, ChipTier};
pub use error::{CatalogError, CatalogErrorCode, Result};
pub use group::{group, GroupedItems, LetterGroup};
pub use index::{FieldMatch, FieldPath, FuzzyIndex, IndexOptions, MatchResult, WeightedKey};
pub use item::{ingest, parse_items, Item, RawItem, Tag};
pub use query::QueryEngine;
pub use state::{Phase, WidgetConfig, WidgetState, WidgetView};
pub use store::{compare_names, sort_by_name, ItemStore};
