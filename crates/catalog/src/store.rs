//! The item store: the canonical, sorted collection the widget searches.
//!
//! A store is never mutated after construction. Loading a fresh feed builds a
//! new store with a new generation number, which is how derived data such as
//! the fuzzy index detects that it has gone stale.

use crate::error::Result;
use crate::item::{ingest, Item, RawItem};
use std::cmp::Ordering;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// Sorted, immutable item collection.
#[derive(Debug, Clone)]
pub struct ItemStore {
    items: Arc<[Item]>,
    generation: u64,
}

impl ItemStore {
    /// Creates a store from already-validated items, sorting them by name.
    pub fn new(mut items: Vec<Item>) -> Self {
        sort_by_name(&mut items);
        Self {
            items: items.into(),
            generation: NEXT_GENERATION.fetch_add(1, AtomicOrdering::Relaxed),
        }
    }

    /// Creates an empty store.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Ingests raw feed records, sorts them and applies the optional bin filter.
    ///
    /// A `None` or empty `bin_filter` keeps every item. Otherwise only items
    /// with a bin equal to the filter (ignoring case) are kept.
    pub fn load(raw: Vec<RawItem>, bin_filter: Option<&str>) -> Result<Self> {
        let items = ingest(raw)?;
        Ok(Self::with_bin_filter(items, bin_filter))
    }

    /// Sorts `items` and keeps only those matching `bin_filter`, if one is set.
    pub fn with_bin_filter(items: Vec<Item>, bin_filter: Option<&str>) -> Self {
        let total = items.len();
        let items: Vec<Item> = match bin_filter.filter(|bin| !bin.is_empty()) {
            Some(bin) => {
                let kept: Vec<Item> = items.into_iter().filter(|item| item.has_bin(bin)).collect();
                tracing::debug!(bin, total, kept = kept.len(), "Applied bin filter");
                kept
            }
            None => items,
        };
        Self::new(items)
    }

    /// The sorted items.
    #[inline]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// A shared handle to the sorted items.
    #[inline]
    pub fn shared(&self) -> Arc<[Item]> {
        Arc::clone(&self.items)
    }

    /// Identifies this collection; differs between any two stores built separately.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of items.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the store holds no items.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for ItemStore {
    fn default() -> Self {
        Self::empty()
    }
}

/// Stable sort by name using [`compare_names`], computing each key once.
pub fn sort_by_name(items: &mut [Item]) {
    items.sort_by_cached_key(|item| collation_key(&item.name));
}

/// Case-insensitive, accent-aware name comparison.
///
/// Names are compared first with accents and case removed, then with accents
/// but no case, then lowercase-before-uppercase, and finally by raw text so
/// the order is total.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a).cmp(&collation_key(b))
}

fn collation_key(s: &str) -> (String, String, Vec<bool>, String) {
    (primary_key(s), secondary_key(s), tertiary_key(s), s.to_string())
}

fn primary_key(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

fn secondary_key(s: &str) -> String {
    s.nfd().flat_map(char::to_lowercase).collect()
}

fn tertiary_key(s: &str) -> Vec<bool> {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(char::is_uppercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Tag;

    fn names(store: &ItemStore) -> Vec<&str> {
        store.items().iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn test_sorted_case_insensitively() {
        let store = ItemStore::new(vec![
            Item::new("banana", []),
            Item::new("Apple", []),
            Item::new("apricot", []),
            Item::new("Cherry", []),
        ]);
        assert_eq!(names(&store), ["Apple", "apricot", "banana", "Cherry"]);
    }

    #[test]
    fn test_accents_sort_with_base_letter() {
        let store = ItemStore::new(vec![
            Item::new("Eggs", []),
            Item::new("Éclair", []),
            Item::new("Dough", []),
        ]);
        assert_eq!(names(&store), ["Dough", "Éclair", "Eggs"]);
    }

    #[test]
    fn test_lowercase_before_uppercase() {
        assert_eq!(compare_names("apple", "Apple"), Ordering::Less);
        assert_eq!(compare_names("Apple", "Apple"), Ordering::Equal);
        assert_eq!(compare_names("cafe", "café"), Ordering::Less);
    }

    #[test]
    fn test_sort_agrees_with_comparator() {
        let raw = ["Éclair", "eclair", "Eclair", "apple", "Apple", "café", "cafe", "Cafe", "zip", "Égg"];
        let mut items: Vec<Item> = raw.iter().map(|n| Item::new(*n, [])).collect();
        sort_by_name(&mut items);

        let mut expected: Vec<&str> = raw.to_vec();
        expected.sort_by(|a, b| compare_names(a, b));

        let sorted: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(sorted, expected);
        assert_eq!(&sorted[..2], ["apple", "Apple"]);
    }

    #[test]
    fn test_bin_filter() {
        let items = vec![
            Item::new("Bottle", [Tag::new("Blue Bin")]),
            Item::new("Grass", [Tag::new("Brown Bin")]),
            Item::new("Can", [Tag::new("blue bin"), Tag::new("Brown Bin")]),
        ];
        let store = ItemStore::with_bin_filter(items, Some("Blue Bin"));
        assert_eq!(names(&store), ["Bottle", "Can"]);
        assert!(store.items().iter().all(|i| i.has_bin("blue bin")));
    }

    #[test]
    fn test_empty_bin_filter_keeps_everything() {
        let items = vec![
            Item::new("Bottle", [Tag::new("Blue Bin")]),
            Item::new("Grass", [Tag::new("Brown Bin")]),
        ];
        assert_eq!(ItemStore::with_bin_filter(items.clone(), Some("")).len(), 2);
        assert_eq!(ItemStore::with_bin_filter(items, None).len(), 2);
    }

    #[test]
    fn test_load_rejects_malformed() {
        let raw = vec![RawItem::default()];
        assert!(ItemStore::load(raw, None).is_err());
    }

    #[test]
    fn test_generations_differ() {
        let a = ItemStore::empty();
        let b = ItemStore::empty();
        assert_ne!(a.generation(), b.generation());
        assert_eq!(a.clone().generation(), a.generation());
    }
}
