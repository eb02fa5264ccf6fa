//! Alphabetical grouping of items for lettered navigation.

use crate::error::{CatalogError, Result};
use crate::item::Item;
use serde::Serialize;
use std::collections::BTreeMap;

/// Items partitioned by the upper-cased first letter of their name.
///
/// Buckets keep the order in which items were supplied. Keys iterate in
/// ascending order, which is also the display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GroupedItems {
    buckets: BTreeMap<String, Vec<Item>>,
}

/// One lettered section, as handed to a renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LetterGroup<'a> {
    /// Bucket key
    pub letter: &'a str,
    /// Items under that key, in supplied order
    pub items: &'a [Item],
}

impl GroupedItems {
    /// Keys present, ascending.
    pub fn letters(&self) -> Vec<&str> {
        self.buckets.keys().map(String::as_str).collect()
    }

    /// Items under `letter`, if any.
    pub fn get(&self, letter: &str) -> Option<&[Item]> {
        self.buckets.get(letter).map(Vec::as_slice)
    }

    /// Sections in display order.
    pub fn iter(&self) -> impl Iterator<Item = LetterGroup<'_>> {
        self.buckets.iter().map(|(letter, items)| LetterGroup {
            letter: letter.as_str(),
            items: items.as_slice(),
        })
    }

    /// All items in display order.
    pub fn flatten(&self) -> Vec<Item> {
        self.buckets.values().flatten().cloned().collect()
    }

    /// Number of buckets.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Returns true if there are no buckets.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Number of items across all buckets.
    pub fn item_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}

/// Partition `items` by [`Item::group_key`].
///
/// Fails with [`CatalogError::EmptyName`] on the first item whose name is
/// empty, rather than inventing a bucket for it.
pub fn group(items: impl IntoIterator<Item = Item>) -> Result<GroupedItems> {
    let mut buckets: BTreeMap<String, Vec<Item>> = BTreeMap::new();

    for (position, item) in items.into_iter().enumerate() {
        let key = item
            .group_key()
            .ok_or(CatalogError::EmptyName { position })?;
        buckets.entry(key).or_default().push(item);
    }

    Ok(GroupedItems { buckets })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogErrorCode;

    fn items(names: &[&str]) -> Vec<Item> {
        names.iter().map(|n| Item::new(*n, [])).collect()
    }

    fn bucket<'a>(grouped: &'a GroupedItems, letter: &str) -> Vec<&'a str> {
        grouped
            .get(letter)
            .unwrap_or_default()
            .iter()
            .map(|i| i.name.as_str())
            .collect()
    }

    #[test]
    fn test_groups_by_first_letter() {
        let grouped = group(items(&["Apple", "apricot", "Banana"])).unwrap();
        assert_eq!(grouped.letters(), ["A", "B"]);
        assert_eq!(bucket(&grouped, "A"), ["Apple", "apricot"]);
        assert_eq!(bucket(&grouped, "B"), ["Banana"]);
    }

    #[test]
    fn test_bucket_keeps_input_order() {
        // ranked search output is not alphabetical; grouping must not re-sort it
        let grouped = group(items(&["bottle", "Banana", "apricot", "Apple"])).unwrap();
        assert_eq!(bucket(&grouped, "B"), ["bottle", "Banana"]);
        assert_eq!(bucket(&grouped, "A"), ["apricot", "Apple"]);
    }

    #[test]
    fn test_letters_sorted() {
        let grouped = group(items(&["Zinc", "3D glasses", "Éclair", "Milk"])).unwrap();
        assert_eq!(grouped.letters(), ["3", "M", "Z", "É"]);
    }

    #[test]
    fn test_partition_is_total() {
        let input = items(&["Apple", "apricot", "Banana", "Can", "crisp packet"]);
        let grouped = group(input.clone()).unwrap();
        assert_eq!(grouped.item_count(), input.len());
        assert_eq!(grouped.flatten(), input);
    }

    #[test]
    fn test_empty_name_is_an_error() {
        let err = group(items(&["Apple", "", "Banana"])).unwrap_err();
        assert_eq!(err.code(), CatalogErrorCode::EmptyName);
        assert!(matches!(err, CatalogError::EmptyName { position: 1 }));
    }

    #[test]
    fn test_empty_input() {
        let grouped = group(Vec::new()).unwrap();
        assert!(grouped.is_empty());
        assert!(grouped.letters().is_empty());
    }

    #[test]
    fn test_iter_sections() {
        let grouped = group(items(&["Banana", "Apple"])).unwrap();
        let sections: Vec<(&str, usize)> = grouped.iter().map(|g| (g.letter, g.items.len())).collect();
        assert_eq!(sections, [("A", 1), ("B", 1)]);
    }

    #[test]
    fn test_serializes_as_map() {
        let grouped = group(items(&["Banana"])).unwrap();
        let json = serde_json::to_value(&grouped).unwrap();
        assert_eq!(json["B"][0]["name"], "Banana");
    }
}
