//! Catalogue item model and feed ingestion.
//!
//! Feed records arrive as [`RawItem`]s, where every field is optional so a
//! broken record can be reported precisely instead of failing the whole
//! payload with an opaque serde message. [`RawItem::into_item`] validates a
//! record and produces an immutable [`Item`].

use crate::error::{CatalogError, Result};
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// A labeled attribute of an item: a bin type or a category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    /// Display label (the feed spells this key `Value`)
    #[serde(alias = "Value")]
    pub value: String,
}

impl Tag {
    /// Creates a new tag.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

impl From<&str> for Tag {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A disposal-guidance record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Canonical sort and group key
    pub name: String,
    /// Bins the item may go in
    pub bins: Vec<Tag>,
    /// Category labels
    pub categories: Vec<Tag>,
    /// Free-text disposal guidance
    #[serde(default)]
    pub description: String,
    /// Alternative names the item is also searchable by
    #[serde(default)]
    pub synonyms: Vec<Tag>,
}

impl Item {
    /// Creates an item with no categories, description or synonyms.
    pub fn new(name: impl Into<String>, bins: impl IntoIterator<Item = Tag>) -> Self {
        Self {
            name: name.into(),
            bins: bins.into_iter().collect(),
            categories: Vec::new(),
            description: String::new(),
            synonyms: Vec::new(),
        }
    }

    /// Builder-style method to set categories
    #[must_use]
    pub fn with_categories(mut self, categories: impl IntoIterator<Item = Tag>) -> Self {
        self.categories = categories.into_iter().collect();
        self
    }

    /// Builder-style method to set the description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builder-style method to set synonyms
    #[must_use]
    pub fn with_synonyms(mut self, synonyms: impl IntoIterator<Item = Tag>) -> Self {
        self.synonyms = synonyms.into_iter().collect();
        self
    }

    /// Returns true if any of the item's bins equals `bin`, ignoring case.
    pub fn has_bin(&self, bin: &str) -> bool {
        let wanted = bin.to_lowercase();
        self.bins.iter().any(|b| b.value.to_lowercase() == wanted)
    }

    /// Upper-cased first grapheme of the name, or `None` for an empty name.
    pub fn group_key(&self) -> Option<String> {
        self.name
            .graphemes(true)
            .next()
            .map(|g| g.to_uppercase())
    }
}

/// One record as delivered by the catalogue feed.
///
/// Only the fields the widget consumes are declared; anything else in the
/// payload is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawItem {
    /// Item name
    #[serde(default)]
    pub item: Option<String>,
    /// Bin tags
    #[serde(default)]
    pub bins: Option<Vec<Tag>>,
    /// Category tags
    #[serde(default)]
    pub categories: Option<Vec<Tag>>,
    /// Disposal guidance
    #[serde(default)]
    pub description: Option<String>,
    /// Alternative names
    #[serde(default)]
    pub synonyms: Option<Vec<Tag>>,
}

impl RawItem {
    /// Validates the record and converts it into an [`Item`].
    ///
    /// `index` is the record's position in the feed payload and is only used
    /// for diagnostics.
    pub fn into_item(self, index: usize) -> Result<Item> {
        let name = self
            .item
            .ok_or_else(|| CatalogError::malformed(index, "missing `item`"))?;
        if name.trim().is_empty() {
            return Err(CatalogError::malformed(index, "`item` is empty"));
        }
        let bins = self
            .bins
            .ok_or_else(|| CatalogError::malformed(index, format!("`{name}` is missing `bins`")))?;
        let categories = self.categories.ok_or_else(|| {
            CatalogError::malformed(index, format!("`{name}` is missing `categories`"))
        })?;

        Ok(Item {
            name,
            bins,
            categories,
            description: self.description.unwrap_or_default(),
            synonyms: self.synonyms.unwrap_or_default(),
        })
    }
}

impl From<Item> for RawItem {
    fn from(item: Item) -> Self {
        Self {
            item: Some(item.name),
            bins: Some(item.bins),
            categories: Some(item.categories),
            description: Some(item.description),
            synonyms: Some(item.synonyms),
        }
    }
}

/// Ingest a batch of feed records, failing on the first malformed one.
pub fn ingest(raw: Vec<RawItem>) -> Result<Vec<Item>> {
    raw.into_iter()
        .enumerate()
        .map(|(index, record)| record.into_item(index))
        .collect()
}

/// Parse a JSON array of feed records and ingest it.
pub fn parse_items(json: &str) -> Result<Vec<Item>> {
    let raw: Vec<RawItem> = serde_json::from_str(json)?;
    ingest(raw)
}
