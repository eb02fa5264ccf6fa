//! Fuzzy index over an item collection.
//!
//! The index snapshots the searchable text of every item at build time, folded
//! to lowercase unless the options ask for case-sensitive matching. It never
//! observes later changes: when the store is replaced the index must be
//! rebuilt, which [`FuzzyIndex::is_stale`] reports.

use crate::error::{CatalogError, Result};
use crate::fuzzy::{best_match, MatchParams};
use crate::item::Item;
use crate::store::ItemStore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// A searchable field of an [`Item`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FieldPath {
    /// `name`
    Name,
    /// `synonyms[].value`
    Synonyms,
    /// `description`
    Description,
    /// `bins[].value`
    Bins,
    /// `categories[].value`
    Categories,
}

impl FieldPath {
    /// Canonical path string.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldPath::Name => "name",
            FieldPath::Synonyms => "synonyms[].value",
            FieldPath::Description => "description",
            FieldPath::Bins => "bins[].value",
            FieldPath::Categories => "categories[].value",
        }
    }

    /// The text values this path selects from `item`.
    pub fn values<'a>(&self, item: &'a Item) -> Vec<&'a str> {
        match self {
            FieldPath::Name => vec![item.name.as_str()],
            FieldPath::Description => vec![item.description.as_str()],
            FieldPath::Synonyms => item.synonyms.iter().map(|t| t.value.as_str()).collect(),
            FieldPath::Bins => item.bins.iter().map(|t| t.value.as_str()).collect(),
            FieldPath::Categories => item.categories.iter().map(|t| t.value.as_str()).collect(),
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldPath {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace("[]", "");
        match normalized.as_str() {
            "name" | "item" => Ok(FieldPath::Name),
            "description" => Ok(FieldPath::Description),
            "synonyms" | "synonyms.value" => Ok(FieldPath::Synonyms),
            "bins" | "bins.value" => Ok(FieldPath::Bins),
            "categories" | "categories.value" => Ok(FieldPath::Categories),
            _ => Err(CatalogError::InvalidOptions(format!("unknown field path `{s}`"))),
        }
    }
}

impl TryFrom<String> for FieldPath {
    type Error = CatalogError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<FieldPath> for String {
    fn from(path: FieldPath) -> Self {
        path.as_str().to_string()
    }
}

/// A field path with its relative weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightedKey {
    /// Field to index
    pub path: FieldPath,
    /// Relative importance; matches in lighter fields score worse
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

impl WeightedKey {
    /// Creates a key with the given weight.
    pub fn new(path: FieldPath, weight: f64) -> Self {
        Self { path, weight }
    }
}

impl From<FieldPath> for WeightedKey {
    fn from(path: FieldPath) -> Self {
        Self::new(path, default_weight())
    }
}

/// Index and matching options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexOptions {
    /// Maximum admitted score (lower is stricter)
    pub match_threshold: f64,
    /// Report scores on match results
    pub include_score: bool,
    /// Report which fields matched
    pub include_matches: bool,
    /// Expected match position within a field
    pub location: usize,
    /// Drift from `location` at which the proximity penalty reaches 1.0
    pub distance: usize,
    /// Match case exactly
    pub case_sensitive: bool,
    /// Fields to index
    pub keys: Vec<WeightedKey>,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            match_threshold: 0.2,
            include_score: true,
            include_matches: true,
            location: 0,
            distance: 100,
            case_sensitive: false,
            keys: vec![FieldPath::Name.into(), FieldPath::Synonyms.into()],
        }
    }
}

impl IndexOptions {
    /// Builder-style method to set the match threshold
    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.match_threshold = threshold;
        self
    }

    /// Builder-style method to set the indexed keys
    #[must_use]
    pub fn with_keys(mut self, keys: impl IntoIterator<Item = WeightedKey>) -> Self {
        self.keys = keys.into_iter().collect();
        self
    }

    /// Builder-style method to toggle match metadata
    #[must_use]
    pub fn with_matches(mut self, include_score: bool, include_matches: bool) -> Self {
        self.include_score = include_score;
        self.include_matches = include_matches;
        self
    }

    /// Builder-style method to set location and distance
    #[must_use]
    pub fn with_location(mut self, location: usize, distance: usize) -> Self {
        self.location = location;
        self.distance = distance;
        self
    }

    /// Builder-style method to toggle case sensitivity
    #[must_use]
    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.match_threshold) {
            return Err(CatalogError::InvalidOptions(format!(
                "match_threshold must be within [0, 1], got {}",
                self.match_threshold
            )));
        }

        if self.keys.is_empty() {
            return Err(CatalogError::InvalidOptions("at least one key is required".into()));
        }

        if let Some(key) = self.keys.iter().find(|k| !k.weight.is_finite() || k.weight <= 0.0) {
            return Err(CatalogError::InvalidOptions(format!(
                "weight for `{}` must be positive, got {}",
                key.path, key.weight
            )));
        }

        Ok(())
    }

    fn fold(&self, text: &str) -> Vec<char> {
        if self.case_sensitive {
            text.chars().collect()
        } else {
            text.chars().flat_map(char::to_lowercase).collect()
        }
    }

    /// Fold `text` and record, for every folded char, the index of the char
    /// it came from.
    fn fold_with_offsets(&self, text: &str) -> (Vec<char>, Vec<usize>) {
        let mut folded = Vec::with_capacity(text.len());
        let mut offsets = Vec::with_capacity(text.len());
        for (index, c) in text.chars().enumerate() {
            if self.case_sensitive {
                folded.push(c);
                offsets.push(index);
            } else {
                for lower in c.to_lowercase() {
                    folded.push(lower);
                    offsets.push(index);
                }
            }
        }
        (folded, offsets)
    }
}

/// Field-length norm: `1/sqrt(tokens)`, rounded to three places.
///
/// Tokens are runs of non-space chars, so a short field that matches
/// outweighs a long one.
fn field_norm(text: &str) -> f64 {
    let tokens = text.split(' ').filter(|t| !t.is_empty()).count().max(1);
    (1000.0 / (tokens as f64).sqrt()).round() / 1000.0
}

/// Where and how well a query matched inside one field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMatch {
    /// Field that matched
    pub key: FieldPath,
    /// The field value that matched
    pub value: String,
    /// Match score divided by the key's relative weight
    pub score: f64,
    /// Matched char span within `value`, end exclusive
    pub span: (usize, usize),
}

/// A scored search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// The matched item
    pub item: Item,
    /// Combined score in `(0, 1]`, lower is better; `None` unless scores are included
    pub score: Option<f64>,
    /// Field-level matches, best first; empty unless matches are included
    pub matched_fields: Vec<FieldMatch>,
}

#[derive(Debug)]
struct IndexedValue {
    key: usize,
    source: usize,
    text: Vec<char>,
    offsets: Vec<usize>,
    norm: f64,
}

/// Searchable snapshot of an item collection.
#[derive(Debug)]
pub struct FuzzyIndex {
    items: Arc<[Item]>,
    entries: Vec<Vec<IndexedValue>>,
    relative_weights: Vec<f64>,
    key_weights: Vec<f64>,
    options: IndexOptions,
    generation: u64,
}

impl FuzzyIndex {
    /// Build an index over the store's current collection.
    pub fn build(store: &ItemStore, options: IndexOptions) -> Result<Self> {
        options.validate()?;

        let max_weight = options
            .keys
            .iter()
            .map(|k| k.weight)
            .fold(f64::MIN_POSITIVE, f64::max);
        let relative_weights = options.keys.iter().map(|k| k.weight / max_weight).collect();
        let total_weight: f64 = options.keys.iter().map(|k| k.weight).sum();
        let key_weights = options.keys.iter().map(|k| k.weight / total_weight).collect();

        let items = store.shared();
        let entries: Vec<Vec<IndexedValue>> = items
            .iter()
            .map(|item| {
                options
                    .keys
                    .iter()
                    .enumerate()
                    .flat_map(|(key, weighted)| {
                        weighted
                            .path
                            .values(item)
                            .into_iter()
                            .enumerate()
                            .map(move |(source, value)| (key, source, value))
                    })
                    .filter(|(_, _, value)| !value.trim().is_empty())
                    .map(|(key, source, value)| {
                        let (text, offsets) = options.fold_with_offsets(value);
                        IndexedValue {
                            key,
                            source,
                            text,
                            offsets,
                            norm: field_norm(value),
                        }
                    })
                    .collect()
            })
            .collect();

        tracing::debug!(
            items = items.len(),
            keys = options.keys.len(),
            generation = store.generation(),
            "Built fuzzy index"
        );

        Ok(Self {
            items,
            entries,
            relative_weights,
            key_weights,
            options,
            generation: store.generation(),
        })
    }

    /// The options this index was built with.
    pub fn options(&self) -> &IndexOptions {
        &self.options
    }

    /// Generation of the store the index was built from.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns true if `store` is not the collection this index was built from.
    pub fn is_stale(&self, store: &ItemStore) -> bool {
        self.generation != store.generation()
    }

    /// Number of indexed items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the index holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Score every item against `query` and return hits ranked best first.
    ///
    /// Ties keep collection order. An empty query matches nothing here; the
    /// query engine treats it as "show everything" before reaching the index.
    pub fn search(&self, query: &str) -> Vec<MatchResult> {
        let pattern = self.options.fold(query);
        if pattern.is_empty() {
            return Vec::new();
        }

        #[cfg(feature = "parallel")]
        let scored: Vec<Option<(f64, Vec<FieldMatch>)>> = {
            use rayon::prelude::*;
            self.entries
                .par_iter()
                .enumerate()
                .map(|(index, values)| self.score_item(index, values, &pattern))
                .collect()
        };

        #[cfg(not(feature = "parallel"))]
        let scored: Vec<Option<(f64, Vec<FieldMatch>)>> = self
            .entries
            .iter()
            .enumerate()
            .map(|(index, values)| self.score_item(index, values, &pattern))
            .collect();

        let mut hits: Vec<(usize, f64, Vec<FieldMatch>)> = scored
            .into_iter()
            .enumerate()
            .filter_map(|(index, hit)| hit.map(|(score, fields)| (index, score, fields)))
            .collect();

        // stable: equal scores stay in collection order
        hits.sort_by(|a, b| a.1.total_cmp(&b.1));

        hits.into_iter()
            .map(|(index, score, matched_fields)| MatchResult {
                item: self.items[index].clone(),
                score: self.options.include_score.then_some(score),
                matched_fields: if self.options.include_matches {
                    matched_fields
                } else {
                    Vec::new()
                },
            })
            .collect()
    }

    /// Every value within its (weighted) threshold contributes
    /// `max(score, EPSILON)^(weight * norm)` to the item's score, so more
    /// matching fields and shorter matching fields both rank higher.
    fn score_item(
        &self,
        index: usize,
        values: &[IndexedValue],
        pattern: &[char],
    ) -> Option<(f64, Vec<FieldMatch>)> {
        let item = &self.items[index];
        let mut total = 1.0;
        let mut fields: Vec<FieldMatch> = Vec::new();

        for value in values {
            let relative = self.relative_weights[value.key];
            let params = MatchParams {
                location: self.options.location,
                distance: self.options.distance,
                threshold: self.options.match_threshold * relative,
            };
            let Some(hit) = best_match(&value.text, pattern, &params) else {
                continue;
            };

            total *= hit
                .score
                .max(f64::EPSILON)
                .powf(self.key_weights[value.key] * value.norm);

            let path = self.options.keys[value.key].path;
            fields.push(FieldMatch {
                key: path,
                value: path.values(item)[value.source].to_string(),
                score: hit.score / relative,
                span: value.original_span(hit.start, hit.end),
            });
        }

        if fields.is_empty() {
            return None;
        }

        fields.sort_by(|a, b| a.score.total_cmp(&b.score));
        Some((total, fields))
    }
}

impl IndexedValue {
    /// Map a span over the folded text back to chars of the source value.
    fn original_span(&self, start: usize, end: usize) -> (usize, usize) {
        let source_len = self.offsets.last().map_or(0, |last| last + 1);
        let from = self.offsets.get(start).copied().unwrap_or(source_len);
        let to = if end > start {
            self.offsets.get(end - 1).map_or(source_len, |last| last + 1)
        } else {
            from
        };
        (from, to)
    }
}
