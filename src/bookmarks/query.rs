//! Query-string handling for `GET /api/bookmarks`.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::model::{Bookmark, SortField};

const NAME_KEY: &str = "name";
const CATEGORY_KEY: &str = "category";
const SORT_KEY: &str = "sort";

/// The query parameters a listing understands, plus how many distinct keys
/// the client actually sent.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BookmarkQuery {
    pub name: Option<String>,
    pub category: Option<String>,
    pub sort: Vec<String>,
    supplied: usize,
}

impl BookmarkQuery {
    /// Parses a raw query string (without the leading `?`). `sort` may be
    /// repeated; for `name` and `category` the first occurrence is used.
    pub fn parse(raw: &str) -> Result<Self, serde_urlencoded::de::Error> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(raw)?;
        let mut query = BookmarkQuery::default();
        let mut keys = BTreeSet::new();

        for (key, value) in pairs {
            match key.as_str() {
                NAME_KEY if query.name.is_none() => query.name = Some(value),
                CATEGORY_KEY if query.category.is_none() => query.category = Some(value),
                SORT_KEY => query.sort.push(value),
                _ => {}
            }
            keys.insert(key);
        }

        query.supplied = keys.len();
        Ok(query)
    }

    pub fn supplied(&self) -> usize {
        self.supplied
    }

    /// Number of filters that will run. A recognised key with an empty value
    /// does not count.
    pub fn applied(&self) -> usize {
        let set = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty()) as usize;
        set(&self.name) + set(&self.category) + self.sorts() as usize
    }

    /// Whether the sort step runs: at least one `sort` value is non-empty.
    pub fn sorts(&self) -> bool {
        self.sort.iter().any(|s| !s.is_empty())
    }

    pub fn has_unknown_keys(&self) -> bool {
        self.supplied > 0 && self.applied() != self.supplied
    }
}

/// Trims whitespace, then one pair of matching `"` or `'` around the value
/// and any whitespace they enclosed.
pub fn strip_quotes(raw: &str) -> &str {
    let trimmed = raw.trim();
    for quote in ['"', '\''] {
        if trimmed.len() >= 2 && trimmed.starts_with(quote) && trimmed.ends_with(quote) {
            return trimmed[1..trimmed.len() - 1].trim();
        }
    }
    trimmed
}

/// Upper-cases the first character so `name` lines up with `Name`.
pub fn capitalize_first_letter(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Matches names case-insensitively. A trailing `*` turns the search into
/// a prefix match.
pub fn search_by_name(name: &str, bookmarks: Vec<Bookmark>) -> Vec<Bookmark> {
    let name = strip_quotes(name);

    if let Some(prefix) = name.strip_suffix('*') {
        let prefix = prefix.to_lowercase();
        return bookmarks
            .into_iter()
            .filter(|b| b.name.to_lowercase().starts_with(&prefix))
            .collect();
    }

    let name = name.to_lowercase();
    bookmarks
        .into_iter()
        .filter(|b| b.name.to_lowercase() == name)
        .collect()
}

pub fn search_by_category(category: &str, bookmarks: Vec<Bookmark>) -> Vec<Bookmark> {
    let category = strip_quotes(category).to_lowercase();
    bookmarks
        .into_iter()
        .filter(|b| b.category.to_lowercase() == category)
        .collect()
}

/// Resolves raw sort values to fields. Returns `None` as soon as one of
/// them is neither `name` nor `category`.
pub fn parse_sort_fields(values: &[String]) -> Option<Vec<SortField>> {
    values
        .iter()
        .map(|v| SortField::from_str(&capitalize_first_letter(strip_quotes(v))))
        .collect()
}

/// Stable multi-key sort on the lower-cased field values.
pub fn sort(fields: &[SortField], mut bookmarks: Vec<Bookmark>) -> Vec<Bookmark> {
    bookmarks.sort_by(|a, b| {
        fields
            .iter()
            .map(|f| f.value(a).to_lowercase().cmp(&f.value(b).to_lowercase()))
            .find(|o| *o != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });
    bookmarks
}
