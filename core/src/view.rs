use std::collections::{BTreeMap, HashMap, HashSet};

use crate::models::{CodingProblem, Difficulty, QuestionItem};

/// How a record participates in filtering. Implemented by both question
/// records (facet = category) and coding problems (facet = canonical
/// difficulty bucket).
pub trait Filterable {
    /// Stable identifier within the collection
    fn key(&self) -> i64;
    /// Equality-filter key: category, or canonical difficulty bucket.
    /// `None` when the record has no usable label (unknown difficulty).
    fn facet(&self) -> Option<String>;
    /// Origin site, when the record has one
    fn source(&self) -> Option<&str>;
    /// Case-insensitive substring match over the searchable fields.
    /// `needle` is already lowercased and non-empty.
    fn matches_search(&self, needle: &str) -> bool;
}

impl Filterable for QuestionItem {
    fn key(&self) -> i64 {
        self.id
    }

    fn facet(&self) -> Option<String> {
        Some(self.category.clone())
    }

    fn source(&self) -> Option<&str> {
        None
    }

    fn matches_search(&self, needle: &str) -> bool {
        self.content.to_lowercase().contains(needle)
            || self.answer.to_lowercase().contains(needle)
            || self.category.to_lowercase().contains(needle)
    }
}

impl Filterable for CodingProblem {
    fn key(&self) -> i64 {
        self.id
    }

    fn facet(&self) -> Option<String> {
        Difficulty::from_label(&self.difficulty).map(|d| d.bucket().to_string())
    }

    fn source(&self) -> Option<&str> {
        if self.source.is_empty() {
            None
        } else {
            Some(&self.source)
        }
    }

    fn matches_search(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.tags.iter().any(|t| t.to_lowercase().contains(needle))
    }
}

/// Active filter dimensions and pagination parameters. Ephemeral; rebuilt
/// by user-driven filter/page actions, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    /// Case-insensitive substring query; empty means no search predicate
    pub search: String,
    /// Equality filter on category / difficulty bucket
    pub facet: Option<String>,
    /// Case-insensitive equality filter on origin site
    pub source: Option<String>,
    /// 1-based page number
    pub page: usize,
    pub page_size: usize,
}

/// A single filter-dimension update. Clearing values (empty string or the
/// "all" sentinel) remove the predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    Search(String),
    Facet(Option<String>),
    Source(Option<String>),
}

/// Derived, always-consistent visible subset + page over a source
/// collection. Predicates apply in a fixed order (scope, facet, source,
/// search) so results are deterministic and composable; the source
/// collection is never mutated by filtering.
#[derive(Debug, Clone)]
pub struct FilteredView<T> {
    items: Vec<T>,
    /// Tab/mode subset that replaces the working set when active
    /// (e.g. the daily-problem history)
    scope: Option<Vec<T>>,
    filter: FilterState,
    filtered: Vec<T>,
}

impl<T: Filterable + Clone> FilteredView<T> {
    pub fn new(page_size: usize) -> Self {
        FilteredView {
            items: Vec::new(),
            scope: None,
            filter: FilterState {
                search: String::new(),
                facet: None,
                source: None,
                page: 1,
                page_size: page_size.max(1),
            },
            filtered: Vec::new(),
        }
    }

    /// Replace the backing collection. Resets the page to 1; an empty
    /// collection is valid and yields an empty result.
    pub fn set_source_collection(&mut self, items: Vec<T>) {
        self.items = items;
        self.filter.page = 1;
        self.recompute();
    }

    /// Activate or clear the tab/mode subset that replaces the working set
    /// ahead of all other predicates. Resets the page to 1.
    pub fn set_scope(&mut self, scope: Option<Vec<T>>) {
        self.scope = scope;
        self.filter.page = 1;
        self.recompute();
    }

    /// Update one filter dimension and recompute. Resets the page to 1.
    pub fn set_filter(&mut self, filter: Filter) {
        match filter {
            Filter::Search(text) => self.filter.search = text,
            Filter::Facet(value) => self.filter.facet = normalize(value),
            Filter::Source(value) => self.filter.source = normalize(value),
        }
        self.filter.page = 1;
        self.recompute();
    }

    /// Set the current page, silently clamped to `[1, last_page]`
    pub fn go_to_page(&mut self, n: i64) {
        let last = self.last_page() as i64;
        self.filter.page = n.clamp(1, last) as usize;
    }

    /// The ordered sub-sequence of the filtered collection for the current
    /// page. Never panics: an out-of-range page clamps on read.
    pub fn visible_page(&self) -> &[T] {
        let start = (self.current_page() - 1) * self.filter.page_size;
        if start >= self.filtered.len() {
            return &[];
        }
        let end = (start + self.filter.page_size).min(self.filtered.len());
        &self.filtered[start..end]
    }

    pub fn filtered_count(&self) -> usize {
        self.filtered.len()
    }

    pub fn source_count(&self) -> usize {
        self.scope.as_ref().unwrap_or(&self.items).len()
    }

    /// `max(1, ceil(filtered_count / page_size))`
    pub fn last_page(&self) -> usize {
        self.filtered.len().div_ceil(self.filter.page_size).max(1)
    }

    /// Stored page clamped into `[1, last_page]`
    pub fn current_page(&self) -> usize {
        self.filter.page.clamp(1, self.last_page())
    }

    pub fn state(&self) -> &FilterState {
        &self.filter
    }

    /// Look up an item in the working set by key
    pub fn get(&self, key: i64) -> Option<&T> {
        self.items
            .iter()
            .chain(self.scope.iter().flatten())
            .find(|item| item.key() == key)
    }

    /// Patch the local copy of one item in place after a successful remote
    /// update. Keeps the current page (re-clamped on read) so the view does
    /// not jump while the user is working through a page.
    pub fn replace_item(&mut self, item: T) {
        let key = item.key();
        if let Some(existing) = self.items.iter_mut().find(|i| i.key() == key) {
            *existing = item.clone();
        }
        if let Some(scope) = self.scope.as_mut() {
            if let Some(existing) = scope.iter_mut().find(|i| i.key() == key) {
                *existing = item;
            }
        }
        self.recompute();
    }

    /// Drop an item from the local copies after a successful remote delete
    pub fn remove_item(&mut self, key: i64) {
        self.items.retain(|i| i.key() != key);
        if let Some(scope) = self.scope.as_mut() {
            scope.retain(|i| i.key() != key);
        }
        self.recompute();
    }

    fn recompute(&mut self) {
        let working = self.scope.as_ref().unwrap_or(&self.items);
        let mut filtered: Vec<T> = working.clone();

        if let Some(facet) = &self.filter.facet {
            filtered.retain(|item| item.facet().as_deref() == Some(facet.as_str()));
        }

        if let Some(source) = &self.filter.source {
            let source = source.to_lowercase();
            filtered.retain(|item| {
                item.source()
                    .map(|s| s.to_lowercase() == source)
                    .unwrap_or(false)
            });
        }

        let needle = self.filter.search.trim().to_lowercase();
        if !needle.is_empty() {
            filtered.retain(|item| item.matches_search(&needle));
        }

        self.filtered = filtered;
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value.filter(|v| {
        let v = v.trim();
        !v.is_empty() && !v.eq_ignore_ascii_case("all")
    })
}

/// Origin sites present in a collection, first-seen order, folded
/// case-insensitively (the first spelling wins). Recomputed on demand;
/// never cached across refreshes.
pub fn unique_sources<T: Filterable>(items: &[T]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut sources = Vec::new();
    for item in items {
        if let Some(source) = item.source() {
            if seen.insert(source.to_lowercase()) {
                sources.push(source.to_string());
            }
        }
    }
    sources
}

/// Item count per facet label, recomputed on demand from the collection
pub fn category_counts<T: Filterable>(items: &[T]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for item in items {
        if let Some(facet) = item.facet() {
            *counts.entry(facet).or_insert(0) += 1;
        }
    }
    counts
}

/// Per-item boolean UI state (expanded panels and the like) keyed by item
/// identifier and owned by the view's caller. On collection refresh,
/// entries for keys no longer present are dropped via [`ToggleMap::retain_keys`].
#[derive(Debug, Clone, Default)]
pub struct ToggleMap {
    entries: HashMap<i64, bool>,
}

impl ToggleMap {
    pub fn new() -> Self {
        ToggleMap::default()
    }

    /// Flip the state for a key and return the new value. Unknown keys
    /// start from off.
    pub fn toggle(&mut self, key: i64) -> bool {
        let entry = self.entries.entry(key).or_insert(false);
        *entry = !*entry;
        *entry
    }

    pub fn is_on(&self, key: i64) -> bool {
        self.entries.get(&key).copied().unwrap_or(false)
    }

    /// Merge semantics on refresh: keep only entries whose keys survive
    pub fn retain_keys(&mut self, keys: &HashSet<i64>) {
        self.entries.retain(|key, _| keys.contains(key));
    }
}
