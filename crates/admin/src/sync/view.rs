//! Filtered, sorted projection of the collection cache.

use rollcall_core::{Record, SortSpec};

use super::cache::CollectionCache;
use crate::error::SyncError;

/// Search term and optional sort for a list view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewQuery {
    needle: String,
    sort: Option<SortSpec>,
}

impl ViewQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search term. Surrounding whitespace is ignored; matching is
    /// case-insensitive.
    #[must_use]
    pub fn with_search(mut self, term: &str) -> Self {
        self.set_search(term);
        self
    }

    #[must_use]
    pub const fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn set_search(&mut self, term: &str) {
        self.needle = term.trim().to_lowercase();
    }

    pub const fn set_sort(&mut self, sort: Option<SortSpec>) {
        self.sort = sort;
    }

    /// The normalized (trimmed, lowercase) search term.
    #[must_use]
    pub fn search(&self) -> &str {
        &self.needle
    }

    #[must_use]
    pub const fn sort(&self) -> Option<SortSpec> {
        self.sort
    }

    /// Check that `R` can be ordered the way this query asks.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedSort` if the sort key is not one of `R::SORT_KEYS`.
    pub fn validate<R: Record>(&self) -> Result<(), SyncError> {
        match self.sort {
            Some(spec) if !R::supports_sort(spec.key) => Err(SyncError::UnsupportedSort {
                noun: R::NOUN,
                key: spec.key.to_string(),
            }),
            _ => Ok(()),
        }
    }
}

/// Positions in `records` of the rows `query` selects, in display order.
///
/// Rows are kept when the search term occurs in one of their searchable
/// fields. Sorting is stable, so ties stay in cache order in both directions.
/// Without a sort the cache order is kept.
#[must_use]
pub fn project<R: Record>(records: &[R], query: &ViewQuery) -> Vec<usize> {
    let mut rows: Vec<(usize, &R)> = records
        .iter()
        .enumerate()
        .filter(|(_, record)| record.matches_search(&query.needle))
        .collect();

    if let Some(SortSpec { key, direction }) = query.sort {
        rows.sort_by(|(_, a), (_, b)| direction.apply(a.compare_by(b, key)));
    }

    rows.into_iter().map(|(index, _)| index).collect()
}

/// The current query plus the memoized projection for it.
#[derive(Debug, Default)]
pub struct ListView {
    query: ViewQuery,
    memo: Option<Memo>,
    computed: u64,
}

#[derive(Debug)]
struct Memo {
    revision: u64,
    rows: Vec<usize>,
}

impl ListView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn query(&self) -> &ViewQuery {
        &self.query
    }

    /// Replace the search term.
    pub fn set_search(&mut self, term: &str) {
        let mut query = self.query.clone();
        query.set_search(term);
        self.replace_query(query);
    }

    /// Replace the sort.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedSort` and keeps the previous sort if `R` cannot be
    /// ordered by the key.
    pub fn set_sort<R: Record>(&mut self, sort: Option<SortSpec>) -> Result<(), SyncError> {
        let mut query = self.query.clone();
        query.set_sort(sort);
        query.validate::<R>()?;
        self.replace_query(query);
        Ok(())
    }

    fn replace_query(&mut self, query: ViewQuery) {
        if query != self.query {
            self.query = query;
            self.memo = None;
        }
    }

    /// The visible records, recomputed only if the cache or query changed.
    pub fn visible<'a, R: Record>(&mut self, cache: &'a CollectionCache<R>) -> Vec<&'a R> {
        let stale = self
            .memo
            .as_ref()
            .is_none_or(|memo| memo.revision != cache.revision());
        if stale {
            self.computed += 1;
            self.memo = Some(Memo {
                revision: cache.revision(),
                rows: project(cache.records(), &self.query),
            });
        }

        let records = cache.records();
        self.memo
            .as_ref()
            .map(|memo| memo.rows.iter().filter_map(|&i| records.get(i)).collect())
            .unwrap_or_default()
    }

    /// Number of times the projection has been computed.
    #[must_use]
    pub const fn computations(&self) -> u64 {
        self.computed
    }
}
