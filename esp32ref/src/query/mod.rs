//! Query engine: global search and faceted filters over the catalog.
//!
//! The free functions ([`search_all`], [`filter_circuits`], [`filter_boards`],
//! [`filter_pins_by_category`]) are pure. [`QueryEngine`] wraps them with a
//! memo keyed on the query or filter, so re-rendering with unchanged inputs
//! does not rescan the catalog.

pub mod filter;
pub mod search;

pub use filter::{
    filter_boards, filter_circuits, filter_pins_by_category, BoardFilter, CircuitFilter, Facet,
    PinFacet,
};
pub use search::{normalize_query, search_all, PinMatch, ResultHeader, SearchResult};

use lru::LruCache;
use std::num::NonZeroUsize;

use crate::catalog::schema::{Board, Circuit, Pin};
use crate::catalog::Catalog;
use crate::core::QueryOptions;

/// Memoizing front end over the pure query functions.
///
/// Results are identical to calling the free functions directly.
pub struct QueryEngine<'c> {
    catalog: &'c Catalog,
    options: QueryOptions,
    searches: LruCache<String, Vec<SearchResult>>,
    circuits: LruCache<CircuitFilter, Vec<&'c Circuit>>,
    boards: LruCache<BoardFilter, Vec<&'c Board>>,
}

fn cache_capacity(options: &QueryOptions) -> NonZeroUsize {
    NonZeroUsize::new(options.cache_capacity).unwrap_or(NonZeroUsize::MIN)
}

impl<'c> QueryEngine<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        Self::with_options(catalog, QueryOptions::default())
    }

    pub fn with_options(catalog: &'c Catalog, options: QueryOptions) -> Self {
        let capacity = cache_capacity(&options);
        Self {
            catalog,
            options,
            searches: LruCache::new(capacity),
            circuits: LruCache::new(capacity),
            boards: LruCache::new(capacity),
        }
    }

    pub fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    /// Replace the options. Memoized results are discarded.
    pub fn set_options(&mut self, options: QueryOptions) {
        let capacity = cache_capacity(&options);
        self.options = options;
        self.searches = LruCache::new(capacity);
        self.circuits = LruCache::new(capacity);
        self.boards = LruCache::new(capacity);
    }

    pub fn search(&mut self, query: &str) -> &[SearchResult] {
        // Queries that differ only in case or surrounding whitespace share a result.
        let key = normalize_query(query);
        let catalog = self.catalog;
        let options = &self.options;

        let mut computed = false;
        let results = self.searches.get_or_insert(key, || {
            computed = true;
            search_all(catalog, query, options)
        });
        if !computed {
            tracing::debug!("Search cache hit for '{}'", query.trim());
        }
        results
    }

    pub fn circuits(&mut self, filter: &CircuitFilter) -> &[&'c Circuit] {
        let catalog = self.catalog;
        self.circuits
            .get_or_insert(filter.clone(), || filter_circuits(catalog, filter))
    }

    pub fn boards(&mut self, filter: &BoardFilter) -> &[&'c Board] {
        let catalog = self.catalog;
        self.boards
            .get_or_insert(filter.clone(), || filter_boards(catalog, filter))
    }

    /// Pin maps are short; this is not memoized.
    pub fn pins<'p>(&self, pins: &'p [Pin], facet: &PinFacet) -> Vec<&'p Pin> {
        filter_pins_by_category(pins, facet)
    }
}
