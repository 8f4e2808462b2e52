//! esp32ref - ESP32 reference catalog and search engine
//!
//! Static reference data for ESP32 chip variants, their pin maps, circuit
//! recipes and development boards, plus the search, filter and selection
//! logic a reference site or terminal front end needs on top of it.
//!
//! # Quick Start
//!
//! ```rust
//! use esp32ref::{Catalog, QueryEngine, SearchResult};
//!
//! let catalog = Catalog::builtin();
//! let mut engine = QueryEngine::new(&catalog);
//!
//! for result in engine.search("gpio21") {
//!     if let SearchResult::Pin(hit) = result {
//!         println!("{} -> {}", hit.header.title, hit.header.path);
//!     }
//! }
//! ```
//!
//! # Features
//!
//! - **Catalog**: embedded JSON tables, optionally overlaid by a data directory
//! - **Search**: case-insensitive substring search across every entity type
//! - **Filters**: circuit, board and pin facets
//! - **Selection**: per-page highlight state with `?highlight=<id>` deep links
//! - **Routes**: typed site paths for navigation targets

pub mod catalog;
pub mod core;
pub mod overlay;
pub mod pages;
pub mod query;
pub mod routes;
pub mod selection;

// Re-export main types
pub use catalog::{builtin_catalog, Catalog, CatalogIssue, IssueSeverity};
pub use core::{CapPolicy, Esp32RefError, QueryOptions};
pub use overlay::{Key, KeyPress, SearchOverlay};
pub use pages::{BoardDetail, BoardsPage, CircuitsPage, PinoutPage};
pub use query::{
    filter_boards, filter_circuits, filter_pins_by_category, search_all, BoardFilter,
    CircuitFilter, Facet, PinFacet, PinMatch, QueryEngine, SearchResult,
};
pub use routes::Route;
pub use selection::{ScrollRequest, Selection};

/// Load the catalog, overlaying `data_dir` when given (convenience wrapper).
///
/// Malformed entries are skipped; their messages are returned alongside.
pub fn load_catalog(
    data_dir: Option<&std::path::Path>,
) -> Result<(Catalog, Vec<String>), Esp32RefError> {
    Catalog::load(data_dir)
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::catalog::schema::{Board, Circuit, Difficulty, Pin, PinCategory, Variant};
    pub use crate::{
        BoardFilter, Catalog, CircuitFilter, Esp32RefError, Facet, PinFacet, QueryEngine,
        QueryOptions, Route, SearchResult, Selection,
    };
}
