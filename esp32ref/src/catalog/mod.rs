//! ESP32 Reference Catalog
//!
//! Immutable tables of chip variants, pin maps, circuit recipes, development
//! boards, board pinouts and circuit schematics, loaded once at startup.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │   Embedded   │───▶│ CatalogParts │───▶│   Catalog    │
//! │     JSON     │    │  (overlay)   │    │  (indexed)   │
//! └──────────────┘    └──────▲───────┘    └──────┬───────┘
//!                            │                   │
//! ┌──────────────┐           │          ┌────────┴────────┐
//! │  User data   │───────────┘          ▼                 ▼
//! │  directory   │               ┌────────────┐    ┌────────────┐
//! └──────────────┘               │  Lookups   │    │   Query    │
//!                                │ (by id)    │    │   Engine   │
//!                                └────────────┘    └────────────┘
//! ```
//!
//! Lookups never fail: an unknown id yields `None` (or an empty slice) so the
//! caller can render a "not found" state.
//!
//! # Usage
//!
//! ```rust
//! use esp32ref::catalog::Catalog;
//!
//! let catalog = Catalog::builtin();
//! let s3 = catalog.variant("esp32-s3").expect("built-in variant");
//! assert_eq!(s3.name, "ESP32-S3");
//! assert!(catalog.board("nonexistent-id").is_none());
//! ```

pub mod builtin;
pub mod schema;
pub mod validate;

pub use builtin::CatalogParts;
pub use schema::*;
pub use validate::{CatalogIssue, IssueSeverity};

use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

use crate::core::Esp32RefError;

/// Indexed, read-only view over the catalog tables.
///
/// Tables keep their declaration order; the id indexes point at the first
/// entry for each id (duplicates are reported by [`Catalog::validate`]).
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    variants: Vec<Variant>,
    circuits: Vec<Circuit>,
    boards: Vec<Board>,
    board_pinouts: Vec<BoardPinout>,
    schematics: Vec<CircuitSchematic>,

    variant_index: HashMap<String, usize>,
    circuit_index: HashMap<String, usize>,
    board_index: HashMap<String, usize>,
    pinout_index: HashMap<String, usize>,
    schematic_index: HashMap<String, usize>,
}

fn build_index<T, F>(items: &[T], key: F) -> HashMap<String, usize>
where
    F: Fn(&T) -> &str,
{
    let mut index = HashMap::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        index.entry(key(item).to_string()).or_insert(i);
    }
    index
}

impl Catalog {
    pub fn new(parts: CatalogParts) -> Self {
        let variant_index = build_index(&parts.variants, |v| v.id.as_str());
        let circuit_index = build_index(&parts.circuits, |c| c.id.as_str());
        let board_index = build_index(&parts.boards, |b| b.id.as_str());
        let pinout_index = build_index(&parts.board_pinouts, |p| p.board_id.as_str());
        let schematic_index = build_index(&parts.schematics, |s| s.circuit_id.as_str());

        Self {
            variants: parts.variants,
            circuits: parts.circuits,
            boards: parts.boards,
            board_pinouts: parts.board_pinouts,
            schematics: parts.schematics,
            variant_index,
            circuit_index,
            board_index,
            pinout_index,
            schematic_index,
        }
    }

    /// Build a catalog from the embedded tables only.
    pub fn builtin() -> Self {
        let (parts, errors) = builtin::embedded_parts();
        for error in errors {
            tracing::warn!("Embedded catalog error: {}", error);
        }
        let catalog = Self::new(parts);
        catalog.log_counts();
        catalog
    }

    /// Build a catalog from the embedded tables, overlaid by the JSON tables
    /// in `data_dir` when given. Returns entry-level load errors alongside.
    pub fn load(data_dir: Option<&Path>) -> Result<(Self, Vec<String>), Esp32RefError> {
        let (mut parts, mut errors) = builtin::embedded_parts();

        if let Some(dir) = data_dir {
            let (user_parts, user_errors) = builtin::load_parts_from_directory(dir)?;
            errors.extend(user_errors);
            parts = parts.overlay(user_parts);
        }

        let catalog = Self::new(parts);
        catalog.log_counts();
        Ok((catalog, errors))
    }

    fn log_counts(&self) {
        tracing::info!(
            "Catalog ready: {} variants, {} circuits, {} boards, {} board pinouts, {} schematics",
            self.variants.len(),
            self.circuits.len(),
            self.boards.len(),
            self.board_pinouts.len(),
            self.schematics.len()
        );
    }

    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    pub fn circuits(&self) -> &[Circuit] {
        &self.circuits
    }

    pub fn boards(&self) -> &[Board] {
        &self.boards
    }

    pub fn board_pinouts(&self) -> &[BoardPinout] {
        &self.board_pinouts
    }

    pub fn schematics(&self) -> &[CircuitSchematic] {
        &self.schematics
    }

    pub fn variant(&self, id: &str) -> Option<&Variant> {
        self.variant_index.get(id).map(|&i| &self.variants[i])
    }

    pub fn circuit(&self, id: &str) -> Option<&Circuit> {
        self.circuit_index.get(id).map(|&i| &self.circuits[i])
    }

    pub fn board(&self, id: &str) -> Option<&Board> {
        self.board_index.get(id).map(|&i| &self.boards[i])
    }

    pub fn board_pinout(&self, board_id: &str) -> Option<&BoardPinout> {
        self.pinout_index.get(board_id).map(|&i| &self.board_pinouts[i])
    }

    pub fn has_board_pinout(&self, board_id: &str) -> bool {
        self.pinout_index.contains_key(board_id)
    }

    pub fn circuit_schematic(&self, circuit_id: &str) -> Option<&CircuitSchematic> {
        self.schematic_index
            .get(circuit_id)
            .map(|&i| &self.schematics[i])
    }

    /// Chip pin map of a variant; empty for an unknown id.
    pub fn variant_pins(&self, variant_id: &str) -> &[Pin] {
        self.variant(variant_id)
            .map(|v| v.pins.as_slice())
            .unwrap_or(&[])
    }

    /// The variant a board is built around, if its foreign key resolves.
    pub fn board_variant(&self, board: &Board) -> Option<&Variant> {
        self.variant(&board.variant)
    }

    pub fn boards_for_variant(&self, variant_id: &str) -> Vec<&Board> {
        self.boards
            .iter()
            .filter(|b| b.variant == variant_id)
            .collect()
    }

    /// Distinct manufacturers in catalog order, for the boards facet.
    pub fn manufacturers(&self) -> Vec<&str> {
        distinct(self.boards.iter().map(|b| b.manufacturer.as_str()))
    }

    /// Distinct circuit categories in catalog order, for the circuits facet.
    pub fn circuit_categories(&self) -> Vec<&str> {
        distinct(self.circuits.iter().map(|c| c.category.as_str()))
    }

    /// Check ids, foreign keys and pin rows for consistency.
    pub fn validate(&self) -> Vec<CatalogIssue> {
        validate::validate(self)
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = Vec::new();
    for value in values {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}

/// Process-wide built-in catalog, built on first use.
pub fn builtin_catalog() -> &'static Catalog {
    static CATALOG: OnceLock<Catalog> = OnceLock::new();
    CATALOG.get_or_init(Catalog::builtin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_lookup() {
        let catalog = Catalog::builtin();
        assert!(catalog.variant("esp32-c3").is_some());
        assert!(catalog.variant("ESP32-C3").is_none());
        assert!(catalog.variant("esp8266").is_none());
        assert!(catalog.variant("").is_none());
    }

    #[test]
    fn test_board_lookup_not_found() {
        let catalog = Catalog::builtin();
        assert!(catalog.board("nonexistent-id").is_none());
        assert!(catalog.board("esp32-cam").is_some());
    }

    #[test]
    fn test_board_pinout_lookup() {
        let catalog = Catalog::builtin();
        assert!(catalog.has_board_pinout("xiao-esp32c3"));
        assert!(!catalog.has_board_pinout("esp32-c3-supermini"));
        assert!(catalog.board_pinout("nonexistent-id").is_none());

        let pinout = catalog.board_pinout("esp32-cam").unwrap();
        assert!(pinout.pins.iter().any(|p| p.name == "GPIO0"));
    }

    #[test]
    fn test_circuit_schematic_lookup() {
        let catalog = Catalog::builtin();
        let schematic = catalog.circuit_schematic("output-led-basic").unwrap();
        assert!(schematic.parts.iter().any(|p| p.kind == "led"));
        assert!(catalog.circuit_schematic("motor-servo").is_none());
    }

    #[test]
    fn test_variant_pins_unknown_is_empty() {
        let catalog = Catalog::builtin();
        assert!(catalog.variant_pins("nope").is_empty());
        assert!(!catalog.variant_pins("esp32").is_empty());
    }

    #[test]
    fn test_boards_for_variant() {
        let catalog = Catalog::builtin();
        let c3_boards = catalog.boards_for_variant("esp32-c3");
        assert!(c3_boards.len() >= 3);
        assert!(c3_boards.iter().all(|b| b.variant == "esp32-c3"));

        let board = catalog.board("xiao-esp32c3").unwrap();
        assert_eq!(catalog.board_variant(board).unwrap().name, "ESP32-C3");
    }

    #[test]
    fn test_facet_values_distinct_in_order() {
        let catalog = Catalog::builtin();
        let manufacturers = catalog.manufacturers();
        assert_eq!(manufacturers[0], "Espressif");
        let espressif = manufacturers.iter().filter(|m| **m == "Espressif").count();
        assert_eq!(espressif, 1);

        let categories = catalog.circuit_categories();
        assert_eq!(categories[0], "Power");
        assert!(categories.contains(&"Output"));
    }

    #[test]
    fn test_duplicate_id_resolves_to_first() {
        let (mut parts, _) = builtin::embedded_parts();
        let mut dup = parts.boards[0].clone();
        dup.name = "Second".to_string();
        let first_name = parts.boards[0].name.clone();
        parts.boards.push(dup);

        let catalog = Catalog::new(parts);
        let id = catalog.boards()[0].id.clone();
        assert_eq!(catalog.board(&id).unwrap().name, first_name);
    }

    #[test]
    fn test_load_with_overlay() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(builtin::BOARDS_FILE),
            r#"[{ "id": "esp32-cam", "name": "ESP32-CAM (patched)", "manufacturer": "AI-Thinker", "variant": "esp32" }]"#,
        )
        .unwrap();

        let (catalog, errors) = Catalog::load(Some(dir.path())).unwrap();
        assert!(errors.is_empty());
        assert_eq!(catalog.board("esp32-cam").unwrap().name, "ESP32-CAM (patched)");
        assert!(!catalog.board("esp32-cam").unwrap().has_camera());
        assert_eq!(catalog.variants().len(), 6);
    }

    #[test]
    fn test_shared_builtin_catalog() {
        let a = builtin_catalog();
        let b = builtin_catalog();
        assert!(std::ptr::eq(a, b));
        assert!(!a.variants().is_empty());
    }
}
