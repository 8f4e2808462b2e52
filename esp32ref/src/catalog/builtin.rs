//! Built-in and External Catalog Data
//!
//! This module loads catalog tables from:
//! 1. A user data directory of JSON files (optional, wins on id collisions)
//! 2. Embedded JSON files compiled into the binary (fallback)
//!
//! Each table is a JSON array. Entries are deserialized one at a time so a
//! malformed entry is skipped and reported instead of discarding the table.

use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::Path;

use crate::catalog::schema::*;
use crate::core::Esp32RefError;

const EMBEDDED_VARIANTS: &str = include_str!("../../data/variants.json");
const EMBEDDED_CIRCUITS: &str = include_str!("../../data/circuits.json");
const EMBEDDED_BOARDS: &str = include_str!("../../data/boards.json");
const EMBEDDED_BOARD_PINOUTS: &str = include_str!("../../data/board_pinouts.json");
const EMBEDDED_SCHEMATICS: &str = include_str!("../../data/schematics.json");

pub const VARIANTS_FILE: &str = "variants.json";
pub const CIRCUITS_FILE: &str = "circuits.json";
pub const BOARDS_FILE: &str = "boards.json";
pub const BOARD_PINOUTS_FILE: &str = "board_pinouts.json";
pub const SCHEMATICS_FILE: &str = "schematics.json";

/// Raw catalog tables before indexing.
#[derive(Debug, Clone, Default)]
pub struct CatalogParts {
    pub variants: Vec<Variant>,
    pub circuits: Vec<Circuit>,
    pub boards: Vec<Board>,
    pub board_pinouts: Vec<BoardPinout>,
    pub schematics: Vec<CircuitSchematic>,
}

impl CatalogParts {
    /// Overlay `overrides` onto `self`: entries with a matching id replace
    /// the existing entry in place, new entries are appended.
    pub fn overlay(mut self, overrides: CatalogParts) -> CatalogParts {
        overlay_by_key(&mut self.variants, overrides.variants, |v| v.id.clone());
        overlay_by_key(&mut self.circuits, overrides.circuits, |c| c.id.clone());
        overlay_by_key(&mut self.boards, overrides.boards, |b| b.id.clone());
        overlay_by_key(&mut self.board_pinouts, overrides.board_pinouts, |p| {
            p.board_id.clone()
        });
        overlay_by_key(&mut self.schematics, overrides.schematics, |s| {
            s.circuit_id.clone()
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
            && self.circuits.is_empty()
            && self.boards.is_empty()
            && self.board_pinouts.is_empty()
            && self.schematics.is_empty()
    }
}

fn overlay_by_key<T, F>(base: &mut Vec<T>, overrides: Vec<T>, key: F)
where
    F: Fn(&T) -> String,
{
    // First occurrence wins, matching the catalog's lookup index.
    let mut positions: HashMap<String, usize> = HashMap::new();
    for (i, item) in base.iter().enumerate() {
        positions.entry(key(item)).or_insert(i);
    }

    for item in overrides {
        match positions.get(&key(&item)) {
            Some(&i) => base[i] = item,
            None => base.push(item),
        }
    }
}

/// Parse a JSON array table, skipping entries that fail to deserialize.
/// Returns the parsed entries and a message per skipped entry.
pub fn parse_table<T: DeserializeOwned>(source: &str, table: &str) -> (Vec<T>, Vec<String>) {
    let mut items = Vec::new();
    let mut errors = Vec::new();

    let raw: Vec<serde_json::Value> = match serde_json::from_str(source) {
        Ok(raw) => raw,
        Err(e) => {
            let error_msg = format!("Failed to parse {}: {}", table, e);
            tracing::warn!("{}", error_msg);
            errors.push(error_msg);
            return (items, errors);
        }
    };

    for (index, value) in raw.into_iter().enumerate() {
        let label = value
            .get("id")
            .or_else(|| value.get("board_id"))
            .or_else(|| value.get("circuit_id"))
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .unwrap_or_else(|| format!("#{}", index));

        match serde_json::from_value::<T>(value) {
            Ok(item) => items.push(item),
            Err(e) => {
                let error_msg = format!("Skipped {} entry {}: {}", table, label, e);
                tracing::warn!("{}", error_msg);
                errors.push(error_msg);
            }
        }
    }

    (items, errors)
}

/// Get all catalog tables from the embedded JSON files
pub fn embedded_parts() -> (CatalogParts, Vec<String>) {
    let mut errors = Vec::new();

    let (variants, e) = parse_table(EMBEDDED_VARIANTS, VARIANTS_FILE);
    errors.extend(e);
    let (circuits, e) = parse_table(EMBEDDED_CIRCUITS, CIRCUITS_FILE);
    errors.extend(e);
    let (boards, e) = parse_table(EMBEDDED_BOARDS, BOARDS_FILE);
    errors.extend(e);
    let (board_pinouts, e) = parse_table(EMBEDDED_BOARD_PINOUTS, BOARD_PINOUTS_FILE);
    errors.extend(e);
    let (schematics, e) = parse_table(EMBEDDED_SCHEMATICS, SCHEMATICS_FILE);
    errors.extend(e);

    (
        CatalogParts {
            variants,
            circuits,
            boards,
            board_pinouts,
            schematics,
        },
        errors,
    )
}

/// Load catalog tables from a directory of JSON files.
///
/// Only the well-known table files are read; a missing file yields an empty
/// table. Returns both the loaded tables and any entry-level errors.
pub fn load_parts_from_directory(dir: &Path) -> Result<(CatalogParts, Vec<String>), Esp32RefError> {
    if !dir.is_dir() {
        return Err(Esp32RefError::InvalidDirectory(
            dir.to_string_lossy().to_string(),
        ));
    }

    let mut errors = Vec::new();
    let mut parts = CatalogParts::default();

    if let Some(source) = read_table(dir, VARIANTS_FILE)? {
        let (items, e) = parse_table(&source, VARIANTS_FILE);
        parts.variants = items;
        errors.extend(e);
    }
    if let Some(source) = read_table(dir, CIRCUITS_FILE)? {
        let (items, e) = parse_table(&source, CIRCUITS_FILE);
        parts.circuits = items;
        errors.extend(e);
    }
    if let Some(source) = read_table(dir, BOARDS_FILE)? {
        let (items, e) = parse_table(&source, BOARDS_FILE);
        parts.boards = items;
        errors.extend(e);
    }
    if let Some(source) = read_table(dir, BOARD_PINOUTS_FILE)? {
        let (items, e) = parse_table(&source, BOARD_PINOUTS_FILE);
        parts.board_pinouts = items;
        errors.extend(e);
    }
    if let Some(source) = read_table(dir, SCHEMATICS_FILE)? {
        let (items, e) = parse_table(&source, SCHEMATICS_FILE);
        parts.schematics = items;
        errors.extend(e);
    }

    tracing::info!(
        "Loaded {} variants, {} circuits, {} boards from {:?}",
        parts.variants.len(),
        parts.circuits.len(),
        parts.boards.len(),
        dir
    );

    Ok((parts, errors))
}

fn read_table(dir: &Path, file: &str) -> Result<Option<String>, Esp32RefError> {
    let path = dir.join(file);
    if !path.is_file() {
        return Ok(None);
    }
    Ok(Some(std::fs::read_to_string(path)?))
}
