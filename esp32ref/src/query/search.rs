//! Global cross-entity search.
//!
//! Scans variants, then every variant's pin map, then circuits, then boards,
//! keeping catalog order within each table. A candidate matches when any of
//! its searchable fields contains the query, compared case-insensitively on
//! both sides. Absent optional fields contribute nothing.

use serde::Serialize;

use crate::catalog::schema::{Board, Circuit, EntityKind, Pin, Variant};
use crate::catalog::Catalog;
use crate::core::QueryOptions;
use crate::routes::Route;

/// `needle` must already be lower-cased.
pub(crate) fn contains_folded(field: Option<&str>, needle: &str) -> bool {
    field
        .map(|value| value.to_lowercase().contains(needle))
        .unwrap_or(false)
}

pub(crate) fn any_contains(fields: &[String], needle: &str) -> bool {
    fields.iter().any(|f| contains_folded(Some(f), needle))
}

/// Fields shared by every kind of search hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultHeader {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    /// Site-relative path of the destination page
    pub path: String,
}

/// A pin hit also carries the pin and its owning variant so the pinout page
/// can pre-select it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PinMatch {
    #[serde(flatten)]
    pub header: ResultHeader,
    pub variant_id: String,
    pub pin: Pin,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SearchResult {
    Variant(ResultHeader),
    Pin(PinMatch),
    Circuit(ResultHeader),
    Board(ResultHeader),
}

impl SearchResult {
    pub fn header(&self) -> &ResultHeader {
        match self {
            SearchResult::Variant(header)
            | SearchResult::Circuit(header)
            | SearchResult::Board(header) => header,
            SearchResult::Pin(pin) => &pin.header,
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            SearchResult::Variant(_) => EntityKind::Variant,
            SearchResult::Pin(_) => EntityKind::Pin,
            SearchResult::Circuit(_) => EntityKind::Circuit,
            SearchResult::Board(_) => EntityKind::Board,
        }
    }

    pub fn id(&self) -> &str {
        &self.header().id
    }

    pub fn title(&self) -> &str {
        &self.header().title
    }

    pub fn subtitle(&self) -> &str {
        &self.header().subtitle
    }

    pub fn path(&self) -> &str {
        &self.header().path
    }
}

fn variant_matches(variant: &Variant, needle: &str) -> bool {
    contains_folded(Some(&variant.name), needle)
        || contains_folded(variant.full_name.as_deref(), needle)
        || contains_folded(variant.tagline.as_deref(), needle)
        || any_contains(&variant.best_for, needle)
}

fn pin_matches(pin: &Pin, needle: &str) -> bool {
    contains_folded(Some(&pin.name), needle)
        || contains_folded(pin.description.as_deref(), needle)
        || any_contains(&pin.functions, needle)
}

fn circuit_matches(circuit: &Circuit, needle: &str) -> bool {
    contains_folded(Some(&circuit.title), needle)
        || contains_folded(circuit.description.as_deref(), needle)
        || contains_folded(Some(&circuit.category), needle)
        || any_contains(&circuit.tags, needle)
}

fn board_matches(board: &Board, needle: &str) -> bool {
    contains_folded(Some(&board.name), needle)
        || contains_folded(board.description.as_deref(), needle)
        || contains_folded(Some(&board.variant), needle)
        || contains_folded(Some(&board.manufacturer), needle)
}

fn variant_result(variant: &Variant) -> SearchResult {
    let subtitle = variant
        .full_name
        .as_deref()
        .or(variant.tagline.as_deref())
        .unwrap_or_default()
        .to_string();

    SearchResult::Variant(ResultHeader {
        id: variant.id.clone(),
        title: variant.name.clone(),
        subtitle,
        path: Route::compare(&variant.id).to_string(),
    })
}

fn pin_result(variant: &Variant, pin: &Pin) -> SearchResult {
    let subtitle = match pin.description.as_deref() {
        Some(description) => format!("{} - {}", pin.name, description),
        None => pin.name.clone(),
    };

    SearchResult::Pin(PinMatch {
        header: ResultHeader {
            id: format!("{}-pin-{}-{}", variant.id, pin.side, pin.position),
            title: format!("{} ({})", pin.name, variant.name),
            subtitle,
            path: Route::pinout(&variant.id).to_string(),
        },
        variant_id: variant.id.clone(),
        pin: pin.clone(),
    })
}

fn circuit_result(circuit: &Circuit) -> SearchResult {
    SearchResult::Circuit(ResultHeader {
        id: circuit.id.clone(),
        title: circuit.title.clone(),
        subtitle: format!("{} · {}", circuit.category, circuit.difficulty),
        path: Route::circuits(&circuit.id).to_string(),
    })
}

fn board_result(catalog: &Catalog, board: &Board) -> SearchResult {
    let variant_name = catalog
        .board_variant(board)
        .map(|v| v.name.as_str())
        .unwrap_or(board.variant.as_str());

    SearchResult::Board(ResultHeader {
        id: board.id.clone(),
        title: board.name.clone(),
        subtitle: format!("{} · {}", board.manufacturer, variant_name),
        path: Route::boards(&board.id).to_string(),
    })
}

/// Trimmed, case-folded form of a query. Both the length gate and the
/// matchers see this form.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Search every table for `query`.
///
/// Returns an empty list when the normalized query is shorter than
/// `options.min_query_len`. At most `options.result_cap` results are
/// returned; once the cap is reached later matches are dropped.
pub fn search_all(catalog: &Catalog, query: &str, options: &QueryOptions) -> Vec<SearchResult> {
    let needle = normalize_query(query);
    if needle.chars().count() < options.min_query_len {
        return Vec::new();
    }
    let needle = needle.as_str();
    let per_type = options.cap_policy.per_type_limit();

    let variants = catalog
        .variants()
        .iter()
        .filter(|v| variant_matches(v, needle))
        .take(per_type)
        .map(variant_result);

    let pins = catalog
        .variants()
        .iter()
        .flat_map(|v| v.pins.iter().map(move |p| (v, p)))
        .filter(|(_, p)| pin_matches(p, needle))
        .take(per_type)
        .map(|(v, p)| pin_result(v, p));

    let circuits = catalog
        .circuits()
        .iter()
        .filter(|c| circuit_matches(c, needle))
        .take(per_type)
        .map(circuit_result);

    let boards = catalog
        .boards()
        .iter()
        .filter(|b| board_matches(b, needle))
        .take(per_type)
        .map(|b| board_result(catalog, b));

    let results: Vec<SearchResult> = variants
        .chain(pins)
        .chain(circuits)
        .chain(boards)
        .take(options.result_cap)
        .collect();

    tracing::debug!("Search '{}' matched {} results", needle, results.len());
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::builtin::embedded_parts;
    use crate::core::CapPolicy;

    fn search(query: &str) -> Vec<SearchResult> {
        search_all(&Catalog::builtin(), query, &QueryOptions::default())
    }

    #[test]
    fn test_variant_by_name() {
        let results = search("ESP32-S3");
        let variant = results
            .iter()
            .find(|r| r.kind() == EntityKind::Variant)
            .expect("variant result");
        assert_eq!(variant.id(), "esp32-s3");
        assert!(variant.title().contains("ESP32-S3"));
        assert_eq!(variant.path(), "/compare?highlight=esp32-s3");
    }

    #[test]
    fn test_pin_by_lowercase_name() {
        let results = search("gpio21");
        let pins: Vec<&SearchResult> = results
            .iter()
            .filter(|r| r.kind() == EntityKind::Pin)
            .collect();

        assert!(!pins.is_empty());
        assert!(pins
            .iter()
            .any(|r| r.subtitle().to_lowercase().contains("gpio21")));

        match pins[0] {
            SearchResult::Pin(hit) => {
                assert_eq!(hit.variant_id, "esp32");
                assert_eq!(hit.pin.gpio, Some(21));
                assert_eq!(hit.header.path, "/pinouts/esp32");
            }
            other => panic!("expected pin, got {:?}", other),
        }
    }

    #[test]
    fn test_min_query_length() {
        assert!(search("").is_empty());
        assert!(search("e").is_empty());
        assert!(search("  e  ").is_empty());
        assert!(search("\t").is_empty());
        assert!(!search("es").is_empty());
    }

    #[test]
    fn test_result_cap() {
        // "gpio" matches far more than 20 pins.
        let results = search("gpio");
        assert_eq!(results.len(), 20);

        let results = search("esp32");
        assert!(results.len() <= 20);
    }

    #[test]
    fn test_scan_order() {
        let results = search("usb");
        let order: Vec<EntityKind> = results.iter().map(|r| r.kind()).collect();
        let mut sorted = order.clone();
        sorted.sort_by_key(|k| match k {
            EntityKind::Variant => 0,
            EntityKind::Pin => 1,
            EntityKind::Circuit => 2,
            _ => 3,
        });
        assert_eq!(order, sorted);
    }

    #[test]
    fn test_cap_crowds_out_later_types() {
        // Under the global cap, pin matches for "gpio" exhaust the budget.
        let results = search("gpio");
        assert!(results.iter().all(|r| r.kind() != EntityKind::Circuit));
        assert!(results.iter().filter(|r| r.kind() == EntityKind::Pin).count() >= 19);

        let options = QueryOptions {
            cap_policy: CapPolicy::PerType { limit: 5 },
            ..QueryOptions::default()
        };
        let results = search_all(&Catalog::builtin(), "gpio", &options);
        assert!(results.iter().filter(|r| r.kind() == EntityKind::Pin).count() <= 5);
        assert!(results.iter().any(|r| r.kind() == EntityKind::Circuit));
    }

    #[test]
    fn test_tags_fold_case() {
        let results = search("neopixel");
        assert!(results.iter().any(|r| r.id() == "output-ws2812"));
    }

    #[test]
    fn test_board_by_variant_id_and_manufacturer() {
        let results = search("seeed");
        let boards: Vec<&str> = results
            .iter()
            .filter(|r| r.kind() == EntityKind::Board)
            .map(|r| r.id())
            .collect();
        assert_eq!(boards, vec!["xiao-esp32s3-sense", "xiao-esp32c3"]);

        let results = search("esp32-h2");
        let board = results
            .iter()
            .find(|r| r.id() == "esp32-h2-devkitm-1")
            .unwrap();
        assert_eq!(board.subtitle(), "Espressif · ESP32-H2");
        assert_eq!(board.path(), "/boards?highlight=esp32-h2-devkitm-1");
    }

    #[test]
    fn test_circuit_by_category() {
        let results = search("motors");
        let circuits: Vec<&str> = results.iter().map(|r| r.id()).collect();
        assert_eq!(circuits, vec!["motor-servo", "motor-dc-drv8833"]);
        assert_eq!(results[0].subtitle(), "Motors · intermediate");
    }

    #[test]
    fn test_sparse_entries_never_fail() {
        let (mut parts, _) = embedded_parts();
        for variant in &mut parts.variants {
            variant.full_name = None;
            variant.tagline = None;
            variant.best_for.clear();
            for pin in &mut variant.pins {
                pin.description = None;
                pin.functions.clear();
            }
        }
        for board in &mut parts.boards {
            board.description = None;
            board.features = None;
        }
        let catalog = Catalog::new(parts);

        let results = search_all(&catalog, "sda", &QueryOptions::default());
        assert!(results.is_empty());

        let results = search_all(&catalog, "gpio21", &QueryOptions::default());
        assert!(results
            .iter()
            .all(|r| r.subtitle() == "GPIO21" || r.kind() != EntityKind::Pin));
    }

    #[test]
    fn test_no_results() {
        assert!(search("zz-no-such-thing").is_empty());
    }

    #[test]
    fn test_serialized_shape() {
        let results = search("basic led");
        let json = serde_json::to_value(&results[0]).unwrap();
        assert_eq!(json["type"], "circuit");
        assert_eq!(json["id"], "output-led-basic");
        assert_eq!(json["path"], "/circuits?highlight=output-led-basic");

        let results = search("gpio21");
        let json = serde_json::to_value(&results[0]).unwrap();
        assert_eq!(json["type"], "pin");
        assert_eq!(json["variant_id"], "esp32");
        assert_eq!(json["pin"]["name"], "GPIO21");
    }
}
