//! Faceted filters for the circuits, boards and pinout pages.
//!
//! Every filter is a pure conjunction of its facets, evaluated in catalog
//! order. A facet in its `All`/empty state admits everything, so relaxing a
//! facet can only grow the result.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::schema::{Board, Circuit, Difficulty, Pin, PinCategory};
use crate::catalog::Catalog;
use crate::core::Esp32RefError;
use crate::query::search::{any_contains, contains_folded};

/// A single filter dimension: either unconstrained or pinned to one value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facet<T> {
    All,
    Only(T),
}

impl<T> Default for Facet<T> {
    fn default() -> Self {
        Facet::All
    }
}

impl<T: PartialEq> Facet<T> {
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Facet::All => true,
            Facet::Only(expected) => expected == value,
        }
    }
}

impl Facet<String> {
    pub fn admits_str(&self, value: &str) -> bool {
        match self {
            Facet::All => true,
            Facet::Only(expected) => expected == value,
        }
    }
}

impl<T> FromStr for Facet<T>
where
    T: FromStr,
{
    type Err = T::Err;

    /// "All" (any case) and the empty string are the unconstrained sentinel.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(Facet::All);
        }
        s.parse().map(Facet::Only)
    }
}

/// Case-insensitive free-text facet. Empty (after trimming) admits everything.
fn text_needle(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct CircuitFilter {
    pub category: Facet<String>,
    pub difficulty: Facet<Difficulty>,
    pub text: String,
}

impl CircuitFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Facet::Only(category.into());
        self
    }

    pub fn difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Facet::Only(difficulty);
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn matches(&self, circuit: &Circuit) -> bool {
        if !self.category.admits_str(&circuit.category) {
            return false;
        }
        if !self.difficulty.admits(&circuit.difficulty) {
            return false;
        }
        match text_needle(&self.text) {
            None => true,
            Some(needle) => {
                contains_folded(Some(&circuit.title), &needle)
                    || contains_folded(circuit.description.as_deref(), &needle)
                    || any_contains(&circuit.tags, &needle)
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardFilter {
    pub manufacturer: Facet<String>,
    pub variant: Facet<String>,
    pub camera_only: bool,
    pub text: String,
}

impl BoardFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Facet::Only(manufacturer.into());
        self
    }

    pub fn variant(mut self, variant_id: impl Into<String>) -> Self {
        self.variant = Facet::Only(variant_id.into());
        self
    }

    pub fn camera_only(mut self, camera_only: bool) -> Self {
        self.camera_only = camera_only;
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn matches(&self, board: &Board) -> bool {
        if !self.manufacturer.admits_str(&board.manufacturer) {
            return false;
        }
        if !self.variant.admits_str(&board.variant) {
            return false;
        }
        if self.camera_only && !board.has_camera() {
            return false;
        }
        match text_needle(&self.text) {
            None => true,
            Some(needle) => {
                contains_folded(Some(&board.name), &needle)
                    || contains_folded(board.description.as_deref(), &needle)
                    || contains_folded(board.module.as_deref(), &needle)
            }
        }
    }
}

/// Pinout page facet. `Strapping` tests the pin's strapping flag, never its
/// category list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum PinFacet {
    #[default]
    All,
    Strapping,
    Category(PinCategory),
}

impl PinFacet {
    pub fn matches(&self, pin: &Pin) -> bool {
        match self {
            PinFacet::All => true,
            PinFacet::Strapping => pin.is_strapping(),
            PinFacet::Category(category) => pin.has_category(category),
        }
    }
}

impl FromStr for PinFacet {
    type Err = Esp32RefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Esp32RefError::unknown("pin facet", s));
        }
        match s.to_lowercase().as_str() {
            "all" => Ok(PinFacet::All),
            "strapping" => Ok(PinFacet::Strapping),
            other => Ok(PinFacet::Category(PinCategory::from(other))),
        }
    }
}

pub fn filter_circuits<'c>(catalog: &'c Catalog, filter: &CircuitFilter) -> Vec<&'c Circuit> {
    catalog
        .circuits()
        .iter()
        .filter(|c| filter.matches(c))
        .collect()
}

pub fn filter_boards<'c>(catalog: &'c Catalog, filter: &BoardFilter) -> Vec<&'c Board> {
    catalog
        .boards()
        .iter()
        .filter(|b| filter.matches(b))
        .collect()
}

pub fn filter_pins_by_category<'p>(pins: &'p [Pin], facet: &PinFacet) -> Vec<&'p Pin> {
    pins.iter().filter(|p| facet.matches(p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids<T, F: Fn(&T) -> &str>(items: &[&T], id: F) -> Vec<String> {
        items.iter().map(|i| id(i).to_string()).collect()
    }

    #[test]
    fn test_facet_parse() {
        assert_eq!("All".parse::<Facet<String>>().unwrap(), Facet::All);
        assert_eq!("".parse::<Facet<String>>().unwrap(), Facet::All);
        assert_eq!(
            "Power".parse::<Facet<String>>().unwrap(),
            Facet::Only("Power".to_string())
        );
        assert_eq!(
            "advanced".parse::<Facet<Difficulty>>().unwrap(),
            Facet::Only(Difficulty::Advanced)
        );
        assert!("expert".parse::<Facet<Difficulty>>().is_err());
    }

    #[test]
    fn test_power_beginner_circuits() {
        let catalog = Catalog::builtin();
        let filter = CircuitFilter::new()
            .category("Power")
            .difficulty(Difficulty::Beginner);

        let result = filter_circuits(&catalog, &filter);
        assert!(!result.is_empty());
        assert!(result
            .iter()
            .all(|c| c.category == "Power" && c.difficulty == Difficulty::Beginner));
        assert!(result
            .iter()
            .any(|c| c.title == "3.3V Power Supply (AMS1117)"));
        assert!(!result.iter().any(|c| c.id == "power-tp4056-battery"));
    }

    #[test]
    fn test_category_is_exact() {
        let catalog = Catalog::builtin();
        let result = filter_circuits(&catalog, &CircuitFilter::new().category("power"));
        assert!(result.is_empty());
    }

    #[test]
    fn test_circuit_text_matches_tags_case_insensitively() {
        let catalog = Catalog::builtin();
        let result = filter_circuits(&catalog, &CircuitFilter::new().text("neopixel"));
        assert_eq!(ids(&result, |c: &Circuit| c.id.as_str()), vec!["output-ws2812"]);

        let result = filter_circuits(&catalog, &CircuitFilter::new().text("  LDO "));
        assert!(result.iter().any(|c| c.id == "power-ams1117-3v3"));
    }

    #[test]
    fn test_relaxing_a_facet_never_shrinks() {
        let catalog = Catalog::builtin();
        let strict = CircuitFilter::new()
            .category("Output")
            .difficulty(Difficulty::Beginner)
            .text("led");
        let strict_ids = ids(&filter_circuits(&catalog, &strict), |c: &Circuit| c.id.as_str());

        let relaxed = [
            CircuitFilter {
                category: Facet::All,
                ..strict.clone()
            },
            CircuitFilter {
                difficulty: Facet::All,
                ..strict.clone()
            },
            CircuitFilter {
                text: String::new(),
                ..strict.clone()
            },
        ];

        for filter in &relaxed {
            let relaxed_ids = ids(&filter_circuits(&catalog, filter), |c: &Circuit| c.id.as_str());
            for id in &strict_ids {
                assert!(relaxed_ids.contains(id), "{} missing with {:?}", id, filter);
            }
        }
    }

    #[test]
    fn test_filter_is_intersection() {
        let catalog = Catalog::builtin();
        let both = CircuitFilter::new()
            .category("Motors")
            .difficulty(Difficulty::Advanced);
        let by_category = filter_circuits(&catalog, &CircuitFilter::new().category("Motors"));
        let by_difficulty =
            filter_circuits(&catalog, &CircuitFilter::new().difficulty(Difficulty::Advanced));

        let expected: Vec<&str> = by_category
            .iter()
            .filter(|c| by_difficulty.iter().any(|d| d.id == c.id))
            .map(|c| c.id.as_str())
            .collect();
        let actual: Vec<&str> = filter_circuits(&catalog, &both)
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(actual, expected);
        assert_eq!(actual, vec!["motor-dc-drv8833"]);
    }

    #[test]
    fn test_c3_camera_boards_empty() {
        let catalog = Catalog::builtin();
        let filter = BoardFilter::new().variant("esp32-c3").camera_only(true);
        assert!(filter_boards(&catalog, &filter).is_empty());

        let filter = BoardFilter::new().variant("esp32-c3");
        assert!(filter_boards(&catalog, &filter).len() >= 3);
    }

    #[test]
    fn test_camera_boards() {
        let catalog = Catalog::builtin();
        let result = filter_boards(&catalog, &BoardFilter::new().camera_only(true));
        let result_ids = ids(&result, |b: &Board| b.id.as_str());
        assert_eq!(
            result_ids,
            vec!["esp32-cam", "freenove-esp32-s3-cam", "xiao-esp32s3-sense"]
        );
    }

    #[test]
    fn test_board_text_and_manufacturer() {
        let catalog = Catalog::builtin();
        let filter = BoardFilter::new().manufacturer("Seeed Studio").text("thumb");
        let result_ids = ids(&filter_boards(&catalog, &filter), |b: &Board| b.id.as_str());
        assert_eq!(result_ids, vec!["xiao-esp32s3-sense", "xiao-esp32c3"]);

        // Module is searchable; a board without one simply does not match on it.
        let filter = BoardFilter::new().text("wroom-1");
        let result = filter_boards(&catalog, &filter);
        assert!(result.iter().any(|b| b.id == "esp32-s3-devkitc-1"));
        assert!(!result.iter().any(|b| b.id == "esp32-c3-supermini"));
    }

    #[test]
    fn test_pin_facets() {
        let catalog = Catalog::builtin();
        let pins = catalog.variant_pins("esp32");

        assert_eq!(filter_pins_by_category(pins, &PinFacet::All).len(), pins.len());

        let strapping = filter_pins_by_category(pins, &PinFacet::Strapping);
        let names: Vec<&str> = strapping.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["GPIO12", "GPIO15", "GPIO2", "GPIO0", "GPIO5"]);

        let i2c = filter_pins_by_category(pins, &PinFacet::Category(PinCategory::I2c));
        let names: Vec<&str> = i2c.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["GPIO21", "GPIO22"]);
    }

    #[test]
    fn test_strapping_facet_ignores_category_list() {
        let mut pin: Pin = serde_json::from_str(
            r#"{ "position": 1, "side": "left", "name": "GPIO4", "type": "gpio", "categories": ["strapping"] }"#,
        )
        .unwrap();
        assert!(!PinFacet::Strapping.matches(&pin));
        assert!(PinFacet::Category(PinCategory::from("strapping")).matches(&pin));

        pin.categories.clear();
        pin.strapping = Some(true);
        assert!(PinFacet::Strapping.matches(&pin));
    }

    #[test]
    fn test_pin_facet_parse() {
        assert_eq!("ALL".parse::<PinFacet>().unwrap(), PinFacet::All);
        assert_eq!("strapping".parse::<PinFacet>().unwrap(), PinFacet::Strapping);
        assert_eq!(
            "I2C".parse::<PinFacet>().unwrap(),
            PinFacet::Category(PinCategory::I2c)
        );
        assert!("".parse::<PinFacet>().is_err());
    }
}
