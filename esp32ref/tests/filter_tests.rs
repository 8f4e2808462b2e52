//! Integration tests for circuit, board and pin filters

use std::collections::HashSet;

use esp32ref::prelude::*;
use esp32ref::{filter_boards, filter_circuits, filter_pins_by_category};

fn circuit_ids(circuits: &[&Circuit]) -> Vec<String> {
    circuits.iter().map(|c| c.id.clone()).collect()
}

#[test]
fn test_power_beginner_scenario() {
    let catalog = Catalog::builtin();
    let filter = CircuitFilter {
        category: "Power".parse().unwrap(),
        difficulty: "beginner".parse().unwrap(),
        text: String::new(),
    };

    let result = filter_circuits(&catalog, &filter);
    assert!(!result.is_empty());
    for circuit in &result {
        assert_eq!(circuit.category, "Power");
        assert_eq!(circuit.difficulty, Difficulty::Beginner);
    }

    let titles: Vec<&str> = result.iter().map(|c| c.title.as_str()).collect();
    assert!(titles.contains(&"3.3V Power Supply (AMS1117)"));
    assert!(!result.iter().any(|c| c.id == "power-tp4056-battery"));
}

#[test]
fn test_c3_camera_boards_scenario() {
    let catalog = Catalog::builtin();
    let filter = BoardFilter {
        manufacturer: "All".parse().unwrap(),
        variant: "esp32-c3".parse().unwrap(),
        camera_only: true,
        text: String::new(),
    };

    assert!(filter_boards(&catalog, &filter).is_empty());

    // The variant facet alone is not empty; the camera flag empties it.
    let relaxed = BoardFilter {
        camera_only: false,
        ..filter
    };
    assert!(!filter_boards(&catalog, &relaxed).is_empty());
}

#[test]
fn test_circuit_filter_is_conjunction() {
    let catalog = Catalog::builtin();

    let mut categories: Vec<Facet<String>> = vec![Facet::All];
    categories.extend(
        catalog
            .circuit_categories()
            .into_iter()
            .map(|c| Facet::Only(c.to_string())),
    );
    let difficulties = [
        Facet::All,
        Facet::Only(Difficulty::Beginner),
        Facet::Only(Difficulty::Intermediate),
        Facet::Only(Difficulty::Advanced),
    ];
    let texts = ["", "led", "BATTERY", "sensor"];

    for category in &categories {
        for difficulty in &difficulties {
            for text in texts {
                let filter = CircuitFilter {
                    category: category.clone(),
                    difficulty: difficulty.clone(),
                    text: text.to_string(),
                };
                let combined: HashSet<String> =
                    circuit_ids(&filter_circuits(&catalog, &filter)).into_iter().collect();

                let by_category: HashSet<String> = circuit_ids(&filter_circuits(
                    &catalog,
                    &CircuitFilter {
                        category: category.clone(),
                        ..CircuitFilter::default()
                    },
                ))
                .into_iter()
                .collect();
                let by_difficulty: HashSet<String> = circuit_ids(&filter_circuits(
                    &catalog,
                    &CircuitFilter {
                        difficulty: difficulty.clone(),
                        ..CircuitFilter::default()
                    },
                ))
                .into_iter()
                .collect();
                let by_text: HashSet<String> =
                    circuit_ids(&filter_circuits(&catalog, &CircuitFilter::new().text(text)))
                        .into_iter()
                        .collect();

                let expected: HashSet<String> = by_category
                    .iter()
                    .filter(|id| by_difficulty.contains(*id) && by_text.contains(*id))
                    .cloned()
                    .collect();
                assert_eq!(combined, expected, "filter {:?}", filter);

                // Relaxing any single facet never shrinks the result.
                for relaxed in [
                    CircuitFilter {
                        category: Facet::All,
                        ..filter.clone()
                    },
                    CircuitFilter {
                        difficulty: Facet::All,
                        ..filter.clone()
                    },
                    CircuitFilter {
                        text: String::new(),
                        ..filter.clone()
                    },
                ] {
                    let wider: HashSet<String> =
                        circuit_ids(&filter_circuits(&catalog, &relaxed)).into_iter().collect();
                    assert!(combined.is_subset(&wider), "relaxed {:?}", relaxed);
                }
            }
        }
    }
}

#[test]
fn test_board_filter_is_conjunction() {
    let catalog = Catalog::builtin();

    let mut manufacturers: Vec<Facet<String>> = vec![Facet::All];
    manufacturers.extend(
        catalog
            .manufacturers()
            .into_iter()
            .map(|m| Facet::Only(m.to_string())),
    );
    let mut variants: Vec<Facet<String>> = vec![Facet::All];
    variants.extend(catalog.variants().iter().map(|v| Facet::Only(v.id.clone())));

    for manufacturer in &manufacturers {
        for variant in &variants {
            for camera_only in [false, true] {
                let filter = BoardFilter {
                    manufacturer: manufacturer.clone(),
                    variant: variant.clone(),
                    camera_only,
                    text: String::new(),
                };
                let result = filter_boards(&catalog, &filter);

                let expected: Vec<&str> = catalog
                    .boards()
                    .iter()
                    .filter(|b| manufacturer.admits_str(&b.manufacturer))
                    .filter(|b| variant.admits_str(&b.variant))
                    .filter(|b| !camera_only || b.has_camera())
                    .map(|b| b.id.as_str())
                    .collect();
                let actual: Vec<&str> = result.iter().map(|b| b.id.as_str()).collect();
                assert_eq!(actual, expected);
            }
        }
    }
}

#[test]
fn test_board_text_searches_module() {
    let catalog = Catalog::builtin();
    let result = filter_boards(&catalog, &BoardFilter::new().text("wroom-1"));
    let ids: Vec<&str> = result.iter().map(|b| b.id.as_str()).collect();
    assert!(ids.contains(&"esp32-s3-devkitc-1"));
    assert!(ids.contains(&"esp32-c6-devkitc-1"));

    // A board without a module or description still filters by name.
    let result = filter_boards(&catalog, &BoardFilter::new().text("supermini"));
    assert_eq!(result.len(), 1);
}

#[test]
fn test_filters_are_idempotent() {
    let catalog = Catalog::builtin();
    let filter = CircuitFilter::new().text("i2c");
    assert_eq!(
        circuit_ids(&filter_circuits(&catalog, &filter)),
        circuit_ids(&filter_circuits(&catalog, &filter))
    );

    let facet: PinFacet = "strapping".parse().unwrap();
    let pins = catalog.variant_pins("esp32");
    assert_eq!(
        filter_pins_by_category(pins, &facet),
        filter_pins_by_category(pins, &facet)
    );
}

#[test]
fn test_strapping_facet_uses_flag() {
    let catalog = Catalog::builtin();

    for variant in catalog.variants() {
        let strapping = filter_pins_by_category(&variant.pins, &PinFacet::Strapping);
        let expected: Vec<&Pin> = variant.pins.iter().filter(|p| p.strapping == Some(true)).collect();
        assert_eq!(strapping, expected, "variant {}", variant.id);
    }

    let esp32 = filter_pins_by_category(catalog.variant_pins("esp32"), &PinFacet::Strapping);
    let names: Vec<&str> = esp32.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["GPIO12", "GPIO15", "GPIO2", "GPIO0", "GPIO5"]);
}

#[test]
fn test_category_facet() {
    let catalog = Catalog::builtin();
    let facet = PinFacet::Category(PinCategory::I2c);
    let pins = filter_pins_by_category(catalog.variant_pins("esp32-s3"), &facet);
    let names: Vec<&str> = pins.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["GPIO8", "GPIO9"]);

    let all = filter_pins_by_category(catalog.variant_pins("esp32-s3"), &PinFacet::All);
    assert_eq!(all.len(), catalog.variant_pins("esp32-s3").len());

    assert!(filter_pins_by_category(catalog.variant_pins("unknown"), &facet).is_empty());
}
