//! Search the built-in catalog and follow the first hit.
//!
//! ```text
//! cargo run --example search_catalog -- gpio21
//! ```

use esp32ref::prelude::*;
use esp32ref::{CircuitsPage, PinoutPage};

fn main() {
    let query = std::env::args().nth(1).unwrap_or_else(|| "led".to_string());

    let catalog = Catalog::builtin();
    let mut engine = QueryEngine::new(&catalog);
    let results = engine.search(&query).to_vec();

    if results.is_empty() {
        println!("No results for '{}'", query);
        return;
    }

    for result in &results {
        println!("{:<40} {}", result.title(), result.path());
    }

    match &results[0] {
        SearchResult::Pin(hit) => {
            if let Some(page) = PinoutPage::from_search(&catalog, hit) {
                if let Some(pin) = page.selected_pin() {
                    println!("\nSelected {} on {}", pin.name, page.variant().name);
                }
            }
        }
        SearchResult::Circuit(header) => {
            let route: Route = match header.path.parse() {
                Ok(route) => route,
                Err(e) => {
                    eprintln!("{}", e);
                    return;
                }
            };
            let query = format!("highlight={}", route.highlight().unwrap_or_default());
            let page = CircuitsPage::mount(&catalog, &query);
            if let Some(circuit) = page.expanded() {
                println!("\nExpanded {} ({} components)", circuit.title, circuit.components.len());
            }
        }
        other => println!("\nOpen {}", other.path()),
    }
}
