//! esp32ref CLI - look up ESP32 variants, pinouts, circuits and boards from the command line.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use esp32ref::catalog::schema::{Board, Circuit, Pin, PinCategory, Variant};
use esp32ref::routes::split_location;
use esp32ref::{
    BoardDetail, BoardFilter, BoardsPage, Catalog, CatalogIssue, CircuitFilter, CircuitsPage,
    Facet, IssueSeverity, PinFacet, QueryEngine, QueryOptions, Route, SearchResult,
};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "esp32ref")]
#[command(about = "ESP32 variant, pinout, circuit and board reference", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human", global = true)]
    format: OutputFormat,

    /// Query options file (JSON)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Directory of catalog JSON files overriding the built-in data
    #[arg(long, value_name = "DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Search variants, pins, circuits and boards
    Search {
        #[arg(value_name = "QUERY")]
        query: String,
    },

    /// List chip variants
    Variants,

    /// Show one variant
    Variant {
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Show the pin map of a variant (or of a board with --board)
    Pins {
        /// Variant id, or board id with --board
        #[arg(value_name = "ID")]
        id: String,

        /// Treat ID as a board id and show its header pinout
        #[arg(long)]
        board: bool,

        /// Pin facet: all, strapping, or a category such as adc, i2c, touch
        #[arg(short, long, default_value = "all")]
        category: String,
    },

    /// List circuits, optionally filtered
    Circuits {
        /// Category, matched exactly ("Power", "Output")
        #[arg(long, default_value = "all")]
        category: String,

        /// beginner, intermediate or advanced
        #[arg(long, default_value = "all")]
        difficulty: String,

        /// Free text matched against title, description and tags
        #[arg(long, default_value = "")]
        text: String,
    },

    /// Show one circuit
    Circuit {
        #[arg(value_name = "ID")]
        id: String,
    },

    /// List boards, optionally filtered
    Boards {
        #[arg(long, default_value = "all")]
        manufacturer: String,

        /// Variant id ("esp32-c3")
        #[arg(long, default_value = "all")]
        variant: String,

        /// Only boards with a camera
        #[arg(long)]
        camera: bool,

        /// Free text matched against name, description and module
        #[arg(long, default_value = "")]
        text: String,
    },

    /// Show one board
    Board {
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Resolve a site path such as /circuits?highlight=output-led-basic
    Open {
        #[arg(value_name = "URL-PATH")]
        path: String,
    },

    /// Check catalog integrity
    Check {
        /// Exit with error code if issues found at this severity or higher
        #[arg(long, value_enum)]
        fail_on: Option<FailOnSeverity>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum FailOnSeverity {
    Error,
    Warning,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    };

    process::exit(exit_code);
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<i32> {
    let options = match &cli.config {
        Some(path) => QueryOptions::from_file(path)
            .with_context(|| format!("Failed to load options from {}", path.display()))?,
        None => QueryOptions::default(),
    };

    let (catalog, load_errors) = Catalog::load(cli.data_dir.as_deref()).with_context(|| {
        match &cli.data_dir {
            Some(dir) => format!("Failed to load catalog from {}", dir.display()),
            None => "Failed to load built-in catalog".to_string(),
        }
    })?;

    let format = cli.format;
    let code = match cli.command {
        Commands::Search { query } => handle_search(&catalog, options, &query, format)?,
        Commands::Variants => {
            output_variants(catalog.variants().iter().collect(), None, format)?;
            0
        }
        Commands::Variant { id } => handle_variant(&catalog, &id, format)?,
        Commands::Pins {
            id,
            board,
            category,
        } => handle_pins(&catalog, &id, board, &category, format)?,
        Commands::Circuits {
            category,
            difficulty,
            text,
        } => {
            let filter = CircuitFilter {
                category: parse_facet(&category)?,
                difficulty: parse_facet(&difficulty)?,
                text,
            };
            let mut engine = QueryEngine::with_options(&catalog, options);
            output_circuits(engine.circuits(&filter), None, format)?;
            0
        }
        Commands::Circuit { id } => handle_circuit(&catalog, &id, format)?,
        Commands::Boards {
            manufacturer,
            variant,
            camera,
            text,
        } => {
            let filter = BoardFilter {
                manufacturer: parse_facet(&manufacturer)?,
                variant: parse_facet(&variant)?,
                camera_only: camera,
                text,
            };
            let mut engine = QueryEngine::with_options(&catalog, options);
            output_boards(&catalog, engine.boards(&filter), None, format)?;
            0
        }
        Commands::Board { id } => handle_board(&catalog, &id, format)?,
        Commands::Open { path } => handle_open(&catalog, &path, format)?,
        Commands::Check { fail_on } => handle_check(&catalog, &load_errors, fail_on, format)?,
    };

    Ok(code)
}

fn parse_facet<T>(value: &str) -> Result<Facet<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse()
        .with_context(|| format!("Invalid filter value '{}'", value))
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn not_found(kind: &str, id: &str, listing: Route) -> i32 {
    eprintln!("{} '{}' not found. See {}", kind, id, listing);
    1
}

fn handle_search(
    catalog: &Catalog,
    options: QueryOptions,
    query: &str,
    format: OutputFormat,
) -> Result<i32> {
    let mut engine = QueryEngine::with_options(catalog, options);
    let results = engine.search(query);

    match format {
        OutputFormat::Json => print_json(results)?,
        OutputFormat::Human => {
            if results.is_empty() {
                println!("No results");
                return Ok(0);
            }
            for result in results {
                let kind = match result {
                    SearchResult::Variant(_) => "variant",
                    SearchResult::Pin(_) => "pin",
                    SearchResult::Circuit(_) => "circuit",
                    SearchResult::Board(_) => "board",
                };
                println!("  {:<8} {}", kind, result.title());
                if !result.subtitle().is_empty() {
                    println!("           {}", result.subtitle());
                }
                println!("           {}", result.path());
            }
        }
    }
    Ok(0)
}

fn output_variants(
    variants: Vec<&Variant>,
    highlight: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(&variants),
        OutputFormat::Human => {
            for variant in variants {
                let marker = if highlight == Some(variant.id.as_str()) {
                    ">"
                } else {
                    " "
                };
                println!(
                    "{} {:<10} {:<10} {}",
                    marker,
                    variant.id,
                    variant.name,
                    variant.tagline.as_deref().unwrap_or("")
                );
            }
            Ok(())
        }
    }
}

fn handle_variant(catalog: &Catalog, id: &str, format: OutputFormat) -> Result<i32> {
    let Some(variant) = catalog.variant(id) else {
        return Ok(not_found("Variant", id, Route::Pinouts));
    };

    if let OutputFormat::Json = format {
        print_json(variant)?;
        return Ok(0);
    }

    println!("\n{}", variant.full_name.as_deref().unwrap_or(&variant.name));
    println!("{}", "─".repeat(60));
    if let Some(tagline) = &variant.tagline {
        println!("  {}", tagline);
    }
    if let Some(cpu) = &variant.cpu {
        println!(
            "  CPU:      {} x{} @ {}",
            cpu.architecture.as_deref().unwrap_or("?"),
            cpu.cores.map(|c| c.to_string()).unwrap_or_else(|| "?".into()),
            cpu.clock_speed.as_deref().unwrap_or("?")
        );
    }
    if let Some(memory) = &variant.memory {
        println!(
            "  Memory:   SRAM {}, flash {}, PSRAM {}",
            memory.sram.as_deref().unwrap_or("-"),
            memory.flash.as_deref().unwrap_or("-"),
            memory.psram.as_deref().unwrap_or("-")
        );
    }
    if let Some(wireless) = &variant.wireless {
        let mut radios = Vec::new();
        if let Some(wifi) = &wireless.wifi {
            radios.push(format!("Wi-Fi {}", wifi));
        }
        if wireless.wifi6 == Some(true) {
            radios.push("Wi-Fi 6".to_string());
        }
        if let Some(ble) = &wireless.ble {
            radios.push(format!("BLE {}", ble));
        }
        if wireless.thread == Some(true) {
            radios.push("Thread".to_string());
        }
        if wireless.zigbee == Some(true) {
            radios.push("Zigbee".to_string());
        }
        if !radios.is_empty() {
            println!("  Wireless: {}", radios.join(", "));
        }
    }
    if !variant.best_for.is_empty() {
        println!("  Best for: {}", variant.best_for.join(", "));
    }
    println!("  Pins:     {} ({})", variant.pins.len(), Route::pinout(&variant.id));

    let boards = catalog.boards_for_variant(&variant.id);
    if !boards.is_empty() {
        println!("\n  Boards:");
        for board in boards {
            println!("    - {} ({})", board.name, board.id);
        }
    }
    Ok(0)
}

fn handle_pins(
    catalog: &Catalog,
    id: &str,
    board: bool,
    category: &str,
    format: OutputFormat,
) -> Result<i32> {
    let facet: PinFacet = category
        .parse()
        .with_context(|| format!("Invalid pin category '{}'", category))?;

    let pins: &[Pin] = if board {
        if catalog.board(id).is_none() {
            return Ok(not_found("Board", id, Route::Boards { highlight: None }));
        }
        match catalog.board_pinout(id) {
            Some(pinout) => &pinout.pins,
            None => {
                eprintln!("No pinout diagram for board '{}'. See {}", id, Route::board(id));
                return Ok(1);
            }
        }
    } else {
        match catalog.variant(id) {
            Some(variant) => &variant.pins,
            None => return Ok(not_found("Variant", id, Route::Pinouts)),
        }
    };

    let engine = QueryEngine::new(catalog);
    let visible = engine.pins(pins, &facet);
    output_pins(&visible, format)?;
    Ok(0)
}

fn output_pins(pins: &[&Pin], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(pins),
        OutputFormat::Human => {
            if pins.is_empty() {
                println!("No results");
                return Ok(());
            }
            for pin in pins {
                let mut flags = Vec::new();
                if pin.is_strapping() {
                    flags.push("strapping");
                }
                if pin.is_input_only() {
                    flags.push("input-only");
                }
                if pin.is_reserved() {
                    flags.push("reserved");
                }
                println!(
                    "  {:>6} {:>3}  {:<8} {:<8} {}",
                    pin.side.to_string(),
                    pin.position,
                    pin.name,
                    pin.pin_type.to_string(),
                    flags.join(",")
                );
                if let Some(warning) = &pin.warning {
                    println!("                  ! {}", warning);
                }
            }
            Ok(())
        }
    }
}

fn output_circuits(
    circuits: &[&Circuit],
    expanded: Option<&Circuit>,
    format: OutputFormat,
) -> Result<()> {
    if let OutputFormat::Json = format {
        return print_json(circuits);
    }

    if circuits.is_empty() {
        println!("No results");
        return Ok(());
    }
    for circuit in circuits {
        println!(
            "  {:<24} {:<14} {:<13} {}",
            circuit.id,
            circuit.category,
            circuit.difficulty.to_string(),
            circuit.title
        );
        if expanded.is_some_and(|e| e.id == circuit.id) {
            print_circuit_body(circuit);
        }
    }
    Ok(())
}

fn print_circuit_body(circuit: &Circuit) {
    if let Some(description) = &circuit.description {
        println!("      {}", description);
    }
    if !circuit.components.is_empty() {
        println!("      Components:");
        for component in &circuit.components {
            let quantity = component.quantity.unwrap_or(1);
            match &component.value {
                Some(value) => println!("        {} x {} ({})", quantity, component.name, value),
                None => println!("        {} x {}", quantity, component.name),
            }
        }
    }
    if !circuit.connections.is_empty() {
        println!("      Connections:");
        for connection in &circuit.connections {
            println!("        {} -> {}", connection.from, connection.to);
        }
    }
    for warning in &circuit.warnings {
        println!("      ! {}", warning);
    }
}

fn handle_circuit(catalog: &Catalog, id: &str, format: OutputFormat) -> Result<i32> {
    let Some(circuit) = catalog.circuit(id) else {
        return Ok(not_found("Circuit", id, Route::Circuits { highlight: None }));
    };

    if let OutputFormat::Json = format {
        print_json(&serde_json::json!({
            "circuit": circuit,
            "schematic": catalog.circuit_schematic(id),
        }))?;
        return Ok(0);
    }

    println!("\n{}", circuit.title);
    println!("{}", "─".repeat(60));
    println!("  {} · {}", circuit.category, circuit.difficulty);
    print_circuit_body(circuit);
    if !circuit.notes.is_empty() {
        println!("      Notes:");
        for note in &circuit.notes {
            println!("        - {}", note);
        }
    }
    if let Some(schematic) = catalog.circuit_schematic(id) {
        println!(
            "      Schematic: {} parts, {} nets",
            schematic.parts.len(),
            schematic.nets.len()
        );
    }
    println!("      {}", Route::circuits(id));
    Ok(0)
}

fn output_boards(
    catalog: &Catalog,
    boards: &[&Board],
    highlight: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    if let OutputFormat::Json = format {
        return print_json(boards);
    }

    if boards.is_empty() {
        println!("No results");
        return Ok(());
    }
    for board in boards {
        let marker = if highlight == Some(board.id.as_str()) {
            ">"
        } else {
            " "
        };
        let variant = catalog
            .board_variant(board)
            .map(|v| v.name.as_str())
            .unwrap_or(board.variant.as_str());
        let camera = if board.has_camera() { "camera" } else { "" };
        println!(
            "{} {:<24} {:<14} {:<9} {}",
            marker, board.id, board.manufacturer, variant, camera
        );
    }
    Ok(())
}

fn handle_board(catalog: &Catalog, id: &str, format: OutputFormat) -> Result<i32> {
    let Some(detail) = BoardDetail::mount(catalog, id) else {
        return Ok(not_found("Board", id, Route::Boards { highlight: None }));
    };
    let board = detail.board;

    if let OutputFormat::Json = format {
        print_json(&serde_json::json!({
            "board": board,
            "variant": detail.variant.map(|v| &v.id),
            "has_pinout": detail.pinout.is_some(),
        }))?;
        return Ok(0);
    }

    println!("\n{}", board.name);
    println!("{}", "─".repeat(60));
    println!("  Manufacturer: {}", board.manufacturer);
    match detail.variant {
        Some(variant) => println!("  Variant:      {} ({})", variant.name, variant.id),
        None => println!("  Variant:      {} (unknown)", board.variant),
    }
    if let Some(module) = &board.module {
        println!("  Module:       {}", module);
    }
    if let Some(description) = &board.description {
        println!("  {}", description);
    }
    if let Some(price) = &board.price {
        println!("  Price:        {}", price);
    }
    for pro in &board.pros {
        println!("    + {}", pro);
    }
    for con in &board.cons {
        println!("    - {}", con);
    }
    if let Some(pinout) = detail.pinout {
        println!("  Pinout:       {} pins (esp32ref pins --board {})", pinout.pins.len(), board.id);
    }
    Ok(0)
}

fn handle_open(catalog: &Catalog, path: &str, format: OutputFormat) -> Result<i32> {
    let route: Route = path
        .parse()
        .with_context(|| format!("Cannot open '{}'", path))?;
    let (_, query) = split_location(path.trim());
    tracing::debug!("Opening {:?}", route);

    match route {
        Route::Home => {
            println!(
                "{} variants, {} circuits, {} boards",
                catalog.variants().len(),
                catalog.circuits().len(),
                catalog.boards().len()
            );
            Ok(0)
        }
        Route::Compare { highlight } => {
            let highlight = highlight.filter(|id| catalog.variant(id).is_some());
            output_variants(catalog.variants().iter().collect(), highlight.as_deref(), format)?;
            Ok(0)
        }
        Route::Pinouts => {
            output_variants(catalog.variants().iter().collect(), None, format)?;
            Ok(0)
        }
        Route::Pinout { variant_id } => handle_pins(catalog, &variant_id, false, "all", format),
        Route::Circuits { .. } => {
            let page = CircuitsPage::mount(catalog, query);
            output_circuits(&page.visible(), page.expanded(), format)?;
            Ok(0)
        }
        Route::Boards { .. } => {
            let page = BoardsPage::mount(catalog, query);
            let highlight = page.highlighted().map(|b| b.id.as_str());
            output_boards(catalog, &page.visible(), highlight, format)?;
            Ok(0)
        }
        Route::Board { board_id } => handle_board(catalog, &board_id, format),
        Route::Reference => {
            output_reference(catalog);
            Ok(0)
        }
    }
}

/// Pin facet legend with the number of chip pins carrying each category.
fn output_reference(catalog: &Catalog) {
    let categories = [
        PinCategory::Power,
        PinCategory::Gpio,
        PinCategory::Adc,
        PinCategory::Dac,
        PinCategory::Touch,
        PinCategory::Spi,
        PinCategory::I2c,
        PinCategory::Uart,
        PinCategory::Usb,
        PinCategory::Flash,
        PinCategory::Special,
    ];
    let pins: Vec<&Pin> = catalog.variants().iter().flat_map(|v| &v.pins).collect();

    println!("  Pin categories:");
    for category in &categories {
        let count = pins.iter().filter(|p| p.has_category(category)).count();
        println!("    {:<8} {}", category.as_str(), count);
    }
    let strapping = pins.iter().filter(|p| p.is_strapping()).count();
    println!("    {:<8} {}", "strapping", strapping);
}

fn handle_check(
    catalog: &Catalog,
    load_errors: &[String],
    fail_on: Option<FailOnSeverity>,
    format: OutputFormat,
) -> Result<i32> {
    let issues = catalog.validate();

    match format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "load_errors": load_errors,
            "issues": issues,
            "summary": {
                "errors": count(&issues, IssueSeverity::Error),
                "warnings": count(&issues, IssueSeverity::Warning),
            }
        }))?,
        OutputFormat::Human => output_issues(load_errors, &issues),
    }

    if let Some(severity) = fail_on {
        if should_fail(load_errors, &issues, severity) {
            return Ok(1);
        }
    }
    Ok(0)
}

fn count(issues: &[CatalogIssue], severity: IssueSeverity) -> usize {
    issues.iter().filter(|i| i.severity == severity).count()
}

fn should_fail(load_errors: &[String], issues: &[CatalogIssue], severity: FailOnSeverity) -> bool {
    match severity {
        FailOnSeverity::Error => {
            !load_errors.is_empty() || count(issues, IssueSeverity::Error) > 0
        }
        FailOnSeverity::Warning => !issues.is_empty() || !load_errors.is_empty(),
    }
}

fn output_issues(load_errors: &[String], issues: &[CatalogIssue]) {
    if load_errors.is_empty() && issues.is_empty() {
        println!("  No issues found");
        return;
    }

    if !load_errors.is_empty() {
        println!("\n  SKIPPED ENTRIES:");
        for error in load_errors {
            println!("    - {}", error);
        }
    }

    for (severity, heading) in [
        (IssueSeverity::Error, "ERRORS"),
        (IssueSeverity::Warning, "WARNINGS"),
    ] {
        let matching: Vec<_> = issues.iter().filter(|i| i.severity == severity).collect();
        if matching.is_empty() {
            continue;
        }
        println!("\n  {}:", heading);
        for issue in matching {
            println!("    - [{} {}] {}", issue.entity, issue.id, issue.message);
        }
    }

    println!("\n  Summary:");
    println!("    Errors:   {}", count(issues, IssueSeverity::Error));
    println!("    Warnings: {}", count(issues, IssueSeverity::Warning));
    println!("    Skipped:  {}", load_errors.len());
}
