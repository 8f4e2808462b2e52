//! Catalog integrity checks.
//!
//! The tables are hand-maintained, so ids, foreign keys and pin rows drift.
//! Loading never rejects a catalog for these problems; they are reported here.

use serde::Serialize;
use std::collections::HashSet;

use crate::catalog::schema::{EntityKind, Pin, PinCategory};
use crate::catalog::Catalog;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueSeverity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogIssue {
    pub severity: IssueSeverity,
    pub entity: EntityKind,
    pub id: String,
    pub message: String,
}

impl CatalogIssue {
    fn error(entity: EntityKind, id: &str, message: String) -> Self {
        Self {
            severity: IssueSeverity::Error,
            entity,
            id: id.to_string(),
            message,
        }
    }

    fn warning(entity: EntityKind, id: &str, message: String) -> Self {
        Self {
            severity: IssueSeverity::Warning,
            entity,
            id: id.to_string(),
            message,
        }
    }
}

pub(crate) fn validate(catalog: &Catalog) -> Vec<CatalogIssue> {
    let mut issues = Vec::new();

    check_unique(
        catalog.variants().iter().map(|v| v.id.as_str()),
        EntityKind::Variant,
        &mut issues,
    );
    check_unique(
        catalog.circuits().iter().map(|c| c.id.as_str()),
        EntityKind::Circuit,
        &mut issues,
    );
    check_unique(
        catalog.boards().iter().map(|b| b.id.as_str()),
        EntityKind::Board,
        &mut issues,
    );

    for variant in catalog.variants() {
        check_pin_rows(&variant.id, &variant.pins, &mut issues);
    }

    for board in catalog.boards() {
        if catalog.variant(&board.variant).is_none() {
            issues.push(CatalogIssue::error(
                EntityKind::Board,
                &board.id,
                format!("Board references unknown variant '{}'", board.variant),
            ));
        }
    }

    for pinout in catalog.board_pinouts() {
        if catalog.board(&pinout.board_id).is_none() {
            issues.push(CatalogIssue::error(
                EntityKind::BoardPinout,
                &pinout.board_id,
                "Pinout references unknown board".to_string(),
            ));
        }
        check_pin_rows(&pinout.board_id, &pinout.pins, &mut issues);
    }

    for schematic in catalog.schematics() {
        if catalog.circuit(&schematic.circuit_id).is_none() {
            issues.push(CatalogIssue::error(
                EntityKind::Schematic,
                &schematic.circuit_id,
                "Schematic references unknown circuit".to_string(),
            ));
        }
    }

    for issue in &issues {
        tracing::warn!("Catalog {} '{}': {}", issue.entity, issue.id, issue.message);
    }

    issues
}

fn check_unique<'a>(
    ids: impl Iterator<Item = &'a str>,
    entity: EntityKind,
    issues: &mut Vec<CatalogIssue>,
) {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            issues.push(CatalogIssue::error(
                entity,
                id,
                format!("Duplicate {} id", entity),
            ));
        }
    }
}

/// (side, position) must be unique per owner. A "strapping" entry in the
/// category list is only allowed alongside the strapping flag.
fn check_pin_rows(owner: &str, pins: &[Pin], issues: &mut Vec<CatalogIssue>) {
    let strapping_category = PinCategory::Other("strapping".to_string());
    let mut seen = HashSet::new();

    for pin in pins {
        if !seen.insert(pin.key()) {
            issues.push(CatalogIssue::error(
                EntityKind::Pin,
                owner,
                format!(
                    "Duplicate pin row at {} position {}",
                    pin.side, pin.position
                ),
            ));
        }

        if pin.has_category(&strapping_category) && !pin.is_strapping() {
            issues.push(CatalogIssue::warning(
                EntityKind::Pin,
                owner,
                format!(
                    "{} lists the strapping category but is not flagged as strapping",
                    pin.name
                ),
            ));
        }
    }
}
