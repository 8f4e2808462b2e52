//! Page-level controllers.
//!
//! Each page owns its filter state and its own [`Selection`] slot; nothing is
//! shared between pages. Deep links are applied once, in `mount`, after the
//! catalog is loaded.

use crate::catalog::schema::{Board, BoardPinout, Circuit, Pin, PinKey, Variant};
use crate::catalog::Catalog;
use crate::query::{
    filter_boards, filter_circuits, filter_pins_by_category, BoardFilter, CircuitFilter,
    PinFacet, PinMatch,
};
use crate::selection::{ScrollRequest, Selection};

/// Circuits listing: category/difficulty/text filters plus the expanded row.
#[derive(Debug)]
pub struct CircuitsPage<'c> {
    catalog: &'c Catalog,
    pub filter: CircuitFilter,
    expanded: Selection,
    scroll: Option<ScrollRequest>,
}

impl<'c> CircuitsPage<'c> {
    /// Mount the page with the location's query string (may be empty).
    pub fn mount(catalog: &'c Catalog, query: &str) -> Self {
        let mut expanded: Selection = Selection::new();
        let scroll = expanded.apply_deep_link(query, |id| catalog.circuit(id).is_some());
        Self {
            catalog,
            filter: CircuitFilter::default(),
            expanded,
            scroll,
        }
    }

    /// Scroll instruction produced by the deep link, handed out once.
    pub fn take_scroll_request(&mut self) -> Option<ScrollRequest> {
        self.scroll.take()
    }

    pub fn visible(&self) -> Vec<&'c Circuit> {
        filter_circuits(self.catalog, &self.filter)
    }

    /// Expand a circuit row. Returns false for an id not in the catalog.
    pub fn expand(&mut self, circuit_id: &str) -> bool {
        if self.catalog.circuit(circuit_id).is_none() {
            return false;
        }
        self.expanded.select(circuit_id.to_string());
        true
    }

    /// Clicking the expanded row again collapses it.
    pub fn toggle(&mut self, circuit_id: &str) {
        if self.catalog.circuit(circuit_id).is_some() {
            self.expanded.toggle(circuit_id.to_string());
        }
    }

    pub fn collapse(&mut self) {
        self.expanded.dismiss();
    }

    pub fn expanded(&self) -> Option<&'c Circuit> {
        let catalog = self.catalog;
        self.expanded.current().and_then(|id| catalog.circuit(id))
    }

    pub fn selection(&self) -> &Selection {
        &self.expanded
    }
}

/// Boards listing: manufacturer/variant/camera/text filters plus a highlighted card.
#[derive(Debug)]
pub struct BoardsPage<'c> {
    catalog: &'c Catalog,
    pub filter: BoardFilter,
    highlighted: Selection,
    scroll: Option<ScrollRequest>,
}

impl<'c> BoardsPage<'c> {
    pub fn mount(catalog: &'c Catalog, query: &str) -> Self {
        let mut highlighted: Selection = Selection::new();
        let scroll = highlighted.apply_deep_link(query, |id| catalog.board(id).is_some());
        Self {
            catalog,
            filter: BoardFilter::default(),
            highlighted,
            scroll,
        }
    }

    pub fn take_scroll_request(&mut self) -> Option<ScrollRequest> {
        self.scroll.take()
    }

    pub fn visible(&self) -> Vec<&'c Board> {
        filter_boards(self.catalog, &self.filter)
    }

    pub fn highlight(&mut self, board_id: &str) -> bool {
        if self.catalog.board(board_id).is_none() {
            return false;
        }
        self.highlighted.select(board_id.to_string());
        true
    }

    pub fn dismiss(&mut self) {
        self.highlighted.dismiss();
    }

    pub fn highlighted(&self) -> Option<&'c Board> {
        let catalog = self.catalog;
        self.highlighted.current().and_then(|id| catalog.board(id))
    }

    pub fn selection(&self) -> &Selection {
        &self.highlighted
    }
}

/// Pinout of one variant: category facet plus the selected pin.
#[derive(Debug)]
pub struct PinoutPage<'c> {
    variant: &'c Variant,
    pub facet: PinFacet,
    selected: Selection<PinKey>,
}

impl<'c> PinoutPage<'c> {
    /// `None` when the variant id does not resolve (render "not found").
    pub fn mount(catalog: &'c Catalog, variant_id: &str) -> Option<Self> {
        let variant = catalog.variant(variant_id)?;
        Some(Self {
            variant,
            facet: PinFacet::All,
            selected: Selection::new(),
        })
    }

    /// Mount from a pin search hit, with the matched pin pre-selected.
    pub fn from_search(catalog: &'c Catalog, hit: &PinMatch) -> Option<Self> {
        let mut page = Self::mount(catalog, &hit.variant_id)?;
        page.select_pin(hit.pin.key());
        Some(page)
    }

    pub fn variant(&self) -> &'c Variant {
        self.variant
    }

    pub fn visible(&self) -> Vec<&'c Pin> {
        filter_pins_by_category(&self.variant.pins, &self.facet)
    }

    /// Select a pin row. Returns false when the variant has no such row.
    pub fn select_pin(&mut self, key: PinKey) -> bool {
        if !self.variant.pins.iter().any(|p| p.key() == key) {
            return false;
        }
        self.selected.select(key);
        true
    }

    pub fn dismiss(&mut self) {
        self.selected.dismiss();
    }

    pub fn selected_pin(&self) -> Option<&'c Pin> {
        let key = *self.selected.current()?;
        self.variant.pins.iter().find(|p| p.key() == key)
    }
}

/// Board detail page. `None` for an unknown board id.
#[derive(Debug)]
pub struct BoardDetail<'c> {
    pub board: &'c Board,
    pub variant: Option<&'c Variant>,
    pub pinout: Option<&'c BoardPinout>,
}

impl<'c> BoardDetail<'c> {
    pub fn mount(catalog: &'c Catalog, board_id: &str) -> Option<Self> {
        let board = catalog.board(board_id)?;
        Some(Self {
            board,
            variant: catalog.board_variant(board),
            pinout: catalog.board_pinout(board_id),
        })
    }
}
