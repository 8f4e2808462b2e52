//! Selection/highlight state.
//!
//! Each page owns one [`Selection`] slot for its "currently focused" entity.
//! The slot is set by user interaction or, once on mount, by the
//! `?highlight=<id>` deep link. Transitions are explicit: `select` replaces
//! any previous id directly and `dismiss` clears it. Nothing clears the slot
//! implicitly.

use url::form_urlencoded;

/// Query parameter carrying the deep-link id.
pub const HIGHLIGHT_PARAM: &str = "highlight";

/// Extract the first non-empty `highlight` value from a query string.
/// A leading `?` is accepted.
pub fn highlight_param(query: &str) -> Option<String> {
    let query = query.strip_prefix('?').unwrap_or(query);
    form_urlencoded::parse(query.as_bytes())
        .filter(|(key, value)| key == HIGHLIGHT_PARAM && !value.is_empty())
        .map(|(_, value)| value.into_owned())
        .next()
}

/// Instruction for the presentation layer to scroll an entity into view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollRequest {
    pub target: String,
}

/// Single-slot focus controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<K = String> {
    current: Option<K>,
}

impl<K> Default for Selection<K> {
    fn default() -> Self {
        Self { current: None }
    }
}

impl<K: PartialEq> Selection<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Focus `id`, returning the previously focused id.
    pub fn select(&mut self, id: K) -> Option<K> {
        self.current.replace(id)
    }

    /// Clear the slot, returning the id that was focused.
    pub fn dismiss(&mut self) -> Option<K> {
        self.current.take()
    }

    /// Select `id`, or dismiss when it is already selected (expand/collapse rows).
    pub fn toggle(&mut self, id: K) {
        if self.is_selected(&id) {
            self.current = None;
        } else {
            self.current = Some(id);
        }
    }

    pub fn current(&self) -> Option<&K> {
        self.current.as_ref()
    }

    pub fn is_selected(&self, id: &K) -> bool {
        self.current.as_ref() == Some(id)
    }

    pub fn is_set(&self) -> bool {
        self.current.is_some()
    }
}

impl Selection<String> {
    /// Apply a deep link from `query`. The slot is only set when `resolves`
    /// accepts the id; unresolvable ids are ignored without error.
    pub fn apply_deep_link<F>(&mut self, query: &str, resolves: F) -> Option<ScrollRequest>
    where
        F: Fn(&str) -> bool,
    {
        let id = highlight_param(query)?;

        if !resolves(&id) {
            tracing::debug!("Ignoring unresolvable deep link id '{}'", id);
            return None;
        }

        self.current = Some(id.clone());
        Some(ScrollRequest { target: id })
    }
}
