//! Global search overlay.
//!
//! Keyboard-driven state machine over [`QueryEngine::search`]. The overlay
//! never renders anything; it reports the path to navigate to and the
//! presentation layer performs the navigation.
//!
//! ```text
//!   closed --Ctrl/Cmd+K--> open(query="", cursor=0)
//!   open   --char/backspace--> recompute results, cursor=0
//!   open   --Up/Down--> cursor clamped to [0, len-1]
//!   open   --Enter--> Some(path), closed
//!   open   --Escape--> closed, query cleared
//! ```

use crate::query::{QueryEngine, SearchResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Backspace,
    ArrowUp,
    ArrowDown,
    Enter,
    Escape,
}

/// A key event with the modifiers the overlay cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub ctrl: bool,
    /// Cmd on macOS
    pub meta: bool,
}

impl KeyPress {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            meta: false,
        }
    }

    pub fn ctrl(key: Key) -> Self {
        Self {
            key,
            ctrl: true,
            meta: false,
        }
    }

    pub fn meta(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            meta: true,
        }
    }

    /// Ctrl+K or Cmd+K.
    pub fn is_open_shortcut(&self) -> bool {
        (self.ctrl || self.meta) && matches!(self.key, Key::Char('k') | Key::Char('K'))
    }
}

pub struct SearchOverlay<'c> {
    engine: QueryEngine<'c>,
    open: bool,
    query: String,
    results: Vec<SearchResult>,
    cursor: usize,
}

impl<'c> SearchOverlay<'c> {
    pub fn new(engine: QueryEngine<'c>) -> Self {
        Self {
            engine,
            open: false,
            query: String::new(),
            results: Vec::new(),
            cursor: 0,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The result under the cursor, if any.
    pub fn highlighted(&self) -> Option<&SearchResult> {
        self.results.get(self.cursor)
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    /// Close and clear the query.
    pub fn close(&mut self) {
        self.open = false;
        self.query.clear();
        self.results.clear();
        self.cursor = 0;
    }

    /// Replace the query text. Results are recomputed and the cursor resets.
    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.refresh();
    }

    fn refresh(&mut self) {
        self.results = self.engine.search(&self.query).to_vec();
        self.cursor = 0;
    }

    /// Activate the result at `index` (mouse click). Closes on success.
    pub fn activate(&mut self, index: usize) -> Option<String> {
        let path = self.results.get(index)?.path().to_string();
        tracing::debug!("Search overlay navigating to {}", path);
        self.close();
        Some(path)
    }

    /// Feed one key event. Returns the path to navigate to when the event
    /// activates a result.
    pub fn handle_key(&mut self, press: KeyPress) -> Option<String> {
        if press.is_open_shortcut() {
            if self.open {
                self.close();
            } else {
                self.open();
            }
            return None;
        }

        if !self.open {
            return None;
        }

        match press.key {
            Key::Escape => self.close(),
            Key::ArrowDown => {
                if self.cursor + 1 < self.results.len() {
                    self.cursor += 1;
                }
            }
            Key::ArrowUp => self.cursor = self.cursor.saturating_sub(1),
            Key::Enter => return self.activate(self.cursor),
            Key::Backspace => {
                if self.query.pop().is_some() {
                    self.refresh();
                }
            }
            Key::Char(c) => {
                if press.ctrl || press.meta {
                    return None;
                }
                self.query.push(c);
                self.refresh();
            }
        }
        None
    }
}
