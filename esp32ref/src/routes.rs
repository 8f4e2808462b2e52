//! Route surface of the reference site.
//!
//! The core only needs to produce well-formed relative paths for search
//! results; parsing exists so a deep link can be dispatched to its page.

use std::fmt;
use std::str::FromStr;

use url::form_urlencoded;

use crate::core::Esp32RefError;
use crate::selection::{highlight_param, HIGHLIGHT_PARAM};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Compare { highlight: Option<String> },
    Pinouts,
    Pinout { variant_id: String },
    Circuits { highlight: Option<String> },
    Boards { highlight: Option<String> },
    Board { board_id: String },
    Reference,
}

impl Route {
    pub fn compare(variant_id: &str) -> Self {
        Route::Compare {
            highlight: Some(variant_id.to_string()),
        }
    }

    pub fn pinout(variant_id: &str) -> Self {
        Route::Pinout {
            variant_id: variant_id.to_string(),
        }
    }

    pub fn circuits(circuit_id: &str) -> Self {
        Route::Circuits {
            highlight: Some(circuit_id.to_string()),
        }
    }

    pub fn boards(board_id: &str) -> Self {
        Route::Boards {
            highlight: Some(board_id.to_string()),
        }
    }

    pub fn board(board_id: &str) -> Self {
        Route::Board {
            board_id: board_id.to_string(),
        }
    }

    /// The `highlight` deep-link id carried by listing routes.
    pub fn highlight(&self) -> Option<&str> {
        match self {
            Route::Compare { highlight }
            | Route::Circuits { highlight }
            | Route::Boards { highlight } => highlight.as_deref(),
            _ => None,
        }
    }

    fn base_path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Compare { .. } => "/compare",
            Route::Pinouts | Route::Pinout { .. } => "/pinouts",
            Route::Circuits { .. } => "/circuits",
            Route::Boards { .. } | Route::Board { .. } => "/boards",
            Route::Reference => "/reference",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base_path())?;

        match self {
            Route::Pinout { variant_id } => write!(f, "/{}", urlencoding::encode(variant_id)),
            Route::Board { board_id } => write!(f, "/{}", urlencoding::encode(board_id)),
            _ => match self.highlight() {
                Some(id) => {
                    let query = form_urlencoded::Serializer::new(String::new())
                        .append_pair(HIGHLIGHT_PARAM, id)
                        .finish();
                    write!(f, "?{}", query)
                }
                None => Ok(()),
            },
        }
    }
}

/// Split a site-relative location into path and query string, dropping any
/// `#fragment`.
pub fn split_location(location: &str) -> (&str, &str) {
    let location = match location.split_once('#') {
        Some((before, _)) => before,
        None => location,
    };
    location.split_once('?').unwrap_or((location, ""))
}

impl FromStr for Route {
    type Err = Esp32RefError;

    /// Parse a site-relative path with an optional query string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (path, query) = split_location(s);
        let highlight = highlight_param(query);

        let segments: Vec<&str> = path.split('/').filter(|seg| !seg.is_empty()).collect();
        let decode = |seg: &str| -> Result<String, Esp32RefError> {
            urlencoding::decode(seg)
                .map(|d| d.into_owned())
                .map_err(|_| Esp32RefError::UnknownRoute(s.to_string()))
        };

        match segments.as_slice() {
            [] => Ok(Route::Home),
            ["compare"] => Ok(Route::Compare { highlight }),
            ["pinouts"] => Ok(Route::Pinouts),
            ["pinouts", id] => Ok(Route::Pinout {
                variant_id: decode(*id)?,
            }),
            ["circuits"] => Ok(Route::Circuits { highlight }),
            ["boards"] => Ok(Route::Boards { highlight }),
            ["boards", id] => Ok(Route::Board {
                board_id: decode(*id)?,
            }),
            ["reference"] => Ok(Route::Reference),
            _ => Err(Esp32RefError::UnknownRoute(s.to_string())),
        }
    }
}
