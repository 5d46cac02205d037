//! Markers and the references that resolve them.
//!
//! A marker is a named text value attached to a page by the upstream
//! paginator. A marker reference describes how a running header/footer
//! field searches for one: which name to look for, in which direction,
//! across which scope, and from which page offset.

extern crate alloc;

use alloc::string::String;

/// Named text value attached to a page, used for running headers/footers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Marker {
    /// Marker name referenced from field definitions.
    pub name: String,
    /// Replacement text.
    pub value: String,
}

impl Marker {
    /// Create a marker.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Direction a marker search scans in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchDirection {
    /// Scan marker lists from the first entry and pages towards the end
    /// of the scope.
    Forward,
    /// Scan marker lists from the last entry and pages towards the start
    /// of the scope.
    Backward,
}

impl SearchDirection {
    /// Decode a markup attribute value.
    pub fn from_markup(value: &str) -> Option<Self> {
        match value {
            "forward" => Some(Self::Forward),
            "backward" => Some(Self::Backward),
            _ => None,
        }
    }
}

/// Search breadth for marker resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchScope {
    /// The start page only.
    Page,
    /// The start page only, restricted to its content markers.
    PageContent,
    /// The start page's sequence.
    Sequence,
    /// The start page's volume. Reserved: valid in references and in
    /// boundary adjustment, but not supported for direct marker lookup.
    Volume,
    /// The whole document. Reserved like [`SearchScope::Volume`].
    Document,
    /// The visual spread containing the start page.
    Spread,
    /// The visual spread, restricted to content markers on pages that
    /// open a new spread.
    SpreadContent,
    /// The physical sheet containing the start page.
    Sheet,
}

impl SearchScope {
    /// Decode a markup attribute value.
    pub fn from_markup(value: &str) -> Option<Self> {
        match value {
            "page" => Some(Self::Page),
            "page-content" => Some(Self::PageContent),
            "sequence" => Some(Self::Sequence),
            "volume" => Some(Self::Volume),
            "document" => Some(Self::Document),
            "spread" => Some(Self::Spread),
            "spread-content" => Some(Self::SpreadContent),
            "sheet" => Some(Self::Sheet),
            _ => None,
        }
    }
}

/// A running-field marker reference: which marker to resolve and how to
/// search for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarkerRef {
    /// Marker name to match.
    pub name: String,
    /// Scan direction.
    pub direction: SearchDirection,
    /// Search breadth.
    pub scope: SearchScope,
    /// Signed page offset applied before the search starts, in the
    /// scope's coordinate space.
    pub offset: i32,
}

impl MarkerRef {
    /// Reference searching forward from offset 0.
    pub fn new(name: impl Into<String>, scope: SearchScope) -> Self {
        Self {
            name: name.into(),
            direction: SearchDirection::Forward,
            scope,
            offset: 0,
        }
    }

    /// Set the scan direction.
    pub fn with_direction(mut self, direction: SearchDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Set the start-page offset.
    pub fn with_offset(mut self, offset: i32) -> Self {
        self.offset = offset;
        self
    }
}
