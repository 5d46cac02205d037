//! Error types for scope resolution and volume splitting.

extern crate alloc;

use alloc::string::String;
use core::fmt;

/// Errors produced while indexing, scoping, or querying a page layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PaginationError {
    /// A view window was malformed: `start > end` or `end` past the
    /// backing bounds.
    InvalidView {
        /// Requested start index (inclusive).
        start: usize,
        /// Requested end index (exclusive).
        end: usize,
        /// Length of the backing sequence.
        len: usize,
    },
    /// Indexed access into a view beyond its size.
    OutOfRange {
        /// Requested view-local index.
        index: usize,
        /// Size of the view.
        len: usize,
    },
    /// Marker-reference markup could not be decoded.
    Markup(String),
    /// A broken upstream invariant was detected. The current layout
    /// attempt must be aborted; this is not recoverable from bad input.
    Internal(&'static str),
}

impl fmt::Display for PaginationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidView { start, end, len } => write!(
                f,
                "invalid view window (start={} end={} backing_len={})",
                start, end, len
            ),
            Self::OutOfRange { index, len } => {
                write!(f, "view index out of range (index={} len={})", index, len)
            }
            Self::Markup(msg) => write!(f, "marker markup error: {}", msg),
            Self::Internal(msg) => write!(f, "internal consistency fault: {}", msg),
        }
    }
}

impl std::error::Error for PaginationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_window_coordinates() {
        let err = PaginationError::InvalidView {
            start: 4,
            end: 2,
            len: 8,
        };
        let msg = alloc::format!("{}", err);
        assert!(msg.contains("start=4"));
        assert!(msg.contains("end=2"));
        assert!(msg.contains("backing_len=8"));
    }

    #[test]
    fn display_marks_internal_faults() {
        let err = PaginationError::Internal("splitter state");
        assert!(alloc::format!("{}", err).starts_with("internal consistency fault"));
    }
}
