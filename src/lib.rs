//! Volume splitting and marker scope resolution for braille pagination.
//!
//! Once a braille document has been broken into pages, two search
//! problems remain before anything can be embossed: distributing the
//! resulting physical sheets across bound volumes as evenly as possible
//! under a maximum volume size, and resolving running header/footer
//! markers across a layered scope hierarchy (page, spread, sheet,
//! sequence, volume, document) with directional semantics. This crate
//! implements both over an already-produced page layout:
//!
//! - [`ScopeEngine`] indexes laid-out pages per numbering partition,
//!   caches volume and sequence scopes, navigates page offsets and
//!   answers marker queries.
//! - [`VolumeSplitter`] adapts a [`VolumePlan`] across the host's
//!   fit/retry attempts until the content fits its volumes, memoizing
//!   every configuration it has proposed.
//!
//! Page composition, output writing and pipeline orchestration live
//! upstream and downstream of this crate.
//!
//! # Usage
//!
//! ```
//! use braille_stream::{
//!     Marker, MarkerRef, PagePlacement, PageRecord, ScopeEngine, SearchDirection,
//!     SearchScope, SequenceId, Space,
//! };
//!
//! # fn example() -> Result<(), braille_stream::PaginationError> {
//! let mut engine = ScopeEngine::new();
//! let seq = SequenceId::new(Space::Body, 0);
//! for id in 0..4 {
//!     let mut page = PageRecord::new(id, seq, PagePlacement { ordinal: id, duplex: true });
//!     if id == 0 {
//!         page.push_marker(Marker::new("chapter", "Chapter One"));
//!     }
//!     engine.add_page(page);
//! }
//! engine.set_sequence_scope(Space::Body, 0, 0, 4)?;
//! engine.set_volume_scope(Space::Body, 1, 0, 4)?;
//!
//! let base = engine.page(Space::Body, 3).unwrap();
//! let field = MarkerRef::new("chapter", SearchScope::Sequence)
//!     .with_direction(SearchDirection::Backward);
//! assert_eq!(engine.find_marker(Some(base), &field)?, "Chapter One");
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![cfg_attr(
    not(test),
    deny(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::panic_in_result_fn,
        clippy::todo,
        clippy::unimplemented
    )
)]

mod error;
mod marker;
mod markup;
mod page;
mod scope;
mod split;
mod view;

pub use error::PaginationError;
pub use marker::{Marker, MarkerRef, SearchDirection, SearchScope};
pub use markup::parse_marker_references;
pub use page::{PagePlacement, PageRecord, SequenceId, Space};
pub use scope::{PageSlot, PageView, ScopeEngine};
pub use split::{VolumePlan, VolumeSplitter};
pub use view::View;
