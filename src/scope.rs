//! Scope engine: page registration, scope caching, offset navigation and
//! marker search.
//!
//! The engine is the post-layout façade of the paginator. Pages are
//! registered once per partition in any id order; volume and sequence
//! ranges are cached once boundaries are final; marker queries then read
//! the cached scopes. One engine serves one document and is driven by a
//! single sequential layout pass, so nothing here locks.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::ops::Range;

use crate::error::PaginationError;
use crate::marker::{MarkerRef, SearchDirection, SearchScope};
use crate::page::{PageRecord, SequenceId, Space};
use crate::view::View;

/// Slot in a partition's dense page arena; `None` marks a page id that
/// has not been registered yet.
pub type PageSlot = Option<PageRecord>;

/// Bounded view over a partition's dense page arena.
pub type PageView<'a> = View<'a, PageSlot>;

impl<'a> View<'a, PageSlot> {
    /// Iterate registered pages in order, skipping unpopulated slots.
    pub fn pages(&self) -> impl Iterator<Item = &'a PageRecord> {
        self.iter().filter_map(Option::as_ref)
    }
}

const EMPTY: &[PageSlot] = &[];

#[derive(Clone, Debug, Default)]
struct SpaceStore {
    /// Dense page arena indexed by page id. Gaps are tolerated only
    /// while registration is still in progress.
    pages: Vec<PageSlot>,
    /// Volume number per page id, written by `set_volume_scope`.
    volumes: Vec<Option<usize>>,
    volume_ranges: BTreeMap<usize, Range<usize>>,
    sequence_ranges: BTreeMap<usize, Range<usize>>,
}

impl SpaceStore {
    /// Navigate `offset` steps from `base` within `range`, optionally
    /// saturating at the range ends instead of stepping out.
    fn page_in_range(
        &self,
        range: &Range<usize>,
        base: &PageRecord,
        offset: i32,
        adjust_out_of_bounds: bool,
    ) -> Option<&PageRecord> {
        let local = base.page_id().checked_sub(range.start)?;
        if base.page_id() >= range.end {
            return None;
        }
        let len = range.len() as i64;
        let mut target = local as i64 + i64::from(offset);
        if adjust_out_of_bounds {
            target = target.clamp(0, len - 1);
        }
        if target < 0 || target >= len {
            return None;
        }
        self.pages.get(range.start + target as usize)?.as_ref()
    }
}

/// Scope-resolution façade over an already-produced page layout.
///
/// Hosts processing several documents in parallel must give each its own
/// engine; no state is shared across instances.
#[derive(Clone, Debug, Default)]
pub struct ScopeEngine {
    spaces: BTreeMap<Space, SpaceStore>,
}

impl ScopeEngine {
    /// Create an empty engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a page at its dense partition index.
    ///
    /// The arena grows with unpopulated slots as needed, so pages may
    /// arrive in any id order. Re-registering an id overwrites the
    /// earlier record. Every slot must be populated before views of the
    /// partition are read.
    pub fn add_page(&mut self, page: PageRecord) {
        let store = self.spaces.entry(page.sequence_id().space).or_default();
        let id = page.page_id();
        if id >= store.pages.len() {
            store.pages.resize_with(id + 1, || None);
            store.volumes.resize_with(id + 1, || None);
        }
        if store.pages[id].is_some() {
            log::debug!(
                "overwriting page {} in {:?}",
                id,
                page.sequence_id().space
            );
        }
        store.pages[id] = Some(page);
    }

    /// View over the partition's entire page order.
    pub fn page_view(&self, space: Space) -> PageView<'_> {
        match self.spaces.get(&space) {
            Some(store) => View::whole(&store.pages),
            None => View::whole(EMPTY),
        }
    }

    /// Direct page accessor.
    pub fn page(&self, space: Space, page_id: usize) -> Option<&PageRecord> {
        self.spaces.get(&space)?.pages.get(page_id)?.as_ref()
    }

    /// Cache a sequence's contiguous page range `[from, to)`.
    pub fn set_sequence_scope(
        &mut self,
        space: Space,
        ordinal: usize,
        from: usize,
        to: usize,
    ) -> Result<(), PaginationError> {
        let store = self.spaces.entry(space).or_default();
        View::new(&store.pages, from, to)?;
        store.sequence_ranges.insert(ordinal, from..to);
        Ok(())
    }

    /// Cache a volume's contiguous page range `[from, to)` and stamp the
    /// volume number onto every page in it.
    ///
    /// This is the only place volume numbers are assigned.
    pub fn set_volume_scope(
        &mut self,
        space: Space,
        volume: usize,
        from: usize,
        to: usize,
    ) -> Result<(), PaginationError> {
        let store = self.spaces.entry(space).or_default();
        View::new(&store.pages, from, to)?;
        for slot in &mut store.volumes[from..to] {
            *slot = Some(volume);
        }
        store.volume_ranges.insert(volume, from..to);
        Ok(())
    }

    /// Cached view of a volume's pages, or `None` if not yet registered.
    pub fn contents_in_volume(&self, space: Space, volume: usize) -> Option<PageView<'_>> {
        let store = self.spaces.get(&space)?;
        let range = store.volume_ranges.get(&volume)?;
        View::new(&store.pages, range.start, range.end).ok()
    }

    /// Cached view of a sequence's pages, or `None` if not yet
    /// registered.
    pub fn contents_in_sequence(&self, sequence: SequenceId) -> Option<PageView<'_>> {
        let store = self.spaces.get(&sequence.space)?;
        let range = store.sequence_ranges.get(&sequence.ordinal)?;
        View::new(&store.pages, range.start, range.end).ok()
    }

    /// Volume number assigned to `page`, if any.
    pub fn volume_of(&self, page: &PageRecord) -> Option<usize> {
        let store = self.spaces.get(&page.sequence_id().space)?;
        store.volumes.get(page.page_id()).copied().flatten()
    }

    /// Navigate `offset` steps from `base` across the whole partition.
    ///
    /// Offset 0 returns `base` unchanged. Without adjustment, stepping
    /// past either end yields `None`; with adjustment, the result
    /// saturates at the first or last page.
    pub fn page_in_document_with_offset<'a>(
        &'a self,
        base: &'a PageRecord,
        offset: i32,
        adjust_out_of_bounds: bool,
    ) -> Option<&'a PageRecord> {
        if offset == 0 {
            return Some(base);
        }
        let store = self.spaces.get(&base.sequence_id().space)?;
        store.page_in_range(&(0..store.pages.len()), base, offset, adjust_out_of_bounds)
    }

    /// Navigate `offset` steps from `base` within its volume.
    ///
    /// Requires the volume scope of `base` to be registered; otherwise
    /// only offset 0 resolves.
    pub fn page_in_volume_with_offset<'a>(
        &'a self,
        base: &'a PageRecord,
        offset: i32,
        adjust_out_of_bounds: bool,
    ) -> Option<&'a PageRecord> {
        if offset == 0 {
            return Some(base);
        }
        let store = self.spaces.get(&base.sequence_id().space)?;
        let volume = store.volumes.get(base.page_id()).copied().flatten()?;
        let range = store.volume_ranges.get(&volume)?;
        store.page_in_range(range, base, offset, adjust_out_of_bounds)
    }

    /// Navigate `offset` steps from `base` within its sequence.
    pub fn page_in_sequence_with_offset<'a>(
        &'a self,
        base: &'a PageRecord,
        offset: i32,
        adjust_out_of_bounds: bool,
    ) -> Option<&'a PageRecord> {
        if offset == 0 {
            return Some(base);
        }
        let store = self.spaces.get(&base.sequence_id().space)?;
        let range = store.sequence_ranges.get(&base.sequence_id().ordinal)?;
        store.page_in_range(range, base, offset, adjust_out_of_bounds)
    }

    /// True when `base` and the page `offset` steps away within its
    /// volume form one visual spread.
    pub fn is_within_volume_spread_scope(&self, base: &PageRecord, offset: i32) -> bool {
        if offset == 0 {
            return true;
        }
        let neighbor = self.page_in_volume_with_offset(base, offset, false);
        base.is_within_spread_scope(offset, neighbor)
    }

    /// Document-wide variant of [`Self::is_within_volume_spread_scope`].
    ///
    /// No current search scope uses it; it backs a future
    /// spread-within-document scope.
    pub fn is_within_document_spread_scope(&self, base: &PageRecord, offset: i32) -> bool {
        if offset == 0 {
            return true;
        }
        let neighbor = self.page_in_document_with_offset(base, offset, false);
        base.is_within_spread_scope(offset, neighbor)
    }

    /// Decide whether out-of-bounds navigation should saturate at scope
    /// edges when resolving `marker_ref`'s start page from `base`.
    ///
    /// Adjustment is only ever needed when the search direction disagrees
    /// with the sign of the requested offset (searching against the
    /// grain); when they agree, running off the edge simply means there
    /// is nothing there.
    pub fn should_adjust_out_of_bounds(&self, base: &PageRecord, marker_ref: &MarkerRef) -> bool {
        let with_the_grain = match marker_ref.direction {
            SearchDirection::Forward => marker_ref.offset >= 0,
            SearchDirection::Backward => marker_ref.offset <= 0,
        };
        if with_the_grain {
            return false;
        }
        match marker_ref.scope {
            SearchScope::Page | SearchScope::PageContent => false,
            SearchScope::Sequence | SearchScope::Volume | SearchScope::Document => true,
            SearchScope::Spread | SearchScope::SpreadContent => {
                self.is_within_volume_spread_scope(base, marker_ref.offset)
            }
            SearchScope::Sheet => {
                base.is_within_sheet_scope(marker_ref.offset)
                    && marker_ref.direction == SearchDirection::Backward
            }
        }
    }

    /// Resolve a marker reference starting from `page`.
    ///
    /// A marker absent anywhere within the search scope resolves to an
    /// empty string; absence is not an error. Direct lookup in the
    /// VOLUME and DOCUMENT scopes is reserved and reports an
    /// internal-consistency fault.
    pub fn find_marker<'a>(
        &'a self,
        page: Option<&'a PageRecord>,
        marker_ref: &MarkerRef,
    ) -> Result<String, PaginationError> {
        if matches!(
            marker_ref.scope,
            SearchScope::Volume | SearchScope::Document
        ) {
            return Err(PaginationError::Internal(
                "marker lookup is not implemented for the volume and document scopes",
            ));
        }
        let step: i32 = match marker_ref.direction {
            SearchDirection::Forward => 1,
            SearchDirection::Backward => -1,
        };
        let mut cursor = page;
        while let Some(page) = cursor {
            let skip_leading = match marker_ref.scope {
                SearchScope::PageContent => true,
                SearchScope::SpreadContent => {
                    // A page that opens a new visual spread must not
                    // repeat markers carried over from the previous one.
                    let prev = self.page_in_volume_with_offset(page, -1, false);
                    !page.is_within_spread_scope(-1, prev)
                }
                _ => false,
            };
            let markers = if skip_leading {
                page.content_markers()
            } else {
                page.markers()
            };
            let hit = match marker_ref.direction {
                SearchDirection::Forward => markers.iter().find(|m| m.name == marker_ref.name),
                SearchDirection::Backward => {
                    markers.iter().rev().find(|m| m.name == marker_ref.name)
                }
            };
            if let Some(marker) = hit {
                return Ok(marker.value.clone());
            }
            cursor = match marker_ref.scope {
                SearchScope::Sequence => self.page_in_sequence_with_offset(page, step, false),
                SearchScope::Sheet if page.is_within_sheet_scope(step) => {
                    self.page_in_sequence_with_offset(page, step, false)
                }
                SearchScope::Spread | SearchScope::SpreadContent => {
                    if self.is_within_volume_spread_scope(page, step) {
                        self.page_in_volume_with_offset(page, step, false)
                    } else {
                        None
                    }
                }
                _ => None,
            };
        }
        Ok(String::new())
    }

    /// Resolve `marker_ref`'s start page by applying its signed offset in
    /// the reference's coordinate space, then search from there.
    ///
    /// The offset is volume-relative for the spread scopes and
    /// sequence-relative otherwise;
    /// [`Self::should_adjust_out_of_bounds`] decides how scope edges are
    /// handled. The offset is consumed here: the search itself starts at
    /// the resolved page.
    pub fn find_start_and_marker(
        &self,
        page: &PageRecord,
        marker_ref: &MarkerRef,
    ) -> Result<String, PaginationError> {
        let adjust = self.should_adjust_out_of_bounds(page, marker_ref);
        let start = match marker_ref.scope {
            SearchScope::Spread | SearchScope::SpreadContent => {
                self.page_in_volume_with_offset(page, marker_ref.offset, adjust)
            }
            _ => self.page_in_sequence_with_offset(page, marker_ref.offset, adjust),
        };
        self.find_marker(start, marker_ref)
    }
}
