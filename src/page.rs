//! Page records and their physical placement relationships.
//!
//! Pages arrive here fully laid out. What this module keeps is the data
//! the scope engine needs afterwards: partition membership, the ordered
//! marker list, and enough physical placement to answer the sheet and
//! spread relationship questions.

use smallvec::SmallVec;

use crate::marker::Marker;

/// Independent page-numbering partition within a document.
///
/// Pages in different partitions are never cross-referenced by index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Space {
    /// Title pages and other preliminary content.
    FrontMatter,
    /// Main body content.
    Body,
    /// Appendices and other closing content.
    BackMatter,
}

/// Identity of one contiguous content run within a partition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SequenceId {
    /// Partition this sequence belongs to.
    pub space: Space,
    /// 0-based ordinal of the sequence within its partition.
    pub ordinal: usize,
}

impl SequenceId {
    /// Create a sequence id.
    pub fn new(space: Space, ordinal: usize) -> Self {
        Self { space, ordinal }
    }
}

/// Physical placement facts computed by the upstream paginator.
///
/// Placement ordinals are 0-based within the partition's physical page
/// order. A duplex leaf `k` carries ordinals `(2k, 2k + 1)`; an opened
/// book shows ordinals `(2k + 1, 2k + 2)` facing each other.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PagePlacement {
    /// 0-based ordinal of the page in its partition's physical order.
    pub ordinal: usize,
    /// Whether the page belongs to a duplex-embossed sequence (two page
    /// sides per physical leaf).
    pub duplex: bool,
}

/// One laid-out page, as produced by the upstream paginator.
///
/// Records are immutable once registered; volume placement is tracked by
/// the scope engine, not on the record itself.
#[derive(Clone, Debug)]
pub struct PageRecord {
    page_id: usize,
    sequence_id: SequenceId,
    placement: PagePlacement,
    markers: SmallVec<[Marker; 4]>,
    /// Leading markers carried over from earlier pages; the content-only
    /// sub-list is the tail after this prefix.
    carried: usize,
}

impl PageRecord {
    /// Create a page record with an empty marker list.
    ///
    /// `page_id` is the dense 0-based index of the page within its
    /// partition.
    pub fn new(page_id: usize, sequence_id: SequenceId, placement: PagePlacement) -> Self {
        Self {
            page_id,
            sequence_id,
            placement,
            markers: SmallVec::new(),
            carried: 0,
        }
    }

    /// Append a marker carried over from an earlier page.
    ///
    /// Carried markers always precede content markers in search order.
    pub fn push_carried_marker(&mut self, marker: Marker) {
        self.markers.insert(self.carried, marker);
        self.carried += 1;
    }

    /// Append a marker that appears within this page's content region.
    pub fn push_marker(&mut self, marker: Marker) {
        self.markers.push(marker);
    }

    /// Dense index of the page within its partition.
    pub fn page_id(&self) -> usize {
        self.page_id
    }

    /// Sequence this page belongs to.
    pub fn sequence_id(&self) -> SequenceId {
        self.sequence_id
    }

    /// Physical placement facts for this page.
    pub fn placement(&self) -> PagePlacement {
        self.placement
    }

    /// Full marker list in search order.
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Markers that appear within the page's own content region.
    pub fn content_markers(&self) -> &[Marker] {
        &self.markers[self.carried..]
    }

    /// Whether the page `offset` sides away lies on the same physical
    /// leaf as this page.
    pub fn is_within_sheet_scope(&self, offset: i32) -> bool {
        match offset {
            0 => true,
            1 => self.placement.duplex && self.placement.ordinal % 2 == 0,
            -1 => self.placement.duplex && self.placement.ordinal % 2 == 1,
            _ => false,
        }
    }

    /// Whether this page and `other`, at the given offset, face each
    /// other as one visual spread when the book lies open.
    pub fn is_within_spread_scope(&self, offset: i32, other: Option<&PageRecord>) -> bool {
        let Some(other) = other else {
            return false;
        };
        let ordinal = self.placement.ordinal;
        match offset {
            1 => ordinal % 2 == 1 && other.placement.ordinal == ordinal + 1,
            -1 => ordinal % 2 == 0 && ordinal > 0 && other.placement.ordinal == ordinal - 1,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(page_id: usize, ordinal: usize, duplex: bool) -> PageRecord {
        PageRecord::new(
            page_id,
            SequenceId::new(Space::Body, 0),
            PagePlacement { ordinal, duplex },
        )
    }

    #[test]
    fn carried_markers_precede_content_markers() {
        let mut p = page(0, 0, true);
        p.push_marker(Marker::new("chapter", "Ch.2"));
        p.push_carried_marker(Marker::new("chapter", "Ch.1"));
        p.push_marker(Marker::new("section", "2.1"));

        let names: Vec<&str> = p.markers().iter().map(|m| m.value.as_str()).collect();
        assert_eq!(names, ["Ch.1", "Ch.2", "2.1"]);
        let content: Vec<&str> = p.content_markers().iter().map(|m| m.value.as_str()).collect();
        assert_eq!(content, ["Ch.2", "2.1"]);
    }

    #[test]
    fn sheet_scope_pairs_duplex_sides() {
        // Leaf 0 carries ordinals 0 and 1.
        assert!(page(0, 0, true).is_within_sheet_scope(1));
        assert!(!page(0, 0, true).is_within_sheet_scope(-1));
        assert!(page(1, 1, true).is_within_sheet_scope(-1));
        assert!(!page(1, 1, true).is_within_sheet_scope(1));
        assert!(page(0, 0, true).is_within_sheet_scope(0));
        assert!(!page(0, 0, true).is_within_sheet_scope(2));
    }

    #[test]
    fn simplex_pages_have_no_sheet_partner() {
        assert!(!page(0, 0, false).is_within_sheet_scope(1));
        assert!(!page(1, 1, false).is_within_sheet_scope(-1));
        assert!(page(0, 0, false).is_within_sheet_scope(0));
    }

    #[test]
    fn spread_scope_pairs_facing_pages() {
        let p1 = page(1, 1, true);
        let p2 = page(2, 2, true);
        assert!(p1.is_within_spread_scope(1, Some(&p2)));
        assert!(p2.is_within_spread_scope(-1, Some(&p1)));

        // Ordinals 0 and 1 share a leaf but not a spread.
        let p0 = page(0, 0, true);
        assert!(!p0.is_within_spread_scope(1, Some(&p1)));
        assert!(!p1.is_within_spread_scope(-1, Some(&p0)));

        // The first page has nothing facing it.
        assert!(!p0.is_within_spread_scope(-1, Some(&p1)));
        assert!(!p1.is_within_spread_scope(1, None));
    }
}
