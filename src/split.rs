//! Even-size volume splitting.
//!
//! [`VolumePlan`] is the pure arithmetic: given a sheet total, a
//! per-volume maximum and an extra-volume offset, it distributes sheets
//! as evenly as possible. [`VolumeSplitter`] is the adaptive controller
//! that drives plans across the host's fit/retry loop, memoizing every
//! attempted configuration so the loop cannot cycle.

extern crate alloc;

use alloc::collections::BTreeMap;

use crate::error::PaginationError;

/// A candidate volume configuration: how many volumes to produce for a
/// sheet total and how many sheets each should receive.
///
/// Plans are immutable values. Equality, ordering and hashing derive
/// solely from the (sheets, max_volume_size, volume_offset) triple, so
/// structurally equal plans collapse to one key in the splitter's memo.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VolumePlan {
    sheets: usize,
    max_volume_size: usize,
    volume_offset: usize,
}

impl VolumePlan {
    /// Build a plan for `sheets` total sheets, at most `max_volume_size`
    /// sheets per volume, and `volume_offset` extra volumes above the
    /// size-driven minimum. A zero maximum is treated as 1.
    pub fn new(sheets: usize, max_volume_size: usize, volume_offset: usize) -> Self {
        Self {
            sheets,
            max_volume_size: max_volume_size.max(1),
            volume_offset,
        }
    }

    /// Total sheets this plan distributes.
    pub fn sheets(&self) -> usize {
        self.sheets
    }

    /// Extra volumes above the size-driven minimum.
    pub fn volume_offset(&self) -> usize {
        self.volume_offset
    }

    /// Number of volumes the sheets are distributed across.
    pub fn volume_count(&self) -> usize {
        (self.sheets.div_ceil(self.max_volume_size) + self.volume_offset).max(1)
    }

    /// Target sheet count for the 0-based volume `index`.
    ///
    /// Sheets are distributed as evenly as possible: the first
    /// `sheets % volume_count` volumes receive one sheet more than the
    /// rest. Valid for `index < volume_count()`.
    pub fn sheets_in_volume(&self, index: usize) -> usize {
        let count = self.volume_count();
        let base = self.sheets / count;
        if index < self.sheets % count {
            base + 1
        } else {
            base
        }
    }
}

/// Adaptive volume splitter preferring evenly sized volumes.
///
/// One splitter serves one volume group and is driven by that group's
/// sequential fit/retry loop: after each attempt the host reports the
/// total and leftover sheet counts through
/// [`update_sheet_count`](Self::update_sheet_count), and the splitter
/// advances to its next proposal. Raising the volume offset trades
/// fewer, fuller volumes for more, smaller ones until the content fits.
///
/// Instances must not be shared across volume groups or threads.
#[derive(Clone, Debug)]
pub struct VolumeSplitter {
    max_volume_size: usize,
    plan: Option<VolumePlan>,
    /// Extra volumes on top of the size-driven minimum, adjusted up and
    /// down across iterations.
    volume_offset: usize,
    /// Outcome per previously proposed plan: did the content fit?
    /// Consulted before re-adopting any configuration, which bounds the
    /// iteration count by the feasible offset range.
    attempted: BTreeMap<VolumePlan, bool>,
}

impl VolumeSplitter {
    /// Create a splitter with a per-volume sheet maximum.
    pub fn new(max_volume_size: usize) -> Self {
        Self {
            max_volume_size,
            plan: None,
            volume_offset: 0,
            attempted: BTreeMap::new(),
        }
    }

    /// Record the outcome of the previous fit attempt and advance to the
    /// next proposal.
    ///
    /// `sheets` is the attempt's total sheet count, including leftover
    /// sheets and overhead content; `remaining` is how many sheets did
    /// not fit (0 means the content fit completely). The first call
    /// seeds the initial proposal. A non-fitting attempt reporting
    /// `remaining >= sheets` indicates a broken upstream invariant and
    /// aborts the layout attempt.
    pub fn update_sheet_count(
        &mut self,
        sheets: usize,
        remaining: usize,
    ) -> Result<(), PaginationError> {
        let Some(prior) = self.plan.take() else {
            self.plan = Some(VolumePlan::new(sheets, self.max_volume_size, self.volume_offset));
            return Ok(());
        };
        let fit = remaining == 0;
        self.attempted.insert(prior, fit);
        if fit {
            self.plan = Some(self.shrink_or_hold(sheets, prior));
            return Ok(());
        }
        if remaining >= sheets {
            self.plan = Some(prior);
            return Err(PaginationError::Internal(
                "leftover sheets must be fewer than the total sheet count",
            ));
        }
        self.plan = Some(self.grow(sheets, remaining, prior));
        Ok(())
    }

    /// The content fit: try to win a volume back, or refresh the plan
    /// for the reported sheet count.
    fn shrink_or_hold(&mut self, sheets: usize, prior: VolumePlan) -> VolumePlan {
        if self.volume_offset > 0 {
            let candidate =
                VolumePlan::new(sheets, self.max_volume_size, self.volume_offset - 1);
            if !self.attempted.contains_key(&candidate) {
                self.volume_offset -= 1;
                log::debug!(
                    "content fits; retrying with {} volumes",
                    candidate.volume_count()
                );
                return candidate;
            }
        }
        let refreshed = VolumePlan::new(sheets, self.max_volume_size, self.volume_offset);
        if self.attempted.contains_key(&refreshed) {
            prior
        } else {
            refreshed
        }
    }

    /// The content did not fit: estimate how many volumes to add, or
    /// fall back to a known-good or strictly new configuration.
    fn grow(&mut self, sheets: usize, remaining: usize, prior: VolumePlan) -> VolumePlan {
        let refreshed = VolumePlan::new(sheets, self.max_volume_size, self.volume_offset);
        // Scale the prior volume count by the share that did not fit,
        // discount the growth already explained by the sheet-count
        // change at the same offset, and damp so successive estimates
        // do not overshoot.
        let mut estimate =
            (prior.volume_count() as f64 * remaining as f64) / (sheets - remaining) as f64;
        estimate -= refreshed.volume_count() as f64 - prior.volume_count() as f64;
        estimate *= 0.75;
        let increment = estimate.floor() as i64;
        if increment > 0 {
            self.volume_offset += increment as usize;
            let plan = VolumePlan::new(sheets, self.max_volume_size, self.volume_offset);
            log::debug!(
                "{} sheets left over; raising to {} volumes",
                remaining,
                plan.volume_count()
            );
            return plan;
        }
        match self.attempted.get(&refreshed).copied() {
            // New configuration, or one that fit before: worth (re)trying.
            None | Some(true) => refreshed,
            Some(false) => {
                self.volume_offset += 1;
                log::warn!(
                    "{} sheets left over; forcing an extra volume to make progress",
                    remaining
                );
                VolumePlan::new(sheets, self.max_volume_size, self.volume_offset)
            }
        }
    }

    /// The current proposal, if at least one update has been applied.
    pub fn plan(&self) -> Option<&VolumePlan> {
        self.plan.as_ref()
    }

    /// Volume count of the current proposal, or 0 before the first
    /// update.
    pub fn volume_count(&self) -> usize {
        self.plan.map_or(0, |plan| plan.volume_count())
    }

    /// Target sheets for volume `index` under the current proposal, or 0
    /// before the first update.
    pub fn sheets_in_volume(&self, index: usize) -> usize {
        self.plan.map_or(0, |plan| plan.sheets_in_volume(index))
    }
}
