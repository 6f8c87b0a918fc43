//! Namespace Identity Maps
//!
//! An `IdentityMap` translates ids of one user namespace into ids of its
//! parent and back. It is a short list of range pairs:
//!
//! ```text
//!   local                       parent
//!   [0 .. 10000)        ──►     [100000 .. 110000)
//!   [65534 .. 65535)    ──►     [65534 .. 65535)
//! ```
//!
//! # Design
//! - Ranges are validated and sorted once, at namespace creation
//! - Two sorted views: by local start (forward) and by parent start (reverse)
//! - Lookups are a binary search over one view: O(log n), no allocation
//! - The map is never mutated after `build`, so any number of readers may
//!   share it without locking
//!
//! Memory is proportional to the number of configured ranges, not to the
//! size of the id space.

use alloc::vec::Vec;
use core::fmt;

use log::trace;

use super::id::NO_ID;
use crate::error::{AuthError, Result};

/// Maximum number of range pairs in one map (the Linux extent limit).
pub const MAX_EXTENTS: usize = 340;

/// A half-open interval `[start, start + len)` of ids.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct IdRange {
    start: u32,
    len: u32,
}

impl IdRange {
    /// Create a range. Returns `None` for zero length or if the range would
    /// reach the invalid id.
    pub const fn new(start: u32, len: u32) -> Option<Self> {
        if len == 0 || start as u64 + len as u64 > NO_ID as u64 {
            None
        } else {
            Some(Self { start, len })
        }
    }

    /// First id of the range.
    #[inline]
    pub const fn start(self) -> u32 {
        self.start
    }

    /// Number of ids in the range. Never zero.
    #[inline]
    pub const fn len(self) -> u32 {
        self.len
    }

    /// Exclusive end. Never exceeds `u32::MAX`.
    #[inline]
    pub const fn end(self) -> u32 {
        self.start + self.len
    }

    /// Whether `id` lies inside the range.
    #[inline]
    pub const fn contains(self, id: u32) -> bool {
        id >= self.start && id - self.start < self.len
    }

    /// Whether the two ranges share at least one id.
    #[inline]
    pub const fn overlaps(self, other: IdRange) -> bool {
        self.start < other.end() && other.start < self.end()
    }
}

/// One mapping: `len` consecutive local ids starting at `local` correspond to
/// `len` consecutive parent ids starting at `parent`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct IdRangePair {
    pub local: u32,
    pub parent: u32,
    pub len: u32,
}

impl IdRangePair {
    /// Pair `len` local ids starting at `local` with parent ids starting at
    /// `parent`. Validation happens in [`IdentityMap::build`].
    pub const fn new(local: u32, parent: u32, len: u32) -> Self {
        Self { local, parent, len }
    }

    /// The local-side interval, if the pair is well formed.
    #[inline]
    pub const fn local_range(&self) -> Option<IdRange> {
        IdRange::new(self.local, self.len)
    }

    /// The parent-side interval, if the pair is well formed.
    #[inline]
    pub const fn parent_range(&self) -> Option<IdRange> {
        IdRange::new(self.parent, self.len)
    }

    // The span helpers are only used on pairs that passed `build`.
    #[inline]
    fn local_span(&self) -> IdRange {
        IdRange {
            start: self.local,
            len: self.len,
        }
    }

    #[inline]
    fn parent_span(&self) -> IdRange {
        IdRange {
            start: self.parent,
            len: self.len,
        }
    }

    #[inline]
    fn to_parent(&self, local: u32) -> Option<u32> {
        self.local_span()
            .contains(local)
            .then(|| self.parent + (local - self.local))
    }

    #[inline]
    fn to_local(&self, parent: u32) -> Option<u32> {
        self.parent_span()
            .contains(parent)
            .then(|| self.local + (parent - self.parent))
    }
}

impl fmt::Display for IdRangePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}) -> [{}, {})",
            self.local,
            self.local as u64 + self.len as u64,
            self.parent,
            self.parent as u64 + self.len as u64
        )
    }
}

/// An immutable set of non-overlapping id range pairs.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct IdentityMap {
    /// Pairs sorted by local start.
    by_local: Vec<IdRangePair>,
    /// The same pairs sorted by parent start.
    by_parent: Vec<IdRangePair>,
}

impl IdentityMap {
    /// Build a map from a list of range pairs.
    ///
    /// # Errors
    /// - `EmptyRange` if any pair has length zero
    /// - `RangeOverflow` if any interval would reach the invalid id
    /// - `TooManyRanges` if more than [`MAX_EXTENTS`] pairs are given
    /// - `OverlappingRange` if two local or two parent intervals overlap
    pub fn build(ranges: &[IdRangePair]) -> Result<Self> {
        if ranges.len() > MAX_EXTENTS {
            return Err(AuthError::TooManyRanges(ranges.len()));
        }

        for pair in ranges {
            if pair.len == 0 {
                return Err(AuthError::EmptyRange);
            }
            if pair.local_range().is_none() || pair.parent_range().is_none() {
                return Err(AuthError::RangeOverflow(*pair));
            }
        }

        let mut by_local = ranges.to_vec();
        by_local.sort_unstable_by_key(|p| p.local);
        for w in by_local.windows(2) {
            if w[0].local_span().overlaps(w[1].local_span()) {
                return Err(AuthError::OverlappingRange {
                    first: w[0],
                    second: w[1],
                });
            }
        }

        let mut by_parent = by_local.clone();
        by_parent.sort_unstable_by_key(|p| p.parent);
        for w in by_parent.windows(2) {
            if w[0].parent_span().overlaps(w[1].parent_span()) {
                return Err(AuthError::OverlappingRange {
                    first: w[0],
                    second: w[1],
                });
            }
        }

        trace!("identity map built with {} range(s)", by_local.len());
        Ok(Self {
            by_local,
            by_parent,
        })
    }

    /// The map of the root namespace: every valid id maps to itself.
    pub fn identity() -> Self {
        let all = IdRangePair::new(0, 0, NO_ID);
        Self {
            by_local: alloc::vec![all],
            by_parent: alloc::vec![all],
        }
    }

    /// Translate a local id to the parent namespace.
    ///
    /// Returns `None` if no range covers `local`.
    #[inline]
    pub fn translate(&self, local: u32) -> Option<u32> {
        let idx = self.by_local.partition_point(|p| p.local <= local);
        self.by_local[..idx].last()?.to_parent(local)
    }

    /// Translate a parent id back into this namespace.
    ///
    /// Returns `None` if no range covers `parent`.
    #[inline]
    pub fn reverse_translate(&self, parent: u32) -> Option<u32> {
        let idx = self.by_parent.partition_point(|p| p.parent <= parent);
        self.by_parent[..idx].last()?.to_local(parent)
    }

    /// Whether every id in `[start, start + len)` has a local-side mapping.
    ///
    /// The interval may span several adjacent ranges.
    pub fn covers(&self, start: u32, len: u32) -> bool {
        let end = start as u64 + len as u64;
        let mut cur = start as u64;
        while cur < end {
            // cur < end <= u32::MAX + 1, and cur < u32::MAX + 1 here.
            let id = cur as u32;
            let idx = self.by_local.partition_point(|p| p.local <= id);
            match self.by_local[..idx].last() {
                Some(pair) if pair.local_span().contains(id) => {
                    cur = pair.local_span().end() as u64
                }
                _ => return false,
            }
        }
        true
    }

    /// The range pairs, sorted by local start.
    #[inline]
    pub fn ranges(&self) -> &[IdRangePair] {
        &self.by_local
    }

    /// Number of range pairs.
    #[inline]
    pub fn len(&self) -> usize {
        self.by_local.len()
    }

    /// Whether the map translates nothing.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.by_local.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(u32, u32, u32)]) -> Result<IdentityMap> {
        let pairs: Vec<_> = pairs
            .iter()
            .map(|&(l, p, n)| IdRangePair::new(l, p, n))
            .collect();
        IdentityMap::build(&pairs)
    }

    #[test]
    fn test_range_helpers() {
        let a = IdRange::new(10, 5).unwrap();
        assert_eq!((a.start(), a.len(), a.end()), (10, 5, 15));
        assert!(a.contains(10));
        assert!(a.contains(14));
        assert!(!a.contains(15));
        assert!(!a.contains(9));

        assert!(a.overlaps(IdRange::new(14, 1).unwrap()));
        assert!(a.overlaps(IdRange::new(0, 100).unwrap()));
        assert!(!a.overlaps(IdRange::new(15, 3).unwrap()));
        assert!(!a.overlaps(IdRange::new(5, 5).unwrap()));

        assert_eq!(IdRange::new(0, 0), None);
        assert_eq!(IdRange::new(u32::MAX - 1, 2), None);
        assert_eq!(IdRange::new(0, u32::MAX).map(IdRange::end), Some(u32::MAX));
    }

    #[test]
    fn test_round_trip() {
        let m = map(&[(0, 1000, 100)]).unwrap();
        assert_eq!(m.translate(50), Some(1050));
        assert_eq!(m.reverse_translate(1050), Some(50));
        assert_eq!(m.translate(150), None);
        assert_eq!(m.reverse_translate(999), None);
        assert_eq!(m.reverse_translate(1100), None);
    }

    #[test]
    fn test_range_edges() {
        let m = map(&[(10, 500, 5)]).unwrap();
        assert_eq!(m.translate(9), None);
        assert_eq!(m.translate(10), Some(500));
        assert_eq!(m.translate(14), Some(504));
        assert_eq!(m.translate(15), None);
    }

    #[test]
    fn test_unsorted_input_and_crossed_parents() {
        // Local order and parent order disagree.
        let m = map(&[(100, 0, 10), (0, 5000, 10), (50, 200, 1)]).unwrap();
        assert_eq!(m.translate(105), Some(5));
        assert_eq!(m.translate(3), Some(5003));
        assert_eq!(m.translate(50), Some(200));
        assert_eq!(m.reverse_translate(5), Some(105));
        assert_eq!(m.reverse_translate(5009), Some(9));
        assert_eq!(m.reverse_translate(200), Some(50));
        assert_eq!(m.ranges()[0].local, 0);
    }

    #[test]
    fn test_adjacent_ranges_do_not_overlap() {
        assert!(map(&[(0, 100, 10), (10, 110, 10)]).is_ok());
    }

    #[test]
    fn test_local_overlap_rejected() {
        let err = map(&[(0, 100, 10), (9, 500, 10)]).unwrap_err();
        assert!(matches!(err, AuthError::OverlappingRange { .. }));
    }

    #[test]
    fn test_parent_overlap_rejected() {
        let err = map(&[(0, 100, 10), (50, 105, 10)]).unwrap_err();
        assert!(matches!(err, AuthError::OverlappingRange { .. }));
    }

    #[test]
    fn test_malformed_ranges_rejected() {
        assert_eq!(map(&[(0, 0, 0)]).unwrap_err(), AuthError::EmptyRange);
        assert!(matches!(
            map(&[(u32::MAX - 1, 0, 2)]).unwrap_err(),
            AuthError::RangeOverflow(_)
        ));
        assert!(matches!(
            map(&[(0, u32::MAX, 1)]).unwrap_err(),
            AuthError::RangeOverflow(_)
        ));
    }

    #[test]
    fn test_extent_limit() {
        let pairs: Vec<_> = (0..=MAX_EXTENTS as u32)
            .map(|i| IdRangePair::new(i, i, 1))
            .collect();
        assert_eq!(
            IdentityMap::build(&pairs).unwrap_err(),
            AuthError::TooManyRanges(MAX_EXTENTS + 1)
        );
        assert!(IdentityMap::build(&pairs[..MAX_EXTENTS]).is_ok());
    }

    #[test]
    fn test_empty_map_translates_nothing() {
        let m = IdentityMap::build(&[]).unwrap();
        assert!(m.is_empty());
        assert_eq!(m.translate(0), None);
        assert_eq!(m.reverse_translate(0), None);
    }

    #[test]
    fn test_identity_map() {
        let m = IdentityMap::identity();
        assert_eq!(m.translate(0), Some(0));
        assert_eq!(m.translate(u32::MAX - 1), Some(u32::MAX - 1));
        assert_eq!(m.translate(u32::MAX), None);
        assert_eq!(m.reverse_translate(12345), Some(12345));
    }

    #[test]
    fn test_covers_spans_adjacent_ranges() {
        let m = map(&[(0, 1000, 10), (10, 5000, 10), (30, 9000, 5)]).unwrap();
        assert!(m.covers(0, 20));
        assert!(m.covers(5, 10));
        assert!(!m.covers(15, 10));
        assert!(m.covers(30, 5));
        assert!(!m.covers(30, 6));
        assert!(IdentityMap::identity().covers(0, u32::MAX));
    }
}
