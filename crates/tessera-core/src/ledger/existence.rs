//! Derived existence view over the issued id range.

use serde::{Deserialize, Serialize};

/// Snapshot answering "has unit N ever been issued".
///
/// With no destruction path, existence is a pure range check over the
/// sequentially assigned ids. A system with a burn path would additionally
/// subtract a destroyed-set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistenceIndex {
    start_id: u64,
    total_issued: u64,
}

impl ExistenceIndex {
    /// Creates an index over `total_issued` units starting at `start_id`.
    #[must_use]
    pub const fn new(start_id: u64, total_issued: u64) -> Self {
        Self {
            start_id,
            total_issued,
        }
    }

    /// Returns `true` iff the unit id falls inside the issued range.
    #[must_use]
    pub const fn exists(&self, unit_id: u64) -> bool {
        unit_id >= self.start_id && unit_id - self.start_id < self.total_issued
    }

    /// The id the next issued unit will receive.
    #[must_use]
    pub const fn next_unit_id(&self) -> u64 {
        self.start_id + self.total_issued
    }

    /// Units issued so far.
    #[must_use]
    pub const fn total_issued(&self) -> u64 {
        self.total_issued
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exists_is_a_pure_range_check() {
        let index = ExistenceIndex::new(100, 5);

        assert!(!index.exists(99));
        assert!(index.exists(100));
        assert!(index.exists(104));
        assert!(!index.exists(105));
        assert_eq!(index.next_unit_id(), 105);
    }

    #[test]
    fn empty_index_has_no_units() {
        let index = ExistenceIndex::new(0, 0);

        assert!(!index.exists(0));
        assert_eq!(index.next_unit_id(), 0);
    }
}
