//! The attested validator set.
//!
//! An ordered collection of signer identities with O(1) membership checks
//! and stable paged enumeration. The set itself is a plain container; the
//! engine enforces the administrative-mode gate before mutating it.

use std::collections::HashSet;

use tubelink_types::{Address, Result, TubeError};

/// Ordered, duplicate-free collection of validator identities.
#[derive(Debug, Default)]
pub struct ValidatorSet {
    /// Insertion-ordered members, for stable enumeration.
    ordered: Vec<Address>,
    /// Membership index.
    members: HashSet<Address>,
}

impl ValidatorSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a validator.
    ///
    /// # Errors
    /// Returns [`TubeError::AlreadyPresent`] if the identity is a member.
    pub fn add(&mut self, validator: Address) -> Result<()> {
        if !self.members.insert(validator) {
            return Err(TubeError::AlreadyPresent(validator));
        }
        self.ordered.push(validator);
        Ok(())
    }

    /// Remove a validator, preserving the order of the remaining members.
    ///
    /// # Errors
    /// Returns [`TubeError::NotPresent`] if the identity is not a member.
    pub fn remove(&mut self, validator: Address) -> Result<()> {
        if !self.members.remove(&validator) {
            return Err(TubeError::NotPresent(validator));
        }
        self.ordered.retain(|member| *member != validator);
        Ok(())
    }

    /// Whether `validator` is currently a member.
    #[must_use]
    pub fn contains(&self, validator: &Address) -> bool {
        self.members.contains(validator)
    }

    /// Up to `limit` members starting at `offset` in enumeration order,
    /// plus the total member count. Never fails: an offset past the end
    /// yields an empty slice.
    #[must_use]
    pub fn list(&self, offset: usize, limit: usize) -> (Vec<Address>, usize) {
        let total = self.ordered.len();
        let start = offset.min(total);
        let end = start.saturating_add(limit).min(total);
        (self.ordered[start..end].to_vec(), total)
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Minimum number of distinct attesting validators required.
    ///
    /// Strict two-thirds: a bundle satisfies quorum iff
    /// `3 * distinct > 2 * len`, i.e. threshold = `2n/3 + 1`. With a set of
    /// three this requires all three, matching the original boundary
    /// behavior (1-of-3 insufficient, 3-of-3 sufficient).
    #[must_use]
    pub fn quorum_threshold(&self) -> usize {
        self.ordered.len() * 2 / 3 + 1
    }

    /// Whether `distinct` attesting validators satisfy quorum.
    #[must_use]
    pub fn satisfies_quorum(&self, distinct: usize) -> bool {
        distinct >= self.quorum_threshold()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address([byte; 20])
    }

    #[test]
    fn add_and_contains() {
        let mut set = ValidatorSet::new();
        set.add(addr(1)).unwrap();
        assert!(set.contains(&addr(1)));
        assert!(!set.contains(&addr(2)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn duplicate_add_rejected() {
        let mut set = ValidatorSet::new();
        set.add(addr(1)).unwrap();
        let err = set.add(addr(1)).unwrap_err();
        assert!(matches!(err, TubeError::AlreadyPresent(a) if a == addr(1)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn remove_absent_rejected() {
        let mut set = ValidatorSet::new();
        let err = set.remove(addr(1)).unwrap_err();
        assert!(matches!(err, TubeError::NotPresent(a) if a == addr(1)));
    }

    #[test]
    fn remove_preserves_order() {
        let mut set = ValidatorSet::new();
        for b in 1..=4 {
            set.add(addr(b)).unwrap();
        }
        set.remove(addr(2)).unwrap();
        let (page, total) = set.list(0, 10);
        assert_eq!(total, 3);
        assert_eq!(page, vec![addr(1), addr(3), addr(4)]);
    }

    #[test]
    fn paged_enumeration() {
        let mut set = ValidatorSet::new();
        for b in 1..=5 {
            set.add(addr(b)).unwrap();
        }

        let (page, total) = set.list(1, 2);
        assert_eq!(total, 5);
        assert_eq!(page, vec![addr(2), addr(3)]);

        // Offset past the end: empty slice, count still reported.
        let (page, total) = set.list(10, 2);
        assert_eq!(total, 5);
        assert!(page.is_empty());

        // Limit past the end is clamped.
        let (page, _) = set.list(4, 100);
        assert_eq!(page, vec![addr(5)]);
    }

    #[test]
    fn quorum_threshold_two_thirds() {
        let mut set = ValidatorSet::new();
        assert_eq!(set.quorum_threshold(), 1);

        for b in 1..=3 {
            set.add(addr(b)).unwrap();
        }
        // n = 3 requires all three.
        assert_eq!(set.quorum_threshold(), 3);
        assert!(!set.satisfies_quorum(1));
        assert!(!set.satisfies_quorum(2));
        assert!(set.satisfies_quorum(3));

        set.add(addr(4)).unwrap();
        // n = 4 requires 3.
        assert_eq!(set.quorum_threshold(), 3);
        assert!(set.satisfies_quorum(3));

        for b in 5..=6 {
            set.add(addr(b)).unwrap();
        }
        // n = 6 requires 5 (strictly more than two thirds).
        assert_eq!(set.quorum_threshold(), 5);
        assert!(!set.satisfies_quorum(4));
        assert!(set.satisfies_quorum(5));
    }
}
