// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! Fixed-universe bit sets of attribute and object indices, ordered lectically.

use bitvec::prelude::*;
use itertools::Itertools;
use std::cmp::Ordering;
use std::fmt::{Debug, Formatter};

/// A subset of `0..universe` for some fixed universe size.
///
/// The [`Ord`] implementation is the lectic order used throughout concept analysis:
/// `A < B` iff the smallest index in the symmetric difference of `A` and `B` belongs to `B`.
/// In particular every proper subset is lectically smaller than its supersets, the empty
/// set is the minimum and the full set is the maximum.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BitSet(BitVec);

/// A set of attribute indices, positions in [`crate::context::FormalContext::attributes`].
pub type AttrSet = BitSet;
/// A set of object indices, positions in [`crate::context::FormalContext::objects`].
pub type ObjSet = BitSet;

impl BitSet {
    /// The empty subset of `0..universe`.
    pub fn empty(universe: usize) -> Self {
        BitSet(BitVec::repeat(false, universe))
    }

    /// The full set `0..universe`.
    pub fn full(universe: usize) -> Self {
        BitSet(BitVec::repeat(true, universe))
    }

    /// The set `0..k` inside `0..universe`.
    pub fn prefix(universe: usize, k: usize) -> Self {
        let mut set = Self::empty(universe);
        for i in 0..k.min(universe) {
            set.insert(i);
        }
        set
    }

    /// Build a set from the given indices, which must all be below `universe`.
    pub fn from_indices<I: IntoIterator<Item = usize>>(universe: usize, indices: I) -> Self {
        let mut set = Self::empty(universe);
        for i in indices {
            set.insert(i);
        }
        set
    }

    /// The size of the universe this set lives in.
    pub fn universe(&self) -> usize {
        self.0.len()
    }

    /// The number of members.
    pub fn len(&self) -> usize {
        self.0.count_ones()
    }

    pub fn is_empty(&self) -> bool {
        self.0.not_any()
    }

    /// Whether this set is the whole universe.
    pub fn is_full(&self) -> bool {
        self.0.all()
    }

    pub fn contains(&self, i: usize) -> bool {
        self.0[i]
    }

    pub fn insert(&mut self, i: usize) {
        self.0.set(i, true);
    }

    pub fn remove(&mut self, i: usize) {
        self.0.set(i, false);
    }

    /// Iterate over the members in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter_ones()
    }

    pub fn is_subset(&self, other: &Self) -> bool {
        self.iter().all(|i| other.contains(i))
    }

    pub fn is_superset(&self, other: &Self) -> bool {
        other.is_subset(self)
    }

    pub fn is_disjoint(&self, other: &Self) -> bool {
        self.iter().all(|i| !other.contains(i))
    }

    pub fn intersect_with(&mut self, other: &Self) {
        debug_assert_eq!(self.universe(), other.universe());
        for i in other.0.iter_zeros() {
            self.0.set(i, false);
        }
    }

    pub fn union_with(&mut self, other: &Self) {
        debug_assert_eq!(self.universe(), other.universe());
        for i in other.iter() {
            self.0.set(i, true);
        }
    }

    pub fn difference_with(&mut self, other: &Self) {
        debug_assert_eq!(self.universe(), other.universe());
        for i in other.iter() {
            self.0.set(i, false);
        }
    }

    pub fn intersection(&self, other: &Self) -> Self {
        let mut out = self.clone();
        out.intersect_with(other);
        out
    }

    pub fn union(&self, other: &Self) -> Self {
        let mut out = self.clone();
        out.union_with(other);
        out
    }

    pub fn difference(&self, other: &Self) -> Self {
        let mut out = self.clone();
        out.difference_with(other);
        out
    }

    /// The smallest index on which the two sets disagree, if any.
    pub fn first_difference(&self, other: &Self) -> Option<usize> {
        (0..self.universe().min(other.universe())).find(|&i| self.0[i] != other.0[i])
    }
}

impl Ord for BitSet {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.first_difference(other) {
            Some(i) if other.contains(i) => Ordering::Less,
            Some(_) => Ordering::Greater,
            None => self.universe().cmp(&other.universe()),
        }
    }
}

impl PartialOrd for BitSet {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Debug for BitSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}}}", self.iter().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(indices: &[usize]) -> BitSet {
        BitSet::from_indices(5, indices.iter().copied())
    }

    #[test]
    fn test_set_algebra() {
        let a = set(&[0, 2, 3]);
        let b = set(&[2, 4]);

        assert_eq!(a.intersection(&b), set(&[2]));
        assert_eq!(a.union(&b), set(&[0, 2, 3, 4]));
        assert_eq!(a.difference(&b), set(&[0, 3]));
        assert!(set(&[2]).is_subset(&a));
        assert!(a.is_superset(&set(&[0, 3])));
        assert!(!a.is_subset(&b));
        assert!(set(&[1]).is_disjoint(&a));
        assert_eq!(a.len(), 3);
        assert!(BitSet::empty(5).is_empty());
        assert!(BitSet::full(5).is_full());
        assert_eq!(BitSet::prefix(5, 2), set(&[0, 1]));
        assert_eq!(a.iter().collect::<Vec<_>>(), vec![0, 2, 3]);
        assert_eq!(format!("{a:?}"), "{0, 2, 3}");
    }

    #[test]
    fn test_lectic_order() {
        // the smallest differing index decides
        assert!(set(&[]) < set(&[4]));
        assert!(set(&[4]) < set(&[3]));
        assert!(set(&[3]) < set(&[3, 4]));
        assert!(set(&[1, 4]) < set(&[0]));
        assert!(set(&[0, 1]) < BitSet::full(5));
        assert_eq!(set(&[1, 2]).cmp(&set(&[1, 2])), Ordering::Equal);

        // subsets always come first
        let sup = set(&[0, 2, 4]);
        for sub in [set(&[]), set(&[0]), set(&[2, 4]), set(&[0, 4])] {
            assert!(sub < sup, "{sub:?} should precede {sup:?}");
        }

        let mut sets = vec![set(&[0, 1]), set(&[2]), set(&[]), set(&[0]), set(&[1, 2])];
        sets.sort();
        assert_eq!(
            sets,
            vec![set(&[]), set(&[2]), set(&[1, 2]), set(&[0]), set(&[0, 1])]
        );
    }
}
