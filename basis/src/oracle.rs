// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! Oracles answering queries about an unknown target, as used by query learning.
//!
//! The target of basis learning is a closure system on the attributes, i.e., the set of
//! intents of some context. A membership oracle tells whether an attribute set is in the
//! target; an equivalence oracle tells whether a hypothesis, a set of implications, has
//! exactly the target as its models, and provides a counter-example otherwise.

use std::hash::Hash;

use rand::seq::IteratorRandom;
use rand::Rng;

use contexts::closure::simple_closure;
use contexts::context::{Element, FormalContext};
use contexts::hashmap::HashSet;
use contexts::implication::Implication;
use contexts::sets::AttrSet;

use crate::ganter;

/// The answer to an equivalence query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Equivalence {
    Equivalent,
    /// An attribute set on which the hypothesis and the target disagree.
    CounterExample(AttrSet),
}

pub trait MembershipOracle {
    /// Whether `set` belongs to the target.
    fn member(&mut self, set: &AttrSet) -> bool;
}

pub trait EquivalenceOracle {
    /// Whether the models of `hypothesis` are exactly the target.
    fn equivalent(&mut self, hypothesis: &[Implication]) -> Equivalence;
}

impl<F: FnMut(&AttrSet) -> bool> MembershipOracle for F {
    fn member(&mut self, set: &AttrSet) -> bool {
        self(set)
    }
}

impl<F: FnMut(&[Implication]) -> Equivalence> EquivalenceOracle for F {
    fn equivalent(&mut self, hypothesis: &[Implication]) -> Equivalence {
        self(hypothesis)
    }
}

/// A membership and an equivalence oracle answering together.
pub struct Oracles<M, E> {
    pub membership: M,
    pub equivalence: E,
}

impl<M: MembershipOracle, E> MembershipOracle for Oracles<M, E> {
    fn member(&mut self, set: &AttrSet) -> bool {
        self.membership.member(set)
    }
}

impl<M, E: EquivalenceOracle> EquivalenceOracle for Oracles<M, E> {
    fn equivalent(&mut self, hypothesis: &[Implication]) -> Equivalence {
        self.equivalence.equivalent(hypothesis)
    }
}

/// Exact oracles for the intents of a formal context.
///
/// Membership asks whether a set is an intent. Equivalence first looks for an intent
/// violating the hypothesis, and then for a set closed under the hypothesis that is not
/// an intent, derived from the pseudo-intents of the context.
pub struct ContextOracle<'a, O: Element, A: Element> {
    context: &'a FormalContext<O, A>,
    pseudo_intents: Vec<AttrSet>,
}

impl<'a, O: Element, A: Element> ContextOracle<'a, O, A> {
    pub fn new(context: &'a FormalContext<O, A>) -> Self {
        let pseudo_intents = ganter::canonical_basis(context)
            .into_iter()
            .map(|imp| imp.premise)
            .collect();
        ContextOracle {
            context,
            pseudo_intents,
        }
    }
}

impl<O: Element, A: Element> MembershipOracle for ContextOracle<'_, O, A> {
    fn member(&mut self, set: &AttrSet) -> bool {
        self.context.is_intent(set)
    }
}

impl<O: Element, A: Element> EquivalenceOracle for ContextOracle<'_, O, A> {
    fn equivalent(&mut self, hypothesis: &[Implication]) -> Equivalence {
        // an implication that does not hold is violated by the closure of its premise
        for imp in hypothesis {
            let closed = self.context.intent_closure(&imp.premise);
            if !imp.conclusion.is_subset(&closed) {
                log::debug!("positive counter-example {closed:?}");
                return Equivalence::CounterExample(closed);
            }
        }
        // all implications hold, so the hypothesis is complete iff it derives every
        // implication of the canonical basis
        for pseudo_intent in &self.pseudo_intents {
            let closed = simple_closure(pseudo_intent, hypothesis);
            if !self.context.is_intent(&closed) {
                log::debug!("negative counter-example {closed:?}");
                return Equivalence::CounterExample(closed);
            }
        }
        Equivalence::Equivalent
    }
}

/// The answer to a query against an explicit target set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Answer<T> {
    Yes,
    /// A witness for the negative answer.
    No(T),
}

/// Angluin's queries against a target set passed in explicitly. Negative answers come
/// with a witness chosen at random by the caller's generator.
pub struct SetQueries<T: Clone + Eq + Hash> {
    target: HashSet<T>,
}

impl<T: Clone + Eq + Hash> SetQueries<T> {
    pub fn new(target: HashSet<T>) -> Self {
        SetQueries { target }
    }

    pub fn target(&self) -> &HashSet<T> {
        &self.target
    }

    /// Whether `x` is in the target.
    pub fn member(&self, x: &T) -> bool {
        self.target.contains(x)
    }

    /// Whether `input` equals the target; the witness is in the symmetric difference.
    pub fn equivalent<R: Rng>(&self, input: &HashSet<T>, rng: &mut R) -> Answer<T> {
        Self::witness(input.symmetric_difference(&self.target), rng)
    }

    /// Whether `input` is a subset of the target; the witness is in `input` only.
    pub fn subset<R: Rng>(&self, input: &HashSet<T>, rng: &mut R) -> Answer<T> {
        Self::witness(input.difference(&self.target), rng)
    }

    /// Whether `input` is a superset of the target; the witness is in the target only.
    pub fn superset<R: Rng>(&self, input: &HashSet<T>, rng: &mut R) -> Answer<T> {
        Self::witness(self.target.difference(input), rng)
    }

    /// Whether `input` is disjoint from the target; the witness is in both.
    pub fn disjoint<R: Rng>(&self, input: &HashSet<T>, rng: &mut R) -> Answer<T> {
        Self::witness(input.intersection(&self.target), rng)
    }

    fn witness<'a, I, R>(candidates: I, rng: &mut R) -> Answer<T>
    where
        I: Iterator<Item = &'a T>,
        T: 'a,
        R: Rng,
    {
        match candidates.choose(rng) {
            None => Answer::Yes,
            Some(x) => Answer::No(x.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contexts::sets::BitSet;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn example() -> FormalContext<&'static str, &'static str> {
        FormalContext::from_relation([
            ("T1", "b"),
            ("T1", "d"),
            ("T2", "b"),
            ("T2", "e"),
            ("T3", "c"),
            ("T4", "a"),
            ("T4", "b"),
            ("T4", "c"),
            ("T5", "d"),
            ("T6", "b"),
            ("T6", "c"),
            ("T7", "e"),
        ])
    }

    #[test]
    fn test_context_membership() {
        let cxt = example();
        let mut oracle = ContextOracle::new(&cxt);
        assert!(oracle.member(&cxt.attr_set(&["b", "c"]).unwrap()));
        assert!(oracle.member(&cxt.no_attributes()));
        assert!(!oracle.member(&cxt.attr_set(&["a"]).unwrap()));
    }

    #[test]
    fn test_context_equivalence() {
        let cxt = example();
        let s = |atts: &[&'static str]| cxt.attr_set(atts).unwrap();
        let mut oracle = ContextOracle::new(&cxt);

        // the empty hypothesis misses the non-intent {a}
        assert_eq!(
            oracle.equivalent(&[]),
            Equivalence::CounterExample(s(&["a"]))
        );

        // b => c does not hold, and the intent {b} shows it
        let wrong = [Implication::new(s(&["b"]), s(&["b", "c"]))];
        assert_eq!(
            oracle.equivalent(&wrong),
            Equivalence::CounterExample(s(&["b"]))
        );

        // a => b, c alone still misses {c, d}
        let partial = [Implication::new(s(&["a"]), s(&["a", "b", "c"]))];
        assert_eq!(
            oracle.equivalent(&partial),
            Equivalence::CounterExample(s(&["c", "d"]))
        );

        let basis = ganter::canonical_basis(&cxt);
        assert_eq!(oracle.equivalent(&basis), Equivalence::Equivalent);
    }

    #[test]
    fn test_combined_oracles() {
        let full = BitSet::full(2);
        let mut oracles = Oracles {
            membership: |set: &AttrSet| set.is_empty() || set.is_full(),
            equivalence: |_: &[Implication]| Equivalence::CounterExample(BitSet::full(2)),
        };
        assert!(oracles.member(&full));
        assert!(!oracles.member(&BitSet::from_indices(2, [0])));
        assert_eq!(oracles.equivalent(&[]), Equivalence::CounterExample(full));
    }

    #[test]
    fn test_set_queries() {
        let mut rng = StdRng::seed_from_u64(0);
        let queries = SetQueries::new([1, 2, 3].into_iter().collect());
        let set = |xs: &[i32]| xs.iter().copied().collect::<HashSet<i32>>();

        assert!(queries.member(&2));
        assert!(!queries.member(&4));
        assert_eq!(queries.equivalent(&set(&[3, 2, 1]), &mut rng), Answer::Yes);
        assert_eq!(queries.equivalent(&set(&[1, 2]), &mut rng), Answer::No(3));
        assert_eq!(queries.subset(&set(&[1, 2]), &mut rng), Answer::Yes);
        assert_eq!(queries.subset(&set(&[1, 5]), &mut rng), Answer::No(5));
        assert_eq!(queries.superset(&set(&[1, 2, 3, 4]), &mut rng), Answer::Yes);
        assert_eq!(queries.superset(&set(&[1, 3]), &mut rng), Answer::No(2));
        assert_eq!(queries.disjoint(&set(&[4, 5]), &mut rng), Answer::Yes);
        assert_eq!(queries.disjoint(&set(&[3, 4]), &mut rng), Answer::No(3));

        match queries.equivalent(&set(&[1, 4, 5]), &mut rng) {
            Answer::No(x) => assert!([2, 3, 4, 5].contains(&x)),
            Answer::Yes => panic!("sets differ"),
        }
    }
}
