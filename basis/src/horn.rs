// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! Angluin's HORN1 algorithm, learning a Horn theory from membership and equivalence
//! queries. The learned theory is a set of implications whose models are the target
//! closure system.

use contexts::implication::Implication;
use contexts::sets::{AttrSet, BitSet};

use crate::oracle::{Equivalence, EquivalenceOracle, MembershipOracle};

/// The outcome of a learning run.
#[derive(Clone, Debug)]
pub struct Learned {
    pub hypothesis: Vec<Implication>,
    /// The number of equivalence queries asked.
    pub queries: usize,
    /// Whether the last equivalence query was answered positively. This is false if the
    /// query limit was hit first.
    pub converged: bool,
}

/// The index of the first implication `A => B` in `hypothesis` with `A` not contained in
/// `counter_example` such that `counter_example ∩ A` is not a member of the target.
pub fn find_special_implication<M: MembershipOracle + ?Sized>(
    hypothesis: &[Implication],
    counter_example: &AttrSet,
    oracle: &mut M,
) -> Option<usize> {
    hypothesis.iter().position(|imp| {
        !imp.premise.is_subset(counter_example)
            && !oracle.member(&counter_example.intersection(&imp.premise))
    })
}

/// Learn the implications over `attributes` attributes holding in the target of `oracle`.
///
/// Starting from the empty hypothesis, each counter-example either violates some
/// implications, whose conclusions are then shrunk to the counter-example, or is
/// a non-model, which refines the first special implication or adds a new one with the
/// counter-example as premise.
pub fn horn1<O>(attributes: usize, oracle: &mut O, max_queries: Option<usize>) -> Learned
where
    O: MembershipOracle + EquivalenceOracle + ?Sized,
{
    let full = BitSet::full(attributes);
    let mut hypothesis: Vec<Implication> = vec![];
    let mut queries = 0;

    loop {
        if matches!(max_queries, Some(max) if queries >= max) {
            log::debug!("giving up after {queries} equivalence queries");
            return Learned {
                hypothesis,
                queries,
                converged: false,
            };
        }
        queries += 1;
        let counter_example = match oracle.equivalent(&hypothesis) {
            Equivalence::Equivalent => break,
            Equivalence::CounterExample(c) => c,
        };
        log::trace!("counter-example {counter_example:?}");

        let mut violated = false;
        for imp in hypothesis.iter_mut() {
            if !imp.is_respected(&counter_example) {
                imp.conclusion.intersect_with(&counter_example);
                violated = true;
            }
        }
        if violated {
            continue;
        }

        match find_special_implication(&hypothesis, &counter_example, &mut *oracle) {
            Some(k) => {
                let imp = &mut hypothesis[k];
                let premise = counter_example.intersection(&imp.premise);
                let lost = imp.premise.difference(&counter_example);
                let conclusion = imp.conclusion.union(&lost);
                *imp = Implication::new(premise, conclusion);
            }
            None => hypothesis.push(Implication::new(counter_example, full.clone())),
        }
    }

    log::info!(
        "learned {} implications with {queries} equivalence queries",
        hypothesis.len()
    );
    Learned {
        hypothesis,
        queries,
        converged: true,
    }
}
