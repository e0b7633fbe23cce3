// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! Probably approximately correct learning of implication bases.
//!
//! The learner is HORN1 with the exact equivalence oracle replaced by random sampling:
//! the `i`-th equivalence query draws `⌈(i - log₂ δ) / ε⌉` uniformly random attribute sets
//! and reports the first one on which the membership oracle and the hypothesis disagree.
//! With probability at least `1 - δ` the result then errs on at most an `ε` fraction of
//! attribute sets.

use rand::Rng;

use contexts::implication::{respects_all, Implication};
use contexts::sets::{AttrSet, BitSet};

use crate::horn::{horn1, Learned};
use crate::oracle::{Equivalence, EquivalenceOracle, MembershipOracle};
use crate::BasisError;

/// Check that `0 < ε ≤ 1` and `0 < δ < 1`.
pub fn validate_parameters(epsilon: f64, delta: f64) -> Result<(), BasisError> {
    if !(epsilon > 0.0 && epsilon <= 1.0) {
        return Err(BasisError::InvalidParameter {
            name: "epsilon",
            value: epsilon,
            expected: "0 < epsilon <= 1",
        });
    }
    if !(delta > 0.0 && delta < 1.0) {
        return Err(BasisError::InvalidParameter {
            name: "delta",
            value: delta,
            expected: "0 < delta < 1",
        });
    }
    Ok(())
}

/// The number of samples drawn by the `i`-th equivalence query.
pub fn sample_bound(i: usize, epsilon: f64, delta: f64) -> Result<usize, BasisError> {
    validate_parameters(epsilon, delta)?;
    Ok(samples(i, epsilon, delta))
}

// callers validate the parameters first; a zero epsilon saturates to usize::MAX
fn samples(i: usize, epsilon: f64, delta: f64) -> usize {
    ((i as f64 - delta.log2()) / epsilon).ceil() as usize
}

fn random_set<R: Rng + ?Sized>(attributes: usize, rng: &mut R) -> AttrSet {
    BitSet::from_indices(attributes, (0..attributes).filter(|_| rng.gen_bool(0.5)))
}

/// Approximate equivalence query number `i`: sample random attribute sets and return
/// the first whose membership differs from whether it respects `hypothesis`.
pub fn approx_equivalent<M, R>(
    hypothesis: &[Implication],
    member: &mut M,
    attributes: usize,
    i: usize,
    epsilon: f64,
    delta: f64,
    rng: &mut R,
) -> Result<Equivalence, BasisError>
where
    M: MembershipOracle + ?Sized,
    R: Rng + ?Sized,
{
    validate_parameters(epsilon, delta)?;
    let samples = samples(i, epsilon, delta);
    Ok(sample_equivalent(hypothesis, member, attributes, samples, rng))
}

fn sample_equivalent<M, R>(
    hypothesis: &[Implication],
    member: &mut M,
    attributes: usize,
    samples: usize,
    rng: &mut R,
) -> Equivalence
where
    M: MembershipOracle + ?Sized,
    R: Rng + ?Sized,
{
    for _ in 0..samples {
        let x = random_set(attributes, rng);
        if member.member(&x) != respects_all(&x, hypothesis) {
            return Equivalence::CounterExample(x);
        }
    }
    log::debug!("no counter-example among {samples} samples");
    Equivalence::Equivalent
}

/// A membership oracle together with the sampling equivalence oracle built on it,
/// numbering the equivalence queries it answers.
pub struct ApproxEquivalence<M, R> {
    member: M,
    rng: R,
    attributes: usize,
    epsilon: f64,
    delta: f64,
    queries: usize,
}

impl<M: MembershipOracle, R: Rng> ApproxEquivalence<M, R> {
    pub fn new(
        attributes: usize,
        member: M,
        epsilon: f64,
        delta: f64,
        rng: R,
    ) -> Result<Self, BasisError> {
        validate_parameters(epsilon, delta)?;
        Ok(ApproxEquivalence {
            member,
            rng,
            attributes,
            epsilon,
            delta,
            queries: 0,
        })
    }

    /// The number of equivalence queries answered so far.
    pub fn queries(&self) -> usize {
        self.queries
    }
}

impl<M: MembershipOracle, R: Rng> MembershipOracle for ApproxEquivalence<M, R> {
    fn member(&mut self, set: &AttrSet) -> bool {
        self.member.member(set)
    }
}

impl<M: MembershipOracle, R: Rng> EquivalenceOracle for ApproxEquivalence<M, R> {
    fn equivalent(&mut self, hypothesis: &[Implication]) -> Equivalence {
        self.queries += 1;
        let samples = samples(self.queries, self.epsilon, self.delta);
        sample_equivalent(
            hypothesis,
            &mut self.member,
            self.attributes,
            samples,
            &mut self.rng,
        )
    }
}

/// Learn an approximation of the implications holding in the target of `member`.
pub fn pac_basis<M: MembershipOracle, R: Rng>(
    attributes: usize,
    member: M,
    epsilon: f64,
    delta: f64,
    rng: R,
    max_queries: Option<usize>,
) -> Result<Learned, BasisError> {
    let mut oracle = ApproxEquivalence::new(attributes, member, epsilon, delta, rng)?;
    Ok(horn1(attributes, &mut oracle, max_queries))
}
