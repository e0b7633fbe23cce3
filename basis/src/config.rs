// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! Choosing and running a basis algorithm on a formal context.

use rand::rngs::StdRng;
use rand::SeedableRng;

use contexts::context::{Element, FormalContext};
use contexts::implication::Implication;
use contexts::sets::AttrSet;

use crate::horn::{horn1, Learned};
use crate::oracle::ContextOracle;
use crate::pac::{pac_basis, validate_parameters};
use crate::{ganter, incremental, BasisError};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BasisAlgorithm {
    /// Ganter's next-closure algorithm
    Ganter,
    /// Attribute-incremental algorithm
    Incremental,
    /// HORN1 with exact oracles for the context
    Horn1,
    /// HORN1 with sampled equivalence queries
    Pac,
}

/// Wrapper around the configuration of a basis computation.
#[derive(Clone, Debug, PartialEq)]
pub struct BasisConfig {
    pub algorithm: BasisAlgorithm,
    /// Error bound for PAC learning.
    pub epsilon: f64,
    /// Confidence bound for PAC learning.
    pub delta: f64,
    /// Seed for the PAC sampler; taken from the OS if absent.
    pub seed: Option<u64>,
    /// Stop the query learners after this many equivalence queries.
    pub max_queries: Option<usize>,
}

impl Default for BasisConfig {
    fn default() -> Self {
        BasisConfig {
            algorithm: BasisAlgorithm::Ganter,
            epsilon: 0.1,
            delta: 0.1,
            seed: None,
            max_queries: None,
        }
    }
}

impl BasisConfig {
    /// Check the parameters the configured algorithm uses. Only PAC learning reads ε and δ.
    pub fn validate(&self) -> Result<(), BasisError> {
        match self.algorithm {
            BasisAlgorithm::Pac => validate_parameters(self.epsilon, self.delta),
            _ => Ok(()),
        }
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

fn report(learned: Learned) -> Vec<Implication> {
    if !learned.converged {
        log::warn!(
            "stopped after {} equivalence queries, the basis may be incomplete",
            learned.queries
        );
    }
    learned.hypothesis
}

/// Compute an implication basis of `context` as configured. The implications are
/// returned in sorted order, most general premises first.
pub fn compute_basis<O: Element, A: Element>(
    context: &FormalContext<O, A>,
    config: &BasisConfig,
) -> Result<Vec<Implication>, BasisError> {
    config.validate()?;
    let attributes = context.attribute_count();
    let mut basis = match config.algorithm {
        BasisAlgorithm::Ganter => ganter::canonical_basis(context),
        BasisAlgorithm::Incremental => incremental::canonical_basis(context),
        BasisAlgorithm::Horn1 => {
            let mut oracle = ContextOracle::new(context);
            report(horn1(attributes, &mut oracle, config.max_queries))
        }
        BasisAlgorithm::Pac => {
            let member = |set: &AttrSet| context.is_intent(set);
            report(pac_basis(
                attributes,
                member,
                config.epsilon,
                config.delta,
                config.rng(),
                config.max_queries,
            )?)
        }
    };
    basis.sort();
    Ok(basis)
}
