// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! Attribute implications `premise => conclusion`.

use std::fmt::{Display, Formatter};

use itertools::Itertools;

use crate::context::{Element, FormalContext};
use crate::sets::AttrSet;

/// An implication between two attribute sets.
///
/// The conclusion is stored as given and may overlap the premise; the semantically
/// relevant right-hand side is [`Implication::reduced_conclusion`]. Implications are
/// ordered lectically by premise and then by conclusion, so more general premises
/// come first.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Implication {
    pub premise: AttrSet,
    pub conclusion: AttrSet,
}

impl Implication {
    pub fn new(premise: AttrSet, conclusion: AttrSet) -> Self {
        Implication {
            premise,
            conclusion,
        }
    }

    /// The conclusion without the attributes already in the premise.
    pub fn reduced_conclusion(&self) -> AttrSet {
        self.conclusion.difference(&self.premise)
    }

    /// Whether the implication says nothing, i.e., its conclusion lies within its premise.
    pub fn is_trivial(&self) -> bool {
        self.conclusion.is_subset(&self.premise)
    }

    /// An attribute set respects the implication iff it does not contain the premise
    /// without also containing the conclusion.
    pub fn is_respected(&self, set: &AttrSet) -> bool {
        !self.premise.is_subset(set) || self.conclusion.is_subset(set)
    }

    /// Respect by a partial example, where `known` holds the attributes the example surely
    /// has and `possible` those it might have.
    pub fn is_respected_by_partial(&self, known: &AttrSet, possible: &AttrSet) -> bool {
        !self.premise.is_subset(known) || self.reduced_conclusion().is_subset(possible)
    }

    /// Display the implication using the attribute names of `cxt`, as `a, b => c`.
    pub fn display<'a, O: Element, A: Element>(
        &'a self,
        cxt: &'a FormalContext<O, A>,
    ) -> ImplicationDisplay<'a, O, A> {
        ImplicationDisplay { imp: self, cxt }
    }
}

/// Helper returned by [`Implication::display`].
pub struct ImplicationDisplay<'a, O: Element, A: Element> {
    imp: &'a Implication,
    cxt: &'a FormalContext<O, A>,
}

impl<O: Element, A: Element> Display for ImplicationDisplay<'_, O, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let premise = self.cxt.attribute_names(&self.imp.premise);
        let conclusion = self.cxt.attribute_names(&self.imp.reduced_conclusion());
        write!(
            f,
            "{} => {}",
            premise.iter().join(", "),
            conclusion.iter().join(", ")
        )
    }
}

/// Whether `set` respects every implication in `implications`.
pub fn respects_all<'a, I>(set: &AttrSet, implications: I) -> bool
where
    I: IntoIterator<Item = &'a Implication>,
{
    implications.into_iter().all(|imp| imp.is_respected(set))
}
