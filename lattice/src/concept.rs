// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! A single formal concept and its place in the lattice.

use std::fmt::{Display, Formatter};

use contexts::sets::{AttrSet, ObjSet};

/// A handle to a concept stored in a [`crate::Lattice`].
///
/// Handles stay valid for the lifetime of the lattice; once the concept is pruned the
/// handle no longer resolves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConceptId(pub(crate) usize);

impl Display for ConceptId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A formal concept `(extent, intent)` with `extent' = intent` and `intent' = extent`,
/// together with the lattice bookkeeping maintained by [`crate::Lattice`].
#[derive(Clone, Debug)]
pub struct Concept {
    pub extent: ObjSet,
    pub intent: AttrSet,
    /// Position in the lectic order of the lattice.
    pub number: usize,
    /// Covering concepts with smaller intents, in lectic order.
    pub upper: Vec<ConceptId>,
    /// Covered concepts with larger intents, in lectic order.
    pub lower: Vec<ConceptId>,
    /// Objects of the extent missing from every lower neighbour.
    pub introduced_objects: ObjSet,
    /// Attributes of the intent missing from every upper neighbour.
    pub introduced_attributes: AttrSet,
    /// Attributes introduced closest above this concept, usable as a name for concepts
    /// that introduce no attributes of their own.
    pub closest_introduced_attributes: AttrSet,
    /// Attributes occurring anywhere in the downset of this concept.
    pub downset_attributes: AttrSet,
}

impl Concept {
    pub(crate) fn new(extent: ObjSet, intent: AttrSet) -> Self {
        let introduced_objects = extent.clone();
        let introduced_attributes = intent.clone();
        let no_attributes = AttrSet::empty(intent.universe());
        Concept {
            extent,
            intent,
            number: 0,
            upper: vec![],
            lower: vec![],
            introduced_objects,
            introduced_attributes,
            closest_introduced_attributes: no_attributes.clone(),
            downset_attributes: no_attributes,
        }
    }

    /// The sorted attribute positions of the intent, which determine the lectic order
    /// of concepts.
    pub fn intent_indexes(&self) -> Vec<usize> {
        self.intent.iter().collect()
    }

    pub fn is_top(&self) -> bool {
        self.upper.is_empty()
    }

    pub fn is_bottom(&self) -> bool {
        self.lower.is_empty()
    }
}
