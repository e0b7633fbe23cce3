// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! The concept lattice of a formal context, stored as an arena of concepts plus a
//! lectically ordered index over them.

use std::fmt::{Display, Formatter};
use std::ops::Index;

use itertools::Itertools;
use thiserror::Error;

use contexts::context::{ContextError, Element, FormalContext};
use contexts::hashmap::HashMap;
use contexts::sets::{AttrSet, ObjSet};

use crate::concept::{Concept, ConceptId};

/// A failure to find or create a concept.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LatticeError {
    /// An identifier given by the caller is not part of the context
    #[error(transparent)]
    Context(#[from] ContextError),
    /// No object has all of the given attributes
    #[error("no object has all of the attributes {{{0}}}")]
    EmptyExtent(String),
    /// The lattice has no concept matching the search
    #[error("no concept found for the attributes {{{0}}}")]
    NotFound(String),
}

/// The concepts of a formal context together with their covering relation.
///
/// Concepts live in an arena and refer to their neighbours by [`ConceptId`]. The lattice
/// additionally keeps the concepts in lectic order of their intents (the top concept
/// first, the bottom concept last) and indexes them by intent and by extent. All three
/// indexes are updated together by every mutation.
pub struct Lattice<O: Element, A: Element> {
    pub(crate) context: FormalContext<O, A>,
    pub(crate) concepts: Vec<Option<Concept>>,
    pub(crate) order: Vec<ConceptId>,
    pub(crate) by_intent: HashMap<AttrSet, ConceptId>,
    pub(crate) by_extent: HashMap<ObjSet, ConceptId>,
}

impl<O: Element, A: Element> Lattice<O, A> {
    /// An empty lattice over `context`. Use [`Lattice::compute_lattice`] to fill it.
    pub fn new(context: FormalContext<O, A>) -> Self {
        Lattice {
            context,
            concepts: vec![],
            order: vec![],
            by_intent: HashMap::default(),
            by_extent: HashMap::default(),
        }
    }

    /// The full concept lattice of the relation given as `(object, attribute)` pairs.
    pub fn from_relation<I>(relation: I) -> Self
    where
        I: IntoIterator<Item = (O, A)>,
    {
        let mut lattice = Self::new(FormalContext::from_relation(relation));
        lattice.compute_lattice();
        lattice
    }

    pub fn context(&self) -> &FormalContext<O, A> {
        &self.context
    }

    /// The number of concepts currently in the lattice.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The concept behind `id`, unless it has been pruned.
    pub fn get(&self, id: ConceptId) -> Option<&Concept> {
        self.concepts.get(id.0).and_then(Option::as_ref)
    }

    pub fn contains(&self, id: ConceptId) -> bool {
        self.get(id).is_some()
    }

    /// The concept handles in lectic order.
    pub fn order(&self) -> &[ConceptId] {
        &self.order
    }

    /// The concepts in lectic order.
    pub fn iter(&self) -> impl Iterator<Item = (ConceptId, &Concept)> + '_ {
        self.order.iter().map(|&id| (id, &self[id]))
    }

    /// The lectically first concept, which has the smallest intent.
    pub fn top(&self) -> Option<ConceptId> {
        self.order.first().copied()
    }

    /// The lectically last concept, which has the largest intent.
    pub fn bottom(&self) -> Option<ConceptId> {
        self.order.last().copied()
    }

    pub fn find_by_intent(&self, intent: &AttrSet) -> Option<ConceptId> {
        self.by_intent.get(intent).copied()
    }

    pub fn find_by_extent(&self, extent: &ObjSet) -> Option<ConceptId> {
        self.by_extent.get(extent).copied()
    }

    /// Assign each concept its position in the lectic order.
    pub fn enumerate_concepts(&mut self) {
        for (number, id) in self.order.clone().into_iter().enumerate() {
            self.concept_mut(id).number = number;
        }
    }

    /// Number the concepts, sort every neighbour list lectically and recompute the
    /// introduced objects and attributes of every concept from its neighbours.
    ///
    /// Must run after any structural change that did not maintain these itself.
    pub fn number_concepts_and_compute_introduced(&mut self) {
        let total = self.order.len();
        for (number, id) in self.order.clone().into_iter().enumerate() {
            if number % 1000 == 0 {
                log::debug!("computing introduced sets for concept {number} of {total}");
            }
            let mut upper = self[id].upper.clone();
            let mut lower = self[id].lower.clone();
            self.sort_lectic(&mut upper);
            self.sort_lectic(&mut lower);

            let mut introduced_objects = self[id].extent.clone();
            for &l in &lower {
                introduced_objects.difference_with(&self[l].extent);
            }
            let mut introduced_attributes = self[id].intent.clone();
            for &u in &upper {
                introduced_attributes.difference_with(&self[u].intent);
            }

            let concept = self.concept_mut(id);
            concept.number = number;
            concept.upper = upper;
            concept.lower = lower;
            concept.introduced_objects = introduced_objects;
            concept.introduced_attributes = introduced_attributes;
        }
    }

    pub(crate) fn concept_mut(&mut self, id: ConceptId) -> &mut Concept {
        self.concepts[id.0]
            .as_mut()
            .expect("neighbour lists only refer to live concepts")
    }

    /// The position of `intent` in the lectic order, or where it would be inserted.
    pub(crate) fn position(&self, intent: &AttrSet) -> Result<usize, usize> {
        self.order
            .binary_search_by(|&id| self[id].intent.cmp(intent))
    }

    pub(crate) fn sort_lectic(&self, ids: &mut [ConceptId]) {
        ids.sort_by(|&a, &b| self[a].intent.cmp(&self[b].intent));
    }

    /// Store a new concept in the arena and the intent and extent indexes. The caller
    /// places it in the lectic order.
    pub(crate) fn alloc(&mut self, extent: ObjSet, intent: AttrSet) -> ConceptId {
        let id = ConceptId(self.concepts.len());
        self.by_intent.insert(intent.clone(), id);
        self.by_extent.insert(extent.clone(), id);
        self.concepts.push(Some(Concept::new(extent, intent)));
        id
    }

    /// Remove a concept from the arena and the intent and extent indexes, leaving the
    /// lectic order to the caller.
    pub(crate) fn release(&mut self, id: ConceptId) -> Option<Concept> {
        let concept = self.concepts.get_mut(id.0)?.take()?;
        self.by_intent.swap_remove(&concept.intent);
        self.by_extent.swap_remove(&concept.extent);
        Some(concept)
    }

    pub(crate) fn clear(&mut self) {
        self.concepts.clear();
        self.order.clear();
        self.by_intent.clear();
        self.by_extent.clear();
    }

    pub(crate) fn link(&mut self, lower: ConceptId, upper: ConceptId) {
        self.concept_mut(lower).upper.push(upper);
        self.concept_mut(upper).lower.push(lower);
    }

    pub(crate) fn attribute_list(&self, atts: &AttrSet) -> String {
        self.context.attribute_names(atts).iter().join(", ")
    }
}

impl<O: Element, A: Element> Index<ConceptId> for Lattice<O, A> {
    type Output = Concept;

    fn index(&self, id: ConceptId) -> &Concept {
        self.get(id)
            .expect("concept handle refers to a pruned concept")
    }
}

impl<O: Element, A: Element> Display for Lattice<O, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let numbers = |ids: &[ConceptId]| ids.iter().map(|&id| self[id].number).join(", ");
        writeln!(f, "Number of concepts: {}", self.len())?;
        for (id, concept) in self.iter() {
            writeln!(f, "---------------------------")?;
            writeln!(f, "concept no:{}", concept.number)?;
            writeln!(
                f,
                "extent:{}",
                self.context.object_names(&concept.extent).iter().join(", ")
            )?;
            writeln!(f, "intent:{}", self.attribute_list(&concept.intent))?;
            writeln!(
                f,
                "introduced objects:{}",
                self.context
                    .object_names(&concept.introduced_objects)
                    .iter()
                    .join(", ")
            )?;
            writeln!(
                f,
                "introduced attributes:{}",
                self.attribute_list(&concept.introduced_attributes)
            )?;
            writeln!(f, "upper neighbours:{}", numbers(&concept.upper))?;
            writeln!(f, "lower neighbours:{}", numbers(&concept.lower))?;
            writeln!(
                f,
                "naming suggestion:{}",
                self.context
                    .attribute_names(&self.find_closest_introduced_attributes(id, 3))
                    .iter()
                    .join(",")
            )?;
            writeln!(f, "---------------------------")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let lattice = Lattice::from_relation([("x", "p"), ("y", "q")]);
        insta::assert_display_snapshot!(lattice, @r###"
        Number of concepts: 4
        ---------------------------
        concept no:0
        extent:x, y
        intent:
        introduced objects:
        introduced attributes:
        upper neighbours:
        lower neighbours:1, 2
        naming suggestion:
        ---------------------------
        ---------------------------
        concept no:1
        extent:x
        intent:p
        introduced objects:x
        introduced attributes:p
        upper neighbours:0
        lower neighbours:3
        naming suggestion:p
        ---------------------------
        ---------------------------
        concept no:2
        extent:y
        intent:q
        introduced objects:y
        introduced attributes:q
        upper neighbours:0
        lower neighbours:3
        naming suggestion:q
        ---------------------------
        ---------------------------
        concept no:3
        extent:
        intent:q, p
        introduced objects:
        introduced attributes:
        upper neighbours:1, 2
        lower neighbours:
        naming suggestion:q,p
        ---------------------------
        "###);
    }

    #[test]
    fn test_lookup() {
        let lattice = Lattice::from_relation([("x", "p"), ("y", "q")]);
        let cxt = lattice.context();
        let p = cxt.attr_set(&["p"]).unwrap();
        let x = cxt.obj_set(&["x"]).unwrap();
        let p = lattice.find_by_intent(&p).unwrap();
        assert_eq!(lattice.find_by_extent(&x), Some(p));
        assert_eq!(lattice[p].number, 1);
        assert!(lattice.contains(p));
        assert!(lattice[lattice.top().unwrap()].is_top());
        assert!(lattice[lattice.bottom().unwrap()].is_bottom());
        assert_eq!(lattice.len(), 4);
    }
}
