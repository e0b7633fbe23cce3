// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! Helpers for naming concepts by nearby attributes.

use std::collections::VecDeque;

use contexts::context::Element;
use contexts::hashmap::HashSet;
use contexts::sets::AttrSet;

use crate::concept::ConceptId;
use crate::lattice::Lattice;

impl<O: Element, A: Element> Lattice<O, A> {
    /// Compute for each concept the attributes occurring anywhere in its downset.
    pub fn compute_attribute_downsets(&mut self) {
        for id in self.order.clone().into_iter().rev() {
            let mut downset = self[id].intent.clone();
            for &l in &self[id].lower {
                downset.union_with(&self[l].downset_attributes);
            }
            self.concept_mut(id).downset_attributes = downset;
        }
    }

    /// Give every concept at most `num` attributes introduced by or named after its upper
    /// neighbours. Concepts are visited top-down so that names propagate downwards.
    pub fn compute_closest_introduced_attributes(&mut self, num: usize) {
        let total = self.len();
        for (i, id) in self.order.clone().into_iter().enumerate() {
            self.compute_closest_introduced_attributes_concept(id, num);
            if (i + 1) % 1000 == 0 {
                log::debug!("named {} of {total} concepts", i + 1);
            }
        }
        log::debug!("named {total} concepts");
    }

    /// Name one concept by taking attributes round-robin from each upper neighbour's
    /// introduced attributes followed by its own name.
    pub(crate) fn compute_closest_introduced_attributes_concept(
        &mut self,
        id: ConceptId,
        num: usize,
    ) {
        let lists: Vec<Vec<usize>> = self[id]
            .upper
            .iter()
            .map(|&u| {
                let upper = &self[u];
                upper
                    .introduced_attributes
                    .iter()
                    .chain(upper.closest_introduced_attributes.iter())
                    .collect()
            })
            .collect();

        let mut names = self.context.no_attributes();
        let mut idx = 0;
        let mut found_another = num > 0;
        while found_another {
            found_another = false;
            for list in &lists {
                if let Some(&att) = list.get(idx) {
                    names.insert(att);
                    found_another = true;
                }
                if names.len() >= num {
                    break;
                }
            }
            idx += 1;
            if names.len() >= num {
                break;
            }
        }
        self.concept_mut(id).closest_introduced_attributes = names;
    }

    /// The attributes introduced closest above a concept, collected breadth-first until
    /// more than `num` are found or the top is reached.
    pub fn find_closest_introduced_attributes(&self, id: ConceptId, num: usize) -> AttrSet {
        let mut visited: HashSet<ConceptId> = HashSet::default();
        let mut queue = VecDeque::from([id]);
        let mut found = self.context.no_attributes();
        let mut count = 0;
        while count <= num {
            let Some(current) = queue.pop_front() else {
                break;
            };
            if !visited.insert(current) {
                continue;
            }
            let concept = &self[current];
            queue.extend(concept.upper.iter().copied());
            count += concept.introduced_attributes.len();
            found.union_with(&concept.introduced_attributes);
        }
        found
    }
}
