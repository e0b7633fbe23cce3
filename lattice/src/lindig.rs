// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! Construction of the whole lattice with Lindig's neighbour algorithm.
//!
//! By Lindig's theorem, for a concept `(G, I)` and an object `g` outside of `G`, the
//! concept generated by `I ∩ g'` is an upper neighbour of `(G, I)` iff the objects it adds
//! to `G` are exactly the objects generating that same intent. The dual holds for lower
//! neighbours and attributes. This lets us find all neighbours without comparing
//! candidates to each other.

use contexts::context::Element;
use contexts::hashmap::HashMap;
use contexts::sets::{AttrSet, ObjSet};

use crate::concept::ConceptId;
use crate::lattice::Lattice;

impl<O: Element, A: Element> Lattice<O, A> {
    /// Compute all concepts and the covering relation, replacing any previous content.
    ///
    /// The traversal starts from the bottom concept and always expands the lectically
    /// largest concept not yet expanded. Upper neighbours precede the concept they were
    /// found from, so every concept is expanded exactly once.
    pub fn compute_lattice(&mut self) {
        self.clear();
        let intent = self.context.objects_prime(&self.context.no_objects());
        let extent = self.context.attributes_prime(&intent);
        let bottom = self.alloc(extent, intent);
        self.order.push(bottom);

        let mut closures: HashMap<AttrSet, ObjSet> = HashMap::default();
        let mut cursor = 0;
        let mut expanded = 0;
        loop {
            let current = self.order[cursor];
            for (extent, intent) in self.upper_neighbours(current, &mut closures) {
                let (neighbour, inserted) = self.place(extent, intent);
                if inserted {
                    cursor += 1;
                }
                self.link(current, neighbour);
            }

            if cursor == 0 {
                break;
            }
            cursor -= 1;
            expanded += 1;
            if expanded % 1000 == 0 {
                log::debug!("computed upper neighbours of {expanded} concepts");
            }
        }

        self.number_concepts_and_compute_introduced();
        log::info!("computed lattice with {} concepts", self.len());
    }

    /// Compute the part of the lattice made of concepts with at least `min_extent`
    /// objects, replacing any previous content.
    ///
    /// This is the dual traversal: it starts from the top concept and expands lower
    /// neighbours in lectic order, never creating the concepts below the threshold.
    pub fn compute_min_extent_lattice(&mut self, min_extent: usize) {
        self.clear();
        let extent = self.context.attributes_prime(&self.context.no_attributes());
        let intent = self.context.objects_prime(&extent);
        let top = self.alloc(extent, intent);
        self.order.push(top);

        let mut closures: HashMap<ObjSet, AttrSet> = HashMap::default();
        let mut cursor = 0;
        while cursor < self.order.len() {
            let current = self.order[cursor];
            for (extent, intent) in self.lower_neighbours(current, min_extent, &mut closures) {
                let (neighbour, _) = self.place(extent, intent);
                self.link(neighbour, current);
            }

            cursor += 1;
            if cursor % 100 == 0 {
                log::debug!("computed lower neighbours of {cursor} concepts");
            }
        }

        self.number_concepts_and_compute_introduced();
        log::info!(
            "computed lattice with {} concepts of extent at least {min_extent}",
            self.len()
        );
    }

    /// The `(extent, intent)` pairs of the upper neighbours of a concept.
    pub fn compute_upper_neighbours(&self, id: ConceptId) -> Vec<(ObjSet, AttrSet)> {
        self.upper_neighbours(id, &mut HashMap::default())
    }

    /// The `(extent, intent)` pairs of the lower neighbours of a concept, ignoring those
    /// with fewer than `min_extent` objects.
    pub fn compute_lower_neighbours(
        &self,
        id: ConceptId,
        min_extent: usize,
    ) -> Vec<(ObjSet, AttrSet)> {
        self.lower_neighbours(id, min_extent, &mut HashMap::default())
    }

    fn upper_neighbours(
        &self,
        id: ConceptId,
        closures: &mut HashMap<AttrSet, ObjSet>,
    ) -> Vec<(ObjSet, AttrSet)> {
        let concept = &self[id];
        // candidate intent => objects generating it
        let mut candidates: HashMap<AttrSet, ObjSet> = HashMap::default();
        for g in (0..self.context.object_count()).filter(|&g| !concept.extent.contains(g)) {
            candidates
                .entry(self.context.update_intent(&concept.intent, g))
                .or_insert_with(|| self.context.no_objects())
                .insert(g);
        }

        let mut neighbours = vec![];
        for (intent, generators) in candidates {
            let extent = match self.by_intent.get(&intent) {
                Some(&known) => self[known].extent.clone(),
                None => closures
                    .entry(intent.clone())
                    .or_insert_with(|| self.context.attributes_prime(&intent))
                    .clone(),
            };
            if extent.difference(&concept.extent) == generators {
                neighbours.push((extent, intent));
            }
        }
        neighbours
    }

    fn lower_neighbours(
        &self,
        id: ConceptId,
        min_extent: usize,
        closures: &mut HashMap<ObjSet, AttrSet>,
    ) -> Vec<(ObjSet, AttrSet)> {
        let concept = &self[id];
        // candidate extent => attributes generating it
        let mut candidates: HashMap<ObjSet, AttrSet> = HashMap::default();
        for m in (0..self.context.attribute_count()).filter(|&m| !concept.intent.contains(m)) {
            let extent = self.context.update_extent(&concept.extent, m);
            if extent.len() < min_extent {
                continue;
            }
            candidates
                .entry(extent)
                .or_insert_with(|| self.context.no_attributes())
                .insert(m);
        }

        let mut neighbours = vec![];
        for (extent, generators) in candidates {
            let intent = match self.by_extent.get(&extent) {
                Some(&known) => self[known].intent.clone(),
                None => closures
                    .entry(extent.clone())
                    .or_insert_with(|| self.context.objects_prime(&extent))
                    .clone(),
            };
            if intent.difference(&concept.intent) == generators {
                neighbours.push((extent, intent));
            }
        }
        neighbours
    }

    /// Find the concept with this intent, creating it at its lectic position if needed.
    /// Returns whether it was created.
    fn place(&mut self, extent: ObjSet, intent: AttrSet) -> (ConceptId, bool) {
        match self.position(&intent) {
            Ok(pos) => (self.order[pos], false),
            Err(pos) => {
                let id = self.alloc(extent, intent);
                self.order.insert(pos, id);
                (id, true)
            }
        }
    }
}
