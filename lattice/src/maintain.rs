// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! Incremental changes to a computed lattice: inserting single concepts, pruning
//! concepts, and searching for concepts by attributes.

use contexts::context::Element;
use contexts::hashmap::HashSet;

use crate::concept::ConceptId;
use crate::lattice::{Lattice, LatticeError};

impl<O: Element, A: Element> Lattice<O, A> {
    /// Insert the concept generated by `attributes`, i.e., the concept whose intent is
    /// their closure.
    ///
    /// Returns the concept and whether it is new. Neighbour lists, introduced sets and
    /// numbers are updated, and the new concept and its neighbours are given up to
    /// `num_names` naming attributes.
    pub fn insert_new_concept<'a, I>(
        &mut self,
        attributes: I,
        num_names: usize,
    ) -> Result<(ConceptId, bool), LatticeError>
    where
        I: IntoIterator<Item = &'a A>,
        A: 'a,
    {
        let atts = self.context.attr_set(attributes)?;
        let extent = self.context.attributes_prime(&atts);
        if extent.is_empty() {
            return Err(LatticeError::EmptyExtent(self.attribute_list(&atts)));
        }
        let intent = self.context.objects_prime(&extent);
        let pos = match self.position(&intent) {
            Ok(pos) => return Ok((self.order[pos], false)),
            Err(pos) => pos,
        };

        let id = self.alloc(extent.clone(), intent.clone());
        self.order.insert(pos, id);
        let lower = self.get_lower_neighbours(id);
        let upper = self.get_upper_neighbours(id);

        let mut introduced_attributes = intent.clone();
        let mut introduced_objects = extent.clone();
        for &parent in &upper {
            let mut children = self[parent].lower.clone();
            children.retain(|c| !lower.contains(c));
            children.push(id);
            self.sort_lectic(&mut children);
            let parent_concept = self.concept_mut(parent);
            parent_concept.lower = children;
            parent_concept.introduced_objects.difference_with(&extent);
            introduced_attributes.difference_with(&self[parent].intent);
        }
        for &child in &lower {
            let mut parents = self[child].upper.clone();
            parents.retain(|p| !upper.contains(p));
            parents.push(id);
            self.sort_lectic(&mut parents);
            let child_concept = self.concept_mut(child);
            child_concept.upper = parents;
            child_concept.introduced_attributes.difference_with(&intent);
            introduced_objects.difference_with(&self[child].extent);
        }

        let concept = self.concept_mut(id);
        concept.introduced_attributes = introduced_attributes;
        concept.introduced_objects = introduced_objects;
        concept.upper = upper.clone();
        concept.lower = lower.clone();
        self.enumerate_concepts();

        for con in [id].into_iter().chain(lower).chain(upper) {
            self.compute_closest_introduced_attributes_concept(con, num_names);
        }
        log::debug!("inserted concept {{{}}}", self.attribute_list(&intent));
        Ok((id, true))
    }

    /// Remove a concept, connecting each of its upper neighbours to those of its lower
    /// neighbours that are not already below it along some other path. The introduced
    /// sets of those neighbours are recomputed.
    ///
    /// Returns false if the concept is no longer in the lattice.
    pub fn prune(&mut self, id: ConceptId, renumber: bool) -> bool {
        // the binary search must not meet the released slot
        let Some(Ok(pos)) = self.get(id).map(|c| self.position(&c.intent)) else {
            return false;
        };
        self.order.remove(pos);
        let Some(concept) = self.release(id) else {
            return false;
        };

        for &u in &concept.upper {
            self.concept_mut(u).lower.retain(|&l| l != id);
        }
        for &l in &concept.lower {
            self.concept_mut(l).upper.retain(|&u| u != id);
        }

        for &u in &concept.upper {
            let mut orphans = concept.lower.clone();
            self.check_downset(u, &mut orphans);
            for &l in &orphans {
                self.link(l, u);
                let mut parents = self[l].upper.clone();
                self.sort_lectic(&mut parents);
                self.concept_mut(l).upper = parents;
            }
            let mut children = self[u].lower.clone();
            self.sort_lectic(&mut children);
            self.concept_mut(u).lower = children;
        }

        // only the neighbour lists of the former neighbours changed
        for &u in &concept.upper {
            let mut introduced_objects = self[u].extent.clone();
            for &l in &self[u].lower {
                introduced_objects.difference_with(&self[l].extent);
            }
            self.concept_mut(u).introduced_objects = introduced_objects;
        }
        for &l in &concept.lower {
            let mut introduced_attributes = self[l].intent.clone();
            for &u in &self[l].upper {
                introduced_attributes.difference_with(&self[u].intent);
            }
            self.concept_mut(l).introduced_attributes = introduced_attributes;
        }

        if renumber {
            self.enumerate_concepts();
        }
        true
    }

    /// Remove from `non_members` every concept in the downset of `top`, including `top`.
    pub fn check_downset(&self, top: ConceptId, non_members: &mut Vec<ConceptId>) {
        let mut visited: HashSet<ConceptId> = HashSet::default();
        let mut stack = vec![top];
        while let Some(current) = stack.pop() {
            if non_members.is_empty() {
                return;
            }
            if !visited.insert(current) {
                continue;
            }
            non_members.retain(|&c| c != current);
            stack.extend(self[current].lower.iter().copied());
        }
    }

    /// Remove all concepts with fewer than `min_objects` objects in their extent, and
    /// return how many were removed.
    ///
    /// Only the introduced objects of surviving upper neighbours of removed concepts are
    /// recomputed, so some attributes may end up introduced nowhere.
    pub fn prune_smaller_extents(&mut self, min_objects: usize) -> usize {
        let before = self.len();
        let doomed: Vec<ConceptId> = self
            .iter()
            .filter(|(_, c)| c.extent.len() < min_objects)
            .map(|(id, _)| id)
            .collect();

        let mut to_update: HashSet<ConceptId> = HashSet::default();
        for id in doomed {
            if let Some(concept) = self.release(id) {
                to_update.extend(concept.upper);
            }
        }
        self.order.retain(|id| self.concepts[id.0].is_some());

        for id in to_update {
            if !self.contains(id) {
                continue;
            }
            let mut lower = self[id].lower.clone();
            lower.retain(|&l| self.contains(l));
            let mut introduced_objects = self[id].extent.clone();
            for &l in &lower {
                introduced_objects.difference_with(&self[l].extent);
            }
            let concept = self.concept_mut(id);
            concept.lower = lower;
            concept.introduced_objects = introduced_objects;
        }

        self.enumerate_concepts();
        let removed = before - self.len();
        log::info!("pruned {removed} concepts with fewer than {min_objects} objects");
        removed
    }

    /// Remove all concepts except the top one that introduce no attribute (if
    /// `no_attributes`) and no object (if `no_objects`), then recompute the covering
    /// relation. Returns the number of removed concepts.
    pub fn prune_no_introduced(&mut self, no_attributes: bool, no_objects: bool) -> usize {
        let mut kept = vec![];
        let mut removed = 0;
        for (pos, id) in self.order.clone().into_iter().enumerate() {
            let concept = &self[id];
            let bare_attributes = concept.introduced_attributes.is_empty() || !no_attributes;
            let bare_objects = concept.introduced_objects.is_empty() || !no_objects;
            if pos > 0 && bare_attributes && bare_objects {
                self.release(id);
                removed += 1;
            } else {
                kept.push(id);
            }
        }
        self.order = kept;
        log::info!("pruned {removed} concepts");
        self.recompute_neighbours();
        removed
    }

    /// Rebuild every neighbour list by comparing intents, then renumber and recompute the
    /// introduced sets.
    pub fn recompute_neighbours(&mut self) {
        log::debug!("recomputing concept order");
        let order = self.order.clone();
        for &id in &order {
            let lower = self.get_lower_neighbours(id);
            let concept = self.concept_mut(id);
            concept.lower = lower;
            concept.upper = vec![];
        }
        for &id in &order {
            for l in self[id].lower.clone() {
                self.concept_mut(l).upper.push(id);
            }
        }
        self.number_concepts_and_compute_introduced();
    }

    /// The lower neighbours of a concept in the lattice, found by scanning the
    /// lectically larger concepts for the minimal intents containing its intent.
    pub fn get_lower_neighbours(&self, id: ConceptId) -> Vec<ConceptId> {
        let intent = &self[id].intent;
        let Ok(pos) = self.position(intent) else {
            return vec![];
        };
        let mut found: Vec<ConceptId> = vec![];
        for &candidate in self.order[pos + 1..].iter().rev() {
            let c = &self[candidate].intent;
            if !intent.is_subset(c) {
                continue;
            }
            found.retain(|&f| !c.is_subset(&self[f].intent));
            found.push(candidate);
        }
        self.sort_lectic(&mut found);
        found
    }

    /// The upper neighbours of a concept in the lattice, found by scanning the
    /// lectically smaller concepts for the maximal intents contained in its intent.
    pub fn get_upper_neighbours(&self, id: ConceptId) -> Vec<ConceptId> {
        let intent = &self[id].intent;
        let Ok(pos) = self.position(intent) else {
            return vec![];
        };
        let mut found: Vec<ConceptId> = vec![];
        for &candidate in &self.order[..pos] {
            let c = &self[candidate].intent;
            if !c.is_subset(intent) {
                continue;
            }
            found.retain(|&f| !self[f].intent.is_subset(c));
            found.push(candidate);
        }
        self.sort_lectic(&mut found);
        found
    }

    /// The largest concept whose intent contains all of `attributes`, searching the
    /// lectic order from `start` (or from the top).
    ///
    /// With `next_lower` unset only a concept whose intent equals `attributes` is
    /// accepted.
    pub fn find_largest_concept<'a, I>(
        &self,
        attributes: I,
        start: Option<ConceptId>,
        next_lower: bool,
    ) -> Result<ConceptId, LatticeError>
    where
        I: IntoIterator<Item = &'a A>,
        A: 'a,
    {
        let atts = self.context.attr_set(attributes)?;
        let not_found = || LatticeError::NotFound(self.attribute_list(&atts));
        let from = match start {
            None => 0,
            Some(start) => match self.get(start).map(|c| self.position(&c.intent)) {
                Some(Ok(pos)) => pos,
                _ => return Err(not_found()),
            },
        };

        let pos = from + self.order[from..].partition_point(|&id| self[id].intent < atts);
        if pos == self.order.len() {
            return Err(not_found());
        }
        if !next_lower {
            let id = self.order[pos];
            return if self[id].intent == atts {
                Ok(id)
            } else {
                Err(not_found())
            };
        }
        self.order[pos..]
            .iter()
            .copied()
            .find(|&id| atts.is_subset(&self[id].intent))
            .ok_or_else(not_found)
    }
}

#[cfg(test)]
mod tests {
    use contexts::context::{ContextError, FormalContext};

    use crate::concept::ConceptId;
    use crate::lattice::{Lattice, LatticeError};

    type Lat = Lattice<&'static str, &'static str>;

    fn example() -> Lat {
        Lattice::from_relation([
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

    fn find(lattice: &Lat, atts: &[&'static str]) -> ConceptId {
        let intent = lattice.context().attr_set(atts).unwrap();
        lattice.find_by_intent(&intent).unwrap()
    }

    fn intents(lattice: &Lat) -> Vec<String> {
        lattice
            .iter()
            .map(|(_, c)| lattice.attribute_list(&c.intent))
            .collect()
    }

    fn assert_consistent(lattice: &Lat) {
        for (pos, (id, concept)) in lattice.iter().enumerate() {
            assert_eq!(concept.number, pos);
            assert_eq!(lattice.find_by_intent(&concept.intent), Some(id));
            assert_eq!(lattice.find_by_extent(&concept.extent), Some(id));
            for &u in &concept.upper {
                assert!(lattice[u].lower.contains(&id));
            }
            for &l in &concept.lower {
                assert!(lattice[l].upper.contains(&id));
            }
            assert_eq!(concept.upper, lattice.get_upper_neighbours(id));
            assert_eq!(concept.lower, lattice.get_lower_neighbours(id));

            let mut introduced_objects = concept.extent.clone();
            for &l in &concept.lower {
                introduced_objects.difference_with(&lattice[l].extent);
            }
            assert_eq!(concept.introduced_objects, introduced_objects);
            let mut introduced_attributes = concept.intent.clone();
            for &u in &concept.upper {
                introduced_attributes.difference_with(&lattice[u].intent);
            }
            assert_eq!(concept.introduced_attributes, introduced_attributes);
        }
    }

    #[test]
    fn test_get_neighbours_agree_with_lindig() {
        let lattice = example();
        for (id, concept) in lattice.iter() {
            assert_eq!(lattice.get_lower_neighbours(id), concept.lower);
            assert_eq!(lattice.get_upper_neighbours(id), concept.upper);
        }
    }

    #[test]
    fn test_prune() {
        let mut lattice = example();
        let cxt = lattice.context().clone();
        let top = lattice.top().unwrap();
        let b = find(&lattice, &["b"]);
        let c = find(&lattice, &["c"]);
        let d = find(&lattice, &["d"]);
        let e = find(&lattice, &["e"]);
        let bd = find(&lattice, &["b", "d"]);
        let b_intent = lattice[b].intent.clone();

        assert!(lattice.prune(b, true));
        assert_eq!(lattice.len(), 9);
        assert!(lattice.find_by_intent(&b_intent).is_none());
        // everything below b is still below c, d or e
        assert_eq!(lattice[top].lower, vec![c, d, e]);
        assert_eq!(lattice[bd].upper, vec![d]);
        assert!(lattice[bd]
            .introduced_attributes
            .contains(cxt.attribute_id(&"b").unwrap()));
        assert_consistent(&lattice);

        // a second prune is a no-op
        let before = intents(&lattice);
        assert!(!lattice.prune(b, true));
        assert_eq!(intents(&lattice), before);
    }

    #[test]
    fn test_prune_reconnects_orphans() {
        // x has p, y has p and q: the chain top > {p} > {p, q}
        let mut lattice: Lattice<&str, &str> =
            Lattice::from_relation([("x", "p"), ("y", "p"), ("y", "q"), ("z", "r")]);
        let cxt = lattice.context().clone();
        let p = find(&lattice, &["p"]);
        let pq = find(&lattice, &["p", "q"]);
        let top = lattice.top().unwrap();
        assert_eq!(lattice[pq].upper, vec![p]);

        assert!(lattice.prune(p, true));
        assert_eq!(lattice[pq].upper, vec![top]);
        assert!(lattice[top].lower.contains(&pq));
        // p is now introduced at {p, q}, x at the top
        assert!(lattice[pq]
            .introduced_attributes
            .contains(cxt.attribute_id(&"p").unwrap()));
        assert!(lattice[top]
            .introduced_objects
            .contains(cxt.object_id(&"x").unwrap()));
        assert_consistent(&lattice);
    }

    #[test]
    fn test_prune_repeatedly() {
        let mut lattice = example();
        let cxt = lattice.context().clone();
        let pruned: [&[&'static str]; 5] = [&["b"], &["c", "b"], &["d", "b"], &["d"], &[]];
        for atts in pruned {
            let id = lattice
                .find_by_intent(&cxt.intent_closure(&cxt.attr_set(atts).unwrap()))
                .unwrap();
            assert!(lattice.prune(id, true));
            assert_consistent(&lattice);
        }
        assert_eq!(lattice.len(), 5);
        let c = find(&lattice, &["c"]);
        let t3_t6 = cxt.obj_set(&["T3", "T6"]).unwrap();
        assert_eq!(lattice[c].introduced_objects, t3_t6);

        for atts in pruned.into_iter().rev() {
            let (_, new) = lattice.insert_new_concept(atts, 3).unwrap();
            assert!(new);
            assert_consistent(&lattice);
        }
        assert_eq!(intents(&lattice), intents(&example()));
    }

    #[test]
    fn test_prune_smaller_extents() {
        let mut lattice = example();
        assert_eq!(lattice.prune_smaller_extents(2), 4);
        assert_eq!(lattice.len(), 6);
        assert!(lattice.iter().all(|(_, c)| c.extent.len() >= 2));
        assert_consistent(&lattice);

        let cxt = lattice.context().clone();
        let bc = lattice
            .find_by_intent(&cxt.attr_set(&["b", "c"]).unwrap())
            .unwrap();
        assert!(lattice[bc].lower.is_empty());
        assert_eq!(
            lattice[bc].introduced_objects,
            cxt.obj_set(&["T4", "T6"]).unwrap()
        );

        assert_eq!(lattice.prune_smaller_extents(2), 0);
    }

    #[test]
    fn test_prune_no_introduced() {
        let mut lattice = example();
        // only the bottom introduces neither an attribute nor an object
        let removed = lattice.prune_no_introduced(true, true);
        assert_eq!(removed, 1);
        assert_eq!(lattice.len(), 9);
        assert_consistent(&lattice);
        assert!(lattice
            .iter()
            .skip(1)
            .all(|(_, c)| !c.introduced_attributes.is_empty() || !c.introduced_objects.is_empty()));

        // concepts introducing no attribute, the top aside
        let mut lattice = example();
        assert_eq!(lattice.prune_no_introduced(true, false), 4);
        assert_eq!(
            intents(&lattice),
            vec!["", "b", "c", "c, b, a", "d", "e"]
                .into_iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
        );
        assert_consistent(&lattice);
    }

    #[test]
    fn test_insert_new_concept() {
        let mut lattice = example();
        let cxt = lattice.context().clone();
        lattice.prune_smaller_extents(2);
        assert_eq!(lattice.len(), 6);

        let (abc, new) = lattice.insert_new_concept(&["a"], 5).unwrap();
        assert!(new);
        assert_eq!(lattice.len(), 7);
        assert_eq!(lattice[abc].intent, cxt.attr_set(&["a", "b", "c"]).unwrap());
        let bc = lattice
            .find_by_intent(&cxt.attr_set(&["b", "c"]).unwrap())
            .unwrap();
        assert_eq!(lattice[abc].upper, vec![bc]);
        assert_eq!(lattice[bc].lower, vec![abc]);
        assert_eq!(
            lattice[abc].introduced_attributes,
            cxt.attr_set(&["a"]).unwrap()
        );
        assert_eq!(
            lattice[bc].introduced_objects,
            cxt.obj_set(&["T6"]).unwrap()
        );
        assert_consistent(&lattice);

        let (again, new) = lattice.insert_new_concept(&["a", "c"], 5).unwrap();
        assert_eq!((again, new), (abc, false));

        assert_eq!(
            lattice.insert_new_concept(&["a", "d"], 5).unwrap_err(),
            LatticeError::EmptyExtent("d, a".to_string())
        );
        assert_eq!(
            lattice.insert_new_concept(&["z"], 5).unwrap_err(),
            LatticeError::Context(ContextError::UnknownAttribute("z".to_string()))
        );
    }

    #[test]
    fn test_insert_between() {
        // insert {b, c} back between {b}, {c} and {a, b, c}
        let mut lattice = example();
        let cxt = lattice.context().clone();
        let bc_intent = cxt.attr_set(&["b", "c"]).unwrap();
        let bc = lattice.find_by_intent(&bc_intent).unwrap();
        assert!(lattice.prune(bc, true));
        let abc = lattice
            .find_by_intent(&cxt.attr_set(&["a", "b", "c"]).unwrap())
            .unwrap();
        assert_eq!(lattice[abc].upper.len(), 2);

        let (bc, new) = lattice.insert_new_concept(&["c", "b"], 3).unwrap();
        assert!(new);
        assert_eq!(lattice[abc].upper, vec![bc]);
        assert_eq!(lattice[bc].upper.len(), 2);
        assert_eq!(lattice.len(), 10);
        assert_consistent(&lattice);

        let fresh = example();
        assert_eq!(intents(&lattice), intents(&fresh));
    }

    #[test]
    fn test_find_largest_concept() {
        let lattice = example();
        let cxt = lattice.context();
        let bc = lattice
            .find_by_intent(&cxt.attr_set(&["b", "c"]).unwrap())
            .unwrap();
        for next_lower in [true, false] {
            let found = lattice.find_largest_concept(&["c", "b"], None, next_lower);
            assert_eq!(found, Ok(bc));
        }

        let abc = lattice
            .find_by_intent(&cxt.attr_set(&["a", "b", "c"]).unwrap())
            .unwrap();
        assert_eq!(lattice.find_largest_concept(&["a"], None, true), Ok(abc));
        assert!(matches!(
            lattice.find_largest_concept(&["a"], None, false),
            Err(LatticeError::NotFound(_))
        ));
        assert!(matches!(
            lattice.find_largest_concept(&["q"], None, true),
            Err(LatticeError::Context(ContextError::UnknownAttribute(_)))
        ));
        // starting below the match
        assert!(lattice
            .find_largest_concept(&["b"], Some(abc), true)
            .is_ok_and(|id| lattice[id].intent.len() >= 3));
        let empty: FormalContext<&str, &str> = FormalContext::from_relation([]);
        let empty = Lattice::new(empty);
        assert!(empty
            .find_largest_concept(&[] as &[&str], None, true)
            .is_err());
    }
}
