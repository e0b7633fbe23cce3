// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! The incremental Duquenne-Guigues basis algorithm of Obiedkov and Duquenne.
//!
//! Attributes are added one at a time, in the order of the context. After step `i` the
//! state consists of the preclosed sets of the context restricted to the first `i + 1`
//! attributes: the concept intents and the pseudo-intents, each with its extent, and for
//! pseudo-intents the basis implication they are the premise of. Adding attribute `m`
//! extends the sets whose extent lies within the extent of `m`, may turn intents into
//! pseudo-intents and vice versa, and keeps the basis minimal by re-closing premises that
//! stopped being pseudo-closed.

use contexts::closure::simple_closure;
use contexts::context::{Element, FormalContext};
use contexts::implication::Implication;
use contexts::sets::{AttrSet, ObjSet};

/// A preclosed set of the attributes processed so far.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Preclosed {
    /// A concept intent with its extent.
    Concept { extent: ObjSet, intent: AttrSet },
    /// A pseudo-intent with its extent. The set itself is the premise of the implication
    /// at index `implication` of the implication arena, so updating that premise updates
    /// the set.
    PseudoClosed { extent: ObjSet, implication: usize },
}

impl Preclosed {
    pub fn extent(&self) -> &ObjSet {
        match self {
            Preclosed::Concept { extent, .. } | Preclosed::PseudoClosed { extent, .. } => extent,
        }
    }
}

/// The state of the incremental algorithm.
pub struct IncrementalBasis<'a, O: Element, A: Element> {
    context: &'a FormalContext<O, A>,
    /// Every implication created so far; preclosed sets and the basis index into it.
    implications: Vec<Implication>,
    preclosed: Vec<Preclosed>,
    basis: Vec<usize>,
    steps: usize,
}

/// Bookkeeping of a single step.
#[derive(Default)]
struct Step {
    old_stable: Vec<usize>,
    new_stable: Vec<usize>,
    min_mod: Vec<usize>,
    non_min_mod: Vec<(ObjSet, usize)>,
    mod_extra: Vec<Preclosed>,
    preclosed: Vec<Preclosed>,
}

impl<'a, O: Element, A: Element> IncrementalBasis<'a, O, A> {
    /// The state before any attribute is processed: a single closed set, the empty one.
    pub fn new(context: &'a FormalContext<O, A>) -> Self {
        IncrementalBasis {
            context,
            implications: vec![],
            preclosed: vec![Preclosed::Concept {
                extent: context.all_objects(),
                intent: context.no_attributes(),
            }],
            basis: vec![],
            steps: 0,
        }
    }

    /// The number of attributes processed so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn preclosed(&self) -> &[Preclosed] {
        &self.preclosed
    }

    /// The attribute set of a preclosed set.
    pub fn attributes<'b>(&'b self, p: &'b Preclosed) -> &'b AttrSet {
        match p {
            Preclosed::Concept { intent, .. } => intent,
            Preclosed::PseudoClosed { implication, .. } => &self.implications[*implication].premise,
        }
    }

    /// The basis of the context restricted to the attributes processed so far.
    pub fn basis(&self) -> Vec<Implication> {
        self.basis
            .iter()
            .map(|&k| self.implications[k].clone())
            .collect()
    }

    /// Process attribute `i`. Attributes must be processed in order, starting from 0.
    pub fn update_preclosed(&mut self, i: usize) {
        assert_eq!(i, self.steps, "attributes are processed in order");
        let m = i;
        let m_extent = self.context.attribute_column(m).clone();

        // every set is handled after all of its subsets
        let mut preclosed = std::mem::take(&mut self.preclosed);
        preclosed.sort_by(|p, q| self.attributes(p).cmp(self.attributes(q)));

        let mut step = Step::default();
        for p in preclosed {
            let holds = p.extent().is_subset(&m_extent);
            match p {
                Preclosed::Concept { extent, intent } if holds => {
                    self.process_modified_concept(extent, intent, m, &mut step)
                }
                Preclosed::PseudoClosed {
                    extent,
                    implication,
                } if holds => self.process_modified_implication(extent, implication, m, &mut step),
                Preclosed::Concept { extent, intent } => {
                    self.process_stable_concept(&extent, &intent, m, &m_extent, &mut step);
                    step.preclosed.push(Preclosed::Concept { extent, intent });
                }
                Preclosed::PseudoClosed { implication, .. } => {
                    step.old_stable.push(implication);
                    step.preclosed.push(p);
                }
            }
        }

        let mut basis = step.old_stable;
        basis.extend(step.new_stable);
        basis.extend(step.min_mod);
        let fixed = basis.len();
        basis.extend(step.non_min_mod.iter().map(|(_, k)| *k));
        for (j, (extent, k)) in step.non_min_mod.into_iter().enumerate().rev() {
            basis.remove(fixed + j);
            let closed = simple_closure(
                &self.implications[k].premise,
                basis.iter().map(|&b| &self.implications[b]),
            );
            let implication = &mut self.implications[k];
            implication.premise = closed;
            if implication.premise != implication.conclusion {
                basis.push(k);
                step.mod_extra.push(Preclosed::PseudoClosed {
                    extent,
                    implication: k,
                });
            } else {
                log::trace!("dropping implication {k} that is no longer minimal");
            }
        }

        step.preclosed.extend(step.mod_extra);
        self.preclosed = step.preclosed;
        self.basis = basis;
        self.steps += 1;
        log::debug!(
            "after {} attributes: {} preclosed sets, {} implications",
            self.steps,
            self.preclosed.len(),
            self.basis.len()
        );
    }

    /// A concept whose extent is not within the extent of `m` stays closed. Its
    /// extension by `m` is either closed too, or becomes pseudo-closed unless one of the
    /// new implications already rules it out.
    fn process_stable_concept(
        &mut self,
        extent: &ObjSet,
        intent: &AttrSet,
        m: usize,
        m_extent: &ObjSet,
        step: &mut Step,
    ) {
        let new_extent = extent.intersection(m_extent);
        let mut new_premise = intent.clone();
        new_premise.insert(m);
        if step
            .new_stable
            .iter()
            .any(|&k| !self.implications[k].is_respected(&new_premise))
        {
            return;
        }

        let conclusion = self.context.restricted_closure(&new_premise, m + 1);
        if conclusion == new_premise {
            step.preclosed.push(Preclosed::Concept {
                extent: new_extent,
                intent: new_premise,
            });
        } else {
            let k = self.add_implication(new_premise, conclusion);
            step.new_stable.push(k);
            step.preclosed.push(Preclosed::PseudoClosed {
                extent: new_extent,
                implication: k,
            });
        }
    }

    /// A pseudo-intent whose extent lies within the extent of `m` gains `m` in the
    /// conclusion of its implication. It stays pseudo-closed unless a smaller modified
    /// implication now applies to it, in which case its premise gains `m` as well and is
    /// re-closed after the step.
    fn process_modified_implication(
        &mut self,
        extent: ObjSet,
        k: usize,
        m: usize,
        step: &mut Step,
    ) {
        self.implications[k].conclusion.insert(m);
        let premise = &self.implications[k].premise;
        if step
            .min_mod
            .iter()
            .any(|&j| self.implications[j].premise.is_subset(premise))
        {
            self.implications[k].premise.insert(m);
            step.non_min_mod.push((extent, k));
        } else {
            step.min_mod.push(k);
            step.preclosed.push(Preclosed::PseudoClosed {
                extent,
                implication: k,
            });
        }
    }

    /// A concept whose extent lies within the extent of `m` gains `m`. Its old intent
    /// becomes pseudo-closed with conclusion intent ∪ {m}, unless a smaller modified
    /// implication applies to it.
    fn process_modified_concept(
        &mut self,
        extent: ObjSet,
        intent: AttrSet,
        m: usize,
        step: &mut Step,
    ) {
        if !step
            .min_mod
            .iter()
            .any(|&j| self.implications[j].premise.is_subset(&intent))
        {
            let mut conclusion = intent.clone();
            conclusion.insert(m);
            let k = self.add_implication(intent.clone(), conclusion);
            step.min_mod.push(k);
            step.preclosed.push(Preclosed::PseudoClosed {
                extent: extent.clone(),
                implication: k,
            });
        }
        let mut intent = intent;
        intent.insert(m);
        step.mod_extra.push(Preclosed::Concept { extent, intent });
    }

    fn add_implication(&mut self, premise: AttrSet, conclusion: AttrSet) -> usize {
        let imp = Implication::new(premise, conclusion);
        self.implications.push(imp);
        self.implications.len() - 1
    }
}

/// The Duquenne-Guigues basis of `context`, computed incrementally. Conclusions are
/// closed and include the premise.
pub fn canonical_basis<O: Element, A: Element>(
    context: &FormalContext<O, A>,
) -> Vec<Implication> {
    let mut state = IncrementalBasis::new(context);
    for i in 0..context.attribute_count() {
        state.update_preclosed(i);
    }
    let basis = state.basis();
    log::info!("incremental basis has {} implications", basis.len());
    basis
}

#[cfg(test)]
mod tests {
    use super::*;
    use contexts::implication::respects_all;
    use contexts::sets::BitSet;

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

    fn display(cxt: &FormalContext<&'static str, &'static str>, basis: &[Implication]) -> String {
        let mut lines: Vec<String> = basis
            .iter()
            .map(|imp| imp.display(cxt).to_string())
            .collect();
        lines.sort();
        lines.join("\n")
    }

    #[test]
    fn test_canonical_basis() {
        let cxt = example();
        let basis = canonical_basis(&cxt);
        insta::assert_snapshot!(display(&cxt, &basis), @r###"
        a => c, b
        d, c => e, b, a
        e, c => d, b, a
        e, d => c, b, a
        "###);
        for imp in &basis {
            assert_eq!(imp.conclusion, cxt.intent_closure(&imp.premise));
        }
    }

    #[test]
    fn test_preclosed_after_each_step() {
        let cxt = example();
        let mut state = IncrementalBasis::new(&cxt);
        for i in 0..cxt.attribute_count() {
            state.update_preclosed(i);
            let basis = state.basis();
            // every preclosed set lies within the processed attributes and respects
            // the implications other than its own
            let processed = BitSet::prefix(cxt.attribute_count(), i + 1);
            for p in state.preclosed() {
                let set = state.attributes(p);
                assert!(set.is_subset(&processed));
                match p {
                    Preclosed::Concept { extent, intent } => {
                        assert_eq!(cxt.restricted_closure(intent, i + 1), *intent);
                        assert_eq!(extent, &cxt.attributes_prime(intent));
                        assert!(respects_all(intent, &basis));
                    }
                    Preclosed::PseudoClosed { extent, .. } => {
                        assert_eq!(extent, &cxt.attributes_prime(set));
                        assert!(basis.iter().any(|imp| &imp.premise == set));
                    }
                }
            }
        }
        assert_eq!(state.steps(), 5);
    }

    #[test]
    fn test_no_objects() {
        let cxt: FormalContext<&str, &str> =
            FormalContext::new([], None, Some(vec!["p", "q"])).unwrap();
        let basis = canonical_basis(&cxt);
        assert_eq!(
            basis,
            vec![Implication::new(cxt.no_attributes(), cxt.all_attributes())]
        );
    }
}
