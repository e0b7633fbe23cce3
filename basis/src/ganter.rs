// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! Ganter's next-closure algorithm for the Duquenne-Guigues basis.

use contexts::closure::simple_closure;
use contexts::context::{Element, FormalContext};
use contexts::implication::Implication;
use contexts::sets::{AttrSet, BitSet};

/// The basis of `context` relative to the `background` implications, restricted to
/// premises accepted by `cond`.
///
/// Pseudo-closed sets are enumerated in lectic order, which follows the attribute order
/// of the context. Since the full attribute set comes last in that order, the
/// enumeration stops as soon as a closure covers all attributes without producing a new
/// lectically smaller set.
pub fn relative_basis<O, A, F>(
    context: &FormalContext<O, A>,
    background: &[Implication],
    cond: F,
) -> Vec<Implication>
where
    O: Element,
    A: Element,
    F: Fn(&AttrSet) -> bool,
{
    let n = context.attribute_count();
    let mut basis: Vec<Implication> = vec![];
    let mut a = simple_closure(&context.no_attributes(), background);
    let mut i = n;

    while a.len() < n {
        let a_closed = context.intent_closure(&a);
        if a != a_closed && cond(&a) {
            basis.push(Implication::new(a.clone(), a_closed.clone()));
        }
        if !a_closed.difference(&a).is_disjoint(&BitSet::prefix(n, i)) {
            a.intersect_with(&BitSet::prefix(n, i));
        } else {
            if a_closed.len() == n {
                break;
            }
            a = a_closed;
            i = n;
        }

        let mut advanced = false;
        for j in (0..i).rev() {
            if a.contains(j) {
                a.remove(j);
                continue;
            }
            let mut next = a.clone();
            next.insert(j);
            let b = simple_closure(&next, basis.iter().chain(background));
            if b.difference(&a).is_disjoint(&BitSet::prefix(n, j)) {
                a = b;
                i = j;
                advanced = true;
                break;
            }
        }
        if !advanced {
            break;
        }
    }

    log::info!("next-closure basis has {} implications", basis.len());
    basis
}

/// The Duquenne-Guigues basis of `context`.
pub fn canonical_basis<O: Element, A: Element>(
    context: &FormalContext<O, A>,
) -> Vec<Implication> {
    relative_basis(context, &[], |_| true)
}
