// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! Closure of attribute sets under a set of implications.

use crate::implication::Implication;
use crate::sets::AttrSet;

/// The closure of `set` under `implications`, by repeatedly firing every implication whose
/// premise is contained in the current set until nothing changes.
pub fn simple_closure<'a, I>(set: &AttrSet, implications: I) -> AttrSet
where
    I: IntoIterator<Item = &'a Implication>,
{
    let mut unused: Vec<&Implication> = implications.into_iter().collect();
    let mut closure = set.clone();
    let mut changed = true;
    while changed {
        changed = false;
        unused.retain(|imp| {
            if imp.premise.is_subset(&closure) {
                closure.union_with(&imp.conclusion);
                changed = true;
                false
            } else {
                true
            }
        });
    }
    closure
}

/// The closure of `set` under `implications` using the LinClosure counting scheme:
/// every implication keeps the number of premise attributes not yet derived, and fires
/// once that count reaches zero.
pub fn lin_closure<'a, I>(set: &AttrSet, implications: I) -> AttrSet
where
    I: IntoIterator<Item = &'a Implication>,
{
    let implications: Vec<&Implication> = implications.into_iter().collect();
    let mut closure = set.clone();
    let mut count: Vec<usize> = Vec::with_capacity(implications.len());
    let mut watching: Vec<Vec<usize>> = vec![vec![]; set.universe()];
    for (i, imp) in implications.iter().enumerate() {
        count.push(imp.premise.len());
        if imp.premise.is_empty() {
            closure.union_with(&imp.conclusion);
        }
        for a in imp.premise.iter() {
            watching[a].push(i);
        }
    }

    let mut update: Vec<usize> = closure.iter().collect();
    while let Some(m) = update.pop() {
        for &i in &watching[m] {
            count[i] -= 1;
            if count[i] == 0 {
                let added = implications[i].conclusion.difference(&closure);
                closure.union_with(&added);
                update.extend(added.iter());
            }
        }
    }
    closure
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sets::BitSet;

    // attributes a..e as indices 0..5
    fn s(atts: &str) -> AttrSet {
        BitSet::from_indices(5, atts.bytes().map(|b| (b - b'a') as usize))
    }

    fn imp(p: &str, c: &str) -> Implication {
        Implication::new(s(p), s(c))
    }

    type Closure = fn(&AttrSet, &[Implication]) -> AttrSet;

    const CLOSURES: [Closure; 2] = [
        |set, imps| simple_closure(set, imps),
        |set, imps| lin_closure(set, imps),
    ];

    #[test]
    fn test_closures_agree() {
        let cd2a = imp("cd", "a");
        let ad2c = imp("ad", "c");
        let ab2cd = imp("ab", "cd");
        let imps = [cd2a, ad2c, ab2cd];
        for close in CLOSURES {
            assert_eq!(close(&s("a"), &imps[..]), s("a"));
            assert_eq!(close(&s(""), &imps[..]), s(""));
            assert_eq!(close(&s("bcd"), &imps[..]), s("abcd"));
        }

        let a2bc = imp("a", "bc");
        let ce2abd = imp("ce", "abd");
        let de2abc = imp("de", "abc");
        let cd2abe = imp("cd", "abe");
        let imps = [a2bc.clone(), ce2abd.clone(), de2abc.clone(), cd2abe.clone()];
        let reordered = [ce2abd, a2bc, de2abc, cd2abe];
        for close in CLOSURES {
            assert_eq!(close(&s("ba"), &imps[..]), s("abc"));
            assert_eq!(close(&s("ae"), &imps[..]), s("abcde"));
            assert_eq!(close(&s("ae"), &reordered[..]), s("abcde"));
        }
    }

    #[test]
    fn test_empty_premise_fires() {
        let imps = [imp("", "b"), imp("b", "c")];
        assert_eq!(simple_closure(&s(""), &imps), s("bc"));
        assert_eq!(lin_closure(&s(""), &imps), s("bc"));
        assert_eq!(lin_closure(&s("e"), &imps), s("bce"));
    }
}
