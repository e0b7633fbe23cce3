// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! Graphviz output for concept lattices.

use std::fmt::Write;

use itertools::Itertools;

use contexts::context::Element;
use lattice::Lattice;

/// Which objects or attributes to show in a concept node.
#[derive(clap::ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Labels {
    All,
    Introduced,
    None,
}

/// Render `lattice` as a dot graph with one record node per concept, numbered in lectic
/// order, and an edge from each concept to its lower neighbours. Node outlines cycle
/// through `colors`.
pub fn lattice_to_dot<O: Element, A: Element>(
    lattice: &mut Lattice<O, A>,
    objects: Labels,
    attributes: Labels,
    colors: &[&str],
) -> String {
    lattice.enumerate_concepts();
    let cxt = lattice.context();
    let color = |number: usize| match colors {
        [] => "black",
        _ => colors[number % colors.len()],
    };

    let mut out = String::new();
    let mut edges = String::new();
    writeln!(out, "digraph lattice {{").unwrap();
    for (_, concept) in lattice.iter() {
        let extent = match objects {
            Labels::All => cxt.object_names(&concept.extent).iter().join("\\n"),
            Labels::Introduced => cxt
                .object_names(&concept.introduced_objects)
                .iter()
                .join("\\n"),
            Labels::None => String::new(),
        };
        let intent = match attributes {
            Labels::All => cxt.attribute_names(&concept.intent).iter().join("\\n"),
            Labels::Introduced => cxt
                .attribute_names(&concept.introduced_attributes)
                .iter()
                .join("\\n"),
            Labels::None => String::new(),
        };
        let n = concept.number;
        writeln!(
            out,
            "node{n} [color={}, shape=Mrecord, style=bold,label=\"{n:02}|{extent}|{intent}\"]",
            color(n)
        )
        .unwrap();
        for &l in &concept.lower {
            let m = lattice[l].number;
            writeln!(edges, "node{n} -> node{m} [color={}]", color(m)).unwrap();
        }
    }
    out.push_str(&edges);
    out.push('}');
    out
}
