// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! Concept lattices: construction with Lindig's algorithm, incremental insertion and
//! pruning of concepts, and naming helpers for inspecting the result.

// configure clippy
#![allow(clippy::needless_return)]
#![allow(clippy::type_complexity)]
#![deny(clippy::uninlined_format_args)]

pub mod concept;
pub mod lattice;
pub mod lindig;
pub mod maintain;
pub mod naming;

pub use concept::{Concept, ConceptId};
pub use lattice::{Lattice, LatticeError};
