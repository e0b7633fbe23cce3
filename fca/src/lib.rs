// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! fca library
//!
//! Reading relations, rendering lattices and the command-line interface of the fca
//! binary, on top of the `contexts`, `lattice` and `basis` crates.

// configure clippy
#![allow(clippy::needless_return)]
#![allow(clippy::type_complexity)]
#![deny(clippy::uninlined_format_args)]

pub mod command;
pub mod dot;
pub mod relation;

#[doc(hidden)]
pub use command::App;
