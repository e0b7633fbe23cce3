// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! Computing implication bases of formal contexts: the exact Duquenne-Guigues basis,
//! either incrementally or by Ganter's next-closure algorithm, and bases learned from
//! membership and equivalence queries, exactly (HORN1) or approximately (PAC).

// configure clippy
#![allow(clippy::needless_return)]
#![allow(clippy::type_complexity)]
#![deny(clippy::uninlined_format_args)]

use thiserror::Error;

pub mod config;
pub mod ganter;
pub mod horn;
pub mod incremental;
pub mod oracle;
pub mod pac;

/// A failure to start a basis computation.
#[derive(Error, Debug, PartialEq)]
pub enum BasisError {
    /// A numeric parameter is outside of its valid range
    #[error("invalid parameter {name}: {value} (expected {expected})")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },
}
