// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! Formal contexts: objects, attributes and the incidence relation between them, along
//! with the attribute sets, implications and closure operators built on top.

// configure clippy
#![allow(clippy::needless_return)]
#![allow(clippy::type_complexity)]
#![deny(clippy::uninlined_format_args)]
// TODO: #![warn(missing_docs)]

pub mod closure;
pub mod context;
pub mod hashmap;
pub mod implication;
pub mod sets;
