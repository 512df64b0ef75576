// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

mod bounded;
mod domain;

pub use bounded::BoundedInteger;
pub use domain::ValueDomain;
