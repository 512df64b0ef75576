// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

pub mod error;
pub mod value;

pub use error::{Diagnostic, IntoDiagnostic, TypeError};
pub use value::{BoundedInteger, ValueDomain};

pub type Result<T> = std::result::Result<T, TypeError>;

/// Returns early with the given error converted into the caller's error type.
#[macro_export]
macro_rules! return_error {
	($err:expr) => {
		return Err($err.into())
	};
}
