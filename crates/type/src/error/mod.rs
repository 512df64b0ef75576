// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

mod diagnostic;

pub use diagnostic::Diagnostic;

/// Converts a typed error into the user-facing [`Diagnostic`].
pub trait IntoDiagnostic {
	fn into_diagnostic(self) -> Diagnostic;
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TypeError {
	#[error("`{name}` is not a supported integer type")]
	UnsupportedDomain {
		name: String,
	},
}

impl IntoDiagnostic for TypeError {
	fn into_diagnostic(self) -> Diagnostic {
		match self {
			TypeError::UnsupportedDomain {
				name,
			} => Diagnostic {
				code: "TYPE_001".to_string(),
				message: format!("`{}` is not a supported integer type", name),
				label: Some("unsupported value type".to_string()),
				help: Some(
					"use one of TINYINT, SMALLINT, MEDIUMINT, INT or BIGINT, optionally UNSIGNED"
						.to_string(),
				),
				notes: vec!["sequences only generate integer values".to_string()],
			},
		}
	}
}
