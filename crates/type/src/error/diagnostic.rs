// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::{
	fmt,
	fmt::{Display, Formatter},
};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
	pub code: String,
	pub message: String,
	pub label: Option<String>,
	pub help: Option<String>,
	pub notes: Vec<String>,
}

impl Display for Diagnostic {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "{}: {}", self.code, self.message)?;
		if let Some(help) = &self.help {
			write!(f, " (help: {})", help)?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use crate::{IntoDiagnostic, TypeError};

	#[test]
	fn test_unsupported_domain_diagnostic() {
		let diagnostic = TypeError::UnsupportedDomain {
			name: "FLOAT".to_string(),
		}
		.into_diagnostic();

		assert_eq!(diagnostic.code, "TYPE_001");
		assert!(diagnostic.to_string().starts_with("TYPE_001: `FLOAT` is not a supported integer type"));
	}

	#[test]
	fn test_diagnostic_serializes_for_clients() {
		let diagnostic = TypeError::UnsupportedDomain {
			name: "TEXT".to_string(),
		}
		.into_diagnostic();

		let json = serde_json::to_value(&diagnostic).unwrap();
		assert_eq!(json["code"], "TYPE_001");
		assert_eq!(json["notes"][0], "sequences only generate integer values");
	}
}
