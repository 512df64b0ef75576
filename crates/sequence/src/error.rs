// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::Display;

use seqdb_type::{Diagnostic, IntoDiagnostic, TypeError};

use crate::state::InitState;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SequenceError {
	#[error("sequence `{sequence}` has run out of values")]
	Exhausted {
		sequence: String,
	},

	#[error("invalid sequence definition: {reason}")]
	Config {
		reason: String,
	},

	#[error("sequence value out of range: {reason}")]
	Range {
		reason: String,
	},

	#[error("storage of sequence `{sequence}` failed: {reason}")]
	Storage {
		sequence: String,
		reason: String,
	},

	#[error("cannot {operation} while the sequence is {state}")]
	State {
		operation: &'static str,
		state: InitState,
	},
}

impl SequenceError {
	pub fn exhausted(sequence: &str) -> Self {
		SequenceError::Exhausted {
			sequence: sequence.to_string(),
		}
	}

	pub fn config(reason: impl Into<String>) -> Self {
		SequenceError::Config {
			reason: reason.into(),
		}
	}

	pub fn range(reason: impl Into<String>) -> Self {
		SequenceError::Range {
			reason: reason.into(),
		}
	}

	pub fn storage(sequence: &str, reason: impl Display) -> Self {
		SequenceError::Storage {
			sequence: sequence.to_string(),
			reason: reason.to_string(),
		}
	}

	pub fn diagnostic(&self) -> Diagnostic {
		self.clone().into_diagnostic()
	}
}

impl From<TypeError> for SequenceError {
	fn from(err: TypeError) -> Self {
		SequenceError::config(err.to_string())
	}
}

impl IntoDiagnostic for SequenceError {
	fn into_diagnostic(self) -> Diagnostic {
		match self {
			SequenceError::Exhausted {
				sequence,
			} => Diagnostic {
				code: "SEQUENCE_001".to_string(),
				message: format!("sequence `{}` has run out of values", sequence),
				label: Some("no more values can be generated".to_string()),
				help: Some("raise MAXVALUE (or lower MINVALUE), enable CYCLE, or RESTART the sequence"
					.to_string()),
				notes: vec![],
			},

			SequenceError::Config {
				reason,
			} => Diagnostic {
				code: "SEQUENCE_002".to_string(),
				message: format!("invalid sequence definition: {}", reason),
				label: Some("sequence definition rejected".to_string()),
				help: Some("check INCREMENT, CACHE and CYCLE against the sequence bounds".to_string()),
				notes: vec![],
			},

			SequenceError::Range {
				reason,
			} => Diagnostic {
				code: "SEQUENCE_003".to_string(),
				message: format!("sequence value out of range: {}", reason),
				label: Some("value outside the sequence bounds".to_string()),
				help: Some("MINVALUE <= START <= MAXVALUE must hold within the value type".to_string()),
				notes: vec![],
			},

			SequenceError::Storage {
				sequence,
				reason,
			} => Diagnostic {
				code: "SEQUENCE_004".to_string(),
				message: format!("storage of sequence `{}` failed: {}", sequence, reason),
				label: Some("sequence state could not be persisted".to_string()),
				help: Some("the sequence is unchanged; the operation can be retried".to_string()),
				notes: vec![],
			},

			SequenceError::State {
				operation,
				state,
			} => Diagnostic {
				code: "SEQUENCE_005".to_string(),
				message: format!("cannot {} while the sequence is {}", operation, state),
				label: Some("sequence is not ready".to_string()),
				help: None,
				notes: vec![],
			},
		}
	}
}
