// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt,
	fmt::{Display, Formatter},
};

use crate::{Result, SequenceError};

/// Lifecycle of a [`SequenceEngine`](crate::SequenceEngine).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InitState {
	#[default]
	Uninitialized,
	/// A new sequence is being validated and written.
	Preparing,
	/// An ALTER is rewriting the definition.
	Altering,
	Ready,
}

impl InitState {
	pub fn can_transition_to(self, next: InitState) -> bool {
		use InitState::*;
		matches!(
			(self, next),
			(Uninitialized, Preparing)
				| (Uninitialized, Ready)
				| (Preparing, Ready)
				| (Preparing, Uninitialized)
				| (Ready, Altering)
				| (Altering, Ready)
		)
	}

	pub fn transition(&mut self, next: InitState, operation: &'static str) -> Result<()> {
		if !self.can_transition_to(next) {
			return Err(SequenceError::State {
				operation,
				state: *self,
			});
		}
		*self = next;
		Ok(())
	}

	pub fn expect(self, expected: InitState, operation: &'static str) -> Result<()> {
		if self != expected {
			return Err(SequenceError::State {
				operation,
				state: self,
			});
		}
		Ok(())
	}
}

impl Display for InitState {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			InitState::Uninitialized => "uninitialized",
			InitState::Preparing => "preparing",
			InitState::Altering => "altering",
			InitState::Ready => "ready",
		})
	}
}

#[cfg(test)]
mod tests {
	use super::InitState::{self, *};
	use crate::SequenceError;

	#[test]
	fn test_legal_transitions() {
		let mut state = InitState::default();
		state.transition(Preparing, "create").unwrap();
		state.transition(Ready, "create").unwrap();
		state.transition(Altering, "alter").unwrap();
		state.transition(Ready, "alter").unwrap();
		assert_eq!(state, Ready);

		let mut state = Preparing;
		state.transition(Uninitialized, "create").unwrap();
		state.transition(Ready, "read").unwrap();
	}

	#[test]
	fn test_illegal_transition() {
		let mut state = Uninitialized;
		let err = state.transition(Altering, "alter").unwrap_err();
		assert_eq!(
			err,
			SequenceError::State {
				operation: "alter",
				state: Uninitialized
			}
		);
		assert_eq!(state, Uninitialized);

		assert!(!Ready.can_transition_to(Preparing));
		assert!(!Altering.can_transition_to(Uninitialized));
	}
}
