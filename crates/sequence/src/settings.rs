// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use serde::{Deserialize, Serialize};

use crate::{Result, SequenceError};

/// Server-wide auto-increment settings.
///
/// A sequence declared with `INCREMENT 0` steps by `increment` and keeps its
/// values congruent to `offset` modulo `increment`, so that several servers
/// can generate disjoint values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawAutoIncrement", into = "RawAutoIncrement")]
pub struct AutoIncrement {
	increment: u64,
	offset: u64,
}

#[derive(Serialize, Deserialize)]
struct RawAutoIncrement {
	#[serde(default = "default_one")]
	increment: u64,
	#[serde(default = "default_one")]
	offset: u64,
}

fn default_one() -> u64 {
	1
}

impl AutoIncrement {
	pub const MAX: u64 = 65_535;

	pub fn new(increment: u64, offset: u64) -> Result<Self> {
		let settings = Self {
			increment,
			offset,
		};
		settings.validate()?;
		Ok(settings)
	}

	pub fn with_increment(self, increment: u64) -> Result<Self> {
		Self::new(increment, self.offset)
	}

	pub fn with_offset(self, offset: u64) -> Result<Self> {
		Self::new(self.increment, offset)
	}

	pub fn increment(&self) -> u64 {
		self.increment
	}

	pub fn offset(&self) -> u64 {
		self.offset
	}

	fn validate(&self) -> Result<()> {
		for (name, value) in [("increment", self.increment), ("offset", self.offset)] {
			if !(1..=Self::MAX).contains(&value) {
				return Err(SequenceError::config(format!(
					"auto-increment {} must be within 1..={}, got {}",
					name,
					Self::MAX,
					value
				)));
			}
		}
		Ok(())
	}

	/// The step actually used by a sequence configured with `configured`.
	pub fn real_increment(&self, configured: i64) -> i64 {
		if configured != 0 {
			configured
		} else {
			self.increment as i64
		}
	}

	/// The residue values are aligned to when the ambient increment is used.
	pub fn effective_offset(&self) -> i64 {
		if self.increment != 1 {
			(self.offset % self.increment) as i64
		} else {
			0
		}
	}
}

impl Default for AutoIncrement {
	fn default() -> Self {
		Self {
			increment: 1,
			offset: 1,
		}
	}
}

impl TryFrom<RawAutoIncrement> for AutoIncrement {
	type Error = SequenceError;

	fn try_from(raw: RawAutoIncrement) -> Result<Self> {
		Self::new(raw.increment, raw.offset)
	}
}

impl From<AutoIncrement> for RawAutoIncrement {
	fn from(settings: AutoIncrement) -> Self {
		Self {
			increment: settings.increment,
			offset: settings.offset,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::AutoIncrement;
	use crate::SequenceError;

	#[test]
	fn test_default() {
		let settings = AutoIncrement::default();
		assert_eq!(settings.increment(), 1);
		assert_eq!(settings.offset(), 1);
		assert_eq!(settings.effective_offset(), 0);
	}

	#[test]
	fn test_real_increment() {
		let settings = AutoIncrement::new(10, 3).unwrap();
		assert_eq!(settings.real_increment(0), 10);
		assert_eq!(settings.real_increment(-2), -2);
		assert_eq!(settings.effective_offset(), 3);

		let settings = AutoIncrement::new(4, 9).unwrap();
		assert_eq!(settings.effective_offset(), 1);
	}

	#[test]
	fn test_out_of_range() {
		assert!(matches!(AutoIncrement::new(0, 1), Err(SequenceError::Config { .. })));
		assert!(matches!(AutoIncrement::new(1, 65_536), Err(SequenceError::Config { .. })));
		assert!(AutoIncrement::default().with_increment(65_535).is_ok());
	}

	#[test]
	fn test_deserialize() {
		let settings: AutoIncrement = serde_json::from_str(r#"{"increment": 5, "offset": 2}"#).unwrap();
		assert_eq!(settings, AutoIncrement::new(5, 2).unwrap());

		let settings: AutoIncrement = serde_json::from_str("{}").unwrap();
		assert_eq!(settings, AutoIncrement::default());

		assert!(serde_json::from_str::<AutoIncrement>(r#"{"increment": 0}"#).is_err());
	}
}
