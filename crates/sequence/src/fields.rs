// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

/// A clause of a sequence definition that may or may not have been given.
///
/// The discriminants are the bit values shared with DDL parsing and must not
/// change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum SequenceField {
	MinValue = 1,
	MaxValue = 2,
	Start = 4,
	Increment = 8,
	Cache = 16,
	Cycle = 32,
	/// `RESTART` was named, with or without a value.
	Restart = 64,
	/// `RESTART WITH <value>`.
	RestartValue = 128,
	/// `AS <type>`, the value domain.
	As = 256,
	/// The minimum was written explicitly at some point, as opposed to being
	/// derived from the domain.
	SpecifiedMinValue = 512,
	SpecifiedMaxValue = 1024,
}

impl SequenceField {
	pub const ALL: [SequenceField; 11] = [
		SequenceField::MinValue,
		SequenceField::MaxValue,
		SequenceField::Start,
		SequenceField::Increment,
		SequenceField::Cache,
		SequenceField::Cycle,
		SequenceField::Restart,
		SequenceField::RestartValue,
		SequenceField::As,
		SequenceField::SpecifiedMinValue,
		SequenceField::SpecifiedMaxValue,
	];

	pub const fn bit(self) -> u32 {
		self as u32
	}
}

const ALL_BITS: u32 = 2047;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct UsedFields(u32);

impl UsedFields {
	pub const fn empty() -> Self {
		Self(0)
	}

	pub const fn all() -> Self {
		Self(ALL_BITS)
	}

	/// Unknown bits are dropped.
	pub const fn from_bits(bits: u32) -> Self {
		Self(bits & ALL_BITS)
	}

	pub const fn bits(&self) -> u32 {
		self.0
	}

	pub const fn contains(&self, field: SequenceField) -> bool {
		self.0 & field.bit() != 0
	}

	pub fn insert(&mut self, field: SequenceField) {
		self.0 |= field.bit();
	}

	pub fn remove(&mut self, field: SequenceField) {
		self.0 &= !field.bit();
	}

	pub fn with(mut self, field: SequenceField) -> Self {
		self.insert(field);
		self
	}

	pub fn without(mut self, field: SequenceField) -> Self {
		self.remove(field);
		self
	}

	pub fn is_empty(&self) -> bool {
		self.0 == 0
	}

	pub fn iter(&self) -> impl Iterator<Item = SequenceField> + '_ {
		SequenceField::ALL.into_iter().filter(|field| self.contains(*field))
	}
}

impl FromIterator<SequenceField> for UsedFields {
	fn from_iter<I: IntoIterator<Item = SequenceField>>(iter: I) -> Self {
		iter.into_iter().fold(UsedFields::empty(), UsedFields::with)
	}
}

#[cfg(test)]
mod tests {
	use super::{SequenceField, UsedFields};

	#[test]
	fn test_bit_values() {
		assert_eq!(SequenceField::MinValue.bit(), 1);
		assert_eq!(SequenceField::Cycle.bit(), 32);
		assert_eq!(SequenceField::As.bit(), 256);
		assert_eq!(SequenceField::SpecifiedMaxValue.bit(), 1024);
		assert_eq!(SequenceField::ALL.iter().map(|f| f.bit()).sum::<u32>(), UsedFields::all().bits());
	}

	#[test]
	fn test_insert_remove() {
		let mut used = UsedFields::empty();
		assert!(used.is_empty());

		used.insert(SequenceField::Start);
		used.insert(SequenceField::Cache);
		assert!(used.contains(SequenceField::Start));
		assert!(!used.contains(SequenceField::MinValue));
		assert_eq!(used.bits(), 20);

		used.remove(SequenceField::Start);
		assert_eq!(used.iter().collect::<Vec<_>>(), vec![SequenceField::Cache]);
	}

	#[test]
	fn test_from_bits_drops_unknown() {
		assert_eq!(UsedFields::from_bits(u32::MAX), UsedFields::all());
		assert_eq!(UsedFields::from_bits(3), [SequenceField::MinValue, SequenceField::MaxValue].into_iter().collect());
	}
}
