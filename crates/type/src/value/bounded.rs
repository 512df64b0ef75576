// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::{
	cmp::Ordering,
	fmt,
	fmt::{Display, Formatter},
	hash::{Hash, Hasher},
};

use serde::{Deserialize, Serialize};

/// A 64-bit integer whose bit pattern is read as signed or unsigned
/// depending on a tag.
///
/// Sequence values may live anywhere in `i64::MIN..=u64::MAX`, so neither
/// `i64` nor `u64` alone can hold them. Comparison, equality and hashing
/// always go through the logical value (see [`BoundedInteger::widen`]), never
/// through the raw bit pattern: an unsigned `u64::MAX` is greater than every
/// signed value, and a signed `-1` is not equal to it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BoundedInteger {
	value: i64,
	unsigned: bool,
}

impl BoundedInteger {
	pub const fn new(value: i64, unsigned: bool) -> Self {
		Self {
			value,
			unsigned,
		}
	}

	pub const fn signed(value: i64) -> Self {
		Self::new(value, false)
	}

	pub const fn unsigned(value: u64) -> Self {
		Self::new(value as i64, true)
	}

	/// The raw bit pattern, as stored in a row.
	pub const fn raw(&self) -> i64 {
		self.value
	}

	pub const fn is_unsigned(&self) -> bool {
		self.unsigned
	}

	/// The logical value, widened so that both interpretations fit.
	pub const fn widen(&self) -> i128 {
		if self.unsigned {
			self.value as u64 as i128
		} else {
			self.value as i128
		}
	}

	/// Narrows a logical value back into 64 bits of the requested signedness.
	pub fn from_wide(value: i128, unsigned: bool) -> Option<Self> {
		if unsigned {
			u64::try_from(value).ok().map(Self::unsigned)
		} else {
			i64::try_from(value).ok().map(Self::signed)
		}
	}

	/// Reinterprets the logical value with another signedness.
	///
	/// Returns `None` if the value has no representation there, e.g. `-1`
	/// as unsigned or `u64::MAX` as signed.
	pub fn to_signedness(self, unsigned: bool) -> Option<Self> {
		if self.unsigned == unsigned {
			return Some(self);
		}
		Self::from_wide(self.widen(), unsigned)
	}

	/// The mathematically correct `self + step`, keeping the signedness of
	/// `self`.
	///
	/// Returns `None` when the sum cannot be represented. The result is
	/// never clamped or wrapped; callers compare it against their own bounds.
	pub fn checked_add(self, step: i64) -> Option<Self> {
		Self::from_wide(self.widen() + step as i128, self.unsigned)
	}

	pub fn checked_sub(self, step: i64) -> Option<Self> {
		Self::from_wide(self.widen() - step as i128, self.unsigned)
	}
}

impl PartialEq for BoundedInteger {
	fn eq(&self, other: &Self) -> bool {
		self.widen() == other.widen()
	}
}

impl Eq for BoundedInteger {}

impl PartialOrd for BoundedInteger {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for BoundedInteger {
	fn cmp(&self, other: &Self) -> Ordering {
		self.widen().cmp(&other.widen())
	}
}

impl Hash for BoundedInteger {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.widen().hash(state)
	}
}

impl Display for BoundedInteger {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		Display::fmt(&self.widen(), f)
	}
}

impl From<i32> for BoundedInteger {
	fn from(value: i32) -> Self {
		Self::signed(value as i64)
	}
}

impl From<i64> for BoundedInteger {
	fn from(value: i64) -> Self {
		Self::signed(value)
	}
}

impl From<u32> for BoundedInteger {
	fn from(value: u32) -> Self {
		Self::unsigned(value as u64)
	}
}

impl From<u64> for BoundedInteger {
	fn from(value: u64) -> Self {
		Self::unsigned(value)
	}
}

#[cfg(test)]
mod tests {
	use std::{cmp::Ordering, collections::HashSet};

	use super::BoundedInteger;

	#[test]
	fn test_mixed_signedness_compare() {
		let big = BoundedInteger::unsigned(u64::MAX);
		let minus_one = BoundedInteger::signed(-1);

		// same bit pattern, different logical values
		assert_eq!(big.raw(), minus_one.raw());
		assert_ne!(big, minus_one);
		assert_eq!(big.cmp(&minus_one), Ordering::Greater);
		assert!(minus_one < BoundedInteger::unsigned(0));
		assert!(BoundedInteger::unsigned(1u64 << 63) > BoundedInteger::signed(i64::MAX));
	}

	#[test]
	fn test_equal_across_signedness() {
		let signed = BoundedInteger::signed(42);
		let unsigned = BoundedInteger::unsigned(42);
		assert_eq!(signed, unsigned);

		let mut set = HashSet::new();
		set.insert(signed);
		assert!(set.contains(&unsigned));
	}

	#[test]
	fn test_checked_add_unsigned_near_max() {
		let value = BoundedInteger::unsigned(u64::MAX - 1);
		assert_eq!(value.checked_add(1), Some(BoundedInteger::unsigned(u64::MAX)));
		assert_eq!(value.checked_add(2), None);
		assert_eq!(value.checked_add(-3), Some(BoundedInteger::unsigned(u64::MAX - 4)));
	}

	#[test]
	fn test_checked_add_signed_overflow() {
		assert_eq!(BoundedInteger::signed(i64::MAX).checked_add(1), None);
		assert_eq!(BoundedInteger::signed(i64::MIN).checked_sub(1), None);
		assert_eq!(BoundedInteger::signed(-5).checked_add(10), Some(BoundedInteger::signed(5)));
	}

	#[test]
	fn test_unsigned_does_not_wrap_through_zero() {
		let zero = BoundedInteger::unsigned(0);
		assert_eq!(zero.checked_sub(1), None);
		assert_eq!(zero.checked_add(-1), None);
	}

	#[test]
	fn test_to_signedness() {
		assert_eq!(BoundedInteger::signed(-1).to_signedness(true), None);
		assert_eq!(BoundedInteger::unsigned(u64::MAX).to_signedness(false), None);

		let converted = BoundedInteger::signed(7).to_signedness(true).unwrap();
		assert!(converted.is_unsigned());
		assert_eq!(converted.widen(), 7);
	}

	#[test]
	fn test_display_uses_logical_value() {
		assert_eq!(BoundedInteger::unsigned(u64::MAX).to_string(), "18446744073709551615");
		assert_eq!(BoundedInteger::signed(-3).to_string(), "-3");
	}
}
