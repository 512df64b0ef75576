// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::{
	fmt,
	fmt::{Display, Formatter},
	str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{error::TypeError, value::BoundedInteger};

/// The integer column type backing a sequence.
///
/// Determines signedness and the natural range used when a sequence does not
/// name its own bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ValueDomain {
	/// An 8-bit signed integer
	Int1,
	/// A 16-bit signed integer
	Int2,
	/// A 24-bit signed integer
	Int3,
	/// A 32-bit signed integer
	Int4,
	/// A 64-bit signed integer
	#[default]
	Int8,
	/// An 8-bit unsigned integer
	Uint1,
	/// A 16-bit unsigned integer
	Uint2,
	/// A 24-bit unsigned integer
	Uint3,
	/// A 32-bit unsigned integer
	Uint4,
	/// A 64-bit unsigned integer
	Uint8,
}

impl ValueDomain {
	pub const fn is_unsigned(&self) -> bool {
		matches!(
			self,
			ValueDomain::Uint1 | ValueDomain::Uint2 | ValueDomain::Uint3 | ValueDomain::Uint4 | ValueDomain::Uint8
		)
	}

	/// Smallest value of the domain, e.g. `-32768` for `Int2`.
	pub const fn min(&self) -> BoundedInteger {
		match self {
			ValueDomain::Int1 => BoundedInteger::signed(i8::MIN as i64),
			ValueDomain::Int2 => BoundedInteger::signed(i16::MIN as i64),
			ValueDomain::Int3 => BoundedInteger::signed(-(1 << 23)),
			ValueDomain::Int4 => BoundedInteger::signed(i32::MIN as i64),
			ValueDomain::Int8 => BoundedInteger::signed(i64::MIN),
			ValueDomain::Uint1
			| ValueDomain::Uint2
			| ValueDomain::Uint3
			| ValueDomain::Uint4
			| ValueDomain::Uint8 => BoundedInteger::unsigned(0),
		}
	}

	/// Largest value of the domain, e.g. `32767` for `Int2`.
	pub const fn max(&self) -> BoundedInteger {
		match self {
			ValueDomain::Int1 => BoundedInteger::signed(i8::MAX as i64),
			ValueDomain::Int2 => BoundedInteger::signed(i16::MAX as i64),
			ValueDomain::Int3 => BoundedInteger::signed((1 << 23) - 1),
			ValueDomain::Int4 => BoundedInteger::signed(i32::MAX as i64),
			ValueDomain::Int8 => BoundedInteger::signed(i64::MAX),
			ValueDomain::Uint1 => BoundedInteger::unsigned(u8::MAX as u64),
			ValueDomain::Uint2 => BoundedInteger::unsigned(u16::MAX as u64),
			ValueDomain::Uint3 => BoundedInteger::unsigned((1 << 24) - 1),
			ValueDomain::Uint4 => BoundedInteger::unsigned(u32::MAX as u64),
			ValueDomain::Uint8 => BoundedInteger::unsigned(u64::MAX),
		}
	}

	pub fn contains(&self, value: BoundedInteger) -> bool {
		value >= self.min() && value <= self.max()
	}

	/// Reinterprets `value` in this domain's signedness.
	pub fn coerce(&self, value: BoundedInteger) -> Option<BoundedInteger> {
		value.to_signedness(self.is_unsigned())
	}

	pub const fn as_str(&self) -> &'static str {
		match self {
			ValueDomain::Int1 => "INT1",
			ValueDomain::Int2 => "INT2",
			ValueDomain::Int3 => "INT3",
			ValueDomain::Int4 => "INT4",
			ValueDomain::Int8 => "INT8",
			ValueDomain::Uint1 => "UINT1",
			ValueDomain::Uint2 => "UINT2",
			ValueDomain::Uint3 => "UINT3",
			ValueDomain::Uint4 => "UINT4",
			ValueDomain::Uint8 => "UINT8",
		}
	}
}

impl Display for ValueDomain {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for ValueDomain {
	type Err = TypeError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ").to_ascii_uppercase();

		let domain = match normalized.as_str() {
			"INT1" | "TINYINT" => ValueDomain::Int1,
			"INT2" | "SMALLINT" => ValueDomain::Int2,
			"INT3" | "MEDIUMINT" => ValueDomain::Int3,
			"INT4" | "INT" | "INTEGER" => ValueDomain::Int4,
			"INT8" | "BIGINT" => ValueDomain::Int8,
			"UINT1" | "TINYINT UNSIGNED" => ValueDomain::Uint1,
			"UINT2" | "SMALLINT UNSIGNED" => ValueDomain::Uint2,
			"UINT3" | "MEDIUMINT UNSIGNED" => ValueDomain::Uint3,
			"UINT4" | "INT UNSIGNED" | "INTEGER UNSIGNED" => ValueDomain::Uint4,
			"UINT8" | "BIGINT UNSIGNED" => ValueDomain::Uint8,
			_ => {
				return Err(TypeError::UnsupportedDomain {
					name: s.to_string(),
				});
			}
		};

		Ok(domain)
	}
}
