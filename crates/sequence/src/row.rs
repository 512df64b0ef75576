// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use seqdb_type::{BoundedInteger, ValueDomain};

use crate::{Result, SequenceError};

pub const SEQUENCE_FIELD_COUNT: usize = 9;

/// Column positions of a sequence row. The order is part of the stored
/// format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowField {
	/// First value not covered by the durable reservation.
	Next = 0,
	MinValue = 1,
	MaxValue = 2,
	Start = 3,
	Increment = 4,
	Cache = 5,
	Cycle = 6,
	Round = 7,
	Restart = 8,
}

impl RowField {
	pub const ALL: [RowField; SEQUENCE_FIELD_COUNT] = [
		RowField::Next,
		RowField::MinValue,
		RowField::MaxValue,
		RowField::Start,
		RowField::Increment,
		RowField::Cache,
		RowField::Cycle,
		RowField::Round,
		RowField::Restart,
	];

	pub const fn position(self) -> usize {
		self as usize
	}

	pub const fn column_name(self) -> &'static str {
		match self {
			RowField::Next => "next_not_cached_value",
			RowField::MinValue => "minimum_value",
			RowField::MaxValue => "maximum_value",
			RowField::Start => "start_value",
			RowField::Increment => "increment",
			RowField::Cache => "cache_size",
			RowField::Cycle => "cycle_option",
			RowField::Round => "cycle_count",
			RowField::Restart => "restart_value",
		}
	}

	/// Whether the column holds a sequence value and thus uses the value
	/// domain.
	pub const fn holds_value(self) -> bool {
		matches!(
			self,
			RowField::Next | RowField::MinValue | RowField::MaxValue | RowField::Start | RowField::Restart
		)
	}
}

/// The persisted form of a sequence: nine 64-bit columns, values stored as
/// raw bit patterns of the value domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRow {
	domain: ValueDomain,
	values: [i64; SEQUENCE_FIELD_COUNT],
}

impl SequenceRow {
	pub fn new(domain: ValueDomain) -> Self {
		Self {
			domain,
			values: [0; SEQUENCE_FIELD_COUNT],
		}
	}

	pub fn from_values(domain: ValueDomain, values: [i64; SEQUENCE_FIELD_COUNT]) -> Self {
		Self {
			domain,
			values,
		}
	}

	pub fn domain(&self) -> ValueDomain {
		self.domain
	}

	pub fn values(&self) -> &[i64; SEQUENCE_FIELD_COUNT] {
		&self.values
	}

	pub fn get_i64(&self, field: RowField) -> i64 {
		self.values[field.position()]
	}

	pub fn set_i64(&mut self, field: RowField, value: i64) {
		self.values[field.position()] = value;
	}

	pub fn get_u64(&self, field: RowField) -> u64 {
		self.get_i64(field) as u64
	}

	pub fn set_u64(&mut self, field: RowField, value: u64) {
		self.set_i64(field, value as i64);
	}

	pub fn get_bool(&self, field: RowField) -> bool {
		self.get_i64(field) != 0
	}

	pub fn set_bool(&mut self, field: RowField, value: bool) {
		self.set_i64(field, value as i64);
	}

	/// Reads a value column, interpreted in the row's domain.
	pub fn get_value(&self, field: RowField) -> BoundedInteger {
		BoundedInteger::new(self.get_i64(field), self.domain.is_unsigned())
	}

	pub fn set_value(&mut self, field: RowField, value: BoundedInteger) {
		self.set_i64(field, value.raw());
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefinition {
	pub name: String,
	pub domain: ValueDomain,
	pub nullable: bool,
}

impl ColumnDefinition {
	pub fn new(name: impl Into<String>, domain: ValueDomain) -> Self {
		Self {
			name: name.into(),
			domain,
			nullable: false,
		}
	}
}

fn column_domain(field: RowField, value_domain: ValueDomain) -> ValueDomain {
	match field {
		RowField::Increment | RowField::Cache => ValueDomain::Int8,
		RowField::Cycle => ValueDomain::Uint1,
		RowField::Round => ValueDomain::Uint8,
		_ => value_domain,
	}
}

/// The columns of a sequence table whose values live in `domain`.
pub fn prepare_sequence_fields(domain: ValueDomain) -> Vec<ColumnDefinition> {
	RowField::ALL.iter().map(|field| ColumnDefinition::new(field.column_name(), column_domain(*field, domain))).collect()
}

/// Checks that `columns` describe a sequence table and returns its value
/// domain.
pub fn check_sequence_fields(columns: &[ColumnDefinition]) -> Result<ValueDomain> {
	if columns.len() != SEQUENCE_FIELD_COUNT {
		return Err(SequenceError::config(format!(
			"a sequence table has {} columns, found {}",
			SEQUENCE_FIELD_COUNT,
			columns.len()
		)));
	}

	let domain = columns[RowField::Next.position()].domain;

	for (field, column) in RowField::ALL.iter().zip(columns) {
		if column.name != field.column_name() {
			return Err(SequenceError::config(format!(
				"column {} of a sequence table must be `{}`, found `{}`",
				field.position(),
				field.column_name(),
				column.name
			)));
		}

		if column.nullable {
			return Err(SequenceError::config(format!("column `{}` must be NOT NULL", column.name)));
		}

		let accepted = match field {
			RowField::Cycle => matches!(column.domain, ValueDomain::Int1 | ValueDomain::Uint1),
			RowField::Round => matches!(column.domain, ValueDomain::Int8 | ValueDomain::Uint8),
			RowField::Increment | RowField::Cache => column.domain == ValueDomain::Int8,
			_ => column.domain == domain,
		};

		if !accepted {
			return Err(SequenceError::config(format!(
				"column `{}` cannot have type {}",
				column.name, column.domain
			)));
		}
	}

	Ok(domain)
}
