// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use seqdb_type::{BoundedInteger, ValueDomain, return_error};

use crate::{
	Result, SequenceError,
	fields::{SequenceField, UsedFields},
	row::{RowField, SequenceRow},
	settings::AutoIncrement,
	store::SequenceTable,
};

/// The definition of a sequence together with its durable reservation.
///
/// Built with the `with_*` methods, which record every named clause in
/// [`UsedFields`]; clauses that were not named are filled in by
/// [`SequenceConfig::check_and_adjust`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceConfig {
	/// First value not covered by the durable reservation.
	pub reserved_until: BoundedInteger,
	pub min_value: BoundedInteger,
	pub max_value: BoundedInteger,
	pub start: BoundedInteger,
	pub restart: BoundedInteger,
	/// `0` means: use the server's auto-increment settings.
	pub increment: i64,
	pub cache: i64,
	pub round: u64,
	pub cycle: bool,
	pub used_fields: UsedFields,
	pub value_domain: ValueDomain,
}

impl Default for SequenceConfig {
	fn default() -> Self {
		Self {
			reserved_until: BoundedInteger::signed(0),
			min_value: BoundedInteger::signed(1),
			max_value: BoundedInteger::signed(i64::MAX - 1),
			start: BoundedInteger::signed(1),
			restart: BoundedInteger::signed(0),
			increment: 1,
			cache: 1000,
			round: 0,
			cycle: false,
			used_fields: UsedFields::empty(),
			value_domain: ValueDomain::Int8,
		}
	}
}

fn coerce(domain: ValueDomain, value: BoundedInteger, what: &str) -> Result<BoundedInteger> {
	domain.coerce(value)
		.ok_or_else(|| SequenceError::range(format!("{} {} cannot be represented as {}", what, value, domain)))
}

fn check_in_domain(domain: ValueDomain, value: BoundedInteger, what: &str) -> Result<()> {
	if !domain.contains(value) {
		return_error!(SequenceError::range(format!(
			"{} {} is outside the range of {} [{}, {}]",
			what,
			value,
			domain,
			domain.min(),
			domain.max()
		)));
	}
	Ok(())
}

impl SequenceConfig {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_min_value(mut self, value: impl Into<BoundedInteger>) -> Self {
		self.min_value = value.into();
		self.used_fields.insert(SequenceField::MinValue);
		self
	}

	pub fn with_max_value(mut self, value: impl Into<BoundedInteger>) -> Self {
		self.max_value = value.into();
		self.used_fields.insert(SequenceField::MaxValue);
		self
	}

	pub fn with_start(mut self, value: impl Into<BoundedInteger>) -> Self {
		self.start = value.into();
		self.used_fields.insert(SequenceField::Start);
		self
	}

	pub fn with_increment(mut self, increment: i64) -> Self {
		self.increment = increment;
		self.used_fields.insert(SequenceField::Increment);
		self
	}

	pub fn with_cache(mut self, cache: i64) -> Self {
		self.cache = cache;
		self.used_fields.insert(SequenceField::Cache);
		self
	}

	pub fn with_cycle(mut self, cycle: bool) -> Self {
		self.cycle = cycle;
		self.used_fields.insert(SequenceField::Cycle);
		self
	}

	/// `RESTART`: continue from the start value.
	pub fn with_restart(mut self) -> Self {
		self.used_fields.insert(SequenceField::Restart);
		self
	}

	/// `RESTART WITH value`.
	pub fn with_restart_value(mut self, value: impl Into<BoundedInteger>) -> Self {
		self.restart = value.into();
		self.used_fields.insert(SequenceField::Restart);
		self.used_fields.insert(SequenceField::RestartValue);
		self
	}

	pub fn with_value_domain(mut self, domain: ValueDomain) -> Self {
		self.value_domain = domain;
		self.used_fields.insert(SequenceField::As);
		self
	}

	pub fn is_used(&self, field: SequenceField) -> bool {
		self.used_fields.contains(field)
	}

	/// The value one step past the last legal value in the direction of
	/// travel, if the domain can represent it.
	pub fn past_bound(&self, real_increment: i64) -> Option<BoundedInteger> {
		if real_increment > 0 {
			self.max_value.checked_add(1)
		} else {
			self.min_value.checked_sub(1)
		}
	}

	/// Fills in defaults and validates the definition.
	///
	/// With `set_reserved_until` the reservation starts at the start value,
	/// as for a freshly created sequence; otherwise the stored reservation
	/// is kept and checked.
	pub fn check_and_adjust(&mut self, settings: &AutoIncrement, set_reserved_until: bool) -> Result<()> {
		if self.cache < 0 {
			return_error!(SequenceError::config(format!("CACHE must not be negative, got {}", self.cache)));
		}

		let real_increment = settings.real_increment(self.increment);
		let ascending = real_increment > 0;
		let domain = self.value_domain;
		let unsigned = domain.is_unsigned();

		if self.is_used(SequenceField::MinValue) {
			self.min_value = coerce(domain, self.min_value, "MINVALUE")?;
			self.used_fields.insert(SequenceField::SpecifiedMinValue);
		} else if ascending {
			self.min_value = BoundedInteger::new(1, unsigned);
		} else {
			self.min_value = BoundedInteger::new(domain.min().raw() + 1, unsigned);
		}

		if self.is_used(SequenceField::MaxValue) {
			self.max_value = coerce(domain, self.max_value, "MAXVALUE")?;
			self.used_fields.insert(SequenceField::SpecifiedMaxValue);
		} else if ascending || unsigned {
			// the bit pattern of max - 1 is one less for both signednesses
			self.max_value = BoundedInteger::new(domain.max().raw() - 1, unsigned);
		} else {
			self.max_value = BoundedInteger::signed(-1);
		}

		check_in_domain(domain, self.min_value, "MINVALUE")?;
		check_in_domain(domain, self.max_value, "MAXVALUE")?;

		if self.is_used(SequenceField::Start) {
			self.start = coerce(domain, self.start, "START")?;
		} else {
			self.start = if ascending {
				self.min_value
			} else {
				self.max_value
			};
		}

		if set_reserved_until {
			self.reserved_until = self.start;
			if !self.is_used(SequenceField::RestartValue) {
				self.restart = self.start;
			}
		} else {
			self.reserved_until = coerce(domain, self.reserved_until, "reserved value")?;
		}

		if self.is_used(SequenceField::RestartValue) {
			self.restart = coerce(domain, self.restart, "RESTART")?;
		}

		if self.min_value > self.max_value {
			return_error!(SequenceError::range(format!(
				"MINVALUE {} must not exceed MAXVALUE {}",
				self.min_value, self.max_value
			)));
		}

		if self.start < self.min_value || self.start > self.max_value {
			return_error!(SequenceError::range(format!(
				"START {} must lie within [{}, {}]",
				self.start, self.min_value, self.max_value
			)));
		}

		if self.is_used(SequenceField::RestartValue)
			&& (self.restart < self.min_value || self.restart > self.max_value)
		{
			return_error!(SequenceError::range(format!(
				"RESTART {} must lie within [{}, {}]",
				self.restart, self.min_value, self.max_value
			)));
		}

		if self.past_bound(real_increment).is_none() {
			return_error!(SequenceError::range(format!(
				"{} {} leaves no room to mark the sequence as exhausted in {}",
				if ascending {
					"MAXVALUE"
				} else {
					"MINVALUE"
				},
				if ascending {
					self.max_value
				} else {
					self.min_value
				},
				domain
			)));
		}

		let step = (real_increment as i128).abs();
		if self.cache as i128 >= (i64::MAX as i128 - step) / step {
			return_error!(SequenceError::config(format!(
				"CACHE {} is too large for INCREMENT {}",
				self.cache, real_increment
			)));
		}

		let behind = if ascending {
			self.reserved_until < self.min_value
		} else {
			self.reserved_until > self.max_value
		};
		if behind {
			return_error!(SequenceError::range(format!(
				"reserved value {} lies before the start of [{}, {}]",
				self.reserved_until, self.min_value, self.max_value
			)));
		}

		if self.cycle && step > self.max_value.widen() - self.min_value.widen() {
			return_error!(SequenceError::config(format!(
				"INCREMENT {} cannot cycle within [{}, {}]",
				real_increment, self.min_value, self.max_value
			)));
		}

		Ok(())
	}

	pub fn store_fields(&self) -> SequenceRow {
		let mut row = SequenceRow::new(self.value_domain);
		row.set_value(RowField::Next, self.reserved_until);
		row.set_value(RowField::MinValue, self.min_value);
		row.set_value(RowField::MaxValue, self.max_value);
		row.set_value(RowField::Start, self.start);
		row.set_i64(RowField::Increment, self.increment);
		row.set_i64(RowField::Cache, self.cache);
		row.set_bool(RowField::Cycle, self.cycle);
		row.set_u64(RowField::Round, self.round);
		row.set_value(RowField::Restart, self.restart);
		row
	}

	/// Loads the definition from a stored row. A stored row names every
	/// clause except RESTART.
	pub fn read_fields(&mut self, row: &SequenceRow) {
		self.value_domain = row.domain();
		self.reserved_until = row.get_value(RowField::Next);
		self.min_value = row.get_value(RowField::MinValue);
		self.max_value = row.get_value(RowField::MaxValue);
		self.start = row.get_value(RowField::Start);
		self.increment = row.get_i64(RowField::Increment);
		self.cache = row.get_i64(RowField::Cache);
		self.cycle = row.get_bool(RowField::Cycle);
		self.round = row.get_u64(RowField::Round);
		self.restart = row.get_value(RowField::Restart);
		self.used_fields =
			UsedFields::all().without(SequenceField::Restart).without(SequenceField::RestartValue);
	}

	pub fn write_initial_sequence<T: SequenceTable + ?Sized>(&self, table: &mut T) -> Result<()> {
		self.write(table, true)
	}

	pub fn write<T: SequenceTable + ?Sized>(&self, table: &mut T, all_fields: bool) -> Result<()> {
		table.write_row(&self.store_fields(), all_fields)
	}

	/// Combines the clauses of an ALTER (`self`) with the `current`
	/// definition. The result still has to pass
	/// [`check_and_adjust`](Self::check_and_adjust).
	pub fn merge_alter(&self, current: &SequenceConfig) -> SequenceConfig {
		let used = self.used_fields;
		let mut merged = self.clone();

		if !used.contains(SequenceField::As) {
			merged.value_domain = current.value_domain;
		}
		let domain_changed = merged.value_domain != current.value_domain;

		// defaulted bounds follow a new domain
		if !used.contains(SequenceField::MinValue)
			&& (!domain_changed || current.is_used(SequenceField::SpecifiedMinValue))
		{
			merged.min_value = current.min_value;
			merged.used_fields.insert(SequenceField::MinValue);
		}
		if !used.contains(SequenceField::MaxValue)
			&& (!domain_changed || current.is_used(SequenceField::SpecifiedMaxValue))
		{
			merged.max_value = current.max_value;
			merged.used_fields.insert(SequenceField::MaxValue);
		}

		if !used.contains(SequenceField::Start) {
			merged.start = current.start;
			merged.used_fields.insert(SequenceField::Start);
		}
		if !used.contains(SequenceField::Increment) {
			merged.increment = current.increment;
			merged.used_fields.insert(SequenceField::Increment);
		}
		if !used.contains(SequenceField::Cache) {
			merged.cache = current.cache;
			merged.used_fields.insert(SequenceField::Cache);
		}
		if !used.contains(SequenceField::Cycle) {
			merged.cycle = current.cycle;
			merged.used_fields.insert(SequenceField::Cycle);
		}
		if !used.contains(SequenceField::RestartValue) {
			merged.restart = current.restart;
		}

		if used.contains(SequenceField::Restart) {
			merged.reserved_until = if used.contains(SequenceField::RestartValue) {
				self.restart
			} else {
				merged.start
			};
			merged.round = 0;
		} else {
			merged.reserved_until = current.reserved_until;
			merged.round = current.round;
		}

		merged
	}
}
