// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use parking_lot::RwLock;
use seqdb_type::BoundedInteger;
use tracing::{debug, instrument, warn};

use crate::{
	Result, SequenceError,
	config::SequenceConfig,
	row::RowField,
	settings::AutoIncrement,
	state::InitState,
	store::SequenceTable,
};

/// Outcome of [`SequenceEngine::set_value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetValue {
	/// The value lies behind the current position, or in an older round.
	Ignored,
	/// The value is the current position.
	Unchanged,
	/// The position moved. With `needs_write` the durable reservation no
	/// longer covers it and the row has to be written.
	Applied {
		needs_write: bool,
	},
}

/// A consistent copy of the live state of a sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceSnapshot {
	pub state: InitState,
	pub next_free_value: BoundedInteger,
	pub reserved_until: BoundedInteger,
	pub round: u64,
	pub all_values_used: bool,
	pub real_increment: i64,
}

/// Hands out the values of one sequence.
///
/// Values are drawn from an in-memory window; only when the window is used
/// up is a new one reserved and persisted. The persisted reservation always
/// lies beyond every value handed out, so a restart never repeats a value.
#[derive(Debug)]
pub struct SequenceEngine {
	settings: AutoIncrement,
	state: RwLock<EngineState>,
}

#[derive(Debug, Clone)]
struct EngineState {
	init: InitState,
	config: SequenceConfig,
	real_increment: i64,
	past_bound: BoundedInteger,
	/// Residue values are aligned to when the increment is the ambient one.
	align_offset: Option<i64>,
	next_free_value: BoundedInteger,
	all_values_used: bool,
}

impl EngineState {
	fn uninitialized() -> Self {
		Self {
			init: InitState::Uninitialized,
			config: SequenceConfig::default(),
			real_increment: 1,
			past_bound: BoundedInteger::signed(0),
			align_offset: None,
			next_free_value: BoundedInteger::signed(0),
			all_values_used: false,
		}
	}

	/// Builds the live state for a validated configuration.
	fn load(config: SequenceConfig, settings: &AutoIncrement, init: InitState) -> Result<Self> {
		let real_increment = settings.real_increment(config.increment);
		let past_bound = config.past_bound(real_increment).ok_or_else(|| {
			SequenceError::range(format!("the bounds of the sequence fill the whole of {}", config.value_domain))
		})?;

		let mut state = Self {
			init,
			real_increment,
			past_bound,
			align_offset: (config.increment == 0).then(|| settings.effective_offset()),
			next_free_value: config.reserved_until,
			all_values_used: false,
			config,
		};
		state.next_free_value = state.align(state.config.reserved_until);
		Ok(state)
	}

	fn ascending(&self) -> bool {
		self.real_increment > 0
	}

	fn beyond_bounds(&self, value: BoundedInteger) -> bool {
		if self.ascending() {
			value > self.config.max_value
		} else {
			value < self.config.min_value
		}
	}

	fn reserved(&self, value: BoundedInteger, reserved_until: BoundedInteger) -> bool {
		if self.ascending() {
			value < reserved_until
		} else {
			value > reserved_until
		}
	}

	/// `value` moved by `delta`, or the past-bound sentinel once that leaves
	/// `[min, max]`.
	fn advance(&self, value: BoundedInteger, delta: i128) -> BoundedInteger {
		let target = value.widen() + delta;
		if target > self.config.max_value.widen() || target < self.config.min_value.widen() {
			return self.past_bound;
		}
		// inside [min, max], hence representable
		BoundedInteger::from_wide(target, value.is_unsigned()).unwrap_or(self.past_bound)
	}

	fn increment_value(&self, value: BoundedInteger) -> BoundedInteger {
		self.advance(value, self.real_increment as i128)
	}

	/// Moves `value` up to the next number congruent to the auto-increment
	/// offset. A no-op for sequences with their own increment.
	fn align(&self, value: BoundedInteger) -> BoundedInteger {
		let Some(offset) = self.align_offset else {
			return value;
		};
		if self.beyond_bounds(value) {
			return value;
		}

		let increment = self.real_increment as i128;
		let off = value.widen().rem_euclid(increment);
		let to_add = (increment + offset as i128 - off) % increment;
		if to_add == 0 {
			return value;
		}
		self.advance(value, to_add)
	}

	fn reserve_from(&self, value: BoundedInteger) -> BoundedInteger {
		let window = self.real_increment as i128 * self.config.cache.max(1) as i128;
		self.advance(value, window)
	}

	fn expect_ready(&self, operation: &'static str) -> Result<()> {
		self.init.expect(InitState::Ready, operation)
	}

	fn snapshot(&self) -> SequenceSnapshot {
		SequenceSnapshot {
			state: self.init,
			next_free_value: self.next_free_value,
			reserved_until: self.config.reserved_until,
			round: self.config.round,
			all_values_used: self.all_values_used,
			real_increment: self.real_increment,
		}
	}

	fn apply_set_value(&mut self, value: BoundedInteger, round: u64, is_used: bool) -> Result<SetValue> {
		let domain = self.config.value_domain;
		let value = domain
			.coerce(value)
			.ok_or_else(|| SequenceError::range(format!("{} cannot be represented as {}", value, domain)))?;

		if !self.config.cycle && (value < self.config.min_value || value > self.config.max_value) {
			return Err(SequenceError::range(format!(
				"{} lies outside [{}, {}]",
				value, self.config.min_value, self.config.max_value
			)));
		}
		// past the far bound a cycling sequence wraps, behind the start bound nothing is issued
		let behind_start = if self.ascending() {
			value < self.config.min_value
		} else {
			value > self.config.max_value
		};
		if behind_start {
			return Err(SequenceError::range(format!(
				"{} lies behind the start of [{}, {}]",
				value, self.config.min_value, self.config.max_value
			)));
		}

		let next = if is_used {
			self.increment_value(value)
		} else {
			value
		};

		let current_round = self.config.round;
		if round < current_round {
			return Ok(SetValue::Ignored);
		}
		if round == current_round {
			if next == self.next_free_value {
				return Ok(SetValue::Unchanged);
			}
			if self.reserved(next, self.next_free_value) {
				return Ok(SetValue::Ignored);
			}
		} else if !self.config.cycle {
			return Err(SequenceError::range(format!(
				"round {} cannot be reached by a sequence without CYCLE",
				round
			)));
		}

		self.config.round = round;
		self.next_free_value = self.align(next);
		self.all_values_used = false;

		let needs_write = round != current_round || self.reserved(self.config.reserved_until, self.next_free_value);
		if needs_write {
			// the next draw reserves (and persists) a fresh window
			self.config.reserved_until = self.next_free_value;
		}
		Ok(SetValue::Applied {
			needs_write,
		})
	}
}

impl SequenceEngine {
	pub fn new(settings: AutoIncrement) -> Self {
		Self {
			settings,
			state: RwLock::new(EngineState::uninitialized()),
		}
	}

	pub fn settings(&self) -> &AutoIncrement {
		&self.settings
	}

	/// Validates `config` and writes the first row of a new sequence.
	#[instrument(name = "sequence::create", level = "debug", skip_all, fields(sequence = %table.name()))]
	pub fn create<T: SequenceTable + ?Sized>(&self, table: &mut T, mut config: SequenceConfig) -> Result<()> {
		let mut state = self.state.write();
		state.init.transition(InitState::Preparing, "create")?;

		let prepared = config.check_and_adjust(&self.settings, true).and_then(|_| {
			let prepared = EngineState::load(config, &self.settings, InitState::Preparing)?;
			prepared.config.write_initial_sequence(table)?;
			Ok(prepared)
		});

		match prepared {
			Ok(prepared) => {
				debug!(start = %prepared.config.start, "sequence created");
				*state = prepared;
				state.init.transition(InitState::Ready, "create")
			}
			Err(err) => {
				state.init.transition(InitState::Uninitialized, "create")?;
				Err(err)
			}
		}
	}

	/// Loads the stored row unless the engine is already ready.
	pub fn read_initial_values<T: SequenceTable + ?Sized>(&self, table: &mut T) -> Result<()> {
		let mut state = self.state.write();
		if state.init == InitState::Ready {
			return Ok(());
		}
		self.load_stored(&mut state, table)
	}

	/// Loads the stored row, replacing the live state.
	pub fn read_stored_values<T: SequenceTable + ?Sized>(&self, table: &mut T) -> Result<()> {
		let mut state = self.state.write();
		self.load_stored(&mut state, table)
	}

	#[instrument(name = "sequence::read_stored_values", level = "debug", skip_all, fields(sequence = %table.name()))]
	fn load_stored<T: SequenceTable + ?Sized>(&self, state: &mut EngineState, table: &mut T) -> Result<()> {
		if state.init != InitState::Ready && !state.init.can_transition_to(InitState::Ready) {
			return Err(SequenceError::State {
				operation: "read stored values",
				state: state.init,
			});
		}

		let row = table.read_row()?;
		let mut config = SequenceConfig::default();
		config.read_fields(&row);
		config.check_and_adjust(&self.settings, false)?;

		let loaded = EngineState::load(config, &self.settings, InitState::Ready)?;
		debug!(
			reserved_until = %loaded.config.reserved_until,
			round = loaded.config.round,
			"loaded stored sequence"
		);
		*state = loaded;
		Ok(())
	}

	/// Returns the next value of the sequence, reserving and persisting a
	/// new window when the current one is used up.
	#[instrument(name = "sequence::next_value", level = "trace", skip_all, fields(sequence = %table.name()))]
	pub fn next_value<T: SequenceTable + ?Sized>(&self, table: &mut T) -> Result<BoundedInteger> {
		let mut state = self.state.write();
		state.expect_ready("generate a value")?;
		if state.all_values_used {
			return Err(SequenceError::exhausted(table.name()));
		}

		let mut next_free_value = state.next_free_value;
		let mut reserved_until = state.config.reserved_until;
		let mut round = state.config.round;
		let mut second_round = false;

		loop {
			let candidate = next_free_value;

			if state.beyond_bounds(candidate) {
				if !state.config.cycle || second_round {
					state.all_values_used = true;
					warn!(sequence = table.name(), round, "sequence has run out of values");
					return Err(SequenceError::exhausted(table.name()));
				}

				round = round.checked_add(1).ok_or_else(|| SequenceError::exhausted(table.name()))?;
				let restart = if state.ascending() {
					state.config.min_value
				} else {
					state.config.max_value
				};
				reserved_until = restart;
				next_free_value = state.align(restart);
				second_round = true;
				debug!(round, %restart, "sequence wrapped around");
				continue;
			}

			if !state.reserved(candidate, reserved_until) {
				let extended = state.reserve_from(candidate);

				let mut row = state.config.store_fields();
				row.set_value(RowField::Next, extended);
				row.set_u64(RowField::Round, round);
				if let Err(err) = table.write_row(&row, false) {
					warn!(sequence = table.name(), error = %err, "failed to persist sequence reservation");
					return Err(err);
				}

				debug!(from = %candidate, until = %extended, round, "reserved sequence values");
				reserved_until = extended;
			}

			state.next_free_value = state.increment_value(candidate);
			state.config.reserved_until = reserved_until;
			state.config.round = round;
			return Ok(candidate);
		}
	}

	/// The value following `value`, or the past-bound sentinel.
	pub fn increment_value(&self, value: BoundedInteger) -> BoundedInteger {
		self.state.read().increment_value(value)
	}

	/// Moves the sequence to `value` in `round` without persisting it.
	///
	/// With `is_used` the value counts as already handed out and the
	/// sequence continues after it.
	#[instrument(name = "sequence::set_value", level = "debug", skip(self))]
	pub fn set_value(&self, value: BoundedInteger, round: u64, is_used: bool) -> Result<SetValue> {
		let mut state = self.state.write();
		state.expect_ready("set a value")?;
		state.apply_set_value(value, round, is_used)
	}

	/// [`set_value`](Self::set_value), persisting the new position when the
	/// durable reservation does not cover it. On a failed write the sequence
	/// is left as it was.
	#[instrument(name = "sequence::set_and_persist", level = "debug", skip(self, table), fields(sequence = %table.name()))]
	pub fn set_and_persist<T: SequenceTable + ?Sized>(
		&self,
		table: &mut T,
		value: BoundedInteger,
		round: u64,
		is_used: bool,
	) -> Result<SetValue> {
		let mut state = self.state.write();
		state.expect_ready("set a value")?;

		let saved = (*state).clone();
		let outcome = state.apply_set_value(value, round, is_used)?;

		if let SetValue::Applied {
			needs_write: true,
		} = outcome
		{
			if let Err(err) = state.config.write(table, false) {
				warn!(sequence = table.name(), error = %err, "failed to persist sequence value");
				*state = saved;
				return Err(err);
			}
		}

		Ok(outcome)
	}

	/// Applies an ALTER. Clauses not named in `changes` keep their current
	/// values. On failure the previous definition stays in effect.
	#[instrument(name = "sequence::alter", level = "debug", skip_all, fields(sequence = %table.name()))]
	pub fn alter<T: SequenceTable + ?Sized>(&self, table: &mut T, changes: SequenceConfig) -> Result<()> {
		let mut state = self.state.write();
		state.init.transition(InitState::Altering, "alter")?;

		let mut merged = changes.merge_alter(&state.config);
		let altered = merged.check_and_adjust(&self.settings, false).and_then(|_| {
			let altered = EngineState::load(merged, &self.settings, InitState::Altering)?;
			altered.config.write(table, true)?;
			Ok(altered)
		});

		let result = match altered {
			Ok(altered) => {
				debug!(reserved_until = %altered.config.reserved_until, "sequence altered");
				*state = altered;
				Ok(())
			}
			Err(err) => {
				warn!(error = %err, "sequence alter rejected");
				Err(err)
			}
		};

		state.init.transition(InitState::Ready, "alter")?;
		result
	}

	pub fn config(&self) -> SequenceConfig {
		self.state.read().config.clone()
	}

	pub fn snapshot(&self) -> SequenceSnapshot {
		self.state.read().snapshot()
	}

	pub fn state(&self) -> InitState {
		self.state.read().init
	}
}

impl Default for SequenceEngine {
	fn default() -> Self {
		Self::new(AutoIncrement::default())
	}
}
