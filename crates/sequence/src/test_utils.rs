// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use seqdb_type::BoundedInteger;

use crate::{SequenceConfig, SequenceEngine, SequenceTable, settings::AutoIncrement, store::MemoryTable};

/// A ready engine for `config`, backed by a fresh in-memory table.
pub fn create_test_sequence(config: SequenceConfig) -> (SequenceEngine, MemoryTable) {
	create_test_sequence_with(AutoIncrement::default(), config)
}

pub fn create_test_sequence_with(settings: AutoIncrement, config: SequenceConfig) -> (SequenceEngine, MemoryTable) {
	let mut table = MemoryTable::new("test_sequence");
	let engine = SequenceEngine::new(settings);
	engine.create(&mut table, config).unwrap();
	(engine, table)
}

/// Draws `count` values, panicking on the first error.
pub fn take_values<T: SequenceTable + ?Sized>(engine: &SequenceEngine, table: &mut T, count: usize) -> Vec<i128> {
	(0..count).map(|_| engine.next_value(table).unwrap().widen()).collect()
}

pub fn bounded(value: i64) -> BoundedInteger {
	BoundedInteger::signed(value)
}
