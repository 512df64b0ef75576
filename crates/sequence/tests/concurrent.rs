// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{collections::HashSet, thread};

use seqdb_sequence::{
	MemoryTable, RowField, SequenceConfig, SequenceEngine, SequenceError, SqliteConfig, SqliteTable,
};
use seqdb_testing::{init_tracing, temp_dir};
use seqdb_type::ValueDomain;

const THREADS: usize = 8;

#[test]
fn test_values_are_unique_across_threads() {
	init_tracing();
	let engine = SequenceEngine::default();
	let table = MemoryTable::new("orders_seq");
	engine.create(&mut table.clone(), SequenceConfig::new().with_cache(7)).unwrap();

	let per_thread = 500;
	let values: Vec<i128> = thread::scope(|scope| {
		let handles: Vec<_> = (0..THREADS)
			.map(|_| {
				let mut table = table.clone();
				let engine = &engine;
				scope.spawn(move || {
					(0..per_thread).map(|_| engine.next_value(&mut table).unwrap().widen()).collect::<Vec<_>>()
				})
			})
			.collect();
		handles.into_iter().flat_map(|handle| handle.join().unwrap()).collect()
	});

	let unique: HashSet<i128> = values.iter().copied().collect();
	assert_eq!(unique.len(), THREADS * per_thread);
	assert_eq!(unique.iter().min(), Some(&1));
	assert_eq!(unique.iter().max(), Some(&((THREADS * per_thread) as i128)));

	// one reservation per seven values, plus the initial row
	let persisted = table.row().unwrap().get_i64(RowField::Next) as i128;
	assert!(persisted > (THREADS * per_thread) as i128);
	assert_eq!(table.write_count(), 1 + (THREADS * per_thread).div_ceil(7) as u64);
}

#[test]
fn test_exhaustion_across_threads() {
	init_tracing();
	let engine = SequenceEngine::default();
	let table = MemoryTable::new("tickets_seq");
	let config = SequenceConfig::new().with_value_domain(ValueDomain::Int2).with_min_value(1).with_max_value(300);
	engine.create(&mut table.clone(), config).unwrap();

	let values: Vec<i128> = thread::scope(|scope| {
		let handles: Vec<_> = (0..THREADS)
			.map(|_| {
				let mut table = table.clone();
				let engine = &engine;
				scope.spawn(move || {
					let mut drawn = Vec::new();
					loop {
						match engine.next_value(&mut table) {
							Ok(value) => drawn.push(value.widen()),
							Err(SequenceError::Exhausted {
								..
							}) => return drawn,
							Err(err) => panic!("unexpected error: {err}"),
						}
					}
				})
			})
			.collect();
		handles.into_iter().flat_map(|handle| handle.join().unwrap()).collect()
	});

	let unique: HashSet<i128> = values.iter().copied().collect();
	assert_eq!(values.len(), 300);
	assert_eq!(unique, (1..=300).collect::<HashSet<i128>>());
}

#[test]
fn test_sqlite_handles_per_thread() {
	init_tracing();
	temp_dir(|path| {
		let config = SqliteConfig::new(path.join("seq.db"));
		let engine = SequenceEngine::default();
		let mut table = SqliteTable::create(&config, "shared_seq", ValueDomain::Int8).unwrap();
		engine.create(&mut table, SequenceConfig::new().with_cache(10)).unwrap();

		let values: Vec<i128> = thread::scope(|scope| {
			let handles: Vec<_> = (0..4)
				.map(|_| {
					let config = &config;
					let engine = &engine;
					scope.spawn(move || {
						let mut table = SqliteTable::open(config, "shared_seq").unwrap();
						(0..50).map(|_| engine.next_value(&mut table).unwrap().widen()).collect::<Vec<_>>()
					})
				})
				.collect();
			handles.into_iter().flat_map(|handle| handle.join().unwrap()).collect()
		});

		let unique: HashSet<i128> = values.iter().copied().collect();
		assert_eq!(unique.len(), 200);
		Ok(())
	})
	.expect("test failed");
}
