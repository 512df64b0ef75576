// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use seqdb_sequence::{
	LastValueCache, MemoryTable, SequenceConfig, SequenceEngine, SequenceTable, SqliteConfig, SqliteTable,
	sequence_key,
};
use seqdb_testing::temp_dir;
use seqdb_type::{BoundedInteger, ValueDomain};

#[test]
fn test_recreated_sqlite_table_invalidates_last_value() {
	temp_dir(|path| {
		let config = SqliteConfig::new(path.join("seq.db"));
		let key = sequence_key("app", "orders_seq");
		let mut cache = LastValueCache::new();

		let mut table = SqliteTable::create(&config, "orders_seq", ValueDomain::Int8).unwrap();
		let engine = SequenceEngine::default();
		engine.create(&mut table, SequenceConfig::new()).unwrap();
		cache.next_value(&key, &engine, &mut table).unwrap();
		cache.next_value(&key, &engine, &mut table).unwrap();

		let reopened = SqliteTable::open(&config, "orders_seq").unwrap();
		assert_eq!(cache.get(&key, &reopened.version()), Some(BoundedInteger::signed(2)));

		SqliteTable::drop_table(&config, "orders_seq").unwrap();
		let mut table = SqliteTable::create(&config, "orders_seq", ValueDomain::Int8).unwrap();
		assert_eq!(cache.get(&key, &table.version()), None);

		let engine = SequenceEngine::default();
		engine.create(&mut table, SequenceConfig::new().with_start(10).with_min_value(10)).unwrap();
		assert_eq!(cache.next_value(&key, &engine, &mut table).unwrap(), BoundedInteger::signed(10));
		assert_eq!(cache.get(&key, &table.version()), Some(BoundedInteger::signed(10)));
		Ok(())
	})
	.expect("test failed");
}

#[test]
fn test_sequences_are_cached_independently() {
	let mut cache = LastValueCache::new();
	let mut first = MemoryTable::new("a");
	let mut second = MemoryTable::new("b");

	let first_engine = SequenceEngine::default();
	first_engine.create(&mut first, SequenceConfig::new()).unwrap();
	let second_engine = SequenceEngine::default();
	second_engine.create(&mut second, SequenceConfig::new().with_start(500).with_min_value(500)).unwrap();

	let first_key = sequence_key("app", "a");
	let second_key = sequence_key("app", "b");
	cache.next_value(&first_key, &first_engine, &mut first).unwrap();
	cache.next_value(&second_key, &second_engine, &mut second).unwrap();

	assert_eq!(cache.get(&first_key, &first.version()), Some(BoundedInteger::signed(1)));
	assert_eq!(cache.get(&second_key, &second.version()), Some(BoundedInteger::signed(500)));

	second.recreate();
	assert_eq!(cache.get(&second_key, &second.version()), None);
	assert_eq!(cache.get(&first_key, &first.version()), Some(BoundedInteger::signed(1)));
}
