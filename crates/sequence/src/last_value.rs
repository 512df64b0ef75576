// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::collections::HashMap;

use seqdb_type::BoundedInteger;
use tracing::trace;

use crate::{Result, SequenceEngine, store::SequenceTable, version::TableVersion};

/// The key under which the last value of `namespace.name` is cached.
pub fn sequence_key(namespace: &str, name: &str) -> Vec<u8> {
	let mut key = Vec::with_capacity(namespace.len() + name.len() + 1);
	key.extend_from_slice(namespace.as_bytes());
	key.push(0);
	key.extend_from_slice(name.as_bytes());
	key
}

/// The last value a session obtained from one sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastValue {
	key: Box<[u8]>,
	value: BoundedInteger,
	null_value: bool,
	table_version: TableVersion,
}

impl LastValue {
	pub fn new(key: &[u8], table_version: TableVersion) -> Self {
		Self {
			key: key.into(),
			value: BoundedInteger::signed(0),
			null_value: true,
			table_version,
		}
	}

	pub fn key(&self) -> &[u8] {
		&self.key
	}

	pub fn value(&self) -> Option<BoundedInteger> {
		(!self.null_value).then_some(self.value)
	}

	/// Whether the entry was recorded against the table `version`.
	pub fn check_version(&self, version: &TableVersion) -> bool {
		self.table_version == *version
	}

	pub fn set_version(&mut self, version: TableVersion) {
		self.table_version = version;
	}
}

/// Per-session cache of the last value produced by each sequence.
///
/// An entry is only returned while the table it came from still has the same
/// version; a dropped and re-created sequence never surfaces the value of its
/// predecessor.
#[derive(Debug, Default)]
pub struct LastValueCache {
	entries: HashMap<Box<[u8]>, LastValue>,
}

impl LastValueCache {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn get(&mut self, key: &[u8], version: &TableVersion) -> Option<BoundedInteger> {
		let entry = self.entries.get(key)?;
		if entry.check_version(version) {
			return entry.value();
		}

		trace!(key = ?key, "evicting stale last value");
		self.entries.remove(key);
		None
	}

	pub fn set(&mut self, key: &[u8], value: BoundedInteger, version: TableVersion) {
		let entry = self.entry(key, version);
		entry.value = value;
		entry.null_value = false;
	}

	pub fn set_null(&mut self, key: &[u8], version: TableVersion) {
		self.entry(key, version).null_value = true;
	}

	fn entry(&mut self, key: &[u8], version: TableVersion) -> &mut LastValue {
		let entry = self.entries.entry(key.into()).or_insert_with(|| LastValue::new(key, version));
		entry.set_version(version);
		entry
	}

	pub fn remove(&mut self, key: &[u8]) -> Option<LastValue> {
		self.entries.remove(key)
	}

	pub fn clear(&mut self) {
		self.entries.clear();
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Draws the next value from `engine` and remembers it under `key`.
	pub fn next_value<T: SequenceTable + ?Sized>(
		&mut self,
		key: &[u8],
		engine: &SequenceEngine,
		table: &mut T,
	) -> Result<BoundedInteger> {
		let value = engine.next_value(table)?;
		self.set(key, value, table.version());
		Ok(value)
	}
}

#[cfg(test)]
mod tests {
	use super::{LastValueCache, sequence_key};
	use crate::{
		SequenceConfig,
		store::SequenceTable,
		test_utils::{bounded, create_test_sequence},
		version::TableVersion,
	};

	#[test]
	fn test_get_set() {
		let mut cache = LastValueCache::new();
		let key = sequence_key("app", "orders_seq");
		let version = TableVersion::generate();

		assert_eq!(cache.get(&key, &version), None);
		cache.set(&key, bounded(7), version);
		assert_eq!(cache.get(&key, &version), Some(bounded(7)));

		cache.set(&key, bounded(8), version);
		assert_eq!(cache.get(&key, &version), Some(bounded(8)));
		assert_eq!(cache.len(), 1);
	}

	#[test]
	fn test_stale_version_is_a_miss() {
		let mut cache = LastValueCache::new();
		let key = sequence_key("app", "s1");
		cache.set(&key, bounded(42), TableVersion::generate());

		assert_eq!(cache.get(&key, &TableVersion::generate()), None);
		assert!(cache.is_empty());
	}

	#[test]
	fn test_null_is_a_miss() {
		let mut cache = LastValueCache::new();
		let key = sequence_key("app", "s1");
		let version = TableVersion::generate();
		cache.set(&key, bounded(1), version);
		cache.set_null(&key, version);

		assert_eq!(cache.get(&key, &version), None);
		assert_eq!(cache.len(), 1);
		assert_eq!(cache.remove(&key).unwrap().key(), key.as_slice());
	}

	#[test]
	fn test_keys_are_separated_by_namespace() {
		assert_ne!(sequence_key("ab", "c"), sequence_key("a", "bc"));

		let mut cache = LastValueCache::new();
		let version = TableVersion::generate();
		cache.set(&sequence_key("a", "s"), bounded(1), version);
		cache.set(&sequence_key("b", "s"), bounded(2), version);
		assert_eq!(cache.get(&sequence_key("b", "s"), &version), Some(bounded(2)));
		cache.clear();
		assert!(cache.is_empty());
	}

	#[test]
	fn test_next_value_records_result() {
		let (engine, mut table) = create_test_sequence(SequenceConfig::new());
		let mut cache = LastValueCache::new();
		let key = sequence_key("app", "s1");

		let value = cache.next_value(&key, &engine, &mut table).unwrap();
		assert_eq!(value, bounded(1));
		assert_eq!(cache.get(&key, &table.version()), Some(bounded(1)));

		table.recreate();
		assert_eq!(cache.get(&key, &table.version()), None);
	}
}
