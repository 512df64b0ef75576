// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{instrument, warn};

use crate::{
	Result, SequenceError,
	row::{RowField, SequenceRow},
	store::SequenceTable,
	version::TableVersion,
};

/// An in-process sequence table.
///
/// Clones are handles onto the same row. Writes can be made to fail on
/// demand to exercise the error paths of the engine.
#[derive(Debug, Clone)]
pub struct MemoryTable {
	name: Arc<str>,
	inner: Arc<Mutex<MemoryTableInner>>,
}

#[derive(Debug)]
struct MemoryTableInner {
	row: Option<SequenceRow>,
	version: TableVersion,
	writes: u64,
	failing_writes: u32,
}

impl MemoryTable {
	pub fn new(name: impl Into<String>) -> Self {
		let name: String = name.into();
		Self {
			name: Arc::from(name),
			inner: Arc::new(Mutex::new(MemoryTableInner {
				row: None,
				version: TableVersion::generate(),
				writes: 0,
				failing_writes: 0,
			})),
		}
	}

	pub fn row(&self) -> Option<SequenceRow> {
		self.inner.lock().row.clone()
	}

	/// Number of successful writes since creation.
	pub fn write_count(&self) -> u64 {
		self.inner.lock().writes
	}

	/// Makes the next `count` writes fail with a storage error.
	pub fn fail_next_writes(&self, count: u32) {
		self.inner.lock().failing_writes = count;
	}

	/// Drops the table and creates it again: the row is gone and the table
	/// gets a new version.
	pub fn recreate(&self) {
		let mut inner = self.inner.lock();
		inner.row = None;
		inner.version = TableVersion::generate();
		inner.writes = 0;
		inner.failing_writes = 0;
	}
}

impl SequenceTable for MemoryTable {
	fn name(&self) -> &str {
		&self.name
	}

	fn version(&self) -> TableVersion {
		self.inner.lock().version
	}

	fn read_row(&mut self) -> Result<SequenceRow> {
		self.inner.lock().row.clone().ok_or_else(|| SequenceError::storage(&self.name, "sequence row is missing"))
	}

	#[instrument(name = "sequence::store::memory::write_row", level = "trace", skip(self, row), fields(table = %self.name))]
	fn write_row(&mut self, row: &SequenceRow, all_fields: bool) -> Result<()> {
		let mut inner = self.inner.lock();

		if inner.failing_writes > 0 {
			inner.failing_writes -= 1;
			warn!(table = %self.name, "injected write failure");
			return Err(SequenceError::storage(&self.name, "injected write failure"));
		}

		if all_fields {
			inner.row = Some(row.clone());
		} else {
			let Some(stored) = inner.row.as_mut() else {
				return Err(SequenceError::storage(&self.name, "sequence row is missing"));
			};
			stored.set_i64(RowField::Next, row.get_i64(RowField::Next));
			stored.set_i64(RowField::Round, row.get_i64(RowField::Round));
		}

		inner.writes += 1;
		Ok(())
	}
}
