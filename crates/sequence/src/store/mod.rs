// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Durable storage of the single row that backs a sequence.

mod memory;
mod sqlite;

pub use memory::MemoryTable;
pub use sqlite::{JournalMode, SqliteConfig, SqliteTable, SynchronousMode};

use crate::{Result, row::SequenceRow, version::TableVersion};

/// A table holding exactly one [`SequenceRow`].
///
/// Handles are not shared between threads; every worker owns its own
/// handle onto the same underlying table.
pub trait SequenceTable {
	fn name(&self) -> &str;

	fn version(&self) -> TableVersion;

	fn read_row(&mut self) -> Result<SequenceRow>;

	/// Persists `row`. With `all_fields == false` only the reservation
	/// (`Next`) and the round (`Round`) columns are written.
	fn write_row(&mut self, row: &SequenceRow, all_fields: bool) -> Result<()>;
}

impl<T: SequenceTable + ?Sized> SequenceTable for &mut T {
	fn name(&self) -> &str {
		(**self).name()
	}

	fn version(&self) -> TableVersion {
		(**self).version()
	}

	fn read_row(&mut self) -> Result<SequenceRow> {
		(**self).read_row()
	}

	fn write_row(&mut self, row: &SequenceRow, all_fields: bool) -> Result<()> {
		(**self).write_row(row, all_fields)
	}
}

impl<T: SequenceTable + ?Sized> SequenceTable for Box<T> {
	fn name(&self) -> &str {
		(**self).name()
	}

	fn version(&self) -> TableVersion {
		(**self).version()
	}

	fn read_row(&mut self) -> Result<SequenceRow> {
		(**self).read_row()
	}

	fn write_row(&mut self, row: &SequenceRow, all_fields: bool) -> Result<()> {
		(**self).write_row(row, all_fields)
	}
}
