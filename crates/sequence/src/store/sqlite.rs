// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	path::{Path, PathBuf},
	time::Duration,
};

use rusqlite::{Connection, OptionalExtension, params, params_from_iter};
use seqdb_type::ValueDomain;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::{
	Result, SequenceError,
	row::{ColumnDefinition, RowField, SEQUENCE_FIELD_COUNT, SequenceRow, check_sequence_fields, prepare_sequence_fields},
	store::SequenceTable,
	version::TableVersion,
};

const VERSIONS_TABLE: &str = "__sequence_versions";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalMode {
	Delete,
	Truncate,
	Persist,
	Memory,
	#[default]
	Wal,
	Off,
}

impl JournalMode {
	pub fn as_str(&self) -> &'static str {
		match self {
			JournalMode::Delete => "DELETE",
			JournalMode::Truncate => "TRUNCATE",
			JournalMode::Persist => "PERSIST",
			JournalMode::Memory => "MEMORY",
			JournalMode::Wal => "WAL",
			JournalMode::Off => "OFF",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SynchronousMode {
	Off,
	Normal,
	/// Every reservation reaches the disk before a value is handed out.
	#[default]
	Full,
	Extra,
}

impl SynchronousMode {
	pub fn as_str(&self) -> &'static str {
		match self {
			SynchronousMode::Off => "OFF",
			SynchronousMode::Normal => "NORMAL",
			SynchronousMode::Full => "FULL",
			SynchronousMode::Extra => "EXTRA",
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqliteConfig {
	pub path: PathBuf,
	#[serde(default)]
	pub journal_mode: JournalMode,
	#[serde(default)]
	pub synchronous_mode: SynchronousMode,
	#[serde(default = "default_busy_timeout_ms")]
	pub busy_timeout_ms: u64,
}

fn default_busy_timeout_ms() -> u64 {
	5_000
}

impl SqliteConfig {
	pub fn new(path: impl AsRef<Path>) -> Self {
		Self {
			path: path.as_ref().to_path_buf(),
			journal_mode: JournalMode::default(),
			synchronous_mode: SynchronousMode::default(),
			busy_timeout_ms: default_busy_timeout_ms(),
		}
	}

	pub fn journal_mode(mut self, mode: JournalMode) -> Self {
		self.journal_mode = mode;
		self
	}

	pub fn synchronous_mode(mut self, mode: SynchronousMode) -> Self {
		self.synchronous_mode = mode;
		self
	}

	pub fn busy_timeout(mut self, timeout: Duration) -> Self {
		self.busy_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
		self
	}
}

impl Default for SqliteConfig {
	fn default() -> Self {
		Self::new("sequences.db")
	}
}

/// A sequence table stored in a SQLite database file.
///
/// Every handle owns its own connection; several handles (possibly in
/// different threads) may point at the same table.
#[derive(Debug)]
pub struct SqliteTable {
	conn: Connection,
	name: String,
	domain: ValueDomain,
	version: TableVersion,
}

fn connect(config: &SqliteConfig) -> rusqlite::Result<Connection> {
	let conn = Connection::open(&config.path)?;
	conn.query_row(&format!("PRAGMA journal_mode = {}", config.journal_mode.as_str()), [], |row| {
		row.get::<_, String>(0)
	})?;
	conn.execute_batch(&format!("PRAGMA synchronous = {};", config.synchronous_mode.as_str()))?;
	conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))?;
	conn.execute_batch(&format!(
		"CREATE TABLE IF NOT EXISTS {VERSIONS_TABLE} (
			name    TEXT NOT NULL PRIMARY KEY,
			version BLOB NOT NULL
		)"
	))?;
	Ok(conn)
}

fn validate_name(name: &str) -> Result<()> {
	let valid = !name.is_empty()
		&& name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
		&& name != VERSIONS_TABLE;
	if !valid {
		return Err(SequenceError::config(format!("`{}` is not a valid sequence table name", name)));
	}
	Ok(())
}

fn column_list() -> String {
	RowField::ALL.iter().map(|field| field.column_name()).collect::<Vec<_>>().join(", ")
}

impl SqliteTable {
	/// Creates the table `name`, replacing any previous table of that name.
	/// The row itself is written by the engine.
	#[instrument(name = "sequence::store::sqlite::create", level = "info", skip(config), fields(path = ?config.path))]
	pub fn create(config: &SqliteConfig, name: &str, domain: ValueDomain) -> Result<Self> {
		validate_name(name)?;
		let mut conn = connect(config).map_err(|err| SequenceError::storage(name, err))?;

		let columns = prepare_sequence_fields(domain)
			.iter()
			.map(|column| format!("{} {} NOT NULL", column.name, column.domain))
			.collect::<Vec<_>>()
			.join(", ");
		let version = TableVersion::generate();

		let tx = conn.transaction().map_err(|err| SequenceError::storage(name, err))?;
		tx.execute_batch(&format!("DROP TABLE IF EXISTS \"{name}\"; CREATE TABLE \"{name}\" ({columns});"))
			.and_then(|_| {
				tx.execute(
					&format!("INSERT OR REPLACE INTO {VERSIONS_TABLE} (name, version) VALUES (?1, ?2)"),
					params![name, version.as_bytes().as_slice()],
				)
			})
			.map_err(|err| SequenceError::storage(name, err))?;
		tx.commit().map_err(|err| SequenceError::storage(name, err))?;

		debug!(table = name, %version, %domain, "created sequence table");

		Ok(Self {
			conn,
			name: name.to_string(),
			domain,
			version,
		})
	}

	/// Opens an existing table, checking that its columns form a sequence
	/// table.
	#[instrument(name = "sequence::store::sqlite::open", level = "info", skip(config), fields(path = ?config.path))]
	pub fn open(config: &SqliteConfig, name: &str) -> Result<Self> {
		validate_name(name)?;
		let conn = connect(config).map_err(|err| SequenceError::storage(name, err))?;

		let columns = Self::table_columns(&conn, name)?;
		if columns.is_empty() {
			return Err(SequenceError::storage(name, "sequence table does not exist"));
		}
		let domain = check_sequence_fields(&columns)?;

		let version: Option<Vec<u8>> = conn
			.query_row(&format!("SELECT version FROM {VERSIONS_TABLE} WHERE name = ?1"), [name], |row| {
				row.get(0)
			})
			.optional()
			.map_err(|err| SequenceError::storage(name, err))?;

		let version = version
			.and_then(|bytes| <[u8; 16]>::try_from(bytes.as_slice()).ok())
			.map(TableVersion::from_bytes)
			.ok_or_else(|| SequenceError::storage(name, "table version is missing"))?;

		Ok(Self {
			conn,
			name: name.to_string(),
			domain,
			version,
		})
	}

	#[instrument(name = "sequence::store::sqlite::drop_table", level = "info", skip(config), fields(path = ?config.path))]
	pub fn drop_table(config: &SqliteConfig, name: &str) -> Result<()> {
		validate_name(name)?;
		let mut conn = connect(config).map_err(|err| SequenceError::storage(name, err))?;

		let tx = conn.transaction().map_err(|err| SequenceError::storage(name, err))?;
		tx.execute_batch(&format!("DROP TABLE IF EXISTS \"{name}\";"))
			.and_then(|_| tx.execute(&format!("DELETE FROM {VERSIONS_TABLE} WHERE name = ?1"), [name]))
			.map_err(|err| SequenceError::storage(name, err))?;
		tx.commit().map_err(|err| SequenceError::storage(name, err))
	}

	pub fn domain(&self) -> ValueDomain {
		self.domain
	}

	fn table_columns(conn: &Connection, name: &str) -> Result<Vec<ColumnDefinition>> {
		let mut stmt = conn
			.prepare(&format!("PRAGMA table_info(\"{name}\")"))
			.map_err(|err| SequenceError::storage(name, err))?;

		let rows = stmt
			.query_map([], |row| {
				Ok((row.get::<_, String>(1)?, row.get::<_, String>(2)?, row.get::<_, i64>(3)?))
			})
			.map_err(|err| SequenceError::storage(name, err))?;

		let mut columns = Vec::new();
		for row in rows {
			let (column, declared, not_null) = row.map_err(|err| SequenceError::storage(name, err))?;
			columns.push(ColumnDefinition {
				name: column,
				domain: declared.parse()?,
				nullable: not_null == 0,
			});
		}
		Ok(columns)
	}
}

impl SequenceTable for SqliteTable {
	fn name(&self) -> &str {
		&self.name
	}

	fn version(&self) -> TableVersion {
		self.version
	}

	#[instrument(name = "sequence::store::sqlite::read_row", level = "debug", skip(self), fields(table = %self.name))]
	fn read_row(&mut self) -> Result<SequenceRow> {
		let values = self
			.conn
			.query_row(&format!("SELECT {} FROM \"{}\" LIMIT 1", column_list(), self.name), [], |row| {
				let mut values = [0i64; SEQUENCE_FIELD_COUNT];
				for (position, value) in values.iter_mut().enumerate() {
					*value = row.get(position)?;
				}
				Ok(values)
			})
			.optional()
			.map_err(|err| SequenceError::storage(&self.name, err))?;

		match values {
			Some(values) => Ok(SequenceRow::from_values(self.domain, values)),
			None => Err(SequenceError::storage(&self.name, "sequence row is missing")),
		}
	}

	#[instrument(name = "sequence::store::sqlite::write_row", level = "trace", skip(self, row), fields(table = %self.name))]
	fn write_row(&mut self, row: &SequenceRow, all_fields: bool) -> Result<()> {
		// columns are read back in the table's domain
		if row.domain() != self.domain {
			return Err(SequenceError::config(format!(
				"a {} sequence cannot be stored in the {} table {}",
				row.domain(),
				self.domain,
				self.name
			)));
		}

		let result = if all_fields {
			let placeholders = (1..=SEQUENCE_FIELD_COUNT).map(|i| format!("?{i}")).collect::<Vec<_>>().join(", ");
			let name = &self.name;
			self.conn.transaction().and_then(|tx| {
				tx.execute(&format!("DELETE FROM \"{name}\""), [])?;
				tx.execute(
					&format!("INSERT INTO \"{name}\" ({}) VALUES ({placeholders})", column_list()),
					params_from_iter(row.values().iter()),
				)?;
				tx.commit()
			})
		} else {
			self.conn
				.execute(
					&format!(
						"UPDATE \"{}\" SET {} = ?1, {} = ?2",
						self.name,
						RowField::Next.column_name(),
						RowField::Round.column_name()
					),
					params![row.get_i64(RowField::Next), row.get_i64(RowField::Round)],
				)
				.and_then(|updated| match updated {
					0 => Err(rusqlite::Error::QueryReturnedNoRows),
					_ => Ok(()),
				})
		};

		result.map_err(|err| {
			warn!(table = %self.name, error = %err, "sequence row write failed");
			SequenceError::storage(&self.name, err)
		})
	}
}
