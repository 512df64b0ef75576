// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Value generation for SQL sequences.
//!
//! A [`SequenceEngine`] hands out the values of one sequence from an
//! in-memory window and persists the end of that window to a
//! [`SequenceTable`] before any value inside it is returned. After a crash
//! the engine resumes at the persisted end, so values may be skipped but are
//! never handed out twice.

pub mod config;
pub mod engine;
mod error;
pub mod fields;
pub mod last_value;
pub mod row;
pub mod settings;
pub mod state;
pub mod store;
pub mod test_utils;
mod version;

pub use config::SequenceConfig;
pub use engine::{SequenceEngine, SequenceSnapshot, SetValue};
pub use error::SequenceError;
pub use fields::{SequenceField, UsedFields};
pub use last_value::{LastValue, LastValueCache, sequence_key};
pub use row::{ColumnDefinition, RowField, SequenceRow, check_sequence_fields, prepare_sequence_fields};
pub use settings::AutoIncrement;
pub use state::InitState;
pub use store::{JournalMode, MemoryTable, SequenceTable, SqliteConfig, SqliteTable, SynchronousMode};
pub use version::TableVersion;

pub type Result<T> = std::result::Result<T, SequenceError>;
