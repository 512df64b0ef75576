// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt,
	fmt::{Display, Formatter},
};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of one physical incarnation of a sequence table.
///
/// Dropping and re-creating a table under the same name yields a different
/// version, which is how cached last values detect that they are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableVersion([u8; 16]);

impl TableVersion {
	pub fn generate() -> Self {
		Self(*Uuid::now_v7().as_bytes())
	}

	pub const fn from_bytes(bytes: [u8; 16]) -> Self {
		Self(bytes)
	}

	pub const fn as_bytes(&self) -> &[u8; 16] {
		&self.0
	}
}

impl Display for TableVersion {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		Display::fmt(&Uuid::from_bytes(self.0), f)
	}
}
