// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tracing_subscriber::EnvFilter;

/// Installs a test-friendly subscriber honouring `RUST_LOG` (default
/// `warn`). Safe to call from every test; only the first call wins.
pub fn init_tracing() {
	let _ = tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
		.with_test_writer()
		.try_init();
	tracing::trace!("test tracing initialised");
}
