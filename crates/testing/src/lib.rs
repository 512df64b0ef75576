// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

mod logging;
pub mod tempdir;

pub use logging::init_tracing;
pub use tempdir::temp_dir;
