// Copyright (c) 2025 - Cowboy AI, Inc.
//! Tracing subscriber setup
//!
//! Filters come from `RUST_LOG`, with `default_level` added as a directive
//! so the binary is never silent by accident.

use tracing::Level;
use tracing_subscriber::EnvFilter;

fn filter(default_level: Level) -> EnvFilter {
    EnvFilter::from_default_env().add_directive(default_level.into())
}

/// Install a global fmt subscriber; panics if one is already set
pub fn init_logging(default_level: Level) {
    tracing_subscriber::fmt()
        .with_env_filter(filter(default_level))
        .init();
}

/// Install a global fmt subscriber unless one is already set
///
/// Returns `false` if another subscriber was installed first.
pub fn try_init_logging(default_level: Level) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(filter(default_level))
        .try_init()
        .is_ok()
}
