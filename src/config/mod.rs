//! Configuration module for static page snapshots
//!
//! This module provides the `SnapshotConfig` struct and its builder for
//! tuning fetch timeouts, size limits and import depth with validation and
//! sensible defaults.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod methods;
pub mod types;

// Re-exports for public API
pub use builder::{ConfigError, SnapshotConfigBuilder};
pub use types::SnapshotConfig;
