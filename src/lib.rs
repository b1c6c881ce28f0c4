//! # Claude Costline
//!
//! Cost accounting for Claude Code status lines.
//!
//! ## Overview
//!
//! - [`cache`]: on-disk key/value cache with read-time TTLs and pruning
//! - [`pricing`]: per-model rate cards
//! - [`ledger`]: append-only log of live session cost snapshots, with
//!   windowed totals and compaction
//! - [`usage`]: transcript scanner computing rolling-window and
//!   since-midnight spend
//!
//! ## Features
//!
//! - `colors` (default): Enables terminal color output via owo-colors

/// On-disk TTL cache
pub mod cache;

/// Command-line argument parsing and configuration
pub mod cli;

/// Display formatting for text and JSON output
pub mod display;

/// Error types
pub mod error;

/// Append-only session cost ledger
pub mod ledger;

/// Stderr diagnostics via tracing
pub mod logging;

/// Data models for hooks, ledger entries and transcript lines
pub mod models;

/// Model-specific pricing calculations
pub mod pricing;

/// Transcript scanning and windowed totals
pub mod usage;

/// Utility functions for paths, formatting, and time
pub mod utils;

pub use error::{CostError, Result};
