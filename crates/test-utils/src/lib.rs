//! Shared test utilities for the zonal-stats workspace.
//!
//! This crate provides common testing infrastructure:
//! - Pixel grid generators with predictable values
//! - Boundary feature fixtures
//! - An in-memory single-band GeoTIFF encoder for decoder/loader tests
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;
