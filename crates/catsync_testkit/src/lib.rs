//! # catsync testkit
//!
//! Test utilities for catsync.
//!
//! This crate provides:
//! - Fixtures: client config, drafts, and options that record callbacks
//! - Property-based test generators using proptest
//! - `InMemoryService`, a backend with real create/update/publish semantics
//!   and per-key failure injection
//! - Tracing setup for tests
//!
//! ## Usage
//!
//! ```rust,ignore
//! use catsync_testkit::prelude::*;
//!
//! #[test]
//! fn creates_missing_categories() {
//!     let (options, recorder) = recording_options::<Categories>();
//!     let service = InMemoryService::<Categories>::new();
//!     let sync = CategorySync::new(Arc::new(options), service);
//!     // ... sync drafts, inspect recorder and service
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod memory;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::init_tracing;
    pub use crate::memory::*;
    pub use catsync_engine::*;
    pub use catsync_model::*;
    pub use std::sync::Arc;
}

pub use fixtures::*;
pub use generators::*;
pub use memory::*;

/// Installs a tracing subscriber that writes through the test harness.
///
/// Filtering follows `RUST_LOG`. Safe to call from every test; only the
/// first call installs anything.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
