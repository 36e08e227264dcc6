//! # catsync engine
//!
//! Syncs locally supplied drafts into a remote commerce catalog.
//!
//! This crate provides:
//! - `ResourceSync`, the fetch → diff-or-create → update → publish pipeline
//! - `SyncOptions` with error/warning callbacks, publish policy and an actions filter
//! - `SyncStatistics` counters and the batch summary
//! - `ResourceService`, the seam to the remote backend, plus a scripted mock
//! - Category and product resource kinds with their update-action builders
//!
//! ## Pipeline
//!
//! For each draft in a batch:
//! 1. Absent drafts are skipped; drafts without a key fail without a remote call
//! 2. The resource is fetched by key
//! 3. Missing resources are created; existing ones are diffed and updated
//! 4. With publishing enabled, unpublished or staged resources are published
//!
//! ## Key Invariants
//!
//! - A failing draft never aborts the batch
//! - Every non-absent draft is counted exactly once
//! - `processed == created + updated + failed + unchanged` once a batch returns
//! - Drafts with the same key are never synced concurrently

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod category;
mod config;
mod engine;
mod error;
mod kind;
mod product;
mod service;
mod stats;

pub use category::{Categories, CategoryActionBuilder};
pub use config::{ActionsFilter, ClientConfig, ErrorCallback, SyncOptions, WarningCallback};
pub use engine::{CategorySync, ProductSync, ResourceSync};
pub use error::{ConfigError, ServiceError, ServiceResult, SyncError};
pub use kind::{ResourceKind, UpdateActionBuilder};
pub use product::{ProductActionBuilder, Products};
pub use service::{MockResourceService, ResourceService};
pub use stats::{StatisticsSnapshot, SyncStatistics};
