//! # catsync model
//!
//! Draft, resource and update-action types shared by the catsync engine.
//!
//! This crate provides:
//! - `CategoryDraft` / `Category` / `CategoryAction`
//! - `ProductDraft` / `Product` / `ProductAction` with staged and current catalog data
//! - `SyncDraft` and `SyncResource`, the views the engine works through
//! - JSON decoding of draft batches
//!
//! This is a pure data crate with no I/O operations.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod category;
mod codec;
mod error;
mod product;
mod resource;
mod types;

pub use category::{Category, CategoryAction, CategoryDraft};
pub use codec::{drafts_from_json, to_json};
pub use error::{ModelError, ModelResult};
pub use product::{
    Product, ProductAction, ProductCatalogData, ProductData, ProductDraft, ProductVariant,
};
pub use resource::{CatalogState, SyncDraft, SyncResource};
pub use types::LocalizedString;
