//! Test fixtures.
//!
//! Convenience constructors for drafts, resources and options whose
//! callbacks record what they were told.

use catsync_engine::{ClientConfig, ResourceKind, ServiceError, SyncOptions};
use catsync_model::{CategoryDraft, LocalizedString, ProductDraft, ProductVariant};
use parking_lot::Mutex;
use std::sync::Arc;

/// A client config with placeholder credentials.
pub fn test_client() -> ClientConfig {
    ClientConfig::new("testPK", "testCI", "testCS")
}

/// A category draft whose name and slug derive from `key`.
pub fn category_draft(key: &str) -> CategoryDraft {
    CategoryDraft::new(
        LocalizedString::of("en", key),
        LocalizedString::of("en", key.to_lowercase()),
    )
    .with_external_id(key)
}

/// A category draft without an external id.
pub fn category_draft_without_key(name: &str) -> CategoryDraft {
    CategoryDraft::new(
        LocalizedString::of("en", name),
        LocalizedString::of("en", name.to_lowercase()),
    )
}

/// A product draft whose name, slug and SKU derive from `key`.
pub fn product_draft(key: &str) -> ProductDraft {
    ProductDraft::new(
        "default",
        LocalizedString::of("en", key),
        LocalizedString::of("en", key.to_lowercase()),
    )
    .with_key(key)
    .with_master_variant(ProductVariant::with_sku(format!("SKU-{key}")))
}

/// A reported error: the message and the backend cause, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportedError {
    /// Message given to the error callback.
    pub message: String,
    /// Backend cause, `None` for validation failures.
    pub cause: Option<ServiceError>,
}

/// Collects everything the sync callbacks were told.
#[derive(Debug, Clone, Default)]
pub struct CallbackRecorder {
    errors: Arc<Mutex<Vec<ReportedError>>>,
    warnings: Arc<Mutex<Vec<String>>>,
}

impl CallbackRecorder {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Errors reported so far, in order.
    pub fn errors(&self) -> Vec<ReportedError> {
        self.errors.lock().clone()
    }

    /// Warnings reported so far, in order.
    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().clone()
    }

    /// Wires this recorder into `options`.
    pub fn attach<K: ResourceKind>(&self, options: SyncOptions<K>) -> SyncOptions<K> {
        let errors = Arc::clone(&self.errors);
        let warnings = Arc::clone(&self.warnings);
        options
            .with_error_callback(move |message, cause| {
                errors.lock().push(ReportedError {
                    message: message.to_string(),
                    cause: cause.cloned(),
                })
            })
            .with_warning_callback(move |message| warnings.lock().push(message.to_string()))
    }
}

/// Options with recording callbacks and defaults otherwise.
pub fn recording_options<K: ResourceKind>() -> (SyncOptions<K>, CallbackRecorder) {
    let recorder = CallbackRecorder::new();
    let options = SyncOptions::try_new(test_client()).expect("test client config is valid");
    let options = recorder.attach(options);
    (options, recorder)
}

/// Ready-made batches.
pub mod scenarios {
    use super::*;

    /// A category tree: one root and `children` direct children, parents first.
    pub fn category_tree(children: usize) -> Vec<CategoryDraft> {
        let mut drafts = vec![category_draft("root")];
        drafts.extend(
            (0..children).map(|i| category_draft(&format!("child-{i}")).with_parent("root")),
        );
        drafts
    }

    /// `count` products, each in the `all` category.
    pub fn product_catalog(count: usize) -> Vec<ProductDraft> {
        (0..count)
            .map(|i| product_draft(&format!("product-{i}")).with_category("all"))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catsync_engine::Categories;
    use catsync_model::SyncDraft;

    #[test]
    fn drafts_have_keys() {
        assert_eq!(category_draft("shoes").key(), Some("shoes"));
        assert_eq!(product_draft("runner").key(), Some("runner"));
        assert_eq!(category_draft_without_key("shoes").key(), None);
    }

    #[test]
    fn recorder_captures_warnings() {
        let (options, recorder) = recording_options::<Categories>();
        options.warn("heads up");
        assert_eq!(recorder.warnings(), vec!["heads up".to_string()]);
        assert!(recorder.errors().is_empty());
    }

    #[test]
    fn category_tree_lists_parent_first() {
        let tree = scenarios::category_tree(3);
        assert_eq!(tree.len(), 4);
        assert_eq!(tree[0].key(), Some("root"));
        assert!(tree[1..].iter().all(|d| d.parent.as_deref() == Some("root")));
    }
}
