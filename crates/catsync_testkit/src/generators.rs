//! Property-based test generators using proptest.
//!
//! Keys are drawn from a deliberately small alphabet so batches regularly
//! contain drafts that share a key.

use crate::memory::Operation;
use catsync_engine::ServiceError;
use catsync_model::{CategoryDraft, LocalizedString, ProductDraft, ProductVariant};
use proptest::prelude::*;

/// Strategy for business keys from a small pool.
pub fn key_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-f][0-2]?").expect("Invalid regex")
}

/// Strategy for localized strings with one or two locales.
pub fn localized_string_strategy() -> impl Strategy<Value = LocalizedString> {
    prop::collection::btree_map("(en|de|fr)", "[A-Za-z][A-Za-z ]{0,11}", 1..3).prop_map(|map| {
        map.into_iter()
            .fold(LocalizedString::new(), |s, (locale, value)| s.with(locale, value))
    })
}

/// Strategy for category drafts; about one in ten has no external id.
pub fn category_draft_strategy() -> impl Strategy<Value = CategoryDraft> {
    (
        prop::option::weighted(0.9, key_strategy()),
        localized_string_strategy(),
        localized_string_strategy(),
        prop::option::of(localized_string_strategy()),
        prop::option::of(key_strategy()),
        prop::option::of("0\\.[0-9]{1,3}"),
    )
        .prop_map(|(external_id, name, slug, description, parent, order_hint)| {
            CategoryDraft {
                external_id,
                name,
                slug,
                description,
                parent,
                order_hint,
                meta_title: None,
                meta_description: None,
            }
        })
}

/// Strategy for product drafts; about one in ten has no key.
pub fn product_draft_strategy() -> impl Strategy<Value = ProductDraft> {
    (
        prop::option::weighted(0.9, key_strategy()),
        localized_string_strategy(),
        localized_string_strategy(),
        prop::collection::vec(key_strategy(), 0..3),
        prop::option::of("[A-Z]{3}-[0-9]{1,4}"),
        prop::collection::btree_map("(size|color|width)", "[a-z0-9]{1,4}", 0..3),
    )
        .prop_map(|(key, name, slug, categories, sku, attributes)| ProductDraft {
            key,
            product_type: "default".into(),
            name,
            slug,
            description: None,
            categories,
            master_variant: ProductVariant { sku, attributes },
        })
}

/// Strategy for a batch of up to `max` entries, about one in seven absent.
pub fn draft_batch_strategy<S>(draft: S, max: usize) -> impl Strategy<Value = Vec<Option<S::Value>>>
where
    S: Strategy,
{
    prop::collection::vec(prop::option::weighted(0.85, draft), 0..max)
}

/// Strategy for backend operations.
pub fn operation_strategy() -> impl Strategy<Value = Operation> {
    prop_oneof![
        Just(Operation::Fetch),
        Just(Operation::Create),
        Just(Operation::Update),
        Just(Operation::Publish),
    ]
}

/// Strategy for service errors.
pub fn service_error_strategy() -> impl Strategy<Value = ServiceError> {
    prop_oneof![
        "[a-z ]{1,16}".prop_map(ServiceError::transport_retryable),
        "[a-z ]{1,16}".prop_map(ServiceError::Backend),
        Just(ServiceError::Timeout),
        (1u64..5, 5u64..9).prop_map(|(expected, actual)| ServiceError::ConcurrentModification {
            expected,
            actual
        }),
    ]
}

/// Strategy for a set of injected failures.
pub fn failure_plan_strategy() -> impl Strategy<Value = Vec<(Operation, String, ServiceError)>> {
    prop::collection::vec(
        (operation_strategy(), key_strategy(), service_error_strategy()),
        0..6,
    )
}
