//! Product sync: resource kind and update-action builder.

use crate::config::SyncOptions;
use crate::kind::{ResourceKind, UpdateActionBuilder};
use catsync_model::{Product, ProductAction, ProductDraft, SyncDraft};
use std::collections::BTreeSet;

/// Resource kind for products.
#[derive(Debug, Clone, Copy, Default)]
pub struct Products;

impl ResourceKind for Products {
    type Draft = ProductDraft;
    type Resource = Product;
    type Action = ProductAction;

    const SINGULAR: &'static str = "product";
    const PLURAL: &'static str = "products";
}

/// Diff of a product's staged data against its draft.
///
/// Staged data is the comparison base because it is what update actions
/// write to. Category removals precede additions; attribute removals
/// precede sets; both are sorted so the output is deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductActionBuilder;

impl UpdateActionBuilder<Products> for ProductActionBuilder {
    fn build_actions(
        &self,
        existing: &Product,
        draft: &ProductDraft,
        options: &SyncOptions<Products>,
    ) -> Vec<ProductAction> {
        let staged = &existing.master_data.staged;
        let mut actions = Vec::new();

        if existing.product_type != draft.product_type {
            options.warn(&format!(
                "product '{}' has type '{}' but the draft asks for '{}'; \
                 product types cannot be changed",
                draft.key().unwrap_or_default(),
                existing.product_type,
                draft.product_type
            ));
        }

        if staged.name != draft.name {
            actions.push(ProductAction::ChangeName {
                name: draft.name.clone(),
            });
        }
        if staged.slug != draft.slug {
            actions.push(ProductAction::ChangeSlug {
                slug: draft.slug.clone(),
            });
        }
        if staged.description != draft.description {
            actions.push(ProductAction::SetDescription {
                description: draft.description.clone(),
            });
        }

        let current: BTreeSet<&String> = staged.categories.iter().collect();
        let desired: BTreeSet<&String> = draft.categories.iter().collect();
        for category in current.difference(&desired) {
            actions.push(ProductAction::RemoveFromCategory {
                category: (*category).clone(),
            });
        }
        for category in desired.difference(&current) {
            actions.push(ProductAction::AddToCategory {
                category: (*category).clone(),
            });
        }

        let variant = &staged.master_variant;
        let target = &draft.master_variant;
        if variant.sku != target.sku {
            actions.push(ProductAction::SetSku {
                sku: target.sku.clone(),
            });
        }
        for name in variant.attributes.keys() {
            if !target.attributes.contains_key(name) {
                actions.push(ProductAction::SetAttribute {
                    name: name.clone(),
                    value: None,
                });
            }
        }
        for (name, value) in &target.attributes {
            if variant.attributes.get(name) != Some(value) {
                actions.push(ProductAction::SetAttribute {
                    name: name.clone(),
                    value: Some(value.clone()),
                });
            }
        }

        actions
    }
}
