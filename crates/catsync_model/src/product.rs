//! Product drafts, resources and update actions.
//!
//! Products carry two projections of their data: `current` is what is live,
//! `staged` is what the next publish will make live. Update actions always
//! write to the staged projection.

use crate::resource::{CatalogState, SyncDraft, SyncResource};
use crate::types::LocalizedString;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The master variant of a product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    /// Stock keeping unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    /// Attribute values by attribute name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl ProductVariant {
    /// Creates a variant with a SKU.
    pub fn with_sku(sku: impl Into<String>) -> Self {
        Self {
            sku: Some(sku.into()),
            attributes: BTreeMap::new(),
        }
    }

    /// Adds an attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }
}

/// Desired state of a product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    /// Business key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Product type key. Fixed at creation.
    pub product_type: String,
    /// Display name.
    pub name: LocalizedString,
    /// URL slug.
    pub slug: LocalizedString,
    /// Long description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<LocalizedString>,
    /// External ids of the categories the product belongs to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    /// Master variant.
    #[serde(default)]
    pub master_variant: ProductVariant,
}

impl ProductDraft {
    /// Creates a draft with a product type, name and slug.
    pub fn new(
        product_type: impl Into<String>,
        name: LocalizedString,
        slug: LocalizedString,
    ) -> Self {
        Self {
            product_type: product_type.into(),
            name,
            slug,
            ..Self::default()
        }
    }

    /// Sets the key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: LocalizedString) -> Self {
        self.description = Some(description);
        self
    }

    /// Adds a category by external id.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.categories.push(category.into());
        self
    }

    /// Sets the master variant.
    pub fn with_master_variant(mut self, variant: ProductVariant) -> Self {
        self.master_variant = variant;
        self
    }

    /// The data projection this draft describes.
    pub fn to_data(&self) -> ProductData {
        ProductData {
            name: self.name.clone(),
            slug: self.slug.clone(),
            description: self.description.clone(),
            categories: self.categories.clone(),
            master_variant: self.master_variant.clone(),
        }
    }
}

impl SyncDraft for ProductDraft {
    fn key(&self) -> Option<&str> {
        self.key.as_deref().filter(|k| !k.is_empty())
    }
}

/// One projection (current or staged) of a product's data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductData {
    /// Display name.
    pub name: LocalizedString,
    /// URL slug.
    pub slug: LocalizedString,
    /// Long description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<LocalizedString>,
    /// External ids of the categories the product belongs to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    /// Master variant.
    #[serde(default)]
    pub master_variant: ProductVariant,
}

/// Published and staged data of a product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCatalogData {
    /// Whether `current` is live.
    pub published: bool,
    /// Whether `staged` differs from `current`.
    pub has_staged_changes: bool,
    /// Live projection.
    pub current: ProductData,
    /// Projection the next publish makes live.
    pub staged: ProductData,
}

impl ProductCatalogData {
    fn refresh_staged_flag(&mut self) {
        self.has_staged_changes = self.staged != self.current;
    }
}

/// A product as stored on the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Backend id.
    pub id: String,
    /// Optimistic concurrency version.
    pub version: u64,
    /// Business key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Product type key.
    pub product_type: String,
    /// Catalog data.
    pub master_data: ProductCatalogData,
}

impl Product {
    /// Materializes a new, unpublished product from a draft.
    pub fn from_draft(id: impl Into<String>, draft: &ProductDraft) -> Self {
        let data = draft.to_data();
        Self {
            id: id.into(),
            version: 1,
            key: draft.key.clone(),
            product_type: draft.product_type.clone(),
            master_data: ProductCatalogData {
                published: false,
                has_staged_changes: false,
                current: data.clone(),
                staged: data,
            },
        }
    }

    /// Applies an update action to the staged projection. Does not bump the version.
    pub fn apply(&mut self, action: &ProductAction) {
        let staged = &mut self.master_data.staged;
        match action {
            ProductAction::ChangeName { name } => staged.name = name.clone(),
            ProductAction::ChangeSlug { slug } => staged.slug = slug.clone(),
            ProductAction::SetDescription { description } => {
                staged.description = description.clone()
            }
            ProductAction::AddToCategory { category } => {
                if !staged.categories.contains(category) {
                    staged.categories.push(category.clone());
                }
            }
            ProductAction::RemoveFromCategory { category } => {
                staged.categories.retain(|c| c != category)
            }
            ProductAction::SetSku { sku } => staged.master_variant.sku = sku.clone(),
            ProductAction::SetAttribute { name, value } => match value {
                Some(value) => {
                    staged
                        .master_variant
                        .attributes
                        .insert(name.clone(), value.clone());
                }
                None => {
                    staged.master_variant.attributes.remove(name);
                }
            },
        }
        self.master_data.refresh_staged_flag();
    }

    /// Promotes staged data to current. Does not bump the version.
    pub fn publish(&mut self) {
        self.master_data.current = self.master_data.staged.clone();
        self.master_data.published = true;
        self.master_data.has_staged_changes = false;
    }
}

impl SyncResource for Product {
    fn id(&self) -> &str {
        &self.id
    }

    fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn catalog_state(&self) -> Option<CatalogState> {
        Some(CatalogState::new(
            self.master_data.published,
            self.master_data.has_staged_changes,
        ))
    }
}

/// A single product mutation, applied to staged data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ProductAction {
    /// Replace the name.
    ChangeName {
        /// New name.
        name: LocalizedString,
    },
    /// Replace the slug.
    ChangeSlug {
        /// New slug.
        slug: LocalizedString,
    },
    /// Set or clear the description.
    SetDescription {
        /// New description.
        description: Option<LocalizedString>,
    },
    /// Add the product to a category.
    AddToCategory {
        /// Category external id.
        category: String,
    },
    /// Remove the product from a category.
    RemoveFromCategory {
        /// Category external id.
        category: String,
    },
    /// Set or clear the master variant SKU.
    SetSku {
        /// New SKU.
        sku: Option<String>,
    },
    /// Set or remove a master variant attribute.
    SetAttribute {
        /// Attribute name.
        name: String,
        /// New value, `None` removes the attribute.
        value: Option<String>,
    },
}
