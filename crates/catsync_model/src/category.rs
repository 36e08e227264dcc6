//! Category drafts, resources and update actions.

use crate::resource::{SyncDraft, SyncResource};
use crate::types::LocalizedString;
use serde::{Deserialize, Serialize};

/// Desired state of a category.
///
/// Categories are correlated by `external_id`. The parent is referenced by
/// the parent's external id as well, so a whole tree can be described
/// without knowing backend ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDraft {
    /// Business key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    /// Display name.
    pub name: LocalizedString,
    /// URL slug.
    pub slug: LocalizedString,
    /// Long description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<LocalizedString>,
    /// External id of the parent category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Sort position among siblings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_hint: Option<String>,
    /// SEO title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<LocalizedString>,
    /// SEO description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<LocalizedString>,
}

impl CategoryDraft {
    /// Creates a draft with a name and slug.
    pub fn new(name: LocalizedString, slug: LocalizedString) -> Self {
        Self {
            name,
            slug,
            ..Self::default()
        }
    }

    /// Sets the external id.
    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: LocalizedString) -> Self {
        self.description = Some(description);
        self
    }

    /// Sets the parent by external id.
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Sets the order hint.
    pub fn with_order_hint(mut self, order_hint: impl Into<String>) -> Self {
        self.order_hint = Some(order_hint.into());
        self
    }
}

impl SyncDraft for CategoryDraft {
    fn key(&self) -> Option<&str> {
        self.external_id.as_deref().filter(|k| !k.is_empty())
    }
}

/// A category as stored on the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Backend id.
    pub id: String,
    /// Optimistic concurrency version.
    pub version: u64,
    /// Business key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    /// Display name.
    pub name: LocalizedString,
    /// URL slug.
    pub slug: LocalizedString,
    /// Long description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<LocalizedString>,
    /// External id of the parent category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Sort position among siblings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_hint: Option<String>,
    /// SEO title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<LocalizedString>,
    /// SEO description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<LocalizedString>,
}

impl Category {
    /// Materializes a new category from a draft, as the backend would on create.
    pub fn from_draft(id: impl Into<String>, draft: &CategoryDraft) -> Self {
        Self {
            id: id.into(),
            version: 1,
            external_id: draft.external_id.clone(),
            name: draft.name.clone(),
            slug: draft.slug.clone(),
            description: draft.description.clone(),
            parent: draft.parent.clone(),
            order_hint: draft.order_hint.clone(),
            meta_title: draft.meta_title.clone(),
            meta_description: draft.meta_description.clone(),
        }
    }

    /// Applies an update action in place. Does not bump the version.
    pub fn apply(&mut self, action: &CategoryAction) {
        match action {
            CategoryAction::ChangeName { name } => self.name = name.clone(),
            CategoryAction::ChangeSlug { slug } => self.slug = slug.clone(),
            CategoryAction::SetDescription { description } => {
                self.description = description.clone()
            }
            CategoryAction::ChangeParent { parent } => self.parent = parent.clone(),
            CategoryAction::ChangeOrderHint { order_hint } => {
                self.order_hint = order_hint.clone()
            }
            CategoryAction::SetMetaTitle { meta_title } => self.meta_title = meta_title.clone(),
            CategoryAction::SetMetaDescription { meta_description } => {
                self.meta_description = meta_description.clone()
            }
        }
    }
}

impl SyncResource for Category {
    fn id(&self) -> &str {
        &self.id
    }

    fn key(&self) -> Option<&str> {
        self.external_id.as_deref()
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// A single category mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum CategoryAction {
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
    /// Move the category under another parent, or to the root.
    ChangeParent {
        /// External id of the new parent.
        parent: Option<String>,
    },
    /// Set or clear the order hint.
    ChangeOrderHint {
        /// New order hint.
        #[serde(rename = "orderHint")]
        order_hint: Option<String>,
    },
    /// Set or clear the SEO title.
    SetMetaTitle {
        /// New title.
        #[serde(rename = "metaTitle")]
        meta_title: Option<LocalizedString>,
    },
    /// Set or clear the SEO description.
    SetMetaDescription {
        /// New description.
        #[serde(rename = "metaDescription")]
        meta_description: Option<LocalizedString>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> CategoryDraft {
        CategoryDraft::new(
            LocalizedString::of("en", "Shoes"),
            LocalizedString::of("en", "shoes"),
        )
    }

    #[test]
    fn empty_external_id_is_no_key() {
        assert_eq!(draft().key(), None);
        assert_eq!(draft().with_external_id("").key(), None);
        assert_eq!(draft().with_external_id("cat-1").key(), Some("cat-1"));
    }

    #[test]
    fn from_draft_copies_fields() {
        let d = draft().with_external_id("cat-1").with_parent("root");
        let category = Category::from_draft("id-1", &d);
        assert_eq!(category.version, 1);
        assert_eq!(category.key(), Some("cat-1"));
        assert_eq!(category.parent.as_deref(), Some("root"));
        assert_eq!(category.catalog_state(), None);
    }

    #[test]
    fn apply_change_parent() {
        let mut category = Category::from_draft("id-1", &draft());
        category.apply(&CategoryAction::ChangeParent {
            parent: Some("men".into()),
        });
        assert_eq!(category.parent.as_deref(), Some("men"));
    }

    #[test]
    fn action_json_is_tagged() {
        let action = CategoryAction::ChangeOrderHint {
            order_hint: Some("0.1".into()),
        };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["action"], "changeOrderHint");
        assert_eq!(json["orderHint"], "0.1");
    }
}
