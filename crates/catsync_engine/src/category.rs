//! Category sync: resource kind and update-action builder.

use crate::config::SyncOptions;
use crate::kind::{ResourceKind, UpdateActionBuilder};
use catsync_model::{Category, CategoryAction, CategoryDraft, SyncDraft};

/// Resource kind for categories.
#[derive(Debug, Clone, Copy, Default)]
pub struct Categories;

impl ResourceKind for Categories {
    type Draft = CategoryDraft;
    type Resource = Category;
    type Action = CategoryAction;

    const SINGULAR: &'static str = "category";
    const PLURAL: &'static str = "categories";
}

/// Field-by-field diff of a category against its draft.
///
/// Emits, in order: name, slug, description, parent, order hint, meta title,
/// meta description. Renames come before re-parenting.
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryActionBuilder;

impl UpdateActionBuilder<Categories> for CategoryActionBuilder {
    fn build_actions(
        &self,
        existing: &Category,
        draft: &CategoryDraft,
        options: &SyncOptions<Categories>,
    ) -> Vec<CategoryAction> {
        let mut actions = Vec::new();

        if existing.name != draft.name {
            actions.push(CategoryAction::ChangeName {
                name: draft.name.clone(),
            });
        }
        if existing.slug != draft.slug {
            actions.push(CategoryAction::ChangeSlug {
                slug: draft.slug.clone(),
            });
        }
        if existing.description != draft.description {
            actions.push(CategoryAction::SetDescription {
                description: draft.description.clone(),
            });
        }

        if draft.parent.is_some() && draft.parent.as_deref() == draft.key() {
            options.warn(&format!(
                "category '{}' cannot be its own parent; parent left unchanged",
                draft.key().unwrap_or_default()
            ));
        } else if existing.parent != draft.parent {
            actions.push(CategoryAction::ChangeParent {
                parent: draft.parent.clone(),
            });
        }

        if existing.order_hint != draft.order_hint {
            actions.push(CategoryAction::ChangeOrderHint {
                order_hint: draft.order_hint.clone(),
            });
        }
        if existing.meta_title != draft.meta_title {
            actions.push(CategoryAction::SetMetaTitle {
                meta_title: draft.meta_title.clone(),
            });
        }
        if existing.meta_description != draft.meta_description {
            actions.push(CategoryAction::SetMetaDescription {
                meta_description: draft.meta_description.clone(),
            });
        }

        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use catsync_model::LocalizedString;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn options() -> SyncOptions<Categories> {
        SyncOptions::new(ClientConfig::new("testPK", "testCI", "testCS"))
    }

    fn draft() -> CategoryDraft {
        CategoryDraft::new(
            LocalizedString::of("en", "Shoes"),
            LocalizedString::of("en", "shoes"),
        )
        .with_external_id("shoes")
    }

    #[test]
    fn identical_category_needs_no_actions() {
        let existing = Category::from_draft("id-1", &draft());
        let actions = CategoryActionBuilder.build_actions(&existing, &draft(), &options());
        assert!(actions.is_empty());
    }

    #[test]
    fn rename_comes_before_reparent() {
        let existing = Category::from_draft("id-1", &draft());
        let mut changed = draft().with_parent("men");
        changed.name = LocalizedString::of("en", "Sneakers");

        let actions = CategoryActionBuilder.build_actions(&existing, &changed, &options());
        assert_eq!(
            actions,
            vec![
                CategoryAction::ChangeName {
                    name: LocalizedString::of("en", "Sneakers"),
                },
                CategoryAction::ChangeParent {
                    parent: Some("men".into()),
                },
            ]
        );
    }

    #[test]
    fn clearing_optional_fields_emits_unset_actions() {
        let existing = Category::from_draft(
            "id-1",
            &draft()
                .with_description(LocalizedString::of("en", "All shoes"))
                .with_order_hint("0.5"),
        );

        let actions = CategoryActionBuilder.build_actions(&existing, &draft(), &options());
        assert_eq!(
            actions,
            vec![
                CategoryAction::SetDescription { description: None },
                CategoryAction::ChangeOrderHint { order_hint: None },
            ]
        );
    }

    #[test]
    fn self_parent_warns_and_is_skipped() {
        let warnings = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&warnings);
        let options = options().with_warning_callback(move |m| sink.lock().push(m.to_string()));

        let existing = Category::from_draft("id-1", &draft());
        let actions =
            CategoryActionBuilder.build_actions(&existing, &draft().with_parent("shoes"), &options);

        assert!(actions.is_empty());
        let warnings = warnings.lock();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("own parent"));
    }
}
