//! JSON encoding for drafts and resources.

use crate::error::{ModelError, ModelResult};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Decodes a JSON array of drafts.
///
/// `null` entries decode to `None` and are kept in place, so the caller sees
/// the batch exactly as it was supplied.
pub fn drafts_from_json<D: DeserializeOwned>(json: &str) -> ModelResult<Vec<Option<D>>> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    if !value.is_array() {
        return Err(ModelError::invalid_structure("expected a JSON array of drafts"));
    }
    Ok(serde_json::from_value(value)?)
}

/// Encodes a value as compact JSON.
pub fn to_json<T: Serialize>(value: &T) -> ModelResult<String> {
    Ok(serde_json::to_string(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CategoryAction, CategoryDraft, LocalizedString, ProductDraft, SyncDraft};

    #[test]
    fn decodes_category_batch_with_nulls() {
        let json = r#"[
            {"externalId": "shoes", "name": {"en": "Shoes"}, "slug": {"en": "shoes"}},
            null,
            {"name": {"en": "Hats"}, "slug": {"en": "hats"}, "parent": "shoes"}
        ]"#;
        let drafts: Vec<Option<CategoryDraft>> = drafts_from_json(json).unwrap();
        assert_eq!(drafts.len(), 3);
        assert_eq!(drafts[0].as_ref().unwrap().key(), Some("shoes"));
        assert!(drafts[1].is_none());
        assert_eq!(drafts[2].as_ref().unwrap().key(), None);
        assert_eq!(drafts[2].as_ref().unwrap().parent.as_deref(), Some("shoes"));
    }

    #[test]
    fn decodes_product_draft() {
        let json = r#"[{
            "key": "runner",
            "productType": "shoe",
            "name": {"en": "Runner"},
            "slug": {"en": "runner"},
            "categories": ["shoes"],
            "masterVariant": {"sku": "RUN-1", "attributes": {"size": "42"}}
        }]"#;
        let drafts: Vec<Option<ProductDraft>> = drafts_from_json(json).unwrap();
        let draft = drafts[0].as_ref().unwrap();
        assert_eq!(draft.key(), Some("runner"));
        assert_eq!(draft.master_variant.sku.as_deref(), Some("RUN-1"));
        assert_eq!(draft.master_variant.attributes["size"], "42");
    }

    #[test]
    fn rejects_non_array() {
        let result: ModelResult<Vec<Option<CategoryDraft>>> = drafts_from_json("{}");
        assert!(matches!(result, Err(ModelError::InvalidStructure { .. })));
    }

    #[test]
    fn rejects_malformed_json() {
        let result: ModelResult<Vec<Option<CategoryDraft>>> = drafts_from_json("[");
        assert!(matches!(result, Err(ModelError::Json(_))));
    }

    #[test]
    fn encodes_actions_with_their_tag() {
        let action = CategoryAction::ChangeParent {
            parent: Some("shoes".into()),
        };
        let json = to_json(&action).unwrap();
        assert!(json.contains(r#""action":"changeParent""#));

        let decoded: CategoryAction = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, action);
    }

    #[test]
    fn encoded_drafts_decode_as_a_batch() {
        let shoes = CategoryDraft::new(
            LocalizedString::of("en", "Shoes"),
            LocalizedString::of("en", "shoes"),
        )
        .with_external_id("shoes");
        let drafts = vec![Some(shoes), None];
        let json = to_json(&drafts).unwrap();

        let decoded: Vec<Option<CategoryDraft>> = drafts_from_json(&json).unwrap();
        assert_eq!(decoded, drafts);
    }
}
