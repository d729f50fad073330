//! Tag reconciliation.
//!
//! Turns a board's labels into a deterministic label-id → tag-id
//! mapping while creating as few new tags as possible. Matching is by
//! lowercased name against the user's existing tag set, loaded once
//! per run.

use super::ImportContext;
use super::mapping;
use crate::store::Store;
use crate::trello::types::Label;
use crate::types::NewTag;
use anyhow::Result;
use std::collections::HashMap;
use tracing::warn;

/// Label-id → tag-id mappings produced by reconciliation, split by
/// whether the tag was newly created or matched an existing one.
#[derive(Debug, Clone, Default)]
pub struct TagMapping {
    pub created: HashMap<String, String>,
    pub existing: HashMap<String, String>,
}

impl TagMapping {
    /// Resolve a label id against both halves of the mapping.
    pub fn resolve(&self, label_id: &str) -> Option<&str> {
        self.created
            .get(label_id)
            .or_else(|| self.existing.get(label_id))
            .map(String::as_str)
    }

    pub fn created_count(&self) -> usize {
        self.created.len()
    }
}

/// Reconcile a board's labels against the user's tag set.
///
/// Unnamed labels are skipped (nothing to match on). A tag created for
/// one label is immediately visible to later labels with the same
/// name, so one import never creates duplicates. A single failed tag
/// creation is logged and skipped; it does not abort the import.
pub async fn reconcile_labels<S: Store>(
    store: &S,
    labels: &[Label],
    ctx: &ImportContext,
) -> Result<TagMapping> {
    let existing_tags = store.list_tags(&ctx.user_id).await?;
    let mut tags_by_name: HashMap<String, String> = existing_tags
        .into_iter()
        .map(|tag| (tag.name.to_lowercase(), tag.id))
        .collect();

    let mut mapping = TagMapping::default();

    for label in labels {
        let Some(name) = label.display_name() else {
            continue;
        };
        let key = name.to_lowercase();

        if let Some(tag_id) = tags_by_name.get(&key) {
            mapping.existing.insert(label.id.clone(), tag_id.clone());
            continue;
        }

        let new_tag = NewTag {
            user_id: ctx.user_id.clone(),
            name: name.to_string(),
            color: mapping::tag_color_for(label.color.as_deref()).to_string(),
        };

        match store.create_tag(new_tag).await {
            Ok(tag) => {
                mapping.created.insert(label.id.clone(), tag.id.clone());
                tags_by_name.insert(key, tag.id);
            }
            Err(e) => {
                warn!(label = %name, error = %e, "failed to create tag, skipping");
            }
        }
    }

    Ok(mapping)
}
