//! Resource kinds and the update-action builder contract.

use crate::config::SyncOptions;
use catsync_model::{SyncDraft, SyncResource};
use std::fmt::Debug;

/// Type-level description of one syncable resource type.
///
/// A kind ties together the draft, resource and action types the engine
/// moves around, plus the names used in messages and the summary.
pub trait ResourceKind: Send + Sync + 'static {
    /// Desired state supplied by the caller.
    type Draft: SyncDraft + Debug + Send + Sync;
    /// Remote representation.
    type Resource: SyncResource + Debug + Clone + Send + Sync;
    /// Single update instruction.
    type Action: Debug + Clone + PartialEq + Send + Sync;

    /// Singular name used in per-draft messages (`"category"`).
    const SINGULAR: &'static str;
    /// Plural name used in the statistics summary (`"categories"`).
    const PLURAL: &'static str;
}

/// Computes the update actions that turn `existing` into `draft`.
///
/// Implementations must be deterministic and must not perform I/O; the
/// engine may call them again for the same pair. An empty result means the
/// resource already matches the draft. Returned actions are applied in
/// order, so structural changes (renames, re-parenting) come first.
///
/// Implementations may report advisory conditions through
/// [`SyncOptions::warn`].
pub trait UpdateActionBuilder<K: ResourceKind>: Send + Sync {
    /// Builds the ordered action list.
    fn build_actions(
        &self,
        existing: &K::Resource,
        draft: &K::Draft,
        options: &SyncOptions<K>,
    ) -> Vec<K::Action>;
}

impl<K, F> UpdateActionBuilder<K> for F
where
    K: ResourceKind,
    F: Fn(&K::Resource, &K::Draft, &SyncOptions<K>) -> Vec<K::Action> + Send + Sync,
{
    fn build_actions(
        &self,
        existing: &K::Resource,
        draft: &K::Draft,
        options: &SyncOptions<K>,
    ) -> Vec<K::Action> {
        self(existing, draft, options)
    }
}
