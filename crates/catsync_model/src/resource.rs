//! The generic views the sync engine takes of drafts and resources.

/// Publication state of a resource with a staged/current split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CatalogState {
    /// Whether a current (published) projection exists.
    pub published: bool,
    /// Whether the staged projection differs from the current one.
    pub has_staged_changes: bool,
}

impl CatalogState {
    /// Creates a catalog state.
    pub fn new(published: bool, has_staged_changes: bool) -> Self {
        Self {
            published,
            has_staged_changes,
        }
    }

    /// Returns true if publishing would change what is live.
    pub fn needs_publish(&self) -> bool {
        !self.published || self.has_staged_changes
    }
}

/// A caller-supplied desired state for one resource.
pub trait SyncDraft {
    /// The business key correlating this draft to a remote resource.
    ///
    /// `None` (or an empty key) makes the draft invalid.
    fn key(&self) -> Option<&str>;
}

/// A resource as it exists on the remote backend.
pub trait SyncResource {
    /// Backend-internal identifier.
    fn id(&self) -> &str;

    /// The business key, if the resource has one.
    fn key(&self) -> Option<&str>;

    /// Version used for optimistic concurrency on update.
    fn version(&self) -> u64;

    /// Publication state, or `None` for resources that are not published
    /// separately from being written.
    fn catalog_state(&self) -> Option<CatalogState> {
        None
    }
}
