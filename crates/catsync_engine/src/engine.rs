//! The per-resource-type sync pipeline.
//!
//! For every draft: validate, fetch by key, then either create or diff and
//! update, then optionally publish. Outcomes are counted in
//! [`SyncStatistics`]; failures are reported through the options' error
//! callback and never escape [`ResourceSync::sync_drafts`].

use crate::category::{Categories, CategoryActionBuilder};
use crate::config::SyncOptions;
use crate::error::SyncError;
use crate::kind::{ResourceKind, UpdateActionBuilder};
use crate::product::{ProductActionBuilder, Products};
use crate::service::ResourceService;
use crate::stats::{StatisticsSnapshot, SyncStatistics};
use catsync_model::{SyncDraft, SyncResource};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Category sync with the default action builder.
pub type CategorySync<S> = ResourceSync<Categories, S, CategoryActionBuilder>;

/// Product sync with the default action builder.
pub type ProductSync<S> = ResourceSync<Products, S, ProductActionBuilder>;

/// What happened to a draft that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DraftOutcome {
    Created,
    Updated,
    Unchanged,
}

/// Syncs batches of drafts of one resource kind against a service.
///
/// Statistics live as long as the engine and accumulate across
/// [`sync_drafts`](Self::sync_drafts) calls.
///
/// # Example
///
/// ```rust,ignore
/// use catsync_engine::{CategorySync, ClientConfig, SyncOptions};
///
/// let options = SyncOptions::new(ClientConfig::new("project", "id", "secret"))
///     .with_error_callback(|message, _| eprintln!("{message}"));
/// let sync = CategorySync::new(Arc::new(options), service);
///
/// let summary = sync.sync_drafts(drafts);
/// println!("{summary}");
/// ```
pub struct ResourceSync<K, S, B>
where
    K: ResourceKind,
    S: ResourceService<K>,
    B: UpdateActionBuilder<K>,
{
    options: Arc<SyncOptions<K>>,
    service: Arc<S>,
    builder: B,
    statistics: SyncStatistics,
}

impl<K, S, B> ResourceSync<K, S, B>
where
    K: ResourceKind,
    S: ResourceService<K>,
    B: UpdateActionBuilder<K> + Default,
{
    /// Creates an engine with the kind's default action builder.
    pub fn new(options: Arc<SyncOptions<K>>, service: S) -> Self {
        Self::with_builder(options, service, B::default())
    }
}

impl<K, S, B> ResourceSync<K, S, B>
where
    K: ResourceKind,
    S: ResourceService<K>,
    B: UpdateActionBuilder<K>,
{
    /// Creates an engine with a custom action builder.
    pub fn with_builder(options: Arc<SyncOptions<K>>, service: S, builder: B) -> Self {
        Self::with_shared_service(options, Arc::new(service), builder)
    }

    /// Creates an engine over a service shared with other engines.
    pub fn with_shared_service(
        options: Arc<SyncOptions<K>>,
        service: Arc<S>,
        builder: B,
    ) -> Self {
        Self {
            options,
            service,
            builder,
            statistics: SyncStatistics::new(K::PLURAL),
        }
    }

    /// Returns the options.
    pub fn options(&self) -> &SyncOptions<K> {
        &self.options
    }

    /// Returns the service.
    pub fn service(&self) -> &Arc<S> {
        &self.service
    }

    /// Returns a snapshot of the statistics.
    pub fn statistics(&self) -> StatisticsSnapshot {
        self.statistics.snapshot()
    }

    /// Syncs a batch of drafts and returns the statistics afterwards.
    ///
    /// Accepts drafts or `Option`s of drafts; `None` entries are skipped
    /// without being counted. With `parallelism > 1` drafts are spread over
    /// worker threads, keeping drafts with equal keys on the same worker and
    /// in batch order. Returns once every draft has been handled.
    pub fn sync_drafts<I>(&self, drafts: I) -> StatisticsSnapshot
    where
        I: IntoIterator,
        I::Item: Into<Option<K::Draft>>,
    {
        let start = Instant::now();
        let drafts = drafts.into_iter().filter_map(|draft| draft.into());

        let workers = self.options.parallelism();
        if workers > 1 {
            self.process_partitioned(drafts, workers);
        } else {
            for draft in drafts {
                self.process_draft(&draft);
            }
        }

        self.statistics.record_batch_time(start.elapsed());
        let snapshot = self.statistics.snapshot();
        info!(
            resource = K::PLURAL,
            elapsed_ms = u64::try_from(snapshot.last_batch_time.as_millis()).unwrap_or(u64::MAX),
            "{snapshot}"
        );
        snapshot
    }

    fn process_partitioned(&self, drafts: impl Iterator<Item = K::Draft>, workers: usize) {
        let drafts: Vec<K::Draft> = drafts.collect();
        // Never more workers than drafts.
        let workers = workers.min(drafts.len()).max(1);
        let mut partitions: Vec<Vec<K::Draft>> = (0..workers).map(|_| Vec::new()).collect();
        for draft in drafts {
            // Drafts without a key never reach the service; any worker will do.
            let slot = draft.key().map_or(0, |key| partition_for(key, workers));
            partitions[slot].push(draft);
        }

        std::thread::scope(|scope| {
            for partition in partitions.into_iter().filter(|p| !p.is_empty()) {
                scope.spawn(move || {
                    for draft in &partition {
                        self.process_draft(draft);
                    }
                });
            }
        });
    }

    /// Runs one draft through the pipeline and records exactly one outcome.
    fn process_draft(&self, draft: &K::Draft) {
        match self.sync_draft(draft) {
            Ok(outcome) => {
                debug!(resource = K::SINGULAR, key = draft.key(), ?outcome, "draft synced");
                match outcome {
                    DraftOutcome::Created => self.statistics.record_created(),
                    DraftOutcome::Updated => self.statistics.record_updated(),
                    DraftOutcome::Unchanged => self.statistics.record_unchanged(),
                }
            }
            Err(err) => {
                self.statistics.record_failed();
                self.options.report_error(&err);
            }
        }
        self.statistics.record_processed();
    }

    fn sync_draft(&self, draft: &K::Draft) -> Result<DraftOutcome, SyncError> {
        let key = draft.key().ok_or_else(|| SyncError::MissingKey {
            resource: K::SINGULAR,
            draft: format!("{draft:?}"),
        })?;

        let existing = self.service.fetch(key).map_err(|source| SyncError::Fetch {
            resource: K::SINGULAR,
            key: key.to_string(),
            source,
        })?;

        match existing {
            None => self.create(key, draft),
            Some(existing) => self.update(key, &existing, draft),
        }
    }

    fn create(&self, key: &str, draft: &K::Draft) -> Result<DraftOutcome, SyncError> {
        let created = self.service.create(draft).map_err(|source| SyncError::Create {
            resource: K::SINGULAR,
            key: key.to_string(),
            source,
        })?;
        self.publish_if_needed(key, &created)?;
        Ok(DraftOutcome::Created)
    }

    fn update(
        &self,
        key: &str,
        existing: &K::Resource,
        draft: &K::Draft,
    ) -> Result<DraftOutcome, SyncError> {
        let built = self.builder.build_actions(existing, draft, &self.options);
        let built_any = !built.is_empty();
        let actions = self.options.filter_actions(built);

        if actions.is_empty() {
            if built_any {
                self.options.warn(&format!(
                    "all update actions for {} '{}' were filtered out; nothing to update",
                    K::SINGULAR,
                    key
                ));
            }
            self.publish_if_needed(key, existing)?;
            return Ok(DraftOutcome::Unchanged);
        }

        let updated = self
            .service
            .update(existing, &actions)
            .map_err(|source| SyncError::Update {
                resource: K::SINGULAR,
                key: key.to_string(),
                source,
            })?;
        self.publish_if_needed(key, &updated)?;
        Ok(DraftOutcome::Updated)
    }

    fn publish_if_needed(&self, key: &str, resource: &K::Resource) -> Result<(), SyncError> {
        if !self.options.should_publish() {
            return Ok(());
        }
        let Some(state) = resource.catalog_state() else {
            return Ok(());
        };
        if !state.needs_publish() {
            return Ok(());
        }

        self.service
            .publish(resource)
            .map_err(|source| SyncError::Publish {
                resource: K::SINGULAR,
                key: key.to_string(),
                source,
            })?;
        debug!(resource = K::SINGULAR, key, "published");
        Ok(())
    }
}

fn partition_for(key: &str, workers: usize) -> usize {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    (hasher.finish() % workers as u64) as usize
}
