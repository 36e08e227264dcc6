//! Property tests for the statistics invariants.

use catsync_testkit::prelude::*;
use proptest::prelude::*;

fn present<D>(batch: &[Option<D>]) -> u64 {
    batch.iter().filter(|d| d.is_some()).count() as u64
}

fn keyed<D: SyncDraft>(batch: &[Option<D>]) -> usize {
    batch.iter().flatten().filter(|d| d.key().is_some()).count()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn category_batches_stay_balanced(
        batch in draft_batch_strategy(category_draft_strategy(), 24),
        failures in failure_plan_strategy(),
        workers in 1usize..4,
    ) {
        let (options, recorder) = recording_options::<Categories>();
        let sync = CategorySync::new(
            Arc::new(options.with_parallelism(workers)),
            InMemoryService::new(),
        );
        for (operation, key, error) in failures {
            sync.service().fail_on(operation, key, error);
        }
        let expected_processed = present(&batch);
        let expected_fetches = keyed(&batch);

        let stats = sync.sync_drafts(batch);

        prop_assert_eq!(stats.processed, expected_processed);
        prop_assert!(stats.is_balanced());
        prop_assert_eq!(recorder.errors().len() as u64, stats.failed);
        prop_assert_eq!(sync.service().count(Operation::Fetch), expected_fetches);
        prop_assert!(!sync.service().overlap_detected());
    }

    #[test]
    fn product_batches_stay_balanced_with_publishing(
        batch in draft_batch_strategy(product_draft_strategy(), 24),
        failures in failure_plan_strategy(),
    ) {
        let (options, recorder) = recording_options::<Products>();
        let sync = ProductSync::new(Arc::new(options.with_publish(true)), InMemoryService::new());
        for (operation, key, error) in failures {
            sync.service().fail_on(operation, key, error);
        }
        let expected_processed = present(&batch);

        let stats = sync.sync_drafts(batch);

        prop_assert_eq!(stats.processed, expected_processed);
        prop_assert!(stats.is_balanced());
        prop_assert_eq!(recorder.errors().len() as u64, stats.failed);
    }

    #[test]
    fn parallel_matches_sequential(
        batch in draft_batch_strategy(category_draft_strategy(), 24),
        workers in 2usize..5,
    ) {
        let sequential = category_run(&batch, 1);
        let parallel = category_run(&batch, workers);

        prop_assert_eq!(sequential.0.created, parallel.0.created);
        prop_assert_eq!(sequential.0.updated, parallel.0.updated);
        prop_assert_eq!(sequential.0.unchanged, parallel.0.unchanged);
        prop_assert_eq!(sequential.0.failed, parallel.0.failed);
        prop_assert_eq!(sequential.1, parallel.1);
    }

    #[test]
    fn second_run_changes_nothing(batch in draft_batch_strategy(product_draft_strategy(), 16)) {
        let sync = ProductSync::new(
            Arc::new(SyncOptions::new(test_client())),
            InMemoryService::new(),
        );
        sync.sync_drafts(batch.clone());
        let updates_before = sync.service().count(Operation::Update);
        let creates_before = sync.service().count(Operation::Create);

        // Keep only the last draft per key so the rerun has a single target state.
        let mut last: std::collections::BTreeMap<String, ProductDraft> = Default::default();
        for draft in batch.into_iter().flatten() {
            if let Some(key) = draft.key().map(str::to_string) {
                last.insert(key, draft);
            }
        }
        sync.sync_drafts(last.into_values());

        prop_assert_eq!(sync.service().count(Operation::Update), updates_before);
        prop_assert_eq!(sync.service().count(Operation::Create), creates_before);
    }
}

/// Syncs `batch` and returns the statistics plus the stored names by key.
fn category_run(
    batch: &[Option<CategoryDraft>],
    workers: usize,
) -> (StatisticsSnapshot, Vec<(String, LocalizedString, Option<String>)>) {
    let sync = CategorySync::new(
        Arc::new(SyncOptions::new(test_client()).with_parallelism(workers)),
        InMemoryService::new(),
    );
    let stats = sync.sync_drafts(batch.to_vec());

    let mut keys: Vec<String> = batch
        .iter()
        .flatten()
        .filter_map(|d| d.key().map(str::to_string))
        .collect();
    keys.sort();
    keys.dedup();
    let stored = keys
        .into_iter()
        .filter_map(|key| {
            let category = sync.service().get(&key)?;
            Some((key, category.name, category.parent))
        })
        .collect();
    (stats, stored)
}
