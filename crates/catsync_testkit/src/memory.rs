//! An in-memory resource backend.
//!
//! Behaves like a small catalog: create assigns an id and version 1, update
//! checks the version and applies actions in order, publish promotes staged
//! data. Failures can be injected per operation and key.

use catsync_engine::{
    Categories, Products, ResourceKind, ResourceService, ServiceError, ServiceResult,
};
use catsync_model::{Category, Product, SyncDraft, SyncResource};
use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::trace;
use uuid::Uuid;

/// Backend operation, for failure injection and the call log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `fetch`
    Fetch,
    /// `create`
    Create,
    /// `update`
    Update,
    /// `publish`
    Publish,
}

/// How a resource kind is stored and mutated by [`InMemoryService`].
pub trait MemoryBacked: ResourceKind {
    /// Builds a freshly created resource.
    fn materialize(id: String, draft: &Self::Draft) -> Self::Resource;

    /// Applies actions in order and bumps the version.
    fn apply(resource: &mut Self::Resource, actions: &[Self::Action]);

    /// Publishes and bumps the version.
    fn publish(resource: &mut Self::Resource);
}

impl MemoryBacked for Categories {
    fn materialize(id: String, draft: &Self::Draft) -> Category {
        Category::from_draft(id, draft)
    }

    fn apply(resource: &mut Category, actions: &[Self::Action]) {
        for action in actions {
            resource.apply(action);
        }
        resource.version += 1;
    }

    fn publish(resource: &mut Category) {
        resource.version += 1;
    }
}

impl MemoryBacked for Products {
    fn materialize(id: String, draft: &Self::Draft) -> Product {
        Product::from_draft(id, draft)
    }

    fn apply(resource: &mut Product, actions: &[Self::Action]) {
        for action in actions {
            resource.apply(action);
        }
        resource.version += 1;
    }

    fn publish(resource: &mut Product) {
        resource.publish();
        resource.version += 1;
    }
}

/// In-memory [`ResourceService`] keyed by business key.
pub struct InMemoryService<K: MemoryBacked> {
    resources: RwLock<HashMap<String, K::Resource>>,
    failures: RwLock<HashMap<(Operation, String), ServiceError>>,
    calls: Mutex<Vec<(Operation, String)>>,
    in_flight: Mutex<HashSet<String>>,
    overlap_detected: AtomicBool,
}

impl<K: MemoryBacked> InMemoryService<K> {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self {
            resources: RwLock::new(HashMap::new()),
            failures: RwLock::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            in_flight: Mutex::new(HashSet::new()),
            overlap_detected: AtomicBool::new(false),
        }
    }

    /// Stores a resource as if it had been created earlier.
    ///
    /// Resources without a key cannot be found by the engine and are ignored.
    pub fn seed(&self, resource: K::Resource) {
        if let Some(key) = resource.key().map(str::to_string) {
            self.resources.write().insert(key, resource);
        }
    }

    /// Makes `operation` on `key` fail with `error` until cleared.
    pub fn fail_on(&self, operation: Operation, key: impl Into<String>, error: ServiceError) {
        self.failures.write().insert((operation, key.into()), error);
    }

    /// Removes all injected failures.
    pub fn clear_failures(&self) {
        self.failures.write().clear();
    }

    /// Returns the stored resource for `key`.
    pub fn get(&self, key: &str) -> Option<K::Resource> {
        self.resources.read().get(key).cloned()
    }

    /// Number of stored resources.
    pub fn len(&self) -> usize {
        self.resources.read().len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.resources.read().is_empty()
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<(Operation, String)> {
        self.calls.lock().clone()
    }

    /// Number of calls of one operation.
    pub fn count(&self, operation: Operation) -> usize {
        self.calls.lock().iter().filter(|(op, _)| *op == operation).count()
    }

    /// True if two calls for the same key ever ran at the same time.
    pub fn overlap_detected(&self) -> bool {
        self.overlap_detected.load(Ordering::SeqCst)
    }

    fn enter(&self, operation: Operation, key: &str) -> ServiceResult<InFlight<'_>> {
        trace!(?operation, key, "in-memory call");
        self.calls.lock().push((operation, key.to_string()));
        if !self.in_flight.lock().insert(key.to_string()) {
            self.overlap_detected.store(true, Ordering::SeqCst);
        }
        let guard = InFlight {
            set: &self.in_flight,
            key: key.to_string(),
        };
        match self.failures.read().get(&(operation, key.to_string())) {
            Some(err) => Err(err.clone()),
            None => Ok(guard),
        }
    }

    fn check_version(&self, resource: &K::Resource, key: &str) -> ServiceResult<()> {
        let resources = self.resources.read();
        let stored = resources
            .get(key)
            .ok_or_else(|| ServiceError::NotFound(key.to_string()))?;
        if stored.version() != resource.version() {
            return Err(ServiceError::ConcurrentModification {
                expected: resource.version(),
                actual: stored.version(),
            });
        }
        Ok(())
    }
}

impl<K: MemoryBacked> Default for InMemoryService<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Removes a key from the in-flight set when dropped.
struct InFlight<'a> {
    set: &'a Mutex<HashSet<String>>,
    key: String,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.set.lock().remove(&self.key);
    }
}

fn resource_key<R: SyncResource>(resource: &R) -> ServiceResult<String> {
    resource
        .key()
        .map(str::to_string)
        .ok_or_else(|| ServiceError::Backend(format!("resource {} has no key", resource.id())))
}

impl<K: MemoryBacked> ResourceService<K> for InMemoryService<K> {
    fn fetch(&self, key: &str) -> ServiceResult<Option<K::Resource>> {
        let _guard = self.enter(Operation::Fetch, key)?;
        Ok(self.get(key))
    }

    fn create(&self, draft: &K::Draft) -> ServiceResult<K::Resource> {
        let key = draft
            .key()
            .ok_or_else(|| ServiceError::Backend("draft has no key".into()))?;
        let _guard = self.enter(Operation::Create, key)?;

        let mut resources = self.resources.write();
        if resources.contains_key(key) {
            return Err(ServiceError::Backend(format!(
                "a resource with key '{key}' already exists"
            )));
        }
        let resource = K::materialize(Uuid::new_v4().to_string(), draft);
        resources.insert(key.to_string(), resource.clone());
        Ok(resource)
    }

    fn update(
        &self,
        resource: &K::Resource,
        actions: &[K::Action],
    ) -> ServiceResult<K::Resource> {
        let key = resource_key(resource)?;
        let _guard = self.enter(Operation::Update, &key)?;
        self.check_version(resource, &key)?;

        let mut resources = self.resources.write();
        let stored = resources
            .get_mut(&key)
            .ok_or_else(|| ServiceError::NotFound(key.clone()))?;
        K::apply(stored, actions);
        Ok(stored.clone())
    }

    fn publish(&self, resource: &K::Resource) -> ServiceResult<K::Resource> {
        let key = resource_key(resource)?;
        let _guard = self.enter(Operation::Publish, &key)?;
        self.check_version(resource, &key)?;

        let mut resources = self.resources.write();
        let stored = resources
            .get_mut(&key)
            .ok_or_else(|| ServiceError::NotFound(key.clone()))?;
        K::publish(stored);
        Ok(stored.clone())
    }
}
