//! Resource service abstraction.

use crate::error::{ServiceError, ServiceResult};
use crate::kind::ResourceKind;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Remote operations the engine needs for one resource kind.
///
/// This trait abstracts the backend client, allowing for different
/// implementations (HTTP, in-memory, mock for testing, etc.). Timeouts and
/// retries are the implementation's business; the engine treats every
/// error the same way.
pub trait ResourceService<K: ResourceKind>: Send + Sync {
    /// Looks up a resource by business key.
    fn fetch(&self, key: &str) -> ServiceResult<Option<K::Resource>>;

    /// Creates a resource from a draft.
    fn create(&self, draft: &K::Draft) -> ServiceResult<K::Resource>;

    /// Applies actions, in order, to a resource at its current version.
    fn update(&self, resource: &K::Resource, actions: &[K::Action])
        -> ServiceResult<K::Resource>;

    /// Publishes the staged data of a resource.
    fn publish(&self, resource: &K::Resource) -> ServiceResult<K::Resource>;
}

/// A scripted service for testing.
///
/// Each operation returns whatever was last set for it and counts its calls.
/// Operations without a scripted response fail with a backend error.
pub struct MockResourceService<K: ResourceKind> {
    fetch_response: Mutex<ServiceResult<Option<K::Resource>>>,
    create_response: Mutex<Option<ServiceResult<K::Resource>>>,
    update_response: Mutex<Option<ServiceResult<K::Resource>>>,
    publish_response: Mutex<Option<ServiceResult<K::Resource>>>,
    fetched_keys: Mutex<Vec<String>>,
    updates: Mutex<Vec<Vec<K::Action>>>,
    create_calls: AtomicUsize,
    publish_calls: AtomicUsize,
}

impl<K: ResourceKind> MockResourceService<K> {
    /// Creates a mock whose fetch finds nothing.
    pub fn new() -> Self {
        Self {
            fetch_response: Mutex::new(Ok(None)),
            create_response: Mutex::new(None),
            update_response: Mutex::new(None),
            publish_response: Mutex::new(None),
            fetched_keys: Mutex::new(Vec::new()),
            updates: Mutex::new(Vec::new()),
            create_calls: AtomicUsize::new(0),
            publish_calls: AtomicUsize::new(0),
        }
    }

    /// Sets the fetch response.
    pub fn set_fetch_response(&self, response: ServiceResult<Option<K::Resource>>) {
        *self.fetch_response.lock() = response;
    }

    /// Sets the create response.
    pub fn set_create_response(&self, response: ServiceResult<K::Resource>) {
        *self.create_response.lock() = Some(response);
    }

    /// Sets the update response.
    pub fn set_update_response(&self, response: ServiceResult<K::Resource>) {
        *self.update_response.lock() = Some(response);
    }

    /// Sets the publish response.
    pub fn set_publish_response(&self, response: ServiceResult<K::Resource>) {
        *self.publish_response.lock() = Some(response);
    }

    /// Keys passed to `fetch`, in call order.
    pub fn fetched_keys(&self) -> Vec<String> {
        self.fetched_keys.lock().clone()
    }

    /// Number of `fetch` calls.
    pub fn fetch_calls(&self) -> usize {
        self.fetched_keys.lock().len()
    }

    /// Number of `create` calls.
    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    /// Action lists passed to `update`, in call order.
    pub fn updates(&self) -> Vec<Vec<K::Action>> {
        self.updates.lock().clone()
    }

    /// Number of `update` calls.
    pub fn update_calls(&self) -> usize {
        self.updates.lock().len()
    }

    /// Number of `publish` calls.
    pub fn publish_calls(&self) -> usize {
        self.publish_calls.load(Ordering::SeqCst)
    }

    fn scripted(
        slot: &Mutex<Option<ServiceResult<K::Resource>>>,
        operation: &str,
    ) -> ServiceResult<K::Resource> {
        slot.lock().clone().unwrap_or_else(|| {
            Err(ServiceError::Backend(format!(
                "no mock {operation} response set"
            )))
        })
    }
}

impl<K: ResourceKind> Default for MockResourceService<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: ResourceKind> ResourceService<K> for MockResourceService<K> {
    fn fetch(&self, key: &str) -> ServiceResult<Option<K::Resource>> {
        self.fetched_keys.lock().push(key.to_string());
        self.fetch_response.lock().clone()
    }

    fn create(&self, _draft: &K::Draft) -> ServiceResult<K::Resource> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        Self::scripted(&self.create_response, "create")
    }

    fn update(
        &self,
        _resource: &K::Resource,
        actions: &[K::Action],
    ) -> ServiceResult<K::Resource> {
        self.updates.lock().push(actions.to_vec());
        Self::scripted(&self.update_response, "update")
    }

    fn publish(&self, _resource: &K::Resource) -> ServiceResult<K::Resource> {
        self.publish_calls.fetch_add(1, Ordering::SeqCst);
        Self::scripted(&self.publish_response, "publish")
    }
}
