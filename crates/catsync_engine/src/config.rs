//! Configuration for sync runs.

use crate::error::{ConfigError, ServiceError, SyncError};
use crate::kind::ResourceKind;
use std::fmt;
use std::sync::Arc;
use tracing::{error, warn};

/// Callback invoked once per failed draft with a message and, for backend
/// failures, the underlying error.
pub type ErrorCallback = Arc<dyn Fn(&str, Option<&ServiceError>) + Send + Sync>;

/// Callback invoked for advisory, non-fatal conditions.
pub type WarningCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Transform applied to built actions before an update is issued.
///
/// Returning `None` or an empty list means "nothing to update".
pub type ActionsFilter<A> = Arc<dyn Fn(Vec<A>) -> Option<Vec<A>> + Send + Sync>;

const DEFAULT_API_URL: &str = "https://api.europe-west1.gcp.commercetools.com";
const DEFAULT_AUTH_URL: &str = "https://auth.europe-west1.gcp.commercetools.com";

/// Identifies and authenticates against the target backend.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Project key.
    pub project_key: String,
    /// OAuth client id.
    pub client_id: String,
    /// OAuth client secret.
    pub client_secret: String,
    /// API base URL.
    pub api_url: String,
    /// Auth base URL.
    pub auth_url: String,
}

impl ClientConfig {
    /// Creates a client configuration for the default region.
    pub fn new(
        project_key: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            project_key: project_key.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            api_url: DEFAULT_API_URL.into(),
            auth_url: DEFAULT_AUTH_URL.into(),
        }
    }

    /// Sets the API base URL.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Sets the auth base URL.
    pub fn with_auth_url(mut self, url: impl Into<String>) -> Self {
        self.auth_url = url.into();
        self
    }

    /// Checks that every field is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.project_key.is_empty() {
            return Err(ConfigError::Missing("project_key"));
        }
        if self.client_id.is_empty() {
            return Err(ConfigError::Missing("client_id"));
        }
        if self.client_secret.is_empty() {
            return Err(ConfigError::Missing("client_secret"));
        }
        for (field, url) in [("api_url", &self.api_url), ("auth_url", &self.auth_url)] {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(ConfigError::InvalidUrl {
                    field,
                    url: url.clone(),
                });
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("project_key", &self.project_key)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("auth_url", &self.auth_url)
            .finish()
    }
}

/// Options for syncing one resource kind.
///
/// Built once with the `with_*` setters and then shared with the engine
/// behind an `Arc`; nothing in it changes during a run.
pub struct SyncOptions<K: ResourceKind> {
    client: ClientConfig,
    error_callback: Option<ErrorCallback>,
    warning_callback: Option<WarningCallback>,
    should_publish: bool,
    actions_filter: Option<ActionsFilter<K::Action>>,
    parallelism: usize,
}

impl<K: ResourceKind> SyncOptions<K> {
    /// Creates options with no callbacks, no publishing and sequential processing.
    pub fn new(client: ClientConfig) -> Self {
        Self {
            client,
            error_callback: None,
            warning_callback: None,
            should_publish: false,
            actions_filter: None,
            parallelism: 1,
        }
    }

    /// Like [`new`](Self::new), but rejects a client config that fails
    /// [`ClientConfig::validate`].
    pub fn try_new(client: ClientConfig) -> Result<Self, ConfigError> {
        client.validate()?;
        Ok(Self::new(client))
    }

    /// Sets the error callback.
    pub fn with_error_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str, Option<&ServiceError>) + Send + Sync + 'static,
    {
        self.error_callback = Some(Arc::new(callback));
        self
    }

    /// Sets the warning callback.
    pub fn with_warning_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.warning_callback = Some(Arc::new(callback));
        self
    }

    /// Publishes resources after a successful create or update.
    pub fn with_publish(mut self, should_publish: bool) -> Self {
        self.should_publish = should_publish;
        self
    }

    /// Sets the filter applied to built actions.
    pub fn with_actions_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(Vec<K::Action>) -> Option<Vec<K::Action>> + Send + Sync + 'static,
    {
        self.actions_filter = Some(Arc::new(filter));
        self
    }

    /// Sets the number of worker threads per batch. Values below 1 mean 1.
    pub fn with_parallelism(mut self, workers: usize) -> Self {
        self.parallelism = workers.max(1);
        self
    }

    /// Returns the client configuration.
    pub fn client(&self) -> &ClientConfig {
        &self.client
    }

    /// Returns whether the publish step runs.
    pub fn should_publish(&self) -> bool {
        self.should_publish
    }

    /// Returns the number of worker threads per batch.
    pub fn parallelism(&self) -> usize {
        self.parallelism
    }

    /// Reports an advisory condition.
    pub fn warn(&self, message: &str) {
        warn!(resource = K::SINGULAR, "{message}");
        if let Some(callback) = &self.warning_callback {
            callback(message);
        }
    }

    /// Reports a failed draft.
    pub(crate) fn report_error(&self, err: &SyncError) {
        let message = err.to_string();
        error!(resource = K::SINGULAR, key = err.key(), "{message}");
        if let Some(callback) = &self.error_callback {
            callback(&message, err.cause());
        }
    }

    /// Runs the actions filter, if any. `None` and empty both come back empty.
    pub(crate) fn filter_actions(&self, actions: Vec<K::Action>) -> Vec<K::Action> {
        match &self.actions_filter {
            Some(filter) => filter(actions).unwrap_or_default(),
            None => actions,
        }
    }
}

impl<K: ResourceKind> Clone for SyncOptions<K> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            error_callback: self.error_callback.clone(),
            warning_callback: self.warning_callback.clone(),
            should_publish: self.should_publish,
            actions_filter: self.actions_filter.clone(),
            parallelism: self.parallelism,
        }
    }
}

impl<K: ResourceKind> fmt::Debug for SyncOptions<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncOptions")
            .field("resource", &K::PLURAL)
            .field("client", &self.client)
            .field("has_error_callback", &self.error_callback.is_some())
            .field("has_warning_callback", &self.warning_callback.is_some())
            .field("should_publish", &self.should_publish)
            .field("has_actions_filter", &self.actions_filter.is_some())
            .field("parallelism", &self.parallelism)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Categories;
    use catsync_model::{CategoryAction, LocalizedString};
    use parking_lot::Mutex;

    fn client() -> ClientConfig {
        ClientConfig::new("testPK", "testCI", "testCS")
    }

    #[test]
    fn try_new_validates_client() {
        let options = SyncOptions::<Categories>::try_new(client()).unwrap();
        assert_eq!(options.client().project_key, "testPK");

        let result = SyncOptions::<Categories>::try_new(ClientConfig::new("testPK", "", "testCS"));
        assert!(matches!(result, Err(ConfigError::Missing("client_id"))));

        let bad_url = client().with_api_url("ftp://example.com");
        let result = SyncOptions::<Categories>::try_new(bad_url);
        assert!(matches!(result, Err(ConfigError::InvalidUrl { field: "api_url", .. })));
    }

    #[test]
    fn client_config_defaults_and_builder() {
        let config = client().with_api_url("http://localhost:8080");
        assert_eq!(config.project_key, "testPK");
        assert_eq!(config.api_url, "http://localhost:8080");
        assert_eq!(config.auth_url, DEFAULT_AUTH_URL);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn client_config_validation() {
        let config = ClientConfig::new("", "id", "secret");
        assert_eq!(config.validate(), Err(ConfigError::Missing("project_key")));

        let config = ClientConfig::new("pk", "id", "");
        assert_eq!(config.validate(), Err(ConfigError::Missing("client_secret")));

        let config = client().with_auth_url("ftp://auth");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidUrl {
                field: "auth_url",
                ..
            })
        ));
    }

    #[test]
    fn client_config_debug_redacts_secret() {
        let rendered = format!("{:?}", client());
        assert!(rendered.contains("testPK"));
        assert!(!rendered.contains("testCS"));
    }

    #[test]
    fn options_defaults() {
        let options = SyncOptions::<Categories>::new(client());
        assert!(!options.should_publish());
        assert_eq!(options.parallelism(), 1);
        assert_eq!(options.client().client_id, "testCI");
    }

    #[test]
    fn parallelism_is_at_least_one() {
        let options = SyncOptions::<Categories>::new(client()).with_parallelism(0);
        assert_eq!(options.parallelism(), 1);
    }

    #[test]
    fn filter_none_and_empty_mean_no_actions() {
        let action = CategoryAction::ChangeName {
            name: LocalizedString::of("en", "x"),
        };

        let options = SyncOptions::<Categories>::new(client());
        assert_eq!(options.filter_actions(vec![action.clone()]).len(), 1);

        let options = SyncOptions::<Categories>::new(client()).with_actions_filter(|_| None);
        assert!(options.filter_actions(vec![action.clone()]).is_empty());

        let options =
            SyncOptions::<Categories>::new(client()).with_actions_filter(|_| Some(Vec::new()));
        assert!(options.filter_actions(vec![action]).is_empty());
    }

    #[test]
    fn warn_reaches_callback() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let options = SyncOptions::<Categories>::new(client())
            .with_warning_callback(move |message| sink.lock().push(message.to_string()));

        options.warn("careful");
        assert_eq!(*seen.lock(), vec!["careful".to_string()]);
    }

    #[test]
    fn clone_shares_callbacks() {
        let seen = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&seen);
        let options = SyncOptions::<Categories>::new(client())
            .with_warning_callback(move |_| *sink.lock() += 1)
            .with_publish(true);

        let copy = options.clone();
        copy.warn("a");
        options.warn("b");
        assert!(copy.should_publish());
        assert_eq!(*seen.lock(), 2);
    }
}
