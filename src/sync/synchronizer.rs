//! # Resource Synchronizer
//!
//! Keeps one cached [`ResourceCollection`] consistent with its server-side
//! counterpart. Each operation calls the gateway, then reconciles the cache,
//! the loading flag, and the error slot, and raises a notification.
//!
//! Operations on the same synchronizer are not serialized: concurrent
//! mutations apply in the order their responses arrive. Concurrent fetches
//! behave the same way unless stale-response discarding is enabled, in which
//! case only the most recently started fetch may replace the items.
//!
//! State sits behind a lock that is never held across an `.await`.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

use super::collection::ResourceCollection;
use super::guard::InFlight;
use super::notify::{Notification, Notifier};
use crate::api_clients::{ApiClient, ApiResult};
use crate::classifier::ParsedError;
use crate::config::SyncConfig;
use crate::models::Identified;

/// What `create` does with the record the server returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreatePolicy {
    /// Append it to the cached items
    #[default]
    Append,
    /// Leave the cache alone until the caller refetches
    AwaitRefetch,
}

/// Endpoint set for one resource kind
#[async_trait]
pub trait Resource: Send + Sync + Debug + 'static {
    type Item: Identified + Clone + Debug + Send + Sync + 'static;
    type Filters: Debug + Default + Send + Sync;
    type Create: Debug + Send + Sync;
    type Update: Debug + Send + Sync;

    /// Capitalized, singular name used in notifications (e.g. "Task")
    const LABEL: &'static str;

    async fn list(&self, api: &ApiClient, filters: &Self::Filters) -> ApiResult<Vec<Self::Item>>;

    async fn create(&self, api: &ApiClient, input: &Self::Create) -> ApiResult<Self::Item>;

    async fn update(&self, api: &ApiClient, id: &str, patch: &Self::Update)
        -> ApiResult<Self::Item>;

    async fn remove(&self, api: &ApiClient, id: &str) -> ApiResult<()>;
}

#[derive(Debug)]
struct SyncState<T> {
    collection: ResourceCollection<T>,
    in_flight: usize,
    latest_ticket: u64,
}

impl<T> Default for SyncState<T> {
    fn default() -> Self {
        Self {
            collection: ResourceCollection::default(),
            in_flight: 0,
            latest_ticket: 0,
        }
    }
}

/// Cached collection plus the operations that keep it in sync
#[derive(Debug)]
pub struct ResourceSynchronizer<R: Resource> {
    resource: R,
    api: Arc<ApiClient>,
    notifier: Arc<dyn Notifier>,
    state: RwLock<SyncState<R::Item>>,
    create_policy: CreatePolicy,
    discard_stale: bool,
}

impl<R: Resource> ResourceSynchronizer<R> {
    pub fn new(resource: R, api: Arc<ApiClient>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            resource,
            api,
            notifier,
            state: RwLock::new(SyncState::default()),
            create_policy: CreatePolicy::default(),
            discard_stale: false,
        }
    }

    #[must_use]
    pub fn with_create_policy(mut self, policy: CreatePolicy) -> Self {
        self.create_policy = policy;
        self
    }

    /// Only let the most recently started fetch replace the items.
    ///
    /// A superseded fetch still resolves to its own caller, and a superseded
    /// failure is still notified, but neither touches the items or the error
    /// slot.
    #[must_use]
    pub fn with_stale_discard(mut self, enabled: bool) -> Self {
        self.discard_stale = enabled;
        self
    }

    #[must_use]
    pub fn with_config(self, config: &SyncConfig) -> Self {
        self.with_create_policy(config.create_policy)
            .with_stale_discard(config.discard_stale_responses)
    }

    pub fn create_policy(&self) -> CreatePolicy {
        self.create_policy
    }

    /// Copy of the cached collection
    pub fn snapshot(&self) -> ResourceCollection<R::Item> {
        self.state.read().collection.clone()
    }

    pub fn items(&self) -> Vec<R::Item> {
        self.state.read().collection.items.clone()
    }

    pub fn find(&self, id: &str) -> Option<R::Item> {
        self.state.read().collection.find(id).cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.state.read().collection.loading
    }

    pub fn error(&self) -> Option<ParsedError> {
        self.state.read().collection.error.clone()
    }

    pub(crate) fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Replace the cached items with the server's collection.
    ///
    /// Failures are stored in the error slot and notified before being
    /// returned.
    pub async fn fetch_all(&self, filters: &R::Filters) -> Result<Vec<R::Item>, ParsedError> {
        self.load(self.resource.list(&self.api, filters)).await
    }

    pub async fn create(&self, input: &R::Create) -> Result<R::Item, ParsedError> {
        let policy = self.create_policy;
        self.mutate(
            "create",
            &format!("{} created successfully", R::LABEL),
            self.resource.create(&self.api, input),
            |collection, item| {
                if policy == CreatePolicy::Append {
                    collection.items.push(item.clone());
                }
            },
        )
        .await
    }

    /// Replace the cached item with the server's response; no-op when the id
    /// is not cached
    pub async fn update(&self, id: &str, patch: &R::Update) -> Result<R::Item, ParsedError> {
        self.mutate(
            "update",
            &format!("{} updated successfully", R::LABEL),
            self.resource.update(&self.api, id, patch),
            replace_cached,
        )
        .await
    }

    pub async fn remove(&self, id: &str) -> Result<(), ParsedError> {
        self.mutate(
            "delete",
            &format!("{} deleted successfully", R::LABEL),
            self.resource.remove(&self.api, id),
            |collection, _| {
                collection.remove(id);
            },
        )
        .await
    }

    /// Run a collection fetch through the loading/error lifecycle.
    ///
    /// Dropping the returned future mid-flight still releases its share of
    /// the loading flag.
    pub(crate) async fn load<F>(&self, source: F) -> Result<Vec<R::Item>, ParsedError>
    where
        F: Future<Output = ApiResult<Vec<R::Item>>>,
    {
        let ticket = {
            let mut state = self.state.write();
            state.in_flight += 1;
            state.latest_ticket += 1;
            state.collection.loading = true;
            state.collection.error = None;
            state.latest_ticket
        };

        let pending = InFlight::new(|| {
            let mut state = self.state.write();
            end_fetch(&mut state);
        });
        let result = source.await;

        let failure = {
            let mut state = self.state.write();
            pending.finish();
            end_fetch(&mut state);

            if self.discard_stale && ticket != state.latest_ticket {
                debug!(
                    resource = R::LABEL,
                    ticket,
                    latest = state.latest_ticket,
                    "Discarding superseded fetch response"
                );
                result.as_ref().err().map(ParsedError::advisory)
            } else {
                match &result {
                    Ok(items) => {
                        state.collection.items = items.clone();
                        None
                    }
                    Err(e) => {
                        state.collection.error = Some(e.clone());
                        Some(e.advisory())
                    }
                }
            }
        };

        if let Some(advisory) = failure {
            self.notifier.notify(Notification::error(advisory));
        }
        result
    }

    /// Read a single record without touching the loading flag or error slot
    pub(crate) async fn read<T, F>(&self, source: F) -> Result<T, ParsedError>
    where
        F: Future<Output = ApiResult<T>>,
    {
        source.await.map_err(|e| {
            self.notifier.notify(Notification::error(e.advisory()));
            e
        })
    }

    pub(crate) fn reconcile(&self, apply: impl FnOnce(&mut ResourceCollection<R::Item>)) {
        apply(&mut self.state.write().collection);
    }

    /// Run a mutation, reconcile the cache on success, and notify either way
    pub(crate) async fn mutate<T, F, A>(
        &self,
        action: &str,
        success_message: &str,
        call: F,
        apply: A,
    ) -> Result<T, ParsedError>
    where
        F: Future<Output = ApiResult<T>>,
        A: FnOnce(&mut ResourceCollection<R::Item>, &T),
    {
        match call.await {
            Ok(value) => {
                apply(&mut self.state.write().collection, &value);
                self.notifier.notify(Notification::success(success_message));
                Ok(value)
            }
            Err(e) => {
                self.notifier.notify(Notification::error(format!(
                    "Failed to {} {}: {}",
                    action,
                    R::LABEL.to_lowercase(),
                    e.advisory()
                )));
                Err(e)
            }
        }
    }
}

fn end_fetch<T>(state: &mut SyncState<T>) {
    state.in_flight = state.in_flight.saturating_sub(1);
    state.collection.loading = state.in_flight > 0;
}

/// Cache reconciliation for mutations that return the updated record
pub(crate) fn replace_cached<T: Identified + Clone>(collection: &mut ResourceCollection<T>, item: &T) {
    collection.replace(item.clone());
}
