//! # Organizer Client
//!
//! Wires one gateway, one session, and one synchronizer per resource around a
//! shared token slot and notifier.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use organizer_client::{ClientConfig, OrganizerClient};
//!
//! let config = ClientConfig::load()?;
//! let client = OrganizerClient::from_config(&config)?;
//!
//! client.session().restore().await;
//! client.tasks().fetch_all(&Default::default()).await?;
//! ```

use std::sync::Arc;
use tracing::debug;

use crate::api_clients::ApiClient;
use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::session::{FileTokenStore, SessionManager, TokenStore};
use crate::sync::{
    Notifier, ProjectResource, ProjectSynchronizer, TaskResource, TaskSynchronizer,
    TracingNotifier, UserSynchronizer,
};

#[derive(Debug)]
pub struct OrganizerClient {
    api: Arc<ApiClient>,
    session: SessionManager,
    tasks: TaskSynchronizer,
    projects: ProjectSynchronizer,
    user: UserSynchronizer,
}

impl OrganizerClient {
    /// Build from configuration with a file token store and tracing notifications
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let store = Arc::new(FileTokenStore::new(config.token_file()?));
        Self::with_parts(config, store, Arc::new(TracingNotifier))
    }

    /// Build with explicit token persistence and notification sink
    pub fn with_parts(
        config: &ClientConfig,
        store: Arc<dyn TokenStore>,
        notifier: Arc<dyn Notifier>,
    ) -> ClientResult<Self> {
        let api = Arc::new(ApiClient::new(config.api.clone())?);

        let session = SessionManager::new(api.clone(), store);
        let tasks = TaskSynchronizer::new(TaskResource, api.clone(), notifier.clone())
            .with_config(&config.sync);
        let projects = ProjectSynchronizer::new(ProjectResource, api.clone(), notifier.clone())
            .with_config(&config.sync);
        let user = UserSynchronizer::new(api.clone(), notifier);

        debug!(
            base_url = %api.base_url(),
            create_policy = ?config.sync.create_policy,
            discard_stale = config.sync.discard_stale_responses,
            "Organizer client assembled"
        );

        Ok(Self {
            api,
            session,
            tasks,
            projects,
            user,
        })
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn tasks(&self) -> &TaskSynchronizer {
        &self.tasks
    }

    pub fn projects(&self) -> &ProjectSynchronizer {
        &self.projects
    }

    pub fn user(&self) -> &UserSynchronizer {
        &self.user
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{MemoryTokenStore, SessionStatus};
    use crate::sync::{CreatePolicy, NotificationLog};

    #[test]
    fn test_parts_share_configuration() {
        let mut config = ClientConfig::default();
        config.sync.create_policy = CreatePolicy::AwaitRefetch;

        let client = OrganizerClient::with_parts(
            &config,
            Arc::new(MemoryTokenStore::new()),
            Arc::new(NotificationLog::new()),
        )
        .unwrap();

        assert_eq!(client.tasks().create_policy(), CreatePolicy::AwaitRefetch);
        assert_eq!(client.projects().create_policy(), CreatePolicy::AwaitRefetch);
        assert_eq!(client.session().status(), SessionStatus::Unauthenticated);
        assert!(client.user().user().is_none());
    }
}
