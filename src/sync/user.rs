//! Current-user synchronizer.
//!
//! Same lifecycle as the collection synchronizers, over a single record.

use parking_lot::RwLock;
use std::sync::Arc;

use super::guard::InFlight;
use super::notify::{Notification, Notifier};
use crate::api_clients::{ApiClient, ApiResult};
use crate::classifier::ParsedError;
use crate::models::{UpdateUserRequest, User, UserPreferences};

/// Cached current user
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserRecord {
    pub user: Option<User>,
    pub loading: bool,
    pub error: Option<ParsedError>,
}

#[derive(Debug, Default)]
struct UserState {
    record: UserRecord,
    in_flight: usize,
}

impl UserState {
    fn end_fetch(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.record.loading = self.in_flight > 0;
    }
}

#[derive(Debug)]
pub struct UserSynchronizer {
    api: Arc<ApiClient>,
    notifier: Arc<dyn Notifier>,
    state: RwLock<UserState>,
}

impl UserSynchronizer {
    pub fn new(api: Arc<ApiClient>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            state: RwLock::new(UserState::default()),
        }
    }

    pub fn snapshot(&self) -> UserRecord {
        self.state.read().record.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.state.read().record.user.clone()
    }

    /// GET /users/me into the cache; failures land in the error slot
    pub async fn fetch(&self) -> Result<User, ParsedError> {
        {
            let mut state = self.state.write();
            state.in_flight += 1;
            state.record.loading = true;
            state.record.error = None;
        }

        let pending = InFlight::new(|| self.state.write().end_fetch());
        let result = self.api.get_current_user().await;

        {
            let mut state = self.state.write();
            pending.finish();
            state.end_fetch();
            match &result {
                Ok(user) => state.record.user = Some(user.clone()),
                Err(e) => state.record.error = Some(e.clone()),
            }
        }

        if let Err(e) = &result {
            self.notifier.notify(Notification::error(e.advisory()));
        }
        result
    }

    pub async fn update_user(&self, request: &UpdateUserRequest) -> Result<User, ParsedError> {
        self.mutate(
            "update profile",
            "Profile updated successfully",
            self.api.update_current_user(request).await,
        )
    }

    pub async fn update_preferences(
        &self,
        preferences: &UserPreferences,
    ) -> Result<User, ParsedError> {
        self.mutate(
            "update preferences",
            "Preferences updated successfully",
            self.api.update_preferences(preferences).await,
        )
    }

    fn mutate(&self, action: &str, success: &str, result: ApiResult<User>) -> Result<User, ParsedError> {
        match result {
            Ok(user) => {
                self.state.write().record.user = Some(user.clone());
                self.notifier.notify(Notification::success(success));
                Ok(user)
            }
            Err(e) => {
                self.notifier.notify(Notification::error(format!(
                    "Failed to {}: {}",
                    action,
                    e.advisory()
                )));
                Err(e)
            }
        }
    }
}
