//! Current-user endpoints.

use super::api_client::{ApiClient, ApiResult};
use crate::models::{UpdateUserRequest, User, UserPreferences};

impl ApiClient {
    /// GET /users/me
    pub async fn get_current_user(&self) -> ApiResult<User> {
        self.get("/users/me").await
    }

    /// PUT /users/me
    pub async fn update_current_user(&self, request: &UpdateUserRequest) -> ApiResult<User> {
        self.put("/users/me", request).await
    }

    /// PUT /users/me/preferences
    pub async fn update_preferences(&self, preferences: &UserPreferences) -> ApiResult<User> {
        self.put("/users/me/preferences", preferences).await
    }
}
