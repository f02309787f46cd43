//! Authentication endpoints.

use serde::{Deserialize, Serialize};

use super::api_client::{ApiClient, ApiResult};
use crate::models::User;

/// Response of `POST /auth/refresh`
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

impl std::fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResponse")
            .field("token", &"<redacted>")
            .finish()
    }
}

impl ApiClient {
    /// GET /auth/me
    ///
    /// Identity of whoever holds the token currently in the shared handle.
    pub async fn fetch_identity(&self) -> ApiResult<User> {
        self.get("/auth/me").await
    }

    /// POST /auth/refresh
    pub async fn refresh_token(&self) -> ApiResult<TokenResponse> {
        self.post("/auth/refresh", None::<&()>).await
    }
}
