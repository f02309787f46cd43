//! # Organizer API Clients
//!
//! The request gateway and its typed endpoint groups. All endpoint methods are
//! inherent methods on [`ApiClient`] and funnel through [`ApiClient::request`].

pub mod api_client;
pub mod auth_api;
pub mod project_api;
pub mod task_api;
pub mod user_api;

pub use api_client::{path_segment, ApiClient, ApiResult, QueryParams, ToQuery, TokenHandle};
pub use auth_api::TokenResponse;
pub use task_api::TaskFilters;
