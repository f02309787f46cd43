//! Shared fixtures for integration tests against a wiremock organizer API.

#![allow(dead_code)]

use std::sync::Arc;

use organizer_client::api_clients::{ApiClient, TokenHandle};
use organizer_client::config::ApiEndpointConfig;
use organizer_client::session::{MemoryTokenStore, SessionManager};
use organizer_client::sync::{
    NotificationLog, ProjectResource, ProjectSynchronizer, TaskResource, TaskSynchronizer,
    UserSynchronizer,
};
use serde_json::{json, Value};
use wiremock::MockServer;

pub const API_PREFIX: &str = "/api/v1";

pub fn api_path(path: &str) -> String {
    format!("{API_PREFIX}{path}")
}

pub fn api_config(server: &MockServer) -> ApiEndpointConfig {
    ApiEndpointConfig {
        base_url: format!("{}{}", server.uri(), API_PREFIX),
        timeout_ms: 2000,
        ..Default::default()
    }
}

pub fn api_client(server: &MockServer) -> Arc<ApiClient> {
    Arc::new(ApiClient::new(api_config(server)).unwrap())
}

pub fn authorized_client(server: &MockServer, token: &str) -> Arc<ApiClient> {
    let handle = TokenHandle::new();
    handle.set(token);
    Arc::new(ApiClient::with_token_handle(api_config(server), handle).unwrap())
}

pub fn task_sync(server: &MockServer) -> (TaskSynchronizer, Arc<NotificationLog>) {
    let log = Arc::new(NotificationLog::new());
    let sync = TaskSynchronizer::new(TaskResource, api_client(server), log.clone());
    (sync, log)
}

pub fn project_sync(server: &MockServer) -> (ProjectSynchronizer, Arc<NotificationLog>) {
    let log = Arc::new(NotificationLog::new());
    let sync = ProjectSynchronizer::new(ProjectResource, api_client(server), log.clone());
    (sync, log)
}

pub fn user_sync(server: &MockServer) -> (UserSynchronizer, Arc<NotificationLog>) {
    let log = Arc::new(NotificationLog::new());
    let sync = UserSynchronizer::new(api_client(server), log.clone());
    (sync, log)
}

pub fn session(server: &MockServer, store: Arc<MemoryTokenStore>) -> SessionManager {
    SessionManager::new(api_client(server), store)
}

pub fn task_json(id: &str, title: &str, status: &str) -> Value {
    json!({
        "id": id,
        "userId": "user-1",
        "title": title,
        "status": status,
        "type": "ACTION",
        "createdAt": "2024-05-01T09:00:00",
        "updatedAt": "2024-05-01T09:00:00",
        "userDefinedOrder": 0,
        "tags": []
    })
}

pub fn project_json(id: &str, title: &str) -> Value {
    json!({
        "id": id,
        "userId": "user-1",
        "title": title,
        "status": "ACTIVE",
        "priority": "HIGH",
        "createdAt": "2024-05-01T09:00:00",
        "updatedAt": "2024-05-01T09:00:00",
        "canvasPosition": { "x": 10.0, "y": 20.0 },
        "taskIds": []
    })
}

pub fn user_json(id: &str) -> Value {
    json!({
        "id": id,
        "email": "reflective@example.com",
        "firstName": "Robin",
        "lastName": "Park",
        "displayName": "Robin",
        "preferences": {
            "timezone": "Europe/Berlin",
            "language": "en",
            "notificationsEnabled": true,
            "emailNotifications": false,
            "maxDailyTasks": 8,
            "reflectionReminderHour": 19,
            "weeklyReflectionEnabled": true
        },
        "active": true
    })
}

pub fn error_body(code: &str, message: &str, path: &str) -> Value {
    json!({
        "error": {
            "code": code,
            "message": message,
            "timestamp": "2024-05-01T09:00:00",
            "path": path
        }
    })
}

/// Address nothing listens on
pub fn unreachable_config() -> ApiEndpointConfig {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    ApiEndpointConfig {
        base_url: format!("http://127.0.0.1:{port}{API_PREFIX}"),
        timeout_ms: 1000,
        ..Default::default()
    }
}
