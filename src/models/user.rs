//! # User Model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::Identified;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub timezone: String,
    pub language: String,
    pub notifications_enabled: bool,
    pub email_notifications: bool,
    pub max_daily_tasks: u32,
    pub reflection_reminder_hour: u8,
    pub weekly_reflection_enabled: bool,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
            language: "en".to_string(),
            notifications_enabled: true,
            email_notifications: false,
            max_daily_tasks: 10,
            reflection_reminder_hour: 18,
            weekly_reflection_enabled: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
    #[serde(default)]
    pub preferences: UserPreferences,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<NaiveDateTime>,
}

fn default_active() -> bool {
    true
}

impl Identified for User {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Body of `PUT /users/me`; only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_minimal_user_deserialization() {
        let user: User = serde_json::from_value(json!({
            "id": "u-1",
            "email": "luke@example.com",
            "displayName": "Luke"
        }))
        .unwrap();

        assert_eq!(user.display_name, "Luke");
        assert!(user.active);
        assert_eq!(user.preferences.timezone, "UTC");
    }
}
