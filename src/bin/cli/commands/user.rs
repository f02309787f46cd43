//! Current-user command handlers for the organizer CLI

use organizer_client::models::{UpdateUserRequest, User};
use organizer_client::{ClientConfig, ClientResult};

use crate::cli::{authenticated_client, print_json};
use crate::UserCommands;

pub async fn handle_user_command(
    cmd: UserCommands,
    config: &ClientConfig,
    json: bool,
) -> ClientResult<()> {
    let client = authenticated_client(config).await?;
    let users = client.user();

    match cmd {
        UserCommands::Show => {
            let user = users.fetch().await?;
            print_user(&user, json)?;
        }
        UserCommands::Update {
            first_name,
            last_name,
            display_name,
        } => {
            let request = UpdateUserRequest {
                first_name,
                last_name,
                display_name,
                ..Default::default()
            };
            let user = users.update_user(&request).await?;
            print_user(&user, json)?;
        }
        UserCommands::UpdatePrefs {
            timezone,
            language,
            max_daily_tasks,
            reflection_hour,
            notifications,
        } => {
            let mut preferences = users.fetch().await?.preferences;
            if let Some(timezone) = timezone {
                preferences.timezone = timezone;
            }
            if let Some(language) = language {
                preferences.language = language;
            }
            if let Some(max) = max_daily_tasks {
                preferences.max_daily_tasks = max;
            }
            if let Some(hour) = reflection_hour {
                preferences.reflection_reminder_hour = hour;
            }
            if let Some(enabled) = notifications {
                preferences.notifications_enabled = enabled;
            }

            let user = users.update_preferences(&preferences).await?;
            print_user(&user, json)?;
        }
    }

    Ok(())
}

fn print_user(user: &User, json: bool) -> ClientResult<()> {
    if json {
        return print_json(user);
    }

    println!("  ID: {}", user.id);
    println!("  Email: {}", user.email);
    println!("  Name: {} {}", user.first_name, user.last_name);
    println!("  Display name: {}", user.display_name);
    let prefs = &user.preferences;
    println!("  Timezone: {}", prefs.timezone);
    println!("  Language: {}", prefs.language);
    println!("  Max daily tasks: {}", prefs.max_daily_tasks);
    println!("  Reflection reminder: {:02}:00", prefs.reflection_reminder_hour);
    println!(
        "  Notifications: {}",
        if prefs.notifications_enabled { "on" } else { "off" }
    );
    Ok(())
}
