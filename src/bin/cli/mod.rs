//! CLI module for the organizer CLI tool
//!
//! Command structures live in the binary root; handlers live in [`commands`].

pub mod commands;

use std::sync::Arc;

use organizer_client::session::{FileTokenStore, SessionStatus};
use organizer_client::sync::{Notification, Notifier, Severity};
use organizer_client::{ClientConfig, ClientError, ClientResult, OrganizerClient};
use serde::Serialize;

pub use commands::{
    handle_auth_command, handle_config_command, handle_project_command, handle_task_command,
    handle_user_command,
};

/// Prints synchronizer notifications the way the CLI reports outcomes
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Success => println!("✓ {}", notification.message),
            Severity::Info => println!("  {}", notification.message),
            Severity::Warning => eprintln!("! {}", notification.message),
            Severity::Error => eprintln!("✗ {}", notification.message),
        }
    }
}

/// Client wired to the configured token file and console notifications
pub fn build_client(config: &ClientConfig) -> ClientResult<OrganizerClient> {
    let store = Arc::new(FileTokenStore::new(config.token_file()?));
    OrganizerClient::with_parts(config, store, Arc::new(ConsoleNotifier))
}

/// Client with the stored session restored; fails when nobody is signed in
pub async fn authenticated_client(config: &ClientConfig) -> ClientResult<OrganizerClient> {
    let client = build_client(config)?;
    if client.session().restore().await != SessionStatus::Authenticated {
        eprintln!("✗ Not signed in. Run `organizer-cli auth login <TOKEN>` first.");
        return Err(ClientError::InvalidInput("No authenticated session".to_string()));
    }
    Ok(client)
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> ClientResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn parse_arg<T>(value: Option<String>, what: &str) -> ClientResult<Option<T>>
where
    T: std::str::FromStr<Err = String>,
{
    value
        .map(|raw| raw.parse::<T>())
        .transpose()
        .map_err(|e| ClientError::InvalidInput(format!("Invalid {}: {}", what, e)))
}
