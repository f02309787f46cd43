//! Command handlers for the organizer CLI
//!
//! This module contains all command handler implementations, decomposed by command category.

pub mod auth;
pub mod config;
pub mod project;
pub mod task;
pub mod user;

pub use auth::handle_auth_command;
pub use config::handle_config_command;
pub use project::handle_project_command;
pub use task::handle_task_command;
pub use user::handle_user_command;
