#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Organizer Client
//!
//! Client-side session and data-synchronization layer for the Act/Plan/Reflect
//! organizer API.
//!
//! ## Overview
//!
//! Every data operation follows the same lifecycle: a resource synchronizer
//! calls the request gateway, the gateway classifies any failure into a
//! [`ParsedError`], and the synchronizer reconciles its cached collection,
//! loading flag, and error slot before notifying the user.
//!
//! ## Module Organization
//!
//! - [`classifier`] - Failure normalization, advisory text, retry/reauth policy
//! - [`api_clients`] - Request gateway and typed endpoint groups
//! - [`session`] - Bearer-token session lifecycle and OAuth handoff
//! - [`sync`] - Resource synchronizers for tasks, projects, and the current user
//! - [`models`] - Records exchanged with the API
//! - [`client`] - One-stop assembly of the above from configuration
//! - [`config`] - File and environment configuration
//! - [`logging`] - Structured logging setup
//! - [`error`] - Local (non-API) failures
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use organizer_client::{ClientConfig, OrganizerClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::load()?;
//! let client = OrganizerClient::from_config(&config)?;
//!
//! client.session().restore().await;
//! if client.session().is_authenticated() {
//!     let tasks = client.tasks().fetch_all(&Default::default()).await?;
//!     println!("{} tasks", tasks.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod api_clients;
pub mod classifier;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod session;
pub mod sync;

pub use api_clients::{ApiClient, QueryParams, TaskFilters, TokenHandle};
pub use classifier::{
    classify, extract_validation_errors, is_retryable, requires_reauth, user_message, ErrorCode,
    ParsedError,
};
pub use client::OrganizerClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use session::{OAuthCallback, Session, SessionManager, SessionStatus};
pub use sync::{
    CreatePolicy, Notification, Notifier, ProjectSynchronizer, ResourceCollection, Severity,
    TaskSynchronizer, UserSynchronizer,
};
