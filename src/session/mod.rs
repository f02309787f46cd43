//! # Session
//!
//! Bearer-token session lifecycle: restore on startup, login, logout, refresh,
//! and the OAuth redirect handoff.

pub mod manager;
pub mod oauth;
pub mod states;
pub mod token_store;

pub use manager::SessionManager;
pub use oauth::OAuthCallback;
pub use states::{Session, SessionStatus};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};

/// Well-known name the token is persisted under
pub const AUTH_TOKEN_KEY: &str = "auth_token";
