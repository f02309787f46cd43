use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::User;

/// Authentication status of the running client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// No token, or the last token was rejected
    #[default]
    Unauthenticated,
    /// Token held, identity fetch in flight
    Authenticating,
    /// Token held and identity confirmed
    Authenticated,
}

impl SessionStatus {
    /// Check if an identity fetch is in flight
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Authenticating)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "unauthenticated"),
            Self::Authenticating => write!(f, "authenticating"),
            Self::Authenticated => write!(f, "authenticated"),
        }
    }
}

impl std::str::FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unauthenticated" => Ok(Self::Unauthenticated),
            "authenticating" => Ok(Self::Authenticating),
            "authenticated" => Ok(Self::Authenticated),
            _ => Err(format!("Invalid session status: {s}")),
        }
    }
}

/// Snapshot of the current session.
///
/// `current_user` is only present while `status` is `Authenticated`, and a
/// missing token always means `Unauthenticated`. The token is never included
/// in `Debug` output.
#[derive(Clone, Default, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub current_user: Option<User>,
    pub status: SessionStatus,
}

impl Session {
    pub(crate) fn authenticating(token: String) -> Self {
        Self {
            token: Some(token),
            current_user: None,
            status: SessionStatus::Authenticating,
        }
    }

    pub(crate) fn authenticated(token: String, user: User) -> Self {
        Self {
            token: Some(token),
            current_user: Some(user),
            status: SessionStatus::Authenticated,
        }
    }

    /// True iff both token and user are present
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.current_user.is_some()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token_present", &self.token.is_some())
            .field("current_user", &self.current_user.as_ref().map(|u| &u.id))
            .field("status", &self.status)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_string_round_trip() {
        for status in [
            SessionStatus::Unauthenticated,
            SessionStatus::Authenticating,
            SessionStatus::Authenticated,
        ] {
            assert_eq!(status.to_string().parse::<SessionStatus>().unwrap(), status);
        }
        assert!("logged_in".parse::<SessionStatus>().is_err());
    }

    #[test]
    fn test_default_session_is_unauthenticated() {
        let session = Session::default();
        assert_eq!(session.status, SessionStatus::Unauthenticated);
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_authenticating_session_is_not_authenticated() {
        let session = Session::authenticating("abc".to_string());
        assert!(session.status.is_pending());
        assert!(!session.is_authenticated());
        assert!(!format!("{:?}", session).contains("abc"));
    }
}
