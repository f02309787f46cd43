//! Parameters carried back by the OAuth redirect.

use reqwest::Url;
use serde_json::json;

use crate::classifier::{ErrorCode, ParsedError};

pub const AUTHENTICATION_FAILED: &str = "Authentication failed. Please try again.";
pub const NO_TOKEN_RECEIVED: &str = "No authentication token received.";

const CALLBACK_BASE: &str = "http://localhost/";

/// Outcome of the provider redirect: a token, a provider error, or nothing
#[derive(Clone, PartialEq, Eq)]
pub enum OAuthCallback {
    Token(String),
    Error(String),
    Missing,
}

impl OAuthCallback {
    /// Read `token` / `error` from a full redirect URL.
    ///
    /// An `error` parameter takes precedence over a `token`.
    pub fn from_redirect_url(redirect: &str) -> Result<Self, ParsedError> {
        let url = Url::parse(redirect).map_err(|e| {
            ParsedError::new(ErrorCode::MalformedRequest, format!("Invalid redirect URL: {e}"))
        })?;
        Ok(Self::from_pairs(
            url.query_pairs()
                .map(|(k, v)| (k.into_owned(), v.into_owned())),
        ))
    }

    /// Read `token` / `error` from a bare query string (`token=...` or `?token=...`)
    pub fn from_query(query: &str) -> Self {
        let mut url = match Url::parse(CALLBACK_BASE) {
            Ok(url) => url,
            Err(_) => return Self::Missing,
        };
        url.set_query(Some(query.trim_start_matches('?')));
        Self::from_pairs(
            url.query_pairs()
                .map(|(k, v)| (k.into_owned(), v.into_owned())),
        )
    }

    fn from_pairs(pairs: impl Iterator<Item = (String, String)>) -> Self {
        let mut token = None;
        let mut error = None;
        for (key, value) in pairs {
            match key.as_str() {
                "token" if !value.is_empty() => token = Some(value),
                "error" => error = Some(value),
                _ => {}
            }
        }

        match (error, token) {
            (Some(error), _) => Self::Error(error),
            (None, Some(token)) => Self::Token(token),
            (None, None) => Self::Missing,
        }
    }

    /// The token, or the failure to surface to the user
    pub fn into_token(self) -> Result<String, ParsedError> {
        match self {
            Self::Token(token) => Ok(token),
            Self::Error(provider_error) => Err(ParsedError::new(
                ErrorCode::Unauthorized,
                AUTHENTICATION_FAILED,
            )
            .with_details(json!({ "error": provider_error }))),
            Self::Missing => Err(ParsedError::new(ErrorCode::Unauthorized, NO_TOKEN_RECEIVED)),
        }
    }
}

impl std::fmt::Debug for OAuthCallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Token(_) => f.write_str("Token(<redacted>)"),
            Self::Error(error) => f.debug_tuple("Error").field(error).finish(),
            Self::Missing => f.write_str("Missing"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_from_redirect_url() {
        let callback =
            OAuthCallback::from_redirect_url("http://localhost:3000/auth/callback?token=abc.def")
                .unwrap();
        assert_eq!(callback, OAuthCallback::Token("abc.def".to_string()));
        assert_eq!(callback.into_token().unwrap(), "abc.def");
    }

    #[test]
    fn test_error_wins_over_token() {
        let callback = OAuthCallback::from_query("?token=abc&error=access_denied");
        assert_eq!(callback, OAuthCallback::Error("access_denied".to_string()));

        let err = callback.into_token().unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthorized);
        assert_eq!(err.message, AUTHENTICATION_FAILED);
        assert_eq!(err.details, Some(json!({ "error": "access_denied" })));
    }

    #[test]
    fn test_missing_token() {
        let callback = OAuthCallback::from_query("state=xyz&token=");
        assert_eq!(callback, OAuthCallback::Missing);
        assert_eq!(callback.into_token().unwrap_err().message, NO_TOKEN_RECEIVED);
    }

    #[test]
    fn test_invalid_redirect_url() {
        let err = OAuthCallback::from_redirect_url("not a url").unwrap_err();
        assert_eq!(err.code, ErrorCode::MalformedRequest);
    }

    #[test]
    fn test_debug_redacts_token() {
        let callback = OAuthCallback::Token("secret".to_string());
        assert_eq!(format!("{:?}", callback), "Token(<redacted>)");
    }
}
