//! Credential contribution.
//!
//! Token acquisition and refresh belong to an external IAM client. The core
//! only asks a credential for the single header it contributes to a request.
//! Both deprecated refresh-token flows are variants of `RefreshToken` rather
//! than separate code paths.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};

use crate::error::ApiError;

/// One header contributed by a credential.
#[derive(Clone, PartialEq, Eq)]
pub struct Header {
    pub name: &'static str,
    pub value: String,
}

impl fmt::Debug for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Header")
            .field("name", &self.name)
            .field("value", &"[REDACTED]")
            .finish()
    }
}

/// Produces the authorization header for a request, on demand.
pub trait Authenticator: fmt::Debug + Send + Sync {
    fn contribute(&self) -> Result<Option<Header>, ApiError>;
}

/// Sends requests without credentials.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuth;

impl Authenticator for NoAuth {
    fn contribute(&self) -> Result<Option<Header>, ApiError> {
        Ok(None)
    }
}

/// A pre-obtained IAM access token sent as `Authorization: Bearer …`.
#[derive(Debug, Clone)]
pub struct BearerToken(SecretString);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }
}

impl From<SecretString> for BearerToken {
    fn from(token: SecretString) -> Self {
        Self(token)
    }
}

impl Authenticator for BearerToken {
    fn contribute(&self) -> Result<Option<Header>, ApiError> {
        let token = self.0.expose_secret();
        if token.is_empty() {
            return Err(ApiError::Credential("bearer token is empty".to_string()));
        }
        Ok(Some(Header {
            name: "authorization",
            value: format!("Bearer {token}"),
        }))
    }
}

/// Refresh token accepted by the deprecated kubeconfig endpoint.
#[derive(Debug, Clone)]
pub enum RefreshToken {
    /// Sent as `Refresh-Token`.
    Legacy(SecretString),
    /// Sent as `X-Delegated-Refresh-Token`.
    Delegated(SecretString),
}

impl RefreshToken {
    pub fn legacy(token: impl Into<String>) -> Self {
        RefreshToken::Legacy(SecretString::from(token.into()))
    }

    pub fn delegated(token: impl Into<String>) -> Self {
        RefreshToken::Delegated(SecretString::from(token.into()))
    }

    pub fn header_name(&self) -> &'static str {
        match self {
            RefreshToken::Legacy(_) => "refresh-token",
            RefreshToken::Delegated(_) => "x-delegated-refresh-token",
        }
    }

    fn secret(&self) -> &SecretString {
        match self {
            RefreshToken::Legacy(token) | RefreshToken::Delegated(token) => token,
        }
    }
}

impl Authenticator for RefreshToken {
    fn contribute(&self) -> Result<Option<Header>, ApiError> {
        Ok(Some(Header {
            name: self.header_name(),
            value: self.secret().expose_secret().to_string(),
        }))
    }
}

impl<A: Authenticator + ?Sized> Authenticator for Box<A> {
    fn contribute(&self) -> Result<Option<Header>, ApiError> {
        (**self).contribute()
    }
}

impl<A: Authenticator + ?Sized> Authenticator for std::sync::Arc<A> {
    fn contribute(&self) -> Result<Option<Header>, ApiError> {
        (**self).contribute()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_token_contributes_authorization() {
        let header = BearerToken::new("tok").contribute().unwrap().unwrap();
        assert_eq!(header.name, "authorization");
        assert_eq!(header.value, "Bearer tok");
    }

    #[test]
    fn empty_bearer_token_is_rejected() {
        let err = BearerToken::new("").contribute().unwrap_err();
        assert!(matches!(err, ApiError::Credential(_)));
    }

    #[test]
    fn refresh_token_variants_pick_their_header() {
        let legacy = RefreshToken::legacy("old").contribute().unwrap().unwrap();
        assert_eq!(legacy.name, "refresh-token");
        assert_eq!(legacy.value, "old");

        let delegated = RefreshToken::delegated("new").contribute().unwrap().unwrap();
        assert_eq!(delegated.name, "x-delegated-refresh-token");
        assert_eq!(delegated.value, "new");
    }

    #[test]
    fn debug_output_hides_values() {
        let header = RefreshToken::delegated("secret-value")
            .contribute()
            .unwrap()
            .unwrap();
        assert!(!format!("{header:?}").contains("secret-value"));
        assert!(!format!("{:?}", BearerToken::new("secret-value")).contains("secret-value"));
    }

    #[test]
    fn no_auth_contributes_nothing() {
        assert!(NoAuth.contribute().unwrap().is_none());
    }
}
