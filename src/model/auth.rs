//! Signed, time-limited credentials proving a voter's identity.
//!
//! A credential is a compact HS256 JWT over the process-wide `jwt_secret`.
//! Verification never trusts the client's expiry claim directly: the `exp`
//! claim is required and compared against the server clock with zero leeway,
//! and tokens signed under any other key fail outright.

use chrono::{serde::ts_seconds, DateTime, Utc};
use jsonwebtoken::{
    errors::{Error as JwtError, ErrorKind as JwtErrorKind},
    Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;
use crate::model::voter::Identity;

/// Transport-level prefix of the credential header, per RFC 6750.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Why a presented credential was refused.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("no credential was presented")]
    MissingToken,
    #[error("credential is structurally invalid")]
    Malformed,
    #[error("credential has expired")]
    Expired,
    #[error("credential signature is invalid")]
    InvalidSignature,
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err.kind() {
            JwtErrorKind::ExpiredSignature => Self::Expired,
            JwtErrorKind::InvalidSignature => Self::InvalidSignature,
            _ => Self::Malformed,
        }
    }
}

/// An authentication token representing a specific voter for a bounded window.
/// Doubles as the JWT claims struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthToken {
    #[serde(rename = "sub")]
    identity: Identity,
    #[serde(rename = "iat", with = "ts_seconds")]
    issued_at: DateTime<Utc>,
    #[serde(rename = "exp", with = "ts_seconds")]
    expires_at: DateTime<Utc>,
}

impl AuthToken {
    /// Create a new [`AuthToken`] for an identity the login layer has already
    /// authenticated, valid from now until the configured lifetime elapses.
    pub fn issue(identity: Identity, config: &Config) -> Self {
        let now = Utc::now();
        Self {
            identity,
            issued_at: now,
            expires_at: now + config.auth_ttl(),
        }
    }

    /// The identity this token vouches for.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Serialize and sign this token.
    pub fn into_token(self, config: &Config) -> String {
        jsonwebtoken::encode(
            &Header::default(),
            &self,
            &EncodingKey::from_secret(config.jwt_secret()),
        )
        .expect("JWT encoding is infallible with default settings")
    }

    /// Deserialize a token string, checking signature and expiry against the
    /// server clock.
    pub fn from_token(token: &str, config: &Config) -> Result<Self, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        let data: TokenData<Self> = jsonwebtoken::decode(
            token,
            &DecodingKey::from_secret(config.jwt_secret()),
            &validation,
        )?;
        Ok(data.claims)
    }

    /// Verify a transport-delivered credential header and return the embedded
    /// identity. The `Bearer ` prefix is optional, as some clients send the
    /// bare token.
    pub fn verify_header(header: Option<&str>, config: &Config) -> Result<Identity, AuthError> {
        let token = header.ok_or(AuthError::MissingToken)?;
        let token = token.strip_prefix(BEARER_PREFIX).unwrap_or(token).trim();
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }
        let token = Self::from_token(token, config)?;
        Ok(token.identity)
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use chrono::Duration;

    use super::*;

    impl AuthToken {
        /// A token whose window closed an hour ago.
        pub fn example_expired(identity: Identity) -> Self {
            let now = Utc::now();
            Self {
                identity,
                issued_at: now - Duration::hours(2),
                expires_at: now - Duration::hours(1),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issues_and_verifies() {
        let config = Config::example();
        let identity = Identity::from("123456789");

        let token = AuthToken::issue(identity.clone(), &config);
        assert_eq!(config.auth_ttl(), token.expires_at() - token.issued_at());

        let encoded = token.into_token(&config);
        let header = format!("{BEARER_PREFIX}{encoded}");
        assert_eq!(
            identity,
            AuthToken::verify_header(Some(&header), &config).unwrap()
        );
        // The bare token (no scheme prefix) is also accepted.
        assert_eq!(
            identity,
            AuthToken::verify_header(Some(&encoded), &config).unwrap()
        );
    }

    #[test]
    fn missing_credential_rejected() {
        let config = Config::example();
        assert_eq!(
            Err(AuthError::MissingToken),
            AuthToken::verify_header(None, &config)
        );
        assert_eq!(
            Err(AuthError::MissingToken),
            AuthToken::verify_header(Some("Bearer "), &config)
        );
    }

    #[test]
    fn expired_credential_rejected() {
        let config = Config::example();
        let token = AuthToken::example_expired(Identity::from("123456789"));
        let encoded = token.into_token(&config);
        assert_eq!(
            Err(AuthError::Expired),
            AuthToken::verify_header(Some(&encoded), &config)
        );
    }

    #[test]
    fn foreign_signature_rejected() {
        let config = Config::example();
        let foreign = Config::new("some-other-jwt-secret", "hmac-secret-for-tests");

        let encoded = AuthToken::issue(Identity::from("123456789"), &foreign).into_token(&foreign);
        assert_eq!(
            Err(AuthError::InvalidSignature),
            AuthToken::verify_header(Some(&encoded), &config)
        );
    }

    #[test]
    fn garbage_rejected() {
        let config = Config::example();
        assert_eq!(
            Err(AuthError::Malformed),
            AuthToken::verify_header(Some("Bearer not.a.token"), &config)
        );
    }
}
