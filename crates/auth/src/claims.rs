use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use mimix_core::IdentityId;

/// Issuer written into every token.
pub const TOKEN_ISSUER: &str = "mimix";

/// Lifetime of an identity token: exactly one hour after issue.
pub const TOKEN_TTL_SECS: i64 = 60 * 60;

/// JWT claims model (registered claims only).
///
/// The token binds an identity id and a time window; the role is deliberately
/// absent so every request re-reads it from storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    pub iss: String,

    /// Subject: the identity id, as a UUID string.
    pub sub: String,

    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,

    /// Expiration, seconds since the Unix epoch.
    pub exp: i64,
}

impl JwtClaims {
    pub fn new(identity_id: IdentityId, issued_at: DateTime<Utc>) -> Self {
        let iat = issued_at.timestamp();
        Self {
            iss: TOKEN_ISSUER.to_string(),
            sub: identity_id.to_string(),
            iat,
            exp: iat + TOKEN_TTL_SECS,
        }
    }

    /// Parse the subject claim as an identity id.
    pub fn identity_id(&self) -> Result<IdentityId, TokenValidationError> {
        self.sub
            .parse()
            .map_err(|_| TokenValidationError::InvalidSubject)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (exp <= iat)")]
    InvalidTimeWindow,

    #[error("token subject is not an identity id")]
    InvalidSubject,
}

/// Deterministically validate the time window of decoded claims.
///
/// Signature verification happens before this in [`crate::TokenIssuer`].
pub fn validate_claims(claims: &JwtClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    let now = now.timestamp();
    if claims.exp <= claims.iat {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.iat {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.exp {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn issued_now() -> (JwtClaims, DateTime<Utc>) {
        let now = Utc::now();
        (JwtClaims::new(IdentityId::new(), now), now)
    }

    #[test]
    fn expiry_is_exactly_one_hour_after_issue() {
        let (claims, _) = issued_now();
        assert_eq!(claims.exp - claims.iat, 3600);
        assert_eq!(claims.iss, TOKEN_ISSUER);
    }

    #[test]
    fn valid_inside_the_window() {
        let (claims, now) = issued_now();
        assert_eq!(validate_claims(&claims, now), Ok(()));
        assert_eq!(validate_claims(&claims, now + Duration::minutes(59)), Ok(()));
    }

    #[test]
    fn expired_at_the_boundary() {
        let (claims, now) = issued_now();
        assert_eq!(
            validate_claims(&claims, now + Duration::hours(1)),
            Err(TokenValidationError::Expired)
        );
    }

    #[test]
    fn future_issue_time_is_rejected() {
        let (claims, now) = issued_now();
        assert_eq!(
            validate_claims(&claims, now - Duration::minutes(5)),
            Err(TokenValidationError::NotYetValid)
        );
    }

    #[test]
    fn inverted_window_is_rejected() {
        let (mut claims, now) = issued_now();
        claims.exp = claims.iat;
        assert_eq!(
            validate_claims(&claims, now),
            Err(TokenValidationError::InvalidTimeWindow)
        );
    }

    #[test]
    fn subject_must_be_a_uuid() {
        let (mut claims, _) = issued_now();
        claims.sub = "alice".to_string();
        assert_eq!(claims.identity_id(), Err(TokenValidationError::InvalidSubject));
    }
}
