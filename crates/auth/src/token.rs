//! HS256 identity tokens.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use thiserror::Error;
use tracing::debug;

use mimix_core::{DomainError, IdentityId};

use crate::claims::{JwtClaims, TOKEN_ISSUER, TokenValidationError, validate_claims};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,

    #[error("token signature does not verify")]
    InvalidSignature,

    #[error("unexpected signing algorithm")]
    UnexpectedAlgorithm,

    #[error(transparent)]
    Claims(#[from] TokenValidationError),

    #[error("token signing failed: {0}")]
    Signing(String),
}

impl From<TokenError> for DomainError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Signing(msg) => DomainError::Internal(msg),
            _ => DomainError::Unauthenticated,
        }
    }
}

/// Signs and verifies identity tokens with a shared HMAC secret.
///
/// Only HS256 is accepted on the way in; a token whose header names any other
/// algorithm is rejected before its signature is considered.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl core::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenIssuer").finish_non_exhaustive()
    }
}

impl TokenIssuer {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Time checks run in `validate_claims` against an explicit `now`.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat", "sub", "iss"]);
        validation.set_issuer(&[TOKEN_ISSUER]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Issue a token for `identity_id`, valid for one hour from `now`.
    pub fn issue(&self, identity_id: IdentityId, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = JwtClaims::new(identity_id, now);
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify signature, algorithm, time window and subject.
    pub fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<IdentityId, TokenError> {
        let data = jsonwebtoken::decode::<JwtClaims>(token, &self.decoding, &self.validation)
            .map_err(|e| {
                debug!(error = %e, "token rejected");
                match e.kind() {
                    ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                    ErrorKind::InvalidAlgorithm => TokenError::UnexpectedAlgorithm,
                    _ => TokenError::Malformed,
                }
            })?;

        validate_claims(&data.claims, now)?;
        Ok(data.claims.identity_id()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    const SECRET: &[u8] = b"test-secret";

    #[test]
    fn issued_token_validates_to_the_same_identity() {
        let issuer = TokenIssuer::new(SECRET);
        let id = IdentityId::new();
        let now = Utc::now();
        let token = issuer.issue(id, now).unwrap();
        assert_eq!(issuer.validate(&token, now).unwrap(), id);
    }

    #[test]
    fn wrong_secret_fails_signature_check() {
        let now = Utc::now();
        let token = TokenIssuer::new(b"other-secret")
            .issue(IdentityId::new(), now)
            .unwrap();
        assert_eq!(
            TokenIssuer::new(SECRET).validate(&token, now),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn expired_token_is_rejected() {
        let issuer = TokenIssuer::new(SECRET);
        let issued = Utc::now() - Duration::hours(2);
        let token = issuer.issue(IdentityId::new(), issued).unwrap();
        assert_eq!(
            issuer.validate(&token, Utc::now()),
            Err(TokenError::Claims(TokenValidationError::Expired))
        );
    }

    #[test]
    fn other_hmac_algorithms_are_rejected() {
        let now = Utc::now();
        let claims = JwtClaims::new(IdentityId::new(), now);
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();
        assert_eq!(
            TokenIssuer::new(SECRET).validate(&token, now),
            Err(TokenError::UnexpectedAlgorithm)
        );
    }

    #[test]
    fn non_uuid_subject_is_rejected() {
        let now = Utc::now();
        let mut claims = JwtClaims::new(IdentityId::new(), now);
        claims.sub = "root".to_string();
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();
        assert_eq!(
            TokenIssuer::new(SECRET).validate(&token, now),
            Err(TokenError::Claims(TokenValidationError::InvalidSubject))
        );
    }

    #[test]
    fn garbage_is_malformed() {
        assert_eq!(
            TokenIssuer::new(SECRET).validate("not.a.jwt", Utc::now()),
            Err(TokenError::Malformed)
        );
    }

    #[test]
    fn every_rejection_maps_to_unauthenticated() {
        for err in [
            TokenError::Malformed,
            TokenError::InvalidSignature,
            TokenError::UnexpectedAlgorithm,
            TokenError::Claims(TokenValidationError::Expired),
        ] {
            assert_eq!(DomainError::from(err), DomainError::Unauthenticated);
        }
        assert!(matches!(
            DomainError::from(TokenError::Signing("boom".into())),
            DomainError::Internal(_)
        ));
    }
}
