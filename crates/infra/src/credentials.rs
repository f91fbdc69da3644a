use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use mimix_auth::{
    Identity, Principal, Role, TOKEN_TTL_SECS, TokenIssuer, decoy_hash, hash_password,
    verify_password,
};
use mimix_core::{DomainError, DomainResult, IdentityId, normalize};

use crate::store::{IdentityStore, StoreError, StoredIdentity};

/// Raw registration input.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    pub role: String,
}

/// A freshly issued identity token.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub expires_in: i64,
    pub identity: Identity,
}

/// Registration, login and token checks.
pub struct CredentialService<S: ?Sized> {
    store: Arc<S>,
    tokens: TokenIssuer,
}

impl<S> CredentialService<S>
where
    S: IdentityStore + ?Sized,
{
    pub fn new(store: Arc<S>, tokens: TokenIssuer) -> Self {
        Self { store, tokens }
    }

    pub async fn register(&self, registration: Registration) -> DomainResult<Identity> {
        if registration.password != registration.confirm_password {
            return Err(DomainError::validation("passwords do not match"));
        }
        if registration.password.is_empty() {
            return Err(DomainError::validation("password cannot be empty"));
        }
        let role: Role = registration
            .role
            .parse()
            .map_err(|e: mimix_auth::RoleParseError| DomainError::validation(e.to_string()))?;
        let username = normalize(&registration.username);
        if username.is_empty() {
            return Err(DomainError::validation("username cannot be empty"));
        }

        let identity = Identity {
            id: IdentityId::new(),
            username,
            role,
        };
        let stored = StoredIdentity {
            identity: identity.clone(),
            password_hash: hash_password(&registration.password)?,
        };

        match self.store.insert_identity(&stored).await {
            Ok(()) => {
                info!(identity_id = %identity.id, role = %identity.role, "identity registered");
                Ok(identity)
            }
            Err(StoreError::UniqueViolation(_)) => {
                Err(DomainError::conflict("username already exists"))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Unknown usernames and wrong passwords fail identically, and both pay
    /// for one argon2 verification.
    pub async fn authenticate(&self, username: &str, password: &str) -> DomainResult<Session> {
        let username = normalize(username);
        let Some(stored) = self.store.identity_by_username(&username).await? else {
            let _ = verify_password(password, decoy_hash());
            debug!("login rejected: unknown username");
            return Err(DomainError::Unauthenticated);
        };
        if !verify_password(password, &stored.password_hash) {
            debug!(identity_id = %stored.identity.id, "login rejected: wrong password");
            return Err(DomainError::Unauthenticated);
        }

        let token = self.tokens.issue(stored.identity.id, Utc::now())?;
        Ok(Session {
            token,
            expires_in: TOKEN_TTL_SECS,
            identity: stored.identity,
        })
    }

    /// Verify a token without touching storage.
    pub fn validate_token(&self, token: &str) -> DomainResult<IdentityId> {
        Ok(self.tokens.validate(token, Utc::now())?)
    }

    /// Validate the token, then re-read the identity so the current role applies.
    pub async fn resolve_principal(&self, token: &str) -> DomainResult<Principal> {
        let identity_id = self.validate_token(token)?;
        match self.store.identity_by_id(identity_id).await? {
            Some(identity) => Ok(identity.into()),
            None => {
                debug!(%identity_id, "token subject no longer exists");
                Err(DomainError::Unauthenticated)
            }
        }
    }
}
