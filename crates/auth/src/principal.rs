use serde::{Deserialize, Serialize};

use mimix_core::IdentityId;

use crate::Role;

/// A registered identity, as returned to callers (never carries the hash).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: IdentityId,
    /// Trimmed, lowercase, unique.
    pub username: String,
    pub role: Role,
}

/// The authenticated caller of a single operation.
///
/// Built fresh for every inbound call from the token subject plus a re-read of
/// the identity, so role changes and removals take effect immediately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub identity_id: IdentityId,
    pub username: String,
    pub role: Role,
}

impl From<Identity> for Principal {
    fn from(identity: Identity) -> Self {
        Self {
            identity_id: identity.id,
            username: identity.username,
            role: identity.role,
        }
    }
}
