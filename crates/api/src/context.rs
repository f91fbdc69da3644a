use mimix_auth::{Principal, Role};
use mimix_core::IdentityId;

/// Principal context for a request (authenticated identity + current role).
///
/// Inserted by the auth middleware after the identity has been re-read, so
/// the role here is never older than the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    principal: Principal,
}

impl PrincipalContext {
    pub fn new(principal: Principal) -> Self {
        Self { principal }
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    pub fn identity_id(&self) -> IdentityId {
        self.principal.identity_id
    }

    pub fn username(&self) -> &str {
        &self.principal.username
    }

    pub fn role(&self) -> Role {
        self.principal.role
    }
}
