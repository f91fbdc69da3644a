//! `mimix-auth`: pure authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: it knows how to
//! hash passwords, sign and verify identity tokens, and decide whether a role
//! may invoke an operation. Looking identities up is the caller's job.

pub mod authorize;
pub mod claims;
pub mod password;
pub mod permissions;
pub mod principal;
pub mod roles;
pub mod token;

pub use authorize::{
    AuthorizationExplanation, AuthzError, PolicyEntry, allowed_roles, authorize, explain, is_allowed,
    policy_table,
};
pub use claims::{JwtClaims, TOKEN_ISSUER, TOKEN_TTL_SECS, TokenValidationError, validate_claims};
pub use password::{PasswordError, decoy_hash, hash_password, verify_password};
pub use permissions::Operation;
pub use principal::{Identity, Principal};
pub use roles::{Role, RoleParseError};
pub use token::{TokenError, TokenIssuer};
