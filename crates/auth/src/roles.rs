use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role identifier used for RBAC.
///
/// Closed set: an identity holds exactly one of these, chosen at registration.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Read-only participant.
    User,
    /// Developer working changes against objects.
    Dev,
    /// Change-management team.
    Cmt,
    /// Deployment/control team, the only role that promotes requests.
    Dc,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::User, Role::Dev, Role::Cmt, Role::Dc];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Dev => "dev",
            Role::Cmt => "cmt",
            Role::Dc => "dc",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid role '{0}' (expected one of: user, dev, cmt, dc)")]
pub struct RoleParseError(pub String);

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "user" => Ok(Role::User),
            "dev" => Ok(Role::Dev),
            "cmt" => Ok(Role::Cmt),
            "dc" => Ok(Role::Dc),
            _ => Err(RoleParseError(s.to_string())),
        }
    }
}
