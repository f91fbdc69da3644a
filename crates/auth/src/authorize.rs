use serde::Serialize;
use thiserror::Error;

use mimix_core::DomainError;

use crate::{Operation, Principal, Role};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: role '{role}' may not perform '{operation}'")]
    Forbidden { operation: Operation, role: Role },
}

impl From<AuthzError> for DomainError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::Forbidden { operation, role } => DomainError::Forbidden {
                operation: operation.as_str().to_string(),
                role: role.as_str().to_string(),
            },
        }
    }
}

const ANY_ROLE: &[Role] = &[Role::User, Role::Dev, Role::Cmt, Role::Dc];

/// Static policy table: roles allowed to invoke each operation.
pub fn allowed_roles(operation: Operation) -> &'static [Role] {
    match operation {
        Operation::CreateObject => &[Role::Cmt, Role::Dc],
        Operation::RemoveObject => &[Role::Cmt, Role::Dc],
        // dc included; confirm with stakeholders.
        Operation::UpdateObjectStatus => &[Role::Dev, Role::Cmt, Role::Dc],
        Operation::UpdateObjectInfo => &[Role::Cmt, Role::Dev],
        Operation::CreateRequest => &[Role::Dev, Role::Cmt],
        Operation::RemoveRequest => &[Role::Dev, Role::Cmt, Role::Dc],
        Operation::UpdateRequestInfo => &[Role::Dev, Role::Cmt, Role::Dc],
        Operation::LinkObjectToRequest => &[Role::Dev, Role::Cmt],
        Operation::CompleteRequest => &[Role::Dc],
        Operation::ReadObjects | Operation::ReadRequests => ANY_ROLE,
    }
}

pub fn is_allowed(role: Role, operation: Operation) -> bool {
    allowed_roles(operation).contains(&role)
}

/// Authorize a principal for one operation.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub fn authorize(principal: &Principal, operation: Operation) -> Result<(), AuthzError> {
    if is_allowed(principal.role, operation) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden {
            operation,
            role: principal.role,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Policy audit
// ─────────────────────────────────────────────────────────────────────────────

/// One row of the policy table (for audit/display).
#[derive(Debug, Clone, Serialize)]
pub struct PolicyEntry {
    pub operation: &'static str,
    pub description: &'static str,
    pub allowed_roles: Vec<Role>,
}

pub fn policy_table() -> Vec<PolicyEntry> {
    Operation::ALL
        .into_iter()
        .map(|op| PolicyEntry {
            operation: op.as_str(),
            description: op.description(),
            allowed_roles: allowed_roles(op).to_vec(),
        })
        .collect()
}

/// Explanation of an authorization decision, answering "why was I denied?".
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationExplanation {
    pub operation: &'static str,
    pub role: Role,
    pub granted: bool,
    pub reason: String,
    pub allowed_roles: Vec<Role>,
}

pub fn explain(role: Role, operation: Operation) -> AuthorizationExplanation {
    let allowed = allowed_roles(operation);
    let granted = allowed.contains(&role);
    let reason = if granted {
        format!("role '{role}' is listed for '{operation}'")
    } else {
        let names: Vec<&str> = allowed.iter().map(Role::as_str).collect();
        format!(
            "role '{role}' is not listed for '{operation}'; allowed roles: {}",
            names.join(", ")
        )
    };

    AuthorizationExplanation {
        operation: operation.as_str(),
        role,
        granted,
        reason,
        allowed_roles: allowed.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mimix_core::IdentityId;

    fn principal(role: Role) -> Principal {
        Principal {
            identity_id: IdentityId::new(),
            username: "alice".to_string(),
            role,
        }
    }

    #[test]
    fn policy_table_matches_business_rules() {
        use Operation::*;
        use Role::*;

        let expected: [(Operation, &[Role]); 9] = [
            (CreateObject, &[Cmt, Dc]),
            (RemoveObject, &[Cmt, Dc]),
            (UpdateObjectStatus, &[Dev, Cmt, Dc]),
            (UpdateObjectInfo, &[Cmt, Dev]),
            (CreateRequest, &[Dev, Cmt]),
            (RemoveRequest, &[Dev, Cmt, Dc]),
            (UpdateRequestInfo, &[Dev, Cmt, Dc]),
            (LinkObjectToRequest, &[Dev, Cmt]),
            (CompleteRequest, &[Dc]),
        ];

        for (op, roles) in expected {
            for role in Role::ALL {
                assert_eq!(
                    is_allowed(role, op),
                    roles.contains(&role),
                    "{role} on {op}"
                );
            }
        }
    }

    #[test]
    fn every_role_may_read() {
        for role in Role::ALL {
            assert!(is_allowed(role, Operation::ReadObjects));
            assert!(is_allowed(role, Operation::ReadRequests));
        }
    }

    #[test]
    fn user_cannot_create_objects() {
        let err = authorize(&principal(Role::User), Operation::CreateObject).unwrap_err();
        assert_eq!(
            err,
            AuthzError::Forbidden {
                operation: Operation::CreateObject,
                role: Role::User
            }
        );
        assert!(matches!(DomainError::from(err), DomainError::Forbidden { .. }));
    }

    #[test]
    fn only_dc_completes_requests() {
        assert!(authorize(&principal(Role::Dc), Operation::CompleteRequest).is_ok());
        assert!(authorize(&principal(Role::Cmt), Operation::CompleteRequest).is_err());
        assert!(authorize(&principal(Role::Dev), Operation::CompleteRequest).is_err());
    }

    #[test]
    fn explanation_lists_allowed_roles_on_denial() {
        let explanation = explain(Role::Dev, Operation::CreateObject);
        assert!(!explanation.granted);
        assert!(explanation.reason.contains("cmt, dc"));
        assert_eq!(explanation.allowed_roles, vec![Role::Cmt, Role::Dc]);
    }

    #[test]
    fn policy_table_covers_every_operation() {
        let table = policy_table();
        assert_eq!(table.len(), Operation::ALL.len());
        assert!(table.iter().all(|e| !e.allowed_roles.is_empty()));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn any_role() -> impl Strategy<Value = Role> {
            proptest::sample::select(Role::ALL.to_vec())
        }

        fn any_operation() -> impl Strategy<Value = Operation> {
            proptest::sample::select(Operation::ALL.to_vec())
        }

        proptest! {
            /// Property: `authorize`, `is_allowed` and `explain` never disagree.
            #[test]
            fn decisions_are_consistent(role in any_role(), op in any_operation()) {
                let allowed = is_allowed(role, op);
                prop_assert_eq!(authorize(&principal(role), op).is_ok(), allowed);
                prop_assert_eq!(explain(role, op).granted, allowed);
            }
        }
    }
}
