use tracing::warn;

use mimix_auth::{Operation, Principal, authorize};
use mimix_core::DomainResult;

/// Policy gate run before any service work.
pub(crate) fn require(principal: &Principal, operation: Operation) -> DomainResult<()> {
    authorize(principal, operation).map_err(|err| {
        warn!(
            identity_id = %principal.identity_id,
            role = %principal.role,
            operation = %operation,
            "operation forbidden"
        );
        err.into()
    })
}
