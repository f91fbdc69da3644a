//! RBAC audit endpoints for transparent authorization debugging.
//!
//! These answer "why was this request denied?" without trying the operation.

use axum::{
    Json, Router,
    extract::{Extension, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};

use mimix_auth::{Operation, explain, policy_table};

use crate::app::{dto, errors};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/policy", get(policy))
        .route("/explain", get(explain_decision))
}

/// GET /rbac/policy - every operation with the roles allowed to invoke it
pub async fn policy() -> Response {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "operations": policy_table() })),
    )
        .into_response()
}

/// GET /rbac/explain?operation=objects.create - the decision for the caller's role
pub async fn explain_decision(
    Extension(principal): Extension<PrincipalContext>,
    Query(query): Query<dto::ExplainQuery>,
) -> Response {
    let operation: Operation = match query.operation.parse() {
        Ok(op) => op,
        Err(msg) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_operation", msg),
    };
    (StatusCode::OK, Json(explain(principal.role(), operation))).into_response()
}
