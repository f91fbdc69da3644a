use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use tracing::error;

use mimix_core::DomainError;

/// Map an operation-boundary error to its HTTP response.
///
/// Internal details are logged, never returned.
pub fn domain_error_response(err: DomainError) -> axum::response::Response {
    let code = err.code();
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, code, msg),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, code, msg),
        DomainError::Unauthenticated => json_error(StatusCode::UNAUTHORIZED, code, "unauthorized"),
        e @ DomainError::Forbidden { .. } => json_error(StatusCode::FORBIDDEN, code, e.to_string()),
        e @ DomainError::NotFound(_) => json_error(StatusCode::NOT_FOUND, code, e.to_string()),
        DomainError::Internal(msg) => {
            error!(error = %msg, "internal error");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, code, "internal error")
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_error_taxonomy() {
        let cases = [
            (DomainError::validation("x"), StatusCode::BAD_REQUEST),
            (DomainError::conflict("x"), StatusCode::CONFLICT),
            (DomainError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (
                DomainError::Forbidden {
                    operation: "objects.create".into(),
                    role: "user".into(),
                },
                StatusCode::FORBIDDEN,
            ),
            (DomainError::not_found("object"), StatusCode::NOT_FOUND),
            (DomainError::internal("db down"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(domain_error_response(err).status(), status);
        }
    }
}
