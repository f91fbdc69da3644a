use core::str::FromStr;

use axum::{Json, http::StatusCode, response::IntoResponse, response::Response};
use serde::Serialize;

use mimix_core::{DomainError, DomainResult};

use crate::app::errors::domain_error_response;

/// Parse a path id, turning a bad value into a 400 response.
pub fn parse_id<T>(raw: &str) -> Result<T, Response>
where
    T: FromStr<Err = DomainError>,
{
    raw.parse::<T>().map_err(domain_error_response)
}

/// Render an operation result with `status` on success.
pub fn respond<T: Serialize>(status: StatusCode, result: DomainResult<T>) -> Response {
    match result {
        Ok(body) => (status, Json(body)).into_response(),
        Err(e) => domain_error_response(e),
    }
}
