use axum::{Router, routing::get};

pub mod auth;
pub mod common;
pub mod objects;
pub mod rbac;
pub mod requests;
pub mod system;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/objects", objects::router())
        .nest("/requests", requests::router())
        .nest("/rbac", rbac::router())
}
