use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode, response::Response};

use crate::app::dto;
use crate::app::routes::common::respond;
use crate::app::services::AppServices;

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::RegisterRequest>,
) -> Response {
    let result = services.credentials.register(body.into()).await;
    respond(StatusCode::CREATED, result)
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> Response {
    let result = services
        .credentials
        .authenticate(&body.username, &body.password)
        .await
        .map(|session| dto::LoginResponse {
            access_token: session.token,
            token_type: "Bearer",
            expires_in: session.expires_in,
            user: session.identity,
        });
    respond(StatusCode::OK, result)
}
