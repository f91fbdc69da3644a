use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::Response,
    routing::{get, post},
};

use mimix_core::RequestId;

use crate::app::dto;
use crate::app::routes::common::{parse_id, respond};
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_request).get(search_requests))
        .route(
            "/:id",
            get(get_request).patch(update_request_info).delete(remove_request),
        )
        .route("/:id/complete", post(complete_request))
}

pub async fn create_request(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::RequestBody>,
) -> Response {
    let result = services
        .workflow
        .create_request(principal.principal(), body.into())
        .await;
    respond(StatusCode::CREATED, result)
}

pub async fn search_requests(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Query(query): Query<dto::SearchQuery>,
) -> Response {
    let result = services
        .workflow
        .search_requests(principal.principal(), &query.q)
        .await;
    respond(StatusCode::OK, result)
}

pub async fn get_request(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Response {
    let id: RequestId = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    respond(
        StatusCode::OK,
        services.workflow.get_request(principal.principal(), id).await,
    )
}

pub async fn update_request_info(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::RequestInfoBody>,
) -> Response {
    let id: RequestId = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let result = services
        .workflow
        .update_request_info(principal.principal(), id, body.into())
        .await;
    respond(StatusCode::OK, result)
}

pub async fn remove_request(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Response {
    let id: RequestId = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let result = services
        .workflow
        .remove_request(principal.principal(), id)
        .await
        .map(|obj_name| dto::RemovedRequestResponse { id, obj_name });
    respond(StatusCode::OK, result)
}

/// POST /requests/:id/complete - promote the request into a `done` object
pub async fn complete_request(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Response {
    let id: RequestId = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let result = services
        .workflow
        .complete_request(principal.principal(), id)
        .await
        .map(|promotion| dto::PromotionResponse {
            request_id: id,
            promotion,
        });
    respond(StatusCode::OK, result)
}
