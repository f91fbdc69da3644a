use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::Response,
    routing::{get, patch, post},
};

use mimix_core::ObjectId;

use crate::app::dto;
use crate::app::routes::common::{parse_id, respond};
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_object).get(search_objects))
        .route(
            "/:id",
            get(get_object).patch(update_object_info).delete(remove_object),
        )
        .route("/:id/requests", post(link_object_to_request))
        .route("/by-name/:name", get(objects_by_name))
        .route("/by-name/:name/status", patch(update_object_status))
        .route("/by-library/:lib", get(objects_by_library))
        .route("/by-developer/:dev", get(objects_by_developer))
}

pub async fn create_object(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::ObjectBody>,
) -> Response {
    let result = services.objects.create(principal.principal(), body.into()).await;
    respond(StatusCode::CREATED, result)
}

pub async fn search_objects(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Query(query): Query<dto::SearchQuery>,
) -> Response {
    let result = services.objects.search(principal.principal(), &query.q).await;
    respond(StatusCode::OK, result)
}

pub async fn get_object(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Response {
    let id: ObjectId = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    respond(StatusCode::OK, services.objects.get(principal.principal(), id).await)
}

pub async fn update_object_info(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::ObjectBody>,
) -> Response {
    let id: ObjectId = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let result = services
        .objects
        .update_info(principal.principal(), id, body.into())
        .await;
    respond(StatusCode::OK, result)
}

pub async fn remove_object(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Response {
    let id: ObjectId = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let result = services
        .objects
        .remove(principal.principal(), id)
        .await
        .map(|()| dto::RemovedObjectResponse { id });
    respond(StatusCode::OK, result)
}

pub async fn link_object_to_request(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Response {
    let id: ObjectId = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let result = services
        .workflow
        .link_object_to_request(principal.principal(), id)
        .await;
    respond(StatusCode::CREATED, result)
}

pub async fn update_object_status(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(name): Path<String>,
    Json(body): Json<dto::StatusBody>,
) -> Response {
    let result = services
        .objects
        .update_status(principal.principal(), &name, &body.mimix_status)
        .await;
    respond(StatusCode::OK, result)
}

pub async fn objects_by_name(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(name): Path<String>,
) -> Response {
    let result = services.objects.by_name(principal.principal(), &name).await;
    respond(StatusCode::OK, result)
}

pub async fn objects_by_library(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(lib): Path<String>,
) -> Response {
    let result = services.objects.by_library(principal.principal(), &lib).await;
    respond(StatusCode::OK, result)
}

pub async fn objects_by_developer(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(dev): Path<String>,
) -> Response {
    let result = services.objects.by_developer(principal.principal(), &dev).await;
    respond(StatusCode::OK, result)
}
