//! Request/response DTOs and mapping into domain drafts.
//!
//! Field names follow the wire format clients already use (`obj`, `lib`,
//! `mimix_status`, `keterangan`, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mimix_auth::Identity;
use mimix_catalog::{ObjectDraft, RequestDraft, RequestInfoDraft};
use mimix_core::{ObjectId, RequestId};
use mimix_infra::{Promotion, Registration};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    #[serde(alias = "job")]
    pub role: String,
}

impl From<RegisterRequest> for Registration {
    fn from(body: RegisterRequest) -> Self {
        Registration {
            username: body.username,
            password: body.password,
            confirm_password: body.confirm_password,
            role: body.role,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    #[serde(alias = "pass")]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub user: Identity,
}

#[derive(Debug, Deserialize)]
pub struct ObjectBody {
    pub obj: String,
    #[serde(default)]
    pub obj_type: String,
    #[serde(default)]
    pub obj_ver: String,
    pub lib: String,
    #[serde(default)]
    pub promote_date: Option<DateTime<Utc>>,
    pub mimix_status: String,
    #[serde(default)]
    pub developer: String,
    #[serde(default)]
    pub keterangan: Option<String>,
}

impl From<ObjectBody> for ObjectDraft {
    fn from(body: ObjectBody) -> Self {
        ObjectDraft {
            name: body.obj,
            obj_type: body.obj_type,
            version: body.obj_ver,
            library: body.lib,
            promote_date: body.promote_date,
            status: body.mimix_status,
            developer: body.developer,
            annotation: body.keterangan,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
    pub mimix_status: String,
}

#[derive(Debug, Deserialize)]
pub struct RequestBody {
    pub obj_name: String,
    pub lib: String,
    #[serde(default)]
    pub obj_ver: String,
    #[serde(default)]
    pub obj_type: String,
    #[serde(default)]
    pub promote_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub developer: Option<String>,
}

impl From<RequestBody> for RequestDraft {
    fn from(body: RequestBody) -> Self {
        RequestDraft {
            obj_name: body.obj_name,
            library: body.lib,
            version: body.obj_ver,
            obj_type: body.obj_type,
            promote_date: body.promote_date,
            developer: body.developer,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RequestInfoBody {
    pub obj_name: String,
    pub lib: String,
    #[serde(default)]
    pub obj_ver: String,
    #[serde(default)]
    pub obj_type: String,
    #[serde(default)]
    pub promote_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub developer: Option<String>,
    pub req_status: String,
    #[serde(default)]
    pub promote_status: Option<String>,
}

impl From<RequestInfoBody> for RequestInfoDraft {
    fn from(body: RequestInfoBody) -> Self {
        RequestInfoDraft {
            obj_name: body.obj_name,
            library: body.lib,
            version: body.obj_ver,
            obj_type: body.obj_type,
            promote_date: body.promote_date,
            developer: body.developer,
            status: body.req_status,
            promote_status: body.promote_status,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct ExplainQuery {
    pub operation: String,
}

#[derive(Debug, Serialize)]
pub struct PromotionResponse {
    pub request_id: RequestId,
    #[serde(flatten)]
    pub promotion: Promotion,
}

#[derive(Debug, Serialize)]
pub struct RemovedRequestResponse {
    pub id: RequestId,
    pub obj_name: String,
}

#[derive(Debug, Serialize)]
pub struct RemovedObjectResponse {
    pub id: ObjectId,
}
