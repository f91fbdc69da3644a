use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mimix_core::{DomainError, DomainResult, ObjectId, RequestId, normalize_optional};

use crate::object::required;
use crate::{Object, PromoteStatus, RequestStatus};

/// A human request to move an object into production.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRequest {
    pub id: RequestId,
    pub obj_name: String,
    /// Username of the identity that filed the request.
    pub requester: String,
    pub developer: Option<String>,
    #[serde(rename = "req_status")]
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "lib")]
    pub library: String,
    #[serde(rename = "obj_ver")]
    pub version: String,
    pub obj_type: String,
    pub promote_date: Option<DateTime<Utc>>,
    pub source_obj_id: Option<ObjectId>,
    pub promote_status: Option<PromoteStatus>,
}

impl ObjectRequest {
    /// A fresh pending request with no source object.
    pub fn pending(spec: RequestSpec, requester: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: RequestId::new(),
            obj_name: spec.obj_name,
            requester: requester.to_string(),
            developer: spec.developer,
            status: RequestStatus::Pending,
            created_at: now,
            updated_at: now,
            library: spec.library,
            version: spec.version,
            obj_type: spec.obj_type,
            promote_date: spec.promote_date,
            source_obj_id: None,
            promote_status: None,
        }
    }

    /// A pending request that re-promotes an existing object.
    ///
    /// Descriptive fields are copied from the object at the time of linking.
    pub fn linked_to(object: &Object, requester: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: RequestId::new(),
            obj_name: object.name.clone(),
            requester: requester.to_string(),
            developer: Some(object.developer.clone()).filter(|d| !d.is_empty()),
            status: RequestStatus::Pending,
            created_at: now,
            updated_at: now,
            library: object.library.clone(),
            version: object.version.clone(),
            obj_type: object.obj_type.clone(),
            promote_date: object.promote_date,
            source_obj_id: Some(object.id),
            promote_status: None,
        }
    }

    /// Full update of the mutable fields.
    ///
    /// A completed request stays completed.
    pub fn apply_info(&mut self, info: RequestInfo, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status == RequestStatus::Completed && info.status == RequestStatus::Pending {
            return Err(DomainError::validation(
                "a completed request cannot return to pending",
            ));
        }

        self.obj_name = info.obj_name;
        self.library = info.library;
        self.version = info.version;
        self.obj_type = info.obj_type;
        self.promote_date = info.promote_date;
        self.developer = info.developer;
        self.status = info.status;
        self.promote_status = info.promote_status;
        self.updated_at = now;
        Ok(())
    }
}

/// Raw request fields as supplied by a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestDraft {
    pub obj_name: String,
    pub library: String,
    pub version: String,
    pub obj_type: String,
    pub promote_date: Option<DateTime<Utc>>,
    pub developer: Option<String>,
}

impl RequestDraft {
    pub fn validate(self) -> DomainResult<RequestSpec> {
        Ok(RequestSpec {
            obj_name: required("obj_name", &self.obj_name)?,
            library: required("lib", &self.library)?,
            version: self.version.trim().to_string(),
            obj_type: self.obj_type.trim().to_string(),
            promote_date: self.promote_date,
            developer: normalize_optional(self.developer.as_deref()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    pub obj_name: String,
    pub library: String,
    pub version: String,
    pub obj_type: String,
    pub promote_date: Option<DateTime<Utc>>,
    pub developer: Option<String>,
}

/// Raw input of a full request update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestInfoDraft {
    pub obj_name: String,
    pub library: String,
    pub version: String,
    pub obj_type: String,
    pub promote_date: Option<DateTime<Utc>>,
    pub developer: Option<String>,
    pub status: String,
    pub promote_status: Option<String>,
}

impl RequestInfoDraft {
    pub fn validate(self) -> DomainResult<RequestInfo> {
        let status = self.status.parse::<RequestStatus>()?;
        let promote_status = match self.promote_status.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<PromoteStatus>()?),
        };

        Ok(RequestInfo {
            obj_name: required("obj_name", &self.obj_name)?,
            library: required("lib", &self.library)?,
            version: self.version.trim().to_string(),
            obj_type: self.obj_type.trim().to_string(),
            promote_date: self.promote_date,
            developer: normalize_optional(self.developer.as_deref()),
            status,
            promote_status,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestInfo {
    pub obj_name: String,
    pub library: String,
    pub version: String,
    pub obj_type: String,
    pub promote_date: Option<DateTime<Utc>>,
    pub developer: Option<String>,
    pub status: RequestStatus,
    pub promote_status: Option<PromoteStatus>,
}
