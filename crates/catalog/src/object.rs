use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mimix_core::{DomainError, DomainResult, LibraryId, ObjectId, normalize};

use crate::{MimixStatus, ObjectRequest};

/// A production artifact tracked through promotion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Object {
    pub id: ObjectId,
    #[serde(rename = "obj")]
    pub name: String,
    pub obj_type: String,
    #[serde(rename = "obj_ver")]
    pub version: String,
    #[serde(rename = "lib")]
    pub library: String,
    #[serde(rename = "lib_id")]
    pub library_id: LibraryId,
    pub promote_date: Option<DateTime<Utc>>,
    #[serde(rename = "mimix_status")]
    pub status: MimixStatus,
    pub developer: String,
    #[serde(rename = "keterangan")]
    pub annotation: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl Object {
    pub fn new(spec: ObjectSpec, library_id: LibraryId, now: DateTime<Utc>) -> Self {
        Self {
            id: ObjectId::new(),
            name: spec.name,
            obj_type: spec.obj_type,
            version: spec.version,
            library: spec.library,
            library_id,
            promote_date: spec.promote_date,
            status: spec.status,
            developer: spec.developer,
            annotation: spec.annotation,
            updated_at: now,
        }
    }

    /// Full replace of every descriptive field.
    pub fn replace(&mut self, spec: ObjectSpec, library_id: LibraryId, now: DateTime<Utc>) {
        self.name = spec.name;
        self.obj_type = spec.obj_type;
        self.version = spec.version;
        self.library = spec.library;
        self.library_id = library_id;
        self.promote_date = spec.promote_date;
        self.status = spec.status;
        self.developer = spec.developer;
        self.annotation = spec.annotation;
        self.updated_at = now;
    }
}

/// Raw object fields as supplied by a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectDraft {
    pub name: String,
    pub obj_type: String,
    pub version: String,
    pub library: String,
    pub promote_date: Option<DateTime<Utc>>,
    pub status: String,
    pub developer: String,
    pub annotation: Option<String>,
}

impl ObjectDraft {
    /// Normalize and check every field. Fails before anything is written.
    pub fn validate(self) -> DomainResult<ObjectSpec> {
        let status = self.status.parse::<MimixStatus>()?;
        let name = required("obj", &self.name)?;
        let library = required("lib", &self.library)?;

        Ok(ObjectSpec {
            name,
            obj_type: self.obj_type.trim().to_string(),
            version: self.version.trim().to_string(),
            library,
            promote_date: self.promote_date,
            status,
            developer: normalize(&self.developer),
            annotation: self
                .annotation
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty()),
        })
    }
}

/// Validated object fields, ready for storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSpec {
    pub name: String,
    pub obj_type: String,
    pub version: String,
    pub library: String,
    pub promote_date: Option<DateTime<Utc>>,
    pub status: MimixStatus,
    pub developer: String,
    pub annotation: Option<String>,
}

impl ObjectSpec {
    /// The object a completed request produces when it has no source object.
    pub fn promoted_from(request: &ObjectRequest) -> Self {
        Self {
            name: request.obj_name.clone(),
            obj_type: request.obj_type.clone(),
            version: request.version.clone(),
            library: request.library.clone(),
            promote_date: request.promote_date,
            status: MimixStatus::Done,
            developer: request.developer.clone().unwrap_or_default(),
            annotation: None,
        }
    }
}

/// Result of a status update by object name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusChange {
    #[serde(rename = "obj")]
    pub name: String,
    #[serde(rename = "mimix_status")]
    pub status: MimixStatus,
}

impl StatusChange {
    pub fn parse(name: &str, status: &str) -> DomainResult<Self> {
        let status = status.parse::<MimixStatus>()?;
        let name = required("obj", name)?;
        Ok(Self { name, status })
    }
}

pub(crate) fn required(field: &str, value: &str) -> DomainResult<String> {
    let value = normalize(value);
    if value.is_empty() {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    Ok(value)
}
