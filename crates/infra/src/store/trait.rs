use chrono::{DateTime, Utc};
use thiserror::Error;

use mimix_auth::Identity;
use mimix_catalog::{Library, MimixStatus, Object, ObjectRequest};
use mimix_core::{DomainError, IdentityId, ObjectId, RequestId};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A unique constraint rejected the write (username, library name).
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation(what) => DomainError::Conflict(what),
            StoreError::Backend(msg) => DomainError::Internal(msg),
        }
    }
}

/// An identity together with its password hash. Never leaves the infra layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredIdentity {
    pub identity: Identity,
    pub password_hash: String,
}

/// Exact-match object lookups (values are already normalized).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectFilter {
    Name(String),
    Library(String),
    Developer(String),
}

#[async_trait::async_trait]
pub trait IdentityStore: Send + Sync {
    /// Fails with `UniqueViolation` when the username is taken.
    async fn insert_identity(&self, identity: &StoredIdentity) -> StoreResult<()>;
    async fn identity_by_username(&self, username: &str) -> StoreResult<Option<StoredIdentity>>;
    async fn identity_by_id(&self, id: IdentityId) -> StoreResult<Option<Identity>>;
}

#[async_trait::async_trait]
pub trait LibraryStore: Send + Sync {
    async fn library_by_name(&self, name: &str) -> StoreResult<Option<Library>>;
    /// Fails with `UniqueViolation` when the name is taken.
    async fn insert_library(&self, library: &Library) -> StoreResult<()>;
}

#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    async fn insert_object(&self, object: &Object) -> StoreResult<()>;
    async fn object_by_id(&self, id: ObjectId) -> StoreResult<Option<Object>>;
    /// Replace a stored object. Returns `false` if the id is unknown.
    async fn update_object(&self, object: &Object) -> StoreResult<bool>;
    async fn set_object_status(
        &self,
        id: ObjectId,
        status: MimixStatus,
        now: DateTime<Utc>,
    ) -> StoreResult<bool>;
    /// Set the status of every object with this name. Returns the match count.
    async fn set_status_by_name(
        &self,
        name: &str,
        status: MimixStatus,
        now: DateTime<Utc>,
    ) -> StoreResult<u64>;
    async fn delete_object(&self, id: ObjectId) -> StoreResult<bool>;
    /// Substring match over name, library and developer.
    async fn search_objects(&self, query: &str) -> StoreResult<Vec<Object>>;
    async fn objects_where(&self, filter: &ObjectFilter) -> StoreResult<Vec<Object>>;
}

#[async_trait::async_trait]
pub trait RequestStore: Send + Sync {
    async fn insert_request(&self, request: &ObjectRequest) -> StoreResult<()>;
    async fn request_by_id(&self, id: RequestId) -> StoreResult<Option<ObjectRequest>>;
    async fn update_request(&self, request: &ObjectRequest) -> StoreResult<bool>;
    /// Delete and return the removed request.
    async fn delete_request(&self, id: RequestId) -> StoreResult<Option<ObjectRequest>>;
    /// Substring match over object name, library, requester and developer.
    async fn search_requests(&self, query: &str) -> StoreResult<Vec<ObjectRequest>>;
}

/// Everything the services need from one backend.
pub trait Storage: IdentityStore + LibraryStore + ObjectStore + RequestStore {}

impl<T> Storage for T where T: IdentityStore + LibraryStore + ObjectStore + RequestStore {}

