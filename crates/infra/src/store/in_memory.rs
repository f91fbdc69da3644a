use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

use mimix_auth::Identity;
use mimix_catalog::{Library, MimixStatus, Object, ObjectRequest};
use mimix_core::{IdentityId, LibraryId, ObjectId, RequestId};

use super::r#trait::{
    IdentityStore, LibraryStore, ObjectFilter, ObjectStore, RequestStore, StoreError, StoreResult,
    StoredIdentity,
};

/// In-memory storage for tests/dev.
///
/// Uniqueness of usernames and library names is checked under the same write
/// lock as the insert, so racing creators see `UniqueViolation` exactly as
/// they would from a database constraint.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    identities: RwLock<HashMap<IdentityId, StoredIdentity>>,
    libraries: RwLock<HashMap<LibraryId, Library>>,
    objects: RwLock<HashMap<ObjectId, Object>>,
    requests: RwLock<HashMap<RequestId, ObjectRequest>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored libraries.
    pub fn library_count(&self) -> usize {
        self.libraries.read().map(|m| m.len()).unwrap_or(0)
    }

    /// Number of stored objects.
    pub fn object_count(&self) -> usize {
        self.objects.read().map(|m| m.len()).unwrap_or(0)
    }
}

fn read<T>(lock: &RwLock<T>) -> StoreResult<RwLockReadGuard<'_, T>> {
    lock.read()
        .map_err(|_| StoreError::Backend("in-memory store lock poisoned".to_string()))
}

fn write<T>(lock: &RwLock<T>) -> StoreResult<RwLockWriteGuard<'_, T>> {
    lock.write()
        .map_err(|_| StoreError::Backend("in-memory store lock poisoned".to_string()))
}

fn newest_objects_first(mut objects: Vec<Object>) -> Vec<Object> {
    objects.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(a.id.cmp(&b.id)));
    objects
}

fn newest_requests_first(mut requests: Vec<ObjectRequest>) -> Vec<ObjectRequest> {
    requests.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
    requests
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

#[async_trait::async_trait]
impl IdentityStore for InMemoryStorage {
    async fn insert_identity(&self, identity: &StoredIdentity) -> StoreResult<()> {
        let mut map = write(&self.identities)?;
        let username = &identity.identity.username;
        if map.values().any(|s| &s.identity.username == username) {
            return Err(StoreError::UniqueViolation(format!("username '{username}'")));
        }
        map.insert(identity.identity.id, identity.clone());
        Ok(())
    }

    async fn identity_by_username(&self, username: &str) -> StoreResult<Option<StoredIdentity>> {
        let map = read(&self.identities)?;
        Ok(map.values().find(|s| s.identity.username == username).cloned())
    }

    async fn identity_by_id(&self, id: IdentityId) -> StoreResult<Option<Identity>> {
        let map = read(&self.identities)?;
        Ok(map.get(&id).map(|s| s.identity.clone()))
    }
}

#[async_trait::async_trait]
impl LibraryStore for InMemoryStorage {
    async fn library_by_name(&self, name: &str) -> StoreResult<Option<Library>> {
        let map = read(&self.libraries)?;
        Ok(map.values().find(|l| l.name == name).cloned())
    }

    async fn insert_library(&self, library: &Library) -> StoreResult<()> {
        let mut map = write(&self.libraries)?;
        if map.values().any(|l| l.name == library.name) {
            return Err(StoreError::UniqueViolation(format!("library '{}'", library.name)));
        }
        map.insert(library.id, library.clone());
        Ok(())
    }
}

#[async_trait::async_trait]
impl ObjectStore for InMemoryStorage {
    async fn insert_object(&self, object: &Object) -> StoreResult<()> {
        write(&self.objects)?.insert(object.id, object.clone());
        Ok(())
    }

    async fn object_by_id(&self, id: ObjectId) -> StoreResult<Option<Object>> {
        Ok(read(&self.objects)?.get(&id).cloned())
    }

    async fn update_object(&self, object: &Object) -> StoreResult<bool> {
        let mut map = write(&self.objects)?;
        match map.get_mut(&object.id) {
            Some(slot) => {
                *slot = object.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_object_status(
        &self,
        id: ObjectId,
        status: MimixStatus,
        now: DateTime<Utc>,
    ) -> StoreResult<bool> {
        let mut map = write(&self.objects)?;
        match map.get_mut(&id) {
            Some(object) => {
                object.status = status;
                object.updated_at = now;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_status_by_name(
        &self,
        name: &str,
        status: MimixStatus,
        now: DateTime<Utc>,
    ) -> StoreResult<u64> {
        let mut map = write(&self.objects)?;
        let mut matched = 0;
        for object in map.values_mut().filter(|o| o.name == name) {
            object.status = status;
            object.updated_at = now;
            matched += 1;
        }
        Ok(matched)
    }

    async fn delete_object(&self, id: ObjectId) -> StoreResult<bool> {
        Ok(write(&self.objects)?.remove(&id).is_some())
    }

    async fn search_objects(&self, query: &str) -> StoreResult<Vec<Object>> {
        let map = read(&self.objects)?;
        let found = map
            .values()
            .filter(|o| {
                contains(&o.name, query) || contains(&o.library, query) || contains(&o.developer, query)
            })
            .cloned()
            .collect();
        Ok(newest_objects_first(found))
    }

    async fn objects_where(&self, filter: &ObjectFilter) -> StoreResult<Vec<Object>> {
        let map = read(&self.objects)?;
        let found = map
            .values()
            .filter(|o| match filter {
                ObjectFilter::Name(name) => &o.name == name,
                ObjectFilter::Library(lib) => &o.library == lib,
                ObjectFilter::Developer(dev) => &o.developer == dev,
            })
            .cloned()
            .collect();
        Ok(newest_objects_first(found))
    }
}

#[async_trait::async_trait]
impl RequestStore for InMemoryStorage {
    async fn insert_request(&self, request: &ObjectRequest) -> StoreResult<()> {
        write(&self.requests)?.insert(request.id, request.clone());
        Ok(())
    }

    async fn request_by_id(&self, id: RequestId) -> StoreResult<Option<ObjectRequest>> {
        Ok(read(&self.requests)?.get(&id).cloned())
    }

    async fn update_request(&self, request: &ObjectRequest) -> StoreResult<bool> {
        let mut map = write(&self.requests)?;
        match map.get_mut(&request.id) {
            Some(slot) => {
                *slot = request.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_request(&self, id: RequestId) -> StoreResult<Option<ObjectRequest>> {
        Ok(write(&self.requests)?.remove(&id))
    }

    async fn search_requests(&self, query: &str) -> StoreResult<Vec<ObjectRequest>> {
        let map = read(&self.requests)?;
        let found = map
            .values()
            .filter(|r| {
                contains(&r.obj_name, query)
                    || contains(&r.library, query)
                    || contains(&r.requester, query)
                    || r.developer.as_deref().is_some_and(|d| contains(d, query))
            })
            .cloned()
            .collect();
        Ok(newest_requests_first(found))
    }
}
