//! Object store facade: role-gated CRUD and lookups over objects.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use mimix_auth::{Operation, Principal};
use mimix_catalog::{Object, ObjectDraft, StatusChange};
use mimix_core::{DomainError, DomainResult, ObjectId, normalize};

use crate::authz::require;
use crate::registry::LibraryRegistry;
use crate::store::{ObjectFilter, Storage};

pub struct ObjectFacade<S: ?Sized> {
    store: Arc<S>,
    libraries: LibraryRegistry<S>,
}

impl<S> ObjectFacade<S>
where
    S: Storage + ?Sized,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            libraries: LibraryRegistry::new(Arc::clone(&store)),
            store,
        }
    }

    pub async fn create(&self, principal: &Principal, draft: ObjectDraft) -> DomainResult<Object> {
        require(principal, Operation::CreateObject)?;
        let spec = draft.validate()?;
        let library_id = self.libraries.resolve_or_create(&spec.library).await?;

        let object = Object::new(spec, library_id, Utc::now());
        self.store.insert_object(&object).await?;
        info!(object_id = %object.id, obj = %object.name, by = %principal.username, "object created");
        Ok(object)
    }

    /// Set the status of the object(s) named `name`.
    pub async fn update_status(
        &self,
        principal: &Principal,
        name: &str,
        status: &str,
    ) -> DomainResult<StatusChange> {
        require(principal, Operation::UpdateObjectStatus)?;
        let change = StatusChange::parse(name, status)?;

        let matched = self
            .store
            .set_status_by_name(&change.name, change.status, Utc::now())
            .await?;
        if matched == 0 {
            return Err(DomainError::not_found(format!("object '{}'", change.name)));
        }
        Ok(change)
    }

    /// Full replace of an object's fields.
    pub async fn update_info(
        &self,
        principal: &Principal,
        id: ObjectId,
        draft: ObjectDraft,
    ) -> DomainResult<Object> {
        require(principal, Operation::UpdateObjectInfo)?;
        let spec = draft.validate()?;

        // Existence first, so an unknown id never creates a library.
        let mut object = self
            .store
            .object_by_id(id)
            .await?
            .ok_or_else(|| object_not_found(id))?;
        let library_id = self.libraries.resolve_or_create(&spec.library).await?;

        object.replace(spec, library_id, Utc::now());
        if !self.store.update_object(&object).await? {
            return Err(object_not_found(id));
        }
        Ok(object)
    }

    pub async fn remove(&self, principal: &Principal, id: ObjectId) -> DomainResult<()> {
        require(principal, Operation::RemoveObject)?;
        if !self.store.delete_object(id).await? {
            return Err(object_not_found(id));
        }
        info!(object_id = %id, by = %principal.username, "object removed");
        Ok(())
    }

    /// Substring search over name, library and developer. No match is `Ok(vec![])`.
    pub async fn search(&self, principal: &Principal, query: &str) -> DomainResult<Vec<Object>> {
        require(principal, Operation::ReadObjects)?;
        Ok(self.store.search_objects(&normalize(query)).await?)
    }

    pub async fn get(&self, principal: &Principal, id: ObjectId) -> DomainResult<Object> {
        require(principal, Operation::ReadObjects)?;
        self.store
            .object_by_id(id)
            .await?
            .ok_or_else(|| object_not_found(id))
    }

    pub async fn by_name(&self, principal: &Principal, name: &str) -> DomainResult<Vec<Object>> {
        self.lookup(principal, ObjectFilter::Name(normalize(name))).await
    }

    pub async fn by_library(&self, principal: &Principal, library: &str) -> DomainResult<Vec<Object>> {
        self.lookup(principal, ObjectFilter::Library(normalize(library))).await
    }

    pub async fn by_developer(
        &self,
        principal: &Principal,
        developer: &str,
    ) -> DomainResult<Vec<Object>> {
        self.lookup(principal, ObjectFilter::Developer(normalize(developer))).await
    }

    async fn lookup(&self, principal: &Principal, filter: ObjectFilter) -> DomainResult<Vec<Object>> {
        require(principal, Operation::ReadObjects)?;
        Ok(self.store.objects_where(&filter).await?)
    }
}

fn object_not_found(id: ObjectId) -> DomainError {
    DomainError::not_found(format!("object {id}"))
}
