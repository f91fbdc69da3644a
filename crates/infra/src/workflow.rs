//! Promotion workflow: object requests and their conversion into objects.
//!
//! ```text
//!   CreateRequest ─────────────┐
//!                              ▼
//!   LinkObjectToRequest ──► pending ──CompleteRequest──► completed
//!   (object → on_progress)                 │
//!                                          ├─ source object exists → object := done
//!                                          └─ otherwise            → new object (done)
//! ```

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::info;

use mimix_auth::{Operation, Principal};
use mimix_catalog::{
    MimixStatus, Object, ObjectRequest, ObjectSpec, RequestDraft, RequestInfoDraft, RequestStatus,
};
use mimix_core::{DomainError, DomainResult, ObjectId, RequestId, normalize};

use crate::authz::require;
use crate::registry::LibraryRegistry;
use crate::store::Storage;

/// What completing a request did to the object catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Promotion {
    /// The linked source object was marked `done`.
    ExistingObjectUpdated { object_id: ObjectId },
    /// No usable source link; a new `done` object was created.
    ObjectCreated { object_id: ObjectId },
}

impl Promotion {
    pub fn object_id(&self) -> ObjectId {
        match self {
            Promotion::ExistingObjectUpdated { object_id } | Promotion::ObjectCreated { object_id } => {
                *object_id
            }
        }
    }
}

pub struct PromotionWorkflow<S: ?Sized> {
    store: Arc<S>,
    libraries: LibraryRegistry<S>,
}

impl<S> PromotionWorkflow<S>
where
    S: Storage + ?Sized,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            libraries: LibraryRegistry::new(Arc::clone(&store)),
            store,
        }
    }

    pub async fn create_request(
        &self,
        principal: &Principal,
        draft: RequestDraft,
    ) -> DomainResult<ObjectRequest> {
        require(principal, Operation::CreateRequest)?;
        let spec = draft.validate()?;

        let request = ObjectRequest::pending(spec, &principal.username, Utc::now());
        self.store.insert_request(&request).await?;
        info!(request_id = %request.id, obj = %request.obj_name, by = %principal.username, "request created");
        Ok(request)
    }

    /// Open a pending request for an existing object and mark the object `on_progress`.
    pub async fn link_object_to_request(
        &self,
        principal: &Principal,
        object_id: ObjectId,
    ) -> DomainResult<ObjectRequest> {
        require(principal, Operation::LinkObjectToRequest)?;
        let object = self
            .store
            .object_by_id(object_id)
            .await?
            .ok_or_else(|| object_not_found(object_id))?;

        // Request first: a failed insert must leave the object's status alone.
        let now = Utc::now();
        let request = ObjectRequest::linked_to(&object, &principal.username, now);
        self.store.insert_request(&request).await?;

        if !self
            .store
            .set_object_status(object.id, MimixStatus::OnProgress, now)
            .await?
        {
            self.store.delete_request(request.id).await?;
            return Err(object_not_found(object_id));
        }
        info!(request_id = %request.id, object_id = %object.id, by = %principal.username, "object linked to request");
        Ok(request)
    }

    /// Mark the request completed, then promote its object.
    ///
    /// A created object is written back as the request's source link, so
    /// completing the same request again updates that object instead of
    /// creating a second one.
    pub async fn complete_request(
        &self,
        principal: &Principal,
        request_id: RequestId,
    ) -> DomainResult<Promotion> {
        require(principal, Operation::CompleteRequest)?;
        let mut request = self
            .store
            .request_by_id(request_id)
            .await?
            .ok_or_else(|| request_not_found(request_id))?;

        let now = Utc::now();
        if request.status != RequestStatus::Completed {
            request.status = RequestStatus::Completed;
            request.updated_at = now;
            self.save_request(&request).await?;
        }

        if let Some(source_id) = request.source_obj_id {
            if self
                .store
                .set_object_status(source_id, MimixStatus::Done, now)
                .await?
            {
                info!(%request_id, object_id = %source_id, by = %principal.username, "request promoted onto existing object");
                return Ok(Promotion::ExistingObjectUpdated {
                    object_id: source_id,
                });
            }
        }

        let library_id = self.libraries.resolve_or_create(&request.library).await?;
        let object = Object::new(ObjectSpec::promoted_from(&request), library_id, now);
        self.store.insert_object(&object).await?;

        request.source_obj_id = Some(object.id);
        self.save_request(&request).await?;

        info!(%request_id, object_id = %object.id, by = %principal.username, "request promoted to new object");
        Ok(Promotion::ObjectCreated {
            object_id: object.id,
        })
    }

    pub async fn update_request_info(
        &self,
        principal: &Principal,
        request_id: RequestId,
        draft: RequestInfoDraft,
    ) -> DomainResult<ObjectRequest> {
        require(principal, Operation::UpdateRequestInfo)?;
        let info = draft.validate()?;

        let mut request = self
            .store
            .request_by_id(request_id)
            .await?
            .ok_or_else(|| request_not_found(request_id))?;
        request.apply_info(info, Utc::now())?;
        self.save_request(&request).await?;
        Ok(request)
    }

    /// Delete a request, returning its object name.
    pub async fn remove_request(
        &self,
        principal: &Principal,
        request_id: RequestId,
    ) -> DomainResult<String> {
        require(principal, Operation::RemoveRequest)?;
        let removed = self
            .store
            .delete_request(request_id)
            .await?
            .ok_or_else(|| request_not_found(request_id))?;
        info!(%request_id, by = %principal.username, "request removed");
        Ok(removed.obj_name)
    }

    pub async fn search_requests(
        &self,
        principal: &Principal,
        query: &str,
    ) -> DomainResult<Vec<ObjectRequest>> {
        require(principal, Operation::ReadRequests)?;
        Ok(self.store.search_requests(&normalize(query)).await?)
    }

    pub async fn get_request(
        &self,
        principal: &Principal,
        request_id: RequestId,
    ) -> DomainResult<ObjectRequest> {
        require(principal, Operation::ReadRequests)?;
        self.store
            .request_by_id(request_id)
            .await?
            .ok_or_else(|| request_not_found(request_id))
    }

    async fn save_request(&self, request: &ObjectRequest) -> DomainResult<()> {
        if !self.store.update_request(request).await? {
            return Err(request_not_found(request.id));
        }
        Ok(())
    }
}

fn object_not_found(id: ObjectId) -> DomainError {
    DomainError::not_found(format!("object {id}"))
}

fn request_not_found(id: RequestId) -> DomainError {
    DomainError::not_found(format!("request {id}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mimix_auth::Role;
    use mimix_catalog::{ObjectDraft, PromoteStatus};
    use mimix_core::IdentityId;

    use crate::objects::ObjectFacade;
    use crate::store::InMemoryStorage;

    fn principal(name: &str, role: Role) -> Principal {
        Principal {
            identity_id: IdentityId::new(),
            username: name.to_string(),
            role,
        }
    }

    fn request_draft(obj: &str, lib: &str) -> RequestDraft {
        RequestDraft {
            obj_name: obj.to_string(),
            library: lib.to_string(),
            version: "1".to_string(),
            obj_type: "*PGM".to_string(),
            ..RequestDraft::default()
        }
    }

    struct Fixture {
        store: Arc<InMemoryStorage>,
        objects: ObjectFacade<InMemoryStorage>,
        workflow: PromotionWorkflow<InMemoryStorage>,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(InMemoryStorage::new());
        Fixture {
            objects: ObjectFacade::new(store.clone()),
            workflow: PromotionWorkflow::new(store.clone()),
            store,
        }
    }

    #[tokio::test]
    async fn dev_request_completed_by_dc_creates_done_object() {
        let f = fixture();
        let alice = principal("alice", Role::Dev);
        let bob = principal("bob", Role::Dc);

        let request = f
            .workflow
            .create_request(&alice, request_draft("foo", "libA"))
            .await
            .unwrap();
        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!(request.requester, "alice");

        let promotion = f.workflow.complete_request(&bob, request.id).await.unwrap();
        let Promotion::ObjectCreated { object_id } = promotion else {
            panic!("expected a new object, got {promotion:?}");
        };

        let object = f.objects.get(&bob, object_id).await.unwrap();
        assert_eq!(object.name, "foo");
        assert_eq!(object.status, MimixStatus::Done);
        assert_eq!(object.library, "liba");
        assert_eq!(f.store.object_count(), 1);

        let stored = f.workflow.get_request(&alice, request.id).await.unwrap();
        assert_eq!(stored.status, RequestStatus::Completed);
    }

    #[tokio::test]
    async fn linked_request_never_creates_an_object() {
        let f = fixture();
        let cmt = principal("carol", Role::Cmt);
        let dc = principal("dan", Role::Dc);

        let object = f
            .objects
            .create(
                &cmt,
                ObjectDraft {
                    name: "pgm9".to_string(),
                    library: "liba".to_string(),
                    status: "unset".to_string(),
                    ..ObjectDraft::default()
                },
            )
            .await
            .unwrap();

        let request = f.workflow.link_object_to_request(&cmt, object.id).await.unwrap();
        assert_eq!(request.source_obj_id, Some(object.id));
        assert_eq!(
            f.objects.get(&cmt, object.id).await.unwrap().status,
            MimixStatus::OnProgress
        );

        let promotion = f.workflow.complete_request(&dc, request.id).await.unwrap();
        assert_eq!(
            promotion,
            Promotion::ExistingObjectUpdated {
                object_id: object.id
            }
        );
        assert_eq!(f.store.object_count(), 1);
        assert_eq!(
            f.objects.get(&cmt, object.id).await.unwrap().status,
            MimixStatus::Done
        );
    }

    #[tokio::test]
    async fn completing_twice_does_not_duplicate_the_object() {
        let f = fixture();
        let dc = principal("dan", Role::Dc);
        let request = f
            .workflow
            .create_request(&principal("alice", Role::Dev), request_draft("foo", "liba"))
            .await
            .unwrap();

        let first = f.workflow.complete_request(&dc, request.id).await.unwrap();
        let second = f.workflow.complete_request(&dc, request.id).await.unwrap();

        assert_eq!(
            second,
            Promotion::ExistingObjectUpdated {
                object_id: first.object_id()
            }
        );
        assert_eq!(f.store.object_count(), 1);
    }

    #[tokio::test]
    async fn deleted_source_object_falls_back_to_creation() {
        let f = fixture();
        let cmt = principal("carol", Role::Cmt);
        let object = f
            .objects
            .create(
                &cmt,
                ObjectDraft {
                    name: "pgm9".to_string(),
                    library: "liba".to_string(),
                    status: "unset".to_string(),
                    ..ObjectDraft::default()
                },
            )
            .await
            .unwrap();
        let request = f.workflow.link_object_to_request(&cmt, object.id).await.unwrap();
        f.objects.remove(&cmt, object.id).await.unwrap();

        let promotion = f
            .workflow
            .complete_request(&principal("dan", Role::Dc), request.id)
            .await
            .unwrap();
        assert!(matches!(promotion, Promotion::ObjectCreated { .. }));
        assert_ne!(promotion.object_id(), object.id);
        assert_eq!(f.store.object_count(), 1);
    }

    #[tokio::test]
    async fn only_dc_may_complete() {
        let f = fixture();
        let cmt = principal("carol", Role::Cmt);
        let request = f.workflow.create_request(&cmt, request_draft("foo", "liba")).await.unwrap();

        assert!(matches!(
            f.workflow.complete_request(&cmt, request.id).await,
            Err(DomainError::Forbidden { .. })
        ));
        assert_eq!(f.store.object_count(), 0);
        assert_eq!(
            f.workflow.get_request(&cmt, request.id).await.unwrap().status,
            RequestStatus::Pending
        );
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let f = fixture();
        let dc = principal("dan", Role::Dc);
        let dev = principal("alice", Role::Dev);

        assert!(matches!(
            f.workflow.complete_request(&dc, RequestId::new()).await,
            Err(DomainError::NotFound(_))
        ));
        assert!(matches!(
            f.workflow.link_object_to_request(&dev, ObjectId::new()).await,
            Err(DomainError::NotFound(_))
        ));
        assert!(matches!(
            f.workflow.remove_request(&dev, RequestId::new()).await,
            Err(DomainError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn user_role_cannot_file_requests() {
        let f = fixture();
        assert!(matches!(
            f.workflow
                .create_request(&principal("uma", Role::User), request_draft("foo", "liba"))
                .await,
            Err(DomainError::Forbidden { .. })
        ));
    }

    #[tokio::test]
    async fn update_info_validates_statuses() {
        let f = fixture();
        let dev = principal("alice", Role::Dev);
        let request = f.workflow.create_request(&dev, request_draft("foo", "liba")).await.unwrap();

        let info = |status: &str, promote: Option<&str>| RequestInfoDraft {
            obj_name: "foo".to_string(),
            library: "liba".to_string(),
            version: "2".to_string(),
            status: status.to_string(),
            promote_status: promote.map(str::to_string),
            ..RequestInfoDraft::default()
        };

        let updated = f
            .workflow
            .update_request_info(&dev, request.id, info("pending", Some("in_progress")))
            .await
            .unwrap();
        assert_eq!(updated.version, "2");
        assert_eq!(updated.promote_status, Some(PromoteStatus::InProgress));

        assert!(matches!(
            f.workflow
                .update_request_info(&dev, request.id, info("archived", None))
                .await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            f.workflow
                .update_request_info(&dev, request.id, info("pending", Some("shipped")))
                .await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn remove_returns_the_object_name() {
        let f = fixture();
        let dev = principal("alice", Role::Dev);
        let request = f.workflow.create_request(&dev, request_draft("Foo", "liba")).await.unwrap();

        assert_eq!(f.workflow.remove_request(&dev, request.id).await.unwrap(), "foo");
        assert!(f.workflow.search_requests(&dev, "foo").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn search_requests_matches_requester() {
        let f = fixture();
        f.workflow
            .create_request(&principal("alice", Role::Dev), request_draft("foo", "liba"))
            .await
            .unwrap();
        f.workflow
            .create_request(&principal("carol", Role::Cmt), request_draft("bar", "libb"))
            .await
            .unwrap();

        let reader = principal("uma", Role::User);
        assert_eq!(f.workflow.search_requests(&reader, "ALICE").await.unwrap().len(), 1);
        assert_eq!(f.workflow.search_requests(&reader, "lib").await.unwrap().len(), 2);
    }

    /// Delegates to the in-memory store but refuses every request insert.
    struct RejectingRequestInserts {
        inner: InMemoryStorage,
    }

    mod rejecting {
        use chrono::{DateTime, Utc};
        use mimix_auth::Identity;
        use mimix_catalog::{Library, MimixStatus, Object, ObjectRequest};
        use mimix_core::{IdentityId, ObjectId, RequestId};

        use super::RejectingRequestInserts;
        use crate::store::{
            IdentityStore, LibraryStore, ObjectFilter, ObjectStore, RequestStore, StoreError,
            StoreResult, StoredIdentity,
        };

        #[async_trait::async_trait]
        impl IdentityStore for RejectingRequestInserts {
            async fn insert_identity(&self, identity: &StoredIdentity) -> StoreResult<()> {
                self.inner.insert_identity(identity).await
            }
            async fn identity_by_username(&self, username: &str) -> StoreResult<Option<StoredIdentity>> {
                self.inner.identity_by_username(username).await
            }
            async fn identity_by_id(&self, id: IdentityId) -> StoreResult<Option<Identity>> {
                self.inner.identity_by_id(id).await
            }
        }

        #[async_trait::async_trait]
        impl LibraryStore for RejectingRequestInserts {
            async fn library_by_name(&self, name: &str) -> StoreResult<Option<Library>> {
                self.inner.library_by_name(name).await
            }
            async fn insert_library(&self, library: &Library) -> StoreResult<()> {
                self.inner.insert_library(library).await
            }
        }

        #[async_trait::async_trait]
        impl ObjectStore for RejectingRequestInserts {
            async fn insert_object(&self, object: &Object) -> StoreResult<()> {
                self.inner.insert_object(object).await
            }
            async fn object_by_id(&self, id: ObjectId) -> StoreResult<Option<Object>> {
                self.inner.object_by_id(id).await
            }
            async fn update_object(&self, object: &Object) -> StoreResult<bool> {
                self.inner.update_object(object).await
            }
            async fn set_object_status(
                &self,
                id: ObjectId,
                status: MimixStatus,
                now: DateTime<Utc>,
            ) -> StoreResult<bool> {
                self.inner.set_object_status(id, status, now).await
            }
            async fn set_status_by_name(
                &self,
                name: &str,
                status: MimixStatus,
                now: DateTime<Utc>,
            ) -> StoreResult<u64> {
                self.inner.set_status_by_name(name, status, now).await
            }
            async fn delete_object(&self, id: ObjectId) -> StoreResult<bool> {
                self.inner.delete_object(id).await
            }
            async fn search_objects(&self, query: &str) -> StoreResult<Vec<Object>> {
                self.inner.search_objects(query).await
            }
            async fn objects_where(&self, filter: &ObjectFilter) -> StoreResult<Vec<Object>> {
                self.inner.objects_where(filter).await
            }
        }

        #[async_trait::async_trait]
        impl RequestStore for RejectingRequestInserts {
            async fn insert_request(&self, _request: &ObjectRequest) -> StoreResult<()> {
                Err(StoreError::Backend("insert refused".to_string()))
            }
            async fn request_by_id(&self, id: RequestId) -> StoreResult<Option<ObjectRequest>> {
                self.inner.request_by_id(id).await
            }
            async fn update_request(&self, request: &ObjectRequest) -> StoreResult<bool> {
                self.inner.update_request(request).await
            }
            async fn delete_request(&self, id: RequestId) -> StoreResult<Option<ObjectRequest>> {
                self.inner.delete_request(id).await
            }
            async fn search_requests(&self, query: &str) -> StoreResult<Vec<ObjectRequest>> {
                self.inner.search_requests(query).await
            }
        }
    }

    #[tokio::test]
    async fn failed_link_leaves_the_object_status_alone() {
        let store = Arc::new(RejectingRequestInserts {
            inner: InMemoryStorage::new(),
        });
        let objects = ObjectFacade::new(store.clone());
        let workflow = PromotionWorkflow::new(store.clone());
        let cmt = principal("carol", Role::Cmt);

        let object = objects
            .create(
                &cmt,
                ObjectDraft {
                    name: "pgm9".to_string(),
                    library: "liba".to_string(),
                    status: "daftarkan".to_string(),
                    ..ObjectDraft::default()
                },
            )
            .await
            .unwrap();

        assert!(matches!(
            workflow.link_object_to_request(&cmt, object.id).await,
            Err(DomainError::Internal(_))
        ));
        assert_eq!(
            objects.get(&cmt, object.id).await.unwrap().status,
            MimixStatus::Daftarkan
        );
    }
}
