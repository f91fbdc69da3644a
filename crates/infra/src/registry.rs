//! Get-or-create resolution of libraries by name.

use std::sync::Arc;

use tracing::{debug, info};

use mimix_catalog::Library;
use mimix_core::{DomainError, DomainResult, LibraryId, normalize};

use crate::store::{LibraryStore, StoreError};

/// Resolves library names to ids, creating rows on first use.
///
/// Uniqueness comes from the storage constraint on the library name. A caller
/// that loses a creation race sees `UniqueViolation` and re-reads the winner's
/// row once. No in-process locking.
pub struct LibraryRegistry<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> Clone for LibraryRegistry<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S> LibraryRegistry<S>
where
    S: LibraryStore + ?Sized,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn resolve_or_create(&self, name: &str) -> DomainResult<LibraryId> {
        let name = normalize(name);
        if name.is_empty() {
            return Err(DomainError::validation("lib cannot be empty"));
        }

        if let Some(existing) = self.store.library_by_name(&name).await? {
            return Ok(existing.id);
        }

        let library = Library {
            id: LibraryId::new(),
            name,
        };
        match self.store.insert_library(&library).await {
            Ok(()) => {
                info!(library = %library.name, library_id = %library.id, "library created");
                Ok(library.id)
            }
            Err(StoreError::UniqueViolation(_)) => {
                debug!(library = %library.name, "library created concurrently; re-reading");
                self.store
                    .library_by_name(&library.name)
                    .await?
                    .map(|winner| winner.id)
                    .ok_or_else(|| {
                        DomainError::internal(format!(
                            "library '{}' rejected as duplicate but not found on re-read",
                            library.name
                        ))
                    })
            }
            Err(e) => Err(e.into()),
        }
    }
}
