//! Storage boundary.
//!
//! Async traits over the four entity kinds plus two adapters: an in-memory
//! store for tests/dev and a Postgres store backed by `sqlx`.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryStorage;
pub use postgres::PgStorage;
pub use r#trait::{
    IdentityStore, LibraryStore, ObjectFilter, ObjectStore, RequestStore, Storage, StoreError,
    StoreResult, StoredIdentity,
};
