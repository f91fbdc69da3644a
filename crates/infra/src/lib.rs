//! Infrastructure layer: storage adapters, services, config.
//!
//! Services are generic over the storage traits in [`store`] and take
//! `Arc<S>` with `S: ?Sized`, so both concrete stores and `dyn Storage` work.

mod authz;
pub mod config;
pub mod credentials;
pub mod objects;
pub mod registry;
pub mod store;
pub mod workflow;

pub use config::{AppConfig, ConfigError};
pub use credentials::{CredentialService, Registration, Session};
pub use objects::ObjectFacade;
pub use registry::LibraryRegistry;
pub use store::{InMemoryStorage, PgStorage, Storage, StoreError};
pub use workflow::{Promotion, PromotionWorkflow};
