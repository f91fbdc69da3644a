//! `mimix-core`: shared domain primitives.
//!
//! Identifiers, the operation-boundary error taxonomy, and text normalization.
//! No infrastructure concerns live here.

pub mod error;
pub mod id;
pub mod text;

pub use error::{DomainError, DomainResult};
pub use id::{IdentityId, LibraryId, ObjectId, RequestId};
pub use text::{normalize, normalize_optional};
