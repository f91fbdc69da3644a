//! `mimix-catalog`: objects, object requests and the libraries that group them.
//!
//! Everything here is plain data plus validation. Raw caller input enters as a
//! draft and leaves as a normalized, enum-checked spec; storage only ever sees
//! specs.

pub mod library;
pub mod object;
pub mod request;
pub mod status;

pub use library::Library;
pub use object::{Object, ObjectDraft, ObjectSpec, StatusChange};
pub use request::{ObjectRequest, RequestDraft, RequestInfo, RequestInfoDraft, RequestSpec};
pub use status::{MimixStatus, PromoteStatus, RequestStatus};
