use serde::{Deserialize, Serialize};

use mimix_core::LibraryId;

/// A named grouping of objects. Created lazily, never renamed or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Library {
    pub id: LibraryId,
    /// Trimmed, lowercase, unique.
    #[serde(rename = "lib")]
    pub name: String,
}
