use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Operation tag checked by the authorization policy.
///
/// Tags use the `area.action` naming (e.g. `"objects.create"`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    CreateObject,
    RemoveObject,
    UpdateObjectStatus,
    UpdateObjectInfo,
    CreateRequest,
    RemoveRequest,
    UpdateRequestInfo,
    LinkObjectToRequest,
    CompleteRequest,
    /// Search and lookups over objects.
    ReadObjects,
    /// Search and lookups over requests.
    ReadRequests,
}

impl Operation {
    pub const ALL: [Operation; 11] = [
        Operation::CreateObject,
        Operation::RemoveObject,
        Operation::UpdateObjectStatus,
        Operation::UpdateObjectInfo,
        Operation::CreateRequest,
        Operation::RemoveRequest,
        Operation::UpdateRequestInfo,
        Operation::LinkObjectToRequest,
        Operation::CompleteRequest,
        Operation::ReadObjects,
        Operation::ReadRequests,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::CreateObject => "objects.create",
            Operation::RemoveObject => "objects.remove",
            Operation::UpdateObjectStatus => "objects.update_status",
            Operation::UpdateObjectInfo => "objects.update_info",
            Operation::CreateRequest => "requests.create",
            Operation::RemoveRequest => "requests.remove",
            Operation::UpdateRequestInfo => "requests.update_info",
            Operation::LinkObjectToRequest => "requests.link_object",
            Operation::CompleteRequest => "requests.complete",
            Operation::ReadObjects => "objects.read",
            Operation::ReadRequests => "requests.read",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Operation::CreateObject => "Create a production object",
            Operation::RemoveObject => "Delete a production object",
            Operation::UpdateObjectStatus => "Change an object's mimix status",
            Operation::UpdateObjectInfo => "Replace an object's descriptive fields",
            Operation::CreateRequest => "Open a new object request",
            Operation::RemoveRequest => "Delete an object request",
            Operation::UpdateRequestInfo => "Replace an object request's fields",
            Operation::LinkObjectToRequest => "Open a request against an existing object",
            Operation::CompleteRequest => "Promote a request into a done object",
            Operation::ReadObjects => "Search and view objects",
            Operation::ReadRequests => "Search and view object requests",
        }
    }
}

impl core::fmt::Display for Operation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str() == wanted)
            .ok_or_else(|| format!("unknown operation '{wanted}'"))
    }
}
