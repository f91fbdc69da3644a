//! Closed status vocabularies.
//!
//! Parsing trims and lowercases its input. The object status also accepts the
//! legacy spaced spellings (`"tidak perlu daftar"`, `"on progress"`).

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use mimix_core::DomainError;

/// Registration status of a production object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MimixStatus {
    Unset,
    Done,
    Daftarkan,
    #[serde(alias = "tidak perlu daftar")]
    TidakPerluDaftar,
    #[serde(alias = "on progress")]
    OnProgress,
}

impl MimixStatus {
    pub const ALL: [MimixStatus; 5] = [
        MimixStatus::Unset,
        MimixStatus::Done,
        MimixStatus::Daftarkan,
        MimixStatus::TidakPerluDaftar,
        MimixStatus::OnProgress,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MimixStatus::Unset => "unset",
            MimixStatus::Done => "done",
            MimixStatus::Daftarkan => "daftarkan",
            MimixStatus::TidakPerluDaftar => "tidak_perlu_daftar",
            MimixStatus::OnProgress => "on_progress",
        }
    }
}

impl FromStr for MimixStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "unset" => Ok(MimixStatus::Unset),
            "done" => Ok(MimixStatus::Done),
            "daftarkan" => Ok(MimixStatus::Daftarkan),
            "tidak_perlu_daftar" | "tidak perlu daftar" => Ok(MimixStatus::TidakPerluDaftar),
            "on_progress" | "on progress" => Ok(MimixStatus::OnProgress),
            _ => Err(DomainError::validation(format!("invalid mimix_status: '{s}'"))),
        }
    }
}

/// Lifecycle of an object request. `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Completed,
}

impl RequestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Completed => "completed",
        }
    }
}

impl FromStr for RequestStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(RequestStatus::Pending),
            "completed" => Ok(RequestStatus::Completed),
            _ => Err(DomainError::validation(format!("invalid req_status: '{s}'"))),
        }
    }
}

/// Deployment progress of a request, tracked separately from its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromoteStatus {
    #[serde(alias = "in progress")]
    InProgress,
    Deployed,
}

impl PromoteStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PromoteStatus::InProgress => "in_progress",
            PromoteStatus::Deployed => "deployed",
        }
    }
}

impl FromStr for PromoteStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "in_progress" | "in progress" => Ok(PromoteStatus::InProgress),
            "deployed" => Ok(PromoteStatus::Deployed),
            _ => Err(DomainError::validation(format!("invalid promote_status: '{s}'"))),
        }
    }
}

macro_rules! impl_status_display {
    ($($t:ty),+) => {
        $(impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(self.as_str())
            }
        })+
    };
}

impl_status_display!(MimixStatus, RequestStatus, PromoteStatus);
