//! Error types for rapport-core.

use thiserror::Error;

use crate::types::{ContactId, MeetingId};

/// All errors that can arise from registry operations.
///
/// A failed operation leaves the registry exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A required value was not supplied (empty where text is mandatory).
    #[error("missing argument: {0}")]
    MissingArgument(&'static str),

    /// A supplied value violates a precondition.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The target exists but is not in the state the operation needs.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A snapshot handed to `restore` is internally inconsistent.
    #[error("corrupt snapshot: {0}")]
    CorruptSnapshot(String),
}

impl RegistryError {
    pub(crate) fn unknown_contact(id: ContactId) -> Self {
        RegistryError::InvalidArgument(format!("unknown contact {id}"))
    }

    pub(crate) fn unknown_meeting(id: MeetingId) -> Self {
        RegistryError::InvalidArgument(format!("unknown meeting {id}"))
    }
}
