//! rapport core library: contacts, meetings, the registry that owns them, and
//! the snapshot boundary used for persistence.
//!
//! - [`types`]: identifiers and entity types
//! - [`error`]: [`RegistryError`]
//! - [`registry`]: [`Registry`] operations and queries
//! - [`snapshot`]: [`Snapshot`] capture and restore

pub mod error;
pub mod registry;
pub mod snapshot;
pub mod types;

pub use error::RegistryError;
pub use registry::Registry;
pub use snapshot::{ContactRecord, MeetingRecord, Snapshot, SNAPSHOT_VERSION};
pub use types::{Contact, ContactId, FutureMeeting, Meeting, MeetingId, MeetingKind, PastMeeting};
