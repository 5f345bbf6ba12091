//! Domain types for the rapport registry.
//!
//! Entities are plain values; the [`Registry`](crate::registry::Registry) owns
//! every instance and hands out read-only views or clones.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed contact identifier. Allocated by the registry, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(pub u32);

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u32> for ContactId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// A strongly-typed meeting identifier, unique across both meeting variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeetingId(pub u32);

impl fmt::Display for MeetingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u32> for MeetingId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

// ---------------------------------------------------------------------------
// Contact
// ---------------------------------------------------------------------------

/// A person the user keeps a record of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    id: ContactId,
    name: String,
    notes: String,
}

impl Contact {
    pub(crate) fn new(id: ContactId, name: String, notes: String) -> Self {
        Self { id, name, notes }
    }

    pub fn id(&self) -> ContactId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Replaces the notes; earlier notes are discarded.
    pub(crate) fn set_notes(&mut self, notes: String) {
        self.notes = notes;
    }
}

// ---------------------------------------------------------------------------
// Meetings
// ---------------------------------------------------------------------------

/// Which variant a meeting is stored as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeetingKind {
    Future,
    Past,
}

impl fmt::Display for MeetingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeetingKind::Future => write!(f, "future"),
            MeetingKind::Past => write!(f, "past"),
        }
    }
}

/// A meeting that has been scheduled but not yet written up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FutureMeeting {
    id: MeetingId,
    date: DateTime<Utc>,
    contacts: BTreeSet<ContactId>,
}

impl FutureMeeting {
    pub(crate) fn new(id: MeetingId, date: DateTime<Utc>, contacts: BTreeSet<ContactId>) -> Self {
        Self { id, date, contacts }
    }

    pub fn id(&self) -> MeetingId {
        self.id
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn contacts(&self) -> &BTreeSet<ContactId> {
        &self.contacts
    }

    /// Consumes the future meeting and produces the past record that replaces it.
    pub(crate) fn into_past(self, notes: String) -> PastMeeting {
        PastMeeting {
            id: self.id,
            date: self.date,
            contacts: self.contacts,
            notes,
        }
    }
}

/// A meeting that took place, with the user's notes about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PastMeeting {
    id: MeetingId,
    date: DateTime<Utc>,
    contacts: BTreeSet<ContactId>,
    notes: String,
}

impl PastMeeting {
    pub(crate) fn new(
        id: MeetingId,
        date: DateTime<Utc>,
        contacts: BTreeSet<ContactId>,
        notes: String,
    ) -> Self {
        Self { id, date, contacts, notes }
    }

    pub fn id(&self) -> MeetingId {
        self.id
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn contacts(&self) -> &BTreeSet<ContactId> {
        &self.contacts
    }

    /// Notes about the meeting; empty when none were taken.
    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub(crate) fn set_notes(&mut self, notes: String) {
        self.notes = notes;
    }
}

/// A stored meeting. The variant is structural: it is decided at creation and
/// only changes through [`Registry::add_meeting_notes`](crate::registry::Registry::add_meeting_notes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Meeting {
    Future(FutureMeeting),
    Past(PastMeeting),
}

impl Meeting {
    pub fn id(&self) -> MeetingId {
        match self {
            Meeting::Future(m) => m.id(),
            Meeting::Past(m) => m.id(),
        }
    }

    pub fn date(&self) -> DateTime<Utc> {
        match self {
            Meeting::Future(m) => m.date(),
            Meeting::Past(m) => m.date(),
        }
    }

    pub fn contacts(&self) -> &BTreeSet<ContactId> {
        match self {
            Meeting::Future(m) => m.contacts(),
            Meeting::Past(m) => m.contacts(),
        }
    }

    /// `None` for future meetings, which carry no notes.
    pub fn notes(&self) -> Option<&str> {
        match self {
            Meeting::Future(_) => None,
            Meeting::Past(m) => Some(m.notes()),
        }
    }

    pub fn kind(&self) -> MeetingKind {
        match self {
            Meeting::Future(_) => MeetingKind::Future,
            Meeting::Past(_) => MeetingKind::Past,
        }
    }

    pub fn involves(&self, contact: ContactId) -> bool {
        self.contacts().contains(&contact)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn attendees(ids: &[u32]) -> BTreeSet<ContactId> {
        ids.iter().copied().map(ContactId::from).collect()
    }

    #[test]
    fn newtype_display() {
        assert_eq!(ContactId::from(7).to_string(), "7");
        assert_eq!(MeetingId::from(12).to_string(), "12");
    }

    #[test]
    fn meeting_kind_display() {
        assert_eq!(MeetingKind::Future.to_string(), "future");
        assert_eq!(MeetingKind::Past.to_string(), "past");
    }

    #[test]
    fn future_meeting_has_no_notes() {
        let date = Utc.with_ymd_and_hms(2031, 5, 1, 9, 0, 0).unwrap();
        let meeting = Meeting::Future(FutureMeeting::new(MeetingId(1), date, attendees(&[1, 2])));
        assert_eq!(meeting.notes(), None);
        assert_eq!(meeting.kind(), MeetingKind::Future);
        assert!(meeting.involves(ContactId(2)));
        assert!(!meeting.involves(ContactId(3)));
    }

    #[test]
    fn into_past_keeps_identity_and_attendees() {
        let date = Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap();
        let future = FutureMeeting::new(MeetingId(4), date, attendees(&[3, 1]));
        let past = future.into_past("went well".to_string());
        assert_eq!(past.id(), MeetingId(4));
        assert_eq!(past.date(), date);
        assert_eq!(past.contacts(), &attendees(&[1, 3]));
        assert_eq!(past.notes(), "went well");
    }

    #[test]
    fn contact_notes_are_replaced() {
        let mut contact = Contact::new(ContactId(1), "Ada".into(), "first".into());
        contact.set_notes("second".into());
        assert_eq!(contact.notes(), "second");
        assert_eq!(contact.name(), "Ada");
    }
}
