//! Snapshot / restore: the persistence boundary of the registry.
//!
//! A [`Snapshot`] is a plain serde structure, separate from the in-memory
//! entity types. Encoding and file handling belong to the caller (see `rapport-store`).

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RegistryError;
use crate::registry::Registry;
use crate::types::{Contact, ContactId, FutureMeeting, Meeting, MeetingId, MeetingKind, PastMeeting};

/// Current snapshot layout version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// One stored contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub id: ContactId,
    pub name: String,
    #[serde(default)]
    pub notes: String,
}

/// One stored meeting of either variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingRecord {
    pub id: MeetingId,
    pub kind: MeetingKind,
    pub date: DateTime<Utc>,
    pub contacts: Vec<ContactId>,
    /// Present for past meetings only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Complete registry state: contacts, meetings in allocation order, both counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub last_contact_id: u32,
    pub last_meeting_id: u32,
    #[serde(default)]
    pub contacts: Vec<ContactRecord>,
    #[serde(default)]
    pub meetings: Vec<MeetingRecord>,
}

impl From<&Contact> for ContactRecord {
    fn from(c: &Contact) -> Self {
        Self {
            id: c.id(),
            name: c.name().to_owned(),
            notes: c.notes().to_owned(),
        }
    }
}

impl From<&Meeting> for MeetingRecord {
    fn from(m: &Meeting) -> Self {
        Self {
            id: m.id(),
            kind: m.kind(),
            date: m.date(),
            contacts: m.contacts().iter().copied().collect(),
            notes: m.notes().map(str::to_owned),
        }
    }
}

impl Registry {
    /// Capture the full registry state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            last_contact_id: self.last_contact_id,
            last_meeting_id: self.last_meeting_id,
            contacts: self.contacts.values().map(ContactRecord::from).collect(),
            meetings: self.meetings.iter().map(MeetingRecord::from).collect(),
        }
    }

    /// Rebuild a registry from a snapshot, counters included.
    ///
    /// The snapshot is checked for internal consistency first; a rejected
    /// snapshot yields [`RegistryError::CorruptSnapshot`]. Meeting records must
    /// appear in allocation order, i.e. strictly ascending by id.
    pub fn restore(snapshot: Snapshot) -> Result<Registry, RegistryError> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(corrupt(format!(
                "unsupported snapshot version {} (expected {SNAPSHOT_VERSION})",
                snapshot.version
            )));
        }

        let mut contacts = BTreeMap::new();
        for record in snapshot.contacts {
            let id = record.id;
            if id.0 == 0 || id.0 > snapshot.last_contact_id {
                return Err(corrupt(format!(
                    "contact id {id} outside issued range 1..={}",
                    snapshot.last_contact_id
                )));
            }
            if contacts.contains_key(&id) {
                return Err(corrupt(format!("contact id {id} appears twice")));
            }
            contacts.insert(id, Contact::new(id, record.name, record.notes));
        }

        let mut previous: Option<MeetingId> = None;
        let mut meetings = Vec::with_capacity(snapshot.meetings.len());
        for record in snapshot.meetings {
            let id = record.id;
            if id.0 == 0 || id.0 > snapshot.last_meeting_id {
                return Err(corrupt(format!(
                    "meeting id {id} outside issued range 1..={}",
                    snapshot.last_meeting_id
                )));
            }
            match previous {
                Some(prev) if prev == id => {
                    return Err(corrupt(format!("meeting id {id} appears twice")))
                }
                Some(prev) if prev > id => {
                    return Err(corrupt(format!(
                        "meeting id {id} follows meeting id {prev}; ids must ascend"
                    )))
                }
                _ => previous = Some(id),
            }
            if record.contacts.is_empty() {
                return Err(corrupt(format!("meeting {id} has no contacts")));
            }
            let attendees: BTreeSet<ContactId> = record.contacts.into_iter().collect();
            if let Some(missing) = attendees.iter().find(|c| !contacts.contains_key(*c)) {
                return Err(corrupt(format!(
                    "meeting {id} references unknown contact {missing}"
                )));
            }

            let meeting = match (record.kind, record.notes) {
                (MeetingKind::Future, None) => {
                    Meeting::Future(FutureMeeting::new(id, record.date, attendees))
                }
                (MeetingKind::Future, Some(_)) => {
                    return Err(corrupt(format!("future meeting {id} carries notes")))
                }
                (MeetingKind::Past, notes) => Meeting::Past(PastMeeting::new(
                    id,
                    record.date,
                    attendees,
                    notes.unwrap_or_default(),
                )),
            };
            meetings.push(meeting);
        }

        tracing::debug!(
            contacts = contacts.len(),
            meetings = meetings.len(),
            "registry restored from snapshot"
        );
        Ok(Registry {
            contacts,
            meetings,
            last_contact_id: snapshot.last_contact_id,
            last_meeting_id: snapshot.last_meeting_id,
        })
    }
}

fn corrupt(reason: String) -> RegistryError {
    RegistryError::CorruptSnapshot(reason)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rstest::rstest;

    fn sample() -> Registry {
        let now = Utc.with_ymd_and_hms(2030, 1, 1, 8, 0, 0).unwrap();
        let mut reg = Registry::new();
        let a = reg.create_contact("Ada", "met at conf").expect("a");
        let b = reg.create_contact("Brian", "").expect("b");
        reg.record_past_meeting(&[a, b], now - Duration::days(1), "kickoff")
            .expect("past");
        reg.schedule_future_meeting_at(&[b], now + Duration::days(1), now)
            .expect("future");
        reg
    }

    #[test]
    fn future_records_omit_notes() {
        let snap = sample().snapshot();
        assert_eq!(snap.meetings[0].notes.as_deref(), Some("kickoff"));
        assert_eq!(snap.meetings[1].notes, None);
        assert_eq!(snap.meetings[1].kind, MeetingKind::Future);
    }

    #[test]
    fn restore_is_identical() {
        let reg = sample();
        let back = Registry::restore(reg.snapshot()).expect("restore");
        assert_eq!(back, reg);
    }

    #[test]
    fn rejects_unknown_version() {
        let mut snap = sample().snapshot();
        snap.version = 99;
        assert!(matches!(
            Registry::restore(snap),
            Err(RegistryError::CorruptSnapshot(_))
        ));
    }

    #[test]
    fn rejects_counter_behind_ids() {
        let mut snap = sample().snapshot();
        snap.last_meeting_id = 1;
        let err = Registry::restore(snap).unwrap_err();
        assert!(err.to_string().contains("outside issued range"), "got: {err}");
    }

    #[test]
    fn rejects_dangling_attendee() {
        let mut snap = sample().snapshot();
        snap.contacts.retain(|c| c.id != ContactId(2));
        let err = Registry::restore(snap).unwrap_err();
        assert!(err.to_string().contains("unknown contact 2"), "got: {err}");
    }

    #[test]
    fn rejects_future_with_notes() {
        let mut snap = sample().snapshot();
        snap.meetings[1].notes = Some("too early".into());
        assert!(Registry::restore(snap).is_err());
    }

    #[test]
    fn rejects_duplicate_contact() {
        let mut snap = sample().snapshot();
        let dup = snap.contacts[0].clone();
        snap.contacts.push(dup);
        let err = Registry::restore(snap).unwrap_err();
        assert!(err.to_string().contains("appears twice"), "got: {err}");
    }

    #[rstest]
    #[case::zero_contact_id(|s: &mut Snapshot| s.contacts[0].id = ContactId(0), "contact id 0 outside issued range")]
    #[case::zero_meeting_id(|s: &mut Snapshot| s.meetings[0].id = MeetingId(0), "meeting id 0 outside issued range")]
    #[case::duplicate_meeting_id(|s: &mut Snapshot| s.meetings[1].id = MeetingId(1), "meeting id 1 appears twice")]
    #[case::meeting_without_contacts(|s: &mut Snapshot| s.meetings[0].contacts.clear(), "meeting 1 has no contacts")]
    #[case::meetings_out_of_order(|s: &mut Snapshot| s.meetings.swap(0, 1), "ids must ascend")]
    fn rejects_inconsistent_snapshot(#[case] mutate: fn(&mut Snapshot), #[case] expected: &str) {
        let mut snap = sample().snapshot();
        mutate(&mut snap);
        let err = Registry::restore(snap).unwrap_err();
        assert!(matches!(err, RegistryError::CorruptSnapshot(_)), "got: {err:?}");
        assert!(err.to_string().contains(expected), "got: {err}");
    }

    #[test]
    fn restored_counters_at_the_limit_refuse_new_ids() {
        let mut snap = sample().snapshot();
        snap.last_contact_id = u32::MAX;
        snap.last_meeting_id = u32::MAX;
        let mut reg = Registry::restore(snap).expect("restore");

        assert!(matches!(
            reg.create_contact("x", ""),
            Err(RegistryError::InvalidState(_))
        ));
        assert!(matches!(
            reg.record_past_meeting(&[ContactId(1)], Utc::now(), ""),
            Err(RegistryError::InvalidState(_))
        ));
        assert_eq!(reg.contacts().len(), 2);
        assert_eq!(reg.meetings().len(), 2);
    }
}
