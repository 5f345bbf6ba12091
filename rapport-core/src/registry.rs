//! The contact and meeting registry.
//!
//! # Ownership
//!
//! [`Registry`] is the only owner of contacts and meetings. Lookups hand out
//! shared borrows and list queries hand out freshly built vectors.
//!
//! # Clock
//!
//! Operations that compare against "now" have two forms:
//! - `fn_at(…, now)` takes the instant explicitly; used in tests
//! - `fn(…)` reads `Utc::now()` and delegates to `_at`
//!
//! # Ordering
//!
//! Meetings are kept in allocation order, which is also ascending id order.
//! Date-ordered queries sort by `(date, id)`, so meetings sharing an instant
//! come back in allocation order. Converting a future meeting into a past one
//! replaces it at the same position and keeps its id.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::RegistryError;
use crate::types::{Contact, ContactId, FutureMeeting, Meeting, MeetingId, PastMeeting};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    pub(crate) contacts: BTreeMap<ContactId, Contact>,
    pub(crate) meetings: Vec<Meeting>,
    pub(crate) last_contact_id: u32,
    pub(crate) last_meeting_id: u32,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // 1. Contacts
    // -----------------------------------------------------------------------

    /// Add a contact and return its freshly allocated id.
    ///
    /// The name must not be empty; empty notes are fine.
    pub fn create_contact(
        &mut self,
        name: impl Into<String>,
        notes: impl Into<String>,
    ) -> Result<ContactId, RegistryError> {
        let name = name.into();
        if name.is_empty() {
            return Err(RegistryError::MissingArgument("name"));
        }

        let id = self
            .next_contact_id()
            .ok_or_else(|| RegistryError::InvalidState("contact id space exhausted".to_string()))?;
        self.last_contact_id = id.0;
        self.contacts.insert(id, Contact::new(id, name, notes.into()));
        tracing::debug!(contact = %id, "contact created");
        Ok(id)
    }

    pub fn get_contact(&self, id: ContactId) -> Option<&Contact> {
        self.contacts.get(&id)
    }

    /// All contacts, ascending by id.
    pub fn contacts(&self) -> Vec<Contact> {
        self.contacts.values().cloned().collect()
    }

    /// Contacts for the given ids, ascending by id and without repeats.
    ///
    /// Fails as a whole if any single id is zero or unknown.
    pub fn find_contacts_by_ids(&self, ids: &[ContactId]) -> Result<Vec<Contact>, RegistryError> {
        let wanted: BTreeSet<ContactId> = ids.iter().copied().collect();
        wanted
            .into_iter()
            .map(|id| {
                self.contacts
                    .get(&id)
                    .cloned()
                    .ok_or_else(|| RegistryError::unknown_contact(id))
            })
            .collect()
    }

    /// Contacts whose name contains `fragment` (case-sensitive), ascending by id.
    ///
    /// An empty fragment matches nobody.
    pub fn find_contacts_by_name(&self, fragment: &str) -> Vec<Contact> {
        if fragment.is_empty() {
            return Vec::new();
        }
        self.contacts
            .values()
            .filter(|c| c.name().contains(fragment))
            .cloned()
            .collect()
    }

    /// Overwrite a contact's notes.
    pub fn update_contact_notes(
        &mut self,
        id: ContactId,
        notes: impl Into<String>,
    ) -> Result<(), RegistryError> {
        let contact = self
            .contacts
            .get_mut(&id)
            .ok_or_else(|| RegistryError::unknown_contact(id))?;
        contact.set_notes(notes.into());
        tracing::debug!(contact = %id, "contact notes replaced");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // 2. Creating meetings
    // -----------------------------------------------------------------------

    /// Schedule a meeting strictly after `now`.
    pub fn schedule_future_meeting_at(
        &mut self,
        contacts: &[ContactId],
        date: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<MeetingId, RegistryError> {
        if date <= now {
            return Err(RegistryError::InvalidArgument(format!(
                "meeting date {} is not in the future",
                date.to_rfc3339()
            )));
        }
        let attendees = self.known_attendees(contacts)?;

        let id = self.allocate_meeting_id()?;
        self.meetings
            .push(Meeting::Future(FutureMeeting::new(id, date, attendees)));
        tracing::debug!(meeting = %id, date = %date, "future meeting scheduled");
        Ok(id)
    }

    /// `schedule_future_meeting_at` against the current instant.
    pub fn schedule_future_meeting(
        &mut self,
        contacts: &[ContactId],
        date: DateTime<Utc>,
    ) -> Result<MeetingId, RegistryError> {
        self.schedule_future_meeting_at(contacts, date, Utc::now())
    }

    /// Record a meeting that already happened. Any date is accepted.
    pub fn record_past_meeting(
        &mut self,
        contacts: &[ContactId],
        date: DateTime<Utc>,
        notes: impl Into<String>,
    ) -> Result<MeetingId, RegistryError> {
        let attendees = self.known_attendees(contacts)?;

        let id = self.allocate_meeting_id()?;
        self.meetings
            .push(Meeting::Past(PastMeeting::new(id, date, attendees, notes.into())));
        tracing::debug!(meeting = %id, date = %date, "past meeting recorded");
        Ok(id)
    }

    // -----------------------------------------------------------------------
    // 3. Meeting lookups
    // -----------------------------------------------------------------------

    pub fn get_meeting(&self, id: MeetingId) -> Option<&Meeting> {
        self.meetings.iter().find(|m| m.id() == id)
    }

    /// `Ok(None)` if no meeting has this id, an error if it is a future meeting.
    pub fn get_past_meeting(&self, id: MeetingId) -> Result<Option<&PastMeeting>, RegistryError> {
        match self.get_meeting(id) {
            None => Ok(None),
            Some(Meeting::Past(m)) => Ok(Some(m)),
            Some(Meeting::Future(_)) => Err(RegistryError::InvalidArgument(format!(
                "meeting {id} is a future meeting"
            ))),
        }
    }

    /// `Ok(None)` if no meeting has this id, an error if it is a past meeting.
    pub fn get_future_meeting(
        &self,
        id: MeetingId,
    ) -> Result<Option<&FutureMeeting>, RegistryError> {
        match self.get_meeting(id) {
            None => Ok(None),
            Some(Meeting::Future(m)) => Ok(Some(m)),
            Some(Meeting::Past(_)) => Err(RegistryError::InvalidArgument(format!(
                "meeting {id} is a past meeting"
            ))),
        }
    }

    /// Every meeting in allocation order.
    pub fn meetings(&self) -> Vec<Meeting> {
        self.meetings.clone()
    }

    // -----------------------------------------------------------------------
    // 4. Chronological queries
    // -----------------------------------------------------------------------

    /// Future meetings attended by `contact`, ascending by date.
    pub fn get_future_meetings_for_contact(
        &self,
        contact: ContactId,
    ) -> Result<Vec<FutureMeeting>, RegistryError> {
        self.ensure_contact(contact)?;
        let mut found: Vec<FutureMeeting> = self
            .meetings
            .iter()
            .filter_map(|m| match m {
                Meeting::Future(f) if f.contacts().contains(&contact) => Some(f.clone()),
                _ => None,
            })
            .collect();
        found.sort_by_key(|m| (m.date(), m.id()));
        Ok(found)
    }

    /// Past meetings attended by `contact`, ascending by date.
    pub fn get_past_meetings_for_contact(
        &self,
        contact: ContactId,
    ) -> Result<Vec<PastMeeting>, RegistryError> {
        self.ensure_contact(contact)?;
        let mut found: Vec<PastMeeting> = self
            .meetings
            .iter()
            .filter_map(|m| match m {
                Meeting::Past(p) if p.contacts().contains(&contact) => Some(p.clone()),
                _ => None,
            })
            .collect();
        found.sort_by_key(|m| (m.date(), m.id()));
        Ok(found)
    }

    /// Meetings of either variant on the given UTC calendar day, ascending by time.
    pub fn get_meetings_on_date(&self, day: NaiveDate) -> Vec<Meeting> {
        let mut found: Vec<Meeting> = self
            .meetings
            .iter()
            .filter(|m| m.date().date_naive() == day)
            .cloned()
            .collect();
        found.sort_by_key(|m| (m.date(), m.id()));
        found
    }

    // -----------------------------------------------------------------------
    // 5. Notes and variant conversion
    // -----------------------------------------------------------------------

    /// Attach notes to a meeting whose date is not after `now`.
    ///
    /// A future meeting is replaced in place by a past meeting with the same
    /// id, date and attendees. A past meeting has its notes overwritten.
    pub fn add_meeting_notes_at(
        &mut self,
        id: MeetingId,
        text: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<(), RegistryError> {
        let index = self
            .meetings
            .iter()
            .position(|m| m.id() == id)
            .ok_or_else(|| RegistryError::unknown_meeting(id))?;
        let text = text.into();

        let date = self.meetings[index].date();
        if date > now {
            return Err(RegistryError::InvalidState(format!(
                "meeting {id} has not happened yet ({})",
                date.to_rfc3339()
            )));
        }

        match &mut self.meetings[index] {
            Meeting::Past(past) => {
                past.set_notes(text);
                tracing::debug!(meeting = %id, "past meeting notes replaced");
            }
            Meeting::Future(future) => {
                let past = future.clone().into_past(text);
                self.meetings[index] = Meeting::Past(past);
                tracing::debug!(meeting = %id, "future meeting converted to past");
            }
        }
        Ok(())
    }

    /// `add_meeting_notes_at` against the current instant.
    pub fn add_meeting_notes(
        &mut self,
        id: MeetingId,
        text: impl Into<String>,
    ) -> Result<(), RegistryError> {
        self.add_meeting_notes_at(id, text, Utc::now())
    }

    // -----------------------------------------------------------------------
    // 6. Id counters
    // -----------------------------------------------------------------------

    /// Peek at the id the next `create_contact` would hand out.
    ///
    /// `None` once every `u32` id has been issued.
    pub fn next_contact_id(&self) -> Option<ContactId> {
        self.last_contact_id.checked_add(1).map(ContactId)
    }

    /// Peek at the id the next meeting creation would hand out.
    pub fn next_meeting_id(&self) -> Option<MeetingId> {
        self.last_meeting_id.checked_add(1).map(MeetingId)
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    fn allocate_meeting_id(&mut self) -> Result<MeetingId, RegistryError> {
        let id = self
            .next_meeting_id()
            .ok_or_else(|| RegistryError::InvalidState("meeting id space exhausted".to_string()))?;
        self.last_meeting_id = id.0;
        Ok(id)
    }

    fn ensure_contact(&self, id: ContactId) -> Result<(), RegistryError> {
        if self.contacts.contains_key(&id) {
            Ok(())
        } else {
            Err(RegistryError::unknown_contact(id))
        }
    }

    /// Validates a non-empty attendee list made only of registered contacts.
    fn known_attendees(&self, contacts: &[ContactId]) -> Result<BTreeSet<ContactId>, RegistryError> {
        if contacts.is_empty() {
            return Err(RegistryError::InvalidArgument(
                "a meeting needs at least one contact".to_string(),
            ));
        }
        let attendees: BTreeSet<ContactId> = contacts.iter().copied().collect();
        for id in &attendees {
            self.ensure_contact(*id)?;
        }
        Ok(attendees)
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
