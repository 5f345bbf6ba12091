//! `rapport meeting schedule|record|show|list|on|notes`

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use colored::Colorize;

use rapport_core::{ContactId, Meeting, MeetingId};
use rapport_store::file_store;

use super::render::print_meetings;
use crate::WhenArg;

#[derive(Subcommand, Debug)]
pub enum MeetingCommand {
    /// Schedule a meeting that has not happened yet.
    Schedule(ScheduleArgs),

    /// Record a meeting that already took place.
    Record(RecordArgs),

    /// Show a single meeting.
    Show(ShowArgs),

    /// List a contact's past or future meetings, oldest first.
    List(ListArgs),

    /// List every meeting on a calendar day (UTC), in time order.
    On {
        #[arg(value_name = "YYYY-MM-DD")]
        day: NaiveDate,

        /// Emit machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Attach notes to a meeting that has taken place. Turns a scheduled
    /// meeting into a past one; overwrites the notes of a past meeting.
    Notes { id: u32, text: String },
}

#[derive(Args, Debug)]
pub struct ScheduleArgs {
    /// Attending contact ids.
    #[arg(long = "with", short = 'w', required = true, num_args = 1.., value_name = "ID")]
    pub with: Vec<u32>,

    /// When the meeting takes place; must be in the future.
    #[arg(long, value_name = "WHEN")]
    pub at: WhenArg,
}

#[derive(Args, Debug)]
pub struct RecordArgs {
    /// Attending contact ids.
    #[arg(long = "with", short = 'w', required = true, num_args = 1.., value_name = "ID")]
    pub with: Vec<u32>,

    /// When the meeting took place.
    #[arg(long, value_name = "WHEN")]
    pub at: WhenArg,

    /// What happened and what was agreed.
    #[arg(long, short = 'n', default_value = "")]
    pub notes: String,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    pub id: u32,

    /// Fail unless the meeting is a past meeting.
    #[arg(long, conflicts_with = "future")]
    pub past: bool,

    /// Fail unless the meeting is a future meeting.
    #[arg(long)]
    pub future: bool,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Contact whose meetings to list.
    #[arg(long, short = 'c', value_name = "ID")]
    pub contact: u32,

    /// List past meetings.
    #[arg(long, conflicts_with = "future", required_unless_present = "future")]
    pub past: bool,

    /// List future meetings.
    #[arg(long)]
    pub future: bool,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

pub fn run(cmd: MeetingCommand) -> Result<()> {
    match cmd {
        MeetingCommand::Schedule(args) => schedule(args),
        MeetingCommand::Record(args) => record(args),
        MeetingCommand::Show(args) => show(args),
        MeetingCommand::List(args) => list(args),
        MeetingCommand::On { day, json } => {
            let registry = file_store::open().context("failed to load registry")?;
            print_meetings(&registry, &registry.get_meetings_on_date(day), json)
        }
        MeetingCommand::Notes { id, text } => notes(MeetingId::from(id), text),
    }
}

fn contact_ids(raw: Vec<u32>) -> Vec<ContactId> {
    raw.into_iter().map(ContactId::from).collect()
}

fn schedule(args: ScheduleArgs) -> Result<()> {
    let mut registry = file_store::open().context("failed to load registry")?;
    let id = registry
        .schedule_future_meeting(&contact_ids(args.with), args.at.into())
        .with_context(|| format!("failed to schedule meeting at {}", args.at))?;
    file_store::flush(&registry).context("failed to save registry")?;

    println!("{} Scheduled meeting #{} at {}", "✓".green(), id, args.at);
    Ok(())
}

fn record(args: RecordArgs) -> Result<()> {
    let mut registry = file_store::open().context("failed to load registry")?;
    let id = registry
        .record_past_meeting(&contact_ids(args.with), args.at.into(), args.notes)
        .with_context(|| format!("failed to record meeting at {}", args.at))?;
    file_store::flush(&registry).context("failed to save registry")?;

    println!("{} Recorded meeting #{} at {}", "✓".green(), id, args.at);
    Ok(())
}

fn show(args: ShowArgs) -> Result<()> {
    let registry = file_store::open().context("failed to load registry")?;
    let id = MeetingId::from(args.id);

    let meeting = if args.past {
        registry
            .get_past_meeting(id)
            .with_context(|| format!("meeting #{id} is not a past meeting"))?
            .cloned()
            .map(Meeting::Past)
    } else if args.future {
        registry
            .get_future_meeting(id)
            .with_context(|| format!("meeting #{id} is not a future meeting"))?
            .cloned()
            .map(Meeting::Future)
    } else {
        registry.get_meeting(id).cloned()
    };

    let Some(meeting) = meeting else {
        bail!("no meeting with id #{id}");
    };
    print_meetings(&registry, &[meeting], args.json)
}

fn list(args: ListArgs) -> Result<()> {
    let registry = file_store::open().context("failed to load registry")?;
    let contact = ContactId::from(args.contact);

    let meetings: Vec<Meeting> = if args.future {
        registry
            .get_future_meetings_for_contact(contact)
            .with_context(|| format!("failed to list meetings for contact #{contact}"))?
            .into_iter()
            .map(Meeting::Future)
            .collect()
    } else {
        registry
            .get_past_meetings_for_contact(contact)
            .with_context(|| format!("failed to list meetings for contact #{contact}"))?
            .into_iter()
            .map(Meeting::Past)
            .collect()
    };
    print_meetings(&registry, &meetings, args.json)
}

fn notes(id: MeetingId, text: String) -> Result<()> {
    let mut registry = file_store::open().context("failed to load registry")?;
    let was_future = matches!(registry.get_meeting(id), Some(Meeting::Future(_)));
    registry
        .add_meeting_notes(id, text)
        .with_context(|| format!("failed to add notes to meeting #{id}"))?;
    file_store::flush(&registry).context("failed to save registry")?;

    if was_future {
        println!("{} Meeting #{} is now a past meeting", "✓".green(), id);
    } else {
        println!("{} Updated notes for meeting #{}", "✓".green(), id);
    }
    Ok(())
}
