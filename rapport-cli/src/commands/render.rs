//! Table and JSON output shared by the `contact` and `meeting` commands.

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use rapport_core::{Contact, Meeting, MeetingKind, Registry};

#[derive(Serialize)]
struct ContactJson {
    id: u32,
    name: String,
    notes: String,
}

#[derive(Tabled)]
struct ContactRow {
    #[tabled(rename = "id")]
    id: u32,
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "notes")]
    notes: String,
}

#[derive(Serialize)]
struct MeetingJson {
    id: u32,
    kind: MeetingKind,
    date: String,
    contacts: Vec<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
}

#[derive(Tabled)]
struct MeetingRow {
    #[tabled(rename = "id")]
    id: u32,
    #[tabled(rename = "kind")]
    kind: String,
    #[tabled(rename = "date (UTC)")]
    date: String,
    #[tabled(rename = "with")]
    with: String,
    #[tabled(rename = "notes")]
    notes: String,
}

pub fn print_contacts(contacts: &[Contact], json: bool) -> Result<()> {
    if json {
        let payload: Vec<ContactJson> = contacts
            .iter()
            .map(|c| ContactJson {
                id: c.id().0,
                name: c.name().to_owned(),
                notes: c.notes().to_owned(),
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).context("failed to serialize contacts JSON")?
        );
        return Ok(());
    }

    if contacts.is_empty() {
        println!("No contacts.");
        return Ok(());
    }
    let rows: Vec<ContactRow> = contacts
        .iter()
        .map(|c| ContactRow {
            id: c.id().0,
            name: c.name().to_owned(),
            notes: c.notes().to_owned(),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
    Ok(())
}

pub fn print_meetings(registry: &Registry, meetings: &[Meeting], json: bool) -> Result<()> {
    if json {
        let payload: Vec<MeetingJson> = meetings
            .iter()
            .map(|m| MeetingJson {
                id: m.id().0,
                kind: m.kind(),
                date: m.date().to_rfc3339(),
                contacts: m.contacts().iter().map(|c| c.0).collect(),
                notes: m.notes().map(str::to_owned),
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).context("failed to serialize meetings JSON")?
        );
        return Ok(());
    }

    if meetings.is_empty() {
        println!("No meetings.");
        return Ok(());
    }
    let rows: Vec<MeetingRow> = meetings
        .iter()
        .map(|m| MeetingRow {
            id: m.id().0,
            kind: kind_label(m.kind()),
            date: m.date().format("%Y-%m-%d %H:%M").to_string(),
            with: attendee_names(registry, m),
            notes: m.notes().unwrap_or("-").to_owned(),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
    Ok(())
}

fn kind_label(kind: MeetingKind) -> String {
    match kind {
        MeetingKind::Future => "FUTURE".cyan().bold().to_string(),
        MeetingKind::Past => "PAST".bright_black().bold().to_string(),
    }
}

fn attendee_names(registry: &Registry, meeting: &Meeting) -> String {
    meeting
        .contacts()
        .iter()
        .map(|id| match registry.get_contact(*id) {
            Some(c) => format!("{} (#{id})", c.name()),
            None => format!("#{id}"),
        })
        .collect::<Vec<_>>()
        .join(", ")
}
