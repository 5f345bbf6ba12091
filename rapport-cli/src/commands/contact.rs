//! `rapport contact add|list|show|find|notes`

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

use rapport_core::ContactId;
use rapport_store::file_store;

use super::render::print_contacts;

#[derive(Subcommand, Debug)]
pub enum ContactCommand {
    /// Add a new contact.
    Add(AddArgs),

    /// List every contact.
    List {
        /// Emit machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show contacts by id. Fails if any id is unknown.
    Show {
        #[arg(required = true, value_name = "ID")]
        ids: Vec<u32>,

        /// Emit machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Find contacts whose name contains the given text (case-sensitive).
    Find {
        text: String,

        /// Emit machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Replace the notes kept about a contact.
    Notes { id: u32, text: String },
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Contact name; need not be unique.
    pub name: String,

    /// Free-form notes about the contact.
    #[arg(long, short = 'n', default_value = "")]
    pub notes: String,
}

pub fn run(cmd: ContactCommand) -> Result<()> {
    match cmd {
        ContactCommand::Add(args) => add(args),
        ContactCommand::List { json } => {
            let registry = file_store::open().context("failed to load registry")?;
            print_contacts(&registry.contacts(), json)
        }
        ContactCommand::Show { ids, json } => {
            let registry = file_store::open().context("failed to load registry")?;
            let ids: Vec<ContactId> = ids.into_iter().map(ContactId::from).collect();
            let contacts = registry
                .find_contacts_by_ids(&ids)
                .context("failed to look up contacts")?;
            print_contacts(&contacts, json)
        }
        ContactCommand::Find { text, json } => {
            let registry = file_store::open().context("failed to load registry")?;
            print_contacts(&registry.find_contacts_by_name(&text), json)
        }
        ContactCommand::Notes { id, text } => notes(ContactId::from(id), text),
    }
}

fn add(args: AddArgs) -> Result<()> {
    let mut registry = file_store::open().context("failed to load registry")?;
    let id = registry
        .create_contact(args.name.clone(), args.notes)
        .with_context(|| format!("failed to add contact '{}'", args.name))?;
    file_store::flush(&registry).context("failed to save registry")?;

    println!("{} Added contact #{} '{}'", "✓".green(), id, args.name);
    Ok(())
}

fn notes(id: ContactId, text: String) -> Result<()> {
    let mut registry = file_store::open().context("failed to load registry")?;
    registry
        .update_contact_notes(id, text)
        .with_context(|| format!("failed to update notes for contact #{id}"))?;
    file_store::flush(&registry).context("failed to save registry")?;

    println!("{} Updated notes for contact #{}", "✓".green(), id);
    Ok(())
}
