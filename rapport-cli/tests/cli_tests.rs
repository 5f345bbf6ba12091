//! End-to-end tests for the `rapport` binary against a temporary HOME.

use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

use rapport_core::{ContactId, MeetingKind};
use rapport_store::file_store;

fn rapport_cmd(home: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("rapport"));
    cmd.env("HOME", home)
        .env("USERPROFILE", home)
        .env("NO_COLOR", "1")
        .env_remove("RAPPORT_LOG");
    cmd
}

fn add_contact(home: &Path, name: &str) {
    rapport_cmd(home)
        .args(["contact", "add", name])
        .assert()
        .success()
        .stdout(contains(format!("'{name}'")));
}

fn json_stdout(home: &Path, args: &[&str]) -> serde_json::Value {
    let assert = rapport_cmd(home).args(args).assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("stdout utf8");
    serde_json::from_str(&stdout).expect("parse json")
}

// ---------------------------------------------------------------------------
// 1. Contacts
// ---------------------------------------------------------------------------

#[test]
fn contacts_get_sequential_ids_and_persist() {
    let home = TempDir::new().expect("home");
    add_contact(home.path(), "c1");
    add_contact(home.path(), "c2");
    rapport_cmd(home.path())
        .args(["contact", "add", "c3", "--notes", "met at meetup"])
        .assert()
        .success()
        .stdout(contains("#3"));

    let payload = json_stdout(home.path(), &["contact", "list", "--json"]);
    let ids: Vec<u64> = payload
        .as_array()
        .expect("array")
        .iter()
        .map(|c| c["id"].as_u64().expect("id"))
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(payload[2]["notes"], "met at meetup");

    assert!(file_store::store_path_at(home.path()).exists());
}

#[test]
fn show_with_unknown_id_fails_and_changes_nothing() {
    let home = TempDir::new().expect("home");
    add_contact(home.path(), "c1");
    add_contact(home.path(), "c2");
    let before = std::fs::read(file_store::store_path_at(home.path())).expect("read");

    rapport_cmd(home.path())
        .args(["contact", "show", "1", "2", "99"])
        .assert()
        .failure()
        .stderr(contains("unknown contact 99"));

    let after = std::fs::read(file_store::store_path_at(home.path())).expect("read");
    assert_eq!(before, after);
}

#[test]
fn find_matches_substring() {
    let home = TempDir::new().expect("home");
    add_contact(home.path(), "Alice Smith");
    add_contact(home.path(), "Bob Smith");
    add_contact(home.path(), "Carol");

    let payload = json_stdout(home.path(), &["contact", "find", "Smith", "--json"]);
    assert_eq!(payload.as_array().expect("array").len(), 2);

    rapport_cmd(home.path())
        .args(["contact", "find", "Nobody"])
        .assert()
        .success()
        .stdout(contains("No contacts."));
}

#[test]
fn empty_contact_name_is_rejected() {
    let home = TempDir::new().expect("home");
    rapport_cmd(home.path())
        .args(["contact", "add", ""])
        .assert()
        .failure()
        .stderr(contains("missing argument"));
    assert!(!file_store::store_path_at(home.path()).exists());
}

#[test]
fn whitespace_contact_name_is_kept() {
    let home = TempDir::new().expect("home");
    add_contact(home.path(), "  ");

    let payload = json_stdout(home.path(), &["contact", "list", "--json"]);
    assert_eq!(payload[0]["name"], "  ");
}

// ---------------------------------------------------------------------------
// 2. Meetings
// ---------------------------------------------------------------------------

#[test]
fn schedule_record_and_lookup_by_variant() {
    let home = TempDir::new().expect("home");
    for name in ["c1", "c2", "c3"] {
        add_contact(home.path(), name);
    }

    rapport_cmd(home.path())
        .args([
            "meeting", "record", "--with", "1", "2", "3", "--at", "2020-01-15 10:00", "--notes",
            "kickoff",
        ])
        .assert()
        .success()
        .stdout(contains("#1"));
    rapport_cmd(home.path())
        .args(["meeting", "schedule", "--with", "1", "2", "3", "--at", "2999-01-15 10:00"])
        .assert()
        .success()
        .stdout(contains("#2"));

    let past = json_stdout(home.path(), &["meeting", "show", "1", "--past", "--json"]);
    assert_eq!(past[0]["notes"], "kickoff");
    assert_eq!(past[0]["kind"], "past");

    rapport_cmd(home.path())
        .args(["meeting", "show", "2", "--past"])
        .assert()
        .failure()
        .stderr(contains("future meeting"));
    rapport_cmd(home.path())
        .args(["meeting", "show", "1", "--future"])
        .assert()
        .failure()
        .stderr(contains("past meeting"));
}

#[test]
fn scheduling_in_the_past_fails_without_consuming_an_id() {
    let home = TempDir::new().expect("home");
    add_contact(home.path(), "c1");

    rapport_cmd(home.path())
        .args(["meeting", "schedule", "--with", "1", "--at", "2001-01-01 09:00"])
        .assert()
        .failure()
        .stderr(contains("not in the future"));

    rapport_cmd(home.path())
        .args(["meeting", "schedule", "--with", "1", "--at", "2999-01-01 09:00"])
        .assert()
        .success()
        .stdout(contains("#1"));
}

#[test]
fn notes_on_upcoming_meeting_fail_and_leave_it_future() {
    let home = TempDir::new().expect("home");
    add_contact(home.path(), "c1");
    rapport_cmd(home.path())
        .args(["meeting", "schedule", "--with", "1", "--at", "2999-06-01 12:00"])
        .assert()
        .success();

    rapport_cmd(home.path())
        .args(["meeting", "notes", "1", "too early"])
        .assert()
        .failure()
        .stderr(contains("invalid state"));

    let registry = file_store::open_at(home.path()).expect("open");
    let meeting = registry
        .get_meeting(rapport_core::MeetingId(1))
        .expect("meeting");
    assert_eq!(meeting.kind(), MeetingKind::Future);
}

#[test]
fn list_and_day_queries_are_chronological() {
    let home = TempDir::new().expect("home");
    add_contact(home.path(), "c1");
    add_contact(home.path(), "c2");

    for (when, who) in [
        ("2021-03-10 15:00", "1"),
        ("2021-03-10 09:00", "1"),
        ("2021-03-11 09:00", "2"),
        ("2020-12-31 23:00", "1"),
    ] {
        rapport_cmd(home.path())
            .args(["meeting", "record", "--with", who, "--at", when])
            .assert()
            .success();
    }

    let listed = json_stdout(
        home.path(),
        &["meeting", "list", "--contact", "1", "--past", "--json"],
    );
    let ids: Vec<u64> = listed
        .as_array()
        .expect("array")
        .iter()
        .map(|m| m["id"].as_u64().expect("id"))
        .collect();
    assert_eq!(ids, vec![4, 2, 1]);

    let day = json_stdout(home.path(), &["meeting", "on", "2021-03-10", "--json"]);
    let ids: Vec<u64> = day
        .as_array()
        .expect("array")
        .iter()
        .map(|m| m["id"].as_u64().expect("id"))
        .collect();
    assert_eq!(ids, vec![2, 1]);

    rapport_cmd(home.path())
        .args(["meeting", "list", "--contact", "9", "--future"])
        .assert()
        .failure()
        .stderr(contains("unknown contact 9"));
}

#[test]
fn past_notes_are_overwritten() {
    let home = TempDir::new().expect("home");
    add_contact(home.path(), "c1");
    rapport_cmd(home.path())
        .args(["meeting", "record", "--with", "1", "--at", "2022-02-02 08:00", "-n", "draft"])
        .assert()
        .success();
    rapport_cmd(home.path())
        .args(["meeting", "notes", "1", "final"])
        .assert()
        .success()
        .stdout(contains("Updated notes"));

    let registry = file_store::open_at(home.path()).expect("open");
    let past = registry
        .get_past_meetings_for_contact(ContactId(1))
        .expect("list");
    assert_eq!(past.len(), 1);
    assert_eq!(past[0].notes(), "final");
}
