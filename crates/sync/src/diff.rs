//! Computes the patch a source record implies for a stored team.
//!
//! Empty source values never overwrite stored data, and the check-in and
//! board flags only move from false to true. Leader and member identity is
//! compared by email, so a respelled name alone does not trigger a person
//! rewrite.

use std::collections::BTreeSet;

use serde::Serialize;

use rollcall_model::{CanonicalTeam, Person, TeamPatch, TEAM_SIZE};

use crate::aggregate::SourceTeam;
use crate::normalize::{board_flag, checkin_flag, normalize_room_number};
use crate::source::SubmissionRow;

// ---------------------------------------------------------------------------
// Diff output
// ---------------------------------------------------------------------------

/// One field moving from one value to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldChange {
    pub field: String,
    pub from: String,
    pub to: String,
}

impl FieldChange {
    pub fn new(field: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        FieldChange {
            field: field.into(),
            from: from.into(),
            to: to.into(),
        }
    }
}

/// The patch plus a change-by-change record of what it touches.
#[derive(Debug, Default)]
pub struct TeamDiff {
    pub patch: TeamPatch,
    pub changes: Vec<FieldChange>,
}

impl TeamDiff {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Roster diff
// ---------------------------------------------------------------------------

/// Changes a roster team implies for its stored counterpart.
pub fn diff_roster(source: &SourceTeam, stored: &CanonicalTeam) -> TeamDiff {
    let mut diff = TeamDiff::default();

    if checkin_flag(&source.leader.check_in) && !stored.checked_in {
        diff.patch.checked_in = Some(true);
        diff.changes.push(FieldChange::new("checked_in", "false", "true"));
    }
    if board_flag(&source.leader.board) && !stored.board_given {
        diff.patch.board_given = Some(true);
        diff.changes.push(FieldChange::new("board_given", "false", "true"));
    }

    let room = normalize_room_number(&source.leader.room_number);
    if !room.is_empty() && room != stored.room_number {
        diff.changes
            .push(FieldChange::new("room_number", &stored.room_number, &room));
        diff.patch.room_number = Some(room);
    }

    let team_number = source.leader.team_number.trim();
    if !team_number.is_empty() && team_number != stored.team_number {
        diff.changes.push(FieldChange::new(
            "team_number",
            &stored.team_number,
            team_number,
        ));
        diff.patch.team_number = Some(team_number.to_string());
    }

    let leader = source.leader.to_person();
    if !leader.email.is_empty() && leader.email != stored.leader.email_key() {
        diff.changes.push(FieldChange::new(
            "leader",
            &stored.leader.email,
            &leader.email,
        ));
        diff.patch.leader = Some(leader);
    }

    if source.members.len() == TEAM_SIZE {
        let incoming: Vec<Person> = source.members.iter().map(|m| m.to_person()).collect();
        let incoming_keys: BTreeSet<String> = incoming.iter().map(Person::email_key).collect();
        let stored_keys: BTreeSet<String> =
            stored.members.iter().map(Person::email_key).collect();
        if incoming_keys != stored_keys {
            diff.changes.push(FieldChange::new(
                "members",
                joined(&stored_keys),
                joined(&incoming_keys),
            ));
            diff.patch.members = Some(incoming);
        }
    }

    diff
}

fn joined(keys: &BTreeSet<String>) -> String {
    keys.iter().cloned().collect::<Vec<_>>().join(", ")
}

// ---------------------------------------------------------------------------
// Submission diff
// ---------------------------------------------------------------------------

/// Changes a submission-form row implies for its stored team.
pub fn diff_submission(row: &SubmissionRow, stored: &CanonicalTeam) -> TeamDiff {
    let mut diff = TeamDiff::default();

    if !row.problem_statement.is_empty() && row.problem_statement != stored.problem_statement {
        diff.changes.push(FieldChange::new(
            "problem_statement",
            &stored.problem_statement,
            &row.problem_statement,
        ));
        diff.patch.problem_statement = Some(row.problem_statement.clone());
    }

    if !row.repo_link.is_empty() && row.repo_link != stored.repo_link {
        diff.changes.push(FieldChange::new(
            "repo_link",
            &stored.repo_link,
            &row.repo_link,
        ));
        diff.patch.repo_link = Some(row.repo_link.clone());
    }

    let room = normalize_room_number(&row.room_number);
    if !room.is_empty() && room != stored.room_number {
        diff.changes
            .push(FieldChange::new("room_number", &stored.room_number, &room));
        diff.patch.room_number = Some(room);
    }

    if !row.team_number.is_empty() && row.team_number != stored.team_number {
        diff.changes.push(FieldChange::new(
            "team_number",
            &stored.team_number,
            &row.team_number,
        ));
        diff.patch.team_number = Some(row.team_number.clone());
    }

    diff
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rollcall_model::{Course, Residency};

    use crate::source::SourceRow;

    fn source_row(name: &str, email: &str, role: &str) -> SourceRow {
        SourceRow::from_fields(&[
            name.to_string(),
            email.to_string(),
            "9990001111".to_string(),
            "2024BTECH001".to_string(),
            "btech".to_string(),
            "2024".to_string(),
            "Hosteller".to_string(),
            "yes".to_string(),
            role.to_string(),
            "Alpha".to_string(),
        ])
    }

    fn stored_person(email: &str) -> Person {
        Person {
            name: "Someone".to_string(),
            email: email.to_string(),
            whatsapp: "9990001111".to_string(),
            roll_number: "2024BTECH001".to_string(),
            course: Course::BTech,
            batch: "2024".to_string(),
            residency: Residency::Hosteller,
            mess_food: true,
        }
    }

    fn stored_team() -> CanonicalTeam {
        CanonicalTeam {
            name: "Alpha".to_string(),
            leader: stored_person("lead@x.y"),
            members: vec![
                stored_person("a@x.y"),
                stored_person("b@x.y"),
                stored_person("c@x.y"),
            ],
            checked_in: false,
            board_given: false,
            room_number: "EB2 - 204".to_string(),
            team_number: "T7".to_string(),
            problem_statement: String::new(),
            repo_link: String::new(),
            created_at: Utc::now(),
        }
    }

    fn source_team(leader_email: &str, member_emails: &[&str]) -> SourceTeam {
        SourceTeam {
            raw_name: "Alpha".to_string(),
            leader: source_row("Lead", leader_email, "leader"),
            members: member_emails
                .iter()
                .map(|e| source_row("M", e, "member"))
                .collect(),
        }
    }

    #[test]
    fn identical_team_produces_empty_diff() {
        let source = source_team("lead@x.y", &["a@x.y", "b@x.y", "c@x.y"]);
        let diff = diff_roster(&source, &stored_team());
        assert!(diff.is_empty());
        assert!(diff.patch.is_empty());
    }

    #[test]
    fn checkin_moves_only_forward() {
        let mut source = source_team("lead@x.y", &["a@x.y", "b@x.y", "c@x.y"]);
        source.leader.check_in = "in".to_string();
        let diff = diff_roster(&source, &stored_team());
        assert_eq!(diff.patch.checked_in, Some(true));

        // A checked-in team never reverts when the sheet cell is blank.
        let mut stored = stored_team();
        stored.checked_in = true;
        source.leader.check_in = String::new();
        let diff = diff_roster(&source, &stored);
        assert!(diff.patch.checked_in.is_none());
    }

    #[test]
    fn room_compares_in_normalized_form() {
        let mut source = source_team("lead@x.y", &["a@x.y", "b@x.y", "c@x.y"]);
        source.leader.room_number = "204".to_string();
        // Stored room is already "EB2 - 204".
        let diff = diff_roster(&source, &stored_team());
        assert!(diff.patch.room_number.is_none());

        source.leader.room_number = "EB1 105".to_string();
        let diff = diff_roster(&source, &stored_team());
        assert_eq!(diff.patch.room_number.as_deref(), Some("EB1 - 105"));
    }

    #[test]
    fn leader_replaced_only_when_email_differs() {
        // Same email spelled with different case: not a change.
        let source = source_team("LEAD@X.Y", &["a@x.y", "b@x.y", "c@x.y"]);
        let diff = diff_roster(&source, &stored_team());
        assert!(diff.patch.leader.is_none());

        let source = source_team("newlead@x.y", &["a@x.y", "b@x.y", "c@x.y"]);
        let diff = diff_roster(&source, &stored_team());
        let leader = diff.patch.leader.unwrap();
        assert_eq!(leader.email, "newlead@x.y");
        assert_eq!(diff.changes[0].field, "leader");
    }

    #[test]
    fn blank_leader_email_never_replaces() {
        let source = source_team("", &["a@x.y", "b@x.y", "c@x.y"]);
        let diff = diff_roster(&source, &stored_team());
        assert!(diff.patch.leader.is_none());
    }

    #[test]
    fn members_compare_as_email_sets() {
        // Same people in a different order: not a change.
        let source = source_team("lead@x.y", &["c@x.y", "a@x.y", "b@x.y"]);
        let diff = diff_roster(&source, &stored_team());
        assert!(diff.patch.members.is_none());

        let source = source_team("lead@x.y", &["a@x.y", "b@x.y", "d@x.y"]);
        let diff = diff_roster(&source, &stored_team());
        assert_eq!(diff.patch.members.as_ref().map(Vec::len), Some(3));
    }

    #[test]
    fn short_member_list_never_replaces() {
        let source = source_team("lead@x.y", &["a@x.y", "d@x.y"]);
        let diff = diff_roster(&source, &stored_team());
        assert!(diff.patch.members.is_none());
    }

    #[test]
    fn submission_fills_and_updates_nonempty_fields() {
        let row = SubmissionRow {
            team_name: "Alpha".to_string(),
            team_number: "T7".to_string(),
            room_number: "EB2-204".to_string(),
            problem_statement: "Build a thing".to_string(),
            repo_link: "https://github.com/x/y".to_string(),
        };
        let diff = diff_submission(&row, &stored_team());
        // Room and team number already match after normalization.
        assert_eq!(
            diff.patch.problem_statement.as_deref(),
            Some("Build a thing")
        );
        assert_eq!(
            diff.patch.repo_link.as_deref(),
            Some("https://github.com/x/y")
        );
        assert!(diff.patch.room_number.is_none());
        assert!(diff.patch.team_number.is_none());
    }

    #[test]
    fn empty_submission_fields_do_not_clear_stored_values() {
        let mut stored = stored_team();
        stored.problem_statement = "Existing".to_string();
        stored.repo_link = "https://old".to_string();
        let row = SubmissionRow {
            team_name: "Alpha".to_string(),
            team_number: String::new(),
            room_number: String::new(),
            problem_statement: String::new(),
            repo_link: String::new(),
        };
        let diff = diff_submission(&row, &stored);
        assert!(diff.is_empty());
    }
}
