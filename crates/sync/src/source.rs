//! Positional column layouts of the two spreadsheet exports.

use rollcall_model::Person;

use crate::normalize::{
    collapse_whitespace, normalize_course, normalize_mess_food, normalize_residency,
    strip_whitespace,
};

/// Roster rows below this field count are dropped.
pub const ROSTER_MIN_FIELDS: usize = 10;

/// Submission rows below this field count are dropped.
pub const SUBMISSION_MIN_FIELDS: usize = 9;

// ---------------------------------------------------------------------------
// Roster
// ---------------------------------------------------------------------------

/// One roster line, raw except for the trimming done by the parser.
///
/// Columns: name, email, whatsapp, roll number, course, batch, residency,
/// mess food, role, team name, check-in, board, room number, team number.
#[derive(Debug, Clone)]
pub struct SourceRow {
    pub name: String,
    pub email: String,
    pub whatsapp: String,
    pub roll_number: String,
    pub course: String,
    pub batch: String,
    pub residency: String,
    pub mess_food: String,
    pub role: String,
    pub team_name: String,
    pub check_in: String,
    pub board: String,
    pub room_number: String,
    pub team_number: String,
}

impl SourceRow {
    pub fn from_fields(fields: &[String]) -> SourceRow {
        let f = |i: usize| fields.get(i).cloned().unwrap_or_default();
        SourceRow {
            name: f(0),
            email: f(1),
            whatsapp: f(2),
            roll_number: f(3),
            course: f(4),
            batch: f(5),
            residency: f(6),
            mess_food: f(7),
            role: f(8),
            team_name: f(9),
            check_in: f(10),
            board: f(11),
            room_number: f(12),
            team_number: f(13),
        }
    }

    pub fn is_leader(&self) -> bool {
        self.role.trim().eq_ignore_ascii_case("leader")
    }

    /// The persisted person record: canonical vocabulary, lowercased email,
    /// uppercased roll number, whitespace-free phone.
    pub fn to_person(&self) -> Person {
        Person {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            whatsapp: strip_whitespace(&self.whatsapp),
            roll_number: self.roll_number.trim().to_uppercase(),
            course: normalize_course(&self.course),
            batch: self.batch.trim().to_string(),
            residency: normalize_residency(&self.residency),
            mess_food: normalize_mess_food(&self.mess_food),
        }
    }
}

// ---------------------------------------------------------------------------
// Submissions
// ---------------------------------------------------------------------------

/// One submission-form line. The leading columns (response id, timestamps,
/// submitter) are form metadata and are ignored.
#[derive(Debug, Clone)]
pub struct SubmissionRow {
    pub team_name: String,
    pub team_number: String,
    pub room_number: String,
    pub problem_statement: String,
    pub repo_link: String,
}

impl SubmissionRow {
    pub fn from_fields(fields: &[String]) -> SubmissionRow {
        let f = |i: usize| fields.get(i).cloned().unwrap_or_default();
        SubmissionRow {
            team_name: f(5),
            team_number: f(6),
            room_number: f(7),
            problem_statement: collapse_whitespace(&f(8)),
            repo_link: f(9),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
