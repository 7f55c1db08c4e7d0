//! `rollcall-model` — persisted data model for hackathon team records.
//!
//! Pure types crate: no storage or IO dependencies.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Members a complete team carries, leader excluded.
pub const TEAM_SIZE: usize = 3;

/// Case-insensitive lookup key for a team name, as indexed by the store.
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

// ---------------------------------------------------------------------------
// Vocabulary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Course {
    BTech,
    BBA,
    BDes,
    HSB,
}

impl std::fmt::Display for Course {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BTech => write!(f, "BTech"),
            Self::BBA => write!(f, "BBA"),
            Self::BDes => write!(f, "BDes"),
            Self::HSB => write!(f, "HSB"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Residency {
    Hosteller,
    #[serde(rename = "Day Scholar")]
    DayScholar,
}

impl std::fmt::Display for Residency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hosteller => write!(f, "Hosteller"),
            Self::DayScholar => write!(f, "Day Scholar"),
        }
    }
}

// ---------------------------------------------------------------------------
// Person + team
// ---------------------------------------------------------------------------

/// One participant. Emails are stored lowercased and roll numbers
/// uppercased; constructors at the ingest boundary enforce that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    pub email: String,
    pub whatsapp: String,
    pub roll_number: String,
    pub course: Course,
    pub batch: String,
    pub residency: Residency,
    pub mess_food: bool,
}

impl Person {
    /// Comparison key for email identity.
    pub fn email_key(&self) -> String {
        self.email.trim().to_lowercase()
    }
}

/// The persisted team document. Operational fields default so documents
/// written before a field existed still decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalTeam {
    pub name: String,
    pub leader: Person,
    pub members: Vec<Person>,
    #[serde(default)]
    pub checked_in: bool,
    #[serde(default)]
    pub board_given: bool,
    #[serde(default)]
    pub room_number: String,
    #[serde(default)]
    pub team_number: String,
    #[serde(default)]
    pub problem_statement: String,
    #[serde(default)]
    pub repo_link: String,
    pub created_at: DateTime<Utc>,
}

impl CanonicalTeam {
    pub fn name_key(&self) -> String {
        name_key(&self.name)
    }

    /// Checks the invariants a team must satisfy before insertion:
    /// exactly [`TEAM_SIZE`] members, no email or roll number shared
    /// between participants. Empty values are exempt from the duplicate
    /// checks so sparse rows do not collide on "".
    pub fn validate_shape(&self) -> Result<(), ShapeViolation> {
        if self.members.len() != TEAM_SIZE {
            return Err(ShapeViolation::WrongMemberCount(self.members.len()));
        }
        let mut emails = BTreeSet::new();
        let mut rolls = BTreeSet::new();
        for person in std::iter::once(&self.leader).chain(self.members.iter()) {
            let email = person.email_key();
            if !email.is_empty() && !emails.insert(email.clone()) {
                return Err(ShapeViolation::DuplicateEmail(email));
            }
            let roll = person.roll_number.trim().to_uppercase();
            if !roll.is_empty() && !rolls.insert(roll.clone()) {
                return Err(ShapeViolation::DuplicateRollNumber(roll));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeViolation {
    WrongMemberCount(usize),
    DuplicateEmail(String),
    DuplicateRollNumber(String),
}

impl std::fmt::Display for ShapeViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WrongMemberCount(n) => {
                write!(f, "expected {TEAM_SIZE} members, found {n}")
            }
            Self::DuplicateEmail(email) => {
                write!(f, "email '{email}' appears more than once in the team")
            }
            Self::DuplicateRollNumber(roll) => {
                write!(f, "roll number '{roll}' appears more than once in the team")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Partial updates
// ---------------------------------------------------------------------------

/// A partial update to a stored team. Unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TeamPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked_in: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub board_given: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem_statement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leader: Option<Person>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<Person>>,
}

impl TeamPatch {
    pub fn is_empty(&self) -> bool {
        self.checked_in.is_none()
            && self.board_given.is_none()
            && self.room_number.is_none()
            && self.team_number.is_none()
            && self.problem_statement.is_none()
            && self.repo_link.is_none()
            && self.leader.is_none()
            && self.members.is_none()
    }

    pub fn apply(&self, team: &mut CanonicalTeam) {
        if let Some(v) = self.checked_in {
            team.checked_in = v;
        }
        if let Some(v) = self.board_given {
            team.board_given = v;
        }
        if let Some(v) = &self.room_number {
            team.room_number = v.clone();
        }
        if let Some(v) = &self.team_number {
            team.team_number = v.clone();
        }
        if let Some(v) = &self.problem_statement {
            team.problem_statement = v.clone();
        }
        if let Some(v) = &self.repo_link {
            team.repo_link = v.clone();
        }
        if let Some(v) = &self.leader {
            team.leader = v.clone();
        }
        if let Some(v) = &self.members {
            team.members = v.clone();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn person(name: &str, email: &str, roll: &str) -> Person {
        Person {
            name: name.to_string(),
            email: email.to_string(),
            whatsapp: "9990001111".to_string(),
            roll_number: roll.to_string(),
            course: Course::BTech,
            batch: "2024".to_string(),
            residency: Residency::Hosteller,
            mess_food: true,
        }
    }

    fn team() -> CanonicalTeam {
        CanonicalTeam {
            name: "Error 404".to_string(),
            leader: person("Lead", "lead@example.edu", "2024BTECH001"),
            members: vec![
                person("A", "a@example.edu", "2024BTECH002"),
                person("B", "b@example.edu", "2024BTECH003"),
                person("C", "c@example.edu", "2024BTECH004"),
            ],
            checked_in: false,
            board_given: false,
            room_number: String::new(),
            team_number: String::new(),
            problem_statement: String::new(),
            repo_link: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn valid_shape_passes() {
        assert_eq!(team().validate_shape(), Ok(()));
    }

    #[test]
    fn wrong_member_count_rejected() {
        let mut t = team();
        t.members.pop();
        assert_eq!(t.validate_shape(), Err(ShapeViolation::WrongMemberCount(2)));
    }

    #[test]
    fn duplicate_email_rejected_case_insensitively() {
        let mut t = team();
        t.members[2].email = "LEAD@example.edu".to_string();
        assert_eq!(
            t.validate_shape(),
            Err(ShapeViolation::DuplicateEmail("lead@example.edu".to_string()))
        );
    }

    #[test]
    fn duplicate_roll_number_rejected() {
        let mut t = team();
        t.members[1].roll_number = "2024btech002".to_string();
        assert_eq!(
            t.validate_shape(),
            Err(ShapeViolation::DuplicateRollNumber("2024BTECH002".to_string()))
        );
    }

    #[test]
    fn empty_emails_do_not_collide() {
        let mut t = team();
        t.members[1].email = String::new();
        t.members[2].email = String::new();
        t.members[1].roll_number = String::new();
        t.members[2].roll_number = String::new();
        assert_eq!(t.validate_shape(), Ok(()));
    }

    #[test]
    fn patch_touches_only_set_fields() {
        let mut t = team();
        let patch = TeamPatch {
            room_number: Some("EB2 - 204".to_string()),
            checked_in: Some(true),
            ..Default::default()
        };
        assert!(!patch.is_empty());
        patch.apply(&mut t);
        assert_eq!(t.room_number, "EB2 - 204");
        assert!(t.checked_in);
        assert!(!t.board_given);
        assert_eq!(t.leader.email, "lead@example.edu");
    }

    #[test]
    fn empty_patch_is_empty() {
        assert!(TeamPatch::default().is_empty());
    }

    #[test]
    fn residency_serializes_with_space() {
        let json = serde_json::to_string(&Residency::DayScholar).unwrap();
        assert_eq!(json, "\"Day Scholar\"");
        let back: Residency = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Residency::DayScholar);
    }

    #[test]
    fn course_serializes_verbatim() {
        assert_eq!(serde_json::to_string(&Course::BTech).unwrap(), "\"BTech\"");
        assert_eq!(serde_json::to_string(&Course::HSB).unwrap(), "\"HSB\"");
    }

    #[test]
    fn team_document_round_trips() {
        let t = team();
        let json = serde_json::to_string(&t).unwrap();
        let back: CanonicalTeam = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn old_documents_without_operational_fields_decode() {
        let t = team();
        let mut value = serde_json::to_value(&t).unwrap();
        let obj = value.as_object_mut().unwrap();
        obj.remove("problem_statement");
        obj.remove("repo_link");
        obj.remove("checked_in");
        let back: CanonicalTeam = serde_json::from_value(value).unwrap();
        assert_eq!(back.problem_statement, "");
        assert!(!back.checked_in);
    }
}
