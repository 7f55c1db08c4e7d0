//! CSV export of the stored teams, newest first.

use chrono::SecondsFormat;
use serde::Serialize;

use rollcall_model::{CanonicalTeam, Course, Person, Residency, TEAM_SIZE};
use rollcall_store::TeamStore;

use crate::error::SyncError;

pub const EXPORT_HEADERS: [&str; 26] = [
    "Team Name",
    "Leader Name",
    "Leader Email",
    "Leader WhatsApp",
    "Leader Roll Number",
    "Leader Residency",
    "Leader Mess Food",
    "Member 1 Name",
    "Member 1 Email",
    "Member 1 WhatsApp",
    "Member 1 Roll Number",
    "Member 1 Residency",
    "Member 1 Mess Food",
    "Member 2 Name",
    "Member 2 Email",
    "Member 2 WhatsApp",
    "Member 2 Roll Number",
    "Member 2 Residency",
    "Member 2 Mess Food",
    "Member 3 Name",
    "Member 3 Email",
    "Member 3 WhatsApp",
    "Member 3 Roll Number",
    "Member 3 Residency",
    "Member 3 Mess Food",
    "Registration Date",
];

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// Row filters, all combinable. Residency must hold for the whole team;
/// the other three match if anyone on the team matches.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExportFilter {
    pub residency: Option<Residency>,
    pub mess_food: Option<bool>,
    pub year: Option<String>,
    pub course: Option<Course>,
}

impl ExportFilter {
    pub fn keep(&self, team: &CanonicalTeam) -> bool {
        let everyone = || std::iter::once(&team.leader).chain(team.members.iter());

        if let Some(residency) = self.residency {
            if !everyone().all(|p| p.residency == residency) {
                return false;
            }
        }
        if let Some(mess_food) = self.mess_food {
            if !everyone().any(|p| p.mess_food == mess_food) {
                return false;
            }
        }
        if let Some(year) = &self.year {
            if !everyone().any(|p| p.roll_number.trim().get(..4) == Some(year.as_str())) {
                return false;
            }
        }
        if let Some(course) = self.course {
            if !everyone().any(|p| p.course == course) {
                return false;
            }
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

fn person_fields(person: &Person) -> [String; 6] {
    [
        person.name.clone(),
        person.email.clone(),
        person.whatsapp.clone(),
        person.roll_number.clone(),
        person.residency.to_string(),
        if person.mess_food { "Yes" } else { "No" }.to_string(),
    ]
}

pub fn export_csv(store: &TeamStore, filter: &ExportFilter) -> Result<String, SyncError> {
    let mut teams = store.find_all()?;
    teams.sort_by(|a, b| {
        b.team
            .created_at
            .cmp(&a.team.created_at)
            .then(b.id.cmp(&a.id))
    });

    let render = |e: &dyn std::fmt::Display| SyncError::Render(e.to_string());

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(EXPORT_HEADERS).map_err(|e| render(&e))?;

    for stored in &teams {
        let team = &stored.team;
        if !filter.keep(team) {
            continue;
        }
        let mut row: Vec<String> = Vec::with_capacity(EXPORT_HEADERS.len());
        row.push(team.name.clone());
        row.extend(person_fields(&team.leader));
        for slot in 0..TEAM_SIZE {
            match team.members.get(slot) {
                Some(member) => row.extend(person_fields(member)),
                None => row.extend(std::iter::repeat(String::new()).take(6)),
            }
        }
        row.push(
            team.created_at
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        );
        writer.write_record(&row).map_err(|e| render(&e))?;
    }

    let bytes = writer.into_inner().map_err(|e| render(&e))?;
    String::from_utf8(bytes).map_err(|e| render(&e))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
