//! Read-only consistency checks over the store.

use std::collections::BTreeMap;

use serde::Serialize;

use rollcall_store::TeamStore;

use crate::error::SyncError;
use crate::normalize::normalize_team_name;

/// Where an email was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailOccupancy {
    pub team: String,
    pub slot: String,
}

/// One email held by more than one person across the store.
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateEmail {
    pub email: String,
    pub occupancies: Vec<EmailOccupancy>,
}

/// Stored teams whose names collapse to the same normalized key. These
/// make engine lookups ambiguous and are what the dedupe sweep removes.
#[derive(Debug, Clone, Serialize)]
pub struct NameCollisionGroup {
    pub normalized: String,
    pub teams: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct AuditReport {
    pub teams_scanned: usize,
    pub duplicate_emails: Vec<DuplicateEmail>,
    pub name_collisions: Vec<NameCollisionGroup>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.duplicate_emails.is_empty() && self.name_collisions.is_empty()
    }
}

pub fn run_audit(store: &TeamStore) -> Result<AuditReport, SyncError> {
    let teams = store.find_all()?;

    let mut by_email: BTreeMap<String, Vec<EmailOccupancy>> = BTreeMap::new();
    let mut by_norm: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for stored in &teams {
        let team = &stored.team;
        by_norm
            .entry(normalize_team_name(&team.name))
            .or_default()
            .push(team.name.clone());

        let slots = std::iter::once(("leader".to_string(), &team.leader)).chain(
            team.members
                .iter()
                .enumerate()
                .map(|(i, m)| (format!("member {}", i + 1), m)),
        );
        for (slot, person) in slots {
            let email = person.email_key();
            if email.is_empty() {
                continue;
            }
            by_email.entry(email).or_default().push(EmailOccupancy {
                team: team.name.clone(),
                slot,
            });
        }
    }

    Ok(AuditReport {
        teams_scanned: teams.len(),
        duplicate_emails: by_email
            .into_iter()
            .filter(|(_, occupancies)| occupancies.len() > 1)
            .map(|(email, occupancies)| DuplicateEmail { email, occupancies })
            .collect(),
        name_collisions: by_norm
            .into_iter()
            .filter(|(_, teams)| teams.len() > 1)
            .map(|(normalized, teams)| NameCollisionGroup { normalized, teams })
            .collect(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
