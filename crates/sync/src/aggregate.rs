//! Groups flat roster rows into source teams.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use rollcall_model::{CanonicalTeam, TEAM_SIZE};

use crate::normalize::{board_flag, checkin_flag, normalize_room_number};
use crate::source::SourceRow;

/// A team assembled from roster rows sharing one raw team-name string.
/// Team-level columns (check-in, board, room, team number) are read from
/// the leader's row.
#[derive(Debug, Clone)]
pub struct SourceTeam {
    pub raw_name: String,
    pub leader: SourceRow,
    pub members: Vec<SourceRow>,
}

impl SourceTeam {
    pub fn is_complete(&self) -> bool {
        self.members.len() == TEAM_SIZE
    }

    /// The document an insert would write.
    pub fn to_canonical(&self, created_at: DateTime<Utc>) -> CanonicalTeam {
        CanonicalTeam {
            name: self.raw_name.clone(),
            leader: self.leader.to_person(),
            members: self.members.iter().map(|m| m.to_person()).collect(),
            checked_in: checkin_flag(&self.leader.check_in),
            board_given: board_flag(&self.leader.board),
            room_number: normalize_room_number(&self.leader.room_number),
            team_number: self.leader.team_number.trim().to_string(),
            problem_statement: String::new(),
            repo_link: String::new(),
            created_at,
        }
    }
}

/// A roster row with no team name. Reported, not an error.
#[derive(Debug, Clone, Serialize)]
pub struct StandaloneIndividual {
    pub name: String,
    pub email: String,
}

#[derive(Debug)]
pub struct AggregateOutput {
    pub teams: Vec<SourceTeam>,
    pub standalone: Vec<StandaloneIndividual>,
    /// Team names skipped because no row carried the leader role.
    pub leaderless: Vec<String>,
}

/// Groups rows by their exact raw team name, preserving first-seen order.
/// Rows whose role is leader never land in the member set, so a duplicate
/// leader row leaves the team incomplete rather than oversized.
pub fn aggregate_rows(rows: Vec<SourceRow>) -> AggregateOutput {
    let mut order: Vec<String> = Vec::new();
    let mut groups: BTreeMap<String, Vec<SourceRow>> = BTreeMap::new();
    let mut standalone = Vec::new();

    for row in rows {
        if row.team_name.is_empty() {
            standalone.push(StandaloneIndividual {
                name: row.name.clone(),
                email: row.email.clone(),
            });
            continue;
        }
        if !groups.contains_key(&row.team_name) {
            order.push(row.team_name.clone());
        }
        groups.entry(row.team_name.clone()).or_default().push(row);
    }

    let mut teams = Vec::new();
    let mut leaderless = Vec::new();
    for name in order {
        let Some(rows) = groups.remove(&name) else {
            continue;
        };
        let Some(pos) = rows.iter().position(SourceRow::is_leader) else {
            leaderless.push(name);
            continue;
        };
        let leader = rows[pos].clone();
        let members: Vec<SourceRow> = rows.into_iter().filter(|r| !r.is_leader()).collect();
        teams.push(SourceTeam {
            raw_name: name,
            leader,
            members,
        });
    }

    AggregateOutput {
        teams,
        standalone,
        leaderless,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
