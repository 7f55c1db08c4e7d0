//! Removes stored teams whose names collide after normalization.
//!
//! The store's unique index only blocks exact case-insensitive duplicates;
//! separator variants ("Team VAD" / "Team  VAD") slip past it and then
//! shadow each other in lookups. Within each collision group the earliest
//! `created_at` survives. This is the only path that deletes documents.

use std::collections::BTreeMap;

use serde::Serialize;

use rollcall_store::{StoredTeam, TeamStore};

use crate::error::SyncError;
use crate::normalize::normalize_team_name;
use crate::report::RunMode;

#[derive(Debug, Clone, Serialize)]
pub struct DedupeGroup {
    pub normalized: String,
    pub kept: String,
    pub removed: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DedupeReport {
    pub mode: RunMode,
    pub scanned: usize,
    pub groups: Vec<DedupeGroup>,
    pub removed: usize,
}

pub fn run_dedupe(store: &TeamStore, mode: RunMode) -> Result<DedupeReport, SyncError> {
    let teams = store.find_all()?;
    let mut report = DedupeReport {
        mode,
        scanned: teams.len(),
        groups: Vec::new(),
        removed: 0,
    };

    let mut by_norm: BTreeMap<String, Vec<&StoredTeam>> = BTreeMap::new();
    for stored in &teams {
        let norm = normalize_team_name(&stored.team.name);
        // A name that is all separators has no usable key; leave it for
        // the audit to surface.
        if norm.is_empty() {
            continue;
        }
        by_norm.entry(norm).or_default().push(stored);
    }

    for (normalized, mut group) in by_norm {
        if group.len() < 2 {
            continue;
        }
        group.sort_by_key(|s| (s.team.created_at, s.id));
        let kept = group[0].team.name.clone();
        let mut removed = Vec::new();
        for stored in &group[1..] {
            if mode == RunMode::Apply {
                store.delete(stored.id)?;
            }
            removed.push(stored.team.name.clone());
        }
        report.removed += removed.len();
        report.groups.push(DedupeGroup {
            normalized,
            kept,
            removed,
        });
    }

    Ok(report)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
