//! One-shot repair sweep for damaged stored fields.
//!
//! Two defects recur in documents imported from the early sheets: a roll
//! number pasted into the room column, and a batch cell holding the course
//! in parentheses ("2024 (BTech)"). The sweep rewrites both to canonical
//! form. Like the sync engine it defaults to reporting only; writes happen
//! under [`RunMode::Apply`].

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use rollcall_model::{Person, TeamPatch};
use rollcall_store::TeamStore;

use crate::diff::FieldChange;
use crate::error::SyncError;
use crate::normalize::{normalize_course, normalize_room_number};
use crate::report::RunMode;

fn roll_number_shape() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^\d{4}(btech|bba|bdes|hsb)\d+$").unwrap())
}

fn building_only_norm() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^eb-?\d$").unwrap())
}

fn batch_with_course() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^(\d{4})\s*\((btech|bba|bdes|hsb)\)$").unwrap())
}

// ---------------------------------------------------------------------------
// Field repairs
// ---------------------------------------------------------------------------

/// Canonical replacement for a stored room value. A roll number in the
/// room column is cleared, as is a building with no room part; anything
/// else goes through the normal room canonicalization.
pub fn repair_room(stored: &str) -> String {
    let trimmed = stored.trim();
    if roll_number_shape().is_match(trimmed) {
        return String::new();
    }
    let normalized = normalize_room_number(trimmed);
    if building_only_norm().is_match(&normalized) {
        return String::new();
    }
    normalized
}

/// Splits a "2024 (BTech)" batch cell into its two fields. Returns the
/// corrected person, or None when the batch is already plain.
pub fn repair_batch_course(person: &Person) -> Option<Person> {
    let caps = batch_with_course().captures(person.batch.trim())?;
    let mut fixed = person.clone();
    fixed.batch = caps[1].to_string();
    fixed.course = normalize_course(&caps[2]);
    Some(fixed)
}

// ---------------------------------------------------------------------------
// Sweep
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct FixupChange {
    pub team: String,
    pub changes: Vec<FieldChange>,
}

#[derive(Debug, Serialize)]
pub struct FixupReport {
    pub mode: RunMode,
    pub scanned: usize,
    pub changed: Vec<FixupChange>,
}

pub fn run_fixup(store: &mut TeamStore, mode: RunMode) -> Result<FixupReport, SyncError> {
    let teams = store.find_all()?;
    let mut report = FixupReport {
        mode,
        scanned: teams.len(),
        changed: Vec::new(),
    };

    for stored in teams {
        let team = &stored.team;
        let mut patch = TeamPatch::default();
        let mut changes = Vec::new();

        let room = repair_room(&team.room_number);
        if room != team.room_number {
            changes.push(FieldChange::new("room_number", &team.room_number, &room));
            patch.room_number = Some(room);
        }

        if let Some(fixed) = repair_batch_course(&team.leader) {
            changes.push(FieldChange::new(
                "leader.batch",
                &team.leader.batch,
                &fixed.batch,
            ));
            if fixed.course != team.leader.course {
                changes.push(FieldChange::new(
                    "leader.course",
                    team.leader.course.to_string(),
                    fixed.course.to_string(),
                ));
            }
            patch.leader = Some(fixed);
        }

        let mut members = team.members.clone();
        let mut members_changed = false;
        for (slot, member) in members.iter_mut().enumerate() {
            if let Some(fixed) = repair_batch_course(member) {
                changes.push(FieldChange::new(
                    format!("member {}.batch", slot + 1),
                    &member.batch,
                    &fixed.batch,
                ));
                if fixed.course != member.course {
                    changes.push(FieldChange::new(
                        format!("member {}.course", slot + 1),
                        member.course.to_string(),
                        fixed.course.to_string(),
                    ));
                }
                *member = fixed;
                members_changed = true;
            }
        }
        if members_changed {
            patch.members = Some(members);
        }

        if patch.is_empty() {
            continue;
        }
        if mode == RunMode::Apply {
            store.update(stored.id, &patch)?;
        }
        report.changed.push(FixupChange {
            team: team.name.clone(),
            changes,
        });
    }

    Ok(report)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
