//! Two-pass reconciliation between spreadsheet exports and the team store.
//!
//! The engine keeps an in-memory working set of every stored team and
//! applies each computed change to it in both modes, so a dry run walks
//! the exact state an apply run would and produces the same report. Store
//! writes happen only under [`RunMode::Apply`].

use chrono::Utc;

use rollcall_model::CanonicalTeam;
use rollcall_store::TeamStore;

use crate::aggregate::aggregate_rows;
use crate::config::SyncConfig;
use crate::csv::parse_records;
use crate::diff::{diff_roster, diff_submission};
use crate::error::SyncError;
use crate::report::{
    PassReport, RunMode, SkipReason, SkippedTeam, SyncMeta, SyncReport, TeamUpdate,
};
use crate::resolve::{LookupMap, Resolution};
use crate::source::{SourceRow, SubmissionRow, ROSTER_MIN_FIELDS, SUBMISSION_MIN_FIELDS};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One source file, already read. The label lands in the report meta.
#[derive(Debug, Clone)]
pub struct NamedSource {
    pub label: String,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct SyncInput {
    pub roster: Option<NamedSource>,
    pub submissions: Option<NamedSource>,
}

// ---------------------------------------------------------------------------
// Working set
// ---------------------------------------------------------------------------

/// A stored team plus its row id. Teams inserted during a dry run have no
/// id; nothing writes to them, so none is needed.
struct WorkingTeam {
    id: Option<i64>,
    team: CanonicalTeam,
}

fn lookup_over(working: &[WorkingTeam]) -> LookupMap {
    LookupMap::build(working.iter().map(|w| w.team.name.as_str()))
}

// ---------------------------------------------------------------------------
// Run
// ---------------------------------------------------------------------------

pub fn run(
    store: &mut TeamStore,
    config: &SyncConfig,
    input: &SyncInput,
    mode: RunMode,
    store_path: &str,
) -> Result<SyncReport, SyncError> {
    let mut working: Vec<WorkingTeam> = store
        .find_all()?
        .into_iter()
        .map(|s| WorkingTeam {
            id: Some(s.id),
            team: s.team,
        })
        .collect();

    let meta = SyncMeta {
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        run_at: Utc::now().to_rfc3339(),
        mode,
        store_path: store_path.to_string(),
        roster_file: input.roster.as_ref().map(|s| s.label.clone()),
        submissions_file: input.submissions.as_ref().map(|s| s.label.clone()),
    };

    let roster = match &input.roster {
        Some(source) => Some(roster_pass(store, config, &source.text, mode, &mut working)?),
        None => None,
    };
    let submissions = match &input.submissions {
        Some(source) => Some(submission_pass(
            store,
            config,
            &source.text,
            mode,
            &mut working,
        )?),
        None => None,
    };

    Ok(SyncReport {
        meta,
        roster,
        submissions,
    })
}

// ---------------------------------------------------------------------------
// Roster pass
// ---------------------------------------------------------------------------

fn roster_pass(
    store: &mut TeamStore,
    config: &SyncConfig,
    text: &str,
    mode: RunMode,
    working: &mut Vec<WorkingTeam>,
) -> Result<PassReport, SyncError> {
    let mut pass = PassReport::default();

    let (records, dropped) = parse_records(text, ROSTER_MIN_FIELDS);
    pass.dropped_rows = dropped;

    let rows: Vec<SourceRow> = records.iter().map(|f| SourceRow::from_fields(f)).collect();
    let output = aggregate_rows(rows);
    pass.standalone = output.standalone;
    for name in output.leaderless {
        pass.skipped.push(SkippedTeam {
            team: name,
            reason: SkipReason::NoLeader,
        });
    }

    let mut lookup = lookup_over(working);
    pass.collisions = std::mem::take(&mut lookup.collisions);

    for team in output.teams {
        match lookup.resolve(&team.raw_name, &config.roster_aliases) {
            Resolution::Found { index, stage } => {
                let diff = diff_roster(&team, &working[index].team);
                if diff.is_empty() {
                    pass.summary.unchanged += 1;
                    continue;
                }
                if mode == RunMode::Apply {
                    if let Some(id) = working[index].id {
                        store.update(id, &diff.patch)?;
                    }
                }
                diff.patch.apply(&mut working[index].team);
                pass.updated.push(TeamUpdate {
                    team: working[index].team.name.clone(),
                    stage,
                    changes: diff.changes,
                });
            }
            Resolution::Ambiguous { candidates } => {
                pass.skipped.push(SkippedTeam {
                    team: team.raw_name,
                    reason: SkipReason::Ambiguous { candidates },
                });
            }
            Resolution::NotFound => {
                if !team.is_complete() {
                    pass.skipped.push(SkippedTeam {
                        team: team.raw_name,
                        reason: SkipReason::Incomplete {
                            member_count: team.members.len(),
                        },
                    });
                    continue;
                }
                let doc = team.to_canonical(Utc::now());
                if let Err(violation) = doc.validate_shape() {
                    pass.skipped.push(SkippedTeam {
                        team: team.raw_name,
                        reason: SkipReason::ShapeViolation {
                            detail: violation.to_string(),
                        },
                    });
                    continue;
                }
                let id = match mode {
                    RunMode::Apply => Some(store.insert(&doc)?),
                    RunMode::DryRun => None,
                };
                pass.inserted.push(doc.name.clone());
                working.push(WorkingTeam { id, team: doc });
                // Later rows must resolve to the team just added, whatever
                // spelling they use.
                lookup = lookup_over(working);
            }
        }
    }

    pass.finalize();
    Ok(pass)
}

// ---------------------------------------------------------------------------
// Submission pass
// ---------------------------------------------------------------------------

fn submission_pass(
    store: &mut TeamStore,
    config: &SyncConfig,
    text: &str,
    mode: RunMode,
    working: &mut [WorkingTeam],
) -> Result<PassReport, SyncError> {
    let mut pass = PassReport::default();

    let (records, dropped) = parse_records(text, SUBMISSION_MIN_FIELDS);
    pass.dropped_rows = dropped;

    // Built after the roster pass, so teams inserted there resolve here.
    let mut lookup = lookup_over(working);
    pass.collisions = std::mem::take(&mut lookup.collisions);

    for fields in &records {
        let row = SubmissionRow::from_fields(fields);
        if row.team_name.is_empty() {
            continue;
        }
        match lookup.resolve(&row.team_name, &config.submission_aliases) {
            Resolution::Found { index, stage } => {
                let diff = diff_submission(&row, &working[index].team);
                if diff.is_empty() {
                    pass.summary.unchanged += 1;
                    continue;
                }
                if mode == RunMode::Apply {
                    if let Some(id) = working[index].id {
                        store.update(id, &diff.patch)?;
                    }
                }
                diff.patch.apply(&mut working[index].team);
                pass.updated.push(TeamUpdate {
                    team: working[index].team.name.clone(),
                    stage,
                    changes: diff.changes,
                });
            }
            Resolution::Ambiguous { candidates } => {
                pass.skipped.push(SkippedTeam {
                    team: row.team_name,
                    reason: SkipReason::Ambiguous { candidates },
                });
            }
            Resolution::NotFound => {
                pass.not_found.push(row.team_name);
            }
        }
    }

    pass.finalize();
    Ok(pass)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
