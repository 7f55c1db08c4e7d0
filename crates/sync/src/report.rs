//! Serializable run report.
//!
//! One report per run, one pass block per source file. The report is the
//! same in both modes; only `meta.mode` and the store writes differ.

use serde::Serialize;

use crate::aggregate::StandaloneIndividual;
use crate::diff::FieldChange;
use crate::resolve::{MatchStage, NameCollision};

// ---------------------------------------------------------------------------
// Run mode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunMode {
    DryRun,
    Apply,
}

impl std::fmt::Display for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DryRun => write!(f, "dry-run"),
            Self::Apply => write!(f, "apply"),
        }
    }
}

// ---------------------------------------------------------------------------
// Meta
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct SyncMeta {
    pub engine_version: String,
    pub run_at: String,
    pub mode: RunMode,
    pub store_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roster_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submissions_file: Option<String>,
}

// ---------------------------------------------------------------------------
// Per-team outcomes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct TeamUpdate {
    pub team: String,
    pub stage: MatchStage,
    pub changes: Vec<FieldChange>,
}

/// Why a source team was left alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    NoLeader,
    Incomplete { member_count: usize },
    ShapeViolation { detail: String },
    Ambiguous { candidates: Vec<String> },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoLeader => write!(f, "no leader row"),
            Self::Incomplete { member_count } => {
                write!(f, "incomplete: {member_count} members")
            }
            Self::ShapeViolation { detail } => write!(f, "invalid shape: {detail}"),
            Self::Ambiguous { candidates } => {
                write!(f, "ambiguous match: {}", candidates.join(" / "))
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedTeam {
    pub team: String,
    pub reason: SkipReason,
}

// ---------------------------------------------------------------------------
// Pass report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct PassSummary {
    pub updated: usize,
    pub inserted: usize,
    pub unchanged: usize,
    pub skipped: usize,
    pub not_found: usize,
}

/// Everything one source file did (or would do, in a dry run).
#[derive(Debug, Default, Serialize)]
pub struct PassReport {
    pub updated: Vec<TeamUpdate>,
    pub inserted: Vec<String>,
    pub skipped: Vec<SkippedTeam>,
    pub not_found: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub standalone: Vec<StandaloneIndividual>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub collisions: Vec<NameCollision>,
    pub dropped_rows: usize,
    pub summary: PassSummary,
}

impl PassReport {
    /// Fills the summary counts from the outcome lists. `unchanged` is a
    /// plain counter maintained by the engine; it has no per-team list.
    pub fn finalize(&mut self) {
        self.summary.updated = self.updated.len();
        self.summary.inserted = self.inserted.len();
        self.summary.skipped = self.skipped.len();
        self.summary.not_found = self.not_found.len();
    }
}

// ---------------------------------------------------------------------------
// Run report
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct SyncReport {
    pub meta: SyncMeta,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roster: Option<PassReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submissions: Option<PassReport>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
