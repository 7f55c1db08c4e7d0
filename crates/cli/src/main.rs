// rollcall CLI - reconciles registration spreadsheet exports with the team store

mod exit_codes;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use rollcall_model::{Course, Residency};
use rollcall_store::TeamStore;
use rollcall_sync::{
    export_csv, run, run_audit, run_dedupe, run_fixup, ExportFilter, NamedSource, RunMode,
    SyncConfig, SyncError, SyncInput,
};

// Re-export exit codes from registry (single source of truth)
use exit_codes::{
    EXIT_AUDIT_FINDINGS, EXIT_CONFIG, EXIT_ERROR, EXIT_INPUT, EXIT_STORE, EXIT_SUCCESS, EXIT_USAGE,
};

#[derive(Parser)]
#[command(name = "rollcall")]
#[command(about = "Team registration sync for hackathon spreadsheets")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Path to the SQLite team store
    #[arg(
        long,
        global = true,
        value_name = "FILE",
        default_value = "rollcall.db",
        env = "ROLLCALL_DB"
    )]
    store: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile roster and submission exports against the store
    #[command(after_help = "\
Examples:
  rollcall sync --roster roster.csv
  rollcall sync --roster roster.csv --submissions forms.csv --apply
  rollcall sync --submissions forms.csv --config aliases.toml -o report.json
  rollcall --store event.db sync --roster roster.csv --apply")]
    Sync {
        /// Roster export CSV (one participant per row)
        #[arg(long, value_name = "FILE")]
        roster: Option<PathBuf>,

        /// Submission form export CSV (one response per row)
        #[arg(long, value_name = "FILE")]
        submissions: Option<PathBuf>,

        /// Write changes to the store (default is a dry run)
        #[arg(long)]
        apply: bool,

        /// TOML file with extra alias tables
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Write the JSON report to a file instead of stdout
        #[arg(long, short = 'o', value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Repair mis-entered room and batch fields in stored teams
    Fixup {
        /// Write changes to the store (default is a dry run)
        #[arg(long)]
        apply: bool,

        /// Write the JSON report to a file instead of stdout
        #[arg(long, short = 'o', value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Report duplicate emails and team name collisions
    Audit {
        /// Write the JSON report to a file instead of stdout
        #[arg(long, short = 'o', value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Collapse teams sharing a normalized name, keeping the earliest
    Dedupe {
        /// Delete the younger duplicates (default is a dry run)
        #[arg(long)]
        apply: bool,

        /// Write the JSON report to a file instead of stdout
        #[arg(long, short = 'o', value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Export registrations as CSV, newest first
    #[command(after_help = "\
Examples:
  rollcall export -o registrations.csv
  rollcall export --residency hosteller --mess-food yes
  rollcall export --year 2024 --course btech")]
    Export {
        /// Write the CSV to a file instead of stdout
        #[arg(long, short = 'o', value_name = "FILE")]
        output: Option<PathBuf>,

        /// Keep teams whose members all share this residency (hosteller, day-scholar)
        #[arg(long, value_name = "KIND")]
        residency: Option<String>,

        /// Keep teams where any member matches this mess preference (yes, no)
        #[arg(long, value_name = "YES|NO")]
        mess_food: Option<String>,

        /// Keep teams with a member whose roll number starts with this year
        #[arg(long, value_name = "YYYY")]
        year: Option<String>,

        /// Keep teams with a member enrolled in this course (btech, bba, bdes, hsb)
        #[arg(long, value_name = "COURSE")]
        course: Option<String>,
    },
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nengine:  rollcall-sync ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   debug",
            "\ntarget:  ", env!("TARGET"),
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nengine:  rollcall-sync ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   release",
            "\ntarget:  ", env!("TARGET"),
        )
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let store_path = cli.store;

    let result = match cli.command {
        Commands::Sync {
            roster,
            submissions,
            apply,
            config,
            output,
        } => cmd_sync(&store_path, roster, submissions, apply, config, output),
        Commands::Fixup { apply, output } => cmd_fixup(&store_path, apply, output),
        Commands::Audit { output } => cmd_audit(&store_path, output),
        Commands::Dedupe { apply, output } => cmd_dedupe(&store_path, apply, output),
        Commands::Export {
            output,
            residency,
            mess_food,
            year,
            course,
        } => cmd_export(&store_path, output, residency, mess_food, year, course),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    fn config(msg: impl Into<String>) -> Self {
        Self { code: EXIT_CONFIG, message: msg.into(), hint: None }
    }

    fn input(msg: impl Into<String>) -> Self {
        Self { code: EXIT_INPUT, message: msg.into(), hint: None }
    }

    fn store(msg: impl Into<String>) -> Self {
        Self { code: EXIT_STORE, message: msg.into(), hint: None }
    }

    fn other(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<SyncError> for CliError {
    fn from(err: SyncError) -> Self {
        let code = match &err {
            SyncError::ConfigParse(_) | SyncError::ConfigValidation(_) => EXIT_CONFIG,
            SyncError::Store(_) => EXIT_STORE,
            SyncError::Render(_) => EXIT_ERROR,
        };
        Self { code, message: err.to_string(), hint: None }
    }
}

// ============================================================================
// sync
// ============================================================================

fn cmd_sync(
    store_path: &Path,
    roster: Option<PathBuf>,
    submissions: Option<PathBuf>,
    apply: bool,
    config: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<(), CliError> {
    if roster.is_none() && submissions.is_none() {
        return Err(CliError::usage("nothing to sync")
            .with_hint("pass --roster <FILE> and/or --submissions <FILE>"));
    }

    let config = load_config(config.as_deref())?;
    let input = SyncInput {
        roster: read_source(roster)?,
        submissions: read_source(submissions)?,
    };

    let mode = run_mode(apply);
    let mut store = open_store(store_path)?;
    let report = run(&mut store, &config, &input, mode, &store_path.display().to_string())?;

    write_json(&report, output.as_deref())?;

    // Human summary to stderr
    for (label, pass) in [("roster", &report.roster), ("submissions", &report.submissions)] {
        if let Some(pass) = pass {
            let s = pass.summary;
            eprintln!(
                "{label}: {} updated, {} inserted, {} unchanged, {} skipped, {} not found ({mode})",
                s.updated, s.inserted, s.unchanged, s.skipped, s.not_found,
            );
        }
    }

    Ok(())
}

// ============================================================================
// fixup
// ============================================================================

fn cmd_fixup(store_path: &Path, apply: bool, output: Option<PathBuf>) -> Result<(), CliError> {
    let mut store = open_store(store_path)?;
    let report = run_fixup(&mut store, run_mode(apply))?;

    write_json(&report, output.as_deref())?;
    eprintln!(
        "fixup: {} teams scanned, {} changed ({})",
        report.scanned,
        report.changed.len(),
        report.mode,
    );
    Ok(())
}

// ============================================================================
// audit
// ============================================================================

fn cmd_audit(store_path: &Path, output: Option<PathBuf>) -> Result<(), CliError> {
    let store = open_store(store_path)?;
    let report = run_audit(&store)?;

    write_json(&report, output.as_deref())?;
    eprintln!(
        "audit: {} teams scanned, {} duplicate emails, {} name collisions",
        report.teams_scanned,
        report.duplicate_emails.len(),
        report.name_collisions.len(),
    );

    if !report.is_clean() {
        return Err(CliError {
            code: EXIT_AUDIT_FINDINGS,
            message: "audit findings present".to_string(),
            hint: None,
        });
    }
    Ok(())
}

// ============================================================================
// dedupe
// ============================================================================

fn cmd_dedupe(store_path: &Path, apply: bool, output: Option<PathBuf>) -> Result<(), CliError> {
    let store = open_store(store_path)?;
    let report = run_dedupe(&store, run_mode(apply))?;

    write_json(&report, output.as_deref())?;
    eprintln!(
        "dedupe: {} teams scanned, {} duplicate groups, {} removed ({})",
        report.scanned,
        report.groups.len(),
        report.removed,
        report.mode,
    );
    Ok(())
}

// ============================================================================
// export
// ============================================================================

fn cmd_export(
    store_path: &Path,
    output: Option<PathBuf>,
    residency: Option<String>,
    mess_food: Option<String>,
    year: Option<String>,
    course: Option<String>,
) -> Result<(), CliError> {
    let filter = ExportFilter {
        residency: residency.as_deref().map(parse_residency).transpose()?,
        mess_food: mess_food.as_deref().map(parse_yes_no).transpose()?,
        year: year.map(validate_year).transpose()?,
        course: course.as_deref().map(parse_course).transpose()?,
    };

    let store = open_store(store_path)?;
    let csv = export_csv(&store, &filter)?;
    let teams = csv.lines().count().saturating_sub(1);

    match output {
        Some(path) => {
            std::fs::write(&path, &csv)
                .map_err(|e| CliError::other(format!("cannot write {}: {}", path.display(), e)))?;
            eprintln!("wrote {}", path.display());
        }
        None => print!("{csv}"),
    }
    eprintln!("export: {} teams", teams);
    Ok(())
}

fn parse_residency(s: &str) -> Result<Residency, CliError> {
    match s.to_ascii_lowercase().as_str() {
        "hosteller" => Ok(Residency::Hosteller),
        "day-scholar" | "day scholar" | "dayscholar" => Ok(Residency::DayScholar),
        _ => Err(CliError::usage(format!("unknown residency {:?}", s))
            .with_hint("expected hosteller or day-scholar")),
    }
}

fn parse_yes_no(s: &str) -> Result<bool, CliError> {
    match s.to_ascii_lowercase().as_str() {
        "yes" => Ok(true),
        "no" => Ok(false),
        _ => Err(CliError::usage(format!("unknown mess preference {:?}", s))
            .with_hint("expected yes or no")),
    }
}

fn validate_year(s: String) -> Result<String, CliError> {
    let trimmed = s.trim();
    if trimmed.len() == 4 && trimmed.chars().all(|c| c.is_ascii_digit()) {
        Ok(trimmed.to_string())
    } else {
        Err(CliError::usage(format!("invalid year {:?}", s))
            .with_hint("expected a four-digit year like 2024"))
    }
}

fn parse_course(s: &str) -> Result<Course, CliError> {
    match s.to_ascii_lowercase().as_str() {
        "btech" | "b.tech" => Ok(Course::BTech),
        "bba" => Ok(Course::BBA),
        "bdes" => Ok(Course::BDes),
        "hsb" => Ok(Course::HSB),
        _ => Err(CliError::usage(format!("unknown course {:?}", s))
            .with_hint("expected btech, bba, bdes or hsb")),
    }
}

// ============================================================================
// Shared plumbing
// ============================================================================

fn run_mode(apply: bool) -> RunMode {
    if apply {
        RunMode::Apply
    } else {
        RunMode::DryRun
    }
}

fn open_store(path: &Path) -> Result<TeamStore, CliError> {
    TeamStore::open(path).map_err(|e| CliError::store(format!("{}: {}", path.display(), e)))
}

fn load_config(path: Option<&Path>) -> Result<SyncConfig, CliError> {
    let Some(path) = path else {
        return Ok(SyncConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::input(format!("{}: {}", path.display(), e)))?;
    SyncConfig::from_toml(&text)
        .map_err(|e| CliError::config(format!("{}: {}", path.display(), e)))
}

fn read_source(path: Option<PathBuf>) -> Result<Option<NamedSource>, CliError> {
    let Some(path) = path else {
        return Ok(None);
    };
    let text = std::fs::read_to_string(&path)
        .map_err(|e| CliError::input(format!("{}: {}", path.display(), e)))?;
    Ok(Some(NamedSource {
        label: path.display().to_string(),
        text,
    }))
}

fn write_json<T: serde::Serialize>(value: &T, output: Option<&Path>) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::other(format!("JSON serialization error: {e}")))?;

    match output {
        Some(path) => {
            std::fs::write(path, &json)
                .map_err(|e| CliError::other(format!("cannot write {}: {}", path.display(), e)))?;
            eprintln!("wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
