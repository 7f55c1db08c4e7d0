//! CLI Exit Code Registry
//!
//! Defines all exit codes used by the rollcall CLI. This module is the
//! single source of truth; no other file may hard-code a process exit
//! status. Exit codes are a shell contract — scripts and CI jobs rely
//! on them, so changing a value is a breaking change.
//!
//! # Exit Code Ranges
//!
//! | Range | Domain    | Description                         |
//! |-------|-----------|-------------------------------------|
//! | 0-2   | Universal | Success, general error, usage error |
//! | 3-9   | Pipeline  | Config, input and store failures    |
//! | 10-19 | Audit     | Consistency findings                |
//!
//! # Adding New Exit Codes
//!
//! 1. Pick the range that matches the failure domain.
//! 2. Take the next free value in that range.
//! 3. Document the trigger condition on the constant.
//! 4. Extend the CLI tests that pin the code.

// ============================================================================
// Universal Codes (0-2)
// ============================================================================

/// Command completed.
///
/// Dry-run reports, skipped teams and not-found names are report
/// content, not failures.
pub const EXIT_SUCCESS: u8 = 0;

/// Unexpected error with no more specific code.
///
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Command line usage error (bad flag value, missing input).
///
/// Matches the code clap itself exits with on unknown flags.
pub const EXIT_USAGE: u8 = 2;

// ============================================================================
// Pipeline Codes (3-9)
// ============================================================================

/// Config file failed to parse or validate.
pub const EXIT_CONFIG: u8 = 3;

/// An input file could not be read.
pub const EXIT_INPUT: u8 = 4;

/// Store failure (cannot open, corrupt document, write error).
pub const EXIT_STORE: u8 = 5;

// ============================================================================
// Audit Codes (10-19)
// ============================================================================

/// Audit found violations (duplicate emails or name collisions).
///
/// Distinct from success so `rollcall audit` can gate a pipeline.
pub const EXIT_AUDIT_FINDINGS: u8 = 10;
