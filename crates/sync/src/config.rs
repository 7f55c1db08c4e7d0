use std::collections::BTreeMap;

use serde::Deserialize;

use crate::alias::{default_roster_aliases, default_submission_aliases};
use crate::error::SyncError;
use crate::normalize::normalize_team_name;

// ---------------------------------------------------------------------------
// Resolved config
// ---------------------------------------------------------------------------

/// Alias tables used by name resolution, keyed by normalized source name.
///
/// Starts from the built-in tables in [`crate::alias`]; entries loaded from a
/// TOML file are merged on top, so a user entry overrides a built-in one with
/// the same key.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub roster_aliases: BTreeMap<String, String>,
    pub submission_aliases: BTreeMap<String, String>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            roster_aliases: default_roster_aliases(),
            submission_aliases: default_submission_aliases(),
        }
    }
}

// ---------------------------------------------------------------------------
// File shape
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    aliases: AliasTables,
}

#[derive(Debug, Default, Deserialize)]
struct AliasTables {
    #[serde(default)]
    roster: BTreeMap<String, String>,
    #[serde(default)]
    submissions: BTreeMap<String, String>,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl SyncConfig {
    pub fn from_toml(input: &str) -> Result<Self, SyncError> {
        let file: ConfigFile =
            toml::from_str(input).map_err(|e| SyncError::ConfigParse(e.to_string()))?;

        let mut config = SyncConfig::default();
        config.roster_aliases.extend(file.aliases.roster);
        config.submission_aliases.extend(file.aliases.submissions);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SyncError> {
        for (table_name, table) in [
            ("roster", &self.roster_aliases),
            ("submissions", &self.submission_aliases),
        ] {
            for (key, target) in table {
                if key.is_empty() || target.is_empty() {
                    return Err(SyncError::ConfigValidation(format!(
                        "aliases.{table_name}: empty key or target"
                    )));
                }
                // Lookups happen on normalized names; a key that is not its
                // own normalized form can never match.
                if *key != normalize_team_name(key) {
                    return Err(SyncError::ConfigValidation(format!(
                        "aliases.{table_name}: key '{key}' is not in normalized form \
                         (expected '{}')",
                        normalize_team_name(key)
                    )));
                }
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
