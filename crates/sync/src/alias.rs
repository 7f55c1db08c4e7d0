//! Built-in team-name alias tables.
//!
//! Keys are normalized names ([`crate::normalize::normalize_team_name`]
//! form); values are the canonical spelling as stored. The entries cover
//! spellings observed in the historical exports. User config extends or
//! overrides these tables.

use std::collections::BTreeMap;

fn table(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Known roster-export spellings that map onto existing stored teams.
pub fn default_roster_aliases() -> BTreeMap<String, String> {
    table(&[
        ("vad", "Team VAD"),
        ("errror404", "Error 404"),
        ("akira", "Akira"),
        ("knight vision", "knight vision"),
    ])
}

/// Known submission-form spellings.
pub fn default_submission_aliases() -> BTreeMap<String, String> {
    table(&[
        ("jklufiles", "Jklufi"),
        ("team", "team"),
        ("wi wi club", "Wi-Wi Club"),
        ("she codes", "SheCodes"),
        ("error 404", "Error 404"),
        ("runtime t.error", "Runtime T.EEROR"),
        ("hackathon tech", "Hackathon_tech"),
        ("brain codes", "Braincodes"),
        ("next gen innovators", "NextGen Innovators"),
        ("webwarriors", "Web warriors"),
        ("team sparkx", "spark x"),
        ("team paradise", "Team Paradise"),
        ("codera clan", "Codera Clan"),
        ("logic loop", "Logicloop"),
        ("not coders", "Not coders"),
        ("bug slayers", "Bugslayers"),
        ("ghost protocol", "ghost protocol"),
        ("the 404s", "THE 404s"),
        ("ai avengers", "AI Avengers"),
        ("terminal stackers", "TERMINAL STACKERS"),
        ("vad", "Team VAD"),
        ("out of bounds", "out of bounce"),
        ("dream debuggers", "Dream debugger"),
        ("knight vision", "Knight Vision"),
        ("fantastic 4", "Fantastic 4"),
        ("rapid resolve", "Rapid resolve"),
        ("syntax error", "syntax error"),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_team_name;

    #[test]
    fn keys_are_in_normalized_form() {
        for table in [default_roster_aliases(), default_submission_aliases()] {
            for key in table.keys() {
                assert_eq!(*key, normalize_team_name(key), "bad key: {key}");
            }
        }
    }

    #[test]
    fn roster_table_maps_vad() {
        assert_eq!(
            default_roster_aliases().get("vad").map(String::as_str),
            Some("Team VAD")
        );
    }
}
