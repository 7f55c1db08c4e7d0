//! Canonicalization of free-text spreadsheet fields.
//!
//! Every function is total: unrecognized input falls back to a default or
//! passes through unchanged, never errors.

use std::sync::OnceLock;

use regex::Regex;

use rollcall_model::{Course, Residency};

fn separator_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\s_-]+").unwrap())
}

fn bare_room() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{3,4}$").unwrap())
}

// Building digit may be zero-padded ("EB02-205"), the room optionally
// parenthesized ("EB-2 (202)").
fn building_room() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^eb\s*-?\s*0*(\d)\s*[-\s]*\(?\s*(\d{3,4})\s*\)?$").unwrap())
}

fn building_only() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^eb\s*-?\s*\d$").unwrap())
}

pub fn normalize_course(s: &str) -> Course {
    match s.trim().to_lowercase().as_str() {
        "btech" | "b.tech" => Course::BTech,
        "bba" => Course::BBA,
        "bdes" => Course::BDes,
        "hsb" => Course::HSB,
        _ => Course::BTech,
    }
}

pub fn normalize_residency(s: &str) -> Residency {
    if s.to_lowercase().contains("host") {
        Residency::Hosteller
    } else {
        Residency::DayScholar
    }
}

pub fn normalize_mess_food(s: &str) -> bool {
    s.trim().eq_ignore_ascii_case("yes")
}

/// Lookup key for a team name: lowercased, separator runs collapsed to a
/// single space, trimmed. Never stored.
pub fn normalize_team_name(s: &str) -> String {
    separator_runs()
        .replace_all(&s.to_lowercase(), " ")
        .trim()
        .to_string()
}

/// Canonical room spelling, `"EB{building} - {room}"`. A bare room number
/// is assumed to be in building 2; a bare building keeps no room part.
/// Unrecognized input passes through unchanged.
pub fn normalize_room_number(s: &str) -> String {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    if bare_room().is_match(trimmed) {
        return format!("EB2 - {trimmed}");
    }
    if let Some(caps) = building_room().captures(trimmed) {
        return format!("EB{} - {}", &caps[1], &caps[2]);
    }
    if building_only().is_match(trimmed) {
        return trimmed
            .to_uppercase()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
    }
    trimmed.to_string()
}

/// Check-in column: only a literal "in" counts.
pub fn checkin_flag(s: &str) -> bool {
    s.trim().eq_ignore_ascii_case("in")
}

/// Extension-board column. The typo spellings occur in the historical
/// sheets and are accepted as-is.
pub fn board_flag(s: &str) -> bool {
    matches!(s.trim().to_lowercase().as_str(), "yes" | "yers" | "yez")
}

/// Last-resort matching key: every separator class stripped.
pub fn fuzzy_key(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-' && *c != '.')
        .collect()
}

/// Phone numbers are stored without any whitespace.
pub fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Collapses newlines and whitespace runs to single spaces.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
