use std::collections::BTreeMap;

use serde::Serialize;

use crate::normalize::{fuzzy_key, normalize_team_name};

// ---------------------------------------------------------------------------
// Match stage
// ---------------------------------------------------------------------------

/// Which lookup stage produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStage {
    Direct,
    Alias,
    Fuzzy,
}

impl std::fmt::Display for MatchStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Direct => write!(f, "direct"),
            Self::Alias => write!(f, "alias"),
            Self::Fuzzy => write!(f, "fuzzy"),
        }
    }
}

// ---------------------------------------------------------------------------
// Resolution outcome
// ---------------------------------------------------------------------------

/// Outcome of resolving one source name against the stored teams.
///
/// `Found` carries the index of the matched team in the order the names were
/// fed to [`LookupMap::build`]. A fuzzy stage that lands on more than one
/// stored team is surfaced as `Ambiguous` rather than picking one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found { index: usize, stage: MatchStage },
    Ambiguous { candidates: Vec<String> },
    NotFound,
}

/// Two stored names that collapse to the same normalized key.
///
/// The first one seen claims the key; later ones are shadowed and excluded
/// from lookup entirely so a fuzzy probe cannot split between them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameCollision {
    pub normalized: String,
    pub kept: String,
    pub shadowed: String,
}

// ---------------------------------------------------------------------------
// Lookup map
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct LookupMap {
    by_norm: BTreeMap<String, usize>,
    by_fuzzy: BTreeMap<String, Vec<usize>>,
    names: Vec<String>,
    pub collisions: Vec<NameCollision>,
}

impl LookupMap {
    /// Index a list of stored team names. Order defines the `index` values
    /// returned by [`LookupMap::resolve`].
    pub fn build<'a, I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut map = LookupMap {
            by_norm: BTreeMap::new(),
            by_fuzzy: BTreeMap::new(),
            names: Vec::new(),
            collisions: Vec::new(),
        };
        for name in names {
            let index = map.names.len();
            map.names.push(name.to_string());

            let norm = normalize_team_name(name);
            if norm.is_empty() {
                continue;
            }
            if let Some(&kept) = map.by_norm.get(&norm) {
                map.collisions.push(NameCollision {
                    normalized: norm,
                    kept: map.names[kept].clone(),
                    shadowed: name.to_string(),
                });
                continue;
            }
            map.by_norm.insert(norm, index);
            map.by_fuzzy.entry(fuzzy_key(name)).or_default().push(index);
        }
        map
    }

    /// Resolve a source-file team name: direct normalized match, then the
    /// alias table, then fuzzy. First stage that hits wins.
    pub fn resolve(&self, source_name: &str, aliases: &BTreeMap<String, String>) -> Resolution {
        let norm = normalize_team_name(source_name);

        if let Some(&index) = self.by_norm.get(&norm) {
            return Resolution::Found {
                index,
                stage: MatchStage::Direct,
            };
        }

        if let Some(target) = aliases.get(&norm) {
            if let Some(&index) = self.by_norm.get(&normalize_team_name(target)) {
                return Resolution::Found {
                    index,
                    stage: MatchStage::Alias,
                };
            }
        }

        let key = fuzzy_key(source_name);
        if key.is_empty() {
            return Resolution::NotFound;
        }
        match self.by_fuzzy.get(&key).map(Vec::as_slice) {
            Some([index]) => Resolution::Found {
                index: *index,
                stage: MatchStage::Fuzzy,
            },
            Some(indices) if indices.len() > 1 => Resolution::Ambiguous {
                candidates: indices.iter().map(|&i| self.names[i].clone()).collect(),
            },
            _ => Resolution::NotFound,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
