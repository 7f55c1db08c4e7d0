//! `rollcall-store` — SQLite-backed document store for team records.
//!
//! One JSON document per team, with a unique case-insensitive index on the
//! team name (`name_key`). The handle is an explicit value owned by the
//! caller; there is no process-wide connection state.

use std::fmt;
use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};

use rollcall_model::{name_key, CanonicalTeam, TeamPatch};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS teams (
    id       INTEGER PRIMARY KEY,
    name_key TEXT NOT NULL UNIQUE,
    doc      TEXT NOT NULL
);
";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum StoreError {
    /// Cannot open or initialize the database.
    Open(String),
    /// A team with the same case-insensitive name already exists.
    DuplicateName(String),
    /// No row with the given id.
    NotFound(i64),
    /// A stored document failed to decode.
    Corrupt { id: i64, msg: String },
    /// A document failed to encode.
    Encode(String),
    /// Underlying SQLite error.
    Sql(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open(msg) => write!(f, "cannot open store: {msg}"),
            Self::DuplicateName(name) => write!(f, "team '{name}' already exists"),
            Self::NotFound(id) => write!(f, "no team with id {id}"),
            Self::Corrupt { id, msg } => write!(f, "team {id}: corrupt document: {msg}"),
            Self::Encode(msg) => write!(f, "cannot encode document: {msg}"),
            Self::Sql(msg) => write!(f, "store error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Sql(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// A team document with its row id.
#[derive(Debug, Clone)]
pub struct StoredTeam {
    pub id: i64,
    pub team: CanonicalTeam,
}

pub struct TeamStore {
    conn: Connection,
}

impl TeamStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|e| StoreError::Open(e.to_string()))?;
        conn.execute_batch(SCHEMA)
            .map_err(|e| StoreError::Open(e.to_string()))?;
        Ok(TeamStore { conn })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|e| StoreError::Open(e.to_string()))?;
        conn.execute_batch(SCHEMA)
            .map_err(|e| StoreError::Open(e.to_string()))?;
        Ok(TeamStore { conn })
    }

    pub fn count(&self) -> Result<usize, StoreError> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM teams", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    /// All teams, ordered by row id (insertion order).
    pub fn find_all(&self) -> Result<Vec<StoredTeam>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT id, doc FROM teams ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
        })?;
        let mut out = Vec::new();
        for row in rows {
            let (id, doc) = row?;
            out.push(StoredTeam {
                id,
                team: decode(id, &doc)?,
            });
        }
        Ok(out)
    }

    pub fn find_by_name_ci(&self, name: &str) -> Result<Option<StoredTeam>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT id, doc FROM teams WHERE name_key = ?1")?;
        let row = stmt
            .query_row(params![name_key(name)], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
            })
            .optional()?;
        match row {
            Some((id, doc)) => Ok(Some(StoredTeam {
                id,
                team: decode(id, &doc)?,
            })),
            None => Ok(None),
        }
    }

    pub fn insert(&self, team: &CanonicalTeam) -> Result<i64, StoreError> {
        let doc = serde_json::to_string(team).map_err(|e| StoreError::Encode(e.to_string()))?;
        let result = self.conn.execute(
            "INSERT INTO teams (name_key, doc) VALUES (?1, ?2)",
            params![team.name_key(), doc],
        );
        match result {
            Ok(_) => Ok(self.conn.last_insert_rowid()),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(StoreError::DuplicateName(team.name.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Applies a partial update inside one transaction. Fields the patch
    /// leaves unset are untouched; `name_key` follows the document.
    pub fn update(&mut self, id: i64, patch: &TeamPatch) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        let doc: Option<String> = tx
            .query_row("SELECT doc FROM teams WHERE id = ?1", params![id], |row| {
                row.get(0)
            })
            .optional()?;
        let Some(doc) = doc else {
            return Err(StoreError::NotFound(id));
        };
        let mut team = decode(id, &doc)?;
        patch.apply(&mut team);
        let updated = serde_json::to_string(&team).map_err(|e| StoreError::Encode(e.to_string()))?;
        tx.execute(
            "UPDATE teams SET name_key = ?1, doc = ?2 WHERE id = ?3",
            params![team.name_key(), updated, id],
        )?;
        tx.commit()?;
        Ok(())
    }

    pub fn delete(&self, id: i64) -> Result<(), StoreError> {
        let n = self
            .conn
            .execute("DELETE FROM teams WHERE id = ?1", params![id])?;
        if n == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}

fn decode(id: i64, doc: &str) -> Result<CanonicalTeam, StoreError> {
    serde_json::from_str(doc).map_err(|e| StoreError::Corrupt {
        id,
        msg: e.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
