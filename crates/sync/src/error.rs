use std::fmt;

#[derive(Debug)]
pub enum SyncError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (non-normalized alias key, empty target).
    ConfigValidation(String),
    /// Store operation failed.
    Store(String),
    /// Report or CSV rendering failed.
    Render(String),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::Store(msg) => write!(f, "store error: {msg}"),
            Self::Render(msg) => write!(f, "render error: {msg}"),
        }
    }
}

impl std::error::Error for SyncError {}

impl From<rollcall_store::StoreError> for SyncError {
    fn from(e: rollcall_store::StoreError) -> Self {
        SyncError::Store(e.to_string())
    }
}
