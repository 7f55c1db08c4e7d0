//! `rollcall-sync` — reconciliation between spreadsheet exports and the
//! team store.
//!
//! Pure engine crate: receives file contents as strings and an open store
//! handle, returns serializable reports. No CLI or filesystem access.

pub mod aggregate;
pub mod alias;
pub mod audit;
pub mod config;
pub mod csv;
pub mod dedupe;
pub mod diff;
pub mod engine;
pub mod error;
pub mod export;
pub mod fixup;
pub mod normalize;
pub mod report;
pub mod resolve;
pub mod source;

pub use audit::run_audit;
pub use config::SyncConfig;
pub use dedupe::run_dedupe;
pub use engine::{run, NamedSource, SyncInput};
pub use error::SyncError;
pub use export::{export_csv, ExportFilter};
pub use fixup::run_fixup;
pub use report::{RunMode, SyncReport};
