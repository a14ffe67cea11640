//! dlreview - review recently downloaded files from the terminal
//!
//! The review core (scanner, queue, executor, session) is headless; the
//! binary drives it from a ratatui screen.

pub mod async_preview;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod file_opener;
pub mod logging;
pub mod preview;
pub mod session;
pub mod tui;

// Re-export primary types for convenience
pub use config::UserConfig;
pub use domain::{
    scan, scan_recent, Action, ActionExecutor, ActionOutcome, DecisionStatistics, FileCategory,
    FileRecord, ReviewQueue, ReviewStatus, ScanOptions, TimeBasis,
};
pub use error::{Result, ReviewError};
pub use file_opener::open_file;
pub use session::{ReviewSession, SessionEvent, SessionOptions, ViewState};
