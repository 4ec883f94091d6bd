//! Support for the `json-proc` binary: loading documents, running query
//! lines and running query scripts.
//!
//! Kept in the library so the same behavior can be driven from tests or
//! embedded in other tools.

mod check;
mod script;

pub use check::{
    LoadOptions, QueryOptions, ShowOptions, execute_queries, execute_show, load_document,
};
pub use script::{
    EMPTY_MARKER, Script, ScriptLine, ScriptOutcome, ScriptReport, parse_script, run_script_file,
};

use std::io;

/// Errors that can occur during CLI operations
#[derive(Debug)]
pub enum CliError {
    /// Parser error
    Parse(crate::ParseError),
    /// Input rejected by strict validation
    Json(serde_json::Error),
    /// IO error
    Io(io::Error),
    /// Path given to `show` did not resolve
    Path(crate::PathError),
    /// No input provided
    NoInput,
    /// Script does not name a JSON file on its first line
    MissingJsonTarget,
    /// Script ran but some lines did not match
    ScriptFailed { failed: usize, total: usize },
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Parse(e) => write!(f, "Parse error: {}", e),
            CliError::Json(e) => write!(f, "Invalid JSON: {}", e),
            CliError::Io(e) => write!(f, "IO error: {}", e),
            CliError::Path(e) => write!(f, "Path error: {}", e),
            CliError::NoInput => write!(f, "No input provided. Use --input or pipe JSON to stdin."),
            CliError::MissingJsonTarget => {
                write!(f, "Script must name a .json file on its first line")
            }
            CliError::ScriptFailed { failed, total } => {
                write!(f, "{} of {} script line(s) failed", failed, total)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Parse(e) => Some(e),
            CliError::Json(e) => Some(e),
            CliError::Io(e) => Some(e),
            CliError::Path(e) => Some(e),
            _ => None,
        }
    }
}

impl From<crate::ParseError> for CliError {
    fn from(e: crate::ParseError) -> Self {
        CliError::Parse(e)
    }
}

impl From<crate::PathError> for CliError {
    fn from(e: crate::PathError) -> Self {
        CliError::Path(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Json(e)
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}
