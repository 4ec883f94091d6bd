//! Query scripts: a JSON file name on the first line, then one
//! `<query> // <expected>` pair per line.
//!
//! ```text
//! classroom.json
//! select('location').get('roomNumber') // 247
//! select('students').filter(index>1).count() // 2
//! select('location.uh_oh').get('nope') // ~~empty~~
//! ```
//!
//! Output and expectation are compared with all whitespace removed, so
//! `{"a": 1}` matches `{"a":1}`.

use std::{
    fs,
    path::{Path, PathBuf},
};

use super::{CliError, LoadOptions, load_document};
use crate::{CommandProcessor, Document};

/// Stands in for "no result" on the expected side of a script line
pub const EMPTY_MARKER: &str = "~~empty~~";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    /// 1-based line number in the script
    pub number: usize,
    pub query: String,
    /// `None` when the line has no `//` separator
    pub expected: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    pub json_file: String,
    pub lines: Vec<ScriptLine>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptOutcome {
    pub line: ScriptLine,
    pub actual: Option<String>,
    pub passed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ScriptReport {
    pub outcomes: Vec<ScriptOutcome>,
}

impl ScriptReport {
    pub fn passed(&self) -> bool {
        self.outcomes.iter().all(|o| o.passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &ScriptOutcome> {
        self.outcomes.iter().filter(|o| !o.passed)
    }

    /// `Ok` when every line passed
    pub fn into_result(self) -> Result<Self, CliError> {
        let failed = self.failures().count();
        if failed == 0 {
            Ok(self)
        } else {
            Err(CliError::ScriptFailed {
                failed,
                total: self.outcomes.len(),
            })
        }
    }
}

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

pub fn parse_script(text: &str) -> Result<Script, CliError> {
    let mut lines = text.lines();
    let json_file = lines
        .next()
        .map(str::trim)
        .filter(|name| name.ends_with(".json"))
        .ok_or(CliError::MissingJsonTarget)?
        .to_string();

    let lines = lines
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            let (query, expected) = match line.find("//") {
                Some(at) => (&line[..at], Some(line[at + 2..].trim().to_string())),
                None => (line, None),
            };
            ScriptLine {
                number: i + 2,
                query: query.trim().to_string(),
                expected,
            }
        })
        .collect();

    Ok(Script { json_file, lines })
}

impl Script {
    /// Runs every line against `document`
    pub fn run(&self, document: &Document) -> ScriptReport {
        let processor = CommandProcessor::new(document);
        let outcomes = self
            .lines
            .iter()
            .map(|line| {
                let actual = processor.process(&line.query);
                let shown = actual.as_deref().unwrap_or(EMPTY_MARKER);
                let passed = line
                    .expected
                    .as_deref()
                    .is_some_and(|expected| strip_whitespace(shown) == strip_whitespace(expected));
                if !passed {
                    log::debug!("script line {} failed: got '{}'", line.number, shown);
                }
                ScriptOutcome {
                    line: line.clone(),
                    actual,
                    passed,
                }
            })
            .collect();
        ScriptReport { outcomes }
    }

    /// Where the JSON file lives, relative to `resources`
    pub fn json_path(&self, resources: &Path) -> PathBuf {
        resources.join(&self.json_file)
    }
}

/// Reads a script, loads the JSON it names from `resources`, runs it
pub fn run_script_file(
    script: &Path,
    resources: &Path,
    options: &LoadOptions,
) -> Result<ScriptReport, CliError> {
    let script = parse_script(&fs::read_to_string(script)?)?;
    let input = fs::read_to_string(script.json_path(resources))?;
    let document = load_document(&input, options)?;
    Ok(script.run(&document))
}
