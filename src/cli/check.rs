//! Execute query lines against JSON input

use super::CliError;
use crate::{
    CommandProcessor, Document, NumberPolicy,
    convert::validate_strict,
    output::{to_text, to_text_pretty},
    query::resolve,
};

/// How input text becomes a [`Document`]
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    /// Integer/float classification for numeric literals
    pub policy: NumberPolicy,
    /// Reject input that is not well-formed JSON instead of parsing leniently
    pub strict: bool,
}

/// Options for the query command
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// Command lines, each run on a fresh query
    pub queries: Vec<String>,
    /// JSON input string
    pub input: Option<String>,
    pub load: LoadOptions,
}

/// Options for the show command
#[derive(Debug, Clone, Default)]
pub struct ShowOptions {
    /// Path to render; empty for the whole document
    pub path: String,
    /// JSON input string
    pub input: Option<String>,
    pub load: LoadOptions,
    /// Indent the output
    pub pretty: bool,
}

pub fn load_document(input: &str, options: &LoadOptions) -> Result<Document, CliError> {
    if options.strict {
        validate_strict(input)?;
    }
    Ok(Document::parse_with(input, options.policy)?)
}

/// Runs every query line, returning one result per line
pub fn execute_queries(options: &QueryOptions) -> Result<Vec<Option<String>>, CliError> {
    let input = options.input.as_ref().ok_or(CliError::NoInput)?;
    let document = load_document(input, &options.load)?;
    let processor = CommandProcessor::new(&document);

    Ok(options
        .queries
        .iter()
        .map(|line| processor.process(line))
        .collect())
}

/// Renders the subtree at `path`
pub fn execute_show(options: &ShowOptions) -> Result<String, CliError> {
    let input = options.input.as_ref().ok_or(CliError::NoInput)?;
    let document = load_document(input, &options.load)?;
    let node = resolve(document.root(), &options.path)?;

    Ok(if options.pretty {
        to_text_pretty(node)
    } else {
        to_text(node)
    })
}
