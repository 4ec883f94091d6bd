//! Text front end for [`Query`]: one line such as
//! `select('students').filter(index>1).count()` is split into commands and
//! run against a fresh query.
//!
//! A line is a chain of `name(argument)` segments joined by `.`. The
//! argument runs to the matching `)`, so `filter(contains('x'))` keeps its
//! inner call; parentheses inside single quotes are not counted, unless a
//! quote is never closed, in which case the first `)` ends it. Parsing
//! stops at the first segment not followed by `.`; whatever comes after it
//! (a `// comment`, say) is ignored.

use std::fmt;

use crate::{
    document::Document,
    format::format_sum,
    query::{Query, QueryError},
};

/// One segment of a command chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Select(String),
    Filter(String),
    Count,
    Sum,
    Get(String),
}

const COMMAND_NAMES: [&str; 5] = ["select", "filter", "count", "sum", "get"];

impl Command {
    fn from_parts(name: &str, argument: &str) -> Option<Self> {
        let argument = argument.to_string();
        match name {
            "select" => Some(Command::Select(argument)),
            "filter" => Some(Command::Filter(argument)),
            "count" => Some(Command::Count),
            "sum" => Some(Command::Sum),
            "get" => Some(Command::Get(argument)),
            _ => None,
        }
    }
}

/// Why a command line produced no result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The segment does not start with a known command name
    UnknownCommand(String),

    /// A command name that is not followed by `(`
    MissingArgument(String),

    /// No `)` closes the argument
    UnclosedArgument(String),

    /// The filter expression was rejected
    Filter(QueryError),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::UnknownCommand(rest) => write!(f, "Unknown command at '{}'", rest),
            CommandError::MissingArgument(name) => write!(f, "Expected '(' after '{}'", name),
            CommandError::UnclosedArgument(name) => {
                write!(f, "Missing ')' after the argument of '{}'", name)
            }
            CommandError::Filter(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CommandError::Filter(e) => Some(e),
            _ => None,
        }
    }
}

impl From<QueryError> for CommandError {
    fn from(e: QueryError) -> Self {
        CommandError::Filter(e)
    }
}

/// Splits a command line into its chain of commands.
///
/// ```
/// use json_proc::command::{parse_chain, Command};
///
/// assert_eq!(
///     parse_chain("select('a').filter(index>1).count()").unwrap(),
///     vec![
///         Command::Select("'a'".to_string()),
///         Command::Filter("index>1".to_string()),
///         Command::Count,
///     ]
/// );
/// assert_eq!(
///     parse_chain("filter(contains('oo')).sum()").unwrap(),
///     vec![Command::Filter("contains('oo')".to_string()), Command::Sum]
/// );
/// assert!(parse_chain("select('a').explode()").is_err());
/// ```
pub fn parse_chain(line: &str) -> Result<Vec<Command>, CommandError> {
    let mut rest = line.trim_start();
    let mut commands = Vec::new();

    loop {
        let name = COMMAND_NAMES
            .iter()
            .find(|name| rest.starts_with(**name))
            .ok_or_else(|| CommandError::UnknownCommand(rest.to_string()))?;
        rest = &rest[name.len()..];

        rest = rest
            .strip_prefix('(')
            .ok_or_else(|| CommandError::MissingArgument(name.to_string()))?;
        let end = closing_paren(rest)
            .ok_or_else(|| CommandError::UnclosedArgument(name.to_string()))?;

        if let Some(command) = Command::from_parts(name, &rest[..end]) {
            commands.push(command);
        }
        rest = &rest[end + 1..];

        match rest.strip_prefix('.') {
            Some(next) => rest = next,
            None => break,
        }
    }

    Ok(commands)
}

/// Byte offset of the `)` closing an argument that starts at `text`.
///
/// A quote left open means the `'` belonged to a key such as `it's`; the
/// argument then ends at the first `)`.
fn closing_paren(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut quoted = false;

    for (at, ch) in text.char_indices() {
        match ch {
            '\'' => quoted = !quoted,
            '(' if !quoted => depth += 1,
            ')' if !quoted => {
                if depth == 0 {
                    return Some(at);
                }
                depth -= 1;
            }
            _ => {}
        }
    }

    if quoted { text.find(')') } else { None }
}

/// Runs command lines against one document, each line on a new [`Query`].
pub struct CommandProcessor<'a> {
    document: &'a Document,
}

impl<'a> CommandProcessor<'a> {
    pub fn new(document: &'a Document) -> Self {
        CommandProcessor { document }
    }

    /// Output of the last command in the line, `None` on any error.
    ///
    /// `count` renders as an integer, `sum` through
    /// [`format_sum`], `get` as canonical text; `select` and `filter`
    /// produce no output of their own.
    ///
    /// ```
    /// use json_proc::{CommandProcessor, Document};
    ///
    /// let doc = Document::parse(r#"{"prices": [1.25, 2.25, "n/a"]}"#).unwrap();
    /// let processor = CommandProcessor::new(&doc);
    ///
    /// assert_eq!(processor.process("select('prices').sum()"), Some("3.5".to_string()));
    /// assert_eq!(processor.process("select('prices')"), None);
    /// assert_eq!(processor.process("select('prices').size()"), None);
    /// ```
    pub fn process(&self, line: &str) -> Option<String> {
        self.try_process(line).unwrap_or_else(|e| {
            log::debug!("'{}': {}", line, e);
            None
        })
    }

    pub fn try_process(&self, line: &str) -> Result<Option<String>, CommandError> {
        let commands = parse_chain(line)?;
        let mut query = self.document.query();
        let mut output = None;

        for command in &commands {
            output = run(&mut query, command)?;
        }
        Ok(output)
    }
}

fn run(query: &mut Query<'_>, command: &Command) -> Result<Option<String>, CommandError> {
    let output = match command {
        Command::Select(path) => {
            query.select(path);
            None
        }
        Command::Filter(expr) => {
            query.filter(expr)?;
            None
        }
        Command::Count => Some(query.count().to_string()),
        Command::Sum => Some(format_sum(query.sum())),
        Command::Get(key) => query.get(key),
    };
    Ok(output)
}
