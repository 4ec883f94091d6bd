use std::fmt;

use crate::{
    document::Document,
    filter::{FilterPolicy, Position},
    format::round_hundredths,
    output::to_text,
    value::{Object, Value},
};

/// Why a path did not resolve
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The object has no member with this name
    MissingKey(String),

    /// The array is shorter than the index
    IndexOutOfRange { index: usize, len: usize },

    /// A non-numeric segment was applied to an array
    InvalidIndex(String),

    /// The path continues below a scalar
    NotAContainer { segment: String, found: &'static str },
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathError::MissingKey(key) => write!(f, "Key '{}' not found", key),
            PathError::IndexOutOfRange { index, len } => {
                write!(f, "Index {} out of range for array of length {}", index, len)
            }
            PathError::InvalidIndex(segment) => write!(f, "Invalid array index '{}'", segment),
            PathError::NotAContainer { segment, found } => {
                write!(f, "Cannot look up '{}' in a {}", segment, found)
            }
        }
    }
}

impl std::error::Error for PathError {}

/// Errors raised by query operations that reject their argument outright
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// `filter(...)` argument is neither `index <op> N` nor `contains('...')`
    InvalidFilter(String),
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::InvalidFilter(expr) => write!(f, "Invalid filter expression: '{}'", expr),
        }
    }
}

impl std::error::Error for QueryError {}

/// Splits a path on `.` and strips the single quotes around each segment.
///
/// ```
/// use json_proc::query::split_path;
///
/// assert_eq!(split_path("'students'.3"), vec!["students", "3"]);
/// assert_eq!(split_path("'a.b.c'"), vec!["a", "b", "c"]);
/// assert!(split_path("").is_empty());
/// ```
pub fn split_path(path: &str) -> Vec<String> {
    if path.trim().is_empty() {
        return Vec::new();
    }

    path.split('.')
        .map(|segment| segment.trim().trim_matches('\'').trim().to_string())
        .collect()
}

fn step<'v>(node: &'v Value, segment: &str) -> Result<&'v Value, PathError> {
    match node {
        Value::Array(arr) => {
            let index = segment
                .parse::<usize>()
                .map_err(|_| PathError::InvalidIndex(segment.to_string()))?;
            arr.get(index).ok_or(PathError::IndexOutOfRange {
                index,
                len: arr.len(),
            })
        }
        Value::Object(obj) => obj
            .get(segment)
            .ok_or_else(|| PathError::MissingKey(segment.to_string())),
        other => Err(PathError::NotAContainer {
            segment: segment.to_string(),
            found: other.type_name(),
        }),
    }
}

/// Walks `path` down from `root`. An empty path resolves to `root` itself.
pub fn resolve<'v>(root: &'v Value, path: &str) -> Result<&'v Value, PathError> {
    split_path(path)
        .iter()
        .try_fold(root, |node, segment| step(node, segment))
}

/// A chainable query over a [`Document`].
///
/// The query holds a working node, initially the document root, that each
/// `select` narrows. A `filter` applies to the next `count`, `sum` or `get`
/// only; each of those clears it.
///
/// The working node borrows from the document, so nothing is copied by
/// `select` and the document stays frozen while the query lives.
///
/// A path that fails to resolve puts the query into an error state for the
/// rest of its life: further `select` calls do nothing, `count` and `sum`
/// return 0 and `get` returns `None`.
///
/// # Examples
///
/// ```
/// use json_proc::Document;
///
/// let doc = Document::parse(r#"{"students": [{}, {}, {}, null]}"#).unwrap();
///
/// let mut query = doc.query();
/// assert_eq!(query.select("'students'").filter("index > 1").unwrap().count(), 2);
///
/// // The filter was used up by `count`.
/// assert_eq!(query.count(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct Query<'a> {
    working: &'a Value,
    filter: FilterPolicy,
    error: Option<PathError>,
}

impl<'a> Query<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self::from_value(document.root())
    }

    /// Queries an arbitrary subtree
    pub fn from_value(root: &'a Value) -> Self {
        Query {
            working: root,
            filter: FilterPolicy::None,
            error: None,
        }
    }

    /// Narrows the working node to `path`, relative to the current one
    pub fn select(&mut self, path: &str) -> &mut Self {
        if let Some(e) = &self.error {
            log::debug!("select('{}') skipped, query already failed: {}", path, e);
            return self;
        }

        match resolve(self.working, path) {
            Ok(node) => self.working = node,
            Err(e) => self.fail(path, e),
        }
        self
    }

    /// Sets the filter for the next aggregate, replacing any pending one
    pub fn filter(&mut self, expr: &str) -> Result<&mut Self, QueryError> {
        let policy = FilterPolicy::parse(expr).inspect_err(|e| log::debug!("{}", e))?;
        Ok(self.with_filter(policy))
    }

    pub fn with_filter(&mut self, policy: FilterPolicy) -> &mut Self {
        log::debug!("filter set to {}", policy);
        self.filter = policy;
        self
    }

    /// Number of admitted children. Scalars count as 0.
    pub fn count(&mut self) -> usize {
        let count = match self.current() {
            Some(node) if node.is_container() => self.admitted(node).len(),
            _ => 0,
        };
        self.filter.clear();
        count
    }

    /// Sum of the admitted numeric children, rounded to two decimals.
    ///
    /// A numeric working node sums to itself; other scalars and
    /// non-numeric children contribute 0.
    pub fn sum(&mut self) -> f64 {
        let sum = match self.current() {
            Some(node) if node.is_container() => self
                .admitted(node)
                .iter()
                .filter_map(|(_, child)| child.as_float())
                .sum::<f64>(),
            Some(node) => node.as_float().unwrap_or(0.0),
            None => 0.0,
        };
        self.filter.clear();
        round_hundredths(sum)
    }

    /// Renders part of the working node.
    ///
    /// `"*"` renders the working node itself, keeping only admitted
    /// children. Anything else is a path, resolved like [`select`](Self::select)
    /// and rendered whole. `None` when the query is in its error state or
    /// the path does not resolve.
    pub fn get(&mut self, key_or_index: &str) -> Option<String> {
        let result = if key_or_index.trim() == "*" {
            self.materialize().map(|node| to_text(&node))
        } else {
            self.select(key_or_index);
            self.current().map(to_text)
        };
        self.filter.clear();
        result
    }

    /// Copy of the working node holding only the admitted children
    pub fn materialize(&self) -> Option<Value> {
        let node = self.current()?;
        let value = match node {
            Value::Array(_) => Value::Array(
                self.admitted(node)
                    .into_iter()
                    .map(|(_, child)| child.clone())
                    .collect(),
            ),
            Value::Object(_) => {
                let mut obj = Object::new();
                for (key, child) in self.admitted(node) {
                    if let Some(key) = key {
                        obj.insert(key.to_string(), child.clone());
                    }
                }
                Value::Object(obj)
            }
            scalar => scalar.clone(),
        };
        Some(value)
    }

    /// The working node, `None` once a path has failed
    pub fn current(&self) -> Option<&'a Value> {
        match self.error {
            Some(_) => None,
            None => Some(self.working),
        }
    }

    pub fn error(&self) -> Option<&PathError> {
        self.error.as_ref()
    }

    pub fn pending_filter(&self) -> &FilterPolicy {
        &self.filter
    }

    fn fail(&mut self, path: &str, e: PathError) {
        log::debug!("path '{}' did not resolve: {}", path, e);
        self.error = Some(e);
    }

    /// Children of `node` that pass the pending filter, with their keys
    fn admitted(&self, node: &'a Value) -> Vec<(Option<&'a str>, &'a Value)> {
        match node {
            Value::Array(arr) => arr
                .iter()
                .enumerate()
                .filter(|(index, _)| self.filter.is_admitted(Position::Index(*index)))
                .map(|(_, child)| (None, child))
                .collect(),
            Value::Object(obj) => obj
                .iter()
                .enumerate()
                .filter(|(index, (key, _))| {
                    self.filter.is_admitted(Position::Key {
                        key: key.as_str(),
                        index: *index,
                    })
                })
                .map(|(_, (key, child))| (Some(key.as_str()), child))
                .collect(),
            _ => Vec::new(),
        }
    }
}
