use std::{fmt, sync::LazyLock};

use regex::Regex;

use crate::query::QueryError;

static INDEX_FILTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(==|!=|<=|>=|<|>)\s*(-?\d+)").expect("valid regex"));

static QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'([^']*)'").expect("valid regex"));

/// Comparison operator of an index filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl Comparison {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "==" => Some(Comparison::Eq),
            "!=" => Some(Comparison::NotEq),
            "<" => Some(Comparison::Lt),
            "<=" => Some(Comparison::LtEq),
            ">" => Some(Comparison::Gt),
            ">=" => Some(Comparison::GtEq),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Comparison::Eq => "==",
            Comparison::NotEq => "!=",
            Comparison::Lt => "<",
            Comparison::LtEq => "<=",
            Comparison::Gt => ">",
            Comparison::GtEq => ">=",
        }
    }

    pub fn apply(&self, left: i64, right: i64) -> bool {
        match self {
            Comparison::Eq => left == right,
            Comparison::NotEq => left != right,
            Comparison::Lt => left < right,
            Comparison::LtEq => left <= right,
            Comparison::Gt => left > right,
            Comparison::GtEq => left >= right,
        }
    }
}

/// Where a child sits in its container
#[derive(Debug, Clone, Copy)]
pub enum Position<'k> {
    /// Element of an array
    Index(usize),

    /// Member of an object, with its insertion position
    Key { key: &'k str, index: usize },
}

/// Decides which children of the working container take part in the next
/// `count`, `sum` or `get`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FilterPolicy {
    /// Everything is admitted
    #[default]
    None,

    /// Admits positions `p` for which `p <op> threshold` holds
    Index { op: Comparison, threshold: i64 },

    /// Admits keys containing the substring
    KeyContains(String),
}

impl FilterPolicy {
    /// Parses the argument of `filter(...)`.
    ///
    /// `index <op> N` with `op` one of `== != < <= > >=`, or
    /// `contains('text')`. Anything else is an
    /// [`InvalidFilter`](QueryError::InvalidFilter) error.
    ///
    /// # Examples
    ///
    /// ```
    /// use json_proc::filter::{Comparison, FilterPolicy};
    ///
    /// assert_eq!(
    ///     FilterPolicy::parse("index > 1").unwrap(),
    ///     FilterPolicy::Index { op: Comparison::Gt, threshold: 1 }
    /// );
    /// assert_eq!(
    ///     FilterPolicy::parse("contains('oo')").unwrap(),
    ///     FilterPolicy::KeyContains("oo".to_string())
    /// );
    /// assert!(FilterPolicy::parse("index 1").is_err());
    /// ```
    pub fn parse(expr: &str) -> Result<Self, QueryError> {
        let invalid = || QueryError::InvalidFilter(expr.to_string());

        // `contains('index')` is a key filter even though it mentions "index".
        if expr.trim_start().starts_with("contains") {
            Self::parse_contains(expr).ok_or_else(invalid)
        } else if expr.contains("index") {
            Self::parse_index(expr).ok_or_else(invalid)
        } else if expr.contains("contains") {
            Self::parse_contains(expr).ok_or_else(invalid)
        } else {
            Err(invalid())
        }
    }

    fn parse_index(expr: &str) -> Option<Self> {
        let caps = INDEX_FILTER.captures(expr)?;
        let op = Comparison::from_symbol(&caps[1])?;
        let threshold = caps[2].parse::<i64>().ok()?;
        Some(FilterPolicy::Index { op, threshold })
    }

    fn parse_contains(expr: &str) -> Option<Self> {
        let caps = QUOTED.captures(expr)?;
        Some(FilterPolicy::KeyContains(caps[1].to_string()))
    }

    pub fn is_admitted(&self, position: Position<'_>) -> bool {
        match (self, position) {
            (FilterPolicy::None, _) => true,
            (FilterPolicy::Index { op, threshold }, Position::Index(index))
            | (FilterPolicy::Index { op, threshold }, Position::Key { index, .. }) => {
                i64::try_from(index).is_ok_and(|index| op.apply(index, *threshold))
            }
            (FilterPolicy::KeyContains(needle), Position::Key { key, .. }) => {
                key.contains(needle.as_str())
            }
            (FilterPolicy::KeyContains(needle), Position::Index(index)) => {
                index.to_string().contains(needle.as_str())
            }
        }
    }

    /// Drops back to admitting everything
    pub fn clear(&mut self) {
        *self = FilterPolicy::None;
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, FilterPolicy::None)
    }
}

impl fmt::Display for FilterPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterPolicy::None => write!(f, "none"),
            FilterPolicy::Index { op, threshold } => {
                write!(f, "index {} {}", op.symbol(), threshold)
            }
            FilterPolicy::KeyContains(needle) => write!(f, "contains('{}')", needle),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admitted_indices(policy: &FilterPolicy, len: usize) -> Vec<usize> {
        (0..len)
            .filter(|&i| policy.is_admitted(Position::Index(i)))
            .collect()
    }

    #[test]
    fn test_parse_operators() {
        let cases = vec![
            ("index==2", Comparison::Eq),
            ("index != 2", Comparison::NotEq),
            ("index<2", Comparison::Lt),
            ("index <= 2", Comparison::LtEq),
            ("index>2", Comparison::Gt),
            ("index >= 2", Comparison::GtEq),
        ];

        for (expr, op) in cases {
            assert_eq!(
                FilterPolicy::parse(expr).unwrap(),
                FilterPolicy::Index { op, threshold: 2 },
                "Failed for input: {}",
                expr
            );
        }
    }

    #[test]
    fn test_index_filter_admits() {
        let policy = FilterPolicy::parse("index>1").unwrap();
        assert_eq!(admitted_indices(&policy, 4), vec![2, 3]);

        let policy = FilterPolicy::parse("index != 0").unwrap();
        assert_eq!(admitted_indices(&policy, 3), vec![1, 2]);
    }

    #[test]
    fn test_key_contains() {
        let policy = FilterPolicy::parse("contains('oo')").unwrap();
        let mut admitted = Vec::new();
        for (index, key) in ["foo", "bar", "boom"].into_iter().enumerate() {
            if policy.is_admitted(Position::Key { key, index }) {
                admitted.push(key);
            }
        }
        assert_eq!(admitted, vec!["foo", "boom"]);
    }

    #[test]
    fn test_contains_keyword_named_index() {
        assert_eq!(
            FilterPolicy::parse("contains('index')").unwrap(),
            FilterPolicy::KeyContains("index".to_string())
        );
    }

    #[test]
    fn test_key_contains_on_array_matches_index_text() {
        let policy = FilterPolicy::KeyContains("1".into());
        assert_eq!(admitted_indices(&policy, 12), vec![1, 10, 11]);
    }

    #[test]
    fn test_index_filter_on_object_uses_position() {
        let policy = FilterPolicy::parse("index < 1").unwrap();
        assert!(policy.is_admitted(Position::Key { key: "a", index: 0 }));
        assert!(!policy.is_admitted(Position::Key { key: "b", index: 1 }));
    }

    #[test]
    fn test_invalid_filters() {
        for expr in ["index 2", "index >", "contains(oo)", "length > 2", ""] {
            assert_eq!(
                FilterPolicy::parse(expr),
                Err(QueryError::InvalidFilter(expr.to_string())),
                "Failed for input: {}",
                expr
            );
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(FilterPolicy::parse("index>=3").unwrap().to_string(), "index >= 3");
        assert_eq!(FilterPolicy::parse("contains('oo')").unwrap().to_string(), "contains('oo')");
        assert_eq!(FilterPolicy::None.to_string(), "none");
    }

    #[test]
    fn test_clear() {
        let mut policy = FilterPolicy::parse("index == 0").unwrap();
        assert!(policy.is_active());
        policy.clear();
        assert!(!policy.is_active());
        assert_eq!(admitted_indices(&policy, 2), vec![0, 1]);
    }
}
