use std::{fmt, io::Read};

use crate::{
    listener::{Element, JsonListener},
    parser::{JsonParser, ParseError},
    query::Query,
    value::{Object, Value},
};

/// How a bare numeric literal is classified as Integer or Float.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberPolicy {
    /// Parse as a float; a nonzero remainder after truncation makes it a
    /// Float, otherwise it is an Integer (`2.0` becomes `2`). Whole values
    /// that do not fit in an `i64` stay Float.
    #[default]
    Truncation,

    /// A literal containing `.`, `e` or `E` is a Float, anything else is an
    /// Integer. Integers that overflow `i64` fall back to Float.
    Lexical,
}

/// Reasons the builder refuses a listener event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// A value arrived while no container was open
    NoOpenContainer,

    /// A container was closed that was never opened
    UnbalancedClose,

    /// The open container is of the wrong kind for this event
    NotAdmitted {
        expected: &'static str,
        found: &'static str,
    },
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::NoOpenContainer => write!(f, "Value outside of any open container"),
            BuildError::UnbalancedClose => write!(f, "Closing a container that was never opened"),
            BuildError::NotAdmitted { expected, found } => {
                write!(f, "Expected an open {}, found {}", expected, found)
            }
        }
    }
}

impl std::error::Error for BuildError {}

/// A parsed JSON document. Owns exactly one root [`Value`], an empty
/// object until something is parsed into it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    root: Value,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `input` with the default [`NumberPolicy`].
    ///
    /// # Examples
    ///
    /// ```
    /// use json_proc::Document;
    ///
    /// let doc = Document::parse(r#"{"location": {"roomNumber": 247}}"#).unwrap();
    /// let mut query = doc.query();
    /// assert_eq!(query.select("'location'").get("'roomNumber'"), Some("247".to_string()));
    /// ```
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        Self::parse_with(input, NumberPolicy::default())
    }

    pub fn parse_with(input: &str, policy: NumberPolicy) -> Result<Self, ParseError> {
        let mut builder = DocumentBuilder::with_policy(policy);
        JsonParser::new(input).parse(&mut builder)?;
        Ok(builder.finish())
    }

    /// Reads the whole stream, then parses it
    pub fn from_reader<R: Read>(mut reader: R, policy: NumberPolicy) -> Result<Self, ParseError> {
        let mut input = String::new();
        reader.read_to_string(&mut input)?;
        Self::parse_with(&input, policy)
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Replaces the whole tree
    pub fn set_root(&mut self, root: Value) {
        self.root = root;
    }

    pub fn into_root(self) -> Value {
        self.root
    }

    /// Starts a query over this document. The document cannot be modified
    /// while the query is alive.
    pub fn query(&self) -> Query<'_> {
        Query::new(self)
    }
}

impl From<Value> for Document {
    fn from(root: Value) -> Self {
        Document { root }
    }
}

/// A container still receiving children
#[derive(Debug)]
struct OpenNode {
    key: String,
    value: Value,
}

/// [`JsonListener`] that assembles a [`Document`].
///
/// Open containers live on a stack. Each one is attached to its parent when
/// it closes, so sibling order in the finished tree follows the input.
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    policy: NumberPolicy,
    stack: Vec<OpenNode>,
    root: Option<Value>,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: NumberPolicy) -> Self {
        DocumentBuilder {
            policy,
            ..Self::default()
        }
    }

    /// Depth of currently open containers
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Closes anything left open and returns the document
    pub fn finish(mut self) -> Document {
        if self.depth() > 0 {
            log::warn!("closing {} container(s) left open at end of input", self.depth());
        }
        while let Some(node) = self.stack.pop() {
            self.attach(node);
        }
        Document {
            root: self.root.unwrap_or_default(),
        }
    }

    fn attach(&mut self, node: OpenNode) {
        match self.stack.last_mut() {
            None => self.root = Some(node.value),
            Some(parent) => match &mut parent.value {
                Value::Object(obj) => insert_first(obj, node.key, node.value),
                Value::Array(arr) => arr.push(node.value),
                other => log::warn!("dropping container closed under a {}", other.type_name()),
            },
        }
    }

    /// Turns the text of a scalar event into a value
    fn scalar(&self, text: &str, kind: Element) -> Value {
        match kind {
            Element::Quoted => Value::String(text.to_string()),
            _ => parse_constant(text, self.policy),
        }
    }
}

/// Duplicate keys keep their first value
fn insert_first(obj: &mut Object, key: String, value: Value) {
    if obj.contains_key(&key) {
        log::debug!("ignoring duplicate key '{}'", key);
    } else {
        obj.insert(key, value);
    }
}

/// Classifies a bare literal: `true`, `false`, `null` or a number.
///
/// Text that is none of these becomes Null.
pub fn parse_constant(text: &str, policy: NumberPolicy) -> Value {
    match text {
        "true" => return Value::Boolean(true),
        "false" => return Value::Boolean(false),
        "null" => return Value::Null,
        _ => {}
    }

    let number = match text.parse::<f64>() {
        Ok(n) if n.is_finite() => n,
        _ => {
            log::debug!("unrecognized constant '{}'", text);
            return Value::Null;
        }
    };

    match policy {
        NumberPolicy::Truncation => {
            if (number - number.trunc()).abs() > 0.0 {
                Value::Float(number)
            } else if let Ok(n) = text.parse::<i64>() {
                Value::Integer(n)
            } else if number >= i64::MIN as f64 && number < i64::MAX as f64 {
                Value::Integer(number as i64)
            } else {
                Value::Float(number)
            }
        }
        NumberPolicy::Lexical => {
            if text.contains(['.', 'e', 'E']) {
                Value::Float(number)
            } else {
                text.parse::<i64>().map_or(Value::Float(number), Value::Integer)
            }
        }
    }
}

impl JsonListener for DocumentBuilder {
    fn add_key_value(&mut self, key: &str, value: &str, kind: Element) -> Result<(), BuildError> {
        let node = self.scalar(value, kind);
        let top = self.stack.last_mut().ok_or(BuildError::NoOpenContainer)?;
        match &mut top.value {
            Value::Object(obj) => {
                insert_first(obj, key.to_string(), node);
                Ok(())
            }
            other => Err(BuildError::NotAdmitted {
                expected: "object",
                found: other.type_name(),
            }),
        }
    }

    fn add_item(&mut self, value: &str, kind: Element) -> Result<(), BuildError> {
        let node = self.scalar(value, kind);
        let top = self.stack.last_mut().ok_or(BuildError::NoOpenContainer)?;
        // A fresh object has no shape yet; an item turns it into a list.
        if matches!(&top.value, Value::Object(obj) if obj.is_empty()) {
            top.value = Value::Array(vec![node]);
            return Ok(());
        }
        match &mut top.value {
            Value::Array(arr) => {
                arr.push(node);
                Ok(())
            }
            other => Err(BuildError::NotAdmitted {
                expected: "array",
                found: other.type_name(),
            }),
        }
    }

    fn open_container(&mut self, key: &str, kind: Element) -> Result<(), BuildError> {
        let value = match kind {
            Element::Array => Value::Array(Vec::new()),
            _ => Value::Object(Object::new()),
        };
        if self.stack.is_empty() && self.root.is_some() {
            log::warn!("second top-level container replaces the first");
        }
        self.stack.push(OpenNode {
            key: key.to_string(),
            value,
        });
        Ok(())
    }

    fn close_container(&mut self, _key: &str, _kind: Element) -> Result<(), BuildError> {
        let node = self.stack.pop().ok_or(BuildError::UnbalancedClose)?;
        self.attach(node);
        Ok(())
    }
}
