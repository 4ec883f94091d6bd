use indexmap::IndexMap;

/// Insertion-ordered object storage. Keys are unique; order is the order in
/// which keys first appeared in the parsed text.
pub type Object = IndexMap<String, Value>;

/// One node of a parsed JSON document.
///
/// Integers and floats are kept apart: a literal such as `247` becomes
/// [`Value::Integer`], a literal such as `2.5` becomes [`Value::Float`]. Which
/// rule decides this is controlled by [`NumberPolicy`](crate::NumberPolicy).
///
/// # Examples
///
/// ```
/// use json_proc::{Object, Value};
///
/// let array = Value::Array(vec![Value::Integer(1), Value::Float(2.5)]);
///
/// let mut obj = Object::new();
/// obj.insert("key".to_string(), Value::String("value".to_string()));
/// let object = Value::Object(obj);
///
/// assert_eq!(array.len(), Some(2));
/// assert_eq!(object.type_name(), "object");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// JSON null
    Null,

    /// JSON boolean (true/false)
    Boolean(bool),

    /// Whole number
    Integer(i64),

    /// Number with a fractional part
    Float(f64),

    /// Quoted text, stored exactly as it appeared between the quotes
    String(String),

    /// Ordered list of owned children
    Array(Vec<Value>),

    /// Keyed children in insertion order
    Object(Object),
}

impl Default for Value {
    fn default() -> Self {
        Value::Object(Object::new())
    }
}

impl Value {
    /// Returns a human-readable type name
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Numeric value of an Integer or Float, `None` for every other variant
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Value::Array(_) | Value::Object(_))
    }

    /// Number of direct children, `None` for scalars
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::Array(arr) => Some(arr.len()),
            Value::Object(obj) => Some(obj.len()),
            _ => None,
        }
    }

    /// Looks up a direct child by key
    pub fn get_key(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(obj) => obj.get(key),
            _ => None,
        }
    }

    /// Looks up a direct child by position
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        match self {
            Value::Array(arr) => arr.get(index),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(arr: Vec<Value>) -> Self {
        Value::Array(arr)
    }
}

impl From<Object> for Value {
    fn from(obj: Object) -> Self {
        Value::Object(obj)
    }
}
