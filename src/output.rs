//! Text rendering of [`Value`] trees.
//!
//! The canonical form is what `get` returns:
//!
//! - `null`, `true`, `false`
//! - integers in decimal, floats in their shortest round-trip form (a whole
//!   float keeps one decimal, `2.0`, so it is not mistaken for an integer)
//! - strings wrapped in `"` with nothing escaped, since the parser does not
//!   decode escapes either
//! - `[v1, v2]` and `{"k1": v1, "k2": v2}` with keys in insertion order
//!
//! # Examples
//!
//! ```
//! use json_proc::{Object, Value};
//! use json_proc::output::{to_text, to_text_pretty};
//!
//! let mut obj = Object::new();
//! obj.insert("name".to_string(), Value::String("Alice".to_string()));
//! obj.insert("scores".to_string(), Value::Array(vec![Value::Integer(3), Value::Float(4.5)]));
//! let value = Value::Object(obj);
//!
//! assert_eq!(to_text(&value), r#"{"name": "Alice", "scores": [3, 4.5]}"#);
//! assert_eq!(
//!     to_text_pretty(&value),
//!     "{\n  \"name\": \"Alice\",\n  \"scores\": [\n    3,\n    4.5\n  ]\n}"
//! );
//! ```

use crate::value::{Object, Value};

pub struct TextPrinter {
    pretty: bool,
}

impl TextPrinter {
    pub fn new(pretty: bool) -> Self {
        TextPrinter { pretty }
    }

    pub fn print(&self, value: &Value) -> String {
        self.print_value(value, 0)
    }

    fn print_value(&self, value: &Value, indent: usize) -> String {
        match value {
            Value::Null => "null".to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Integer(n) => n.to_string(),
            Value::Float(n) => format_float(*n),
            Value::String(s) => format!("\"{}\"", s),
            Value::Array(arr) => self.print_array(arr, indent),
            Value::Object(obj) => self.print_object(obj, indent),
        }
    }

    fn print_array(&self, arr: &[Value], indent: usize) -> String {
        let items: Vec<String> = arr
            .iter()
            .map(|v| self.print_value(v, indent + 1))
            .collect();
        self.wrap('[', ']', items, indent)
    }

    fn print_object(&self, obj: &Object, indent: usize) -> String {
        let items: Vec<String> = obj
            .iter()
            .map(|(k, v)| format!("\"{}\": {}", k, self.print_value(v, indent + 1)))
            .collect();
        self.wrap('{', '}', items, indent)
    }

    fn wrap(&self, open: char, close: char, items: Vec<String>, indent: usize) -> String {
        if items.is_empty() {
            return format!("{}{}", open, close);
        }

        if self.pretty {
            let inner = self.indent(indent + 1);
            let items: Vec<String> = items
                .into_iter()
                .map(|item| format!("{}{}", inner, item))
                .collect();
            format!(
                "{}\n{}\n{}{}",
                open,
                items.join(",\n"),
                self.indent(indent),
                close
            )
        } else {
            format!("{}{}{}", open, items.join(", "), close)
        }
    }

    fn indent(&self, level: usize) -> String {
        "  ".repeat(level)
    }
}

/// Shortest form that reads back as the same `f64`
pub fn format_float(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 {
        format!("{:.1}", n)
    } else {
        n.to_string()
    }
}

/// Canonical single-line rendering
pub fn to_text(value: &Value) -> String {
    TextPrinter::new(false).print(value)
}

/// Indented rendering, two spaces per level
pub fn to_text_pretty(value: &Value) -> String {
    TextPrinter::new(true).print(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalars() {
        assert_eq!(to_text(&Value::Null), "null");
        assert_eq!(to_text(&Value::Boolean(false)), "false");
        assert_eq!(to_text(&Value::Integer(-12)), "-12");
        assert_eq!(to_text(&Value::Float(2.5)), "2.5");
        assert_eq!(to_text(&Value::Float(2.0)), "2.0");
        assert_eq!(to_text(&Value::Float(1e17)), "100000000000000000.0");
        assert_eq!(to_text(&Value::String("a \"b".into())), "\"a \"b\"");
    }

    #[test]
    fn test_empty_containers() {
        assert_eq!(to_text(&Value::Array(vec![])), "[]");
        assert_eq!(to_text(&Value::Object(Object::new())), "{}");
        assert_eq!(to_text_pretty(&Value::Array(vec![])), "[]");
    }

    #[test]
    fn test_object_keeps_insertion_order() {
        let mut obj = Object::new();
        obj.insert("zeta".into(), Value::Integer(1));
        obj.insert("alpha".into(), Value::Null);
        assert_eq!(to_text(&Value::Object(obj)), r#"{"zeta": 1, "alpha": null}"#);
    }

    #[test]
    fn test_nested() {
        let value = Value::Array(vec![
            Value::Array(vec![Value::Integer(1)]),
            Value::Object(Object::new()),
        ]);
        assert_eq!(to_text(&value), "[[1], {}]");
    }
}
