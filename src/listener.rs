//! The event contract between [`JsonParser`](crate::JsonParser) and whatever
//! consumes its output.
//!
//! The parser never builds a tree. It classifies each significant character
//! into an [`Element`] and reports structure through a [`JsonListener`]:
//!
//! ```text
//! {"a": [1, "x"]}
//!
//! open_container("", Object)
//!   open_container("a", Array)
//!     add_item("1", Constant)
//!     add_item("x", Quoted)
//!   close_container("a", Array)
//! close_container("", Object)
//! ```

use crate::document::BuildError;

/// Lexical class of the character that starts an element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    /// `{`
    Object,
    /// `[`
    Array,
    /// `}` or `]`
    Closing,
    /// Bare literal: number, `true`, `false`, `null`
    Constant,
    /// `"..."`
    Quoted,
    /// Anything else; ignored by the parser
    Unknown,
}

impl Element {
    /// Classifies the first significant character of an element
    pub fn classify(ch: char) -> Element {
        match ch {
            '"' => Element::Quoted,
            '{' => Element::Object,
            '[' => Element::Array,
            '}' | ']' => Element::Closing,
            '0'..='9' | '-' | 't' | 'f' | 'n' => Element::Constant,
            _ => Element::Unknown,
        }
    }
}

/// Receiver of parser events.
///
/// Every method reports whether the event was admitted. A rejected event is
/// not fatal: the parser logs it and keeps going.
pub trait JsonListener {
    /// A scalar member of the enclosing object
    fn add_key_value(&mut self, key: &str, value: &str, kind: Element) -> Result<(), BuildError>;

    /// A scalar element of the enclosing array
    fn add_item(&mut self, value: &str, kind: Element) -> Result<(), BuildError>;

    /// `{` or `[`; `key` is the pending member name, empty inside arrays
    fn open_container(&mut self, key: &str, kind: Element) -> Result<(), BuildError>;

    /// `}` or `]`; `key` and `kind` are those recorded when it was opened
    fn close_container(&mut self, key: &str, kind: Element) -> Result<(), BuildError>;
}
