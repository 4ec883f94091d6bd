use std::{fmt, io, mem};

use crate::{
    lexer::Scanner,
    listener::{Element, JsonListener},
};

/// One open container: the member name it was opened under and its kind
#[derive(Debug, Clone)]
struct Frame {
    key: String,
    kind: Element,
}

/// Event-driven JSON tokenizer.
///
/// Reads the input once, front to back, and reports structure to a
/// [`JsonListener`]. The only state kept is the stack of open containers
/// and the member name waiting for its value.
///
/// The parser is lenient. Once past the opening `{`, characters it cannot
/// classify are skipped, and events the listener rejects are logged and
/// counted rather than aborting the parse.
pub struct JsonParser {
    scanner: Scanner,
    frames: Vec<Frame>,
    pending_key: String,
    rejected: usize,
}

/// Errors that stop a parse
#[derive(Debug)]
pub enum ParseError {
    /// The document does not start with `{`
    NotAnObject { found: Option<char> },

    /// Reading the input failed
    Io(io::Error),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::NotAnObject { found: Some(ch) } => {
                write!(f, "Document must start with '{{', found '{}'", ch)
            }
            ParseError::NotAnObject { found: None } => {
                write!(f, "Document must start with '{{', found end of input")
            }
            ParseError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ParseError {
    fn from(e: io::Error) -> Self {
        ParseError::Io(e)
    }
}

impl JsonParser {
    pub fn new(input: &str) -> Self {
        JsonParser {
            scanner: Scanner::new(input),
            frames: Vec::new(),
            pending_key: String::new(),
            rejected: 0,
        }
    }

    /// Number of events the listener refused during the last parse
    pub fn rejected_events(&self) -> usize {
        self.rejected
    }

    /// Runs the whole input through `listener`.
    ///
    /// Fails only when the first significant character is not `{`; in that
    /// case no event has been emitted.
    pub fn parse<L: JsonListener + ?Sized>(&mut self, listener: &mut L) -> Result<(), ParseError> {
        self.scanner.skip_whitespace();
        match self.scanner.next_char() {
            Some('{') => self.open(Element::Object, listener),
            found => return Err(ParseError::NotAnObject { found }),
        }

        loop {
            self.scanner.skip_whitespace();
            let Some(ch) = self.scanner.next_char() else {
                break;
            };
            self.parse_element(ch, listener);
        }

        if !self.frames.is_empty() {
            log::warn!("input ended with {} unclosed container(s)", self.frames.len());
        }
        Ok(())
    }

    fn parse_element<L: JsonListener + ?Sized>(&mut self, ch: char, listener: &mut L) {
        match Element::classify(ch) {
            kind @ (Element::Object | Element::Array) => self.open(kind, listener),
            Element::Closing => {
                self.close(ch, listener);
                self.scanner.skip_separator();
            }
            Element::Quoted => {
                let value = self.scanner.read_quoted();
                self.scanner.skip_if('"');
                self.scanner.skip_separator();

                if self.enclosing() == Some(Element::Object) && self.scanner.skip_if(':') {
                    self.pending_key = value;
                } else {
                    self.emit_value(&value, Element::Quoted, listener);
                }
            }
            Element::Constant => {
                let mut value = String::from(ch);
                value.push_str(&self.scanner.read_constant());
                self.scanner.skip_separator();
                self.emit_value(&value, Element::Constant, listener);
            }
            Element::Unknown => {
                log::debug!(
                    "skipping unexpected character '{}' at position {}",
                    ch,
                    self.scanner.position() - 1
                );
            }
        }
    }

    fn enclosing(&self) -> Option<Element> {
        self.frames.last().map(|frame| frame.kind)
    }

    fn open<L: JsonListener + ?Sized>(&mut self, kind: Element, listener: &mut L) {
        let frame = Frame {
            key: mem::take(&mut self.pending_key),
            kind,
        };
        let result = listener.open_container(&frame.key, kind);
        self.frames.push(frame);
        self.record(result);
    }

    fn close<L: JsonListener + ?Sized>(&mut self, closer: char, listener: &mut L) {
        self.pending_key.clear();
        let result = match self.frames.pop() {
            Some(frame) => listener.close_container(&frame.key, frame.kind),
            None => {
                // Let the listener see the stray closer so it can report the mismatch.
                let kind = if closer == ']' {
                    Element::Array
                } else {
                    Element::Object
                };
                listener.close_container("", kind)
            }
        };
        self.record(result);
    }

    fn emit_value<L: JsonListener + ?Sized>(
        &mut self,
        value: &str,
        kind: Element,
        listener: &mut L,
    ) {
        let result = match self.enclosing() {
            Some(Element::Object) => listener.add_key_value(&self.pending_key, value, kind),
            Some(_) => listener.add_item(value, kind),
            None => {
                log::debug!("skipping value '{}' outside any container", value);
                return;
            }
        };
        self.record(result);
    }

    fn record(&mut self, result: Result<(), crate::document::BuildError>) {
        if let Err(e) = result {
            self.rejected += 1;
            log::warn!("{} (near position {})", e, self.scanner.position());
        }
    }
}
