pub mod cli;
pub mod command;
pub mod convert;
pub mod document;
pub mod filter;
pub mod format;
pub mod lexer;
pub mod listener;
pub mod output;
pub mod parser;
pub mod query;
pub mod value;

pub use command::{Command, CommandError, CommandProcessor};
pub use document::{BuildError, Document, DocumentBuilder, NumberPolicy};
pub use filter::{Comparison, FilterPolicy};
pub use listener::{Element, JsonListener};
pub use output::{to_text, to_text_pretty};
pub use parser::{JsonParser, ParseError};
pub use query::{PathError, Query, QueryError};
pub use value::{Object, Value};
