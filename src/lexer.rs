/// Character cursor the JSON parser reads from.
///
/// Whitespace here is the JSON set plus backspace and the `0xFF` byte some
/// editors leave behind, both of which are skipped like blanks.
pub struct Scanner {
    input: Vec<char>,
    position: usize,
}

fn is_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\r' | '\n' | '\u{8}' | '\u{ff}')
}

/// Constants run until the first character that cannot appear in a number
/// or keyword. Signs are allowed so exponents like `1e-5` stay whole.
fn is_constant_char(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, '.' | '+' | '-')
}

impl Scanner {
    pub fn new(input: &str) -> Self {
        Scanner {
            input: input.chars().collect(),
            position: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_eof(&self) -> bool {
        self.position >= self.input.len()
    }

    pub fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Consumes and returns the next character
    pub fn next_char(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;
        Some(ch)
    }

    pub fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if is_whitespace(ch) {
                self.position += 1;
            } else {
                break;
            }
        }
    }

    /// Consumes `expected` if it is the next character
    pub fn skip_if(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    /// Reads up to (not including) the next `"`. No escape decoding is done,
    /// so a backslash before a quote does not protect it.
    pub fn read_quoted(&mut self) -> String {
        self.read_while(|ch| ch != '"')
    }

    /// Reads the remainder of a constant (`true`, `null`, `-1.5e3`, ...)
    pub fn read_constant(&mut self) -> String {
        self.read_while(is_constant_char)
    }

    fn read_while(&mut self, keep: impl Fn(char) -> bool) -> String {
        let mut result = String::new();
        while let Some(ch) = self.peek() {
            if !keep(ch) {
                break;
            }
            result.push(ch);
            self.position += 1;
        }
        result
    }

    /// Skips trailing whitespace and at most one comma after an element
    pub fn skip_separator(&mut self) {
        self.skip_whitespace();
        self.skip_if(',');
    }
}
