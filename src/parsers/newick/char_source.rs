//! Character stream with peek, read and skip primitives for the Newick
//! reader.
//!
//! Tracks line and column so that errors can point at the offending input.
//! Several tree descriptions may be read from one source in turn.

use crate::TreeParseError;

#[derive(Debug, Clone)]
pub struct CharSource<'a> {
    text: &'a str,
    position: usize,
    line: usize,
    column: usize,
}

impl<'a> CharSource<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, position: 0, line: 1, column: 1 }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.text.len()
    }

    pub fn peek(&self) -> Option<char> {
        self.text[self.position..].chars().next()
    }

    pub fn read(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Reads the next character if it is `c`.
    pub fn consume_if(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            let _ = self.read();
            true
        } else {
            false
        }
    }

    /// Skips whitespace and `[...]` comments.
    pub fn skip_space(&mut self) -> Result<(), TreeParseError> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    let _ = self.read();
                }
                Some('[') => {
                    let (line, column) = (self.line, self.column);
                    loop {
                        match self.read() {
                            Some(']') => break,
                            Some(_) => {}
                            None => {
                                return Err(TreeParseError::UnclosedComment { line, column });
                            }
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    /// Error describing the next character as not being `expected`.
    pub fn unexpected(&self, expected: &str) -> TreeParseError {
        TreeParseError::Unexpected {
            expected: expected.to_string(),
            found: match self.peek() {
                Some(c) => format!("'{c}'"),
                None => "end of input".to_string(),
            },
            line: self.line,
            column: self.column,
        }
    }
}
