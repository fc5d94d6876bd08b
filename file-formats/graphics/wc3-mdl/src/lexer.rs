//! MDL token scanner.
//!
//! Splits MDL text into:
//! - identifiers (`Bone`, `FilterMode`, `Linear`)
//! - quoted strings, payload kept verbatim (`"Textures\\Foo.blp"`)
//! - integers and floats in C notation (`-3`, `0.5`, `1e-05`, `.25`)
//! - punctuation: `{ } , :`
//!
//! Whitespace and `//` line comments are discarded.

use std::fmt;

use crate::error::{MdlError, Position, Result};

/// A token in an MDL file
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Ident(String),
    /// String literal without the surrounding quotes
    Str(String),
    Int(i64),
    Float(f64),
    LBrace,
    RBrace,
    Comma,
    Colon,
}

impl Token {
    /// Numeric value of an integer or float token
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Token::Int(v) => Some(*v as f64),
            Token::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Token::Int(_) | Token::Float(_))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(s) => write!(f, "identifier '{s}'"),
            Token::Str(s) => write!(f, "string \"{s}\""),
            Token::Int(v) => write!(f, "integer {v}"),
            Token::Float(v) => write!(f, "number {v}"),
            Token::LBrace => f.write_str("'{'"),
            Token::RBrace => f.write_str("'}'"),
            Token::Comma => f.write_str("','"),
            Token::Colon => f.write_str("':'"),
        }
    }
}

/// A token with the position where it starts
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub pos: Position,
}

/// Lexer over raw MDL bytes
pub struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
    line: usize,
    col: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Result<Vec<SpannedToken>> {
        let mut tokens = Vec::with_capacity(self.input.len() / 4);
        while let Some(tok) = self.next_token()? {
            tokens.push(tok);
        }
        Ok(tokens)
    }

    /// Position of the read cursor; after `tokenize` this is the end of input
    pub fn position(&self) -> Position {
        Position::new(self.line, self.col)
    }

    /// Get the next token, or `None` at end of input
    pub fn next_token(&mut self) -> Result<Option<SpannedToken>> {
        self.skip_whitespace_and_comments();

        let Some(ch) = self.peek() else {
            return Ok(None);
        };
        let pos = self.position();

        let token = match ch {
            b'{' => {
                self.advance();
                Token::LBrace
            }
            b'}' => {
                self.advance();
                Token::RBrace
            }
            b',' => {
                self.advance();
                Token::Comma
            }
            b':' => {
                self.advance();
                Token::Colon
            }
            b'"' => self.read_string()?,
            b'0'..=b'9' => self.read_number()?,
            b'-' | b'+' | b'.' if self.starts_number() => self.read_number()?,
            b'A'..=b'Z' | b'a'..=b'z' | b'_' => self.read_ident(),
            _ => {
                return Err(MdlError::lexical(
                    pos,
                    format!("unexpected character '{}'", ch.escape_ascii()),
                ));
            }
        };

        Ok(Some(SpannedToken { token, pos }))
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let ch = self.peek()?;
        self.pos += 1;
        if ch == b'\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    /// A sign or leading dot only starts a number when a digit follows
    fn starts_number(&self) -> bool {
        match (self.peek(), self.peek_at(1), self.peek_at(2)) {
            (Some(b'-' | b'+'), Some(b'.'), Some(d)) => d.is_ascii_digit(),
            (Some(b'-' | b'+' | b'.'), Some(d), _) => d.is_ascii_digit(),
            _ => false,
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
                self.advance();
            }

            if self.peek() == Some(b'/') && self.peek_at(1) == Some(b'/') {
                while let Some(ch) = self.peek() {
                    if ch == b'\n' {
                        break;
                    }
                    self.advance();
                }
                continue;
            }

            // UTF-8 byte order mark at the start of the file
            if self.pos == 0 && self.input.starts_with(&[0xEF, 0xBB, 0xBF]) {
                self.pos = 3;
                continue;
            }

            break;
        }
    }

    fn read_string(&mut self) -> Result<Token> {
        let start = self.position();
        self.advance();

        let begin = self.pos;
        loop {
            match self.peek() {
                None | Some(b'\n') => {
                    return Err(MdlError::lexical(start, "unterminated string"));
                }
                Some(b'"') => break,
                Some(_) => {
                    self.advance();
                }
            }
        }
        let content = String::from_utf8_lossy(&self.input[begin..self.pos]).into_owned();
        self.advance();

        Ok(Token::Str(content))
    }

    fn read_number(&mut self) -> Result<Token> {
        let start = self.position();
        let begin = self.pos;
        let mut is_float = false;

        if matches!(self.peek(), Some(b'-' | b'+')) {
            self.advance();
        }
        self.skip_digits();

        if self.peek() == Some(b'.') {
            is_float = true;
            self.advance();
            self.skip_digits();
        }

        if matches!(self.peek(), Some(b'e' | b'E')) {
            is_float = true;
            self.advance();
            if matches!(self.peek(), Some(b'-' | b'+')) {
                self.advance();
            }
            if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
                return Err(MdlError::lexical(start, "missing digits in exponent"));
            }
            self.skip_digits();
        }

        if self
            .peek()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == b'_' || c == b'#')
        {
            let bad = String::from_utf8_lossy(&self.input[begin..=self.pos]).into_owned();
            return Err(MdlError::lexical(start, format!("invalid number '{bad}'")));
        }

        // Only ASCII digits, signs, dots and exponents were consumed.
        let text = String::from_utf8_lossy(&self.input[begin..self.pos]);

        if is_float {
            text.parse::<f64>()
                .map(Token::Float)
                .map_err(|_| MdlError::lexical(start, format!("invalid number '{text}'")))
        } else if let Ok(value) = text.parse::<i64>() {
            Ok(Token::Int(value))
        } else {
            // Digit runs past i64 are large floats written without a fraction
            text.parse::<f64>()
                .map(Token::Float)
                .map_err(|_| MdlError::lexical(start, format!("invalid integer '{text}'")))
        }
    }

    fn skip_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
    }

    fn read_ident(&mut self) -> Token {
        let begin = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == b'_')
        {
            self.advance();
        }
        Token::Ident(String::from_utf8_lossy(&self.input[begin..self.pos]).into_owned())
    }
}

/// Tokenize a whole MDL buffer
pub fn tokenize(input: &[u8]) -> Result<Vec<SpannedToken>> {
    Lexer::new(input).tokenize()
}
