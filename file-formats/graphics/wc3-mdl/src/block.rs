//! Block parser: rebuilds the nested `KEYWORD [ARG...] { ... }` structure
//! shared by every MDL chunk.
//!
//! The parser works one statement at a time. [`BlockParser::read_item`]
//! returns the next statement at the current scope together with its nested
//! children, and [`BlockParser::depth`] reports how deep the cursor is.
//! A statement is one of:
//!
//! - `Keyword arg* ,` such as `FilterMode Blend,` or `Interval { 0, 3333 },`
//! - `Keyword arg* { statement* }` such as `Bone "Root" { ... }`
//! - `static Keyword arg* ,` (flagged with [`Item::is_static`])
//! - `<time>: value ,` a keyframe
//! - a bare value: `{ 0, 1, 2 },` or `500,`
//!
//! A `{` following a keyword opens a vector literal when a number comes
//! next, and a nested scope otherwise.

use std::fmt;

use crate::error::{MdlError, Position, Result};
use crate::lexer::{SpannedToken, Token, tokenize};

/// A statement argument
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    Ident(String),
    Vector(Vec<f64>),
}

impl Value {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    fn describe(&self) -> String {
        match self {
            Value::Int(v) => format!("integer {v}"),
            Value::Float(v) => format!("number {v}"),
            Value::Str(s) => format!("string \"{s}\""),
            Value::Ident(s) => format!("identifier '{s}'"),
            Value::Vector(v) => format!("{}-component vector", v.len()),
        }
    }
}

/// What a statement starts with
#[derive(Debug, Clone, PartialEq)]
pub enum Head {
    Keyword(String),
    /// Keyframe time (`0:`)
    Frame(i64),
    /// Bare value statement (`{ 1, 2, 3 },` or `500,`)
    Value(Value),
}

impl fmt::Display for Head {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Head::Keyword(k) => write!(f, "'{k}'"),
            Head::Frame(t) => write!(f, "keyframe {t}"),
            Head::Value(v) => f.write_str(&v.describe()),
        }
    }
}

/// One parsed statement and, for scopes, its children
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub head: Head,
    pub is_static: bool,
    pub args: Vec<Value>,
    pub children: Option<Vec<Item>>,
    pub pos: Position,
}

impl Item {
    pub fn keyword(&self) -> Option<&str> {
        match &self.head {
            Head::Keyword(k) => Some(k),
            _ => None,
        }
    }

    pub fn is(&self, keyword: &str) -> bool {
        self.keyword() == Some(keyword)
    }

    /// Name used for this statement in error messages
    pub fn label(&self) -> String {
        match &self.head {
            Head::Keyword(k) => k.clone(),
            other => other.to_string(),
        }
    }

    pub fn is_block(&self) -> bool {
        self.children.is_some()
    }

    /// Children of a scope statement
    pub fn children(&self) -> Result<&[Item]> {
        self.children
            .as_deref()
            .ok_or_else(|| MdlError::structural(self.pos, format!("'{{' after {}", self.head), "','"))
    }

    /// Children of a scope statement, or nothing for a plain statement
    pub fn children_or_empty(&self) -> &[Item] {
        self.children.as_deref().unwrap_or(&[])
    }

    fn arg(&self, index: usize, expected: &str) -> Result<&Value> {
        self.args.get(index).ok_or_else(|| {
            MdlError::structural(
                self.pos,
                format!("{expected} after {}", self.head),
                "end of statement",
            )
        })
    }

    fn mismatch(&self, index: usize, expected: &str, found: &Value) -> MdlError {
        MdlError::structural(
            self.pos,
            format!("{expected} as argument {} of {}", index + 1, self.head),
            found.describe(),
        )
    }

    pub fn arg_str(&self, index: usize) -> Result<&str> {
        match self.arg(index, "a quoted string")? {
            Value::Str(s) => Ok(s),
            other => Err(self.mismatch(index, "a quoted string", other)),
        }
    }

    pub fn arg_ident(&self, index: usize) -> Result<&str> {
        match self.arg(index, "an identifier")? {
            Value::Ident(s) => Ok(s),
            other => Err(self.mismatch(index, "an identifier", other)),
        }
    }

    pub fn arg_i64(&self, index: usize) -> Result<i64> {
        match self.arg(index, "an integer")? {
            Value::Int(v) => Ok(*v),
            // Some exporters write counts and ids with a fractional part.
            Value::Float(v) if v.fract() == 0.0 => Ok(*v as i64),
            other => Err(self.mismatch(index, "an integer", other)),
        }
    }

    pub fn arg_u32(&self, index: usize) -> Result<u32> {
        let v = self.arg_i64(index)?;
        u32::try_from(v).map_err(|_| {
            MdlError::structural(
                self.pos,
                format!("a non-negative integer after {}", self.head),
                format!("{v}"),
            )
        })
    }

    pub fn arg_usize(&self, index: usize) -> Result<usize> {
        self.arg_u32(index).map(|v| v as usize)
    }

    pub fn arg_f32(&self, index: usize) -> Result<f32> {
        let value = self.arg(index, "a number")?;
        value
            .as_number()
            .map(|v| v as f32)
            .ok_or_else(|| self.mismatch(index, "a number", value))
    }

    /// Numeric components of a vector argument, or a lone scalar as a
    /// one-component vector
    pub fn arg_components(&self, index: usize) -> Result<Vec<f64>> {
        match self.arg(index, "a value")? {
            Value::Vector(v) => Ok(v.clone()),
            Value::Int(v) => Ok(vec![*v as f64]),
            Value::Float(v) => Ok(vec![*v]),
            other => Err(self.mismatch(index, "a numeric value", other)),
        }
    }

    /// A vector argument of `N` non-negative whole numbers, such as
    /// `Interval { 0, 1000 }`
    pub fn arg_u32_vector<const N: usize>(&self, index: usize) -> Result<[u32; N]> {
        let components = self.arg_components(index)?;
        if components.len() != N {
            return Err(MdlError::arity_mismatch(
                self.pos,
                self.label(),
                N,
                components.len(),
            ));
        }
        let label = self.label();
        let mut out = [0; N];
        for (dst, &src) in out.iter_mut().zip(&components) {
            *dst = whole_number(self.pos, &label, src)?;
        }
        Ok(out)
    }

    /// A vector argument with exactly `N` components
    pub fn arg_vector<const N: usize>(&self, index: usize) -> Result<[f32; N]> {
        let components = self.arg_components(index)?;
        if components.len() != N {
            return Err(MdlError::arity_mismatch(
                self.pos,
                self.label(),
                N,
                components.len(),
            ));
        }
        let mut out = [0.0; N];
        for (dst, src) in out.iter_mut().zip(&components) {
            *dst = *src as f32;
        }
        Ok(out)
    }

    /// Count argument of `Keyword N { ... }` checked against the number of
    /// children matching `child`
    pub fn declared_children<'a>(&'a self, child: &str) -> Result<Vec<&'a Item>> {
        let expected = self.arg_usize(0)?;
        let found: Vec<&Item> = self.children()?.iter().filter(|c| c.is(child)).collect();
        if found.len() != expected {
            return Err(MdlError::count_mismatch(
                self.pos,
                self.label(),
                expected,
                found.len(),
            ));
        }
        Ok(found)
    }

    /// Flat list of numbers for statements like `VertexGroup { 0, 0, 1 }`
    /// or `EventTrack 2 { 0, 500 }`, which may be written either as one
    /// vector literal or as a scope of bare values.
    pub fn flat_numbers(&self) -> Result<Vec<f64>> {
        if let Some(Value::Vector(v)) = self.args.last() {
            return Ok(v.clone());
        }
        let mut out = Vec::new();
        for child in self.children_or_empty() {
            match &child.head {
                Head::Value(Value::Vector(v)) => out.extend_from_slice(v),
                Head::Value(v) if v.as_number().is_some() => {
                    out.extend(v.as_number());
                }
                _ => {}
            }
        }
        Ok(out)
    }

    /// Bare vector statements inside a scope (`Vertices 3 { {..}, {..} }`)
    pub fn vector_children<const N: usize>(&self) -> Result<Vec<[f32; N]>> {
        let mut out = Vec::new();
        for child in self.children()? {
            let components = match &child.head {
                Head::Value(Value::Vector(v)) => v,
                Head::Keyword(_) => continue,
                _ => {
                    return Err(MdlError::structural(
                        child.pos,
                        "a vector literal",
                        child.head.to_string(),
                    ));
                }
            };
            if components.len() != N {
                return Err(MdlError::arity_mismatch(
                    child.pos,
                    self.label(),
                    N,
                    components.len(),
                ));
            }
            let mut v = [0.0; N];
            for (dst, src) in v.iter_mut().zip(components) {
                *dst = *src as f32;
            }
            out.push(v);
        }
        Ok(out)
    }
}

/// Statement reader over a token stream
pub struct BlockParser {
    tokens: Vec<SpannedToken>,
    pos: usize,
    depth: usize,
    end: Position,
}

impl BlockParser {
    pub fn new(input: &[u8]) -> Result<Self> {
        let mut lexer = crate::lexer::Lexer::new(input);
        let tokens = lexer.tokenize()?;
        Ok(Self {
            tokens,
            pos: 0,
            depth: 0,
            end: lexer.position(),
        })
    }

    /// Parser over already scanned tokens
    pub fn from_tokens(tokens: Vec<SpannedToken>) -> Self {
        let end = tokens.last().map(|t| t.pos).unwrap_or_default();
        Self {
            tokens,
            pos: 0,
            depth: 0,
            end,
        }
    }

    /// Current scope nesting
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Parse every top-level statement
    pub fn parse_all(mut self) -> Result<Vec<Item>> {
        let mut items = Vec::new();
        while let Some(item) = self.read_item()? {
            items.push(item);
        }
        self.expect_end()?;
        Ok(items)
    }

    /// Fails if input remains, which after [`Self::read_item`] returned
    /// `None` means an unmatched `}`
    pub fn expect_end(&self) -> Result<()> {
        match self.peek() {
            Some(tok) => Err(MdlError::structural(
                tok.pos,
                "a keyword at the top level",
                tok.token.to_string(),
            )),
            None => Ok(()),
        }
    }

    /// Next statement in the current scope, with its nested children.
    /// Returns `None` at a closing `}` (left unconsumed) or end of input.
    pub fn read_item(&mut self) -> Result<Option<Item>> {
        let Some(first) = self.peek().cloned() else {
            return Ok(None);
        };

        let mut is_static = false;
        let opens_brace = first.token == Token::LBrace;
        let head = match first.token {
            Token::RBrace => return Ok(None),
            Token::Ident(ref word) if word == "static" => {
                self.bump();
                is_static = true;
                match self.bump_token() {
                    Some(SpannedToken {
                        token: Token::Ident(name),
                        ..
                    }) => Head::Keyword(name),
                    other => return Err(self.unexpected(other, "a keyword after 'static'")),
                }
            }
            Token::Ident(word) => {
                self.bump();
                Head::Keyword(word)
            }
            Token::Int(time) if self.peek_nth(1).map(|t| &t.token) == Some(&Token::Colon) => {
                self.bump();
                self.bump();
                Head::Frame(time)
            }
            Token::Int(v) => {
                self.bump();
                Head::Value(Value::Int(v))
            }
            Token::Float(v) => {
                self.bump();
                Head::Value(Value::Float(v))
            }
            Token::LBrace if self.brace_opens_vector() => Head::Value(self.read_vector()?),
            Token::LBrace => {
                // Unnamed scope: `{ }` in an empty list
                Head::Value(Value::Vector(Vec::new()))
            }
            ref other @ (Token::Str(_) | Token::Comma | Token::Colon) => {
                return Err(MdlError::structural(
                    first.pos,
                    "a keyword or value",
                    other.to_string(),
                ));
            }
        };

        let mut item = Item {
            head,
            is_static,
            args: Vec::new(),
            children: None,
            pos: first.pos,
        };

        // An unnamed `{` was not consumed above; treat it as an empty scope.
        let bare_scope = opens_brace && !self.is_vector_head(&item);

        loop {
            let Some(tok) = self.peek().cloned() else {
                break;
            };
            match tok.token {
                Token::Comma => {
                    self.bump();
                    break;
                }
                Token::RBrace => break,
                Token::LBrace if !bare_scope && self.brace_opens_vector() => {
                    let v = self.read_vector()?;
                    item.args.push(v);
                }
                Token::LBrace => {
                    self.bump();
                    item.children = Some(self.read_scope(tok.pos)?);
                    if self.peek().map(|t| &t.token) == Some(&Token::Comma) {
                        self.bump();
                    }
                    break;
                }
                Token::Str(s) => {
                    self.bump();
                    item.args.push(Value::Str(s));
                }
                Token::Ident(s) => {
                    self.bump();
                    item.args.push(Value::Ident(s));
                }
                Token::Int(v) => {
                    self.bump();
                    item.args.push(Value::Int(v));
                }
                Token::Float(v) => {
                    self.bump();
                    item.args.push(Value::Float(v));
                }
                Token::Colon => {
                    return Err(MdlError::structural(
                        tok.pos,
                        "',' or '{'",
                        tok.token.to_string(),
                    ));
                }
            }
        }

        Ok(Some(item))
    }

    fn is_vector_head(&self, item: &Item) -> bool {
        matches!(&item.head, Head::Value(Value::Vector(v)) if !v.is_empty())
    }

    fn read_scope(&mut self, open: Position) -> Result<Vec<Item>> {
        self.depth += 1;
        let mut children = Vec::new();
        while let Some(child) = self.read_item()? {
            children.push(child);
        }
        match self.bump_token() {
            Some(SpannedToken {
                token: Token::RBrace,
                ..
            }) => {
                self.depth -= 1;
                Ok(children)
            }
            None => Err(MdlError::structural(
                self.end,
                format!("'}}' closing the scope opened at {open}"),
                "end of file",
            )),
            other => Err(self.unexpected(other, "'}'")),
        }
    }

    /// `{` followed by a number (or by `}` directly after a keyword with
    /// arguments) is a vector literal
    fn brace_opens_vector(&self) -> bool {
        self.peek_nth(1).is_some_and(|t| t.token.is_number())
    }

    fn read_vector(&mut self) -> Result<Value> {
        let open = self.bump_token();
        debug_assert!(matches!(
            open,
            Some(SpannedToken {
                token: Token::LBrace,
                ..
            })
        ));

        let mut components = Vec::new();
        loop {
            match self.bump_token() {
                Some(SpannedToken { token, pos }) => match token {
                    Token::Int(v) => components.push(v as f64),
                    Token::Float(v) => components.push(v),
                    Token::RBrace => break,
                    other => {
                        return Err(MdlError::structural(
                            pos,
                            "a number or '}' in a vector literal",
                            other.to_string(),
                        ));
                    }
                },
                None => {
                    return Err(MdlError::structural(
                        self.end,
                        "'}' closing a vector literal",
                        "end of file",
                    ));
                }
            }
            match self.bump_token() {
                Some(SpannedToken {
                    token: Token::Comma,
                    ..
                }) => {}
                Some(SpannedToken {
                    token: Token::RBrace,
                    ..
                }) => break,
                other => return Err(self.unexpected(other, "',' or '}' in a vector literal")),
            }
        }
        Ok(Value::Vector(components))
    }

    fn unexpected(&self, token: Option<SpannedToken>, expected: &str) -> MdlError {
        match token {
            Some(t) => MdlError::structural(t.pos, expected, t.token.to_string()),
            None => MdlError::structural(self.end, expected, "end of file"),
        }
    }

    fn peek(&self) -> Option<&SpannedToken> {
        self.tokens.get(self.pos)
    }

    fn peek_nth(&self, n: usize) -> Option<&SpannedToken> {
        self.tokens.get(self.pos + n)
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn bump_token(&mut self) -> Option<SpannedToken> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }
}

/// Parse a whole MDL buffer into its top-level statements
pub fn parse_items(input: &[u8]) -> Result<Vec<Item>> {
    BlockParser::from_tokens(tokenize(input)?).parse_all()
}

/// A number used as a time, count or index: finite, non-negative, without
/// a fractional part and within `u32`
pub fn whole_number(pos: Position, what: &str, value: f64) -> Result<u32> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= f64::from(u32::MAX) {
        Ok(value as u32)
    } else {
        Err(MdlError::structural(
            pos,
            format!("a non-negative integer in {what}"),
            format!("{value}"),
        ))
    }
}
