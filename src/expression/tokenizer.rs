//! Tokenizer for report expressions
//!
//! Zero-copy: identifiers and number literals borrow from the input; only
//! string literals with escapes allocate.

use std::borrow::Cow;

use super::error::{ParseError, ParseResult};

/// Token with its byte span in the input
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    /// The value
    pub value: T,
    /// Start position in the input
    pub start: usize,
    /// End position in the input
    pub end: usize,
}

impl<T> Spanned<T> {
    /// Create a new spanned value
    pub fn new(value: T, start: usize, end: usize) -> Self {
        Self { value, start, end }
    }
}

/// Lexical token
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'input> {
    /// Integer literal (e.g., 42)
    Integer(&'input str),
    /// Decimal literal (e.g., 3.14)
    Decimal(&'input str),
    /// String literal, quotes removed and escapes applied
    String(Cow<'input, str>),
    /// Identifier
    Identifier(&'input str),
    /// `true`
    True,
    /// `false`
    False,
    /// `null`
    Null,
    /// `and` / `&&`
    And,
    /// `or` / `||`
    Or,
    /// `not` / `!`
    Not,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Multiply,
    /// `/`
    Divide,
    /// `%`
    Percent,
    /// `&` (string concatenation)
    Ampersand,
    /// `=` / `==`
    Equal,
    /// `!=` / `<>`
    NotEqual,
    /// `<`
    LessThan,
    /// `<=`
    LessThanOrEqual,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterThanOrEqual,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `,`
    Comma,
    /// `.`
    Dot,
}

impl<'input> Token<'input> {
    /// Keyword lookup; keywords are lower-case only
    pub fn from_keyword(s: &str) -> Option<Token<'input>> {
        match s {
            "true" => Some(Token::True),
            "false" => Some(Token::False),
            "null" => Some(Token::Null),
            "and" => Some(Token::And),
            "or" => Some(Token::Or),
            "not" => Some(Token::Not),
            _ => None,
        }
    }

    /// Short description used in error messages
    pub fn describe(&self) -> String {
        match self {
            Token::Integer(s) | Token::Decimal(s) | Token::Identifier(s) => s.to_string(),
            Token::String(s) => format!("'{s}'"),
            Token::True => "true".into(),
            Token::False => "false".into(),
            Token::Null => "null".into(),
            Token::And => "and".into(),
            Token::Or => "or".into(),
            Token::Not => "not".into(),
            Token::Plus => "+".into(),
            Token::Minus => "-".into(),
            Token::Multiply => "*".into(),
            Token::Divide => "/".into(),
            Token::Percent => "%".into(),
            Token::Ampersand => "&".into(),
            Token::Equal => "=".into(),
            Token::NotEqual => "!=".into(),
            Token::LessThan => "<".into(),
            Token::LessThanOrEqual => "<=".into(),
            Token::GreaterThan => ">".into(),
            Token::GreaterThanOrEqual => ">=".into(),
            Token::LeftParen => "(".into(),
            Token::RightParen => ")".into(),
            Token::Comma => ",".into(),
            Token::Dot => ".".into(),
        }
    }
}

/// Tokenizer over one expression
pub struct Tokenizer<'input> {
    input: &'input str,
    pos: usize,
}

impl<'input> Tokenizer<'input> {
    /// Create a tokenizer
    pub fn new(input: &'input str) -> Self {
        Self { input, pos: 0 }
    }

    /// Tokenize the whole input
    pub fn tokenize_all(mut self) -> ParseResult<Vec<Spanned<Token<'input>>>> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_char_at(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    /// Produce the next token, or `None` at end of input
    pub fn next_token(&mut self) -> ParseResult<Option<Spanned<Token<'input>>>> {
        self.skip_whitespace();
        let start = self.pos;
        let Some(c) = self.peek_char() else {
            return Ok(None);
        };

        let token = match c {
            '(' => self.single(Token::LeftParen),
            ')' => self.single(Token::RightParen),
            ',' => self.single(Token::Comma),
            '.' => self.single(Token::Dot),
            '+' => self.single(Token::Plus),
            '-' => self.single(Token::Minus),
            '*' => self.single(Token::Multiply),
            '/' => self.single(Token::Divide),
            '%' => self.single(Token::Percent),
            '&' => self.pair('&', Token::And, Token::Ampersand),
            '|' if self.peek_char_at(1) == Some('|') => {
                self.pos += 2;
                Token::Or
            }
            '=' => self.pair('=', Token::Equal, Token::Equal),
            '!' => self.pair('=', Token::NotEqual, Token::Not),
            '<' => match self.peek_char_at(1) {
                Some('=') => {
                    self.pos += 2;
                    Token::LessThanOrEqual
                }
                Some('>') => {
                    self.pos += 2;
                    Token::NotEqual
                }
                _ => self.single(Token::LessThan),
            },
            '>' => self.pair('=', Token::GreaterThanOrEqual, Token::GreaterThan),
            '\'' | '"' => Token::String(self.string_literal(c)?),
            c if c.is_ascii_digit() => self.number(),
            c if is_identifier_start(c) => {
                let ident = self.identifier();
                Token::from_keyword(ident).unwrap_or(Token::Identifier(ident))
            }
            other => {
                return Err(ParseError::UnexpectedToken {
                    token: other.to_string(),
                    position: start,
                });
            }
        };

        Ok(Some(Spanned::new(token, start, self.pos)))
    }

    fn single(&mut self, token: Token<'input>) -> Token<'input> {
        self.pos += 1;
        token
    }

    fn pair(&mut self, next: char, matched: Token<'input>, alone: Token<'input>) -> Token<'input> {
        if self.peek_char_at(1) == Some(next) {
            self.pos += 2;
            matched
        } else {
            self.pos += 1;
            alone
        }
    }

    fn number(&mut self) -> Token<'input> {
        let start = self.pos;
        let bytes = self.input.as_bytes();
        while self.pos < bytes.len() && bytes[self.pos].is_ascii_digit() {
            self.pos += 1;
        }
        let is_decimal = self.pos + 1 < bytes.len()
            && bytes[self.pos] == b'.'
            && bytes[self.pos + 1].is_ascii_digit();
        if is_decimal {
            self.pos += 1;
            while self.pos < bytes.len() && bytes[self.pos].is_ascii_digit() {
                self.pos += 1;
            }
            Token::Decimal(&self.input[start..self.pos])
        } else {
            Token::Integer(&self.input[start..self.pos])
        }
    }

    fn identifier(&mut self) -> &'input str {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if !is_identifier_continue(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        &self.input[start..self.pos]
    }

    fn string_literal(&mut self, quote: char) -> ParseResult<Cow<'input, str>> {
        let open = self.pos;
        self.pos += 1;
        let content_start = self.pos;
        let mut owned: Option<String> = None;

        while let Some(c) = self.peek_char() {
            if c == quote {
                let literal = match owned {
                    Some(s) => Cow::Owned(s),
                    None => Cow::Borrowed(&self.input[content_start..self.pos]),
                };
                self.pos += 1;
                return Ok(literal);
            }
            if c == '\\' {
                let buffer =
                    owned.get_or_insert_with(|| self.input[content_start..self.pos].to_string());
                self.pos += 1;
                let Some(escaped) = self.peek_char() else {
                    break;
                };
                buffer.push(match escaped {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    other => other,
                });
                self.pos += escaped.len_utf8();
                continue;
            }
            if let Some(buffer) = owned.as_mut() {
                buffer.push(c);
            }
            self.pos += c.len_utf8();
        }

        Err(ParseError::UnclosedString { position: open })
    }
}

/// Check if a character can start an identifier
pub fn is_identifier_start(c: char) -> bool {
    unicode_xid::UnicodeXID::is_xid_start(c) || c == '_'
}

/// Check if a character can continue an identifier
pub fn is_identifier_continue(c: char) -> bool {
    unicode_xid::UnicodeXID::is_xid_continue(c)
}
