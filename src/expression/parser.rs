//! Pratt parser for report expressions
//!
//! Precedence levels, lowest first:
//!
//! | Level | Operators |
//! |---|---|
//! | Or | `or`, `\|\|` |
//! | And | `and`, `&&` |
//! | Equality | `=`, `!=` |
//! | Inequality | `<`, `<=`, `>`, `>=` |
//! | Additive | `+`, `-`, `&` |
//! | Multiplicative | `*`, `/`, `%` |
//! | Unary | `-`, `not`, `!` |
//! | Invocation | `.` |

use std::str::FromStr;

use rust_decimal::Decimal;

use super::ast::{BinaryOperator, ExpressionNode, UnaryOperator};
use super::error::{ParseError, ParseResult};
use super::tokenizer::{Spanned, Token, Tokenizer};
use crate::model::Value;

/// Operator precedence levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Precedence {
    /// Logical OR
    Or = 1,
    /// Logical AND
    And = 2,
    /// Equality operators
    Equality = 3,
    /// Inequality operators
    Inequality = 4,
    /// Additive operators and concatenation
    Additive = 5,
    /// Multiplicative operators
    Multiplicative = 6,
    /// Unary prefix operators
    Unary = 7,
    /// Member access and calls
    Invocation = 8,
}

impl Precedence {
    /// Next higher level, used for the right operand of left-associative operators
    pub const fn next_level(self) -> Self {
        match self {
            Precedence::Or => Precedence::And,
            Precedence::And => Precedence::Equality,
            Precedence::Equality => Precedence::Inequality,
            Precedence::Inequality => Precedence::Additive,
            Precedence::Additive => Precedence::Multiplicative,
            Precedence::Multiplicative => Precedence::Unary,
            Precedence::Unary | Precedence::Invocation => Precedence::Invocation,
        }
    }
}

fn get_precedence(token: &Token<'_>) -> Option<Precedence> {
    match token {
        Token::Dot => Some(Precedence::Invocation),
        Token::Equal | Token::NotEqual => Some(Precedence::Equality),
        Token::Plus | Token::Minus | Token::Ampersand => Some(Precedence::Additive),
        Token::And => Some(Precedence::And),
        Token::Or => Some(Precedence::Or),
        Token::Multiply | Token::Divide | Token::Percent => Some(Precedence::Multiplicative),
        Token::LessThan
        | Token::LessThanOrEqual
        | Token::GreaterThan
        | Token::GreaterThanOrEqual => Some(Precedence::Inequality),
        _ => None,
    }
}

fn token_to_binary_op(token: &Token<'_>) -> Option<BinaryOperator> {
    match token {
        Token::Equal => Some(BinaryOperator::Equal),
        Token::NotEqual => Some(BinaryOperator::NotEqual),
        Token::Plus => Some(BinaryOperator::Add),
        Token::Minus => Some(BinaryOperator::Subtract),
        Token::Ampersand => Some(BinaryOperator::Concatenate),
        Token::And => Some(BinaryOperator::And),
        Token::Or => Some(BinaryOperator::Or),
        Token::Multiply => Some(BinaryOperator::Multiply),
        Token::Divide => Some(BinaryOperator::Divide),
        Token::Percent => Some(BinaryOperator::Modulo),
        Token::LessThan => Some(BinaryOperator::LessThan),
        Token::LessThanOrEqual => Some(BinaryOperator::LessThanOrEqual),
        Token::GreaterThan => Some(BinaryOperator::GreaterThan),
        Token::GreaterThanOrEqual => Some(BinaryOperator::GreaterThanOrEqual),
        _ => None,
    }
}

/// Parse an expression into its syntax tree
pub fn parse_expression(input: &str) -> ParseResult<ExpressionNode> {
    PrattParser::new(input)?.parse()
}

/// Streaming Pratt parser over a [`Tokenizer`]
pub struct PrattParser<'input> {
    tokenizer: Tokenizer<'input>,
    current: Option<Spanned<Token<'input>>>,
    input_len: usize,
}

impl<'input> PrattParser<'input> {
    /// Create a parser positioned on the first token
    pub fn new(input: &'input str) -> ParseResult<Self> {
        let mut tokenizer = Tokenizer::new(input);
        let current = tokenizer.next_token()?;
        Ok(Self {
            tokenizer,
            current,
            input_len: input.len(),
        })
    }

    /// Parse a complete expression; trailing tokens are an error
    pub fn parse(mut self) -> ParseResult<ExpressionNode> {
        let expression = self.parse_with_precedence(Precedence::Or)?;
        match self.current.take() {
            None => Ok(expression),
            Some(token) => Err(ParseError::UnexpectedToken {
                token: token.value.describe(),
                position: token.start,
            }),
        }
    }

    fn advance(&mut self) -> ParseResult<()> {
        self.current = self.tokenizer.next_token()?;
        Ok(())
    }

    fn current(&self) -> Option<&Token<'input>> {
        self.current.as_ref().map(|t| &t.value)
    }

    fn position(&self) -> usize {
        self.current.as_ref().map_or(self.input_len, |t| t.start)
    }

    fn expect(&mut self, expected: Token<'input>, description: &str) -> ParseResult<()> {
        match self.current() {
            Some(token) if *token == expected => self.advance(),
            _ => Err(ParseError::ExpectedToken {
                expected: description.to_string(),
                position: self.position(),
            }),
        }
    }

    fn parse_with_precedence(&mut self, min_precedence: Precedence) -> ParseResult<ExpressionNode> {
        let mut left = self.parse_unary()?;

        while let Some(token) = self.current() {
            let precedence = match get_precedence(token) {
                Some(precedence) if precedence >= min_precedence => precedence,
                _ => break,
            };
            let Some(op) = token_to_binary_op(token) else {
                break;
            };
            self.advance()?;
            let right = self.parse_with_precedence(precedence.next_level())?;
            left = ExpressionNode::binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> ParseResult<ExpressionNode> {
        let op = match self.current() {
            Some(Token::Minus) => UnaryOperator::Negate,
            Some(Token::Not) => UnaryOperator::Not,
            _ => {
                let primary = self.parse_primary()?;
                return self.parse_postfix(primary);
            }
        };
        self.advance()?;
        if op == UnaryOperator::Negate {
            if let Some(literal) = self.negative_integer()? {
                return self.parse_postfix(literal);
            }
        }
        let operand = self.parse_unary()?;
        Ok(ExpressionNode::unary(op, operand))
    }

    /// `-` directly followed by an integer literal folds into one literal,
    /// so the full `i64` range is writable
    fn negative_integer(&mut self) -> ParseResult<Option<ExpressionNode>> {
        let Some(Spanned {
            value: Token::Integer(text),
            start,
            ..
        }) = self.current
        else {
            return Ok(None);
        };
        let value = format!("-{text}")
            .parse::<i64>()
            .map_err(|_| ParseError::InvalidNumber {
                literal: format!("-{text}"),
                position: start,
            })?;
        self.advance()?;
        Ok(Some(ExpressionNode::literal(value)))
    }

    fn parse_primary(&mut self) -> ParseResult<ExpressionNode> {
        let Some(spanned) = self.current.take() else {
            return Err(ParseError::UnexpectedEof);
        };
        let position = spanned.start;

        let node = match spanned.value {
            Token::Identifier(name) => ExpressionNode::identifier(name),
            Token::Integer(text) => {
                let value = text.parse::<i64>().map_err(|_| ParseError::InvalidNumber {
                    literal: text.to_string(),
                    position,
                })?;
                ExpressionNode::literal(value)
            }
            Token::Decimal(text) => {
                let value = Decimal::from_str(text).map_err(|_| ParseError::InvalidNumber {
                    literal: text.to_string(),
                    position,
                })?;
                ExpressionNode::literal(value)
            }
            Token::String(text) => ExpressionNode::literal(text.into_owned()),
            Token::True => ExpressionNode::literal(true),
            Token::False => ExpressionNode::literal(false),
            Token::Null => ExpressionNode::Literal(Value::Empty),
            Token::LeftParen => {
                self.advance()?;
                let inner = self.parse_with_precedence(Precedence::Or)?;
                self.expect(Token::RightParen, "')'")?;
                return Ok(inner);
            }
            other => {
                return Err(ParseError::UnexpectedToken {
                    token: other.describe(),
                    position,
                });
            }
        };

        self.advance()?;
        Ok(node)
    }

    fn parse_postfix(&mut self, mut target: ExpressionNode) -> ParseResult<ExpressionNode> {
        while let Some(Token::Dot) = self.current() {
            self.advance()?;
            let member = match self.current() {
                Some(Token::Identifier(name)) => name.to_string(),
                _ => {
                    return Err(ParseError::ExpectedToken {
                        expected: "member name after '.'".to_string(),
                        position: self.position(),
                    });
                }
            };
            let member_position = self.position();
            self.advance()?;

            if let Some(Token::LeftParen) = self.current() {
                let ExpressionNode::Identifier(type_name) = target else {
                    return Err(ParseError::ExpectedToken {
                        expected: format!("type name before call to '{member}'"),
                        position: member_position,
                    });
                };
                let args = self.parse_arguments()?;
                target = ExpressionNode::Call {
                    type_name,
                    function: member,
                    args,
                };
            } else {
                target = ExpressionNode::member(target, member);
            }
        }
        Ok(target)
    }

    fn parse_arguments(&mut self) -> ParseResult<Vec<ExpressionNode>> {
        self.expect(Token::LeftParen, "'('")?;
        let mut args = Vec::new();
        if let Some(Token::RightParen) = self.current() {
            self.advance()?;
            return Ok(args);
        }
        loop {
            args.push(self.parse_with_precedence(Precedence::Or)?);
            match self.current() {
                Some(Token::Comma) => self.advance()?,
                Some(Token::RightParen) => {
                    self.advance()?;
                    return Ok(args);
                }
                _ => {
                    return Err(ParseError::ExpectedToken {
                        expected: "',' or ')'".to_string(),
                        position: self.position(),
                    });
                }
            }
        }
    }
}
