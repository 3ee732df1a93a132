//! @supports condition parsing
//!
//! Parses `<supports-condition>` grammar: `not`, `and`/`or` chains,
//! parenthesized declarations, and `selector(...)` queries. Whether a
//! condition actually holds is the style system's concern, not the
//! parser's.

use std::fmt;

use crate::error::{CssError, CssResult, SourceLocation};
use crate::tokenizer::{Token, Tokenizer};

/// A parsed @supports condition
#[derive(Debug, Clone, PartialEq)]
pub enum SupportsCondition {
    Not(Box<SupportsCondition>),
    And(Vec<SupportsCondition>),
    Or(Vec<SupportsCondition>),
    /// `(property: value)`; the value is kept as raw text
    Declaration { property: String, value: String },
    /// `selector(...)` query, kept as raw selector text
    Selector(String),
}

impl fmt::Display for SupportsCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Not(inner) => write!(f, "not {}", inner),
            Self::And(conditions) => {
                for (index, condition) in conditions.iter().enumerate() {
                    if index > 0 {
                        write!(f, " and ")?;
                    }
                    write!(f, "{}", condition)?;
                }
                Ok(())
            }
            Self::Or(conditions) => {
                for (index, condition) in conditions.iter().enumerate() {
                    if index > 0 {
                        write!(f, " or ")?;
                    }
                    write!(f, "{}", condition)?;
                }
                Ok(())
            }
            Self::Declaration { property, value } => write!(f, "({}: {})", property, value),
            Self::Selector(text) => write!(f, "selector({})", text),
        }
    }
}

/// Parse a supports condition, consuming the whole input
pub fn parse_supports_condition(input: &str) -> CssResult<SupportsCondition> {
    let mut parser = SupportsParser::new(input);
    let condition = parser.parse_condition()?;
    parser.require_eof()?;
    Ok(condition)
}

struct SupportsParser<'a> {
    tokenizer: Tokenizer<'a>,
    current: Option<Token>,
}

impl<'a> SupportsParser<'a> {
    fn new(input: &'a str) -> Self {
        let mut tokenizer = Tokenizer::new(input);
        let current = tokenizer.next_token().ok();
        Self { tokenizer, current }
    }

    fn location(&self) -> SourceLocation {
        self.tokenizer.location()
    }

    fn advance(&mut self) -> Option<Token> {
        let prev = self.current.take();
        self.current = self.tokenizer.next_token().ok();
        prev
    }

    fn peek(&self) -> Option<&Token> {
        self.current.as_ref()
    }

    fn skip_whitespace(&mut self) {
        while let Some(Token::Whitespace) = self.peek() {
            self.advance();
        }
    }

    fn at_end(&self) -> bool {
        matches!(self.peek(), None | Some(Token::Eof))
    }

    fn error(&self, condition: impl Into<String>) -> CssError {
        CssError::InvalidCondition {
            condition: condition.into(),
            location: self.location(),
        }
    }

    fn require_eof(&mut self) -> CssResult<()> {
        self.skip_whitespace();
        if self.at_end() {
            Ok(())
        } else {
            Err(self.error(format!("{:?}", self.peek())))
        }
    }

    fn parse_condition(&mut self) -> CssResult<SupportsCondition> {
        self.skip_whitespace();

        if let Some(Token::Ident(word)) = self.peek() {
            if word.eq_ignore_ascii_case("not") {
                self.advance();
                self.skip_whitespace();
                let inner = self.parse_condition_in_parens()?;
                return Ok(SupportsCondition::Not(Box::new(inner)));
            }
        }

        let first = self.parse_condition_in_parens()?;
        let mut conditions = vec![first];
        let mut joiner: Option<bool> = None; // true = and, false = or

        loop {
            self.skip_whitespace();
            if self.at_end() {
                break;
            }
            let word = match self.peek() {
                Some(Token::Ident(word)) => word.to_ascii_lowercase(),
                _ => break,
            };
            let is_and = match word.as_str() {
                "and" => true,
                "or" => false,
                _ => break,
            };
            // `and` and `or` cannot be mixed without parentheses
            if joiner.is_some_and(|previous| previous != is_and) {
                return Err(self.error(word));
            }
            joiner = Some(is_and);
            self.advance();
            self.skip_whitespace();
            conditions.push(self.parse_condition_in_parens()?);
        }

        match joiner {
            None => Ok(conditions.remove(0)),
            Some(true) => Ok(SupportsCondition::And(conditions)),
            Some(false) => Ok(SupportsCondition::Or(conditions)),
        }
    }

    fn parse_condition_in_parens(&mut self) -> CssResult<SupportsCondition> {
        match self.peek().cloned() {
            Some(Token::Function(name)) if name.eq_ignore_ascii_case("selector") => {
                self.advance();
                let text = self.collect_until_close_paren()?;
                Ok(SupportsCondition::Selector(text))
            }
            Some(Token::LeftParen) => {
                self.advance();
                self.skip_whitespace();

                // Either a nested condition or a declaration
                if self.looks_like_nested_condition() {
                    let inner = self.parse_condition()?;
                    self.skip_whitespace();
                    match self.advance() {
                        Some(Token::RightParen) => Ok(inner),
                        _ => Err(self.error(")")),
                    }
                } else {
                    self.parse_declaration_condition()
                }
            }
            _ => Err(self.error(format!("{:?}", self.peek()))),
        }
    }

    fn looks_like_nested_condition(&self) -> bool {
        match self.peek() {
            Some(Token::LeftParen) => true,
            Some(Token::Function(name)) => name.eq_ignore_ascii_case("selector"),
            Some(Token::Ident(word)) => word.eq_ignore_ascii_case("not"),
            _ => false,
        }
    }

    fn parse_declaration_condition(&mut self) -> CssResult<SupportsCondition> {
        let property = match self.advance() {
            Some(Token::Ident(name)) => name.to_ascii_lowercase(),
            _ => return Err(self.error("declaration")),
        };
        self.skip_whitespace();
        match self.advance() {
            Some(Token::Colon) => {}
            _ => return Err(self.error(property)),
        }
        let value = self.collect_until_close_paren()?;
        if value.is_empty() {
            return Err(self.error(property));
        }
        Ok(SupportsCondition::Declaration { property, value })
    }

    /// Collect raw text up to the matching ')'
    fn collect_until_close_paren(&mut self) -> CssResult<String> {
        let mut text = String::new();
        let mut depth = 1usize;
        loop {
            match self.advance() {
                Some(Token::LeftParen) => {
                    depth += 1;
                    text.push('(');
                }
                Some(Token::Function(name)) => {
                    depth += 1;
                    text.push_str(&name);
                    text.push('(');
                }
                Some(Token::RightParen) => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                    text.push(')');
                }
                Some(Token::Eof) | None => return Err(self.error(text)),
                Some(Token::Whitespace) => text.push(' '),
                Some(Token::Ident(s)) => text.push_str(&s),
                Some(Token::String(s)) => {
                    text.push('"');
                    text.push_str(&s);
                    text.push('"');
                }
                Some(Token::Hash(s, _)) => {
                    text.push('#');
                    text.push_str(&s);
                }
                Some(Token::Number(n)) => text.push_str(&n.to_string()),
                Some(Token::Percentage(n)) => {
                    text.push_str(&n.to_string());
                    text.push('%');
                }
                Some(Token::Dimension(n, unit)) => {
                    text.push_str(&n.to_string());
                    text.push_str(&unit);
                }
                Some(Token::Url(s)) => {
                    text.push_str("url(");
                    text.push_str(&s);
                    text.push(')');
                }
                Some(Token::Colon) => text.push(':'),
                Some(Token::Semicolon) => text.push(';'),
                Some(Token::Comma) => text.push(','),
                Some(Token::LeftBracket) => text.push('['),
                Some(Token::RightBracket) => text.push(']'),
                Some(Token::LeftBrace) => text.push('{'),
                Some(Token::RightBrace) => text.push('}'),
                Some(Token::Delim(c)) => text.push(c),
                Some(Token::AtKeyword(s)) => {
                    text.push('@');
                    text.push_str(&s);
                }
            }
        }
        Ok(text.trim().to_string())
    }
}
