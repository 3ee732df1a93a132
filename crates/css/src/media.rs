//! Media query parsing
//!
//! Parses single media queries and comma-separated media query lists into a
//! structured form. Per CSS error handling, an unparsable query inside a
//! list is replaced by `not all` so the list keeps its shape; a single
//! query parse simply fails.

use std::fmt;

use crate::error::{CssError, CssResult, SourceLocation};
use crate::tokenizer::{Token, Tokenizer};
use crate::value::{self, CssValue};

/// A parsed media query
#[derive(Debug, Clone, PartialEq)]
pub struct MediaQuery {
    pub restrictor: Option<MediaRestrictor>,
    pub media_type: MediaType,
    /// `and`-joined feature conditions
    pub conditions: Vec<MediaFeature>,
}

/// A comma-separated media query list
pub type MediaQueryList = Vec<MediaQuery>;

/// Query restrictor keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaRestrictor {
    Not,
    Only,
}

/// Recognized media types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    All,
    Screen,
    Print,
}

impl MediaType {
    fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "all" => Some(Self::All),
            "screen" => Some(Self::Screen),
            "print" => Some(Self::Print),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Screen => "screen",
            Self::Print => "print",
        }
    }
}

/// A parenthesized media feature, e.g. `(max-width: 600px)`
#[derive(Debug, Clone, PartialEq)]
pub struct MediaFeature {
    pub name: String,
    /// None for boolean features like `(color)`
    pub value: Option<CssValue>,
}

impl MediaQuery {
    /// The `not all` query that an unparsable list entry collapses to
    pub fn not_all() -> Self {
        Self {
            restrictor: Some(MediaRestrictor::Not),
            media_type: MediaType::All,
            conditions: Vec::new(),
        }
    }
}

impl fmt::Display for MediaQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.restrictor {
            Some(MediaRestrictor::Not) => write!(f, "not ")?,
            Some(MediaRestrictor::Only) => write!(f, "only ")?,
            None => {}
        }
        write!(f, "{}", self.media_type.name())?;
        for condition in &self.conditions {
            write!(f, " and {}", condition)?;
        }
        Ok(())
    }
}

impl fmt::Display for MediaFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "({}: {})", self.name, value),
            None => write!(f, "({})", self.name),
        }
    }
}

/// Parse a single media query, consuming the whole input
pub fn parse_media_query(input: &str) -> CssResult<MediaQuery> {
    let mut parser = MediaQueryParser::new(input);
    let query = parser.parse_query()?;
    parser.require_eof(input)?;
    Ok(query)
}

/// Parse a comma-separated media query list.
///
/// Empty input yields an empty list; an entry that fails to parse becomes
/// `not all`.
pub fn parse_media_query_list(input: &str) -> MediaQueryList {
    if input.trim().is_empty() {
        return MediaQueryList::new();
    }
    split_top_level_commas(input)
        .map(|segment| {
            parse_media_query(segment).unwrap_or_else(|err| {
                log::debug!("media query '{}' did not parse: {}", segment.trim(), err);
                MediaQuery::not_all()
            })
        })
        .collect()
}

/// Split on commas not nested inside parentheses
fn split_top_level_commas(input: &str) -> impl Iterator<Item = &str> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (index, c) in input.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                segments.push(&input[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    if start < input.len() || !segments.is_empty() {
        segments.push(&input[start..]);
    }
    segments.into_iter()
}

struct MediaQueryParser<'a> {
    tokenizer: Tokenizer<'a>,
    current: Option<Token>,
}

impl<'a> MediaQueryParser<'a> {
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

    fn require_eof(&mut self, input: &str) -> CssResult<()> {
        self.skip_whitespace();
        if self.at_end() {
            Ok(())
        } else {
            Err(CssError::InvalidMediaQuery {
                query: input.trim().to_string(),
                location: self.location(),
            })
        }
    }

    fn error(&self, input: &str) -> CssError {
        CssError::InvalidMediaQuery {
            query: input.to_string(),
            location: self.location(),
        }
    }

    fn parse_query(&mut self) -> CssResult<MediaQuery> {
        self.skip_whitespace();
        if self.at_end() {
            return Err(self.error(""));
        }

        let mut restrictor = None;
        let mut media_type = None;
        let mut conditions = Vec::new();

        // Leading feature means a typeless query: "(min-width: 10px) and ..."
        if !matches!(self.peek(), Some(Token::LeftParen)) {
            let ident = match self.advance() {
                Some(Token::Ident(name)) => name.to_ascii_lowercase(),
                _ => return Err(self.error("")),
            };
            let type_name = match ident.as_str() {
                "not" => {
                    restrictor = Some(MediaRestrictor::Not);
                    self.expect_ident()?
                }
                "only" => {
                    restrictor = Some(MediaRestrictor::Only);
                    self.expect_ident()?
                }
                _ => ident,
            };
            media_type =
                Some(MediaType::from_name(&type_name).ok_or_else(|| self.error(&type_name))?);
        } else {
            conditions.push(self.parse_feature()?);
        }

        loop {
            self.skip_whitespace();
            if self.at_end() {
                break;
            }
            match self.advance() {
                Some(Token::Ident(word)) if word.eq_ignore_ascii_case("and") => {
                    self.skip_whitespace();
                    conditions.push(self.parse_feature()?);
                }
                _ => return Err(self.error("")),
            }
        }

        Ok(MediaQuery {
            restrictor,
            media_type: media_type.unwrap_or(MediaType::All),
            conditions,
        })
    }

    fn expect_ident(&mut self) -> CssResult<String> {
        self.skip_whitespace();
        match self.advance() {
            Some(Token::Ident(name)) => Ok(name.to_ascii_lowercase()),
            _ => Err(self.error("")),
        }
    }

    fn parse_feature(&mut self) -> CssResult<MediaFeature> {
        if !matches!(self.peek(), Some(Token::LeftParen)) {
            return Err(self.error(""));
        }
        self.advance();
        self.skip_whitespace();

        let name = match self.advance() {
            Some(Token::Ident(name)) => name.to_ascii_lowercase(),
            _ => return Err(self.error("")),
        };

        self.skip_whitespace();
        let value = match self.advance() {
            Some(Token::RightParen) => return Ok(MediaFeature { name, value: None }),
            Some(Token::Colon) => {
                self.skip_whitespace();
                let location = self.location();
                let mut values = Vec::new();
                loop {
                    match self.advance() {
                        Some(Token::RightParen) => break,
                        Some(Token::Whitespace) => {}
                        Some(Token::Eof) | None => return Err(self.error(&name)),
                        Some(token) => values.push(value::value_from_token(&token, location)?),
                    }
                }
                match values.len() {
                    0 => return Err(self.error(&name)),
                    1 => values.remove(0),
                    _ => CssValue::List(values),
                }
            }
            _ => return Err(self.error(&name)),
        };

        Ok(MediaFeature { name, value: Some(value) })
    }
}
