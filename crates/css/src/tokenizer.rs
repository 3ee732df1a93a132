//! CSS Tokenizer
//!
//! Tokenizes CSS input according to CSS Syntax Module Level 3, including
//! comments, escape sequences, and url() tokens.

use crate::error::{CssError, CssResult, SourceLocation};

/// CSS token types
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Identifier (property names, keywords)
    Ident(String),
    /// Function token (identifier immediately followed by '(')
    Function(String),
    /// At-keyword (e.g. @media, @supports)
    AtKeyword(String),
    /// Hash token (e.g. #main, #fff)
    Hash(String, HashType),
    /// Quoted string
    String(String),
    /// Unquoted url() token
    Url(String),
    /// Number without unit
    Number(f32),
    /// Percentage
    Percentage(f32),
    /// Number with unit
    Dimension(f32, String),
    /// One or more whitespace characters
    Whitespace,
    /// ':'
    Colon,
    /// ';'
    Semicolon,
    /// ','
    Comma,
    /// '['
    LeftBracket,
    /// ']'
    RightBracket,
    /// '('
    LeftParen,
    /// ')'
    RightParen,
    /// '{'
    LeftBrace,
    /// '}'
    RightBrace,
    /// Any other single character
    Delim(char),
    /// End of input
    Eof,
}

/// Hash token type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashType {
    /// The name is a valid identifier (usable as an ID selector)
    Id,
    /// Unrestricted (e.g. a hex color like #0af)
    Unrestricted,
}

/// CSS tokenizer over a borrowed text span
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0, line: 1, column: 1 }
    }

    /// Current source location
    pub fn location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column, self.pos)
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_at(&self, nth: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(nth)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Produce the next token
    pub fn next_token(&mut self) -> CssResult<Token> {
        self.skip_comments()?;

        let Some(c) = self.peek() else {
            return Ok(Token::Eof);
        };

        if c.is_ascii_whitespace() {
            while matches!(self.peek(), Some(w) if w.is_ascii_whitespace()) {
                self.advance();
            }
            return Ok(Token::Whitespace);
        }

        match c {
            '"' | '\'' => self.consume_string(c),
            '#' => {
                self.advance();
                if self.peek().is_some_and(is_name_char) || self.starts_escape() {
                    let hash_type = if self.starts_identifier() {
                        HashType::Id
                    } else {
                        HashType::Unrestricted
                    };
                    let name = self.consume_name()?;
                    Ok(Token::Hash(name, hash_type))
                } else {
                    Ok(Token::Delim('#'))
                }
            }
            '@' => {
                self.advance();
                if self.starts_identifier() {
                    Ok(Token::AtKeyword(self.consume_name()?))
                } else {
                    Ok(Token::Delim('@'))
                }
            }
            ':' => {
                self.advance();
                Ok(Token::Colon)
            }
            ';' => {
                self.advance();
                Ok(Token::Semicolon)
            }
            ',' => {
                self.advance();
                Ok(Token::Comma)
            }
            '[' => {
                self.advance();
                Ok(Token::LeftBracket)
            }
            ']' => {
                self.advance();
                Ok(Token::RightBracket)
            }
            '(' => {
                self.advance();
                Ok(Token::LeftParen)
            }
            ')' => {
                self.advance();
                Ok(Token::RightParen)
            }
            '{' => {
                self.advance();
                Ok(Token::LeftBrace)
            }
            '}' => {
                self.advance();
                Ok(Token::RightBrace)
            }
            '+' | '-' | '.' if self.starts_number() => self.consume_numeric(),
            '-' if self.starts_identifier() => self.consume_ident_like(),
            '\\' if self.starts_escape() => self.consume_ident_like(),
            c if c.is_ascii_digit() => self.consume_numeric(),
            c if is_name_start_char(c) => self.consume_ident_like(),
            c => {
                self.advance();
                Ok(Token::Delim(c))
            }
        }
    }

    /// Consume "/* ... */" comments; an unterminated comment runs to EOF
    fn skip_comments(&mut self) -> CssResult<()> {
        while self.peek() == Some('/') && self.peek_at(1) == Some('*') {
            self.advance();
            self.advance();
            loop {
                match self.advance() {
                    Some('*') if self.peek() == Some('/') => {
                        self.advance();
                        break;
                    }
                    Some(_) => {}
                    None => return Ok(()),
                }
            }
        }
        Ok(())
    }

    /// Would the next characters begin an identifier?
    fn starts_identifier(&self) -> bool {
        match self.peek() {
            Some('-') => match self.peek_at(1) {
                Some('-') => true,
                Some('\\') => true,
                Some(c) => is_name_start_char(c),
                None => false,
            },
            Some('\\') => self.starts_escape(),
            Some(c) => is_name_start_char(c),
            None => false,
        }
    }

    /// Would the next characters begin a number?
    fn starts_number(&self) -> bool {
        match self.peek() {
            Some('+') | Some('-') => match self.peek_at(1) {
                Some(c) if c.is_ascii_digit() => true,
                Some('.') => self.peek_at(2).is_some_and(|c| c.is_ascii_digit()),
                _ => false,
            },
            Some('.') => self.peek_at(1).is_some_and(|c| c.is_ascii_digit()),
            Some(c) => c.is_ascii_digit(),
            None => false,
        }
    }

    /// Is the next character pair a valid escape?
    fn starts_escape(&self) -> bool {
        self.peek() == Some('\\') && !matches!(self.peek_at(1), Some('\n') | None)
    }

    /// Consume a name (identifier body), resolving escapes
    fn consume_name(&mut self) -> CssResult<String> {
        let mut name = String::new();
        loop {
            match self.peek() {
                Some(c) if is_name_char(c) => {
                    self.advance();
                    name.push(c);
                }
                Some('\\') if self.starts_escape() => {
                    name.push(self.consume_escape()?);
                }
                _ => break,
            }
        }
        Ok(name)
    }

    /// Consume an escape sequence, after the '\\' has been checked
    fn consume_escape(&mut self) -> CssResult<char> {
        self.advance(); // '\\'
        let location = self.location();
        let Some(c) = self.advance() else {
            return Err(CssError::unexpected_eof(location));
        };
        if !c.is_ascii_hexdigit() {
            return Ok(c);
        }

        let mut code = c.to_digit(16).unwrap_or(0);
        let mut digits = 1;
        while digits < 6 {
            match self.peek() {
                Some(h) if h.is_ascii_hexdigit() => {
                    self.advance();
                    code = code * 16 + h.to_digit(16).unwrap_or(0);
                    digits += 1;
                }
                _ => break,
            }
        }
        // A single whitespace character after a hex escape is consumed
        if matches!(self.peek(), Some(w) if w.is_ascii_whitespace()) {
            self.advance();
        }
        Ok(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER))
    }

    fn consume_string(&mut self, quote: char) -> CssResult<Token> {
        self.advance(); // opening quote
        let mut value = String::new();
        loop {
            let location = self.location();
            match self.peek() {
                None | Some('\n') => {
                    return Err(CssError::UnterminatedString { location });
                }
                Some(c) if c == quote => {
                    self.advance();
                    return Ok(Token::String(value));
                }
                Some('\\') => {
                    if self.peek_at(1) == Some('\n') {
                        // Escaped newline: line continuation
                        self.advance();
                        self.advance();
                    } else if self.starts_escape() {
                        value.push(self.consume_escape()?);
                    } else {
                        // Backslash at EOF
                        self.advance();
                    }
                }
                Some(c) => {
                    self.advance();
                    value.push(c);
                }
            }
        }
    }

    fn consume_numeric(&mut self) -> CssResult<Token> {
        let start = self.pos;
        let location = self.location();

        if matches!(self.peek(), Some('+') | Some('-')) {
            self.advance();
        }
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.advance();
        }
        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.advance();
            }
        }
        if matches!(self.peek(), Some('e') | Some('E')) {
            let mut lookahead = 1;
            if matches!(self.peek_at(1), Some('+') | Some('-')) {
                lookahead = 2;
            }
            if self.peek_at(lookahead).is_some_and(|c| c.is_ascii_digit()) {
                for _ in 0..=lookahead {
                    self.advance();
                }
                while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                    self.advance();
                }
            }
        }

        let text = &self.input[start..self.pos];
        let number: f32 = text.parse().map_err(|_| CssError::InvalidNumber {
            number: text.to_string(),
            location,
        })?;

        if self.peek() == Some('%') {
            self.advance();
            Ok(Token::Percentage(number))
        } else if self.starts_identifier() {
            let unit = self.consume_name()?;
            Ok(Token::Dimension(number, unit))
        } else {
            Ok(Token::Number(number))
        }
    }

    fn consume_ident_like(&mut self) -> CssResult<Token> {
        let name = self.consume_name()?;
        if self.peek() == Some('(') {
            self.advance();
            if name.eq_ignore_ascii_case("url") && !matches!(self.peek(), Some('"') | Some('\'')) {
                return self.consume_url();
            }
            return Ok(Token::Function(name));
        }
        Ok(Token::Ident(name))
    }

    /// Consume the remainder of an unquoted url() token; '(' already consumed
    fn consume_url(&mut self) -> CssResult<Token> {
        let mut url = String::new();
        loop {
            match self.peek() {
                None => return Ok(Token::Url(url.trim().to_string())),
                Some(')') => {
                    self.advance();
                    return Ok(Token::Url(url.trim().to_string()));
                }
                Some('\\') if self.starts_escape() => {
                    url.push(self.consume_escape()?);
                }
                Some(c) => {
                    self.advance();
                    url.push(c);
                }
            }
        }
    }
}

fn is_name_start_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

fn is_name_char(c: char) -> bool {
    is_name_start_char(c) || c.is_ascii_digit() || c == '-'
}
