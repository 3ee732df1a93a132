//! CSS Parser
//!
//! The grammar engine. A [`Parser`] is constructed fresh for every
//! production call, bound to one text span and one set of options; it owns
//! no state beyond the current parse. Each `parse_as_*` method corresponds
//! to one grammar production and converts internal grammar errors to an
//! absent or empty result.

use crate::descriptor::{AtRuleId, Descriptor, DescriptorId};
use crate::error::{CssError, CssResult, SourceLocation};
use crate::media::{self, MediaQuery, MediaQueryList};
use crate::property::{
    self, Declaration, PropertyDeclarationBlock, PropertyId,
};
use crate::selector::{
    self, adapt_nested_relative_selector_list, PageSelectorList, PseudoElementSelector,
    RelativeSelectorList, SelectorList,
};
use crate::supports::{self, SupportsCondition};
use crate::tokenizer::{Token, Tokenizer};
use crate::value::{self, CssValue, LengthUnit};

/// Quirks mode of the document the text came from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuirksMode {
    #[default]
    NoQuirks,
    Quirks,
}

/// Environment-specific parsing settings, carried by the parsing context
#[derive(Debug, Clone, PartialEq)]
pub struct ParserOptions {
    pub quirks_mode: QuirksMode,
    /// Declared encoding label of the source; decoding happens before this
    /// layer, the label is carried for callers
    pub encoding: String,
    /// Whether nested style rules are recognized inside rule bodies
    pub allow_nested_rules: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            quirks_mode: QuirksMode::NoQuirks,
            encoding: "utf-8".to_string(),
            allow_nested_rules: true,
        }
    }
}

/// A parsed stylesheet: its rule list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stylesheet {
    pub rules: Vec<Rule>,
}

/// A CSS rule
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    Style(StyleRule),
    Import(ImportRule),
    Media(MediaRule),
    Supports(SupportsRule),
    FontFace(FontFaceRule),
    Page(PageRule),
    Keyframes(KeyframesRule),
}

/// A style rule (selectors { declarations and nested rules })
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRule {
    pub selectors: SelectorList,
    pub block: PropertyDeclarationBlock,
    /// Nested style rules, selectors already adapted to standalone form
    pub nested: Vec<StyleRule>,
}

/// @import rule
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRule {
    pub url: String,
    pub media: MediaQueryList,
}

/// @media rule
#[derive(Debug, Clone, PartialEq)]
pub struct MediaRule {
    pub queries: MediaQueryList,
    pub rules: Vec<Rule>,
}

/// @supports rule
#[derive(Debug, Clone, PartialEq)]
pub struct SupportsRule {
    pub condition: SupportsCondition,
    pub rules: Vec<Rule>,
}

/// @font-face rule
#[derive(Debug, Clone, PartialEq)]
pub struct FontFaceRule {
    pub descriptors: Vec<Descriptor>,
}

/// @page rule
#[derive(Debug, Clone, PartialEq)]
pub struct PageRule {
    pub selectors: PageSelectorList,
    pub descriptors: Vec<Descriptor>,
}

/// @keyframes rule
#[derive(Debug, Clone, PartialEq)]
pub struct KeyframesRule {
    pub name: String,
    pub keyframes: Vec<Keyframe>,
}

/// A single keyframe ("from", "to", percentages)
#[derive(Debug, Clone, PartialEq)]
pub struct Keyframe {
    pub selectors: Vec<String>,
    pub block: PropertyDeclarationBlock,
}

/// One segment of a rule body: a declaration or the prelude of a nested rule
enum BodySegment {
    /// Declaration text, terminated by ';', '}' or EOF
    Declaration(String),
    /// Prelude text of a nested rule; the '{' has been consumed
    NestedPrelude(String),
}

/// The CSS grammar engine, bound to one text span for one production call
pub struct Parser<'a> {
    options: &'a ParserOptions,
    input: &'a str,
    tokenizer: Tokenizer<'a>,
    current: Option<Token>,
}

impl<'a> Parser<'a> {
    /// Create a parser for one production call
    pub fn new(options: &'a ParserOptions, input: &'a str) -> Self {
        let mut tokenizer = Tokenizer::new(input);
        let current = tokenizer.next_token().ok();
        Self { options, input, tokenizer, current }
    }

    // --- Productions ---

    /// Parse the input as a complete stylesheet. Invalid rules are dropped;
    /// this production never fails.
    pub fn parse_as_stylesheet(mut self) -> Stylesheet {
        let rules = self.parse_rule_list(true);
        Stylesheet { rules }
    }

    /// Parse the input as a single rule; None if no rule matches.
    pub fn parse_as_rule(mut self) -> Option<Rule> {
        self.skip_whitespace();
        if self.at_end() {
            return None;
        }
        let result = if matches!(self.peek(), Some(Token::AtKeyword(_))) {
            self.parse_at_rule()
        } else {
            self.parse_style_rule()
        };
        match result {
            Ok(rule) => rule,
            Err(err) => {
                log::debug!("rule did not parse: {}", err);
                None
            }
        }
    }

    /// Parse the input as the contents of a style declaration block.
    pub fn parse_as_property_declaration_block(mut self) -> PropertyDeclarationBlock {
        let mut block = PropertyDeclarationBlock::default();
        loop {
            self.skip_whitespace();
            if self.at_end() {
                break;
            }
            match self.collect_body_segment() {
                BodySegment::Declaration(text) => self.add_declaration_to_block(&mut block, &text),
                BodySegment::NestedPrelude(_) => {
                    // Blocks are not valid inside a declaration list
                    self.skip_block();
                }
            }
        }
        block
    }

    /// Parse the input as the contents of an at-rule's descriptor block;
    /// declarations that are not legal descriptors for the at-rule are
    /// dropped.
    pub fn parse_as_descriptor_declaration_block(mut self, at_rule: AtRuleId) -> Vec<Descriptor> {
        self.parse_descriptor_declarations(at_rule)
    }

    /// Parse the input as a value for the given property. Returns None for
    /// a grammar mismatch; never substitutes a default.
    pub fn parse_as_value(mut self, property: PropertyId) -> Option<CssValue> {
        match self.parse_standalone_value() {
            Ok(value) => Some(self.apply_length_quirk(property, value)),
            Err(err) => {
                log::debug!("value for '{}' did not parse: {}", property, err);
                None
            }
        }
    }

    /// Parse the input as a value for the given descriptor.
    pub fn parse_as_descriptor_value(
        mut self,
        at_rule: AtRuleId,
        descriptor: DescriptorId,
    ) -> Option<CssValue> {
        match self.parse_standalone_value() {
            Ok(value) => Some(value),
            Err(err) => {
                log::debug!(
                    "descriptor {} '{}' did not parse: {}",
                    at_rule,
                    descriptor.name(),
                    err
                );
                None
            }
        }
    }

    /// Parse the input as a standard selector list.
    pub fn parse_as_selector_list(self) -> Option<SelectorList> {
        report_mismatch("selector list", selector::parse_selector_list(self.input))
    }

    /// Parse the input as a relative selector list.
    pub fn parse_as_relative_selector_list(self) -> Option<RelativeSelectorList> {
        report_mismatch(
            "relative selector list",
            selector::parse_relative_selector_list(self.input),
        )
    }

    /// Parse the input as an @page selector list.
    pub fn parse_as_page_selector_list(self) -> Option<PageSelectorList> {
        report_mismatch(
            "page selector list",
            selector::parse_page_selector_list(self.input),
        )
    }

    /// Parse the input as a standalone pseudo-element selector.
    pub fn parse_as_pseudo_element_selector(self) -> Option<PseudoElementSelector> {
        report_mismatch(
            "pseudo-element selector",
            selector::parse_pseudo_element_selector(self.input),
        )
    }

    /// Parse the input as a single media query.
    pub fn parse_as_media_query(self) -> Option<MediaQuery> {
        report_mismatch("media query", media::parse_media_query(self.input))
    }

    /// Parse the input as a media query list; unparsable entries become
    /// `not all`.
    pub fn parse_as_media_query_list(self) -> MediaQueryList {
        media::parse_media_query_list(self.input)
    }

    /// Parse the input as a supports condition.
    pub fn parse_as_supports(self) -> Option<SupportsCondition> {
        report_mismatch(
            "supports condition",
            supports::parse_supports_condition(self.input),
        )
    }

    // --- Token machinery ---

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

    // --- Rule parsing ---

    fn parse_rule_list(&mut self, top_level: bool) -> Vec<Rule> {
        let mut rules = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                None | Some(Token::Eof) => break,
                Some(Token::RightBrace) if !top_level => break,
                Some(Token::AtKeyword(_)) => match self.parse_at_rule() {
                    Ok(Some(rule)) => rules.push(rule),
                    Ok(None) => {}
                    Err(err) => {
                        log::debug!("at-rule dropped: {}", err);
                        self.recover_past_rule();
                    }
                },
                _ => match self.parse_style_rule() {
                    Ok(Some(rule)) => rules.push(rule),
                    Ok(None) => {}
                    Err(err) => {
                        log::debug!("style rule dropped: {}", err);
                        self.recover_past_rule();
                    }
                },
            }
        }
        rules
    }

    fn parse_at_rule(&mut self) -> CssResult<Option<Rule>> {
        let name = match self.advance() {
            Some(Token::AtKeyword(name)) => name.to_ascii_lowercase(),
            _ => return Ok(None),
        };
        self.skip_whitespace();

        match name.as_str() {
            "import" => self.parse_import_rule(),
            "media" => self.parse_media_rule(),
            "supports" => self.parse_supports_rule(),
            "font-face" => self.parse_font_face_rule(),
            "page" => self.parse_page_rule(),
            "keyframes" | "-webkit-keyframes" => self.parse_keyframes_rule(),
            _ => {
                log::debug!("unknown at-rule @{} skipped", name);
                self.recover_past_rule();
                Ok(None)
            }
        }
    }

    fn parse_import_rule(&mut self) -> CssResult<Option<Rule>> {
        let url = match self.advance() {
            Some(Token::String(s)) => s,
            Some(Token::Url(u)) => u,
            Some(Token::Function(name)) if name.eq_ignore_ascii_case("url") => {
                self.skip_whitespace();
                let url = match self.advance() {
                    Some(Token::String(s)) => s,
                    _ => return Ok(None),
                };
                self.skip_whitespace();
                if matches!(self.peek(), Some(Token::RightParen)) {
                    self.advance();
                }
                url
            }
            _ => return Ok(None),
        };

        let media_text = self.collect_until_semicolon();
        if matches!(self.peek(), Some(Token::Semicolon)) {
            self.advance();
        }

        Ok(Some(Rule::Import(ImportRule {
            url,
            media: media::parse_media_query_list(&media_text),
        })))
    }

    fn parse_media_rule(&mut self) -> CssResult<Option<Rule>> {
        let prelude = self.collect_until_open_brace();
        if !matches!(self.peek(), Some(Token::LeftBrace)) {
            return Err(CssError::parse_error("expected '{' after @media", self.location()));
        }
        self.advance();

        let queries = media::parse_media_query_list(&prelude);
        let rules = self.parse_rule_list(false);
        if matches!(self.peek(), Some(Token::RightBrace)) {
            self.advance();
        }
        Ok(Some(Rule::Media(MediaRule { queries, rules })))
    }

    fn parse_supports_rule(&mut self) -> CssResult<Option<Rule>> {
        let prelude = self.collect_until_open_brace();
        if !matches!(self.peek(), Some(Token::LeftBrace)) {
            return Err(CssError::parse_error("expected '{' after @supports", self.location()));
        }
        self.advance();

        let condition = match supports::parse_supports_condition(prelude.trim()) {
            Ok(condition) => condition,
            Err(err) => {
                log::debug!("@supports condition dropped: {}", err);
                self.skip_block();
                return Ok(None);
            }
        };

        let rules = self.parse_rule_list(false);
        if matches!(self.peek(), Some(Token::RightBrace)) {
            self.advance();
        }
        Ok(Some(Rule::Supports(SupportsRule { condition, rules })))
    }

    fn parse_font_face_rule(&mut self) -> CssResult<Option<Rule>> {
        if !matches!(self.peek(), Some(Token::LeftBrace)) {
            return Err(CssError::parse_error("expected '{' after @font-face", self.location()));
        }
        self.advance();
        let descriptors = self.parse_descriptor_declarations(AtRuleId::FontFace);
        if matches!(self.peek(), Some(Token::RightBrace)) {
            self.advance();
        }
        Ok(Some(Rule::FontFace(FontFaceRule { descriptors })))
    }

    fn parse_page_rule(&mut self) -> CssResult<Option<Rule>> {
        let prelude = self.collect_until_open_brace();
        if !matches!(self.peek(), Some(Token::LeftBrace)) {
            return Err(CssError::parse_error("expected '{' after @page", self.location()));
        }
        self.advance();

        let selectors = match selector::parse_page_selector_list(prelude.trim()) {
            Ok(selectors) => selectors,
            Err(err) => {
                log::debug!("@page selector list dropped: {}", err);
                self.skip_block();
                return Ok(None);
            }
        };

        let descriptors = self.parse_descriptor_declarations(AtRuleId::Page);
        if matches!(self.peek(), Some(Token::RightBrace)) {
            self.advance();
        }
        Ok(Some(Rule::Page(PageRule { selectors, descriptors })))
    }

    fn parse_keyframes_rule(&mut self) -> CssResult<Option<Rule>> {
        let name = match self.advance() {
            Some(Token::Ident(name)) | Some(Token::String(name)) => name,
            _ => return Ok(None),
        };
        self.skip_whitespace();
        if !matches!(self.peek(), Some(Token::LeftBrace)) {
            return Err(CssError::parse_error("expected '{' after @keyframes", self.location()));
        }
        self.advance();

        let mut keyframes = Vec::new();
        loop {
            self.skip_whitespace();
            if matches!(self.peek(), None | Some(Token::Eof) | Some(Token::RightBrace)) {
                break;
            }
            let selectors = self.collect_keyframe_selectors();
            if selectors.is_empty() || !matches!(self.peek(), Some(Token::LeftBrace)) {
                self.recover_past_rule();
                continue;
            }
            self.advance();
            let block = self.parse_declaration_list();
            if matches!(self.peek(), Some(Token::RightBrace)) {
                self.advance();
            }
            keyframes.push(Keyframe { selectors, block });
        }
        if matches!(self.peek(), Some(Token::RightBrace)) {
            self.advance();
        }
        Ok(Some(Rule::Keyframes(KeyframesRule { name, keyframes })))
    }

    fn collect_keyframe_selectors(&mut self) -> Vec<String> {
        let mut selectors = Vec::new();
        let mut current = String::new();
        loop {
            match self.peek().cloned() {
                None | Some(Token::Eof) | Some(Token::LeftBrace) | Some(Token::RightBrace) => break,
                Some(Token::Comma) => {
                    self.advance();
                    if !current.trim().is_empty() {
                        selectors.push(current.trim().to_string());
                    }
                    current.clear();
                }
                Some(token) => {
                    self.advance();
                    current.push_str(&token_text(&token));
                }
            }
        }
        if !current.trim().is_empty() {
            selectors.push(current.trim().to_string());
        }
        selectors
    }

    fn parse_style_rule(&mut self) -> CssResult<Option<Rule>> {
        let prelude = self.collect_until_open_brace();
        if prelude.trim().is_empty() {
            return Ok(None);
        }
        if !matches!(self.peek(), Some(Token::LeftBrace)) {
            return Err(CssError::parse_error("expected '{' after selector", self.location()));
        }
        self.advance();

        let selectors = match selector::parse_selector_list(prelude.trim()) {
            Ok(selectors) => selectors,
            Err(err) => {
                log::debug!("selector list dropped: {}", err);
                self.skip_block();
                return Ok(None);
            }
        };

        let rule = self.parse_style_rule_body(selectors);
        if matches!(self.peek(), Some(Token::RightBrace)) {
            self.advance();
        }
        Ok(Some(Rule::Style(rule)))
    }

    /// Parse declarations and nested rules until the closing '}' (left
    /// unconsumed)
    fn parse_style_rule_body(&mut self, selectors: SelectorList) -> StyleRule {
        let mut block = PropertyDeclarationBlock::default();
        let mut nested = Vec::new();

        loop {
            self.skip_whitespace();
            if matches!(self.peek(), None | Some(Token::Eof) | Some(Token::RightBrace)) {
                break;
            }
            match self.collect_body_segment() {
                BodySegment::Declaration(text) => self.add_declaration_to_block(&mut block, &text),
                BodySegment::NestedPrelude(prelude) => {
                    if !self.options.allow_nested_rules {
                        log::debug!("nested rule skipped (nesting disabled)");
                        self.skip_block();
                        continue;
                    }
                    match selector::parse_relative_selector_list(prelude.trim()) {
                        Ok(relative) => {
                            let adapted = adapt_nested_relative_selector_list(relative);
                            let rule = self.parse_style_rule_body(adapted);
                            if matches!(self.peek(), Some(Token::RightBrace)) {
                                self.advance();
                            }
                            nested.push(rule);
                        }
                        Err(err) => {
                            log::debug!("nested selector list dropped: {}", err);
                            self.skip_block();
                        }
                    }
                }
            }
        }

        StyleRule { selectors, block, nested }
    }

    // --- Declarations ---

    /// Parse a declaration list until '}' or EOF ('}' left unconsumed)
    fn parse_declaration_list(&mut self) -> PropertyDeclarationBlock {
        let mut block = PropertyDeclarationBlock::default();
        loop {
            self.skip_whitespace();
            if matches!(self.peek(), None | Some(Token::Eof) | Some(Token::RightBrace)) {
                break;
            }
            match self.collect_body_segment() {
                BodySegment::Declaration(text) => self.add_declaration_to_block(&mut block, &text),
                BodySegment::NestedPrelude(_) => self.skip_block(),
            }
        }
        block
    }

    fn add_declaration_to_block(&self, block: &mut PropertyDeclarationBlock, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        let Some((name, value, important)) = self.parse_declaration_text(text) else {
            return;
        };
        if property::is_custom_property_name(&name) {
            block.custom_properties.insert(name, value);
            return;
        }
        match PropertyId::from_name(&name) {
            Some(id) => {
                let value = self.apply_length_quirk(id, value);
                block.declarations.push(Declaration { id, value, important });
            }
            None => log::debug!("unknown property '{}' dropped", name),
        }
    }

    /// Parse "name: value [!important]" from collected declaration text
    fn parse_declaration_text(&self, text: &str) -> Option<(String, CssValue, bool)> {
        let mut parser = Parser::new(self.options, text);
        parser.skip_whitespace();
        let name = match parser.advance() {
            Some(Token::Ident(name)) => name,
            _ => {
                log::debug!("malformed declaration '{}' dropped", text.trim());
                return None;
            }
        };
        parser.skip_whitespace();
        if !matches!(parser.peek(), Some(Token::Colon)) {
            log::debug!("malformed declaration '{}' dropped", text.trim());
            return None;
        }
        parser.advance();

        match parser.parse_value_with_important() {
            Ok((value, important)) => Some((name, value, important)),
            Err(err) => {
                log::debug!("declaration '{}' dropped: {}", text.trim(), err);
                None
            }
        }
    }

    /// Parse a full-input value with no !important allowed
    fn parse_standalone_value(&mut self) -> CssResult<CssValue> {
        let (value, important) = self.parse_value_with_important()?;
        if important {
            return Err(CssError::parse_error("!important is not part of a value", self.location()));
        }
        self.skip_whitespace();
        if !self.at_end() {
            return Err(CssError::parse_error("trailing tokens after value", self.location()));
        }
        Ok(value)
    }

    /// Parse component values until ';', '}' or EOF
    fn parse_value_with_important(&mut self) -> CssResult<(CssValue, bool)> {
        let mut values = Vec::new();
        let mut important = false;

        loop {
            self.skip_whitespace();
            let location = self.location();
            match self.peek().cloned() {
                None | Some(Token::Eof) | Some(Token::Semicolon) | Some(Token::RightBrace) => break,
                Some(Token::Delim('!')) => {
                    self.advance();
                    self.skip_whitespace();
                    match self.advance() {
                        Some(Token::Ident(word)) if word.eq_ignore_ascii_case("important") => {
                            important = true;
                        }
                        _ => {
                            return Err(CssError::parse_error("expected 'important' after '!'", location))
                        }
                    }
                }
                Some(Token::Comma) => {
                    self.advance();
                }
                Some(Token::Function(name)) => {
                    self.advance();
                    values.push(self.parse_function_value(&name, location)?);
                }
                Some(token) => {
                    self.advance();
                    values.push(value::value_from_token(&token, location)?);
                }
            }
        }

        match values.len() {
            0 => Err(CssError::parse_error("empty value", self.location())),
            1 => Ok((values.remove(0), important)),
            _ => Ok((CssValue::List(values), important)),
        }
    }

    /// Parse a function value; the Function token has been consumed
    fn parse_function_value(&mut self, name: &str, location: SourceLocation) -> CssResult<CssValue> {
        let mut args = Vec::new();
        let mut depth = 1usize;
        loop {
            match self.advance() {
                Some(Token::LeftParen) | Some(Token::Function(_)) => {
                    depth += 1;
                }
                Some(Token::RightParen) => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                Some(Token::Eof) | None => {
                    return Err(CssError::parse_error(
                        format!("unterminated {}()", name),
                        location,
                    ))
                }
                Some(token) => args.push(token),
            }
        }

        match name.to_ascii_lowercase().as_str() {
            "rgb" | "rgba" => Ok(CssValue::Color(value::parse_rgb_args(&args, location)?)),
            "hsl" | "hsla" => Ok(CssValue::Color(value::parse_hsl_args(&args, location)?)),
            "url" => {
                for arg in &args {
                    if let Token::String(url) = arg {
                        return Ok(CssValue::Url(url.clone()));
                    }
                }
                Ok(CssValue::Url(String::new()))
            }
            _ => {
                let mut arg_values = Vec::new();
                for arg in &args {
                    if matches!(arg, Token::Whitespace | Token::Comma) {
                        continue;
                    }
                    // Unknown tokens inside an unrecognized function are
                    // tolerated; the function is kept by name
                    if let Ok(parsed) = value::value_from_token(arg, location) {
                        arg_values.push(parsed);
                    }
                }
                Ok(CssValue::Function(name.to_string(), arg_values))
            }
        }
    }

    /// In quirks mode some properties accept a bare number as a px length
    fn apply_length_quirk(&self, property: PropertyId, value: CssValue) -> CssValue {
        if self.options.quirks_mode == QuirksMode::Quirks && property.accepts_quirky_length() {
            if let CssValue::Number(n) = value {
                return CssValue::Length(n, LengthUnit::Px);
            }
        }
        value
    }

    // --- Descriptors ---

    /// Parse descriptor declarations until '}' or EOF ('}' left unconsumed)
    fn parse_descriptor_declarations(&mut self, at_rule: AtRuleId) -> Vec<Descriptor> {
        let mut descriptors = Vec::new();
        loop {
            self.skip_whitespace();
            if matches!(self.peek(), None | Some(Token::Eof) | Some(Token::RightBrace)) {
                break;
            }
            match self.collect_body_segment() {
                BodySegment::NestedPrelude(_) => self.skip_block(),
                BodySegment::Declaration(text) => {
                    if text.trim().is_empty() {
                        continue;
                    }
                    let Some((name, value, important)) = self.parse_declaration_text(&text) else {
                        continue;
                    };
                    if important {
                        log::debug!("descriptor '{}' dropped: !important not allowed", name);
                        continue;
                    }
                    match DescriptorId::from_name(at_rule, &name) {
                        Some(id) => descriptors.push(Descriptor { id, value }),
                        None => {
                            log::debug!("'{}' is not a descriptor of {}", name, at_rule)
                        }
                    }
                }
            }
        }
        descriptors
    }

    // --- Collectors and recovery ---

    /// Collect one body segment: declaration text up to ';'/'}'/EOF, or a
    /// nested-rule prelude up to '{' (the '{' is consumed)
    fn collect_body_segment(&mut self) -> BodySegment {
        let mut text = String::new();
        let mut depth = 0usize;
        loop {
            match self.peek().cloned() {
                None | Some(Token::Eof) => return BodySegment::Declaration(text),
                Some(Token::Semicolon) if depth == 0 => {
                    self.advance();
                    return BodySegment::Declaration(text);
                }
                Some(Token::RightBrace) if depth == 0 => {
                    return BodySegment::Declaration(text);
                }
                Some(Token::LeftBrace) if depth == 0 => {
                    self.advance();
                    return BodySegment::NestedPrelude(text);
                }
                Some(Token::LeftParen) | Some(Token::Function(_)) | Some(Token::LeftBracket) => {
                    depth += 1;
                    let token = self.advance();
                    if let Some(token) = token {
                        text.push_str(&token_text(&token));
                    }
                }
                Some(Token::RightParen) | Some(Token::RightBracket) => {
                    depth = depth.saturating_sub(1);
                    let token = self.advance();
                    if let Some(token) = token {
                        text.push_str(&token_text(&token));
                    }
                }
                Some(token) => {
                    self.advance();
                    text.push_str(&token_text(&token));
                }
            }
        }
    }

    /// Collect raw text until '{' (left unconsumed) or EOF
    fn collect_until_open_brace(&mut self) -> String {
        let mut text = String::new();
        loop {
            match self.peek() {
                None | Some(Token::Eof) | Some(Token::LeftBrace) => break,
                _ => {
                    if let Some(token) = self.advance() {
                        text.push_str(&token_text(&token));
                    }
                }
            }
        }
        text.trim().to_string()
    }

    /// Collect raw text until ';' (left unconsumed) or EOF
    fn collect_until_semicolon(&mut self) -> String {
        let mut text = String::new();
        loop {
            match self.peek() {
                None | Some(Token::Eof) | Some(Token::Semicolon) => break,
                _ => {
                    if let Some(token) = self.advance() {
                        text.push_str(&token_text(&token));
                    }
                }
            }
        }
        text.trim().to_string()
    }

    /// Skip the remainder of a block whose '{' has been consumed
    fn skip_block(&mut self) {
        let mut depth = 1usize;
        loop {
            match self.advance() {
                Some(Token::LeftBrace) => depth += 1,
                Some(Token::RightBrace) => {
                    depth -= 1;
                    if depth == 0 {
                        return;
                    }
                }
                Some(Token::Eof) | None => return,
                Some(_) => {}
            }
        }
    }

    /// Skip past the current malformed rule: through its block or past the
    /// next top-level ';'
    fn recover_past_rule(&mut self) {
        loop {
            match self.peek() {
                None | Some(Token::Eof) => return,
                Some(Token::Semicolon) => {
                    self.advance();
                    return;
                }
                Some(Token::LeftBrace) => {
                    self.advance();
                    self.skip_block();
                    return;
                }
                Some(Token::RightBrace) => return,
                _ => {
                    self.advance();
                }
            }
        }
    }
}

fn report_mismatch<T>(production: &str, result: CssResult<T>) -> Option<T> {
    match result {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            log::debug!("{} did not parse: {}", production, err);
            None
        }
    }
}

/// Textual form of a token, used when collecting prelude/declaration text
fn token_text(token: &Token) -> String {
    match token {
        Token::Ident(s) => s.clone(),
        Token::Function(s) => format!("{}(", s),
        Token::AtKeyword(s) => format!("@{}", s),
        Token::Hash(s, _) => format!("#{}", s),
        Token::String(s) => format!("\"{}\"", s),
        Token::Url(s) => format!("url({})", s),
        Token::Number(n) => n.to_string(),
        Token::Percentage(n) => format!("{}%", n),
        Token::Dimension(n, u) => format!("{}{}", n, u),
        Token::Whitespace => " ".to_string(),
        Token::Colon => ":".to_string(),
        Token::Semicolon => ";".to_string(),
        Token::Comma => ",".to_string(),
        Token::LeftBracket => "[".to_string(),
        Token::RightBracket => "]".to_string(),
        Token::LeftParen => "(".to_string(),
        Token::RightParen => ")".to_string(),
        Token::LeftBrace => "{".to_string(),
        Token::RightBrace => "}".to_string(),
        Token::Delim(c) => c.to_string(),
        Token::Eof => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::SelectorPart;
    use crate::value::Color;

    fn options() -> ParserOptions {
        ParserOptions::default()
    }

    fn parse_sheet(css: &str) -> Stylesheet {
        Parser::new(&ParserOptions::default(), css).parse_as_stylesheet()
    }

    #[test]
    fn test_simple_rule() {
        let sheet = parse_sheet("p { color: red; }");
        assert_eq!(sheet.rules.len(), 1);
        let Rule::Style(rule) = &sheet.rules[0] else {
            panic!("expected style rule");
        };
        assert_eq!(rule.selectors.len(), 1);
        assert_eq!(rule.block.declarations.len(), 1);
        assert_eq!(rule.block.declarations[0].id.name(), "color");
        assert_eq!(
            rule.block.declarations[0].value,
            CssValue::Color(Color::rgb(255, 0, 0))
        );
    }

    #[test]
    fn test_multiple_declarations() {
        let sheet = parse_sheet("p { color: red; font-size: 16px; }");
        let Rule::Style(rule) = &sheet.rules[0] else {
            panic!("expected style rule");
        };
        assert_eq!(rule.block.declarations.len(), 2);
    }

    #[test]
    fn test_important() {
        let sheet = parse_sheet("p { color: red !important; }");
        let Rule::Style(rule) = &sheet.rules[0] else {
            panic!("expected style rule");
        };
        assert!(rule.block.declarations[0].important);
    }

    #[test]
    fn test_unknown_property_dropped() {
        let sheet = parse_sheet("p { colour: red; color: blue; }");
        let Rule::Style(rule) = &sheet.rules[0] else {
            panic!("expected style rule");
        };
        assert_eq!(rule.block.declarations.len(), 1);
        assert_eq!(rule.block.declarations[0].id.name(), "color");
    }

    #[test]
    fn test_custom_property() {
        let sheet = parse_sheet(":root { --main-color: #ff0000; }");
        let Rule::Style(rule) = &sheet.rules[0] else {
            panic!("expected style rule");
        };
        assert!(rule.block.declarations.is_empty());
        assert_eq!(
            rule.block.custom_properties.get("--main-color"),
            Some(&CssValue::Color(Color::rgb(255, 0, 0)))
        );
    }

    #[test]
    fn test_invalid_selector_drops_rule() {
        let sheet = parse_sheet("..broken { color: red; } p { color: blue; }");
        assert_eq!(sheet.rules.len(), 1);
    }

    #[test]
    fn test_media_rule() {
        let sheet = parse_sheet("@media screen and (max-width: 600px) { p { color: red; } }");
        let Rule::Media(rule) = &sheet.rules[0] else {
            panic!("expected media rule");
        };
        assert_eq!(rule.queries.len(), 1);
        assert_eq!(rule.rules.len(), 1);
    }

    #[test]
    fn test_supports_rule() {
        let sheet = parse_sheet("@supports (display: grid) { div { display: flex; } }");
        let Rule::Supports(rule) = &sheet.rules[0] else {
            panic!("expected supports rule");
        };
        assert!(matches!(rule.condition, SupportsCondition::Declaration { .. }));
        assert_eq!(rule.rules.len(), 1);
    }

    #[test]
    fn test_import_rule() {
        let sheet = parse_sheet("@import url('base.css') screen;");
        let Rule::Import(rule) = &sheet.rules[0] else {
            panic!("expected import rule");
        };
        assert_eq!(rule.url, "base.css");
        assert_eq!(rule.media.len(), 1);
    }

    #[test]
    fn test_font_face_rule() {
        let sheet =
            parse_sheet("@font-face { font-family: \"My Font\"; src: url(font.woff2); bogus: 1; }");
        let Rule::FontFace(rule) = &sheet.rules[0] else {
            panic!("expected font-face rule");
        };
        assert_eq!(rule.descriptors.len(), 2);
        assert_eq!(rule.descriptors[0].id, DescriptorId::FontFamily);
    }

    #[test]
    fn test_page_rule() {
        let sheet = parse_sheet("@page :first { size: 10cm; }");
        let Rule::Page(rule) = &sheet.rules[0] else {
            panic!("expected page rule");
        };
        assert_eq!(rule.selectors.len(), 1);
        assert_eq!(rule.descriptors.len(), 1);
        assert_eq!(rule.descriptors[0].id, DescriptorId::Size);
    }

    #[test]
    fn test_keyframes_rule() {
        let sheet = parse_sheet("@keyframes fade { from { opacity: 0; } to { opacity: 1; } }");
        let Rule::Keyframes(rule) = &sheet.rules[0] else {
            panic!("expected keyframes rule");
        };
        assert_eq!(rule.name, "fade");
        assert_eq!(rule.keyframes.len(), 2);
    }

    #[test]
    fn test_unknown_at_rule_skipped() {
        let sheet = parse_sheet("@charset \"utf-8\"; p { color: red; }");
        assert_eq!(sheet.rules.len(), 1);
    }

    #[test]
    fn test_nested_rule() {
        let sheet = parse_sheet(".card { color: red; &:hover { color: blue; } }");
        let Rule::Style(rule) = &sheet.rules[0] else {
            panic!("expected style rule");
        };
        assert_eq!(rule.block.declarations.len(), 1);
        assert_eq!(rule.nested.len(), 1);
        assert!(matches!(rule.nested[0].selectors[0].parts[0], SelectorPart::Nesting));
    }

    #[test]
    fn test_nested_rule_without_parent_reference_is_prefixed() {
        let sheet = parse_sheet(".card { > .title { color: blue; } }");
        let Rule::Style(rule) = &sheet.rules[0] else {
            panic!("expected style rule");
        };
        let nested_parts = &rule.nested[0].selectors[0].parts;
        assert!(matches!(nested_parts[0], SelectorPart::Nesting));
        assert!(matches!(
            nested_parts[1],
            SelectorPart::Combinator(crate::selector::Combinator::Child)
        ));
    }

    #[test]
    fn test_nesting_disabled() {
        let opts = ParserOptions { allow_nested_rules: false, ..ParserOptions::default() };
        let sheet = Parser::new(&opts, ".card { &:hover { color: blue; } color: red; }")
            .parse_as_stylesheet();
        let Rule::Style(rule) = &sheet.rules[0] else {
            panic!("expected style rule");
        };
        assert!(rule.nested.is_empty());
        assert_eq!(rule.block.declarations.len(), 1);
    }

    #[test]
    fn test_empty_stylesheet() {
        assert!(parse_sheet("   ").rules.is_empty());
        assert!(parse_sheet("/* comment */").rules.is_empty());
    }

    #[test]
    fn test_parse_as_rule() {
        let opts = options();
        let rule = Parser::new(&opts, "p { color: red; }").parse_as_rule();
        assert!(matches!(rule, Some(Rule::Style(_))));

        let rule = Parser::new(&opts, "@media print { }").parse_as_rule();
        assert!(matches!(rule, Some(Rule::Media(_))));

        assert!(Parser::new(&opts, "").parse_as_rule().is_none());
        assert!(Parser::new(&opts, "..bad { }").parse_as_rule().is_none());
    }

    #[test]
    fn test_parse_as_property_declaration_block() {
        let opts = options();
        let block = Parser::new(&opts, "color: red; --x: 1; bogus: 2")
            .parse_as_property_declaration_block();
        assert_eq!(block.declarations.len(), 1);
        assert_eq!(block.custom_properties.len(), 1);

        assert!(Parser::new(&opts, "").parse_as_property_declaration_block().is_empty());
    }

    #[test]
    fn test_parse_as_descriptor_declaration_block() {
        let opts = options();
        let descriptors = Parser::new(&opts, "src: url(a.woff2); color: red")
            .parse_as_descriptor_declaration_block(AtRuleId::FontFace);
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].id, DescriptorId::Src);
    }

    #[test]
    fn test_parse_as_value() {
        let opts = options();
        let property = PropertyId::from_name("color").unwrap();
        let value = Parser::new(&opts, "red").parse_as_value(property);
        assert_eq!(value, Some(CssValue::Color(Color::rgb(255, 0, 0))));

        assert!(Parser::new(&opts, "red blue ;").parse_as_value(property).is_none());
        assert!(Parser::new(&opts, "red !important").parse_as_value(property).is_none());
    }

    #[test]
    fn test_multibyte_hash_is_no_match() {
        let opts = options();
        let color = PropertyId::from_name("color").unwrap();
        assert!(Parser::new(&opts, "#a€").parse_as_value(color).is_none());

        // Inside a stylesheet the declaration is dropped, nothing faults
        let sheet = parse_sheet("p { color: #€; } div { color: red; }");
        assert_eq!(sheet.rules.len(), 2);
        let Rule::Style(rule) = &sheet.rules[0] else {
            panic!("expected style rule");
        };
        assert!(rule.block.declarations.is_empty());
    }

    #[test]
    fn test_quirky_length_only_in_quirks_mode() {
        let width = PropertyId::from_name("width").unwrap();
        let color = PropertyId::from_name("color").unwrap();

        let standard = options();
        assert_eq!(
            Parser::new(&standard, "10").parse_as_value(width),
            Some(CssValue::Number(10.0))
        );

        let quirks = ParserOptions { quirks_mode: QuirksMode::Quirks, ..ParserOptions::default() };
        assert_eq!(
            Parser::new(&quirks, "10").parse_as_value(width),
            Some(CssValue::Length(10.0, LengthUnit::Px))
        );
        assert_eq!(
            Parser::new(&quirks, "10").parse_as_value(color),
            Some(CssValue::Number(10.0))
        );
    }

    #[test]
    fn test_parse_as_descriptor_value() {
        let opts = options();
        let value = Parser::new(&opts, "italic")
            .parse_as_descriptor_value(AtRuleId::FontFace, DescriptorId::FontStyle);
        assert_eq!(value, Some(CssValue::Keyword("italic".into())));
    }

    #[test]
    fn test_parse_as_selector_productions() {
        let opts = options();
        assert!(Parser::new(&opts, "div > p").parse_as_selector_list().is_some());
        assert!(Parser::new(&opts, "&&&").parse_as_selector_list().is_none());
        assert!(Parser::new(&opts, "> .x").parse_as_relative_selector_list().is_some());
        assert!(Parser::new(&opts, ":first").parse_as_page_selector_list().is_some());
        assert!(Parser::new(&opts, "::after").parse_as_pseudo_element_selector().is_some());
    }

    #[test]
    fn test_parse_as_media_productions() {
        let opts = options();
        assert!(Parser::new(&opts, "screen").parse_as_media_query().is_some());
        assert!(Parser::new(&opts, "").parse_as_media_query().is_none());
        assert_eq!(Parser::new(&opts, "screen, print").parse_as_media_query_list().len(), 2);
        assert!(Parser::new(&opts, "").parse_as_media_query_list().is_empty());
    }

    #[test]
    fn test_parse_as_supports() {
        let opts = options();
        assert!(Parser::new(&opts, "(display: grid)").parse_as_supports().is_some());
        assert!(Parser::new(&opts, "display grid").parse_as_supports().is_none());
    }

    #[test]
    fn test_var_function_value() {
        let sheet = parse_sheet("p { color: var(--main-color); }");
        let Rule::Style(rule) = &sheet.rules[0] else {
            panic!("expected style rule");
        };
        assert!(matches!(
            &rule.block.declarations[0].value,
            CssValue::Function(name, _) if name == "var"
        ));
    }

    #[test]
    fn test_shorthand_list_value() {
        let sheet = parse_sheet("p { margin: 10px 20px; }");
        let Rule::Style(rule) = &sheet.rules[0] else {
            panic!("expected style rule");
        };
        assert!(matches!(
            &rule.block.declarations[0].value,
            CssValue::List(values) if values.len() == 2
        ));
    }

    #[test]
    fn test_determinism() {
        let opts = options();
        let css = "p { color: red; } @media screen { div { width: 10px; } }";
        let first = Parser::new(&opts, css).parse_as_stylesheet();
        let second = Parser::new(&opts, css).parse_as_stylesheet();
        assert_eq!(first, second);
    }
}
