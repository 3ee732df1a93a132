//! CSS Selector Parser
//!
//! Parses standard selector lists, relative selector lists (as used inside
//! nested rules), page selector lists, and standalone pseudo-element
//! selectors. Also hosts the relative-to-standalone adaptation used when a
//! relative selector list becomes the selector list of a nested rule.

use smallvec::SmallVec;

use crate::error::{CssError, CssResult, SourceLocation};
use crate::tokenizer::{HashType, Token, Tokenizer};

/// A complex selector: compound selectors joined by combinators
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    pub parts: Vec<SelectorPart>,
    pub specificity: Specificity,
}

/// A comma-separated selector list; almost always one or two entries
pub type SelectorList = SmallVec<[Selector; 2]>;

/// One part of a complex selector
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorPart {
    /// Universal selector (*)
    Universal,
    /// Type selector (div, p, ...)
    Type(String),
    /// Class selector (.container)
    Class(String),
    /// ID selector (#main)
    Id(String),
    /// The nesting selector (&), referencing the parent rule
    Nesting,
    /// Attribute selector ([type="text"])
    Attribute {
        name: String,
        op: Option<AttributeOp>,
        value: Option<String>,
        case_insensitive: bool,
    },
    /// Pseudo-class (:hover, :nth-child(2n))
    PseudoClass { name: String, args: Option<String> },
    /// Pseudo-element (::before)
    PseudoElement { name: String, args: Option<String> },
    /// Combinator between compound selectors
    Combinator(Combinator),
}

/// Attribute selector operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeOp {
    /// [attr=value]
    Equals,
    /// [attr~=value]
    Includes,
    /// [attr|=value]
    DashMatch,
    /// [attr^=value]
    PrefixMatch,
    /// [attr$=value]
    SuffixMatch,
    /// [attr*=value]
    SubstringMatch,
}

/// Selector combinators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Descendant combinator (space)
    Descendant,
    /// Child combinator (>)
    Child,
    /// Next sibling combinator (+)
    NextSibling,
    /// Subsequent sibling combinator (~)
    SubsequentSibling,
}

/// Selector specificity: (a) IDs, (b) classes/attributes/pseudo-classes,
/// (c) types/pseudo-elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Specificity {
    pub a: u32,
    pub b: u32,
    pub c: u32,
}

impl Specificity {
    pub fn new(a: u32, b: u32, c: u32) -> Self {
        Self { a, b, c }
    }

    pub fn add(&mut self, other: Specificity) {
        self.a += other.a;
        self.b += other.b;
        self.c += other.c;
    }
}

/// A selector expressed relative to an implicit ancestor
#[derive(Debug, Clone, PartialEq)]
pub struct RelativeSelector {
    /// Combinator anchoring the selector to the ancestor
    pub anchor: Combinator,
    pub selector: Selector,
}

/// A comma-separated relative selector list
pub type RelativeSelectorList = SmallVec<[RelativeSelector; 2]>;

/// A page selector as used in @page preludes
#[derive(Debug, Clone, PartialEq)]
pub struct PageSelector {
    /// Optional named page
    pub name: Option<String>,
    pub pseudo_classes: Vec<PagePseudoClass>,
}

/// Pseudo-pages recognized in page selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagePseudoClass {
    First,
    Blank,
    Left,
    Right,
}

impl PagePseudoClass {
    fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "first" => Some(Self::First),
            "blank" => Some(Self::Blank),
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            _ => None,
        }
    }
}

/// A page selector list
pub type PageSelectorList = Vec<PageSelector>;

/// A standalone pseudo-element selector
#[derive(Debug, Clone, PartialEq)]
pub struct PseudoElementSelector {
    pub name: String,
    pub args: Option<String>,
}

impl Selector {
    /// Does any part of this selector reference the nesting selector?
    pub fn references_parent(&self) -> bool {
        self.parts.iter().any(|part| matches!(part, SelectorPart::Nesting))
    }
}

/// Rewrite a relative selector list into standalone selectors usable as a
/// nested rule's selector list.
///
/// A selector that already references `&` is kept as-is; anything else is
/// prefixed with `&` plus the anchoring combinator, so `.foo` becomes
/// `& .foo` and `> .foo` becomes `& > .foo`.
pub fn adapt_nested_relative_selector_list(list: RelativeSelectorList) -> SelectorList {
    list.into_iter()
        .map(|relative| {
            if relative.selector.references_parent() {
                return relative.selector;
            }
            let mut parts = Vec::with_capacity(relative.selector.parts.len() + 2);
            parts.push(SelectorPart::Nesting);
            parts.push(SelectorPart::Combinator(relative.anchor));
            parts.extend(relative.selector.parts);
            Selector { parts, specificity: relative.selector.specificity }
        })
        .collect()
}

/// Parse a comma-separated selector list, consuming the whole input
pub fn parse_selector_list(input: &str) -> CssResult<SelectorList> {
    let mut parser = SelectorParser::new(input);
    let list = parser.parse_selector_list()?;
    parser.require_eof()?;
    Ok(list)
}

/// Parse a comma-separated relative selector list, consuming the whole input
pub fn parse_relative_selector_list(input: &str) -> CssResult<RelativeSelectorList> {
    let mut parser = SelectorParser::new(input);
    let list = parser.parse_relative_selector_list()?;
    parser.require_eof()?;
    Ok(list)
}

/// Parse an @page prelude. Empty input is a valid empty list.
pub fn parse_page_selector_list(input: &str) -> CssResult<PageSelectorList> {
    let mut parser = SelectorParser::new(input);
    let list = parser.parse_page_selector_list()?;
    parser.require_eof()?;
    Ok(list)
}

/// Parse a single standalone pseudo-element selector
pub fn parse_pseudo_element_selector(input: &str) -> CssResult<PseudoElementSelector> {
    let mut parser = SelectorParser::new(input);
    let selector = parser.parse_standalone_pseudo_element()?;
    parser.require_eof()?;
    Ok(selector)
}

struct SelectorParser<'a> {
    tokenizer: Tokenizer<'a>,
    current: Option<Token>,
}

impl<'a> SelectorParser<'a> {
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

    fn require_eof(&mut self) -> CssResult<()> {
        self.skip_whitespace();
        if self.at_end() {
            Ok(())
        } else {
            Err(CssError::invalid_selector(
                format!("{:?}", self.peek()),
                self.location(),
            ))
        }
    }

    fn parse_selector_list(&mut self) -> CssResult<SelectorList> {
        let mut list = SelectorList::new();
        loop {
            self.skip_whitespace();
            if self.at_end() {
                break;
            }
            list.push(self.parse_selector()?);
            self.skip_whitespace();
            match self.peek() {
                Some(Token::Comma) => {
                    self.advance();
                }
                _ => break,
            }
        }
        if list.is_empty() {
            return Err(CssError::invalid_selector("", self.location()));
        }
        Ok(list)
    }

    fn parse_relative_selector_list(&mut self) -> CssResult<RelativeSelectorList> {
        let mut list = RelativeSelectorList::new();
        loop {
            self.skip_whitespace();
            if self.at_end() {
                break;
            }
            let anchor = self.try_parse_combinator().unwrap_or(Combinator::Descendant);
            self.skip_whitespace();
            let selector = self.parse_selector()?;
            list.push(RelativeSelector { anchor, selector });
            self.skip_whitespace();
            match self.peek() {
                Some(Token::Comma) => {
                    self.advance();
                }
                _ => break,
            }
        }
        if list.is_empty() {
            return Err(CssError::invalid_selector("", self.location()));
        }
        Ok(list)
    }

    fn parse_selector(&mut self) -> CssResult<Selector> {
        let mut parts = Vec::new();
        let mut specificity = Specificity::default();
        let mut in_compound = false;
        let mut compound_has_nesting = false;

        loop {
            let had_whitespace = matches!(self.peek(), Some(Token::Whitespace));
            self.skip_whitespace();

            if self.at_end() || matches!(self.peek(), Some(Token::Comma)) {
                break;
            }

            if let Some(combinator) = self.try_parse_combinator() {
                if !in_compound {
                    return Err(CssError::invalid_selector(
                        "combinator without preceding selector",
                        self.location(),
                    ));
                }
                parts.push(SelectorPart::Combinator(combinator));
                in_compound = false;
                compound_has_nesting = false;
                continue;
            }

            if in_compound && had_whitespace {
                parts.push(SelectorPart::Combinator(Combinator::Descendant));
                in_compound = false;
                compound_has_nesting = false;
            }

            let Some((part, added)) = self.try_parse_simple_selector()? else {
                break;
            };
            if matches!(part, SelectorPart::Nesting) {
                // One nesting selector per compound; `&&` has no meaning here
                if compound_has_nesting {
                    return Err(CssError::invalid_selector("&&", self.location()));
                }
                compound_has_nesting = true;
            }
            parts.push(part);
            specificity.add(added);
            in_compound = true;
        }

        if parts.is_empty() || matches!(parts.last(), Some(SelectorPart::Combinator(_))) {
            return Err(CssError::invalid_selector("", self.location()));
        }

        Ok(Selector { parts, specificity })
    }

    fn try_parse_combinator(&mut self) -> Option<Combinator> {
        let combinator = match self.peek() {
            Some(Token::Delim('>')) => Combinator::Child,
            Some(Token::Delim('+')) => Combinator::NextSibling,
            Some(Token::Delim('~')) => Combinator::SubsequentSibling,
            _ => return None,
        };
        self.advance();
        Some(combinator)
    }

    fn try_parse_simple_selector(&mut self) -> CssResult<Option<(SelectorPart, Specificity)>> {
        match self.peek().cloned() {
            Some(Token::Delim('*')) => {
                self.advance();
                Ok(Some((SelectorPart::Universal, Specificity::default())))
            }
            Some(Token::Delim('&')) => {
                self.advance();
                Ok(Some((SelectorPart::Nesting, Specificity::default())))
            }
            Some(Token::Ident(name)) => {
                self.advance();
                Ok(Some((
                    SelectorPart::Type(name.to_ascii_lowercase()),
                    Specificity::new(0, 0, 1),
                )))
            }
            Some(Token::Hash(name, HashType::Id)) => {
                self.advance();
                Ok(Some((SelectorPart::Id(name), Specificity::new(1, 0, 0))))
            }
            Some(Token::Delim('.')) => {
                self.advance();
                match self.advance() {
                    Some(Token::Ident(name)) => {
                        Ok(Some((SelectorPart::Class(name), Specificity::new(0, 1, 0))))
                    }
                    _ => Err(CssError::invalid_selector(".", self.location())),
                }
            }
            Some(Token::LeftBracket) => self.parse_attribute_selector().map(Some),
            Some(Token::Colon) => self.parse_pseudo_selector().map(Some),
            _ => Ok(None),
        }
    }

    fn parse_attribute_selector(&mut self) -> CssResult<(SelectorPart, Specificity)> {
        self.advance(); // '['
        self.skip_whitespace();

        let name = match self.advance() {
            Some(Token::Ident(name)) => name,
            _ => return Err(CssError::invalid_selector("[", self.location())),
        };

        self.skip_whitespace();
        let op = self.try_parse_attribute_op()?;
        self.skip_whitespace();

        let value = if op.is_some() {
            match self.advance() {
                Some(Token::Ident(v)) | Some(Token::String(v)) => Some(v),
                _ => {
                    return Err(CssError::invalid_selector(
                        format!("[{}=", name),
                        self.location(),
                    ))
                }
            }
        } else {
            None
        };

        self.skip_whitespace();

        // Case sensitivity flag ('i' insensitive, 's' explicit sensitive)
        let mut case_insensitive = false;
        if let Some(Token::Ident(flag)) = self.peek() {
            if flag.eq_ignore_ascii_case("i") || flag.eq_ignore_ascii_case("s") {
                case_insensitive = flag.eq_ignore_ascii_case("i");
                self.advance();
            }
        }

        self.skip_whitespace();
        match self.advance() {
            Some(Token::RightBracket) => Ok((
                SelectorPart::Attribute { name, op, value, case_insensitive },
                Specificity::new(0, 1, 0),
            )),
            _ => Err(CssError::invalid_selector(format!("[{}", name), self.location())),
        }
    }

    fn try_parse_attribute_op(&mut self) -> CssResult<Option<AttributeOp>> {
        let op_char = match self.peek() {
            Some(Token::Delim(c @ ('=' | '~' | '|' | '^' | '$' | '*'))) => *c,
            _ => return Ok(None),
        };
        self.advance();
        if op_char == '=' {
            return Ok(Some(AttributeOp::Equals));
        }
        if !matches!(self.peek(), Some(Token::Delim('='))) {
            return Err(CssError::invalid_selector(op_char.to_string(), self.location()));
        }
        self.advance();
        Ok(Some(match op_char {
            '~' => AttributeOp::Includes,
            '|' => AttributeOp::DashMatch,
            '^' => AttributeOp::PrefixMatch,
            '$' => AttributeOp::SuffixMatch,
            _ => AttributeOp::SubstringMatch,
        }))
    }

    fn parse_pseudo_selector(&mut self) -> CssResult<(SelectorPart, Specificity)> {
        self.advance(); // ':'

        let double_colon = if matches!(self.peek(), Some(Token::Colon)) {
            self.advance();
            true
        } else {
            false
        };

        let (name, is_function) = match self.advance() {
            Some(Token::Ident(name)) => (name.to_ascii_lowercase(), false),
            Some(Token::Function(name)) => (name.to_ascii_lowercase(), true),
            _ => return Err(CssError::invalid_selector(":", self.location())),
        };

        let args = if is_function {
            Some(self.collect_balanced_args()?)
        } else {
            None
        };

        // Legacy single-colon pseudo-elements
        let is_element = double_colon
            || matches!(name.as_str(), "before" | "after" | "first-line" | "first-letter");

        if is_element {
            Ok((SelectorPart::PseudoElement { name, args }, Specificity::new(0, 0, 1)))
        } else {
            let specificity = match name.as_str() {
                "where" => Specificity::default(),
                _ => Specificity::new(0, 1, 0),
            };
            Ok((SelectorPart::PseudoClass { name, args }, specificity))
        }
    }

    /// Collect functional pseudo arguments up to the matching ')'
    fn collect_balanced_args(&mut self) -> CssResult<String> {
        let mut args = String::new();
        let mut depth = 1usize;
        loop {
            match self.advance() {
                Some(Token::LeftParen) => {
                    depth += 1;
                    args.push('(');
                }
                Some(Token::Function(name)) => {
                    depth += 1;
                    args.push_str(&name);
                    args.push('(');
                }
                Some(Token::RightParen) => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                    args.push(')');
                }
                Some(Token::Eof) | None => {
                    return Err(CssError::invalid_selector(
                        format!("({}", args),
                        self.location(),
                    ));
                }
                Some(token) => args.push_str(&token_text(&token)),
            }
        }
        Ok(args.trim().to_string())
    }

    fn parse_page_selector_list(&mut self) -> CssResult<PageSelectorList> {
        let mut list = PageSelectorList::new();
        loop {
            self.skip_whitespace();
            if self.at_end() {
                break;
            }

            let name = match self.peek().cloned() {
                Some(Token::Ident(name)) => {
                    self.advance();
                    Some(name)
                }
                _ => None,
            };

            let mut pseudo_classes = Vec::new();
            while matches!(self.peek(), Some(Token::Colon)) {
                self.advance();
                match self.advance() {
                    Some(Token::Ident(pseudo)) => match PagePseudoClass::from_name(&pseudo) {
                        Some(class) => pseudo_classes.push(class),
                        None => {
                            return Err(CssError::invalid_selector(
                                format!(":{}", pseudo),
                                self.location(),
                            ))
                        }
                    },
                    _ => return Err(CssError::invalid_selector(":", self.location())),
                }
            }

            if name.is_none() && pseudo_classes.is_empty() {
                return Err(CssError::invalid_selector("@page", self.location()));
            }
            list.push(PageSelector { name, pseudo_classes });

            self.skip_whitespace();
            match self.peek() {
                Some(Token::Comma) => {
                    self.advance();
                }
                _ => break,
            }
        }
        Ok(list)
    }

    fn parse_standalone_pseudo_element(&mut self) -> CssResult<PseudoElementSelector> {
        self.skip_whitespace();
        if !matches!(self.peek(), Some(Token::Colon)) {
            return Err(CssError::invalid_selector("", self.location()));
        }
        let (part, _) = self.parse_pseudo_selector()?;
        match part {
            SelectorPart::PseudoElement { name, args } => Ok(PseudoElementSelector { name, args }),
            _ => Err(CssError::invalid_selector("pseudo-class", self.location())),
        }
    }
}

/// Textual form of a token inside functional pseudo arguments
fn token_text(token: &Token) -> String {
    match token {
        Token::Ident(s) => s.clone(),
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
        Token::Delim(c) => c.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_selector() {
        let list = parse_selector_list("div").unwrap();
        assert_eq!(list.len(), 1);
        assert!(matches!(&list[0].parts[0], SelectorPart::Type(t) if t == "div"));
        assert_eq!(list[0].specificity, Specificity::new(0, 0, 1));
    }

    #[test]
    fn test_compound_selector() {
        let list = parse_selector_list("div.container#main").unwrap();
        let parts = &list[0].parts;
        assert!(matches!(&parts[0], SelectorPart::Type(t) if t == "div"));
        assert!(matches!(&parts[1], SelectorPart::Class(c) if c == "container"));
        assert!(matches!(&parts[2], SelectorPart::Id(id) if id == "main"));
        assert_eq!(list[0].specificity, Specificity::new(1, 1, 1));
    }

    #[test]
    fn test_combinators() {
        let list = parse_selector_list("div > p").unwrap();
        assert!(matches!(
            list[0].parts[1],
            SelectorPart::Combinator(Combinator::Child)
        ));

        let list = parse_selector_list("div p").unwrap();
        assert!(matches!(
            list[0].parts[1],
            SelectorPart::Combinator(Combinator::Descendant)
        ));
    }

    #[test]
    fn test_selector_list() {
        let list = parse_selector_list("h1, .title, #top").unwrap();
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_attribute_selector() {
        let list = parse_selector_list("[type=\"text\" i]").unwrap();
        assert!(matches!(
            &list[0].parts[0],
            SelectorPart::Attribute { name, op: Some(AttributeOp::Equals), value: Some(v), case_insensitive: true }
            if name == "type" && v == "text"
        ));
    }

    #[test]
    fn test_attribute_selector_ops() {
        for (text, op) in [
            ("[a~=b]", AttributeOp::Includes),
            ("[a|=b]", AttributeOp::DashMatch),
            ("[a^=b]", AttributeOp::PrefixMatch),
            ("[a$=b]", AttributeOp::SuffixMatch),
            ("[a*=b]", AttributeOp::SubstringMatch),
        ] {
            let list = parse_selector_list(text).unwrap();
            assert!(
                matches!(&list[0].parts[0], SelectorPart::Attribute { op: Some(parsed), .. } if *parsed == op),
                "wrong op for {}",
                text
            );
        }
    }

    #[test]
    fn test_pseudo_class_functional() {
        let list = parse_selector_list("li:nth-child(odd)").unwrap();
        assert!(matches!(
            &list[0].parts[1],
            SelectorPart::PseudoClass { name, args: Some(args) }
            if name == "nth-child" && args == "odd"
        ));
    }

    #[test]
    fn test_pseudo_element_double_colon() {
        let list = parse_selector_list("p::before").unwrap();
        assert!(matches!(
            &list[0].parts[1],
            SelectorPart::PseudoElement { name, .. } if name == "before"
        ));
    }

    #[test]
    fn test_nesting_selector() {
        let list = parse_selector_list("&.foo").unwrap();
        assert!(matches!(list[0].parts[0], SelectorPart::Nesting));
        assert!(matches!(&list[0].parts[1], SelectorPart::Class(c) if c == "foo"));
    }

    #[test]
    fn test_duplicate_nesting_rejected() {
        assert!(parse_selector_list("&&&").is_err());
        assert!(parse_selector_list("&&").is_err());
    }

    #[test]
    fn test_nesting_in_separate_compounds_allowed() {
        // "& &" is two compounds joined by a descendant combinator
        let list = parse_selector_list("& &").unwrap();
        assert_eq!(list[0].parts.len(), 3);
    }

    #[test]
    fn test_empty_selector_rejected() {
        assert!(parse_selector_list("").is_err());
        assert!(parse_selector_list("   ").is_err());
        assert!(parse_selector_list("div,").is_err());
    }

    #[test]
    fn test_trailing_garbage_rejected() {
        assert!(parse_selector_list("div {").is_err());
    }

    #[test]
    fn test_leading_combinator_rejected_in_standard_list() {
        assert!(parse_selector_list("> div").is_err());
    }

    #[test]
    fn test_relative_selector_implicit_descendant() {
        let list = parse_relative_selector_list(".foo").unwrap();
        assert_eq!(list[0].anchor, Combinator::Descendant);
    }

    #[test]
    fn test_relative_selector_explicit_combinator() {
        let list = parse_relative_selector_list("> .foo, ~ .bar").unwrap();
        assert_eq!(list[0].anchor, Combinator::Child);
        assert_eq!(list[1].anchor, Combinator::SubsequentSibling);
    }

    #[test]
    fn test_adaptation_prefixes_non_parent_selectors() {
        let list = parse_relative_selector_list("> .foo").unwrap();
        let adapted = adapt_nested_relative_selector_list(list);
        assert!(matches!(adapted[0].parts[0], SelectorPart::Nesting));
        assert!(matches!(
            adapted[0].parts[1],
            SelectorPart::Combinator(Combinator::Child)
        ));
        assert!(matches!(&adapted[0].parts[2], SelectorPart::Class(c) if c == "foo"));
    }

    #[test]
    fn test_adaptation_keeps_parent_referencing_selectors() {
        let list = parse_relative_selector_list("&.foo").unwrap();
        let adapted = adapt_nested_relative_selector_list(list);
        assert_eq!(adapted[0].parts.len(), 2);
        assert!(matches!(adapted[0].parts[0], SelectorPart::Nesting));
    }

    #[test]
    fn test_adaptation_on_hand_built_list() {
        let mut list = RelativeSelectorList::new();
        list.push(RelativeSelector {
            anchor: Combinator::NextSibling,
            selector: Selector {
                parts: vec![SelectorPart::Type("p".into())],
                specificity: Specificity::new(0, 0, 1),
            },
        });
        let adapted = adapt_nested_relative_selector_list(list);
        assert_eq!(
            adapted[0].parts,
            vec![
                SelectorPart::Nesting,
                SelectorPart::Combinator(Combinator::NextSibling),
                SelectorPart::Type("p".into()),
            ]
        );
    }

    #[test]
    fn test_page_selector_list() {
        let list = parse_page_selector_list("toc:first, :blank").unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].name.as_deref(), Some("toc"));
        assert_eq!(list[0].pseudo_classes, vec![PagePseudoClass::First]);
        assert_eq!(list[1].name, None);
        assert_eq!(list[1].pseudo_classes, vec![PagePseudoClass::Blank]);
    }

    #[test]
    fn test_page_selector_empty_is_valid() {
        assert!(parse_page_selector_list("").unwrap().is_empty());
    }

    #[test]
    fn test_page_selector_unknown_pseudo_rejected() {
        assert!(parse_page_selector_list(":hover").is_err());
    }

    #[test]
    fn test_standalone_pseudo_element() {
        let selector = parse_pseudo_element_selector("::before").unwrap();
        assert_eq!(selector.name, "before");
        assert_eq!(selector.args, None);
    }

    #[test]
    fn test_standalone_pseudo_element_rejects_pseudo_class() {
        assert!(parse_pseudo_element_selector(":hover").is_err());
        assert!(parse_pseudo_element_selector("div::before").is_err());
    }
}
