//! Nergal CSS Parse Entry Points
//!
//! The production router: one free function per grammar production, each
//! binding a fresh grammar-engine instance to a parsing context and one
//! text span. Empty input short-circuits to the production's defined
//! empty result without touching the engine; a grammar mismatch comes
//! back as an absent or empty result, never as an error.

pub mod context;
pub mod csslog;
pub mod stylesheet;

pub use context::ParsingContext;
pub use csslog::{set_css_log_sink, CssLogSink, FileSink, NoopSink};
pub use stylesheet::{MediaList, StyleSheet};

use nergal_css::{
    AtRuleId, CssValue, DescriptorId, MediaQuery, MediaQueryList, PageSelectorList, Parser,
    PropertyDeclarationBlock, PropertyId, PseudoElementSelector, Rule, SelectorList,
    SupportsCondition,
};
use nergal_css::{adapt_nested_relative_selector_list, Descriptor};
use url::Url;

/// Parse text as a complete stylesheet.
///
/// Empty input yields a sheet with no rules and no media, without
/// invoking the engine; the passed media query list is not attached in
/// that case. For non-empty input the verbatim source text is recorded
/// on the resulting sheet.
pub fn parse_css_stylesheet(
    context: &ParsingContext,
    css: &str,
    location: Option<Url>,
    media_query_list: MediaQueryList,
) -> StyleSheet {
    if !css.is_empty() {
        let source_description = match &location {
            Some(url) => format!("External stylesheet: {}", url),
            None => "Inline stylesheet".to_string(),
        };
        csslog::sink().record(css, &source_description, location.as_ref());
    }

    if css.is_empty() {
        return StyleSheet::empty(context.realm().clone(), location);
    }

    let parsed = Parser::new(context.options(), css).parse_as_stylesheet();
    StyleSheet::new(
        context.realm().clone(),
        location,
        MediaList::new(media_query_list),
        parsed.rules,
        css.to_string(),
    )
}

/// Parse text as the contents of a style declaration block. Empty input
/// yields an empty block.
pub fn parse_css_property_declaration_block(
    context: &ParsingContext,
    css: &str,
) -> PropertyDeclarationBlock {
    if css.is_empty() {
        return PropertyDeclarationBlock::default();
    }
    Parser::new(context.options(), css).parse_as_property_declaration_block()
}

/// Parse text as the contents of an at-rule's descriptor block. Empty
/// input yields an empty sequence.
pub fn parse_css_descriptor_declaration_block(
    context: &ParsingContext,
    at_rule: AtRuleId,
    css: &str,
) -> Vec<Descriptor> {
    if css.is_empty() {
        return Vec::new();
    }
    Parser::new(context.options(), css).parse_as_descriptor_declaration_block(at_rule)
}

/// Parse text as a value for the given property. Empty input and grammar
/// mismatch both yield None; there is never a substituted default.
pub fn parse_css_value(
    context: &ParsingContext,
    css: &str,
    property: PropertyId,
) -> Option<CssValue> {
    if css.is_empty() {
        return None;
    }
    Parser::new(context.options(), css).parse_as_value(property)
}

/// Parse text as a value for the given descriptor. Empty input yields
/// None.
pub fn parse_css_descriptor(
    context: &ParsingContext,
    at_rule: AtRuleId,
    descriptor: DescriptorId,
    css: &str,
) -> Option<CssValue> {
    if css.is_empty() {
        return None;
    }
    Parser::new(context.options(), css).parse_as_descriptor_value(at_rule, descriptor)
}

/// Parse text as a single rule; None if no rule matches.
pub fn parse_css_rule(context: &ParsingContext, css: &str) -> Option<Rule> {
    Parser::new(context.options(), css).parse_as_rule()
}

/// Parse text as a standard selector list.
pub fn parse_selector(context: &ParsingContext, css: &str) -> Option<SelectorList> {
    Parser::new(context.options(), css).parse_as_selector_list()
}

/// Parse text as the selector list of a nested style rule: parsed as a
/// relative selector list, then rewritten into standalone selectors
/// anchored on the parent. A failed relative parse yields None with no
/// rewrite attempted.
pub fn parse_selector_for_nested_style_rule(
    context: &ParsingContext,
    css: &str,
) -> Option<SelectorList> {
    Parser::new(context.options(), css)
        .parse_as_relative_selector_list()
        .map(adapt_nested_relative_selector_list)
}

/// Parse text as an @page selector list.
pub fn parse_page_selector_list(context: &ParsingContext, css: &str) -> Option<PageSelectorList> {
    Parser::new(context.options(), css).parse_as_page_selector_list()
}

/// Parse text as a standalone pseudo-element selector.
pub fn parse_pseudo_element_selector(
    context: &ParsingContext,
    css: &str,
) -> Option<PseudoElementSelector> {
    Parser::new(context.options(), css).parse_as_pseudo_element_selector()
}

/// Parse text as a single media query.
pub fn parse_media_query(context: &ParsingContext, css: &str) -> Option<MediaQuery> {
    Parser::new(context.options(), css).parse_as_media_query()
}

/// Parse text as a media query list; unparsable entries become `not all`.
pub fn parse_media_query_list(context: &ParsingContext, css: &str) -> MediaQueryList {
    Parser::new(context.options(), css).parse_as_media_query_list()
}

/// Parse text as a supports condition. Empty input yields None without
/// invoking the engine.
pub fn parse_css_supports(context: &ParsingContext, css: &str) -> Option<SupportsCondition> {
    if css.is_empty() {
        return None;
    }
    Parser::new(context.options(), css).parse_as_supports()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nergal_css::{Combinator, MediaType, SelectorPart};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn ctx() -> ParsingContext {
        ParsingContext::default()
    }

    #[test]
    fn test_empty_stylesheet_short_circuit() {
        let queries = parse_media_query_list(&ctx(), "screen, print");
        let sheet = parse_css_stylesheet(&ctx(), "", None, queries);
        assert!(sheet.rules().is_empty());
        assert!(sheet.media().is_empty());
        assert_eq!(sheet.source_text(), "");
    }

    #[test]
    fn test_stylesheet_records_source_text() {
        let css = "p {\n  color: red;\n}\n";
        let sheet = parse_css_stylesheet(&ctx(), css, None, Vec::new());
        assert_eq!(sheet.source_text(), css);
        assert_eq!(sheet.rules().len(), 1);
    }

    #[test]
    fn test_stylesheet_media_and_location() {
        let context = ctx();
        let url = Url::parse("https://example.com/site.css").unwrap();
        let queries = parse_media_query_list(&context, "screen");
        let sheet =
            parse_css_stylesheet(&context, "p { }", Some(url.clone()), queries);
        assert_eq!(sheet.location(), Some(&url));
        assert_eq!(sheet.media().media_text(), "screen");
        assert!(sheet.realm().ptr_eq(context.realm()));
    }

    #[test]
    fn test_empty_input_policies() {
        let context = ctx();
        assert!(parse_css_property_declaration_block(&context, "").is_empty());
        assert!(parse_css_descriptor_declaration_block(&context, AtRuleId::FontFace, "")
            .is_empty());
        let color = PropertyId::from_name("color").unwrap();
        assert_eq!(parse_css_value(&context, "", color), None);
        assert_eq!(
            parse_css_descriptor(&context, AtRuleId::FontFace, DescriptorId::Src, ""),
            None
        );
        assert_eq!(parse_css_supports(&context, ""), None);
    }

    #[test]
    fn test_value_never_defaults() {
        let context = ctx();
        let color = PropertyId::from_name("color").unwrap();
        assert_eq!(parse_css_value(&context, "", color), None);
        assert_eq!(parse_css_value(&context, "!important", color), None);
    }

    #[test]
    fn test_rule_dispatch() {
        let context = ctx();
        assert!(matches!(parse_css_rule(&context, "p { color: red; }"), Some(Rule::Style(_))));
        assert!(matches!(parse_css_rule(&context, "@media print { }"), Some(Rule::Media(_))));
        assert!(parse_css_rule(&context, "").is_none());
    }

    #[test]
    fn test_selector_dispatch() {
        let context = ctx();
        let list = parse_selector(&context, "div > p, span").unwrap();
        assert_eq!(list.len(), 2);
        assert!(parse_selector(&context, "..bad").is_none());
    }

    #[test]
    fn test_nested_selector_adaptation() {
        let context = ctx();

        // A parent reference is kept as written
        let list = parse_selector_for_nested_style_rule(&context, "&.foo").unwrap();
        assert!(matches!(list[0].parts[0], SelectorPart::Nesting));

        // Without one, the selector is anchored on the parent
        let list = parse_selector_for_nested_style_rule(&context, "> .title").unwrap();
        assert!(matches!(list[0].parts[0], SelectorPart::Nesting));
        assert!(matches!(list[0].parts[1], SelectorPart::Combinator(Combinator::Child)));

        // A failed relative parse adapts nothing
        assert!(parse_selector_for_nested_style_rule(&context, "&&&").is_none());
    }

    #[test]
    fn test_page_and_pseudo_element_dispatch() {
        let context = ctx();
        let pages = parse_page_selector_list(&context, ":first, landscape").unwrap();
        assert_eq!(pages.len(), 2);

        let pseudo = parse_pseudo_element_selector(&context, "::before").unwrap();
        assert_eq!(pseudo.name, "before");
        assert!(parse_pseudo_element_selector(&context, "::before x").is_none());
    }

    #[test]
    fn test_media_dispatch() {
        let context = ctx();
        let query = parse_media_query(&context, "screen").unwrap();
        assert_eq!(query.media_type, MediaType::Screen);

        let list = parse_media_query_list(&context, "screen, bogus!");
        assert_eq!(list.len(), 2);
        assert_eq!(list[1], MediaQuery::not_all());
        assert!(parse_media_query_list(&context, "").is_empty());
    }

    #[test]
    fn test_supports_dispatch() {
        let context = ctx();
        assert!(parse_css_supports(&context, "(display: grid)").is_some());
        assert!(parse_css_supports(&context, "nonsense").is_none());
    }

    #[test]
    fn test_repeat_parse_is_structurally_identical() {
        let context = ctx();
        let css = "p { color: red; } @media screen { div { width: 10px; } }";
        let first = parse_css_stylesheet(&context, css, None, Vec::new());
        let second = parse_css_stylesheet(&context, css, None, Vec::new());
        assert_eq!(first.rules(), second.rules());
        assert!(first.realm().ptr_eq(second.realm()));
    }

    struct CountingSink {
        marker: &'static str,
        count: Arc<AtomicUsize>,
    }

    impl CssLogSink for CountingSink {
        fn record(&self, _css: &str, _source: &str, location: Option<&Url>) {
            // Count only this test's parses; other tests run in parallel
            if location.is_some_and(|url| url.as_str().contains(self.marker)) {
                self.count.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    // The process-wide sink can be installed once, so exactly one test
    // installs it; other sink behavior is covered in csslog's own tests.
    #[test]
    fn test_installed_sink_sees_only_non_empty_stylesheets() {
        let count = Arc::new(AtomicUsize::new(0));
        assert!(set_css_log_sink(Box::new(CountingSink {
            marker: "sink-marker",
            count: count.clone(),
        })));

        let context = ctx();
        let url = Url::parse("https://sink-marker.test/sheet.css").unwrap();

        // Empty input returns before the capture hook and the engine are
        // ever reached; the passed media list is discarded unused
        let queries = parse_media_query_list(&context, "screen, print");
        let sheet = parse_css_stylesheet(&context, "", Some(url.clone()), queries);
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert!(sheet.media().is_empty());
        assert!(sheet.rules().is_empty());

        parse_css_stylesheet(&context, "p { }", Some(url.clone()), Vec::new());
        parse_css_stylesheet(&context, "div { }", Some(url), Vec::new());
        assert_eq!(count.load(Ordering::SeqCst), 2);

        // Second install is refused
        assert!(!set_css_log_sink(Box::new(NoopSink)));
    }
}
