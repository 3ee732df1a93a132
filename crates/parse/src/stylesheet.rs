//! Stylesheet object model
//!
//! The realm-owned result of a stylesheet parse: the rule list, the media
//! list it applies under, its source location, and the verbatim source
//! text for later introspection and serialization.

use std::fmt::Write;

use nergal_css::{MediaQueryList, Rule};
use nergal_realm::Realm;
use url::Url;

/// An ordered list of media queries attached to a stylesheet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaList {
    pub queries: MediaQueryList,
}

impl MediaList {
    pub fn new(queries: MediaQueryList) -> Self {
        Self { queries }
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    /// Serialized form of the list, comma-separated
    pub fn media_text(&self) -> String {
        let mut text = String::new();
        for (index, query) in self.queries.iter().enumerate() {
            if index > 0 {
                text.push_str(", ");
            }
            let _ = write!(text, "{}", query);
        }
        text
    }
}

/// A parsed stylesheet, owned by a realm
#[derive(Debug, Clone)]
pub struct StyleSheet {
    realm: Realm,
    location: Option<Url>,
    media: MediaList,
    rules: Vec<Rule>,
    source_text: String,
}

impl StyleSheet {
    pub fn new(
        realm: Realm,
        location: Option<Url>,
        media: MediaList,
        rules: Vec<Rule>,
        source_text: String,
    ) -> Self {
        Self { realm, location, media, rules, source_text }
    }

    /// The sheet produced for empty input: no rules, no media
    pub fn empty(realm: Realm, location: Option<Url>) -> Self {
        Self {
            realm,
            location,
            media: MediaList::default(),
            rules: Vec::new(),
            source_text: String::new(),
        }
    }

    pub fn realm(&self) -> &Realm {
        &self.realm
    }

    pub fn location(&self) -> Option<&Url> {
        self.location.as_ref()
    }

    pub fn media(&self) -> &MediaList {
        &self.media
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// The original source text, byte for byte
    pub fn source_text(&self) -> &str {
        &self.source_text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nergal_css::{MediaQuery, Parser, ParserOptions};
    use nergal_realm::get_or_create_internal_realm;

    #[test]
    fn test_empty_sheet() {
        let sheet = StyleSheet::empty(get_or_create_internal_realm(), None);
        assert!(sheet.rules().is_empty());
        assert!(sheet.media().is_empty());
        assert_eq!(sheet.source_text(), "");
    }

    #[test]
    fn test_media_text() {
        let queries = Parser::new(&ParserOptions::default(), "screen, print")
            .parse_as_media_query_list();
        let media = MediaList::new(queries);
        assert_eq!(media.media_text(), "screen, print");

        assert_eq!(MediaList::new(vec![MediaQuery::not_all()]).media_text(), "not all");
        assert_eq!(MediaList::default().media_text(), "");
    }
}
