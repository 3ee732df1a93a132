//! Parsing context
//!
//! A [`ParsingContext`] carries everything a parse call needs besides the
//! text itself: the realm that owns the resulting objects, the source
//! location if known, and environment-specific parser settings.

use nergal_css::ParserOptions;
use nergal_realm::{get_or_create_internal_realm, Realm};
use url::Url;

/// Everything a parse entry point needs besides the text
#[derive(Debug, Clone)]
pub struct ParsingContext {
    realm: Realm,
    location: Option<Url>,
    options: ParserOptions,
}

impl ParsingContext {
    /// Context allocating into the given realm
    pub fn new(realm: Realm) -> Self {
        Self {
            realm,
            location: None,
            options: ParserOptions::default(),
        }
    }

    pub fn with_location(mut self, location: Url) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_options(mut self, options: ParserOptions) -> Self {
        self.options = options;
        self
    }

    pub fn realm(&self) -> &Realm {
        &self.realm
    }

    pub fn location(&self) -> Option<&Url> {
        self.location.as_ref()
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }
}

impl Default for ParsingContext {
    /// Context for parses with no hosting document, allocating into the
    /// shared internal realm
    fn default() -> Self {
        Self::new(get_or_create_internal_realm())
    }
}
