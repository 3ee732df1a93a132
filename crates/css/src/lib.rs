//! Nergal CSS Grammar Engine
//!
//! Tokenizer, per-production parsers, and the typed CSS object model.
//! Every parse entry constructs a fresh short-lived [`Parser`] bound to one
//! text span; a grammar mismatch surfaces as an absent or empty result,
//! never as an error escaping the production surface.

pub mod descriptor;
pub mod error;
pub mod media;
pub mod parser;
pub mod property;
pub mod selector;
pub mod supports;
pub mod tokenizer;
pub mod value;

pub use descriptor::{AtRuleId, Descriptor, DescriptorId};
pub use error::{CssError, CssResult, SourceLocation};
pub use media::{MediaQuery, MediaQueryList, MediaRestrictor, MediaType};
pub use parser::{Parser, ParserOptions, QuirksMode, Rule, Stylesheet};
pub use property::{Declaration, PropertyDeclarationBlock, PropertyId};
pub use selector::{
    adapt_nested_relative_selector_list, Combinator, PagePseudoClass, PageSelector,
    PageSelectorList, PseudoElementSelector, RelativeSelector, RelativeSelectorList, Selector,
    SelectorList, SelectorPart, Specificity,
};
pub use supports::SupportsCondition;
pub use value::{Color, CssValue, LengthUnit};
