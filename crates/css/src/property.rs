//! Property identifiers and declaration blocks

use std::fmt;
use std::sync::LazyLock;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::value::CssValue;

/// Canonical names of the properties this engine recognizes
static PROPERTY_NAMES: &[&str] = &[
    "background",
    "background-color",
    "background-image",
    "background-position",
    "background-repeat",
    "background-size",
    "border",
    "border-bottom",
    "border-bottom-color",
    "border-bottom-style",
    "border-bottom-width",
    "border-color",
    "border-left",
    "border-left-color",
    "border-left-style",
    "border-left-width",
    "border-radius",
    "border-right",
    "border-right-color",
    "border-right-style",
    "border-right-width",
    "border-style",
    "border-top",
    "border-top-color",
    "border-top-style",
    "border-top-width",
    "border-width",
    "bottom",
    "box-sizing",
    "color",
    "cursor",
    "display",
    "flex",
    "flex-basis",
    "flex-direction",
    "flex-grow",
    "flex-shrink",
    "flex-wrap",
    "float",
    "font",
    "font-family",
    "font-size",
    "font-style",
    "font-weight",
    "gap",
    "height",
    "justify-content",
    "left",
    "letter-spacing",
    "line-height",
    "list-style",
    "list-style-type",
    "margin",
    "margin-bottom",
    "margin-left",
    "margin-right",
    "margin-top",
    "max-height",
    "max-width",
    "min-height",
    "min-width",
    "opacity",
    "overflow",
    "overflow-x",
    "overflow-y",
    "padding",
    "padding-bottom",
    "padding-left",
    "padding-right",
    "padding-top",
    "position",
    "right",
    "text-align",
    "text-decoration",
    "text-transform",
    "top",
    "vertical-align",
    "visibility",
    "white-space",
    "width",
    "z-index",
];

static PROPERTY_SET: LazyLock<FxHashSet<&'static str>> =
    LazyLock::new(|| PROPERTY_NAMES.iter().copied().collect());

/// Properties that accept a quirky unitless length in quirks mode
static QUIRKY_LENGTH_PROPERTIES: &[&str] = &[
    "border-bottom-width",
    "border-left-width",
    "border-right-width",
    "border-top-width",
    "bottom",
    "font-size",
    "height",
    "left",
    "letter-spacing",
    "margin",
    "margin-bottom",
    "margin-left",
    "margin-right",
    "margin-top",
    "max-height",
    "max-width",
    "min-height",
    "min-width",
    "padding",
    "padding-bottom",
    "padding-left",
    "padding-right",
    "padding-top",
    "right",
    "top",
    "vertical-align",
    "width",
];

/// Identifier for a recognized CSS property, interned against the static
/// name table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropertyId(&'static str);

impl PropertyId {
    /// Look up a property by name, case-insensitively. Custom properties
    /// (`--*`) are not property IDs; see [`is_custom_property_name`].
    pub fn from_name(name: &str) -> Option<Self> {
        let lowered = name.to_ascii_lowercase();
        PROPERTY_SET.get(lowered.as_str()).copied().map(Self)
    }

    pub fn name(self) -> &'static str {
        self.0
    }

    /// Does this property take a quirky unitless length in quirks mode?
    pub fn accepts_quirky_length(self) -> bool {
        QUIRKY_LENGTH_PROPERTIES.contains(&self.0)
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Is this the name of a custom property (a `--`-prefixed identifier)?
pub fn is_custom_property_name(name: &str) -> bool {
    name.len() > 2 && name.starts_with("--")
}

/// A property declaration
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub id: PropertyId,
    pub value: CssValue,
    pub important: bool,
}

/// The result of parsing a property declaration block: recognized
/// properties plus any custom properties
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyDeclarationBlock {
    pub declarations: Vec<Declaration>,
    pub custom_properties: FxHashMap<String, CssValue>,
}

impl PropertyDeclarationBlock {
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty() && self.custom_properties.is_empty()
    }
}
