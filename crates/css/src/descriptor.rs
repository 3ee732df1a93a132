//! At-rule descriptors
//!
//! Descriptors are the declaration-like entries inside at-rules such as
//! @font-face; which descriptor names are legal depends on the at-rule.

use std::fmt;

use crate::value::CssValue;

/// At-rules with descriptor declaration blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtRuleId {
    FontFace,
    Page,
}

impl AtRuleId {
    pub fn name(self) -> &'static str {
        match self {
            Self::FontFace => "font-face",
            Self::Page => "page",
        }
    }
}

impl fmt::Display for AtRuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name())
    }
}

/// Identifier for a descriptor, scoped to its at-rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorId {
    // @font-face
    FontFamily,
    Src,
    FontStyle,
    FontWeight,
    FontStretch,
    FontDisplay,
    UnicodeRange,
    // @page
    Size,
    Marks,
    Bleed,
    PageOrientation,
}

impl DescriptorId {
    /// Look up a descriptor by name within an at-rule; names that are not
    /// legal descriptors for the at-rule yield None.
    pub fn from_name(at_rule: AtRuleId, name: &str) -> Option<Self> {
        let lowered = name.to_ascii_lowercase();
        match at_rule {
            AtRuleId::FontFace => match lowered.as_str() {
                "font-family" => Some(Self::FontFamily),
                "src" => Some(Self::Src),
                "font-style" => Some(Self::FontStyle),
                "font-weight" => Some(Self::FontWeight),
                "font-stretch" => Some(Self::FontStretch),
                "font-display" => Some(Self::FontDisplay),
                "unicode-range" => Some(Self::UnicodeRange),
                _ => None,
            },
            AtRuleId::Page => match lowered.as_str() {
                "size" => Some(Self::Size),
                "marks" => Some(Self::Marks),
                "bleed" => Some(Self::Bleed),
                "page-orientation" => Some(Self::PageOrientation),
                _ => None,
            },
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::FontFamily => "font-family",
            Self::Src => "src",
            Self::FontStyle => "font-style",
            Self::FontWeight => "font-weight",
            Self::FontStretch => "font-stretch",
            Self::FontDisplay => "font-display",
            Self::UnicodeRange => "unicode-range",
            Self::Size => "size",
            Self::Marks => "marks",
            Self::Bleed => "bleed",
            Self::PageOrientation => "page-orientation",
        }
    }
}

/// A parsed descriptor declaration
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    pub id: DescriptorId,
    pub value: CssValue,
}
