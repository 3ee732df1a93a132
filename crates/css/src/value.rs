//! CSS component values
//!
//! Value types shared by property declarations, descriptors, and media
//! features, plus the leaf token-to-value conversions.

use std::fmt;

use crate::error::{CssError, CssResult, SourceLocation};
use crate::tokenizer::{HashType, Token};

/// A CSS component value
#[derive(Debug, Clone, PartialEq)]
pub enum CssValue {
    /// Keyword value (auto, inherit, none, ...)
    Keyword(String),
    /// Length with unit
    Length(f32, LengthUnit),
    /// Percentage
    Percentage(f32),
    /// Color
    Color(Color),
    /// Unitless number
    Number(f32),
    /// Quoted string
    String(String),
    /// url() reference
    Url(String),
    /// Function call (calc(), var(), ...)
    Function(String, Vec<CssValue>),
    /// Space-separated list
    List(Vec<CssValue>),
}

impl fmt::Display for CssValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keyword(k) => write!(f, "{}", k),
            Self::Length(n, unit) => write!(f, "{}{}", n, unit),
            Self::Percentage(n) => write!(f, "{}%", n),
            Self::Color(c) => write!(f, "{}", c),
            Self::Number(n) => write!(f, "{}", n),
            Self::String(s) => write!(f, "\"{}\"", s),
            Self::Url(u) => write!(f, "url({})", u),
            Self::Function(name, args) => {
                write!(f, "{}(", name)?;
                for (index, arg) in args.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            Self::List(values) => {
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", value)?;
                }
                Ok(())
            }
        }
    }
}

/// Length units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthUnit {
    Px,
    Em,
    Rem,
    Vw,
    Vh,
    Vmin,
    Vmax,
    Cm,
    Mm,
    In,
    Pt,
    Pc,
    Ch,
    Ex,
}

impl LengthUnit {
    /// Parse a unit name, case-insensitively
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "px" => Some(Self::Px),
            "em" => Some(Self::Em),
            "rem" => Some(Self::Rem),
            "vw" => Some(Self::Vw),
            "vh" => Some(Self::Vh),
            "vmin" => Some(Self::Vmin),
            "vmax" => Some(Self::Vmax),
            "cm" => Some(Self::Cm),
            "mm" => Some(Self::Mm),
            "in" => Some(Self::In),
            "pt" => Some(Self::Pt),
            "pc" => Some(Self::Pc),
            "ch" => Some(Self::Ch),
            "ex" => Some(Self::Ex),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Px => "px",
            Self::Em => "em",
            Self::Rem => "rem",
            Self::Vw => "vw",
            Self::Vh => "vh",
            Self::Vmin => "vmin",
            Self::Vmax => "vmax",
            Self::Cm => "cm",
            Self::Mm => "mm",
            Self::In => "in",
            Self::Pt => "pt",
            Self::Pc => "pc",
            Self::Ch => "ch",
            Self::Ex => "ex",
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a hex color body (without the '#')
    pub fn from_hex(hex: &str) -> Option<Self> {
        // Hash names admit any name char; only ASCII digits can be a color,
        // and the byte-range slicing below requires ASCII
        if !hex.is_ascii() {
            return None;
        }
        let component = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        match hex.len() {
            3 | 4 => {
                let r = component(0..1)?;
                let g = component(1..2)?;
                let b = component(2..3)?;
                let a = if hex.len() == 4 { component(3..4)? * 17 } else { 255 };
                Some(Self::rgba(r * 17, g * 17, b * 17, a))
            }
            6 | 8 => {
                let r = component(0..2)?;
                let g = component(2..4)?;
                let b = component(4..6)?;
                let a = if hex.len() == 8 { component(6..8)? } else { 255 };
                Some(Self::rgba(r, g, b, a))
            }
            _ => None,
        }
    }

    /// Parse a named color (small common subset plus transparent)
    pub fn from_keyword(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "transparent" => Some(Self::rgba(0, 0, 0, 0)),
            "black" => Some(Self::rgb(0, 0, 0)),
            "white" => Some(Self::rgb(255, 255, 255)),
            "red" => Some(Self::rgb(255, 0, 0)),
            "green" => Some(Self::rgb(0, 128, 0)),
            "blue" => Some(Self::rgb(0, 0, 255)),
            "yellow" => Some(Self::rgb(255, 255, 0)),
            "orange" => Some(Self::rgb(255, 165, 0)),
            "purple" => Some(Self::rgb(128, 0, 128)),
            "gray" | "grey" => Some(Self::rgb(128, 128, 128)),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
        } else {
            write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a as f32 / 255.0)
        }
    }
}

/// Convert a single leaf token to a component value
pub fn value_from_token(token: &Token, location: SourceLocation) -> CssResult<CssValue> {
    match token {
        Token::Ident(name) => {
            if let Some(color) = Color::from_keyword(name) {
                Ok(CssValue::Color(color))
            } else {
                Ok(CssValue::Keyword(name.to_ascii_lowercase()))
            }
        }
        Token::Hash(hex, _) => Color::from_hex(hex)
            .map(CssValue::Color)
            .ok_or_else(|| CssError::InvalidColor { color: format!("#{}", hex), location }),
        Token::Number(n) => Ok(CssValue::Number(*n)),
        Token::Percentage(n) => Ok(CssValue::Percentage(*n)),
        Token::Dimension(n, unit) => LengthUnit::from_name(unit)
            .map(|u| CssValue::Length(*n, u))
            .ok_or_else(|| CssError::parse_error(format!("unknown unit '{}'", unit), location)),
        Token::String(s) => Ok(CssValue::String(s.clone())),
        Token::Url(u) => Ok(CssValue::Url(u.clone())),
        token => Err(CssError::parse_error(
            format!("unexpected token {:?} in value", token),
            location,
        )),
    }
}

/// Parse an rgb()/rgba() argument list
pub fn parse_rgb_args(args: &[Token], location: SourceLocation) -> CssResult<Color> {
    let numbers = numeric_args(args);
    if numbers.len() < 3 {
        return Err(CssError::InvalidColor { color: "rgb()".into(), location });
    }
    let alpha = numbers.get(3).map_or(255.0, |a| {
        if *a <= 1.0 { a * 255.0 } else { *a }
    });
    Ok(Color::rgba(
        clamp_u8(numbers[0]),
        clamp_u8(numbers[1]),
        clamp_u8(numbers[2]),
        clamp_u8(alpha),
    ))
}

/// Parse an hsl()/hsla() argument list
pub fn parse_hsl_args(args: &[Token], location: SourceLocation) -> CssResult<Color> {
    let numbers = numeric_args(args);
    if numbers.len() < 3 {
        return Err(CssError::InvalidColor { color: "hsl()".into(), location });
    }
    let h = numbers[0].rem_euclid(360.0) / 360.0;
    let s = (numbers[1] / 100.0).clamp(0.0, 1.0);
    let l = (numbers[2] / 100.0).clamp(0.0, 1.0);
    let alpha = numbers.get(3).map_or(255.0, |a| {
        if *a <= 1.0 { a * 255.0 } else { *a }
    });

    let (r, g, b) = hsl_to_rgb(h, s, l);
    Ok(Color::rgba(clamp_u8(r * 255.0), clamp_u8(g * 255.0), clamp_u8(b * 255.0), clamp_u8(alpha)))
}

fn numeric_args(args: &[Token]) -> Vec<f32> {
    args.iter()
        .filter_map(|token| match token {
            Token::Number(n) => Some(*n),
            Token::Percentage(n) => Some(*n),
            _ => None,
        })
        .collect()
}

fn clamp_u8(value: f32) -> u8 {
    value.clamp(0.0, 255.0) as u8
}

fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (f32, f32, f32) {
    if s == 0.0 {
        return (l, l, l);
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    (
        hue_to_rgb(p, q, h + 1.0 / 3.0),
        hue_to_rgb(p, q, h),
        hue_to_rgb(p, q, h - 1.0 / 3.0),
    )
}

fn hue_to_rgb(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_short() {
        assert_eq!(Color::from_hex("f00"), Some(Color::rgb(255, 0, 0)));
    }

    #[test]
    fn test_hex_long() {
        assert_eq!(Color::from_hex("ff8000"), Some(Color::rgb(255, 128, 0)));
    }

    #[test]
    fn test_hex_with_alpha() {
        assert_eq!(Color::from_hex("ff000080"), Some(Color::rgba(255, 0, 0, 128)));
    }

    #[test]
    fn test_hex_invalid() {
        assert_eq!(Color::from_hex("xyz"), None);
        assert_eq!(Color::from_hex("ff00"), Some(Color::rgba(255, 255, 0, 0)));
        assert_eq!(Color::from_hex("12345"), None);
    }

    #[test]
    fn test_hex_non_ascii() {
        // "a€" is 4 bytes but 2 chars; must be rejected, not sliced
        assert_eq!(Color::from_hex("a€"), None);
        assert_eq!(Color::from_hex("€"), None);
        assert_eq!(Color::from_hex("ff€000ff"), None);
    }

    #[test]
    fn test_named_colors() {
        assert_eq!(Color::from_keyword("RED"), Some(Color::rgb(255, 0, 0)));
        assert_eq!(Color::from_keyword("mauve"), None);
    }

    #[test]
    fn test_unit_roundtrip() {
        assert_eq!(LengthUnit::from_name("PX"), Some(LengthUnit::Px));
        assert_eq!(LengthUnit::Rem.name(), "rem");
        assert_eq!(LengthUnit::from_name("furlong"), None);
    }

    #[test]
    fn test_value_from_dimension() {
        let value =
            value_from_token(&Token::Dimension(16.0, "px".into()), SourceLocation::default())
                .unwrap();
        assert_eq!(value, CssValue::Length(16.0, LengthUnit::Px));
    }

    #[test]
    fn test_rgb_args() {
        let args = vec![Token::Number(255.0), Token::Comma, Token::Number(128.0), Token::Comma, Token::Number(0.0)];
        let color = parse_rgb_args(&args, SourceLocation::default()).unwrap();
        assert_eq!(color, Color::rgb(255, 128, 0));
    }

    #[test]
    fn test_hsl_green() {
        let args = vec![Token::Number(120.0), Token::Comma, Token::Percentage(100.0), Token::Comma, Token::Percentage(50.0)];
        let color = parse_hsl_args(&args, SourceLocation::default()).unwrap();
        assert!(color.g > color.r);
        assert!(color.g > color.b);
    }

    #[test]
    fn test_display() {
        assert_eq!(CssValue::Length(1.5, LengthUnit::Em).to_string(), "1.5em");
        assert_eq!(CssValue::Percentage(50.0).to_string(), "50%");
        assert_eq!(
            CssValue::List(vec![CssValue::Keyword("bold".into()), CssValue::Number(12.0)])
                .to_string(),
            "bold 12"
        );
    }
}
