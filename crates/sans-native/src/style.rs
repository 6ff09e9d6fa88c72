// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Style normalization shared by every adapter.
//
// Styles arrive either as a mapping or as CSS declaration text and are
// normalized to a map with camelCase keys. The per-backend translators in
// `adapter::*` take it from there.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use sans_core::error::{Result, SansError};

/// A single style value. Numbers are unitless; everything else is kept as
/// the text the caller wrote.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleValue {
    Number(f64),
    Text(String),
}

impl StyleValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    /// CSS text for this value. Bare numbers get `px` unless `property`
    /// is unitless.
    pub fn to_css(&self, property: &str) -> String {
        match self {
            Self::Number(n) if is_unitless(property) => format_number(*n),
            Self::Number(n) => format!("{}px", format_number(*n)),
            Self::Text(s) => s.clone(),
        }
    }

    /// Convert a JSON prop value. Objects, arrays and null have no style
    /// meaning.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64().map(Self::Number),
            Value::String(s) => Some(Self::Text(s.clone())),
            Value::Bool(b) => Some(Self::Text(b.to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => f.write_str(&format_number(*n)),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for StyleValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for StyleValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

fn is_unitless(property: &str) -> bool {
    matches!(
        property,
        "opacity" | "zIndex" | "fontWeight" | "lineHeight" | "flex" | "flexGrow" | "flexShrink" | "order"
    )
}

/// Normalized style map, camelCase keys.
pub type StyleMap = BTreeMap<String, StyleValue>;

/// Style input as accepted by `apply_styles`.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleInput {
    Map(StyleMap),
    Css(String),
}

impl StyleInput {
    /// Interpret a `style` prop: a string is CSS text, an object a mapping.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(css) => Some(Self::Css(css.clone())),
            Value::Object(map) => Some(Self::Map(
                map.iter()
                    .filter_map(|(k, v)| StyleValue::from_json(v).map(|v| (k.clone(), v)))
                    .collect(),
            )),
            _ => None,
        }
    }

    pub fn normalize(&self) -> StyleMap {
        match self {
            Self::Map(map) => map.iter().map(|(k, v)| (camel_case(k), v.clone())).collect(),
            Self::Css(text) => parse_css_text(text),
        }
    }
}

impl From<StyleMap> for StyleInput {
    fn from(map: StyleMap) -> Self {
        Self::Map(map)
    }
}

impl From<&str> for StyleInput {
    fn from(css: &str) -> Self {
        Self::Css(css.to_string())
    }
}

impl From<String> for StyleInput {
    fn from(css: String) -> Self {
        Self::Css(css)
    }
}

impl<K: Into<String>, V: Into<StyleValue>, const N: usize> From<[(K, V); N]> for StyleInput {
    fn from(entries: [(K, V); N]) -> Self {
        Self::Map(entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Parse `"prop: value; prop2: value2"`. Each declaration splits on its
/// first colon, so values may contain colons (`url(http://...)`).
/// Declarations missing either side are skipped.
pub fn parse_css_text(text: &str) -> StyleMap {
    text.split(';')
        .filter_map(|decl| {
            let (prop, value) = decl.split_once(':')?;
            let (prop, value) = (prop.trim(), value.trim());
            if prop.is_empty() || value.is_empty() {
                return None;
            }
            Some((camel_case(prop), StyleValue::Text(value.to_string())))
        })
        .collect()
}

/// `background-color` -> `backgroundColor`.
pub fn camel_case(prop: &str) -> String {
    let mut out = String::with_capacity(prop.len());
    let mut chars = prop.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '-' {
            if let Some(&next) = chars.peek().filter(|n| n.is_ascii_lowercase()) {
                out.push(next.to_ascii_uppercase());
                chars.next();
                continue;
            }
        }
        out.push(c);
    }
    out
}

/// `backgroundColor` -> `background-color`.
pub fn kebab_case(prop: &str) -> String {
    let mut out = String::with_capacity(prop.len() + 4);
    for c in prop.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Leading float of `s`, the way a lenient CSS parser reads `12.5px`.
pub fn parse_leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > frac_start || digits > 0 {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }
    s[..end].parse().ok()
}

/// Size coercion: unit suffixes are stripped and the number kept.
/// Percentages and anything without a leading number stay as text.
pub fn parse_size(value: &StyleValue) -> StyleValue {
    match value {
        StyleValue::Number(_) => value.clone(),
        StyleValue::Text(s) if s.contains('%') => value.clone(),
        StyleValue::Text(s) => parse_leading_float(s)
            .map(StyleValue::Number)
            .unwrap_or_else(|| value.clone()),
    }
}

pub const DEFAULT_FONT_SIZE: f64 = 14.0;

/// Font sizes must end up numeric; unparsable input gets the default.
pub fn parse_font_size(value: &StyleValue) -> f64 {
    match value {
        StyleValue::Number(n) => *n,
        StyleValue::Text(s) => parse_leading_float(s).unwrap_or(DEFAULT_FONT_SIZE),
    }
}

/// Per-side values of a `margin`/`padding` shorthand.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxEdges<T> {
    pub top: T,
    pub right: T,
    pub bottom: T,
    pub left: T,
}

impl<T> BoxEdges<T> {
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> BoxEdges<U> {
        BoxEdges {
            top: f(self.top),
            right: f(self.right),
            bottom: f(self.bottom),
            left: f(self.left),
        }
    }

    /// `(side, value)` in top, right, bottom, left order.
    pub fn into_sides(self) -> [(&'static str, T); 4] {
        [
            ("Top", self.top),
            ("Right", self.right),
            ("Bottom", self.bottom),
            ("Left", self.left),
        ]
    }
}

/// Split a box shorthand with CSS rules: one token for all sides, two for
/// vertical/horizontal, three for top/horizontal/bottom, four for
/// top/right/bottom/left. Any other count is rejected.
pub fn parse_box_shorthand<'a>(property: &str, value: &'a str) -> Result<BoxEdges<&'a str>> {
    let tokens: Vec<&str> = value.split_whitespace().collect();
    match *tokens.as_slice() {
        [all] => Ok(BoxEdges {
            top: all,
            right: all,
            bottom: all,
            left: all,
        }),
        [vertical, horizontal] => Ok(BoxEdges {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }),
        [top, horizontal, bottom] => Ok(BoxEdges {
            top,
            right: horizontal,
            bottom,
            left: horizontal,
        }),
        [top, right, bottom, left] => Ok(BoxEdges {
            top,
            right,
            bottom,
            left,
        }),
        _ => Err(SansError::InvalidShorthand {
            property: property.to_string(),
            tokens: tokens.len(),
        }),
    }
}

/// Shorthand value expanded to per-side style values. A bare number
/// applies to every side.
pub fn box_edges(property: &str, value: &StyleValue) -> Result<BoxEdges<StyleValue>> {
    match value {
        StyleValue::Number(_) => Ok(BoxEdges {
            top: value.clone(),
            right: value.clone(),
            bottom: value.clone(),
            left: value.clone(),
        }),
        StyleValue::Text(text) => Ok(parse_box_shorthand(property, text)?
            .map(|token| StyleValue::Text(token.to_string()))),
    }
}

pub fn is_box_shorthand(property: &str) -> bool {
    matches!(property, "margin" | "padding")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_text_normalizes_keys() {
        let map = parse_css_text("background-color: red; font-size: 12px;; color:blue ; bogus");
        assert_eq!(map.len(), 3);
        assert_eq!(map["backgroundColor"], StyleValue::from("red"));
        assert_eq!(map["fontSize"], StyleValue::from("12px"));
        assert_eq!(map["color"], StyleValue::from("blue"));
    }

    #[test]
    fn css_text_keeps_colons_in_values() {
        let map = parse_css_text("background-image: url(http://x/y.png)");
        assert_eq!(map["backgroundImage"], StyleValue::from("url(http://x/y.png)"));
    }

    #[test]
    fn mapping_keys_are_camel_cased() {
        let map = StyleInput::from([("border-radius", 4.0)]).normalize();
        assert_eq!(map["borderRadius"], StyleValue::Number(4.0));
    }

    #[test]
    fn case_conversion() {
        assert_eq!(camel_case("margin-top"), "marginTop");
        assert_eq!(camel_case("color"), "color");
        assert_eq!(kebab_case("backgroundColor"), "background-color");
        assert_eq!(kebab_case(&camel_case("border-top-left-radius")), "border-top-left-radius");
    }

    #[test]
    fn leading_float_matches_lenient_css_numbers() {
        assert_eq!(parse_leading_float("12px"), Some(12.0));
        assert_eq!(parse_leading_float(" 1.5em"), Some(1.5));
        assert_eq!(parse_leading_float(".5rem"), Some(0.5));
        assert_eq!(parse_leading_float("-3px"), Some(-3.0));
        assert_eq!(parse_leading_float("2e2px"), Some(200.0));
        assert_eq!(parse_leading_float("1e"), Some(1.0));
        assert_eq!(parse_leading_float("auto"), None);
        assert_eq!(parse_leading_float("."), None);
        assert_eq!(parse_leading_float(""), None);
    }

    #[test]
    fn sizes_strip_units_but_keep_percentages() {
        assert_eq!(parse_size(&"20px".into()), StyleValue::Number(20.0));
        assert_eq!(parse_size(&"50%".into()), StyleValue::from("50%"));
        assert_eq!(parse_size(&"auto".into()), StyleValue::from("auto"));
        assert_eq!(parse_size(&StyleValue::Number(3.0)), StyleValue::Number(3.0));
    }

    #[test]
    fn font_size_defaults_when_unparsable() {
        assert_eq!(parse_font_size(&"18px".into()), 18.0);
        assert_eq!(parse_font_size(&"large".into()), DEFAULT_FONT_SIZE);
    }

    #[test]
    fn shorthand_token_counts() {
        let one = parse_box_shorthand("margin", "5px").unwrap();
        assert_eq!((one.top, one.right, one.bottom, one.left), ("5px", "5px", "5px", "5px"));

        let two = parse_box_shorthand("margin", "1px 2px").unwrap();
        assert_eq!((two.top, two.right, two.bottom, two.left), ("1px", "2px", "1px", "2px"));

        let three = parse_box_shorthand("padding", "1px 2px 3px").unwrap();
        assert_eq!((three.top, three.right, three.bottom, three.left), ("1px", "2px", "3px", "2px"));

        let four = parse_box_shorthand("margin", "1px 2px 3px 4px").unwrap();
        assert_eq!((four.top, four.right, four.bottom, four.left), ("1px", "2px", "3px", "4px"));
    }

    #[test]
    fn shorthand_rejects_other_counts() {
        assert!(matches!(
            parse_box_shorthand("margin", "1px 2px 3px 4px 5px"),
            Err(SansError::InvalidShorthand { tokens: 5, .. })
        ));
        assert!(matches!(
            parse_box_shorthand("padding", "   "),
            Err(SansError::InvalidShorthand { tokens: 0, .. })
        ));
    }

    #[test]
    fn numeric_shorthand_applies_everywhere() {
        let edges = box_edges("margin", &StyleValue::Number(8.0)).unwrap();
        assert_eq!(edges.left, StyleValue::Number(8.0));
    }

    #[test]
    fn css_rendering_of_values() {
        assert_eq!(StyleValue::Number(4.0).to_css("width"), "4px");
        assert_eq!(StyleValue::Number(0.5).to_css("opacity"), "0.5");
        assert_eq!(StyleValue::from("red").to_css("color"), "red");
    }

    #[test]
    fn style_prop_from_json() {
        let css = StyleInput::from_json(&serde_json::json!("color: red")).unwrap();
        assert_eq!(css.normalize()["color"], StyleValue::from("red"));

        let map = StyleInput::from_json(&serde_json::json!({ "font-size": 12, "nested": {} })).unwrap();
        let map = map.normalize();
        assert_eq!(map["fontSize"], StyleValue::Number(12.0));
        assert!(!map.contains_key("nested"));

        assert!(StyleInput::from_json(&serde_json::json!(3)).is_none());
    }
}
