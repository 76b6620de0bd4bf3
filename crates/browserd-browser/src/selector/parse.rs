//! Prefix grammar for selector strings.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde_json::{Value, json};

/// How text and attribute values are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMatch {
    /// Substring match.
    Fuzzy,
    /// Equality after trimming whitespace.
    Exact,
}

impl TextMatch {
    fn is_exact(self) -> bool {
        self == TextMatch::Exact
    }
}

/// Parsed selector.
///
/// | Prefix | Variant |
/// |---|---|
/// | `text=` / `text:` | [`Selector::Text`] exact / fuzzy |
/// | `css:` / `c:` | [`Selector::Css`] |
/// | `xpath:` / `x:` | [`Selector::XPath`] |
/// | `tag:` / `t:` | [`Selector::Tag`] |
/// | `@name=v` / `@name:v` | [`Selector::Attribute`] exact / fuzzy |
/// | `#v` | [`Selector::Id`] |
/// | `.v` | [`Selector::Class`] |
/// | anything else | [`Selector::DefaultText`] |
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Text { text: String, mode: TextMatch },
    Css(String),
    XPath(String),
    Tag(String),
    Attribute {
        name: String,
        value: String,
        mode: TextMatch,
    },
    Id(String),
    Class(String),
    /// Fuzzy search by visible text.
    DefaultText(String),
}

#[derive(Clone, Copy)]
enum Prefix {
    TextExact,
    TextFuzzy,
    Css,
    XPath,
    Tag,
}

const PREFIXES: &[(&str, Prefix)] = &[
    ("text=", Prefix::TextExact),
    ("text:", Prefix::TextFuzzy),
    ("css:", Prefix::Css),
    ("c:", Prefix::Css),
    ("xpath:", Prefix::XPath),
    ("x:", Prefix::XPath),
    ("tag:", Prefix::Tag),
    ("t:", Prefix::Tag),
];

impl Prefix {
    fn build(self, value: &str) -> Selector {
        let value = value.to_string();
        match self {
            Prefix::TextExact => Selector::Text {
                text: value,
                mode: TextMatch::Exact,
            },
            Prefix::TextFuzzy => Selector::Text {
                text: value,
                mode: TextMatch::Fuzzy,
            },
            Prefix::Css => Selector::Css(value),
            Prefix::XPath => Selector::XPath(value),
            Prefix::Tag => Selector::Tag(value),
        }
    }
}

impl Selector {
    /// Parse a selector string. Never fails: unknown prefixes become [`Selector::DefaultText`].
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();

        for (prefix, kind) in PREFIXES {
            if let Some(rest) = raw.strip_prefix(prefix) {
                return kind.build(rest);
            }
        }

        if let Some(rest) = raw.strip_prefix('@') {
            if let Some(selector) = Self::parse_attribute(rest) {
                return selector;
            }
        } else if let Some(id) = raw.strip_prefix('#') {
            return Selector::Id(id.to_string());
        } else if let Some(class) = raw.strip_prefix('.') {
            return Selector::Class(class.to_string());
        }

        Selector::DefaultText(raw.to_string())
    }

    /// `name=value` or `name:value`, split at whichever separator comes first.
    fn parse_attribute(rest: &str) -> Option<Self> {
        let pos = rest.find(['=', ':'])?;
        let name = rest[..pos].trim();
        if name.is_empty() {
            return None;
        }
        let mode = if rest.as_bytes()[pos] == b'=' {
            TextMatch::Exact
        } else {
            TextMatch::Fuzzy
        };
        Some(Selector::Attribute {
            name: name.to_string(),
            value: rest[pos + 1..].to_string(),
            mode,
        })
    }

    /// Variant name, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Selector::Text { .. } => "text",
            Selector::Css(_) => "css",
            Selector::XPath(_) => "xpath",
            Selector::Tag(_) => "tag",
            Selector::Attribute { .. } => "attribute",
            Selector::Id(_) => "id",
            Selector::Class(_) => "class",
            Selector::DefaultText(_) => "default_text",
        }
    }

    /// Query object understood by the in-page finder.
    pub fn query(&self) -> Value {
        match self {
            Selector::Text { text, mode } => {
                json!({"type": "text", "value": text, "exact": mode.is_exact()})
            }
            Selector::DefaultText(text) => json!({"type": "text", "value": text, "exact": false}),
            Selector::Css(css) => json!({"type": "css", "value": css}),
            Selector::XPath(xpath) => json!({"type": "xpath", "value": xpath}),
            Selector::Tag(tag) => json!({"type": "tag", "value": tag}),
            Selector::Attribute { name, value, mode } => json!({
                "type": "attr",
                "name": name,
                "value": value,
                "exact": mode.is_exact(),
            }),
            Selector::Id(id) => json!({"type": "attr", "name": "id", "value": id, "exact": true}),
            Selector::Class(class) => json!({"type": "class", "value": class}),
        }
    }
}

impl FromStr for Selector {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Selector::parse(s))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Text { text, mode } => match mode {
                TextMatch::Exact => write!(f, "text={}", text),
                TextMatch::Fuzzy => write!(f, "text:{}", text),
            },
            Selector::Css(css) => write!(f, "css:{}", css),
            Selector::XPath(xpath) => write!(f, "xpath:{}", xpath),
            Selector::Tag(tag) => write!(f, "tag:{}", tag),
            Selector::Attribute { name, value, mode } => match mode {
                TextMatch::Exact => write!(f, "@{}={}", name, value),
                TextMatch::Fuzzy => write!(f, "@{}:{}", name, value),
            },
            Selector::Id(id) => write!(f, "#{}", id),
            Selector::Class(class) => write!(f, ".{}", class),
            Selector::DefaultText(text) => f.write_str(text),
        }
    }
}

#[cfg(test)]
#[path = "parse_tests.rs"]
mod tests;
