//! Per-type parameters for leaf fields: input type, size, datatype, value
//! encoding and validation pattern.

use std::sync::LazyLock;

use oxigraph::model::vocab::xsd;
use oxigraph::model::{Literal, NamedNode, NamedNodeRef, Term};
use regex::Regex;

use crate::graph::term_value;

// ── Validation patterns ──────────────────────────────────────────────────

static RE_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*#[0-9a-fA-F]{6}\s*$").unwrap());

static RE_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[0-9]{4}(-[0-1]?[0-9]-[0-3]?[0-9])?Z?\s*$").unwrap());

static RE_INTEGER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*-?[0-9]+\s*$").unwrap());

static RE_DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*-?[0-9]*(\.[0-9]*)?\s*$").unwrap());

static RE_FLOAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*-?[0-9]*(\.[0-9]*)?([eE]-?[0-9]*)?\s*$").unwrap());

static RE_PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\+?[\d\s-]*\d[\d\s-]*$").unwrap());

static RE_EMAIL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*.*@.*\..*\s*$").unwrap());

/// The single-statement leaf field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BasicKind {
    Text,
    SingleLineText,
    Phone,
    Email,
    Color,
    Date,
    DateTime,
    Time,
    Numeric,
    Integer,
    Decimal,
    Float,
    NamedNodeUri,
}

impl BasicKind {
    pub const ALL: [BasicKind; 13] = [
        BasicKind::Text,
        BasicKind::SingleLineText,
        BasicKind::Phone,
        BasicKind::Email,
        BasicKind::Color,
        BasicKind::Date,
        BasicKind::DateTime,
        BasicKind::Time,
        BasicKind::Numeric,
        BasicKind::Integer,
        BasicKind::Decimal,
        BasicKind::Float,
        BasicKind::NamedNodeUri,
    ];

    /// Local name of the field class in the `ui:` namespace.
    pub fn class_name(self) -> &'static str {
        match self {
            BasicKind::Text => "TextField",
            BasicKind::SingleLineText => "SingleLineTextField",
            BasicKind::Phone => "PhoneField",
            BasicKind::Email => "EmailField",
            BasicKind::Color => "ColorField",
            BasicKind::Date => "DateField",
            BasicKind::DateTime => "DateTimeField",
            BasicKind::Time => "TimeField",
            BasicKind::Numeric => "NumericField",
            BasicKind::Integer => "IntegerField",
            BasicKind::Decimal => "DecimalField",
            BasicKind::Float => "FloatField",
            BasicKind::NamedNodeUri => "NamedNodeURIField",
        }
    }

    pub fn params(self) -> FieldParams {
        let base = FieldParams::default();
        match self {
            BasicKind::Text | BasicKind::SingleLineText => base,
            BasicKind::Phone => FieldParams {
                uri_prefix: Some("tel:"),
                pattern: Some(&RE_PHONE),
                input_type: "tel",
                ..base
            },
            BasicKind::Email => FieldParams {
                size: 30,
                uri_prefix: Some("mailto:"),
                pattern: Some(&RE_EMAIL),
                input_type: "email",
                ..base
            },
            BasicKind::Color => FieldParams {
                size: 9,
                input_type: "color",
                style: Some("height: 3em;"),
                pattern: Some(&RE_COLOR),
                ..base
            },
            BasicKind::Date => FieldParams {
                input_type: "date",
                datatype: Some(xsd::DATE),
                pattern: Some(&RE_DATE),
                ..base
            },
            BasicKind::DateTime => FieldParams {
                input_type: "datetime-local",
                datatype: Some(xsd::DATE_TIME),
                ..base
            },
            BasicKind::Time => FieldParams {
                size: 10,
                input_type: "time",
                datatype: Some(xsd::TIME),
                ..base
            },
            BasicKind::Integer => FieldParams {
                size: 12,
                style: Some("text-align: right;"),
                datatype: Some(xsd::INTEGER),
                pattern: Some(&RE_INTEGER),
                ..base
            },
            BasicKind::Numeric | BasicKind::Decimal => FieldParams {
                size: 12,
                style: Some("text-align: right;"),
                datatype: Some(xsd::DECIMAL),
                pattern: Some(&RE_DECIMAL),
                ..base
            },
            BasicKind::Float => FieldParams {
                size: 12,
                style: Some("text-align: right;"),
                datatype: Some(xsd::FLOAT),
                pattern: Some(&RE_FLOAT),
                ..base
            },
            BasicKind::NamedNodeUri => FieldParams {
                size: 80,
                input_type: "url",
                named_node: true,
                ..base
            },
        }
    }
}

/// How a leaf field displays, validates and encodes its value.
#[derive(Debug, Clone, Copy)]
pub struct FieldParams {
    pub size: usize,
    /// HTML-style input type hint for hosts.
    pub input_type: &'static str,
    pub style: Option<&'static str>,
    /// Literal datatype to write; plain literal when unset.
    pub datatype: Option<NamedNodeRef<'static>>,
    /// Values are stored as named nodes with this scheme (`tel:`, `mailto:`).
    pub uri_prefix: Option<&'static str>,
    /// Values are stored as named nodes verbatim.
    pub named_node: bool,
    pub pattern: Option<&'static LazyLock<Regex>>,
}

impl Default for FieldParams {
    fn default() -> Self {
        Self {
            size: 20,
            input_type: "text",
            style: None,
            datatype: None,
            uri_prefix: None,
            named_node: false,
            pattern: None,
        }
    }
}

impl FieldParams {
    pub fn is_valid(&self, text: &str) -> bool {
        self.pattern.is_none_or(|re| re.is_match(text))
    }

    /// The text shown in the input for a stored value.
    pub fn display(&self, term: &Term) -> String {
        let value = term_value(term);
        match (self.uri_prefix, term) {
            (Some(prefix), Term::NamedNode(_)) => {
                value.strip_prefix(prefix).unwrap_or(&value).to_string()
            }
            _ => value,
        }
    }

    /// Encode user input as the term to store.
    pub fn encode(&self, text: &str) -> Result<Term, String> {
        let text = text.trim();
        if self.named_node {
            return NamedNode::new(text)
                .map(Term::NamedNode)
                .map_err(|e| format!("not a valid URI: {e}"));
        }
        if let Some(prefix) = self.uri_prefix {
            let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
            return NamedNode::new(format!("{prefix}{compact}"))
                .map(Term::NamedNode)
                .map_err(|e| format!("not a valid {prefix} URI: {e}"));
        }
        Ok(Term::Literal(match self.datatype {
            Some(dt) => Literal::new_typed_literal(text, dt),
            None => Literal::new_simple_literal(text),
        }))
    }
}

/// Presentation of the read-only Comment and Heading fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayParams {
    pub element: &'static str,
    pub style: &'static str,
}

pub const COMMENT_PARAMS: DisplayParams = DisplayParams {
    element: "p",
    style: "padding: 0.1em 1.5em; color: #3B5998; white-space: pre-wrap;",
};

pub const HEADING_PARAMS: DisplayParams = DisplayParams {
    element: "h3",
    style: "font-size: 110%; color: #3B5998;",
};
