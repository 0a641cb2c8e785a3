use serde::Serialize;

use crate::foundation::value::{Scope, Value};
use crate::markup::Element;

/// Ordered parameter list of an action or block.
///
/// Written as `params="name other=default"`: a bare name has an empty
/// default and must be supplied by every reference.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Params {
    entries: Vec<(String, String)>,
}

impl Params {
    pub fn parse(text: &str) -> Self {
        let entries = text
            .split_whitespace()
            .map(|item| match item.split_once('=') {
                Some((name, default)) => (name.to_owned(), default.to_owned()),
                None => (item.to_owned(), String::new()),
            })
            .collect();
        Self { entries }
    }

    /// Inverse of [`Params::parse`].
    pub fn to_attr(&self) -> String {
        self.entries
            .iter()
            .map(|(name, default)| {
                if default.is_empty() {
                    name.clone()
                } else {
                    format!("{name}={default}")
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Declared defaults, coerced.
    pub fn defaults(&self) -> Scope {
        self.entries
            .iter()
            .map(|(name, default)| (name.clone(), Value::coerce(default)))
            .collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }
}

/// End-user configuration knob (`opaf:define_config`).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ConfigDef {
    pub name: String,
    pub value: String,
    pub required: bool,
    pub allowed_values: Vec<String>,
    pub description: Option<String>,
}

impl ConfigDef {
    /// `true` when `candidate` may replace the default.
    pub fn allows(&self, candidate: &str) -> bool {
        self.allowed_values.is_empty() || self.allowed_values.iter().any(|v| v == candidate)
    }
}

/// Named derived value (`opaf:define_value`), evaluated in declaration order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ValueDef {
    pub uid: String,
    pub name: String,
    pub value: String,
    pub condition: Option<String>,
}

/// Named colour, always stored as lowercase `#rrggbb`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ColorDef {
    pub name: String,
    pub value: String,
}

/// Encoded image payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ImageDef {
    pub name: String,
    #[serde(skip)]
    pub data: Vec<u8>,
}

/// Single-instruction template (`opaf:define_action`). `elements` are the
/// unprefixed `<action>` templates emitted per reference.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ActionDef {
    pub name: String,
    pub custom: bool,
    pub params: Params,
    #[serde(skip)]
    pub elements: Vec<Element>,
}

/// Reusable structural sub-tree (`opaf:define_block`).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BlockDef {
    pub name: String,
    pub params: Params,
    #[serde(skip)]
    pub elements: Vec<Element>,
}

/// Grid of `opaf:row` templates (`opaf:define_chart`).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartDef {
    pub name: String,
    #[serde(skip)]
    pub rows: Vec<Element>,
    pub condition: Option<String>,
}

/// One section of the compiled pattern (`opaf:component`).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ComponentDef {
    pub name: String,
    pub uid: String,
    #[serde(skip)]
    pub elements: Vec<Element>,
    pub condition: Option<String>,
}

/// Accumulated descriptive metadata.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Metadata {
    pub elements: Vec<Element>,
}

#[cfg(test)]
#[path = "../../tests/unit/document/defs.rs"]
mod tests;
